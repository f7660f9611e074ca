use serde::{Deserialize, Serialize};

/// Index of a registry slot. Doubles as the entity's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub u32);

impl SlotId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An entity that carries its own registry id.
pub trait Slotted {
    fn assign_id(&mut self, id: SlotId);
}

/// Dense arena that hands out the lowest free slot.
///
/// Ids are stable while the entity lives and are recycled after removal.
/// `next_free` is the lowest empty slot, or `slots.len()` when there is none:
/// every slot below it is occupied.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    slots: Vec<Option<T>>,
    next_free: usize,
    live: usize,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_free: 0,
            live: 0,
        }
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Empty the slot and return its entity. `None` if out of range or
    /// already empty.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let entity = self.slots.get_mut(id.index())?.take()?;
        if id.index() < self.next_free {
            self.next_free = id.index();
        }
        self.live -= 1;
        Some(entity)
    }

    /// Live entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|e| (SlotId(i as u32), e)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> + '_ {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|e| (SlotId(i as u32), e)))
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots, live or empty.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The id the next `add` will hand out.
    pub fn next_free(&self) -> SlotId {
        SlotId(self.next_free as u32)
    }

    /// Every slot in order, `None` for empty ones.
    pub fn slots(&self) -> &[Option<T>] {
        &self.slots
    }
}

impl<T: Slotted> Registry<T> {
    /// Store `entity` in the lowest free slot and stamp the id onto it.
    pub fn add(&mut self, mut entity: T) -> SlotId {
        let id = SlotId(self.next_free as u32);
        entity.assign_id(id);

        if self.next_free == self.slots.len() {
            self.slots.push(Some(entity));
            self.next_free = self.slots.len();
        } else {
            self.slots[self.next_free] = Some(entity);
            self.next_free = self.slots[self.next_free..]
                .iter()
                .position(Option::is_none)
                .map_or(self.slots.len(), |p| self.next_free + p);
        }
        self.live += 1;
        id
    }

    /// Rebuild from stored slots. Live entities get their index as id and
    /// the first empty slot becomes `next_free`.
    pub fn from_slots(mut slots: Vec<Option<T>>) -> Self {
        for (i, slot) in slots.iter_mut().enumerate() {
            if let Some(entity) = slot {
                entity.assign_id(SlotId(i as u32));
            }
        }
        let next_free = slots.iter().position(Option::is_none).unwrap_or(slots.len());
        let live = slots.iter().filter(|s| s.is_some()).count();
        Self {
            slots,
            next_free,
            live,
        }
    }
}
