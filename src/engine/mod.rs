mod error;
mod mutations;
mod queries;

pub use error::EngineError;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::calendar::{Calendar, CancelPolicy};
use crate::clock::Clock;
use crate::limits::*;
use crate::model::Ms;
use crate::registry::Registry;
use crate::snapshot::{self, SnapshotStore, Slots};
use crate::space::{Space, SpaceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Applied to every calendar the engine creates or loads.
    pub cancel_policy: CancelPolicy,
    /// Hours after a calendar's origin that may be booked or cancelled.
    pub horizon_hours: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            cancel_policy: CancelPolicy::default(),
            horizon_hours: DEFAULT_HORIZON_HOURS,
        }
    }
}

/// Registry of spaces plus the clock that opens their calendars.
///
/// Single-threaded: callers sharing an engine must serialize access
/// themselves, since booking is a check-then-set on the calendar.
pub struct Engine<C: Clock> {
    spaces: Registry<Space>,
    clock: C,
    options: EngineOptions,
    store: Option<SnapshotStore>,
}

impl<C: Clock> Engine<C> {
    /// In-memory engine with no snapshot file.
    pub fn new(clock: C, options: EngineOptions) -> Self {
        Self {
            spaces: Registry::new(),
            clock,
            options: EngineOptions {
                horizon_hours: options.horizon_hours.min(MAX_HORIZON_HOURS),
                ..options
            },
            store: None,
        }
    }

    /// Open the snapshot at `path`. A missing file starts an empty registry.
    pub fn open(path: impl Into<PathBuf>, clock: C, options: EngineOptions) -> Result<Self, EngineError> {
        let store = SnapshotStore::new(path);
        let slots = store.load()?;
        let mut engine = Self::new(clock, options);
        match slots {
            Some(slots) => {
                engine.restore(slots);
                info!(
                    "loaded {} spaces ({} slots) from {}",
                    engine.spaces.len(),
                    engine.spaces.slot_count(),
                    store.path().display()
                );
            }
            None => info!("no snapshot at {}, starting empty", store.path().display()),
        }
        engine.store = Some(store);
        Ok(engine)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Write every slot to the snapshot file. Returns the bytes written.
    pub fn save(&self) -> Result<u64, EngineError> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| EngineError::Storage("engine has no snapshot path".into()))?;
        let started = std::time::Instant::now();
        let written = store.save(self.spaces.slots())?;
        metrics::histogram!(crate::observability::SNAPSHOT_SAVE_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        metrics::gauge!(crate::observability::SNAPSHOT_BYTES).set(written as f64);
        info!(
            "saved {} spaces ({written} bytes) to {}",
            self.spaces.len(),
            store.path().display()
        );
        Ok(written)
    }

    pub fn export_json(&self, path: &Path) -> Result<(), EngineError> {
        snapshot::export_json(path, self.spaces.slots())?;
        info!("exported {} spaces to {}", self.spaces.len(), path.display());
        Ok(())
    }

    /// Replace every space with the contents of a JSON export.
    pub fn import_json(&mut self, path: &Path) -> Result<(), EngineError> {
        let slots = snapshot::import_json(path)?;
        self.restore(slots);
        info!("imported {} spaces from {}", self.spaces.len(), path.display());
        Ok(())
    }

    fn restore(&mut self, slots: Slots) {
        self.spaces = Registry::from_slots(slots);
        for (_, space) in self.spaces.iter_mut() {
            space.calendar_mut().set_cancel_policy(self.options.cancel_policy);
        }
        self.report_active();
    }

    pub(super) fn report_active(&self) {
        metrics::gauge!(crate::observability::SPACES_ACTIVE).set(self.spaces.len() as f64);
    }

    pub(super) fn space_mut(&mut self, id: SpaceId) -> Result<&mut Space, EngineError> {
        self.spaces.get_mut(id).ok_or(EngineError::NotFound(id))
    }

    pub(super) fn space_ref(&self, id: SpaceId) -> Result<&Space, EngineError> {
        self.spaces.get(id).ok_or(EngineError::NotFound(id))
    }
}

/// Reject timestamps outside the supported range and hours past the horizon.
pub(super) fn check_window(
    calendar: &Calendar,
    horizon_hours: u64,
    start: Ms,
    end: Ms,
) -> Result<(), EngineError> {
    let valid = 0..=MAX_VALID_TIMESTAMP_MS;
    if !valid.contains(&start) || !valid.contains(&end) {
        return Err(EngineError::LimitExceeded("timestamp out of range"));
    }
    if calendar.hour_offset(end) >= horizon_hours as i64 {
        return Err(EngineError::LimitExceeded("beyond booking horizon"));
    }
    Ok(())
}
