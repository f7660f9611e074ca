use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::model::*;
use crate::registry::{SlotId, Slotted};

pub type SpaceId = SlotId;

/// Everything needed to open a new space. The calendar origin comes from
/// the clock at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceSpec {
    pub name: String,
    pub dimensions: Dimensions,
    /// Number of people the space holds.
    pub capacity: u32,
    pub seating: Seating,
    pub amenities: Amenities,
    /// Price per hour.
    pub rate: f64,
}

impl SpaceSpec {
    pub fn new(name: impl Into<String>, rate: f64) -> Self {
        Self {
            name: name.into(),
            dimensions: Dimensions::default(),
            capacity: 0,
            seating: Seating::default(),
            amenities: Amenities::default(),
            rate,
        }
    }

    pub fn dimensions(mut self, length: f32, width: f32, height: f32) -> Self {
        self.dimensions = Dimensions::new(length, width, height);
        self
    }

    pub fn capacity(mut self, people: u32) -> Self {
        self.capacity = people;
        self
    }

    pub fn seating(mut self, seating: Seating) -> Self {
        self.seating = seating;
        self
    }

    pub fn amenities(mut self, amenities: Amenities) -> Self {
        self.amenities = amenities;
        self
    }
}

/// A bookable room. Owns its calendar and reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    id: SpaceId,
    name: String,
    pub dimensions: Dimensions,
    pub capacity: u32,
    pub seating: Seating,
    amenities: Amenities,
    calendar: Calendar,
    reviews: Reviews,
}

impl Space {
    /// The id is a placeholder until the registry stamps a real one.
    pub fn new(spec: SpaceSpec, calendar: Calendar) -> Self {
        Self {
            id: SlotId(0),
            name: spec.name,
            dimensions: spec.dimensions,
            capacity: spec.capacity,
            seating: spec.seating,
            amenities: spec.amenities,
            calendar,
            reviews: Reviews::default(),
        }
    }

    pub fn id(&self) -> SpaceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn amenities(&self) -> Amenities {
        self.amenities
    }

    pub fn has(&self, amenity: Amenity) -> bool {
        self.amenities.contains(amenity)
    }

    pub fn set_amenity(&mut self, amenity: Amenity, on: bool) {
        self.amenities.set(amenity, on);
    }

    pub fn toggle_amenity(&mut self, amenity: Amenity) -> bool {
        self.amenities.toggle(amenity)
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn calendar_mut(&mut self) -> &mut Calendar {
        &mut self.calendar
    }

    pub fn reviews(&self) -> &Reviews {
        &self.reviews
    }

    pub fn add_review(&mut self, comment: impl Into<String>, score: f32) {
        self.reviews.add(comment.into(), score);
    }
}

impl Slotted for Space {
    fn assign_id(&mut self, id: SlotId) {
        self.id = id;
    }
}
