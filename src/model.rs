use serde::{Deserialize, Serialize};

/// Unix milliseconds.
pub type Ms = i64;

/// One calendar hour in milliseconds.
pub const HOUR_MS: Ms = 3_600_000;

/// The next hour boundary strictly after `t`. An instant already on a
/// boundary moves a full hour forward.
pub fn next_hour_boundary(t: Ms) -> Ms {
    t - t.rem_euclid(HOUR_MS) + HOUR_MS
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Ms,
    pub end: Ms,
}

impl Span {
    pub fn new(start: Ms, end: Ms) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    /// Intersection with `other`, or `None` if they don't overlap.
    pub fn clamp_to(&self, other: &Span) -> Option<Span> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then(|| Span::new(start, end))
    }
}

// ── Space attributes ─────────────────────────────────────────────

/// Box-shaped room measurements in metres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f32,
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub fn new(length: f32, width: f32, height: f32) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Floor area.
    pub fn area(&self) -> f32 {
        self.length * self.width
    }

    /// `max/min` of length and width; 0 when either side is 0.
    pub fn aspect_ratio(&self) -> f32 {
        if self.length == 0.0 || self.width == 0.0 {
            return 0.0;
        }
        self.length.max(self.width) / self.length.min(self.width)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seating {
    pub seats: u32,
    /// Raked rows (lecture halls, cinemas).
    pub slanted: bool,
    /// Seats on every side of a stage.
    pub surround: bool,
    pub comfy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Amenity {
    Outdoor,
    Catering,
    NaturalLight,
    ArtificialLight,
    Projector,
    Sound,
    Cameras,
}

impl Amenity {
    pub const ALL: [Amenity; 7] = [
        Amenity::Outdoor,
        Amenity::Catering,
        Amenity::NaturalLight,
        Amenity::ArtificialLight,
        Amenity::Projector,
        Amenity::Sound,
        Amenity::Cameras,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn label(self) -> &'static str {
        match self {
            Amenity::Outdoor => "outdoor",
            Amenity::Catering => "catering",
            Amenity::NaturalLight => "natural_light",
            Amenity::ArtificialLight => "artificial_light",
            Amenity::Projector => "projector",
            Amenity::Sound => "sound",
            Amenity::Cameras => "cameras",
        }
    }
}

/// Set of [`Amenity`] flags packed into one byte. Stored as one named
/// boolean per amenity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AmenityFlags", into = "AmenityFlags")]
pub struct Amenities(u8);

#[derive(Serialize, Deserialize)]
struct AmenityFlags {
    outdoor: bool,
    catering: bool,
    natural_light: bool,
    artificial_light: bool,
    projector: bool,
    sound: bool,
    cameras: bool,
}

impl From<Amenities> for AmenityFlags {
    fn from(a: Amenities) -> Self {
        Self {
            outdoor: a.contains(Amenity::Outdoor),
            catering: a.contains(Amenity::Catering),
            natural_light: a.contains(Amenity::NaturalLight),
            artificial_light: a.contains(Amenity::ArtificialLight),
            projector: a.contains(Amenity::Projector),
            sound: a.contains(Amenity::Sound),
            cameras: a.contains(Amenity::Cameras),
        }
    }
}

impl From<AmenityFlags> for Amenities {
    fn from(f: AmenityFlags) -> Self {
        let mut a = Amenities::empty();
        a.set(Amenity::Outdoor, f.outdoor);
        a.set(Amenity::Catering, f.catering);
        a.set(Amenity::NaturalLight, f.natural_light);
        a.set(Amenity::ArtificialLight, f.artificial_light);
        a.set(Amenity::Projector, f.projector);
        a.set(Amenity::Sound, f.sound);
        a.set(Amenity::Cameras, f.cameras);
        a
    }
}

impl Default for Amenities {
    /// What a plain indoor hall has: lighting, projector, sound and cameras.
    fn default() -> Self {
        Self::empty()
            .with(Amenity::ArtificialLight)
            .with(Amenity::Projector)
            .with(Amenity::Sound)
            .with(Amenity::Cameras)
    }
}

impl Amenities {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn with(mut self, amenity: Amenity) -> Self {
        self.set(amenity, true);
        self
    }

    pub fn contains(&self, amenity: Amenity) -> bool {
        self.0 & amenity.bit() != 0
    }

    pub fn set(&mut self, amenity: Amenity, on: bool) {
        if on {
            self.0 |= amenity.bit();
        } else {
            self.0 &= !amenity.bit();
        }
    }

    /// Flip a flag, returning its new state.
    pub fn toggle(&mut self, amenity: Amenity) -> bool {
        self.0 ^= amenity.bit();
        self.contains(amenity)
    }

    pub fn iter(&self) -> impl Iterator<Item = Amenity> + '_ {
        Amenity::ALL.into_iter().filter(|a| self.contains(*a))
    }
}

pub const MIN_REVIEW_SCORE: f32 = 0.0;
pub const MAX_REVIEW_SCORE: f32 = 5.0;

/// Running average score plus the comments, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reviews {
    score: f32,
    comments: Vec<String>,
}

impl Reviews {
    /// Record a review. `score` is clamped into `0.0..=5.0`.
    pub fn add(&mut self, comment: String, score: f32) {
        let score = score.clamp(MIN_REVIEW_SCORE, MAX_REVIEW_SCORE);
        let n = self.comments.len() as f32;
        self.score = (self.score * n + score) / (n + 1.0);
        self.comments.push(comment);
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn count(&self) -> usize {
        self.comments.len()
    }

    pub fn is_reviewed(&self) -> bool {
        !self.comments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_clamp() {
        let window = Span::new(100, 400);
        assert_eq!(Span::new(50, 200).clamp_to(&window), Some(Span::new(100, 200)));
        assert_eq!(Span::new(150, 300).clamp_to(&window), Some(Span::new(150, 300)));
        assert_eq!(Span::new(400, 500).clamp_to(&window), None);
    }

    #[test]
    fn hour_boundary_rounds_up() {
        assert_eq!(next_hour_boundary(1), HOUR_MS);
        assert_eq!(next_hour_boundary(HOUR_MS - 1), HOUR_MS);
        // Already on a boundary: still moves to the next one
        assert_eq!(next_hour_boundary(HOUR_MS), 2 * HOUR_MS);
        assert_eq!(next_hour_boundary(0), HOUR_MS);
    }

    #[test]
    fn dimensions_area_and_aspect() {
        let d = Dimensions::new(20.0, 10.0, 3.0);
        assert_eq!(d.area(), 200.0);
        assert_eq!(d.aspect_ratio(), 2.0);

        let tall = Dimensions::new(5.0, 15.0, 3.0);
        assert_eq!(tall.aspect_ratio(), 3.0);
    }

    #[test]
    fn dimensions_zero_side() {
        let d = Dimensions::new(0.0, 10.0, 3.0);
        assert_eq!(d.area(), 0.0);
        assert_eq!(d.aspect_ratio(), 0.0);
        assert_eq!(Dimensions::default().aspect_ratio(), 0.0);
    }

    #[test]
    fn amenities_default_set() {
        let a = Amenities::default();
        assert!(a.contains(Amenity::ArtificialLight));
        assert!(a.contains(Amenity::Projector));
        assert!(a.contains(Amenity::Sound));
        assert!(a.contains(Amenity::Cameras));
        assert!(!a.contains(Amenity::Outdoor));
        assert!(!a.contains(Amenity::Catering));
        assert!(!a.contains(Amenity::NaturalLight));
        assert_eq!(a.iter().count(), 4);
    }

    #[test]
    fn amenities_set_and_toggle() {
        let mut a = Amenities::empty();
        a.set(Amenity::Catering, true);
        assert!(a.contains(Amenity::Catering));
        assert!(!a.toggle(Amenity::Catering));
        assert!(!a.contains(Amenity::Catering));
        assert!(a.toggle(Amenity::Outdoor));
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![Amenity::Outdoor]);
    }

    #[test]
    fn amenities_serialize_as_named_flags() {
        let a = Amenities::empty().with(Amenity::Outdoor).with(Amenity::Cameras);
        let json = serde_json::to_value(a).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "outdoor": true,
                "catering": false,
                "natural_light": false,
                "artificial_light": false,
                "projector": false,
                "sound": false,
                "cameras": true,
            })
        );
        let labels: Vec<_> = a.iter().map(Amenity::label).collect();
        assert_eq!(labels, vec!["outdoor", "cameras"]);

        let back: Amenities = serde_json::from_value(json).unwrap();
        assert_eq!(back, a);
        let bytes = bincode::serialize(&Amenities::default()).unwrap();
        assert_eq!(bincode::deserialize::<Amenities>(&bytes).unwrap(), Amenities::default());
    }

    #[test]
    fn reviews_running_average() {
        let mut r = Reviews::default();
        assert!(!r.is_reviewed());
        r.add("Cozy atmosphere".into(), 4.0);
        r.add("Too far from the city".into(), 2.0);
        r.add("Good sound system".into(), 3.0);
        assert!(r.is_reviewed());
        assert_eq!(r.count(), 3);
        assert!((r.score() - 3.0).abs() < 1e-6);
        assert_eq!(r.comments()[0], "Cozy atmosphere");
    }

    #[test]
    fn reviews_clamp_score() {
        let mut r = Reviews::default();
        r.add("great".into(), 9.0);
        assert_eq!(r.score(), 5.0);
        r.add("awful".into(), -3.0);
        assert_eq!(r.score(), 2.5);
    }
}
