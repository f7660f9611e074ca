use crate::calendar::CalendarError;
use crate::space::SpaceId;

#[derive(Debug)]
pub enum EngineError {
    NotFound(SpaceId),
    /// Hour offsets relative to the space's calendar origin.
    InvalidRange {
        space: SpaceId,
        first: i64,
        last: i64,
    },
    Conflict {
        space: SpaceId,
        hour: u64,
    },
    NotReserved {
        space: SpaceId,
        hour: u64,
    },
    InvalidRate(f64),
    InvalidScore(f32),
    LimitExceeded(&'static str),
    Storage(String),
}

impl EngineError {
    /// Attach the space to a calendar rejection.
    pub(super) fn from_calendar(space: SpaceId, err: CalendarError) -> Self {
        match err {
            CalendarError::InvalidRange { first, last } => {
                EngineError::InvalidRange { space, first, last }
            }
            CalendarError::Conflict { hour } => EngineError::Conflict { space, hour },
            CalendarError::NotReserved { hour } => EngineError::NotReserved { space, hour },
            CalendarError::InvalidRate(rate) => EngineError::InvalidRate(rate),
            CalendarError::TooFar { .. } => EngineError::LimitExceeded("beyond calendar capacity"),
            CalendarError::WordOverflow(_) => EngineError::Storage(err.to_string()),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound(id) => write!(f, "space not found: {id}"),
            EngineError::InvalidRange { space, first, last } => {
                write!(f, "invalid hour range [{first}, {last}] on space {space}")
            }
            EngineError::Conflict { space, hour } => {
                write!(f, "space {space} already reserved at hour {hour}")
            }
            EngineError::NotReserved { space, hour } => {
                write!(f, "space {space} not reserved at hour {hour}")
            }
            EngineError::InvalidRate(rate) => write!(f, "invalid hourly rate: {rate}"),
            EngineError::InvalidScore(score) => {
                write!(f, "review score {score} outside 0..=5")
            }
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::Storage(e) => write!(f, "storage error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Storage(e.to_string())
    }
}
