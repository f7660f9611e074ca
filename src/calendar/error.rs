use super::MAX_CALENDAR_HOURS;

#[derive(Debug, Clone, PartialEq)]
pub enum CalendarError {
    /// Last hour precedes first hour, or the range starts before the origin.
    /// Offsets are relative to the calendar origin.
    InvalidRange { first: i64, last: i64 },
    /// Hour offset already reserved.
    Conflict { hour: u64 },
    /// Strict cancellation found an hour that was not reserved.
    NotReserved { hour: u64 },
    InvalidRate(f64),
    /// Hour offset past the furthest hour a calendar can hold.
    TooFar { hour: i64 },
    /// Stored word does not fit the calendar's block width.
    WordOverflow(u64),
}

impl std::fmt::Display for CalendarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalendarError::InvalidRange { first, last } => {
                write!(f, "invalid hour range [{first}, {last}]")
            }
            CalendarError::Conflict { hour } => write!(f, "hour {hour} already reserved"),
            CalendarError::NotReserved { hour } => write!(f, "hour {hour} is not reserved"),
            CalendarError::InvalidRate(rate) => write!(f, "invalid hourly rate: {rate}"),
            CalendarError::TooFar { hour } => {
                write!(f, "hour {hour} beyond the last {MAX_CALENDAR_HOURS} calendar hours")
            }
            CalendarError::WordOverflow(word) => {
                write!(f, "stored word {word:#x} wider than calendar block")
            }
        }
    }
}

impl std::error::Error for CalendarError {}
