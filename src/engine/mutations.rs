use tracing::{debug, info};

use crate::calendar::Calendar;
use crate::clock::Clock;
use crate::limits::*;
use crate::model::*;
use crate::observability::{self, BOOKINGS_TOTAL, CANCELLATIONS_TOTAL, HOURS_BOOKED_TOTAL};
use crate::space::{Space, SpaceId, SpaceSpec};

use super::{Engine, EngineError, check_window};

fn validate_name(name: &str) -> Result<(), EngineError> {
    if name.len() > MAX_NAME_LEN {
        return Err(EngineError::LimitExceeded("space name too long"));
    }
    Ok(())
}

impl<C: Clock> Engine<C> {
    /// Open a space whose calendar starts at the next hour boundary.
    pub fn create_space(&mut self, spec: SpaceSpec) -> Result<SpaceId, EngineError> {
        if self.spaces.len() >= MAX_SPACES {
            return Err(EngineError::LimitExceeded("too many spaces"));
        }
        validate_name(&spec.name)?;

        let calendar = Calendar::new(self.clock.now_ms(), spec.rate)
            .map_err(|e| EngineError::from_calendar(self.spaces.next_free(), e))?
            .with_cancel_policy(self.options.cancel_policy);
        let id = self.spaces.add(Space::new(spec, calendar));
        info!("created space {id}");
        self.report_active();
        Ok(id)
    }

    /// Remove a space. Its id becomes free for the next `create_space`.
    pub fn delete_space(&mut self, id: SpaceId) -> Result<Space, EngineError> {
        let space = self.spaces.remove(id).ok_or(EngineError::NotFound(id))?;
        info!("deleted space {id} ({})", space.name());
        self.report_active();
        Ok(space)
    }

    pub fn rename_space(&mut self, id: SpaceId, name: impl Into<String>) -> Result<(), EngineError> {
        let name = name.into();
        validate_name(&name)?;
        self.space_mut(id)?.rename(name);
        Ok(())
    }

    pub fn set_amenity(&mut self, id: SpaceId, amenity: Amenity, on: bool) -> Result<(), EngineError> {
        self.space_mut(id)?.set_amenity(amenity, on);
        Ok(())
    }

    /// Flip an amenity, returning whether it is now present.
    pub fn toggle_amenity(&mut self, id: SpaceId, amenity: Amenity) -> Result<bool, EngineError> {
        Ok(self.space_mut(id)?.toggle_amenity(amenity))
    }

    pub fn add_review(
        &mut self,
        id: SpaceId,
        comment: impl Into<String>,
        score: f32,
    ) -> Result<(), EngineError> {
        if !(MIN_REVIEW_SCORE..=MAX_REVIEW_SCORE).contains(&score) {
            return Err(EngineError::InvalidScore(score));
        }
        let comment = comment.into();
        if comment.len() > MAX_REVIEW_LEN {
            return Err(EngineError::LimitExceeded("review too long"));
        }
        let space = self.space_mut(id)?;
        if space.reviews().count() >= MAX_REVIEWS_PER_SPACE {
            return Err(EngineError::LimitExceeded("too many reviews on space"));
        }
        space.add_review(comment, score);
        Ok(())
    }

    /// New hourly rate; applies to future bookings only.
    pub fn set_rate(&mut self, id: SpaceId, rate: f64) -> Result<(), EngineError> {
        self.space_mut(id)?
            .calendar_mut()
            .set_rate(rate)
            .map_err(|e| EngineError::from_calendar(id, e))
    }

    /// Reserve the hours containing `start` through `end` (inclusive) and
    /// return the price.
    pub fn book(&mut self, id: SpaceId, start: Ms, end: Ms) -> Result<f64, EngineError> {
        let result = self.try_book(id, start, end);
        metrics::counter!(BOOKINGS_TOTAL, "status" => observability::status_label(&result))
            .increment(1);
        match &result {
            Ok((price, hours)) => {
                metrics::counter!(HOURS_BOOKED_TOTAL).increment(*hours);
                debug!("booked {hours}h on space {id} from {start} for {price}");
            }
            Err(e) => debug!("booking on space {id} rejected: {e}"),
        }
        result.map(|(price, _)| price)
    }

    /// Book a half-open span: the last hour is the one containing `span.end - 1`.
    pub fn book_span(&mut self, id: SpaceId, span: Span) -> Result<f64, EngineError> {
        self.check_span(id, span)?;
        self.book(id, span.start, span.end - 1)
    }

    /// Free the hours containing `start` through `end` (inclusive). No refund
    /// is computed.
    pub fn cancel(&mut self, id: SpaceId, start: Ms, end: Ms) -> Result<(), EngineError> {
        let result = self.try_cancel(id, start, end);
        metrics::counter!(CANCELLATIONS_TOTAL, "status" => observability::status_label(&result))
            .increment(1);
        match &result {
            Ok(()) => debug!("cancelled space {id} from {start} to {end}"),
            Err(e) => debug!("cancellation on space {id} rejected: {e}"),
        }
        result
    }

    pub fn cancel_span(&mut self, id: SpaceId, span: Span) -> Result<(), EngineError> {
        self.check_span(id, span)?;
        self.cancel(id, span.start, span.end - 1)
    }

    /// An empty or inverted span covers no hour at all.
    fn check_span(&self, id: SpaceId, span: Span) -> Result<(), EngineError> {
        let calendar = self.space_ref(id)?.calendar();
        if span.start >= span.end {
            return Err(EngineError::InvalidRange {
                space: id,
                first: calendar.hour_offset(span.start),
                last: calendar.hour_offset(span.end),
            });
        }
        Ok(())
    }

    fn try_book(&mut self, id: SpaceId, start: Ms, end: Ms) -> Result<(f64, u64), EngineError> {
        let horizon = self.options.horizon_hours;
        let calendar = self.space_mut(id)?.calendar_mut();
        check_window(calendar, horizon, start, end)?;
        let range = calendar
            .hour_range(start, end)
            .map_err(|e| EngineError::from_calendar(id, e))?;
        let price = calendar
            .add_reservation(start, end)
            .map_err(|e| EngineError::from_calendar(id, e))?;
        Ok((price, range.len()))
    }

    fn try_cancel(&mut self, id: SpaceId, start: Ms, end: Ms) -> Result<(), EngineError> {
        let horizon = self.options.horizon_hours;
        let calendar = self.space_mut(id)?.calendar_mut();
        check_window(calendar, horizon, start, end)?;
        calendar
            .remove_reservation(start, end)
            .map_err(|e| EngineError::from_calendar(id, e))
    }
}
