use crate::clock::Clock;
use crate::model::*;
use crate::space::{Space, SpaceId};

use super::{Engine, EngineError, check_window};

impl<C: Clock> Engine<C> {
    pub fn space(&self, id: SpaceId) -> Option<&Space> {
        self.spaces.get(id)
    }

    /// Live spaces in id order.
    pub fn spaces(&self) -> impl Iterator<Item = (SpaceId, &Space)> + '_ {
        self.spaces.iter()
    }

    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    /// The id the next `create_space` will hand out.
    pub fn next_id(&self) -> SpaceId {
        self.spaces.next_free()
    }

    pub fn spaces_with(&self, amenity: Amenity) -> Vec<SpaceId> {
        self.spaces
            .iter()
            .filter(|(_, s)| s.has(amenity))
            .map(|(id, _)| id)
            .collect()
    }

    /// Price the hours containing `start` through `end` without booking them.
    pub fn quote(&self, id: SpaceId, start: Ms, end: Ms) -> Result<f64, EngineError> {
        let calendar = self.space_ref(id)?.calendar();
        check_window(calendar, self.options.horizon_hours, start, end)?;
        calendar
            .quote(start, end)
            .map_err(|e| EngineError::from_calendar(id, e))
    }

    /// Reserved time inside `window`, as merged hour-aligned spans clipped
    /// to the window.
    pub fn reserved_spans(&self, id: SpaceId, window: Span) -> Result<Vec<Span>, EngineError> {
        let calendar = self.space_ref(id)?.calendar();
        Ok(calendar
            .reserved_runs()
            .into_iter()
            .map(|run| calendar.range_span(run))
            .filter_map(|span| span.clamp_to(&window))
            .collect())
    }

    /// Bookable time inside `window`. Nothing before the calendar origin is
    /// bookable, so the window is clipped to it first.
    pub fn free_spans(&self, id: SpaceId, window: Span) -> Result<Vec<Span>, EngineError> {
        let origin = self.space_ref(id)?.calendar().origin();
        if window.end <= origin {
            return Ok(Vec::new());
        }
        let open = Span::new(window.start.max(origin), window.end);
        let reserved = self.reserved_spans(id, open)?;

        let mut free = Vec::new();
        let mut cursor = open.start;
        for taken in reserved {
            if taken.start > cursor {
                free.push(Span::new(cursor, taken.start));
            }
            cursor = cursor.max(taken.end);
        }
        if cursor < open.end {
            free.push(Span::new(cursor, open.end));
        }
        Ok(free)
    }
}
