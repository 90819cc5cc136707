use chrono::Utc;

use crate::Error;

/// Hands out note ids derived from the wall clock in milliseconds.
///
/// Ids never repeat and never go backwards: two notes created within the same
/// millisecond (or after the clock steps back) get `last + 1`. Once the last
/// id is `i64::MAX` there is nothing left to hand out.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Start above every id in `existing`.
    pub fn seeded<I: IntoIterator<Item = i64>>(existing: I) -> Self {
        Self {
            last: existing.into_iter().max().unwrap_or(0),
        }
    }

    /// Next id based on the current time.
    pub fn next_id(&mut self) -> Result<i64, Error> {
        self.next_at(Utc::now().timestamp_millis())
    }

    /// Next id given the current time in milliseconds.
    pub fn next_at(&mut self, now_ms: i64) -> Result<i64, Error> {
        let floor = self
            .last
            .checked_add(1)
            .ok_or_else(|| Error::Internal("tweet ids exhausted".into()))?;
        let id = now_ms.max(floor);
        self.last = id;
        Ok(id)
    }
}
