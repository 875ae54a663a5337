//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the analytics core and its
//! collaborators. Implementations live in other crates.

use crate::Series;
use chrono::NaiveDate;

/// Source of historical observations
///
/// Implemented by the infrastructure layer (foresight-engine)
pub trait HistoricalDataSource {
    /// Error type for source operations
    type Error;

    /// Get the series recorded for an entity
    ///
    /// Returns `Ok(None)` when the entity is unknown.
    fn get_series(&self, entity_id: &str) -> Result<Option<Series>, Self::Error>;
}

/// Calendar lookup used for holiday features
pub trait HolidayCalendar {
    /// Whether `date` is a holiday
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

/// A calendar with no holidays
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn is_holiday(&self, _date: NaiveDate) -> bool {
        false
    }
}

impl<C: HolidayCalendar + ?Sized> HolidayCalendar for &C {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        (**self).is_holiday(date)
    }
}

impl<C: HolidayCalendar + ?Sized> HolidayCalendar for std::sync::Arc<C> {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        (**self).is_holiday(date)
    }
}
