/// Why a page of the calendar could not be produced.
///
/// Every variant is retryable: the failing cursor goes into
/// [`CursorStatus::Error`](crate::CursorStatus::Error) and the same page key is
/// requested again on the next [`request_next`](crate::CalendarCoordinator::request_next).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// Shifting the base month by the page offset does not land on a representable date.
    #[error("cannot shift {year}-{month:02} by {offset} months")]
    Computation { year: i32, month: u32, offset: i64 },

    /// A custom [`MonthLoader`](crate::MonthLoader) failed to produce the month.
    #[error("failed to fetch month: {0}")]
    Fetch(String),
}

pub type Result<T, E = CalendarError> = std::result::Result<T, E>;
