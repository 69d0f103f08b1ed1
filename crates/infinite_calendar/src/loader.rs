use chrono::NaiveDate;
use poll_promise::{Promise, Sender};

use crate::{CalendarError, Month, PageKey, Result, WeekStart, YearMonth, compute_month};

/// Everything needed to produce one page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthQuery {
    /// The month at page offset `0`.
    pub base: YearMonth,

    pub page_offset: PageKey,

    /// The bound of the direction being paginated, if any.
    pub boundary: Option<NaiveDate>,

    pub week_start: WeekStart,
}

impl MonthQuery {
    /// Run the calendar math for this query.
    ///
    /// # Errors
    /// See [`compute_month`].
    pub fn compute(&self) -> Result<Month> {
        compute_month(self.base, self.page_offset, self.boundary, self.week_start)
    }
}

/// Where a [`MonthLoader`] puts the result of one page.
///
/// Can be moved to another thread. Dropping it without calling [`Self::send`]
/// fails the page with [`CalendarError::Fetch`], and the page can be retried.
#[must_use = "You should call MonthSender::send with the month"]
pub struct MonthSender(Option<Sender<Result<Month>>>);

impl MonthSender {
    /// A sender and the promise it resolves.
    pub(crate) fn channel() -> (Self, Promise<Result<Month>>) {
        let (sender, promise) = Promise::new();
        (Self(Some(sender)), promise)
    }

    /// Deliver the page. Does nothing if the page is no longer wanted.
    pub fn send(mut self, result: Result<Month>) {
        if let Some(sender) = self.0.take() {
            sender.send(result);
        }
    }
}

impl Drop for MonthSender {
    fn drop(&mut self) {
        if let Some(sender) = self.0.take() {
            sender.send(Err(CalendarError::Fetch(
                "the loader dropped the page without a result".to_owned(),
            )));
        }
    }
}

impl std::fmt::Debug for MonthSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonthSender")
            .field("sent", &self.0.is_none())
            .finish()
    }
}

/// Produces months for the [`CalendarCoordinator`](crate::CalendarCoordinator).
///
/// The result may be sent whenever you like, from any thread. The coordinator
/// picks it up on its next [`poll`](crate::CalendarCoordinator::poll).
/// Wrap [`MonthQuery::compute`] to attach extra data loading (events from a
/// server, say) to each page.
pub trait MonthLoader {
    fn load(&mut self, query: MonthQuery, sender: MonthSender);
}

/// Computes the month right away.
///
/// The result is still delivered on the following
/// [`poll`](crate::CalendarCoordinator::poll), like any other page.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateLoader;

impl MonthLoader for ImmediateLoader {
    fn load(&mut self, query: MonthQuery, sender: MonthSender) {
        sender.send(query.compute());
    }
}

impl<F> MonthLoader for F
where
    F: FnMut(MonthQuery, MonthSender),
{
    fn load(&mut self, query: MonthQuery, sender: MonthSender) {
        self(query, sender);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> MonthQuery {
        MonthQuery {
            base: YearMonth::new(2021, 6).unwrap(),
            page_offset: 0,
            boundary: None,
            week_start: WeekStart::Monday,
        }
    }

    #[test]
    fn sent_month_resolves_the_promise() {
        let (sender, promise) = MonthSender::channel();
        sender.send(query().compute());
        let month = promise.try_take().ok().unwrap().unwrap();
        assert_eq!(month.month(), 6);
    }

    #[test]
    fn dropped_sender_fails_the_page() {
        let (sender, promise) = MonthSender::channel();
        drop(sender);
        assert!(matches!(
            promise.try_take().ok(),
            Some(Err(CalendarError::Fetch(_)))
        ));
    }

    #[test]
    fn sender_can_finish_on_another_thread() {
        let (sender, promise) = MonthSender::channel();
        std::thread::spawn(move || sender.send(query().compute()))
            .join()
            .unwrap();
        assert!(promise.block_and_take().is_ok());
    }

    #[test]
    fn sending_to_an_abandoned_page_is_harmless() {
        let (sender, promise) = MonthSender::channel();
        drop(promise);
        sender.send(query().compute());
    }
}
