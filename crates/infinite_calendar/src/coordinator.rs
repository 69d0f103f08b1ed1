use chrono::NaiveDate;
use poll_promise::Promise;

use crate::{
    CalendarError, CalendarOptions, CursorStatus, Delivery, Direction, ImmediateLoader, Month,
    MonthLoader, MonthQuery, MonthSender, PaginationCursor, PageTicket, Result, WeekStart,
    YearMonth, is_past_boundary,
};

/// Something the presentation layer may want to react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalendarEvent {
    /// A month was appended to one of the lists.
    MonthLoaded { year: i32, month: u32 },

    /// The direction reached its bound. Sent once each time a cursor completes.
    PaginationCompleted(Direction),

    StatusChanged {
        direction: Direction,
        status: CursorStatus,
    },
}

struct InFlight {
    ticket: PageTicket,
    promise: Promise<Result<Month>>,
}

/// One cursor plus what it needs to turn page keys into months.
struct Lane {
    cursor: PaginationCursor,

    /// Month of page key `0`. `None` if the anchor is at the very edge of the calendar.
    base: Option<YearMonth>,

    /// Requests of the current generation that have not resolved yet.
    in_flight: Vec<InFlight>,
}

impl Lane {
    fn new(direction: Direction, base: Option<YearMonth>) -> Self {
        Self {
            cursor: PaginationCursor::new(direction, 0),
            base,
            in_flight: Vec::new(),
        }
    }
}

fn lane_bases(anchor: NaiveDate) -> (Option<YearMonth>, Option<YearMonth>) {
    let anchor_month = YearMonth::from_date(anchor);
    (anchor_month.shifted(-1), Some(anchor_month))
}

/// Drives the two pagination cursors of an infinite calendar.
///
/// The backward cursor starts at the month before the anchor and walks into
/// the past, the forward cursor starts at the anchor month and walks into the
/// future. Each stops once a generated month reaches its bound.
///
/// Call [`Self::request_next`] (or [`Self::ensure_visible`]) when more months
/// are wanted, [`Self::poll`] once per frame to apply finished pages, and
/// [`Self::take_events`] to learn what changed.
///
/// ```
/// # use chrono::NaiveDate;
/// # use infinite_calendar::{CalendarCoordinator, CalendarOptions, Direction};
/// let today = NaiveDate::from_ymd_opt(2021, 6, 15).unwrap();
/// let mut calendar = CalendarCoordinator::with_today(CalendarOptions::default(), today);
/// assert!(calendar.request_next(Direction::Forward));
/// calendar.poll();
/// assert_eq!(calendar.months(Direction::Forward)[0].month(), 6);
/// ```
pub struct CalendarCoordinator<L = ImmediateLoader> {
    options: CalendarOptions,
    today: NaiveDate,
    anchor: NaiveDate,
    backward: Lane,
    forward: Lane,
    loader: L,
    events: Vec<CalendarEvent>,
}

impl CalendarCoordinator<ImmediateLoader> {
    /// Anchored on today's local date, unless the options say otherwise.
    pub fn new(options: CalendarOptions) -> Self {
        Self::with_today(options, chrono::Local::now().date_naive())
    }

    pub fn with_today(options: CalendarOptions, today: NaiveDate) -> Self {
        Self::with_loader(options, today, ImmediateLoader)
    }
}

impl<L: MonthLoader> CalendarCoordinator<L> {
    pub fn with_loader(options: CalendarOptions, today: NaiveDate, loader: L) -> Self {
        if let (Some(min), Some(max)) = (options.min_date, options.max_date)
            && max < min
        {
            log::warn!("min_date {min} is after max_date {max}");
        }

        let anchor = options.anchor_date(today);
        let (backward_base, forward_base) = lane_bases(anchor);
        log::debug!("calendar anchored on {anchor}");

        Self {
            options,
            today,
            anchor,
            backward: Lane::new(Direction::Backward, backward_base),
            forward: Lane::new(Direction::Forward, forward_base),
            loader,
            events: Vec::new(),
        }
    }

    pub fn options(&self) -> &CalendarOptions {
        &self.options
    }

    /// The date both directions paginate away from.
    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn week_start(&self) -> WeekStart {
        self.options.week_start()
    }

    pub fn cursor(&self, direction: Direction) -> &PaginationCursor {
        &self.lane(direction).cursor
    }

    /// Months produced in `direction`, nearest to the anchor first.
    pub fn months(&self, direction: Direction) -> &[Month] {
        self.cursor(direction).months()
    }

    pub fn status(&self, direction: Direction) -> CursorStatus {
        self.cursor(direction).status()
    }

    pub fn is_completed(&self, direction: Direction) -> bool {
        self.cursor(direction).is_completed()
    }

    /// Is there anything left to paginate in `direction` at all?
    ///
    /// A direction whose bound is at (or beyond) the anchor never loads a page.
    pub fn is_eligible(&self, direction: Direction) -> bool {
        match direction {
            Direction::Backward => self.options.min_date.is_none_or(|min| min < self.anchor),
            Direction::Forward => self.options.max_date.is_none_or(|max| self.anchor < max),
        }
    }

    /// Are any page requests of the current generation still unresolved?
    pub fn has_pending(&self) -> bool {
        !self.backward.in_flight.is_empty() || !self.forward.in_flight.is_empty()
    }

    /// Everything that happened since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<CalendarEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replace the options.
    ///
    /// If the anchor, the bounds or the week start change, both directions
    /// start over. Returns `true` in that case.
    pub fn reconfigure(&mut self, options: CalendarOptions) -> bool {
        let anchor = options.anchor_date(self.today);
        let changed = anchor != self.anchor
            || options.min_date != self.options.min_date
            || options.max_date != self.options.max_date
            || options.week_starts_on_sunday != self.options.week_starts_on_sunday;
        self.options = options;
        if changed {
            self.reset(anchor);
        }
        changed
    }

    /// Tell the coordinator what today is, e.g. after midnight.
    ///
    /// Only matters without an explicit initial date. Returns `true` if the
    /// anchor moved and pagination started over.
    pub fn set_today(&mut self, today: NaiveDate) -> bool {
        self.today = today;
        let anchor = self.options.anchor_date(today);
        let changed = anchor != self.anchor;
        if changed {
            self.reset(anchor);
        }
        changed
    }

    /// Ask for the next month in `direction`.
    ///
    /// Returns `false` if the direction is not eligible, already has a page in
    /// flight, or has completed. Retries the failed key after an error.
    pub fn request_next(&mut self, direction: Direction) -> bool {
        if !self.is_eligible(direction) {
            return false;
        }

        let boundary = match direction {
            Direction::Backward => self.options.min_date,
            Direction::Forward => self.options.max_date,
        };
        let week_start = self.options.week_start();
        let lane = match direction {
            Direction::Backward => &mut self.backward,
            Direction::Forward => &mut self.forward,
        };

        let Some(ticket) = lane.cursor.request_next() else {
            return false;
        };

        let promise = match lane.base {
            Some(base) => {
                let (sender, promise) = MonthSender::channel();
                let query = MonthQuery {
                    base,
                    page_offset: ticket.key,
                    boundary,
                    week_start,
                };
                self.loader.load(query, sender);
                promise
            }
            None => {
                let anchor_month = YearMonth::from_date(self.anchor);
                Promise::from_ready(Err(CalendarError::Computation {
                    year: anchor_month.year,
                    month: anchor_month.month,
                    offset: direction.step(),
                }))
            }
        };
        lane.in_flight.push(InFlight { ticket, promise });

        self.flush_transitions(direction);
        true
    }

    /// Request another month if fewer than
    /// [`CalendarOptions::invisible_items_threshold`] months are loaded past
    /// the visible month at `index`.
    pub fn ensure_visible(&mut self, direction: Direction, index: usize) -> bool {
        let wanted = index
            .saturating_add(1)
            .saturating_add(self.options.invisible_items_threshold);
        self.months(direction).len() < wanted && self.request_next(direction)
    }

    /// Apply every page result that is ready. Returns how many were applied
    /// (stale results are dropped and not counted).
    pub fn poll(&mut self) -> usize {
        Direction::ALL
            .into_iter()
            .map(|direction| self.poll_direction(direction))
            .sum()
    }

    fn poll_direction(&mut self, direction: Direction) -> usize {
        let min_date = self.options.min_date;
        let max_date = self.options.max_date;
        let lane = match direction {
            Direction::Backward => &mut self.backward,
            Direction::Forward => &mut self.forward,
        };

        let mut applied = 0;
        let mut still_pending = Vec::new();
        for InFlight { ticket, promise } in std::mem::take(&mut lane.in_flight) {
            let result = match promise.try_take() {
                Ok(result) => result,
                Err(promise) => {
                    still_pending.push(InFlight { ticket, promise });
                    continue;
                }
            };

            match result {
                Ok(month) => {
                    let is_last = is_past_boundary(&month, min_date, max_date, direction);
                    let (year, month_number) = (month.year(), month.month());
                    if lane.cursor.on_page_fetched(ticket, vec![month], is_last)
                        == Delivery::Applied
                    {
                        log::trace!("{direction} page {} is {year}-{month_number:02}", ticket.key);
                        self.events.push(CalendarEvent::MonthLoaded {
                            year,
                            month: month_number,
                        });
                        applied += 1;
                    }
                }
                Err(err) => {
                    if lane.cursor.on_page_failed(ticket, err) == Delivery::Applied {
                        if let Some(err) = lane.cursor.last_error() {
                            log::warn!("{direction} page {} failed: {err}", ticket.key);
                        }
                        applied += 1;
                    }
                }
            }
        }
        lane.in_flight = still_pending;

        self.flush_transitions(direction);
        applied
    }

    fn reset(&mut self, anchor: NaiveDate) {
        log::debug!("calendar re-anchored on {anchor}");
        let (backward_base, forward_base) = lane_bases(anchor);
        self.anchor = anchor;
        self.backward.base = backward_base;
        self.forward.base = forward_base;
        // Late results of the old generation are dropped by their senders.
        self.backward.in_flight.clear();
        self.forward.in_flight.clear();
        for direction in Direction::ALL {
            match direction {
                Direction::Backward => self.backward.cursor.reset(),
                Direction::Forward => self.forward.cursor.reset(),
            }
            self.flush_transitions(direction);
        }
    }

    fn lane(&self, direction: Direction) -> &Lane {
        match direction {
            Direction::Backward => &self.backward,
            Direction::Forward => &self.forward,
        }
    }

    fn flush_transitions(&mut self, direction: Direction) {
        let lane = match direction {
            Direction::Backward => &mut self.backward,
            Direction::Forward => &mut self.forward,
        };
        for transition in lane.cursor.drain_transitions() {
            self.events.push(CalendarEvent::StatusChanged {
                direction,
                status: transition.to,
            });
            if transition.to == CursorStatus::Completed {
                log::debug!("{direction} pagination completed");
                self.events.push(CalendarEvent::PaginationCompleted(direction));
            }
        }
    }
}
