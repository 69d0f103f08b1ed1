use crate::{CalendarError, Month};

/// Offset of a page from a cursor's first page, in months.
pub type PageKey = i64;

/// The two ways a calendar can be scrolled away from its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Direction {
    /// Toward the past.
    Backward,

    /// Toward the future.
    Forward,
}

impl Direction {
    pub const ALL: [Self; 2] = [Self::Backward, Self::Forward];

    /// How the page key moves after each successful page.
    pub fn step(self) -> PageKey {
        match self {
            Self::Backward => -1,
            Self::Forward => 1,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Backward => "backward",
            Self::Forward => "forward",
        })
    }
}

/// Where a [`PaginationCursor`] is in its request cycle.
///
/// ```text
/// Idle ─► Loading ─┬─► Loaded ─► Idle
///  ▲               ├─► Completed
///  └──── retry ────┴─► Error
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum CursorStatus {
    /// Nothing in flight, more pages may follow.
    #[default]
    Idle,

    /// Waiting for the page of [`PaginationCursor::next_key`].
    Loading,

    /// The last page arrived and was not the final one.
    Loaded,

    /// The boundary was reached. Terminal until [`PaginationCursor::reset`].
    Completed,

    /// The last page failed. The next request retries the same key.
    Error,
}

/// Identifies one outstanding page request.
///
/// A result is only applied if its ticket is the one the cursor is waiting
/// for in its current generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PageTicket {
    pub direction: Direction,
    pub key: PageKey,

    /// Bumped on every [`PaginationCursor::reset`].
    pub generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: CursorStatus,
    pub to: CursorStatus,
}

/// What happened to a delivered page result.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Applied,

    /// The ticket was from an older generation, or not the one being waited for.
    /// The result was dropped.
    Stale,
}

/// Generates pages in one direction, one at a time, in key order.
#[derive(Debug)]
pub struct PaginationCursor {
    direction: Direction,
    first_key: PageKey,
    next_key: PageKey,
    status: CursorStatus,
    months: Vec<Month>,
    generation: u64,
    last_error: Option<CalendarError>,
    transitions: Vec<StatusTransition>,
}

impl PaginationCursor {
    pub fn new(direction: Direction, first_key: PageKey) -> Self {
        Self {
            direction,
            first_key,
            next_key: first_key,
            status: CursorStatus::Idle,
            months: Vec::new(),
            generation: 0,
            last_error: None,
            transitions: Vec::new(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn status(&self) -> CursorStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == CursorStatus::Completed
    }

    /// The key the next (or currently outstanding) request is for.
    pub fn next_key(&self) -> PageKey {
        self.next_key
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Every month produced since the last reset, in key order.
    pub fn months(&self) -> &[Month] {
        &self.months
    }

    /// Why the cursor is in [`CursorStatus::Error`], if it is.
    pub fn last_error(&self) -> Option<&CalendarError> {
        self.last_error.as_ref()
    }

    /// Start loading the next page.
    ///
    /// Returns `None` (and does nothing) while a page is in flight or after
    /// the cursor completed. After an error the same key is requested again.
    pub fn request_next(&mut self) -> Option<PageTicket> {
        match self.status {
            CursorStatus::Idle => {}
            CursorStatus::Error => self.set_status(CursorStatus::Idle),
            CursorStatus::Loading | CursorStatus::Loaded | CursorStatus::Completed => {
                return None;
            }
        }

        self.set_status(CursorStatus::Loading);
        let ticket = PageTicket {
            direction: self.direction,
            key: self.next_key,
            generation: self.generation,
        };
        log::trace!("{} cursor requests page {}", self.direction, ticket.key);
        Some(ticket)
    }

    /// Apply a successfully loaded page.
    ///
    /// With `is_last` the cursor completes, otherwise it moves on to the next key.
    pub fn on_page_fetched(
        &mut self,
        ticket: PageTicket,
        months: Vec<Month>,
        is_last: bool,
    ) -> Delivery {
        if !self.is_waiting_for(ticket) {
            log::debug!("{} cursor discards stale page {ticket:?}", self.direction);
            return Delivery::Stale;
        }

        self.months.extend(months);
        self.last_error = None;
        if is_last {
            self.set_status(CursorStatus::Completed);
        } else {
            self.next_key = self.next_key.saturating_add(self.direction.step());
            self.set_status(CursorStatus::Loaded);
            self.set_status(CursorStatus::Idle);
        }
        Delivery::Applied
    }

    /// Record a failed page. The key is kept so that a retry asks for it again.
    pub fn on_page_failed(&mut self, ticket: PageTicket, error: CalendarError) -> Delivery {
        if !self.is_waiting_for(ticket) {
            log::debug!("{} cursor discards stale failure {ticket:?}", self.direction);
            return Delivery::Stale;
        }

        self.last_error = Some(error);
        self.set_status(CursorStatus::Error);
        Delivery::Applied
    }

    /// Forget all pages and start over at the first key.
    ///
    /// Results of requests issued before the reset will be [`Delivery::Stale`].
    pub fn reset(&mut self) {
        log::debug!(
            "{} cursor reset at generation {}",
            self.direction,
            self.generation
        );
        self.months.clear();
        self.next_key = self.first_key;
        self.generation = self.generation.wrapping_add(1);
        self.last_error = None;
        if self.status != CursorStatus::Idle {
            self.set_status(CursorStatus::Idle);
        }
    }

    /// Status changes since the last call, oldest first.
    pub fn drain_transitions(&mut self) -> std::vec::Drain<'_, StatusTransition> {
        self.transitions.drain(..)
    }

    fn is_waiting_for(&self, ticket: PageTicket) -> bool {
        self.status == CursorStatus::Loading
            && ticket.direction == self.direction
            && ticket.generation == self.generation
            && ticket.key == self.next_key
    }

    fn set_status(&mut self, status: CursorStatus) {
        self.transitions.push(StatusTransition {
            from: self.status,
            to: status,
        });
        self.status = status;
    }
}
