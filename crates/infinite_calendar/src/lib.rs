//! Month pagination for infinitely scrolling calendars.
//!
//! A [`CalendarCoordinator`] runs two [`PaginationCursor`]s away from an anchor date:
//! one into the past, one into the future. Each cursor asks for one month at a
//! time, appends it to its own list, and stops for good once a month reaches the
//! configured `min_date` / `max_date`.
//!
//! Months are laid out as full weeks starting on Monday or Sunday
//! (see [`compute_month`]), so they can be drawn as a grid directly.
//!
//! Drawing is up to you: feed the [`Month`] lists through a [`CalendarRenderer`],
//! or enable the `egui` feature and use `CalendarView`.
//!
//! ## Feature flags
#![cfg_attr(feature = "document-features", doc = document_features::document_features!())]
//!

#![forbid(unsafe_code)]

mod coordinator;
mod cursor;
mod error;
mod loader;
mod month;
mod options;
mod render;

#[cfg(feature = "egui")]
mod egui_view;

pub use crate::coordinator::{CalendarCoordinator, CalendarEvent};
pub use crate::cursor::{
    CursorStatus, Delivery, Direction, PageKey, PageTicket, PaginationCursor, StatusTransition,
};
pub use crate::error::{CalendarError, Result};
pub use crate::loader::{ImmediateLoader, MonthLoader, MonthQuery, MonthSender};
pub use crate::month::{Month, Week, WeekStart, YearMonth, compute_month, is_past_boundary};
pub use crate::options::CalendarOptions;
pub use crate::render::{CalendarRenderer, RenderedMonth, default_day_label, default_month_header};

#[cfg(feature = "egui")]
pub use crate::egui_view::CalendarView;

pub use chrono;
pub use poll_promise;
