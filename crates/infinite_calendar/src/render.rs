use chrono::{Datelike as _, NaiveDate};

use crate::{Month, Week};

type MonthBuilder<P> = Box<dyn Fn(i32, u32, &[Week]) -> P>;
type DayBuilder<P> = Box<dyn Fn(NaiveDate) -> P>;
type DayCallback = Box<dyn FnMut(NaiveDate)>;

/// A month turned into presentable values: a header and one row per week.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedMonth<P> {
    pub header: P,
    pub rows: Vec<[P; 7]>,
}

/// How months and days are presented, and what happens when a day is pressed.
///
/// `P` is whatever the presentation layer draws: a `String`, a widget, a
/// layout node. Each piece is a plain closure and can be swapped out on its own.
///
/// ```
/// # use chrono::NaiveDate;
/// # use infinite_calendar::CalendarRenderer;
/// let renderer = CalendarRenderer::text().day_builder(|date| format!("[{date}]"));
/// let date = NaiveDate::from_ymd_opt(2021, 6, 15).unwrap();
/// assert_eq!(renderer.render_day(date), "[2021-06-15]");
/// ```
pub struct CalendarRenderer<P> {
    month_builder: MonthBuilder<P>,
    day_builder: DayBuilder<P>,
    on_day_pressed: DayCallback,
}

/// `"2021-06"`
pub fn default_month_header(year: i32, month: u32, _weeks: &[Week]) -> String {
    format!("{year}-{month:02}")
}

/// The day of the month, e.g. `"15"`.
pub fn default_day_label(date: NaiveDate) -> String {
    date.day().to_string()
}

impl CalendarRenderer<String> {
    /// Text for everything, ignoring presses.
    pub fn text() -> Self {
        Self::new(default_month_header, default_day_label)
    }
}

impl<P> CalendarRenderer<P> {
    pub fn new(
        month_builder: impl Fn(i32, u32, &[Week]) -> P + 'static,
        day_builder: impl Fn(NaiveDate) -> P + 'static,
    ) -> Self {
        Self {
            month_builder: Box::new(month_builder),
            day_builder: Box::new(day_builder),
            on_day_pressed: Box::new(|_| {}),
        }
    }

    #[inline]
    pub fn month_builder(
        mut self,
        month_builder: impl Fn(i32, u32, &[Week]) -> P + 'static,
    ) -> Self {
        self.month_builder = Box::new(month_builder);
        self
    }

    #[inline]
    pub fn day_builder(mut self, day_builder: impl Fn(NaiveDate) -> P + 'static) -> Self {
        self.day_builder = Box::new(day_builder);
        self
    }

    /// Called with the date of a pressed day cell.
    #[inline]
    pub fn on_day_pressed(mut self, on_day_pressed: impl FnMut(NaiveDate) + 'static) -> Self {
        self.on_day_pressed = Box::new(on_day_pressed);
        self
    }

    pub fn render_header(&self, month: &Month) -> P {
        (self.month_builder)(month.year(), month.month(), month.weeks())
    }

    pub fn render_day(&self, date: NaiveDate) -> P {
        (self.day_builder)(date)
    }

    pub fn render_week(&self, week: &Week) -> [P; 7] {
        let mut days = week.days();
        std::array::from_fn(|_| self.render_day(days.next().unwrap_or(week.last_day())))
    }

    pub fn render_month(&self, month: &Month) -> RenderedMonth<P> {
        RenderedMonth {
            header: self.render_header(month),
            rows: month.weeks().iter().map(|week| self.render_week(week)).collect(),
        }
    }

    pub fn press(&mut self, date: NaiveDate) {
        log::trace!("day pressed: {date}");
        (self.on_day_pressed)(date);
    }
}
