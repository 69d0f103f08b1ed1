use chrono::NaiveDate;

use crate::WeekStart;

/// How an infinite calendar is anchored, bounded and laid out.
///
/// ```
/// # use chrono::NaiveDate;
/// # use infinite_calendar::CalendarOptions;
/// let options = CalendarOptions::default()
///     .min_date(NaiveDate::from_ymd_opt(2021, 1, 1))
///     .week_starts_on_sunday(true);
/// assert!(options.max_date.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CalendarOptions {
    /// Earliest date pagination may reach, inclusive. `None` = unbounded.
    pub min_date: Option<NaiveDate>,

    /// Latest date pagination may reach, inclusive. `None` = unbounded.
    pub max_date: Option<NaiveDate>,

    /// Date to center on. `None` = today. Clamped into `min_date..=max_date`.
    pub initial_date: Option<NaiveDate>,

    pub week_starts_on_sunday: bool,

    /// How many months beyond the last visible one to keep loaded.
    pub invisible_items_threshold: usize,

    /// Presentation hint: keep month views alive when they scroll out of sight.
    pub keep_alive: bool,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            min_date: None,
            max_date: None,
            initial_date: None,
            week_starts_on_sunday: false,
            invisible_items_threshold: 3,
            keep_alive: false,
        }
    }
}

impl CalendarOptions {
    /// Earliest reachable date. (Default: `None`)
    #[inline]
    pub fn min_date(mut self, min_date: Option<NaiveDate>) -> Self {
        self.min_date = min_date;
        self
    }

    /// Latest reachable date. (Default: `None`)
    #[inline]
    pub fn max_date(mut self, max_date: Option<NaiveDate>) -> Self {
        self.max_date = max_date;
        self
    }

    /// Date to center on instead of today. (Default: `None`)
    #[inline]
    pub fn initial_date(mut self, initial_date: Option<NaiveDate>) -> Self {
        self.initial_date = initial_date;
        self
    }

    /// Start weeks on Sunday instead of Monday. (Default: false)
    #[inline]
    pub fn week_starts_on_sunday(mut self, week_starts_on_sunday: bool) -> Self {
        self.week_starts_on_sunday = week_starts_on_sunday;
        self
    }

    /// Months to prefetch past the visible range. (Default: 3)
    #[inline]
    pub fn invisible_items_threshold(mut self, invisible_items_threshold: usize) -> Self {
        self.invisible_items_threshold = invisible_items_threshold;
        self
    }

    /// Keep month views alive when scrolled away. (Default: false)
    #[inline]
    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn week_start(&self) -> WeekStart {
        WeekStart::from_sunday_flag(self.week_starts_on_sunday)
    }

    /// The date pagination is centered on, given what today is.
    ///
    /// If the bounds are inverted the result is clamped to `min_date` first
    /// and then to `max_date`, so `max_date` wins.
    pub fn anchor_date(&self, today: NaiveDate) -> NaiveDate {
        let mut anchor = self.initial_date.unwrap_or(today);
        if let Some(min) = self.min_date
            && anchor < min
        {
            anchor = min;
        }
        if let Some(max) = self.max_date
            && max < anchor
        {
            anchor = max;
        }
        anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day)
    }

    #[test]
    fn anchor_defaults_to_today() {
        let today = date(2021, 6, 15).unwrap();
        assert_eq!(CalendarOptions::default().anchor_date(today), today);
    }

    #[test]
    fn explicit_initial_date_wins_over_today() {
        let options = CalendarOptions::default().initial_date(date(2020, 2, 29));
        assert_eq!(options.anchor_date(date(2021, 6, 15).unwrap()), date(2020, 2, 29).unwrap());
    }

    #[test]
    fn anchor_is_clamped_into_the_bounds() {
        let today = date(2021, 6, 15).unwrap();

        let options = CalendarOptions::default().min_date(date(2022, 1, 1));
        assert_eq!(options.anchor_date(today), date(2022, 1, 1).unwrap());

        let options = CalendarOptions::default().max_date(date(2021, 1, 1));
        assert_eq!(options.anchor_date(today), date(2021, 1, 1).unwrap());

        let options = CalendarOptions::default()
            .min_date(date(2021, 1, 1))
            .max_date(date(2021, 12, 31));
        assert_eq!(options.anchor_date(today), today);
    }

    #[test]
    fn inverted_bounds_prefer_max() {
        let options = CalendarOptions::default()
            .min_date(date(2022, 1, 1))
            .max_date(date(2021, 1, 1));
        assert_eq!(options.anchor_date(date(2021, 6, 15).unwrap()), date(2021, 1, 1).unwrap());
    }
}
