use chrono::{Datelike as _, Days, NaiveDate, Weekday};

use crate::{CalendarError, Direction, PageKey, Result};

/// Which day a week begins on.
///
/// Internally every weekday gets an index `1..=7` relative to this day,
/// so both conventions share one layout algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn from_sunday_flag(week_starts_on_sunday: bool) -> Self {
        if week_starts_on_sunday {
            Self::Sunday
        } else {
            Self::Monday
        }
    }

    pub fn first_weekday(self) -> Weekday {
        match self {
            Self::Monday => Weekday::Mon,
            Self::Sunday => Weekday::Sun,
        }
    }

    /// `1` for the first day of the week, `7` for the day before it.
    pub fn weekday_index(self, date: NaiveDate) -> u8 {
        let index = match self {
            Self::Monday => date.weekday().number_from_monday(),
            Self::Sunday => date.weekday().number_from_sunday(),
        };
        index as u8
    }
}

/// A calendar month, ordered chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct YearMonth {
    pub year: i32,

    /// `1..=12`
    pub month: u32,
}

impl YearMonth {
    /// `None` if `month` is not in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Moves `months` forward (or backward, if negative), rolling over the year.
    pub fn shifted(self, months: i64) -> Option<Self> {
        let total = i64::from(self.year)
            .checked_mul(12)?
            .checked_add(i64::from(self.month) - 1)?
            .checked_add(months)?;
        let year = i32::try_from(total.div_euclid(12)).ok()?;
        let month = total.rem_euclid(12) as u32 + 1;
        Some(Self { year, month })
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        self.shifted(1)?.first_day()?.pred_opt()
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Seven consecutive days, starting on the configured [`WeekStart`].
///
/// The days may spill into the neighbouring months.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Week {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl Week {
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Always `first_day + 6 days`.
    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        self.first_day.iter_days().take(7)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first_day <= date && date <= self.last_day
    }
}

/// One page of the calendar: a month and the full weeks covering it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "MonthData"))]
pub struct Month {
    year: i32,
    month: u32,
    weeks: Vec<Week>,
}

/// [`Month`] as it is deserialized, before its layout is checked.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct MonthData {
    year: i32,
    month: u32,
    weeks: Vec<Week>,
}

#[cfg(feature = "serde")]
impl TryFrom<MonthData> for Month {
    type Error = &'static str;

    fn try_from(data: MonthData) -> Result<Self, Self::Error> {
        let MonthData { year, month, weeks } = data;
        let first = YearMonth::new(year, month)
            .and_then(YearMonth::first_day)
            .ok_or("month out of range")?;
        let last = YearMonth { year, month }
            .last_day()
            .ok_or("month out of range")?;

        let (Some(first_week), Some(last_week)) = (weeks.first(), weeks.last()) else {
            return Err("a month needs at least one week");
        };
        if !first_week.contains(first) || !last_week.contains(last) {
            return Err("weeks do not cover the month");
        }
        let is_week =
            |week: &Week| week.first_day.checked_add_days(Days::new(6)) == Some(week.last_day);
        if !weeks.iter().all(is_week) {
            return Err("a week must span seven days");
        }
        if !weeks
            .windows(2)
            .all(|pair| pair[0].last_day.succ_opt() == Some(pair[1].first_day))
        {
            return Err("weeks are not consecutive");
        }

        Ok(Self { year, month, weeks })
    }
}

impl Month {
    pub fn year(&self) -> i32 {
        self.year
    }

    /// `1..=12`
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year_month(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }

    /// Never empty.
    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    /// The first day shown for this month, possibly in the previous month.
    pub fn first_visible_day(&self) -> NaiveDate {
        self.weeks[0].first_day
    }

    /// The last day shown for this month, possibly in the next month.
    pub fn last_visible_day(&self) -> NaiveDate {
        self.weeks[self.weeks.len() - 1].last_day
    }

    /// Does `date` belong to this month (as opposed to the padding around it)?
    pub fn contains_day(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// Lay out the month `page_offset` months away from `base`.
///
/// The `boundary` does not change the result. It is only reported when the
/// visible weeks reach it, so that callers tracing a session can see where a
/// direction is about to end.
///
/// # Errors
/// [`CalendarError::Computation`] if the target month or its padding days
/// fall outside the range chrono can represent.
pub fn compute_month(
    base: YearMonth,
    page_offset: PageKey,
    boundary: Option<NaiveDate>,
    week_start: WeekStart,
) -> Result<Month> {
    let computation_error = || CalendarError::Computation {
        year: base.year,
        month: base.month,
        offset: page_offset,
    };

    let target = base.shifted(page_offset).ok_or_else(computation_error)?;
    let first = target.first_day().ok_or_else(computation_error)?;
    let last = target.last_day().ok_or_else(computation_error)?;

    let leading_days = u64::from(week_start.weekday_index(first) - 1);
    let mut start = first
        .checked_sub_days(Days::new(leading_days))
        .ok_or_else(computation_error)?;

    let mut weeks = Vec::with_capacity(6);
    loop {
        let end = start
            .checked_add_days(Days::new(6))
            .ok_or_else(computation_error)?;
        weeks.push(Week {
            first_day: start,
            last_day: end,
        });
        if last <= end {
            break;
        }
        start = end.succ_opt().ok_or_else(computation_error)?;
    }

    let month = Month {
        year: target.year,
        month: target.month,
        weeks,
    };

    if let Some(boundary) = boundary
        && month.first_visible_day() <= boundary
        && boundary <= month.last_visible_day()
    {
        log::trace!("{target} shows boundary date {boundary}");
    }

    Ok(month)
}

/// Should pagination in `direction` stop after `month`?
///
/// Compares against the padded week range, not the month itself, so a month
/// whose leading or trailing days already reach the bound ends the direction.
pub fn is_past_boundary(
    month: &Month,
    min_date: Option<NaiveDate>,
    max_date: Option<NaiveDate>,
    direction: Direction,
) -> bool {
    match direction {
        Direction::Backward => min_date.is_some_and(|min| month.first_visible_day() <= min),
        Direction::Forward => max_date.is_some_and(|max| max <= month.last_visible_day()),
    }
}
