use std::{cell::RefCell, rc::Rc};

use chrono::{Datelike as _, NaiveDate, Weekday};
use infinite_calendar::{
    CalendarCoordinator, CalendarEvent, CalendarOptions, CursorStatus, Direction, Month,
    MonthLoader, MonthQuery, MonthSender, YearMonth,
};
use similar_asserts::assert_eq;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn year_months(months: &[Month]) -> Vec<(i32, u32)> {
    months.iter().map(|m| (m.year(), m.month())).collect()
}

fn load_pages<L: MonthLoader>(
    calendar: &mut CalendarCoordinator<L>,
    direction: Direction,
    n: usize,
) {
    for _ in 0..n {
        calendar.request_next(direction);
        calendar.poll();
    }
}

fn completed(events: &[CalendarEvent]) -> Vec<Direction> {
    events
        .iter()
        .filter_map(|event| match event {
            CalendarEvent::PaginationCompleted(direction) => Some(*direction),
            _ => None,
        })
        .collect()
}

#[test]
fn forward_first_page_of_june_2021() {
    let options = CalendarOptions::default().initial_date(Some(date(2021, 6, 15)));
    let mut calendar = CalendarCoordinator::with_today(options, date(1999, 1, 1));
    load_pages(&mut calendar, Direction::Forward, 1);

    let june = &calendar.months(Direction::Forward)[0];
    assert_eq!((june.year(), june.month()), (2021, 6));
    let first = june.weeks()[0].first_day();
    let last = june.weeks()[june.weeks().len() - 1].last_day();
    assert_eq!(first, date(2021, 5, 31));
    assert_eq!(first.weekday(), Weekday::Mon);
    assert_eq!(last, date(2021, 7, 4));
    assert_eq!(last.weekday(), Weekday::Sun);
}

#[test]
fn backward_stops_at_the_month_showing_min_date() {
    let options = CalendarOptions::default().min_date(Some(date(2021, 1, 15)));
    let mut calendar = CalendarCoordinator::with_today(options, date(2021, 3, 1));
    load_pages(&mut calendar, Direction::Backward, 10);

    assert_eq!(
        year_months(calendar.months(Direction::Backward)),
        vec![(2021, 2), (2021, 1)]
    );
    assert!(calendar.is_completed(Direction::Backward));

    let events = calendar.take_events();
    assert_eq!(completed(&events), vec![Direction::Backward]);
    let loaded: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, CalendarEvent::MonthLoaded { .. }))
        .collect();
    assert_eq!(loaded.len(), 2);
}

#[test]
fn unbounded_pagination_never_completes() {
    let options = CalendarOptions::default().week_starts_on_sunday(true);
    let mut calendar = CalendarCoordinator::with_today(options, date(2021, 6, 15));
    load_pages(&mut calendar, Direction::Backward, 1000);
    load_pages(&mut calendar, Direction::Forward, 1000);

    assert_eq!(calendar.months(Direction::Backward).len(), 1000);
    assert_eq!(calendar.months(Direction::Forward).len(), 1000);
    assert!(completed(&calendar.take_events()).is_empty());

    let furthest = calendar.months(Direction::Backward).last().unwrap();
    assert_eq!(
        Some(furthest.year_month()),
        YearMonth::new(2021, 5).unwrap().shifted(-999)
    );
    for month in calendar.months(Direction::Forward) {
        assert!(month.weeks().iter().all(|week| week.first_day().weekday() == Weekday::Sun));
    }
}

#[test]
fn lists_grow_away_from_the_anchor() {
    let options = CalendarOptions::default();
    let mut calendar = CalendarCoordinator::with_today(options, date(2021, 2, 10));
    load_pages(&mut calendar, Direction::Backward, 3);
    load_pages(&mut calendar, Direction::Forward, 3);

    assert_eq!(
        year_months(calendar.months(Direction::Backward)),
        vec![(2021, 1), (2020, 12), (2020, 11)]
    );
    assert_eq!(
        year_months(calendar.months(Direction::Forward)),
        vec![(2021, 2), (2021, 3), (2021, 4)]
    );
}

#[test]
fn backward_is_ineligible_when_anchored_on_min_date() {
    let options = CalendarOptions::default().min_date(Some(date(2021, 1, 1)));
    let mut calendar = CalendarCoordinator::with_today(options, date(2021, 1, 1));
    assert!(!calendar.is_eligible(Direction::Backward));

    assert!(!calendar.request_next(Direction::Backward));
    calendar.poll();
    assert_eq!(calendar.status(Direction::Backward), CursorStatus::Idle);
    assert!(calendar.months(Direction::Backward).is_empty());

    // The forward direction still works and only forward months are reported:
    load_pages(&mut calendar, Direction::Forward, 2);
    let loaded: Vec<_> = calendar
        .take_events()
        .into_iter()
        .filter_map(|event| match event {
            CalendarEvent::MonthLoaded { year, month } => Some((year, month)),
            _ => None,
        })
        .collect();
    assert_eq!(loaded, vec![(2021, 1), (2021, 2)]);
}

#[test]
fn today_before_min_date_is_clamped() {
    let options = CalendarOptions::default()
        .min_date(Some(date(2030, 5, 5)))
        .max_date(Some(date(2030, 9, 1)));
    let mut calendar = CalendarCoordinator::with_today(options, date(2021, 6, 15));
    assert_eq!(calendar.anchor(), date(2030, 5, 5));
    assert!(!calendar.is_eligible(Direction::Backward));

    load_pages(&mut calendar, Direction::Forward, 10);
    assert_eq!(
        year_months(calendar.months(Direction::Forward)),
        vec![(2030, 5), (2030, 6), (2030, 7), (2030, 8)]
    );
    assert_eq!(completed(&calendar.take_events()), vec![Direction::Forward]);
}

#[test]
fn out_of_order_resolution_keeps_key_order() {
    type Pending = Rc<RefCell<Vec<(MonthQuery, MonthSender)>>>;
    let pending = Pending::default();
    let loader = {
        let pending = Rc::clone(&pending);
        move |query: MonthQuery, sender: MonthSender| {
            pending.borrow_mut().push((query, sender));
        }
    };

    let options = CalendarOptions::default();
    let mut calendar = CalendarCoordinator::with_loader(options, date(2021, 6, 15), loader);

    // Page 0 is requested, then abandoned by a reset; page 0 of the new
    // generation is requested too. They resolve newest first.
    assert!(calendar.request_next(Direction::Forward));
    calendar.reconfigure(CalendarOptions::default().initial_date(Some(date(2021, 9, 1))));
    assert!(calendar.request_next(Direction::Forward));

    let mut requests = pending.borrow_mut().drain(..).collect::<Vec<_>>();
    let (old_query, old_sender) = requests.remove(0);
    let (new_query, new_sender) = requests.remove(0);
    new_sender.send(new_query.compute());
    assert_eq!(calendar.poll(), 1);
    old_sender.send(old_query.compute());
    assert_eq!(calendar.poll(), 0);

    for _ in 0..3 {
        assert!(calendar.request_next(Direction::Forward));
        assert!(!calendar.request_next(Direction::Forward));
        let (query, sender) = pending.borrow_mut().remove(0);
        sender.send(query.compute());
        calendar.poll();
    }

    assert_eq!(
        year_months(calendar.months(Direction::Forward)),
        vec![(2021, 9), (2021, 10), (2021, 11), (2021, 12)]
    );
}
