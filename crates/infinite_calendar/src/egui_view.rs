use chrono::NaiveDate;
use egui::{Button, Grid, Id, ScrollArea, Ui, WidgetText};

use crate::{CalendarCoordinator, CalendarRenderer, Direction, Month, MonthLoader};

/// Shows an infinite calendar in a vertical [`ScrollArea`].
///
/// The backward months are stacked above the anchor, the forward months below it.
/// More months are requested as the ones near the end of each list come into view.
///
/// ```no_run
/// # use infinite_calendar::{CalendarCoordinator, CalendarOptions, CalendarRenderer, CalendarView};
/// # fn ui(
/// #     ui: &mut egui::Ui,
/// #     calendar: &mut CalendarCoordinator,
/// #     renderer: &mut CalendarRenderer<String>,
/// # ) {
/// if let Some(date) = CalendarView::new(calendar, renderer).show(ui) {
///     println!("pressed {date}");
/// }
/// # }
/// ```
pub struct CalendarView<'a, L, P> {
    calendar: &'a mut CalendarCoordinator<L>,
    renderer: &'a mut CalendarRenderer<P>,
    id_salt: Id,
}

impl<'a, L: MonthLoader, P: Into<WidgetText>> CalendarView<'a, L, P> {
    pub fn new(
        calendar: &'a mut CalendarCoordinator<L>,
        renderer: &'a mut CalendarRenderer<P>,
    ) -> Self {
        Self {
            calendar,
            renderer,
            id_salt: Id::new("infinite_calendar"),
        }
    }

    /// Must be set if multiple calendars are in the same Ui.
    #[inline]
    pub fn id_salt(mut self, id_salt: impl std::hash::Hash) -> Self {
        self.id_salt = Id::new(id_salt);
        self
    }

    /// Returns the day pressed this frame, if any.
    pub fn show(self, ui: &mut Ui) -> Option<NaiveDate> {
        let Self {
            calendar,
            renderer,
            id_salt,
        } = self;

        calendar.poll();

        let mut pressed = None;
        let mut last_visible = [None; 2];
        ScrollArea::vertical()
            .id_salt(id_salt)
            .auto_shrink(false)
            .show(ui, |ui| {
                let backward = calendar.months(Direction::Backward);
                for (index, month) in backward.iter().enumerate().rev() {
                    let id = id_salt.with((Direction::Backward, month.year_month()));
                    let (visible, day) = month_ui(ui, renderer, month, id);
                    if visible {
                        last_visible[0] = last_visible[0].max(Some(index));
                    }
                    pressed = pressed.or(day);
                }

                ui.separator();

                let forward = calendar.months(Direction::Forward);
                for (index, month) in forward.iter().enumerate() {
                    let id = id_salt.with((Direction::Forward, month.year_month()));
                    let (visible, day) = month_ui(ui, renderer, month, id);
                    if visible {
                        last_visible[1] = last_visible[1].max(Some(index));
                    }
                    pressed = pressed.or(day);
                }
            });

        for (direction, index) in Direction::ALL.into_iter().zip(last_visible) {
            calendar.ensure_visible(direction, index.unwrap_or(0));
        }
        if calendar.has_pending() {
            ui.ctx().request_repaint();
        }

        if let Some(date) = pressed {
            renderer.press(date);
        }
        pressed
    }
}

/// Returns whether any of the month is on screen, and which day was clicked.
fn month_ui<P: Into<WidgetText>>(
    ui: &mut Ui,
    renderer: &CalendarRenderer<P>,
    month: &Month,
    id: Id,
) -> (bool, Option<NaiveDate>) {
    let header = ui.label(renderer.render_header(month));

    let mut pressed = None;
    let grid = Grid::new(id).num_columns(7).show(ui, |ui| {
        for week in month.weeks() {
            for (date, cell) in week.days().zip(renderer.render_week(week)) {
                let text: WidgetText = cell.into();
                if ui
                    .add_enabled(month.contains_day(date), Button::new(text))
                    .clicked()
                {
                    pressed = Some(date);
                }
            }
            ui.end_row();
        }
    });

    let visible = ui.is_rect_visible(header.rect.union(grid.response.rect));
    (visible, pressed)
}
