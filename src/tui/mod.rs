pub mod event;
pub mod ui;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::calendar::{self, Clock, Direction, GridCell, MonthCursor, MonthGrid};
use crate::catalog::Catalog;

// ─── App State ──────────────────────────────────────────────────────────────

/// Holds the month on screen and re-renders the grid whenever it changes.
pub struct App {
    pub catalog: Catalog,
    clock: Box<dyn Clock>,
    pub running: bool,

    pub cursor: MonthCursor,
    pub grid: MonthGrid,
    /// Keyboard focus within the grid; always inside `grid`.
    pub selected: NaiveDate,
    /// "Today" as of the last grid build.
    rendered_on: NaiveDate,

    pub show_welcome: bool,
    pub status_message: String,
}

impl App {
    pub fn new(catalog: Catalog, clock: Box<dyn Clock>, start: Option<MonthCursor>) -> Self {
        let today = clock.today();
        let cursor = start.unwrap_or_else(|| MonthCursor::containing(today));
        let selected = if cursor.contains(today) {
            today
        } else {
            cursor.first_day()
        };
        let grid = calendar::render(cursor, &catalog, &*clock);
        let status_message = format!("{} classes on the schedule.", catalog.len());

        Self {
            catalog,
            clock,
            running: true,
            cursor,
            grid,
            selected,
            rendered_on: today,
            show_welcome: true,
            status_message,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Header clock time.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Footer stamp year.
    pub fn year(&self) -> i32 {
        self.today().year()
    }

    pub fn navigate(&mut self, direction: Direction) {
        self.set_cursor(calendar::navigate(self.cursor, direction));
        self.selected = self.cursor.first_day();
        debug!(month = %self.grid.title, ?direction, "navigated");
    }

    /// Move the focused day; the view follows it into adjacent months.
    pub fn move_selection(&mut self, days: i64) {
        let Some(date) = self.selected.checked_add_signed(Duration::days(days)) else {
            return;
        };
        if !self.cursor.contains(date) {
            let cursor = MonthCursor::containing(date);
            // Past the first or last month that can be shown.
            if !cursor.contains(date) {
                return;
            }
            self.set_cursor(cursor);
            debug!(month = %self.grid.title, "selection moved to another month");
        }
        self.selected = date;
    }

    pub fn jump_to_today(&mut self) {
        let today = self.today();
        self.set_cursor(MonthCursor::containing(today));
        self.selected = today;
        self.status_message = format!("Today is {}.", today.format("%A, %B %-d"));
    }

    /// Rebuild when the date rolls over so the "Today" badge moves.
    pub fn tick(&mut self) {
        if self.today() != self.rendered_on {
            self.set_cursor(self.cursor);
        }
    }

    pub fn dismiss_welcome(&mut self) {
        self.show_welcome = false;
    }

    pub fn selected_cell(&self) -> Option<&GridCell> {
        self.grid.cell(self.selected)
    }

    fn set_cursor(&mut self, cursor: MonthCursor) {
        self.cursor = cursor;
        self.rendered_on = self.today();
        self.grid = calendar::render(cursor, &self.catalog, &*self.clock);
    }
}
