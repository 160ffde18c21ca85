use chrono::{Datelike, Days, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::catalog::Catalog;
use crate::models::Occurrence;

/// Number of day boxes in a month view (six weeks of seven days).
pub const GRID_CELLS: usize = 42;
/// Occurrences shown per cell before the rest collapse into "+N more".
pub const MAX_CHIPS_PER_CELL: usize = 3;

// ─── Clock ───────────────────────────────────────────────────────────────────

/// Source of "today". Any `Fn() -> NaiveDate` is a clock.
pub trait Clock {
    fn today(&self) -> NaiveDate;

    /// Wall time for the header clock. Midnight of `today` unless overridden.
    fn now(&self) -> NaiveDateTime {
        self.today().and_time(NaiveTime::MIN)
    }
}

/// Host local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

impl<F: Fn() -> NaiveDate> Clock for F {
    fn today(&self) -> NaiveDate {
        self()
    }
}

// ─── Cursor ─────────────────────────────────────────────────────────────────

/// The month currently on screen, stored as its first day.
///
/// Only months whose whole 42-day grid lies inside chrono's date range can be
/// built, so every cursor renders a full grid starting on a Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor(NaiveDate);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl MonthCursor {
    /// The month holding `date`, clamped to [`MonthCursor::first`] ..= [`MonthCursor::last`].
    pub fn containing(date: NaiveDate) -> Self {
        let month = Self(date - Days::new(u64::from(date.day0())));
        month.clamp(Self::first(), Self::last())
    }

    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .filter(|&first| grid_fits(first))
            .map(Self)
    }

    /// Earliest month with a complete grid.
    pub fn first() -> Self {
        Self::bounded_from(NaiveDate::MIN, Direction::Next)
    }

    /// Latest month with a complete grid.
    pub fn last() -> Self {
        Self::bounded_from(NaiveDate::MAX, Direction::Prev)
    }

    /// Step inward from the month holding `limit` until the grid fits.
    fn bounded_from(limit: NaiveDate, inward: Direction) -> Self {
        let mut first = limit - Days::new(u64::from(limit.day0()));
        while !grid_fits(first) {
            match step_month(first, inward) {
                Some(next) => first = next,
                None => break,
            }
        }
        Self(first)
    }

    pub fn current(clock: &dyn Clock) -> Self {
        Self::containing(clock.today())
    }

    /// Parse a `YYYY-MM` month such as `2025-09`.
    pub fn parse(s: &str) -> Option<Self> {
        let (year, month) = s.trim().split_once('-')?;
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Full month name and year, e.g. "September 2025".
    pub fn title(self) -> String {
        self.0.format("%B %Y").to_string()
    }
}

/// One month earlier or later. Saturates at [`MonthCursor::first`] and [`MonthCursor::last`].
pub fn navigate(cursor: MonthCursor, direction: Direction) -> MonthCursor {
    step_month(cursor.0, direction)
        .filter(|&first| grid_fits(first))
        .map(MonthCursor)
        .unwrap_or(cursor)
}

fn step_month(first: NaiveDate, direction: Direction) -> Option<NaiveDate> {
    match direction {
        Direction::Prev => first.checked_sub_months(Months::new(1)),
        Direction::Next => first.checked_add_months(Months::new(1)),
    }
}

// ─── Grid ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub is_today: bool,
    /// All occurrences, sorted by time.
    pub occurrences: Vec<Occurrence>,
}

impl GridCell {
    /// The occurrences a cell has room for.
    pub fn chips(&self) -> &[Occurrence] {
        let n = self.occurrences.len().min(MAX_CHIPS_PER_CELL);
        &self.occurrences[..n]
    }

    pub fn overflow_count(&self) -> usize {
        self.occurrences.len().saturating_sub(MAX_CHIPS_PER_CELL)
    }
}

#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub title: String,
    pub cells: Vec<GridCell>,
}

impl MonthGrid {
    /// Rows of seven cells, Sunday first.
    pub fn weeks(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(7)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&GridCell> {
        self.cells.iter().find(|c| c.date == date)
    }
}

fn checked_grid_start(first: NaiveDate) -> Option<NaiveDate> {
    let back = u64::from(first.weekday().num_days_from_sunday());
    first.checked_sub_days(Days::new(back))
}

/// Whether all 42 days of the grid for the month starting at `first` exist.
fn grid_fits(first: NaiveDate) -> bool {
    checked_grid_start(first)
        .and_then(|start| start.checked_add_days(Days::new(GRID_CELLS as u64 - 1)))
        .is_some()
}

/// The Sunday on or before the first of the cursor's month.
pub fn grid_start(cursor: MonthCursor) -> NaiveDate {
    // Always `Some`: cursors are only built for months whose grid fits.
    checked_grid_start(cursor.first_day()).unwrap_or(cursor.first_day())
}

/// Build the 42-cell month view. A full rebuild on every call.
pub fn render(cursor: MonthCursor, catalog: &Catalog, clock: &dyn Clock) -> MonthGrid {
    let today = clock.today();
    let cells = grid_start(cursor)
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| GridCell {
            date,
            in_current_month: cursor.contains(date),
            is_today: date == today,
            occurrences: catalog.events_for_date(date),
        })
        .collect();

    MonthGrid {
        title: cursor.title(),
        cells,
    }
}
