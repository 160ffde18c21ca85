use crate::calendar::{GridCell, MonthGrid};

/// Plain-text rendition of a month for `--print`.
pub fn render_text(grid: &MonthGrid) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", grid.title));
    out.push_str(&format!("{}\n", "=".repeat(grid.title.chars().count())));

    for week in grid.weeks() {
        out.push('\n');
        for cell in week {
            write_cell(&mut out, cell);
        }
    }
    out
}

fn write_cell(out: &mut String, cell: &GridCell) {
    let date = cell.date.format("%a %b %-d").to_string();
    let date = if cell.in_current_month {
        date
    } else {
        format!("({date})")
    };
    let badge = if cell.is_today { "  [Today]" } else { "" };
    out.push_str(&format!("{date}{badge}\n"));

    for ev in cell.chips() {
        out.push_str(&format!("    {} {} • {}\n", ev.time, ev.name, ev.location));
    }
    if cell.overflow_count() > 0 {
        out.push_str(&format!("    +{} more\n", cell.overflow_count()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{render, MonthCursor};
    use crate::catalog::Catalog;
    use crate::models::{ClassSession, WeeklySlot};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_report_lists_days_and_chips() {
        let catalog = Catalog::builtin().unwrap();
        let grid = render(MonthCursor::new(2025, 9).unwrap(), &catalog, &|| d(2025, 9, 8));
        let text = render_text(&grid);

        assert!(text.starts_with("September 2025\n==============\n"));
        assert!(text.contains("(Sun Aug 31)\n"));
        assert!(text.contains("Mon Sep 8  [Today]\n    07:30 Japanese Yoga (Signature) • London\n"));
        assert!(text.contains("Mon Sep 1\nTue Sep 2\n    08:00 Hatha Basics • Online\n"));
        assert_eq!(text.matches("[Today]").count(), 1);
        assert!(!text.contains("more"));
    }

    #[test]
    fn test_report_has_one_line_per_day() {
        let grid = render(MonthCursor::new(2025, 6).unwrap(), &Catalog::default(), &|| d(2000, 1, 1));
        let text = render_text(&grid);

        assert_eq!(text.matches("\n\n").count(), 6);
        assert_eq!(text.lines().filter(|l| !l.is_empty()).count(), 2 + 42);
        assert!(text.ends_with("(Sat Jul 12)\n"));
    }

    #[test]
    fn test_report_shows_overflow() {
        let sessions = (0..5)
            .map(|i| ClassSession {
                key: format!("k{i}"),
                name: format!("Class {i}"),
                start_date: d(2025, 9, 1),
                weekly: vec![WeeklySlot {
                    weekday: 5,
                    time: format!("1{i}:00"),
                    location: "Studio".into(),
                }],
            })
            .collect();
        let catalog = Catalog::new(sessions).unwrap();
        let grid = render(MonthCursor::new(2025, 9).unwrap(), &catalog, &|| d(2000, 1, 1));
        let text = render_text(&grid);

        assert!(text.contains(
            "Fri Sep 5\n    10:00 Class 0 • Studio\n    11:00 Class 1 • Studio\n    12:00 Class 2 • Studio\n    +2 more\n"
        ));
        assert!(!text.contains("13:00"));
    }
}
