use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};
use chrono::NaiveDateTime;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::App;
use crate::calendar::GridCell;

const ACCENT: Color = Color::Cyan;
const HEADER_BG: Color = Color::DarkGray;
const SELECTED_BG: Color = Color::Rgb(40, 40, 60);
const TODAY: Color = Color::Rgb(255, 185, 50);
const DIM: Color = Color::DarkGray;
const WARN: Color = Color::Yellow;

/// Chip colours, assigned by a session's position in the catalog.
const SESSION_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Green,
    Color::Magenta,
    Color::LightBlue,
    Color::LightRed,
    Color::LightYellow,
];

const SIDEBAR_WIDTH: u16 = 40;
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

// ─── Main render ────────────────────────────────────────────────────────────

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_clock(f, app.now(), chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(SIDEBAR_WIDTH)])
        .split(chunks[1]);

    render_month(f, app, body[0]);
    render_sidebar(f, app, body[1]);
    render_status_bar(f, app, chunks[2]);

    if app.show_welcome {
        let area = f.area();
        render_welcome(f, area);
    }
}

// ─── Header ─────────────────────────────────────────────────────────────────

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ◀ p ", Style::default().fg(DIM)),
        Span::styled(
            app.grid.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" n ▶ ", Style::default().fg(DIM)),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .title(" Studio Schedule ")
            .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
    );
    f.render_widget(header, area);
}

// ─── Clock ──────────────────────────────────────────────────────────────────

fn render_clock(f: &mut Frame, now: NaiveDateTime, header_area: Rect) {
    let time_str = format!(" {} ", now.format("%a %b %d  %H:%M:%S"));
    let clock_width = time_str.len() as u16;
    let clock_area = Rect {
        x: header_area.right().saturating_sub(clock_width),
        y: header_area.y,
        width: clock_width.min(header_area.width),
        height: 1,
    };
    f.render_widget(
        Paragraph::new(time_str).style(Style::default().fg(ACCENT)),
        clock_area,
    );
}

// ─── Status Bar ─────────────────────────────────────────────────────────────

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status_message, Style::default().fg(Color::White)),
        Span::styled(
            "  q:quit  p/n:month  arrows:day  t:today  ",
            Style::default().fg(DIM),
        ),
        Span::styled(format!("© {} ", app.year()), Style::default().fg(DIM)),
    ]))
    .style(Style::default().bg(HEADER_BG));

    f.render_widget(status, area);
}

// ─── Month grid ─────────────────────────────────────────────────────────────

fn render_month(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.grid.title))
        .title_style(Style::default().fg(ACCENT));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            std::iter::once(Constraint::Length(1))
                .chain(std::iter::repeat(Constraint::Ratio(1, 6)).take(6)),
        )
        .split(inner);

    let weekday_cols = columns(rows[0]);
    for (name, col) in WEEKDAYS.iter().zip(weekday_cols.iter()) {
        f.render_widget(
            Paragraph::new(*name)
                .alignment(Alignment::Center)
                .style(Style::default().fg(WARN).add_modifier(Modifier::BOLD)),
            *col,
        );
    }

    for (week, row) in app.grid.weeks().zip(rows.iter().skip(1)) {
        for (cell, col) in week.iter().zip(columns(*row).iter()) {
            render_cell(f, app, cell, *col);
        }
    }
}

fn columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 7); 7])
        .split(area)
}

fn session_color(app: &App, key: &str) -> Color {
    app.catalog
        .sessions()
        .iter()
        .position(|s| s.key == key)
        .map(|i| SESSION_COLORS[i % SESSION_COLORS.len()])
        .unwrap_or(ACCENT)
}

fn render_cell(f: &mut Frame, app: &App, cell: &GridCell, area: Rect) {
    let is_selected = cell.date == app.selected;
    let day_style = if cell.in_current_month {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DIM)
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if is_selected { ACCENT } else { DIM }))
        .title(Span::styled(format!(" {} ", cell.date.format("%-d")), day_style));
    if cell.is_today {
        block = block.title(
            Line::from(Span::styled(
                "Today",
                Style::default().fg(TODAY).add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        );
    }
    if is_selected {
        block = block.style(Style::default().bg(SELECTED_BG));
    }

    let width = block.inner(area).width as usize;
    let mut lines: Vec<Line> = cell
        .chips()
        .iter()
        .map(|ev| {
            let color = if cell.in_current_month {
                session_color(app, &ev.key)
            } else {
                DIM
            };
            Line::from(Span::styled(
                truncate(&format!("{} {}", ev.time, ev.name), width),
                Style::default().fg(color),
            ))
        })
        .collect();
    if cell.overflow_count() > 0 {
        lines.push(Line::from(Span::styled(
            truncate(&format!("+{} more", cell.overflow_count()), width),
            Style::default().fg(WARN),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Clip `s` to `width` terminal columns, marking the cut with an ellipsis.
fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

// ─── Sidebar ────────────────────────────────────────────────────────────────

fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(legend_height(app.catalog.len())),
        ])
        .split(area);

    render_day_detail(f, app, chunks[0]);
    render_legend(f, app, chunks[1]);
}

/// One row per session plus the border.
fn legend_height(sessions: usize) -> u16 {
    u16::try_from(sessions).unwrap_or(u16::MAX).saturating_add(2)
}

fn render_day_detail(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    let title = format!(" {} ", app.selected.format("%A, %b %-d"));

    match app.selected_cell() {
        Some(cell) if !cell.occurrences.is_empty() => {
            for ev in &cell.occurrences {
                lines.push(Line::from(Span::styled(
                    ev.name.clone(),
                    Style::default()
                        .fg(session_color(app, &ev.key))
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    format!("  {} • {}", ev.time, ev.location),
                    Style::default().fg(DIM),
                )));
            }
        }
        _ => lines.push(Line::from(Span::styled(
            "No classes.",
            Style::default().fg(DIM),
        ))),
    }

    let detail = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(Style::default().fg(ACCENT)),
    );
    f.render_widget(detail, area);
}

fn render_legend(f: &mut Frame, app: &App, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .catalog
        .start_dates()
        .into_iter()
        .map(|(key, name, start)| {
            let date = start.format("%b %-d, %Y").to_string();
            let name_width = width.saturating_sub(date.width() + 3);
            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(session_color(app, key))),
                Span::styled(
                    format!("{:<name_width$} ", truncate(name, name_width)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(date, Style::default().fg(DIM)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Start dates ")
            .title_style(Style::default().fg(ACCENT)),
    );
    f.render_widget(list, area);
}

// ─── Welcome ────────────────────────────────────────────────────────────────

fn render_welcome(f: &mut Frame, area: Rect) {
    let popup = centered_rect(52, 9, area);
    f.render_widget(Clear, popup);

    let text = vec![
        Line::from(Span::styled(
            "Welcome to the studio!",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Browse the weekly class schedule month by month."),
        Line::from("Classes start on the dates listed in the legend."),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().fg(DIM),
        )),
    ];

    let dialog = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT)),
        );
    f.render_widget(dialog, popup);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::test_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 44)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_month_view_contents() {
        let mut app = test_app();
        app.dismiss_welcome();
        let screen = draw(&app);

        assert!(screen.contains("September 2025"));
        assert!(screen.contains("Today"));
        assert!(screen.contains("Sun"));
        assert!(screen.contains("07:30"));
        // Selected day detail: Sep 8.
        assert!(screen.contains("Monday, Sep 8"));
        assert!(screen.contains("Japanese Yoga (Signature)"));
        assert!(screen.contains("Start dates"));
        assert!(screen.contains("Sep 14, 2025"));
        assert!(screen.contains("© 2025"));
        assert!(!screen.contains("Welcome to the studio!"));
    }

    #[test]
    fn test_welcome_overlay() {
        let app = test_app();
        let screen = draw(&app);
        assert!(screen.contains("Welcome to the studio!"));
        assert!(screen.contains("Press any key to continue"));
    }

    #[test]
    fn test_empty_day_detail() {
        let mut app = test_app();
        app.dismiss_welcome();
        // Sep 1, 2025: nothing has started yet on Mondays.
        app.move_selection(-7);
        let screen = draw(&app);
        assert!(screen.contains("Monday, Sep 1"));
        assert!(screen.contains("No classes."));
    }

    #[test]
    fn test_header_clock_uses_app_clock() {
        let mut app = test_app();
        app.dismiss_welcome();
        let screen = draw(&app);
        let header = screen.lines().next().unwrap();
        assert!(header.contains("Mon Sep 08  00:00:00"), "{header}");
    }

    #[test]
    fn test_legend_height() {
        assert_eq!(legend_height(0), 2);
        assert_eq!(legend_height(8), 10);
        assert_eq!(legend_height(usize::from(u16::MAX)), u16::MAX);
        assert_eq!(legend_height(usize::MAX), u16::MAX);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hatha Basics", 20), "Hatha Basics");
        assert_eq!(truncate("Hatha Basics", 6), "Hatha…");
        assert_eq!(truncate("Hatha", 0), "");
        assert!(truncate("Workshop: Japanese Breathwork", 9).width() <= 9);
    }
}
