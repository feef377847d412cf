use anyhow::Result;
use credly_tracker::points::points_table;
use credly_tracker::{Badge, BadgeStatus, CategoryBreakdown, Certifications, Tier};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Certifications,
    Breakdown,
    PointsTable,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Certifications => Page::Breakdown,
            Page::Breakdown => Page::PointsTable,
            Page::PointsTable => Page::Certifications,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Certifications => Page::PointsTable,
            Page::Breakdown => Page::Certifications,
            Page::PointsTable => Page::Breakdown,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Certifications => "Certifications",
            Page::Breakdown => "Breakdown",
            Page::PointsTable => "Points Table",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Valid,
    Expired,
}

impl StatusFilter {
    fn accepts(&self, badge: &Badge) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Valid => badge.status == BadgeStatus::Valid,
            StatusFilter::Expired => badge.status == BadgeStatus::Expired,
        }
    }

    fn name(&self) -> &str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Valid => "Valid",
            StatusFilter::Expired => "Expired",
        }
    }
}

pub struct App {
    pub certifications: Certifications,
    pub filtered: Vec<Badge>,
    pub breakdown: CategoryBreakdown,
    pub state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
    pub filter: StatusFilter,
}

impl App {
    pub fn new(certifications: Certifications, breakdown: CategoryBreakdown) -> Self {
        let mut state = TableState::default();
        if !certifications.badges.is_empty() {
            state.select(Some(0));
        }

        let filtered = certifications.badges.clone();

        Self {
            certifications,
            filtered,
            breakdown,
            state,
            current_page: Page::Certifications,
            show_detail: false,
            filter: StatusFilter::All,
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_badge(&self) -> Option<&Badge> {
        self.state.selected().and_then(|i| self.filtered.get(i))
    }

    pub fn apply_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        self.filtered = self
            .certifications
            .badges
            .iter()
            .filter(|b| filter.accepts(b))
            .cloned()
            .collect();

        if self.filtered.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn next(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Char('a') => app.apply_filter(StatusFilter::All),
                KeyCode::Char('v') => app.apply_filter(StatusFilter::Valid),
                KeyCode::Char('e') => app.apply_filter(StatusFilter::Expired),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Home => {
                    if !app.filtered.is_empty() {
                        app.state.select(Some(0));
                    }
                }
                KeyCode::End => {
                    if !app.filtered.is_empty() {
                        app.state.select(Some(app.filtered.len() - 1));
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail && app.current_page == Page::Certifications {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        render_badges(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        match app.current_page {
            Page::Certifications => render_badges(f, chunks[1], app),
            Page::Breakdown => render_breakdown(f, chunks[1], app),
            Page::PointsTable => render_points_table(f, chunks[1]),
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Professional | Tier::Specialty => Color::Magenta,
        Tier::Associate => Color::Cyan,
        Tier::Foundational => Color::Green,
        Tier::Unknown => Color::Gray,
    }
}

fn header_style() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in [Page::Certifications, Page::Breakdown, Page::PointsTable]
        .iter()
        .enumerate()
    {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    let certs = &app.certifications;
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Points: {}", certs.total_points),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("✓ {}", certs.valid_count),
        Style::default().fg(Color::Green),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("✗ {}", certs.expired_count),
        Style::default().fg(Color::Red),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_badges(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Badge", "Tier", "Points", "Issued", "Expires", "Status"]
        .iter()
        .map(|h| Cell::from(*h).style(header_style()));

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.filtered.iter().map(|badge| {
        let status_color = if badge.is_valid() { Color::Green } else { Color::Red };

        Row::new(vec![
            Cell::from(truncate(&badge.name, 48)),
            Cell::from(badge.tier.as_str()).style(Style::default().fg(tier_color(badge.tier))),
            Cell::from(format!("{}", badge.points)),
            Cell::from(truncate(&badge.issue_date, 14)),
            Cell::from(truncate(&badge.expiry_date, 14)),
            Cell::from(badge.status.as_str()).style(Style::default().fg(status_color)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(50),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Certifications ({}) ", app.filter.name())),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_breakdown(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(
        ["Tier", "Badges", "Valid Points"]
            .iter()
            .map(|h| Cell::from(*h).style(header_style())),
    )
    .style(Style::default().bg(Color::DarkGray))
    .height(1);

    let rows = app.breakdown.tiers.iter().map(|(tier, summary)| {
        Row::new(vec![
            Cell::from(tier.as_str()).style(Style::default().fg(tier_color(*tier))),
            Cell::from(format!("{}", summary.badge_count)),
            Cell::from(format!("{}", summary.valid_points)),
        ])
    });

    let table = Table::new(
        rows,
        [Constraint::Length(16), Constraint::Length(10), Constraint::Length(14)],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Breakdown by Tier "),
    );

    f.render_widget(table, area);
}

fn render_points_table(f: &mut Frame, area: Rect) {
    let header = Row::new(["Cert", "Point"].iter().map(|h| Cell::from(*h).style(header_style())))
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = points_table().into_iter().map(|rule| {
        Row::new(vec![
            Cell::from(rule.label),
            Cell::from(format!("{}", rule.points)),
        ])
    });

    let table = Table::new(rows, [Constraint::Length(32), Constraint::Length(8)])
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Points Table "),
        );

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);

    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let status_spans = vec![
        Span::styled(
            format!(" Row: {}/{} ", selected, app.filtered.len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        key("Enter"),
        Span::raw(" Details | "),
        key("Tab"),
        Span::raw(" Page | "),
        key("a/v/e"),
        Span::raw(" All/Valid/Expired | "),
        key("↑/↓"),
        Span::raw(" Nav | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Badge Details ");

    let badge = match app.selected_badge() {
        Some(b) => b,
        None => {
            f.render_widget(Paragraph::new("No badge selected").block(block), area);
            return;
        }
    };

    let label = |text: &'static str| {
        Span::styled(text, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    };

    let content = vec![
        Line::from(""),
        Line::from(vec![label("  Name: "), Span::raw(badge.name.clone())]),
        Line::from(""),
        Line::from(vec![
            label("  Tier: "),
            Span::styled(badge.tier.as_str(), Style::default().fg(tier_color(badge.tier))),
        ]),
        Line::from(""),
        Line::from(vec![label("  Points: "), Span::raw(format!("{}", badge.points))]),
        Line::from(""),
        Line::from(vec![label("  Issued: "), Span::raw(badge.issue_date.clone())]),
        Line::from(""),
        Line::from(vec![label("  Expires: "), Span::raw(badge.expiry_date.clone())]),
        Line::from(""),
        Line::from(vec![
            label("  Status: "),
            Span::styled(
                badge.status.as_str(),
                Style::default().fg(if badge.is_valid() { Color::Green } else { Color::Red }),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            label("  Recorded: "),
            Span::raw(badge.recorded_at.format("%Y-%m-%d %H:%M UTC").to_string()),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Press Enter to close",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )]),
    ];

    f.render_widget(Paragraph::new(content).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use credly_tracker::{BadgeStore, Ledger};

    fn app_with_badges() -> App {
        let store = BadgeStore::open_in_memory().unwrap();
        let ledger = Ledger::new(&store);
        ledger.record_badge("AWS Certified Cloud Practitioner", "Issued\n2023").unwrap();
        ledger.record_badge("AWS Certified Security Specialty", "Issued\n2020\nExpired").unwrap();
        ledger.record_badge("Terraform Associate", "Issued\n2024").unwrap();

        App::new(ledger.certifications().unwrap(), ledger.category_breakdown().unwrap())
    }

    #[test]
    fn test_filter_and_navigation() {
        let mut app = app_with_badges();
        assert_eq!(app.filtered.len(), 3);
        assert_eq!(app.state.selected(), Some(0));

        app.apply_filter(StatusFilter::Expired);
        assert_eq!(app.filtered.len(), 1);
        assert_eq!(app.selected_badge().unwrap().name, "AWS Certified Security Specialty");

        app.apply_filter(StatusFilter::Valid);
        assert_eq!(app.filtered.len(), 2);
        app.next();
        app.next();
        assert_eq!(app.state.selected(), Some(0), "navigation wraps around");
        app.previous();
        assert_eq!(app.state.selected(), Some(1));
    }

    #[test]
    fn test_page_cycle() {
        let mut app = app_with_badges();
        app.next_page();
        assert_eq!(app.current_page, Page::Breakdown);
        app.next_page();
        app.next_page();
        assert_eq!(app.current_page, Page::Certifications);
        app.previous_page();
        assert_eq!(app.current_page, Page::PointsTable);
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Solutions Architect – Associate", 12), "Solutions...");
    }
}
