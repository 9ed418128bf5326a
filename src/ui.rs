use tokenomics::bar::{cell_widths, DistributionBar, Segment};
use tokenomics::dashboard::Dashboard;
use tokenomics::entity::SupplyKind;
use tokenomics::histogram::Bin;
use tokenomics::palette::hex_to_rgb;
use anyhow::Result;
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
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::collections::HashMap;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Supply(SupplyKind),
    Taxonomy(usize),
}

impl Page {
    /// Supply charts first, then one page per taxonomy
    pub fn all(taxonomy_count: usize) -> Vec<Page> {
        let mut pages: Vec<Page> = SupplyKind::all().into_iter().map(Page::Supply).collect();
        pages.extend((0..taxonomy_count).map(Page::Taxonomy));
        pages
    }
}

pub struct App {
    pub bars: Vec<DistributionBar>,
    pub supply: HashMap<SupplyKind, Vec<Bin>>,
    pub total_tokens: usize,
    pub pages: Vec<Page>,
    pub current: usize,
    pub state: TableState,
    pub show_detail: bool,
}

impl App {
    pub fn new(dashboard: &Dashboard) -> Self {
        let bars = dashboard.bars();
        let supply = SupplyKind::all()
            .into_iter()
            .map(|kind| (kind, dashboard.bins(kind)))
            .collect();

        let mut app = Self {
            pages: Page::all(bars.len()),
            bars,
            supply,
            total_tokens: dashboard.store().len(),
            current: 0,
            state: TableState::default(),
            show_detail: true,
        };
        app.reset_selection();
        app
    }

    pub fn current_page(&self) -> Page {
        self.pages[self.current]
    }

    pub fn page_title(&self, page: Page) -> String {
        match page {
            Page::Supply(kind) => kind.title().to_string(),
            Page::Taxonomy(i) => self
                .bars
                .get(i)
                .map(|b| b.title.clone())
                .unwrap_or_default(),
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn next_page(&mut self) {
        self.current = (self.current + 1) % self.pages.len();
        self.reset_selection();
    }

    pub fn previous_page(&mut self) {
        self.current = if self.current == 0 {
            self.pages.len() - 1
        } else {
            self.current - 1
        };
        self.reset_selection();
    }

    /// Rows selectable on the current page (segments or bins)
    pub fn row_count(&self) -> usize {
        match self.current_page() {
            Page::Supply(kind) => self.supply.get(&kind).map(Vec::len).unwrap_or(0),
            Page::Taxonomy(i) => self.bars.get(i).map(|b| b.segments.len()).unwrap_or(0),
        }
    }

    fn reset_selection(&mut self) {
        if self.row_count() > 0 {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }

    pub fn next(&mut self) {
        let len = self.row_count();
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
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Tooltip body for whatever row is selected
    pub fn selected_tooltip(&self) -> Vec<String> {
        let Some(i) = self.state.selected() else {
            return Vec::new();
        };

        match self.current_page() {
            Page::Supply(kind) => self
                .supply
                .get(&kind)
                .and_then(|bins| bins.get(i))
                .map(|b| b.tooltip.clone())
                .unwrap_or_default(),
            Page::Taxonomy(t) => self
                .bars
                .get(t)
                .and_then(|bar| bar.segments.get(i))
                .map(|s| s.tooltip.clone())
                .unwrap_or_default(),
        }
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

    if let Err(err) = res {
        log::error!("UI loop failed: {:?}", err);
    }

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
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::Right | KeyCode::Char('l') => app.next_page(),
                KeyCode::Left | KeyCode::Char('h') => app.previous_page(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
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

    let (main, detail) = if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        (content_chunks[0], Some(content_chunks[1]))
    } else {
        (chunks[1], None)
    };

    match app.current_page() {
        Page::Supply(kind) => render_supply(f, main, app, kind),
        Page::Taxonomy(i) => render_taxonomy(f, main, app, i),
    }

    if let Some(area) = detail {
        render_tooltip(f, area, app);
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in app.pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if i == app.current {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(short_title(&app.page_title(*page)), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Tokens: {}", app.total_tokens),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Tokenomics of Top 50 ERC-20 Tokens "),
    );

    f.render_widget(header, area);
}

/// First word of a title, enough to tell the tabs apart
fn short_title(title: &str) -> String {
    title.split_whitespace().next().unwrap_or(title).to_string()
}

fn rgb(hex: &str) -> Color {
    hex_to_rgb(hex)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::Gray)
}

fn render_taxonomy(f: &mut Frame, area: Rect, app: &mut App, index: usize) {
    let Some(bar) = app.bars.get(index) else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Section blurb
            Constraint::Length(3), // Proportional bar
            Constraint::Min(0),    // Legend
        ])
        .split(area);

    let blurb = Paragraph::new(bar.description.clone())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", bar.title)));
    f.render_widget(blurb, chunks[0]);

    let inner_width = chunks[1].width.saturating_sub(2);
    let strip = Paragraph::new(Line::from(segment_spans(&bar.segments, inner_width)))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(strip, chunks[1]);

    let header_cells = ["", "Category", "Count", "Share"].into_iter().map(|h| {
        Cell::from(h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = bar
        .legend
        .iter()
        .zip(&bar.segments)
        .map(|(entry, segment)| {
            Row::new(vec![
                Cell::from("■").style(Style::default().fg(rgb(&entry.color))),
                Cell::from(entry.label.clone()),
                Cell::from(format!("({})", entry.count)),
                Cell::from(format!("{:.1}%", segment.percentage)),
            ])
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Min(20),
            Constraint::Length(7),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Legend "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, chunks[2], &mut app.state);
}

/// Colored runs for the proportional strip; labels only where they fit
fn segment_spans(segments: &[Segment], width: u16) -> Vec<Span<'static>> {
    cell_widths(segments, width)
        .into_iter()
        .zip(segments)
        .filter(|(cells, _)| *cells > 0)
        .map(|(cells, segment)| {
            let cells = cells as usize;
            let text = if segment.show_label && segment.label.chars().count() < cells {
                format!("{:^cells$}", segment.label)
            } else {
                " ".repeat(cells)
            };
            Span::styled(
                text,
                Style::default().bg(rgb(&segment.color)).fg(Color::White),
            )
        })
        .collect()
}

fn render_supply(f: &mut Frame, area: Rect, app: &mut App, kind: SupplyKind) {
    let bins = app.supply.get(&kind).cloned().unwrap_or_default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let labels: Vec<String> = bins.iter().map(|b| b.index.to_string()).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(&bins)
        .map(|(label, bin)| (label.as_str(), bin.count))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", kind.question())),
        )
        .data(data.as_slice())
        .bar_width(3)
        .bar_gap(1)
        .bar_style(Style::default().fg(rgb("#24355cff")))
        .value_style(Style::default().fg(Color::White).bg(rgb("#24355cff")));
    f.render_widget(chart, chunks[0]);

    let header_cells = ["#", kind.title(), "Token Count"].into_iter().map(|h| {
        Cell::from(h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = bins
        .iter()
        .map(|bin| {
            Row::new(vec![
                Cell::from(bin.index.to_string()),
                Cell::from(bin.label.clone()),
                Cell::from(bin.count.to_string()),
            ])
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Bins "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, chunks[1], &mut app.state);
}

fn render_tooltip(f: &mut Frame, area: Rect, app: &App) {
    let tooltip = app.selected_tooltip();

    let content: Vec<Line> = if tooltip.is_empty() {
        vec![Line::from("Nothing selected")]
    } else {
        tooltip
            .iter()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 {
                    Line::from(Span::styled(
                        line.clone(),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(line.clone())
                }
            })
            .collect()
    };

    let panel = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Details "),
    );

    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);

    let status_spans = vec![
        Span::styled(
            format!(" Row: {}/{} ", selected, app.row_count()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Details | "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Page | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Select | "),
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

#[cfg(test)]
mod tests {
    use super::*;
    use tokenomics::entity::{Token, TokenStore};
    use tokenomics::palette::ColorPolicy;

    fn app() -> App {
        let store = TokenStore::new(vec![
            Token::new("A").with("Payment_Token", 1).with("max_supply", 1_000.0),
            Token::new("B").with("Utility_Token", 1),
        ]);
        App::new(&Dashboard::new(store, ColorPolicy::Positional))
    }

    #[test]
    fn test_pages_cycle() {
        let mut app = app();
        assert_eq!(app.pages.len(), 10);
        assert_eq!(app.current_page(), Page::Supply(SupplyKind::Total));

        app.previous_page();
        assert_eq!(app.current_page(), Page::Taxonomy(6));
        app.next_page();
        app.next_page();
        assert_eq!(app.current_page(), Page::Supply(SupplyKind::Max));
    }

    #[test]
    fn test_selection_wraps_and_feeds_tooltip() {
        let mut app = app();
        while app.current_page() != Page::Taxonomy(0) {
            app.next_page();
        }

        assert_eq!(app.row_count(), 4);
        assert_eq!(app.state.selected(), Some(0));
        assert_eq!(app.selected_tooltip()[0], "Payment Token");

        app.previous();
        assert_eq!(app.state.selected(), Some(3));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_segment_spans_fill_width() {
        let app = app();
        let spans = segment_spans(&app.bars[0].segments, 40);
        let cells: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        assert_eq!(cells, 40);
        assert!(spans[0].content.contains("Payment Token"));
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(ratatui::backend::TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_supply_and_taxonomy_pages_render_headers() {
        let mut app = app();
        app.next_page();
        assert_eq!(app.current_page(), Page::Supply(SupplyKind::Max));

        let screen = draw(&mut app);
        assert!(screen.contains("Maximum Supply"));
        assert!(screen.contains("Token Count"));
        assert!(screen.contains("No max supply"));

        while app.current_page() != Page::Taxonomy(0) {
            app.next_page();
        }
        let screen = draw(&mut app);
        assert!(screen.contains("Category"));
        assert!(screen.contains("Share"));
    }

    #[test]
    fn test_short_title() {
        assert_eq!(short_title("Risk and Security Mechanism"), "Risk");
        assert_eq!(short_title(""), "");
    }
}
