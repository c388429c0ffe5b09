//! Ratatui-based terminal UI.
//!
//! The TUI provides a form for choosing a country, an amount and a start year,
//! then renders the statistics plus two hoverable charts (annual inflation and
//! the value of the money over time). Fetches run on worker threads and report
//! back over a channel; only the newest submission's result is shown.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::DEFAULT_LOOKBACK_YEARS;
use crate::app::pipeline::{self, Outcome, RunOutput};
use crate::app::request::{RequestToken, RequestTracker};
use crate::cli::TuiArgs;
use crate::data::WorldBankClient;
use crate::domain::{
    CalculatorInput, Country, MAX_PRINCIPAL_DIGITS, clamp_start_year, normalize_country_code,
    sanitize_principal,
};
use crate::error::AppError;
use crate::plot::geometry::RenderedBox;
use crate::plot::{ChartGeometry, ChartSeries, HoverState, TooltipDirection};
use crate::report::{format_money, format_percent};

mod overlay;
mod plotters_chart;

use overlay::{CountryDropdown, Overlay, bordered_list_row, dismiss_on_click};
use plotters_chart::{InflatioChart, plot_bounds};

const DEFAULT_COUNTRY: &str = "US";
const MAX_COUNTRY_QUERY: usize = 40;
const DROPDOWN_ROWS: u16 = 8;

const INFLATION_COLOR: RGBColor = RGBColor(255, 140, 0);
const VALUE_COLOR: RGBColor = RGBColor(255, 0, 0);

/// Start the TUI.
pub fn run(args: TuiArgs, current_year: i32) -> Result<(), AppError> {
    let client = WorldBankClient::from_env()?;
    let mut app = App::new(client, args, current_year);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.load_countries();
    if sanitize_principal(&app.amount).is_some() {
        app.submit();
    }
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, mouse capture, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
    }
}

/// Results coming back from worker threads.
enum WorkerMsg {
    Calculation(RequestToken, Outcome),
    Countries(Result<Vec<Country>, String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Country,
    Amount,
    Since,
    Charts,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Country => Field::Amount,
            Field::Amount => Field::Since,
            Field::Since => Field::Charts,
            Field::Charts => Field::Country,
        }
    }

    fn prev(self) -> Self {
        match self {
            Field::Country => Field::Charts,
            Field::Amount => Field::Country,
            Field::Since => Field::Amount,
            Field::Charts => Field::Since,
        }
    }
}

/// One chart plus its interaction state.
struct ChartView {
    series: ChartSeries,
    hover: HoverState,
    color: RGBColor,
    /// Plot rect on the last frame (without tick labels).
    area: Option<Rect>,
    pointer_inside: bool,
}

impl ChartView {
    fn new(series: ChartSeries, color: RGBColor) -> Self {
        Self {
            series,
            hover: HoverState::default(),
            color,
            area: None,
            pointer_inside: false,
        }
    }
}

struct App {
    client: WorldBankClient,
    current_year: i32,
    country: String,
    amount: String,
    since: String,
    focus: Field,
    dropdown: CountryDropdown,
    dropdown_offset: usize,
    tracker: RequestTracker,
    tx: Sender<WorkerMsg>,
    rx: Receiver<WorkerMsg>,
    outcome: Option<Outcome>,
    charts: Vec<ChartView>,
    active_chart: usize,
    status: String,
}

impl App {
    fn new(client: WorldBankClient, args: TuiArgs, current_year: i32) -> Self {
        let (tx, rx) = mpsc::channel();
        let since = args
            .since
            .map(|y| clamp_start_year(y, current_year))
            .unwrap_or_else(|| clamp_start_year(current_year - DEFAULT_LOOKBACK_YEARS, current_year));
        let amount = args
            .amount
            .as_deref()
            .and_then(sanitize_principal)
            .map(|v| format!("{v:.0}"))
            .unwrap_or_default();

        Self {
            client,
            current_year,
            country: args.country.unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            amount,
            since: since.to_string(),
            focus: Field::Amount,
            dropdown: CountryDropdown::default(),
            dropdown_offset: 0,
            tracker: RequestTracker::default(),
            tx,
            rx,
            outcome: None,
            charts: Vec::new(),
            active_chart: 0,
            status: "Enter an amount and press Enter.".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.drain_worker() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Mouse(mouse) => {
                    if self.handle_mouse(mouse) {
                        needs_redraw = true;
                    }
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply finished worker results. Returns `true` if anything changed.
    fn drain_worker(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(WorkerMsg::Calculation(token, outcome)) => {
                    if let Some(outcome) = self.tracker.accept(token, outcome) {
                        self.apply_outcome(outcome);
                        changed = true;
                    }
                }
                Ok(WorkerMsg::Countries(Ok(countries))) => {
                    log::debug!("loaded {} countries", countries.len());
                    self.dropdown.set_countries(countries);
                    changed = true;
                }
                Ok(WorkerMsg::Countries(Err(message))) => {
                    self.status = format!("Country list unavailable: {message}");
                    changed = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    fn load_countries(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = client.fetch_countries().map_err(|e| e.to_string());
            let _ = tx.send(WorkerMsg::Countries(result));
        });
    }

    /// Validate the form and start a fetch; earlier in-flight fetches become stale.
    fn submit(&mut self) {
        self.commit_since();
        let input = match self.form_input() {
            Ok(input) => input,
            Err(message) => {
                self.status = message;
                return;
            }
        };

        let token = self.tracker.issue();
        self.status = format!("Fetching {} since {}...", input.country_code, input.start_year);

        let client = self.client.clone();
        let tx = self.tx.clone();
        let current_year = self.current_year;
        thread::spawn(move || {
            let outcome = Outcome::from_result(pipeline::run_calculation(&client, &input, current_year));
            let _ = tx.send(WorkerMsg::Calculation(token, outcome));
        });
    }

    fn form_input(&self) -> Result<CalculatorInput, String> {
        let principal = sanitize_principal(&self.amount)
            .ok_or_else(|| "Enter an amount greater than zero.".to_string())?;
        let code = self
            .resolve_country()
            .ok_or_else(|| format!("Unknown country '{}'.", self.country.trim()))?;
        let start_year = self
            .since
            .parse::<i32>()
            .map(|y| clamp_start_year(y, self.current_year))
            .map_err(|_| "Enter a start year.".to_string())?;

        CalculatorInput::new(&code, principal, start_year, self.current_year).map_err(|e| e.to_string())
    }

    /// The typed text as a code, or the best name match from the country list.
    fn resolve_country(&self) -> Option<String> {
        if let Ok(code) = normalize_country_code(&self.country) {
            return Some(code);
        }
        self.dropdown.first_match(&self.country).map(|c| c.code.clone())
    }

    /// Clamp the start year on leaving the field; empty falls back to the default look-back.
    fn commit_since(&mut self) {
        let year = self
            .since
            .parse::<i32>()
            .unwrap_or(self.current_year - DEFAULT_LOOKBACK_YEARS);
        self.since = clamp_start_year(year, self.current_year).to_string();
    }

    fn set_focus(&mut self, field: Field) {
        if self.focus == Field::Since && field != Field::Since {
            self.commit_since();
        }
        if field != Field::Country {
            self.dropdown.close();
        }
        self.focus = field;
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        self.charts.clear();
        self.active_chart = 0;
        match &outcome {
            Outcome::Ready(run) => {
                self.charts.push(ChartView::new(ChartSeries::inflation(&run.series), INFLATION_COLOR));
                self.charts.push(ChartView::new(ChartSeries::value(&run.trajectory), VALUE_COLOR));
                self.status = format!(
                    "{} since {}",
                    run.country_name.as_deref().unwrap_or(&run.input.country_code),
                    run.input.start_year
                );
            }
            Outcome::NoData => {
                self.status = "No data available for this country and period.".to_string();
            }
            Outcome::Failed(message) => {
                self.status = format!("Fetch failed: {message}");
            }
        }
        self.outcome = Some(outcome);
    }

    /// Returns `true` to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        if self.dropdown.is_open() {
            self.handle_dropdown_key(key.code);
            return false;
        }

        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Tab => self.set_focus(self.focus.next()),
            KeyCode::BackTab => self.set_focus(self.focus.prev()),
            _ => match self.focus {
                Field::Country => self.handle_country_key(key.code),
                Field::Amount => self.handle_amount_key(key.code),
                Field::Since => self.handle_since_key(key.code),
                Field::Charts => return self.handle_chart_key(key.code),
            },
        }
        false
    }

    fn handle_dropdown_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.dropdown.move_selection(-1),
            KeyCode::Down => self.dropdown.move_selection(1),
            KeyCode::Enter => {
                if let Some(country) = self.dropdown.pick() {
                    self.pick_country(country);
                }
            }
            KeyCode::Esc => self.dropdown.close(),
            KeyCode::Tab => self.set_focus(self.focus.next()),
            KeyCode::BackTab => self.set_focus(self.focus.prev()),
            other => self.handle_country_key(other),
        }
    }

    fn handle_country_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) if (c.is_ascii_alphabetic() || c == ' ') && self.country.len() < MAX_COUNTRY_QUERY => {
                self.country.push(c);
                self.dropdown.open(&self.country);
            }
            KeyCode::Backspace => {
                self.country.pop();
                self.dropdown.open(&self.country);
            }
            KeyCode::Down => {
                if self.dropdown.has_countries() {
                    self.dropdown.open(&self.country);
                }
            }
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    fn pick_country(&mut self, country: Country) {
        self.country = country.code;
        if sanitize_principal(&self.amount).is_some() {
            self.submit();
        }
    }

    fn handle_amount_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.amount.len() < MAX_PRINCIPAL_DIGITS {
                    self.amount.push(c);
                }
            }
            KeyCode::Backspace => {
                self.amount.pop();
            }
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    fn handle_since_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.since.len() < 4 {
                    self.since.push(c);
                }
            }
            KeyCode::Backspace => {
                self.since.pop();
            }
            KeyCode::Up => self.step_since(1),
            KeyCode::Down => self.step_since(-1),
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    fn step_since(&mut self, delta: i32) {
        self.commit_since();
        if let Ok(year) = self.since.parse::<i32>() {
            self.since = clamp_start_year(year + delta, self.current_year).to_string();
        }
    }

    fn handle_chart_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Left => self.step_hover(-1),
            KeyCode::Right => self.step_hover(1),
            KeyCode::Up | KeyCode::Down => {
                if !self.charts.is_empty() {
                    let len = self.charts.len();
                    let delta = if code == KeyCode::Up { len - 1 } else { 1 };
                    self.active_chart = (self.active_chart + delta) % len;
                }
            }
            KeyCode::Enter => self.submit(),
            _ => {}
        }
        false
    }

    fn step_hover(&mut self, delta: isize) {
        if let Some(view) = self.charts.get_mut(self.active_chart) {
            view.hover.step(delta, view.series.len());
        }
    }

    /// Returns `true` if the screen needs a redraw.
    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        let pos = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.dropdown.is_open() {
                    let inside = self.dropdown.area().filter(|area| area.contains(pos));
                    if let Some(area) = inside {
                        // Border and title rows neither pick nor dismiss.
                        let Some(row) = bordered_list_row(area, mouse.column, mouse.row) else {
                            return false;
                        };
                        if let Some(country) = self.dropdown.pick_row(self.dropdown_offset + row) {
                            self.pick_country(country);
                        }
                        return true;
                    }
                    return dismiss_on_click(&mut self.dropdown, mouse.column, mouse.row);
                }

                let clicked = self
                    .charts
                    .iter()
                    .position(|view| view.area.is_some_and(|a| a.contains(pos)));
                if let Some(i) = clicked {
                    self.set_focus(Field::Charts);
                    self.active_chart = i;
                    return true;
                }
                false
            }
            MouseEventKind::Moved => {
                let mut changed = false;
                for (i, view) in self.charts.iter_mut().enumerate() {
                    match view.area.filter(|a| a.contains(pos)) {
                        Some(area) => {
                            let px = f64::from(mouse.column - area.x);
                            let width = f64::from(area.width.saturating_sub(1));
                            view.hover.pointer_moved(px, width, view.series.len());
                            view.pointer_inside = true;
                            self.active_chart = i;
                            changed = true;
                        }
                        None if view.pointer_inside => {
                            view.hover.pointer_left();
                            view.pointer_inside = false;
                            changed = true;
                        }
                        None => {}
                    }
                }
                changed
            }
            _ => false,
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_form(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
        self.draw_dropdown(frame, chunks[0]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let field = |label: &str, value: String, focused: bool| {
            let style = if focused {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default().fg(Color::White)
            };
            vec![
                Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
                Span::styled(format!(" {value} "), style),
                Span::raw("   "),
            ]
        };

        let country_label = match self.dropdown.name_of(self.country.trim()) {
            Some(name) => format!("{} ({name})", self.country),
            None => self.country.clone(),
        };

        let mut spans = vec![Span::styled("inflatio ", Style::default().fg(Color::Cyan))];
        spans.extend(field("Country", country_label, self.focus == Field::Country));
        spans.extend(field("Amount", self.amount.clone(), self.focus == Field::Amount));
        spans.extend(field("Since", self.since.clone(), self.focus == Field::Since));

        let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_dropdown(&mut self, frame: &mut ratatui::Frame<'_>, form: Rect) {
        if !self.dropdown.is_open() {
            return;
        }
        let matches = self.dropdown.matches();
        let screen = frame.area();
        let top = form.y + form.height;
        let rows = (matches.len() as u16).clamp(1, DROPDOWN_ROWS);
        let rect = Rect {
            x: form.x + 1,
            y: top,
            width: 44.min(screen.width.saturating_sub(form.x + 1)),
            height: (rows + 2).min(screen.height.saturating_sub(top)),
        };
        if rect.width < 4 || rect.height < 3 {
            return;
        }

        let visible = usize::from(rect.height - 2);
        let selected = self.dropdown.selected();
        let offset = selected.saturating_sub(visible.saturating_sub(1));

        let items: Vec<ListItem> = if matches.is_empty() {
            vec![ListItem::new("no match")]
        } else {
            matches
                .iter()
                .skip(offset)
                .take(visible)
                .map(|c| ListItem::new(format!("{:<3} {}", c.code, c.name)))
                .collect()
        };
        let list = List::new(items)
            .block(Block::default().title("Countries").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White));
        let mut state = ListState::default();
        if !matches.is_empty() {
            state.select(Some(selected - offset));
        }

        frame.render_widget(Clear, rect);
        frame.render_stateful_widget(list, rect, &mut state);

        self.dropdown_offset = offset;
        self.dropdown.set_area(Some(rect));
    }

    fn draw_body(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        if self.tracker.is_loading() {
            let msg = Paragraph::new("Loading...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(msg, area);
            return;
        }

        let run = match &self.outcome {
            Some(Outcome::Ready(run)) => run.clone(),
            Some(Outcome::NoData) => {
                let msg = Paragraph::new("No data available for this country and period.")
                    .style(Style::default().fg(Color::Yellow))
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(msg, area);
                return;
            }
            Some(Outcome::Failed(message)) => {
                let msg = Paragraph::new(format!("Could not load inflation data: {message}"))
                    .style(Style::default().fg(Color::Red))
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(msg, area);
                return;
            }
            None => {
                let msg = Paragraph::new("Fill in the form and press Enter.")
                    .style(Style::default().fg(Color::Gray))
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(msg, area);
                return;
            }
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Percentage(50),
                Constraint::Percentage(50),
            ])
            .split(area);

        self.draw_stats(frame, chunks[0], &run);
        for (i, chunk) in chunks.iter().skip(1).enumerate() {
            self.draw_chart(frame, *chunk, i);
        }
    }

    fn draw_stats(&self, frame: &mut ratatui::Frame<'_>, area: Rect, run: &RunOutput) {
        let mut lines: Vec<Line> = Vec::new();
        let gray = Style::default().fg(Color::Gray);

        if let Some(first) = run.trajectory.first() {
            lines.push(Line::from(vec![
                Span::raw(format!("{} in {} ", format_money(run.input.principal), run.current_year)),
                Span::styled("was worth ", gray),
                Span::styled(
                    format!("{} in {}", format_money(first.amount), first.year),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
        }

        if let Some(stats) = &run.stats {
            lines.push(Line::from(Span::styled(
                format!(
                    "cumulative {} | lost {} | avg {} | high {} ({}) | low {} ({})",
                    format_percent(stats.cumulative_factor - 1.0),
                    format_percent(stats.purchasing_power_lost),
                    format_percent(stats.geometric_mean_rate),
                    format_percent(stats.highest.rate),
                    stats.highest.year,
                    format_percent(stats.lowest.rate),
                    stats.lowest.year,
                ),
                gray,
            )));
        }

        if !run.series.deduced_years.is_empty() {
            let years: Vec<String> = run.series.deduced_years.iter().map(|y| y.to_string()).collect();
            lines.push(Line::from(Span::styled(
                format!("deduced: {}", years.join(", ")),
                Style::default().fg(Color::DarkGray),
            )));
        }

        let title = run.country_name.clone().unwrap_or_else(|| run.input.country_code.clone());
        let p = Paragraph::new(Text::from(lines)).block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect, idx: usize) {
        let Some(view) = self.charts.get(idx) else {
            return;
        };
        let active = self.focus == Field::Charts && self.active_chart == idx;
        let border = if active { Style::default().fg(Color::Cyan) } else { Style::default() };
        let block = Block::default()
            .title(view.series.title.clone())
            .borders(Borders::ALL)
            .border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let canvas = ChartGeometry::default();
        let Some((x_bounds, y_bounds)) = plot_bounds(&view.series, &canvas) else {
            frame.render_widget(Paragraph::new("No points.").style(Style::default().fg(Color::Yellow)), inner);
            return;
        };

        let y_labels = y_tick_labels(&view.series, y_bounds);
        let left = y_labels.iter().map(|(_, l)| l.len() as u16).max().unwrap_or(0) + 1;
        let Some((chart_rect, insets)) = chart_layout(inner, left) else {
            self.charts[idx].area = None;
            return;
        };

        let widget = InflatioChart {
            series: &view.series,
            hovered: view.hover.hovered(),
            x_bounds,
            y_bounds,
            line_color: view.color,
        };
        frame.render_widget(widget, chart_rect);
        draw_axis_ticks(frame, inner, chart_rect, insets, &view.series, x_bounds, &y_labels);

        if let Some(i) = view.hover.hovered() {
            draw_tooltip(frame, chart_rect, &view.series, i, &canvas);
        }

        self.charts[idx].area = Some(chart_rect);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab focus  Enter calculate  ↓ countries  ←/→ hover  ↑/↓ chart  Esc quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect, left: u16) -> Option<(Rect, AxisInsets)> {
    let insets = AxisInsets { left, bottom: 1 };
    if inner.width <= insets.left + 10 || inner.height <= insets.bottom + 2 {
        return None;
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y,
        width: inner.width - insets.left,
        height: inner.height - insets.bottom,
    };
    Some((rect, insets))
}

/// Top, middle and bottom value labels.
fn y_tick_labels(series: &ChartSeries, y_bounds: [f64; 2]) -> Vec<(f64, String)> {
    (0..3)
        .map(|i| {
            let u = f64::from(i) / 2.0;
            let v = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
            (u, series.format_value(v))
        })
        .collect()
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    series: &ChartSeries,
    x_bounds: [f64; 2],
    y_labels: &[(f64, String)],
) {
    let style = Style::default().fg(Color::Gray);

    // Year ticks at up to five evenly spaced data points.
    let n = series.len();
    let ticks = n.min(5);
    let mut last_end = 0u16;
    for t in 0..ticks {
        let i = if ticks <= 1 { 0 } else { t * (n - 1) / (ticks - 1) };
        let year = f64::from(series.points[i].year);
        let u = (year - x_bounds[0]) / (x_bounds[1] - x_bounds[0]);
        let x = chart.x + (f64::from(chart.width - 1) * u).round() as u16;
        let label = format!("{year:.0}");
        let label_len = label.len() as u16;
        let start = x
            .saturating_sub(label_len / 2)
            .clamp(chart.x, (chart.x + chart.width).saturating_sub(label_len).max(chart.x));
        if t > 0 && start <= last_end {
            continue;
        }
        last_end = start + label_len;
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y: chart.y + chart.height,
                width: label_len.min(inner.x + inner.width - start),
                height: 1,
            },
        );
    }

    for (u, label) in y_labels {
        let y = chart.y + (chart.height - 1) - (f64::from(chart.height - 1) * u).round() as u16;
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label.as_str()).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }
}

/// Year and value of the hovered point, placed next to it.
///
/// The anchor comes from the canvas geometry scaled onto the chart rect; the
/// label opens to the left on the right half so it stays on screen.
fn draw_tooltip(frame: &mut ratatui::Frame<'_>, chart: Rect, series: &ChartSeries, idx: usize, canvas: &ChartGeometry) {
    let Some(point) = series.points.get(idx) else {
        return;
    };
    let projected = canvas.project(&series.values());
    let Some(&anchor) = projected.get(idx) else {
        return;
    };
    if chart.width == 0 || chart.height == 0 {
        return;
    }

    let suffix = if point.deduced { " (deduced)" } else { "" };
    let label = format!(" {}: {}{suffix} ", point.year, series.format_value(point.value));
    let width = (label.chars().count() as u16).min(chart.width);

    let direction = if anchor.0 > canvas.width / 2.0 {
        TooltipDirection::Left
    } else {
        TooltipDirection::Right
    };
    let rendered = RenderedBox {
        left: f64::from(chart.x),
        top: f64::from(chart.y),
        width: f64::from(chart.width),
        height: f64::from(chart.height),
    };
    let (x, y) = canvas.tooltip_position(anchor, rendered, direction, f64::from(width));

    let max_x = (chart.x + chart.width).saturating_sub(width).max(chart.x);
    let x = (x.round().max(0.0) as u16).clamp(chart.x, max_x);
    // One row above the point, unless that leaves the chart.
    let y = ((y.round() - 1.0).max(0.0) as u16).clamp(chart.y, chart.y + chart.height - 1);

    let rect = Rect { x, y, width, height: 1 };
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(label).style(Style::default().fg(Color::Black).bg(Color::Yellow)),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{InflationResponse, WorldBankConfig};
    use crate::domain::RawObservation;

    fn app() -> App {
        let client = WorldBankClient::new(WorldBankConfig::default()).unwrap();
        let args = TuiArgs {
            country: Some("FR".to_string()),
            amount: Some("1,000".to_string()),
            since: Some(1900),
        };
        App::new(client, args, 2025)
    }

    fn ready() -> Outcome {
        let input = CalculatorInput::new("FR", 1000.0, 2021, 2025).unwrap();
        let response = InflationResponse {
            country_name: Some("France".to_string()),
            observations: vec![
                RawObservation::new(2024, Some(2.0)),
                RawObservation::new(2023, None),
                RawObservation::new(2022, Some(5.0)),
                RawObservation::new(2021, Some(1.6)),
            ],
        };
        Outcome::Ready(Box::new(pipeline::run_with_response(&input, response, 2025).unwrap()))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn form_starts_sanitized_and_clamped() {
        let app = app();
        assert_eq!(app.amount, "1000");
        assert_eq!(app.since, "1960");
        let input = app.form_input().unwrap();
        assert_eq!(input.country_code, "FR");
        assert_eq!(input.principal, 1000.0);
    }

    #[test]
    fn start_year_is_clamped_when_leaving_the_field() {
        let mut app = app();
        app.set_focus(Field::Since);
        for _ in 0..4 {
            app.handle_key(key(KeyCode::Backspace));
        }
        for c in "2999".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.since, "2999");
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.since, "2024");
        assert_eq!(app.focus, Field::Charts);
    }

    #[test]
    fn amount_field_accepts_digits_only() {
        let mut app = app();
        app.set_focus(Field::Amount);
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Char('5')));
        assert_eq!(app.amount, "10005");
    }

    #[test]
    fn stale_results_are_ignored() {
        let mut app = app();
        let first = app.tracker.issue();
        let second = app.tracker.issue();

        app.tx.send(WorkerMsg::Calculation(second, ready())).unwrap();
        app.tx.send(WorkerMsg::Calculation(first, Outcome::NoData)).unwrap();
        assert!(app.drain_worker());

        assert!(matches!(app.outcome, Some(Outcome::Ready(_))));
        assert_eq!(app.charts.len(), 2);
        assert!(!app.tracker.is_loading());
    }

    #[test]
    fn keyboard_and_pointer_hover() {
        let mut app = app();
        app.apply_outcome(ready());
        app.set_focus(Field::Charts);

        // Keyboard: start from the last point, then step left.
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.charts[0].hover.hovered(), Some(2));

        // Pointer: the value chart has five points over 41 columns.
        app.charts[1].area = Some(Rect::new(10, 20, 41, 8));
        let moved = |column, row| MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        assert!(app.handle_mouse(moved(10 + 21, 22)));
        assert_eq!(app.charts[1].hover.hovered(), Some(2));
        assert_eq!(app.active_chart, 1);

        assert!(app.handle_mouse(moved(0, 0)));
        assert_eq!(app.charts[1].hover.hovered(), None);
    }

    #[test]
    fn dropdown_border_clicks_keep_the_list_open() {
        let mut app = app();
        app.amount.clear();
        let countries: Vec<Country> = ["AD", "AE", "AF", "AG", "AL", "AM", "AO", "AR", "AT", "AU"]
            .iter()
            .map(|code| Country {
                code: code.to_string(),
                code3: format!("{code}X"),
                name: format!("Country {code}"),
                region: "Test".to_string(),
            })
            .collect();
        app.dropdown.set_countries(countries);
        app.dropdown.open("");
        app.dropdown.set_area(Some(Rect::new(1, 5, 44, 5)));
        app.dropdown_offset = 0;

        let click = |row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 10,
            row,
            modifiers: KeyModifiers::NONE,
        };

        for border_row in [5, 9] {
            assert!(!app.handle_mouse(click(border_row)));
            assert!(app.dropdown.is_open());
            assert_eq!(app.country, "FR");
        }

        assert!(app.handle_mouse(click(8)));
        assert!(!app.dropdown.is_open());
        assert_eq!(app.country, "AF");
    }

    #[test]
    fn country_names_resolve_through_the_list() {
        let mut app = app();
        app.dropdown.set_countries(vec![Country {
            code: "DE".to_string(),
            code3: "DEU".to_string(),
            name: "Germany".to_string(),
            region: "Europe & Central Asia".to_string(),
        }]);
        app.country = "germany".to_string();
        assert_eq!(app.resolve_country().as_deref(), Some("DE"));

        app.country = "atlantis".to_string();
        assert!(app.form_input().is_err());
    }
}
