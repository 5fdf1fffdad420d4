// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod controls;
mod surface;

pub use controls::{FacetOption, FilterControls};
pub use surface::TableSurface;

use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use curio_app::{
    Controller, ControllerCommand, ControllerEvent, DebouncedControl, Item, ScrollMetrics,
    SortDirection, SortSpec,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use surface::{COLUMNS, cell_text, row_links};
use tracing::{debug, error, info};

const HALF_PAGE_ROWS: isize = 10;
const FULL_PAGE_ROWS: isize = 20;
const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);
/// Table chrome around the body rows: the header row plus two borders.
const TABLE_CHROME_ROWS: u16 = 3;
const FILTER_BAR_ROWS: u16 = 3;
const STATUS_BAR_ROWS: u16 = 3;

/// Rows from the end of the rendered table that trigger the next batch.
pub const DEFAULT_SCROLL_THRESHOLD_ROWS: usize = 8;

/// Result of loading the catalog, as the UI needs it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogLoad {
    pub items: Vec<Item>,
    pub failed_files: Vec<String>,
    pub summary: String,
}

impl CatalogLoad {
    pub fn status_message(&self) -> String {
        if self.failed_files.is_empty() {
            format!("loaded {}", self.summary)
        } else {
            format!(
                "loaded {}; skipped {}",
                self.summary,
                self.failed_files.join(", ")
            )
        }
    }
}

pub trait CatalogRuntime {
    fn load_catalog(&mut self) -> Result<CatalogLoad>;

    /// Loads the catalog and reports through `tx`. Runtimes that can load
    /// off the UI thread override this.
    fn spawn_load(&mut self, tx: Sender<InternalEvent>) -> Result<()> {
        tx.send(load_event(self))
            .map_err(|_| anyhow!("load event channel closed"))?;
        Ok(())
    }
}

/// Runs `load_catalog` and wraps the outcome for the event loop.
pub fn load_event<R: CatalogRuntime + ?Sized>(runtime: &mut R) -> InternalEvent {
    match runtime.load_catalog() {
        Ok(load) => InternalEvent::Loaded(load),
        Err(error) => InternalEvent::LoadFailed {
            error: format!("{error:#}"),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    DebounceElapsed {
        control: DebouncedControl,
        token: u64,
    },
    Loaded(CatalogLoad),
    LoadFailed {
        error: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Focus {
    #[default]
    Table,
    Input(DebouncedControl),
    Facets,
}

#[derive(Debug, Clone, PartialEq)]
struct ViewData {
    controls: FilterControls,
    surface: TableSurface,
    facet_options: Vec<FacetOption>,
    focus: Focus,
    facet_cursor: usize,
    selected_row: usize,
    selected_col: usize,
    scroll_offset: usize,
    viewport_rows: usize,
    help_visible: bool,
    loading: bool,
    status_line: Option<String>,
    status_token: u64,
}

impl Default for ViewData {
    fn default() -> Self {
        Self {
            controls: FilterControls::default(),
            surface: TableSurface::default(),
            facet_options: FacetOption::all(),
            focus: Focus::Table,
            facet_cursor: 0,
            selected_row: 0,
            selected_col: 1,
            scroll_offset: 0,
            viewport_rows: FULL_PAGE_ROWS as usize,
            help_visible: false,
            loading: true,
            status_line: None,
            status_token: 0,
        }
    }
}

pub fn run_app<R: CatalogRuntime>(controller: &mut Controller, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = runtime.spawn_load(internal_tx.clone()) {
        let _ = internal_tx.send(InternalEvent::LoadFailed {
            error: format!("{error:#}"),
        });
    }

    let mut result = Ok(());
    loop {
        process_internal_events(controller, &mut view_data, &internal_tx, &internal_rx);

        match terminal.size() {
            Ok(size) => resize_viewport(controller, &mut view_data, &internal_tx, size.height),
            Err(error) => {
                result = Err(error).context("read terminal size");
                break;
            }
        }

        if let Err(error) = terminal.draw(|frame| render(frame, controller, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(controller, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                // Resizes are picked up from the terminal size next frame.
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn table_viewport_rows(height: u16) -> usize {
    usize::from(
        height
            .saturating_sub(FILTER_BAR_ROWS + STATUS_BAR_ROWS + TABLE_CHROME_ROWS)
            .max(1),
    )
}

/// A taller table can expose the end of the rendered rows without any row
/// movement, so a changed height re-checks the batch threshold.
fn resize_viewport(
    controller: &mut Controller,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    height: u16,
) {
    let rows = table_viewport_rows(height);
    if rows == view_data.viewport_rows {
        return;
    }
    debug!(rows, "table viewport resized");
    view_data.viewport_rows = rows;
    check_scroll(controller, view_data, tx);
}

fn process_internal_events(
    controller: &mut Controller,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status_line = None;
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::DebounceElapsed { control, token } => {
                apply(
                    controller,
                    view_data,
                    tx,
                    ControllerCommand::DebounceElapsed { control, token },
                );
            }
            InternalEvent::Loaded(load) => {
                let message = load.status_message();
                info!(items = load.items.len(), "catalog received");
                apply(
                    controller,
                    view_data,
                    tx,
                    ControllerCommand::DatasetLoaded(load.items),
                );
                check_scroll(controller, view_data, tx);
                emit_status(view_data, tx, message);
            }
            InternalEvent::LoadFailed { error } => {
                error!(error = %error, "catalog load failed");
                apply(
                    controller,
                    view_data,
                    tx,
                    ControllerCommand::DatasetLoaded(Vec::new()),
                );
                emit_status(view_data, tx, format!("load failed: {error}"));
            }
        }
    }
}

/// Runs one controller command against the UI's controls and surface and
/// reacts to what it reports.
fn apply(
    controller: &mut Controller,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    command: ControllerCommand,
) {
    let events = controller.dispatch(command, &view_data.controls, &mut view_data.surface);
    for event in events {
        match event {
            ControllerEvent::RefreshScheduled {
                control,
                token,
                delay,
            } => schedule_debounce(tx, control, token, delay),
            ControllerEvent::Refreshed { .. } | ControllerEvent::Sorted { .. } => {
                view_data.selected_row = 0;
                view_data.scroll_offset = 0;
            }
            ControllerEvent::DatasetReady { .. } | ControllerEvent::DatasetIgnored => {
                view_data.loading = false;
            }
            ControllerEvent::BatchRendered { rendered, total } => {
                debug!(rendered, total, "appended batch");
            }
        }
    }
}

fn check_scroll(controller: &mut Controller, view_data: &mut ViewData, tx: &Sender<InternalEvent>) {
    let metrics = ScrollMetrics {
        offset: view_data.scroll_offset,
        viewport: view_data.viewport_rows,
        content: view_data.surface.rows().len(),
    };
    apply(controller, view_data, tx, ControllerCommand::Scrolled(metrics));
}

fn schedule_debounce(
    internal_tx: &Sender<InternalEvent>,
    control: DebouncedControl,
    token: u64,
    delay: Duration,
) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(delay);
        let _ = sender.send(InternalEvent::DebounceElapsed { control, token });
    });
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_DELAY);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    view_data.status_line = Some(message.into());
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event(
    controller: &mut Controller,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            view_data.help_visible = false;
        }
        return false;
    }

    match view_data.focus {
        Focus::Input(control) => {
            handle_input_key(controller, view_data, internal_tx, control, key);
            false
        }
        Focus::Facets => {
            handle_facet_key(controller, view_data, internal_tx, key);
            false
        }
        Focus::Table => handle_table_key(controller, view_data, internal_tx, key),
    }
}

fn handle_input_key(
    controller: &mut Controller,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    control: DebouncedControl,
    key: KeyEvent,
) {
    let edited = match (key.code, key.modifiers) {
        (KeyCode::Esc | KeyCode::Enter | KeyCode::Tab, _) => {
            view_data.focus = Focus::Table;
            false
        }
        (KeyCode::Backspace, _) => view_data.controls.text_mut(control).pop().is_some(),
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            let text = view_data.controls.text_mut(control);
            let had_text = !text.is_empty();
            text.clear();
            had_text
        }
        (KeyCode::Char(ch), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.controls.text_mut(control).push(ch);
            true
        }
        _ => false,
    };
    if edited {
        apply(
            controller,
            view_data,
            internal_tx,
            ControllerCommand::InputEdited(control),
        );
    }
}

fn handle_facet_key(
    controller: &mut Controller,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let last = view_data.facet_options.len().saturating_sub(1);
    match key.code {
        KeyCode::Esc | KeyCode::Char('f') | KeyCode::Tab => view_data.focus = Focus::Table,
        KeyCode::Char('j') | KeyCode::Down => {
            view_data.facet_cursor = (view_data.facet_cursor + 1).min(last);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.facet_cursor = view_data.facet_cursor.saturating_sub(1);
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            let Some(option) = view_data.facet_options.get(view_data.facet_cursor).cloned() else {
                return;
            };
            let checked = view_data.controls.toggle(&option);
            apply(
                controller,
                view_data,
                internal_tx,
                ControllerCommand::CheckboxToggled,
            );
            let state = if checked { "on" } else { "off" };
            emit_status(
                view_data,
                internal_tx,
                format!("{} {} {state}", option.group(), option.label()),
            );
        }
        _ => {}
    }
}

fn handle_table_key(
    controller: &mut Controller,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => return true,
        (KeyCode::Char('?'), _) => view_data.help_visible = true,
        (KeyCode::Char('/'), _) => view_data.focus = Focus::Input(DebouncedControl::Query),
        (KeyCode::Char('<'), _) => view_data.focus = Focus::Input(DebouncedControl::MinPrice),
        (KeyCode::Char('>'), _) => view_data.focus = Focus::Input(DebouncedControl::MaxPrice),
        (KeyCode::Char('f'), _) => view_data.focus = Focus::Facets,
        (KeyCode::Char('j') | KeyCode::Down, _) => {
            scroll_rows(controller, view_data, internal_tx, 1);
        }
        (KeyCode::Char('k') | KeyCode::Up, _) => {
            scroll_rows(controller, view_data, internal_tx, -1);
        }
        (KeyCode::Char('d'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            scroll_rows(controller, view_data, internal_tx, HALF_PAGE_ROWS);
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            scroll_rows(controller, view_data, internal_tx, -HALF_PAGE_ROWS);
        }
        (KeyCode::PageDown, _) => scroll_rows(controller, view_data, internal_tx, FULL_PAGE_ROWS),
        (KeyCode::PageUp, _) => scroll_rows(controller, view_data, internal_tx, -FULL_PAGE_ROWS),
        (KeyCode::Char('g'), _) => scroll_rows(controller, view_data, internal_tx, isize::MIN),
        (KeyCode::Char('G'), _) => scroll_rows(controller, view_data, internal_tx, isize::MAX),
        (KeyCode::Char('h') | KeyCode::Left, _) => move_col(view_data, -1),
        (KeyCode::Char('l') | KeyCode::Right, _) => move_col(view_data, 1),
        (KeyCode::Char('s'), _) => sort_selected_column(controller, view_data, internal_tx),
        (KeyCode::Enter, _) => {
            let message = view_data
                .surface
                .rows()
                .get(view_data.selected_row)
                .map(|row| {
                    let links = row_links(row);
                    if links.is_empty() {
                        format!("{}: no links", row.name)
                    } else {
                        links.join("  ")
                    }
                })
                .unwrap_or_else(|| "no row selected".to_owned());
            emit_status(view_data, internal_tx, message);
        }
        _ => return false,
    }
    false
}

fn scroll_rows(
    controller: &mut Controller,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    delta: isize,
) {
    move_row(view_data, delta);
    check_scroll(controller, view_data, internal_tx);
}

fn sort_selected_column(
    controller: &mut Controller,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let column = COLUMNS[view_data.selected_col];
    let Some(sort_column) = column.sort else {
        emit_status(
            view_data,
            internal_tx,
            format!("column {} is not sortable", column.label),
        );
        return;
    };
    apply(
        controller,
        view_data,
        internal_tx,
        ControllerCommand::HeaderClicked(sort_column),
    );
}

fn move_row(view_data: &mut ViewData, delta: isize) {
    let row_count = view_data.surface.rows().len();
    if row_count == 0 {
        view_data.selected_row = 0;
        view_data.scroll_offset = 0;
        return;
    }

    let current = view_data.selected_row;
    let next = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize)
    };
    view_data.selected_row = next.min(row_count - 1);

    let viewport = view_data.viewport_rows.max(1);
    if view_data.selected_row < view_data.scroll_offset {
        view_data.scroll_offset = view_data.selected_row;
    } else if view_data.selected_row >= view_data.scroll_offset + viewport {
        view_data.scroll_offset = view_data.selected_row + 1 - viewport;
    }
}

fn move_col(view_data: &mut ViewData, delta: isize) {
    let last = COLUMNS.len() - 1;
    let next = if delta.is_negative() {
        view_data.selected_col.saturating_sub(delta.unsigned_abs())
    } else {
        view_data.selected_col.saturating_add(delta as usize)
    };
    view_data.selected_col = next.min(last);
}

fn render(frame: &mut ratatui::Frame<'_>, controller: &Controller, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FILTER_BAR_ROWS),
            Constraint::Min(1),
            Constraint::Length(STATUS_BAR_ROWS),
        ])
        .split(frame.area());

    let filters = Paragraph::new(filter_bar_line(view_data))
        .block(Block::default().title("curio").borders(Borders::ALL));
    frame.render_widget(filters, layout[0]);

    if view_data.focus == Focus::Facets {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(30)])
            .split(layout[1]);
        render_table(frame, body[0], controller, view_data);
        let panel = Paragraph::new(facet_panel_lines(view_data).join("\n"))
            .block(Block::default().title("facets").borders(Borders::ALL));
        frame.render_widget(panel, body[1]);
    } else {
        render_table(frame, layout[1], controller, view_data);
    }

    let status = Paragraph::new(status_text(view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if view_data.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    controller: &Controller,
    view_data: &ViewData,
) {
    let sort = controller.state().sort();
    let header = Row::new(COLUMNS.iter().enumerate().map(|(index, _)| {
        let mut style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        if index == view_data.selected_col && view_data.focus == Focus::Table {
            style = style.fg(Color::Cyan);
        }
        Cell::from(header_label(index, sort)).style(style)
    }));

    let rows = view_data
        .surface
        .rows()
        .iter()
        .enumerate()
        .skip(view_data.scroll_offset)
        .take(view_data.viewport_rows)
        .map(|(row_index, row)| {
            let style = if row_index == view_data.selected_row {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Row::new((0..COLUMNS.len()).map(|column| Cell::from(cell_text(row, column))))
                .style(style)
        });

    let widths = COLUMNS.iter().map(|column| {
        if column.label == "name" {
            Constraint::Min(column.width)
        } else {
            Constraint::Length(column.width)
        }
    });
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(table_title(view_data))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn header_label(column_index: usize, sort: Option<SortSpec>) -> String {
    let column = COLUMNS[column_index];
    let mut label = column.label.to_owned();
    if let Some(sort) = sort
        && column.sort == Some(sort.column)
    {
        label.push_str(match sort.direction {
            SortDirection::Asc => " ↑",
            SortDirection::Desc => " ↓",
        });
    }
    label
}

fn table_title(view_data: &ViewData) -> String {
    if view_data.loading {
        return "catalog · loading".to_owned();
    }
    format!(
        "catalog · {} items · showing {}",
        view_data.surface.displayed_count(),
        view_data.surface.rows().len()
    )
}

fn filter_bar_line(view_data: &ViewData) -> Line<'static> {
    let mut spans = Vec::new();
    for control in DebouncedControl::ALL {
        let focused = view_data.focus == Focus::Input(control);
        let style = if focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(filter_field_text(view_data, control), style));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::raw(format!(
        "facets: {}",
        view_data.controls.checked.len()
    )));
    Line::from(spans)
}

fn filter_field_text(view_data: &ViewData, control: DebouncedControl) -> String {
    let cursor = if view_data.focus == Focus::Input(control) {
        "▏"
    } else {
        ""
    };
    format!(
        "{}: {}{cursor}",
        control.label(),
        view_data.controls.text(control)
    )
}

fn facet_panel_lines(view_data: &ViewData) -> Vec<String> {
    let mut lines = Vec::with_capacity(view_data.facet_options.len());
    let mut group = "";
    for (index, option) in view_data.facet_options.iter().enumerate() {
        if option.group() != group {
            group = option.group();
            lines.push(format!("{group}:"));
        }
        let pointer = if index == view_data.facet_cursor {
            ">"
        } else {
            " "
        };
        let mark = if view_data.controls.is_checked(option) {
            "x"
        } else {
            " "
        };
        lines.push(format!("{pointer} [{mark}] {}", option.label()));
    }
    lines
}

fn status_text(view_data: &ViewData) -> String {
    let focus = match view_data.focus {
        Focus::Table => "TABLE",
        Focus::Input(_) => "INPUT",
        Focus::Facets => "FACETS",
    };
    let keys = match view_data.focus {
        Focus::Table => "j/k g/G d/u | h/l s sort | / < > f filters | enter links | ? help | q",
        Focus::Input(_) => "type to filter | ctrl+u clear | esc done",
        Focus::Facets => "j/k move | space toggle | esc done",
    };
    match &view_data.status_line {
        Some(status) => format!("{focus} | {status} | {keys}"),
        None => format!("{focus} | {keys}"),
    }
}

fn help_overlay_text() -> &'static str {
    "j/k, up/down    move one row\n\
     ctrl+d/ctrl+u   half page down/up\n\
     pgdn/pgup       full page down/up\n\
     g/G             first/last loaded row\n\
     h/l             select column\n\
     s               sort by column (again to flip)\n\
     /               search text\n\
     < / >           min/max display price\n\
     f               condition and flag checkboxes\n\
     enter           show links of the selected row\n\
     q, ctrl+c       quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
