//! Main application logic for the planner TUI.
//!
//! The `App` struct owns the navigator and the task store, handles keyboard
//! input for whichever panel is visible, and renders the interface. Panels
//! map one-to-one to full-screen views; the blocking alert is a modal dialog
//! rendered over the current panel.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap,
    },
    Frame, Terminal,
};

use crate::navigator::{Navigator, DEFAULT_PANEL};
use crate::store::{rows_for, AddError, FileSlot, TaskRow, TaskStore};
use crate::tui::colors::{DARK_RED, DARK_TEAL, GOLD};
use crate::tui::input::InputField;
use crate::tui::utils::centered_rect;

/// Which planner control owns keyboard input.
#[derive(Clone, Copy, PartialEq)]
enum PlannerFocus {
    Text,
    When,
    List,
}

/// Main application state for the terminal user interface.
pub struct App {
    navigator: Navigator,
    store: TaskStore<FileSlot>,
    rows: Vec<TaskRow>,
    menu_state: ListState,
    list_state: TableState,
    text_input: InputField,
    when_input: InputField,
    focus: PlannerFocus,
    alert: Option<String>,
    status_message: String,
}

impl App {
    /// Create the app: declare panels and triggers, wire navigation, and
    /// load the persisted task list.
    pub fn new(slot_path: &Path) -> Self {
        let mut navigator = Navigator::new([DEFAULT_PANEL, "planner", "about"]);
        navigator.add_trigger("Planner", "planner", false);
        navigator.add_trigger("Sync", "sync", true);
        navigator.add_trigger("About", "about", false);
        navigator.add_trigger("Back", DEFAULT_PANEL, false);
        navigator.wire();

        let store = TaskStore::new(FileSlot::new(slot_path));

        let mut menu_state = ListState::default();
        menu_state.select(Some(0));

        let mut app = App {
            navigator,
            store,
            rows: Vec::new(),
            menu_state,
            list_state: TableState::default(),
            text_input: InputField::new(),
            when_input: InputField::new(),
            focus: PlannerFocus::Text,
            alert: None,
            status_message: String::new(),
        };
        app.update_focus();
        app.refresh_rows();
        app
    }

    /// Wired trigger indices that belong on the dashboard menu (everything
    /// except back controls).
    fn menu_wired_indices(&self) -> Vec<usize> {
        self.navigator
            .wired_triggers()
            .iter()
            .enumerate()
            .filter(|(_, t)| t.target != DEFAULT_PANEL)
            .map(|(i, _)| i)
            .collect()
    }

    /// Fire the wired back trigger, returning to the dashboard.
    fn fire_back(&mut self) {
        let back = self
            .navigator
            .wired_triggers()
            .iter()
            .position(|t| t.target == DEFAULT_PANEL);
        if let Some(i) = back {
            self.navigator.fire(i);
        }
    }

    /// Reload rows from the slot and clamp the list selection.
    ///
    /// A slot recovery warning lands in the status bar; stderr is invisible
    /// behind the alternate screen.
    fn refresh_rows(&mut self) {
        let (tasks, warning) = self.store.load_reported();
        self.rows = rows_for(&tasks);
        if let Some(w) = warning {
            self.status_message = w;
        }
        if self.rows.is_empty() {
            self.list_state.select(None);
        } else {
            let max = self.rows.len() - 1;
            match self.list_state.selected() {
                Some(i) if i > max => self.list_state.select(Some(max)),
                None => self.list_state.select(Some(0)),
                _ => {}
            }
        }
    }

    /// Keep the input fields' active flags in sync with the focus.
    fn update_focus(&mut self) {
        self.text_input.active = self.focus == PlannerFocus::Text;
        self.when_input.active = self.focus == PlannerFocus::When;
    }

    /// Try to add a task from the current input values.
    ///
    /// Blank text and unparseable date-times raise the blocking alert and
    /// leave the collection untouched.
    fn submit_add(&mut self) {
        let text = self.text_input.value.clone();
        let when = self.when_input.value.clone();
        let when = if when.trim().is_empty() { None } else { Some(when) };

        match self.store.add(&text, when.as_deref()) {
            Ok(task) => {
                self.text_input.clear();
                self.when_input.clear();
                self.refresh_rows();
                self.status_message = format!("Added task {}", task.id);
            }
            Err(e @ (AddError::EmptyText | AddError::BadTimestamp(_))) => {
                self.alert = Some(e.to_string());
            }
            Err(AddError::Storage(e)) => {
                self.status_message = format!("Failed to save tasks: {e}");
            }
        }
    }

    /// Delete the selected row by its stable id, read at keypress time.
    fn delete_selected(&mut self) {
        let id = match self.list_state.selected().and_then(|i| self.rows.get(i)) {
            Some(row) => row.id,
            None => return,
        };
        if let Err(e) = self.store.delete_by_id(id) {
            self.status_message = format!("Failed to save tasks: {e}");
        } else {
            self.status_message = "Deleted.".to_string();
        }
        self.refresh_rows();
    }

    /// Handle keys while the dashboard menu is visible.
    ///
    /// Returns true if the application should quit.
    fn handle_dashboard_input(&mut self, key: KeyCode) -> bool {
        let item_count = self.menu_wired_indices().len();
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                let i = self.menu_state.selected().unwrap_or(0);
                self.menu_state.select(Some(i.saturating_sub(1)));
            }
            KeyCode::Down => {
                let i = self.menu_state.selected().unwrap_or(0);
                if i + 1 < item_count {
                    self.menu_state.select(Some(i + 1));
                }
            }
            KeyCode::Enter => {
                if let Some(i) = self.menu_state.selected() {
                    if let Some(&wired) = self.menu_wired_indices().get(i) {
                        self.navigator.fire(wired);
                        if self.navigator.visible_panel() == Some("planner") {
                            self.refresh_rows();
                        }
                    }
                }
            }
            _ => {}
        }
        false
    }

    /// Handle keys while the planner panel is visible.
    fn handle_planner_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.fire_back();
                return;
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    PlannerFocus::Text => PlannerFocus::When,
                    PlannerFocus::When => PlannerFocus::List,
                    PlannerFocus::List => PlannerFocus::Text,
                };
                self.update_focus();
                return;
            }
            _ => {}
        }

        match self.focus {
            PlannerFocus::Text | PlannerFocus::When => {
                let field = if self.focus == PlannerFocus::Text {
                    &mut self.text_input
                } else {
                    &mut self.when_input
                };
                match key {
                    KeyCode::Enter => self.submit_add(),
                    KeyCode::Char(c) => field.handle_char(c),
                    KeyCode::Backspace => field.handle_backspace(),
                    KeyCode::Delete => field.handle_delete(),
                    KeyCode::Left => field.move_cursor_left(),
                    KeyCode::Right => field.move_cursor_right(),
                    _ => {}
                }
            }
            PlannerFocus::List => match key {
                KeyCode::Up => {
                    let i = self.list_state.selected().unwrap_or(0);
                    self.list_state.select(Some(i.saturating_sub(1)));
                }
                KeyCode::Down => {
                    let i = self.list_state.selected().unwrap_or(0);
                    if i + 1 < self.rows.len() {
                        self.list_state.select(Some(i + 1));
                    }
                }
                KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
                _ => {}
            },
        }
    }

    /// Handle keys while the blocking alert is up. Nothing else reacts
    /// until it is dismissed.
    fn handle_alert_input(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Enter | KeyCode::Esc) {
            self.alert = None;
        }
    }

    /// Poll for and handle keyboard events based on the visible panel.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.status_message.clear();

                if self.alert.is_some() {
                    self.handle_alert_input(key.code);
                    return Ok(false);
                }

                match self.navigator.visible_panel() {
                    Some(DEFAULT_PANEL) => {
                        if self.handle_dashboard_input(key.code) {
                            return Ok(true);
                        }
                    }
                    Some("planner") => self.handle_planner_input(key.code),
                    // About and the no-panel state only navigate back.
                    _ => match key.code {
                        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.fire_back(),
                        _ => {}
                    },
                }
            }
        }
        Ok(false)
    }

    /// Render the dashboard: app header plus the trigger menu.
    fn render_dashboard(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                "SYNAP",
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            )),
            Line::from("Personal planner"),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().bg(DARK_TEAL)),
        );
        f.render_widget(header, chunks[0]);

        // Enabled triggers are selectable; disabled ones render dim with no
        // handler behind them.
        let mut items: Vec<ListItem> = self
            .menu_wired_indices()
            .iter()
            .map(|&i| ListItem::new(self.navigator.wired_triggers()[i].label.clone()))
            .collect();
        for t in self.navigator.triggers().iter().filter(|t| t.disabled) {
            items.push(ListItem::new(Span::styled(
                format!("{} (unavailable)", t.label),
                Style::default().fg(Color::DarkGray),
            )));
        }

        let menu = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Menu"))
            .highlight_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        f.render_stateful_widget(menu, chunks[1], &mut self.menu_state);
    }

    /// Render the planner: the two inputs and the task table.
    fn render_planner(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let input_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[0]);

        render_input(f, input_chunks[0], &self.text_input, "New task");
        render_input(f, input_chunks[1], &self.when_input, "When (YYYY-MM-DDTHH:MM)");

        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|r| Row::new(vec![r.when.clone(), r.text.clone()]))
            .collect();
        let table = Table::new(rows, [Constraint::Length(18), Constraint::Min(0)])
            .header(Row::new(vec!["When", "Text"]).style(Style::default().add_modifier(Modifier::BOLD)))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Tasks ({})", self.rows.len())),
            )
            .row_highlight_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD));
        f.render_stateful_widget(table, chunks[1], &mut self.list_state);
    }

    /// Render the about panel.
    fn render_about(&self, f: &mut Frame, area: Rect) {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Synap",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("A minimal personal planner."),
            Line::from("Tasks live in a single local JSON file."),
            Line::from(""),
            Line::from("Press Esc to return to the dashboard."),
        ];
        let about = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("About"))
            .wrap(Wrap { trim: true });
        f.render_widget(about, area);
    }

    /// Render the state where no declared panel is active. Reachable only
    /// through a trigger whose target names no panel.
    fn render_no_panel(&self, f: &mut Frame, area: Rect) {
        let blank = Paragraph::new("No panel active. Press Esc to return to the dashboard.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(blank, area);
    }

    /// Render the blocking alert dialog over the current panel.
    fn render_alert(&self, f: &mut Frame, area: Rect, message: &str) {
        let block = Block::default()
            .title("Alert")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                message.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press Enter to continue"),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.navigator.visible_panel() {
                Some(DEFAULT_PANEL) => "Up/Down select | Enter open | q quit".to_string(),
                Some("planner") => {
                    "Tab switch focus | Enter add | d delete selected | Esc back".to_string()
                }
                _ => "Esc back".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(DARK_TEAL).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches on the visible panel.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
            .split(f.area());

        match self.navigator.visible_panel() {
            Some(DEFAULT_PANEL) => self.render_dashboard(f, chunks[0]),
            Some("planner") => self.render_planner(f, chunks[0]),
            Some("about") => self.render_about(f, chunks[0]),
            _ => self.render_no_panel(f, chunks[0]),
        }

        if let Some(message) = self.alert.clone() {
            self.render_alert(f, chunks[0], &message);
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

/// Render one bordered input line, with the cursor when it has focus.
fn render_input(f: &mut Frame, area: Rect, field: &InputField, title: &str) {
    let style = if field.active {
        Style::default().fg(GOLD)
    } else {
        Style::default()
    };
    let widget = Paragraph::new(field.value.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(style),
    );
    f.render_widget(widget, area);
    if field.active {
        let cursor_x = area.x + 1 + field.cursor.min(area.width.saturating_sub(2) as usize) as u16;
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}
