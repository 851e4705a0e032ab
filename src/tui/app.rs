//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which translates keystrokes into
//! intents for the controller, and renders the derived view model each
//! frame. Rendering is a full re-derivation from store state; the TUI keeps
//! no task data of its own beyond the cursor widgets.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};

use crate::controller::{Controller, Intent};
use crate::tui::colors::{ACCENT, BAR_BLUE, DONE_GREY};
use crate::tui::enums::{AppState, Focus};
use crate::tui::input::InputField;
use crate::view::{Filter, ViewModel};

/// Main application state for the terminal user interface.
///
/// Holds the controller plus purely presentational state: which surface has
/// focus, the entry widget, the in-row edit widget, and the list selection.
pub struct App {
    controller: Controller,
    state: AppState,
    focus: Focus,
    entry: InputField,
    edit_input: Option<InputField>,
    list_state: ListState,
    status_message: String,
}

impl App {
    /// Create a new App backed by the task file at the given path.
    pub fn new(db_path: &Path) -> Self {
        let mut app = App {
            controller: Controller::open(db_path),
            state: AppState::List,
            focus: Focus::Entry,
            entry: InputField::new(),
            edit_input: None,
            list_state: ListState::default(),
            status_message: String::new(),
        };
        let rows = app.controller.view().rows.len();
        if rows > 0 {
            app.list_state.select(Some(0));
        }
        app
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Send one intent to the controller, surfacing persistence failures in
    /// the status bar instead of tearing the session down.
    fn apply(&mut self, intent: Intent) {
        if let Err(e) = self.controller.dispatch(intent) {
            self.set_status_message(format!("Error saving: {e}"));
        }
        self.clamp_selection();
    }

    /// Keep the selection inside the visible rows after any mutation or
    /// filter change.
    fn clamp_selection(&mut self) {
        let len = self.controller.view().rows.len();
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            None => self.list_state.select(Some(0)),
            _ => {}
        }
    }

    /// Id of the currently selected visible row.
    fn selected_id(&self) -> Option<String> {
        let vm = self.controller.view();
        self.list_state
            .selected()
            .and_then(|i| vm.rows.get(i))
            .map(|row| row.id.clone())
    }

    /// Enter the editing state for the selected row, seeding the in-row
    /// input with the current text.
    fn start_edit_selected(&mut self) {
        if self.edit_input.is_some() {
            return;
        }
        if let Some(id) = self.selected_id() {
            self.apply(Intent::StartEdit(id));
            if let Some(session) = self.controller.editing() {
                self.edit_input = Some(InputField::with_value(&session.original));
            }
        }
    }

    /// Leave the editing state through the single finishing path.
    ///
    /// Both the confirm key and focus loss land here with `commit = true`;
    /// the controller ignores a second commit for the same session, so the
    /// two can never double-apply.
    fn finish_edit(&mut self, commit: bool) {
        let Some(input) = self.edit_input.take() else {
            return;
        };
        let Some(session) = self.controller.editing() else {
            return;
        };
        let id = session.id.clone();
        if commit {
            self.apply(Intent::CommitEdit {
                id,
                text: input.value,
            });
        } else {
            self.apply(Intent::CancelEdit(id));
        }
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.controller.view().rows.len();
        if len == 0 {
            return;
        }
        match self.list_state.selected() {
            Some(i) if down && i + 1 < len => self.list_state.select(Some(i + 1)),
            Some(i) if !down && i > 0 => self.list_state.select(Some(i - 1)),
            None => self.list_state.select(Some(0)),
            _ => {}
        }
    }

    /// Handle keys while a row edit is in progress.
    fn handle_edit_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => self.finish_edit(true),
            KeyCode::Esc => self.finish_edit(false),
            // Moving away from the row is a focus loss: commit, then move.
            KeyCode::Up => {
                self.finish_edit(true);
                self.move_selection(false);
            }
            KeyCode::Down => {
                self.finish_edit(true);
                self.move_selection(true);
            }
            KeyCode::Tab => {
                self.finish_edit(true);
                self.focus = Focus::Entry;
            }
            KeyCode::Backspace => {
                if let Some(input) = self.edit_input.as_mut() {
                    input.handle_backspace();
                }
            }
            KeyCode::Delete => {
                if let Some(input) = self.edit_input.as_mut() {
                    input.handle_delete();
                }
            }
            KeyCode::Left => {
                if let Some(input) = self.edit_input.as_mut() {
                    input.move_cursor_left();
                }
            }
            KeyCode::Right => {
                if let Some(input) = self.edit_input.as_mut() {
                    input.move_cursor_right();
                }
            }
            KeyCode::Home => {
                if let Some(input) = self.edit_input.as_mut() {
                    input.move_cursor_home();
                }
            }
            KeyCode::End => {
                if let Some(input) = self.edit_input.as_mut() {
                    input.move_cursor_end();
                }
            }
            KeyCode::Char(c) => {
                if let Some(input) = self.edit_input.as_mut() {
                    input.handle_char(c);
                }
            }
            _ => {}
        }
    }

    /// Handle keys while the new-task entry line has focus.
    ///
    /// Returns true if the application should quit.
    fn handle_entry_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Esc => return true,
            KeyCode::Enter => {
                // Blank input is silently rejected and left in place.
                if !self.entry.value.trim().is_empty() {
                    let text = self.entry.take();
                    self.apply(Intent::SubmitNew(text));
                    // Entry keeps focus so the next task can be typed
                    // straight away.
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = Focus::List;
                self.clamp_selection();
            }
            KeyCode::Backspace => self.entry.handle_backspace(),
            KeyCode::Delete => self.entry.handle_delete(),
            KeyCode::Left => self.entry.move_cursor_left(),
            KeyCode::Right => self.entry.move_cursor_right(),
            KeyCode::Home => self.entry.move_cursor_home(),
            KeyCode::End => self.entry.move_cursor_end(),
            KeyCode::Char(c) => self.entry.handle_char(c),
            _ => {}
        }
        false
    }

    /// Handle keys while the task list has focus.
    ///
    /// Returns true if the application should quit.
    fn handle_list_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => return true,
            KeyCode::Tab => self.focus = Focus::Entry,
            KeyCode::Up => self.move_selection(false),
            KeyCode::Down => self.move_selection(true),
            KeyCode::Char(' ') => {
                if let Some(id) = self.selected_id() {
                    self.apply(Intent::ToggleTask(id));
                }
            }
            KeyCode::Enter | KeyCode::Char('e') => self.start_edit_selected(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.apply(Intent::DeleteTask(id));
                    self.set_status_message("Task deleted".to_string());
                }
            }
            KeyCode::Char('c') => {
                if self.controller.view().has_completed {
                    self.apply(Intent::ClearCompleted);
                    self.set_status_message("Completed tasks cleared".to_string());
                }
            }
            KeyCode::Left => {
                let filter = self.controller.filter().prev();
                self.apply(Intent::SelectFilter(filter));
            }
            KeyCode::Right => {
                let filter = self.controller.filter().next();
                self.apply(Intent::SelectFilter(filter));
            }
            KeyCode::Char('1') => self.apply(Intent::SelectFilter(Filter::All)),
            KeyCode::Char('2') => self.apply(Intent::SelectFilter(Filter::Active)),
            KeyCode::Char('3') => self.apply(Intent::SelectFilter(Filter::Completed)),
            KeyCode::Char('h') => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    /// Handle keys on the help screen.
    fn handle_help_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') => {
                self.state = AppState::List;
            }
            _ => {}
        }
    }

    /// Poll for and handle keyboard events based on current state.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.clear_status_message();

                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
                {
                    return Ok(true);
                }

                let should_quit = match self.state {
                    AppState::Help => {
                        self.handle_help_input(key.code);
                        false
                    }
                    AppState::List if self.edit_input.is_some() => {
                        self.handle_edit_input(key.code);
                        false
                    }
                    AppState::List => match self.focus {
                        Focus::Entry => self.handle_entry_input(key.code),
                        Focus::List => self.handle_list_input(key.code),
                    },
                };
                if should_quit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Render the new-task entry line.
    fn render_entry(&self, f: &mut Frame, area: Rect) {
        let border = if self.focus == Focus::Entry && self.edit_input.is_none() {
            Style::default().fg(ACCENT)
        } else {
            Style::default()
        };
        let input = Paragraph::new(self.entry.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("New task (Enter to add)")
                .border_style(border),
        );
        f.render_widget(input, area);

        if self.focus == Focus::Entry && self.edit_input.is_none() {
            f.set_cursor_position((area.x + self.entry.cursor as u16 + 1, area.y + 1));
        }
    }

    /// Render one task row, swapping in the edit widget when this row is
    /// being edited.
    fn row_line(&self, vm: &ViewModel, idx: usize) -> Line<'static> {
        let row = &vm.rows[idx];
        let editing = self
            .controller
            .editing()
            .is_some_and(|session| session.id == row.id);

        if editing {
            if let Some(input) = &self.edit_input {
                // Block cursor drawn in-line; the terminal cursor stays off
                // inside the scrolled list.
                let chars: Vec<char> = input.value.chars().collect();
                let before: String = chars[..input.cursor].iter().collect();
                let (under, after) = if input.cursor < chars.len() {
                    (
                        chars[input.cursor].to_string(),
                        chars[input.cursor + 1..].iter().collect::<String>(),
                    )
                } else {
                    (" ".to_string(), String::new())
                };
                let editing_style = Style::default().fg(ACCENT);
                return Line::from(vec![
                    Span::styled("[·] ", editing_style),
                    Span::styled(before, editing_style),
                    Span::styled(under, Style::default().bg(Color::White).fg(Color::Black)),
                    Span::styled(after, editing_style),
                ]);
            }
        }

        let (glyph, style) = if row.completed {
            (
                "[x] ",
                Style::default()
                    .fg(DONE_GREY)
                    .add_modifier(Modifier::CROSSED_OUT),
            )
        } else {
            ("[ ] ", Style::default().fg(Color::White))
        };
        Line::from(vec![
            Span::styled(glyph, Style::default().fg(Color::White)),
            Span::styled(row.text.clone(), style),
        ])
    }

    /// Render the task list, or the placeholder when nothing is visible.
    fn render_list(&mut self, f: &mut Frame, area: Rect, vm: &ViewModel) {
        let title = format!("Tasks ({})", vm.filter.label());
        let block = Block::default().borders(Borders::ALL).title(title);

        if let Some(placeholder) = vm.placeholder {
            let msg = Paragraph::new(Line::from(Span::styled(
                placeholder.message(),
                Style::default()
                    .fg(DONE_GREY)
                    .add_modifier(Modifier::ITALIC),
            )))
            .block(block)
            .alignment(Alignment::Center);
            f.render_widget(msg, area);
            return;
        }

        let items: Vec<ListItem> = (0..vm.rows.len())
            .map(|i| ListItem::new(self.row_line(vm, i)))
            .collect();

        let highlight = if self.focus == Focus::List {
            Style::default().bg(Color::Gray).fg(Color::Black)
        } else {
            Style::default()
        };
        let list = List::new(items)
            .block(block)
            .highlight_style(highlight)
            .highlight_symbol("► ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    /// Render the footer: remaining count, filter tabs, bulk-clear hint.
    fn render_footer(&self, f: &mut Frame, area: Rect, vm: &ViewModel) {
        let count = if vm.remaining == 1 {
            "1 item left".to_string()
        } else {
            format!("{} items left", vm.remaining)
        };

        let mut spans = vec![Span::raw(count), Span::raw("   ")];
        for filter in Filter::ALL {
            let style = if filter == vm.filter {
                Style::default()
                    .bg(ACCENT)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(format!(" {} ", filter.label()), style));
            spans.push(Span::raw(" "));
        }
        if vm.has_completed {
            spans.push(Span::styled(
                "  c: clear completed",
                Style::default().fg(DONE_GREY),
            ));
        }

        let footer =
            Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        f.render_widget(footer, area);
    }

    /// Render the help screen with key bindings.
    fn render_help(&self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Key Bindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Entry line:"),
            Line::from("  Enter        add the typed task"),
            Line::from("  Tab / Down   move to the list"),
            Line::from("  Esc          quit"),
            Line::from(""),
            Line::from("Task list:"),
            Line::from("  Up / Down    select task"),
            Line::from("  Space        toggle completed"),
            Line::from("  Enter / e    edit task text"),
            Line::from("  d / Del      delete task"),
            Line::from("  c            clear completed tasks"),
            Line::from("  Left / Right cycle filter"),
            Line::from("  1 / 2 / 3    All / Active / Completed"),
            Line::from("  Tab          back to the entry line"),
            Line::from("  q / Esc      quit"),
            Line::from(""),
            Line::from("While editing:"),
            Line::from("  Enter        save changes"),
            Line::from("  Esc          discard changes"),
            Line::from("  Up/Down/Tab  save, then move"),
            Line::from(""),
            Line::from("Press any of q, h, Esc to return"),
        ];

        let help = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .alignment(Alignment::Left);
        f.render_widget(help, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.edit_input.is_some() {
            "Editing: Enter to save, Esc to discard".to_string()
        } else {
            match (self.state, self.focus) {
                (AppState::Help, _) => "Help".to_string(),
                (_, Focus::Entry) => {
                    "Type a task, Enter to add, Tab for the list, Esc to quit".to_string()
                }
                (_, Focus::List) => {
                    "Space toggle, e edit, d delete, ←/→ filter, h help, q quit".to_string()
                }
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(BAR_BLUE).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function: one full frame from a fresh view model.
    fn render(&mut self, f: &mut Frame) {
        let vm = self.controller.view();

        let footer_height = if vm.show_footer { 3 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(footer_height),
                Constraint::Length(1),
            ])
            .split(f.area());

        match self.state {
            AppState::Help => self.render_help(f, chunks[1]),
            AppState::List => self.render_list(f, chunks[1], &vm),
        }
        self.render_entry(f, chunks[0]);
        if vm.show_footer {
            self.render_footer(f, chunks[2], &vm);
        }
        self.render_status_bar(f, chunks[3]);
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
