use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

use crate::config::Config;
use crate::steps::{
    ModalCallbacks, ModalController, SaveRequest, SequenceDocument, StepId, StepStore,
};
use crate::ui::dialogs::HelpDialog;
use crate::ui::step_card::StepListCallbacks;
use crate::ui::step_modal::{ModalKeyResult, StepModal};
use crate::ui::step_list::StepList;
use crate::ui::terminal_guard::TerminalGuard;

/// Terminal host for the step editor. Owns the store and applies the
/// callbacks emitted by the list and the modal.
pub struct App {
    config: Config,
    title: String,
    store: StepStore,
    modal: ModalController,
    modal_view: StepModal,
    help_dialog: HelpDialog,
    /// Index of the card under the keyboard cursor
    cursor: usize,
    /// Where the list was last drawn, for mouse hit-testing
    list_area: Rect,
    status_message: Option<String>,
    initial_revision: u64,
    should_quit: bool,
}

/// Applies modal commits to the store and remembers which step to focus
struct StoreCommit<'a> {
    store: &'a mut StepStore,
    focus: Option<StepId>,
    status: Option<String>,
}

impl ModalCallbacks for StoreCommit<'_> {
    fn on_save(&mut self, request: SaveRequest) {
        match request {
            SaveRequest::Edit { id, text } => {
                if self.store.edit(id, &text) {
                    self.focus = Some(id);
                    self.status = Some("Step updated".to_string());
                }
            }
            SaveRequest::Insert { anchor, text } => {
                if let Some(id) = self.store.insert_after(anchor, &text) {
                    tracing::info!(step_id = %id, anchor = ?anchor, "Step added");
                    self.focus = Some(id);
                    self.status = Some("Step added".to_string());
                }
            }
        }
    }

    fn on_remove(&mut self, step_id: StepId) {
        if let Some(step) = self.store.remove(step_id) {
            tracing::info!(step_id = %step_id, "Step removed");
            self.status = Some(format!("Removed \"{}\"", step.texto));
        }
    }

    fn on_close(&mut self) {}
}

impl StepListCallbacks for App {
    fn on_edit(&mut self, step_id: StepId) {
        if !self.store.set_active(Some(step_id)) {
            return;
        }
        if let Some(pos) = self.store.position(step_id) {
            self.cursor = pos;
        }
        if self.modal.open_edit(self.store.steps(), step_id) {
            self.modal_view.sync_from(&self.modal);
            self.status_message = None;
        }
    }

    fn on_insert_after(&mut self, step_id: StepId) {
        if let Some(pos) = self.store.position(step_id) {
            self.cursor = pos;
            self.open_insert(Some(step_id));
        }
    }
}

impl App {
    pub fn new(config: Config, title: impl Into<String>, store: StepStore) -> Self {
        let modal_view =
            StepModal::new().with_confirm_hint(config.editor.confirm_removal_hint.clone());
        let cursor = store
            .active()
            .and_then(|id| store.position(id))
            .unwrap_or(0);
        let initial_revision = store.revision();

        Self {
            config,
            title: title.into(),
            store,
            modal: ModalController::new(),
            modal_view,
            help_dialog: HelpDialog::new(),
            cursor,
            list_area: Rect::default(),
            status_message: None,
            initial_revision,
            should_quit: false,
        }
    }

    pub fn store(&self) -> &StepStore {
        &self.store
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Whether any edit, insert or removal was applied
    pub fn is_modified(&self) -> bool {
        self.store.revision() != self.initial_revision
    }

    /// Snapshot for writing back to the sequence file
    pub fn document(&self) -> SequenceDocument {
        SequenceDocument::from_store(&self.store)
    }

    pub fn run(&mut self) -> Result<()> {
        let _guard = TerminalGuard::new(self.config.ui.mouse)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(self.config.ui.tick_rate_ms);
        tracing::info!(steps = self.store.len(), "Editor started");

        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }

        terminal.show_cursor()?;
        tracing::info!(
            steps = self.store.len(),
            modified = self.is_modified(),
            "Editor closed"
        );
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.help_dialog.visible {
            self.help_dialog.toggle();
            return;
        }

        if self.modal.is_open() {
            self.handle_modal_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.help_dialog.toggle(),
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1),
            KeyCode::Char('g') | KeyCode::Home => self.cursor = 0,
            KeyCode::Char('G') | KeyCode::End => {
                self.cursor = self.store.len().saturating_sub(1);
            }
            KeyCode::Char('I') => self.open_insert(None),
            // An empty list has no card to insert below
            KeyCode::Char('i') | KeyCode::Char('+') if self.store.is_empty() => {
                self.open_insert(None);
            }
            code => {
                let event = StepList::new(self.store.steps())
                    .cursor(self.cursor)
                    .key_event(code);
                if let Some(event) = event {
                    event.dispatch(self);
                }
            }
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.modal.is_open() || self.help_dialog.visible {
            return;
        }
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        let event = StepList::new(self.store.steps())
            .cursor(self.cursor)
            .hit_test(self.list_area, mouse.column, mouse.row);
        if let Some(event) = event {
            event.dispatch(self);
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        let mut commit = StoreCommit {
            store: &mut self.store,
            focus: None,
            status: None,
        };
        let result = self
            .modal_view
            .handle_key(key, &mut self.modal, &mut commit);
        let StoreCommit { focus, status, .. } = commit;

        match result {
            ModalKeyResult::Closed => {
                if let Some(pos) = focus.and_then(|id| self.store.position(id)) {
                    self.cursor = pos;
                }
                self.clamp_cursor();
                self.status_message = status;
            }
            ModalKeyResult::SaveDisabled => {
                self.status_message = Some("Step text cannot be empty".to_string());
            }
            ModalKeyResult::ConfirmRemoval => {
                self.status_message = Some(self.config.editor.confirm_removal_hint.clone());
            }
            ModalKeyResult::Continue => {}
        }
    }

    fn open_insert(&mut self, anchor: Option<StepId>) {
        self.modal.open_insert(anchor);
        self.modal_view.sync_from(&self.modal);
        self.status_message = None;
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.store.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.store.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.store.len().saturating_sub(1));
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(3),    // Steps
                Constraint::Length(1), // Status
            ])
            .split(frame.area());

        let modified = if self.is_modified() { " [modified]" } else { "" };
        let header = Line::from(vec![
            Span::styled(
                self.title.as_str(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(modified, Style::default().fg(Color::Yellow)),
        ]);
        frame.render_widget(Paragraph::new(header), chunks[0]);

        self.list_area = chunks[1];
        StepList::new(self.store.steps())
            .active(self.store.active())
            .cursor(self.cursor)
            .max_text_len(self.config.ui.card_text_max_length)
            .render(frame, chunks[1]);

        let status = match &self.status_message {
            Some(message) => Line::from(Span::styled(
                message.as_str(),
                Style::default().fg(Color::Yellow),
            )),
            None => Line::from(vec![
                Span::styled("?", Style::default().fg(Color::Yellow)),
                Span::styled(" help  ", Style::default().fg(Color::Gray)),
                Span::styled("q", Style::default().fg(Color::Yellow)),
                Span::styled(" quit", Style::default().fg(Color::Gray)),
            ]),
        };
        frame.render_widget(Paragraph::new(status), chunks[2]);

        self.modal_view
            .render(frame, &self.modal, self.store.steps());
        self.help_dialog.render(frame);
    }
}
