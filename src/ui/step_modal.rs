//! Terminal view of the edit/insert modal.
//!
//! The draft lives in the [`ModalController`]; this view keeps a text area in
//! sync with it and turns key presses into controller transitions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

use super::dialogs::centered_rect;
use crate::steps::{
    FlowStep, ModalCallbacks, ModalController, ModalMode, ModalState, RemoveOutcome,
};

/// What a key press did to the modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKeyResult {
    /// Modal closed (saved, removed, or cancelled)
    Closed,
    /// Save pressed with a blank draft
    SaveDisabled,
    /// First remove press, awaiting confirmation
    ConfirmRemoval,
    /// Key went to the text area or was ignored
    Continue,
}

pub struct StepModal {
    textarea: TextArea<'static>,
    /// Text shown while a removal awaits its second press
    confirm_hint: String,
}

impl Default for StepModal {
    fn default() -> Self {
        Self::new()
    }
}

impl StepModal {
    pub fn new() -> Self {
        Self {
            textarea: TextArea::default(),
            confirm_hint: "Press Ctrl+D again to remove this step".to_string(),
        }
    }

    pub fn with_confirm_hint(mut self, hint: impl Into<String>) -> Self {
        self.confirm_hint = hint.into();
        self
    }

    /// Load the controller's draft into the text area. Call after opening.
    pub fn sync_from(&mut self, controller: &ModalController) {
        let lines: Vec<String> = controller.draft().lines().map(str::to_string).collect();
        self.textarea = if lines.is_empty() {
            TextArea::default()
        } else {
            TextArea::new(lines)
        };
        self.textarea.move_cursor(tui_textarea::CursorMove::Bottom);
        self.textarea.move_cursor(tui_textarea::CursorMove::End);
    }

    /// Current text area content
    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn handle_key<C: ModalCallbacks + ?Sized>(
        &mut self,
        key: KeyEvent,
        controller: &mut ModalController,
        callbacks: &mut C,
    ) -> ModalKeyResult {
        if !controller.is_open() {
            return ModalKeyResult::Continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                controller.cancel(callbacks);
                ModalKeyResult::Closed
            }
            KeyCode::Char('s') if ctrl => {
                controller.set_draft(self.text());
                if controller.save(callbacks) {
                    ModalKeyResult::Closed
                } else {
                    ModalKeyResult::SaveDisabled
                }
            }
            KeyCode::Char('d') if ctrl => match controller.request_remove(callbacks) {
                RemoveOutcome::Removed(_) => ModalKeyResult::Closed,
                RemoveOutcome::AwaitingConfirmation => ModalKeyResult::ConfirmRemoval,
                RemoveOutcome::Ignored => ModalKeyResult::Continue,
            },
            _ => {
                self.textarea.input(key);
                controller.set_draft(self.text());
                ModalKeyResult::Continue
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame, controller: &ModalController, steps: &[FlowStep]) {
        let state = controller.state();
        let (title, border_color) = match state {
            ModalState::Closed => return,
            ModalState::OpenEdit(id) => {
                let label = steps
                    .iter()
                    .find(|s| s.id == id)
                    .map(|s| s.label.as_str())
                    .unwrap_or("?");
                (format!(" Edit Step {label} "), Color::Cyan)
            }
            ModalState::OpenInsert(anchor) => {
                let title = match anchor.and_then(|a| steps.iter().find(|s| s.id == a)) {
                    Some(step) => format!(" New Step After {} ", step.label),
                    None => " New Step At Start ".to_string(),
                };
                (title, Color::Green)
            }
        };

        let area = centered_rect(60, 40, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Text input
                Constraint::Length(1), // Confirmation
                Constraint::Length(1), // Instructions
            ])
            .margin(1)
            .split(inner);

        self.textarea.set_cursor_line_style(Style::default());
        self.textarea
            .set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
        self.textarea.set_placeholder_text("Describe this step...");
        self.textarea
            .set_placeholder_style(Style::default().fg(Color::DarkGray));
        self.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        );
        frame.render_widget(&self.textarea, chunks[0]);

        if controller.is_confirming_removal() {
            let confirm = Paragraph::new(Span::styled(
                self.confirm_hint.as_str(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center);
            frame.render_widget(confirm, chunks[1]);
        }

        let save_style = if controller.can_save() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut instructions = vec![
            Span::styled("Ctrl+S", save_style),
            Span::styled(" save  ", save_style),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" cancel"),
        ];
        if controller.mode() == Some(ModalMode::Edit) {
            instructions.push(Span::raw("  "));
            instructions.push(Span::styled("Ctrl+D", Style::default().fg(Color::Red)));
            instructions.push(Span::raw(" remove"));
        }
        frame.render_widget(
            Paragraph::new(Line::from(instructions)).alignment(Alignment::Center),
            chunks[2],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::{SaveRequest, StepId};
    use ratatui::{backend::TestBackend, Terminal};

    #[derive(Default)]
    struct Recorder {
        saves: Vec<SaveRequest>,
        removes: Vec<StepId>,
        closes: usize,
    }

    impl ModalCallbacks for Recorder {
        fn on_save(&mut self, request: SaveRequest) {
            self.saves.push(request);
        }

        fn on_remove(&mut self, step_id: StepId) {
            self.removes.push(step_id);
        }

        fn on_close(&mut self) {
            self.closes += 1;
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn steps() -> Vec<FlowStep> {
        let mut step = FlowStep::new(1, "Receber");
        step.label = "1".to_string();
        vec![step]
    }

    #[test]
    fn test_sync_loads_draft() {
        let mut controller = ModalController::new();
        controller.open_edit(&steps(), StepId(1));
        let mut view = StepModal::new();
        view.sync_from(&controller);
        assert_eq!(view.text(), "Receber");
    }

    #[test]
    fn test_typing_updates_draft() {
        let mut controller = ModalController::new();
        let mut rec = Recorder::default();
        controller.open_insert(None);
        let mut view = StepModal::new();
        view.sync_from(&controller);

        for c in "Ok".chars() {
            view.handle_key(key(KeyCode::Char(c)), &mut controller, &mut rec);
        }
        assert_eq!(controller.draft(), "Ok");
        assert!(controller.can_save());
    }

    #[test]
    fn test_save_blank_is_disabled() {
        let mut controller = ModalController::new();
        let mut rec = Recorder::default();
        controller.open_insert(None);
        let mut view = StepModal::new();
        view.sync_from(&controller);

        let result = view.handle_key(ctrl('s'), &mut controller, &mut rec);
        assert_eq!(result, ModalKeyResult::SaveDisabled);
        assert!(controller.is_open());
        assert!(rec.saves.is_empty());
    }

    #[test]
    fn test_save_commits_and_closes() {
        let mut controller = ModalController::new();
        let mut rec = Recorder::default();
        controller.open_insert(Some(StepId(1)));
        let mut view = StepModal::new();
        view.sync_from(&controller);
        view.handle_key(key(KeyCode::Char('x')), &mut controller, &mut rec);

        let result = view.handle_key(ctrl('s'), &mut controller, &mut rec);
        assert_eq!(result, ModalKeyResult::Closed);
        assert_eq!(
            rec.saves,
            vec![SaveRequest::Insert {
                anchor: Some(StepId(1)),
                text: "x".to_string()
            }]
        );
    }

    #[test]
    fn test_remove_twice_closes() {
        let mut controller = ModalController::new();
        let mut rec = Recorder::default();
        controller.open_edit(&steps(), StepId(1));
        let mut view = StepModal::new();
        view.sync_from(&controller);

        assert_eq!(
            view.handle_key(ctrl('d'), &mut controller, &mut rec),
            ModalKeyResult::ConfirmRemoval
        );
        assert!(rec.removes.is_empty());
        assert_eq!(
            view.handle_key(ctrl('d'), &mut controller, &mut rec),
            ModalKeyResult::Closed
        );
        assert_eq!(rec.removes, vec![StepId(1)]);
    }

    #[test]
    fn test_escape_cancels() {
        let mut controller = ModalController::new();
        let mut rec = Recorder::default();
        controller.open_edit(&steps(), StepId(1));
        let mut view = StepModal::new();
        view.sync_from(&controller);

        let result = view.handle_key(key(KeyCode::Esc), &mut controller, &mut rec);
        assert_eq!(result, ModalKeyResult::Closed);
        assert!(!controller.is_open());
        assert_eq!(rec.closes, 1);
    }

    #[test]
    fn test_keys_ignored_when_closed() {
        let mut controller = ModalController::new();
        let mut rec = Recorder::default();
        let mut view = StepModal::new();
        let result = view.handle_key(key(KeyCode::Char('a')), &mut controller, &mut rec);
        assert_eq!(result, ModalKeyResult::Continue);
        assert!(view.text().is_empty());
    }

    #[test]
    fn test_render_edit_title_uses_label() {
        let steps = steps();
        let mut controller = ModalController::new();
        controller.open_edit(&steps, StepId(1));
        let mut view = StepModal::new();
        view.sync_from(&controller);

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| view.render(f, &controller, &steps))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = (0..24)
            .flat_map(|y| (0..80).map(move |x| (x, y)))
            .map(|(x, y)| buffer[(x, y)].symbol().to_string())
            .collect();
        assert!(screen.contains("Edit Step 1"));
    }
}
