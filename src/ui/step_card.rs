//! One step, drawn as a bordered card.
//!
//! ```text
//! ┌ 2 ────────────────────────┐
//! │ Aprovar solicitação       │
//! └──────────────────── [+] ──┘
//! ```
//!
//! The whole card activates the step for editing. The `[+]` control on the
//! bottom border inserts a step below; a hit there never activates the card.

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::steps::{FlowStep, StepId};

/// Height of one card including borders
pub const CARD_HEIGHT: u16 = 3;

const INSERT_CONTROL: &str = "[+]";
/// Columns between the insert control and the right border
const INSERT_CONTROL_MARGIN: u16 = 2;

/// Interaction emitted by a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEvent {
    Activate(StepId),
    InsertBelow(StepId),
}

impl CardEvent {
    pub fn step_id(&self) -> StepId {
        match self {
            CardEvent::Activate(id) | CardEvent::InsertBelow(id) => *id,
        }
    }

    /// Forward to the parent's handlers
    pub fn dispatch<C: StepListCallbacks + ?Sized>(self, callbacks: &mut C) {
        match self {
            CardEvent::Activate(id) => callbacks.on_edit(id),
            CardEvent::InsertBelow(id) => callbacks.on_insert_after(id),
        }
    }
}

/// Handlers a parent supplies to cards and lists
pub trait StepListCallbacks {
    fn on_edit(&mut self, step_id: StepId);
    fn on_insert_after(&mut self, step_id: StepId);
}

/// Stateless view of a single step
pub struct StepCard<'a> {
    step: &'a FlowStep,
    active: bool,
    focused: bool,
    max_text_len: usize,
}

impl<'a> StepCard<'a> {
    pub fn new(step: &'a FlowStep) -> Self {
        Self {
            step,
            active: false,
            focused: false,
            max_text_len: usize::MAX,
        }
    }

    /// Mark as the active (being edited) step. Visual only.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Mark as under the keyboard cursor. Visual only.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn max_text_len(mut self, max: usize) -> Self {
        self.max_text_len = max;
        self
    }

    /// Area of the insert control within a card drawn at `area`
    pub fn insert_control_area(area: Rect) -> Rect {
        let width = INSERT_CONTROL.len() as u16;
        let x = area
            .right()
            .saturating_sub(width + INSERT_CONTROL_MARGIN + 1)
            .max(area.x);
        Rect {
            x,
            y: area.bottom().saturating_sub(1),
            width: width.min(area.width),
            height: 1.min(area.height),
        }
    }

    /// Map a pointer press at (`column`, `row`) to a card event.
    ///
    /// The insert control is checked first and short-circuits, so one press
    /// yields at most one event.
    pub fn hit_test(&self, area: Rect, column: u16, row: u16) -> Option<CardEvent> {
        if !contains(area, column, row) {
            return None;
        }
        if contains(Self::insert_control_area(area), column, row) {
            return Some(CardEvent::InsertBelow(self.step.id));
        }
        Some(CardEvent::Activate(self.step.id))
    }

    /// Keyboard affordances of a focused card
    pub fn handle_key(&self, key: KeyCode) -> Option<CardEvent> {
        match key {
            KeyCode::Enter | KeyCode::Char('e') => Some(CardEvent::Activate(self.step.id)),
            KeyCode::Char('i') | KeyCode::Char('+') => Some(CardEvent::InsertBelow(self.step.id)),
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let mut title = vec![Span::styled(
            format!(" {} ", self.step.label),
            border_style.add_modifier(Modifier::BOLD),
        )];
        if self.active {
            title.push(Span::styled("● ", Style::default().fg(Color::Yellow)));
        }

        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text_style = if self.focused {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        };
        let text = truncate(&first_line(&self.step.texto), self.max_text_len);
        frame.render_widget(
            Paragraph::new(Span::styled(text, text_style)),
            inner,
        );

        let control_style = if self.focused {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(INSERT_CONTROL, control_style)),
            Self::insert_control_area(area),
        );
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

/// Cards show one line; multi-line text is marked with an ellipsis
fn first_line(text: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default();
    if lines.next().is_some() {
        format!("{first} …")
    } else {
        first.to_string()
    }
}

/// Trim to `max` characters, counting chars rather than bytes
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
