//! Vertical list of step cards.
//!
//! Holds no state of its own: the sequence, active id and cursor are borrowed
//! from the owner for each render or event, and card events are forwarded
//! unchanged to the owner's [`StepListCallbacks`].

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::step_card::{CardEvent, StepCard, StepListCallbacks, CARD_HEIGHT};
use crate::steps::{FlowStep, StepId};

pub struct StepList<'a> {
    steps: &'a [FlowStep],
    active: Option<StepId>,
    cursor: usize,
    max_text_len: usize,
    title: &'a str,
}

impl<'a> StepList<'a> {
    pub fn new(steps: &'a [FlowStep]) -> Self {
        Self {
            steps,
            active: None,
            cursor: 0,
            max_text_len: usize::MAX,
            title: "Process Steps",
        }
    }

    pub fn active(mut self, active: Option<StepId>) -> Self {
        self.active = active;
        self
    }

    pub fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn max_text_len(mut self, max: usize) -> Self {
        self.max_text_len = max;
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    fn block(&self) -> Block<'static> {
        Block::default()
            .title(format!(" {} ({}) ", self.title, self.steps.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
    }

    /// Card rectangles for the visible window, keeping the cursor in view
    pub fn card_areas(&self, area: Rect) -> Vec<(usize, Rect)> {
        let inner = self.block().inner(area);
        let visible = (inner.height / CARD_HEIGHT) as usize;
        if visible == 0 || self.steps.is_empty() {
            return Vec::new();
        }

        let cursor = self.cursor.min(self.steps.len() - 1);
        let offset = cursor.saturating_sub(visible - 1);

        self.steps
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .enumerate()
            .map(|(slot, (index, _))| {
                let rect = Rect {
                    x: inner.x,
                    y: inner.y + slot as u16 * CARD_HEIGHT,
                    width: inner.width,
                    height: CARD_HEIGHT,
                };
                (index, rect)
            })
            .collect()
    }

    fn card(&self, index: usize) -> Option<StepCard<'a>> {
        let step = self.steps.get(index)?;
        Some(
            StepCard::new(step)
                .active(self.active == Some(step.id))
                .focused(index == self.cursor)
                .max_text_len(self.max_text_len),
        )
    }

    /// Route a pointer press to the card under it
    pub fn hit_test(&self, area: Rect, column: u16, row: u16) -> Option<CardEvent> {
        self.card_areas(area)
            .into_iter()
            .find_map(|(index, rect)| self.card(index)?.hit_test(rect, column, row))
    }

    /// Route a key to the card under the cursor
    pub fn key_event(&self, key: KeyCode) -> Option<CardEvent> {
        self.card(self.cursor)?.handle_key(key)
    }

    /// Pointer press forwarded to `callbacks`. Returns true when a card
    /// handled it.
    pub fn handle_click<C: StepListCallbacks + ?Sized>(
        &self,
        area: Rect,
        column: u16,
        row: u16,
        callbacks: &mut C,
    ) -> bool {
        match self.hit_test(area, column, row) {
            Some(event) => {
                event.dispatch(callbacks);
                true
            }
            None => false,
        }
    }

    /// Key forwarded to `callbacks`. Returns true when the focused card
    /// handled it.
    pub fn handle_key<C: StepListCallbacks + ?Sized>(
        &self,
        key: KeyCode,
        callbacks: &mut C,
    ) -> bool {
        match self.key_event(key) {
            Some(event) => {
                event.dispatch(callbacks);
                true
            }
            None => false,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = self.block();
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.steps.is_empty() {
            let hint = Paragraph::new(Line::from(vec![
                Span::styled("No steps yet. Press ", Style::default().fg(Color::Gray)),
                Span::styled("I", Style::default().fg(Color::Yellow)),
                Span::styled(" to add the first one.", Style::default().fg(Color::Gray)),
            ]))
            .alignment(Alignment::Center);
            frame.render_widget(hint, inner);
            return;
        }

        for (index, rect) in self.card_areas(area) {
            if let Some(card) = self.card(index) {
                card.render(frame, rect);
            }
        }
    }
}
