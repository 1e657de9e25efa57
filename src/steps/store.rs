//! Step store: sole owner of the ordered sequence and the active selection.
//!
//! Every structural change ends with a full relabel pass, so once a public
//! method returns the labels are always "1".."n" in sequence order.

use std::collections::HashSet;

use super::step::{commit_text, FlowStep, StepId};
use crate::error::SequenceError;

#[derive(Debug, Clone)]
pub struct StepStore {
    steps: Vec<FlowStep>,
    active: Option<StepId>,
    /// Next id to hand out. Only ever grows.
    next_id: u64,
    /// Bumped on every applied mutation of the sequence
    revision: u64,
}

impl Default for StepStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StepStore {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            active: None,
            next_id: 1,
            revision: 0,
        }
    }

    /// Build a store from an inbound sequence.
    ///
    /// Inbound labels are discarded and recomputed. The id counter starts past
    /// the largest inbound id.
    pub fn from_steps(
        steps: Vec<FlowStep>,
        active: Option<StepId>,
    ) -> Result<Self, SequenceError> {
        let mut seen = HashSet::with_capacity(steps.len());
        for step in &steps {
            if !seen.insert(step.id) {
                return Err(SequenceError::DuplicateId(step.id));
            }
            if step.texto.trim().is_empty() {
                return Err(SequenceError::EmptyText(step.id));
            }
        }
        if let Some(id) = active {
            if !seen.contains(&id) {
                return Err(SequenceError::UnknownActive(id));
            }
        }

        let next_id = match steps.iter().map(|s| s.id).max() {
            None => 1,
            Some(max) => max
                .0
                .checked_add(1)
                .ok_or(SequenceError::IdSpaceExhausted(max))?,
        };
        let mut store = Self {
            steps,
            active,
            next_id,
            revision: 0,
        };
        store.relabel();
        Ok(store)
    }

    pub fn steps(&self) -> &[FlowStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, id: StepId) -> Option<&FlowStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: StepId) -> Option<usize> {
        self.steps.iter().position(|s| s.id == id)
    }

    pub fn contains(&self, id: StepId) -> bool {
        self.position(id).is_some()
    }

    pub fn active(&self) -> Option<StepId> {
        self.active
    }

    /// Id the next successful insert will receive
    pub fn next_id(&self) -> StepId {
        StepId(self.next_id)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the text of a step. Blank text or an unknown id leaves the
    /// sequence untouched.
    pub fn edit(&mut self, id: StepId, new_text: &str) -> bool {
        let Some(text) = commit_text(new_text) else {
            tracing::debug!(step_id = %id, "Ignoring edit with empty text");
            return false;
        };
        let Some(step) = self.steps.iter_mut().find(|s| s.id == id) else {
            tracing::debug!(step_id = %id, "Ignoring edit of unknown step");
            return false;
        };

        step.texto = text;
        self.revision += 1;
        tracing::debug!(step_id = %id, "Step edited");
        true
    }

    /// Insert a new step right after `anchor`, or at the head when `anchor`
    /// is `None`. Returns the id of the new step.
    pub fn insert_after(&mut self, anchor: Option<StepId>, text: &str) -> Option<StepId> {
        let Some(text) = commit_text(text) else {
            tracing::debug!(anchor = ?anchor, "Ignoring insert with empty text");
            return None;
        };
        let index = match anchor {
            Some(anchor_id) => match self.position(anchor_id) {
                Some(pos) => pos + 1,
                None => {
                    tracing::debug!(anchor = %anchor_id, "Ignoring insert after unknown step");
                    return None;
                }
            },
            None => 0,
        };

        let Some(following) = self.next_id.checked_add(1) else {
            tracing::warn!(next_id = self.next_id, "Ignoring insert, step ids exhausted");
            return None;
        };
        let id = StepId(self.next_id);
        self.next_id = following;
        self.steps.insert(index, FlowStep::new(id, text));
        self.relabel();
        self.revision += 1;
        tracing::debug!(step_id = %id, position = index + 1, "Step inserted");
        Some(id)
    }

    /// Delete a step. Clears the active selection if it pointed at the
    /// removed step.
    pub fn remove(&mut self, id: StepId) -> Option<FlowStep> {
        let Some(index) = self.position(id) else {
            tracing::debug!(step_id = %id, "Ignoring removal of unknown step");
            return None;
        };

        let removed = self.steps.remove(index);
        if self.active == Some(id) {
            self.active = None;
        }
        self.relabel();
        self.revision += 1;
        tracing::debug!(step_id = %id, "Step removed");
        Some(removed)
    }

    /// Rewrite every label as the step's 1-based rank.
    pub fn relabel(&mut self) {
        for (index, step) in self.steps.iter_mut().enumerate() {
            step.label = (index + 1).to_string();
        }
    }

    /// Change the active step. An id that is not in the sequence is ignored.
    pub fn set_active(&mut self, id: Option<StepId>) -> bool {
        match id {
            Some(step_id) if !self.contains(step_id) => {
                tracing::debug!(step_id = %step_id, "Ignoring activation of unknown step");
                false
            }
            _ => {
                self.active = id;
                true
            }
        }
    }
}
