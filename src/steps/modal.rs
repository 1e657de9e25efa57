//! Edit/insert modal state machine.
//!
//! ```text
//! Closed --open_edit(id)------> OpenEdit(id)      draft = step text
//! Closed --open_insert(a)-----> OpenInsert(a)     draft = ""
//! Open*  --cancel-------------> Closed            no sequence change
//! Open*  --save (non-blank)---> Closed            on_save, on_close
//! OpenEdit --remove-----------> OpenEdit + confirming_removal
//! OpenEdit + confirming --remove--> Closed        on_remove, on_close
//! ```
//!
//! The controller never touches the sequence itself. It reports commits
//! through [`ModalCallbacks`] and the parent decides how to apply them.

use super::step::{commit_text, FlowStep, StepId};

/// Which kind of modal session is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    Edit,
    Insert,
}

/// Observable state of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    OpenEdit(StepId),
    /// `None` anchor means insert at the head
    OpenInsert(Option<StepId>),
}

/// What an open session commits to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalTarget {
    Edit(StepId),
    /// `None` anchor means insert at the head
    Insert(Option<StepId>),
}

impl ModalTarget {
    pub fn mode(&self) -> ModalMode {
        match self {
            ModalTarget::Edit(_) => ModalMode::Edit,
            ModalTarget::Insert(_) => ModalMode::Insert,
        }
    }
}

/// Draft state of one open modal. Created on open, dropped on close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSession {
    pub target: ModalTarget,
    pub draft: String,
    pub confirming_removal: bool,
}

/// A committed draft, handed to the parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Edit { id: StepId, text: String },
    Insert { anchor: Option<StepId>, text: String },
}

impl SaveRequest {
    /// Edited step id, or insert anchor (`None` = head)
    pub fn step_id(&self) -> Option<StepId> {
        match self {
            SaveRequest::Edit { id, .. } => Some(*id),
            SaveRequest::Insert { anchor, .. } => *anchor,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            SaveRequest::Edit { text, .. } | SaveRequest::Insert { text, .. } => text,
        }
    }

    pub fn mode(&self) -> ModalMode {
        match self {
            SaveRequest::Edit { .. } => ModalMode::Edit,
            SaveRequest::Insert { .. } => ModalMode::Insert,
        }
    }
}

/// Capabilities the modal needs from its parent
pub trait ModalCallbacks {
    fn on_save(&mut self, request: SaveRequest);
    fn on_remove(&mut self, step_id: StepId);
    fn on_close(&mut self);
}

/// Result of a "remove" click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Not in edit mode; nothing happened
    Ignored,
    /// First click: waiting for the confirming second click
    AwaitingConfirmation,
    /// Second click: removal reported and modal closed
    Removed(StepId),
}

#[derive(Debug, Default)]
pub struct ModalController {
    session: Option<ModalSession>,
}

impl ModalController {
    pub fn new() -> Self {
        Self { session: None }
    }

    pub fn state(&self) -> ModalState {
        match &self.session {
            None => ModalState::Closed,
            Some(session) => match session.target {
                ModalTarget::Edit(id) => ModalState::OpenEdit(id),
                ModalTarget::Insert(anchor) => ModalState::OpenInsert(anchor),
            },
        }
    }

    pub fn session(&self) -> Option<&ModalSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn mode(&self) -> Option<ModalMode> {
        self.session.as_ref().map(|s| s.target.mode())
    }

    pub fn draft(&self) -> &str {
        self.session.as_ref().map_or("", |s| s.draft.as_str())
    }

    pub fn is_confirming_removal(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.confirming_removal)
    }

    /// Open an edit session for `id`, seeding the draft from its text.
    ///
    /// Returns false (and leaves the controller as it was) if `id` is not in
    /// `steps`. Any previous session is discarded.
    pub fn open_edit(&mut self, steps: &[FlowStep], id: StepId) -> bool {
        let Some(step) = steps.iter().find(|s| s.id == id) else {
            tracing::debug!(step_id = %id, "Edit requested for unknown step");
            return false;
        };
        self.session = Some(ModalSession {
            target: ModalTarget::Edit(id),
            draft: step.texto.clone(),
            confirming_removal: false,
        });
        true
    }

    /// Open an insert session after `anchor` (head when `None`). Any previous
    /// session is discarded.
    pub fn open_insert(&mut self, anchor: Option<StepId>) {
        self.session = Some(ModalSession {
            target: ModalTarget::Insert(anchor),
            draft: String::new(),
            confirming_removal: false,
        });
    }

    /// Replace the draft text. Ignored while closed.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let Some(session) = self.session.as_mut() {
            session.draft = text.into();
        }
    }

    /// Whether save would commit (draft non-blank)
    pub fn can_save(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| commit_text(&s.draft).is_some())
    }

    /// Commit the draft. With a blank draft this is a no-op and the modal
    /// stays open.
    pub fn save<C: ModalCallbacks + ?Sized>(&mut self, callbacks: &mut C) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let Some(text) = commit_text(&session.draft) else {
            return false;
        };
        let request = match session.target {
            ModalTarget::Edit(id) => SaveRequest::Edit { id, text },
            ModalTarget::Insert(anchor) => SaveRequest::Insert { anchor, text },
        };

        self.session = None;
        callbacks.on_save(request);
        callbacks.on_close();
        true
    }

    /// Handle a "remove" click. Needs two consecutive clicks in edit mode.
    pub fn request_remove<C: ModalCallbacks + ?Sized>(
        &mut self,
        callbacks: &mut C,
    ) -> RemoveOutcome {
        let Some(session) = self.session.as_mut() else {
            return RemoveOutcome::Ignored;
        };
        let ModalTarget::Edit(id) = session.target else {
            return RemoveOutcome::Ignored;
        };

        if !session.confirming_removal {
            session.confirming_removal = true;
            return RemoveOutcome::AwaitingConfirmation;
        }

        self.session = None;
        callbacks.on_remove(id);
        callbacks.on_close();
        RemoveOutcome::Removed(id)
    }

    /// Close without touching the sequence
    pub fn cancel<C: ModalCallbacks + ?Sized>(&mut self, callbacks: &mut C) {
        if self.session.take().is_some() {
            callbacks.on_close();
        }
    }
}
