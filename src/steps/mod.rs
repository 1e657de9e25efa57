//! Ordered flow-step editing core: records, store, and the edit/insert modal

pub mod document;
pub mod modal;
pub mod step;
pub mod store;

pub use document::{DocumentFormat, SequenceDocument};
pub use modal::{
    ModalCallbacks, ModalController, ModalMode, ModalSession, ModalState, ModalTarget,
    RemoveOutcome, SaveRequest,
};
pub use step::{FlowStep, StepId};
pub use store::StepStore;
