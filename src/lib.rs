//! stepmap - ordered flow-step editor for process mapping
//!
//! The editing core lives in [`steps`]: a store that owns the ordered
//! sequence and keeps positional labels in sync, and a modal state machine
//! for editing, inserting and (with confirmation) removing steps. [`ui`]
//! draws the sequence as cards in a terminal and routes input back to the
//! owner through small callback traits.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod steps;
pub mod ui;

pub use error::SequenceError;
pub use steps::{FlowStep, ModalController, StepId, StepStore};
