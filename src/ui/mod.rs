pub mod dialogs;
pub mod keybindings;
pub mod step_card;
pub mod step_list;
pub mod step_modal;
pub mod terminal_guard;

pub use step_card::{CardEvent, StepCard, StepListCallbacks};
pub use step_list::StepList;
pub use step_modal::{ModalKeyResult, StepModal};
