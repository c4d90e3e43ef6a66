pub mod coordinator;
pub mod in_flight;
pub mod lifecycle;

pub use coordinator::{TransitionCoordinator, TransitionError};
pub use lifecycle::{Transition, TransitionKind, available_transitions};
