mod state_manager;

pub use state_manager::{CycleOutcome, StateManager};
