pub mod anchor;
pub mod engine;

pub use anchor::{anchor_index, next_target};
pub use engine::{CycleError, DeviceCycler};
