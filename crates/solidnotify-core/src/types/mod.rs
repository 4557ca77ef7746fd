//! Core types for solidnotify.

mod features;
mod negotiation;
mod status;
mod topic;

pub use features::*;
pub use negotiation::*;
pub use status::*;
pub use topic::*;
