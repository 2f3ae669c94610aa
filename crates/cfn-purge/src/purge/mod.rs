//! Cascading stack purge
//!
//! Empties every content-bearing repository of a stack, then deletes the
//! stack. The stack is only deleted when every repository was emptied.

pub mod classify;
pub mod content;
pub mod coordinator;
pub mod progress;
pub mod result;

pub use classify::classify;
pub use content::{enumerate, purge};
pub use coordinator::StackPurger;
pub use progress::{CascadePhase, LogProgress, PurgeProgress};
pub use result::{CascadeResult, IncompletePurge, RepositoryFailure};
