//! Core domain logic for the phonebook.
//!
//! Everything that decides *what* happens lives here, with no IO and no async:
//! the owned [`Session`] record, the filter, submit planning, the completion
//! reducer, self-expiring message slots and request sequencing. The engine
//! crate decides *when* (tasks, channels, timers) and feeds results back in.

mod filter;
pub mod messages;
mod plan;
mod sequencing;
mod session;
mod slot;

pub use filter::{matches_filter, visible_contacts};
pub use plan::{SubmitPlan, plan_submit};
pub use sequencing::{RequestKey, RequestTracker, Ticket};
pub use session::{Completion, Effect, LoadState, RemoteFailure, Session};
pub use slot::{MESSAGE_TTL, MessageSlot};
