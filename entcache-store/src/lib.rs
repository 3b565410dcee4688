//! Reactive state container for entcache.
//!
//! # Architecture
//!
//! - **State**: one [`EntityState`] per registered key, collected in a
//!   [`GlobalState`] map. Keys are independent partitions; mutating one
//!   entity never touches another.
//! - **Reducer**: [`reduce`] is a pure function from (state, action) to
//!   the next state, encoding the per-verb merge semantics. It has no
//!   locking and no I/O and is testable on its own.
//! - **Store**: [`Store`] owns the current state, applies actions
//!   atomically, and notifies subscribers before `dispatch` returns.
//!
//! Record sequences live behind `Arc`, so a transition that leaves an
//! entity's data untouched preserves pointer identity and subscribers can
//! detect real changes cheaply.

mod reducer;
mod state;
mod store;

pub use reducer::reduce;
pub use state::{EntityState, GlobalState, DEFAULT_IDENT_FIELD};
pub use store::{Store, StoreEvent, Subscription};
