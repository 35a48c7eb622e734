/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Sequencer module for ordering readiness events.
//!
//! This module provides a single-threaded Sequencer that fires callbacks in
//! the order of a fixed sequence of required states, regardless of the
//! order in which they are scheduled, and holds deferred callbacks until
//! the whole sequence has been satisfied.
//!
//! # Architecture
//!
//! - Eligibility: a state may fire once the sequence has reached it
//! - Lock: each state fires at most once
//! - Buffer: callbacks for states not yet eligible wait, one per state
//! - Replay: every state advance re-scans the buffer and drains what became
//!   eligible, lowest state first
//! - Deferred queue: post-initialization callbacks wait for the last
//!   required state, then run in submission order
//! - Events are emitted to registered listeners after every callback
//!
//! # Examples
//!
//! ```
//! use event_sorter::sequencer::{EventKind, Sequencer};
//! use std::sync::{Arc, Mutex};
//!
//! let mut sequencer = Sequencer::new(vec![1u8, 2, 3, 4]);
//!
//! // Register an event listener
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let seen_clone = Arc::clone(&seen);
//! sequencer.add_listener(move |event| {
//!     if let EventKind::State { state, .. } = event.kind {
//!         seen_clone.lock().unwrap().push(state);
//!     }
//! });
//!
//! // Out-of-order arrivals are buffered and replayed in order
//! for state in [1u8, 4, 3, 2] {
//!     sequencer.schedule_state_event(state, || {});
//! }
//!
//! assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
//! ```

pub mod core;
pub mod error;
pub mod event;
pub mod replay;
pub mod snapshot;

#[cfg(test)]
mod tests;

// Re-export main types
pub use self::core::{Callback, Sequencer};
pub use error::SequencerError;
pub use event::{EventKind, FireTrigger, SequencerEvent};
pub use snapshot::SequencerSnapshot;
