/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # event-sorter
//!
//! An in-process ordering buffer for readiness events.
//!
//! Callers register callbacks tagged with a state from a fixed, ordered
//! sequence of required states. The [`Sequencer`] fires them strictly in
//! that order, at most once per state, no matter the order in which they
//! arrive. Callbacks that arrive early are buffered and replayed as soon as
//! the sequence catches up. A second class of callbacks, deferred events,
//! is held until every required state has fired and then flushed in
//! submission order.
//!
//! ```
//! use event_sorter::Sequencer;
//! use std::sync::{Arc, Mutex};
//!
//! let fired = Arc::new(Mutex::new(Vec::new()));
//! let mut sequencer = Sequencer::new(vec![1u8, 2, 3]);
//!
//! for state in [3u8, 1, 2] {
//!     let fired = Arc::clone(&fired);
//!     sequencer.schedule_state_event(state, move || {
//!         if let Ok(mut fired) = fired.lock() {
//!             fired.push(state);
//!         }
//!     });
//! }
//!
//! assert!(sequencer.is_initialized());
//! assert_eq!(*fired.lock().unwrap(), vec![1, 2, 3]);
//! ```
//!
//! The library never installs a `tracing` subscriber; buffering, firing and
//! state advances are reported through `tracing` events for the embedding
//! application to collect.

pub mod sequencer;

pub use sequencer::{
    Callback, EventKind, FireTrigger, Sequencer, SequencerError, SequencerEvent,
    SequencerSnapshot,
};
