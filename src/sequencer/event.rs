/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Sequencer event types.
//!
//! This module defines the events delivered to listeners each time the
//! Sequencer executes a callback.

use serde::{Deserialize, Serialize};

/// What caused a state callback to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireTrigger {
    /// The state was eligible when it was scheduled.
    Immediate,

    /// The callback was buffered and released by the replay sweep.
    Replay,

    /// The state was scheduled after initialization completed.
    PostInit,
}

/// The kind of callback that was executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind<S> {
    /// A callback tagged with a required state.
    State {
        /// The state the callback was registered for.
        state: S,
        /// How the callback was released.
        trigger: FireTrigger,
    },

    /// A deferred callback released once the sequence was satisfied.
    Deferred,
}

/// Event emitted after the Sequencer executes a callback.
///
/// Events are emitted in execution order and can be used for auditing or
/// real-time monitoring of the readiness sequence.
///
/// # Examples
///
/// ```
/// use event_sorter::{EventKind, FireTrigger, SequencerEvent};
///
/// let event = SequencerEvent::new(
///     1,
///     1_234_567_890,
///     EventKind::State { state: 2u8, trigger: FireTrigger::Replay },
/// );
/// assert_eq!(event.sequence_num, 1);
/// assert_eq!(event.state(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerEvent<S> {
    /// Monotonically increasing firing counter, starting at 1.
    pub sequence_num: u64,

    /// Nanosecond timestamp taken right after the callback returned.
    pub timestamp_ns: u64,

    /// Which callback ran.
    pub kind: EventKind<S>,
}

impl<S: Copy> SequencerEvent<S> {
    /// Creates a new sequencer event.
    #[must_use]
    pub fn new(sequence_num: u64, timestamp_ns: u64, kind: EventKind<S>) -> Self {
        Self {
            sequence_num,
            timestamp_ns,
            kind,
        }
    }

    /// Returns the state of a state event, or `None` for deferred events.
    #[inline]
    #[must_use]
    pub fn state(&self) -> Option<S> {
        match self.kind {
            EventKind::State { state, .. } => Some(state),
            EventKind::Deferred => None,
        }
    }

    /// Returns `true` if this event reports a deferred callback.
    #[inline]
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        matches!(self.kind, EventKind::Deferred)
    }
}
