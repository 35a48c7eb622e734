/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Point-in-time view of a Sequencer's progress.

use serde::{Deserialize, Serialize};

/// Serializable snapshot of a [`Sequencer`](super::Sequencer).
///
/// Callbacks are opaque, so the snapshot only records which states hold a
/// buffered callback and how many deferred callbacks are queued.
///
/// # Examples
///
/// ```
/// use event_sorter::Sequencer;
///
/// let mut sequencer = Sequencer::new(vec![1u32, 2, 3]);
/// sequencer.schedule_state_event(1, || {});
/// sequencer.schedule_state_event(3, || {});
///
/// let snapshot = sequencer.snapshot();
/// assert_eq!(snapshot.current_state, Some(2));
/// assert_eq!(snapshot.locked_states, vec![1]);
/// assert_eq!(snapshot.pending_states, vec![3]);
/// assert!(!snapshot.initialized);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerSnapshot<S> {
    /// The required sequence, in declared order.
    pub required_states: Vec<S>,

    /// The most recently reached state, if any.
    pub current_state: Option<S>,

    /// States whose callback has already fired, ascending.
    pub locked_states: Vec<S>,

    /// States holding a buffered callback, ascending.
    pub pending_states: Vec<S>,

    /// Number of deferred callbacks waiting for initialization.
    pub deferred_len: usize,

    /// Total number of callbacks executed so far.
    pub fired_count: u64,

    /// Whether the whole required sequence has been satisfied.
    pub initialized: bool,
}

impl<S> SequencerSnapshot<S> {
    /// Returns `true` if nothing is waiting to fire.
    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending_states.is_empty() && self.deferred_len == 0
    }
}
