/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Core Sequencer implementation.
//!
//! This module provides the Sequencer struct that owns the required state
//! sequence, the per-state lock, the pending buffer and the deferred queue,
//! and exposes the scheduling API on top of them.

use super::error::SequencerError;
use super::event::{EventKind, FireTrigger, SequencerEvent};
use super::snapshot::SequencerSnapshot;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::sync::Arc;

/// A zero-argument, side-effecting action held by the Sequencer.
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Type alias for event listener functions.
type EventListener<S> = Arc<dyn Fn(&SequencerEvent<S>) + Send + Sync>;

/// An ordering buffer for readiness events.
///
/// Callbacks scheduled with [`schedule_state_event`](Self::schedule_state_event)
/// fire in the order of the required sequence and at most once per state,
/// whatever order they arrive in. Callbacks scheduled with
/// [`schedule_deferred_event`](Self::schedule_deferred_event) wait until the
/// whole sequence has fired and then run in submission order.
///
/// Eligibility compares states by value, so the required sequence is
/// expected to be strictly increasing. [`try_new`](Self::try_new) enforces
/// this; [`new`](Self::new) only warns.
///
/// The Sequencer does no internal synchronization. It is `Send` so it can
/// be moved into a thread or wrapped in a mutex by the caller.
///
/// # Examples
///
/// ```
/// use event_sorter::Sequencer;
/// use std::sync::{Arc, Mutex};
///
/// let log = Arc::new(Mutex::new(Vec::new()));
/// let mut sequencer = Sequencer::new(vec![1u8, 2]);
///
/// let deferred_log = Arc::clone(&log);
/// sequencer.schedule_deferred_event(move || {
///     deferred_log.lock().unwrap().push("ready");
/// });
/// sequencer.schedule_state_event(2, || {});
/// assert!(log.lock().unwrap().is_empty());
///
/// sequencer.schedule_state_event(1, || {});
/// assert!(sequencer.is_initialized());
/// assert_eq!(*log.lock().unwrap(), vec!["ready"]);
/// ```
pub struct Sequencer<S> {
    /// The required sequence, in declared order.
    required_states: Vec<S>,

    /// Position of each required state, first occurrence wins.
    positions: BTreeMap<S, usize>,

    /// The most recently reached state.
    current_state: Option<S>,

    /// States whose callback has fired.
    locked: BTreeSet<S>,

    /// At most one callback per state that was not yet eligible.
    pub(super) pending: BTreeMap<S, Callback>,

    /// Callbacks waiting for the whole sequence to be satisfied.
    deferred: VecDeque<Callback>,

    /// Number of callbacks executed so far.
    fired: u64,

    /// Event listeners called synchronously after each callback.
    event_listeners: Vec<EventListener<S>>,
}

impl<S: Copy + Ord + fmt::Debug> Sequencer<S> {
    /// Creates a new Sequencer for the given required sequence.
    ///
    /// An empty sequence yields a Sequencer that is initialized from the
    /// start. A sequence that is not strictly increasing is accepted but
    /// logged, since eligibility is decided by value order.
    ///
    /// # Examples
    ///
    /// ```
    /// use event_sorter::Sequencer;
    ///
    /// let sequencer = Sequencer::new(vec![10u16, 20, 30]);
    /// assert!(!sequencer.is_initialized());
    /// assert_eq!(sequencer.required_states(), &[10, 20, 30]);
    /// ```
    #[must_use]
    pub fn new(required_states: impl Into<Vec<S>>) -> Self {
        Self::with_capacity(required_states, 0)
    }

    /// Creates a new Sequencer with room for `deferred_capacity` deferred
    /// callbacks before the queue reallocates.
    ///
    /// # Arguments
    ///
    /// * `required_states` - The ordered states that must fire before initialization
    /// * `deferred_capacity` - Initial capacity of the deferred queue
    #[must_use]
    pub fn with_capacity(required_states: impl Into<Vec<S>>, deferred_capacity: usize) -> Self {
        let required_states = required_states.into();

        if let Some(pair) = required_states.windows(2).find(|pair| pair[0] >= pair[1]) {
            tracing::warn!(
                previous = ?pair[0],
                current = ?pair[1],
                "required sequence is not strictly increasing; ordering may diverge from declared order"
            );
        }

        let mut positions = BTreeMap::new();
        for (index, state) in required_states.iter().enumerate() {
            positions.entry(*state).or_insert(index);
        }

        Self {
            required_states,
            positions,
            current_state: None,
            locked: BTreeSet::new(),
            pending: BTreeMap::new(),
            deferred: VecDeque::with_capacity(deferred_capacity),
            fired: 0,
            event_listeners: Vec::new(),
        }
    }

    /// Creates a new Sequencer after validating the required sequence.
    ///
    /// # Errors
    ///
    /// - [`SequencerError::DuplicateState`] if a state appears twice
    /// - [`SequencerError::UnorderedStates`] if the sequence is not strictly increasing
    ///
    /// # Examples
    ///
    /// ```
    /// use event_sorter::{Sequencer, SequencerError};
    ///
    /// assert!(Sequencer::try_new(vec![1u8, 2, 3]).is_ok());
    /// assert!(matches!(
    ///     Sequencer::try_new(vec![1u8, 2, 1]),
    ///     Err(SequencerError::DuplicateState { .. })
    /// ));
    /// ```
    pub fn try_new(required_states: impl Into<Vec<S>>) -> Result<Self, SequencerError> {
        let required_states = required_states.into();

        let mut seen = BTreeSet::new();
        if let Some(state) = required_states.iter().find(|state| !seen.insert(**state)) {
            return Err(SequencerError::duplicate(state));
        }

        if let Some(pair) = required_states.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(SequencerError::unordered(&pair[0], &pair[1]));
        }

        Ok(Self::new(required_states))
    }

    /// Registers an event listener.
    ///
    /// Listeners are called synchronously, in registration order, after
    /// every callback the Sequencer executes.
    ///
    /// # Arguments
    ///
    /// * `listener` - Function to call for each event
    pub fn add_listener<F>(&mut self, listener: F)
    where
        F: Fn(&SequencerEvent<S>) + Send + Sync + 'static,
    {
        self.event_listeners.push(Arc::new(listener));
    }

    /// Returns `true` once every required state has fired.
    ///
    /// Always `true` for an empty required sequence. Otherwise `true` from
    /// the moment the callback of the last required state has run; the
    /// current state reaches the last entry earlier, as soon as the state
    /// before it fires. Once `true`, it stays `true`.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.required_states
            .last()
            .is_none_or(|last| self.locked.contains(last))
    }

    /// Schedules `callback` to run when `state` is reached.
    ///
    /// - If `state` is eligible now and has not fired yet, `callback` runs
    ///   immediately and the sequence advances past `state`.
    /// - If `state` has already fired, the call is a no-op.
    /// - Otherwise `callback` is buffered, replacing any callback already
    ///   buffered for `state`, and runs once the sequence catches up.
    ///
    /// Every call ends with a replay sweep over the buffer, so a single
    /// call may release a chain of buffered callbacks. When the call
    /// completes the sequence, queued deferred callbacks run before it
    /// returns.
    ///
    /// Scheduling a state that is not part of the required sequence is a
    /// caller error: it never moves the sequence forward. Use
    /// [`try_schedule_state_event`](Self::try_schedule_state_event) to
    /// reject such states instead.
    pub fn schedule_state_event<F>(&mut self, state: S, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_initialized() {
            self.flush_deferred();

            if self.is_locked(state) {
                tracing::trace!(state = ?state, "state already fired, ignoring");
            } else {
                self.fire(state, callback, FireTrigger::PostInit);
            }
            return;
        }

        if !self.positions.contains_key(&state) {
            tracing::warn!(state = ?state, "scheduled state is not part of the required sequence");
        }

        if self.is_eligible(state) {
            if self.is_locked(state) {
                tracing::trace!(state = ?state, "state already fired, ignoring");
            } else {
                self.fire(state, callback, FireTrigger::Immediate);
                self.advance_from(state);
            }
        } else if self.pending.insert(state, Box::new(callback)).is_some() {
            tracing::trace!(state = ?state, "replaced buffered state event");
        } else {
            tracing::trace!(state = ?state, "buffered state event");
        }

        self.replay_pending();

        if self.is_initialized() {
            self.discard_unreachable();
            self.flush_deferred();
        }
    }

    /// Like [`schedule_state_event`](Self::schedule_state_event), but
    /// rejects states outside the required sequence.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::UnknownState`] if `state` is not part of
    /// the required sequence. `callback` is dropped without running.
    pub fn try_schedule_state_event<F>(&mut self, state: S, callback: F) -> Result<(), SequencerError>
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.positions.contains_key(&state) {
            return Err(SequencerError::unknown(&state));
        }
        self.schedule_state_event(state, callback);
        Ok(())
    }

    /// Schedules `callback` to run once the whole sequence has fired.
    ///
    /// Runs immediately if the Sequencer is already initialized; otherwise
    /// the callback is queued behind any earlier deferred callbacks.
    pub fn schedule_deferred_event<F>(&mut self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_initialized() {
            callback();
            self.emit(EventKind::Deferred);
        } else {
            self.deferred.push_back(Box::new(callback));
            tracing::trace!(queued = self.deferred.len(), "queued deferred event");
        }
    }

    /// Returns the required sequence.
    #[must_use]
    pub fn required_states(&self) -> &[S] {
        &self.required_states
    }

    /// Returns the most recently reached state, or `None` before the first
    /// state fires.
    #[inline]
    #[must_use]
    pub fn current_state(&self) -> Option<S> {
        self.current_state
    }

    /// Returns `true` if the callback for `state` has already fired.
    #[inline]
    #[must_use]
    pub fn is_locked(&self, state: S) -> bool {
        self.locked.contains(&state)
    }

    /// Returns `true` if a callback is buffered for `state`.
    #[inline]
    #[must_use]
    pub fn is_pending(&self, state: S) -> bool {
        self.pending.contains_key(&state)
    }

    /// Returns the states holding a buffered callback, ascending.
    #[must_use]
    pub fn pending_states(&self) -> Vec<S> {
        self.pending.keys().copied().collect()
    }

    /// Returns the number of queued deferred callbacks.
    #[inline]
    #[must_use]
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Returns the total number of callbacks executed so far.
    #[inline]
    #[must_use]
    pub fn fired_count(&self) -> u64 {
        self.fired
    }

    /// Captures the current progress as a serializable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SequencerSnapshot<S> {
        SequencerSnapshot {
            required_states: self.required_states.clone(),
            current_state: self.current_state,
            locked_states: self.locked.iter().copied().collect(),
            pending_states: self.pending_states(),
            deferred_len: self.deferred.len(),
            fired_count: self.fired,
            initialized: self.is_initialized(),
        }
    }

    /// Returns `true` if `state` may fire given the current progress.
    fn is_eligible(&self, state: S) -> bool {
        match self.current_state {
            Some(current) => state <= current,
            None => self.required_states.first() == Some(&state),
        }
    }

    /// Runs a state callback, locks the state and notifies listeners.
    ///
    /// The lock is taken after the callback returns, so a panicking
    /// callback leaves its state unlocked.
    pub(super) fn fire<F>(&mut self, state: S, callback: F, trigger: FireTrigger)
    where
        F: FnOnce(),
    {
        callback();
        self.locked.insert(state);
        tracing::trace!(state = ?state, trigger = ?trigger, "fired state event");
        self.emit(EventKind::State { state, trigger });
    }

    /// Moves the current state to the successor of `state`.
    ///
    /// States outside the required sequence never move the pointer.
    pub(super) fn advance_from(&mut self, state: S) {
        if !self.positions.contains_key(&state) {
            return;
        }

        let next = self.find_next_state(state);
        self.current_state = Some(next);
        tracing::debug!(from = ?state, to = ?next, "advanced current state");

        if self.is_initialized() {
            tracing::debug!(
                deferred = self.deferred.len(),
                "required sequence satisfied"
            );
        }
    }

    /// Returns the state following `state` in the required sequence, or
    /// `state` itself if it is the last entry or not in the sequence.
    #[must_use]
    pub fn find_next_state(&self, state: S) -> S {
        self.positions
            .get(&state)
            .and_then(|index| self.required_states.get(index + 1))
            .copied()
            .unwrap_or(state)
    }

    /// Drops buffered callbacks left over once the sequence is satisfied.
    ///
    /// Only states outside the required sequence can remain here, and the
    /// current state no longer moves, so they would never fire. A later
    /// submission of such a state runs through the post-init path.
    fn discard_unreachable(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let discarded: Vec<S> = self.pending.keys().copied().collect();
        self.pending.clear();
        tracing::warn!(
            states = ?discarded,
            "discarded buffered events for states outside the required sequence"
        );
    }

    /// Runs every queued deferred callback in submission order.
    ///
    /// Callbacks are popped one at a time, so a panic leaves the ones
    /// behind it queued.
    fn flush_deferred(&mut self) {
        if self.deferred.is_empty() {
            return;
        }

        tracing::debug!(count = self.deferred.len(), "flushing deferred events");
        while let Some(callback) = self.deferred.pop_front() {
            callback();
            self.emit(EventKind::Deferred);
        }
    }

    /// Counts a fired callback and notifies listeners.
    fn emit(&mut self, kind: EventKind<S>) {
        self.fired = self.fired.saturating_add(1);

        if self.event_listeners.is_empty() {
            return;
        }

        let event = SequencerEvent::new(self.fired, nanos_since_epoch(), kind);
        for listener in &self.event_listeners {
            listener(&event);
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Sequencer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequencer")
            .field("required_states", &self.required_states)
            .field("current_state", &self.current_state)
            .field("locked", &self.locked)
            .field("pending", &self.pending.keys().collect::<Vec<_>>())
            .field("deferred", &self.deferred.len())
            .field("fired", &self.fired)
            .field("listeners", &self.event_listeners.len())
            .finish()
    }
}

/// Returns the current time in nanoseconds since the Unix epoch.
#[inline]
fn nanos_since_epoch() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
