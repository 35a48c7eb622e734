/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Replay sweep over buffered state events.
//!
//! Callbacks scheduled for a state that was not yet eligible sit in the
//! pending buffer. Whenever the current state may have moved, the sweep
//! releases every buffered callback that became eligible, lowest state
//! first. Releasing the callback of the current state advances the
//! sequence, which can make the next buffered state eligible in turn, so a
//! single sweep may drain a whole chain.
//!
//! The chain is walked with an explicit work-list loop rather than by
//! recursion, keeping stack depth constant for long sequences.

use super::core::Sequencer;
use super::event::FireTrigger;
use std::fmt;

impl<S: Copy + Ord + fmt::Debug> Sequencer<S> {
    /// Drains every buffered callback that is eligible, cascading through
    /// state advances until no buffered state is eligible.
    ///
    /// If a callback panics, the panic propagates and the callbacks the
    /// sweep had not reached stay buffered for the next call.
    pub(super) fn replay_pending(&mut self) {
        let mut drained = 0usize;

        while let Some(state) = self.next_replayable() {
            self.drain_pending(state);
            drained += 1;
        }

        if drained > 0 {
            tracing::debug!(
                drained,
                remaining = self.pending.len(),
                "replayed buffered state events"
            );
        }
    }

    /// Returns the lowest buffered state that is eligible now.
    ///
    /// Eligible states form a prefix of the buffer's key order, so only the
    /// front of the buffer needs to be inspected.
    fn next_replayable(&self) -> Option<S> {
        match self.current_state() {
            Some(current) => self.pending.range(..=current).next().map(|(state, _)| *state),
            None => self
                .required_states()
                .first()
                .copied()
                .filter(|first| self.pending.contains_key(first)),
        }
    }

    /// Releases the buffered callback for `state` and advances past it when
    /// `state` is the current state.
    fn drain_pending(&mut self, state: S) {
        let update_required = self.current_state().is_some_and(|current| state >= current);

        if let Some(callback) = self.pending.remove(&state) {
            if self.is_locked(state) {
                tracing::trace!(state = ?state, "discarding buffered event for fired state");
            } else {
                self.fire(state, callback, FireTrigger::Replay);
            }
        }

        if update_required {
            self.advance_from(state);
        }
    }
}
