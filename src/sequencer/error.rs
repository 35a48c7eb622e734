/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Errors reported by the strict Sequencer API.
//!
//! The lenient API ([`Sequencer::new`], [`Sequencer::schedule_state_event`])
//! never fails. The `try_*` variants validate caller input up front and
//! report misuse through [`SequencerError`].
//!
//! [`Sequencer::new`]: super::Sequencer::new
//! [`Sequencer::schedule_state_event`]: super::Sequencer::schedule_state_event

use thiserror::Error;

/// Errors that can occur when constructing or driving a Sequencer strictly.
///
/// States are carried as their `Debug` rendering so the error type does not
/// depend on the state identifier type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequencerError {
    /// The same state appears more than once in the required sequence.
    #[error("state {state} appears more than once in the required sequence")]
    DuplicateState {
        /// The repeated state.
        state: String,
    },

    /// The required sequence is not strictly increasing in value order.
    #[error("required sequence is not strictly increasing: {current} follows {previous}")]
    UnorderedStates {
        /// The state preceding the offending entry.
        previous: String,
        /// The entry that is not greater than its predecessor.
        current: String,
    },

    /// A state was scheduled that is not part of the required sequence.
    #[error("state {state} is not part of the required sequence")]
    UnknownState {
        /// The unknown state.
        state: String,
    },
}

impl SequencerError {
    pub(crate) fn duplicate<S: std::fmt::Debug>(state: &S) -> Self {
        Self::DuplicateState {
            state: format!("{state:?}"),
        }
    }

    pub(crate) fn unordered<S: std::fmt::Debug>(previous: &S, current: &S) -> Self {
        Self::UnorderedStates {
            previous: format!("{previous:?}"),
            current: format!("{current:?}"),
        }
    }

    pub(crate) fn unknown<S: std::fmt::Debug>(state: &S) -> Self {
        Self::UnknownState {
            state: format!("{state:?}"),
        }
    }
}
