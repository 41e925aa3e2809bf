//! Error families produced by the engine.
//!
//! Structural defects come out of validation, simulation errors are scoped to
//! a single word, render errors to a single batch item. None of them abort a
//! batch; the coordinator turns them into result records.

use thiserror::Error;

/// A violation of one of the DFA well-formedness invariants.
///
/// Variants are declared in the order the validator checks them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("automaton has no id")]
    MissingId,

    #[error("automaton has no initial state")]
    MissingInitialState,

    #[error("automaton has no states")]
    MissingStates,

    #[error("automaton has no acceptance states")]
    MissingAcceptStates,

    #[error("automaton has no alphabet")]
    MissingAlphabet,

    #[error("states must be an array of state names")]
    StatesNotSequence,

    #[error("acceptance states must be an array of state names")]
    AcceptStatesNotSequence,

    #[error("alphabet must be an array of symbols")]
    AlphabetNotSequence,

    #[error("initial state `{state}` is not in the states array")]
    InitialStateNotInStates { state: String },

    #[error("acceptance state `{state}` is not in the states array")]
    AcceptStateNotInStates { state: String },

    #[error("state `{state}` has no transitions")]
    MissingTransitionsForState { state: String },

    #[error("state `{state}` has no transition for symbol `{symbol}`")]
    MissingTransition { state: String, symbol: String },

    #[error("transition from `{state}` on `{symbol}` goes to unknown state `{target}`")]
    InvalidTransitionTarget {
        state: String,
        symbol: String,
        target: String,
    },

    #[error("transition from `{state}` uses symbol `{symbol}` which is not in the alphabet")]
    SymbolNotInAlphabet { state: String, symbol: String },
}

/// Raised while reading a word; never fatal for the automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("symbol `{symbol}` is not in the alphabet")]
    SymbolNotInAlphabet { symbol: char },

    #[error("test word `{input}` is not a string")]
    NotText { input: String },
}

/// Failure of the graph rendering collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write graph to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Everything that can turn a single batch item into a failure record.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("unexpected failure while processing automaton: {0}")]
    Panicked(String),
}

/// Whole-request failures, reported instead of a result array.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("invalid input format, must be an array of automata")]
    NotAnArray,

    #[error("request is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StructuralResult<T> = Result<T, StructuralError>;
