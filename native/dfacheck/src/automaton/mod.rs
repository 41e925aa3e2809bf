//! Deterministic finite automaton engine.
//!
//! This module provides:
//! - A total parse from loosely typed JSON into [`AutomatonModel`]
//! - Structural validation reporting the first violated invariant
//! - Iterative word simulation on validated models

mod model;
mod simulator;
mod validator;

pub use model::{AutomatonModel, Members, TestWord, TransitionTable};
pub use simulator::accepts;
pub use validator::{ValidatedAutomaton, validate};
