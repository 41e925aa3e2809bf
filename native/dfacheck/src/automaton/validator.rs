//! Structural validation of automaton models.

use indexmap::IndexSet;

use crate::automaton::model::{AutomatonModel, TransitionTable};
use crate::automaton::simulator;
use crate::error::{SimulationError, StructuralError, StructuralResult};

/// Check that `model` denotes a legal, total DFA.
///
/// Reports the first violated invariant. The checks run in a fixed order:
/// presence of every required field, sequence shape of the list fields,
/// membership of the initial and accepting states, totality of the transition
/// table over `states × alphabet`, then closure of transition targets and of
/// transition symbols.
pub fn validate(model: &AutomatonModel) -> StructuralResult<()> {
    ValidatedAutomaton::new(model).map(|_| ())
}

/// A borrowed view of a model that passed [`validate`].
///
/// Only obtainable through validation, so holding one is proof the automaton
/// is total and closed.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedAutomaton<'a> {
    model: &'a AutomatonModel,
    id: &'a str,
    initial_state: &'a str,
    states: &'a IndexSet<String>,
    accept_states: &'a IndexSet<String>,
    alphabet: &'a IndexSet<String>,
}

impl<'a> ValidatedAutomaton<'a> {
    fn new(model: &'a AutomatonModel) -> StructuralResult<Self> {
        let id = model
            .id()
            .filter(|id| !id.is_empty())
            .ok_or(StructuralError::MissingId)?;
        let initial_state = model
            .initial_state()
            .filter(|state| !state.is_empty())
            .ok_or(StructuralError::MissingInitialState)?;
        if model.states().is_blank() {
            return Err(StructuralError::MissingStates);
        }
        if model.accept_states().is_blank() {
            return Err(StructuralError::MissingAcceptStates);
        }
        if model.alphabet().is_blank() {
            return Err(StructuralError::MissingAlphabet);
        }

        let states = model
            .states()
            .as_sequence()
            .ok_or(StructuralError::StatesNotSequence)?;
        let accept_states = model
            .accept_states()
            .as_sequence()
            .ok_or(StructuralError::AcceptStatesNotSequence)?;
        let alphabet = model
            .alphabet()
            .as_sequence()
            .ok_or(StructuralError::AlphabetNotSequence)?;

        if !states.contains(initial_state) {
            return Err(StructuralError::InitialStateNotInStates {
                state: initial_state.to_owned(),
            });
        }
        if let Some(state) = accept_states.iter().find(|state| !states.contains(*state)) {
            return Err(StructuralError::AcceptStateNotInStates {
                state: state.clone(),
            });
        }

        check_totality(model.transitions(), states, alphabet)?;
        check_closure(model.transitions(), states, alphabet)?;

        Ok(Self {
            model,
            id,
            initial_state,
            states,
            accept_states,
            alphabet,
        })
    }

    pub fn model(&self) -> &'a AutomatonModel {
        self.model
    }

    pub fn id(&self) -> &'a str {
        self.id
    }

    pub fn initial_state(&self) -> &'a str {
        self.initial_state
    }

    pub fn states(&self) -> &'a IndexSet<String> {
        self.states
    }

    pub fn accept_states(&self) -> &'a IndexSet<String> {
        self.accept_states
    }

    pub fn alphabet(&self) -> &'a IndexSet<String> {
        self.alphabet
    }

    pub fn transitions(&self) -> &'a TransitionTable {
        self.model.transitions()
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.accept_states.contains(state)
    }

    /// Decide whether `word` is accepted.
    pub fn accepts(&self, word: &str) -> Result<bool, SimulationError> {
        simulator::accepts(self.model, word)
    }
}

impl AutomatonModel {
    /// Validate and return a view usable for simulation and rendering.
    pub fn validated(&self) -> StructuralResult<ValidatedAutomaton<'_>> {
        ValidatedAutomaton::new(self)
    }
}

/// Every `(state, symbol)` in `states × alphabet` has an entry.
fn check_totality(
    transitions: &TransitionTable,
    states: &IndexSet<String>,
    alphabet: &IndexSet<String>,
) -> StructuralResult<()> {
    for state in states {
        let Some(row) = transitions.get(state) else {
            return Err(StructuralError::MissingTransitionsForState {
                state: state.clone(),
            });
        };
        if let Some(symbol) = alphabet.iter().find(|symbol| !row.contains_key(*symbol)) {
            return Err(StructuralError::MissingTransition {
                state: state.clone(),
                symbol: symbol.clone(),
            });
        }
    }
    Ok(())
}

/// Every destination is a declared state and every symbol is in the alphabet.
fn check_closure(
    transitions: &TransitionTable,
    states: &IndexSet<String>,
    alphabet: &IndexSet<String>,
) -> StructuralResult<()> {
    let entries = || {
        transitions
            .iter()
            .flat_map(|(state, row)| row.iter().map(move |(symbol, target)| (state, symbol, target)))
    };

    if let Some((state, symbol, target)) = entries().find(|(_, _, target)| !states.contains(*target)) {
        return Err(StructuralError::InvalidTransitionTarget {
            state: state.clone(),
            symbol: symbol.clone(),
            target: target.clone(),
        });
    }
    if let Some((state, symbol, _)) = entries().find(|(_, symbol, _)| !alphabet.contains(*symbol)) {
        return Err(StructuralError::SymbolNotInAlphabet {
            state: state.clone(),
            symbol: symbol.clone(),
        });
    }
    Ok(())
}
