//! Normalized in-memory form of a raw automaton definition.
//!
//! Building a model never fails. Whatever shape the input has, the result is a
//! best-effort [`AutomatonModel`]; deciding whether it denotes a DFA is left
//! to the validator.

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

/// Transition table: source state -> symbol -> destination state.
pub type TransitionTable = IndexMap<String, IndexMap<String, String>>;

/// One entry of `test_strings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestWord {
    /// A string, or a number or boolean spelled as JSON text.
    Text(String),
    /// `null`, an array or an object. Holds the entry's JSON text so the
    /// entry still gets a result record.
    NotText(String),
}

impl TestWord {
    fn from_value(value: &Value) -> Self {
        text(Some(value)).map_or_else(|| TestWord::NotText(value.to_string()), TestWord::Text)
    }

    /// The entry as it is echoed back in the response.
    pub fn input(&self) -> &str {
        match self {
            TestWord::Text(word) | TestWord::NotText(word) => word,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TestWord::Text(word) => Some(word.as_str()),
            TestWord::NotText(_) => None,
        }
    }
}

/// A list-valued field as it was supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Members {
    /// A JSON array of names, deduplicated in first-seen order.
    Sequence(IndexSet<String>),
    /// Present, but not an array of strings.
    Malformed {
        /// The value was empty-ish (`null`, `""`, `0`, `false`, `{}`).
        blank: bool,
    },
}

impl Members {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None => Members::default(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect::<Option<IndexSet<String>>>()
                .map_or(Members::Malformed { blank: false }, Members::Sequence),
            Some(other) => Members::Malformed {
                blank: is_blank(other),
            },
        }
    }

    /// Whether the field counts as missing.
    pub fn is_blank(&self) -> bool {
        match self {
            Members::Sequence(names) => names.is_empty(),
            Members::Malformed { blank } => *blank,
        }
    }

    /// The names, if the field is a well-formed sequence.
    pub fn as_sequence(&self) -> Option<&IndexSet<String>> {
        match self {
            Members::Sequence(names) => Some(names),
            Members::Malformed { .. } => None,
        }
    }

    /// Membership test. A malformed field contains nothing.
    pub fn contains(&self, name: &str) -> bool {
        self.as_sequence().is_some_and(|names| names.contains(name))
    }

    /// Iterate over the names in declared order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.as_sequence()
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }
}

impl Default for Members {
    fn default() -> Self {
        Members::Sequence(IndexSet::new())
    }
}

impl<S: Into<String>> FromIterator<S> for Members {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Members::Sequence(iter.into_iter().map(Into::into).collect())
    }
}

/// A parsed automaton definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutomatonModel {
    id: Option<String>,
    name: String,
    initial_state: Option<String>,
    states: Members,
    accept_states: Members,
    alphabet: Members,
    transitions: TransitionTable,
    test_words: Vec<TestWord>,
}

impl AutomatonModel {
    /// Build a model from a raw JSON definition.
    ///
    /// A non-object value yields an empty model.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.as_object().and_then(|object| object.get(key));

        let mut transitions = TransitionTable::new();
        if let Some(Value::Array(records)) = field("transitions") {
            for record in records {
                let (Some(from), Some(symbol), Some(to)) = (
                    text(record.get("from_state")),
                    text(record.get("symbol")),
                    text(record.get("to_state")),
                ) else {
                    continue;
                };
                // Later records for the same (from, symbol) overwrite earlier ones.
                transitions.entry(from).or_default().insert(symbol, to);
            }
        }

        let test_words = match field("test_strings") {
            Some(Value::Array(words)) => words.iter().map(TestWord::from_value).collect(),
            _ => Vec::new(),
        };

        Self {
            id: text(field("id")),
            name: text(field("name")).unwrap_or_default(),
            initial_state: text(field("initial_state")),
            states: Members::from_value(field("states")),
            accept_states: Members::from_value(field("acceptance_states")),
            alphabet: Members::from_value(field("alphabet")),
            transitions,
            test_words,
        }
    }

    /// Build a model from typed parts. Transitions are applied in order, so a
    /// repeated `(from, symbol)` keeps the last destination.
    pub fn new<'a>(
        id: &str,
        initial_state: &str,
        states: impl IntoIterator<Item = &'a str>,
        accept_states: impl IntoIterator<Item = &'a str>,
        alphabet: impl IntoIterator<Item = &'a str>,
        transitions: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    ) -> Self {
        let mut table = TransitionTable::new();
        for (from, symbol, to) in transitions {
            table
                .entry(from.to_owned())
                .or_default()
                .insert(symbol.to_owned(), to.to_owned());
        }

        Self {
            id: Some(id.to_owned()),
            name: String::new(),
            initial_state: Some(initial_state.to_owned()),
            states: states.into_iter().collect(),
            accept_states: accept_states.into_iter().collect(),
            alphabet: alphabet.into_iter().collect(),
            transitions: table,
            test_words: Vec::new(),
        }
    }

    /// Replace the words to evaluate.
    pub fn with_test_words<S: Into<String>>(mut self, words: impl IntoIterator<Item = S>) -> Self {
        self.test_words = words
            .into_iter()
            .map(|word| TestWord::Text(word.into()))
            .collect();
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initial_state(&self) -> Option<&str> {
        self.initial_state.as_deref()
    }

    pub fn states(&self) -> &Members {
        &self.states
    }

    pub fn accept_states(&self) -> &Members {
        &self.accept_states
    }

    pub fn alphabet(&self) -> &Members {
        &self.alphabet
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    /// Destination of `(state, symbol)`, if the table has one.
    pub fn transition(&self, state: &str, symbol: &str) -> Option<&str> {
        self.transitions
            .get(state)
            .and_then(|row| row.get(symbol))
            .map(String::as_str)
    }

    pub fn test_words(&self) -> &[TestWord] {
        &self.test_words
    }
}

impl From<&Value> for AutomatonModel {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}

/// Read a scalar as text. Numbers and booleans keep their JSON spelling.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
