//! Word acceptance by deterministic transition-following.

use crate::automaton::model::AutomatonModel;
use crate::error::SimulationError;

/// Decide whether `model` accepts `word`.
///
/// Every `char` of the word is one input symbol. A symbol outside the
/// alphabet is an error rather than a rejection. A missing transition for an
/// in-alphabet symbol cannot happen on a validated model; if it does the word
/// is rejected.
pub fn accepts(model: &AutomatonModel, word: &str) -> Result<bool, SimulationError> {
    let Some(mut state) = model.initial_state() else {
        return Ok(false);
    };

    let mut buf = [0u8; 4];
    for symbol in word.chars() {
        let key: &str = symbol.encode_utf8(&mut buf);
        if !model.alphabet().contains(key) {
            return Err(SimulationError::SymbolNotInAlphabet { symbol });
        }
        match model.transition(state, key) {
            Some(next) => state = next,
            None => return Ok(false),
        }
    }

    Ok(model.accept_states().contains(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts words with an even number of `1`s.
    fn parity() -> AutomatonModel {
        AutomatonModel::new(
            "parity",
            "q0",
            ["q0", "q1"],
            ["q0"],
            ["0", "1"],
            [
                ("q0", "0", "q0"),
                ("q0", "1", "q1"),
                ("q1", "0", "q1"),
                ("q1", "1", "q0"),
            ],
        )
    }

    #[test]
    fn test_parity_words() {
        let model = parity();
        assert_eq!(accepts(&model, "0"), Ok(true));
        assert_eq!(accepts(&model, "10"), Ok(false));
        assert_eq!(accepts(&model, "11"), Ok(true));
        assert_eq!(accepts(&model, "01"), Ok(false));
        assert_eq!(accepts(&model, "1110"), Ok(false));
    }

    #[test]
    fn test_ends_in_zero_automaton() {
        // q1 falls back to q0 on `0`, so this accepts the empty word and
        // every word ending in `0`, regardless of how many `1`s it holds.
        let model = AutomatonModel::new("last-zero", "q0", ["q0", "q1"], ["q0"], ["0", "1"], [
            ("q0", "0", "q0"),
            ("q0", "1", "q1"),
            ("q1", "0", "q0"),
            ("q1", "1", "q1"),
        ]);
        assert_eq!(accepts(&model, "0"), Ok(true));
        assert_eq!(accepts(&model, "10"), Ok(true));
        assert_eq!(accepts(&model, "1"), Ok(false));
        assert_eq!(accepts(&model, ""), Ok(true));
    }

    #[test]
    fn test_empty_word() {
        let model = parity();
        assert_eq!(accepts(&model, ""), Ok(true));

        let model = AutomatonModel::new("m", "a", ["a", "b"], ["b"], ["x"], [("a", "x", "b"), ("b", "x", "b")]);
        assert_eq!(accepts(&model, ""), Ok(false));
        assert_eq!(accepts(&model, "x"), Ok(true));
    }

    #[test]
    fn test_symbol_not_in_alphabet() {
        let model = parity();
        assert_eq!(
            accepts(&model, "012"),
            Err(SimulationError::SymbolNotInAlphabet { symbol: '2' })
        );
        assert_eq!(
            accepts(&model, "é"),
            Err(SimulationError::SymbolNotInAlphabet { symbol: 'é' })
        );
    }

    #[test]
    fn test_multibyte_symbols() {
        let model = AutomatonModel::new("m", "a", ["a", "b"], ["b"], ["α", "β"], [
            ("a", "α", "b"),
            ("a", "β", "a"),
            ("b", "α", "b"),
            ("b", "β", "a"),
        ]);
        assert_eq!(accepts(&model, "βα"), Ok(true));
        assert_eq!(accepts(&model, "αβ"), Ok(false));
    }

    #[test]
    fn test_missing_transition_rejects() {
        let model = AutomatonModel::new("m", "a", ["a", "b"], ["b"], ["x", "y"], [("a", "x", "b")]);
        assert_eq!(accepts(&model, "x"), Ok(true));
        assert_eq!(accepts(&model, "y"), Ok(false));
        // Rejection happens before the out-of-alphabet symbol is read.
        assert_eq!(accepts(&model, "yz"), Ok(false));
    }

    #[test]
    fn test_deterministic() {
        let model = parity();
        for word in ["", "1", "0110", "111"] {
            let first = accepts(&model, word);
            assert!((0..5).all(|_| accepts(&model, word) == first));
        }
    }

    #[test]
    fn test_long_word_is_iterative() {
        let model = parity();
        let word = "1".repeat(1_000_000);
        assert_eq!(accepts(&model, &word), Ok(true));
    }
}
