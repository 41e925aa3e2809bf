//! Batch coordinator: one result record per submitted definition.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, info, warn};
use rayon::prelude::*;
use serde_json::Value;

use crate::automaton::{AutomatonModel, ValidatedAutomaton};
use crate::config::{EngineConfig, MISSING_ID};
use crate::error::{BatchError, ItemError, SimulationError};
use crate::protocol::{AutomatonResult, WordResult};
use crate::render::{DotRenderer, GraphRenderer, NullRenderer};

/// Processes batches of raw automaton definitions.
///
/// Items are independent: a failing or panicking item yields a failure record
/// and never affects its siblings. Output order always matches input order.
pub struct BatchProcessor {
    config: EngineConfig,
    renderer: Box<dyn GraphRenderer>,
}

impl BatchProcessor {
    /// Processor with the renderer selected by `config`.
    pub fn new(config: EngineConfig) -> Self {
        let renderer: Box<dyn GraphRenderer> = if config.render_graphs {
            Box::new(DotRenderer::new(config.output_dir.clone()))
        } else {
            Box::new(NullRenderer)
        };
        Self { config, renderer }
    }

    pub fn with_renderer(config: EngineConfig, renderer: impl GraphRenderer + 'static) -> Self {
        Self {
            config,
            renderer: Box::new(renderer),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse a request body and process it.
    pub fn process_json(&self, request: &str) -> Result<Vec<AutomatonResult>, BatchError> {
        let request: Value = serde_json::from_str(request)?;
        self.process_request(&request)
    }

    /// Process a request, which must be an array of definitions.
    pub fn process_request(&self, request: &Value) -> Result<Vec<AutomatonResult>, BatchError> {
        let definitions = request.as_array().ok_or(BatchError::NotAnArray)?;
        Ok(self.process(definitions))
    }

    pub fn process(&self, definitions: &[Value]) -> Vec<AutomatonResult> {
        let results: Vec<AutomatonResult> = if self.config.parallel {
            definitions
                .par_iter()
                .map(|definition| self.process_item(definition))
                .collect()
        } else {
            definitions
                .iter()
                .map(|definition| self.process_item(definition))
                .collect()
        };

        let succeeded = results.iter().filter(|result| result.is_success()).count();
        info!(
            "Processed {} automata: {} succeeded, {} failed",
            results.len(),
            succeeded,
            results.len() - succeeded
        );
        results
    }

    /// Build, validate, simulate and render a single definition.
    pub fn process_item(&self, definition: &Value) -> AutomatonResult {
        let model = AutomatonModel::from_value(definition);
        let id = model.id().filter(|id| !id.is_empty()).unwrap_or(MISSING_ID);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.evaluate(&model)))
            .unwrap_or_else(|payload| Err(ItemError::Panicked(panic_message(payload.as_ref()))));

        match outcome {
            Ok(result) => {
                debug!("Automaton {id} is valid");
                result
            }
            Err(err) => {
                warn!("Automaton {id} failed: {err}");
                AutomatonResult::failure(id, err.to_string())
            }
        }
    }

    fn evaluate(&self, model: &AutomatonModel) -> Result<AutomatonResult, ItemError> {
        let automaton = model.validated()?;
        let inputs_validation = evaluate_words(&automaton);
        let graph = self.renderer.render(&automaton)?;
        Ok(AutomatonResult::success(
            automaton.id(),
            inputs_validation,
            graph,
        ))
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Run every test word of a validated automaton. A bad symbol or a non-text
/// entry only marks its own word.
pub fn evaluate_words(automaton: &ValidatedAutomaton<'_>) -> Vec<WordResult> {
    automaton
        .model()
        .test_words()
        .iter()
        .map(|word| {
            let outcome = match word.as_text() {
                Some(text) => automaton.accepts(text),
                None => Err(SimulationError::NotText {
                    input: word.input().to_owned(),
                }),
            };
            WordResult::new(word.input(), outcome)
        })
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_owned()
    }
}
