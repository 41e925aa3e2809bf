//! PyO3 bindings for the automaton engine.
//!
//! Lets a Python web front end hand request bodies to the batch coordinator
//! and inspect single automata.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::automaton::AutomatonModel;
use crate::batch::BatchProcessor;
use crate::config::EngineConfig;
use crate::protocol::ErrorResponse;
use crate::render;

/// A parsed automaton definition.
#[pyclass(name = "Automaton", module = "dfacheck.automaton", frozen)]
pub struct PyAutomaton {
    model: AutomatonModel,
}

#[pymethods]
impl PyAutomaton {
    /// Parse a single definition from its JSON text.
    #[staticmethod]
    fn from_json(text: &str) -> PyResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self {
            model: AutomatonModel::from_value(&value),
        })
    }

    /// Raise `ValueError` describing the first structural defect, if any.
    fn validate(&self) -> PyResult<()> {
        self.model
            .validated()
            .map(|_| ())
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn is_valid(&self) -> bool {
        self.model.validated().is_ok()
    }

    /// Whether the automaton accepts `word`. Validates first.
    fn accepts(&self, word: &str) -> PyResult<bool> {
        let automaton = self
            .model
            .validated()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        automaton
            .accepts(word)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Graphviz DOT source for the automaton. Validates first.
    fn to_dot(&self) -> PyResult<String> {
        let automaton = self
            .model
            .validated()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(render::to_dot(&automaton))
    }

    #[getter]
    fn id(&self) -> Option<String> {
        self.model.id().map(str::to_owned)
    }

    #[getter]
    fn name(&self) -> String {
        self.model.name().to_owned()
    }

    #[getter]
    fn initial_state(&self) -> Option<String> {
        self.model.initial_state().map(str::to_owned)
    }

    #[getter]
    fn states(&self) -> Vec<String> {
        self.model.states().iter().map(str::to_owned).collect()
    }

    #[getter]
    fn accept_states(&self) -> Vec<String> {
        self.model.accept_states().iter().map(str::to_owned).collect()
    }

    #[getter]
    fn alphabet(&self) -> Vec<String> {
        self.model.alphabet().iter().map(str::to_owned).collect()
    }

    #[getter]
    fn test_words(&self) -> Vec<String> {
        self.model
            .test_words()
            .iter()
            .map(|word| word.input().to_owned())
            .collect()
    }

    fn __repr__(&self) -> String {
        format!("Automaton(id={:?})", self.model.id().unwrap_or_default())
    }
}

/// Process a JSON batch request and return the JSON response.
///
/// A request that is not an array of definitions raises `ValueError`
/// carrying the error response body.
#[pyfunction]
#[pyo3(signature = (request, output_dir = None, render_graphs = true, parallel = false))]
fn process_automata(
    request: &str,
    output_dir: Option<String>,
    render_graphs: bool,
    parallel: bool,
) -> PyResult<String> {
    let mut config = EngineConfig {
        render_graphs,
        parallel,
        ..EngineConfig::default()
    };
    if let Some(dir) = output_dir {
        config.output_dir = dir.into();
    }

    let results = BatchProcessor::new(config).process_json(request).map_err(|e| {
        let body = ErrorResponse {
            error: e.to_string(),
        };
        PyValueError::new_err(serde_json::to_string(&body).unwrap_or_else(|_| e.to_string()))
    })?;
    serde_json::to_string(&results).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Register the automaton submodule.
pub fn automaton(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyAutomaton>()?;
    m.add_function(wrap_pyfunction!(process_automata, m)?)?;
    Ok(())
}
