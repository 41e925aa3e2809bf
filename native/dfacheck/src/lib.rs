//! Batch validation and word simulation for deterministic finite automata.
//!
//! Definitions arrive as loosely typed JSON, are normalized into an
//! [`AutomatonModel`], checked by [`validate`], and only then run against
//! their test words with [`accepts`]. [`BatchProcessor`] drives whole batches
//! and turns every per-item failure into a result record.

pub mod automaton;
pub mod batch;
pub mod config;
pub mod error;
pub mod protocol;
pub mod render;

#[cfg(feature = "python")]
mod python_bindings;

pub use automaton::{AutomatonModel, Members, TestWord, ValidatedAutomaton, accepts, validate};
pub use batch::BatchProcessor;
pub use config::EngineConfig;
pub use error::{BatchError, ItemError, RenderError, SimulationError, StructuralError};
pub use protocol::{AutomatonResult, ErrorResponse, WordResult};
pub use render::{DotRenderer, GraphRenderer, NullRenderer};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
fn import_submodule<'py>(
    py: Python<'py>,
    m: &Bound<'py, PyModule>,
    package: &str,
    name: &str,
    import_func: impl FnOnce(&Bound<'py, PyModule>) -> PyResult<()>,
) -> PyResult<()> {
    let submodule = PyModule::new(py, name)?;
    import_func(&submodule)?;

    // Make `import dfacheck.<name>` work
    let sys_modules = PyModule::import(py, "sys")?.getattr("modules")?;
    sys_modules.set_item(format!("{package}.{name}"), submodule.clone())?;

    m.add_submodule(&submodule)?;
    Ok(())
}

#[cfg(feature = "python")]
#[pymodule]
fn dfacheck(m: &Bound<'_, PyModule>) -> PyResult<()> {
    import_submodule(m.py(), m, "dfacheck", "automaton", python_bindings::automaton)
}
