//! Graph rendering of validated automata.
//!
//! The batch coordinator only sees the [`GraphRenderer`] trait and treats the
//! returned string as an opaque handle. [`DotRenderer`] writes Graphviz DOT
//! files; [`NullRenderer`] renders nothing.

use std::fmt::Write as _;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use chrono::Local;
use indexmap::IndexSet;
use log::info;

use crate::automaton::ValidatedAutomaton;
use crate::error::RenderError;

/// A labeled edge in the graph representation: (source, destination, label).
pub type GraphEdge<'a> = (&'a str, &'a str, &'a str);

/// Produces an artifact for a validated automaton and returns its handle.
pub trait GraphRenderer: Send + Sync {
    fn render(&self, automaton: &ValidatedAutomaton<'_>) -> Result<String, RenderError>;
}

/// Renders nothing; the handle is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl GraphRenderer for NullRenderer {
    fn render(&self, _automaton: &ValidatedAutomaton<'_>) -> Result<String, RenderError> {
        Ok(String::new())
    }
}

/// Writes `{id}_{timestamp}.dot` files into a directory. A name that is
/// already taken gets a `-{n}` suffix, so every render has its own file.
#[derive(Debug, Clone)]
pub struct DotRenderer {
    output_dir: PathBuf,
}

impl DotRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl GraphRenderer for DotRenderer {
    fn render(&self, automaton: &ValidatedAutomaton<'_>) -> Result<String, RenderError> {
        fs::create_dir_all(&self.output_dir).map_err(io_error(&self.output_dir))?;

        let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S%.3f");
        let stem = format!("{}_{stamp}", file_stem(automaton.id()));
        let (path, mut file) = create_unique(&self.output_dir, &stem)?;
        file.write_all(to_dot(automaton).as_bytes()).map_err(io_error(&path))?;

        let handle = path.display().to_string();
        info!("Graph is ready: {handle}");
        Ok(handle)
    }
}

/// Convert to a graph representation.
/// Returns: (nodes, edges). Nodes are the declared states followed by any
/// transition source that was not declared.
pub fn to_graph<'a>(automaton: &ValidatedAutomaton<'a>) -> (Vec<&'a str>, Vec<GraphEdge<'a>>) {
    let transitions = automaton.transitions();

    let nodes: IndexSet<&str> = automaton
        .states()
        .iter()
        .chain(transitions.keys())
        .map(String::as_str)
        .collect();

    let edges = transitions
        .iter()
        .flat_map(|(src, row)| {
            row.iter()
                .map(move |(symbol, dst)| (src.as_str(), dst.as_str(), symbol.as_str()))
        })
        .collect();

    (nodes.into_iter().collect(), edges)
}

/// Graphviz DOT text for the automaton: left to right, an unlabeled entry
/// arrow into the initial state, accepting states drawn as double circles.
pub fn to_dot(automaton: &ValidatedAutomaton<'_>) -> String {
    let (nodes, edges) = to_graph(automaton);
    let index: IndexSet<&str> = nodes.iter().copied().collect();
    let node_id = |name: &str| index.get_index_of(name).map_or_else(String::new, |i| format!("n{i}"));

    let mut dot = String::new();
    let _ = writeln!(dot, "digraph \"{}\" {{", escape(automaton.id()));
    dot.push_str("    rankdir=LR;\n");
    dot.push_str("    node [color=purple];\n");
    dot.push_str("    edge [color=purple];\n");
    dot.push_str("    start [shape=none, label=\"\"];\n");
    let _ = writeln!(
        dot,
        "    start -> {} [label=\"start\"];",
        node_id(automaton.initial_state())
    );

    for &name in &nodes {
        let shape = if automaton.is_accepting(name) {
            "doublecircle"
        } else {
            "circle"
        };
        let _ = writeln!(
            dot,
            "    {} [shape={shape}, label=\"{}\"];",
            node_id(name),
            escape(name)
        );
    }

    for (src, dst, label) in edges {
        let _ = writeln!(
            dot,
            "    {} -> {} [label=\"{}\"];",
            node_id(src),
            node_id(dst),
            escape(label)
        );
    }

    dot.push_str("}\n");
    dot
}

/// Claim `{stem}.dot`, or the first free `{stem}-{n}.dot`.
fn create_unique(dir: &Path, stem: &str) -> Result<(PathBuf, File), RenderError> {
    let mut attempt = 0usize;
    loop {
        let name = match attempt {
            0 => format!("{stem}.dot"),
            n => format!("{stem}-{n}.dot"),
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(err) => return Err(io_error(&path)(err)),
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> RenderError {
    let path = path.display().to_string();
    move |source| RenderError::Io { path, source }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Keep ids from escaping the output directory.
fn file_stem(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::AutomatonModel;

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
    fn test_to_graph() {
        let model = parity();
        let automaton = model.validated().unwrap();
        let (nodes, edges) = to_graph(&automaton);
        assert_eq!(nodes, ["q0", "q1"]);
        assert_eq!(edges.len(), 4);
        assert!(edges.contains(&("q0", "q1", "1")));
    }

    #[test]
    fn test_to_graph_includes_undeclared_sources() {
        let model = AutomatonModel::new(
            "m",
            "a",
            ["a"],
            ["a"],
            ["x"],
            [("a", "x", "a"), ("orphan", "x", "a")],
        );
        let automaton = model.validated().unwrap();
        let (nodes, _) = to_graph(&automaton);
        assert_eq!(nodes, ["a", "orphan"]);
    }

    #[test]
    fn test_to_dot() {
        let model = parity();
        let dot = to_dot(&model.validated().unwrap());
        assert!(dot.starts_with("digraph \"parity\" {"));
        assert!(dot.contains("rankdir=LR;"));
        assert!(dot.contains("start -> n0 [label=\"start\"];"));
        assert!(dot.contains("n0 [shape=doublecircle, label=\"q0\"];"));
        assert!(dot.contains("n1 [shape=circle, label=\"q1\"];"));
        assert!(dot.contains("n0 -> n1 [label=\"1\"];"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_to_dot_escapes_names() {
        let model = AutomatonModel::new("q\"x", "a\"b", ["a\"b"], ["a\"b"], ["\\"], [("a\"b", "\\", "a\"b")]);
        let dot = to_dot(&model.validated().unwrap());
        assert!(dot.contains("digraph \"q\\\"x\""));
        assert!(dot.contains("label=\"a\\\"b\""));
        assert!(dot.contains("[label=\"\\\\\"]"));
    }

    #[test]
    fn test_dot_renderer_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = DotRenderer::new(dir.path().join("graphs"));
        let model = parity();

        let handle = renderer.render(&model.validated().unwrap()).unwrap();
        let path = PathBuf::from(&handle);
        assert!(path.starts_with(dir.path().join("graphs")));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("parity_"));
        assert!(fs::read_to_string(&path).unwrap().contains("digraph"));
    }

    #[test]
    fn test_dot_renderer_sanitizes_id() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = DotRenderer::new(dir.path());
        let model = AutomatonModel::new("../escape", "a", ["a"], ["a"], ["x"], [("a", "x", "a")]);

        let handle = renderer.render(&model.validated().unwrap()).unwrap();
        assert!(PathBuf::from(handle).starts_with(dir.path()));
    }

    #[test]
    fn test_dot_renderer_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let renderer = DotRenderer::new(blocker.join("graphs"));
        let model = parity();

        let err = renderer.render(&model.validated().unwrap()).unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }

    #[test]
    fn test_dot_renderer_never_reuses_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = DotRenderer::new(dir.path());
        let flip = [("a", "x", "b"), ("b", "x", "a")];
        // Both ids map to the `a_b` stem.
        let first = AutomatonModel::new("a/b", "a", ["a", "b"], ["a"], ["x"], flip);
        let second = AutomatonModel::new("a_b", "a", ["a", "b"], ["b"], ["x"], flip);

        let handles: Vec<String> = (0..3)
            .flat_map(|_| [&first, &second])
            .map(|model| renderer.render(&model.validated().unwrap()).unwrap())
            .collect();

        let unique: IndexSet<&String> = handles.iter().collect();
        assert_eq!(unique.len(), handles.len());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), handles.len());
        let first_dot = fs::read_to_string(&handles[0]).unwrap();
        let second_dot = fs::read_to_string(&handles[1]).unwrap();
        assert!(first_dot.contains("n0 [shape=doublecircle, label=\"a\"]"));
        assert!(second_dot.contains("n1 [shape=doublecircle, label=\"b\"]"));
    }

    #[test]
    fn test_null_renderer() {
        let model = parity();
        assert_eq!(NullRenderer.render(&model.validated().unwrap()).unwrap(), "");
    }
}
