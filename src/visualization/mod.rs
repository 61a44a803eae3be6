use crate::errors::GraphDepsError;
use crate::graph::{nodes_of, EdgeSet};
use crate::utils::libname::{basename, display_name};
use serde::Serialize;
use std::fmt::Write as _;

/// How node labels are derived from library paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabelMode {
    /// `libfoo.so.1` -> `foo`
    #[default]
    Short,
    FullPath,
    BaseName,
}

impl LabelMode {
    /// Map the `--full-names` / `--base-names` flag pair to a mode.
    #[must_use]
    pub fn from_flags(full_names: bool, base_names: bool) -> Self {
        match (full_names, base_names) {
            (false, _) => Self::Short,
            (true, false) => Self::FullPath,
            (true, true) => Self::BaseName,
        }
    }

    #[must_use]
    pub fn label(self, path: &str) -> String {
        match self {
            Self::Short => display_name(path),
            Self::FullPath => path.to_string(),
            Self::BaseName => basename(path).to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDir {
    LR,
    TB,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DotOptions {
    pub labels: LabelMode,
    pub rankdir: Option<RankDir>,
}

/// True when `path` has the same basename as one of the `inputs`.
#[must_use]
pub fn is_input(path: &str, inputs: &[String]) -> bool {
    let name = basename(path);
    inputs.iter().any(|i| basename(i) == name)
}

#[derive(Debug, Default)]
pub struct DotGenerator;

impl DotGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {}
    }

    #[must_use]
    pub fn generate_dot(&self, edges: &EdgeSet, inputs: &[String]) -> String {
        self.generate_dot_with_options(edges, inputs, DotOptions::default())
    }

    /// Render `edges` as a DOT digraph. Input binaries are drawn filled.
    #[must_use]
    pub fn generate_dot_with_options(
        &self,
        edges: &EdgeSet,
        inputs: &[String],
        opts: DotOptions,
    ) -> String {
        let mut s = String::from("digraph G {\n");
        if let Some(dir) = opts.rankdir {
            let rank = match dir {
                RankDir::LR => "LR",
                RankDir::TB => "TB",
            };
            let _ = writeln!(s, "\trankdir={rank};");
        }
        s.push_str("\t/* presentation settings */\n");
        for lib in nodes_of(edges) {
            let extra = if is_input(lib, inputs) { ", style=\"filled\"" } else { "" };
            let _ = writeln!(
                s,
                "\t\"{}\" [label=\"{}\"{extra}];",
                escape_label(lib),
                escape_label(&opts.labels.label(lib))
            );
        }

        s.push_str("\n\t/* dependencies */\n");
        for e in edges {
            let _ = writeln!(s, "\t\"{}\" -> \"{}\";", escape_label(&e.parent), escape_label(&e.child));
        }
        s.push_str("}\n");
        s
    }
}

#[derive(Debug, Serialize)]
struct JsonNode<'a> {
    id: &'a str,
    label: String,
    input: bool,
}

#[derive(Debug, Serialize)]
struct JsonEdge<'a> {
    parent: &'a str,
    child: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonGraph<'a> {
    roots: &'a [String],
    nodes: Vec<JsonNode<'a>>,
    edges: Vec<JsonEdge<'a>>,
}

#[derive(Debug, Default)]
pub struct JsonGenerator;

impl JsonGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {}
    }

    /// Render the same graph as `DotGenerator`, as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns `GraphDepsError::Json` if serialization fails.
    pub fn generate_json(
        &self,
        edges: &EdgeSet,
        inputs: &[String],
        labels: LabelMode,
    ) -> Result<String, GraphDepsError> {
        let graph = JsonGraph {
            roots: inputs,
            nodes: nodes_of(edges)
                .into_iter()
                .map(|id| JsonNode { id, label: labels.label(id), input: is_input(id, inputs) })
                .collect(),
            edges: edges
                .iter()
                .map(|e| JsonEdge { parent: e.parent.as_str(), child: e.child.as_str() })
                .collect(),
        };
        let mut out = serde_json::to_string_pretty(&graph)?;
        out.push('\n');
        Ok(out)
    }
}

fn escape_label(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
