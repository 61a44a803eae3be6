use std::collections::{HashMap, HashSet};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

use crate::errors::GraphDepsError;
use crate::graph::{DependencyEdge, EdgeSet, LibraryNode};
use crate::parser::{LddParser, NeededParser};
use crate::tools::{DependencyLister, MetadataReader};

pub const DEFAULT_DEPTH: usize = 10;
pub const DEFAULT_IGNORE: &[&str] = &["libc.so*"];
pub const DEFAULT_DYNAMIC_LINKER: &[&str] = &["ld-linux*.so*", "ld.so*", "ld64.so*", "ld-musl-*.so*"];

#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub max_depth: usize,
    /// Globs tested against both the resolved path and the declared name.
    pub ignore: Vec<String>,
    /// Globs over declared names that denote the dynamic linker.
    pub dynamic_linker: Vec<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_DEPTH,
            ignore: DEFAULT_IGNORE.iter().map(|s| (*s).to_string()).collect(),
            dynamic_linker: DEFAULT_DYNAMIC_LINKER.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Shell-style globs matched against whole strings (`*` also crosses `/`).
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl PatternSet {
    /// Compile `patterns` into one matcher.
    ///
    /// # Errors
    /// Returns `GraphDepsError::Pattern` for the first pattern that is not a valid glob.
    pub fn new(patterns: &[String]) -> Result<Self, GraphDepsError> {
        let mut builder = GlobSetBuilder::new();
        for p in patterns {
            let glob = Glob::new(p)
                .map_err(|source| GraphDepsError::Pattern { pattern: p.clone(), source })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|source| GraphDepsError::Pattern {
            pattern: patterns.join(","),
            source,
        })?;
        Ok(Self { patterns: patterns.to_vec(), set })
    }

    #[must_use]
    pub fn is_match(&self, candidate: &str) -> bool {
        self.set.is_match(candidate)
    }

    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// A declared library name the lister had no location for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub parent: String,
    pub name: String,
}

/// One resolution session.
///
/// Owns the node arena (path -> node) and the name -> path table. Both only
/// grow while the session lives, and every root resolved through the same
/// session shares them, so a library reachable from several places is
/// expanded once.
pub struct Resolver<'a> {
    lister: &'a dyn DependencyLister,
    reader: &'a dyn MetadataReader,
    ldd_parser: LddParser,
    needed_parser: NeededParser,
    max_depth: usize,
    ignore: PatternSet,
    dynamic_linker: PatternSet,
    nodes: HashMap<String, LibraryNode>,
    path_table: HashMap<String, String>,
    expanded: HashSet<String>,
    roots: Vec<String>,
    unresolved: Vec<Unresolved>,
}

impl<'a> Resolver<'a> {
    /// # Errors
    /// Returns `GraphDepsError::Pattern` if an ignore or dynamic-linker pattern is invalid.
    pub fn new(
        lister: &'a dyn DependencyLister,
        reader: &'a dyn MetadataReader,
        opts: &ResolveOptions,
    ) -> Result<Self, GraphDepsError> {
        Ok(Self {
            lister,
            reader,
            ldd_parser: LddParser::new(),
            needed_parser: NeededParser::new(),
            max_depth: opts.max_depth,
            ignore: PatternSet::new(&opts.ignore)?,
            dynamic_linker: PatternSet::new(&opts.dynamic_linker)?,
            nodes: HashMap::new(),
            path_table: HashMap::new(),
            expanded: HashSet::new(),
            roots: Vec::new(),
            unresolved: Vec::new(),
        })
    }

    /// Expand `binary` as a root and return its node id (the path as given).
    ///
    /// A path that is already known as a deeper dependency is promoted to a
    /// root so its subtree is expanded from depth zero.
    ///
    /// # Errors
    /// Returns `GraphDepsError::Tool` if an external tool cannot be started.
    pub fn resolve(&mut self, binary: &str) -> Result<String, GraphDepsError> {
        let root = binary.to_string();
        match self.nodes.get_mut(&root) {
            Some(node) if node.depth == 0 => {}
            Some(node) => {
                debug!(path = %root, depth = node.depth, "promoting dependency to root");
                node.depth = 0;
                node.parent = None;
            }
            None => {
                self.nodes.insert(root.clone(), LibraryNode::new(root.clone(), 0, None));
            }
        }
        self.expand(&root)?;
        if !self.roots.contains(&root) {
            self.roots.push(root.clone());
        }
        Ok(root)
    }

    fn expand(&mut self, path: &str) -> Result<(), GraphDepsError> {
        let depth = match self.nodes.get(path) {
            Some(node) => node.depth,
            None => return Ok(()),
        };
        if depth >= self.max_depth || !self.expanded.insert(path.to_string()) {
            return Ok(());
        }

        let listing = self.lister.list(path)?;
        for entry in self.ldd_parser.parse(&listing) {
            self.path_table.insert(entry.name, entry.path);
        }

        let target = self.path_table.get(path).cloned().unwrap_or_else(|| path.to_string());
        let metadata = self.reader.read_needed(&target)?;

        let mut children: Vec<String> = Vec::new();
        for name in self.needed_parser.parse(&metadata) {
            let Some(child) = self.resolve_name(path, &name) else {
                continue;
            };
            if !self.nodes.contains_key(&child) {
                self.nodes.insert(
                    child.clone(),
                    LibraryNode::new(child.clone(), depth + 1, Some(path.to_string())),
                );
                self.expand(&child)?;
            }
            if !children.contains(&child) {
                children.push(child);
            }
        }
        if let Some(node) = self.nodes.get_mut(path) {
            node.children = children;
        }
        Ok(())
    }

    // Path for a declared name, or None when the dependency is skipped.
    fn resolve_name(&mut self, parent: &str, name: &str) -> Option<String> {
        let resolved = match self.path_table.get(name) {
            Some(p) if !p.is_empty() => p.clone(),
            _ => {
                if self.dynamic_linker.is_match(name) {
                    return None;
                }
                warn!("unknown library path for {name} (needed by {parent})");
                self.unresolved
                    .push(Unresolved { parent: parent.to_string(), name: name.to_string() });
                name.to_string()
            }
        };
        if self.ignore.is_match(&resolved) || self.ignore.is_match(name) {
            debug!(library = name, path = %resolved, "ignored");
            return None;
        }
        Some(resolved)
    }

    /// Edges reachable from `root`. Cycles in the arena are walked once.
    #[must_use]
    pub fn collect_edges(&self, root: &str) -> EdgeSet {
        let mut edges = EdgeSet::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![root];
        while let Some(path) = stack.pop() {
            if !visited.insert(path) {
                continue;
            }
            if let Some(node) = self.nodes.get(path) {
                for child in &node.children {
                    edges.insert(DependencyEdge::new(path, child.as_str()));
                    stack.push(child.as_str());
                }
            }
        }
        edges
    }

    /// Union of `collect_edges` over every resolved root.
    #[must_use]
    pub fn edges(&self) -> EdgeSet {
        let mut all = EdgeSet::new();
        for root in &self.roots {
            all.extend(self.collect_edges(root));
        }
        all
    }

    #[must_use]
    pub fn node(&self, path: &str) -> Option<&LibraryNode> {
        self.nodes.get(path)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &LibraryNode> {
        self.nodes.values()
    }

    #[must_use]
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    #[must_use]
    pub fn unresolved(&self) -> &[Unresolved] {
        &self.unresolved
    }

    /// Location the lister reported for `name`, if any.
    #[must_use]
    pub fn resolved_path(&self, name: &str) -> Option<&str> {
        self.path_table.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
