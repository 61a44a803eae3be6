//! graphdeps: shared-library dependency graphs for ELF binaries
//!
//! For each input binary, read the libraries it declares as `NEEDED`, resolve
//! them to paths through the dynamic loader's listing, recurse into each
//! library up to a depth limit, and render the resulting edge set as a
//! Graphviz DOT (or JSON) description.
//!
//! # Features
//! - One resolution session shared by all inputs: each library is expanded once
//! - Shell-style ignore globs over library names and resolved paths
//! - Short, full-path or basename node labels; input binaries are highlighted
//! - Pluggable tool seams (`tools::DependencyLister`, `tools::MetadataReader`)
//!
//! # Quickstart (Library)
//! ```no_run
//! use graphdeps::graph::resolver::{ResolveOptions, Resolver};
//! use graphdeps::tools::ExternalTool;
//! use graphdeps::visualization::DotGenerator;
//!
//! let ldd = ExternalTool::ldd("ldd");
//! let readelf = ExternalTool::readelf("readelf");
//! let mut resolver = Resolver::new(&ldd, &readelf, &ResolveOptions::default()).expect("patterns");
//! let root = resolver.resolve("/usr/bin/ssh").expect("run tools");
//! let edges = resolver.collect_edges(&root);
//! print!("{}", DotGenerator::new().generate_dot(&edges, &[root]));
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! graphdeps -d 3 -i 'libm.so*' -o ssh.dot /usr/bin/ssh
//! dot -Tpng ssh.dot > ssh.png
//! ```
pub mod app;
pub mod cli;
pub mod errors;
pub mod graph;
pub mod parser;
pub mod tools;
pub mod utils;
pub mod visualization;
