use crate::cli::{Cli, OutputFormat, RankDirArg};
use crate::errors::GraphDepsError;
use crate::graph::resolver::{ResolveOptions, Resolver, DEFAULT_DEPTH, DEFAULT_IGNORE};
use crate::graph::{nodes_of, EdgeSet};
use crate::tools::{DependencyLister, ExternalTool, MetadataReader, DEFAULT_LDD, DEFAULT_READELF};
use crate::utils::config::{self, Config};
use crate::utils::output;
use crate::visualization::{DotGenerator, DotOptions, JsonGenerator, LabelMode, RankDir};
use clap::CommandFactory;
use clap_complete::generate;
use std::io;
use std::path::Path;
use tracing::{error, info};

/// Everything a run needs after CLI flags, environment and config are merged.
#[derive(Debug, Clone)]
pub struct Settings {
    pub resolve: ResolveOptions,
    pub ldd: String,
    pub readelf: String,
    pub format: OutputFormat,
    pub labels: LabelMode,
    pub rankdir: Option<RankDir>,
    pub outfile: Option<String>,
}

impl Settings {
    /// Merge `cli` over `cfg` over built-in defaults.
    #[must_use]
    pub fn from_sources(cli: &Cli, cfg: Option<&Config>) -> Self {
        let resolve_cfg = cfg.and_then(|c| c.resolve.clone()).unwrap_or_default();
        let tools_cfg = cfg.and_then(|c| c.tools.clone()).unwrap_or_default();
        let output_cfg = cfg.and_then(|c| c.output.clone()).unwrap_or_default();

        let mut ignore: Vec<String> = Vec::new();
        if !cli.no_default_ignore && resolve_cfg.default_ignore.unwrap_or(true) {
            ignore.extend(DEFAULT_IGNORE.iter().map(|s| (*s).to_string()));
        }
        ignore.extend(resolve_cfg.ignore.unwrap_or_default());
        ignore.extend(cli.ignore.iter().cloned());

        let mut resolve = ResolveOptions {
            max_depth: cli.depth.or(resolve_cfg.depth).unwrap_or(DEFAULT_DEPTH),
            ignore,
            ..ResolveOptions::default()
        };
        if let Some(linker) = resolve_cfg.dynamic_linker {
            resolve.dynamic_linker = linker;
        }

        let format = cli.format.unwrap_or(match output_cfg.format.as_deref() {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Dot,
        });
        let full_names = cli.full_names || output_cfg.full_names.unwrap_or(false);
        let base_names = cli.base_names || output_cfg.base_names.unwrap_or(false);
        let rankdir = match cli.rankdir {
            Some(RankDirArg::LR) => Some(RankDir::LR),
            Some(RankDirArg::TB) => Some(RankDir::TB),
            None => match output_cfg.rankdir.as_deref() {
                Some("LR") => Some(RankDir::LR),
                Some("TB") => Some(RankDir::TB),
                _ => None,
            },
        };

        Self {
            resolve,
            ldd: cli.ldd.clone().or(tools_cfg.ldd).unwrap_or_else(|| DEFAULT_LDD.to_string()),
            readelf: cli
                .readelf
                .clone()
                .or(tools_cfg.readelf)
                .unwrap_or_else(|| DEFAULT_READELF.to_string()),
            format,
            labels: LabelMode::from_flags(full_names, base_names),
            rankdir,
            outfile: cli.outfile.clone(),
        }
    }
}

/// Explicit `--config`, else `graphdeps.toml` in the working directory.
///
/// # Errors
/// Returns `GraphDepsError::Config` if a config file exists but cannot be loaded.
pub fn load_config(cli: &Cli) -> Result<Option<Config>, GraphDepsError> {
    match cli.config.as_deref() {
        Some(path) => Ok(Some(config::load_config_at(Path::new(path))?)),
        None => Ok(config::load_config_near(Path::new("."))?),
    }
}

/// Resolve every input in one session and return the union of their edges.
///
/// # Errors
/// Returns `GraphDepsError` if a pattern is invalid or a tool cannot be started.
pub fn build_edges(
    binaries: &[String],
    lister: &dyn DependencyLister,
    reader: &dyn MetadataReader,
    opts: &ResolveOptions,
) -> Result<EdgeSet, GraphDepsError> {
    let mut resolver = Resolver::new(lister, reader, opts)?;
    let mut edges = EdgeSet::new();
    for binary in binaries {
        let root = resolver.resolve(binary)?;
        edges.extend(resolver.collect_edges(&root));
    }
    if !resolver.unresolved().is_empty() {
        info!("{} library name(s) could not be resolved", resolver.unresolved().len());
    }
    Ok(edges)
}

/// Render `edges` in the configured format.
///
/// # Errors
/// Returns `GraphDepsError::Json` if JSON encoding fails.
pub fn render(edges: &EdgeSet, inputs: &[String], settings: &Settings) -> Result<String, GraphDepsError> {
    match settings.format {
        OutputFormat::Dot => {
            let opts = DotOptions { labels: settings.labels, rankdir: settings.rankdir };
            Ok(DotGenerator::new().generate_dot_with_options(edges, inputs, opts))
        }
        OutputFormat::Json => JsonGenerator::new().generate_json(edges, inputs, settings.labels),
    }
}

/// Full pipeline for already-merged settings. Nothing is written when the graph is empty.
///
/// # Errors
/// Returns the first fatal `GraphDepsError`; no output is written in that case.
pub fn run(binaries: &[String], settings: &Settings) -> Result<(), GraphDepsError> {
    let lister = ExternalTool::ldd(settings.ldd.as_str());
    let reader = ExternalTool::readelf(settings.readelf.as_str());
    let edges = build_edges(binaries, &lister, &reader, &settings.resolve)?;
    if edges.is_empty() {
        info!("no dependencies found; nothing written");
        return Ok(());
    }
    info!("{} libraries, {} dependencies", nodes_of(&edges).len(), edges.len());
    let content = render(&edges, binaries, settings)?;
    output::write_to(settings.outfile.as_deref(), &content)?;
    Ok(())
}

/// Run the CLI logic in-process.
///
/// Returns an exit code (0 = success).
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, env!("CARGO_PKG_NAME"), &mut io::stdout());
        return 0;
    }

    let cfg = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            return e.exit_code();
        }
    };
    let settings = Settings::from_sources(&cli, cfg.as_ref());
    match run(&cli.binaries, &settings) {
        Ok(()) => 0,
        Err(e) => {
            error!("{e}");
            e.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["graphdeps"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn defaults_without_config() {
        let s = Settings::from_sources(&cli(&["--ldd", "ldd", "--readelf", "readelf", "a"]), None);
        assert_eq!(s.resolve.max_depth, DEFAULT_DEPTH);
        assert_eq!(s.resolve.ignore, vec!["libc.so*".to_string()]);
        assert_eq!(s.format, OutputFormat::Dot);
        assert_eq!(s.labels, LabelMode::Short);
        assert_eq!(s.rankdir, None);
    }

    #[test]
    fn cli_ignores_are_appended_to_defaults() {
        let s = Settings::from_sources(&cli(&["-i", "libm.so*", "a"]), None);
        assert_eq!(s.resolve.ignore, vec!["libc.so*".to_string(), "libm.so*".to_string()]);
        let s = Settings::from_sources(&cli(&["--no-default-ignore", "-i", "libm.so*", "a"]), None);
        assert_eq!(s.resolve.ignore, vec!["libm.so*".to_string()]);
    }

    #[test]
    fn cli_overrides_config() {
        let cfg: Config = toml::from_str(
            r#"
[resolve]
depth = 4
ignore = ["libz*"]

[tools]
ldd = "cross-ldd"
readelf = "cross-readelf"

[output]
format = "json"
full_names = true
rankdir = "LR"
"#,
        )
        .unwrap();
        let s = Settings::from_sources(&cli(&["-d", "2", "--readelf", "my-readelf", "a"]), Some(&cfg));
        assert_eq!(s.resolve.max_depth, 2);
        assert_eq!(s.resolve.ignore, vec!["libc.so*".to_string(), "libz*".to_string()]);
        assert_eq!(s.readelf, "my-readelf");
        assert_eq!(s.format, OutputFormat::Json);
        assert_eq!(s.labels, LabelMode::FullPath);
        assert_eq!(s.rankdir, Some(RankDir::LR));

        let s = Settings::from_sources(&cli(&["--format", "dot", "-b", "a"]), Some(&cfg));
        assert_eq!(s.resolve.max_depth, 4);
        assert_eq!(s.format, OutputFormat::Dot);
        assert_eq!(s.labels, LabelMode::BaseName);
    }
}
