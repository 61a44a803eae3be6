use clap::{ArgAction, Parser, ValueEnum};
use clap_complete::Shell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Dot,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RankDirArg {
    #[value(name = "LR")]
    LR,
    #[value(name = "TB")]
    TB,
}

#[derive(Debug, Parser)]
#[command(
    name = "graphdeps",
    version,
    about = "Graph the shared-library dependencies of ELF binaries",
    long_about = "Resolve the shared libraries each BINARY links against, recursively, and write a Graphviz DOT description of the dependency graph. Library names come from `readelf -W -d`; their locations come from `ldd`."
)]
pub struct Cli {
    /// Binaries (or libraries) to graph
    #[arg(value_name = "BINARY", required_unless_present = "completions")]
    pub binaries: Vec<String>,

    /// Library to ignore; may be used multiple times. Shell-style glob matched
    /// against both the library name and its resolved path
    #[arg(short, long = "ignore", value_name = "PATTERN", action = ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Do not add the default ignore list (`libc.so*`)
    #[arg(long, default_value_t = false)]
    pub no_default_ignore: bool,

    /// Recursion depth to graph [default: 10]
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Output file, use '-' for stdout
    #[arg(short, long, value_name = "FILE")]
    pub outfile: Option<String>,

    /// Use full library names
    #[arg(short, long, default_value_t = false)]
    pub full_names: bool,

    /// Use just the basename (not the whole path) if --full-names is in use
    #[arg(short, long, default_value_t = false)]
    pub base_names: bool,

    /// Output format [default: dot]
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// DOT rank direction
    #[arg(long, value_enum)]
    pub rankdir: Option<RankDirArg>,

    /// Path to a TOML configuration file (default: ./graphdeps.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,

    /// Program used to list resolved runtime libraries
    #[arg(long, value_name = "PROGRAM", env = "GRAPHDEPS_LDD")]
    pub ldd: Option<String>,

    /// Program used to read NEEDED entries (invoked with `-W -d`)
    #[arg(long, value_name = "PROGRAM", env = "GRAPHDEPS_READELF")]
    pub readelf: Option<String>,

    /// Only report errors
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// More logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL", value_enum, exclusive = true)]
    pub completions: Option<Shell>,
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
