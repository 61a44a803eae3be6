pub mod libname {
    /// Text after the last `/`, without touching the filesystem.
    #[must_use]
    pub fn basename(path: &str) -> &str {
        path.rsplit('/').next().unwrap_or(path)
    }

    fn is_version_component(part: &str) -> bool {
        !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
    }

    /// Short display identifier for a library path.
    ///
    /// Numeric components after the last `so` are dropped, every `so`
    /// component is dropped, and a leading `lib` is stripped:
    /// `/usr/lib/libfoo.so.1.2.3` becomes `foo`.
    #[must_use]
    pub fn display_name(path: &str) -> String {
        let mut pieces: Vec<&str> = Vec::new();
        let mut in_version = true;
        for part in basename(path).rsplit('.') {
            if part == "so" {
                in_version = false;
            } else if in_version && is_version_component(part) {
                continue;
            } else {
                pieces.push(part);
            }
        }
        pieces.reverse();
        let joined = pieces.join(".");
        match joined.strip_prefix("lib") {
            Some(rest) => rest.to_string(),
            None => joined,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn strips_version_suffix_and_lib_prefix() {
            assert_eq!(display_name("libfoo.so.1.2.3"), "foo");
            assert_eq!(display_name("/usr/lib/x86_64-linux-gnu/libfoo.so.1.2.3"), "foo");
            assert_eq!(display_name("libbar.so"), "bar");
            assert_eq!(display_name("libstdc++.so.6"), "stdc++");
        }

        #[test]
        fn non_library_names() {
            assert_eq!(display_name("libbaz-nodot"), "baz-nodot");
            assert_eq!(display_name("/usr/bin/app"), "app");
            assert_eq!(display_name("ld-linux-x86-64.so.2"), "ld-linux-x86-64");
        }

        #[test]
        fn dots_before_so_are_kept() {
            assert_eq!(display_name("libpython3.11.so.1.0"), "python3.11");
            assert_eq!(display_name("libgtk-3.so.0"), "gtk-3");
        }

        #[test]
        fn basename_of_paths() {
            assert_eq!(basename("/lib/libc.so.6"), "libc.so.6");
            assert_eq!(basename("libc.so.6"), "libc.so.6");
            assert_eq!(basename("dir/"), "");
        }
    }
}

pub mod config {
    use crate::errors::ConfigError;
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};

    pub const CONFIG_FILE_NAME: &str = "graphdeps.toml";

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    pub struct ResolveConfig {
        pub depth: Option<usize>,
        pub ignore: Option<Vec<String>>,
        pub default_ignore: Option<bool>,
        pub dynamic_linker: Option<Vec<String>>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    pub struct ToolsConfig {
        pub ldd: Option<String>,
        pub readelf: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    pub struct OutputConfig {
        pub format: Option<String>,  // "dot" | "json"
        pub full_names: Option<bool>,
        pub base_names: Option<bool>,
        pub rankdir: Option<String>, // "LR" | "TB"
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    pub struct Config {
        pub resolve: Option<ResolveConfig>,
        pub tools: Option<ToolsConfig>,
        pub output: Option<OutputConfig>,
    }

    fn default_config_path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE_NAME)
    }

    /// Load a config file from an explicit path.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or is not valid TOML for `Config`.
    pub fn load_config_at(path: &Path) -> Result<Config, ConfigError> {
        let data = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        toml::from_str::<Config>(&data)
            .map_err(|source| ConfigError::Toml { path: path.to_path_buf(), source })
    }

    /// Look for `graphdeps.toml` in `dir`. Absent file is `Ok(None)`.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn load_config_near(dir: &Path) -> Result<Option<Config>, ConfigError> {
        let p = default_config_path(dir);
        if p.exists() {
            load_config_at(&p).map(Some)
        } else {
            Ok(None)
        }
    }
}

pub mod logging {
    use tracing_subscriber::EnvFilter;

    /// Level directive for the given `-q` / `-v` combination.
    #[must_use]
    pub fn level_for(quiet: bool, verbose: u8) -> &'static str {
        if quiet {
            return "error";
        }
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Install a stderr subscriber. `RUST_LOG` wins over the flags.
    pub fn init(quiet: bool, verbose: u8) {
        use std::io::IsTerminal;
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level_for(quiet, verbose)));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .without_time()
            .try_init();
    }
}

pub mod output {
    use std::fs;
    use std::io::{self, Write};

    /// Write `content` to `dest`, where `None` or `-` means standard output.
    ///
    /// # Errors
    /// Returns any IO error from creating or writing the destination.
    pub fn write_to(dest: Option<&str>, content: &str) -> io::Result<()> {
        match dest.map(str::trim) {
            Some(path) if !path.is_empty() && path != "-" => fs::write(path, content),
            _ => {
                let mut out = io::stdout().lock();
                out.write_all(content.as_bytes())?;
                out.flush()
            }
        }
    }
}
