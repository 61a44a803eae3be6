//! Seams to the external programs that supply raw linkage facts.
use crate::errors::ToolError;
use std::process::{Command, Stdio};
use tracing::debug;

pub const DEFAULT_LDD: &str = "ldd";
pub const DEFAULT_READELF: &str = "readelf";

/// Lists the runtime libraries of a binary together with their resolved locations.
pub trait DependencyLister {
    /// Raw line-oriented output for `binary`.
    ///
    /// # Errors
    /// Returns `ToolError::Spawn` when the lister cannot be started.
    fn list(&self, binary: &str) -> Result<String, ToolError>;
}

/// Reads the `NEEDED` entries a binary declares, without path resolution.
pub trait MetadataReader {
    /// Raw line-oriented output for `binary`.
    ///
    /// # Errors
    /// Returns `ToolError::Spawn` when the reader cannot be started.
    fn read_needed(&self, binary: &str) -> Result<String, ToolError>;
}

/// An external program invoked as `<program> <args...> <binary>`.
///
/// A non-zero exit status is not an error: the tools routinely exit 1 on
/// static or missing files and whatever they printed is still parsed.
#[derive(Debug, Clone)]
pub struct ExternalTool {
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalTool {
    #[must_use]
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self { program: program.into(), args: args.iter().map(|a| (*a).to_string()).collect() }
    }

    #[must_use]
    pub fn ldd(program: impl Into<String>) -> Self {
        Self::new(program, &[])
    }

    #[must_use]
    pub fn readelf(program: impl Into<String>) -> Self {
        Self::new(program, &["-W", "-d"])
    }

    fn run(&self, target: &str) -> Result<String, ToolError> {
        debug!(program = %self.program, binary = target, "running");
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(target)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ToolError::Spawn {
                program: self.program.clone(),
                target: target.to_string(),
                source,
            })?;
        if !output.status.success() {
            debug!(
                program = %self.program,
                binary = target,
                code = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "tool exited with failure status"
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl DependencyLister for ExternalTool {
    fn list(&self, binary: &str) -> Result<String, ToolError> {
        self.run(binary)
    }
}

impl MetadataReader for ExternalTool {
    fn read_needed(&self, binary: &str) -> Result<String, ToolError> {
        self.run(binary)
    }
}
