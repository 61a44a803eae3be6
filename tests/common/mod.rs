//! Fake external tools for integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use graphdeps::errors::ToolError;
use graphdeps::tools::{DependencyLister, MetadataReader};

pub fn ldd_line(name: &str, path: &str) -> String {
    format!("\t{name} => {path} (0x00007f0000000000)\n")
}

pub fn needed_line(name: &str) -> String {
    format!(" 0x0000000000000001 (NEEDED)             Shared library: [{name}]\n")
}

/// In-memory lister + reader that records every lister invocation.
#[derive(Default)]
pub struct FakeTools {
    pub ldd: HashMap<String, String>,
    pub needed: HashMap<String, String>,
    pub listed: RefCell<Vec<String>>,
    pub read: RefCell<Vec<String>>,
}

impl FakeTools {
    pub fn new() -> Self {
        Self::default()
    }

    /// `binary` needs each `(name, path)` and the lister resolves them.
    pub fn with_lib(mut self, binary: &str, deps: &[(&str, &str)]) -> Self {
        let ldd: String = deps.iter().map(|(n, p)| ldd_line(n, p)).collect();
        let needed: String = deps.iter().map(|(n, _)| needed_line(n)).collect();
        self.ldd.entry(binary.to_string()).or_default().push_str(&ldd);
        self.needed.entry(binary.to_string()).or_default().push_str(&needed);
        self
    }

    /// Declare a NEEDED name the lister knows nothing about.
    pub fn with_unresolved(mut self, binary: &str, name: &str) -> Self {
        self.needed.entry(binary.to_string()).or_default().push_str(&needed_line(name));
        self
    }

    pub fn list_count(&self, binary: &str) -> usize {
        self.listed.borrow().iter().filter(|b| b.as_str() == binary).count()
    }

    pub fn read_count(&self, binary: &str) -> usize {
        self.read.borrow().iter().filter(|b| b.as_str() == binary).count()
    }
}

impl DependencyLister for FakeTools {
    fn list(&self, binary: &str) -> Result<String, ToolError> {
        self.listed.borrow_mut().push(binary.to_string());
        Ok(self.ldd.get(binary).cloned().unwrap_or_default())
    }
}

impl MetadataReader for FakeTools {
    fn read_needed(&self, binary: &str) -> Result<String, ToolError> {
        self.read.borrow_mut().push(binary.to_string());
        Ok(self.needed.get(binary).cloned().unwrap_or_default())
    }
}

/// Lister that can never be started.
pub struct BrokenTool;

impl DependencyLister for BrokenTool {
    fn list(&self, binary: &str) -> Result<String, ToolError> {
        Err(ToolError::Spawn {
            program: "ldd".into(),
            target: binary.into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        })
    }
}

const FAKE_LDD: &str = r#"#!/bin/sh
case "$1" in
  */app|app)
    printf '\tlinux-vdso.so.1 (0x00007ffc00000000)\n'
    printf '\tlibB.so.1 => /fake/lib/libB.so.1 (0x00007f0000001000)\n'
    printf '\tlibC.so.1 => /fake/lib/libC.so.1 (0x00007f0000002000)\n'
    printf '\tlibc.so.6 => /fake/lib/libc.so.6 (0x00007f0000003000)\n'
    printf '\t/lib64/ld-linux-x86-64.so.2 (0x00007f0000004000)\n'
    ;;
  */broken|broken)
    printf '\tlibB.so.1 => /fake/lib/libB.so.1 (0x00007f0000001000)\n'
    ;;
  /fake/lib/libB.so.1)
    printf '\tlibC.so.1 => /fake/lib/libC.so.1 (0x00007f0000002000)\n'
    ;;
  *)
    echo "ldd: $1: not a dynamic executable" >&2
    exit 1
    ;;
esac
"#;

const FAKE_READELF: &str = r#"#!/bin/sh
for last; do :; done
needed() { printf ' 0x0000000000000001 (NEEDED)             Shared library: [%s]\n' "$1"; }
case "$last" in
  */app|app)
    echo 'Dynamic section at offset 0x2dc8 contains 27 entries:'
    needed libB.so.1
    needed libC.so.1
    needed libc.so.6
    ;;
  */broken|broken)
    needed libB.so.1
    needed libmissing.so.0
    ;;
  */static|static)
    echo 'There is no dynamic section in this file.'
    ;;
  /fake/lib/libB.so.1)
    needed libC.so.1
    needed libc.so.6
    ;;
  /fake/lib/libC.so.1)
    needed ld-linux-x86-64.so.2
    ;;
esac
"#;

#[cfg(unix)]
fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Fake `ldd` / `readelf` scripts plus empty `app`, `broken` and `static` inputs in `dir`.
#[cfg(unix)]
pub fn install_fake_tools(dir: &Path) -> (PathBuf, PathBuf) {
    let ldd = dir.join("fake-ldd");
    let readelf = dir.join("fake-readelf");
    write_script(&ldd, FAKE_LDD);
    write_script(&readelf, FAKE_READELF);
    for input in ["app", "broken", "static"] {
        fs::write(dir.join(input), b"").unwrap();
    }
    (ldd, readelf)
}
