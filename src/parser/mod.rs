//! Line grammars for the two external tools.
//!
//! Both parsers are total: every input produces a (possibly empty) list of
//! entries and never fails. Lines that do not fit a grammar either fall back
//! to a degenerate entry (lister) or are skipped (metadata reader).
use regex::Regex;

/// One `name => path` fact reported by the dependency lister.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LddEntry {
    pub name: String,
    pub path: String,
}

#[derive(Debug)]
pub struct RegexPatterns {
    pub ldd_line: Regex,
    pub needed_line: Regex,
}

impl RegexPatterns {
    pub fn compile() -> Self {
        // `libfoo.so.1 => /usr/lib/libfoo.so.1 (0x00007f...)`
        let ldd_line = Regex::new(
            r"^\s*(?P<name>\S+)\s+=>\s*(?P<path>[^(]*?)\s*\((?P<addr>0x[0-9A-Fa-f]+)\)\s*$",
        )
        .unwrap();
        // ` 0x0000000000000001 (NEEDED)             Shared library: [libc.so.6]`
        let needed_line =
            Regex::new(r"\(NEEDED\)\s+Shared library:\s+\[(?P<name>[^\]]+)\]").unwrap();
        Self { ldd_line, needed_line }
    }
}

impl Default for RegexPatterns {
    fn default() -> Self {
        Self::compile()
    }
}

/// Parser for dependency-lister (`ldd`) output.
#[derive(Debug, Default)]
pub struct LddParser {
    patterns: RegexPatterns,
}

impl LddParser {
    #[must_use]
    pub fn new() -> Self {
        Self { patterns: RegexPatterns::compile() }
    }

    /// Parse one line. Blank lines yield `None`.
    ///
    /// A line that does not match `name => path (address)` falls back to its
    /// first token as both name and path, which covers the vDSO, the dynamic
    /// linker and `=> not found` entries.
    #[must_use]
    pub fn parse_line(&self, line: &str) -> Option<LddEntry> {
        if let Some(cap) = self.patterns.ldd_line.captures(line) {
            let name = cap.name("name").map_or("", |m| m.as_str()).to_string();
            let path = cap.name("path").map_or("", |m| m.as_str().trim());
            let path = if path.is_empty() || path == "not found" {
                name.clone()
            } else {
                path.to_string()
            };
            return Some(LddEntry { name, path });
        }
        let token = line.split_whitespace().next()?;
        Some(LddEntry { name: token.to_string(), path: token.to_string() })
    }

    #[must_use]
    pub fn parse(&self, output: &str) -> Vec<LddEntry> {
        output.lines().filter_map(|l| self.parse_line(l)).collect()
    }
}

/// Parser for binary-metadata (`readelf -d`) output.
#[derive(Debug, Default)]
pub struct NeededParser {
    patterns: RegexPatterns,
}

impl NeededParser {
    #[must_use]
    pub fn new() -> Self {
        Self { patterns: RegexPatterns::compile() }
    }

    #[must_use]
    pub fn parse_line(&self, line: &str) -> Option<String> {
        self.patterns
            .needed_line
            .captures(line)
            .and_then(|cap| cap.name("name"))
            .map(|m| m.as_str().to_string())
    }

    /// Declared library names in the order the binary lists them.
    #[must_use]
    pub fn parse(&self, output: &str) -> Vec<String> {
        output.lines().filter_map(|l| self.parse_line(l)).collect()
    }
}
