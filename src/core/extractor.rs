use std::collections::BTreeSet;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{JavadepError, Result};

/// Wrapper and base types that are visible everywhere without an import.
/// Capitalized identifiers matching these are never treated as class references.
const BUILTIN_TYPES: &[&str] = &[
    "String", "Integer", "Boolean", "Double", "Float", "Long", "Short", "Byte",
    "Character", "Object", "Class", "Void", "Number", "Math", "System",
    "Override", "Deprecated", "SuppressWarnings", "Exception", "RuntimeException",
    "Error", "Throwable", "Thread", "Runnable", "Iterable", "Comparable",
    "StringBuilder", "StringBuffer",
];

/// Structural summary of a single Java source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Declared package, empty if the file has no package statement
    pub package: String,

    /// Primary type name, or the filename stem when no declaration is found
    pub type_name: String,

    /// Fully-qualified imports; wildcards dropped, static imports normalized
    /// to their owning type
    pub imports: BTreeSet<String>,

    /// Capitalized bare identifiers seen in the body (heuristic, may be empty)
    pub class_references: BTreeSet<String>,
}

impl SourceUnit {
    /// Dotted package-plus-type identifier, e.g. `com.example.Foo`
    pub fn fully_qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.type_name.clone()
        } else {
            format!("{}.{}", self.package, self.type_name)
        }
    }
}

/// Strategy interface for turning raw source text into a SourceUnit.
///
/// Extraction is total: every input, however malformed, yields a best-effort
/// result. Unreadable files are the caller's problem, not the extractor's.
pub trait SourceExtractor: Send + Sync {
    fn extract(&self, content: &str, filename: &str) -> SourceUnit;
}

/// Regex-based structural extractor. Deliberately not a Java parser: no AST,
/// no type resolution, no nested-class tracking. Fast and good enough for
/// dependency mapping.
pub struct RegexExtractor {
    package_regex: Regex,
    type_regex: Regex,
    import_regex: Regex,
    reference_regex: Regex,
    collect_references: bool,
}

impl RegexExtractor {
    pub fn new(collect_references: bool) -> Result<Self> {
        Ok(Self {
            package_regex: Regex::new(r"(?m)^\s*package\s+([A-Za-z_][\w.]*)\s*;")
                .map_err(|e| JavadepError::Extractor(e.to_string()))?,
            type_regex: Regex::new(
                r"(?:@\w+\s+|public\s+|protected\s+|private\s+|abstract\s+|final\s+|static\s+|strictfp\s+|sealed\s+)*\b(?:class|interface|enum)\s+([A-Za-z_][A-Za-z0-9_]*)",
            )
            .map_err(|e| JavadepError::Extractor(e.to_string()))?,
            import_regex: Regex::new(
                r"(?m)^\s*import\s+(?:(static)\s+)?([A-Za-z_][\w.]*(?:\.\*)?)\s*;",
            )
            .map_err(|e| JavadepError::Extractor(e.to_string()))?,
            reference_regex: Regex::new(r"\b([A-Z][A-Za-z0-9_]*)\b")
                .map_err(|e| JavadepError::Extractor(e.to_string()))?,
            collect_references,
        })
    }

    fn extract_package(&self, content: &str) -> String {
        self.package_regex
            .captures(content)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_default()
    }

    fn extract_type_name(&self, content: &str, filename: &str) -> String {
        if let Some(captures) = self.type_regex.captures(content) {
            return captures[1].to_string();
        }

        // No declaration found; fall back to the filename stem
        filename
            .rsplit('/')
            .next()
            .unwrap_or(filename)
            .trim_end_matches(".java")
            .to_string()
    }

    fn extract_imports(&self, content: &str) -> BTreeSet<String> {
        let mut imports = BTreeSet::new();

        for captures in self.import_regex.captures_iter(content) {
            let path = &captures[2];

            // Wildcard imports resolve to no single dependency
            if path.ends_with(".*") {
                continue;
            }

            if captures.get(1).is_some() {
                // Static import: keep the owning type, drop the member segment
                if let Some(pos) = path.rfind('.') {
                    imports.insert(path[..pos].to_string());
                } else {
                    imports.insert(path.to_string());
                }
            } else {
                imports.insert(path.to_string());
            }
        }

        imports
    }

    /// Capitalized identifiers in the body, minus the unit's own name and the
    /// ubiquitous builtins. Intentionally over-inclusive; the graph builder
    /// decides what actually resolves to a project type.
    fn extract_class_references(&self, content: &str, type_name: &str) -> BTreeSet<String> {
        let mut references = BTreeSet::new();

        for line in content.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("package ") || trimmed.starts_with("import ") {
                continue;
            }

            for captures in self.reference_regex.captures_iter(line) {
                let ident = &captures[1];
                if ident != type_name && !BUILTIN_TYPES.contains(&ident) {
                    references.insert(ident.to_string());
                }
            }
        }

        references
    }
}

impl SourceExtractor for RegexExtractor {
    fn extract(&self, content: &str, filename: &str) -> SourceUnit {
        let package = self.extract_package(content);
        let type_name = self.extract_type_name(content, filename);
        let imports = self.extract_imports(content);

        let class_references = if self.collect_references {
            self.extract_class_references(content, &type_name)
        } else {
            BTreeSet::new()
        };

        SourceUnit {
            package,
            type_name,
            imports,
            class_references,
        }
    }
}
