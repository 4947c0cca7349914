//! Core domain types for docgen's intermediate representation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// IR: exported symbols
// ---------------------------------------------------------------------------

/// One documented export — the unit of the intermediate representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    /// Exported name; default exports are named `default`.
    pub name: String,
    /// Leading description text of the doc block (may be empty).
    #[serde(default)]
    pub description: String,
    /// Structured doc tags (`@param`, `@return`, `@example`, ...).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// 1-based line of the export statement in its source file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl ExportEntry {
    /// An entry with just a name, no documentation.
    pub fn undocumented(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            tags: Vec::new(),
            line: None,
        }
    }

    /// All tags with the given title, in source order.
    pub fn tags_titled<'a>(&'a self, title: &'a str) -> impl Iterator<Item = &'a Tag> {
        self.tags.iter().filter(move |t| t.title == title)
    }
}

/// A single doc-block tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag keyword without the `@` (e.g. `param`, `return`, `example`).
    pub title: String,
    /// Braced type expression, when present.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_expr: Option<String>,
    /// Parameter name, for tags that carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Remaining tag text.
    #[serde(default)]
    pub description: String,
}

// ---------------------------------------------------------------------------
// Per-file extraction artifacts
// ---------------------------------------------------------------------------

/// The raw text of one `export` statement, kept for the debug dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportToken {
    /// Statement text, whitespace-collapsed.
    pub text: String,
    /// 1-based line where the statement starts.
    pub line: usize,
}

/// Statement kinds recorded in the per-file syntax summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    ExportDefault,
    ExportNamed,
    ExportAll,
    Import,
    Declaration,
    DocComment,
}

/// One record in the per-file syntax summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRecord {
    pub kind: StatementKind,
    /// 1-based starting line.
    pub line: usize,
}

/// Flat syntax summary of one module, dumped in debug mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub statements: Vec<StatementRecord>,
}

/// The output of processing one file: its IR (absent when the module has
/// no exports), the export tokens, and the syntax summary.
#[derive(Debug, Clone)]
pub struct FileResult {
    pub ir: Option<Vec<ExportEntry>>,
    pub tokens: Vec<ExportToken>,
    pub ast: ModuleSummary,
}
