//! Declaration-level IR extraction for ES-module sources.
//!
//! [`EsModuleEngine`] scans a module for `export` statements and the JSDoc
//! blocks attached to them, producing the IR the pipeline aggregates. It is
//! a scanner, not a parser: statements are recognized at the top level of
//! the file, and brace-balanced bodies are skipped wholesale.
//!
//! Re-exports (`export ... from`) are followed through the pipeline's
//! [`ImportResolver`] seam, which is what drives the recursive traversal.

mod jsdoc;

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use docgen_core::pipeline::{ExtractionEngine, ImportResolver};
use docgen_shared::{
    DocgenError, ExportEntry, ExportToken, FileResult, ModuleSummary, Result, StatementKind,
    StatementRecord,
};

use jsdoc::{ParsedDoc, parse_jsdoc};

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The default extraction engine for `.js` ES modules.
#[derive(Debug, Default)]
pub struct EsModuleEngine;

impl EsModuleEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ExtractionEngine for EsModuleEngine {
    fn extract(
        &self,
        relative_path: &Path,
        source: &str,
        imports: &mut dyn ImportResolver,
    ) -> Result<FileResult> {
        let module = scan_module(relative_path, source)?;

        let mut ir: Vec<ExportEntry> = Vec::new();
        for export in &module.exports {
            match &export.form {
                ExportForm::Declaration { name, doc } => {
                    ir.push(make_entry(name, doc.as_ref(), export.line));
                }
                ExportForm::Default { doc, reference } => {
                    let resolved = doc
                        .clone()
                        .or_else(|| reference.as_ref().and_then(|r| module.docs.get(r).cloned()));
                    ir.push(make_entry("default", resolved.as_ref(), export.line));
                }
                ExportForm::NamedLocal { items } => {
                    for item in items {
                        ir.push(make_entry(
                            &item.exported,
                            module.docs.get(&item.source),
                            export.line,
                        ));
                    }
                }
                ExportForm::NamedFrom { items, specifier } => {
                    if let Some(dependency) = imports.resolve(specifier)? {
                        for item in items {
                            match dependency.iter().find(|e| e.name == item.source) {
                                Some(found) => {
                                    let mut entry = found.clone();
                                    entry.name = item.exported.clone();
                                    entry.line = Some(export.line);
                                    ir.push(entry);
                                }
                                None => {
                                    debug!(
                                        symbol = %item.source,
                                        specifier,
                                        "re-exported symbol not found in dependency"
                                    );
                                }
                            }
                        }
                    }
                }
                ExportForm::All { specifier } => {
                    if let Some(dependency) = imports.resolve(specifier)? {
                        ir.extend(dependency);
                    }
                }
            }
        }

        debug!(
            file = %relative_path.display(),
            symbols = ir.len(),
            tokens = module.tokens.len(),
            "module scanned"
        );

        let has_exports = !ir.is_empty();
        Ok(FileResult {
            ir: has_exports.then_some(ir),
            tokens: module.tokens,
            ast: module.summary,
        })
    }
}

fn make_entry(name: &str, doc: Option<&ParsedDoc>, line: usize) -> ExportEntry {
    match doc {
        Some(parsed) => ExportEntry {
            name: name.to_string(),
            description: parsed.description.clone(),
            tags: parsed.tags.clone(),
            line: Some(line),
        },
        None => ExportEntry {
            name: name.to_string(),
            description: String::new(),
            tags: Vec::new(),
            line: Some(line),
        },
    }
}

// ---------------------------------------------------------------------------
// Module scanning
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct ExportStatement {
    form: ExportForm,
    line: usize,
}

#[derive(Debug)]
enum ExportForm {
    /// `export default <expr>`; `reference` is set when the expression is a
    /// bare identifier whose declaration docs apply.
    Default {
        doc: Option<ParsedDoc>,
        reference: Option<String>,
    },
    /// `export const|function|class NAME ...`
    Declaration { name: String, doc: Option<ParsedDoc> },
    /// `export { a, b as c }`
    NamedLocal { items: Vec<ExportItem> },
    /// `export { a, b as c } from '<spec>'`
    NamedFrom {
        items: Vec<ExportItem>,
        specifier: String,
    },
    /// `export * from '<spec>'`
    All { specifier: String },
}

#[derive(Debug)]
struct ExportItem {
    source: String,
    exported: String,
}

#[derive(Debug, Default)]
struct ScannedModule {
    exports: Vec<ExportStatement>,
    /// Documented declarations by local name, for `export { name }` and
    /// `export default name`.
    docs: HashMap<String, ParsedDoc>,
    tokens: Vec<ExportToken>,
    summary: ModuleSummary,
}

static RE_EXPORT_ALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^export\s*\*\s*from\s*['"]([^'"]+)['"]"#).expect("valid regex")
});
static RE_EXPORT_BRACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^export\s*\{").expect("valid regex"));
static RE_EXPORT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^export\s*\{([^}]*)\}\s*from\s*['"]([^'"]+)['"]"#).expect("valid regex")
});
static RE_EXPORT_NAMED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^export\s*\{([^}]*)\}").expect("valid regex"));
static RE_EXPORT_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^export\s+default\s+(.*)$").expect("valid regex"));
static RE_EXPORT_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^export\s+(?:async\s+)?(?:const|let|var|function\*?|class)\s+([A-Za-z_$][\w$]*)")
        .expect("valid regex")
});
static RE_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:async\s+)?(?:const|let|var|function\*?|class)\s+([A-Za-z_$][\w$]*)")
        .expect("valid regex")
});
static RE_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_$][\w$]*)\s*;?\s*$").expect("valid regex"));

fn scan_module(path: &Path, source: &str) -> Result<ScannedModule> {
    let lines: Vec<&str> = source.lines().collect();
    let mut module = ScannedModule::default();
    let mut pending: Option<ParsedDoc> = None;
    let mut i = 0;

    while i < lines.len() {
        let line_no = i + 1;
        let trimmed = lines[i].trim();

        if trimmed.is_empty() {
            i += 1;
            continue;
        }

        if trimmed.starts_with("/**") {
            let start = i;
            while i < lines.len() && !lines[i].contains("*/") {
                i += 1;
            }
            if i == lines.len() {
                return Err(DocgenError::extraction(
                    path,
                    format!("unterminated doc comment starting at line {}", start + 1),
                ));
            }
            let block = lines[start..=i].join("\n");
            module.summary.statements.push(StatementRecord {
                kind: StatementKind::DocComment,
                line: start + 1,
            });
            pending = Some(parse_jsdoc(&block));
            i += 1;
            continue;
        }

        if trimmed.starts_with("//") {
            i += 1;
            continue;
        }
        if trimmed.starts_with("/*") {
            while i < lines.len() && !lines[i].contains("*/") {
                i += 1;
            }
            i += 1;
            continue;
        }

        if keyword_start(trimmed, "export") {
            i = scan_export(&lines, i, pending.take(), &mut module);
            continue;
        }

        if keyword_start(trimmed, "import") {
            module.summary.statements.push(StatementRecord {
                kind: StatementKind::Import,
                line: line_no,
            });
            pending = None;
            i = skip_balanced(&lines, i);
            continue;
        }

        if let Some(captures) = RE_DECL.captures(trimmed) {
            if let Some(doc) = pending.take() {
                module.docs.insert(captures[1].to_string(), doc);
            }
            module.summary.statements.push(StatementRecord {
                kind: StatementKind::Declaration,
                line: line_no,
            });
            i = skip_balanced(&lines, i);
            continue;
        }

        // Anything else detaches a pending doc block from what follows.
        pending = None;
        i = skip_balanced(&lines, i);
    }

    Ok(module)
}

/// Classify one `export` statement starting at `lines[i]`; returns the index
/// of the first line past it.
fn scan_export(
    lines: &[&str],
    i: usize,
    pending: Option<ParsedDoc>,
    module: &mut ScannedModule,
) -> usize {
    let line_no = i + 1;
    let first = lines[i].trim();

    if let Some(captures) = RE_EXPORT_ALL.captures(first) {
        module.push_export(
            ExportForm::All {
                specifier: captures[1].to_string(),
            },
            StatementKind::ExportAll,
            first,
            line_no,
        );
        return i + 1;
    }

    if RE_EXPORT_BRACE.is_match(first) {
        let (text, next) = gather_braced(lines, i);
        let form = if let Some(captures) = RE_EXPORT_FROM.captures(&text) {
            ExportForm::NamedFrom {
                items: parse_items(&captures[1]),
                specifier: captures[2].to_string(),
            }
        } else if let Some(captures) = RE_EXPORT_NAMED.captures(&text) {
            ExportForm::NamedLocal {
                items: parse_items(&captures[1]),
            }
        } else {
            // Unterminated brace list; nothing usable.
            return next;
        };
        module.push_export(form, StatementKind::ExportNamed, &text, line_no);
        return next;
    }

    if let Some(captures) = RE_EXPORT_DEFAULT.captures(first) {
        let reference = RE_IDENT
            .captures(captures[1].trim())
            .map(|c| c[1].to_string());
        module.push_export(
            ExportForm::Default {
                doc: pending,
                reference,
            },
            StatementKind::ExportDefault,
            first,
            line_no,
        );
        return skip_balanced(lines, i);
    }

    if let Some(captures) = RE_EXPORT_DECL.captures(first) {
        let name = captures[1].to_string();
        if let Some(doc) = &pending {
            module.docs.insert(name.clone(), doc.clone());
        }
        module.push_export(
            ExportForm::Declaration { name, doc: pending },
            StatementKind::ExportNamed,
            first,
            line_no,
        );
        return skip_balanced(lines, i);
    }

    // Unrecognized export form; record the token and move on.
    module.tokens.push(ExportToken {
        text: collapse_ws(first),
        line: line_no,
    });
    i + 1
}

impl ScannedModule {
    fn push_export(&mut self, form: ExportForm, kind: StatementKind, text: &str, line: usize) {
        self.tokens.push(ExportToken {
            text: collapse_ws(text),
            line,
        });
        self.summary.statements.push(StatementRecord { kind, line });
        self.exports.push(ExportStatement { form, line });
    }
}

/// Keyword match at line start: `export const` yes, `exports.foo` no.
fn keyword_start(line: &str, keyword: &str) -> bool {
    match line.strip_prefix(keyword) {
        Some(rest) => !rest
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$'),
        None => false,
    }
}

/// Advance past a statement, swallowing a brace-balanced body when the first
/// line opens one (function/class/object bodies).
fn skip_balanced(lines: &[&str], start: usize) -> usize {
    let mut depth: i64 = 0;
    let mut i = start;
    while i < lines.len() {
        let line = lines[i];
        depth += line.matches('{').count() as i64;
        depth -= line.matches('}').count() as i64;
        i += 1;
        if depth <= 0 {
            break;
        }
    }
    i
}

/// Accumulate lines until the export brace list closes.
fn gather_braced(lines: &[&str], start: usize) -> (String, usize) {
    let mut text = String::new();
    let mut i = start;
    while i < lines.len() {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(lines[i].trim());
        i += 1;
        if text.contains('}') {
            break;
        }
    }
    (collapse_ws(&text), i)
}

/// `a, b as c, default as d` → export items with renames applied.
fn parse_items(list: &str) -> Vec<ExportItem> {
    list.split(',')
        .filter_map(|item| {
            let item = item.trim();
            if item.is_empty() {
                return None;
            }
            match item.split_once(" as ") {
                Some((source, exported)) => Some(ExportItem {
                    source: source.trim().to_string(),
                    exported: exported.trim().to_string(),
                }),
                None => Some(ExportItem {
                    source: item.to_string(),
                    exported: item.to_string(),
                }),
            }
        })
        .collect()
}

fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
