//! End-to-end `generate` pipeline: entry file → import-graph traversal →
//! aggregated IR → formatted Markdown → output document (written fresh or
//! merged into an existing section).
//!
//! Traversal is depth-first over local relative imports, in the order the
//! extraction engine requests them. Dependencies referenced more than once
//! are re-read and re-processed each time; nothing is memoized.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use docgen_shared::{DocgenError, ExportEntry, FileResult, Result};

use crate::resolver::{is_local_specifier, resolve_relative};

// ---------------------------------------------------------------------------
// Extraction seam
// ---------------------------------------------------------------------------

/// Callback handed to the extraction engine for following imports.
///
/// Package specifiers resolve to `None` (an empty contribution) without
/// touching the filesystem; local relative specifiers trigger a recursive
/// traversal of the resolved file and yield its IR.
pub trait ImportResolver {
    fn resolve(&mut self, specifier: &str) -> Result<Option<Vec<ExportEntry>>>;
}

/// The IR-extraction engine contract.
///
/// `relative_path` is the file's path relative to the traversal root and is
/// metadata only; resolution always happens against the importing file.
/// An absent `ir` in the result means "no exports", not an error.
pub trait ExtractionEngine {
    fn extract(
        &self,
        relative_path: &Path,
        source: &str,
        imports: &mut dyn ImportResolver,
    ) -> Result<FileResult>;
}

// ---------------------------------------------------------------------------
// Recursive traversal
// ---------------------------------------------------------------------------

/// Drives the depth-first traversal of the local import graph.
pub struct Orchestrator<'e> {
    engine: &'e dyn ExtractionEngine,
    root_dir: PathBuf,
    source_ext: String,
}

impl<'e> Orchestrator<'e> {
    pub fn new(
        engine: &'e dyn ExtractionEngine,
        root_dir: impl Into<PathBuf>,
        source_ext: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            root_dir: root_dir.into(),
            source_ext: source_ext.into(),
        }
    }

    /// Process one entry file and every local module reachable from it.
    ///
    /// The processing stack lives for exactly one call; entries are released
    /// on every exit path, so a failed run leaves no stale in-flight markers
    /// behind and the orchestrator can be reused.
    #[instrument(skip_all, fields(entry = %entry.display()))]
    pub fn process_file(&self, entry: &Path) -> Result<FileResult> {
        let mut stack: Vec<PathBuf> = Vec::new();
        let result = process_inner(
            self.engine,
            &self.root_dir,
            &self.source_ext,
            &mut stack,
            entry,
        );
        debug_assert!(stack.is_empty(), "processing stack must drain");
        result
    }
}

fn process_inner(
    engine: &dyn ExtractionEngine,
    root_dir: &Path,
    source_ext: &str,
    stack: &mut Vec<PathBuf>,
    input: &Path,
) -> Result<FileResult> {
    if let Some(pos) = stack.iter().position(|p| p == input) {
        let chain = stack[pos..]
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(" -> ");
        return Err(DocgenError::CircularImport {
            path: input.to_path_buf(),
            chain,
        });
    }

    let source = std::fs::read_to_string(input).map_err(|e| DocgenError::io(input, e))?;

    let relative = input.strip_prefix(root_dir).unwrap_or(input).to_path_buf();

    stack.push(input.to_path_buf());
    debug!(file = %relative.display(), depth = stack.len(), "processing module");

    let outcome = {
        let mut imports = GraphImports {
            engine,
            root_dir,
            source_ext,
            base: input,
            stack: &mut *stack,
        };
        engine.extract(&relative, &source, &mut imports)
    };

    stack.pop();
    outcome
}

/// [`ImportResolver`] backed by the in-flight traversal: specifiers resolve
/// against the file currently on top of the processing stack.
struct GraphImports<'a> {
    engine: &'a dyn ExtractionEngine,
    root_dir: &'a Path,
    source_ext: &'a str,
    base: &'a Path,
    stack: &'a mut Vec<PathBuf>,
}

impl ImportResolver for GraphImports<'_> {
    fn resolve(&mut self, specifier: &str) -> Result<Option<Vec<ExportEntry>>> {
        if !is_local_specifier(specifier) {
            return Ok(None);
        }

        let target = resolve_relative(self.base, specifier, self.source_ext)?;
        let result = process_inner(
            self.engine,
            self.root_dir,
            self.source_ext,
            self.stack,
            &target,
        )?;
        Ok(result.ir)
    }
}

// ---------------------------------------------------------------------------
// Generate pipeline
// ---------------------------------------------------------------------------

/// Configuration for one `generate` run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Absolute path of the entry source file.
    pub entry: PathBuf,
    /// Directory that relative display paths are computed against.
    pub root_dir: PathBuf,
    /// Output document path.
    pub output: PathBuf,
    /// Heading title to merge into, instead of overwriting the output.
    pub append: Option<String>,
    /// Symbols whose name matches are dropped from the documentation.
    pub ignore: Option<Regex>,
    /// Section title for freshly written documents.
    pub section_title: String,
    /// Source file extension, without the dot.
    pub source_ext: String,
    /// Write IR/token/syntax-summary JSON artifacts next to the entry file.
    pub debug: bool,
}

/// Result of one `generate` run.
#[derive(Debug)]
pub struct GenerateResult {
    /// Path of the written document.
    pub output: PathBuf,
    /// Number of symbols documented after filtering.
    pub symbol_count: usize,
}

/// Run the full pipeline for one entry file.
///
/// 1. Traverse the import graph and aggregate IR
/// 2. Filter ignored symbols
/// 3. Write debug artifacts (if requested)
/// 4. Format and write the document, or merge it into an existing section
#[instrument(skip_all, fields(entry = %config.entry.display()))]
pub fn generate(engine: &dyn ExtractionEngine, config: &GenerateConfig) -> Result<GenerateResult> {
    let orchestrator =
        Orchestrator::new(engine, config.root_dir.clone(), config.source_ext.clone());
    let result = orchestrator.process_file(&config.entry)?;

    if result.ir.is_none() {
        warn!(
            entry = %config.entry.display(),
            "file was processed, but contained no module exports"
        );
    }

    let mut ir = result.ir.clone().unwrap_or_default();
    if let Some(pattern) = &config.ignore {
        let before = ir.len();
        ir.retain(|entry| !pattern.is_match(&entry.name));
        debug!(dropped = before - ir.len(), "ignore filter applied");
    }

    if config.debug {
        write_debug_artifacts(&config.entry, &result)?;
    }

    let symbol_count = ir.len();
    match &config.append {
        Some(heading) => {
            // Section title omitted: heading depth is governed entirely by
            // the merge's renormalization against the target document.
            let text = docgen_markdown::format_ir(&ir, None);
            docgen_markdown::append_to_section(&config.output, heading, &text)?;
        }
        None => {
            let text = docgen_markdown::format_ir(&ir, Some(&config.section_title));
            std::fs::write(&config.output, text)
                .map_err(|e| DocgenError::io(&config.output, e))?;
        }
    }

    info!(
        output = %config.output.display(),
        symbol_count,
        appended = config.append.is_some(),
        "documentation generated"
    );

    Ok(GenerateResult {
        output: config.output.clone(),
        symbol_count,
    })
}

/// Derive `<entry-stem><suffix>` next to the entry file.
pub fn artifact_path(entry: &Path, suffix: &str) -> PathBuf {
    let stem = entry
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("module");
    entry.with_file_name(format!("{stem}{suffix}"))
}

/// Dump the unfiltered IR, export tokens, and syntax summary as JSON.
fn write_debug_artifacts(entry: &Path, result: &FileResult) -> Result<()> {
    let dumps: [(&str, serde_json::Result<String>); 3] = [
        ("-ir.json", serde_json::to_string_pretty(&result.ir)),
        ("-exports.json", serde_json::to_string_pretty(&result.tokens)),
        ("-ast.json", serde_json::to_string_pretty(&result.ast)),
    ];

    for (suffix, encoded) in dumps {
        let path = artifact_path(entry, suffix);
        let content = encoded.map_err(|e| DocgenError::Serialize(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| DocgenError::io(&path, e))?;
        debug!(artifact = %path.display(), "debug artifact written");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
