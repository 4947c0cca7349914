//! Markdown AST handling for docgen: CommonMark parse/serialize, the
//! token-bounded section merge, and the IR formatter.
//!
//! Parsing and serialization go through `comrak`; the merge operates on the
//! arena AST in place and is the one soft-failure component (a boolean), so
//! callers choose their own policy. [`append_to_section`] is the policy used
//! by the pipeline: a missing marker pair aborts before anything is written.

pub mod embed;
pub mod formatter;

pub use embed::embed;
pub use formatter::format_ir;

use std::path::Path;

use comrak::nodes::AstNode;
use comrak::{Arena, ComrakOptions, format_commonmark, parse_document};
use tracing::{debug, instrument};

use docgen_shared::{DocgenError, Result};

/// CommonMark options shared by the parser and the serializer.
pub fn comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    // Marker comments must survive serialization verbatim.
    options.render.unsafe_ = true;
    options
}

/// Serialize an AST back to CommonMark text.
pub fn render_commonmark<'a>(root: &'a AstNode<'a>) -> Result<String> {
    let mut output = Vec::new();
    format_commonmark(root, &comrak_options(), &mut output)
        .map_err(|e| DocgenError::Markdown(format!("commonmark serialization failed: {e}")))?;
    String::from_utf8(output)
        .map_err(|e| DocgenError::Markdown(format!("UTF-8 conversion failed: {e}")))
}

/// Merge freshly generated Markdown into the document at `doc_path`,
/// between the `START TOKEN(heading)` / `END TOKEN(heading)` markers.
///
/// The target file is rewritten only when the marker pair is found; a
/// missing or malformed pair yields [`DocgenError::TokenNotFound`] and the
/// file stays untouched.
#[instrument(skip_all, fields(doc = %doc_path.display(), heading))]
pub fn append_to_section(doc_path: &Path, heading: &str, generated: &str) -> Result<()> {
    let existing =
        std::fs::read_to_string(doc_path).map_err(|e| DocgenError::io(doc_path, e))?;

    let arena = Arena::new();
    let options = comrak_options();
    let target = parse_document(&arena, &existing, &options);
    let content = parse_document(&arena, generated, &options);

    if !embed(heading, target, content) {
        return Err(DocgenError::TokenNotFound {
            token: heading.to_string(),
        });
    }

    let text = render_commonmark(target)?;
    std::fs::write(doc_path, &text).map_err(|e| DocgenError::io(doc_path, e))?;

    debug!(bytes = text.len(), "section merged");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn append_rewrites_marked_region() {
        let dir = tempfile::tempdir().expect("tempdir");
        let doc = dir.path().join("README.md");
        fs::write(
            &doc,
            "# Pkg\n\n## API\n\n<!-- START TOKEN(API) -->\n\nstale\n\n<!-- END TOKEN(API) -->\n",
        )
        .expect("write");

        append_to_section(&doc, "API", "## fresh\n\nNew text.\n").expect("append");

        let result = fs::read_to_string(&doc).expect("read");
        assert!(result.contains("### fresh"));
        assert!(result.contains("New text."));
        assert!(!result.contains("stale"));
        assert!(result.contains("<!-- START TOKEN(API) -->"));
        assert!(result.contains("<!-- END TOKEN(API) -->"));
    }

    #[test]
    fn append_missing_token_leaves_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let doc = dir.path().join("README.md");
        let original = "# Pkg\n\nNothing marked.\n";
        fs::write(&doc, original).expect("write");

        let err = append_to_section(&doc, "API", "## fresh\n").expect_err("no markers");
        match err {
            DocgenError::TokenNotFound { token } => assert_eq!(token, "API"),
            other => panic!("expected TokenNotFound, got {other}"),
        }

        assert_eq!(fs::read_to_string(&doc).expect("read"), original);
    }

    #[test]
    fn append_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = append_to_section(&dir.path().join("absent.md"), "API", "text")
            .expect_err("missing file");
        assert!(matches!(err, DocgenError::Io { .. }));
    }

    #[test]
    fn append_twice_converges() {
        let dir = tempfile::tempdir().expect("tempdir");
        let doc = dir.path().join("README.md");
        fs::write(
            &doc,
            "## API\n\n<!-- START TOKEN(API) -->\n<!-- END TOKEN(API) -->\n",
        )
        .expect("write");

        append_to_section(&doc, "API", "First.\n").expect("first");
        append_to_section(&doc, "API", "Second.\n").expect("second");

        let result = fs::read_to_string(&doc).expect("read");
        assert!(result.contains("Second."));
        assert!(!result.contains("First."));
    }
}
