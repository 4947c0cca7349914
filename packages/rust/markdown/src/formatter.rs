//! Render aggregated IR into Markdown document text.
//!
//! Pure string building: one `##` section per exported symbol, in the order
//! the traversal produced them, with tag material grouped under emphasized
//! captions. Output is deterministic for a given IR.

use docgen_shared::ExportEntry;

/// Format the IR as a Markdown document.
///
/// `section_title` renders a leading `# title`; the append path passes
/// `None` so the merge step alone decides heading depths.
pub fn format_ir(ir: &[ExportEntry], section_title: Option<&str>) -> String {
    let mut out = String::new();

    if let Some(title) = section_title {
        out.push_str(&format!("# {title}\n\n"));
    }

    for entry in ir {
        out.push_str(&format!("## {}\n\n", entry.name));

        let description = entry.description.trim();
        if description.is_empty() {
            out.push_str("Undocumented declaration.\n\n");
        } else {
            out.push_str(description);
            out.push_str("\n\n");
        }

        for tag in entry.tags_titled("deprecated") {
            if tag.description.is_empty() {
                out.push_str("*Deprecated*\n\n");
            } else {
                out.push_str(&format!("*Deprecated:* {}\n\n", tag.description.trim()));
            }
        }

        let examples: Vec<_> = entry.tags_titled("example").collect();
        if !examples.is_empty() {
            out.push_str("*Usage*\n\n");
            for example in examples {
                out.push_str(example.description.trim_end());
                out.push_str("\n\n");
            }
        }

        let params: Vec<_> = entry.tags_titled("param").collect();
        if !params.is_empty() {
            out.push_str("*Parameters*\n\n");
            for param in params {
                let name = param.name.as_deref().unwrap_or("?");
                out.push_str(&format!("- **{name}**"));
                if let Some(type_expr) = &param.type_expr {
                    out.push_str(&format!(" `{type_expr}`"));
                }
                let text = param.description.trim();
                if !text.is_empty() {
                    out.push_str(&format!(": {text}"));
                }
                out.push('\n');
            }
            out.push('\n');
        }

        let returns: Vec<_> = entry.tags_titled("return").collect();
        if !returns.is_empty() {
            out.push_str("*Returns*\n\n");
            for ret in returns {
                let mut parts = Vec::new();
                if let Some(type_expr) = &ret.type_expr {
                    parts.push(format!("`{type_expr}`"));
                }
                let text = ret.description.trim();
                if !text.is_empty() {
                    parts.push(text.to_string());
                }
                out.push_str(&format!("- {}\n", parts.join(" ")));
            }
            out.push('\n');
        }
    }

    let trimmed = out.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgen_shared::Tag;

    fn tag(title: &str, type_expr: Option<&str>, name: Option<&str>, description: &str) -> Tag {
        Tag {
            title: title.into(),
            type_expr: type_expr.map(String::from),
            name: name.map(String::from),
            description: description.into(),
        }
    }

    #[test]
    fn renders_title_and_sections() {
        let ir = vec![
            ExportEntry {
                name: "apiFetch".into(),
                description: "Fetch a REST resource.".into(),
                tags: vec![],
                line: Some(1),
            },
            ExportEntry::undocumented("helper"),
        ];

        let doc = format_ir(&ir, Some("API"));
        assert!(doc.starts_with("# API\n\n"));
        assert!(doc.contains("## apiFetch\n\nFetch a REST resource."));
        assert!(doc.contains("## helper\n\nUndocumented declaration."));
    }

    #[test]
    fn no_title_emits_no_top_heading() {
        let ir = vec![ExportEntry::undocumented("thing")];
        let doc = format_ir(&ir, None);
        assert!(doc.starts_with("## thing"));
    }

    #[test]
    fn renders_params_and_returns() {
        let ir = vec![ExportEntry {
            name: "add".into(),
            description: "Add two numbers.".into(),
            tags: vec![
                tag("param", Some("number"), Some("a"), "First operand."),
                tag("param", Some("number"), Some("b"), "Second operand."),
                tag("return", Some("number"), None, "The sum."),
            ],
            line: None,
        }];

        let doc = format_ir(&ir, Some("API"));
        assert!(doc.contains("*Parameters*\n\n- **a** `number`: First operand.\n- **b** `number`: Second operand.\n"));
        assert!(doc.contains("*Returns*\n\n- `number` The sum.\n"));
    }

    #[test]
    fn renders_deprecation_and_examples() {
        let ir = vec![ExportEntry {
            name: "legacy".into(),
            description: "Old API.".into(),
            tags: vec![
                tag("deprecated", None, None, "Use `modern` instead."),
                tag("example", None, None, "```js\nlegacy();\n```"),
            ],
            line: None,
        }];

        let doc = format_ir(&ir, None);
        assert!(doc.contains("*Deprecated:* Use `modern` instead."));
        assert!(doc.contains("*Usage*\n\n```js\nlegacy();\n```"));
    }

    #[test]
    fn empty_ir_with_title_is_title_only() {
        let doc = format_ir(&[], Some("API"));
        assert_eq!(doc, "# API\n");
    }

    #[test]
    fn empty_ir_without_title_is_empty() {
        assert_eq!(format_ir(&[], None), "");
    }

    #[test]
    fn preserves_traversal_order() {
        let ir = vec![
            ExportEntry::undocumented("zeta"),
            ExportEntry::undocumented("alpha"),
        ];
        let doc = format_ir(&ir, None);
        let z = doc.find("## zeta").expect("zeta");
        let a = doc.find("## alpha").expect("alpha");
        assert!(z < a, "entries are not sorted, traversal order wins");
    }
}
