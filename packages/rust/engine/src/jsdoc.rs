//! JSDoc block parsing: leading description plus structured tags.

use std::sync::LazyLock;

use regex::Regex;

use docgen_shared::Tag;

/// Parsed contents of one `/** ... */` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDoc {
    pub description: String,
    pub tags: Vec<Tag>,
}

static TAG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z]\w*)\s*(.*)$").expect("valid regex"));

/// Parse a raw `/** ... */` block (delimiters included).
///
/// Lines before the first `@tag` form the description; each tag collects its
/// continuation lines until the next tag starts. `@returns` and
/// `@arg`/`@argument` are normalized to `return` and `param`.
pub fn parse_jsdoc(block: &str) -> ParsedDoc {
    let mut description_lines: Vec<String> = Vec::new();
    let mut tags: Vec<Tag> = Vec::new();
    let mut current: Option<Tag> = None;

    for raw in block.lines() {
        let line = clean_line(raw);

        if let Some(captures) = TAG_LINE.captures(&line) {
            if let Some(tag) = current.take() {
                tags.push(finish(tag));
            }
            current = Some(start_tag(&captures[1], &captures[2]));
        } else if let Some(tag) = current.as_mut() {
            tag.description.push('\n');
            tag.description.push_str(&line);
        } else {
            description_lines.push(line);
        }
    }

    if let Some(tag) = current.take() {
        tags.push(finish(tag));
    }

    ParsedDoc {
        description: description_lines.join("\n").trim().to_string(),
        tags,
    }
}

/// Strip comment furniture from one doc line: `/**`, `*/`, and the
/// conventional leading ` * `.
fn clean_line(raw: &str) -> String {
    let mut line = raw.trim();
    if let Some(rest) = line.strip_prefix("/**") {
        line = rest;
    }
    if let Some(rest) = line.strip_suffix("*/") {
        line = rest;
    }
    let line = line.trim_start();
    match line.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest).trim_end().to_string(),
        None => line.trim_end().to_string(),
    }
}

fn start_tag(title: &str, rest: &str) -> Tag {
    let title = match title {
        "returns" => "return",
        "arg" | "argument" => "param",
        other => other,
    }
    .to_string();

    let (type_expr, rest) = split_braced_type(rest);

    let (name, description) = if title == "param" || title == "property" {
        split_name(rest)
    } else {
        (None, rest.to_string())
    };

    Tag {
        title,
        type_expr,
        name,
        description,
    }
}

fn finish(mut tag: Tag) -> Tag {
    tag.description = tag.description.trim().to_string();
    tag
}

/// Split a leading `{type expression}` off a tag body. Record types nest
/// braces (`{{x: number}}`), so this counts depth rather than scanning for
/// the first `}`.
fn split_braced_type(rest: &str) -> (Option<String>, &str) {
    let rest_trimmed = rest.trim_start();
    if !rest_trimmed.starts_with('{') {
        return (None, rest);
    }

    let mut depth = 0usize;
    for (idx, ch) in rest_trimmed.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let type_expr = rest_trimmed[1..idx].trim().to_string();
                    let remainder = rest_trimmed[idx + 1..].trim_start();
                    return (Some(type_expr), remainder);
                }
            }
            _ => {}
        }
    }

    // Unbalanced braces: treat the whole body as description.
    (None, rest)
}

/// Split the parameter name off a `@param` body; a leading `- ` separator
/// before the description is dropped.
fn split_name(rest: &str) -> (Option<String>, String) {
    let rest = rest.trim_start();
    if rest.is_empty() {
        return (None, String::new());
    }

    let (name, remainder) = match rest.split_once(char::is_whitespace) {
        Some((name, remainder)) => (name, remainder),
        None => (rest, ""),
    };

    let description = remainder
        .trim_start()
        .strip_prefix("- ")
        .unwrap_or(remainder.trim_start())
        .to_string();

    (Some(name.to_string()), description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_only_block() {
        let doc = parse_jsdoc("/**\n * Fetch a REST resource.\n */");
        assert_eq!(doc.description, "Fetch a REST resource.");
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn single_line_block() {
        let doc = parse_jsdoc("/** Inline description. */");
        assert_eq!(doc.description, "Inline description.");
    }

    #[test]
    fn multi_line_description_keeps_line_breaks() {
        let doc = parse_jsdoc("/**\n * First line.\n * Second line.\n */");
        assert_eq!(doc.description, "First line.\nSecond line.");
    }

    #[test]
    fn param_tag_with_type_name_and_dash() {
        let doc = parse_jsdoc("/**\n * Adds.\n * @param {number} a - First operand.\n */");
        assert_eq!(doc.description, "Adds.");
        assert_eq!(doc.tags.len(), 1);
        let tag = &doc.tags[0];
        assert_eq!(tag.title, "param");
        assert_eq!(tag.type_expr.as_deref(), Some("number"));
        assert_eq!(tag.name.as_deref(), Some("a"));
        assert_eq!(tag.description, "First operand.");
    }

    #[test]
    fn returns_normalized_to_return() {
        let doc = parse_jsdoc("/**\n * @returns {Promise<void>} Resolves when done.\n */");
        let tag = &doc.tags[0];
        assert_eq!(tag.title, "return");
        assert_eq!(tag.type_expr.as_deref(), Some("Promise<void>"));
        assert_eq!(tag.description, "Resolves when done.");
    }

    #[test]
    fn record_type_braces_are_balanced() {
        let doc = parse_jsdoc("/**\n * @param {{x: number, y: number}} point The point.\n */");
        let tag = &doc.tags[0];
        assert_eq!(tag.type_expr.as_deref(), Some("{x: number, y: number}"));
        assert_eq!(tag.name.as_deref(), Some("point"));
        assert_eq!(tag.description, "The point.");
    }

    #[test]
    fn example_collects_following_lines() {
        let doc = parse_jsdoc(
            "/**\n * Run it.\n * @example\n * ```js\n * run();\n * ```\n */",
        );
        let tag = &doc.tags[0];
        assert_eq!(tag.title, "example");
        assert_eq!(tag.description, "```js\nrun();\n```");
    }

    #[test]
    fn multiple_tags_in_order() {
        let doc = parse_jsdoc(
            "/**\n * Do things.\n * @param {string} s Input.\n * @param {boolean} [loud] Optional flag.\n * @return {string} Output.\n * @deprecated Use doOtherThings.\n */",
        );
        let titles: Vec<_> = doc.tags.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["param", "param", "return", "deprecated"]);
        assert_eq!(doc.tags[1].name.as_deref(), Some("[loud]"));
        assert_eq!(doc.tags[3].description, "Use doOtherThings.");
    }

    #[test]
    fn bare_tag_has_empty_description() {
        let doc = parse_jsdoc("/**\n * Old.\n * @deprecated\n */");
        assert_eq!(doc.tags[0].title, "deprecated");
        assert_eq!(doc.tags[0].description, "");
    }

    #[test]
    fn type_tag() {
        let doc = parse_jsdoc("/**\n * The store.\n * @type {Map<string, number>}\n */");
        assert_eq!(doc.tags[0].title, "type");
        assert_eq!(doc.tags[0].type_expr.as_deref(), Some("Map<string, number>"));
    }
}
