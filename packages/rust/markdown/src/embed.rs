//! Token-bounded document merge.
//!
//! Splices generated content into a document between `START TOKEN(name)` /
//! `END TOKEN(name)` marker comments, rewriting injected heading depths so
//! the content nests one level beneath the section heading that precedes
//! the markers in the host document.

use comrak::nodes::{AstNode, NodeValue};

/// Insert `new_content`'s top-level nodes within the token boundaries of
/// `target`, replacing whatever sat between the markers.
///
/// Both trees must come from the same arena. Returns `false` without
/// touching `target` when either marker is missing or the end marker does
/// not come strictly after the start marker. The marker nodes themselves
/// are preserved and end up adjacent to the inserted run, which makes the
/// operation fully replace prior injected content on every re-run.
pub fn embed<'a>(token: &str, target: &'a AstNode<'a>, new_content: &'a AstNode<'a>) -> bool {
    let start_marker = format!("<!-- START TOKEN({token}) -->");
    let end_marker = format!("<!-- END TOKEN({token}) -->");

    let children: Vec<&'a AstNode<'a>> = target.children().collect();

    let Some(start) = children.iter().position(|n| is_marker(n, &start_marker)) else {
        return false;
    };
    let Some(end) = children.iter().position(|n| is_marker(n, &end_marker)) else {
        return false;
    };
    if end <= start {
        return false;
    }

    let context_depth = heading_context(&children[..start]);

    // Injected sections always nest one level beneath the heading that
    // precedes the marker, regardless of their authored depth.
    let injected_depth = context_depth.saturating_add(1).min(6);
    for node in new_content.children() {
        let mut data = node.data.borrow_mut();
        if let NodeValue::Heading(ref mut heading) = data.value {
            heading.level = injected_depth;
        }
    }

    for node in &children[start + 1..end] {
        node.detach();
    }

    let end_node = children[end];
    let injected: Vec<&'a AstNode<'a>> = new_content.children().collect();
    for node in injected {
        node.detach();
        end_node.insert_before(node);
    }

    true
}

/// Depth of the last heading strictly before the marker, default 1.
fn heading_context<'a>(before_marker: &[&'a AstNode<'a>]) -> u8 {
    before_marker
        .iter()
        .rev()
        .find_map(|n| match &n.data.borrow().value {
            NodeValue::Heading(heading) => Some(heading.level),
            _ => None,
        })
        .unwrap_or(1)
}

fn is_marker<'a>(node: &'a AstNode<'a>, marker: &str) -> bool {
    match &node.data.borrow().value {
        NodeValue::HtmlBlock(html) => html.literal.trim() == marker,
        _ => false,
    }
}
