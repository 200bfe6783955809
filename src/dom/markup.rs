use html5ever::{LocalName, Namespace, QualName};
use kuchiki::traits::*;
use kuchiki::{parse_fragment, NodeRef};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

pub(crate) fn inner_html(node: &NodeRef) -> String {
    node.children().map(|child| child.to_string()).collect()
}

/// Replaces the children of `node` with `markup` parsed as a `<body>` fragment.
pub(crate) fn set_inner_html(node: &NodeRef, markup: &str) {
    clear_children(node);
    let context = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("body"));
    let fragment = parse_fragment(context, Vec::new()).one(markup);
    // The fragment parser wraps its output in a synthetic <html> element.
    let Some(container) = fragment.first_child() else {
        return;
    };
    let parsed: Vec<NodeRef> = container.children().collect();
    for child in parsed {
        child.detach();
        node.append(child);
    }
}

pub(crate) fn set_text_content(node: &NodeRef, text: &str) {
    clear_children(node);
    if !text.is_empty() {
        node.append(NodeRef::new_text(text));
    }
}

fn clear_children(node: &NodeRef) {
    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        child.detach();
    }
}
