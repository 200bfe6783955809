//! In-memory host document.
//!
//! Parsing, selector matching and serialisation go through `kuchiki`; this
//! module adds what a browser page would otherwise provide on top of the tree:
//! listener registration and dispatch, class token lists and style access.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use kuchiki::traits::*;
use kuchiki::{parse_html, ElementData, Node, NodeDataRef, Selectors};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QueryError, Result};

mod class_list;
pub mod events;
mod markup;
mod style;

pub use class_list::ClassList;
pub use events::{listener, DispatchOutcome, Event, Listener};
pub use kuchiki::NodeRef;

pub(crate) use markup::{inner_html, set_inner_html, set_text_content};
pub(crate) use style::set_inline_properties;

use events::ListenerRegistry;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DocumentConfig {
    /// Address reported by [`Document::url`].
    pub url: String,
    /// Whether dispatched events travel up through the target's ancestors.
    pub bubble_events: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            url: String::from("about:blank"),
            bubble_events: true,
        }
    }
}

impl DocumentConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Shared handle to a parsed document.
///
/// Cloning is cheap and yields another handle onto the same tree, so element
/// sets built from either handle observe each other's mutations.
#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

struct DocumentInner {
    root: NodeRef,
    config: DocumentConfig,
    listeners: RefCell<ListenerRegistry>,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self::parse_with(html, DocumentConfig::default())
    }

    pub fn parse_with(html: &str, config: DocumentConfig) -> Self {
        let root = parse_html().one(html);
        debug!(target = "tinyquery", url = %config.url, "parsed document");
        Self {
            inner: Rc::new(DocumentInner {
                root,
                config,
                listeners: RefCell::new(ListenerRegistry::default()),
            }),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let html = std::fs::read_to_string(path)?;
        let config = DocumentConfig {
            url: format!("file://{}", path.display()),
            ..DocumentConfig::default()
        };
        Ok(Self::parse_with(&html, config))
    }

    pub fn root(&self) -> &NodeRef {
        &self.inner.root
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.inner.config
    }

    pub fn url(&self) -> &str {
        &self.inner.config.url
    }

    /// True when both handles point at the same tree.
    pub fn same(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Serialises the whole tree.
    pub fn to_html(&self) -> String {
        self.inner.root.to_string()
    }

    /// All elements matching `selector`, in document order.
    pub fn query_all(&self, selector: &str) -> Result<Vec<NodeRef>> {
        let selectors = compile(selector)?;
        let found = matching_descendants(&self.inner.root, &selectors);
        debug!(
            target = "tinyquery",
            selector = %selector,
            matched = found.len(),
            "query_all"
        );
        Ok(found)
    }

    /// Delivers an event of type `kind` to `target`, then to its ancestors
    /// when bubbling is enabled.
    pub fn dispatch(&self, target: &NodeRef, kind: &str) -> DispatchOutcome {
        let path: Vec<NodeRef> = if self.inner.config.bubble_events {
            target.inclusive_ancestors().collect()
        } else {
            vec![target.clone()]
        };
        events::dispatch_along(&self.inner.listeners, &path, Event::new(kind, target.clone()))
    }

    /// Style value `property` resolves to on `element`.
    ///
    /// The inline declaration wins; otherwise the most specific, then latest,
    /// matching rule of the document's `<style>` elements. Empty when nothing
    /// declares the property.
    pub fn computed_style(&self, element: &NodeRef, property: &str) -> String {
        style::computed_value(&self.inner.root, element, property)
    }

    pub(crate) fn listeners(&self) -> &RefCell<ListenerRegistry> {
        &self.inner.listeners
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::parse("")
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.inner.config.url)
            .finish_non_exhaustive()
    }
}

pub(crate) fn compile(selector: &str) -> Result<Selectors> {
    Selectors::compile(selector).map_err(|_| QueryError::InvalidSelector(selector.to_string()))
}

/// Descendants of `node` (not `node` itself) matching `selectors`, in tree order.
pub(crate) fn matching_descendants(node: &NodeRef, selectors: &Selectors) -> Vec<NodeRef> {
    node.descendants()
        .elements()
        .filter(|element| selectors.matches(element))
        .map(|element| element.as_node().clone())
        .collect()
}

/// Nearest ancestor-or-self of `node` matching `selectors`.
pub(crate) fn closest(node: &NodeRef, selectors: &Selectors) -> Option<NodeRef> {
    node.inclusive_ancestors()
        .elements()
        .find(|element| selectors.matches(element))
        .map(|element: NodeDataRef<ElementData>| element.as_node().clone())
}

pub(crate) fn node_key(node: &NodeRef) -> *const Node {
    Rc::as_ptr(&node.0)
}

/// Drops repeated references, keeping the first occurrence of each node.
pub(crate) fn dedup(nodes: impl IntoIterator<Item = NodeRef>) -> Vec<NodeRef> {
    let mut seen = HashSet::new();
    nodes
        .into_iter()
        .filter(|node| seen.insert(node_key(node)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
            <div id="outer" class="box">
                <div id="inner" class="box"><span>hi</span></div>
            </div>
        </body></html>
    "#;

    #[test]
    fn query_all_returns_document_order() {
        let document = Document::parse(PAGE);
        let found = document.query_all(".box").expect("query");
        let ids: Vec<String> = found
            .iter()
            .map(|node| {
                node.as_element()
                    .and_then(|el| el.attributes.borrow().get("id").map(str::to_string))
                    .unwrap_or_default()
            })
            .collect();
        assert_eq!(ids, vec!["outer", "inner"]);
    }

    #[test]
    fn invalid_selector_is_reported() {
        let document = Document::parse(PAGE);
        match document.query_all("<div>") {
            Err(QueryError::InvalidSelector(raw)) => assert_eq!(raw, "<div>"),
            other => panic!("expected invalid selector, got {other:?}"),
        }
    }

    #[test]
    fn closest_includes_self() {
        let document = Document::parse(PAGE);
        let inner = document.query_all("#inner").expect("query").remove(0);
        let selectors = compile(".box").expect("compile");
        let found = closest(&inner, &selectors).expect("closest");
        assert!(found == inner);
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let document = Document::parse(PAGE);
        let boxes = document.query_all(".box").expect("query");
        let doubled = vec![boxes[1].clone(), boxes[0].clone(), boxes[1].clone()];
        let unique = dedup(doubled);
        assert_eq!(unique.len(), 2);
        assert!(unique[0] == boxes[1]);
    }

    #[test]
    fn config_reads_partial_json() {
        let config = DocumentConfig::from_json(r#"{"bubble_events": false}"#).expect("config");
        assert_eq!(config.url, "about:blank");
        assert!(!config.bubble_events);
    }

    #[test]
    fn from_file_records_url() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("page.html");
        std::fs::write(&path, PAGE).expect("write page");
        let document = Document::from_file(&path).expect("load");
        assert!(document.url().starts_with("file://"));
        assert_eq!(document.query_all("span").expect("query").len(), 1);
    }
}
