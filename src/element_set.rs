//! Chainable operations over a snapshot of document elements.

use kuchiki::NodeRef;
use tracing::debug;

use crate::dom::{self, ClassList, Document, Listener};
use crate::error::{QueryError, Result};

/// Ordered snapshot of elements taken from a [`Document`].
///
/// The snapshot is never re-queried. The elements themselves are shared with
/// the document, so every setter mutates the live tree in place and returns
/// the same set for chaining. Traversal methods build a new set.
#[derive(Debug, Clone)]
pub struct ElementSet {
    document: Document,
    elements: Vec<NodeRef>,
}

impl ElementSet {
    pub fn new(document: &Document, elements: Vec<NodeRef>) -> Self {
        Self {
            document: document.clone(),
            elements,
        }
    }

    /// Every element of `document` matching `selector`, in document order.
    pub fn query(document: &Document, selector: &str) -> Result<Self> {
        Ok(Self::new(document, document.query_all(selector)?))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NodeRef> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeRef> {
        self.elements.iter()
    }

    pub fn each(&self, mut f: impl FnMut(&NodeRef, usize)) -> &Self {
        for (index, element) in self.elements.iter().enumerate() {
            f(element, index);
        }
        self
    }

    /// Inner markup of the first element, empty for an empty set.
    pub fn html(&self) -> String {
        self.elements.first().map(dom::inner_html).unwrap_or_default()
    }

    pub fn set_html(&self, markup: &str) -> &Self {
        self.each(|element, _| dom::set_inner_html(element, markup))
    }

    /// Text content of the first element, empty for an empty set.
    pub fn txt(&self) -> String {
        self.elements
            .first()
            .map(NodeRef::text_contents)
            .unwrap_or_default()
    }

    pub fn set_txt(&self, text: &str) -> &Self {
        self.each(|element, _| dom::set_text_content(element, text))
    }

    /// Attribute `name` of the first element; empty when absent or when the
    /// set is empty.
    pub fn attr(&self, name: &str) -> String {
        self.elements
            .first()
            .and_then(|node| node.as_element())
            .and_then(|element| element.attributes.borrow().get(name).map(str::to_string))
            .unwrap_or_default()
    }

    pub fn set_attr(&self, name: &str, value: &str) -> &Self {
        self.each(|element, _| {
            if let Some(data) = element.as_element() {
                data.attributes.borrow_mut().insert(name, value.to_string());
            }
        })
    }

    /// Adds classes.
    pub fn ac(&self, classes: &[&str]) -> &Self {
        self.update_classes(|list| list.add(classes))
    }

    /// Removes classes.
    pub fn rc(&self, classes: &[&str]) -> &Self {
        self.update_classes(|list| list.remove(classes))
    }

    /// Toggles one class.
    pub fn tc(&self, class: &str) -> &Self {
        self.update_classes(|list| {
            list.toggle(class);
        })
    }

    fn update_classes(&self, update: impl Fn(&mut ClassList)) -> &Self {
        self.each(|element, _| {
            if let Some(data) = element.as_element() {
                ClassList::update(data, &update);
            }
        })
    }

    pub fn on(&self, event: &str, listener: &Listener) -> &Self {
        let mut registry = self.document.listeners().borrow_mut();
        for element in &self.elements {
            registry.add(element, event, listener);
        }
        drop(registry);
        self
    }

    pub fn off(&self, event: &str, listener: &Listener) -> &Self {
        let mut registry = self.document.listeners().borrow_mut();
        for element in &self.elements {
            registry.remove(element, event, listener);
        }
        drop(registry);
        self
    }

    /// Computed value of `property` on the first element.
    ///
    /// Unlike the other getters this one is unguarded: an empty set is an
    /// error, not an empty string.
    pub fn css(&self, property: &str) -> Result<String> {
        let first = self
            .elements
            .first()
            .ok_or(QueryError::EmptySet { op: "css" })?;
        Ok(self.document.computed_style(first, property))
    }

    pub fn set_css(&self, property: &str, value: &str) -> &Self {
        self.set_css_many([(property, value)])
    }

    /// Merges every `(property, value)` pair into each element's inline style.
    pub fn set_css_many<'a, I>(&self, properties: I) -> &Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let properties: Vec<(&str, &str)> = properties.into_iter().collect();
        self.each(|element, _| {
            if let Some(data) = element.as_element() {
                dom::set_inline_properties(data, properties.iter().copied());
            }
        })
    }

    /// Descendants of any element matching `selector`, each reported once.
    pub fn sel(&self, selector: &str) -> Result<ElementSet> {
        let selectors = dom::compile(selector)?;
        let found = self
            .elements
            .iter()
            .flat_map(|element| dom::matching_descendants(element, &selectors));
        let found = dom::dedup(found);
        debug!(target = "tinyquery", selector = %selector, matched = found.len(), "sel");
        Ok(self.derive(found))
    }

    /// Nearest ancestor-or-self matching `selector` for each element;
    /// elements without one are dropped.
    pub fn clos(&self, selector: &str) -> Result<ElementSet> {
        let selectors = dom::compile(selector)?;
        let found = self
            .elements
            .iter()
            .filter_map(|element| dom::closest(element, &selectors))
            .collect();
        Ok(self.derive(found))
    }

    /// Unique parent elements.
    pub fn par(&self) -> ElementSet {
        let parents = self
            .elements
            .iter()
            .filter_map(|node| node.parent())
            .filter(|parent| parent.as_element().is_some());
        self.derive(dom::dedup(parents))
    }

    /// Unique element children.
    pub fn kids(&self) -> ElementSet {
        let children = self.elements.iter().flat_map(|element| {
            element
                .children()
                .filter(|child| child.as_element().is_some())
        });
        self.derive(dom::dedup(children))
    }

    fn derive(&self, elements: Vec<NodeRef>) -> ElementSet {
        ElementSet::new(&self.document, elements)
    }
}

impl<'a> IntoIterator for &'a ElementSet {
    type Item = &'a NodeRef;
    type IntoIter = std::slice::Iter<'a, NodeRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
