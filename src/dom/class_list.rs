//! Whitespace-separated class tokens backing the `class` attribute.

use kuchiki::ElementData;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    pub fn parse(raw: &str) -> Self {
        let mut list = Self::default();
        for token in raw.split_whitespace() {
            list.add(&[token]);
        }
        list
    }

    /// Reads the current `class` attribute of `element`.
    pub fn of(element: &ElementData) -> Self {
        Self::parse(element.attributes.borrow().get("class").unwrap_or(""))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn add(&mut self, tokens: &[&str]) {
        for token in tokens {
            if !token.is_empty() && !self.contains(token) {
                self.tokens.push((*token).to_string());
            }
        }
    }

    pub fn remove(&mut self, tokens: &[&str]) {
        self.tokens.retain(|t| !tokens.contains(&t.as_str()));
    }

    /// Flips `token`, returning whether it is present afterwards.
    pub fn toggle(&mut self, token: &str) -> bool {
        if self.contains(token) {
            self.remove(&[token]);
            false
        } else {
            self.add(&[token]);
            true
        }
    }

    pub fn to_attribute(&self) -> String {
        self.tokens.join(" ")
    }

    /// Applies `update` to the class list of `element` and writes it back.
    pub(crate) fn update(element: &ElementData, update: impl FnOnce(&mut ClassList)) {
        let mut list = Self::of(element);
        update(&mut list);
        element
            .attributes
            .borrow_mut()
            .insert("class", list.to_attribute());
    }
}
