//! Selector-driven element sets over an in-memory HTML document, plus
//! functional helpers over JSON collections.
//!
//! [`q`] is the single entry point: a string containing `.`, `#`, `[` or `<`
//! is run as a selector against a [`Document`] and yields an [`ElementSet`];
//! an array or object yields a [`Collection`].
//!
//! ```no_run
//! use serde_json::json;
//! use tinyquery::{q, Document, Handle};
//!
//! let document = Document::parse(r#"<p class="note">hi</p>"#);
//! if let Handle::Elements(notes) = q(&document, ".note")? {
//!     notes.ac(&["seen"]).set_txt("read");
//! }
//! if let Handle::Collection(numbers) = q(&document, json!([3, 0, 4]))? {
//!     assert_eq!(numbers.comp()?.val(), json!([3, 4]));
//! }
//! # Ok::<(), tinyquery::QueryError>(())
//! ```

pub mod collection;
pub mod dom;
pub mod element_set;
pub mod error;
pub mod input;
pub mod util;

use serde_json::Value;
use tracing::debug;

pub use collection::{Collection, Key, Shape};
pub use dom::{listener, DispatchOutcome, Document, DocumentConfig, Event, Listener, NodeRef};
pub use element_set::ElementSet;
pub use error::{QueryError, Result};
pub use util::{memo, range, range_from, range_step, Memo};

use input::{parse_input, ParsedInput};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "_Query";

/// What [`q`] produced for its input.
#[derive(Debug, Clone)]
pub enum Handle {
    Elements(ElementSet),
    Collection(Collection),
}

impl Handle {
    pub fn into_elements(self) -> Option<ElementSet> {
        match self {
            Handle::Elements(set) => Some(set),
            Handle::Collection(_) => None,
        }
    }

    pub fn into_collection(self) -> Option<Collection> {
        match self {
            Handle::Collection(collection) => Some(collection),
            Handle::Elements(_) => None,
        }
    }
}

/// Wraps `input` in the matching handle.
///
/// Selector-looking strings query `document`; an invalid selector surfaces as
/// [`QueryError::InvalidSelector`]. Arrays and objects become collections;
/// other values are rejected with [`QueryError::NotAContainer`].
pub fn q(document: &Document, input: impl Into<Value>) -> Result<Handle> {
    match parse_input(input.into()) {
        ParsedInput::Selector(selector) => {
            debug!(target = "tinyquery", selector = %selector, "dispatch to element set");
            ElementSet::query(document, &selector).map(Handle::Elements)
        }
        ParsedInput::Value(value) => Collection::new(value).map(Handle::Collection),
    }
}

pub use self::q as query;
