use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;

/// Function wrapper caching results by the JSON serialisation of the
/// arguments.
///
/// Argument values that serialise identically share one cache entry, so
/// `(1, "a")` and `(1, "a")` hit while `(1, "a")` and `("1", "a")` do not.
/// The cache grows for as long as the wrapper lives; [`Memo::clear`] is the
/// only way to shrink it.
pub struct Memo<A, R, F> {
    func: F,
    cache: RefCell<HashMap<String, R>>,
    _args: PhantomData<fn(A)>,
}

pub fn memo<A, R, F>(func: F) -> Memo<A, R, F>
where
    A: Serialize,
    R: Clone,
    F: Fn(A) -> R,
{
    Memo::new(func)
}

impl<A, R, F> Memo<A, R, F>
where
    A: Serialize,
    R: Clone,
    F: Fn(A) -> R,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            cache: RefCell::new(HashMap::new()),
            _args: PhantomData,
        }
    }

    pub fn call(&self, args: A) -> Result<R> {
        let key = serde_json::to_string(&args)?;
        if let Some(hit) = self.cache.borrow().get(&key) {
            return Ok(hit.clone());
        }

        debug!(target = "tinyquery", key = %key, "memo miss");
        // The cache is not borrowed here, so `func` may call back into this wrapper.
        let result = (self.func)(args);
        let mut cache = self.cache.borrow_mut();
        Ok(cache.entry(key).or_insert(result).clone())
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

impl<A, R, F> fmt::Debug for Memo<A, R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("cached", &self.cache.borrow().len())
            .finish_non_exhaustive()
    }
}
