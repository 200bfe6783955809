use serde_json::Value;
use tracing::warn;

use crate::collection::Collection;

/// `0, 1, …, stop - 1`.
pub fn range(stop: i64) -> Collection {
    range_step(0, stop, 1)
}

/// `start, start + 1, …` strictly below `stop`.
pub fn range_from(start: i64, stop: i64) -> Collection {
    range_step(start, stop, 1)
}

/// `start, start + step, …` strictly below `stop`.
///
/// # Hazard
///
/// A zero or negative `step` with `start < stop` never reaches `stop`: the
/// call does not return and keeps allocating. Arguments are not validated;
/// callers must not pass them. A sequence that would overflow `i64` ends at
/// the last representable value.
pub fn range_step(start: i64, stop: i64, step: i64) -> Collection {
    if step <= 0 && start < stop {
        warn!(
            target = "tinyquery",
            start, stop, step, "range step never reaches stop"
        );
    }

    let mut items = Vec::new();
    let mut current = start;
    while current < stop {
        items.push(Value::from(current));
        match current.checked_add(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    Collection::Seq(items)
}
