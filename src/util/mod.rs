mod memo;
mod range;

pub use memo::{memo, Memo};
pub use range::{range, range_from, range_step};
