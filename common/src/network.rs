//! # Range Expressions
//!
//! Turns compact expressions such as `10.0.0.1-3` or `11379-11381,6379` into
//! the explicit, ordered list of values they denote.
//!
//! * [`target::RangeItem`]: One comma separated item of an expression.
//! * [`range::expand`]: Expands a whole expression.

pub mod range;
pub mod target;
