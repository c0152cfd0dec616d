//! Embedding API.
//!
//! Stack indices are resolved against the active fiber: non-negative indices
//! count from the base of the innermost call frame, negative ones from the
//! top. An index outside the occupied range, or a push without room, is a
//! host bug and panics. Type mismatches never fail; they fall back to
//! `Null`, 0, an empty string or `false`.

mod dict;
mod list;
mod module;
mod stack;
mod string;
