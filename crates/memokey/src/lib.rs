//! # memokey
//!
//! Content-derived cache keys for methods whose main argument is a
//! numeric array.
//!
//! ## Architecture
//! - **ArrayLike**: shape, element type and contiguous element access
//! - **ArrayKey**: owned copy of shape, element type and contents
//! - **ArgKey / KeyPart**: hashable form of the remaining arguments
//! - **CallKey**: array key plus argument key, the full lookup key

#![warn(missing_docs)]

mod array;
mod error;
mod key;

pub use array::{Array, ArrayLike, Element, ElementType};
pub use error::{Error, Result};
pub use key::{ArgKey, ArrayKey, CallKey, KeyPart, Kwargs};
