// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod container;
mod engine;
mod error;
mod number;
mod ops;
mod path;
mod value;

pub use container::ContainerKind;
pub use error::{Error, Result};
pub use number::Number;
pub use ops::{del, del_mut, get, get_or, has, lookup, merge, merge_mut, set, set_mut, PropOps};
pub use path::{IntoPath, IntoPathStr, Path, PathSpecError, Segment};
pub use value::{Map, Value};
