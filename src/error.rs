// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::path::Path;

use thiserror::Error;

/// Errors reported by path operations.
///
/// All of them are raised before the target value is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The path is not a string or a sequence of strings, or cannot address anything.
    #[error("prop-ops - {op}: invalid parameter: path ({reason})")]
    InvalidPath { op: &'static str, reason: String },

    /// A value that must be an object or an array is something else.
    #[error("prop-ops - {op}: invalid parameter: obj (expected {expected} at `{path}`, found {found})")]
    InvalidContainer {
        op: &'static str,
        path: Path,
        expected: &'static str,
        found: &'static str,
    },

    /// The value argument is undefined, or not a composite for merge.
    #[error("prop-ops - {op}: invalid parameter: value ({reason})")]
    InvalidValue { op: &'static str, reason: String },

    /// An array was merged into an object or the other way round.
    #[error("prop-ops - merge: attempted to merge {found} into {expected} at `{path}`")]
    MergeKindMismatch {
        path: Path,
        expected: &'static str,
        found: &'static str,
    },

    /// Strict mode met an absent container.
    #[error("prop-ops - Error {action} {segment} of {path}: object is undefined")]
    UndefinedRoot {
        action: &'static str,
        segment: String,
        path: Path,
    },
}

pub type Result<T> = core::result::Result<T, Error>;
