// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::path::Segment;
use crate::value::Value;

/// The kind of container a segment addresses into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Map,
    Sequence,
}

impl ContainerKind {
    /// Index accessors need a sequence, keys need a map.
    pub fn of(segment: &Segment) -> ContainerKind {
        if segment.is_index() {
            ContainerKind::Sequence
        } else {
            ContainerKind::Map
        }
    }

    pub fn of_value(value: &Value) -> Option<ContainerKind> {
        match value {
            Value::Object(_) => Some(ContainerKind::Map),
            Value::Array(_) => Some(ContainerKind::Sequence),
            _ => None,
        }
    }

    /// A fresh empty container of this kind.
    pub fn fabricate(self) -> Value {
        match self {
            ContainerKind::Map => Value::new_object(),
            ContainerKind::Sequence => Value::new_array(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ContainerKind::Map => "object",
            ContainerKind::Sequence => "array",
        }
    }
}
