// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Path traversal shared by all operations.
//!
//! Writers run in two passes. [`preflight`] walks the existing structure read-only
//! and reports every error an operation can raise; only then does [`apply`] touch
//! the value. Containers on the path are detached with `Rc::make_mut`, so running
//! the engine on a shallow clone of the root leaves the original intact while
//! siblings off the path stay shared.

use crate::container::ContainerKind;
use crate::error::{Error, Result};
use crate::path::{Path, Segment};
use crate::value::Value;

use std::rc::Rc;

use log::trace;

/// Terminal action of a structural operation.
#[derive(Debug, Clone)]
pub enum Action {
    Write(Value),
    Merge(Value),
    Delete,
}

impl Action {
    fn verb(&self) -> &'static str {
        match self {
            Action::Write(_) => "setting",
            Action::Merge(_) => "merging",
            Action::Delete => "deleting",
        }
    }

    fn fabricates(&self) -> bool {
        !matches!(self, Action::Delete)
    }
}

/// Whether the existing structure reaches the target slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    Found,
    Missing,
}

/// Read-only lookup used by get/has: `container[token]` regardless of how the
/// segment was spelled, the way property access works on loosely typed data.
fn lookup<'a>(container: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match container {
        Value::Object(map) => map.get(segment.token()),
        Value::Array(items) => segment.canonical_index().and_then(|idx| items.get(idx)),
        _ => None,
    }
}

/// Lookup that only follows keys into objects and index accessors into arrays.
fn child<'a>(container: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (container, segment) {
        (Value::Object(map), Segment::Key(key)) => map.get(&**key),
        (Value::Array(items), Segment::Index(_)) => segment.offset().and_then(|idx| items.get(idx)),
        _ => None,
    }
}

/// Resolve `path` without creating anything. Null and undefined both end the walk.
pub fn resolve<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut current = root;
    for segment in path {
        if current.is_null() {
            return None;
        }
        match lookup(current, segment) {
            Some(next) if !next.is_undefined() => current = next,
            _ => return None,
        }
    }
    if current.is_nullish() {
        None
    } else {
        Some(current)
    }
}

/// Validate `action` along `path` against the current state of `root`.
pub fn preflight(
    root: &Value,
    path: &Path,
    action: &Action,
    op: &'static str,
    loose: bool,
) -> Result<Reach> {
    let segments = path.segments();
    let mut current = Some(root);

    for (depth, segment) in segments.iter().enumerate() {
        let kind = ContainerKind::of(segment);
        let container = match current {
            Some(v) if !v.is_undefined() => v,
            _ if !action.fabricates() => return Ok(Reach::Missing),
            _ if loose => return Ok(Reach::Missing),
            _ => {
                return Err(Error::UndefinedRoot {
                    action: action.verb(),
                    segment: segment.raw().to_string(),
                    path: path.clone(),
                })
            }
        };

        match ContainerKind::of_value(container) {
            Some(found) if found == kind => (),
            _ if !action.fabricates() => return Ok(Reach::Missing),
            // loose mode swaps a composite of the wrong kind for a fresh one
            Some(_) if loose => return Ok(Reach::Missing),
            _ => {
                return Err(Error::InvalidContainer {
                    op,
                    path: path.prefix(depth),
                    expected: kind.name(),
                    found: container.type_name(),
                })
            }
        }

        let next = child(container, segment);
        if depth + 1 < segments.len() {
            current = next;
            continue;
        }

        if let (Action::Merge(value), Some(existing)) = (action, next) {
            if !existing.is_nullish()
                && ContainerKind::of_value(existing) != ContainerKind::of_value(value)
            {
                return Err(Error::MergeKindMismatch {
                    path: path.clone(),
                    expected: existing.type_name(),
                    found: value.type_name(),
                });
            }
        }

        return Ok(match next {
            Some(_) => Reach::Found,
            None => Reach::Missing,
        });
    }

    Ok(Reach::Missing)
}

/// Make `value` a container of `kind`, replacing whatever is there otherwise.
fn reshape(value: &mut Value, kind: ContainerKind) {
    if ContainerKind::of_value(value) != Some(kind) {
        trace!("creating {} in place of {}", kind.name(), value.type_name());
        *value = kind.fabricate();
    }
}

/// Slot addressed by `segment` inside `container`, created if missing.
/// Arrays grow with nulls up to the requested index.
fn slot_mut<'a>(container: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    reshape(container, ContainerKind::of(segment));
    match container {
        Value::Object(map) => Some(
            Rc::make_mut(map)
                .entry(segment.token().into())
                .or_insert(Value::Undefined),
        ),
        Value::Array(items) => {
            let idx = segment.offset()?;
            let items = Rc::make_mut(items);
            if idx >= items.len() {
                items.resize(idx + 1, Value::Null);
            }
            items.get_mut(idx)
        }
        _ => None,
    }
}

/// Existing slot addressed by `segment`, detached for writing. Never creates.
fn existing_mut<'a>(container: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    match (container, segment) {
        (Value::Object(map), Segment::Key(key)) => Rc::make_mut(map).get_mut(&**key),
        (Value::Array(items), Segment::Index(_)) => {
            let idx = segment.offset()?;
            Rc::make_mut(items).get_mut(idx)
        }
        _ => None,
    }
}

fn write(container: &mut Value, segment: &Segment, value: Value) {
    if let Some(slot) = slot_mut(container, segment) {
        *slot = value;
    }
}

fn merge(container: &mut Value, segment: &Segment, value: Value) {
    let Some(slot) = slot_mut(container, segment) else {
        return;
    };
    if slot.is_nullish() {
        *slot = value;
        return;
    }

    match (slot, value) {
        (Value::Object(dest), Value::Object(source)) => {
            let dest = Rc::make_mut(dest);
            for (key, v) in source.iter().filter(|(_, v)| !v.is_undefined()) {
                dest.insert(key.clone(), v.clone());
            }
        }
        (Value::Array(dest), Value::Array(source)) => {
            let dest = Rc::make_mut(dest);
            // holes in the source leave the destination slot alone
            for (idx, v) in source.iter().enumerate().filter(|(_, v)| !v.is_undefined()) {
                match dest.get_mut(idx) {
                    Some(d) => *d = v.clone(),
                    None => {
                        dest.resize(idx, Value::Null);
                        dest.push(v.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn delete(container: &mut Value, segment: &Segment) {
    match (container, segment) {
        (Value::Object(map), Segment::Key(key)) => {
            Rc::make_mut(map).remove(&**key);
        }
        (Value::Array(items), Segment::Index(_)) => {
            if let Some(idx) = segment.offset().filter(|idx| *idx < items.len()) {
                Rc::make_mut(items).remove(idx);
            }
        }
        _ => (),
    }
}

/// Perform `action` at `path`. Assumes [`preflight`] accepted the call.
pub fn apply(root: &mut Value, path: &Path, action: Action) {
    let Some((last, parents)) = path.segments().split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        let next = if action.fabricates() {
            slot_mut(current, segment)
        } else {
            existing_mut(current, segment)
        };
        match next {
            Some(next) => current = next,
            None => return,
        }
    }

    match action {
        Action::Write(value) => write(current, last, value),
        Action::Merge(value) => merge(current, last, value),
        Action::Delete => delete(current, last),
    }
}

/// Validate, then perform `action` on `root` in place.
pub fn execute(
    root: &mut Value,
    path: &Path,
    action: Action,
    op: &'static str,
    loose: bool,
) -> Result<()> {
    let reach = preflight(root, path, &action, op, loose)?;
    if matches!(action, Action::Delete) && reach == Reach::Missing {
        return Ok(());
    }
    apply(root, path, action);
    Ok(())
}
