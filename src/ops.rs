// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::container::ContainerKind;
use crate::engine::{self, Action, Reach};
use crate::error::{Error, Result};
use crate::path::{IntoPath, IntoPathStr, Path, PathSpecError};
use crate::value::Value;

use log::debug;

const DEFAULT_MAX_PATH_LEN: usize = 1024;
const DEFAULT_MAX_INDEX: usize = 1 << 20;

/// Path operations with their configuration.
///
/// Every structural operation comes in two flavours: the plain one leaves its
/// input untouched and returns an updated copy that shares all containers off the
/// path with the input; the `_mut` one updates the value it is given.
///
/// ```
/// use prop_ops::{PropOps, Value};
///
/// let mut ops = PropOps::new();
/// ops.set_loose(true);
///
/// let doc = ops.set(&Value::new_object(), "a.[0].b", Value::from(12u64))?;
/// assert_eq!(ops.get(&doc, "a.[0].b")?, Value::from(12u64));
/// # Ok::<(), prop_ops::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PropOps {
    loose: bool,
    max_path_len: usize,
    max_index: usize,
}

/// Create a strict instance.
impl Default for PropOps {
    fn default() -> Self {
        Self::new()
    }
}

impl PropOps {
    pub fn new() -> Self {
        Self {
            loose: false,
            max_path_len: DEFAULT_MAX_PATH_LEN,
            max_index: DEFAULT_MAX_INDEX,
        }
    }

    /// In loose mode set and merge create missing containers along the path and
    /// replace containers of the wrong kind instead of failing.
    pub fn set_loose(&mut self, loose: bool) {
        self.loose = loose;
    }

    pub fn loose(&self) -> bool {
        self.loose
    }

    /// Paths with more segments than this are rejected.
    pub fn set_max_path_len(&mut self, max_path_len: usize) {
        self.max_path_len = max_path_len;
    }

    pub fn max_path_len(&self) -> usize {
        self.max_path_len
    }

    /// Largest array index set and merge accept. Writing past the end of an
    /// array pads it with nulls up to the index.
    pub fn set_max_index(&mut self, max_index: usize) {
        self.max_index = max_index;
    }

    pub fn max_index(&self) -> usize {
        self.max_index
    }

    fn path_error(op: &'static str, err: PathSpecError) -> Error {
        Error::InvalidPath {
            op,
            reason: err.to_string(),
        }
    }

    fn check_len(&self, op: &'static str, path: &Path) -> Result<()> {
        if path.len() > self.max_path_len {
            return Err(Error::InvalidPath {
                op,
                reason: format!(
                    "{} segments exceed the limit of {}",
                    path.len(),
                    self.max_path_len
                ),
            });
        }
        Ok(())
    }

    fn read_path<P: IntoPathStr>(&self, op: &'static str, path: P) -> Result<Path> {
        let path = path
            .into_path_str()
            .map_err(|e| Self::path_error(op, e))?;
        self.check_len(op, &path)?;
        Ok(path)
    }

    fn write_path<P: IntoPath>(&self, op: &'static str, path: P, grows: bool) -> Result<Path> {
        let path = path.into_path().map_err(|e| Self::path_error(op, e))?;

        if path.is_empty() {
            return Err(Error::InvalidPath {
                op,
                reason: "path is empty".to_string(),
            });
        }
        self.check_len(op, &path)?;

        for segment in path.iter().filter(|s| s.is_index()) {
            match segment.offset() {
                None => {
                    return Err(Error::InvalidPath {
                        op,
                        reason: format!("`{segment}` is not a non-negative integer index"),
                    })
                }
                Some(idx) if grows && idx > self.max_index => {
                    return Err(Error::InvalidPath {
                        op,
                        reason: format!("index `{segment}` exceeds the limit of {}", self.max_index),
                    })
                }
                Some(_) => (),
            }
        }

        Ok(path)
    }

    fn check_container(op: &'static str, root: &Value) -> Result<()> {
        if root.is_undefined() || root.is_composite() {
            return Ok(());
        }
        Err(Error::InvalidContainer {
            op,
            path: Path::default(),
            expected: "object or array",
            found: root.type_name(),
        })
    }

    fn check_value(op: &'static str, value: &Value, composite: bool) -> Result<()> {
        if value.is_undefined() {
            return Err(Error::InvalidValue {
                op,
                reason: "value is undefined".to_string(),
            });
        }
        if composite && !value.is_composite() {
            return Err(Error::InvalidValue {
                op,
                reason: format!("expected object or array, found {}", value.type_name()),
            });
        }
        Ok(())
    }

    /// Validate the arguments of a structural operation and build its action.
    fn prepare<P: IntoPath>(
        &self,
        op: &'static str,
        root: &Value,
        path: P,
        value: Option<Value>,
    ) -> Result<(Path, Action)> {
        Self::check_container(op, root)?;
        let path = self.write_path(op, path, value.is_some())?;
        let action = match (op, value) {
            ("merge", Some(value)) => {
                Self::check_value(op, &value, true)?;
                Action::Merge(value)
            }
            (_, Some(value)) => {
                Self::check_value(op, &value, false)?;
                Action::Write(value)
            }
            (_, None) => Action::Delete,
        };
        Ok((path, action))
    }

    fn copy_on_write(&self, op: &'static str, root: &Value, path: &Path, action: Action) -> Result<Value> {
        debug!("{op} `{path}` (loose: {})", self.loose);
        let reach = engine::preflight(root, path, &action, op, self.loose)?;
        if matches!(action, Action::Delete) && reach == Reach::Missing {
            return Ok(match root {
                Value::Undefined => empty_root(path),
                _ => root.clone(),
            });
        }

        // Shallow: containers are detached one level at a time as the engine descends.
        let mut updated = root.clone();
        engine::apply(&mut updated, path, action);
        Ok(updated)
    }

    fn in_place(&self, op: &'static str, root: &mut Value, path: &Path, action: Action) -> Result<()> {
        debug!("{op} `{path}` in place (loose: {})", self.loose);
        if matches!(action, Action::Delete) && root.is_undefined() {
            *root = empty_root(path);
        }
        engine::execute(root, path, action, op, self.loose)
    }

    /// Value at `path`, or null when nothing is there.
    pub fn get<P: IntoPathStr>(&self, root: &Value, path: P) -> Result<Value> {
        self.get_or(root, path, Value::Null)
    }

    /// Value at `path`, or `fallback` when the path runs into null or undefined.
    pub fn get_or<P: IntoPathStr>(&self, root: &Value, path: P, fallback: Value) -> Result<Value> {
        Ok(self.lookup(root, path)?.cloned().unwrap_or(fallback))
    }

    /// Borrowing variant of [`PropOps::get`].
    pub fn lookup<'a, P: IntoPathStr>(&self, root: &'a Value, path: P) -> Result<Option<&'a Value>> {
        let path = self.read_path("get", path)?;
        Ok(engine::resolve(root, &path))
    }

    /// True when `path` resolves to something other than null or undefined.
    pub fn has<P: IntoPathStr>(&self, root: &Value, path: P) -> Result<bool> {
        let path = self.read_path("has", path)?;
        Ok(engine::resolve(root, &path).is_some())
    }

    pub fn set<P: IntoPath>(&self, root: &Value, path: P, value: Value) -> Result<Value> {
        let (path, action) = self.prepare("set", root, path, Some(value))?;
        self.copy_on_write("set", root, &path, action)
    }

    pub fn set_mut<P: IntoPath>(&self, root: &mut Value, path: P, value: Value) -> Result<()> {
        let (path, action) = self.prepare("set", root, path, Some(value))?;
        self.in_place("set", root, &path, action)
    }

    /// Shallow-merge `value` into the object or array at `path`.
    ///
    /// Keys of the destination missing from `value` are kept, and so are the
    /// destination elements at holes (`Value::Undefined`) of an array `value`.
    pub fn merge<P: IntoPath>(&self, root: &Value, path: P, value: Value) -> Result<Value> {
        let (path, action) = self.prepare("merge", root, path, Some(value))?;
        self.copy_on_write("merge", root, &path, action)
    }

    pub fn merge_mut<P: IntoPath>(&self, root: &mut Value, path: P, value: Value) -> Result<()> {
        let (path, action) = self.prepare("merge", root, path, Some(value))?;
        self.in_place("merge", root, &path, action)
    }

    /// Remove the key or array element at `path`. Later elements of an array
    /// shift down. Missing paths are left alone.
    pub fn del<P: IntoPath>(&self, root: &Value, path: P) -> Result<Value> {
        let (path, action) = self.prepare("del", root, path, None)?;
        self.copy_on_write("del", root, &path, action)
    }

    pub fn del_mut<P: IntoPath>(&self, root: &mut Value, path: P) -> Result<()> {
        let (path, action) = self.prepare("del", root, path, None)?;
        self.in_place("del", root, &path, action)
    }
}

/// Root a delete starts from when there is none: deleting always yields a container.
fn empty_root(path: &Path) -> Value {
    path.segments()
        .first()
        .map_or(ContainerKind::Map, ContainerKind::of)
        .fabricate()
}

fn with_loose(loose: bool) -> PropOps {
    let mut ops = PropOps::new();
    ops.set_loose(loose);
    ops
}

/// Value at `path`, or null.
pub fn get<P: IntoPathStr>(root: &Value, path: P) -> Result<Value> {
    PropOps::new().get(root, path)
}

/// Value at `path`, or `fallback`.
pub fn get_or<P: IntoPathStr>(root: &Value, path: P, fallback: Value) -> Result<Value> {
    PropOps::new().get_or(root, path, fallback)
}

pub fn lookup<P: IntoPathStr>(root: &Value, path: P) -> Result<Option<&Value>> {
    PropOps::new().lookup(root, path)
}

pub fn has<P: IntoPathStr>(root: &Value, path: P) -> Result<bool> {
    PropOps::new().has(root, path)
}

/// Copy of `root` with `value` stored at `path`.
pub fn set<P: IntoPath>(root: &Value, path: P, value: Value, loose: bool) -> Result<Value> {
    with_loose(loose).set(root, path, value)
}

/// Store `value` at `path` inside `root`.
pub fn set_mut<P: IntoPath>(root: &mut Value, path: P, value: Value, loose: bool) -> Result<()> {
    with_loose(loose).set_mut(root, path, value)
}

pub fn merge<P: IntoPath>(root: &Value, path: P, value: Value, loose: bool) -> Result<Value> {
    with_loose(loose).merge(root, path, value)
}

pub fn merge_mut<P: IntoPath>(root: &mut Value, path: P, value: Value, loose: bool) -> Result<()> {
    with_loose(loose).merge_mut(root, path, value)
}

pub fn del<P: IntoPath>(root: &Value, path: P) -> Result<Value> {
    PropOps::new().del(root, path)
}

pub fn del_mut<P: IntoPath>(root: &mut Value, path: P) -> Result<()> {
    PropOps::new().del_mut(root, path)
}
