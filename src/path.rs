// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Path parsing.
//!
//! A path is a `.` separated list of segments. A segment starting with `[` is an
//! index accessor (`[0]`), anything else is an object key. There is no escape for
//! a literal `.` inside a key; pass pre-split segments instead.

use crate::value::Value;

use core::convert::Infallible;
use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object key.
    Key(Arc<str>),
    /// Index accessor, stored with its brackets.
    Index(Arc<str>),
}

impl Segment {
    pub fn parse(raw: &str) -> Segment {
        if raw.starts_with('[') {
            Segment::Index(raw.into())
        } else {
            Segment::Key(raw.into())
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }

    /// The segment as written in the path.
    pub fn raw(&self) -> &str {
        match self {
            Segment::Key(s) | Segment::Index(s) => s,
        }
    }

    /// Key or index token: index accessors lose their first and last character.
    pub fn token(&self) -> &str {
        match self {
            Segment::Key(key) => key,
            Segment::Index(raw) => {
                let mut chars = raw.chars();
                chars.next();
                chars.next_back();
                chars.as_str()
            }
        }
    }

    /// Integer value of an index token. Keys and malformed tokens yield `None`.
    pub fn position(&self) -> Option<i64> {
        match self {
            Segment::Index(_) => self.token().parse().ok(),
            Segment::Key(_) => None,
        }
    }

    /// Position usable against a sequence: a non-negative integer token.
    pub fn offset(&self) -> Option<usize> {
        self.position().and_then(|p| usize::try_from(p).ok())
    }

    /// Token as an array index the way property access reads it: canonical
    /// decimal only, so `01` and `+1` name nothing.
    pub fn canonical_index(&self) -> Option<usize> {
        let token = self.token();
        let canonical = match token.as_bytes() {
            [b'0'] => true,
            [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
            _ => false,
        };
        if canonical {
            token.parse().ok()
        } else {
            None
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw())
    }
}

/// Ordered list of segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Split a dotted path string. The empty string is a single empty key.
    pub fn parse(path: &str) -> Path {
        path.split('.').map(Segment::parse).collect()
    }

    /// Build a path from pre-split segments, each used as-is.
    pub fn from_segments<I, S>(segments: I) -> Path
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        segments
            .into_iter()
            .map(|s| Segment::parse(s.as_ref()))
            .collect()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// The first `n` segments.
    pub fn prefix(&self, n: usize) -> Path {
        Path {
            segments: self.segments[..n.min(self.segments.len())].to_vec(),
        }
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<T: IntoIterator<Item = Segment>>(iter: T) -> Self {
        Path {
            segments: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl FromStr for Path {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Path::parse(s))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment.raw())?;
        }
        Ok(())
    }
}

/// Raised when a value cannot be read as a path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, found {found}")]
pub struct PathSpecError {
    pub expected: &'static str,
    pub found: &'static str,
}

impl PathSpecError {
    fn segments(found: &'static str) -> PathSpecError {
        PathSpecError {
            expected: "a string or an array of strings",
            found,
        }
    }

    fn string(found: &'static str) -> PathSpecError {
        PathSpecError {
            expected: "a string",
            found,
        }
    }
}

/// Anything that can name a path: a dotted string, pre-split segments, or a
/// [`Value`] holding either.
pub trait IntoPath {
    fn into_path(self) -> Result<Path, PathSpecError>;
}

impl IntoPath for Path {
    fn into_path(self) -> Result<Path, PathSpecError> {
        Ok(self)
    }
}

impl IntoPath for &Path {
    fn into_path(self) -> Result<Path, PathSpecError> {
        Ok(self.clone())
    }
}

impl IntoPath for &str {
    fn into_path(self) -> Result<Path, PathSpecError> {
        Ok(Path::parse(self))
    }
}

impl IntoPath for String {
    fn into_path(self) -> Result<Path, PathSpecError> {
        Ok(Path::parse(&self))
    }
}

impl IntoPath for &String {
    fn into_path(self) -> Result<Path, PathSpecError> {
        Ok(Path::parse(self))
    }
}

impl IntoPath for &[&str] {
    fn into_path(self) -> Result<Path, PathSpecError> {
        Ok(Path::from_segments(self))
    }
}

impl<const N: usize> IntoPath for [&str; N] {
    fn into_path(self) -> Result<Path, PathSpecError> {
        Ok(Path::from_segments(self))
    }
}

impl IntoPath for Vec<&str> {
    fn into_path(self) -> Result<Path, PathSpecError> {
        Ok(Path::from_segments(self))
    }
}

impl IntoPath for &[String] {
    fn into_path(self) -> Result<Path, PathSpecError> {
        Ok(Path::from_segments(self))
    }
}

impl IntoPath for Vec<String> {
    fn into_path(self) -> Result<Path, PathSpecError> {
        Ok(Path::from_segments(self))
    }
}

impl IntoPath for &Value {
    fn into_path(self) -> Result<Path, PathSpecError> {
        match self {
            Value::String(s) => Ok(Path::parse(s)),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(Segment::parse(s)),
                    other => Err(PathSpecError::segments(other.type_name())),
                })
                .collect(),
            other => Err(PathSpecError::segments(other.type_name())),
        }
    }
}

/// A path given as one dotted string. Reads only take these.
pub trait IntoPathStr {
    fn into_path_str(self) -> Result<Path, PathSpecError>;
}

impl IntoPathStr for &str {
    fn into_path_str(self) -> Result<Path, PathSpecError> {
        Ok(Path::parse(self))
    }
}

impl IntoPathStr for String {
    fn into_path_str(self) -> Result<Path, PathSpecError> {
        Ok(Path::parse(&self))
    }
}

impl IntoPathStr for &String {
    fn into_path_str(self) -> Result<Path, PathSpecError> {
        Ok(Path::parse(self))
    }
}

impl IntoPathStr for &Value {
    fn into_path_str(self) -> Result<Path, PathSpecError> {
        match self {
            Value::String(s) => Ok(Path::parse(s)),
            other => Err(PathSpecError::string(other.type_name())),
        }
    }
}
