//! Qualified PHP names.
//!
//! A [`QualifiedName`] is an ordered list of namespace segments. It parses both
//! PHP's backslash form (`\App\Http\Controllers`) and dotted paths
//! (`App.Http.Controllers`), and always displays root-anchored with backslashes.

use std::fmt;

/// Namespace separator used when rendering names.
pub const SEPARATOR: char = '\\';

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    /// The global namespace (no segments).
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a name written with `\`, `/` or `.` separators.
    ///
    /// Leading/trailing separators and empty segments are ignored, so
    /// `\App\Foo`, `App\Foo` and `App.Foo` are all equal.
    pub fn parse(text: &str) -> Self {
        Self {
            segments: text
                .split(['\\', '/', '.'])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        Self {
            segments: segments.into_iter().filter(|s| !s.is_empty()).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment (the short class name), if any.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Return a new name with `segment` appended. Empty segments are ignored.
    pub fn join(&self, segment: &str) -> Self {
        let mut joined = self.clone();
        joined.push(segment);
        joined
    }

    /// Return a new name with all segments of `other` appended.
    pub fn concat(&self, other: &QualifiedName) -> Self {
        let mut joined = self.clone();
        joined.segments.extend(other.segments.iter().cloned());
        joined
    }

    pub fn push(&mut self, segment: &str) {
        if !segment.is_empty() {
            self.segments.push(segment.to_string());
        }
    }

    /// Drop the last segment. The root stays the root.
    pub fn parent(&self) -> Self {
        let mut parent = self.clone();
        parent.segments.pop();
        parent
    }

    /// True if the first segments of `self` equal `prefix` segment by segment.
    pub fn starts_with(&self, prefix: &QualifiedName) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Replace the leading `prefix` with `replacement`.
    ///
    /// Returns `None` when `self` does not start with `prefix`.
    pub fn replace_prefix(
        &self,
        prefix: &QualifiedName,
        replacement: &QualifiedName,
    ) -> Option<Self> {
        if !self.starts_with(prefix) {
            return None;
        }
        let mut segments = replacement.segments.clone();
        segments.extend(self.segments[prefix.len()..].iter().cloned());
        Some(Self { segments })
    }

    /// Name without the leading separator (`App\Foo`).
    pub fn to_relative_string(&self) -> String {
        self.segments.join("\\")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "{}", SEPARATOR);
        }
        for segment in &self.segments {
            write!(f, "{}{}", SEPARATOR, segment)?;
        }
        Ok(())
    }
}

impl From<&str> for QualifiedName {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}
