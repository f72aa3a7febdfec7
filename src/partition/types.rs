//! Partition types

use crate::error::{Error, Result};

/// One slice of a child stream, bound to a single parent id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Placeholder name in the child path
    pub field: String,
    /// Parent id substituted for the placeholder
    pub value: String,
}

impl Partition {
    /// Create a new partition
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Substitute the parent id into a path template.
    ///
    /// The id is percent-encoded as a single path segment. Fails if the
    /// template lacks this partition's placeholder, holds another one, or
    /// the id is a dot segment.
    pub fn render(&self, template: &str) -> Result<String> {
        let placeholder = format!("{{{}}}", self.field);
        if !template.contains(&placeholder) {
            return Err(Error::partition(
                template,
                format!("path has no '{placeholder}' placeholder"),
            ));
        }
        if template.replace(&placeholder, "").contains(['{', '}']) {
            return Err(Error::partition(
                template,
                format!("unresolved placeholder left in '{template}'"),
            ));
        }
        if is_dot_segment(&self.value) {
            return Err(Error::partition(
                template,
                format!("parent id '{}' cannot be used as a path segment", self.value),
            ));
        }

        Ok(template.replace(&placeholder, &urlencoding::encode(&self.value)))
    }
}

/// `.` and `..` are resolved away by URL parsing even when percent-encoded
pub fn is_dot_segment(value: &str) -> bool {
    matches!(value, "." | "..")
}
