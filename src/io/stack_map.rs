//! Stack → observation-list mapping files.
//!
//! One stack per line: the stack identifier, whitespace, then a
//! comma-separated observation list. Blank lines and `#` comments are
//! ignored.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{FormatError, FovError, Result};

/// Mapping from stack identifiers to their member observation ids.
#[derive(Debug, Clone, Default)]
pub struct StackMap {
    stacks: HashMap<String, Vec<String>>,
}

impl StackMap {
    /// Reads a mapping file.
    ///
    /// # Errors
    ///
    /// Returns an error annotated with the path if the file cannot be
    /// read or a line is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| FovError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text)?)
    }

    /// Parses mapping text.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::MalformedStackLine`] for a line without
    /// exactly two fields or a repeated stack identifier, and
    /// [`FormatError::EmptyStack`] for a stack with no observations.
    pub fn parse(text: &str) -> std::result::Result<Self, FormatError> {
        let mut stacks = HashMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let (Some(stack), Some(members), None) =
                (fields.next(), fields.next(), fields.next())
            else {
                return Err(FormatError::MalformedStackLine { line: idx + 1 });
            };

            let obsids: Vec<String> = members
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect();
            if obsids.is_empty() {
                return Err(FormatError::EmptyStack {
                    stack: stack.to_owned(),
                });
            }

            if stacks.insert(stack.to_owned(), obsids).is_some() {
                return Err(FormatError::MalformedStackLine { line: idx + 1 });
            }
        }
        Ok(Self { stacks })
    }

    /// Returns the member observations of a stack.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::UnknownStack`] if the stack is not in the
    /// mapping.
    pub fn obsids(&self, stack: &str) -> std::result::Result<&[String], FormatError> {
        self.stacks
            .get(stack)
            .map(Vec::as_slice)
            .ok_or_else(|| FormatError::UnknownStack {
                stack: stack.to_owned(),
            })
    }

    /// Number of stacks in the mapping.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    /// Returns `true` if the mapping holds no stacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}
