//! Locations inside a value and their text forms.
//!
//! A [`Path`] is the sequence of record keys and list indices leading from
//! the root to a sub-value. The root itself is the empty path, which renders
//! as empty text in every format.

use std::fmt::Write as _;

use crate::options::PathFormat;

/// One step into a container.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A record key.
    Key(String),
    /// A list position.
    Index(usize),
}

impl Segment {
    /// The key as it appears in missing-key messages.
    pub fn label(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }
}

/// A location inside a value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The root location.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Drop trailing segments until `len` remain.
    pub fn truncate(&mut self, len: usize) {
        self.segments.truncate(len);
    }

    /// Render in the given format.
    ///
    /// - [`PathFormat::Structured`]: `["a"][2]["b"]`, keys JSON-escaped.
    /// - [`PathFormat::Dot`]: `a.2.b`, indices written like keys.
    pub fn render(&self, format: PathFormat) -> String {
        let mut out = String::new();
        match format {
            PathFormat::Structured => {
                for segment in &self.segments {
                    match segment {
                        Segment::Key(key) => {
                            // Serializing a str cannot fail.
                            let quoted = serde_json::to_string(key).unwrap_or_default();
                            let _ = write!(out, "[{quoted}]");
                        }
                        Segment::Index(index) => {
                            let _ = write!(out, "[{index}]");
                        }
                    }
                }
            }
            PathFormat::Dot => {
                for (i, segment) in self.segments.iter().enumerate() {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(&segment.label());
                }
            }
        }
        out
    }
}
