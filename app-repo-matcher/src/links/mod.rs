//! Extraction of GitHub repository links from app store metadata.
//!
//! App details are arbitrary nested JSON. Every string in the document is
//! searched for `github.com/<owner>/<name>` and the `<owner>/<name>` part is
//! collected.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use tracing::trace;

/// Pattern matching a GitHub repository link.
///
/// The first capture group is the `owner/name` part.
pub const DEFAULT_LINK_PATTERN: &str = r"github\.com/([A-Za-z0-9_-]+/[A-Za-z0-9_-]+)";

/// One step from a JSON node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object member.
    Key(String),
    /// Array element.
    Index(usize),
}

/// A link found in a document together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    /// Path from the document root to the string containing the link.
    pub path: Vec<PathSegment>,
    /// The captured `owner/name`.
    pub link: String,
}

/// Formats a path as `$.key[0].other`.
pub struct DisplayPath<'a>(pub &'a [PathSegment]);

impl fmt::Display for DisplayPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in self.0 {
            match segment {
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Finds repository links in JSON documents.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    pattern: Regex,
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_LINK_PATTERN).expect("default link pattern is valid"),
        }
    }
}

impl LinkExtractor {
    /// Creates an extractor for a custom pattern.
    ///
    /// If the pattern has a capture group, the first group is collected,
    /// otherwise the whole match.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regular expression.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Returns the distinct links found anywhere in `document`.
    pub fn extract(&self, document: &Value) -> BTreeSet<String> {
        self.extract_with_paths(document)
            .into_iter()
            .map(|found| found.link)
            .collect()
    }

    /// Returns every link occurrence in document order, with its path.
    ///
    /// Traverses with an explicit stack, so nesting depth is bounded only by
    /// memory.
    pub fn extract_with_paths(&self, document: &Value) -> Vec<LinkMatch> {
        let mut found = Vec::new();
        let mut stack: Vec<(&Value, Vec<PathSegment>)> = vec![(document, Vec::new())];

        while let Some((node, path)) = stack.pop() {
            match node {
                Value::Object(members) => {
                    // Reversed so members are visited in order.
                    for (key, child) in members.iter().rev() {
                        stack.push((child, child_path(&path, PathSegment::Key(key.clone()))));
                    }
                }
                Value::Array(items) => {
                    for (index, child) in items.iter().enumerate().rev() {
                        stack.push((child, child_path(&path, PathSegment::Index(index))));
                    }
                }
                Value::String(text) => {
                    for link in self.find_in(text) {
                        trace!(path = %DisplayPath(&path), link, "Found repository link");
                        found.push(LinkMatch {
                            path: path.clone(),
                            link: link.to_string(),
                        });
                    }
                }
                Value::Null | Value::Bool(_) | Value::Number(_) => {}
            }
        }

        found
    }

    fn find_in<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        self.pattern.captures_iter(text).filter_map(|captures| {
            captures
                .get(1)
                .or_else(|| captures.get(0))
                .map(|group| group.as_str())
        })
    }
}

fn child_path(parent: &[PathSegment], segment: PathSegment) -> Vec<PathSegment> {
    let mut path = Vec::with_capacity(parent.len() + 1);
    path.extend_from_slice(parent);
    path.push(segment);
    path
}
