//! Project Name Value Object
//!
//! The routing identity of a deployment. One name is reused as the
//! container name, image name, compose project, remote directory and
//! nginx site, so it is restricted to characters that are valid in all
//! of those places and safe inside a shell word.

use std::fmt;

/// Validated project name derived from the repository location
///
/// Always non-empty and made only of `[a-z0-9_-]`, starting and ending
/// with an alphanumeric character, with no two separators in a row.
/// That is the intersection of what compose project names and image
/// references accept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    /// Derive a project name from a repository URL
    ///
    /// Takes the last path segment, drops a `.git` suffix and sanitizes
    /// the rest.
    ///
    /// ```
    /// use hoist::domain::value_objects::ProjectName;
    ///
    /// let name = ProjectName::from_repository("https://example.com/acme.git").unwrap();
    /// assert_eq!(name.as_str(), "acme");
    /// ```
    pub fn from_repository(repository: &str) -> Option<Self> {
        let trimmed = repository.trim().trim_end_matches('/');
        let segment = trimmed
            .rsplit(|c: char| c == '/' || c == ':')
            .next()
            .unwrap_or(trimmed);
        let segment = segment.strip_suffix(".git").unwrap_or(segment);
        Self::sanitize(segment)
    }

    /// Build a project name from arbitrary text, sanitizing it
    ///
    /// Letters are lowercased. Every run of other characters becomes one
    /// separator: `_` when the run was only underscores, `-` otherwise.
    /// Leading and trailing runs are dropped.
    pub fn sanitize(raw: &str) -> Option<Self> {
        let mut name = String::with_capacity(raw.len());
        // separator run pending since the last alphanumeric
        let mut pending: Option<char> = None;

        for c in raw.chars() {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() {
                if let Some(sep) = pending.take() {
                    if !name.is_empty() {
                        name.push(sep);
                    }
                }
                name.push(c);
            } else {
                pending = match (pending, c) {
                    (None, '_') | (Some('_'), '_') => Some('_'),
                    _ => Some('-'),
                };
            }
        }

        if name.is_empty() {
            return None;
        }
        Some(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Image reference built from this project (`<name>:latest`)
    pub fn image_tag(&self) -> String {
        format!("{}:latest", self.0)
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
