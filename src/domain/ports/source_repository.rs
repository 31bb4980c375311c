//! Source repository port
//!
//! Version control operations the fetch stage needs. Implementations
//! must never put the raw credential into a `CommandFailure`.

use std::path::Path;

use crate::error::CommandFailure;

pub trait SourceRepository {
    /// Whether `path` already holds a checkout
    fn is_checkout(&self, path: &Path) -> bool;

    /// Clone `url` into `dest` (which must not exist or be empty)
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), CommandFailure>;

    /// Update `origin/<branch>` in the checkout at `path` from `url`
    ///
    /// Works for branches created after the checkout was cloned.
    fn fetch(&self, path: &Path, url: &str, branch: &str) -> Result<(), CommandFailure>;

    /// Point the working tree at `origin/<branch>`, discarding local changes
    fn checkout(&self, path: &Path, branch: &str) -> Result<(), CommandFailure>;
}
