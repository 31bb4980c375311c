//! Project validation
//!
//! Decides how a checked-out project is built. A compose descriptor wins
//! over a Dockerfile when both exist.

use std::fs;
use std::path::Path;

use serde_yaml_ng::Value;

use crate::domain::entities::{ProjectKind, COMPOSE_DESCRIPTORS, DOCKERFILE};
use crate::error::{HoistError, HoistResult};

/// Inspect the tree at `root` and classify it
pub fn validate_project(root: &Path) -> HoistResult<ProjectKind> {
    for descriptor in COMPOSE_DESCRIPTORS {
        let path = root.join(descriptor);
        if path.is_file() {
            check_compose(root, &path, descriptor)?;
            return Ok(ProjectKind::Compose {
                descriptor: descriptor.to_string(),
            });
        }
    }

    if root.join(DOCKERFILE).is_file() {
        return Ok(ProjectKind::Dockerfile);
    }

    Err(HoistError::UnsupportedProject {
        path: root.to_path_buf(),
        reason: format!(
            "no {} or compose file ({}) found",
            DOCKERFILE,
            COMPOSE_DESCRIPTORS.join(", ")
        ),
    })
}

/// A compose file must parse and declare at least one service
fn check_compose(root: &Path, path: &Path, descriptor: &str) -> HoistResult<()> {
    let unsupported = |reason: String| HoistError::UnsupportedProject {
        path: root.to_path_buf(),
        reason,
    };

    let content = fs::read_to_string(path)?;
    let document: Value = serde_yaml_ng::from_str(&content)
        .map_err(|e| unsupported(format!("{} is not valid YAML: {}", descriptor, e)))?;

    let has_services = document
        .get("services")
        .and_then(Value::as_mapping)
        .is_some_and(|services| !services.is_empty());
    if !has_services {
        return Err(unsupported(format!("{} declares no services", descriptor)));
    }
    Ok(())
}
