//! Project configuration
//!
//! Naming data used to prefix packages and file paths. Validation failures
//! here are the only errors that abort a whole generation run.

use serde::{Deserialize, Serialize};

use super::error::GenerationError;
use super::naming::is_java_identifier;

/// Project naming and output options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    /// Maven-style group id, e.g. `com.example`
    #[serde(alias = "group", alias = "group_id", alias = "packageName")]
    pub group_id: String,
    /// Project (artifact) name, e.g. `shop-backend`
    #[serde(alias = "name", alias = "project_name", alias = "artifactId")]
    pub project_name: String,
    pub description: String,
    /// Also build the mobile-client mapping
    #[serde(alias = "emit_client")]
    pub emit_client: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            group_id: "com.example".to_string(),
            project_name: "demo".to_string(),
            description: String::new(),
            emit_client: true,
        }
    }
}

impl ProjectConfig {
    pub fn new(group_id: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            project_name: project_name.into(),
            ..Self::default()
        }
    }

    pub fn with_client(mut self, emit_client: bool) -> Self {
        self.emit_client = emit_client;
        self
    }

    /// Check that the configuration can produce valid package names
    pub fn validate(&self) -> Result<(), GenerationError> {
        let group = self.group_id.trim();
        if group.is_empty() {
            return Err(GenerationError::invalid_config("group id is empty"));
        }
        if let Some(segment) = group.split('.').find(|s| !is_java_identifier(s)) {
            return Err(GenerationError::invalid_config(format!(
                "group id `{}` has an invalid segment `{}`",
                group, segment
            )));
        }
        if !self.project_name.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(GenerationError::invalid_config(format!(
                "project name `{}` must contain at least one letter or digit",
                self.project_name
            )));
        }
        Ok(())
    }

    /// Last package segment derived from the project name
    pub fn project_segment(&self) -> String {
        let segment: String = self
            .project_name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        if segment.starts_with(|c: char| c.is_ascii_digit()) {
            format!("_{}", segment)
        } else {
            segment
        }
    }

    /// Root package of the generated backend, e.g. `com.example.shopbackend`
    pub fn base_package(&self) -> String {
        format!("{}.{}", self.group_id.trim(), self.project_segment())
    }
}
