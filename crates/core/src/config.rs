//! TOML-based configuration system for Classbook.

use crate::api::FieldNaming;
use crate::error::{ClassbookError, Result};
use crate::models::common::Collection;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level Classbook configuration, deserialized from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassbookConfig {
    pub classbook: ClassbookSection,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Instance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassbookSection {
    pub instance_name: String,
}

/// Records API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Field names used in request bodies and list filters.
    #[serde(default)]
    pub naming: FieldNaming,
    #[serde(default)]
    pub paths: CollectionPaths,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            naming: FieldNaming::default(),
            paths: CollectionPaths::default(),
        }
    }
}

impl ApiConfig {
    /// The older Portuguese-named surface: legacy paths and field names.
    pub fn legacy(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            naming: FieldNaming::Legacy,
            paths: CollectionPaths::legacy(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".into()
}

/// Path segment used for each collection on the API.
///
/// Deployments of the older API surface serve the same data under
/// `cursos`, `turmas`, `estudantes`, `matriculas` and `notas`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionPaths {
    #[serde(default = "default_courses_path")]
    pub courses: String,
    #[serde(default = "default_classes_path")]
    pub classes: String,
    #[serde(default = "default_students_path")]
    pub students: String,
    #[serde(default = "default_enrollments_path")]
    pub enrollments: String,
    #[serde(default = "default_grades_path")]
    pub grades: String,
}

impl Default for CollectionPaths {
    fn default() -> Self {
        Self {
            courses: default_courses_path(),
            classes: default_classes_path(),
            students: default_students_path(),
            enrollments: default_enrollments_path(),
            grades: default_grades_path(),
        }
    }
}

fn default_courses_path() -> String {
    Collection::Courses.as_str().into()
}

fn default_classes_path() -> String {
    Collection::Classes.as_str().into()
}

fn default_students_path() -> String {
    Collection::Students.as_str().into()
}

fn default_enrollments_path() -> String {
    Collection::Enrollments.as_str().into()
}

fn default_grades_path() -> String {
    Collection::Grades.as_str().into()
}

impl CollectionPaths {
    /// Paths of the older Portuguese-named API surface.
    pub fn legacy() -> Self {
        Self {
            courses: "cursos".into(),
            classes: "turmas".into(),
            students: "estudantes".into(),
            enrollments: "matriculas".into(),
            grades: "notas".into(),
        }
    }

    pub fn path_for(&self, collection: Collection) -> &str {
        match collection {
            Collection::Courses => &self.courses,
            Collection::Classes => &self.classes,
            Collection::Students => &self.students,
            Collection::Enrollments => &self.enrollments,
            Collection::Grades => &self.grades,
        }
    }
}

impl ClassbookConfig {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ClassbookError::Config(format!("failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Write the configuration as TOML to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ClassbookError::Serialization(format!("failed to write config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration, returning an error for unusable values.
    pub fn validate(&self) -> Result<()> {
        if self.classbook.instance_name.trim().is_empty() {
            return Err(ClassbookError::Config(
                "classbook.instance_name must not be empty".into(),
            ));
        }

        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ClassbookError::Config(
                "api.base_url must not be empty".into(),
            ));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClassbookError::Config(format!(
                "api.base_url must be an http(s) URL, got {base_url}"
            )));
        }

        for collection in Collection::ALL {
            let segment = self.api.paths.path_for(collection);
            if segment.trim_matches('/').is_empty() {
                return Err(ClassbookError::Config(format!(
                    "api.paths.{collection} must not be empty"
                )));
            }
        }

        Ok(())
    }

    /// A default configuration pointing at a local API.
    pub fn generate_default() -> Self {
        Self {
            classbook: ClassbookSection {
                instance_name: "Classbook".into(),
            },
            api: ApiConfig::default(),
        }
    }
}
