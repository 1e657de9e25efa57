//! Reading and writing sequence files for the host program.
//!
//! Accepted shapes, JSON or YAML by file extension:
//! - a bare array of steps: `[{"id": 1, "texto": "..."}]`
//! - an object: `{"active": 1, "steps": [...]}`
//!
//! Files are always written back in the object shape.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::step::{FlowStep, StepId};
use super::store::StepStore;
use crate::error::SequenceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self, SequenceError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(DocumentFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Ok(DocumentFormat::Yaml)
            }
            _ => Err(SequenceError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<StepId>,
    #[serde(default)]
    pub steps: Vec<FlowStep>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentShape {
    Bare(Vec<FlowStep>),
    Full(SequenceDocument),
}

impl From<DocumentShape> for SequenceDocument {
    fn from(shape: DocumentShape) -> Self {
        match shape {
            DocumentShape::Bare(steps) => SequenceDocument {
                active: None,
                steps,
            },
            DocumentShape::Full(doc) => doc,
        }
    }
}

impl SequenceDocument {
    /// Snapshot a store, labels included
    pub fn from_store(store: &StepStore) -> Self {
        Self {
            active: store.active(),
            steps: store.steps().to_vec(),
        }
    }

    /// Validate and relabel into a store
    pub fn into_store(self) -> Result<StepStore, SequenceError> {
        StepStore::from_steps(self.steps, self.active)
    }

    pub fn parse(contents: &str, format: DocumentFormat) -> Result<Self, SequenceError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let shape: DocumentShape = match format {
            DocumentFormat::Json => serde_json::from_str(contents)?,
            DocumentFormat::Yaml => serde_yaml::from_str(contents)?,
        };
        Ok(shape.into())
    }

    pub fn render(&self, format: DocumentFormat) -> Result<String, SequenceError> {
        Ok(match format {
            DocumentFormat::Json => serde_json::to_string_pretty(self)?,
            DocumentFormat::Yaml => serde_yaml::to_string(self)?,
        })
    }
}

/// Load a sequence file. A missing file yields an empty document.
pub fn load(path: &Path) -> Result<SequenceDocument, SequenceError> {
    let format = DocumentFormat::from_path(path)?;
    if !path.exists() {
        tracing::info!(path = %path.display(), "Sequence file not found, starting empty");
        return Ok(SequenceDocument::default());
    }

    let contents = fs::read_to_string(path).map_err(|e| SequenceError::io(path, e))?;
    let doc = SequenceDocument::parse(&contents, format)?;
    tracing::debug!(path = %path.display(), steps = doc.steps.len(), "Sequence loaded");
    Ok(doc)
}

/// Write a sequence file in the format implied by its extension
pub fn save(path: &Path, doc: &SequenceDocument) -> Result<(), SequenceError> {
    let format = DocumentFormat::from_path(path)?;
    let contents = doc.render(format)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SequenceError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| SequenceError::io(path, e))?;
    tracing::debug!(path = %path.display(), steps = doc.steps.len(), "Sequence saved");
    Ok(())
}
