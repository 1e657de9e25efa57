//! Flow step records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a step. Assigned once, never reused within a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(pub u64);

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// One node of the process flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStep {
    pub id: StepId,
    /// 1-based rank within the sequence, rewritten by the store on every change
    #[serde(default)]
    pub label: String,
    pub texto: String,
}

impl FlowStep {
    pub fn new(id: impl Into<StepId>, texto: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            texto: texto.into(),
        }
    }
}

/// Normalize commit text. Returns `None` when nothing but whitespace remains.
pub fn commit_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_text_rejects_blank() {
        assert_eq!(commit_text(""), None);
        assert_eq!(commit_text("   "), None);
        assert_eq!(commit_text("\n\t "), None);
    }

    #[test]
    fn test_commit_text_trims() {
        assert_eq!(commit_text("  Aprovar \n").as_deref(), Some("Aprovar"));
    }

    #[test]
    fn test_step_deserializes_without_label() {
        let step: FlowStep = serde_json::from_str(r#"{"id": 4, "texto": "Revisar"}"#).unwrap();
        assert_eq!(step.id, StepId(4));
        assert!(step.label.is_empty());
        assert_eq!(step.texto, "Revisar");
    }

    #[test]
    fn test_step_id_serializes_as_number() {
        let json = serde_json::to_string(&FlowStep::new(7, "x")).unwrap();
        assert_eq!(json, r#"{"id":7,"label":"","texto":"x"}"#);
    }
}
