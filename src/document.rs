//! Step Documents
//!
//! The host side of the canvas: a JSON file holding the ordered steps of a
//! flow and the screens they reference, plus a [`StepStore`] that applies
//! the canvas' add/delete requests to it.

use crate::canvas::{ScreenLookup, Step, StepActions};
use crate::error::{Result, StudioError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use ulid::Ulid;

/// A named screen that steps can point at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    pub id: String,
    pub name: String,
}

/// Steps + screens of one user flow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowDocument {
    /// Flow title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Ordered steps
    #[serde(default)]
    pub steps: Vec<Step>,

    /// Screens referenced by steps
    #[serde(default)]
    pub screens: Vec<Screen>,
}

impl FlowDocument {
    /// Parse a document from JSON
    pub fn from_json(source: &str) -> Result<Self> {
        let document: FlowDocument = serde_json::from_str(source)?;
        document.validate()?;
        Ok(document)
    }

    /// Load a document file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let document = Self::from_json(&content)?;
        log::info!("Loaded {} steps from {}", document.steps.len(), path.display());
        Ok(document)
    }

    /// Write the document as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Reject duplicate step ids; the canvas keys nodes by id
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.id.as_str()) {
                return Err(StudioError::Document(format!("duplicate step id {:?}", step.id)));
            }
        }
        Ok(())
    }

    /// Screen id -> name map for the canvas
    pub fn screen_lookup(&self) -> ScreenLookup {
        self.screens
            .iter()
            .map(|s| (s.id.clone(), s.name.clone()))
            .collect()
    }

    /// Small onboarding flow used when no file is given
    pub fn sample() -> Self {
        let screen = |id: &str, name: &str| Screen {
            id: id.to_string(),
            name: name.to_string(),
        };

        Self {
            name: Some("Onboarding".to_string()),
            steps: vec![
                Step::new("open-app", "User opens the app for the first time").with_screen("welcome"),
                Step::new("sign-up", "User creates an account with email and password").with_screen("signup"),
                Step::new("verify", "User confirms the address from the verification email"),
                Step::new("first-project", "User creates a first project from a template").with_screen("dashboard"),
            ],
            screens: vec![
                screen("welcome", "Welcome"),
                screen("signup", "Sign up"),
                screen("dashboard", "Dashboard"),
            ],
        }
    }
}

/// In-memory step list that answers canvas callbacks
#[derive(Debug, Clone, Default)]
pub struct StepStore {
    document: FlowDocument,
    path: Option<PathBuf>,
    dirty: bool,
}

impl StepStore {
    /// Store without a backing file
    pub fn new(document: FlowDocument) -> Self {
        Self {
            document,
            path: None,
            dirty: false,
        }
    }

    /// Store that writes back to `path` after every change
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = FlowDocument::load(&path)?;
        Ok(Self {
            document,
            path: Some(path),
            dirty: false,
        })
    }

    pub fn document(&self) -> &FlowDocument {
        &self.document
    }

    pub fn steps(&self) -> &[Step] {
        &self.document.steps
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Changes not yet written to disk
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write to the backing file, if any
    pub fn save(&mut self) -> Result<()> {
        if let Some(ref path) = self.path {
            self.document.save(path)?;
            log::debug!("Saved {} steps to {}", self.document.steps.len(), path.display());
        }
        self.dirty = false;
        Ok(())
    }

    /// Attach a new backing file and write to it
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        self.path = Some(path.into());
        self.save()
    }

    fn changed(&mut self) {
        self.dirty = true;
        if self.path.is_some() {
            if let Err(e) = self.save() {
                log::warn!("Failed to save steps: {}", e);
            }
        }
    }
}

impl StepActions for StepStore {
    fn on_add_step(&mut self) {
        let number = self.document.steps.len() + 1;
        let step = Step::new(Ulid::new().to_string(), format!("New step {}", number));
        log::info!("Added step {}", step.id);
        self.document.steps.push(step);
        self.changed();
    }

    fn on_delete_step(&mut self, step_id: &str) {
        let before = self.document.steps.len();
        self.document.steps.retain(|s| s.id != step_id);
        if self.document.steps.len() == before {
            log::warn!("Ignoring delete of unknown step {}", step_id);
            return;
        }
        log::info!("Deleted step {}", step_id);
        self.changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let doc = FlowDocument::from_json(
            r#"{
                "name": "Checkout",
                "steps": [
                    {"id": "a", "description": "Add to cart", "screenRef": "cart"},
                    {"id": "b", "description": "Pay"}
                ],
                "screens": [{"id": "cart", "name": "Cart"}]
            }"#,
        )
        .unwrap();

        assert_eq!(doc.steps.len(), 2);
        assert_eq!(doc.screen_lookup().get("cart").map(String::as_str), Some("Cart"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = FlowDocument::from_json(
            r#"{"steps": [{"id": "a", "description": "x"}, {"id": "a", "description": "y"}]}"#,
        );
        assert!(matches!(result, Err(StudioError::Document(_))));
    }

    #[test]
    fn test_store_add_and_delete() {
        let mut store = StepStore::new(FlowDocument::sample());
        let before = store.steps().len();

        store.on_add_step();
        assert_eq!(store.steps().len(), before + 1);
        let added = store.steps().last().unwrap().clone();
        assert_eq!(added.description, format!("New step {}", before + 1));
        assert!(store.is_dirty());

        store.on_delete_step(&added.id);
        assert_eq!(store.steps().len(), before);

        store.on_delete_step("does-not-exist");
        assert_eq!(store.steps().len(), before);
    }

    #[test]
    fn test_store_writes_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flow.json");
        FlowDocument::sample().save(&path).unwrap();

        let mut store = StepStore::open(&path).unwrap();
        store.on_delete_step("verify");
        assert!(!store.is_dirty());

        let reloaded = FlowDocument::load(&path).unwrap();
        assert_eq!(reloaded.steps.len(), 3);
        assert!(reloaded.steps.iter().all(|s| s.id != "verify"));
    }
}
