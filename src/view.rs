//! View instructions returned by page controllers
//!
//! Controllers never build HTTP responses themselves; they answer with either a
//! template to render plus its variables, or a location to redirect to.

use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};

/// Template variables, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ViewModel(Map<String, Value>);

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `value` and store it under `key`
    pub fn insert<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.0.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderInstruction {
    pub template: &'static str,
    pub model: ViewModel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectInstruction {
    pub location: String,
}

/// Controller outcome
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Render(RenderInstruction),
    Redirect(RedirectInstruction),
}

impl View {
    pub const fn render(template: &'static str, model: ViewModel) -> Self {
        Self::Render(RenderInstruction { template, model })
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect(RedirectInstruction {
            location: location.into(),
        })
    }
}
