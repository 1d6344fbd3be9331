// ABOUTME: Fixed model catalog offered by the model selector
// ABOUTME: Selection is cosmetic in mock mode and forwarded to the LLM otherwise

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl Model {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The catalog shown in the selector. The first entry is the default.
pub fn catalog() -> Vec<Model> {
    vec![
        Model::new("gpt-4", "GPT-4").with_description("Most capable model"),
        Model::new("gpt-3.5-turbo", "GPT-3.5 Turbo").with_description("Fast and efficient"),
        Model::new("claude-2", "Claude 2").with_description("Anthropic's latest model"),
        Model::new("claude-instant", "Claude Instant").with_description("Fast Claude model"),
        Model::new("palm-2", "PaLM 2").with_description("Google's latest model"),
        Model::new("llama-2-70b", "Llama 2 70B").with_description("Meta's largest model"),
        Model::new("llama-2-13b", "Llama 2 13B").with_description("Meta's efficient model"),
        Model::new("cohere-command", "Command").with_description("Cohere's latest model"),
        Model::new("mistral-7b", "Mistral 7B").with_description("Efficient open model"),
    ]
}

/// Current model selection. Pure UI state.
#[derive(Debug, Clone)]
pub struct ModelSelection {
    models: Vec<Model>,
    selected: usize,
}

impl ModelSelection {
    /// Start from the catalog, preselecting `id` when it is known
    pub fn new(id: Option<&str>) -> Self {
        let models = catalog();
        let selected = id
            .and_then(|id| models.iter().position(|m| m.id == id))
            .unwrap_or(0);
        Self { models, selected }
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn selected(&self) -> &Model {
        &self.models[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Select by index; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.models.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self::new(None)
    }
}
