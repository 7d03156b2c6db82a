//! Requests a step hands to the [`PromptController`](super::PromptController)

use super::interface::Choice;
use crate::validation::{NoValidation, Validator};
use async_trait::async_trait;
use std::sync::Arc;

/// Decides whether a dismissed prompt should be shown again.
#[async_trait]
pub trait ResumePolicy: Send + Sync {
    async fn should_resume(&self) -> bool;
}

#[async_trait]
impl ResumePolicy for bool {
    async fn should_resume(&self) -> bool {
        *self
    }
}

/// Request for a free-text prompt
#[derive(Clone)]
pub struct TextRequest {
    pub title: String,
    pub step: usize,
    pub total_steps: usize,
    pub value: String,
    pub prompt: String,
    pub validator: Arc<dyn Validator>,
    pub should_resume: Arc<dyn ResumePolicy>,
}

impl TextRequest {
    pub fn new(title: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            step: 1,
            total_steps: 1,
            value: String::new(),
            prompt: prompt.into(),
            validator: Arc::new(NoValidation),
            should_resume: Arc::new(false),
        }
    }

    pub fn step(mut self, step: usize, total_steps: usize) -> Self {
        self.step = step;
        self.total_steps = total_steps;
        self
    }

    /// Prefills the text field, typically with a previously collected answer.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn validate_with(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    pub fn validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn should_resume(mut self, policy: Arc<dyn ResumePolicy>) -> Self {
        self.should_resume = policy;
        self
    }
}

/// Request for a single-choice prompt
#[derive(Clone)]
pub struct ChoiceRequest {
    pub title: String,
    pub step: usize,
    pub total_steps: usize,
    pub placeholder: String,
    pub items: Vec<Choice>,
    pub active_item: Option<Choice>,
    pub should_resume: Arc<dyn ResumePolicy>,
}

impl ChoiceRequest {
    pub fn new(title: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            step: 1,
            total_steps: 1,
            placeholder: placeholder.into(),
            items: Vec::new(),
            active_item: None,
            should_resume: Arc::new(false),
        }
    }

    pub fn step(mut self, step: usize, total_steps: usize) -> Self {
        self.step = step;
        self.total_steps = total_steps;
        self
    }

    pub fn items<I, C>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Choice>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Pre-selects the item whose label matches, if any.
    pub fn active_label(mut self, label: Option<&str>) -> Self {
        self.active_item = label.map(Choice::new);
        self
    }

    pub fn should_resume(mut self, policy: Arc<dyn ResumePolicy>) -> Self {
        self.should_resume = policy;
        self
    }

    pub(crate) fn active_index(&self) -> Option<usize> {
        let active = self.active_item.as_ref()?;
        self.items.iter().position(|item| item.label == active.label)
    }
}
