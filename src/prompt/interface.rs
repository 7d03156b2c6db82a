//! Pure interfaces between the prompt controller and a UI host
//!
//! A host renders widgets and reports what the user does with them as a
//! stream of [`PromptEvent`]s. The controller never depends on a concrete
//! UI library; see [`super::dialoguer`] and [`super::scripted`] for hosts.

use crate::error::Result;
use tokio::sync::mpsc::UnboundedReceiver;

/// A single selectable entry of a choice prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub description: Option<String>,
}

impl Choice {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl From<&str> for Choice {
    fn from(label: &str) -> Self {
        Choice::new(label)
    }
}

/// What a host needs to render a free-text prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextView {
    pub title: String,
    pub step: usize,
    pub total_steps: usize,
    pub value: String,
    pub prompt: String,
    pub back_button: bool,
}

/// What a host needs to render a single-choice prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceView {
    pub title: String,
    pub step: usize,
    pub total_steps: usize,
    pub placeholder: String,
    pub items: Vec<Choice>,
    pub active_index: Option<usize>,
    pub back_button: bool,
}

/// Notifications a displayed widget sends to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    /// The text value was edited.
    Changed(String),
    /// The user tried to submit the text value.
    Accepted(String),
    /// The user picked the item at this index.
    Selected(usize),
    /// The back affordance was triggered.
    BackRequested,
    /// The widget was dismissed without completing.
    Hidden,
}

/// Handle to a widget the host has put on screen
pub trait PromptWidget: Send {
    fn set_enabled(&mut self, enabled: bool);
    fn set_busy(&mut self, busy: bool);
    fn set_validation_message(&mut self, message: Option<&str>);
    /// Removes the widget and releases anything it holds. Called exactly once.
    fn dispose(&mut self);
}

/// A freshly shown widget together with its event stream.
///
/// Dropping `events` releases the controller's subscription; hosts observe
/// this as a closed channel.
pub struct Displayed {
    pub widget: Box<dyn PromptWidget>,
    pub events: UnboundedReceiver<PromptEvent>,
}

/// Abstract interface for the UI layer that renders prompts
pub trait PromptHost: Send + Sync {
    fn show_text(&self, view: TextView) -> Result<Displayed>;
    fn show_choice(&self, view: ChoiceView) -> Result<Displayed>;
}

impl<H: PromptHost + ?Sized> PromptHost for std::sync::Arc<H> {
    fn show_text(&self, view: TextView) -> Result<Displayed> {
        (**self).show_text(view)
    }

    fn show_choice(&self, view: ChoiceView) -> Result<Displayed> {
        (**self).show_choice(view)
    }
}
