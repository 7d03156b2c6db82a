//! Prompt host that replays predefined interactions
//!
//! Useful for automation, testing, or CI/CD environments. Each displayed
//! prompt consumes the next [`Interaction`] from the queue; everything the
//! controller does to the widgets is recorded for later inspection.

use super::interface::{ChoiceView, Displayed, PromptEvent, PromptHost, PromptWidget, TextView};
use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::{self, UnboundedSender};

/// Events delivered to one displayed prompt, in order.
///
/// The prompt is hidden once the events run out, unless the interaction was
/// created with [`Interaction::open`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interaction {
    events: Vec<PromptEvent>,
    keep_open: bool,
}

impl Interaction {
    pub fn events(events: Vec<PromptEvent>) -> Self {
        Self {
            events,
            keep_open: false,
        }
    }

    /// Types `value` and submits it.
    pub fn text(value: &str) -> Self {
        Self::texts([value])
    }

    /// Submits each value in turn, as if earlier ones were rejected.
    pub fn texts<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let events = values
            .into_iter()
            .flat_map(|value| {
                [
                    PromptEvent::Changed(value.to_string()),
                    PromptEvent::Accepted(value.to_string()),
                ]
            })
            .collect();
        Self::events(events)
    }

    pub fn select(index: usize) -> Self {
        Self::events(vec![PromptEvent::Selected(index)])
    }

    pub fn back() -> Self {
        Self::events(vec![PromptEvent::BackRequested])
    }

    pub fn hide() -> Self {
        Self::events(Vec::new())
    }

    /// Types `value` and then dismisses the prompt without submitting.
    pub fn edit_then_hide(value: &str) -> Self {
        Self::events(vec![PromptEvent::Changed(value.to_string())])
    }

    /// Leaves the prompt waiting; drive it through [`ScriptedHost::sender`].
    pub fn open() -> Self {
        Self {
            events: Vec::new(),
            keep_open: true,
        }
    }

    fn into_events(self) -> Vec<PromptEvent> {
        let mut events = self.events;
        if !self.keep_open {
            events.push(PromptEvent::Hidden);
        }
        events
    }
}

/// A prompt as it was handed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Text(TextView),
    Choice(ChoiceView),
}

impl Shown {
    pub fn text(&self) -> Option<&TextView> {
        match self {
            Shown::Text(view) => Some(view),
            Shown::Choice(_) => None,
        }
    }

    pub fn choice(&self) -> Option<&ChoiceView> {
        match self {
            Shown::Choice(view) => Some(view),
            Shown::Text(_) => None,
        }
    }

    fn title(&self) -> &str {
        match self {
            Shown::Text(view) => &view.title,
            Shown::Choice(view) => &view.title,
        }
    }
}

/// Everything the controller did to one widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetState {
    pub enabled: bool,
    pub busy: bool,
    pub messages: Vec<Option<String>>,
    pub disposed: usize,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            enabled: true,
            busy: false,
            messages: Vec::new(),
            disposed: 0,
        }
    }
}

impl WidgetState {
    /// The validation message currently on display.
    pub fn message(&self) -> Option<&str> {
        self.messages.last().and_then(|m| m.as_deref())
    }
}

struct ScriptedWidget {
    title: String,
    state: Arc<Mutex<WidgetState>>,
}

impl ScriptedWidget {
    fn state(&self) -> MutexGuard<'_, WidgetState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PromptWidget for ScriptedWidget {
    fn set_enabled(&mut self, enabled: bool) {
        self.state().enabled = enabled;
    }

    fn set_busy(&mut self, busy: bool) {
        self.state().busy = busy;
    }

    fn set_validation_message(&mut self, message: Option<&str>) {
        if let Some(message) = message {
            log::debug!("Scripted prompt '{}' shows: {message}", self.title);
        }
        self.state().messages.push(message.map(str::to_string));
    }

    fn dispose(&mut self) {
        self.state().disposed += 1;
    }
}

#[derive(Default)]
struct Script {
    queue: VecDeque<Interaction>,
    accept_defaults: bool,
    shown: Vec<Shown>,
    widgets: Vec<Arc<Mutex<WidgetState>>>,
    senders: Vec<UnboundedSender<PromptEvent>>,
}

/// Host answering prompts from a queue of [`Interaction`]s.
#[derive(Default)]
pub struct ScriptedHost {
    script: Mutex<Script>,
}

impl ScriptedHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues the interaction for the next prompt that has none yet.
    pub fn then(self: Arc<Self>, interaction: Interaction) -> Arc<Self> {
        self.script().queue.push_back(interaction);
        self
    }

    /// Once the queue is empty, submit prefilled text and pre-selected
    /// choices instead of dismissing the prompt.
    pub fn accept_defaults(self: Arc<Self>, accept: bool) -> Arc<Self> {
        self.script().accept_defaults = accept;
        self
    }

    pub fn shown(&self) -> Vec<Shown> {
        self.script().shown.clone()
    }

    pub fn widgets(&self) -> Vec<WidgetState> {
        self.script()
            .widgets
            .iter()
            .map(|w| w.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone())
            .collect()
    }

    /// Event sender of the `index`-th displayed prompt.
    pub fn sender(&self, index: usize) -> Option<UnboundedSender<PromptEvent>> {
        self.script().senders.get(index).cloned()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn display(&self, shown: Shown) -> Result<Displayed> {
        let mut script = self.script();
        let events = match script.queue.pop_front() {
            Some(interaction) => interaction.into_events(),
            None if script.accept_defaults => default_answer(&shown),
            None => vec![PromptEvent::Hidden],
        };
        log::info!("Scripted prompt '{}' receives {events:?}", shown.title());

        let (tx, rx) = mpsc::unbounded_channel();
        for event in events {
            tx.send(event).map_err(|e| Error::Host(e.to_string()))?;
        }

        let state = Arc::new(Mutex::new(WidgetState::default()));
        let widget = ScriptedWidget {
            title: shown.title().to_string(),
            state: state.clone(),
        };
        script.shown.push(shown);
        script.widgets.push(state);
        script.senders.push(tx);

        Ok(Displayed {
            widget: Box::new(widget),
            events: rx,
        })
    }
}

fn default_answer(shown: &Shown) -> Vec<PromptEvent> {
    let answer = match shown {
        Shown::Text(view) => PromptEvent::Accepted(view.value.clone()),
        Shown::Choice(view) => PromptEvent::Selected(view.active_index.unwrap_or(0)),
    };
    // A rejected default must not leave the prompt waiting forever.
    vec![answer, PromptEvent::Hidden]
}

impl PromptHost for ScriptedHost {
    fn show_text(&self, view: TextView) -> Result<Displayed> {
        self.display(Shown::Text(view))
    }

    fn show_choice(&self, view: ChoiceView) -> Result<Displayed> {
        self.display(Shown::Choice(view))
    }
}
