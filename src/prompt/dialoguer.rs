//! Dialoguer-based terminal host
//!
//! dialoguer prompts block, so every widget runs on tokio's blocking pool
//! and reports back through its event channel. Terminal line editing gives
//! no per-keystroke notifications: text prompts only report submissions.

use super::interface::{ChoiceView, Displayed, PromptEvent, PromptHost, PromptWidget, TextView};
use super::request::ResumePolicy;
use crate::{
    constants::{BACK_ITEM_LABEL, BACK_TOKEN},
    error::Result,
};
use async_trait::async_trait;
use dialoguer::{Confirm, Input, Select};
use std::sync::{mpsc as std_mpsc, Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedSender};

/// Dialoguer-based implementation of [`PromptHost`]
pub struct DialoguerHost;

impl DialoguerHost {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerHost {
    fn default() -> Self {
        Self::new()
    }
}

enum Control {
    Retry,
}

/// Terminal widget. Dropping the control sender ends a waiting text prompt.
struct TerminalWidget {
    control: Option<std_mpsc::Sender<Control>>,
    message: Arc<Mutex<Option<String>>>,
}

impl PromptWidget for TerminalWidget {
    fn set_enabled(&mut self, enabled: bool) {
        // Re-enabling after a submission means the value was refused.
        if enabled {
            if let Some(control) = &self.control {
                let _ = control.send(Control::Retry);
            }
        }
    }

    fn set_busy(&mut self, _busy: bool) {}

    fn set_validation_message(&mut self, message: Option<&str>) {
        if let Ok(mut slot) = self.message.lock() {
            *slot = message.map(str::to_string);
        }
    }

    fn dispose(&mut self) {
        self.control = None;
    }
}

fn header(title: &str, step: usize, total_steps: usize) -> String {
    if total_steps > 1 {
        format!("{title} ({step}/{total_steps})")
    } else {
        title.to_string()
    }
}

impl PromptHost for DialoguerHost {
    fn show_text(&self, view: TextView) -> Result<Displayed> {
        let (events, rx) = mpsc::unbounded_channel();
        let (control, control_rx) = std_mpsc::channel();
        let message = Arc::new(Mutex::new(None));

        let shared = message.clone();
        tokio::task::spawn_blocking(move || run_text(view, events, control_rx, shared));

        let widget = TerminalWidget {
            control: Some(control),
            message,
        };
        Ok(Displayed {
            widget: Box::new(widget),
            events: rx,
        })
    }

    fn show_choice(&self, view: ChoiceView) -> Result<Displayed> {
        let (events, rx) = mpsc::unbounded_channel();
        tokio::task::spawn_blocking(move || run_choice(view, events));

        let widget = TerminalWidget {
            control: None,
            message: Arc::new(Mutex::new(None)),
        };
        Ok(Displayed {
            widget: Box::new(widget),
            events: rx,
        })
    }
}

fn run_text(
    view: TextView,
    events: UnboundedSender<PromptEvent>,
    control: std_mpsc::Receiver<Control>,
    message: Arc<Mutex<Option<String>>>,
) {
    eprintln!("{}", header(&view.title, view.step, view.total_steps));
    let prompt = if view.back_button {
        format!("{} (enter '{BACK_TOKEN}' to go back)", view.prompt)
    } else {
        view.prompt.clone()
    };

    let mut initial = view.value;
    loop {
        let input = Input::<String>::new()
            .with_prompt(&prompt)
            .with_initial_text(initial.clone())
            .allow_empty(true)
            .interact_text();

        let event = match input {
            Ok(text) if view.back_button && text.trim() == BACK_TOKEN => {
                PromptEvent::BackRequested
            }
            Ok(text) => {
                initial = text.clone();
                PromptEvent::Accepted(text)
            }
            Err(e) => {
                log::debug!("Text prompt closed: {e}");
                PromptEvent::Hidden
            }
        };

        let submitted = matches!(event, PromptEvent::Accepted(_));
        if events.send(event).is_err() || !submitted {
            return;
        }

        match control.recv() {
            Ok(Control::Retry) => {
                let refused = message.lock().ok().and_then(|mut m| m.take());
                if let Some(refused) = refused {
                    eprintln!("  {refused}");
                }
            }
            Err(_) => return,
        }
    }
}

fn run_choice(view: ChoiceView, events: UnboundedSender<PromptEvent>) {
    let mut labels: Vec<String> = view
        .items
        .iter()
        .map(|item| match &item.description {
            Some(description) => format!("{} - {description}", item.label),
            None => item.label.clone(),
        })
        .collect();
    if view.back_button {
        labels.push(BACK_ITEM_LABEL.to_string());
    }

    let selection = Select::new()
        .with_prompt(format!(
            "{}: {}",
            header(&view.title, view.step, view.total_steps),
            view.placeholder
        ))
        .items(&labels)
        .default(view.active_index.unwrap_or(0))
        .interact_opt();

    let event = match selection {
        Ok(Some(index)) if view.back_button && index == view.items.len() => {
            PromptEvent::BackRequested
        }
        Ok(Some(index)) => PromptEvent::Selected(index),
        Ok(None) => PromptEvent::Hidden,
        Err(e) => {
            log::debug!("Choice prompt closed: {e}");
            PromptEvent::Hidden
        }
    };
    let _ = events.send(event);
}

/// Asks on the terminal whether a dismissed prompt should be shown again.
pub struct ConfirmResume;

#[async_trait]
impl ResumePolicy for ConfirmResume {
    async fn should_resume(&self) -> bool {
        let answer = tokio::task::spawn_blocking(|| {
            Confirm::new().with_prompt("Resume where you left off?").default(true).interact()
        })
        .await;
        matches!(answer, Ok(Ok(true)))
    }
}
