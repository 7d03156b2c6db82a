//! Owns the single visible prompt and turns widget events into answers

use super::guard::ValidationGuard;
use super::interface::{
    Choice, ChoiceView, Displayed, PromptEvent, PromptHost, PromptWidget, TextView,
};
use super::request::{ChoiceRequest, ResumePolicy, TextRequest};
use crate::{
    error::Result,
    flow::{FlowSignal, Prompted},
};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// The widget currently on screen. Disposed exactly once, at the latest when dropped.
struct ActivePrompt {
    widget: Box<dyn PromptWidget>,
}

impl ActivePrompt {
    fn widget(&mut self) -> &mut dyn PromptWidget {
        self.widget.as_mut()
    }
}

impl Drop for ActivePrompt {
    fn drop(&mut self) {
        self.widget.dispose();
    }
}

/// Shows prompts on a [`PromptHost`], one at a time.
pub struct PromptController {
    host: Arc<dyn PromptHost>,
    active: Option<ActivePrompt>,
    depth: usize,
    partial_text: Option<String>,
}

impl PromptController {
    pub fn new(host: Arc<dyn PromptHost>) -> Self {
        Self {
            host,
            active: None,
            depth: 0,
            partial_text: None,
        }
    }

    /// Number of steps in the sequencer's history, the current one included.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    /// Greys out the visible prompt while the next step prepares its own.
    pub(crate) fn mark_busy(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.widget().set_enabled(false);
            active.widget().set_busy(true);
        }
    }

    pub(crate) fn dispose_active(&mut self) {
        self.active = None;
    }

    /// Forgets everything left over from a finished run.
    pub(crate) fn reset(&mut self) {
        self.dispose_active();
        self.depth = 0;
        self.partial_text = None;
    }

    fn back_offered(&self) -> bool {
        self.depth > 1
    }

    /// Replaces the visible widget; the previous one is disposed first.
    fn display(
        &mut self,
        show: impl FnOnce(&dyn PromptHost) -> Result<Displayed>,
    ) -> Result<UnboundedReceiver<PromptEvent>> {
        self.dispose_active();
        let Displayed { widget, events } = show(self.host.as_ref())?;
        self.active = Some(ActivePrompt { widget });
        Ok(events)
    }

    fn widget(&mut self) -> Option<&mut dyn PromptWidget> {
        self.active.as_mut().map(ActivePrompt::widget)
    }

    pub async fn request_choice(&mut self, request: ChoiceRequest) -> Result<Prompted<Choice>> {
        self.partial_text = None;
        let back_button = self.back_offered();
        let view = ChoiceView {
            active_index: request.active_index(),
            title: request.title.clone(),
            step: request.step,
            total_steps: request.total_steps,
            placeholder: request.placeholder.clone(),
            items: request.items.clone(),
            back_button,
        };
        let mut events = self.display(|host| host.show_choice(view))?;

        loop {
            match events.recv().await {
                Some(PromptEvent::Selected(index)) => match request.items.get(index) {
                    Some(choice) => return Ok(Prompted::Value(choice.clone())),
                    None => log::warn!(
                        "Ignoring selection {index} outside of {} choices",
                        request.items.len()
                    ),
                },
                Some(PromptEvent::BackRequested) if back_button => {
                    return Ok(Prompted::Signal(FlowSignal::Back));
                }
                Some(PromptEvent::Hidden) | None => {
                    return Ok(Prompted::Signal(dismissed(&request.should_resume).await));
                }
                Some(event) => log::debug!("Ignoring {event:?} on choice prompt"),
            }
        }
    }

    pub async fn request_text(&mut self, request: TextRequest) -> Result<Prompted<String>> {
        let mut value = self.partial_text.take().unwrap_or_else(|| request.value.clone());
        let back_button = self.back_offered();
        let validator = request.validator.clone();

        let mut guard = ValidationGuard::new();
        guard.evaluate(validator.clone(), value.clone());

        let view = TextView {
            title: request.title.clone(),
            step: request.step,
            total_steps: request.total_steps,
            value: value.clone(),
            prompt: request.prompt.clone(),
            back_button,
        };
        let mut events = self.display(|host| host.show_text(view))?;

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(PromptEvent::Changed(text)) => {
                        value = text;
                        guard.evaluate(validator.clone(), value.clone());
                    }
                    Some(PromptEvent::Accepted(text)) => {
                        value = text;
                        if let Some(widget) = self.widget() {
                            widget.set_enabled(false);
                            widget.set_busy(true);
                        }
                        let message = guard.validate_now(validator.as_ref(), &value).await;
                        if message.is_none() {
                            return Ok(Prompted::Value(value));
                        }
                        if let Some(widget) = self.widget() {
                            widget.set_validation_message(message.as_deref());
                            widget.set_enabled(true);
                            widget.set_busy(false);
                        }
                    }
                    Some(PromptEvent::BackRequested) if back_button => {
                        return Ok(Prompted::Signal(FlowSignal::Back));
                    }
                    Some(PromptEvent::Hidden) | None => {
                        let signal = dismissed(&request.should_resume).await;
                        if signal == FlowSignal::Resume {
                            self.partial_text = Some(value);
                        }
                        return Ok(Prompted::Signal(signal));
                    }
                    Some(event) => log::debug!("Ignoring {event:?} on text prompt"),
                },
                message = guard.settled() => {
                    if let Some(widget) = self.widget() {
                        widget.set_validation_message(message.as_deref());
                    }
                }
            }
        }
    }
}

async fn dismissed(policy: &Arc<dyn ResumePolicy>) -> FlowSignal {
    if policy.should_resume().await {
        FlowSignal::Resume
    } else {
        FlowSignal::Cancel
    }
}
