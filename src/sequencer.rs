//! Step sequencing with a back-navigation history
//!
//! A wizard is a chain of [`Step`]s. Each step shows one prompt through the
//! [`PromptController`], writes the answer into the accumulator and names the
//! step that follows. The sequencer keeps every entered step on a history
//! stack so the user can walk backwards, retry a dismissed prompt or cancel.
//!
//! ```no_run
//! use async_trait::async_trait;
//! use multistep::{flow, prompt::{ChoiceRequest, PromptController}};
//! use multistep::sequencer::{Step, Transition};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Answers {
//!     color: Option<String>,
//! }
//!
//! struct PickColor;
//!
//! #[async_trait]
//! impl Step<Answers> for PickColor {
//!     fn name(&self) -> &str {
//!         "pick-color"
//!     }
//!
//!     async fn execute(
//!         &self,
//!         input: &mut PromptController,
//!         state: &mut Answers,
//!     ) -> multistep::error::Result<Transition<Answers>> {
//!         let request = ChoiceRequest::new("Colors", "Pick a color")
//!             .items(["red", "green"])
//!             .active_label(state.color.as_deref());
//!         let pick = flow!(input.request_choice(request).await);
//!         state.color = Some(pick.label);
//!         Ok(Transition::Finish)
//!     }
//! }
//!
//! # async fn demo(host: Arc<dyn multistep::prompt::PromptHost>) -> multistep::error::Result<()> {
//! let mut answers = Answers::default();
//! multistep::run(host, Arc::new(PickColor), &mut answers).await?;
//! # Ok(())
//! # }
//! ```

use crate::{
    error::{Error, Result},
    flow::FlowSignal,
    prompt::{PromptController, PromptHost},
};
use async_trait::async_trait;
use std::sync::Arc;

pub use crate::flow::Transition;

/// One prompt interaction of a wizard.
///
/// Steps hold no mutable state of their own; everything they collect goes
/// into the accumulator `S`, which later steps may read.
#[async_trait]
pub trait Step<S: Send>: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    async fn execute(
        &self,
        input: &mut PromptController,
        state: &mut S,
    ) -> Result<Transition<S>>;
}

pub type StepRef<S> = Arc<dyn Step<S>>;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

/// Drives a chain of steps until it finishes or the user cancels.
pub struct StepSequencer<S: Send> {
    controller: PromptController,
    history: Vec<StepRef<S>>,
}

impl<S: Send> StepSequencer<S> {
    pub fn new(host: Arc<dyn PromptHost>) -> Self {
        Self {
            controller: PromptController::new(host),
            history: Vec::new(),
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Runs the chain starting at `first`, collecting answers into `state`.
    ///
    /// Flow signals are handled here and never surface to the caller. Errors
    /// returned by a step end the run and propagate unchanged.
    pub async fn run(&mut self, first: StepRef<S>, state: &mut S) -> Result<RunOutcome> {
        let outcome = self.drive(first, state).await;
        self.history.clear();
        self.controller.reset();
        outcome
    }

    async fn drive(&mut self, first: StepRef<S>, state: &mut S) -> Result<RunOutcome> {
        let mut next = Some(first);

        while let Some(step) = next.take() {
            self.history.push(step.clone());
            self.controller.set_depth(self.history.len());
            self.controller.mark_busy();

            log::debug!("Entering step '{}' (depth {})", step.name(), self.history.len());
            let transition = step.execute(&mut self.controller, state).await?;
            log::debug!("Step '{}' returned {transition:?}", step.name());

            next = match transition {
                Transition::Next(following) => Some(following),
                Transition::Finish => return Ok(RunOutcome::Completed),
                Transition::Signal(FlowSignal::Back) => {
                    self.history.pop();
                    Some(self.history.pop().ok_or(Error::NoPreviousStep)?)
                }
                Transition::Signal(FlowSignal::Resume) => self.history.pop(),
                Transition::Signal(FlowSignal::Cancel) => {
                    log::info!("Cancelled at step '{}'", step.name());
                    return Ok(RunOutcome::Cancelled);
                }
            };
        }

        Ok(RunOutcome::Completed)
    }
}

/// Runs a wizard on `host` with a fresh sequencer.
pub async fn run<S: Send>(
    host: Arc<dyn PromptHost>,
    first: StepRef<S>,
    state: &mut S,
) -> Result<RunOutcome> {
    StepSequencer::new(host).run(first, state).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow;
    use crate::prompt::scripted::{Interaction, ScriptedHost};
    use crate::prompt::{ChoiceRequest, TextRequest};
    use crate::validation::not_empty;

    #[derive(Debug, Default)]
    struct Trace {
        visits: Vec<(String, usize)>,
        values: Vec<String>,
        resume: bool,
    }

    /// A text step that hands off to `next`, recording the depth it saw.
    struct Ask {
        name: &'static str,
        next: Option<fn() -> StepRef<Trace>>,
    }

    #[async_trait]
    impl Step<Trace> for Ask {
        fn name(&self) -> &str {
            self.name
        }

        async fn execute(
            &self,
            input: &mut PromptController,
            state: &mut Trace,
        ) -> Result<Transition<Trace>> {
            state.visits.push((self.name.to_string(), input.depth()));
            let request =
                TextRequest::new("Test", self.name).should_resume(Arc::new(state.resume));
            let value = flow!(input.request_text(request).await);
            state.values.push(value);
            Ok(match self.next {
                Some(next) => Transition::Next(next()),
                None => Transition::Finish,
            })
        }
    }

    fn third() -> StepRef<Trace> {
        Arc::new(Ask {
            name: "third",
            next: None,
        })
    }

    fn second() -> StepRef<Trace> {
        Arc::new(Ask {
            name: "second",
            next: Some(third),
        })
    }

    fn first() -> StepRef<Trace> {
        Arc::new(Ask {
            name: "first",
            next: Some(second),
        })
    }

    fn names(trace: &Trace) -> Vec<&str> {
        trace.visits.iter().map(|(name, _)| name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_linear_chain_runs_each_step_once() {
        let host = ScriptedHost::new()
            .then(Interaction::text("a"))
            .then(Interaction::text("b"))
            .then(Interaction::text("c"));
        let mut trace = Trace::default();

        let outcome = run(host.clone(), first(), &mut trace).await.unwrap();

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(names(&trace), vec!["first", "second", "third"]);
        assert_eq!(trace.values, vec!["a", "b", "c"]);
        assert_eq!(host.shown().len(), 3);
        assert!(host.widgets().iter().all(|w| w.disposed == 1));
    }

    #[tokio::test]
    async fn test_back_then_forward_keeps_history_bounded() {
        let host = ScriptedHost::new()
            .then(Interaction::text("a"))
            .then(Interaction::back())
            .then(Interaction::text("a2"))
            .then(Interaction::back())
            .then(Interaction::text("a3"))
            .then(Interaction::text("b"))
            .then(Interaction::text("c"));
        let mut trace = Trace::default();

        run(host.clone(), first(), &mut trace).await.unwrap();

        assert_eq!(
            trace.visits,
            vec![
                ("first".to_string(), 1),
                ("second".to_string(), 2),
                ("first".to_string(), 1),
                ("second".to_string(), 2),
                ("first".to_string(), 1),
                ("second".to_string(), 2),
                ("third".to_string(), 3),
            ]
        );
        assert_eq!(trace.values, vec!["a", "a2", "a3", "b", "c"]);
    }

    #[tokio::test]
    async fn test_cancel_stops_without_running_later_steps() {
        let host = ScriptedHost::new()
            .then(Interaction::text("a"))
            .then(Interaction::hide());
        let mut trace = Trace::default();

        let outcome = run(host.clone(), first(), &mut trace).await.unwrap();

        assert_eq!(outcome, RunOutcome::Cancelled);
        assert_eq!(names(&trace), vec!["first", "second"]);
        assert_eq!(trace.values, vec!["a"]);
        assert!(host.widgets().iter().all(|w| w.disposed == 1));
    }

    #[tokio::test]
    async fn test_resume_reruns_the_same_step() {
        let host = ScriptedHost::new()
            .then(Interaction::text("a"))
            .then(Interaction::edit_then_hide("par"))
            .then(Interaction::text("b"))
            .then(Interaction::text("c"));
        let mut trace = Trace {
            resume: true,
            ..Default::default()
        };

        run(host.clone(), first(), &mut trace).await.unwrap();

        assert_eq!(names(&trace), vec!["first", "second", "second", "third"]);
        assert_eq!(host.shown()[2].text().unwrap().value, "par");
    }

    struct Pick;

    #[async_trait]
    impl Step<Trace> for Pick {
        fn name(&self) -> &str {
            "pick"
        }

        async fn execute(
            &self,
            input: &mut PromptController,
            state: &mut Trace,
        ) -> Result<Transition<Trace>> {
            let request = ChoiceRequest::new("Test", "Pick").items(["x", "y"]);
            state.values.push(flow!(input.request_choice(request).await).label);
            Ok(Transition::Next(third()))
        }
    }

    #[tokio::test]
    async fn test_previous_widget_is_busy_while_next_step_runs() {
        let host = ScriptedHost::new()
            .then(Interaction::select(1))
            .then(Interaction::text("c"));
        let mut trace = Trace::default();

        run(host.clone(), Arc::new(Pick), &mut trace).await.unwrap();

        let widgets = host.widgets();
        assert!(widgets[0].busy);
        assert!(!widgets[0].enabled);
        assert_eq!(widgets[0].disposed, 1);
        assert_eq!(trace.values, vec!["y", "c"]);
    }

    struct BackFromFirst;

    #[async_trait]
    impl Step<Trace> for BackFromFirst {
        fn name(&self) -> &str {
            "back-from-first"
        }

        async fn execute(
            &self,
            _input: &mut PromptController,
            _state: &mut Trace,
        ) -> Result<Transition<Trace>> {
            Ok(Transition::Signal(FlowSignal::Back))
        }
    }

    #[tokio::test]
    async fn test_back_from_first_step_is_an_error() {
        let host = ScriptedHost::new();
        let mut trace = Trace::default();
        let result = run(host, Arc::new(BackFromFirst), &mut trace).await;
        assert!(matches!(result, Err(Error::NoPreviousStep)));
    }

    struct Broken;

    #[async_trait]
    impl Step<Trace> for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        async fn execute(
            &self,
            input: &mut PromptController,
            _state: &mut Trace,
        ) -> Result<Transition<Trace>> {
            let request = ChoiceRequest::new("Test", "Pick").items(["x"]);
            flow!(input.request_choice(request).await);
            Err(Error::MissingAnswer("language"))
        }
    }

    #[tokio::test]
    async fn test_step_error_propagates_and_disposes_widget() {
        let host = ScriptedHost::new().then(Interaction::select(0));
        let mut sequencer = StepSequencer::new(host.clone());
        let mut trace = Trace::default();

        let result = sequencer.run(Arc::new(Broken), &mut trace).await;

        assert!(matches!(result, Err(Error::MissingAnswer("language"))));
        assert_eq!(sequencer.history_len(), 0);
        assert_eq!(host.widgets()[0].disposed, 1);
    }

    /// Fails instead of resuming, leaving the dismissed text behind.
    struct FailOnResume;

    #[async_trait]
    impl Step<Trace> for FailOnResume {
        fn name(&self) -> &str {
            "fail-on-resume"
        }

        async fn execute(
            &self,
            input: &mut PromptController,
            _state: &mut Trace,
        ) -> Result<Transition<Trace>> {
            let request = TextRequest::new("Test", "Flaky").should_resume(Arc::new(true));
            match input.request_text(request).await? {
                crate::flow::Prompted::Signal(FlowSignal::Resume) => {
                    Err(Error::MissingAnswer("flaky"))
                }
                _ => Ok(Transition::Finish),
            }
        }
    }

    #[tokio::test]
    async fn test_partial_text_does_not_leak_into_next_run() {
        let host = ScriptedHost::new()
            .then(Interaction::edit_then_hide("leftover"))
            .then(Interaction::text("a"))
            .then(Interaction::text("b"))
            .then(Interaction::text("c"));
        let mut sequencer = StepSequencer::new(host.clone());

        let failed = sequencer.run(Arc::new(FailOnResume), &mut Trace::default()).await;
        assert!(matches!(failed, Err(Error::MissingAnswer("flaky"))));

        let mut trace = Trace::default();
        sequencer.run(first(), &mut trace).await.unwrap();

        assert_eq!(host.shown()[1].text().unwrap().value, "");
        assert_eq!(trace.values, vec!["a", "b", "c"]);
    }

    struct Required;

    #[async_trait]
    impl Step<Trace> for Required {
        fn name(&self) -> &str {
            "required"
        }

        async fn execute(
            &self,
            input: &mut PromptController,
            state: &mut Trace,
        ) -> Result<Transition<Trace>> {
            let request = TextRequest::new("Test", "Required").validate_with(not_empty());
            state.values.push(flow!(input.request_text(request).await));
            Ok(Transition::Finish)
        }
    }

    #[tokio::test]
    async fn test_rejected_submit_keeps_prompt_open() {
        let host = ScriptedHost::new().then(Interaction::texts(["", "ok"]));
        let mut trace = Trace::default();

        run(host.clone(), Arc::new(Required), &mut trace).await.unwrap();

        assert_eq!(trace.values, vec!["ok"]);
        assert_eq!(host.shown().len(), 1);
    }
}
