//! End-to-end wizard runs against the scripted host

use async_trait::async_trait;
use multistep::error::Result;
use multistep::flow;
use multistep::prompt::scripted::{Interaction, ScriptedHost};
use multistep::prompt::{ChoiceRequest, PromptController, TextRequest};
use multistep::validation::not_empty;
use multistep::{run, RunOutcome, StepSequencer, Transition};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Picked {
    choice: Option<String>,
    text: Option<String>,
}

/// Entries into the first step and completions of the second.
#[derive(Default)]
struct Calls {
    choose: AtomicUsize,
    describe: AtomicUsize,
}

struct Choose {
    calls: Arc<Calls>,
    resume: bool,
}

#[async_trait]
impl multistep::Step<Picked> for Choose {
    fn name(&self) -> &str {
        "choose"
    }

    async fn execute(
        &self,
        input: &mut PromptController,
        state: &mut Picked,
    ) -> Result<Transition<Picked>> {
        self.calls.choose.fetch_add(1, Ordering::SeqCst);
        let request = ChoiceRequest::new("Demo", "Pick one")
            .step(1, 2)
            .items(["A", "B"])
            .active_label(state.choice.as_deref());
        state.choice = Some(flow!(input.request_choice(request).await).label);
        Ok(Transition::Next(Arc::new(Describe {
            calls: self.calls.clone(),
            resume: self.resume,
        })))
    }
}

struct Describe {
    calls: Arc<Calls>,
    resume: bool,
}

#[async_trait]
impl multistep::Step<Picked> for Describe {
    fn name(&self) -> &str {
        "describe"
    }

    async fn execute(
        &self,
        input: &mut PromptController,
        state: &mut Picked,
    ) -> Result<Transition<Picked>> {
        let request = TextRequest::new("Demo", "Describe it")
            .step(2, 2)
            .value(state.text.clone().unwrap_or_default())
            .validate_with(not_empty())
            .should_resume(Arc::new(self.resume));
        state.text = Some(flow!(input.request_text(request).await));
        self.calls.describe.fetch_add(1, Ordering::SeqCst);
        Ok(Transition::Finish)
    }
}

fn first(calls: &Arc<Calls>, resume: bool) -> Arc<Choose> {
    Arc::new(Choose {
        calls: calls.clone(),
        resume,
    })
}

#[test_log::test(tokio::test)]
async fn back_then_forward_collects_latest_answers() {
    let calls = Arc::new(Calls::default());
    let host = ScriptedHost::new()
        .then(Interaction::select(0))
        .then(Interaction::back())
        .then(Interaction::select(1))
        .then(Interaction::text("hello"));
    let mut picked = Picked::default();

    let outcome = run(host.clone(), first(&calls, false), &mut picked).await.unwrap();

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(picked.choice.as_deref(), Some("B"));
    assert_eq!(picked.text.as_deref(), Some("hello"));
    assert_eq!(calls.choose.load(Ordering::SeqCst), 2);
    assert_eq!(calls.describe.load(Ordering::SeqCst), 1);

    // The second visit to the first step preselects the earlier answer.
    let shown = host.shown();
    assert_eq!(shown[2].choice().unwrap().active_index, Some(0));
    assert!(!shown[2].choice().unwrap().back_button);
    assert!(shown[3].text().unwrap().back_button);
}

#[test_log::test(tokio::test)]
async fn dismissed_prompt_resumes_with_partial_text() {
    let calls = Arc::new(Calls::default());
    let host = ScriptedHost::new()
        .then(Interaction::select(0))
        .then(Interaction::edit_then_hide("hel"))
        .then(Interaction::texts(["hello"]));
    let mut picked = Picked::default();

    let outcome = run(host.clone(), first(&calls, true), &mut picked).await.unwrap();

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(host.shown()[2].text().unwrap().value, "hel");
    assert_eq!(picked.text.as_deref(), Some("hello"));
    assert_eq!(calls.choose.load(Ordering::SeqCst), 1);
}

#[test_log::test(tokio::test)]
async fn dismissed_prompt_cancels_without_resume() {
    let calls = Arc::new(Calls::default());
    let host = ScriptedHost::new().then(Interaction::select(1)).then(Interaction::hide());
    let mut picked = Picked::default();

    let outcome = run(host.clone(), first(&calls, false), &mut picked).await.unwrap();

    assert_eq!(outcome, RunOutcome::Cancelled);
    assert_eq!(picked.choice.as_deref(), Some("B"));
    assert_eq!(picked.text, None);
    assert!(host.widgets().iter().all(|w| w.disposed == 1));
}

#[test_log::test(tokio::test)]
async fn sequencer_is_reusable_after_a_run() {
    let calls = Arc::new(Calls::default());
    let host = ScriptedHost::new()
        .then(Interaction::select(0))
        .then(Interaction::text("one"))
        .then(Interaction::select(1))
        .then(Interaction::text("two"));
    let mut sequencer = StepSequencer::new(host);

    let mut first_run = Picked::default();
    sequencer.run(first(&calls, false), &mut first_run).await.unwrap();
    assert_eq!(sequencer.history_len(), 0);

    let mut second_run = Picked::default();
    sequencer.run(first(&calls, false), &mut second_run).await.unwrap();

    assert_eq!(first_run.text.as_deref(), Some("one"));
    assert_eq!(second_run.choice.as_deref(), Some("B"));
    assert_eq!(second_run.text.as_deref(), Some("two"));
}
