//! Control-flow values exchanged between prompts, steps and the sequencer.
//!
//! Prompt operations never report navigation through the error channel.
//! They return [`Prompted`], and steps hand the signal back to the sequencer
//! as a [`Transition`].

use crate::sequencer::StepRef;
use std::fmt;

/// Instruction raised when the user leaves a prompt without completing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSignal {
    /// Return to the previous step.
    Back,
    /// Abandon the run.
    Cancel,
    /// Show the current step again.
    Resume,
}

impl fmt::Display for FlowSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlowSignal::Back => "back",
            FlowSignal::Cancel => "cancel",
            FlowSignal::Resume => "resume",
        };
        write!(f, "{s}")
    }
}

/// Outcome of a single prompt interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompted<T> {
    Value(T),
    Signal(FlowSignal),
}

impl<T> Prompted<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Prompted::Value(v) => Some(v),
            Prompted::Signal(_) => None,
        }
    }

    pub fn signal(&self) -> Option<FlowSignal> {
        match self {
            Prompted::Value(_) => None,
            Prompted::Signal(s) => Some(*s),
        }
    }
}

/// What a step asks the sequencer to do once it returns.
pub enum Transition<S: Send> {
    Next(StepRef<S>),
    Finish,
    Signal(FlowSignal),
}

impl<S: Send> fmt::Debug for Transition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Next(step) => write!(f, "Next({})", step.name()),
            Transition::Finish => write!(f, "Finish"),
            Transition::Signal(signal) => write!(f, "Signal({signal})"),
        }
    }
}

/// Unwraps a `Result<Prompted<T>>` inside a step.
///
/// Errors are propagated with `?`; a flow signal ends the step with
/// `Ok(Transition::Signal(..))`.
///
/// ```ignore
/// let name = flow!(input.request_text(request).await);
/// ```
#[macro_export]
macro_rules! flow {
    ($prompted:expr) => {
        match $prompted? {
            $crate::flow::Prompted::Value(value) => value,
            $crate::flow::Prompted::Signal(signal) => {
                return Ok($crate::flow::Transition::Signal(signal));
            }
        }
    };
}
