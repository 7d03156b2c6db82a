/// Handles argument parsing and the demo wizard.
pub mod cli;

/// Shared defaults and limits.
pub mod constants;

/// Defines custom error types.
pub mod error;

/// Flow signals and step transitions.
pub mod flow;

/// Prompt controller and UI hosts.
pub mod prompt;

/// Runs steps in order with back navigation.
pub mod sequencer;

/// Answer validators
pub mod validation;

pub use sequencer::{run, RunOutcome, Step, StepRef, StepSequencer};
pub use flow::{FlowSignal, Prompted, Transition};
