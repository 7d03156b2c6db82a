use crate::{
    cli::{
        args::{Args, OutputFormat},
        wizard::{DockerfileAnswers, DockerfileWizard},
    },
    constants::STDIN_INDICATOR,
    error::Result,
    prompt::{
        dialoguer::{ConfirmResume, DialoguerHost},
        scripted::ScriptedHost,
        PromptHost, ResumePolicy,
    },
    sequencer::{RunOutcome, StepSequencer},
};
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

/// Drives the Dockerfile wizard from parsed command line arguments
pub struct Runner {
    args: Args,
}

impl Runner {
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    /// Runs the wizard on the terminal, or on predefined answers when non-interactive.
    pub async fn run(self) -> Result<()> {
        let answers = self.initial_answers(std::io::stdin())?;
        let (host, policy): (Arc<dyn PromptHost>, Arc<dyn ResumePolicy>) =
            if self.args.non_interactive {
                (ScriptedHost::new().accept_defaults(true), Arc::new(false))
            } else {
                (Arc::new(DialoguerHost::new()), Arc::new(ConfirmResume))
            };

        match self.collect(host, policy, answers).await? {
            Some(answers) => println!("{}", self.render(&answers)?),
            None => eprintln!("Cancelled."),
        }
        Ok(())
    }

    /// Runs the wizard on `host`. Returns `None` when the user cancelled.
    pub async fn collect(
        &self,
        host: Arc<dyn PromptHost>,
        policy: Arc<dyn ResumePolicy>,
        mut answers: DockerfileAnswers,
    ) -> Result<Option<DockerfileAnswers>> {
        let wizard = DockerfileWizard::new(Duration::from_millis(self.args.debounce_ms), policy);
        let mut sequencer = StepSequencer::new(host);

        match sequencer.run(wizard.first_step(), &mut answers).await? {
            RunOutcome::Completed => {
                log::debug!("Collected answers: {answers:?}");
                Ok(Some(answers))
            }
            RunOutcome::Cancelled => Ok(None),
        }
    }

    /// Predefined answers from `--answers`, with the positional source folder as fallback.
    pub fn initial_answers(&self, stdin: impl Read) -> Result<DockerfileAnswers> {
        let mut answers = match &self.args.answers {
            Some(arg) => {
                let raw = if arg == STDIN_INDICATOR { read_from(stdin)? } else { arg.clone() };
                serde_json::from_str::<DockerfileAnswers>(&raw)?
            }
            None => DockerfileAnswers::default(),
        };
        if answers.source_folder.is_none() {
            answers.source_folder = Some(self.args.source_dir.display().to_string());
        }
        Ok(answers)
    }

    pub fn render(&self, answers: &DockerfileAnswers) -> Result<String> {
        let rendered = match self.args.format {
            OutputFormat::Json => serde_json::to_string_pretty(answers)?,
            OutputFormat::Yaml => serde_yaml::to_string(answers)?,
        };
        Ok(rendered)
    }
}

/// Read content from a reader into a string.
fn read_from(mut reader: impl Read) -> Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    Ok(buf)
}

/// Main entry point for CLI execution
pub async fn run(args: Args) -> Result<()> {
    Runner::new(args).run().await
}
