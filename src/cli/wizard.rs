//! Demo wizard collecting the inputs needed to draft a Dockerfile
//!
//! Five steps: source folder, output file, language (with auto-detection),
//! language version when the language needs one, and the exposed port.

use super::detect::detect_language;
use crate::{
    error::{Error, Result},
    flow,
    prompt::{ChoiceRequest, PromptController, ResumePolicy, TextRequest},
    sequencer::{Step, StepRef, Transition},
    validation::{self, Debounced, Validator},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const TITLE: &str = "Draft a Dockerfile from source code";
pub const AUTO_DETECT: &str = "Auto-detect";
pub const LANGUAGES: &[&str] = &[
    "clojure", "c#", "erlang", "go", "gomodule", "java", "gradle", "javascript", "php",
    "python", "rust", "swift",
];
const TOTAL_STEPS: usize = 5;

/// Languages whose Dockerfile template needs an explicit runtime version.
/// Only these visit the version step.
fn needs_version(language: &str) -> bool {
    language == "c#"
}

/// Answers collected by the Dockerfile wizard.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerfileAnswers {
    pub source_folder: Option<String>,
    pub output_file: Option<String>,
    pub language: Option<String>,
    pub version: Option<String>,
    pub port: Option<String>,
}

/// Shared, read-only configuration of the wizard's steps.
pub struct DockerfileWizard {
    debounce: Duration,
    should_resume: Arc<dyn ResumePolicy>,
}

impl DockerfileWizard {
    pub fn new(debounce: Duration, should_resume: Arc<dyn ResumePolicy>) -> Arc<Self> {
        Arc::new(Self {
            debounce,
            should_resume,
        })
    }

    pub fn first_step(self: &Arc<Self>) -> StepRef<DockerfileAnswers> {
        Arc::new(SourceFolder {
            wizard: self.clone(),
        })
    }

    fn debounced(&self, validator: impl Validator + 'static) -> Arc<dyn Validator> {
        Arc::new(Debounced::new(validator, self.debounce))
    }

    fn text(&self, step: usize, prompt: &str, value: &Option<String>) -> TextRequest {
        TextRequest::new(TITLE, prompt)
            .step(step, TOTAL_STEPS)
            .value(value.clone().unwrap_or_default())
            .should_resume(self.should_resume.clone())
    }
}

struct SourceFolder {
    wizard: Arc<DockerfileWizard>,
}

#[async_trait]
impl Step<DockerfileAnswers> for SourceFolder {
    fn name(&self) -> &str {
        "source-folder"
    }

    async fn execute(
        &self,
        input: &mut PromptController,
        state: &mut DockerfileAnswers,
    ) -> Result<Transition<DockerfileAnswers>> {
        let request = self
            .wizard
            .text(1, "Folder with your source code (e.g. ./src)", &state.source_folder)
            .validator(self.wizard.debounced(validation::existing_dir()));
        state.source_folder = Some(flow!(input.request_text(request).await));
        Ok(Transition::Next(Arc::new(OutputFile {
            wizard: self.wizard.clone(),
        })))
    }
}

struct OutputFile {
    wizard: Arc<DockerfileWizard>,
}

#[async_trait]
impl Step<DockerfileAnswers> for OutputFile {
    fn name(&self) -> &str {
        "output-file"
    }

    async fn execute(
        &self,
        input: &mut PromptController,
        state: &mut DockerfileAnswers,
    ) -> Result<Transition<DockerfileAnswers>> {
        let request = self
            .wizard
            .text(2, "Output file destination (e.g. ./Dockerfile)", &state.output_file)
            .validator(self.wizard.debounced(validation::not_empty()));
        state.output_file = Some(flow!(input.request_text(request).await));
        Ok(Transition::Next(Arc::new(SelectLanguage {
            wizard: self.wizard.clone(),
            offer_detection: true,
        })))
    }
}

/// Language choice. Auto-detection is no longer offered once it failed.
struct SelectLanguage {
    wizard: Arc<DockerfileWizard>,
    offer_detection: bool,
}

#[async_trait]
impl Step<DockerfileAnswers> for SelectLanguage {
    fn name(&self) -> &str {
        "select-language"
    }

    async fn execute(
        &self,
        input: &mut PromptController,
        state: &mut DockerfileAnswers,
    ) -> Result<Transition<DockerfileAnswers>> {
        let detection = self.offer_detection.then_some(AUTO_DETECT);
        let request = ChoiceRequest::new(TITLE, "Select the programming language")
            .step(3, TOTAL_STEPS)
            .items(detection.into_iter().chain(LANGUAGES.iter().copied()))
            .active_label(state.language.as_deref())
            .should_resume(self.wizard.should_resume.clone());
        let pick = flow!(input.request_choice(request).await);

        if self.offer_detection && pick.label == AUTO_DETECT {
            let folder = state
                .source_folder
                .as_deref()
                .ok_or(Error::MissingAnswer("source_folder"))?;
            match detect_language(Path::new(folder)) {
                Some(language) => {
                    log::info!("Detected language '{language}' in {folder}");
                    state.language = Some(language.to_string());
                }
                None => {
                    log::warn!("Language can't be auto-detected in {folder}");
                    return Ok(Transition::Next(Arc::new(SelectLanguage {
                        wizard: self.wizard.clone(),
                        offer_detection: false,
                    })));
                }
            }
        } else {
            state.language = Some(pick.label);
        }

        let wizard = self.wizard.clone();
        match state.language.as_deref() {
            Some(language) if needs_version(language) => {
                Ok(Transition::Next(Arc::new(LanguageVersion { wizard })))
            }
            _ => {
                state.version = None;
                Ok(Transition::Next(Arc::new(Port { wizard })))
            }
        }
    }
}

struct LanguageVersion {
    wizard: Arc<DockerfileWizard>,
}

#[async_trait]
impl Step<DockerfileAnswers> for LanguageVersion {
    fn name(&self) -> &str {
        "language-version"
    }

    async fn execute(
        &self,
        input: &mut PromptController,
        state: &mut DockerfileAnswers,
    ) -> Result<Transition<DockerfileAnswers>> {
        let language = state.language.clone().ok_or(Error::MissingAnswer("language"))?;
        let request = self.wizard.text(4, &format!("Version of {language}"), &state.version);
        state.version = Some(flow!(input.request_text(request).await));
        Ok(Transition::Next(Arc::new(Port {
            wizard: self.wizard.clone(),
        })))
    }
}

struct Port {
    wizard: Arc<DockerfileWizard>,
}

#[async_trait]
impl Step<DockerfileAnswers> for Port {
    fn name(&self) -> &str {
        "port"
    }

    async fn execute(
        &self,
        input: &mut PromptController,
        state: &mut DockerfileAnswers,
    ) -> Result<Transition<DockerfileAnswers>> {
        let request = self
            .wizard
            .text(5, "Port (e.g. 8080)", &state.port)
            .validator(self.wizard.debounced(validation::port()));
        state.port = Some(flow!(input.request_text(request).await));
        Ok(Transition::Finish)
    }
}
