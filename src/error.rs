use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    /// The prompt host failed to display or drive a widget.
    #[error("Prompt host error: {0}.")]
    Host(String),

    /// A step asked to go back while it was the first step of the run.
    #[error("Cannot go back: there is no previous step.")]
    NoPreviousStep,

    /// A step read an answer that no earlier step has collected.
    #[error("Missing answer for '{0}'. An earlier step did not collect it.")]
    MissingAnswer(&'static str),

    #[error("Failed to parse answers. Original error: {0}")]
    AnswersParseError(#[from] serde_json::Error),

    #[error("Failed to serialize answers. Original error: {0}")]
    SerializeError(#[from] serde_yaml::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Host(err.to_string())
    }
}

/// Convenience type alias for Results with the crate error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(crate::constants::exit_codes::FAILURE);
}
