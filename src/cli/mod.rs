pub mod args;
mod detect;
pub mod runner;
pub mod wizard;

pub use args::{get_args, get_log_level_from_verbose, Args, OutputFormat};
pub use detect::detect_language;
pub use runner::{run, Runner};
pub use wizard::{DockerfileAnswers, DockerfileWizard};
