//! Interactive prompt handling
//!
//! The module is structured in layers:
//! - `interface`: pure abstract interfaces between the controller and a UI host
//! - `request`: what a step asks for, with its validator and resume policy
//! - `guard`: last-issued-wins filtering of asynchronous validation results
//! - `controller`: owns the single visible prompt and turns events into answers
//! - `dialoguer`: terminal host built on the dialoguer library
//! - `scripted`: host replaying predefined interactions

pub mod controller;
pub mod dialoguer;
pub mod guard;
pub mod interface;
pub mod request;
pub mod scripted;

pub use controller::PromptController;
pub use interface::*;
pub use request::{ChoiceRequest, ResumePolicy, TextRequest};
