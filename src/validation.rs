//! Answer validators
//!
//! Validators are asynchronous: a text prompt may have several of them in
//! flight at once and only the most recent result is ever displayed. Every
//! stock validator also exposes its rule as a plain `check_*` function.

use crate::constants::validation::{
    EMPTY_PATH, IMAGE_TAG_MAX_LEN, NOT_A_DIRECTORY, PORT_MAX, PORT_MIN, RFC1123_MAX_LEN,
};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

/// Checks a text value, returning an error message when it is invalid.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, value: &str) -> Option<String>;
}

/// Accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidation;

#[async_trait]
impl Validator for NoValidation {
    async fn validate(&self, _value: &str) -> Option<String> {
        None
    }
}

/// Adapts a synchronous check function into a [`Validator`].
#[derive(Clone, Copy)]
pub struct FnValidator<F>(pub F);

#[async_trait]
impl<F> Validator for FnValidator<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    async fn validate(&self, value: &str) -> Option<String> {
        (self.0)(value)
    }
}

/// Delays another validator so messages don't appear while the user is typing.
pub struct Debounced<V> {
    inner: V,
    delay: Duration,
}

impl<V: Validator> Debounced<V> {
    pub fn new(inner: V, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl<V: Validator> Validator for Debounced<V> {
    async fn validate(&self, value: &str) -> Option<String> {
        tokio::time::sleep(self.delay).await;
        self.inner.validate(value).await
    }
}

static RFC1123_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-z-]+$").expect("valid regex"));
static REGISTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+(:\d+)?$").expect("valid regex"));
static IMAGE_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9._-]+$").expect("valid regex"));
static IMAGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]*$").expect("valid regex"));

const TAG_SEPARATORS: &[&str] = &[".", "-", "_"];
const TAG_INVALID_SEPARATORS: &[&str] = &["..", "___"];

/// A TCP port in `1..=65535`.
pub fn check_port(port: &str) -> Option<String> {
    let in_range = port
        .trim()
        .parse::<i64>()
        .is_ok_and(|n| (PORT_MIN as i64..=PORT_MAX as i64).contains(&n));
    if in_range {
        None
    } else {
        Some(format!("Port must be in range {PORT_MIN} to {PORT_MAX}"))
    }
}

/// An RFC 1123 label, the naming rule for most Kubernetes resources.
pub fn check_rfc1123(input: &str) -> Option<String> {
    if !RFC1123_CHARS.is_match(input) {
        return Some("Input must be lowercase alphanumeric plus '-'".to_string());
    }
    if input.len() > RFC1123_MAX_LEN {
        return Some(format!("Input length must be less than {RFC1123_MAX_LEN}"));
    }
    if input.starts_with('-') || input.ends_with('-') {
        return Some(
            "Input must start and end with a lowercase alphanumeric character".to_string(),
        );
    }
    None
}

/// A container image reference without tag, e.g. `registry:5000/team/app`.
///
/// A registry host is only recognised in front of two path components.
pub fn check_image(image: &str) -> Option<String> {
    let parts: Vec<&str> = image.split('/').collect();
    let valid = match parts.as_slice() {
        [registry, namespace, name] if !registry.is_empty() => {
            REGISTRY.is_match(registry)
                && IMAGE_PART.is_match(namespace)
                && IMAGE_PART.is_match(name)
        }
        _ => {
            let path = image.strip_prefix('/').unwrap_or(image);
            let parts: Vec<&str> = path.split('/').collect();
            parts.len() <= 2 && parts.iter().all(|part| IMAGE_PART.is_match(part))
        }
    };

    if valid {
        None
    } else {
        Some("Image must be a valid image name".to_string())
    }
}

/// A container image tag. Empty means "use the default tag".
pub fn check_image_tag(tag: &str) -> Option<String> {
    if tag.len() > IMAGE_TAG_MAX_LEN || !IMAGE_TAG.is_match(tag) {
        return Some("ImageTag must be a valid image tag".to_string());
    }
    let starts_or_ends = TAG_SEPARATORS
        .iter()
        .any(|sep| tag.starts_with(sep) || tag.ends_with(sep));
    if starts_or_ends {
        return Some("ImageTag must not start or end with a separator".to_string());
    }
    if TAG_INVALID_SEPARATORS.iter().any(|sep| tag.contains(sep)) {
        return Some("ImageTag must not contain invalid separators".to_string());
    }
    None
}

pub fn check_existing_dir(path: &str) -> Option<String> {
    if Path::new(path).is_dir() {
        None
    } else {
        Some(NOT_A_DIRECTORY.to_string())
    }
}

pub fn check_not_empty(path: &str) -> Option<String> {
    if path.is_empty() {
        Some(EMPTY_PATH.to_string())
    } else {
        None
    }
}

pub fn port() -> FnValidator<fn(&str) -> Option<String>> {
    FnValidator(check_port as fn(&str) -> Option<String>)
}

pub fn rfc1123() -> FnValidator<fn(&str) -> Option<String>> {
    FnValidator(check_rfc1123 as fn(&str) -> Option<String>)
}

pub fn image() -> FnValidator<fn(&str) -> Option<String>> {
    FnValidator(check_image as fn(&str) -> Option<String>)
}

pub fn image_tag() -> FnValidator<fn(&str) -> Option<String>> {
    FnValidator(check_image_tag as fn(&str) -> Option<String>)
}

pub fn existing_dir() -> FnValidator<fn(&str) -> Option<String>> {
    FnValidator(check_existing_dir as fn(&str) -> Option<String>)
}

pub fn not_empty() -> FnValidator<fn(&str) -> Option<String>> {
    FnValidator(check_not_empty as fn(&str) -> Option<String>)
}
