//! Typed records for the author/book domain.
//!
//! # Responsibility
//! - Define the canonical data structures used by repositories and services.
//! - Own the text normalization and validation rules shared by both records.
//!
//! # Invariants
//! - Every record is identified by a store-generated integer id.
//! - Required text fields are never empty after normalization.
//! - A book always references exactly one author (one-to-many).

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod author;
pub mod book;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Record validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is missing or blank after trimming.
    EmptyField(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} is required"),
        }
    }
}

impl Error for ValidationError {}

/// Normalizes one required text field.
///
/// Trims both ends and collapses inner whitespace runs to a single space.
/// Fails with `EmptyField(field)` when nothing remains.
pub fn normalize_required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let collapsed = WHITESPACE_RE.replace_all(value.trim(), " ");
    if collapsed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(collapsed.into_owned())
}

pub(crate) fn ensure_not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}
