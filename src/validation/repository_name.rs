//! Repository Name Validator - Validates GitHub repository names
//!
//! Rules are checked in order and the first failing rule wins.
//!
//! # Example
//!
//! ```
//! use repo_publisher::validation::validate_repository_name;
//!
//! assert!(validate_repository_name("my-app").valid);
//!
//! let result = validate_repository_name("a..b");
//! assert!(!result.valid);
//! assert_eq!(
//!     result.error.as_deref(),
//!     Some("Repository name cannot contain consecutive periods")
//! );
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum repository name length accepted by GitHub
pub const MAX_NAME_LENGTH: usize = 100;

/// Names reserved by Windows filesystems, rejected case-insensitively
pub const RESERVED_NAMES: &[&str] = &[
    "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8",
    "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

pub const ERR_REQUIRED: &str = "Repository name is required";
pub const ERR_TOO_LONG: &str = "Repository name must be 100 characters or less";
pub const ERR_INVALID_CHARS: &str =
    "Repository name can only contain letters, numbers, periods, hyphens, and underscores";
pub const ERR_RESERVED: &str = "Repository name is reserved";
pub const ERR_EDGE_PERIOD: &str = "Repository name cannot start or end with a period";
pub const ERR_CONSECUTIVE_PERIODS: &str = "Repository name cannot contain consecutive periods";

lazy_static! {
    static ref VALID_CHARS: Regex = Regex::new(r"^[A-Za-z0-9._-]+$").unwrap();
    static ref DISALLOWED_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
    static ref REPEATED_PERIODS: Regex = Regex::new(r"\.{2,}").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Result of repository name validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NameValidation {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn fail(reason: &str) -> Self {
        Self {
            valid: false,
            error: Some(reason.to_string()),
        }
    }
}

/// Validate a candidate repository name
pub fn validate_repository_name(name: &str) -> NameValidation {
    if name.trim().is_empty() {
        return NameValidation::fail(ERR_REQUIRED);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return NameValidation::fail(ERR_TOO_LONG);
    }

    if !VALID_CHARS.is_match(name) {
        return NameValidation::fail(ERR_INVALID_CHARS);
    }

    let lower = name.to_ascii_lowercase();
    if RESERVED_NAMES.contains(&lower.as_str()) {
        return NameValidation::fail(ERR_RESERVED);
    }

    if name.starts_with('.') || name.ends_with('.') {
        return NameValidation::fail(ERR_EDGE_PERIOD);
    }

    if name.contains("..") {
        return NameValidation::fail(ERR_CONSECUTIVE_PERIODS);
    }

    NameValidation::ok()
}

/// Derive a candidate repository name from a free-form project title
///
/// The output is not guaranteed to be valid (it may be empty or reserved);
/// run it through [`validate_repository_name`].
///
/// ```
/// use repo_publisher::validation::sanitize_repository_name;
///
/// assert_eq!(sanitize_repository_name("  My Cool App! "), "My-Cool-App");
/// assert_eq!(sanitize_repository_name("..site..v2.."), "site.v2");
/// ```
pub fn sanitize_repository_name(input: &str) -> String {
    let hyphenated = WHITESPACE.replace_all(input.trim(), "-");
    let allowed = DISALLOWED_CHARS.replace_all(&hyphenated, "");
    let collapsed = REPEATED_PERIODS.replace_all(&allowed, ".");
    let is_edge = |c: char| c == '.' || c == '-';

    // The end is trimmed after truncation, the cut can land on a period or hyphen
    let truncated: String = collapsed
        .trim_start_matches(is_edge)
        .chars()
        .take(MAX_NAME_LENGTH)
        .collect();
    truncated.trim_end_matches(is_edge).to_string()
}
