//! Ref name validation following git-style conventions.
//!
//! A valid name is `HEAD` or `refs/` followed by one or more components.
//! Within the part after `refs/`:
//! - No whitespace, `~`, `^`, `:`, `?`, `*`, `[`, `\` or control characters
//! - No `..` and no `@{`
//! - Must not end with `.` or `.lock`
//! - Components between slashes are non-empty and do not start with `.`

use crate::error::{RefError, Result};
use crate::types::HEAD;

/// Characters that are forbidden anywhere in a ref name.
const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '~', '^', ':', '?', '*', '[', '\\'];

/// Full ref name of a branch: `refs/heads/<branch>`.
pub fn branch_ref(branch: &str) -> String {
    format!("refs/heads/{branch}")
}

/// Validate a full ref name such as `refs/heads/main` or `HEAD`.
///
/// # Examples
///
/// ```
/// use twig_refs::names::validate_ref_name;
///
/// assert!(validate_ref_name("HEAD").is_ok());
/// assert!(validate_ref_name("refs/heads/feature/auth").is_ok());
/// assert!(validate_ref_name("heads/main").is_err());
/// assert!(validate_ref_name("refs/heads/bad..name").is_err());
/// ```
pub fn validate_ref_name(name: &str) -> Result<()> {
    if name == HEAD {
        return Ok(());
    }
    match name.strip_prefix("refs/") {
        Some(rest) => check_components(name, rest),
        None => Err(invalid(name, "must be HEAD or start with 'refs/'")),
    }
}

/// Validate a short branch name such as `main` or `feature/auth`.
pub fn validate_branch_name(branch: &str) -> Result<()> {
    check_components(branch, branch)
}

fn invalid(name: &str, reason: impl Into<String>) -> RefError {
    RefError::InvalidName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn check_components(name: &str, rest: &str) -> Result<()> {
    if rest.is_empty() {
        return Err(invalid(name, "must not be empty"));
    }
    if let Some(ch) = rest
        .chars()
        .find(|c| FORBIDDEN_CHARS.contains(c) || c.is_control())
    {
        return Err(invalid(name, format!("contains forbidden character: {ch:?}")));
    }
    if rest.contains("..") {
        return Err(invalid(name, "must not contain '..'"));
    }
    if rest.contains("@{") {
        return Err(invalid(name, "must not contain '@{'"));
    }
    if rest.ends_with('.') {
        return Err(invalid(name, "must not end with '.'"));
    }
    if rest.ends_with(".lock") {
        return Err(invalid(name, "must not end with '.lock'"));
    }
    for component in rest.split('/') {
        if component.is_empty() {
            return Err(invalid(name, "path components must not be empty"));
        }
        if component.starts_with('.') {
            return Err(invalid(
                name,
                format!("component must not start with '.': {component:?}"),
            ));
        }
    }
    Ok(())
}
