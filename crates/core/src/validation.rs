//! Field validators used with `#[derive(validator::Validate)]`.

use std::borrow::Cow;
use std::collections::BTreeSet;

use validator::{ValidationError, ValidationErrors};

use crate::error::CoreError;

/// Reject strings that are empty or whitespace only.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Reject a cast containing an empty or whitespace-only name.
pub fn cast_members_not_blank(cast: &BTreeSet<String>) -> Result<(), ValidationError> {
    if cast.iter().any(|member| member.trim().is_empty()) {
        return Err(ValidationError::new("blank_cast_member")
            .with_message(Cow::Borrowed("Cast member names must not be blank")));
    }
    Ok(())
}

/// Flatten `validator` output into a single [`CoreError::Validation`].
pub fn into_core_error(errors: ValidationErrors) -> CoreError {
    CoreError::Validation(errors.to_string())
}
