//! Frame and field validation rules.

use postify_core::error::AppError;

/// Longest accepted user ID, in bytes.
pub const MAX_USER_ID_LEN: usize = 128;

/// Validates a raw inbound text frame before parsing.
pub fn validate_inbound(raw: &str, max_bytes: usize) -> Result<(), AppError> {
    if raw.len() > max_bytes {
        return Err(AppError::validation(format!(
            "Message exceeds maximum size of {max_bytes} bytes"
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty message"));
    }

    Ok(())
}

/// Validates a user ID carried in a frame.
pub fn validate_user_id(field: &str, user_id: &str) -> Result<(), AppError> {
    if user_id.trim().is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    if user_id.len() > MAX_USER_ID_LEN {
        return Err(AppError::validation(format!(
            "{field} exceeds {MAX_USER_ID_LEN} bytes"
        )));
    }
    Ok(())
}
