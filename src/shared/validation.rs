//! Validation Utilities

use validator::ValidationErrors;

use super::error::{AppError, FieldError};

/// Allowed file extensions for category icon resources.
const ALLOWED_ICON_EXTENSIONS: &[&str] = &[".jpeg", ".jpg", ".png", ".gif"];

/// Convert validation errors to AppError
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e.message.clone().map(|m| m.to_string()).unwrap_or_default(),
            })
        })
        .collect();

    let message = field_errors
        .first()
        .map(|e| format!("{}: {}", e.field, e.message))
        .unwrap_or_else(|| "Validation failed".into());

    AppError::Validation(message)
}

/// Check whether an icon path carries an allowed image file extension.
/// Matching is case-insensitive on the final extension.
pub fn has_allowed_icon_extension(path: &str) -> bool {
    let ext = path
        .rfind('.')
        .map(|idx| path[idx..].to_lowercase())
        .unwrap_or_default();

    ALLOWED_ICON_EXTENSIONS.contains(&ext.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_image_extensions() {
        for path in ["icon.png", "icon.jpg", "icon.JPEG", "nested/dir/icon.gif"] {
            assert!(has_allowed_icon_extension(path), "rejected {path}");
        }
    }

    #[test]
    fn rejects_unknown_extensions() {
        for path in ["icon.svg", "icon.bmp", "icon", "icon.png.exe"] {
            assert!(!has_allowed_icon_extension(path), "accepted {path}");
        }
    }
}
