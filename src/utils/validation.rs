//! Centralized validation and helper functions.

/// Maximum number of rows accepted from a single import (DOS protection)
pub const MAX_IMPORT_ROWS: usize = 100_000;

/// Security-related constants for input validation
pub const MAX_FILENAME_LENGTH: usize = 255;
pub const MIN_FILE_CONTENT_SIZE: usize = 1;

/// Maximum length of a storage location string
pub const MAX_LOCATION_LENGTH: usize = 200;

/// Check if adding another row would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new row.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```ignore
/// if check_row_limit(rows.len()).is_some() {
///     break;
/// }
/// rows.push(row); // Safe to add
/// ```
#[must_use]
pub fn check_row_limit(count: usize) -> Option<String> {
    if count >= MAX_IMPORT_ROWS {
        Some(format!(
            "Too many rows: adding another would exceed maximum of {MAX_IMPORT_ROWS}"
        ))
    } else {
        None
    }
}

/// Security validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename: contains path traversal or invalid characters")]
    InvalidFilename,
    #[error("Empty filename provided")]
    EmptyFilename,
    #[error("File content appears malformed or invalid")]
    InvalidFileContent,
    #[error("Location exceeds {MAX_LOCATION_LENGTH} characters")]
    LocationTooLong,
}

/// Secure filename validation to prevent directory traversal and other attacks
///
/// Validates and sanitizes filenames by:
/// - Checking length limits
/// - Preventing directory traversal (../, ..\\)
/// - Removing potentially dangerous characters
/// - Ensuring filename is not empty after sanitization
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` if the filename is empty,
/// `ValidationError::FilenameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidFilename` if it contains invalid characters.
pub fn validate_filename(filename: &str) -> Result<String, ValidationError> {
    if filename.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    // Prevent directory traversal attacks
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(ValidationError::InvalidFilename);
    }

    if filename.contains('\0') || filename.chars().any(|c| ('\x01'..='\x1F').contains(&c)) {
        return Err(ValidationError::InvalidFilename);
    }

    // Sanitize filename by keeping only safe characters
    let sanitized = filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-' || *c == '_' || *c == ' ')
        .collect::<String>();

    if sanitized.trim().is_empty() {
        return Err(ValidationError::InvalidFilename);
    }

    // Prevent hidden files (starting with .) unless it's a known extension
    if sanitized.starts_with('.') && !has_known_extension(&sanitized) {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(sanitized)
}

/// Check if filename has a known safe extension
fn has_known_extension(filename: &str) -> bool {
    let safe_extensions = [".csv", ".txt", ".tsv"];

    safe_extensions
        .iter()
        .any(|ext| filename.to_lowercase().ends_with(ext))
}

/// Validate that uploaded content is usable text.
///
/// Vendor exports may contain non-ASCII descriptions (Chinese part names in
/// LCSC exports, micro and ohm signs), so only control bytes count against
/// the content. Bytes that are not valid UTF-8 are accepted here and decoded
/// lossily by the caller, since older exports are often Latin-1.
///
/// # Errors
///
/// Returns `ValidationError::InvalidFileContent` if the content is too small
/// or is mostly control bytes.
pub fn validate_file_content(content: &[u8]) -> Result<(), ValidationError> {
    if content.len() < MIN_FILE_CONTENT_SIZE {
        return Err(ValidationError::InvalidFileContent);
    }

    let control_count = content
        .iter()
        .filter(|&&b| b < 9 || (b > 13 && b < 32))
        .count();

    // Allow up to 5% control characters
    if content.len() > 100 && control_count > content.len() / 20 {
        return Err(ValidationError::InvalidFileContent);
    }

    Ok(())
}

/// Comprehensive input validation combining filename and content checks
///
/// # Errors
///
/// Returns a `ValidationError` if filename validation or content validation fails.
pub fn validate_upload(
    filename: Option<&str>,
    content: &[u8],
) -> Result<Option<String>, ValidationError> {
    let validated_filename = if let Some(name) = filename {
        Some(validate_filename(name)?)
    } else {
        None
    };

    validate_file_content(content)?;

    Ok(validated_filename)
}

/// Normalize a user-supplied storage location.
///
/// # Errors
///
/// Returns `ValidationError::LocationTooLong` if the trimmed location exceeds
/// [`MAX_LOCATION_LENGTH`] characters.
pub fn normalize_location(location: &str) -> Result<String, ValidationError> {
    let trimmed = location.trim();
    if trimmed.chars().count() > MAX_LOCATION_LENGTH {
        return Err(ValidationError::LocationTooLong);
    }
    Ok(trimmed.to_string())
}
