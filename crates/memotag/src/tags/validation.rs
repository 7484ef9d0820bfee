//! Tag path validation for user-supplied paths.
//!
//! Paths typed by a caller (rename targets, delete targets, prefixes) are
//! stricter than paths found in content: the parser already guarantees tag
//! characters, but a caller can send anything.
//!
//! Accepted input may omit the leading `/` and may end in a single `/`.

use super::normalize_tag_path;

/// Validates a caller-supplied tag path and returns its canonical form.
///
/// # Rules
/// - Must not be empty or whitespace only
/// - Must not contain whitespace or the `#` sigil
/// - Must have at least one segment
/// - Must not contain an empty intermediate segment (`a//b`)
///
/// # Examples
/// ```
/// use memotag::tags::validation::validate_tag_path;
///
/// assert_eq!(validate_tag_path("work/p1").unwrap(), "/work/p1");
/// assert_eq!(validate_tag_path("/work/").unwrap(), "/work");
///
/// assert!(validate_tag_path("").is_err());
/// assert!(validate_tag_path("#work").is_err());
/// assert!(validate_tag_path("a//b").is_err());
/// assert!(validate_tag_path("/").is_err());
/// ```
pub fn validate_tag_path(input: &str) -> Result<String, TagPathError> {
    if input.trim().is_empty() {
        return Err(TagPathError::Empty);
    }

    if let Some(ch) = input.chars().find(|c| c.is_whitespace()) {
        return Err(TagPathError::Whitespace(ch));
    }

    if input.contains('#') {
        return Err(TagPathError::Sigil);
    }

    let inner = input.strip_prefix('/').unwrap_or(input);
    let inner = inner.strip_suffix('/').unwrap_or(inner);
    if inner.is_empty() {
        return Err(TagPathError::NoSegments);
    }
    if inner.split('/').any(str::is_empty) {
        return Err(TagPathError::EmptySegment);
    }

    Ok(normalize_tag_path(inner))
}

/// Error type for tag path validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagPathError {
    /// Path is empty or whitespace only
    Empty,
    /// Path contains a whitespace character
    Whitespace(char),
    /// Path contains `#`
    Sigil,
    /// Path is only slashes
    NoSegments,
    /// Path contains `//`
    EmptySegment,
}

impl std::fmt::Display for TagPathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagPathError::Empty => write!(f, "tag path cannot be empty"),
            TagPathError::Whitespace(ch) => {
                write!(f, "tag path cannot contain whitespace, found {:?}", ch)
            }
            TagPathError::Sigil => {
                write!(f, "tag path must not include '#', write 'work/p1' not '#work/p1'")
            }
            TagPathError::NoSegments => write!(f, "tag path must contain at least one segment"),
            TagPathError::EmptySegment => write!(f, "tag path cannot contain empty segments"),
        }
    }
}

impl std::error::Error for TagPathError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paths_are_normalized() {
        assert_eq!(validate_tag_path("work").unwrap(), "/work");
        assert_eq!(validate_tag_path("/work").unwrap(), "/work");
        assert_eq!(validate_tag_path("work/p1/backend").unwrap(), "/work/p1/backend");
        assert_eq!(validate_tag_path("renamed-global").unwrap(), "/renamed-global");
    }

    #[test]
    fn test_trailing_slash_is_tolerated() {
        assert_eq!(validate_tag_path("work/").unwrap(), "/work");
    }

    #[test]
    fn test_unicode_segments() {
        assert_eq!(validate_tag_path("工作/项目").unwrap(), "/工作/项目");
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(validate_tag_path(""), Err(TagPathError::Empty));
        assert_eq!(validate_tag_path("   "), Err(TagPathError::Empty));
    }

    #[test]
    fn test_whitespace_rejected() {
        assert_eq!(validate_tag_path("a b"), Err(TagPathError::Whitespace(' ')));
    }

    #[test]
    fn test_sigil_rejected() {
        assert_eq!(validate_tag_path("#work"), Err(TagPathError::Sigil));
    }

    #[test]
    fn test_slash_only_rejected() {
        assert_eq!(validate_tag_path("/"), Err(TagPathError::NoSegments));
        assert_eq!(validate_tag_path("//"), Err(TagPathError::NoSegments));
    }

    #[test]
    fn test_empty_segment_rejected() {
        assert_eq!(validate_tag_path("a//b"), Err(TagPathError::EmptySegment));
        assert_eq!(validate_tag_path("///a"), Err(TagPathError::EmptySegment));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(TagPathError::Empty.to_string(), "tag path cannot be empty");
        assert!(TagPathError::Sigil.to_string().contains("'#'"));
    }
}
