/*!
 * Presentation URL handling.
 */

use ::url::Url;

use crate::errors::InvalidInputError;

/// Prefix every accepted presentation URL must start with
pub const PRESENTATION_URL_PREFIX: &str = "https://docs.google.com/presentation/d/";

/// Extract the presentation ID from a user-supplied URL.
///
/// Quotes are stripped and surrounding whitespace trimmed, so values pasted
/// straight from a shell or browser work. The ID is the sixth `/`-separated
/// segment, i.e. the path segment right after `/d/`.
pub fn parse_presentation_id(input: &str) -> Result<String, InvalidInputError> {
    let cleaned: String = input.chars().filter(|c| *c != '\'' && *c != '"').collect();
    let cleaned = cleaned.trim();

    if !cleaned.starts_with(PRESENTATION_URL_PREFIX) {
        return Err(InvalidInputError::InvalidUrl(cleaned.to_string()));
    }

    let url = Url::parse(cleaned).map_err(|_| InvalidInputError::InvalidUrl(cleaned.to_string()))?;

    // Segments: ["presentation", "d", "<id>", ...]
    url.path_segments()
        .and_then(|mut segments| segments.nth(2))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| InvalidInputError::MissingPresentationId(cleaned.to_string()))
}
