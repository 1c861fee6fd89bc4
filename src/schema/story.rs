use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::setting;

/// What the reader asked for: who the story is about and where it happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryRequest {
    pub main_character: String,
    #[serde(default)]
    pub companion: Option<String>,
    pub setting: String,
    pub page_count: u32,
}

/// One generated page: display text plus the scene description the
/// composition engine consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryPage {
    pub page_number: u32,
    pub text: String,
    pub image_description: String,
}

/// A complete generated story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    pub subtitle: String,
    pub pages: Vec<StoryPage>,
}

/// All problems found in a story request, reported together.
#[derive(Debug, Error)]
#[error("invalid story request: {}", .problems.join(", "))]
pub struct RequestValidationError {
    pub problems: Vec<String>,
}

/// Validate a story request before any generation work starts.
///
/// Collects every problem rather than stopping at the first, so a caller
/// can surface them all at once.
pub fn validate_request(request: &StoryRequest) -> Result<(), RequestValidationError> {
    let mut problems = Vec::new();

    if request.main_character.trim().is_empty() {
        problems.push("main character name is required".to_string());
    }

    if request.page_count < 1 {
        problems.push("page count must be at least 1".to_string());
    }

    if request.setting.trim().is_empty() {
        problems.push("setting is required".to_string());
    } else if !setting::is_valid_setting(&request.setting) {
        problems.push(format!("unknown setting '{}'", request.setting));
    }

    if let Some(companion) = &request.companion {
        if companion.trim().is_empty() {
            problems.push("companion name must be non-empty when present".to_string());
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(RequestValidationError { problems })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request() -> StoryRequest {
        StoryRequest {
            main_character: "Ellie".to_string(),
            companion: Some("Biscuit".to_string()),
            setting: "forest".to_string(),
            page_count: 3,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(validate_request(&make_request()).is_ok());
    }

    #[test]
    fn companion_is_optional() {
        let mut request = make_request();
        request.companion = None;
        assert!(validate_request(&request).is_ok());
    }

    #[test]
    fn all_problems_reported_at_once() {
        let request = StoryRequest {
            main_character: "  ".to_string(),
            companion: None,
            setting: "moon_base".to_string(),
            page_count: 0,
        };
        let err = validate_request(&request).unwrap_err();
        assert_eq!(err.problems.len(), 3);
        assert!(err.to_string().contains("main character"));
        assert!(err.to_string().contains("page count"));
        assert!(err.to_string().contains("moon_base"));
    }

    #[test]
    fn empty_companion_rejected() {
        let mut request = make_request();
        request.companion = Some("".to_string());
        let err = validate_request(&request).unwrap_err();
        assert_eq!(err.problems.len(), 1);
    }
}
