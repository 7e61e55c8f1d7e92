use crate::errors::StudioError;
use genimage_sdk::ImageModelError;

/// Classified failure kind, decided by inspecting the error text for known
/// provider signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendlyErrorKind {
    Validation,
    Quota,
    Credential,
    ContentPolicy,
    Generic,
}

/// A user-facing title + detail pair for any failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendlyError {
    pub kind: FriendlyErrorKind,
    pub title: String,
    pub details: String,
}

impl FriendlyError {
    #[must_use]
    pub fn from_error(error: &StudioError) -> Self {
        match error {
            StudioError::Validation(validation) => Self {
                kind: FriendlyErrorKind::Validation,
                title: "Check your input".to_string(),
                details: validation.to_string(),
            },
            StudioError::MissingCredential => Self::credential(
                "Add your API key in settings to start generating logos.",
            ),
            StudioError::EmptyResult => Self {
                kind: FriendlyErrorKind::Generic,
                title: "Generation failed".to_string(),
                details: "The service returned no image. Your request may have \
                          been too complex or was declined by the safety rules. \
                          Try rephrasing the description."
                    .to_string(),
            },
            StudioError::Model(ImageModelError::Refusal(_)) => Self::content_policy(),
            StudioError::Model(model_error) => Self::from_message(&model_error.to_string()),
            other => Self::generic(&other.to_string()),
        }
    }

    /// Classifies a raw provider message by substring inspection.
    fn from_message(message: &str) -> Self {
        if message.contains("429") || message.contains("RESOURCE_EXHAUSTED") {
            return Self {
                kind: FriendlyErrorKind::Quota,
                title: "Rate limit reached".to_string(),
                details: "The API request quota has been exceeded. Add your own \
                          API key in settings, or try again later."
                    .to_string(),
            };
        }
        if message.contains("API_KEY_INVALID")
            || message.contains("API key not valid")
            || message.contains("PERMISSION_DENIED")
            || message.contains("UNAUTHENTICATED")
        {
            return Self::credential(
                "The configured API key was rejected. Update it in settings.",
            );
        }
        if message.contains("SAFETY") {
            return Self::content_policy();
        }
        Self::generic(message)
    }

    fn credential(details: &str) -> Self {
        Self {
            kind: FriendlyErrorKind::Credential,
            title: "API key required".to_string(),
            details: details.to_string(),
        }
    }

    fn content_policy() -> Self {
        Self {
            kind: FriendlyErrorKind::ContentPolicy,
            title: "Request declined".to_string(),
            details: "Your request was declined by the safety rules. Try \
                      rephrasing the description."
                .to_string(),
        }
    }

    fn generic(message: &str) -> Self {
        tracing::debug!(error = message, "unclassified failure");
        Self {
            kind: FriendlyErrorKind::Generic,
            title: "Generation failed".to_string(),
            details: "An unexpected error occurred. Check your connection and \
                      try a simpler request, or try again later."
                .to_string(),
        }
    }
}
