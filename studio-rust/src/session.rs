use crate::data_url;
use serde::{Deserialize, Serialize};

/// The lifecycle of one generated logo, from idle form to locked session.
///
/// Every control's enabled state is derived from the current phase through
/// [`controls`]; nothing tracks enablement independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No logo yet; the whole form is editable.
    Idle,
    /// An initial generation is in flight.
    Loading,
    /// A result is hydrated and shown, history recording still pending.
    Displayed,
    /// Steady state of an active session: format and references frozen,
    /// style stays interactive and triggers a restyle.
    Locked,
    /// A restyle of the current logo is in flight.
    Restyling,
}

/// Output encoding of the generated logo. The format also decides the
/// background treatment the prompts ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
}

impl OutputFormat {
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Background treatment inherited by restyles and mockup prompts.
    #[must_use]
    pub fn background(self) -> &'static str {
        match self {
            Self::Png => "transparent",
            Self::Jpeg => "clean white",
        }
    }

    #[must_use]
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        match mime_type {
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    #[must_use]
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

/// A generated image held by the session, kept as base64 plus MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub image_data: String,
}

impl GeneratedImage {
    #[must_use]
    pub fn data_url(&self) -> String {
        data_url::encode(&self.mime_type, &self.image_data)
    }
}

/// State of one active logo, from successful generation to reset.
#[derive(Debug, Clone)]
pub struct Session {
    pub prompt: String,
    /// The most recently applied style. `None` when the session was
    /// re-hydrated from history, where the style is unknown.
    pub style: Option<String>,
    pub format: OutputFormat,
    /// The original generation this session is based on.
    pub original: GeneratedImage,
    /// The image currently shown; replaced by each successful restyle.
    pub displayed: GeneratedImage,
}

/// Enabled state of every user-facing control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub prompt: bool,
    pub style: bool,
    pub format: bool,
    pub references: bool,
    pub colors: bool,
    pub generate: bool,
    pub reset: bool,
    pub download: bool,
    pub mockups: bool,
    /// Persistent call-to-action pointing at settings when no credential
    /// is available.
    pub settings_cta: bool,
}

/// Derives control enablement from the session phase. One lookup.
#[must_use]
pub fn controls(phase: Phase, has_credential: bool) -> Controls {
    let settings_cta = !has_credential;
    match phase {
        Phase::Idle => Controls {
            prompt: true,
            style: true,
            format: true,
            references: true,
            colors: true,
            generate: has_credential,
            reset: true,
            download: false,
            mockups: false,
            settings_cta,
        },
        Phase::Loading => Controls {
            prompt: false,
            style: false,
            format: false,
            references: false,
            colors: false,
            generate: false,
            reset: false,
            download: false,
            mockups: false,
            settings_cta,
        },
        Phase::Displayed => Controls {
            prompt: false,
            style: false,
            format: false,
            references: false,
            colors: false,
            generate: false,
            reset: true,
            download: true,
            mockups: false,
            settings_cta,
        },
        Phase::Locked => Controls {
            prompt: false,
            // Style stays interactive; selecting one restyles the logo.
            style: true,
            format: false,
            references: false,
            colors: false,
            generate: false,
            reset: true,
            download: true,
            mockups: true,
            settings_cta,
        },
        Phase::Restyling => Controls {
            prompt: false,
            style: false,
            format: false,
            references: false,
            colors: false,
            generate: false,
            reset: false,
            download: false,
            mockups: false,
            settings_cta,
        },
    }
}
