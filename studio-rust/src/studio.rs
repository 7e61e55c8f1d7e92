use crate::{
    carousel::Carousel,
    errors::{StudioError, ValidationError},
    friendly::FriendlyError,
    history::{HistoryEntry, HistoryStore},
    mockup::{mockup_instruction, MockupOutcome, MockupSlot, MOCKUP_ITEMS},
    prompt,
    reference::{ReferenceImage, ReferenceSet},
    session::{controls, Controls, GeneratedImage, OutputFormat, Phase, Session},
    settings::Settings,
    store::{KeyValueStore, StoreError},
};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use genimage_sdk::{
    AspectRatio, ImageModel, ImageModelInput, ImageOptions, Message, Modality, Part,
};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

/// Builds the model client for a credential. Invoked again whenever the
/// API key changes.
pub trait ImageModelFactory: Send + Sync {
    fn create(&self, api_key: &str) -> Arc<dyn ImageModel>;
}

impl<F> ImageModelFactory for F
where
    F: Fn(&str) -> Arc<dyn ImageModel> + Send + Sync,
{
    fn create(&self, api_key: &str) -> Arc<dyn ImageModel> {
        self(api_key)
    }
}

/// Input of one generation attempt. Reference images are attached to the
/// studio beforehand via [`Studio::add_reference`].
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub prompt: String,
    pub style: String,
    pub format: Option<OutputFormat>,
    pub negative_prompt: Option<String>,
    pub aspect_ratio: Option<AspectRatio>,
    pub colors: Option<String>,
}

/// Explicit confirmation for destructive operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearConfirmation {
    Confirmed,
    Cancelled,
}

/// The displayed logo decoded for saving to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

struct RestyleOverlay {
    error: FriendlyError,
    shown_at: Instant,
}

/// Parameters required to create a new studio.
/// # Default Values
/// - `default_api_key`: `None`
/// - `restyle_error_timeout`: 4 seconds
pub struct StudioParams {
    /// Builds the model client from the active credential.
    pub factory: Box<dyn ImageModelFactory>,
    /// Backing storage for history and the user API key.
    pub store: Arc<dyn KeyValueStore>,
    /// Fallback credential used when the user has not supplied a key.
    pub default_api_key: Option<String>,
    /// How long a restyle error overlay stays up before auto-dismissing.
    pub restyle_error_timeout: Duration,
}

impl StudioParams {
    pub fn new(factory: impl ImageModelFactory + 'static, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            factory: Box::new(factory),
            store,
            default_api_key: None,
            restyle_error_timeout: Duration::from_secs(4),
        }
    }

    /// Set the fallback credential.
    #[must_use]
    pub fn default_api_key(mut self, key: impl Into<String>) -> Self {
        self.default_api_key = Some(key.into());
        self
    }

    /// Set the restyle error overlay timeout.
    #[must_use]
    pub fn restyle_error_timeout(mut self, timeout: Duration) -> Self {
        self.restyle_error_timeout = timeout;
        self
    }

    #[must_use]
    pub fn build(self) -> Studio {
        Studio::new(self)
    }
}

/// The generation workflow controller.
///
/// Owns the session state machine, the model handle, the history cache, the
/// reference set, and the credential settings. All remote calls are awaited
/// sequentially; in-flight work is guarded by the session phase.
pub struct Studio {
    factory: Box<dyn ImageModelFactory>,
    model: Option<Arc<dyn ImageModel>>,
    settings: Settings,
    history: HistoryStore,
    references: ReferenceSet,
    session: Option<Session>,
    phase: Phase,
    restyle_overlay: Option<RestyleOverlay>,
    restyle_error_timeout: Duration,
}

impl Studio {
    #[must_use]
    pub fn new(params: StudioParams) -> Self {
        let StudioParams {
            factory,
            store,
            default_api_key,
            restyle_error_timeout,
        } = params;

        let settings = Settings::new(store.clone(), default_api_key);
        let history = HistoryStore::load(store);
        let model = match settings.active_key() {
            Ok(Some(key)) => Some(factory.create(&key)),
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(%error, "failed to read stored credential");
                None
            }
        };

        Self {
            factory,
            model,
            settings,
            history,
            references: ReferenceSet::default(),
            session: None,
            phase: Phase::Idle,
            restyle_overlay: None,
            restyle_error_timeout,
        }
    }

    pub fn builder(
        factory: impl ImageModelFactory + 'static,
        store: Arc<dyn KeyValueStore>,
    ) -> StudioParams {
        StudioParams::new(factory, store)
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Enabled state of every control, derived from the current phase.
    #[must_use]
    pub fn controls(&self) -> Controls {
        controls(self.phase, self.has_credential())
    }

    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.model.is_some()
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The image currently shown, if a session is active.
    #[must_use]
    pub fn displayed(&self) -> Option<&GeneratedImage> {
        self.session.as_ref().map(|session| &session.displayed)
    }

    #[must_use]
    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    /// Attaches a reference image to the form. Rejected once the session is
    /// locked.
    pub fn add_reference(
        &mut self,
        mime_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<&ReferenceImage, StudioError> {
        self.ensure_unlocked()?;
        Ok(self.references.add(mime_type, data)?)
    }

    /// Detaches a reference image. Rejected once the session is locked.
    pub fn remove_reference(&mut self, id: &str) -> Result<bool, StudioError> {
        self.ensure_unlocked()?;
        Ok(self.references.remove(id))
    }

    fn ensure_unlocked(&self) -> Result<(), StudioError> {
        match self.phase {
            Phase::Loading | Phase::Restyling => Err(StudioError::Busy),
            Phase::Displayed | Phase::Locked => Err(StudioError::SessionLocked),
            Phase::Idle => Ok(()),
        }
    }

    /// Generates a fresh logo.
    ///
    /// Validation failures never reach the remote service. On success the
    /// result becomes the session's original image, a history entry is
    /// recorded, and format/reference inputs lock until [`Studio::reset`].
    pub async fn generate(
        &mut self,
        request: GenerateRequest,
    ) -> Result<GeneratedImage, StudioError> {
        match self.phase {
            Phase::Loading | Phase::Restyling => return Err(StudioError::Busy),
            Phase::Displayed | Phase::Locked => return Err(StudioError::SessionLocked),
            Phase::Idle => {}
        }

        let prompt = request.prompt.trim().to_string();
        if prompt.is_empty() {
            return Err(ValidationError::EmptyPrompt.into());
        }
        let style = request.style.trim().to_string();
        if style.is_empty() {
            return Err(ValidationError::MissingStyle.into());
        }
        let format = request.format.ok_or(ValidationError::MissingFormat)?;

        let model = self.model.clone().ok_or(StudioError::MissingCredential)?;

        self.phase = Phase::Loading;
        tracing::info!(%prompt, %style, format = format.mime_type(), "generating logo");
        let result = self
            .run_generation(&model, &prompt, &style, format, &request)
            .await;

        match result {
            Ok(image) => {
                self.phase = Phase::Displayed;
                self.session = Some(Session {
                    prompt: prompt.clone(),
                    style: Some(style),
                    format,
                    original: image.clone(),
                    displayed: image.clone(),
                });
                let recorded = self.history.record(HistoryEntry {
                    prompt,
                    image_data_url: image.data_url(),
                });
                self.phase = Phase::Locked;
                recorded?;
                Ok(image)
            }
            Err(error) => {
                self.phase = Phase::Idle;
                tracing::warn!(%error, "generation failed");
                Err(error)
            }
        }
    }

    async fn run_generation(
        &self,
        model: &Arc<dyn ImageModel>,
        prompt: &str,
        style: &str,
        format: OutputFormat,
        request: &GenerateRequest,
    ) -> Result<GeneratedImage, StudioError> {
        let final_prompt = if self.references.is_empty() && request.colors.is_none() {
            prompt::logo_prompt(
                prompt,
                style,
                format,
                request.negative_prompt.as_deref(),
                request.aspect_ratio,
            )
        } else {
            self.synthesize_prompt(model, prompt, style, request.colors.as_deref())
                .await?
        };

        let response = model
            .generate(ImageModelInput {
                messages: vec![Message::user(vec![Part::text(final_prompt)])],
                modalities: Some(vec![Modality::Image, Modality::Text]),
                image: Some(ImageOptions {
                    mime_type: Some(format.mime_type().to_string()),
                    aspect_ratio: request.aspect_ratio,
                }),
                ..Default::default()
            })
            .await?;

        extract_image(&response).ok_or(StudioError::EmptyResult)
    }

    /// Folds reference images and color intent into one natural-language
    /// prompt via the vision endpoint.
    async fn synthesize_prompt(
        &self,
        model: &Arc<dyn ImageModel>,
        prompt: &str,
        style: &str,
        colors: Option<&str>,
    ) -> Result<String, StudioError> {
        let mut parts: Vec<Part> = self
            .references
            .images()
            .iter()
            .map(|reference| Part::image(reference.data.clone(), reference.mime_type.clone()))
            .collect();
        parts.push(Part::text(prompt::synthesis_prompt(prompt, style, colors)));

        let response = model
            .generate(ImageModelInput {
                messages: vec![Message::user(parts)],
                modalities: Some(vec![Modality::Text]),
                ..Default::default()
            })
            .await?;

        let synthesized = response.text().trim().to_string();
        if synthesized.is_empty() {
            return Err(StudioError::EmptyResult);
        }
        Ok(synthesized)
    }

    /// Redraws the current logo in a new style, preserving the background
    /// treatment of the original format.
    ///
    /// On failure the prior image stays displayed and a transient error
    /// overlay is raised; see [`Studio::restyle_error`].
    pub async fn restyle(&mut self, new_style: &str) -> Result<(), StudioError> {
        if matches!(self.phase, Phase::Loading | Phase::Restyling) {
            return Err(StudioError::Busy);
        }
        let style = new_style.trim().to_string();
        if style.is_empty() {
            return Err(ValidationError::MissingStyle.into());
        }
        let model = self.model.clone().ok_or(StudioError::MissingCredential)?;
        let Some(session) = self.session.as_ref() else {
            return Err(StudioError::NoSession);
        };
        let instruction = prompt::restyle_instruction(&style, session.format);
        let current = session.displayed.clone();
        let session_prompt = session.prompt.clone();

        self.phase = Phase::Restyling;
        tracing::info!(%style, "restyling logo");
        let result = run_restyle(&model, &current, &instruction).await;

        match result {
            Ok(image) => {
                if let Some(session) = self.session.as_mut() {
                    session.displayed = image.clone();
                    session.style = Some(style);
                }
                let recorded = self.history.record(HistoryEntry {
                    prompt: session_prompt,
                    image_data_url: image.data_url(),
                });
                self.phase = Phase::Locked;
                recorded?;
                Ok(())
            }
            Err(error) => {
                self.phase = Phase::Locked;
                self.restyle_overlay = Some(RestyleOverlay {
                    error: FriendlyError::from_error(&error),
                    shown_at: Instant::now(),
                });
                tracing::warn!(%error, "restyle failed");
                Err(error)
            }
        }
    }

    /// The restyle error overlay, auto-dismissed after the configured
    /// timeout.
    pub fn restyle_error(&mut self) -> Option<&FriendlyError> {
        if let Some(overlay) = &self.restyle_overlay {
            if overlay.shown_at.elapsed() >= self.restyle_error_timeout {
                self.restyle_overlay = None;
            }
        }
        self.restyle_overlay.as_ref().map(|overlay| &overlay.error)
    }

    /// Renders the current logo onto every product context, one sequential
    /// call per item. A failed item becomes an error slot; the batch always
    /// yields exactly one slot per item.
    pub async fn generate_mockups(&mut self) -> Result<Carousel, StudioError> {
        if matches!(self.phase, Phase::Loading | Phase::Restyling) {
            return Err(StudioError::Busy);
        }
        let model = self.model.clone().ok_or(StudioError::MissingCredential)?;
        let logo = self
            .session
            .as_ref()
            .map(|session| session.displayed.clone())
            .ok_or(StudioError::NoSession)?;

        let total = MOCKUP_ITEMS.len();
        let mut slots = Vec::with_capacity(total);
        for (position, item) in MOCKUP_ITEMS.iter().enumerate() {
            tracing::info!(item = item.name, position = position + 1, total, "generating mockup");
            let outcome = match run_mockup(&model, &logo, item.context).await {
                Ok(image_data_url) => MockupOutcome::Image(image_data_url),
                Err(error) => {
                    tracing::warn!(item = item.name, %error, "mockup failed");
                    MockupOutcome::Failed(FriendlyError::from_error(&error))
                }
            };
            slots.push(MockupSlot {
                item: *item,
                outcome,
            });
        }

        Ok(Carousel::new(slots))
    }

    /// Re-hydrates the session from a history entry, locking inputs exactly
    /// as a fresh generation would. Session-local reference images are
    /// discarded.
    pub fn select_history(&mut self, index: usize) -> Result<(), StudioError> {
        if matches!(self.phase, Phase::Loading | Phase::Restyling) {
            return Err(StudioError::Busy);
        }
        let entry = self
            .history
            .get(index)
            .cloned()
            .ok_or(StudioError::UnknownHistoryEntry(index))?;
        let (mime_type, image_data) = crate::data_url::split(&entry.image_data_url)
            .ok_or_else(|| StudioError::Invariant("history entry is not a data URL".to_string()))?;

        let format = OutputFormat::from_mime_type(mime_type).unwrap_or(OutputFormat::Jpeg);
        let image = GeneratedImage {
            mime_type: mime_type.to_string(),
            image_data: image_data.to_string(),
        };

        self.references.clear();
        self.restyle_overlay = None;
        self.phase = Phase::Displayed;
        self.session = Some(Session {
            prompt: entry.prompt,
            style: None,
            format,
            original: image.clone(),
            displayed: image,
        });
        self.phase = Phase::Locked;
        Ok(())
    }

    /// Returns the studio to its initial state, discarding the session, the
    /// reference images, and any error overlay. History is untouched.
    pub fn reset(&mut self) {
        self.session = None;
        self.references.clear();
        self.restyle_overlay = None;
        self.phase = Phase::Idle;
    }

    /// Empties the history. A [`ClearConfirmation::Cancelled`] value leaves
    /// it untouched; returns whether the history was cleared.
    pub fn clear_history(&mut self, confirmation: ClearConfirmation) -> Result<bool, StudioError> {
        match confirmation {
            ClearConfirmation::Cancelled => Ok(false),
            ClearConfirmation::Confirmed => {
                self.history.clear()?;
                Ok(true)
            }
        }
    }

    /// Stores the user API key and rebuilds the model client.
    pub fn set_api_key(&mut self, key: &str) -> Result<(), StudioError> {
        self.settings.save_key(key)?;
        self.rebuild_model()?;
        Ok(())
    }

    /// Clears the user API key, falling back to the default credential when
    /// one is configured.
    pub fn clear_api_key(&mut self) -> Result<(), StudioError> {
        self.settings.clear_key()?;
        self.rebuild_model()?;
        Ok(())
    }

    fn rebuild_model(&mut self) -> Result<(), StoreError> {
        self.model = self
            .settings
            .active_key()?
            .map(|key| self.factory.create(&key));
        Ok(())
    }

    /// Decodes the displayed logo for saving to disk.
    pub fn download(&self) -> Result<Download, StudioError> {
        let session = self.session.as_ref().ok_or(StudioError::NoSession)?;
        let image = &session.displayed;
        let bytes = BASE64_STANDARD.decode(&image.image_data).map_err(|error| {
            StudioError::Invariant(format!("displayed image is not valid base64: {error}"))
        })?;
        let extension = image.mime_type.split('/').nth(1).unwrap_or("png");
        Ok(Download {
            file_name: format!("logo-generated.{extension}"),
            mime_type: image.mime_type.clone(),
            bytes,
        })
    }
}

async fn run_restyle(
    model: &Arc<dyn ImageModel>,
    current: &GeneratedImage,
    instruction: &str,
) -> Result<GeneratedImage, StudioError> {
    let response = model
        .generate(ImageModelInput {
            messages: vec![Message::user(vec![
                Part::image(current.image_data.clone(), current.mime_type.clone()),
                Part::text(instruction),
            ])],
            modalities: Some(vec![Modality::Image, Modality::Text]),
            ..Default::default()
        })
        .await?;

    extract_image(&response).ok_or(StudioError::EmptyResult)
}

async fn run_mockup(
    model: &Arc<dyn ImageModel>,
    logo: &GeneratedImage,
    context: &str,
) -> Result<String, StudioError> {
    let response = model
        .generate(ImageModelInput {
            messages: vec![Message::user(vec![
                Part::image(logo.image_data.clone(), logo.mime_type.clone()),
                Part::text(mockup_instruction(context)),
            ])],
            modalities: Some(vec![Modality::Image, Modality::Text]),
            ..Default::default()
        })
        .await?;

    let image = extract_image(&response).ok_or(StudioError::EmptyResult)?;
    Ok(image.data_url())
}

fn extract_image(response: &genimage_sdk::ModelResponse) -> Option<GeneratedImage> {
    response.first_image().map(|image| GeneratedImage {
        mime_type: image.mime_type.clone(),
        image_data: image.image_data.clone(),
    })
}
