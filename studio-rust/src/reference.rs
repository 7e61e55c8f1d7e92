use crate::{data_url, errors::ValidationError};
use rand::{distributions::Alphanumeric, Rng};

pub const MAX_REFERENCE_IMAGES: usize = 3;

/// A session-scoped reference image supplied by the user. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    pub id: String,
    pub mime_type: String,
    /// The base64-encoded image data.
    pub data: String,
    pub preview_url: String,
}

impl ReferenceImage {
    fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        let data = data.into();
        let preview_url = data_url::encode(&mime_type, &data);
        Self {
            id: generate_id(),
            mime_type,
            data,
            preview_url,
        }
    }
}

fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect()
}

/// The reference images attached to the current form, at most
/// [`MAX_REFERENCE_IMAGES`] at a time.
#[derive(Debug, Default)]
pub struct ReferenceSet {
    images: Vec<ReferenceImage>,
}

impl ReferenceSet {
    pub fn add(
        &mut self,
        mime_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<&ReferenceImage, ValidationError> {
        if self.images.len() >= MAX_REFERENCE_IMAGES {
            return Err(ValidationError::TooManyReferences);
        }
        self.images.push(ReferenceImage::new(mime_type, data));
        Ok(self.images.last().expect("just pushed"))
    }

    /// Removes the image with the given id. Returns whether one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.images.len();
        self.images.retain(|image| image.id != id);
        self.images.len() != before
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    #[must_use]
    pub fn images(&self) -> &[ReferenceImage] {
        &self.images
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
