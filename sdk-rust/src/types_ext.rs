use crate::{
    AssistantMessage, ImagePart, Message, ModelResponse, Part, TextPart, UserMessage,
};

impl TextPart {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl ImagePart {
    pub fn new(image_data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            image_data: image_data.into(),
            width: None,
            height: None,
        }
    }
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextPart::new(text))
    }

    pub fn image(image_data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::Image(ImagePart::new(image_data, mime_type))
    }
}

impl Message {
    #[must_use]
    pub fn user(content: Vec<Part>) -> Self {
        Self::User(UserMessage { content })
    }

    #[must_use]
    pub fn assistant(content: Vec<Part>) -> Self {
        Self::Assistant(AssistantMessage { content })
    }
}

impl ModelResponse {
    /// The first image part of the response, if any.
    #[must_use]
    pub fn first_image(&self) -> Option<&ImagePart> {
        self.content.iter().find_map(|part| match part {
            Part::Image(image) => Some(image),
            Part::Text(_) => None,
        })
    }

    /// All text parts of the response concatenated.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                Part::Text(text) => Some(text.text.as_str()),
                Part::Image(_) => None,
            })
            .collect()
    }
}
