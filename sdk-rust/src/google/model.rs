use super::api::{
    Blob, Content, GenerateContentConfig, GenerateContentParameters, GenerateContentResponse,
    ImageConfig, Part as GooglePart,
};
use crate::{
    client_utils, ImageModel, ImageModelError, ImageModelInput, ImageModelResult, ImagePart,
    Message, Modality, ModelResponse, ModelUsage, Part,
};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;

const PROVIDER: &str = "google";

pub struct GoogleModel {
    model_id: String,
    api_key: String,
    base_url: String,
    client: Client,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct GoogleModelOptions {
    pub api_key: String,
    pub base_url: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl GoogleModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, options: GoogleModelOptions) -> Self {
        let GoogleModelOptions {
            api_key,
            base_url,
            headers,
            client,
        } = options;

        let base_url = base_url
            .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string())
            .trim_end_matches('/')
            .to_string();
        let client = client.unwrap_or_else(Client::new);
        let headers = headers.unwrap_or_default();

        Self {
            model_id: model_id.into(),
            api_key,
            base_url,
            client,
            headers,
        }
    }

    fn request_headers(&self) -> ImageModelResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                ImageModelError::InvalidInput(format!("Invalid Google header name '{key}': {error}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                ImageModelError::InvalidInput(format!(
                    "Invalid Google header value for '{key}': {error}"
                ))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl ImageModel for GoogleModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, input: ImageModelInput) -> ImageModelResult<ModelResponse> {
        let params = convert_to_generate_content_parameters(input, &self.model_id);

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model_id, self.api_key
        );

        tracing::debug!(provider = PROVIDER, model = %self.model_id, "generate request");

        let headers = self.request_headers()?;
        let response: GenerateContentResponse =
            client_utils::send_json(&self.client, &url, &params, headers).await?;

        if let Some(block_reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(ImageModelError::Refusal(format!(
                "Prompt was blocked: {block_reason}"
            )));
        }

        let candidate = response
            .candidates
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| {
                ImageModelError::Invariant(PROVIDER, "No candidate in response".to_string())
            })?;

        if let Some(reason) = candidate.finish_reason.as_deref() {
            if is_safety_finish_reason(reason) {
                return Err(ImageModelError::Refusal(format!(
                    "Candidate was blocked: {reason}"
                )));
            }
        }

        let content =
            map_google_content(candidate.content.and_then(|c| c.parts).unwrap_or_default())?;

        let usage = response.usage_metadata.map(|u| ModelUsage {
            input_tokens: u.prompt_token_count.unwrap_or(0),
            output_tokens: u.candidates_token_count.unwrap_or(0),
        });

        Ok(ModelResponse { content, usage })
    }
}

fn is_safety_finish_reason(reason: &str) -> bool {
    matches!(reason, "SAFETY" | "IMAGE_SAFETY" | "PROHIBITED_CONTENT")
}

fn convert_to_generate_content_parameters(
    input: ImageModelInput,
    model_id: &str,
) -> GenerateContentParameters {
    let contents = convert_to_google_contents(input.messages);

    let mut params = GenerateContentParameters {
        contents,
        model: model_id.to_string(),
        ..Default::default()
    };
    let mut config = GenerateContentConfig::default();

    if let Some(system_prompt) = input.system_prompt {
        params.system_instruction = Some(Content {
            role: Some("system".to_string()),
            parts: Some(vec![GooglePart {
                text: Some(system_prompt),
                ..Default::default()
            }]),
        });
    }

    if let Some(temp) = input.temperature {
        config.temperature = Some(temp);
    }

    if let Some(modalities) = input.modalities {
        config.response_modalities = Some(
            modalities
                .into_iter()
                .map(|m| match m {
                    Modality::Text => "TEXT".to_string(),
                    Modality::Image => "IMAGE".to_string(),
                })
                .collect(),
        );
    }

    if let Some(image) = input.image {
        config.response_mime_type = image.mime_type;
        if let Some(aspect_ratio) = image.aspect_ratio {
            config.image_config = Some(ImageConfig {
                aspect_ratio: Some(aspect_ratio.as_str().to_string()),
            });
        }
    }

    params.generation_config = Some(config);

    params
}

fn convert_to_google_contents(messages: Vec<Message>) -> Vec<Content> {
    messages
        .into_iter()
        .map(|message| match message {
            Message::User(user_message) => Content {
                role: Some("user".to_string()),
                parts: Some(
                    user_message
                        .content
                        .into_iter()
                        .map(convert_to_google_part)
                        .collect(),
                ),
            },
            Message::Assistant(assistant_message) => Content {
                role: Some("model".to_string()),
                parts: Some(
                    assistant_message
                        .content
                        .into_iter()
                        .map(convert_to_google_part)
                        .collect(),
                ),
            },
        })
        .collect()
}

fn convert_to_google_part(part: Part) -> GooglePart {
    match part {
        Part::Text(text_part) => GooglePart {
            text: Some(text_part.text),
            ..Default::default()
        },
        Part::Image(image_part) => GooglePart {
            inline_data: Some(Blob {
                data: Some(image_part.image_data),
                mime_type: Some(image_part.mime_type),
                display_name: None,
            }),
            ..Default::default()
        },
    }
}

fn map_google_content(parts: Vec<GooglePart>) -> ImageModelResult<Vec<Part>> {
    parts
        .into_iter()
        .filter_map(|part| {
            if let Some(text) = part.text {
                Some(Ok(Part::text(text)))
            } else if let Some(inline_data) = part.inline_data {
                if let (Some(data), Some(mime_type)) = (inline_data.data, inline_data.mime_type) {
                    if mime_type.starts_with("image/") {
                        Some(Ok(Part::Image(ImagePart {
                            image_data: data,
                            mime_type,
                            width: None,
                            height: None,
                        })))
                    } else {
                        None
                    }
                } else {
                    Some(Err(ImageModelError::Invariant(
                        PROVIDER,
                        "Inline data missing data or mime type".to_string(),
                    )))
                }
            } else {
                None
            }
        })
        .collect()
}
