use std::{collections::VecDeque, sync::Mutex};

use crate::{
    errors::{ImageModelError, ImageModelResult},
    image_model::ImageModel,
    ImageModelInput, ModelResponse,
};

/// Result for a mocked `generate` call.
/// It can either be a full response or an error to return.
pub enum MockGenerateResult {
    Response(ModelResponse),
    Error(ImageModelError),
}

impl MockGenerateResult {
    /// Construct a result that yields the provided response.
    #[must_use]
    pub fn response(response: ModelResponse) -> Self {
        Self::Response(response)
    }

    /// Construct a result that yields the provided error.
    #[must_use]
    pub fn error(error: ImageModelError) -> Self {
        Self::Error(error)
    }
}

impl From<ModelResponse> for MockGenerateResult {
    fn from(response: ModelResponse) -> Self {
        Self::response(response)
    }
}

impl From<ImageModelError> for MockGenerateResult {
    fn from(error: ImageModelError) -> Self {
        Self::error(error)
    }
}

impl From<ImageModelResult<ModelResponse>> for MockGenerateResult {
    fn from(result: ImageModelResult<ModelResponse>) -> Self {
        match result {
            Ok(response) => Self::Response(response),
            Err(error) => Self::Error(error),
        }
    }
}

#[derive(Default)]
struct MockImageModelState {
    mocked_generate_results: VecDeque<MockGenerateResult>,
    tracked_generate_inputs: Vec<ImageModelInput>,
}

/// A mock image model for testing that tracks inputs and yields predefined
/// outputs.
pub struct MockImageModel {
    provider: &'static str,
    model_id: String,
    state: Mutex<MockImageModelState>,
}

impl Default for MockImageModel {
    fn default() -> Self {
        Self {
            provider: "mock",
            model_id: "mock-model".to_string(),
            state: Mutex::new(MockImageModelState::default()),
        }
    }
}

impl MockImageModel {
    /// Construct a new mock image model instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the provider identifier returned by the mock.
    pub fn set_provider(&mut self, provider: &'static str) {
        self.provider = provider;
    }

    /// Override the model identifier returned by the mock.
    pub fn set_model_id<S: Into<String>>(&mut self, model_id: S) {
        self.model_id = model_id.into();
    }

    /// Enqueue one or more mocked generate results.
    pub fn enqueue_generate_results<I>(&self, results: I) -> &Self
    where
        I: IntoIterator<Item = MockGenerateResult>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        for result in results {
            state.mocked_generate_results.push_back(result);
        }
        drop(state);
        self
    }

    /// Convenience to enqueue a single mocked generate result.
    pub fn enqueue_generate<R>(&self, result: R) -> &Self
    where
        R: Into<MockGenerateResult>,
    {
        self.enqueue_generate_results(std::iter::once(result.into()))
    }

    /// Retrieve the tracked generate inputs accumulated so far.
    pub fn tracked_generate_inputs(&self) -> Vec<ImageModelInput> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_generate_inputs.clone()
    }

    /// Reset tracked inputs without touching enqueued results.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.tracked_generate_inputs.clear();
    }

    /// Clear both tracked inputs and enqueued results.
    pub fn restore(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_generate_results.clear();
        state.tracked_generate_inputs.clear();
    }
}

#[async_trait::async_trait]
impl ImageModel for MockImageModel {
    fn provider(&self) -> &'static str {
        self.provider
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, input: ImageModelInput) -> ImageModelResult<ModelResponse> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.tracked_generate_inputs.push(input.clone());

        let result = state.mocked_generate_results.pop_front().ok_or_else(|| {
            ImageModelError::Invariant(self.provider, "no mocked generate results available".into())
        })?;

        match result {
            MockGenerateResult::Response(response) => Ok(response),
            MockGenerateResult::Error(error) => Err(error),
        }
    }
}
