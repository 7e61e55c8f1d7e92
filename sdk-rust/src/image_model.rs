use crate::{ImageModelInput, ImageModelResult, ModelResponse};

#[async_trait::async_trait]
pub trait ImageModel: Send + Sync {
    fn provider(&self) -> &'static str;
    fn model_id(&self) -> String;
    async fn generate(&self, input: ImageModelInput) -> ImageModelResult<ModelResponse>;
}
