use genimage_sdk::{
    genimage_sdk_test::MockImageModel, ImageModel, ImageModelError, Modality, ModelResponse, Part,
};
use logo_studio::{
    ClearConfirmation, FriendlyErrorKind, GenerateRequest, KeyValueStore, MemoryStore,
    OutputFormat, Phase, Studio, StudioError, ValidationError,
};
use std::{sync::Arc, time::Duration};

fn studio_with(model: Arc<MockImageModel>, store: Arc<dyn KeyValueStore>) -> Studio {
    let factory_model = model;
    Studio::builder(
        move |_api_key: &str| factory_model.clone() as Arc<dyn ImageModel>,
        store,
    )
    .default_api_key("test-key")
    .restyle_error_timeout(Duration::from_millis(50))
    .build()
}

fn image_response(image_data: &str, mime_type: &str) -> ModelResponse {
    ModelResponse {
        content: vec![Part::image(image_data, mime_type)],
        ..ModelResponse::default()
    }
}

fn text_response(text: &str) -> ModelResponse {
    ModelResponse {
        content: vec![Part::text(text)],
        ..ModelResponse::default()
    }
}

fn acme_request() -> GenerateRequest {
    GenerateRequest {
        prompt: "Acme".to_string(),
        style: "Classic".to_string(),
        format: Some(OutputFormat::Jpeg),
        ..GenerateRequest::default()
    }
}

#[tokio::test]
async fn generating_records_one_history_entry_at_the_head() {
    let model = Arc::new(MockImageModel::new());
    model.enqueue_generate(image_response("aW1hZ2U=", "image/jpeg"));
    let mut studio = studio_with(model.clone(), Arc::new(MemoryStore::new()));

    let image = studio
        .generate(acme_request())
        .await
        .expect("generate succeeds");

    assert_eq!(image.mime_type, "image/jpeg");
    assert_eq!(studio.phase(), Phase::Locked);

    let entries = studio.history().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].prompt, "Acme");
    assert!(entries[0]
        .image_data_url
        .starts_with("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn validation_failures_never_reach_the_model() {
    let model = Arc::new(MockImageModel::new());
    let mut studio = studio_with(model.clone(), Arc::new(MemoryStore::new()));

    let missing_prompt = GenerateRequest {
        prompt: "   ".to_string(),
        ..acme_request()
    };
    let err = studio.generate(missing_prompt).await.expect_err("no prompt");
    assert!(matches!(
        err,
        StudioError::Validation(ValidationError::EmptyPrompt)
    ));

    let missing_style = GenerateRequest {
        style: String::new(),
        ..acme_request()
    };
    let err = studio.generate(missing_style).await.expect_err("no style");
    assert!(matches!(
        err,
        StudioError::Validation(ValidationError::MissingStyle)
    ));

    let missing_format = GenerateRequest {
        format: None,
        ..acme_request()
    };
    let err = studio.generate(missing_format).await.expect_err("no format");
    assert!(matches!(
        err,
        StudioError::Validation(ValidationError::MissingFormat)
    ));

    assert!(model.tracked_generate_inputs().is_empty());
    assert_eq!(studio.phase(), Phase::Idle);
    assert!(studio.history().is_empty());
}

#[tokio::test]
async fn successful_generation_locks_format_and_reference_inputs() {
    let model = Arc::new(MockImageModel::new());
    model.enqueue_generate(image_response("aW1hZ2U=", "image/png"));
    let mut studio = studio_with(model, Arc::new(MemoryStore::new()));

    studio
        .generate(GenerateRequest {
            format: Some(OutputFormat::Png),
            ..acme_request()
        })
        .await
        .expect("generate succeeds");

    let controls = studio.controls();
    assert!(!controls.format);
    assert!(!controls.references);
    assert!(!controls.generate);
    assert!(controls.style);
    assert!(controls.download);

    let err = studio
        .generate(acme_request())
        .await
        .expect_err("second generate is rejected");
    assert!(matches!(err, StudioError::SessionLocked));

    let err = studio
        .add_reference("image/png", "aGVsbG8=")
        .expect_err("references are locked");
    assert!(matches!(err, StudioError::SessionLocked));

    studio.reset();
    assert_eq!(studio.phase(), Phase::Idle);
    assert!(studio.controls().format);
}

#[tokio::test]
async fn generation_failure_returns_to_idle() {
    let model = Arc::new(MockImageModel::new());
    model.enqueue_generate(ImageModelError::StatusCode(
        reqwest::StatusCode::TOO_MANY_REQUESTS,
        "RESOURCE_EXHAUSTED".to_string(),
    ));
    let mut studio = studio_with(model, Arc::new(MemoryStore::new()));

    let err = studio
        .generate(acme_request())
        .await
        .expect_err("generate fails");
    assert!(matches!(err, StudioError::Model(_)));
    assert_eq!(studio.phase(), Phase::Idle);
    assert!(studio.session().is_none());
    assert!(studio.history().is_empty());
}

#[tokio::test]
async fn empty_response_is_a_distinct_failure() {
    let model = Arc::new(MockImageModel::new());
    model.enqueue_generate(text_response("no image for you"));
    let mut studio = studio_with(model, Arc::new(MemoryStore::new()));

    let err = studio
        .generate(acme_request())
        .await
        .expect_err("empty result");
    assert!(matches!(err, StudioError::EmptyResult));
    assert_eq!(studio.phase(), Phase::Idle);
}

#[tokio::test]
async fn restyle_replaces_displayed_image_under_the_same_prompt() {
    let model = Arc::new(MockImageModel::new());
    model
        .enqueue_generate(image_response("b3JpZ2luYWw=", "image/jpeg"))
        .enqueue_generate(image_response("cmVzdHlsZWQ=", "image/jpeg"));
    let mut studio = studio_with(model.clone(), Arc::new(MemoryStore::new()));

    studio
        .generate(acme_request())
        .await
        .expect("generate succeeds");
    studio.restyle("Retro").await.expect("restyle succeeds");

    let session = studio.session().expect("active session");
    assert_eq!(session.displayed.image_data, "cmVzdHlsZWQ=");
    assert_eq!(session.original.image_data, "b3JpZ2luYWw=");
    assert_eq!(session.style.as_deref(), Some("Retro"));

    let entries = studio.history().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].prompt, "Acme");
    assert_eq!(entries[1].prompt, "Acme");

    // The restyle call carries the prior image bytes plus an instruction.
    let inputs = model.tracked_generate_inputs();
    let restyle_input = &inputs[1];
    let content = match &restyle_input.messages[0] {
        genimage_sdk::Message::User(user) => &user.content,
        other => panic!("unexpected message: {other:?}"),
    };
    assert!(matches!(&content[0], Part::Image(image) if image.image_data == "b3JpZ2luYWw="));
    assert!(matches!(&content[1], Part::Text(text) if text.text.contains("Retro")));
}

#[tokio::test]
async fn restyle_failure_keeps_prior_image_and_overlay_expires() {
    let model = Arc::new(MockImageModel::new());
    model
        .enqueue_generate(image_response("b3JpZ2luYWw=", "image/jpeg"))
        .enqueue_generate(ImageModelError::Refusal("SAFETY".to_string()));
    let mut studio = studio_with(model, Arc::new(MemoryStore::new()));

    studio
        .generate(acme_request())
        .await
        .expect("generate succeeds");
    let err = studio.restyle("Retro").await.expect_err("restyle fails");
    assert!(matches!(err, StudioError::Model(_)));

    assert_eq!(studio.phase(), Phase::Locked);
    let displayed = studio.displayed().expect("image still shown");
    assert_eq!(displayed.image_data, "b3JpZ2luYWw=");
    assert_eq!(studio.history().len(), 1);

    let overlay = studio.restyle_error().expect("overlay raised");
    assert_eq!(overlay.kind, FriendlyErrorKind::ContentPolicy);

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(studio.restyle_error().is_none());
}

#[tokio::test]
async fn restyle_without_a_session_is_rejected() {
    let model = Arc::new(MockImageModel::new());
    let mut studio = studio_with(model.clone(), Arc::new(MemoryStore::new()));

    let err = studio.restyle("Retro").await.expect_err("no session");
    assert!(matches!(err, StudioError::NoSession));
    assert!(model.tracked_generate_inputs().is_empty());
}

#[tokio::test]
async fn references_or_colors_trigger_description_synthesis() {
    let model = Arc::new(MockImageModel::new());
    model
        .enqueue_generate(text_response("a folded prompt"))
        .enqueue_generate(image_response("aW1hZ2U=", "image/png"));
    let mut studio = studio_with(model.clone(), Arc::new(MemoryStore::new()));

    studio
        .add_reference("image/png", "cmVmZXJlbmNl")
        .expect("reference attached");
    studio
        .generate(GenerateRequest {
            format: Some(OutputFormat::Png),
            colors: Some("teal and gold".to_string()),
            ..acme_request()
        })
        .await
        .expect("generate succeeds");

    let inputs = model.tracked_generate_inputs();
    assert_eq!(inputs.len(), 2);

    // First call: vision synthesis over the reference image, text-only output.
    assert_eq!(inputs[0].modalities, Some(vec![Modality::Text]));
    let synthesis_content = match &inputs[0].messages[0] {
        genimage_sdk::Message::User(user) => &user.content,
        other => panic!("unexpected message: {other:?}"),
    };
    assert!(matches!(&synthesis_content[0], Part::Image(image) if image.image_data == "cmVmZXJlbmNl"));
    assert!(
        matches!(&synthesis_content[1], Part::Text(text) if text.text.contains("teal and gold"))
    );

    // Second call: image generation from the synthesized prompt.
    let generation_content = match &inputs[1].messages[0] {
        genimage_sdk::Message::User(user) => &user.content,
        other => panic!("unexpected message: {other:?}"),
    };
    assert!(matches!(&generation_content[0], Part::Text(text) if text.text == "a folded prompt"));
}

#[tokio::test]
async fn missing_credential_disables_generation_until_a_key_is_saved() {
    let model = Arc::new(MockImageModel::new());
    model.enqueue_generate(image_response("aW1hZ2U=", "image/jpeg"));
    let factory_model = model.clone();
    let mut studio = Studio::builder(
        move |_api_key: &str| factory_model.clone() as Arc<dyn ImageModel>,
        Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>,
    )
    .build();

    assert!(!studio.has_credential());
    let controls = studio.controls();
    assert!(!controls.generate);
    assert!(controls.settings_cta);

    let err = studio
        .generate(acme_request())
        .await
        .expect_err("no credential");
    assert!(matches!(err, StudioError::MissingCredential));
    assert!(model.tracked_generate_inputs().is_empty());

    studio.set_api_key("user-key").expect("key saved");
    assert!(studio.has_credential());
    assert!(studio.controls().generate);
    assert!(!studio.controls().settings_cta);

    studio
        .generate(acme_request())
        .await
        .expect("generate succeeds with key");

    studio.reset();
    studio.clear_api_key().expect("key cleared");
    assert!(!studio.has_credential());
    assert!(studio.controls().settings_cta);
}

#[tokio::test]
async fn selecting_history_rehydrates_and_locks_the_session() {
    let model = Arc::new(MockImageModel::new());
    model.enqueue_generate(image_response("aW1hZ2U=", "image/png"));
    let mut studio = studio_with(model, Arc::new(MemoryStore::new()));

    studio
        .generate(GenerateRequest {
            format: Some(OutputFormat::Png),
            ..acme_request()
        })
        .await
        .expect("generate succeeds");
    studio.reset();

    studio
        .add_reference("image/png", "cmVmZXJlbmNl")
        .expect("reference attached while idle");

    studio.select_history(0).expect("entry selected");

    assert_eq!(studio.phase(), Phase::Locked);
    assert!(studio.references().is_empty());
    let session = studio.session().expect("session rehydrated");
    assert_eq!(session.prompt, "Acme");
    assert_eq!(session.format, OutputFormat::Png);
    assert_eq!(session.displayed.image_data, "aW1hZ2U=");
    assert!(!studio.controls().format);

    let err = studio.select_history(5).expect_err("out of range");
    assert!(matches!(err, StudioError::UnknownHistoryEntry(5)));
}

#[tokio::test]
async fn clearing_history_requires_confirmation() {
    let model = Arc::new(MockImageModel::new());
    model.enqueue_generate(image_response("aW1hZ2U=", "image/jpeg"));
    let store = Arc::new(MemoryStore::new());
    let mut studio = studio_with(model, store.clone());

    studio
        .generate(acme_request())
        .await
        .expect("generate succeeds");
    assert_eq!(studio.history().len(), 1);

    let cleared = studio
        .clear_history(ClearConfirmation::Cancelled)
        .expect("cancelled clear");
    assert!(!cleared);
    assert_eq!(studio.history().len(), 1);

    let cleared = studio
        .clear_history(ClearConfirmation::Confirmed)
        .expect("confirmed clear");
    assert!(cleared);
    assert!(studio.history().is_empty());
    assert_eq!(store.get("history").expect("persisted").as_deref(), Some("[]"));
}

#[tokio::test]
async fn download_decodes_the_displayed_image() {
    let model = Arc::new(MockImageModel::new());
    model.enqueue_generate(image_response("aGVsbG8=", "image/jpeg"));
    let mut studio = studio_with(model, Arc::new(MemoryStore::new()));

    let err = studio.download().expect_err("nothing to download yet");
    assert!(matches!(err, StudioError::NoSession));

    studio
        .generate(acme_request())
        .await
        .expect("generate succeeds");

    let download = studio.download().expect("download");
    assert_eq!(download.file_name, "logo-generated.jpeg");
    assert_eq!(download.mime_type, "image/jpeg");
    assert_eq!(download.bytes, b"hello");
}
