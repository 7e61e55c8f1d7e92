use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};

/// Composes a `data:<mime>;base64,<data>` URL from already-encoded data.
pub fn encode(mime_type: &str, base64_data: &str) -> String {
    format!("data:{mime_type};base64,{base64_data}")
}

/// Splits a data URL into its MIME type and base64 payload.
pub fn split(data_url: &str) -> Option<(&str, &str)> {
    let rest = data_url.strip_prefix("data:")?;
    let (meta, data) = rest.split_once(',')?;
    let mime_type = meta.strip_suffix(";base64")?;
    Some((mime_type, data))
}

/// Decodes the payload of a data URL into raw bytes.
pub fn decode(data_url: &str) -> Option<(String, Vec<u8>)> {
    let (mime_type, data) = split(data_url)?;
    let bytes = BASE64_STANDARD.decode(data).ok()?;
    Some((mime_type.to_string(), bytes))
}
