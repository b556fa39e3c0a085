use base64::Engine;

use super::AppError;

/// Decodes a base-64 camera frame, with or without a `data:<mime>;base64,` prefix.
pub fn decode_frame(frame: &str) -> Result<Vec<u8>, AppError> {
    let payload = strip_data_uri(frame.trim());

    // Browsers may wrap long data URIs; whitespace is never part of the alphabet
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(AppError::bad_request("No image provided"));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| AppError::bad_request(format!("Invalid image encoding: {}", e)))?;

    Ok(bytes)
}

fn strip_data_uri(frame: &str) -> &str {
    if !frame.starts_with("data:") {
        return frame;
    }
    match frame.find(";base64,") {
        Some(idx) => &frame[idx + ";base64,".len()..],
        None => frame,
    }
}
