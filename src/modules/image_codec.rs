//! Image codec helpers
//! Decodes generated images (data URL, http(s) URL or bare base64) and
//! encodes input images as data URLs

use crate::providers::constants::IMAGE_DOWNLOAD_TIMEOUT_SECS;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use url::Url;

static DATA_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^data:(?P<mime>[^;]+);base64,(?P<data>.+)$").expect("data URL pattern is valid")
});

/// Input format of an image string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    DataUrl,
    Base64,
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataUrl => f.write_str("data URL"),
            Self::Base64 => f.write_str("base64 string"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImageDecodeError {
    #[error("Invalid data URL format")]
    InvalidDataUrl,
    #[error("Invalid base64 payload in {format}: {source}")]
    InvalidBase64 {
        format: ImageFormat,
        source: base64::DecodeError,
    },
    #[error("Failed to fetch image from URL: {0}")]
    Fetch(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Decode an image returned by the generation API.
pub async fn decode_image(
    http: &reqwest::Client,
    input: &str,
) -> Result<DecodedImage, ImageDecodeError> {
    if input.starts_with("data:") {
        return decode_data_url(input);
    }

    if let Ok(url) = Url::parse(input) {
        if matches!(url.scheme(), "http" | "https") {
            return fetch_image(http, url).await;
        }
    }

    let bytes = decode_base64(input, ImageFormat::Base64)?;
    Ok(DecodedImage {
        mime_type: "image/png".to_string(),
        bytes,
    })
}

/// Split a `data:<mime>;base64,<payload>` URL.
pub fn decode_data_url(input: &str) -> Result<DecodedImage, ImageDecodeError> {
    let captures = DATA_URL
        .captures(input.trim())
        .ok_or(ImageDecodeError::InvalidDataUrl)?;

    let bytes = decode_base64(&captures["data"], ImageFormat::DataUrl)?;
    Ok(DecodedImage {
        mime_type: captures["mime"].to_string(),
        bytes,
    })
}

fn decode_base64(payload: &str, format: ImageFormat) -> Result<Vec<u8>, ImageDecodeError> {
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|source| ImageDecodeError::InvalidBase64 { format, source })
}

async fn fetch_image(http: &reqwest::Client, url: Url) -> Result<DecodedImage, ImageDecodeError> {
    let response = http
        .get(url.clone())
        .timeout(Duration::from_secs(IMAGE_DOWNLOAD_TIMEOUT_SECS))
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| ImageDecodeError::Fetch(e.to_string()))?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ImageDecodeError::Fetch(e.to_string()))?
        .to_vec();

    let mime_type = match content_type {
        Some(content_type) if content_type.starts_with("image/") => content_type,
        _ => mime_from_extension(url.path()).to_string(),
    };

    Ok(DecodedImage { mime_type, bytes })
}

/// Guess an image MIME type from a URL path's extension.
pub fn mime_from_extension(path: &str) -> &'static str {
    let extension = path.rsplit('.').next().unwrap_or_default().to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "image/unknown",
    }
}

/// Input image prepared for the generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data_url: String,
    pub original_len: usize,
    pub encoded_len: usize,
}

impl EncodedImage {
    /// Size report shown to the user, in KB
    pub fn report(&self) -> String {
        format!(
            "Image encoded: original size={:.2}KB, encoded size={:.2}KB",
            self.original_len as f64 / 1024.0,
            self.encoded_len as f64 / 1024.0
        )
    }
}

/// Base64-encode image bytes into a PNG data URL.
pub fn encode_data_url(bytes: &[u8]) -> EncodedImage {
    let encoded = STANDARD.encode(bytes);
    EncodedImage {
        original_len: bytes.len(),
        encoded_len: encoded.len(),
        data_url: format!("data:image/png;base64,{}", encoded),
    }
}
