use bytes::Bytes;
use log::{error, info};
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::error::ConversionError;

const CONVERT_PATH: &str = "/convert/alac-to-flac/?file";
const UPLOAD_FIELD: &str = "file";
const UPLOAD_CONTENT_TYPE: &str = "audio/aac";
const CONVERTED_EXTENSION: &str = "flac";

/// Proxy for the external ALAC-to-FLAC service. Holds the process-wide
/// reqwest client built at startup; per-call state lives on the stack.
pub struct Transcoder {
    client: Client,
    base_url: String,
    trigger_kinds: Vec<String>,
}

impl Transcoder {
    pub fn new(client: Client, base_url: &str, trigger_kinds: Vec<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            trigger_kinds,
        }
    }

    /// Conversion triggers only for a configured lossless-container label,
    /// and only when the caller has not suppressed it.
    pub fn wants_conversion(&self, kind: Option<&str>, suppress: bool) -> bool {
        if suppress {
            return false;
        }
        kind.map_or(false, |k| self.trigger_kinds.iter().any(|t| t == k))
    }

    /// Returns the payload to serve and its filename: either the input
    /// untouched, or the transcoder's output with the extension swapped.
    pub async fn maybe_convert(
        &self,
        bytes: Vec<u8>,
        kind: Option<&str>,
        file_name: &str,
        suppress: bool,
    ) -> Result<(Bytes, String), ConversionError> {
        if !self.wants_conversion(kind, suppress) {
            return Ok((Bytes::from(bytes), file_name.to_string()));
        }
        self.convert(bytes, file_name).await
    }

    async fn convert(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<(Bytes, String), ConversionError> {
        let upload_size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(UPLOAD_CONTENT_TYPE)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let url = format!("{}{}", self.base_url, CONVERT_PATH);
        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!("transcoder at {} answered {} for {}", url, status, file_name);
            return Err(ConversionError::Status(status));
        }

        let converted = response.bytes().await?;
        info!(
            "converted {} ({} bytes in, {} bytes out)",
            file_name,
            upload_size,
            converted.len()
        );
        Ok((converted, converted_file_name(file_name)))
    }
}

fn converted_file_name(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, _)) => format!("{}.{}", stem, CONVERTED_EXTENSION),
        None => format!("{}.{}", file_name, CONVERTED_EXTENSION),
    }
}
