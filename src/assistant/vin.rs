use super::{
    decode::decode_vehicle_information,
    prompts::VIN_PROMPT,
    types::{ImageKind, UploadedImage, VehicleInformation},
};
use crate::{
    Error, Result,
    llm::{ChatCompletionRequest, ChatMessage, LlmClient},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::ImageFormat;
use std::{io::Cursor, sync::Arc};
use tracing::{debug, info, warn};

/// Reads a VIN off an uploaded photo with the vision model.
pub struct VinExtractor {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl VinExtractor {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    pub async fn extract(&self, image: &UploadedImage) -> Result<VehicleInformation> {
        let kind = ImageKind::from_content_type(&image.content_type)?;
        info!(
            "Loading image {:?} ({:?}, {} bytes)",
            image.filename,
            kind,
            image.bytes.len()
        );

        let bytes = image.bytes.clone();
        let data_url = tokio::task::spawn_blocking(move || encode_png_data_url(&bytes))
            .await
            .map_err(|e| Error::internal(format!("Image encoding task failed: {}", e)))??;

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(VIN_PROMPT).with_image(data_url)],
            response_format: None,
            max_tokens: None,
            temperature: None,
        };

        let response = self.llm.create_chat_completion(request).await?;
        let content = response.first_content()?;
        debug!("VIN extraction reply: {}", content);

        match decode_vehicle_information(content) {
            Ok(info) => {
                info!(
                    "VIN identified: make={:?} model={:?}",
                    info.make, info.model
                );
                Ok(info)
            }
            Err(e) => {
                warn!("Error identifying VIN: {}", e);
                Err(e)
            }
        }
    }
}

/// Decodes any supported image and re-encodes it as a base64 PNG `data:` URL.
pub fn encode_png_data_url(bytes: &[u8]) -> Result<String> {
    let decoded = image::load_from_memory(bytes)?;

    let mut png = Vec::new();
    decoded.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}
