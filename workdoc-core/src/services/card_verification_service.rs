//! CSCS card verification
//!
//! The card image goes to a vision-capable language model; the extracted
//! fields are then checked locally. There is no call to the official CSCS
//! verification service.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{
    CardAnalysis, CardStatus, CardVerificationResult, CompletionRequest, ImageInput,
    VisualAuthenticity, NOT_VISIBLE,
};
use crate::utils::cscs::{
    determine_card_status, parse_card_analysis, parse_expiry_date, validate_card_number,
};

const SUPPORTED_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
const CARD_MAX_TOKENS: u32 = 1024;

const CARD_SYSTEM_PROMPT: &str = "You are an assistant that reads UK construction industry \
CSCS cards from photos. Report only what is printed on the card.";

const CARD_PROMPT: &str = r#"Extract the details of this CSCS card and answer with a single JSON object:
{
  "cardNumber": "...",
  "holderName": "...",
  "cardType": "...",
  "expiryDate": "...",
  "visualAuthenticity": "genuine | suspicious | unclear",
  "notes": "..."
}
Use "Not clearly visible" for any field you cannot read. Give the expiry date as it is printed."#;

/// CSCS 卡片核验服务
pub struct CardVerificationService {
    ctx: Arc<ServiceContext>,
}

impl CardVerificationService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Analyse a card photo.
    pub async fn verify_card_image(
        &self,
        image: &[u8],
        media_type: &str,
    ) -> CoreResult<CardVerificationResult> {
        if image.is_empty() {
            return Err(CoreError::ValidationError("card image is empty".to_string()));
        }
        let media_type = media_type.trim().to_ascii_lowercase();
        if !SUPPORTED_MEDIA_TYPES.contains(&media_type.as_str()) {
            return Err(CoreError::ValidationError(format!(
                "unsupported image type '{media_type}'"
            )));
        }

        let model = self.ctx.language_model()?;
        log::info!(
            "Verifying CSCS card image ({} bytes, {media_type}) with {}",
            image.len(),
            model.model_name()
        );
        let response = model
            .complete(CompletionRequest {
                system: CARD_SYSTEM_PROMPT.to_string(),
                prompt: CARD_PROMPT.to_string(),
                image: Some(ImageInput {
                    media_type,
                    data: image.to_vec(),
                }),
                max_tokens: CARD_MAX_TOKENS,
            })
            .await?;

        let analysis = parse_card_analysis(&response);
        let result = evaluate(analysis, Utc::now().date_naive());
        log::info!(
            "CSCS card check finished: {:?}, {} issue(s)",
            result.status,
            result.issues.len()
        );
        Ok(result)
    }
}

/// Checks applied to an extracted analysis.
fn evaluate(analysis: CardAnalysis, today: NaiveDate) -> CardVerificationResult {
    let mut issues = Vec::new();

    let card_number_valid = validate_card_number(&analysis.card_number);
    if analysis.card_number == NOT_VISIBLE {
        issues.push("Card number could not be read".to_string());
    } else if !card_number_valid {
        issues.push(format!(
            "Card number '{}' is not 8 to 10 digits",
            analysis.card_number
        ));
    }

    if analysis.expiry_date == NOT_VISIBLE {
        issues.push("Expiry date could not be read".to_string());
    } else if parse_expiry_date(&analysis.expiry_date).is_none() {
        issues.push(format!(
            "Expiry date '{}' is not in a recognised format",
            analysis.expiry_date
        ));
    }

    match analysis.visual_authenticity {
        VisualAuthenticity::Suspicious => {
            issues.push("Card appears altered or counterfeit".to_string());
        }
        VisualAuthenticity::Unclear => {
            issues.push("Card authenticity could not be assessed".to_string());
        }
        VisualAuthenticity::Genuine => {}
    }

    let status = determine_card_status(&analysis, today);
    if status == CardStatus::Expired {
        issues.push(format!("Card expired on {}", analysis.expiry_date));
    }

    CardVerificationResult {
        status,
        analysis,
        card_number_valid,
        issues,
    }
}
