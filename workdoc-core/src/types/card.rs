//! CSCS card analysis types

use serde::{Deserialize, Serialize};

/// Placeholder for any field the model could not read.
pub const NOT_VISIBLE: &str = "Not clearly visible";

/// The model's opinion of whether the card image looks genuine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisualAuthenticity {
    Genuine,
    Suspicious,
    #[default]
    Unclear,
}

impl VisualAuthenticity {
    /// Lenient parse of model output; anything unrecognised is `Unclear`.
    #[must_use]
    pub fn from_model_output(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "genuine" | "authentic" | "valid" => Self::Genuine,
            "suspicious" | "fake" | "fraudulent" | "tampered" => Self::Suspicious,
            _ => Self::Unclear,
        }
    }
}

/// Fields extracted from a card image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardAnalysis {
    pub card_number: String,
    pub holder_name: String,
    pub card_type: String,
    pub expiry_date: String,
    pub visual_authenticity: VisualAuthenticity,
    pub notes: String,
}

impl Default for CardAnalysis {
    fn default() -> Self {
        Self {
            card_number: NOT_VISIBLE.to_string(),
            holder_name: NOT_VISIBLE.to_string(),
            card_type: NOT_VISIBLE.to_string(),
            expiry_date: NOT_VISIBLE.to_string(),
            visual_authenticity: VisualAuthenticity::Unclear,
            notes: NOT_VISIBLE.to_string(),
        }
    }
}

/// Outcome of a card check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Valid,
    Expired,
    Invalid,
}

/// Result of [`CardVerificationService::verify_card_image`](crate::services::CardVerificationService::verify_card_image).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardVerificationResult {
    pub status: CardStatus,
    pub analysis: CardAnalysis,
    /// Whether the extracted card number has the expected format.
    pub card_number_valid: bool,
    /// Human-readable findings for the operator.
    pub issues: Vec<String>,
}
