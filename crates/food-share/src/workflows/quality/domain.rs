use serde::{Deserialize, Serialize};

/// Freshness/quality grade reported for a food photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityGrade {
    #[serde(alias = "Excellent")]
    Good,
    Fair,
    Poor,
    #[serde(other)]
    Unknown,
}

impl QualityGrade {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::Unknown => "Unknown",
        }
    }
}

/// Intermediate signals behind a heuristic assessment, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSignals {
    pub color_variance: f64,
    pub texture_complexity: f64,
    pub brightness_level: f64,
    pub spoilage_indicator: f64,
}

/// Outcome of analyzing a single uploaded food image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysisResult {
    pub food_type: String,
    pub confidence: f64,
    pub freshness: QualityGrade,
    pub quality: QualityGrade,
    pub is_edible: bool,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<RawSignals>,
}

pub const SPOILED_WARNING: &str =
    "The food appears to be spoiled and is not suitable for donation.";
pub const AGING_WARNING: &str =
    "The food shows signs of aging. Please verify freshness before donation.";
pub const UNANALYZED_WARNING: &str =
    "Could not analyze the image. Please verify the food quality manually.";

impl ImageAnalysisResult {
    /// Fixed result returned whenever an image cannot be analyzed.
    pub fn unanalyzed() -> Self {
        Self {
            food_type: "Unknown food".to_string(),
            confidence: 0.5,
            freshness: QualityGrade::Unknown,
            quality: QualityGrade::Unknown,
            is_edible: false,
            warning: Some(UNANALYZED_WARNING.to_string()),
            raw_data: None,
        }
    }

    pub fn is_unanalyzed(&self) -> bool {
        self.quality == QualityGrade::Unknown && self.raw_data.is_none()
    }
}
