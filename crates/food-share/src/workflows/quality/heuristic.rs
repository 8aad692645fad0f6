use super::domain::{
    ImageAnalysisResult, QualityGrade, RawSignals, AGING_WARNING, SPOILED_WARNING,
};

/// Only the leading bytes of an upload feed the content hash.
pub const HASHED_PREFIX_BYTES: usize = 5000;

const POOR_THRESHOLD: f64 = 0.7;
const FAIR_THRESHOLD: f64 = 0.4;

/// Simulated assessment derived from the image bytes alone.
///
/// This stands in for a vision model: the signals are a deterministic spread of a content
/// hash, not measured colour or texture.
pub fn analyze_image(image: &[u8], filename: &str) -> ImageAnalysisResult {
    if image.is_empty() {
        return ImageAnalysisResult::unanalyzed();
    }

    let normalized = normalize_hash(content_hash(image));
    grade_signals(derive_signals(normalized), normalized, food_type_from_filename(filename))
}

/// Threshold classification on the spoilage indicator, with confidence scaled by the
/// normalized hash.
///
/// Signals from [`derive_signals`] peak at a spoilage of 0.68, so only signals coming
/// from elsewhere can grade `Poor`.
pub fn grade_signals(
    signals: RawSignals,
    normalized: f64,
    food_type: String,
) -> ImageAnalysisResult {
    let (grade, confidence, is_edible, warning) = if signals.spoilage_indicator > POOR_THRESHOLD {
        (
            QualityGrade::Poor,
            0.8 + normalized * 0.15,
            false,
            Some(SPOILED_WARNING.to_string()),
        )
    } else if signals.spoilage_indicator > FAIR_THRESHOLD {
        (
            QualityGrade::Fair,
            0.7 + normalized * 0.2,
            true,
            Some(AGING_WARNING.to_string()),
        )
    } else {
        (QualityGrade::Good, 0.75 + normalized * 0.2, true, None)
    };

    ImageAnalysisResult {
        food_type,
        confidence,
        freshness: grade,
        quality: grade,
        is_edible,
        warning,
        raw_data: Some(signals),
    }
}

/// `hash = (hash << 5) - hash + byte` over the hashed prefix, wrapping at 32 bits.
pub fn content_hash(image: &[u8]) -> i32 {
    image
        .iter()
        .take(HASHED_PREFIX_BYTES)
        .fold(0i32, |hash, &byte| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(byte))
        })
}

/// `|hash| / i32::MAX`, capped at 1 for `i32::MIN`.
pub fn normalize_hash(hash: i32) -> f64 {
    (f64::from(hash).abs() / f64::from(i32::MAX)).min(1.0)
}

pub fn derive_signals(normalized: f64) -> RawSignals {
    let color_variance = (normalized * 100.0) % 1.0;
    let texture_complexity = ((normalized * 200.0) % 1.0) * 0.8 + 0.2;
    let brightness_level = ((normalized * 300.0) % 1.0) * 0.7 + 0.3;
    let spoilage_indicator = (1.0 - brightness_level) * 0.4 + color_variance * 0.6;

    RawSignals {
        color_variance,
        texture_complexity,
        brightness_level,
        spoilage_indicator,
    }
}

/// Drops the extension and turns hyphens into spaces: `fresh-mangoes.jpg` -> `fresh mangoes`.
pub fn food_type_from_filename(filename: &str) -> String {
    let stem = match filename.rfind('.') {
        Some(index) if index + 1 < filename.len() && !filename[index + 1..].contains('/') => {
            &filename[..index]
        }
        _ => filename,
    };

    let label = stem.replace('-', " ");
    if label.trim().is_empty() {
        "Unknown food".to_string()
    } else {
        label
    }
}
