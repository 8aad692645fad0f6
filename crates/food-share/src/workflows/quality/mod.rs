//! Food photo quality assessment.

mod classifier;
pub mod domain;
mod heuristic;
mod remote;

pub use classifier::{ConfiguredClassifier, HeuristicClassifier, ImageClassifier};
pub use domain::{
    ImageAnalysisResult, QualityGrade, RawSignals, AGING_WARNING, SPOILED_WARNING,
    UNANALYZED_WARNING,
};
pub use heuristic::{
    analyze_image, content_hash, derive_signals, food_type_from_filename, grade_signals,
    normalize_hash, HASHED_PREFIX_BYTES,
};
pub use remote::{content_type_for, is_image_content_type, RemoteClassifier, RemoteClassifierError};
