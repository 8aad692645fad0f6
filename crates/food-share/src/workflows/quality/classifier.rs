use std::future::Future;

use super::domain::ImageAnalysisResult;
use super::heuristic::analyze_image;
use super::remote::{RemoteClassifier, RemoteClassifierError};
use crate::config::{ClassifierConfig, ClassifierMode};

/// Capability for turning an uploaded food photo into a quality assessment.
///
/// Implementations never fail: an image that cannot be assessed yields
/// [`ImageAnalysisResult::unanalyzed`].
pub trait ImageClassifier: Send + Sync {
    fn classify<'a>(
        &'a self,
        image: &'a [u8],
        filename: &'a str,
    ) -> impl Future<Output = ImageAnalysisResult> + Send + 'a;
}

/// Local content-hash heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl ImageClassifier for HeuristicClassifier {
    fn classify<'a>(
        &'a self,
        image: &'a [u8],
        filename: &'a str,
    ) -> impl Future<Output = ImageAnalysisResult> + Send + 'a {
        std::future::ready(analyze_image(image, filename))
    }
}

impl ImageClassifier for RemoteClassifier {
    fn classify<'a>(
        &'a self,
        image: &'a [u8],
        filename: &'a str,
    ) -> impl Future<Output = ImageAnalysisResult> + Send + 'a {
        self.classify_or_fallback(image, filename)
    }
}

/// Classifier chosen by [`ClassifierConfig::mode`].
#[derive(Debug, Clone)]
pub enum ConfiguredClassifier {
    Heuristic(HeuristicClassifier),
    Remote(RemoteClassifier),
}

impl ConfiguredClassifier {
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, RemoteClassifierError> {
        match config.mode {
            ClassifierMode::Heuristic => Ok(Self::Heuristic(HeuristicClassifier)),
            ClassifierMode::Remote => Ok(Self::Remote(RemoteClassifier::new(
                &config.service_url,
                config.timeout,
            )?)),
        }
    }

    pub fn mode(&self) -> ClassifierMode {
        match self {
            Self::Heuristic(_) => ClassifierMode::Heuristic,
            Self::Remote(_) => ClassifierMode::Remote,
        }
    }
}

impl Default for ConfiguredClassifier {
    fn default() -> Self {
        Self::Heuristic(HeuristicClassifier)
    }
}

impl ImageClassifier for ConfiguredClassifier {
    fn classify<'a>(
        &'a self,
        image: &'a [u8],
        filename: &'a str,
    ) -> impl Future<Output = ImageAnalysisResult> + Send + 'a {
        async move {
            match self {
                Self::Heuristic(classifier) => classifier.classify(image, filename).await,
                Self::Remote(classifier) => classifier.classify(image, filename).await,
            }
        }
    }
}
