//! Image quality analysis port.
//!
//! The seller form can opportunistically ask an external image-analysis
//! service for a quality-grade estimate. The analyzer is strictly optional:
//! when it errors, callers substitute [`QualityAssessment::fallback`] and
//! carry on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Quality grade assigned to a fruit image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityGrade {
    A,
    B,
    C,
    Rejected,
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
            Self::C => f.write_str("C"),
            Self::Rejected => f.write_str("Rejected"),
        }
    }
}

/// Estimate returned by the image-analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAssessment {
    pub grade: QualityGrade,
    /// 0 to 100 scale of ripeness.
    pub ripeness_score: f32,
    /// Estimated Brix value.
    pub sweetness_prediction: f32,
    pub defects: Vec<String>,
    pub reasoning: String,
}

impl QualityAssessment {
    /// Conservative estimate used when the analyzer is unavailable.
    pub fn fallback() -> Self {
        Self {
            grade: QualityGrade::B,
            ripeness_score: 75.0,
            sweetness_prediction: 13.5,
            defects: vec!["Could not connect to analysis service".to_string()],
            reasoning: "Default grade applied; the image could not be analyzed".to_string(),
        }
    }
}

/// External image-analysis service.
#[async_trait]
pub trait QualityAnalyzer: Send + Sync {
    /// Grades the given image. Callers are expected to fall back to
    /// [`QualityAssessment::fallback`] on error rather than fail the
    /// submission.
    async fn analyze(&self, image: &[u8], mime: &str) -> Result<QualityAssessment>;
}
