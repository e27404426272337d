//! Seller product submission.
//!
//! Validation runs first and entirely locally; a bad form never reaches the
//! network. The image-quality analyzer is consulted when configured, with a
//! conservative fallback grade when it fails.

use std::sync::Arc;

use tracing::{info, warn};

use melonmart_core::{
    MartError, NewProductForm, Product, QualityAnalyzer, QualityAssessment, Result,
};

use crate::context::AppContext;

/// Outcome of a seller submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SellerSubmission {
    pub product: Product,
    /// Present when the analyzer ran (or its fallback was applied).
    pub assessment: Option<QualityAssessment>,
}

/// Handles the seller-facing product submission flow.
pub struct SellerService {
    ctx: Arc<AppContext>,
    analyzer: Option<Arc<dyn QualityAnalyzer>>,
}

impl SellerService {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            analyzer: None,
        }
    }

    /// Enables opportunistic image grading.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn QualityAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Validates and submits a new product listing.
    ///
    /// Preconditions, in order: the form must validate, and a token must be
    /// present locally (it is never sent otherwise). When an image and an
    /// analyzer are both available the image is graded first and the grade
    /// is filled into the form unless the seller chose one.
    pub async fn submit_product(&self, mut form: NewProductForm) -> Result<SellerSubmission> {
        form.validate()?;
        let token = self
            .ctx
            .tokens
            .load()
            .await?
            .ok_or(MartError::Unauthenticated)?;

        let assessment = match (&self.analyzer, &form.image) {
            (Some(analyzer), Some(image)) => {
                match analyzer.analyze(&image.bytes, &image.mime).await {
                    Ok(assessment) => Some(assessment),
                    Err(err) => {
                        warn!(error = %err, "image analysis failed, applying fallback grade");
                        Some(QualityAssessment::fallback())
                    }
                }
            }
            _ => None,
        };
        if form.quality_grade.is_none() {
            if let Some(assessment) = &assessment {
                form.quality_grade = Some(assessment.grade.to_string());
            }
        }

        let product = self.ctx.gateway.create_product(&token, &form).await?;
        info!(name = %product.name, "product submitted");
        Ok(SellerSubmission {
            product,
            assessment,
        })
    }
}
