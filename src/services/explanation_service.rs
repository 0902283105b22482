use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::StructuredSummary,
    services::{
        completion_client::CompletionClient, normalizer::normalize_response,
        prompt_builder::build_explanation_prompt,
    },
};

pub struct ExplanationService {
    client: Arc<dyn CompletionClient>,
}

impl ExplanationService {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Turns a discharge summary into a `StructuredSummary` with one
    /// completion call. No retry on failure.
    pub async fn explain(&self, discharge_text: &str) -> AppResult<StructuredSummary> {
        if discharge_text.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Discharge summary text is required".to_string(),
            ));
        }

        let prompt = build_explanation_prompt(discharge_text);
        log::info!(
            "Requesting explanation (input {} chars, prompt {} chars)",
            discharge_text.chars().count(),
            prompt.chars().count()
        );

        let raw = self.client.complete(&prompt).await?;
        log::debug!("Completion returned {} chars", raw.chars().count());

        let summary = normalize_response(&raw).map_err(|err| {
            log::error!("Could not normalize model output: {}", err.error_code());
            err
        })?;

        log::info!(
            "Explanation ready: {} actions, {} red flags, {} medications, {} quiz questions",
            summary.what_to_do.len(),
            summary.red_flags.len(),
            summary.medications.len(),
            summary.quiz_questions.len()
        );
        Ok(summary)
    }
}
