//! Interpretation orchestrator, the entry point the HTTP and journal layers depend on.
//!
//! Flow: validate dream text → build prompt → model call → extract.
//! Only validation, transport and cancellation failures leave this module;
//! anything about the *shape* of the model output is absorbed by the extractor.

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::interpretation::extractor::ResponseExtractor;
use crate::interpretation::prompt_builder::build_prompt;
use crate::llm_client::{ModelError, TextGenerator};
use crate::models::{DreamEntry, InterpretationResult, UserContext};

#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("Validation error: {field} must not be empty")]
    Validation { field: &'static str },

    #[error("Interpretation failed: {0}")]
    Interpretation(#[source] ModelError),

    #[error("Interpretation was cancelled")]
    Cancelled,
}

#[derive(Clone)]
pub struct InterpretationOrchestrator {
    model: Arc<dyn TextGenerator>,
    extractor: ResponseExtractor,
}

impl InterpretationOrchestrator {
    pub fn new(model: Arc<dyn TextGenerator>, extractor: ResponseExtractor) -> Self {
        Self { model, extractor }
    }

    pub fn extractor(&self) -> &ResponseExtractor {
        &self.extractor
    }

    /// Interprets a dream with no external cancellation.
    #[allow(dead_code)]
    pub async fn interpret(
        &self,
        user: &UserContext,
        dream: &DreamEntry,
    ) -> Result<InterpretationResult, InterpretError> {
        self.interpret_with_cancel(user, dream, &CancellationToken::new())
            .await
    }

    /// Interprets a dream, aborting the in-flight model call if `cancel` fires.
    pub async fn interpret_with_cancel(
        &self,
        user: &UserContext,
        dream: &DreamEntry,
        cancel: &CancellationToken,
    ) -> Result<InterpretationResult, InterpretError> {
        if !dream.has_dream_text() {
            return Err(InterpretError::Validation { field: "dreamText" });
        }

        let prompt = build_prompt(user, dream);
        info!(
            "Interpreting dream '{}' for user '{}' ({} prompt chars)",
            dream.id,
            user.id,
            prompt.len()
        );

        let raw = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Interpretation of dream '{}' cancelled", dream.id);
                return Err(InterpretError::Cancelled);
            }
            generated = self.model.generate(&prompt) => generated.map_err(|e| {
                warn!("Model call for dream '{}' failed: {e}", dream.id);
                InterpretError::Interpretation(e)
            })?,
        };

        Ok(self.extractor.extract(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::interpretation::extractor::missing_section;
    use crate::models::InterpretationField;

    /// Returns a canned payload and counts calls.
    struct FakeModel {
        reply: String,
        calls: AtomicUsize,
    }

    impl FakeModel {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for FakeModel {
        async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
            assert!(prompt.contains("dream interpreter"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    struct FailingModel;

    #[async_trait]
    impl TextGenerator for FailingModel {
        async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
            Err(ModelError::Upstream {
                status: 500,
                message: "model crashed".to_string(),
            })
        }
    }

    struct HangingModel;

    #[async_trait]
    impl TextGenerator for HangingModel {
        async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
    }

    fn orchestrator(model: Arc<dyn TextGenerator>) -> InterpretationOrchestrator {
        InterpretationOrchestrator::new(model, ResponseExtractor::default())
    }

    #[tokio::test]
    async fn test_interpret_extracts_fenced_json_reply() {
        let model = FakeModel::replying(
            "```json\n{\"summary\":\"a\",\"symbolicMeaning\":\"b\",\"emotionalInsight\":\"c\",\"culturalAnalysis\":\"d\",\"reflectionPrompt\":\"e\"}\n```",
        );
        let result = orchestrator(model.clone())
            .interpret(&UserContext::anonymous("u1"), &DreamEntry::new("a falling dream"))
            .await
            .unwrap();

        assert_eq!(result.summary, "a");
        assert_eq!(result.reflection_prompt, "e");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_dream_text_fails_validation_before_model_call() {
        let model = FakeModel::replying("unused");
        let err = orchestrator(model.clone())
            .interpret(&UserContext::anonymous("u1"), &DreamEntry::new("   "))
            .await
            .unwrap_err();

        assert!(matches!(err, InterpretError::Validation { field: "dreamText" }));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_model_failure_is_wrapped_with_cause() {
        let err = orchestrator(Arc::new(FailingModel))
            .interpret(&UserContext::anonymous("u1"), &DreamEntry::new("a dream"))
            .await
            .unwrap_err();

        match err {
            InterpretError::Interpretation(ModelError::Upstream { status, .. }) => {
                assert_eq!(status, 500)
            }
            other => panic!("expected wrapped upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unstructured_reply_degrades_instead_of_failing() {
        let model = FakeModel::replying("I could not follow the format, but water means change.");
        let result = orchestrator(model)
            .interpret(&UserContext::anonymous("u1"), &DreamEntry::new("a lake"))
            .await
            .unwrap();

        assert_eq!(
            result.summary,
            "I could not follow the format, but water means change."
        );
        assert_eq!(
            result.cultural_analysis,
            missing_section(InterpretationField::CulturalAnalysis)
        );
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_model_call() {
        let model = FakeModel::replying("unused");
        let token = CancellationToken::new();
        token.cancel();

        let err = orchestrator(model.clone())
            .interpret_with_cancel(&UserContext::anonymous("u1"), &DreamEntry::new("x"), &token)
            .await
            .unwrap_err();

        assert!(matches!(err, InterpretError::Cancelled));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_in_flight_call() {
        let orchestrator = orchestrator(Arc::new(HangingModel));
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let err = orchestrator
            .interpret_with_cancel(&UserContext::anonymous("u1"), &DreamEntry::new("x"), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, InterpretError::Cancelled));
    }

    #[tokio::test]
    async fn test_validation_wins_over_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let err = orchestrator(FakeModel::replying("unused"))
            .interpret_with_cancel(&UserContext::anonymous("u1"), &DreamEntry::new(""), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, InterpretError::Validation { .. }));
    }
}
