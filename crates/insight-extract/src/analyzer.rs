//! End-to-end question answering: normalize, then reason.

use std::time::Instant;

use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use insight_core::{AnalyzeRequest, AnswerResult, NormalizedContentBundle};
use insight_inference::Reasoner;

use crate::pipeline::ContentPipeline;

/// Answers one question about an optional file.
///
/// Always returns an [`AnswerResult`]; reasoner exhaustion yields the apology.
pub struct Analyzer {
    pipeline: ContentPipeline,
    reasoner: Reasoner,
}

impl Analyzer {
    pub fn new(pipeline: ContentPipeline, reasoner: Reasoner) -> Self {
        Self { pipeline, reasoner }
    }

    pub fn pipeline(&self) -> &ContentPipeline {
        &self.pipeline
    }

    pub fn reasoner(&self) -> &Reasoner {
        &self.reasoner
    }

    /// Normalize the request's file and answer its question.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> AnswerResult {
        self.analyze_with_bundle(request).await.1
    }

    /// Like [`analyze`](Self::analyze), also returning the bundle that was
    /// sent to the reasoner.
    pub async fn analyze_with_bundle(
        &self,
        request: &AnalyzeRequest,
    ) -> (NormalizedContentBundle, AnswerResult) {
        let request_id = Uuid::now_v7();
        let span = info_span!("analyze", request_id = %request_id);

        async {
            let start = Instant::now();
            let bundle = self.pipeline.normalize(request).await;
            let answer = self.reasoner.answer(&bundle).await;

            info!(
                subsystem = "extract",
                file_type = %request.file_type,
                primary_content = bundle.primary().label(),
                sources = answer.sources.len(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Analysis complete"
            );

            (bundle, answer)
        }
        .instrument(span)
        .await
    }
}
