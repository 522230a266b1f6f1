use analysis::{AnalysisOutcome, Grade, privacy_score};
use pipeline::AnalysisRun;
use serde::Serialize;
use uuid::Uuid;

/// What the API returns for one analyzed policy.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub request_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
    pub privacy_score: u8,
    pub grade: Grade,
    pub text_length: usize,
    pub chunks_analyzed: usize,
    pub chunks_failed: usize,
}

impl AnalysisReport {
    pub fn new(
        url: Option<String>,
        outcome: AnalysisOutcome,
        text_length: usize,
        chunks_analyzed: usize,
    ) -> Self {
        let privacy_score = privacy_score(&outcome.analysis);

        Self {
            request_id: Uuid::new_v4(),
            url,
            outcome,
            privacy_score,
            grade: Grade::from_score(privacy_score),
            text_length,
            chunks_analyzed,
            chunks_failed: 0,
        }
    }

    pub fn from_run(url: Option<String>, run: AnalysisRun) -> Self {
        let chunks_failed = run.chunks_failed;
        let mut report = Self::new(url, run.outcome, run.text_length, run.chunks_analyzed);
        report.chunks_failed = chunks_failed;
        report
    }

    /// Same report under a fresh request id, for cache hits.
    pub fn reissue(mut self) -> Self {
        self.request_id = Uuid::new_v4();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis::RuleBasedAnalyzer;

    #[test]
    fn test_report_flattens_outcome() {
        let outcome = RuleBasedAnalyzer::new().analyze_tagged("We collect your email address.");
        let report = AnalysisReport::new(Some("https://a.test".into()), outcome, 30, 1);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["analysis_method"], "enhanced_rule_based");
        assert!(json["data_collection"]["types"].is_array());
        assert_eq!(json["url"], "https://a.test");
        assert_eq!(json["privacy_score"], report.privacy_score);
        assert!(json.get("ai_error").is_none());
    }

    #[test]
    fn test_fallback_run_reports_failed_chunks() {
        let text = "We use cookies.";
        let run = AnalysisRun {
            outcome: AnalysisOutcome::fallback(
                RuleBasedAnalyzer::new().analyze(text),
                "all chunk analyses failed",
            ),
            text_length: 15,
            chunks_analyzed: 0,
            chunks_failed: 3,
            elapsed: std::time::Duration::from_millis(5),
        };
        let json = serde_json::to_value(AnalysisReport::from_run(None, run)).unwrap();

        assert_eq!(json["chunks_analyzed"], 0);
        assert_eq!(json["chunks_failed"], 3);
        assert_eq!(json["ai_error"], "all chunk analyses failed");
    }

    #[test]
    fn test_reissue_changes_only_request_id() {
        let outcome = RuleBasedAnalyzer::new().analyze_tagged("We use cookies.");
        let report = AnalysisReport::new(None, outcome, 15, 1);
        let again = report.clone().reissue();

        assert_ne!(report.request_id, again.request_id);
        assert_eq!(report.outcome, again.outcome);
    }
}
