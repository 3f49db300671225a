//! Remote leaderboard: wire types, score reporting and the paginated view
//!
//! Scores are submitted once per ended run. The outcome only ever touches
//! `LeaderboardView`; gameplay state is never borrowed by a report.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifier::Identifier;

/// Entries shown per leaderboard page
pub const PAGE_SIZE: usize = 25;

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Wallet identifier the score is attributed to
    #[serde(rename = "wallet_address", alias = "identifier")]
    pub identifier: String,
    pub score: u64,
}

/// Body of a score submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    #[serde(rename = "wallet_address")]
    pub identifier: String,
    pub score: u64,
}

impl ScoreSubmission {
    pub fn new(identifier: &Identifier, score: u64) -> Self {
        Self {
            identifier: identifier.as_str().to_string(),
            score,
        }
    }
}

/// Status field of a submission response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitStatus {
    Success,
    Error,
    /// Anything else the server might send
    #[serde(other)]
    Unknown,
}

/// Response to a score submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: SubmitStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Some servers embed the updated leaderboard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaderboard: Option<Vec<LeaderboardEntry>>,
}

impl SubmitResponse {
    /// Treat anything but `success` as a rejection
    pub fn into_result(self) -> Result<Option<Vec<LeaderboardEntry>>, ReportError> {
        match self.status {
            SubmitStatus::Success => Ok(self.leaderboard),
            SubmitStatus::Error | SubmitStatus::Unknown => Err(ReportError::Rejected(self.message)),
        }
    }
}

/// Why a submission or fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// Request never completed
    Network(String),
    /// Non-2xx status without a readable body
    Http { status: u16 },
    /// Server answered with a non-success status
    Rejected(Option<String>),
    /// Body was not the expected JSON
    Decode(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Network(msg) => {
                write!(f, "Could not reach the leaderboard server: {}", msg)
            }
            ReportError::Http { status } => {
                write!(f, "Leaderboard server returned HTTP {}", status)
            }
            ReportError::Rejected(Some(msg)) => write!(f, "Error submitting score: {}", msg),
            ReportError::Rejected(None) => write!(f, "Error submitting score"),
            ReportError::Decode(msg) => write!(f, "Unexpected leaderboard response: {}", msg),
        }
    }
}

impl std::error::Error for ReportError {}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        ReportError::Decode(e.to_string())
    }
}

/// Remote leaderboard collaborator
///
/// Implemented over `fetch` in the browser and by fakes in tests.
#[allow(async_fn_in_trait)]
pub trait ScoreReporter {
    /// Submit one score
    async fn submit(&self, submission: &ScoreSubmission) -> Result<SubmitResponse, ReportError>;

    /// Fetch the current leaderboard
    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ReportError>;
}

/// Submit a score, then fetch the leaderboard if the response didn't carry one
///
/// Never retries; the first failure is returned.
pub async fn report_score<R: ScoreReporter>(
    reporter: &R,
    submission: &ScoreSubmission,
) -> Result<Vec<LeaderboardEntry>, ReportError> {
    log::info!("Submitting score {}", submission.score);
    let response = reporter.submit(submission).await?;
    match response.into_result()? {
        Some(entries) => Ok(entries),
        None => reporter.fetch_leaderboard().await,
    }
}

/// Load state of the leaderboard view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewStatus {
    /// Nothing requested yet
    #[default]
    Hidden,
    /// Request in flight
    Loading,
    /// Entries available
    Ready,
    /// Last request failed; message is user-facing
    Failed(String),
}

/// Leaderboard display state, owned separately from gameplay
#[derive(Debug, Clone, Default)]
pub struct LeaderboardView {
    entries: Vec<LeaderboardEntry>,
    page: usize,
    /// Bumped by every load and reset; older outcomes are stale
    generation: u64,
    pub status: ViewStatus,
}

impl LeaderboardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear entries and go back to the first page (on restart)
    ///
    /// Reports still in flight are invalidated.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.page = 0;
        self.generation += 1;
        self.status = ViewStatus::Hidden;
    }

    /// Mark a report as in flight and return its ticket for `apply`
    pub fn begin_loading(&mut self) -> u64 {
        self.generation += 1;
        self.status = ViewStatus::Loading;
        self.generation
    }

    /// Replace entries, ordered by score descending
    pub fn set_entries(&mut self, mut entries: Vec<LeaderboardEntry>) {
        // Stable sort keeps server order among equal scores
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries = entries;
        self.page = 0;
        self.status = ViewStatus::Ready;
    }

    /// Apply the outcome of the report holding `ticket`
    ///
    /// Outcomes from superseded tickets are dropped and `false` is
    /// returned. Entries are kept on failure.
    pub fn apply(
        &mut self,
        ticket: u64,
        outcome: Result<Vec<LeaderboardEntry>, ReportError>,
    ) -> bool {
        if ticket != self.generation {
            log::debug!("Dropping stale leaderboard report (ticket {})", ticket);
            return false;
        }
        match outcome {
            Ok(entries) => {
                log::info!("Leaderboard loaded ({} entries)", entries.len());
                self.set_entries(entries);
            }
            Err(e) => {
                log::warn!("Leaderboard request failed: {}", e);
                self.status = ViewStatus::Failed(e.to_string());
            }
        }
        true
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Zero-based current page
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.entries.len().div_ceil(PAGE_SIZE).max(1)
    }

    /// Entries on the current page with their 1-based rank
    pub fn page_entries(&self) -> impl Iterator<Item = (usize, &LeaderboardEntry)> {
        let start = self.page * PAGE_SIZE;
        self.entries
            .iter()
            .enumerate()
            .skip(start)
            .take(PAGE_SIZE)
            .map(|(i, e)| (i + 1, e))
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        (self.page + 1) * PAGE_SIZE < self.entries.len()
    }

    /// Returns false when already on the last page
    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Returns false when already on the first page
    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// 1-based rank of the best entry for this identifier
    pub fn rank_of(&self, identifier: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.identifier == identifier)
            .map(|i| i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn entries(n: usize) -> Vec<LeaderboardEntry> {
        (0..n)
            .map(|i| LeaderboardEntry {
                identifier: format!("kaspa:example{}", i),
                score: (n - i) as u64 * 10,
            })
            .collect()
    }

    /// Scripted reporter counting calls
    struct FakeReporter {
        response: Result<SubmitResponse, ReportError>,
        board: Vec<LeaderboardEntry>,
        submits: Cell<u32>,
        fetches: Cell<u32>,
    }

    impl FakeReporter {
        fn new(response: Result<SubmitResponse, ReportError>) -> Self {
            Self {
                response,
                board: entries(3),
                submits: Cell::new(0),
                fetches: Cell::new(0),
            }
        }
    }

    impl ScoreReporter for FakeReporter {
        async fn submit(
            &self,
            _submission: &ScoreSubmission,
        ) -> Result<SubmitResponse, ReportError> {
            self.submits.set(self.submits.get() + 1);
            self.response.clone()
        }

        async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ReportError> {
            self.fetches.set(self.fetches.get() + 1);
            Ok(self.board.clone())
        }
    }

    fn submission() -> ScoreSubmission {
        let id = Identifier::parse("kaspa:abc123").unwrap();
        ScoreSubmission::new(&id, 12)
    }

    #[test]
    fn test_submission_wire_format() {
        let json = serde_json::to_value(submission()).unwrap();
        assert_eq!(json, serde_json::json!({ "wallet_address": "kaspa:abc123", "score": 12 }));
    }

    #[test]
    fn test_parse_success_response() {
        let resp: SubmitResponse = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert_eq!(resp.status, SubmitStatus::Success);
        assert_eq!(resp.into_result(), Ok(None));
    }

    #[test]
    fn test_parse_error_response() {
        let resp: SubmitResponse =
            serde_json::from_str(r#"{"status":"error","message":"Invalid data"}"#).unwrap();
        assert_eq!(
            resp.into_result(),
            Err(ReportError::Rejected(Some("Invalid data".to_string())))
        );
    }

    #[test]
    fn test_unknown_status_is_rejection() {
        let resp: SubmitResponse = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert_eq!(resp.status, SubmitStatus::Unknown);
        assert!(resp.into_result().is_err());
    }

    #[test]
    fn test_parse_server_rows_with_extra_fields() {
        let json = r#"[
            {"id": 1, "wallet_address": "kaspa:a", "score": 500},
            {"id": 2, "wallet_address": "kaspa:b", "score": 450}
        ]"#;
        let rows: Vec<LeaderboardEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].identifier, "kaspa:a");
        assert_eq!(rows[1].score, 450);
    }

    #[test]
    fn test_report_uses_embedded_leaderboard() {
        let reporter = FakeReporter::new(Ok(SubmitResponse {
            status: SubmitStatus::Success,
            message: None,
            leaderboard: Some(entries(2)),
        }));
        let result = pollster::block_on(report_score(&reporter, &submission()));
        assert_eq!(result.unwrap().len(), 2);
        assert_eq!(reporter.submits.get(), 1);
        assert_eq!(reporter.fetches.get(), 0);
    }

    #[test]
    fn test_report_fetches_when_not_embedded() {
        let reporter = FakeReporter::new(Ok(SubmitResponse {
            status: SubmitStatus::Success,
            message: None,
            leaderboard: None,
        }));
        let result = pollster::block_on(report_score(&reporter, &submission()));
        assert_eq!(result.unwrap().len(), 3);
        assert_eq!(reporter.fetches.get(), 1);
    }

    #[test]
    fn test_report_error_is_not_retried() {
        let reporter = FakeReporter::new(Ok(SubmitResponse {
            status: SubmitStatus::Error,
            message: Some("x".to_string()),
            leaderboard: None,
        }));
        let result = pollster::block_on(report_score(&reporter, &submission()));
        assert_eq!(result, Err(ReportError::Rejected(Some("x".to_string()))));
        assert_eq!(reporter.submits.get(), 1);
        assert_eq!(reporter.fetches.get(), 0);
    }

    #[test]
    fn test_network_failure_surfaces_in_view() {
        let reporter = FakeReporter::new(Err(ReportError::Network("offline".to_string())));
        let mut view = LeaderboardView::new();
        view.set_entries(entries(2));
        let ticket = view.begin_loading();
        let outcome = pollster::block_on(report_score(&reporter, &submission()));
        assert!(view.apply(ticket, outcome));

        assert!(matches!(view.status, ViewStatus::Failed(ref msg) if msg.contains("offline")));
        // Previous entries survive a failure
        assert_eq!(view.entries().len(), 2);
    }

    #[test]
    fn test_rejected_submission_leaves_session_untouched() {
        use crate::sim::{GamePhase, GameState, TickInput, tick};

        let mut state = GameState::new(11, 800.0, 600.0);
        state.submit_identifier("kaspa:abc123").unwrap();
        state.start().unwrap();
        while state.phase == GamePhase::Playing {
            tick(&mut state, &TickInput::default());
        }
        let score = state.score;
        let submission = state.take_submission().unwrap();

        let reporter = FakeReporter::new(Ok(SubmitResponse {
            status: SubmitStatus::Error,
            message: Some("x".to_string()),
            leaderboard: None,
        }));
        let mut view = LeaderboardView::new();
        let ticket = view.begin_loading();
        let outcome = pollster::block_on(report_score(&reporter, &submission));
        view.apply(ticket, outcome);

        assert_eq!(view.status, ViewStatus::Failed("Error submitting score: x".to_string()));
        assert_eq!(state.score, score);
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.identifier().map(|i| i.as_str()), Some("kaspa:abc123"));
    }

    #[test]
    fn test_entries_sorted_descending() {
        let mut view = LeaderboardView::new();
        let entry = |identifier: &str, score| LeaderboardEntry {
            identifier: identifier.to_string(),
            score,
        };
        view.set_entries(vec![entry("kaspa:a", 1), entry("kaspa:b", 9), entry("kaspa:c", 5)]);
        let scores: Vec<u64> = view.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![9, 5, 1]);
        assert_eq!(view.rank_of("kaspa:c"), Some(2));
        assert_eq!(view.rank_of("kaspa:zzz"), None);
    }

    #[test]
    fn test_pagination() {
        let mut view = LeaderboardView::new();
        view.set_entries(entries(60));
        assert_eq!(view.page_count(), 3);
        assert!(!view.has_prev());
        assert!(view.has_next());
        assert_eq!(view.page_entries().count(), PAGE_SIZE);
        assert_eq!(view.page_entries().next().map(|(rank, _)| rank), Some(1));

        assert!(view.next_page());
        assert_eq!(view.page_entries().next().map(|(rank, _)| rank), Some(26));
        assert!(view.next_page());
        assert_eq!(view.page_entries().count(), 10);
        assert!(!view.has_next());
        assert!(!view.next_page());
        assert_eq!(view.page(), 2);

        assert!(view.prev_page());
        assert!(view.prev_page());
        assert!(!view.prev_page());
        assert_eq!(view.page(), 0);
    }

    #[test]
    fn test_exact_page_boundary() {
        let mut view = LeaderboardView::new();
        view.set_entries(entries(PAGE_SIZE));
        assert!(!view.has_next());
        assert_eq!(view.page_count(), 1);

        view.set_entries(Vec::new());
        assert_eq!(view.page_count(), 1);
        assert_eq!(view.page_entries().count(), 0);
        assert!(!view.has_next());
    }

    #[test]
    fn test_reset() {
        let mut view = LeaderboardView::new();
        view.set_entries(entries(30));
        view.next_page();
        view.reset();
        assert_eq!(view.page(), 0);
        assert!(view.entries().is_empty());
        assert_eq!(view.status, ViewStatus::Hidden);
    }

    #[test]
    fn test_late_report_after_reset_is_ignored() {
        use crate::sim::{GamePhase, GameState, TickInput, tick};

        let mut state = GameState::new(5, 800.0, 600.0);
        state.submit_identifier("kaspa:abc123").unwrap();
        state.start().unwrap();
        while state.phase == GamePhase::Playing {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.take_submission().is_some());

        let mut view = LeaderboardView::new();
        let ticket = view.begin_loading();

        // Play again before the first report resolves
        state.restart().unwrap();
        view.reset();

        assert!(!view.apply(ticket, Ok(entries(1))));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(view.status, ViewStatus::Hidden);
        assert!(view.entries().is_empty());
    }

    #[test]
    fn test_error_messages_are_self_contained() {
        let rejected = ReportError::Rejected(Some("x".to_string())).to_string();
        assert_eq!(rejected, "Error submitting score: x");
        assert_eq!(rejected.matches("Error submitting score").count(), 1);

        // Network failures also happen on the leaderboard fetch
        let network = ReportError::Network("offline".to_string()).to_string();
        assert_eq!(network, "Could not reach the leaderboard server: offline");
        assert!(!network.contains("submitting"));
    }

    #[test]
    fn test_only_latest_report_wins() {
        let mut view = LeaderboardView::new();
        let first = view.begin_loading();
        let second = view.begin_loading();

        assert!(view.apply(second, Ok(entries(2))));
        assert!(!view.apply(first, Err(ReportError::Network("late".to_string()))));
        assert_eq!(view.status, ViewStatus::Ready);
        assert_eq!(view.entries().len(), 2);
    }
}
