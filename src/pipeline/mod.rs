//! The search-and-summarize pipeline.
//!
//! A single submission flows through: optimize (optional) → search → load →
//! summarize each page → combine. Stages run strictly one after another;
//! every external call is awaited before the next begins.

pub mod optimizer;
pub mod prompts;
pub mod summarize;

use crate::config::station::{Settings, Station};
use crate::llm::cleanup::ResponseCleanup;
use crate::llm::ChatModel;
use crate::loader::{PageDocument, PageFetcher};
use crate::search::{validate_urls, SearchOptions, SearchProvider};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

pub use summarize::{FinalSummary, PageSummary};

/// Stage of a submitted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Idle,
    Optimizing,
    Searching,
    Loading,
    SummarizingPages,
    Combining,
    Done,
    FailedEmpty,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::Idle => "idle",
            RunStage::Optimizing => "optimizing query",
            RunStage::Searching => "searching",
            RunStage::Loading => "loading pages",
            RunStage::SummarizingPages => "summarizing pages",
            RunStage::Combining => "combining summaries",
            RunStage::Done => "done",
            RunStage::FailedEmpty => "failed",
        };
        f.write_str(name)
    }
}

/// Everything one run needs, owned and passed in explicitly.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub station: Station,
    pub optimize_query: bool,
    pub num_results: usize,
    pub unique_results: bool,
    pub show_urls: bool,
    pub show_optimized_query: bool,
    pub show_individual_summaries: bool,
    pub show_token_info: bool,
}

impl RunConfig {
    pub fn new(station: Station, settings: &Settings) -> Self {
        Self {
            station,
            optimize_query: settings.optimize_query,
            num_results: settings.num_results,
            unique_results: settings.unique_results,
            show_urls: settings.show_urls,
            show_optimized_query: settings.show_optimized_query,
            show_individual_summaries: settings.show_individual_summaries,
            show_token_info: settings.show_token_info,
        }
    }
}

/// The full record of one search-and-summarize submission.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub query: String,
    pub optimized_query: Option<String>,
    pub urls: Vec<String>,
    pub summaries: Vec<PageSummary>,
    pub final_summary: FinalSummary,
}

/// Progress and outcome events, emitted for UI consumption.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    StageChanged(RunStage),
    QueryOptimized {
        original: String,
        optimized: String,
        fell_back: bool,
    },
    /// Search provider failure surfaced as a warning; the run continues to
    /// the empty-result check.
    SearchWarning(String),
    UrlsRetrieved(Vec<String>),
    PageLoading {
        url: String,
        index: usize,
        total: usize,
    },
    PageLoaded {
        url: String,
        segments: usize,
    },
    PageFailed {
        url: String,
        error: String,
    },
    PageSummarized {
        url: String,
        index: usize,
        total: usize,
    },
    SummaryFailed {
        url: String,
        error: String,
    },
    RunCompleted(RunResult),
    RunFailed {
        stage: RunStage,
        message: String,
    },
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(RunResult),
    /// A stage produced zero usable items; remaining stages were skipped
    /// and no result is kept.
    Empty { stage: RunStage, message: String },
}

/// Pipeline orchestrator: sequences the stages and emits `PipelineEvent`s.
///
/// This is UI-agnostic: any frontend (CLI/TUI/daemon) can consume the events.
pub struct Pipeline {
    model: Arc<dyn ChatModel>,
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn PageFetcher>,
    cleanup: ResponseCleanup,
}

impl Pipeline {
    pub fn new(
        model: Arc<dyn ChatModel>,
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        Self {
            model,
            search,
            fetcher,
            cleanup: ResponseCleanup::default(),
        }
    }

    /// Submit a query and run the pipeline in the background.
    ///
    /// Returns a receiver of `PipelineEvent`s; the final event is either
    /// `RunCompleted` or `RunFailed`.
    pub fn start_run(
        self: &Arc<Self>,
        query: String,
        config: RunConfig,
    ) -> mpsc::UnboundedReceiver<PipelineEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let pipeline = self.clone();

        tokio::spawn(async move {
            pipeline.run(&query, &config, &tx).await;
        });

        rx
    }

    /// Run the pipeline to completion, emitting events along the way.
    pub async fn run(
        &self,
        query: &str,
        config: &RunConfig,
        events: &mpsc::UnboundedSender<PipelineEvent>,
    ) -> RunOutcome {
        tracing::info!(query = %query, num_results = config.num_results, "pipeline run started");

        // Optimize the query if enabled; failures keep the original query.
        let mut optimized_query = None;
        let search_query = if config.optimize_query {
            let _ = events.send(PipelineEvent::StageChanged(RunStage::Optimizing));
            let optimized = optimizer::optimize_query(
                self.model.as_ref(),
                &config.station.model,
                &self.cleanup,
                query,
            )
            .await;
            let _ = events.send(PipelineEvent::QueryOptimized {
                original: query.to_string(),
                optimized: optimized.query.clone(),
                fell_back: optimized.fell_back,
            });
            optimized_query = Some(optimized.query.clone());
            optimized.query
        } else {
            query.to_string()
        };

        // Search; provider errors become a warning plus an empty result.
        let _ = events.send(PipelineEvent::StageChanged(RunStage::Searching));
        let options = SearchOptions::new(config.num_results, config.unique_results);
        let urls = match self.search.search(&search_query, &options).await {
            Ok(urls) => validate_urls(&urls),
            Err(e) => {
                tracing::warn!(error = %e, "search failed");
                let _ = events.send(PipelineEvent::SearchWarning(e.to_string()));
                Vec::new()
            }
        };

        if urls.is_empty() {
            return self.fail_empty(
                events,
                RunStage::Searching,
                "No search results found. Please try a different query.",
            );
        }
        let _ = events.send(PipelineEvent::UrlsRetrieved(urls.clone()));

        // Load pages one at a time; a failed page is skipped, not fatal.
        let _ = events.send(PipelineEvent::StageChanged(RunStage::Loading));
        let mut pages: Vec<PageDocument> = Vec::new();
        let total = urls.len();
        for (i, url) in urls.iter().enumerate() {
            let _ = events.send(PipelineEvent::PageLoading {
                url: url.clone(),
                index: i + 1,
                total,
            });

            match self.fetcher.fetch(url).await {
                Ok(segments) => {
                    let page = PageDocument {
                        url: url.clone(),
                        segments,
                    };
                    if page.has_content() {
                        let _ = events.send(PipelineEvent::PageLoaded {
                            url: url.clone(),
                            segments: page.segments.len(),
                        });
                        pages.push(page);
                    } else {
                        tracing::warn!(url = %url, "page loaded but contains no usable text");
                        let _ = events.send(PipelineEvent::PageFailed {
                            url: url.clone(),
                            error: "no text content".to_string(),
                        });
                    }
                }
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "failed to load page");
                    let _ = events.send(PipelineEvent::PageFailed {
                        url: url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if pages.is_empty() {
            return self.fail_empty(
                events,
                RunStage::Loading,
                "Failed to load any of the search results.",
            );
        }

        // Summarize each page sequentially; a failed call gets a placeholder.
        let _ = events.send(PipelineEvent::StageChanged(RunStage::SummarizingPages));
        let mut summaries: Vec<PageSummary> = Vec::new();
        let total = pages.len();
        for (i, page) in pages.iter().enumerate() {
            match summarize::summarize_page(self.model.as_ref(), query, page).await {
                Ok(summary) => {
                    let _ = events.send(PipelineEvent::PageSummarized {
                        url: page.url.clone(),
                        index: i + 1,
                        total,
                    });
                    summaries.push(summary);
                }
                Err(e) => {
                    tracing::warn!(url = %page.url, error = %e, "page summarization failed");
                    let _ = events.send(PipelineEvent::SummaryFailed {
                        url: page.url.clone(),
                        error: e.to_string(),
                    });
                    summaries.push(PageSummary {
                        url: page.url.clone(),
                        summary: summarize::SUMMARY_ERROR_PLACEHOLDER.to_string(),
                        usage: None,
                    });
                }
            }
        }

        // Combine into the final answer/summary.
        let _ = events.send(PipelineEvent::StageChanged(RunStage::Combining));
        let final_summary =
            summarize::combine_summaries(self.model.as_ref(), query, &summaries).await;

        let result = RunResult {
            query: query.to_string(),
            optimized_query,
            urls,
            summaries,
            final_summary,
        };

        let _ = events.send(PipelineEvent::StageChanged(RunStage::Done));
        let _ = events.send(PipelineEvent::RunCompleted(result.clone()));
        tracing::info!(
            urls = result.urls.len(),
            summaries = result.summaries.len(),
            "pipeline run completed"
        );

        RunOutcome::Completed(result)
    }

    fn fail_empty(
        &self,
        events: &mpsc::UnboundedSender<PipelineEvent>,
        stage: RunStage,
        message: &str,
    ) -> RunOutcome {
        tracing::warn!(stage = %stage, message = %message, "pipeline run ended empty");
        let _ = events.send(PipelineEvent::StageChanged(RunStage::FailedEmpty));
        let _ = events.send(PipelineEvent::RunFailed {
            stage,
            message: message.to_string(),
        });
        RunOutcome::Empty {
            stage,
            message: message.to_string(),
        }
    }
}

/// Per-session result store.
///
/// Holds the most recent completed run; replaced wholesale on each new
/// submission, and cleared when the query text changes.
#[derive(Debug, Default)]
pub struct Session {
    last_query: Option<String>,
    result: Option<RunResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new submission, dropping the stored result if the query
    /// text changed.
    pub fn begin(&mut self, query: &str) {
        if self.last_query.as_deref() != Some(query) {
            self.result = None;
        }
        self.last_query = Some(query.to_string());
    }

    pub fn store(&mut self, result: RunResult) {
        self.result = Some(result);
    }

    pub fn result(&self) -> Option<&RunResult> {
        self.result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_result(query: &str) -> RunResult {
        RunResult {
            query: query.to_string(),
            optimized_query: None,
            urls: vec!["https://a.com".to_string()],
            summaries: Vec::new(),
            final_summary: FinalSummary {
                summary: "s".to_string(),
                tokens: 0,
            },
        }
    }

    #[test]
    fn test_session_keeps_result_for_same_query() {
        let mut session = Session::new();
        session.begin("q1");
        session.store(dummy_result("q1"));
        session.begin("q1");
        assert!(session.result().is_some());
    }

    #[test]
    fn test_session_clears_result_when_query_changes() {
        let mut session = Session::new();
        session.begin("q1");
        session.store(dummy_result("q1"));
        session.begin("q2");
        assert!(session.result().is_none());
    }
}
