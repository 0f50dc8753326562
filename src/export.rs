//! Export of a completed run as JSON or Markdown.

use crate::pipeline::RunResult;
use serde::{Deserialize, Serialize};

pub const TOOL_NAME: &str = "WebSummarizerTool";

/// The JSON export shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRecord {
    pub metadata: ExportMetadata,
    pub search_info: SearchInfo,
    pub urls: Vec<String>,
    pub individual_summaries: Vec<SummaryEntry>,
    pub final_summary: String,
    pub statistics: Statistics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub export_timestamp: i64,
    pub export_date: String,
    pub tool_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchInfo {
    pub original_query: String,
    pub optimized_query: String,
    pub urls_found: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub url: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
    pub total_sources: usize,
    pub final_summary_length: usize,
}

/// Build the export record for a completed run.
pub fn format_results_for_export(result: &RunResult) -> ExportRecord {
    let now = chrono::Local::now();

    ExportRecord {
        metadata: ExportMetadata {
            export_timestamp: now.timestamp(),
            export_date: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            tool_name: TOOL_NAME.to_string(),
        },
        search_info: SearchInfo {
            original_query: result.query.clone(),
            optimized_query: result.optimized_query.clone().unwrap_or_default(),
            urls_found: result.urls.len(),
        },
        urls: result.urls.clone(),
        individual_summaries: result
            .summaries
            .iter()
            .map(|s| SummaryEntry {
                url: s.url.clone(),
                summary: s.summary.clone(),
            })
            .collect(),
        final_summary: result.final_summary.summary.clone(),
        statistics: Statistics {
            total_sources: result.summaries.len(),
            final_summary_length: result.final_summary.summary.len(),
        },
    }
}

/// Pretty-printed JSON for the export record.
pub fn to_json_string(record: &ExportRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(record)
}

/// Markdown rendering of a completed run, fixed section order.
pub fn create_markdown_export(result: &RunResult) -> String {
    let date = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

    let mut md = format!(
        "# Web Search Summary Report\n\n\
         **Generated:** {date}\n\
         **Tool:** {TOOL_NAME}\n\n\
         ## Search Query\n\
         **Original Query:** {}\n\
         **Optimized Query:** {}\n\n\
         ## Sources Found\n",
        result.query,
        result
            .optimized_query
            .as_deref()
            .unwrap_or("Same as original"),
    );

    for (i, url) in result.urls.iter().enumerate() {
        md.push_str(&format!("{}. [{url}]({url})\n", i + 1));
    }

    md.push_str("\n## Individual Summaries\n\n");
    for (i, summary) in result.summaries.iter().enumerate() {
        md.push_str(&format!(
            "### Source {}: {}\n\n{}\n\n",
            i + 1,
            summary.url,
            summary.summary
        ));
    }

    md.push_str("## Final Consolidated Summary\n\n");
    md.push_str(&result.final_summary.summary);

    md
}

/// Build an export filename from the query.
///
/// Keeps alphanumerics, spaces, hyphens and underscores from the query,
/// replaces spaces with underscores and caps the query segment at 50 chars.
pub fn generate_filename(query: &str, file_type: &str) -> String {
    let clean: String = query
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .collect();
    let clean: String = clean.trim_end().replace(' ', "_").chars().take(50).collect();

    let timestamp = chrono::Utc::now().timestamp();
    format!("websummarizer_{clean}_{timestamp}.{file_type}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{FinalSummary, PageSummary};

    fn sample_result() -> RunResult {
        RunResult {
            query: "test query".to_string(),
            optimized_query: Some("optimized test query".to_string()),
            urls: vec!["http://example.com".to_string()],
            summaries: vec![PageSummary {
                url: "http://example.com".to_string(),
                summary: "test summary".to_string(),
                usage: None,
            }],
            final_summary: FinalSummary {
                summary: "final summary".to_string(),
                tokens: 42,
            },
        }
    }

    #[test]
    fn test_format_results_for_export() {
        let record = format_results_for_export(&sample_result());
        assert_eq!(record.metadata.tool_name, "WebSummarizerTool");
        assert_eq!(record.search_info.original_query, "test query");
        assert_eq!(record.search_info.urls_found, 1);
        assert_eq!(record.statistics.total_sources, 1);
        assert_eq!(record.statistics.final_summary_length, "final summary".len());
    }

    #[test]
    fn test_json_round_trip() {
        let result = sample_result();
        let json = to_json_string(&format_results_for_export(&result)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            parsed["search_info"]["original_query"],
            serde_json::json!(result.query)
        );
        assert_eq!(
            parsed["search_info"]["urls_found"],
            serde_json::json!(result.urls.len())
        );
    }

    #[test]
    fn test_generate_filename() {
        let filename = generate_filename("What is machine learning?", "json");
        assert!(filename.starts_with("websummarizer_"));
        assert!(filename.ends_with(".json"));
        assert!(filename.to_lowercase().contains("machine"));

        // Query segment is capped at 50 chars.
        let long = generate_filename(&"a".repeat(200), "md");
        let segment = long
            .strip_prefix("websummarizer_")
            .and_then(|rest| rest.rsplit_once('_'))
            .map(|(seg, _)| seg)
            .unwrap();
        assert!(segment.chars().count() <= 50);
    }

    #[test]
    fn test_filename_sanitization() {
        let filename = generate_filename("hello? world/\\:*", "json");
        let segment = filename
            .strip_prefix("websummarizer_")
            .and_then(|rest| rest.rsplit_once('_'))
            .map(|(seg, _)| seg)
            .unwrap();
        assert_eq!(segment, "hello_world");
    }

    #[test]
    fn test_markdown_export_section_order() {
        let md = create_markdown_export(&sample_result());

        let header = md.find("# Web Search Summary Report").unwrap();
        let query = md.find("test query").unwrap();
        let url = md.find("http://example.com").unwrap();
        let final_summary = md.find("final summary").unwrap();

        assert!(header < query);
        assert!(query < url);
        assert!(url < final_summary);
    }

    #[test]
    fn test_markdown_export_without_optimized_query() {
        let mut result = sample_result();
        result.optimized_query = None;
        let md = create_markdown_export(&result);
        assert!(md.contains("**Optimized Query:** Same as original"));
    }
}
