//! Interactive command-line surface.
//!
//! Free text submits a search-and-summarize run; slash commands adjust the
//! settings that the original sidebar exposed, export the current result,
//! or enter the drafter chat.

use crate::config::station::{Settings, Station, MAX_RESULTS, MIN_RESULTS};
use crate::drafter::{AgentEvent, DrafterAgent};
use crate::export;
use crate::llm::{ChatModel, ClientFactory};
use crate::loader::HttpFetcher;
use crate::pipeline::{Pipeline, PipelineEvent, RunConfig, RunStage, Session};
use crate::search::providers::BraveSearchProvider;
use crate::search::SearchProvider;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::sync::Arc;

pub async fn run() -> Result<()> {
    let config = crate::config::load_or_create_config()?;
    let _log_guard = crate::logging::init(&config)?;

    let mut station = config
        .default_station_config()
        .with_context(|| {
            format!(
                "default station '{}' not found in config",
                config.default_station
            )
        })?
        .clone();

    let factory = ClientFactory::new();
    let mut model = factory.get(&station)?;

    // Startup probe: an unreachable provider blocks any run.
    let available_models = model
        .list_models()
        .await
        .with_context(|| format!("model provider for station '{}' is unreachable", station.id))?;
    if !available_models.iter().any(|m| m == &station.model) {
        println!(
            "Warning: model '{}' is not in the provider's installed list.",
            station.model
        );
    }

    let search: Arc<dyn SearchProvider> = Arc::new(BraveSearchProvider::new());
    let fetcher = Arc::new(HttpFetcher::new());
    let mut pipeline = Arc::new(Pipeline::new(model.clone(), search.clone(), fetcher.clone()));

    let mut settings = config.settings.clone();
    let mut session = Session::new();

    print_banner(&station);

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        prompt("query> ");
        let Some(Ok(line)) = lines.next() else { break };
        let line = line.trim().to_string();

        if line.is_empty() {
            continue;
        }

        if line == "/q" {
            break;
        }

        if let Some(rest) = line.strip_prefix('/') {
            let mut parts = rest.splitn(2, ' ');
            let command = parts.next().unwrap_or_default();
            let arg = parts.next().unwrap_or_default().trim();

            match command {
                "help" => print_help(),
                "models" => match model.list_models().await {
                    Ok(models) => {
                        for m in models {
                            println!("  {m}");
                        }
                    }
                    Err(e) => println!("Failed to list models: {e}"),
                },
                "model" => {
                    let Some(next) = config.station(arg) else {
                        println!(
                            "Unknown station '{arg}'. Configured stations: {}",
                            config
                                .stations
                                .iter()
                                .map(|s| s.id.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        );
                        continue;
                    };
                    match factory.get(next) {
                        Ok(client) => {
                            station = next.clone();
                            model = client;
                            pipeline =
                                Arc::new(Pipeline::new(model.clone(), search.clone(), fetcher.clone()));
                            println!("Switched to station '{}' ({})", station.id, station.model);
                        }
                        Err(e) => println!("Failed to switch station: {e}"),
                    }
                }
                "results" => match arg.parse::<usize>() {
                    Ok(n) if (MIN_RESULTS..=MAX_RESULTS).contains(&n) => {
                        settings.num_results = n;
                        println!("Number of search results: {n}");
                    }
                    _ => println!("Expected a number between {MIN_RESULTS} and {MAX_RESULTS}"),
                },
                "optimize" => {
                    settings.optimize_query = !settings.optimize_query;
                    println!("Optimize search query with AI: {}", settings.optimize_query);
                }
                "unique" => {
                    settings.unique_results = !settings.unique_results;
                    println!("Return only unique results: {}", settings.unique_results);
                }
                "show" => match arg {
                    "urls" => toggle("Show retrieved URLs", &mut settings.show_urls),
                    "query" => toggle(
                        "Show optimized query",
                        &mut settings.show_optimized_query,
                    ),
                    "summaries" => toggle(
                        "Show individual summaries",
                        &mut settings.show_individual_summaries,
                    ),
                    "tokens" => toggle(
                        "Show token usage information",
                        &mut settings.show_token_info,
                    ),
                    _ => println!("Expected one of: urls, query, summaries, tokens"),
                },
                "export" => export_result(&session, arg),
                "last" => print_last_result(&session),
                "draft" => drafter_chat(model.clone(), &mut lines).await,
                _ => println!("Unknown command '/{command}'. Try /help."),
            }
            continue;
        }

        // A plain line is a query submission.
        run_query(&pipeline, &station, &settings, &mut session, &line).await;
    }

    Ok(())
}

async fn run_query(
    pipeline: &Arc<Pipeline>,
    station: &Station,
    settings: &Settings,
    session: &mut Session,
    query: &str,
) {
    session.begin(query);

    let config = RunConfig::new(station.clone(), settings);
    let mut rx = pipeline.start_run(query.to_string(), config.clone());

    while let Some(event) = rx.recv().await {
        match event {
            PipelineEvent::StageChanged(stage) => match stage {
                RunStage::Done | RunStage::FailedEmpty | RunStage::Idle => {}
                _ => println!("[{stage}...]"),
            },
            PipelineEvent::QueryOptimized {
                original,
                optimized,
                fell_back,
            } => {
                if fell_back {
                    println!("Failed to parse optimized query. Using original query instead.");
                } else if config.show_optimized_query {
                    println!("Original: '{original}'\nOptimized: '{optimized}'");
                }
            }
            PipelineEvent::SearchWarning(message) => {
                println!("Error searching the web: {message}");
            }
            PipelineEvent::UrlsRetrieved(urls) => {
                if config.show_urls {
                    println!("Retrieved URLs:");
                    for (i, url) in urls.iter().enumerate() {
                        println!("  {}. {url}", i + 1);
                    }
                }
            }
            PipelineEvent::PageLoading { url, index, total } => {
                println!("Loading {url} ({index}/{total})...");
            }
            PipelineEvent::PageLoaded { .. } => {}
            PipelineEvent::PageFailed { url, error } => {
                println!("Error loading {url}: {error}");
            }
            PipelineEvent::PageSummarized { url, index, total } => {
                println!("Summarized {url} ({index}/{total})");
            }
            PipelineEvent::SummaryFailed { url, error } => {
                println!("Error summarizing {url}: {error}");
            }
            PipelineEvent::RunCompleted(result) => {
                if config.show_individual_summaries {
                    println!("\nIndividual Webpage Summaries");
                    for (i, summary) in result.summaries.iter().enumerate() {
                        println!("\nSummary {}: {}", i + 1, summary.url);
                        println!("{}", summary.summary);
                        if config.show_token_info {
                            match summary.usage {
                                Some(usage) => println!("Tokens: {}", usage.total_tokens),
                                None => println!("Tokens: unknown"),
                            }
                        }
                    }
                }

                println!("\nFinal Consolidated Summary\n");
                println!("{}", result.final_summary.summary);

                if config.show_token_info {
                    let total: u32 = result.final_summary.tokens
                        + result
                            .summaries
                            .iter()
                            .filter_map(|s| s.usage.map(|u| u.total_tokens))
                            .sum::<u32>();
                    println!("\nTokens for final summary: {}", result.final_summary.tokens);
                    println!("Total tokens used: {total}");
                }

                session.store(result);
                println!("\nSearch and summarization completed. Use /export json or /export md to save.");
            }
            PipelineEvent::RunFailed { message, .. } => {
                println!("{message}");
            }
        }
    }
}

fn print_last_result(session: &Session) {
    let Some(result) = session.result() else {
        println!("No results stored yet. Run a query first.");
        return;
    };

    println!("Query: {}", result.query);
    if let Some(optimized) = &result.optimized_query {
        println!("Optimized: {optimized}");
    }
    println!("Sources: {}", result.urls.len());
    let preview = crate::text::truncate_text(
        &crate::text::clean_text_for_display(&result.final_summary.summary),
        200,
    );
    println!("Final summary: {preview}");
}

fn export_result(session: &Session, format: &str) {
    let Some(result) = session.result() else {
        println!("No results to export yet. Run a query first.");
        return;
    };

    let (filename, content) = match format {
        "json" => {
            let record = export::format_results_for_export(result);
            match export::to_json_string(&record) {
                Ok(json) => (export::generate_filename(&result.query, "json"), json),
                Err(e) => {
                    println!("Failed to serialize results: {e}");
                    return;
                }
            }
        }
        "md" => (
            export::generate_filename(&result.query, "md"),
            export::create_markdown_export(result),
        ),
        _ => {
            println!("Expected /export json or /export md");
            return;
        }
    };

    match std::fs::write(&filename, content) {
        Ok(()) => println!("Exported results to {filename}"),
        Err(e) => println!("Failed to write {filename}: {e}"),
    }
}

/// Drafter chat loop: type "/q" to return to search mode.
async fn drafter_chat(
    model: Arc<dyn ChatModel>,
    lines: &mut std::io::Lines<std::io::StdinLock<'_>>,
) {
    println!("Drafter mode: collaborate on a document; saving needs your explicit instruction.");
    println!("Type /q to return to search mode.");

    let agent = DrafterAgent::new(model);

    loop {
        prompt("Ask Anything: ");
        let Some(Ok(line)) = lines.next() else { break };
        let line = line.trim().to_string();

        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("/q") {
            break;
        }

        let mut rx = agent.start_turn(line);
        while let Some(event) = rx.recv().await {
            match event {
                AgentEvent::AssistantMessage(text) => println!("Assistant: {text}"),
                AgentEvent::ToolUse { name } => println!("[using tool: {name}]"),
                AgentEvent::ToolResult {
                    tool_name,
                    is_error,
                    ..
                } => {
                    if is_error {
                        println!("[tool {tool_name} failed]");
                    } else {
                        println!("[tool {tool_name} finished]");
                    }
                }
                AgentEvent::Error(message) => println!("Error: {message}"),
                AgentEvent::TurnComplete => {}
            }
        }
    }
}

fn print_banner(station: &Station) {
    println!("Web Summarizer");
    println!("Station: {} ({})", station.name, station.model);
    println!(
        "Enter a search query to summarize the web, or /help for commands.\n\
         It works by:\n\
         1. Taking your query and optionally optimizing it for search\n\
         2. Searching the web for relevant pages\n\
         3. Summarizing each page individually\n\
         4. Creating a consolidated summary of all findings\n"
    );
}

fn print_help() {
    println!(
        "Commands:\n\
           <free text>        run a search-and-summarize query\n\
           /model <id>        switch to a configured station\n\
           /models            list models installed at the provider\n\
           /results <1-10>    number of search results\n\
           /optimize          toggle AI query optimization\n\
           /unique            toggle duplicate URL suppression\n\
           /show <urls|query|summaries|tokens>  toggle display options\n\
           /export <json|md>  export the last result\n\
           /last              short preview of the last result\n\
           /draft             enter document drafter chat (/q to leave)\n\
           /q                 quit"
    );
}

fn toggle(label: &str, value: &mut bool) {
    *value = !*value;
    println!("{label}: {value}");
}

fn prompt(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}
