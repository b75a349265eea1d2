//! Search-augmented answers.
//!
//! A question is expanded into a few search queries, each query is answered
//! with the Google Search tool, thin results trigger follow-up searches, and
//! a final call synthesizes one answer from everything collected.

use crate::config::Language;
use crate::config::constants::temperature;
use crate::error::Result;
use crate::llm::{LanguageModel, ModelRequest, SearchSource};
use crate::prompts::search_synthesis_instruction;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Collected text below this many characters counts as insufficient.
pub const MIN_RESULT_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Reflection rounds after the initial searches
    pub max_rounds: usize,
    pub initial_query_count: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_rounds: 1,
            initial_query_count: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSearchAnswer {
    pub answer: String,
    pub sources: Vec<SearchSource>,
    /// Every query that was sent to search, in order
    pub search_queries: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct QueryPlan {
    #[serde(default)]
    queries: Vec<String>,
}

struct SearchHit {
    content: String,
    sources: Vec<SearchSource>,
}

/// Runs the query, search, reflect and synthesize loop against one model.
pub struct WebSearchOrchestrator<'a> {
    model: &'a dyn LanguageModel,
    model_name: String,
    language: Language,
    options: SearchOptions,
}

impl<'a> WebSearchOrchestrator<'a> {
    pub fn new(model: &'a dyn LanguageModel, model_name: impl Into<String>, language: Language) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            language,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn search(&self, question: &str) -> Result<WebSearchAnswer> {
        let initial = self.generate_queries(question).await;
        let mut executed = Vec::new();
        let mut results = Vec::new();
        let mut sources = Vec::new();

        for query in &initial {
            self.run_query(query, &mut executed, &mut results, &mut sources).await;
        }

        for round in 0..self.options.max_rounds {
            let follow_ups = reflect(question, &results);
            if follow_ups.is_empty() {
                debug!(round, "search results are sufficient");
                break;
            }
            info!(round, "search results are thin, running follow-up queries");
            for query in &follow_ups {
                self.run_query(query, &mut executed, &mut results, &mut sources).await;
            }
        }

        let answer = self.synthesize(question, &results).await?;
        Ok(WebSearchAnswer {
            answer,
            sources: deduplicate_sources(sources),
            search_queries: executed,
        })
    }

    async fn generate_queries(&self, question: &str) -> Vec<String> {
        let count = self.options.initial_query_count.max(1);
        let message = format!(
            "Generate {count} diverse web search queries for: \"{question}\"\n\
             Date: {}\n\n\
             Cover different aspects, use search-friendly terms, and mix Korean and English when useful.",
            today()
        );
        let request = ModelRequest::new(&self.model_name, "", message)
            .with_temperature(temperature::CREATIVE)
            .with_schema(query_plan_schema());

        let planned = match self.model.generate(request).await {
            Ok(response) => serde_json::from_str::<QueryPlan>(&response.text)
                .map(|plan| plan.queries)
                .unwrap_or_else(|err| {
                    warn!(error = %err, "query plan was not valid JSON, searching the question as-is");
                    Vec::new()
                }),
            Err(err) => {
                warn!(error = %err, "query generation failed, searching the question as-is");
                Vec::new()
            }
        };

        let queries: Vec<String> = planned
            .into_iter()
            .map(|query| query.trim().to_string())
            .filter(|query| !query.is_empty())
            .take(count)
            .collect();
        if queries.is_empty() {
            vec![question.to_string()]
        } else {
            queries
        }
    }

    async fn run_query(
        &self,
        query: &str,
        executed: &mut Vec<String>,
        results: &mut Vec<String>,
        sources: &mut Vec<SearchSource>,
    ) {
        executed.push(query.to_string());
        if let Some(hit) = self.perform_search(query).await {
            results.push(hit.content);
            sources.extend(hit.sources);
        }
    }

    async fn perform_search(&self, query: &str) -> Option<SearchHit> {
        let message = format!(
            "Search for and summarize current information about: {query}\n\
             Date: {}\n\n\
             Prefer reliable sources, concrete facts and data, and attribute claims clearly.",
            today()
        );
        let request = ModelRequest::new(&self.model_name, "", message)
            .with_temperature(temperature::PRECISE)
            .with_google_search();

        match self.model.generate(request).await {
            Ok(response) => Some(SearchHit {
                content: response.text,
                sources: response.sources,
            }),
            Err(err) => {
                warn!(query, error = %err, "search query failed, skipping it");
                None
            }
        }
    }

    async fn synthesize(&self, question: &str, results: &[String]) -> Result<String> {
        let collected = if results.is_empty() {
            "(no search results)".to_string()
        } else {
            results.join("\n---\n")
        };
        let message = format!("Question: {question}\n\nSearch results:\n{collected}");
        let request = ModelRequest::new(
            &self.model_name,
            search_synthesis_instruction(self.language),
            message,
        )
        .with_temperature(temperature::PRECISE);

        let response = self.model.generate(request).await?;
        Ok(response.text)
    }
}

/// Follow-up queries when the collected text is too thin, otherwise none.
fn reflect(question: &str, results: &[String]) -> Vec<String> {
    let total: usize = results.iter().map(|result| result.chars().count()).sum();
    if total < MIN_RESULT_CHARS {
        vec![format!("{question} details"), format!("{question} guide")]
    } else {
        Vec::new()
    }
}

/// Keep the first source seen for each URL, dropping sources without one.
pub fn deduplicate_sources(sources: Vec<SearchSource>) -> Vec<SearchSource> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|source| !source.url.is_empty())
        .filter(|source| seen.insert(source.url.clone()))
        .map(|mut source| {
            if source.title.trim().is_empty() {
                source.title = "Unknown Title".to_string();
            }
            source
        })
        .collect()
}

fn query_plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "queries": {"type": "ARRAY", "items": {"type": "STRING"}},
            "rationale": {"type": "STRING"}
        },
        "required": ["queries", "rationale"]
    })
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}
