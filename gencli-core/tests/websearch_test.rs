mod common;

use common::ScriptedModel;
use gencli_core::config::Language;
use gencli_core::llm::LLMError;
use gencli_core::websearch::{SearchOptions, WebSearchOrchestrator};
use serde_json::json;

fn long_result(topic: &str) -> String {
    format!("{topic}: {}", "detailed findings ".repeat(40))
}

#[tokio::test]
async fn rich_results_skip_follow_up_searches() {
    let model = ScriptedModel::new();
    model
        .reply(json!({"queries": ["rust async 2024", "tokio release notes"], "rationale": "two angles"}).to_string())
        .reply_with_sources(long_result("async"), &[("https://a.example", "A"), ("https://b.example", "B")])
        .reply_with_sources(long_result("tokio"), &[("https://a.example", "A dup")])
        .reply("Final answer [1][2]");

    let answer = WebSearchOrchestrator::new(model.as_ref(), "gemini-2.0-flash", Language::En)
        .search("What changed in async Rust?")
        .await
        .expect("search");

    assert_eq!(answer.answer, "Final answer [1][2]");
    assert_eq!(answer.search_queries, vec!["rust async 2024", "tokio release notes"]);
    let urls: Vec<&str> = answer.sources.iter().map(|s| s.url.as_str()).collect();
    assert_eq!(urls, vec!["https://a.example", "https://b.example"]);

    let requests = model.requests();
    assert_eq!(requests.len(), 4);
    assert!(requests[0].response_schema.is_some());
    assert!(requests[1].google_search && requests[2].google_search);
    assert!(!requests[3].google_search);
    assert_eq!(model.remaining(), 0);
}

#[tokio::test]
async fn thin_results_trigger_one_follow_up_round() {
    let model = ScriptedModel::new();
    model
        .reply(json!({"queries": ["q1"], "rationale": "-"}).to_string())
        .reply("tiny")
        .reply(long_result("details"))
        .fail(LLMError::Network("connection reset".into()))
        .reply("answer");

    let answer = WebSearchOrchestrator::new(model.as_ref(), "gemini-2.0-flash", Language::Ko)
        .with_options(SearchOptions {
            max_rounds: 1,
            initial_query_count: 1,
        })
        .search("tauri")
        .await
        .expect("search");

    assert_eq!(answer.answer, "answer");
    assert_eq!(answer.search_queries, vec!["q1", "tauri details", "tauri guide"]);
    assert!(model.requests()[4].message.contains("details: detailed findings"));
}

#[tokio::test]
async fn zero_rounds_answer_from_the_initial_searches() {
    let model = ScriptedModel::new();
    model
        .reply(json!({"queries": ["q1"], "rationale": "-"}).to_string())
        .reply("tiny")
        .reply("answer");

    let answer = WebSearchOrchestrator::new(model.as_ref(), "gemini-2.0-flash", Language::En)
        .with_options(SearchOptions {
            max_rounds: 0,
            initial_query_count: 1,
        })
        .search("tauri")
        .await
        .expect("search");

    assert_eq!(answer.answer, "answer");
    assert_eq!(answer.search_queries, vec!["q1"]);
    assert_eq!(model.requests().len(), 3);
    assert_eq!(model.remaining(), 0);
}

#[tokio::test]
async fn unusable_query_plan_searches_the_question() {
    let model = ScriptedModel::new();
    model
        .reply("not json")
        .reply(long_result("direct"))
        .reply("answer");

    let answer = WebSearchOrchestrator::new(model.as_ref(), "gemini-2.0-flash", Language::En)
        .search("latest serde version")
        .await
        .expect("search");

    assert_eq!(answer.search_queries, vec!["latest serde version"]);
    assert!(answer.sources.is_empty());
}

#[tokio::test]
async fn synthesis_failure_is_an_error() {
    let model = ScriptedModel::new();
    model
        .reply(json!({"queries": ["q"], "rationale": "-"}).to_string())
        .reply(long_result("q"))
        .fail(LLMError::Timeout(30));

    let result = WebSearchOrchestrator::new(model.as_ref(), "gemini-2.0-flash", Language::En)
        .search("q")
        .await;

    assert!(result.is_err());
}
