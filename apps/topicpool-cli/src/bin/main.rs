use std::env;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use topicpool_core::compile::QueryStringCompiler;
use topicpool_core::config::Config;
use topicpool_core::traits::QueryLog;
use topicpool_core::types::{QueryLogEntry, Topic};
use topicpool_elastic::ElasticClient;
use topicpool_search::{InMemoryQueryLog, SearchRequest, TopicSearchService};

const CLI_USER: i64 = 0;
const CLI_TOPIC: &str = "cli";

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() { usage(&prog); }
    let cmd = args.remove(0);
    (cmd, args)
}

fn usage(prog: &str) -> ! {
    eprintln!("Usage: {} pool \"<topic text>\" [query ...]", prog);
    eprintln!("       {} search \"<query>\" [seen-id ...]", prog);
    eprintln!("       {} get <doc-id>", prog);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let (cmd, args) = parse_args();

    let client = Arc::new(ElasticClient::from_settings(&settings.elastic));
    let log = Arc::new(InMemoryQueryLog::new());
    let service = TopicSearchService::new(client, Arc::new(QueryStringCompiler::new()), log.clone(), settings);
    info!(command = %cmd, "topicpool");

    let output = match cmd.as_str() {
        "pool" => {
            let Some((text, queries)) = args.split_first() else { usage("topicpool") };
            // topic pooling reads saved queries from the log
            for query in queries {
                log.record(QueryLogEntry {
                    topic_id: CLI_TOPIC.to_string(),
                    user_id: CLI_USER,
                    text: query.clone(),
                    submitted_at: Utc::now(),
                })
                .await?;
            }
            let topic = Topic { id: CLI_TOPIC.to_string(), text: text.clone(), ..Default::default() };
            serde_json::to_value(service.topic_pool(&topic, CLI_USER).await?)?
        }
        "search" => {
            let Some((query, seen)) = args.split_first() else { usage("topicpool") };
            let request = SearchRequest {
                query: query.clone(),
                topic_id: CLI_TOPIC.to_string(),
                fields: Vec::new(),
                seen_ids: seen.to_vec(),
            };
            serde_json::to_value(service.search(request, CLI_USER).await?)?
        }
        "get" => {
            let Some(id) = args.first() else { usage("topicpool") };
            serde_json::to_value(service.fetch_decision(id).await?)?
        }
        _ => { eprintln!("Unknown command: {}", cmd); std::process::exit(1); }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
