use anyhow::{Context, Result};
use simplesearch::{config::Config, query::QueryDispatcher, types::ResponseEnvelope};
use tracing::info;

/// Output format for one-shot searches
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub async fn search_once(
    config: Config,
    query: String,
    limit: Option<i64>,
    ranking: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    info!("Searching for: {}", query);

    let dispatcher = QueryDispatcher::from_config(&config)
        .context("Failed to initialize search dispatcher")?;

    let envelope = dispatcher
        .search(&query, limit, ranking.as_deref())
        .await
        .with_context(|| format!("Search for '{}' failed", query.trim()))?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&envelope)
                .context("Failed to serialize results")?;
            println!("{}", json);
        }
        OutputFormat::Text => print_text(&envelope),
    }
    Ok(())
}

fn print_text(envelope: &ResponseEnvelope) {
    println!(
        "\nSearch Results ({} of {} available, profile {}, {:.1}ms):\n",
        envelope.returned, envelope.total_available, envelope.ranking_profile, envelope.latency_ms
    );
    if envelope.ranking_profile.is_degraded() {
        println!(
            "Note: fusion degraded ({})\n",
            envelope.fallback_reason.as_deref().unwrap_or("one leg failed")
        );
    }

    for (i, hit) in envelope.hits.iter().enumerate() {
        println!(
            "{}. [Score: {:.4}] {}",
            i + 1,
            hit.relevance,
            hit.id.as_deref().unwrap_or(&hit.document_id)
        );
        if let Some(url) = &hit.url {
            println!("   URL: {}", url);
        }
        if !hit.snippet.is_empty() {
            println!("   {}", hit.snippet);
        }
        let sources: Vec<&str> = hit.matched_by.iter().map(|s| s.as_str()).collect();
        println!("   Matched by: {}", sources.join(", "));
        println!();
    }
}
