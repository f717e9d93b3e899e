//! Demo that scores the bundled headlines for one region and prints each story's coverage.
//!
//! Usage: `cargo run --bin coverage-demo -- UK`

use blindspot_analyzer::{config::AnalyzerConfig, BlindspotService, SourceRegistry};
use blindspot_analyzer::ingest::demo::DemoHeadlines;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = AnalyzerConfig::load_default()?;
    let region = std::env::args()
        .nth(1)
        .map(|r| r.trim().to_ascii_uppercase())
        .unwrap_or_else(|| cfg.default_region.clone());

    let svc = BlindspotService::new(cfg, SourceRegistry::load_default(), vec![Box::new(DemoHeadlines)]);
    let stories = svc.coverage(&region).await;

    if stories.is_empty() {
        println!("{region}: no significant stories");
    }
    for (i, a) in stories.iter().enumerate() {
        println!(
            "{:>2}. {} [L{} C{} R{}] {}",
            i + 1,
            a.story.title,
            a.left_sources,
            a.center_sources,
            a.right_sources,
            a.blindspot.map(|b| b.message()).unwrap_or("-"),
        );
    }

    println!("coverage-demo done");
    Ok(())
}
