//! Ask the offline assistant one question about a collection file and print the reply.
//! Usage:
//!   cargo run --bin ask -- <collection.json> <utterance...>
//!   cargo run --bin ask -- --search <query...>
//! The collection file is a JSON array of records
//! (`id`, `title`, `genre`, `year`, `watched`, optional `rating`, `in_theaters`).
//! Set CINEFINDER_SEED (.env supported) for repeatable canned replies.

use anyhow::{Context, Result};
use cinefinder::assistant::{Assistant, RandomPicker, Session};
use cinefinder::models::CollectionRecord;
use dotenvy::dotenv;
use std::env;
use std::fs;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn usage() -> ! {
    eprintln!("Usage: cargo run --bin ask -- <collection.json> <utterance...>");
    eprintln!("       cargo run --bin ask -- --search <query...>");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    init_tracing();

    let mut args = env::args().skip(1);
    let path = args.next().unwrap_or_else(|| usage());
    if path == "--search" {
        let query = args.collect::<Vec<_>>().join(" ");
        if query.trim().is_empty() {
            usage();
        }
        let results = Assistant::offline().search(&query).await;
        println!("{}", results.render());
        return Ok(());
    }
    let utterance = args.collect::<Vec<_>>().join(" ");
    if utterance.trim().is_empty() {
        usage();
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
    let collection: Vec<CollectionRecord> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path))?;

    let picker = match env::var("CINEFINDER_SEED").ok() {
        Some(seed) => RandomPicker::seeded(seed.parse::<u64>().context("CINEFINDER_SEED must be a u64")?),
        None => RandomPicker::from_entropy(),
    };
    let mut session = Session::with_picker(Box::new(picker));

    let reply = Assistant::offline()
        .generate_response(&mut session, &utterance, &collection)
        .await;
    println!("{reply}");

    let genres = session.profile().favorite_genres();
    if !genres.is_empty() {
        println!("\n[favorite genres: {}]", genres.join(", "));
    }
    Ok(())
}
