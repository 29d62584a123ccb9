use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings,
    view::{ErrorBanner, IngestionView, SearchView},
    HttpTransport, IngestionController, QueryController, Settings, Submission, Transport,
};
use shared::domain::DEFAULT_TOP_K;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Search the document index or register a new document")]
struct Args {
    /// Backend base URL; overrides nextsearch.toml and the environment.
    #[arg(long, global = true)]
    api_base: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a ranked search.
    Search {
        #[arg(required = true)]
        query: Vec<String>,
        #[arg(short, long, default_value_t = DEFAULT_TOP_K)]
        k: u32,
    },
    /// Register a document that already exists on the backend host.
    Add {
        #[arg(long)]
        cord_root: String,
        #[arg(long)]
        json_relpath: String,
        #[arg(long)]
        cord_uid: String,
        #[arg(long)]
        title: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = match &args.api_base {
        Some(raw) => Settings::from_api_base(raw),
        None => load_settings(),
    }
    .context("failed to resolve backend configuration")?;
    debug!(api_base = %settings.api_base, "resolved backend configuration");
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&settings));

    let succeeded = match args.command {
        Command::Search { query, k } => run_search(transport, query.join(" "), k).await,
        Command::Add {
            cord_root,
            json_relpath,
            cord_uid,
            title,
        } => {
            let ingest = IngestionController::new(transport);
            ingest.set_cord_root(cord_root);
            ingest.set_json_relpath(json_relpath);
            ingest.set_cord_uid(cord_uid);
            ingest.set_title(title);
            ingest.submit().settled().await;
            render_ingestion(&ingest.view())
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run_search(transport: Arc<dyn Transport>, text: String, k: u32) -> bool {
    let controller = QueryController::new(transport);
    controller.set_text(text);
    controller.set_top_k(k);

    match controller.submit() {
        Submission::Ignored(reason) => {
            eprintln!("{reason}");
            return false;
        }
        submission => submission.settled().await,
    }
    render_search(&controller.view())
}

fn render_search(view: &SearchView) -> bool {
    if let Some(timing) = &view.timing {
        println!("{timing}");
    }
    if let Some(banner) = &view.error {
        render_error(banner);
        return false;
    }
    if let Some(notice) = view.empty_notice {
        println!("{notice}");
    }
    for (rank, card) in view.results.iter().enumerate() {
        println!();
        println!("{:>3}. {}  (score: {})", rank + 1, card.title, card.score);
        if let Some(link) = &card.link {
            println!("     {link}");
        }
        if let Some(byline) = &card.byline {
            println!("     {byline}");
        }
        println!("     {}", card.locator);
        println!("     json_relpath: {}", card.json_relpath);
    }
    true
}

fn render_ingestion(view: &IngestionView) -> bool {
    if let Some(banner) = &view.error {
        render_error(banner);
        return false;
    }
    if let Some(confirmation) = &view.confirmation {
        println!("{confirmation}");
    }
    true
}

fn render_error(banner: &ErrorBanner) {
    eprintln!("error: {}", banner.message);
    if let Some(hint) = banner.hint {
        eprintln!("{hint}");
    }
}
