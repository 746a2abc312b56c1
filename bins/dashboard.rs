use std::path::PathBuf;

use anyhow::{anyhow, Context as _};
use clap::Parser;
use configs::ClientConfig;
use dashboard::{Attachment, Dashboard, ListingDraft, ListingsClient};

/// Terminal dashboard for the listings API
#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the listings API
    #[clap(long, env = "DASHBOARD_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[clap(long)]
    timeout: Option<u64>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Show every listing
    List,
    /// Create a listing
    Create {
        #[clap(long)]
        name: String,
        #[clap(long)]
        about: String,
        /// Image file to upload
        #[clap(long)]
        image: Option<PathBuf>,
    },
    /// Edit a listing. Without --image the stored image is dropped.
    Edit {
        id: String,
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        about: Option<String>,
        #[clap(long)]
        image: Option<PathBuf>,
    },
    /// Delete a listing
    Delete { id: String },
}

fn client_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut cfg = configs::load_default().map(|c| c.client).unwrap_or_default();
    cfg.normalize_from_env();
    if let Some(url) = &cli.base_url { cfg.base_url = url.clone(); }
    if let Some(t) = cli.timeout { cfg.timeout_secs = t; }
    cfg.validate()?;
    Ok(cfg)
}

async fn start(cli: Cli) -> anyhow::Result<()> {
    let cfg = client_config(&cli)?;
    let mut dash = Dashboard::new(ListingsClient::new(&cfg)?);
    dash.refresh().await;

    match cli.command {
        Commands::List => {}
        Commands::Create { name, about, image } => {
            dash.open_create();
            *dash.draft_mut() = ListingDraft { name, about };
            if let Some(path) = image {
                dash.attach(Attachment::from_path(&path).await.with_context(|| format!("reading {}", path.display()))?);
            }
            dash.submit().await?;
        }
        Commands::Edit { id, name, about, image } => {
            let focus = dash
                .listings()
                .iter()
                .find(|l| l.id == id)
                .cloned()
                .ok_or_else(|| anyhow!("no listing with id {id}"))?;
            dash.open_edit(&focus);
            if let Some(name) = name { dash.draft_mut().name = name; }
            if let Some(about) = about { dash.draft_mut().about = about; }
            if let Some(path) = image {
                dash.attach(Attachment::from_path(&path).await.with_context(|| format!("reading {}", path.display()))?);
            }
            dash.submit().await?;
        }
        Commands::Delete { id } => {
            let name = dash
                .listings()
                .iter()
                .find(|l| l.id == id)
                .map(|l| l.name.clone())
                .unwrap_or_else(|| id.clone());
            dash.delete(&id, &name).await;
        }
    }

    print!("{}", dash.render());
    Ok(())
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_cli();

    if let Err(err) = start(Cli::parse()).await {
        eprintln!("{:#}", err);
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}
