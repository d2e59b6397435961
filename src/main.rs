use clap::{Parser, Subcommand};
use fish_tracker::{
    Config, Dispatch, FishCatalogLoader, Page, ToggleCaughtHandler, dispatch_click,
    dom::Document,
    ui::{mount_collection_card, mount_layout, render_page},
};
use std::path::PathBuf;
use tokio::fs;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "fish_tracker", about = "Headless driver for the fish tracker page")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the species catalog into the grid and print the page.
    Catalog {
        /// Write the page here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Click the toggle control on one collection card and print the page.
    Toggle {
        #[arg(long)]
        user_id: String,
        /// Card attribute value, e.g. `fish-42`.
        #[arg(long)]
        fish_id: String,
        /// Start from a card whose fish is already caught.
        #[arg(long)]
        caught: bool,
    },
    /// Look up one species in the reference catalog.
    Fish { id: u32 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    info!(api = %config.api_base_url, catalog = %config.catalog_base_url, "starting");

    let mut document = Document::new();
    let layout = mount_layout(&mut document);

    match cli.command {
        Command::Catalog { out } => {
            let page = Page::from_config(&config, document)?;
            let loaded = FishCatalogLoader::new(page.clone()).load().await;
            let html = page_html(&page, "Fish Catalog").await;
            match out {
                Some(path) => fs::write(&path, html).await?,
                None => println!("{html}"),
            }
            loaded?;
        }
        Command::Toggle {
            user_id,
            fish_id,
            caught,
        } => {
            let control = mount_collection_card(
                &mut document,
                layout.collection,
                &user_id,
                &fish_id,
                &fish_id,
                caught,
            );
            let page = Page::from_config(&config, document)?;
            let handler = ToggleCaughtHandler::register(page.clone(), layout.collection);

            let outcome = match dispatch_click(&handler, control).await {
                Dispatch::Toggling { task, .. } => Some(task.await?),
                other => {
                    info!(?other, "click was not handled");
                    None
                }
            };
            println!("{}", page_html(&page, "My Fish").await);
            if let Some(outcome) = outcome {
                info!(?outcome, "toggle finished");
                outcome?;
            }
        }
        Command::Fish { id } => {
            let page = Page::from_config(&config, document)?;
            let fish = FishCatalogLoader::new(page).get_fish(id).await?;
            println!("{}", serde_json::to_string_pretty(&fish)?);
        }
    }

    Ok(())
}

async fn page_html(page: &Page, title: &str) -> String {
    let doc = page.document.lock().await;
    render_page(title, &doc.inner_html(doc.body()))
}
