//! `xmovectl`: browse a Studio course outline and move blocks around it.

mod render;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xmove_core::prelude::*;
use xmove_core::views::{BreadcrumbView, ListView};
use xmove_core::{LogNotifier, NavigationCursor, OutlineTree};

#[derive(Parser)]
#[command(
    name = "xmovectl",
    about = "Browse a Studio course outline and move blocks"
)]
struct Cli {
    /// TOML configuration file (XMOVE_* variables still apply)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Studio base URL, overrides the configuration
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Course locator
    #[arg(long, global = true)]
    course: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the course outline
    Outline,
    /// Show the move dialog at a position in the outline
    Browse {
        /// Child indices to follow from the starting node, e.g. 0,1,0
        #[arg(long, value_delimiter = ',')]
        path: Vec<usize>,
        /// Block being moved; marks its current location
        #[arg(long)]
        source: Option<String>,
    },
    /// Move a block under the node reached by --path
    Move {
        #[arg(long)]
        source: String,
        /// Child indices to follow from the course root, e.g. 1,0,1
        #[arg(long, value_delimiter = ',')]
        path: Vec<usize>,
        /// Position among the new parent's children
        #[arg(long)]
        index: Option<usize>,
        /// Revert the move right after it succeeds
        #[arg(long)]
        undo: bool,
    },
    /// Put a block back under a parent at a given position
    Undo {
        #[arg(long)]
        source: String,
        #[arg(long)]
        parent: String,
        #[arg(long)]
        index: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Cli {
        config,
        base_url,
        course,
        command,
    } = Cli::parse();

    let config = load_config(config.as_deref(), base_url)?;
    let client =
        StudioClient::new(&config).context("failed to create Studio client")?;
    let api: Arc<dyn StudioApi> = Arc::new(client);

    match command {
        Command::Outline => {
            let payload = api.fetch_outline(&require_course(course)?).await?;
            let tree = OutlineTree::build(&payload)?;
            print!("{}", render::outline(&tree));
        }
        Command::Browse { path, source: None } => {
            let payload = api.fetch_outline(&require_course(course)?).await?;
            let tree = OutlineTree::build(&payload)?;
            let mut cursor = NavigationCursor::new(&tree);
            for index in path {
                cursor.forward(&tree, index)?;
            }
            print!(
                "{}",
                render::breadcrumbs(&BreadcrumbView::build(&tree, &cursor))
            );
            print!(
                "{}",
                render::list(&ListView::build(&tree, &cursor, &HashSet::new()))
            );
        }
        Command::Browse {
            path,
            source: Some(source),
        } => {
            let mut modal = session(
                api,
                require_course(course)?,
                Locator::new(source),
                config.start_at_source_parent,
            )
            .await?;
            for index in path {
                modal.forward(index)?;
            }
            let header = modal.header();
            println!("{}", header.title);
            print!("{}", render::breadcrumbs(&modal.breadcrumbs()?));
            print!("{}", render::list(&modal.list_view()?));
            let state = if modal.is_move_enabled() {
                "enabled"
            } else {
                "disabled"
            };
            println!("{}: {state}", header.move_label);
        }
        Command::Move {
            source,
            path,
            index,
            undo,
        } => {
            let source = Locator::new(source);
            let mut modal = session(
                api,
                require_course(course)?,
                source.clone(),
                false,
            )
            .await?;
            for step in path {
                modal.forward(step)?;
            }
            if !modal.is_move_enabled() {
                let target = modal
                    .target_parent()
                    .map(|node| node.locator.to_string())
                    .unwrap_or_default();
                bail!("{source} cannot be moved under {target}");
            }

            let alert = modal.confirm_move(index).await?;
            print!("{}", render::alert(&alert));
            if undo {
                let alert = modal.undo().await?;
                print!("{}", render::alert(&alert));
            }
        }
        Command::Undo {
            source,
            parent,
            index,
        } => {
            let request = MoveRequest {
                source: Locator::new(source),
                source_parent: None,
                target_parent: Locator::new(parent),
                target_index: Some(index),
            };
            let result = api.relocate(&request).await?;
            println!(
                "{} is back under {}",
                result.moved_source, result.new_parent
            );
        }
    }

    Ok(())
}

fn load_config(
    path: Option<&Path>,
    base_url: Option<String>,
) -> Result<StudioConfig> {
    let mut config =
        StudioConfig::load(path).context("failed to load configuration")?;
    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url);
        config.validate()?;
    }
    Ok(config)
}

fn require_course(course: Option<String>) -> Result<Locator> {
    course
        .map(Locator::new)
        .context("--course is required for this command")
}

async fn session(
    api: Arc<dyn StudioApi>,
    course: Locator,
    source: Locator,
    start_at_source_parent: bool,
) -> Result<MoveModal> {
    let modal = MoveModal::open_for_source(
        course,
        source,
        start_at_source_parent,
        api,
        Arc::new(LogNotifier),
    )
    .await?;
    Ok(modal)
}
