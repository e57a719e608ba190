use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use grid_core::{
    DirFragmentSource, FragmentSource, GridController, HttpFragmentSource, InMemorySurface,
    MissingFragmentSource, RenderSurface,
};
use shared::domain::{GridSize, OptionId};
use tracing::warn;

mod config;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    rows: Option<u32>,
    #[arg(long)]
    cols: Option<u32>,
    /// Fetch fragments from this base URL instead of the content directory.
    #[arg(long)]
    content_url: Option<String>,
    #[arg(long)]
    content_dir: Option<String>,
    /// Apply this option to every cell after the initial build.
    #[arg(long)]
    option: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(rows) = args.rows {
        settings.rows = rows;
    }
    if let Some(cols) = args.cols {
        settings.cols = cols;
    }
    if let Some(url) = args.content_url {
        settings.content_url = Some(url);
    }
    if let Some(dir) = args.content_dir {
        settings.content_dir = Some(dir);
    }

    let fragments: Arc<dyn FragmentSource> = if let Some(url) = &settings.content_url {
        Arc::new(HttpFragmentSource::from_base(url)?)
    } else if let Some(dir) = &settings.content_dir {
        Arc::new(DirFragmentSource::new(dir))
    } else {
        warn!("console: no content source configured, cells will render errors");
        Arc::new(MissingFragmentSource)
    };

    let surface = Arc::new(InMemorySurface::new());
    let controller = GridController::new_with_dependencies(
        Arc::new(widgets::default_registry()),
        fragments,
        Arc::clone(&surface) as Arc<dyn RenderSurface>,
    );

    let cells = controller
        .build(GridSize::new(settings.rows, settings.cols))
        .await?;

    if let Some(option) = args.option {
        let option = OptionId::from(option);
        for cell in &cells {
            controller.set_option(cell, &option).await?;
        }
    }

    for cell in &cells {
        let snapshot = controller.snapshot(cell).await;
        println!(
            "cell {cell}: {}",
            serde_json::to_string(&snapshot)?
        );
        if let Some(content) = surface.content(cell).await {
            println!("  {content}");
        }
    }

    Ok(())
}
