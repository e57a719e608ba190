use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use grid_core::{CellModule, RenderSurface};
use shared::domain::CellId;
use tokio::sync::Mutex;
use tracing::info;

const CLOCK_SLOT: &str = "option03-clock";

/// Stamps the cell with the time its fragment was initialized (option03).
#[derive(Default)]
pub struct ClockWidget {
    initialized_at: Mutex<HashMap<CellId, DateTime<Utc>>>,
}

impl ClockWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn initialized_at(&self, cell: &CellId) -> Option<DateTime<Utc>> {
        self.initialized_at.lock().await.get(cell).copied()
    }
}

#[async_trait]
impl CellModule for ClockWidget {
    fn name(&self) -> &'static str {
        "clock"
    }

    async fn init(&self, cell: &CellId, surface: &dyn RenderSurface) -> Result<()> {
        let now = Utc::now();
        self.initialized_at.lock().await.insert(cell.clone(), now);
        surface.set_slot(cell, CLOCK_SLOT, &now.to_rfc3339()).await?;
        info!("widget: clock initialized cell={cell}");
        Ok(())
    }

    async fn destroy(&self, cell: &CellId, _surface: &dyn RenderSurface) -> Result<()> {
        self.initialized_at.lock().await.remove(cell);
        Ok(())
    }
}
