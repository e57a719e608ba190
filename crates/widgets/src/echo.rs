use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use grid_core::{CellModule, RenderSurface};
use shared::domain::CellId;
use tokio::sync::Mutex;
use tracing::info;

const DISPLAY_SLOT: &str = "option02-display";

/// Input mirror (option02): the last value entered for a cell is echoed
/// into its display slot.
#[derive(Default)]
pub struct EchoWidget {
    inputs: Mutex<HashMap<CellId, String>>,
}

impl EchoWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn last_input(&self, cell: &CellId) -> Option<String> {
        self.inputs.lock().await.get(cell).cloned()
    }

    pub async fn set_input(
        &self,
        cell: &CellId,
        value: &str,
        surface: &dyn RenderSurface,
    ) -> Result<()> {
        {
            let mut inputs = self.inputs.lock().await;
            let input = inputs
                .get_mut(cell)
                .ok_or_else(|| anyhow!("echo is not initialized for cell '{cell}'"))?;
            *input = value.to_string();
        }
        surface.set_slot(cell, DISPLAY_SLOT, value).await
    }
}

#[async_trait]
impl CellModule for EchoWidget {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn init(&self, cell: &CellId, surface: &dyn RenderSurface) -> Result<()> {
        self.inputs.lock().await.insert(cell.clone(), String::new());
        surface.set_slot(cell, DISPLAY_SLOT, "").await?;
        info!("widget: echo initialized cell={cell}");
        Ok(())
    }

    async fn destroy(&self, cell: &CellId, _surface: &dyn RenderSurface) -> Result<()> {
        self.inputs.lock().await.remove(cell);
        info!("widget: echo destroyed cell={cell}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_core::InMemorySurface;

    #[tokio::test]
    async fn mirrors_the_latest_input_per_cell() {
        let widget = EchoWidget::new();
        let surface = InMemorySurface::new();
        let first = CellId::at(0, 0);
        let second = CellId::at(1, 0);
        for cell in [&first, &second] {
            surface.mount_cell(cell).await.expect("mount");
            widget.init(cell, &surface).await.expect("init");
        }

        widget.set_input(&first, "hello", &surface).await.expect("input");
        widget.set_input(&first, "world", &surface).await.expect("input");
        widget.set_input(&second, "other", &surface).await.expect("input");

        assert_eq!(widget.last_input(&first).await.as_deref(), Some("world"));
        assert_eq!(
            surface.slot(&first, DISPLAY_SLOT).await.as_deref(),
            Some("world")
        );
        assert_eq!(
            surface.slot(&second, DISPLAY_SLOT).await.as_deref(),
            Some("other")
        );
    }
}
