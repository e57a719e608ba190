use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use grid_core::{CellModule, RenderSurface};
use shared::domain::CellId;
use tokio::sync::Mutex;
use tracing::info;

const OUTPUT_SLOT: &str = "option01-output";

/// Click counter (option01). One instance serves every cell on this option,
/// so counts are keyed by cell id.
#[derive(Default)]
pub struct CounterWidget {
    counts: Mutex<HashMap<CellId, u32>>,
}

impl CounterWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn clicks(&self, cell: &CellId) -> Option<u32> {
        self.counts.lock().await.get(cell).copied()
    }

    /// Register one click for `cell` and refresh its output slot.
    pub async fn record_click(&self, cell: &CellId, surface: &dyn RenderSurface) -> Result<u32> {
        let count = {
            let mut counts = self.counts.lock().await;
            let count = counts
                .get_mut(cell)
                .ok_or_else(|| anyhow!("counter is not initialized for cell '{cell}'"))?;
            *count += 1;
            *count
        };
        surface
            .set_slot(cell, OUTPUT_SLOT, &format!("Button clicked {count} times!"))
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl CellModule for CounterWidget {
    fn name(&self) -> &'static str {
        "counter"
    }

    async fn init(&self, cell: &CellId, surface: &dyn RenderSurface) -> Result<()> {
        self.counts.lock().await.insert(cell.clone(), 0);
        surface
            .set_slot(cell, OUTPUT_SLOT, "Button clicked 0 times!")
            .await?;
        info!("widget: counter initialized cell={cell}");
        Ok(())
    }

    async fn destroy(&self, cell: &CellId, _surface: &dyn RenderSurface) -> Result<()> {
        self.counts.lock().await.remove(cell);
        info!("widget: counter destroyed cell={cell}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_core::InMemorySurface;

    #[tokio::test]
    async fn cells_sharing_the_widget_keep_independent_counts() {
        let widget = CounterWidget::new();
        let surface = InMemorySurface::new();
        let first = CellId::at(0, 0);
        let second = CellId::at(0, 1);
        for cell in [&first, &second] {
            surface.mount_cell(cell).await.expect("mount");
            widget.init(cell, &surface).await.expect("init");
        }

        widget.record_click(&first, &surface).await.expect("click");
        widget.record_click(&first, &surface).await.expect("click");
        widget.record_click(&second, &surface).await.expect("click");

        assert_eq!(widget.clicks(&first).await, Some(2));
        assert_eq!(widget.clicks(&second).await, Some(1));
        assert_eq!(
            surface.slot(&first, OUTPUT_SLOT).await.as_deref(),
            Some("Button clicked 2 times!")
        );
        assert_eq!(
            surface.slot(&second, OUTPUT_SLOT).await.as_deref(),
            Some("Button clicked 1 times!")
        );
    }

    #[tokio::test]
    async fn destroy_releases_the_cell_entry() {
        let widget = CounterWidget::new();
        let surface = InMemorySurface::new();
        let cell = CellId::at(1, 1);
        surface.mount_cell(&cell).await.expect("mount");
        widget.init(&cell, &surface).await.expect("init");

        widget.destroy(&cell, &surface).await.expect("destroy");

        assert_eq!(widget.clicks(&cell).await, None);
        assert!(widget.record_click(&cell, &surface).await.is_err());
    }
}
