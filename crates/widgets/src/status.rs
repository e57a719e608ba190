use anyhow::Result;
use async_trait::async_trait;
use grid_core::{CellModule, RenderSurface};
use shared::domain::CellId;
use tracing::info;

const STATUS_SLOT: &str = "option04-status";

/// Ready marker (option04): flips a status slot on init and visibly clears
/// it on destroy. Stateless, so no per-cell registry is needed.
#[derive(Default)]
pub struct StatusWidget;

impl StatusWidget {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CellModule for StatusWidget {
    fn name(&self) -> &'static str {
        "status"
    }

    async fn init(&self, cell: &CellId, surface: &dyn RenderSurface) -> Result<()> {
        surface.set_slot(cell, STATUS_SLOT, "ready").await?;
        info!("widget: status ready cell={cell}");
        Ok(())
    }

    async fn destroy(&self, cell: &CellId, surface: &dyn RenderSurface) -> Result<()> {
        surface.set_slot(cell, STATUS_SLOT, "detached").await?;
        info!("widget: status detached cell={cell}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_core::InMemorySurface;

    #[tokio::test]
    async fn init_and_destroy_flip_the_status_slot() {
        let widget = StatusWidget::new();
        let surface = InMemorySurface::new();
        let cell = CellId::at(0, 0);
        surface.mount_cell(&cell).await.expect("mount");

        widget.init(&cell, &surface).await.expect("init");
        assert_eq!(
            surface.slot(&cell, STATUS_SLOT).await.as_deref(),
            Some("ready")
        );

        widget.destroy(&cell, &surface).await.expect("destroy");
        assert_eq!(
            surface.slot(&cell, STATUS_SLOT).await.as_deref(),
            Some("detached")
        );
    }
}
