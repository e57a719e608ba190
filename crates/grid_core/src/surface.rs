use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::domain::CellId;
use tokio::sync::RwLock;

/// Rendering surface: one content container per cell, supporting full
/// replacement plus named slots scoped to the container (the equivalent of
/// child-element queries). Replacing a cell's content drops its slots.
#[async_trait]
pub trait RenderSurface: Send + Sync {
    async fn mount_cell(&self, cell: &CellId) -> Result<()>;

    /// Remove every cell container.
    async fn clear(&self) -> Result<()>;

    async fn replace_content(&self, cell: &CellId, html: &str) -> Result<()>;

    async fn content(&self, cell: &CellId) -> Option<String>;

    async fn set_slot(&self, cell: &CellId, slot: &str, value: &str) -> Result<()>;

    async fn slot(&self, cell: &CellId, slot: &str) -> Option<String>;
}

#[derive(Debug, Default, Clone)]
struct CellView {
    html: String,
    slots: HashMap<String, String>,
}

/// HashMap-backed surface used by the console demo and the test suites.
#[derive(Default)]
pub struct InMemorySurface {
    cells: RwLock<HashMap<CellId, CellView>>,
}

impl InMemorySurface {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RenderSurface for InMemorySurface {
    async fn mount_cell(&self, cell: &CellId) -> Result<()> {
        let mut cells = self.cells.write().await;
        cells.insert(cell.clone(), CellView::default());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut cells = self.cells.write().await;
        cells.clear();
        Ok(())
    }

    async fn replace_content(&self, cell: &CellId, html: &str) -> Result<()> {
        let mut cells = self.cells.write().await;
        let view = cells
            .get_mut(cell)
            .ok_or_else(|| anyhow!("cell '{cell}' is not mounted"))?;
        view.html = html.to_string();
        view.slots.clear();
        Ok(())
    }

    async fn content(&self, cell: &CellId) -> Option<String> {
        let cells = self.cells.read().await;
        cells.get(cell).map(|view| view.html.clone())
    }

    async fn set_slot(&self, cell: &CellId, slot: &str, value: &str) -> Result<()> {
        let mut cells = self.cells.write().await;
        let view = cells
            .get_mut(cell)
            .ok_or_else(|| anyhow!("cell '{cell}' is not mounted"))?;
        view.slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }

    async fn slot(&self, cell: &CellId, slot: &str) -> Option<String> {
        let cells = self.cells.read().await;
        cells.get(cell).and_then(|view| view.slots.get(slot).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replace_content_drops_slots() {
        let surface = InMemorySurface::new();
        let cell = CellId::at(0, 0);
        surface.mount_cell(&cell).await.expect("mount");
        surface.set_slot(&cell, "out", "1").await.expect("slot");
        surface.replace_content(&cell, "<p>new</p>").await.expect("replace");
        assert_eq!(surface.content(&cell).await.as_deref(), Some("<p>new</p>"));
        assert_eq!(surface.slot(&cell, "out").await, None);
    }

    #[tokio::test]
    async fn unmounted_cell_is_rejected() {
        let surface = InMemorySurface::new();
        let cell = CellId::at(3, 3);
        assert!(surface.replace_content(&cell, "x").await.is_err());
        assert_eq!(surface.content(&cell).await, None);
    }
}
