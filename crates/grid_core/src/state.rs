use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use serde::Serialize;
use shared::{
    domain::{CellId, OptionId},
    error::GridError,
};
use tokio::sync::RwLock;

use crate::{module::CellModule, surface::RenderSurface};

/// Lifecycle phase of one cell. `Failed` is non-terminal: the next
/// `set_option` can recover the cell.
#[derive(Clone, Default)]
pub enum CellPhase {
    #[default]
    Empty,
    Active {
        option: OptionId,
        module: Option<Arc<dyn CellModule>>,
    },
    Failed {
        option: OptionId,
    },
}

#[derive(Default)]
struct CellRecord {
    phase: CellPhase,
    generation: u64,
}

/// Read-only projection of a cell's state. `active_option` is populated for
/// both `Active` and `Failed` phases (a failed cell keeps the attempted
/// option).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellSnapshot {
    pub active_option: Option<OptionId>,
    pub has_module: bool,
    pub failed: bool,
}

impl CellSnapshot {
    fn of(phase: &CellPhase) -> Self {
        match phase {
            CellPhase::Empty => Self {
                active_option: None,
                has_module: false,
                failed: false,
            },
            CellPhase::Active { option, module } => Self {
                active_option: Some(option.clone()),
                has_module: module.is_some(),
                failed: false,
            },
            CellPhase::Failed { option } => Self {
                active_option: Some(option.clone()),
                has_module: false,
                failed: true,
            },
        }
    }
}

/// Outcome of opening a transition: the generation token guarding this
/// call's writes, and the previous module (already detached from state)
/// when the active option differs from the requested one.
pub struct Transition {
    pub token: u64,
    pub previous: Option<(OptionId, Arc<dyn CellModule>)>,
}

/// Per-cell state for one grid generation. Owned by the controller; every
/// transition stamps the cell with a fresh token from a store-wide clock so
/// stale asynchronous completions are discarded instead of applied. Tokens
/// are unique across rebuilds, so a completion from a torn-down grid can
/// never match a recreated cell of the same id.
#[derive(Default)]
pub struct CellStateStore {
    cells: RwLock<HashMap<CellId, CellRecord>>,
    clock: AtomicU64,
}

impl CellStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, cell: CellId) {
        let mut cells = self.cells.write().await;
        cells.insert(cell, CellRecord::default());
    }

    /// Stamp the cell with a fresh generation token and detach its module
    /// when `next` differs from the active option. Detaching before any
    /// await point guarantees the module is destroyed exactly once even
    /// under interleaved calls.
    pub async fn begin_transition(
        &self,
        cell: &CellId,
        next: &OptionId,
    ) -> Result<Transition, GridError> {
        let mut cells = self.cells.write().await;
        let record = cells
            .get_mut(cell)
            .ok_or_else(|| GridError::UnknownCell(cell.clone()))?;

        let token = self.clock.fetch_add(1, Ordering::Relaxed) + 1;
        record.generation = token;

        let previous = match &mut record.phase {
            CellPhase::Active { option, module } if option != next => {
                module.take().map(|module| (option.clone(), module))
            }
            _ => None,
        };

        Ok(Transition { token, previous })
    }

    /// Apply `phase` only if `token` is still the cell's latest generation.
    /// Returns false (state untouched) for stale tokens and for cells that
    /// were drained while the call was in flight.
    pub async fn commit_if_current(&self, cell: &CellId, token: u64, phase: CellPhase) -> bool {
        let mut cells = self.cells.write().await;
        match cells.get_mut(cell) {
            Some(record) if record.generation == token => {
                record.phase = phase;
                true
            }
            _ => false,
        }
    }

    /// Re-validate `token` and replace the cell's content while holding the
    /// record lock: a call that lost the race cannot write after a newer
    /// transition has begun, and a newer transition cannot begin while the
    /// write is in flight.
    pub async fn render_if_current(
        &self,
        cell: &CellId,
        token: u64,
        html: &str,
        surface: &dyn RenderSurface,
    ) -> anyhow::Result<bool> {
        let cells = self.cells.read().await;
        if !cells
            .get(cell)
            .is_some_and(|record| record.generation == token)
        {
            return Ok(false);
        }
        surface.replace_content(cell, html).await?;
        Ok(true)
    }

    /// Commit `phase` and render `html` as one step, both guarded by
    /// `token` under the record lock.
    pub async fn commit_and_render_if_current(
        &self,
        cell: &CellId,
        token: u64,
        phase: CellPhase,
        html: &str,
        surface: &dyn RenderSurface,
    ) -> anyhow::Result<bool> {
        let mut cells = self.cells.write().await;
        match cells.get_mut(cell) {
            Some(record) if record.generation == token => {
                record.phase = phase;
                surface.replace_content(cell, html).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub async fn snapshot(&self, cell: &CellId) -> Option<CellSnapshot> {
        let cells = self.cells.read().await;
        cells.get(cell).map(|record| CellSnapshot::of(&record.phase))
    }

    /// Full teardown: remove every record, yielding each cell's phase so
    /// callers can destroy detached modules.
    pub async fn drain(&self) -> Vec<(CellId, CellPhase)> {
        let mut cells = self.cells.write().await;
        std::mem::take(&mut *cells)
            .into_iter()
            .map(|(cell, record)| (cell, record.phase))
            .collect()
    }

    pub async fn cell_ids(&self) -> Vec<CellId> {
        let cells = self.cells.read().await;
        cells.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.cells.read().await.len()
    }
}
