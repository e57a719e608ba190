use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use shared::domain::CellId;
use thiserror::Error;

use crate::surface::RenderSurface;

/// Behavior unit bound to cells displaying one option. A single instance is
/// shared by every cell currently on that option, so implementations must
/// key any per-cell state by `CellId`.
#[async_trait]
pub trait CellModule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Attach to a freshly injected fragment. Modules without an init hook
    /// keep the default no-op.
    async fn init(&self, _cell: &CellId, _surface: &dyn RenderSurface) -> Result<()> {
        Ok(())
    }

    /// Release everything held for `cell`. Modules without a destroy hook
    /// keep the default no-op.
    async fn destroy(&self, _cell: &CellId, _surface: &dyn RenderSurface) -> Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for dyn CellModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellModule")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
pub enum ModuleBuildError {
    /// The constructor ran to completion but produced no module.
    #[error("module constructor completed without exposing a module")]
    NotExposed,
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

pub type ModuleFactory =
    Arc<dyn Fn() -> Result<Arc<dyn CellModule>, ModuleBuildError> + Send + Sync>;

/// Registered constructor for an option's module, plus a human-readable
/// origin carried in load errors and logs.
#[derive(Clone)]
pub struct ModuleSpec {
    pub source_ref: String,
    pub factory: ModuleFactory,
}

impl ModuleSpec {
    pub fn from_fn<F>(source_ref: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn CellModule>, ModuleBuildError> + Send + Sync + 'static,
    {
        Self {
            source_ref: source_ref.into(),
            factory: Arc::new(factory),
        }
    }
}

impl std::fmt::Debug for ModuleSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleSpec")
            .field("source_ref", &self.source_ref)
            .finish_non_exhaustive()
    }
}
