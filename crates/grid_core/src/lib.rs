use std::sync::Arc;

use anyhow::Context;
use futures::future::join_all;
use shared::{
    domain::{CellId, GridSize, OptionId},
    error::GridError,
};
use tracing::{error, info, warn};

pub mod fragment;
pub mod loader;
pub mod module;
pub mod registry;
pub mod state;
pub mod surface;

pub use fragment::{DirFragmentSource, FragmentSource, HttpFragmentSource, MissingFragmentSource};
pub use loader::ModuleLoader;
pub use module::{CellModule, ModuleBuildError, ModuleFactory, ModuleSpec};
pub use registry::{OptionEntry, OptionRegistry};
pub use state::{CellPhase, CellSnapshot, CellStateStore};
pub use surface::{InMemorySurface, RenderSurface};

const NO_CONTENT_PLACEHOLDER: &str = "<p>No content available for this option.</p>";

fn error_markup(err: &GridError) -> String {
    format!("<p>Error loading content: {err}</p>")
}

/// Result of driving one cell through an option change.
#[derive(Debug)]
pub enum SetOutcome {
    /// Fragment injected; `module_attached` is false for fragment-only
    /// options.
    Applied { module_attached: bool },
    /// No fragment registered for the option; placeholder rendered.
    Placeholder,
    /// A newer `set_option` for the same cell began while this one was
    /// suspended; nothing was applied.
    Superseded,
    /// Fragment fetch or module load failed; the error was rendered into
    /// the cell and the cell is in the `Failed` phase.
    Failed(GridError),
}

/// Owns the option registry, module loader, fragment source, render surface
/// and per-cell state, and drives the per-cell lifecycle:
/// destroy old module -> fetch fragment -> inject -> load/init -> commit.
pub struct GridController {
    registry: Arc<OptionRegistry>,
    loader: ModuleLoader,
    fragments: Arc<dyn FragmentSource>,
    surface: Arc<dyn RenderSurface>,
    cells: CellStateStore,
}

impl GridController {
    /// Controller without a content source; fragment-backed options land on
    /// the in-cell error path until one is wired.
    pub fn new(registry: Arc<OptionRegistry>, surface: Arc<dyn RenderSurface>) -> Arc<Self> {
        Self::new_with_dependencies(registry, Arc::new(MissingFragmentSource), surface)
    }

    pub fn new_with_dependencies(
        registry: Arc<OptionRegistry>,
        fragments: Arc<dyn FragmentSource>,
        surface: Arc<dyn RenderSurface>,
    ) -> Arc<Self> {
        Arc::new(Self {
            loader: ModuleLoader::new(Arc::clone(&registry)),
            registry,
            fragments,
            surface,
            cells: CellStateStore::new(),
        })
    }

    /// Tear down the current grid and build a fresh `rows x cols` one, each
    /// cell registered empty, mounted, then driven to the registry's
    /// default option. Per-cell failures render in-cell and never fail the
    /// build. Returns the created cell ids in row-major order.
    pub async fn build(&self, size: GridSize) -> anyhow::Result<Vec<CellId>> {
        for (cell, phase) in self.cells.drain().await {
            if let CellPhase::Active {
                option,
                module: Some(module),
            } = phase
            {
                if let Err(err) = module.destroy(&cell, self.surface.as_ref()).await {
                    warn!("grid: teardown destroy failed cell={cell} option={option} err={err:#}");
                }
            }
        }
        self.surface
            .clear()
            .await
            .context("failed to clear render surface")?;

        let mut created = Vec::with_capacity(size.cell_count());
        for row in 0..size.rows {
            for col in 0..size.cols {
                let cell = CellId::at(row, col);
                self.cells.register(cell.clone()).await;
                self.surface
                    .mount_cell(&cell)
                    .await
                    .with_context(|| format!("failed to mount cell '{cell}'"))?;
                created.push(cell);
            }
        }

        let Some(default_option) = self.registry.default_option().cloned() else {
            info!("grid: built grid with empty registry cells={}", created.len());
            return Ok(created);
        };

        let settles = created
            .iter()
            .map(|cell| self.set_option(cell, &default_option));
        for (cell, outcome) in created.iter().zip(join_all(settles).await) {
            match outcome {
                Ok(SetOutcome::Failed(err)) => {
                    warn!("grid: default option failed cell={cell} err={err}");
                }
                Ok(_) => {}
                Err(err) => warn!("grid: default option rejected cell={cell} err={err}"),
            }
        }

        info!(
            "grid: built rows={} cols={} cells={}",
            size.rows,
            size.cols,
            created.len()
        );
        Ok(created)
    }

    /// Apply `option` to `cell`. Only `UnknownCell` propagates as `Err`;
    /// fetch, load and render failures are converted into an in-cell error
    /// rendering and returned as `Ok(SetOutcome::Failed(..))`. Same-cell
    /// calls are not serialized: a call overtaken by a newer one returns
    /// `Superseded` and its completions are discarded.
    pub async fn set_option(
        &self,
        cell: &CellId,
        option: &OptionId,
    ) -> Result<SetOutcome, GridError> {
        let transition = self.cells.begin_transition(cell, option).await?;
        let token = transition.token;

        if let Some((previous, module)) = transition.previous {
            if let Err(err) = module.destroy(cell, self.surface.as_ref()).await {
                warn!(
                    "lifecycle: destroy failed cell={cell} option={previous} module={} err={err:#}",
                    module.name()
                );
            }
        }

        let Some(fragment_path) = self.registry.fragment_path(option).map(str::to_string) else {
            let phase = CellPhase::Active {
                option: option.clone(),
                module: None,
            };
            return match self
                .cells
                .commit_and_render_if_current(
                    cell,
                    token,
                    phase,
                    NO_CONTENT_PLACEHOLDER,
                    self.surface.as_ref(),
                )
                .await
            {
                Ok(true) => {
                    info!("lifecycle: placeholder rendered cell={cell} option={option}");
                    Ok(SetOutcome::Placeholder)
                }
                Ok(false) => Ok(SetOutcome::Superseded),
                Err(cause) => {
                    let err = GridError::Surface {
                        cell: cell.clone(),
                        cause,
                    };
                    self.fail(cell, token, option, err).await
                }
            };
        };

        let html = match self.fragments.fetch(&fragment_path).await {
            Ok(html) => html,
            Err(err) => return self.fail(cell, token, option, err).await,
        };

        match self
            .cells
            .render_if_current(cell, token, &html, self.surface.as_ref())
            .await
        {
            Ok(true) => {}
            Ok(false) => return Ok(SetOutcome::Superseded),
            Err(cause) => {
                let err = GridError::Surface {
                    cell: cell.clone(),
                    cause,
                };
                return self.fail(cell, token, option, err).await;
            }
        }

        let module = if self.registry.module_spec(option).is_some() {
            match self.loader.load(option).await {
                Ok(module) => {
                    if let Err(err) = module.init(cell, self.surface.as_ref()).await {
                        warn!(
                            "lifecycle: init contract violation cell={cell} option={option} module={} err={err:#}",
                            module.name()
                        );
                    }
                    Some(module)
                }
                Err(err) => return self.fail(cell, token, option, err).await,
            }
        } else {
            None
        };

        let module_attached = module.is_some();
        if !self
            .cells
            .commit_if_current(
                cell,
                token,
                CellPhase::Active {
                    option: option.clone(),
                    module,
                },
            )
            .await
        {
            return Ok(SetOutcome::Superseded);
        }

        info!("lifecycle: option applied cell={cell} option={option} module={module_attached}");
        Ok(SetOutcome::Applied { module_attached })
    }

    async fn fail(
        &self,
        cell: &CellId,
        token: u64,
        option: &OptionId,
        err: GridError,
    ) -> Result<SetOutcome, GridError> {
        let phase = CellPhase::Failed {
            option: option.clone(),
        };
        match self
            .cells
            .commit_and_render_if_current(
                cell,
                token,
                phase,
                &error_markup(&err),
                self.surface.as_ref(),
            )
            .await
        {
            Ok(true) => {}
            Ok(false) => return Ok(SetOutcome::Superseded),
            Err(render_err) => {
                error!("lifecycle: error rendering failed cell={cell} err={render_err:#}");
            }
        }
        error!("lifecycle: option failed cell={cell} option={option} err={err}");
        Ok(SetOutcome::Failed(err))
    }

    pub async fn snapshot(&self, cell: &CellId) -> Option<CellSnapshot> {
        self.cells.snapshot(cell).await
    }

    pub async fn cell_ids(&self) -> Vec<CellId> {
        self.cells.cell_ids().await
    }

    pub async fn cell_count(&self) -> usize {
        self.cells.len().await
    }

    pub fn loader(&self) -> &ModuleLoader {
        &self.loader
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    pub fn surface(&self) -> &Arc<dyn RenderSurface> {
        &self.surface
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
