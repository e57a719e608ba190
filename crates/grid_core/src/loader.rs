use std::{collections::HashMap, sync::Arc};

use shared::{domain::OptionId, error::GridError};
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    module::{CellModule, ModuleBuildError},
    registry::OptionRegistry,
};

/// Resolves an option id to its module, constructing it at most once. The
/// cache mutex is held across miss detection and construction, so concurrent
/// first loads of one option run the factory exactly once. No eviction.
pub struct ModuleLoader {
    registry: Arc<OptionRegistry>,
    cache: Mutex<HashMap<OptionId, Arc<dyn CellModule>>>,
}

impl ModuleLoader {
    pub fn new(registry: Arc<OptionRegistry>) -> Self {
        Self {
            registry,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn load(&self, option: &OptionId) -> Result<Arc<dyn CellModule>, GridError> {
        let mut cache = self.cache.lock().await;
        if let Some(module) = cache.get(option) {
            return Ok(Arc::clone(module));
        }

        let spec = self
            .registry
            .module_spec(option)
            .ok_or_else(|| GridError::UnknownOption(option.clone()))?;

        let module = (spec.factory)().map_err(|err| match err {
            ModuleBuildError::NotExposed => GridError::ModuleNotExposed(option.clone()),
            ModuleBuildError::Failed(cause) => GridError::Load {
                source_ref: spec.source_ref.clone(),
                cause,
            },
        })?;

        info!(
            "loader: module built option={option} source={} module={}",
            spec.source_ref,
            module.name()
        );
        cache.insert(option.clone(), Arc::clone(&module));
        Ok(module)
    }

    /// Whether the option's module has already been constructed.
    pub async fn cached(&self, option: &OptionId) -> bool {
        self.cache.lock().await.contains_key(option)
    }
}
