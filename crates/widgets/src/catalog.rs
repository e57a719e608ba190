use std::sync::Arc;

use grid_core::{CellModule, ModuleSpec, OptionEntry, OptionRegistry};

use crate::{ClockWidget, CounterWidget, EchoWidget, StatusWidget};

/// The five-option default catalog. Fragment paths follow the
/// `content/option0N.html` convention; option05 is fragment-only. The first
/// entry (option01) is the grid default.
pub fn default_registry() -> OptionRegistry {
    let mut registry = OptionRegistry::new();

    registry.register(
        "option01",
        OptionEntry::new("Option 01")
            .with_fragment("content/option01.html")
            .with_module(ModuleSpec::from_fn("widgets/counter", || {
                Ok(Arc::new(CounterWidget::new()) as Arc<dyn CellModule>)
            })),
    );
    registry.register(
        "option02",
        OptionEntry::new("Option 02")
            .with_fragment("content/option02.html")
            .with_module(ModuleSpec::from_fn("widgets/echo", || {
                Ok(Arc::new(EchoWidget::new()) as Arc<dyn CellModule>)
            })),
    );
    registry.register(
        "option03",
        OptionEntry::new("Option 03")
            .with_fragment("content/option03.html")
            .with_module(ModuleSpec::from_fn("widgets/clock", || {
                Ok(Arc::new(ClockWidget::new()) as Arc<dyn CellModule>)
            })),
    );
    registry.register(
        "option04",
        OptionEntry::new("Option 04")
            .with_fragment("content/option04.html")
            .with_module(ModuleSpec::from_fn("widgets/status", || {
                Ok(Arc::new(StatusWidget::new()) as Arc<dyn CellModule>)
            })),
    );
    registry.register(
        "option05",
        OptionEntry::new("Option 05").with_fragment("content/option05.html"),
    );

    registry
}
