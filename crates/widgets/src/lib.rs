pub mod catalog;
mod clock;
mod counter;
mod echo;
mod status;

pub use catalog::default_registry;
pub use clock::ClockWidget;
pub use counter::CounterWidget;
pub use echo::EchoWidget;
pub use status::StatusWidget;
