pub mod config;
pub mod console_observer;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::{ConversionMode, Environment, Settings};
pub use console_observer::ConsoleObserver;
pub use router::create_router;
pub use state::AppState;
