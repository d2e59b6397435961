pub mod api;
pub mod catalog;
pub mod config;
pub mod dom;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod state;
pub mod ui;

pub use catalog::FishCatalogLoader;
pub use config::Config;
pub use errors::UiError;
pub use handlers::{Dispatch, ToggleCaughtHandler, ToggleOutcome, dispatch_click};
pub use notify::NotificationBanner;
pub use state::Page;
