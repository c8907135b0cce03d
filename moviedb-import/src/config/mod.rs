pub mod loader;
pub mod models;
pub mod sources;

pub use loader::{ConfigLoader, ConfigLoaderOptions};
pub use models::Config;
