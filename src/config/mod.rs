//! Project configuration (`.securevault.toml`).

pub mod settings;

pub use settings::Settings;
