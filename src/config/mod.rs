//! Configuration loaded from `.pwdm.toml`.

pub mod settings;

pub use settings::Settings;
