//! Double PAL batch target builder.
mod base;
mod config;
pub use base::DoublePal;
pub use config::DoublePalConfig;
