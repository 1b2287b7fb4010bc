//! Daeshboard terminal dashboard library exports.

pub mod config;
pub mod error;
pub mod events;
pub mod keys;
pub mod logging;
pub mod notifier;
pub mod opener;
pub mod sources;
pub mod theme;
pub mod views;
