//! Plugin system: the capability-unit contract, the registry that manages
//! unit lifecycles and dispatches commands, and the built-in units.
//!
//! Dispatch is first-match over active plugins in activation order.

pub mod builtin;
pub mod commands;
pub mod host;
pub mod manager;
pub mod plugin;

pub use {
    commands::CommandTable,
    host::{PluginHost, StaticHost},
    manager::PluginManager,
    plugin::{Plugin, PluginBase, PluginFactory},
};
