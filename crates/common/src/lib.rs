//! Types shared between the plugin core and its hosts.

pub mod error;
pub mod response;
pub mod types;

pub use {
    error::PluginError,
    response::Response,
    types::{CommandContext, PluginInfo},
};
