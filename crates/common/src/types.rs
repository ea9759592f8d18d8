use {
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
};

/// Optional per-command context passed from the host to a plugin.
pub type CommandContext = Map<String, Value>;

/// Projection of a loaded plugin for host-side listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    /// Number of registered command patterns.
    pub commands: usize,
    /// Whether the registry currently dispatches to this plugin.
    #[serde(default)]
    pub active: bool,
}
