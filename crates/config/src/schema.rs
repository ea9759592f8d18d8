/// Config schema types (assistant, plugins).
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JarvisConfig {
    pub assistant: AssistantConfig,
    pub plugins: PluginsConfig,
}

/// Host-level settings exposed to plugins through the host handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Display name of the assistant.
    pub name: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: "Jarvis".into(),
        }
    }
}

/// Which built-in plugins to load at startup, and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    /// Plugin identities to load, in order.
    pub enabled: Vec<String>,

    /// Identities to skip even when listed in `enabled`.
    pub disabled: Vec<String>,

    /// Activate each plugin right after it loads. Load order then becomes
    /// dispatch order.
    pub activate_on_load: bool,

    /// Host-side timeout around each dispatched command. `None` waits forever.
    pub dispatch_timeout_secs: Option<u64>,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            enabled: vec![
                "JokePlugin".into(),
                "TimePlugin".into(),
                "CalculatorPlugin".into(),
            ],
            disabled: Vec::new(),
            activate_on_load: true,
            dispatch_timeout_secs: None,
        }
    }
}

impl PluginsConfig {
    /// Enabled identities minus the disabled ones, order preserved.
    pub fn effective(&self) -> impl Iterator<Item = &str> {
        self.enabled
            .iter()
            .map(String::as_str)
            .filter(|name| !self.disabled.iter().any(|d| d == name))
    }
}
