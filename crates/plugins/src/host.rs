/// Narrow view of the host handed to every plugin at construction.
///
/// The registry never calls through it; it only passes it along.
pub trait PluginHost: Send + Sync {
    /// Display name of the assistant the plugin is running inside.
    fn assistant_name(&self) -> &str;
}

/// Host handle carrying nothing but a name.
#[derive(Debug, Clone)]
pub struct StaticHost {
    name: String,
}

impl StaticHost {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for StaticHost {
    fn default() -> Self {
        Self::new("Jarvis")
    }
}

impl PluginHost for StaticHost {
    fn assistant_name(&self) -> &str {
        &self.name
    }
}
