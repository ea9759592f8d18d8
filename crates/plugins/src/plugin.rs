//! The capability-unit contract.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use {
    async_trait::async_trait,
    jarvis_common::{CommandContext, PluginInfo, Response},
    tracing::{error, info},
};

use crate::{commands::CommandTable, host::PluginHost};

/// Identity, metadata and command table shared by every plugin.
///
/// The name is fixed at construction. Metadata and commands are only
/// reachable mutably through [`Plugin::base_mut`], i.e. while the registry
/// still owns the plugin exclusively during `initialize`.
#[derive(Debug)]
pub struct PluginBase {
    name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    commands: CommandTable,
    active: AtomicBool,
}

impl PluginBase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: "Base plugin class".into(),
            version: "1.0.0".into(),
            author: "Unknown".into(),
            commands: CommandTable::new(),
            active: AtomicBool::new(false),
        }
    }

    /// Name the plugin after the last path segment of `T`, generics stripped.
    pub fn for_type<T: ?Sized>() -> Self {
        let full = std::any::type_name::<T>();
        let path = full.split('<').next().unwrap_or(full);
        Self::new(path.rsplit("::").next().unwrap_or(path))
    }

    pub fn with_metadata(
        mut self,
        description: impl Into<String>,
        version: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        self.description = description.into();
        self.version = version.into();
        self.author = author.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn register_command(&mut self, pattern: impl Into<String>, description: impl Into<String>) {
        self.commands.insert(pattern, description);
    }

    /// Mirror of the registry's active set. Only the registry writes it.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub(crate) fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }

    pub fn info(&self) -> PluginInfo {
        PluginInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            version: self.version.clone(),
            author: self.author.clone(),
            commands: self.commands.len(),
            active: self.is_active(),
        }
    }
}

/// A command handler managed by [`PluginManager`](crate::PluginManager).
///
/// Implementors supply `base`/`base_mut`, `initialize` and
/// `process_command`; everything else has a default.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn base(&self) -> &PluginBase;

    fn base_mut(&mut self) -> &mut PluginBase;

    /// One-time setup: register commands, acquire resources. Called at most
    /// once, before the plugin is shared. `Ok(false)` or `Err` keeps the
    /// plugin out of the registry.
    async fn initialize(&mut self) -> anyhow::Result<bool>;

    /// Handle a command this plugin accepted in [`Plugin::validate_command`].
    ///
    /// Expected failures (bad input, division by zero) are `Ok` responses
    /// with `success: false`. Faults should go through
    /// [`Plugin::handle_error`]; an `Err` that escapes is converted by the
    /// registry instead.
    async fn process_command(
        &self,
        command: &str,
        context: Option<&CommandContext>,
    ) -> anyhow::Result<Response>;

    /// Whether any registered pattern occurs in `command`, ignoring case.
    async fn validate_command(&self, command: &str) -> bool {
        self.base().commands().matches(command)
    }

    /// Release resources. Errors are logged by the registry and never
    /// propagated to the host.
    async fn shutdown(&self) -> anyhow::Result<()> {
        info!(plugin = %self.name(), "plugin shutdown complete");
        Ok(())
    }

    /// Convert a fault into the canonical failure envelope.
    fn handle_error(&self, error: &dyn std::fmt::Display) -> Response {
        let msg = error.to_string();
        error!(plugin = %self.name(), error = %msg, "plugin error");
        Response::failure(format!("Plugin error: {msg}")).with_error(msg)
    }

    fn name(&self) -> &str {
        self.base().name()
    }

    fn is_active(&self) -> bool {
        self.base().is_active()
    }

    fn register_command(&mut self, pattern: &str, description: &str) {
        self.base_mut().register_command(pattern, description);
    }

    fn get_commands(&self) -> &CommandTable {
        self.base().commands()
    }

    fn get_info(&self) -> PluginInfo {
        self.base().info()
    }
}

/// Builds a plugin bound to the host. Closures and fn pointers of the
/// matching shape implement this.
pub trait PluginFactory: Send + Sync {
    fn create(&self, host: Arc<dyn PluginHost>) -> anyhow::Result<Box<dyn Plugin>>;
}

impl<F> PluginFactory for F
where
    F: Fn(Arc<dyn PluginHost>) -> anyhow::Result<Box<dyn Plugin>> + Send + Sync,
{
    fn create(&self, host: Arc<dyn PluginHost>) -> anyhow::Result<Box<dyn Plugin>> {
        self(host)
    }
}
