//! Registry of loaded plugins and the command dispatcher.
//!
//! The registry owns two ordered collections: loaded plugins in load order,
//! and the active identities in activation order. Dispatch walks a snapshot
//! of the active list, so a plugin may call back into the manager (for
//! example to deactivate itself) without disturbing the pass in flight.
//!
//! No fault inside a plugin crosses this boundary. Lifecycle operations
//! report `false`, dispatch returns a failure [`Response`].

use std::{panic::AssertUnwindSafe, sync::Arc};

use {
    futures::FutureExt,
    jarvis_common::{CommandContext, PluginError, PluginInfo, Response},
    tokio::sync::RwLock,
    tracing::{debug, error, info, warn},
};

use crate::{
    commands::CommandTable,
    host::PluginHost,
    plugin::{Plugin, PluginFactory},
};

struct LoadedPlugin {
    name: String,
    plugin: Arc<dyn Plugin>,
}

#[derive(Default)]
struct RegistryState {
    /// Load order. Names are unique.
    units: Vec<LoadedPlugin>,
    /// Activation order. Every entry names a member of `units`.
    active: Vec<String>,
}

impl RegistryState {
    fn position(&self, name: &str) -> Option<usize> {
        self.units.iter().position(|u| u.name == name)
    }

    fn get(&self, name: &str) -> Option<&Arc<dyn Plugin>> {
        self.units.iter().find(|u| u.name == name).map(|u| &u.plugin)
    }

    fn is_active(&self, name: &str) -> bool {
        self.active.iter().any(|a| a == name)
    }
}

/// Loads, activates and dispatches to plugins.
pub struct PluginManager {
    host: Arc<dyn PluginHost>,
    state: RwLock<RegistryState>,
}

impl PluginManager {
    pub fn new(host: Arc<dyn PluginHost>) -> Self {
        Self {
            host,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Construct a plugin through `factory` and initialize it.
    ///
    /// On success the plugin is stored under its name. A plugin already
    /// loaded under that name is replaced in place and shut down; if its
    /// name was active, the replacement inherits that slot in the dispatch
    /// order. Any failure leaves the registry untouched.
    pub async fn load_plugin<F: PluginFactory>(&self, factory: F) -> bool {
        let host = Arc::clone(&self.host);
        let mut plugin = match std::panic::catch_unwind(AssertUnwindSafe(|| factory.create(host)))
        {
            Ok(Ok(plugin)) => plugin,
            Ok(Err(e)) => {
                error!(error = %e, "error constructing plugin");
                return false;
            },
            Err(payload) => {
                let err = PluginError::from_panic(payload);
                error!(error = %err, "plugin constructor panicked");
                return false;
            },
        };

        let name = plugin.name().to_string();
        let outcome = AssertUnwindSafe(plugin.initialize()).catch_unwind().await;
        let failure = match outcome {
            Ok(Ok(true)) => None,
            Ok(Ok(false)) => Some(PluginError::initialization(&name, "initialize returned false")),
            Ok(Err(e)) => Some(PluginError::initialization(&name, e)),
            Err(payload) => Some(PluginError::initialization(
                &name,
                PluginError::from_panic(payload),
            )),
        };
        if let Some(err) = failure {
            error!(plugin = %name, error = %err, "failed to initialize plugin");
            return false;
        }

        let plugin: Arc<dyn Plugin> = Arc::from(plugin);
        let replaced = {
            let mut state = self.state.write().await;
            plugin.base().set_active(state.is_active(&name));
            match state.position(&name) {
                Some(idx) => Some(std::mem::replace(
                    &mut state.units[idx].plugin,
                    Arc::clone(&plugin),
                )),
                None => {
                    state.units.push(LoadedPlugin {
                        name: name.clone(),
                        plugin,
                    });
                    None
                },
            }
        };

        if let Some(old) = replaced {
            warn!(plugin = %name, "plugin already loaded, replacing previous instance");
            shutdown_plugin(old.as_ref()).await;
        }
        info!(plugin = %name, "plugin loaded successfully");
        true
    }

    /// Shut down and forget a plugin. `false` if the name is unknown.
    pub async fn unload_plugin(&self, name: &str) -> bool {
        let removed = {
            let mut state = self.state.write().await;
            let Some(idx) = state.position(name) else {
                debug!(error = %PluginError::UnknownIdentity(name.to_string()), "unload ignored");
                return false;
            };
            state.active.retain(|a| a != name);
            state.units.remove(idx)
        };

        shutdown_plugin(removed.plugin.as_ref()).await;
        info!(plugin = %name, "plugin unloaded successfully");
        true
    }

    /// Add a loaded plugin to the end of the dispatch order. Activating an
    /// already active plugin keeps its position and returns `true`.
    pub async fn activate_plugin(&self, name: &str) -> bool {
        let mut state = self.state.write().await;
        let Some(plugin) = state.get(name).map(Arc::clone) else {
            debug!(error = %PluginError::UnknownIdentity(name.to_string()), "activate ignored");
            return false;
        };
        if !state.is_active(name) {
            state.active.push(name.to_string());
        }
        plugin.base().set_active(true);
        info!(plugin = %name, "plugin activated");
        true
    }

    /// Remove a plugin from the dispatch order. `false` if the name is
    /// unknown or not currently active; neither case changes anything.
    pub async fn deactivate_plugin(&self, name: &str) -> bool {
        let mut state = self.state.write().await;
        let Some(plugin) = state.get(name).map(Arc::clone) else {
            debug!(error = %PluginError::UnknownIdentity(name.to_string()), "deactivate ignored");
            return false;
        };
        let Some(idx) = state.active.iter().position(|a| a == name) else {
            debug!(plugin = %name, "plugin already inactive");
            return false;
        };
        state.active.remove(idx);
        plugin.base().set_active(false);
        info!(plugin = %name, "plugin deactivated");
        true
    }

    /// Route `command` to the first active plugin, in activation order,
    /// whose `validate_command` accepts it.
    pub async fn process_command(
        &self,
        command: &str,
        context: Option<&CommandContext>,
    ) -> Response {
        let snapshot = self.active_snapshot().await;

        for plugin in snapshot {
            let accepted = match AssertUnwindSafe(plugin.validate_command(command))
                .catch_unwind()
                .await
            {
                Ok(accepted) => accepted,
                Err(payload) => {
                    let err = PluginError::from_panic(payload);
                    error!(plugin = %plugin.name(), error = %err, "plugin panicked validating command");
                    return Response::plugin_fault(err);
                },
            };
            if !accepted {
                continue;
            }

            debug!(plugin = %plugin.name(), "dispatching command");
            return match AssertUnwindSafe(plugin.process_command(command, context))
                .catch_unwind()
                .await
            {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    let err = PluginError::from(e);
                    warn!(plugin = %plugin.name(), error = %err, "error processing command through plugin");
                    Response::plugin_fault(err)
                },
                Err(payload) => {
                    let err = PluginError::from_panic(payload);
                    error!(plugin = %plugin.name(), error = %err, "plugin panicked processing command");
                    Response::plugin_fault(err)
                },
            };
        }

        debug!(command, "no plugin available to handle command");
        Response::no_handler()
    }

    async fn active_snapshot(&self) -> Vec<Arc<dyn Plugin>> {
        let state = self.state.read().await;
        state
            .active
            .iter()
            .filter_map(|name| state.get(name).map(Arc::clone))
            .collect()
    }

    /// Active plugin names in dispatch order.
    pub async fn get_active_plugins(&self) -> Vec<String> {
        self.state.read().await.active.clone()
    }

    /// Info for every loaded plugin, in load order.
    pub async fn get_available_plugins(&self) -> Vec<PluginInfo> {
        let state = self.state.read().await;
        state
            .units
            .iter()
            .map(|u| PluginInfo {
                active: state.is_active(&u.name),
                ..u.plugin.get_info()
            })
            .collect()
    }

    /// Command tables of the active plugins, in dispatch order.
    ///
    /// This is the `name -> (pattern -> description)` mapping, kept as
    /// ordered pairs so callers see the order dispatch consults plugins in.
    /// Each [`CommandTable`] serializes as a JSON object.
    pub async fn get_plugin_commands(&self) -> Vec<(String, CommandTable)> {
        let state = self.state.read().await;
        state
            .active
            .iter()
            .filter_map(|name| {
                state
                    .get(name)
                    .map(|p| (name.clone(), p.get_commands().clone()))
            })
            .collect()
    }

    pub async fn get_plugin_info(&self, name: &str) -> Option<PluginInfo> {
        let state = self.state.read().await;
        state.get(name).map(|p| PluginInfo {
            active: state.is_active(name),
            ..p.get_info()
        })
    }

    pub async fn is_active(&self, name: &str) -> bool {
        self.state.read().await.is_active(name)
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.units.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.units.is_empty()
    }

    /// Shut down every plugin and empty the registry. A failing plugin does
    /// not stop the others from being shut down.
    pub async fn shutdown(&self) {
        let units = {
            let mut state = self.state.write().await;
            state.active.clear();
            std::mem::take(&mut state.units)
        };
        for unit in &units {
            shutdown_plugin(unit.plugin.as_ref()).await;
        }
        info!(count = units.len(), "all plugins shutdown complete");
    }
}

/// Run a plugin's shutdown, swallowing errors and panics.
async fn shutdown_plugin(plugin: &dyn Plugin) {
    match AssertUnwindSafe(plugin.shutdown()).catch_unwind().await {
        Ok(Ok(())) => {},
        Ok(Err(e)) => {
            warn!(plugin = %plugin.name(), error = %e, "error during plugin shutdown");
        },
        Err(payload) => {
            let err = PluginError::from_panic(payload);
            error!(plugin = %plugin.name(), error = %err, "plugin panicked during shutdown");
        },
    }
    plugin.base().set_active(false);
}
