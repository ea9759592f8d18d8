//! Built-in plugins and the name → factory catalog used at startup.

mod calculator;
mod joke;
mod time;

use std::sync::Arc;

use {
    jarvis_config::PluginsConfig,
    tracing::{info, warn},
};

use crate::{host::PluginHost, manager::PluginManager, plugin::Plugin};

pub use {calculator::CalculatorPlugin, joke::JOKES, joke::JokePlugin, time::TimePlugin};

pub type BuiltinFactory = fn(Arc<dyn PluginHost>) -> anyhow::Result<Box<dyn Plugin>>;

fn make_joke(host: Arc<dyn PluginHost>) -> anyhow::Result<Box<dyn Plugin>> {
    Ok(Box::new(JokePlugin::new(host)))
}

fn make_time(host: Arc<dyn PluginHost>) -> anyhow::Result<Box<dyn Plugin>> {
    Ok(Box::new(TimePlugin::new(host)?))
}

fn make_calculator(host: Arc<dyn PluginHost>) -> anyhow::Result<Box<dyn Plugin>> {
    Ok(Box::new(CalculatorPlugin::new(host)?))
}

const BUILTINS: &[(&str, BuiltinFactory)] = &[
    ("JokePlugin", make_joke),
    ("TimePlugin", make_time),
    ("CalculatorPlugin", make_calculator),
];

/// Every built-in plugin, keyed by identity.
pub fn catalog() -> &'static [(&'static str, BuiltinFactory)] {
    BUILTINS
}

pub fn factory(name: &str) -> Option<BuiltinFactory> {
    catalog()
        .iter()
        .find(|(id, _)| *id == name)
        .map(|(_, f)| *f)
}

/// Load the plugins named by `config`, in order, activating each when
/// `activate_on_load` is set. Unknown names and failed loads are logged and
/// skipped. Returns the identities that loaded.
pub async fn load_builtin_plugins(manager: &PluginManager, config: &PluginsConfig) -> Vec<String> {
    let mut loaded = Vec::new();
    for name in config.effective() {
        let Some(factory) = factory(name) else {
            warn!(plugin = %name, "unknown built-in plugin, skipping");
            continue;
        };
        if !manager.load_plugin(factory).await {
            continue;
        }
        if config.activate_on_load {
            manager.activate_plugin(name).await;
        }
        loaded.push(name.to_string());
    }
    info!(count = loaded.len(), "built-in plugins loaded");
    loaded
}

#[cfg(test)]
mod tests {
    use {super::*, crate::host::StaticHost};

    fn manager() -> PluginManager {
        PluginManager::new(Arc::new(StaticHost::default()))
    }

    #[tokio::test]
    async fn catalog_names_match_plugin_identities() {
        let mgr = manager();
        for (name, f) in catalog() {
            assert!(mgr.load_plugin(*f).await);
            assert!(mgr.get_plugin_info(name).await.is_some(), "{name}");
        }
    }

    #[tokio::test]
    async fn loads_from_config_in_order() {
        let mgr = manager();
        let cfg = PluginsConfig {
            enabled: vec![
                "CalculatorPlugin".into(),
                "NoSuchPlugin".into(),
                "JokePlugin".into(),
                "TimePlugin".into(),
            ],
            disabled: vec!["TimePlugin".into()],
            ..Default::default()
        };

        let loaded = load_builtin_plugins(&mgr, &cfg).await;

        assert_eq!(loaded, vec!["CalculatorPlugin", "JokePlugin"]);
        assert_eq!(mgr.get_active_plugins().await, loaded);
    }

    #[tokio::test]
    async fn activate_on_load_off_leaves_plugins_inactive() {
        let mgr = manager();
        let cfg = PluginsConfig {
            activate_on_load: false,
            ..Default::default()
        };

        assert_eq!(load_builtin_plugins(&mgr, &cfg).await.len(), 3);
        assert!(mgr.get_active_plugins().await.is_empty());
    }

    #[tokio::test]
    async fn dispatches_to_builtins() {
        let mgr = manager();
        load_builtin_plugins(&mgr, &PluginsConfig::default()).await;

        let joke = mgr.process_command("tell me a joke", None).await;
        assert!(joke.success);
        assert!(JOKES.contains(&joke.message.as_str()));

        let time = mgr.process_command("what's the time", None).await;
        assert!(time.success);
        assert_eq!(time.kind.as_deref(), Some("time"));

        let sum = mgr.process_command("calculate 10 + 5", None).await;
        assert!(sum.success);
        assert!(sum.message.contains("15"));

        let zero = mgr.process_command("calculate 5 / 0", None).await;
        assert!(!zero.success);
        assert!(zero.message.contains("divide by zero"));

        let miss = mgr.process_command("open the pod bay doors", None).await;
        assert!(!miss.success);
        assert_eq!(miss.message, "No plugin available to handle this command");
    }
}
