use std::{sync::Arc, time::Duration};

use {
    jarvis_common::{CommandContext, Response},
    jarvis_config::JarvisConfig,
    jarvis_plugins::{PluginManager, StaticHost, builtin},
    tracing::{info, warn},
};

/// The host: owns the plugin manager for its whole lifetime and feeds it
/// user input.
pub struct Assistant {
    plugins: PluginManager,
    timeout: Option<Duration>,
}

impl Assistant {
    pub async fn start(config: &JarvisConfig) -> Self {
        let host = Arc::new(StaticHost::new(config.assistant.name.clone()));
        let plugins = PluginManager::new(host);
        let loaded = builtin::load_builtin_plugins(&plugins, &config.plugins).await;
        info!(assistant = %config.assistant.name, plugins = ?loaded, "assistant ready");
        Self {
            plugins,
            timeout: config.plugins.dispatch_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn plugins(&self) -> &PluginManager {
        &self.plugins
    }

    /// Dispatch one command, bounded by the configured timeout.
    pub async fn process_command(&self, text: &str, context: Option<&CommandContext>) -> Response {
        let dispatch = self.plugins.process_command(text, context);
        let Some(limit) = self.timeout else {
            return dispatch.await;
        };
        match tokio::time::timeout(limit, dispatch).await {
            Ok(resp) => resp,
            Err(_) => {
                warn!(command = text, timeout_secs = limit.as_secs(), "command timed out");
                Response::failure("Command timed out")
                    .with_type("error")
                    .with_timestamp()
            },
        }
    }

    pub async fn shutdown(&self) {
        self.plugins.shutdown().await;
        info!("assistant shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn routes_through_builtins() {
        let assistant = Assistant::start(&JarvisConfig::default()).await;
        for command in ["tell me a joke", "what's the time", "calculate 10 + 5"] {
            assert!(assistant.process_command(command, None).await.success, "{command}");
        }
        assistant.shutdown().await;
        assert!(assistant.plugins().is_empty().await);
    }

    #[tokio::test]
    async fn timeout_does_not_affect_fast_commands() {
        let mut config = JarvisConfig::default();
        config.plugins.dispatch_timeout_secs = Some(5);
        let assistant = Assistant::start(&config).await;

        let resp = assistant.process_command("calculate 6 * 7", None).await;
        assert!(resp.message.contains("42"));
    }
}
