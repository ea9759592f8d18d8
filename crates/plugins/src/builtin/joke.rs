use std::sync::Arc;

use {
    async_trait::async_trait,
    jarvis_common::{CommandContext, Response},
    rand::seq::IndexedRandom,
    tracing::info,
};

use crate::{
    host::PluginHost,
    plugin::{Plugin, PluginBase},
};

pub const JOKES: &[&str] = &[
    "Why don't programmers like nature? It has too many bugs!",
    "What do you call a bear with no teeth? A gummy bear!",
    "Why don't scientists trust atoms? Because they make up everything!",
    "What do you call fake spaghetti? An impasta!",
    "Why did the scarecrow win an award? He was outstanding in his field!",
];

/// Tells a random joke from a fixed list.
pub struct JokePlugin {
    base: PluginBase,
    host: Arc<dyn PluginHost>,
}

impl JokePlugin {
    pub fn new(host: Arc<dyn PluginHost>) -> Self {
        Self {
            base: PluginBase::for_type::<Self>().with_metadata(
                "Tells random jokes",
                "1.0.0",
                "Jarvis Team",
            ),
            host,
        }
    }

    fn pick() -> &'static str {
        JOKES.choose(&mut rand::rng()).copied().unwrap_or(JOKES[0])
    }
}

#[async_trait]
impl Plugin for JokePlugin {
    fn base(&self) -> &PluginBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PluginBase {
        &mut self.base
    }

    async fn initialize(&mut self) -> anyhow::Result<bool> {
        self.register_command("tell (me )?(a )?joke", "Tells a random joke");
        self.register_command("make me laugh", "Tells a random joke");
        // The entries above are matched literally; this one catches
        // "tell me a joke" and friends.
        self.register_command("joke", "Tells a random joke");
        info!(plugin = %self.name(), assistant = %self.host.assistant_name(), "plugin initialized");
        Ok(true)
    }

    async fn process_command(
        &self,
        _command: &str,
        _context: Option<&CommandContext>,
    ) -> anyhow::Result<Response> {
        Ok(Response::ok(Self::pick())
            .with_type("joke")
            .with_timestamp())
    }
}
