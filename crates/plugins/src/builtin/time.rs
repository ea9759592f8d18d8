use std::sync::Arc;

use {
    async_trait::async_trait,
    chrono::Local,
    jarvis_common::{CommandContext, Response},
    regex::Regex,
    tracing::info,
};

use crate::{
    host::PluginHost,
    plugin::{Plugin, PluginBase},
};

/// Answers "what's the time" and "what's today's date".
pub struct TimePlugin {
    base: PluginBase,
    host: Arc<dyn PluginHost>,
    time_re: Regex,
    date_re: Regex,
}

impl TimePlugin {
    pub fn new(host: Arc<dyn PluginHost>) -> anyhow::Result<Self> {
        Ok(Self {
            base: PluginBase::for_type::<Self>().with_metadata(
                "Handles time-related commands",
                "1.0.0",
                "Jarvis Team",
            ),
            host,
            time_re: Regex::new(r"(?i)time")?,
            date_re: Regex::new(r"(?i)date")?,
        })
    }
}

#[async_trait]
impl Plugin for TimePlugin {
    fn base(&self) -> &PluginBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PluginBase {
        &mut self.base
    }

    async fn initialize(&mut self) -> anyhow::Result<bool> {
        self.register_command("what('s| is) the time", "Tells the current time");
        self.register_command("what('s| is) today('s| is) date", "Tells today's date");
        self.register_command("time", "Tells the current time");
        self.register_command("date", "Tells today's date");
        info!(plugin = %self.name(), assistant = %self.host.assistant_name(), "plugin initialized");
        Ok(true)
    }

    async fn process_command(
        &self,
        command: &str,
        _context: Option<&CommandContext>,
    ) -> anyhow::Result<Response> {
        let now = Local::now();

        let resp = if self.time_re.is_match(command) {
            Response::ok(format!("The current time is {}", now.format("%I:%M %p"))).with_type("time")
        } else if self.date_re.is_match(command) {
            Response::ok(format!("Today's date is {}", now.format("%B %d, %Y"))).with_type("date")
        } else {
            Response::failure("I don't understand that time-related command").with_type("error")
        };
        Ok(resp.with_timestamp())
    }
}
