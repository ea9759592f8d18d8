use std::sync::Arc;

use {
    async_trait::async_trait,
    jarvis_common::{CommandContext, Response},
    regex::Regex,
    tracing::info,
};

use crate::{
    host::PluginHost,
    plugin::{Plugin, PluginBase},
};

/// Evaluates a single `a <op> b` expression over non-negative integers.
pub struct CalculatorPlugin {
    base: PluginBase,
    host: Arc<dyn PluginHost>,
    expr: Regex,
}

impl CalculatorPlugin {
    pub fn new(host: Arc<dyn PluginHost>) -> anyhow::Result<Self> {
        Ok(Self {
            base: PluginBase::for_type::<Self>().with_metadata(
                "Performs basic calculations",
                "1.0.0",
                "Jarvis Team",
            ),
            host,
            expr: Regex::new(r"([0-9]+)\s*([+\-*/])\s*([0-9]+)")?,
        })
    }

    fn evaluate(&self, command: &str) -> anyhow::Result<Response> {
        let Some(caps) = self.expr.captures(command) else {
            return Ok(Response::failure("I couldn't understand the calculation")
                .with_type("error")
                .with_timestamp());
        };

        let lhs: f64 = caps[1].parse()?;
        let rhs: f64 = caps[3].parse()?;
        let result = match &caps[2] {
            "+" => lhs + rhs,
            "-" => lhs - rhs,
            "*" => lhs * rhs,
            "/" if rhs == 0.0 => {
                return Ok(Response::failure("Cannot divide by zero")
                    .with_type("error")
                    .with_timestamp());
            },
            "/" => lhs / rhs,
            other => anyhow::bail!("unsupported operator {other}"),
        };

        Ok(Response::ok(format!("The result is {result}"))
            .with_type("calculation")
            .with_field("result", result)
            .with_timestamp())
    }
}

#[async_trait]
impl Plugin for CalculatorPlugin {
    fn base(&self) -> &PluginBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PluginBase {
        &mut self.base
    }

    async fn initialize(&mut self) -> anyhow::Result<bool> {
        self.register_command("calculate", "Performs a calculation");
        self.register_command(r"what('s| is) \d+( )?[+\-*/]( )?\d+", "Performs a calculation");
        info!(plugin = %self.name(), assistant = %self.host.assistant_name(), "plugin initialized");
        Ok(true)
    }

    async fn process_command(
        &self,
        command: &str,
        _context: Option<&CommandContext>,
    ) -> anyhow::Result<Response> {
        Ok(self
            .evaluate(command)
            .unwrap_or_else(|e| self.handle_error(&e)))
    }
}
