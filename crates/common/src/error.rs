use thiserror::Error;

/// Failures a capability unit can produce at the registry boundary.
///
/// None of these ever reach the host as an error value: lifecycle operations
/// collapse them into `false`, dispatch collapses them into a failure
/// [`Response`](crate::Response).
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("failed to initialize plugin {name}: {reason}")]
    Initialization { name: String, reason: String },

    #[error("{0}")]
    Processing(String),

    #[error("unknown plugin: {0}")]
    UnknownIdentity(String),

    #[error("panicked: {0}")]
    Panicked(String),
}

impl PluginError {
    pub fn initialization(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Initialization {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`PluginError::Panicked`] from a `catch_unwind` payload.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else {
            "unknown panic".to_string()
        };
        Self::Panicked(msg)
    }
}

impl From<anyhow::Error> for PluginError {
    fn from(err: anyhow::Error) -> Self {
        Self::Processing(err.to_string())
    }
}
