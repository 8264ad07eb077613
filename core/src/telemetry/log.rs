use log::{info, warn};

/// Audit trail for one storm session; every message carries the storm id.
#[derive(Debug, Clone)]
pub struct LogManager {
    prefix: String,
}

impl LogManager {
    pub fn new(storm_id: &str) -> Self {
        Self {
            prefix: format!("[{}]", storm_id),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn format(&self, message: &str) -> String {
        format!("{} {}", self.prefix, message)
    }

    pub fn record(&self, message: &str) {
        info!("{}", self.format(message));
    }

    pub fn caution(&self, message: &str) {
        warn!("{}", self.format(message));
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("storm")
    }
}
