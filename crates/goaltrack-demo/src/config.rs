//! Demo backend configuration

use std::time::Duration;

/// Round-trip delay the demo backend pretends to have
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoConfig {
    /// Awaited before each operation, never while state is being mutated
    pub latency: Duration,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
        }
    }
}

impl DemoConfig {
    /// No simulated latency; used by tests
    pub fn instant() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency_ms(ms: u64) -> Self {
        Self {
            latency: Duration::from_millis(ms),
        }
    }
}
