// Broker constants (no magic values)
use std::time::Duration;

/// Default get wait when the request carries no timeout (24h)
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(86_400);

/// Default max queue count (0 = unbounded)
pub const DEFAULT_MAX_QUEUES: usize = 0;

/// Default max stored messages per queue (0 = unbounded)
pub const DEFAULT_MAX_MESSAGES: usize = 0;
