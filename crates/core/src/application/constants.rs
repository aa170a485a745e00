// Application constants (no magic values)
use std::time::Duration;

/// Default interval between cron sweeps (5 minutes)
pub const DEFAULT_CRON_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Length activity names are shortened to in detailed report titles
pub const DETAILED_TITLE_LENGTH: usize = 30;

/// Site root used in report links when none is configured
pub const DEFAULT_WWWROOT: &str = "http://localhost";

/// String component holding the completion report strings
pub const STRINGS_COMPONENT: &str = "completion";
