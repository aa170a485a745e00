// Application Layer - Use Cases and Business Logic

pub mod activity_criterion;
pub mod constants;
pub mod cron;
pub mod shutdown;
pub mod text;

// Re-exports
pub use activity_criterion::{
    ActivityCriteria, ActivityCriterionEvaluator, CompletionPorts, CriterionDetails,
    CriterionEvaluator, ReportConfig,
};
pub use cron::{CriteriaSweep, CronReport, CronScheduler};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
