//! Completion by activity
//!
//! A learner satisfies an activity criterion once the tracked course module
//! reaches `Complete` or `CompletePass` for them. `ActivityCriteria` holds
//! the type-level operations (configuration, module-type lookups, the cron
//! sweep); `ActivityCriterionEvaluator` binds one stored criterion and
//! implements the `CriterionEvaluator` contract the host dispatches to.

use crate::application::constants::{DEFAULT_WWWROOT, DETAILED_TITLE_LENGTH, STRINGS_COMPONENT};
use crate::application::cron::{CriteriaSweep, CronReport};
use crate::application::text::{shorten_text, urldecode};
use crate::domain::{
    Activity, ActivityCriterion, CompletionCriterion, CompletionTracking, CourseModule,
    CriteriaCompletion, CriteriaFilter, CriteriaId, CriteriaType,
};
use crate::error::{AppError, Result};
use crate::port::{
    CompletionInfo, CourseRepository, CriteriaCompletionRepository, CriteriaRepository,
    StringProvider, TimeProvider,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Criterion contract exposed to the host's criteria dispatcher
#[async_trait]
pub trait CriterionEvaluator: Send + Sync {
    /// Decide whether the user owning `completion` satisfies the criterion.
    /// When satisfied and `mark` is set, the record is marked complete and
    /// saved.
    async fn review(&self, completion: &mut CriteriaCompletion, mark: bool) -> Result<bool>;

    /// Record completion for every user already satisfying criteria of
    /// this type
    async fn cron(&self) -> Result<CronReport>;

    /// Criterion title for reports
    fn get_title(&self) -> String;

    /// Detailed criterion title for reports
    async fn get_title_detailed(&self) -> Result<String>;

    /// Criterion type title for reports
    fn get_type_title(&self) -> String;

    /// Progress details for the user owning `completion`
    async fn get_details(&self, completion: &CriteriaCompletion) -> Result<CriterionDetails>;
}

/// Report row describing a criterion and what it requires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionDetails {
    #[serde(rename = "type")]
    pub type_title: String,
    pub criteria: String,
    pub requirement: String,
    pub status: String,
}

/// Report rendering settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Site root used to build activity links (no trailing slash)
    pub wwwroot: String,
}

impl ReportConfig {
    pub fn new(wwwroot: impl Into<String>) -> Self {
        let wwwroot = wwwroot.into();
        Self {
            wwwroot: wwwroot.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WWWROOT)
    }
}

/// Adapters the activity criterion reads from and writes to
#[derive(Clone)]
pub struct CompletionPorts {
    pub criteria: Arc<dyn CriteriaRepository>,
    pub completions: Arc<dyn CriteriaCompletionRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub completion_info: Arc<dyn CompletionInfo>,
    pub strings: Arc<dyn StringProvider>,
    pub time_provider: Arc<dyn TimeProvider>,
}

/// Type-level operations for activity criteria
pub struct ActivityCriteria {
    ports: CompletionPorts,
    report: ReportConfig,
    module_types: OnceCell<HashMap<i64, String>>,
}

impl ActivityCriteria {
    pub fn new(ports: CompletionPorts, report: ReportConfig) -> Self {
        Self {
            ports,
            report,
            module_types: OnceCell::new(),
        }
    }

    /// Stored activity criteria matching `filter`.
    ///
    /// The criteria type of the filter is always forced to `Activity`.
    pub async fn fetch(&self, filter: CriteriaFilter) -> Result<Vec<CompletionCriterion>> {
        let filter = CriteriaFilter {
            criteria_type: Some(CriteriaType::Activity),
            ..filter
        };
        self.ports.criteria.fetch(&filter).await
    }

    /// Bind a stored activity criterion to an evaluator
    pub fn evaluator(
        self: &Arc<Self>,
        criterion: CompletionCriterion,
    ) -> Result<ActivityCriterionEvaluator> {
        let criterion = ActivityCriterion::try_from(criterion)?;
        Ok(ActivityCriterionEvaluator {
            criterion,
            criteria: Arc::clone(self),
        })
    }

    /// Create one activity criterion per selected course module.
    ///
    /// Returns the new criteria IDs in selection order. An empty selection
    /// writes nothing.
    pub async fn update_config(
        &self,
        course: i64,
        selected_course_modules: &[i64],
    ) -> Result<Vec<CriteriaId>> {
        let mut created = Vec::with_capacity(selected_course_modules.len());

        for &cm_id in selected_course_modules {
            let cm = self.find_course_module(cm_id).await?;
            let module = self.get_mod_name(cm.module).await?;

            let criterion = CompletionCriterion::activity(course, module.as_str(), cm_id);
            let id = self.ports.criteria.insert(&criterion).await?;

            info!(
                criteria_id = id,
                course = course,
                course_module = cm_id,
                module = %module,
                "Activity criterion created"
            );
            created.push(id);
        }

        Ok(created)
    }

    /// Name of a module type (e.g. `quiz`).
    ///
    /// The module-type registry is loaded once and cached.
    pub async fn get_mod_name(&self, module_type: i64) -> Result<String> {
        let types = self
            .module_types
            .get_or_try_init(|| async {
                let types = self.ports.courses.list_module_types().await?;
                debug!(count = types.len(), "Module type registry loaded");
                Ok::<_, AppError>(
                    types
                        .into_iter()
                        .map(|t| (t.id, t.name))
                        .collect::<HashMap<_, _>>(),
                )
            })
            .await?;

        types
            .get(&module_type)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Module type {} not found", module_type)))
    }

    /// Record completion for every (criterion, user) pair whose tracked
    /// activity is already complete and which has no completed record.
    ///
    /// Each record takes the activity's completion time. Safe to rerun.
    pub async fn cron(&self) -> Result<CronReport> {
        let pending = self
            .ports
            .completions
            .find_pending_activity_completions()
            .await?;

        let mut report = CronReport {
            found: pending.len(),
            marked: 0,
        };

        for pair in pending {
            let (mut completion, time_completed) = pair.into_completion();
            if !completion.mark_complete(time_completed) {
                continue;
            }

            if self.ports.completions.save(&completion).await? {
                debug!(
                    criteria_id = completion.criteria_id,
                    user_id = completion.user_id,
                    time_completed = time_completed,
                    "Activity criterion marked complete"
                );
                report.marked += 1;
            }
        }

        info!(
            found = report.found,
            marked = report.marked,
            "Activity completion sweep finished"
        );
        Ok(report)
    }

    async fn find_course_module(&self, id: i64) -> Result<CourseModule> {
        self.ports
            .courses
            .find_course_module(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course module {} not found", id)))
    }

    fn string(&self, identifier: &str, arg: Option<&str>) -> String {
        self.ports
            .strings
            .get_string(identifier, STRINGS_COMPONENT, arg)
    }
}

#[async_trait]
impl CriteriaSweep for ActivityCriteria {
    fn criteria_type(&self) -> CriteriaType {
        CriteriaType::Activity
    }

    async fn cron(&self) -> Result<CronReport> {
        ActivityCriteria::cron(self).await
    }
}

/// One stored activity criterion, ready to evaluate
pub struct ActivityCriterionEvaluator {
    criterion: ActivityCriterion,
    criteria: Arc<ActivityCriteria>,
}

impl ActivityCriterionEvaluator {
    pub fn criterion(&self) -> &ActivityCriterion {
        &self.criterion
    }

    /// The tracked activity instance, if its course module and record exist
    pub async fn get_mod_instance(&self) -> Result<Option<Activity>> {
        let ports = &self.criteria.ports;
        let Some(cm) = ports
            .courses
            .find_course_module(self.criterion.module_instance)
            .await?
        else {
            return Ok(None);
        };

        ports
            .courses
            .find_activity(&self.criterion.module, cm.instance)
            .await
    }

    async fn tracked_activity(&self) -> Result<(CourseModule, Activity)> {
        let cm = self
            .criteria
            .find_course_module(self.criterion.module_instance)
            .await?;
        let activity = self
            .criteria
            .ports
            .courses
            .find_activity(&self.criterion.module, cm.instance)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Activity {} {} not found",
                    self.criterion.module, cm.instance
                ))
            })?;
        Ok((cm, activity))
    }

    fn requirements(&self, cm: &CourseModule) -> Vec<String> {
        let mut requirements = Vec::new();

        match cm.completion {
            CompletionTracking::Manual => {
                requirements.push(self.criteria.string("markingyourselfcomplete", None));
            }
            CompletionTracking::Automatic => {
                if cm.completion_view {
                    requirements.push(
                        self.criteria
                            .string("viewingactivity", Some(self.criterion.module.as_str())),
                    );
                }
                if matches!(cm.completion_grade_item_number, Some(n) if n != 0) {
                    requirements.push(self.criteria.string("achievinggrade", None));
                }
            }
            CompletionTracking::None => {}
        }

        requirements
    }
}

#[async_trait]
impl CriterionEvaluator for ActivityCriterionEvaluator {
    async fn review(&self, completion: &mut CriteriaCompletion, mark: bool) -> Result<bool> {
        let ports = &self.criteria.ports;

        ports
            .courses
            .find_course(completion.course)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course {} not found", completion.course)))?;
        let cm = self
            .criteria
            .find_course_module(self.criterion.module_instance)
            .await?;

        let data = ports
            .completion_info
            .get_data(&cm, completion.user_id)
            .await?;

        if !data.state.is_complete() {
            debug!(
                criteria_id = self.criterion.id,
                user_id = completion.user_id,
                state = %data.state,
                "Activity not complete"
            );
            return Ok(false);
        }

        if mark && completion.mark_complete(ports.time_provider.now_secs()) {
            if ports.completions.save(completion).await? {
                debug!(
                    criteria_id = self.criterion.id,
                    user_id = completion.user_id,
                    "Activity criterion marked complete on review"
                );
            } else {
                debug!(
                    criteria_id = self.criterion.id,
                    user_id = completion.user_id,
                    "Activity criterion already complete"
                );
            }

            // the stored row wins: it carries the id and the first completion time
            if let Some(stored) = ports
                .completions
                .find(completion.user_id, completion.criteria_id)
                .await?
            {
                completion.id = stored.id;
                completion.time_completed = stored.time_completed;
            }
        }

        Ok(true)
    }

    async fn cron(&self) -> Result<CronReport> {
        self.criteria.cron().await
    }

    fn get_title(&self) -> String {
        self.criteria.string("activitiescompleted", None)
    }

    async fn get_title_detailed(&self) -> Result<String> {
        let (_, activity) = self.tracked_activity().await?;
        Ok(shorten_text(&urldecode(&activity.name), DETAILED_TITLE_LENGTH))
    }

    fn get_type_title(&self) -> String {
        self.criteria.string("activities", None)
    }

    async fn get_details(&self, _completion: &CriteriaCompletion) -> Result<CriterionDetails> {
        let (cm, activity) = self.tracked_activity().await?;

        let criteria = format!(
            "<a href=\"{}/mod/{}/view.php?id={}\">{}</a>",
            self.criteria.report.wwwroot,
            self.criterion.module,
            self.criterion.module_instance,
            activity.name
        );

        Ok(CriterionDetails {
            type_title: self.get_title(),
            criteria,
            requirement: self.requirements(&cm).join(", "),
            status: String::new(),
        })
    }
}
