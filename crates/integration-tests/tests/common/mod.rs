//! Shared fixture: an in-memory LMS with two courses.
//!
//! - course 1 "Operating Systems", completion enabled
//!   - cm 11: quiz 1 "Scheduling+Quiz", automatic (view + grade)
//!   - cm 12: assign 1 "Shell%20Assignment", manual
//! - course 2 "Archived Course", completion disabled
//!   - cm 21: quiz 2 "Old Quiz", automatic (view)

#![allow(dead_code)]

use std::sync::Arc;

use completion_core::application::{ActivityCriteria, ActivityCriterionEvaluator, ReportConfig};
use completion_core::domain::{CompletionState, CriteriaFilter, CriteriaId};
use completion_core::port::time_provider::FixedTimeProvider;
use completion_core::port::EnglishStrings;
use completion_infra_sqlite::{create_pool, run_migrations, sqlite_ports};
use sqlx::SqlitePool;

pub const NOW: i64 = 1_750_000_000;
pub const WWWROOT: &str = "https://lms.example.edu";

pub const COURSE: i64 = 1;
pub const ARCHIVED_COURSE: i64 = 2;
pub const CM_QUIZ: i64 = 11;
pub const CM_ASSIGN: i64 = 12;
pub const CM_OLD_QUIZ: i64 = 21;

pub struct Lms {
    pub pool: SqlitePool,
    pub criteria: Arc<ActivityCriteria>,
}

pub async fn setup() -> Lms {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    for sql in [
        "INSERT INTO course (id, fullname, enablecompletion) VALUES (1, 'Operating Systems', 1), (2, 'Archived Course', 0)",
        "INSERT INTO modules (id, name) VALUES (1, 'quiz'), (2, 'assign')",
        "INSERT INTO course_modules (id, course, module, instance, completion, completionview, completiongradeitemnumber) VALUES \
            (11, 1, 1, 1, 2, 1, 1), \
            (12, 1, 2, 1, 1, 0, NULL), \
            (21, 2, 1, 2, 2, 1, NULL)",
        "INSERT INTO activities (module, id, name) VALUES \
            ('quiz', 1, 'Scheduling+Quiz'), \
            ('assign', 1, 'Shell%20Assignment'), \
            ('quiz', 2, 'Old Quiz')",
    ] {
        sqlx::query(sql).execute(&pool).await.unwrap();
    }

    let ports = sqlite_ports(
        pool.clone(),
        Arc::new(EnglishStrings),
        Arc::new(FixedTimeProvider(NOW)),
    );
    let criteria = Arc::new(ActivityCriteria::new(ports, ReportConfig::new(WWWROOT)));

    Lms { pool, criteria }
}

impl Lms {
    /// Create an activity criterion tracking `course_module`
    pub async fn add_criterion(&self, course: i64, course_module: i64) -> CriteriaId {
        let ids = self
            .criteria
            .update_config(course, &[course_module])
            .await
            .unwrap();
        ids[0]
    }

    /// Load a stored criterion and bind it to an evaluator
    pub async fn evaluator(&self, criteria_id: CriteriaId) -> ActivityCriterionEvaluator {
        let mut found = self
            .criteria
            .fetch(CriteriaFilter {
                id: Some(criteria_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1, "criterion {} should exist", criteria_id);
        self.criteria.evaluator(found.remove(0)).unwrap()
    }

    pub async fn enrol(&self, course: i64, user_id: i64, role: &str) {
        sqlx::query("INSERT INTO course_enrolments (course, userid, role) VALUES (?, ?, ?)")
            .bind(course)
            .bind(user_id)
            .bind(role)
            .execute(&self.pool)
            .await
            .unwrap();
    }

    pub async fn set_state(
        &self,
        course_module: i64,
        user_id: i64,
        state: CompletionState,
        time_modified: i64,
    ) {
        sqlx::query(
            r#"
            INSERT INTO course_modules_completion (coursemoduleid, userid, completionstate, timemodified)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (coursemoduleid, userid) DO UPDATE
            SET completionstate = excluded.completionstate, timemodified = excluded.timemodified
            "#,
        )
        .bind(course_module)
        .bind(user_id)
        .bind(state.as_i32())
        .bind(time_modified)
        .execute(&self.pool)
        .await
        .unwrap();
    }

    pub async fn completion_rows(&self) -> Vec<(i64, i64, Option<i64>)> {
        sqlx::query_as(
            "SELECT criteriaid, userid, timecompleted FROM course_completion_crit_compl ORDER BY criteriaid, userid",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap()
    }
}
