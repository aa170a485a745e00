// SQLite completion adapters: activity completion data and criteria
// completion records

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use completion_core::domain::{
    ActivityCompletion, CompletionState, CourseModule, CriteriaCompletion, CriteriaId,
    CriteriaType, PendingCompletion, UserId,
};
use completion_core::error::Result;
use completion_core::port::{CompletionInfo, CriteriaCompletionRepository};
use sqlx::SqlitePool;
use tracing::debug;

pub struct SqliteCompletionRepository {
    pool: SqlitePool,
}

impl SqliteCompletionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompletionInfo for SqliteCompletionRepository {
    async fn get_data(
        &self,
        course_module: &CourseModule,
        user_id: UserId,
    ) -> Result<ActivityCompletion> {
        let row = sqlx::query_as::<_, ModuleCompletionRow>(
            r#"
            SELECT completionstate, timemodified
            FROM course_modules_completion
            WHERE coursemoduleid = ? AND userid = ?
            "#,
        )
        .bind(course_module.id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(match row {
            Some(r) => ActivityCompletion {
                course_module_id: course_module.id,
                user_id,
                state: CompletionState::from_i32(r.completionstate as i32),
                time_modified: r.timemodified,
            },
            None => ActivityCompletion::untracked(course_module.id, user_id),
        })
    }
}

#[async_trait]
impl CriteriaCompletionRepository for SqliteCompletionRepository {
    async fn find(
        &self,
        user_id: UserId,
        criteria_id: CriteriaId,
    ) -> Result<Option<CriteriaCompletion>> {
        let row = sqlx::query_as::<_, CritComplRow>(
            r#"
            SELECT id, userid, course, criteriaid, timecompleted
            FROM course_completion_crit_compl
            WHERE userid = ? AND criteriaid = ?
            "#,
        )
        .bind(user_id)
        .bind(criteria_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|r| CriteriaCompletion {
            id: Some(r.id),
            user_id: r.userid,
            course: r.course,
            criteria_id: r.criteriaid,
            time_completed: r.timecompleted,
        }))
    }

    async fn save(&self, completion: &CriteriaCompletion) -> Result<bool> {
        // Conditional upsert: a completed record keeps its original time
        let result = sqlx::query(
            r#"
            INSERT INTO course_completion_crit_compl (userid, course, criteriaid, timecompleted)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (userid, criteriaid) DO UPDATE
            SET timecompleted = excluded.timecompleted
            WHERE course_completion_crit_compl.timecompleted IS NULL
            "#,
        )
        .bind(completion.user_id)
        .bind(completion.course)
        .bind(completion.criteria_id)
        .bind(completion.time_completed)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let written = result.rows_affected() > 0;
        if !written {
            debug!(
                user_id = completion.user_id,
                criteria_id = completion.criteria_id,
                "Criteria completion already recorded, not overwritten"
            );
        }
        Ok(written)
    }

    async fn find_pending_activity_completions(&self) -> Result<Vec<PendingCompletion>> {
        // Set difference: satisfied (criterion, user) pairs minus completed records.
        // DISTINCT collapses users enrolled with several roles.
        let rows = sqlx::query_as::<_, PendingRow>(
            r#"
            SELECT DISTINCT
                c.id AS course,
                cr.id AS criteriaid,
                e.userid AS userid,
                mc.timemodified AS timecompleted
            FROM course_completion_criteria cr
            INNER JOIN course c
                ON cr.course = c.id
            INNER JOIN course_enrolments e
                ON e.course = c.id
            INNER JOIN course_modules_completion mc
                ON mc.coursemoduleid = cr.moduleinstance
               AND mc.userid = e.userid
            LEFT JOIN course_completion_crit_compl cc
                ON cc.criteriaid = cr.id
               AND cc.userid = e.userid
            WHERE cr.criteriatype = ?
              AND c.enablecompletion = 1
              AND (cc.id IS NULL OR cc.timecompleted IS NULL)
              AND mc.completionstate IN (?, ?)
            ORDER BY criteriaid, userid
            "#,
        )
        .bind(CriteriaType::Activity.as_i32())
        .bind(CompletionState::Complete.as_i32())
        .bind(CompletionState::CompletePass.as_i32())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|r| PendingCompletion {
                course: r.course,
                criteria_id: r.criteriaid,
                user_id: r.userid,
                time_completed: r.timecompleted,
            })
            .collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ModuleCompletionRow {
    completionstate: i64,
    timemodified: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct CritComplRow {
    id: i64,
    userid: i64,
    course: i64,
    criteriaid: i64,
    timecompleted: Option<i64>,
}

#[derive(Debug, sqlx::FromRow)]
struct PendingRow {
    course: i64,
    criteriaid: i64,
    userid: i64,
    timecompleted: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use completion_core::domain::CompletionTracking;

    async fn seeded_pool() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        for sql in [
            "INSERT INTO course (id, fullname, enablecompletion) VALUES (1, 'Networks', 1), (2, 'Legacy', 0)",
            "INSERT INTO modules (id, name) VALUES (1, 'quiz')",
            "INSERT INTO course_modules (id, course, module, instance, completion) VALUES (10, 1, 1, 1, 2), (20, 2, 1, 2, 2)",
            "INSERT INTO course_completion_criteria (id, course, criteriatype, module, moduleinstance) VALUES (100, 1, 4, 'quiz', 10), (200, 2, 4, 'quiz', 20)",
            "INSERT INTO course_enrolments (course, userid, role) VALUES (1, 7, 'student'), (1, 7, 'teacher'), (1, 8, 'student'), (2, 7, 'student')",
            "INSERT INTO course_modules_completion (coursemoduleid, userid, completionstate, timemodified) VALUES (10, 7, 2, 5000), (10, 8, 3, 5100), (20, 7, 1, 5200)",
        ] {
            sqlx::query(sql).execute(&pool).await.unwrap();
        }
        pool
    }

    fn course_module(id: i64) -> CourseModule {
        CourseModule {
            id,
            course: 1,
            module: 1,
            instance: 1,
            completion: CompletionTracking::Automatic,
            completion_view: false,
            completion_grade_item_number: None,
        }
    }

    #[tokio::test]
    async fn test_get_data_reads_state_or_untracked() {
        let repo = SqliteCompletionRepository::new(seeded_pool().await);

        let data = repo.get_data(&course_module(10), 7).await.unwrap();
        assert_eq!(data.state, CompletionState::CompletePass);
        assert_eq!(data.time_modified, 5000);

        let missing = repo.get_data(&course_module(10), 99).await.unwrap();
        assert_eq!(missing, ActivityCompletion::untracked(10, 99));
    }

    #[tokio::test]
    async fn test_save_never_overwrites_completion_time() {
        let repo = SqliteCompletionRepository::new(seeded_pool().await);

        let mut completion = CriteriaCompletion::new(7, 1, 100);
        assert!(repo.save(&completion).await.unwrap());

        completion.mark_complete(6000);
        assert!(repo.save(&completion).await.unwrap());

        let mut later = CriteriaCompletion::new(7, 1, 100);
        later.mark_complete(9000);
        assert!(!repo.save(&later).await.unwrap());

        let stored = tokio_test::assert_ok!(repo.find(7, 100).await).unwrap();
        assert_eq!(stored.time_completed, Some(6000));
        assert!(stored.id.is_some());
    }

    #[tokio::test]
    async fn test_pending_query_is_a_set_difference() {
        let repo = SqliteCompletionRepository::new(seeded_pool().await);

        // user 7 in course 1 only: user 8 failed, course 2 has completion disabled
        let pending = repo.find_pending_activity_completions().await.unwrap();
        assert_eq!(
            pending,
            vec![PendingCompletion {
                course: 1,
                criteria_id: 100,
                user_id: 7,
                time_completed: 5000,
            }]
        );

        let mut done = CriteriaCompletion::new(7, 1, 100);
        done.mark_complete(5000);
        repo.save(&done).await.unwrap();

        assert!(repo
            .find_pending_activity_completions()
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_pending_query_includes_unfinished_records() {
        let repo = SqliteCompletionRepository::new(seeded_pool().await);
        repo.save(&CriteriaCompletion::new(7, 1, 100)).await.unwrap();

        let pending = repo.find_pending_activity_completions().await.unwrap();
        assert_eq!(pending.len(), 1);
    }
}
