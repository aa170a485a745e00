// SQLite CriteriaRepository Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use completion_core::domain::{CompletionCriterion, CriteriaFilter, CriteriaId, CriteriaType};
use completion_core::error::Result;
use completion_core::port::CriteriaRepository;
use sqlx::SqlitePool;

pub struct SqliteCriteriaRepository {
    pool: SqlitePool,
}

impl SqliteCriteriaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CriteriaRepository for SqliteCriteriaRepository {
    async fn insert(&self, criterion: &CompletionCriterion) -> Result<CriteriaId> {
        let result = sqlx::query(
            r#"
            INSERT INTO course_completion_criteria (
                course, criteriatype, module, moduleinstance, timeend
            ) VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(criterion.course)
        .bind(criterion.criteria_type.as_i32())
        .bind(&criterion.module)
        .bind(criterion.module_instance)
        .bind(criterion.time_end)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn fetch(&self, filter: &CriteriaFilter) -> Result<Vec<CompletionCriterion>> {
        let criteria_type = filter.criteria_type.map(|t| t.as_i32());

        let rows = sqlx::query_as::<_, CriterionRow>(
            r#"
            SELECT id, course, criteriatype, module, moduleinstance, timeend
            FROM course_completion_criteria
            WHERE (?1 IS NULL OR id = ?1)
              AND (?2 IS NULL OR course = ?2)
              AND (?3 IS NULL OR criteriatype = ?3)
              AND (?4 IS NULL OR moduleinstance = ?4)
            ORDER BY id
            "#,
        )
        .bind(filter.id)
        .bind(filter.course)
        .bind(criteria_type)
        .bind(filter.module_instance)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(|r| r.into_criterion()).collect()
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct CriterionRow {
    id: i64,
    course: i64,
    criteriatype: i64,
    module: Option<String>,
    moduleinstance: Option<i64>,
    timeend: Option<i64>,
}

impl CriterionRow {
    fn into_criterion(self) -> Result<CompletionCriterion> {
        Ok(CompletionCriterion {
            id: Some(self.id),
            course: self.course,
            criteria_type: CriteriaType::from_i32(self.criteriatype as i32)?,
            module: self.module,
            module_instance: self.moduleinstance,
            time_end: self.timeend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};

    async fn repo() -> SqliteCriteriaRepository {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        sqlx::query("INSERT INTO course (id, fullname, enablecompletion) VALUES (1, 'A', 1), (2, 'B', 1)")
            .execute(&pool)
            .await
            .unwrap();
        SqliteCriteriaRepository::new(pool)
    }

    #[tokio::test]
    async fn test_insert_and_fetch_by_filter() {
        let repo = repo().await;

        let quiz = repo
            .insert(&CompletionCriterion::activity(1, "quiz", 10))
            .await
            .unwrap();
        let assign = repo
            .insert(&CompletionCriterion::activity(2, "assign", 20))
            .await
            .unwrap();
        assert_ne!(quiz, assign);

        let all = repo.fetch(&CriteriaFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let by_course = repo
            .fetch(&CriteriaFilter {
                course: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_course.len(), 1);
        assert_eq!(by_course[0].id, Some(assign));
        assert_eq!(by_course[0].module.as_deref(), Some("assign"));
        assert_eq!(by_course[0].criteria_type, CriteriaType::Activity);

        let by_instance = repo
            .fetch(&CriteriaFilter {
                module_instance: Some(10),
                criteria_type: Some(CriteriaType::Activity),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_instance.len(), 1);
        assert_eq!(by_instance[0].id, Some(quiz));
    }

    #[tokio::test]
    async fn test_fetch_filters_by_type() {
        let repo = repo().await;
        let mut grade = CompletionCriterion::activity(1, "quiz", 10);
        grade.criteria_type = CriteriaType::Grade;
        grade.module = None;
        grade.module_instance = None;
        repo.insert(&grade).await.unwrap();

        let activities = repo
            .fetch(&CriteriaFilter {
                criteria_type: Some(CriteriaType::Activity),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(activities.is_empty());
    }
}
