// SQLite CourseRepository Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use completion_core::domain::{Activity, CompletionTracking, Course, CourseModule, ModuleType};
use completion_core::error::Result;
use completion_core::port::CourseRepository;
use sqlx::SqlitePool;

pub struct SqliteCourseRepository {
    pool: SqlitePool,
}

impl SqliteCourseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for SqliteCourseRepository {
    async fn find_course(&self, id: i64) -> Result<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(
            "SELECT id, fullname, enablecompletion FROM course WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|r| Course {
            id: r.id,
            full_name: r.fullname,
            enable_completion: r.enablecompletion != 0,
        }))
    }

    async fn find_course_module(&self, id: i64) -> Result<Option<CourseModule>> {
        let row = sqlx::query_as::<_, CourseModuleRow>(
            r#"
            SELECT id, course, module, instance,
                   completion, completionview, completiongradeitemnumber
            FROM course_modules
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_course_module()))
    }

    async fn list_module_types(&self) -> Result<Vec<ModuleType>> {
        let rows = sqlx::query_as::<_, ModuleTypeRow>("SELECT id, name FROM modules ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|r| ModuleType {
                id: r.id,
                name: r.name,
            })
            .collect())
    }

    async fn find_activity(&self, module: &str, instance: i64) -> Result<Option<Activity>> {
        let row = sqlx::query_as::<_, ActivityRow>(
            "SELECT module, id, name FROM activities WHERE module = ? AND id = ?",
        )
        .bind(module)
        .bind(instance)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|r| Activity {
            module: r.module,
            id: r.id,
            name: r.name,
        }))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: i64,
    fullname: String,
    enablecompletion: i64, // SQLite boolean as integer
}

#[derive(Debug, sqlx::FromRow)]
struct CourseModuleRow {
    id: i64,
    course: i64,
    module: i64,
    instance: i64,
    completion: i64,
    completionview: i64, // SQLite boolean as integer
    completiongradeitemnumber: Option<i64>,
}

impl CourseModuleRow {
    fn into_course_module(self) -> CourseModule {
        CourseModule {
            id: self.id,
            course: self.course,
            module: self.module,
            instance: self.instance,
            completion: CompletionTracking::from_i32(self.completion as i32),
            completion_view: self.completionview != 0,
            completion_grade_item_number: self.completiongradeitemnumber,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ModuleTypeRow {
    id: i64,
    name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ActivityRow {
    module: String,
    id: i64,
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};

    async fn seeded_pool() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        for sql in [
            "INSERT INTO course (id, fullname, enablecompletion) VALUES (1, 'Compilers', 1)",
            "INSERT INTO modules (id, name) VALUES (1, 'quiz'), (2, 'assign')",
            "INSERT INTO course_modules (id, course, module, instance, completion, completionview, completiongradeitemnumber) \
             VALUES (10, 1, 2, 5, 2, 1, NULL)",
            "INSERT INTO activities (module, id, name) VALUES ('assign', 5, 'Lexer project')",
        ] {
            sqlx::query(sql).execute(&pool).await.unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn test_find_course_and_module() {
        let repo = SqliteCourseRepository::new(seeded_pool().await);

        let course = repo.find_course(1).await.unwrap().unwrap();
        assert_eq!(course.full_name, "Compilers");
        assert!(course.enable_completion);
        assert!(repo.find_course(2).await.unwrap().is_none());

        let cm = repo.find_course_module(10).await.unwrap().unwrap();
        assert_eq!(cm.module, 2);
        assert_eq!(cm.instance, 5);
        assert_eq!(cm.completion, CompletionTracking::Automatic);
        assert!(cm.completion_view);
        assert_eq!(cm.completion_grade_item_number, None);
    }

    #[tokio::test]
    async fn test_module_types_and_activity() {
        let repo = SqliteCourseRepository::new(seeded_pool().await);

        let types = repo.list_module_types().await.unwrap();
        assert_eq!(types.len(), 2);
        assert_eq!(types[1].name, "assign");

        let activity = repo.find_activity("assign", 5).await.unwrap().unwrap();
        assert_eq!(activity.name, "Lexer project");
        assert!(repo.find_activity("quiz", 5).await.unwrap().is_none());
    }
}
