//! Students repository

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::student::{ApprovalDecision, NewStudent, Student, StudentRow},
};

use super::reference::ensure_exists;

const STUDENT_SELECT: &str = r#"
    SELECT s.id, s.roll_number, s.first_name, s.last_name, s.email,
           s.category_id, c.name AS category, c.max_allowed,
           s.branch_id, b.name AS branch,
           s.year, s.books_issued, s.approved, s.rejected
    FROM students s
    JOIN student_categories c ON s.category_id = c.id
    JOIN branches b ON s.branch_id = b.id
"#;

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Sqlite>,
}

impl StudentsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get student by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Student> {
        let query = format!("{} WHERE s.id = ?", STUDENT_SELECT);
        sqlx::query_as::<_, StudentRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Student::from)
            .ok_or(AppError::StudentNotFound(id))
    }

    /// List all students ordered by roll number
    pub async fn list(&self) -> AppResult<Vec<Student>> {
        let query = format!("{} ORDER BY s.roll_number, s.id", STUDENT_SELECT);
        let rows = sqlx::query_as::<_, StudentRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Student::from).collect())
    }

    /// Register a normalized student: no copies issued, approval pending
    pub async fn create(&self, student: &NewStudent) -> AppResult<Student> {
        let mut tx = self.pool.begin().await?;

        ensure_exists(&mut *tx, "student_categories", "Student category", student.category_id).await?;
        ensure_exists(&mut *tx, "branches", "Branch", student.branch_id).await?;

        let id = sqlx::query(
            r#"
            INSERT INTO students (roll_number, first_name, last_name, email, category_id, branch_id,
                                  year, books_issued, approved, rejected)
            VALUES (?, ?, ?, ?, ?, ?, ?, 0, 0, 0)
            "#,
        )
        .bind(&student.roll_number)
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.email)
        .bind(student.category_id)
        .bind(student.branch_id)
        .bind(student.year)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        self.get_by_id(id).await
    }

    /// Record an approval decision
    pub async fn set_approval(&self, id: i64, decision: ApprovalDecision) -> AppResult<Student> {
        let (approved, rejected) = decision.flags();

        let result = sqlx::query("UPDATE students SET approved = ?, rejected = ? WHERE id = ?")
            .bind(approved)
            .bind(rejected)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::StudentNotFound(id));
        }

        self.get_by_id(id).await
    }
}
