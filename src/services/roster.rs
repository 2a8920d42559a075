//! Student roster service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        reference::{Branch, StudentCategory},
        student::{ApprovalDecision, NewStudent, Student},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RosterService {
    repository: Repository,
}

impl RosterService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_students(&self) -> AppResult<Vec<Student>> {
        self.repository.students.list().await
    }

    pub async fn get_student(&self, id: i64) -> AppResult<Student> {
        self.repository.students.get_by_id(id).await
    }

    /// Register a student with no copies and a pending approval
    pub async fn add_student(&self, student: NewStudent) -> AppResult<Student> {
        let student = student.normalized();
        student.validate()?;

        let created = self.repository.students.create(&student).await?;
        tracing::info!(student_id = created.id, roll_number = %created.roll_number, "Student registered");
        Ok(created)
    }

    pub async fn set_approval(&self, id: i64, decision: ApprovalDecision) -> AppResult<Student> {
        let student = self.repository.students.set_approval(id, decision).await?;
        tracing::info!(student_id = id, status = %student.status, "Student approval updated");
        Ok(student)
    }

    pub async fn student_categories(&self) -> AppResult<Vec<StudentCategory>> {
        self.repository.reference.student_categories().await
    }

    pub async fn branches(&self) -> AppResult<Vec<Branch>> {
        self.repository.reference.branches().await
    }
}
