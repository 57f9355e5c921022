//! Student management.

pub mod model;

pub use model::{
    AcademicStatus, BasicInfo, Score, Student, StudentDraft, StudentUpdate, Subject,
    TargetUniversities, TeacherAssignment, TeacherRole, TestKind, TestScore,
};

use crate::error::{CoreError, CoreResult, lookup_error};
use crate::pathway::model::University;
use compass_redis::RedisPool;
use compass_redis::queries::students as queries;

/// Filters and paging for the student list.
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    pub grade: Option<String>,
    pub class: Option<String>,
    /// Case-insensitive substring match on name or student number.
    pub search: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Paging metadata returned alongside a student list.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Pagination {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub pages: usize,
}

/// One page of students.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StudentPage {
    pub students: Vec<Student>,
    pub pagination: Pagination,
}

async fn load(pool: &RedisPool, student_id: &str) -> CoreResult<Student> {
    let json = queries::get_student(pool, student_id)
        .await
        .map_err(|e| lookup_error(e, CoreError::StudentNotFound(student_id.to_string())))?;
    Ok(serde_json::from_str(&json)?)
}

async fn store(pool: &RedisPool, student: &Student) -> CoreResult<()> {
    let json = serde_json::to_string(student)?;
    queries::put_student(pool, &student.id, &json, student.created_at.timestamp()).await?;
    Ok(())
}

fn validate_gpa(gpa: f64) -> CoreResult<()> {
    if !(0.0..=4.0).contains(&gpa) {
        return Err(CoreError::validation("GPA must be between 0.0 and 4.0"));
    }
    Ok(())
}

/// Register a student. The student number is claimed atomically; a duplicate
/// fails without writing anything.
pub async fn create_student(pool: &RedisPool, draft: StudentDraft) -> CoreResult<Student> {
    validate_gpa(draft.academic_status.current_gpa)?;

    let student = Student::new(draft);
    let number = &student.basic_info.student_number;

    let claimed = queries::try_claim_student_number(pool, number, &student.id).await?;
    if !claimed {
        return Err(CoreError::StudentNumberTaken(number.clone()));
    }

    if let Err(err) = store(pool, &student).await {
        // Give the number back rather than leave it claimed by a document
        // that was never written.
        let _ = queries::release_student_number(pool, number, &student.id).await;
        return Err(err);
    }
    tracing::info!(student_id = %student.id, name = %student.basic_info.name, "student created");
    Ok(student)
}

/// Get a student by id.
pub async fn get_student(pool: &RedisPool, student_id: &str) -> CoreResult<Student> {
    load(pool, student_id).await
}

/// List students with optional grade/class/search filters and paging.
///
/// Filtering happens here rather than in the store: the document layer has
/// no secondary indexes on nested fields.
pub async fn list_students(pool: &RedisPool, filter: &StudentFilter) -> CoreResult<StudentPage> {
    let docs = queries::list_students(pool).await?;
    let mut students = Vec::with_capacity(docs.len());
    for doc in docs {
        let student: Student = serde_json::from_str(&doc)?;
        students.push(student);
    }

    if let Some(grade) = &filter.grade {
        students.retain(|s| &s.basic_info.grade == grade);
    }
    if let Some(class) = &filter.class {
        students.retain(|s| &s.basic_info.class == class);
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        students.retain(|s| {
            s.basic_info.name.to_lowercase().contains(&needle)
                || s.basic_info.student_number.to_lowercase().contains(&needle)
        });
    }

    students.sort_by(|a, b| {
        (&a.basic_info.grade, &a.basic_info.class, &a.basic_info.name).cmp(&(
            &b.basic_info.grade,
            &b.basic_info.class,
            &b.basic_info.name,
        ))
    });

    let total = students.len();
    let limit = filter.limit.unwrap_or(20).max(1);
    let page = filter.page.unwrap_or(1).max(1);
    let pages = total.div_ceil(limit);

    let students = students
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    Ok(StudentPage {
        students,
        pagination: Pagination {
            total,
            page,
            limit,
            pages,
        },
    })
}

/// Merge a partial update onto a student. A changed student number has to
/// claim the new number first; the old number is released once the new one
/// is on record, so it becomes registrable again.
pub async fn update_student(
    pool: &RedisPool,
    student_id: &str,
    updates: StudentUpdate,
) -> CoreResult<Student> {
    if let Some(academic_status) = &updates.academic_status {
        validate_gpa(academic_status.current_gpa)?;
    }

    let mut student = load(pool, student_id).await?;
    let old_number = student.basic_info.student_number.clone();
    let number_changed = updates
        .basic_info
        .as_ref()
        .is_some_and(|b| b.student_number != old_number);

    if let Some(basic_info) = &updates.basic_info {
        if basic_info.student_number != old_number {
            let claimed =
                queries::try_claim_student_number(pool, &basic_info.student_number, student_id)
                    .await?;
            if !claimed {
                return Err(CoreError::StudentNumberTaken(
                    basic_info.student_number.clone(),
                ));
            }
        }
    }

    student.apply(updates);

    if let Err(err) = store(pool, &student).await {
        if number_changed {
            let _ = queries::release_student_number(
                pool,
                &student.basic_info.student_number,
                student_id,
            )
            .await;
        }
        return Err(err);
    }

    if number_changed {
        queries::release_student_number(pool, &old_number, student_id).await?;
    }

    tracing::info!(student_id, "student updated");
    Ok(student)
}

/// Assign a teacher to a student (upsert on teacher + role).
pub async fn add_teacher(
    pool: &RedisPool,
    student_id: &str,
    assignment: TeacherAssignment,
) -> CoreResult<Student> {
    let mut student = load(pool, student_id).await?;
    let teacher_id = assignment.teacher_id.clone();
    student.assign_teacher(assignment);
    store(pool, &student).await?;
    tracing::info!(student_id, teacher_id, "teacher assigned");
    Ok(student)
}

/// Replace a student's primary target university, recording the reason.
pub async fn update_target_university(
    pool: &RedisPool,
    student_id: &str,
    university: University,
    reason: String,
) -> CoreResult<Student> {
    let mut student = load(pool, student_id).await?;
    let target = university.name.clone();
    student.set_target_university(university, reason);
    store(pool, &student).await?;
    tracing::info!(student_id, target, "target university updated");
    Ok(student)
}

// Run against a live Redis: cargo test -p compass-core -- --ignored
#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathway::model::UniversityRequirements;
    use chrono::Utc;

    async fn pool() -> RedisPool {
        let url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        compass_redis::init_pool(&url).await.expect("redis available")
    }

    fn draft(student_number: &str) -> StudentDraft {
        StudentDraft {
            basic_info: BasicInfo {
                name: "Li Wei".to_string(),
                grade: "11".to_string(),
                class: "B".to_string(),
                enrollment_date: Utc::now(),
                student_number: student_number.to_string(),
            },
            target_university: University {
                id: "cambridge".to_string(),
                name: "Cambridge".to_string(),
                country: "UK".to_string(),
                ranking: None,
                major: "Mathematics".to_string(),
                requirements: UniversityRequirements::default(),
            },
            alternatives: vec![],
            academic_status: AcademicStatus {
                current_gpa: 3.7,
                subjects: vec![],
                standardized_tests: vec![],
            },
        }
    }

    fn unique_number(tag: &str) -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("test-{}-{}", tag, nanos)
    }

    #[tokio::test]
    #[ignore]
    async fn vacated_student_number_is_registrable_again() {
        let pool = pool().await;
        let old_number = unique_number("old");
        let new_number = unique_number("new");

        let student = create_student(&pool, draft(&old_number)).await.unwrap();

        let mut basic_info = student.basic_info.clone();
        basic_info.student_number = new_number.clone();
        let updated = update_student(
            &pool,
            &student.id,
            StudentUpdate {
                basic_info: Some(basic_info),
                academic_status: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.basic_info.student_number, new_number);

        // The old number is vacated and a new student can register it.
        let second = create_student(&pool, draft(&old_number)).await.unwrap();
        assert_ne!(second.id, student.id);

        // The new number stays taken.
        let err = create_student(&pool, draft(&new_number)).await.unwrap_err();
        assert!(matches!(err, CoreError::StudentNumberTaken(_)));
    }
}
