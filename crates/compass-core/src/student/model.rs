//! Student domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pathway::model::University;

/// Identity and enrollment data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicInfo {
    pub name: String,
    pub grade: String,
    pub class: String,
    pub enrollment_date: DateTime<Utc>,
    /// School-assigned number, unique across students.
    pub student_number: String,
}

/// The student's admission goals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetUniversities {
    pub primary: University,
    #[serde(default)]
    pub alternatives: Vec<University>,
    pub last_updated: DateTime<Utc>,
    pub update_reason: Option<String>,
}

/// A subject the student is currently taking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub level: String,
    pub current_grade: String,
    pub teacher: String,
    pub credits: i64,
}

/// Recognized standardized tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestKind {
    #[serde(rename = "SAT")]
    Sat,
    #[serde(rename = "ACT")]
    Act,
    #[serde(rename = "TOEFL")]
    Toefl,
    #[serde(rename = "IELTS")]
    Ielts,
    #[serde(rename = "AP")]
    Ap,
    #[serde(rename = "A-Level")]
    ALevel,
    #[serde(rename = "IB")]
    Ib,
}

/// A test score. Some tests report numbers, some letter bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Points(f64),
    Band(String),
}

/// A recorded standardized-test result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestScore {
    pub kind: TestKind,
    pub score: Score,
    pub date: DateTime<Utc>,
    pub percentile: Option<f64>,
}

/// Academic standing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicStatus {
    /// GPA on a 0.0–4.0 scale.
    pub current_gpa: f64,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub standardized_tests: Vec<TestScore>,
}

/// How a teacher relates to a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeacherRole {
    SubjectTeacher,
    Counselor,
    HomeroomTeacher,
    Coordinator,
}

/// A teacher assignment on a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherAssignment {
    pub teacher_id: String,
    pub role: TeacherRole,
    #[serde(default)]
    pub subjects: Vec<String>,
    pub start_date: DateTime<Utc>,
}

/// A student record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub basic_info: BasicInfo,
    pub target_universities: TargetUniversities,
    pub academic_status: AcademicStatus,
    #[serde(default)]
    pub related_teachers: Vec<TeacherAssignment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when registering a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentDraft {
    pub basic_info: BasicInfo,
    pub target_university: University,
    #[serde(default)]
    pub alternatives: Vec<University>,
    pub academic_status: AcademicStatus,
}

/// A partial update for a student; absent sections are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentUpdate {
    pub basic_info: Option<BasicInfo>,
    pub academic_status: Option<AcademicStatus>,
}

impl Student {
    /// Build a new student record from a draft.
    pub fn new(draft: StudentDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            basic_info: draft.basic_info,
            target_universities: TargetUniversities {
                primary: draft.target_university,
                alternatives: draft.alternatives,
                last_updated: now,
                update_reason: None,
            },
            academic_status: draft.academic_status,
            related_teachers: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Assign a teacher. Upserts on (teacher_id, role): re-assigning the
    /// same teacher in the same role replaces the existing entry.
    pub fn assign_teacher(&mut self, assignment: TeacherAssignment) {
        let existing = self.related_teachers.iter_mut().find(|t| {
            t.teacher_id == assignment.teacher_id && t.role == assignment.role
        });
        match existing {
            Some(slot) => *slot = assignment,
            None => self.related_teachers.push(assignment),
        }
        self.updated_at = Utc::now();
    }

    /// Replace the primary target university, recording when and why.
    pub fn set_target_university(&mut self, university: University, reason: String) {
        self.target_universities.primary = university;
        self.target_universities.last_updated = Utc::now();
        self.target_universities.update_reason = Some(reason);
        self.updated_at = Utc::now();
    }

    /// Merge a partial update.
    pub fn apply(&mut self, updates: StudentUpdate) {
        if let Some(basic_info) = updates.basic_info {
            self.basic_info = basic_info;
        }
        if let Some(academic_status) = updates.academic_status {
            self.academic_status = academic_status;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathway::model::UniversityRequirements;

    fn university(name: &str) -> University {
        University {
            id: name.to_lowercase(),
            name: name.to_string(),
            country: "UK".to_string(),
            ranking: None,
            major: "Mathematics".to_string(),
            requirements: UniversityRequirements::default(),
        }
    }

    fn student() -> Student {
        Student::new(StudentDraft {
            basic_info: BasicInfo {
                name: "Li Wei".to_string(),
                grade: "11".to_string(),
                class: "B".to_string(),
                enrollment_date: Utc::now(),
                student_number: "S-1024".to_string(),
            },
            target_university: university("Cambridge"),
            alternatives: vec![],
            academic_status: AcademicStatus {
                current_gpa: 3.7,
                subjects: vec![],
                standardized_tests: vec![],
            },
        })
    }

    fn assignment(teacher_id: &str, role: TeacherRole) -> TeacherAssignment {
        TeacherAssignment {
            teacher_id: teacher_id.to_string(),
            role,
            subjects: vec![],
            start_date: Utc::now(),
        }
    }

    #[test]
    fn assign_teacher_appends_new_roles() {
        let mut s = student();
        s.assign_teacher(assignment("t-1", TeacherRole::Counselor));
        s.assign_teacher(assignment("t-1", TeacherRole::SubjectTeacher));
        assert_eq!(s.related_teachers.len(), 2);
    }

    #[test]
    fn assign_teacher_upserts_on_same_teacher_and_role() {
        let mut s = student();
        s.assign_teacher(assignment("t-1", TeacherRole::Counselor));

        let mut updated = assignment("t-1", TeacherRole::Counselor);
        updated.subjects = vec!["Physics".to_string()];
        s.assign_teacher(updated);

        assert_eq!(s.related_teachers.len(), 1);
        assert_eq!(s.related_teachers[0].subjects, vec!["Physics".to_string()]);
    }

    #[test]
    fn set_target_university_records_reason() {
        let mut s = student();
        s.set_target_university(university("Oxford"), "Stronger fit for major".to_string());
        assert_eq!(s.target_universities.primary.name, "Oxford");
        assert_eq!(
            s.target_universities.update_reason.as_deref(),
            Some("Stronger fit for major")
        );
    }

    #[test]
    fn partial_update_keeps_other_sections() {
        let mut s = student();
        let teachers_before = s.related_teachers.clone();

        s.apply(StudentUpdate {
            basic_info: None,
            academic_status: Some(AcademicStatus {
                current_gpa: 3.9,
                subjects: vec![],
                standardized_tests: vec![],
            }),
        });

        assert_eq!(s.academic_status.current_gpa, 3.9);
        assert_eq!(s.basic_info.name, "Li Wei");
        assert_eq!(s.related_teachers.len(), teachers_before.len());
    }
}
