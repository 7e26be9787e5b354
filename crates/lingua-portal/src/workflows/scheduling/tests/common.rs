use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::scheduling::domain::{
    ContractType, LeaveRequest, LeaveRequestId, NewLeaveRequest, ScheduledCourse, Teacher,
    TeacherId, TeachingCategory,
};
use crate::workflows::scheduling::repository::{
    InMemoryCourseSchedule, InMemoryLeaveRepository, InMemoryTeacherDirectory, LeaveRepository,
};
use crate::workflows::scheduling::{LeaveService, ScheduleConflictChecker};
use crate::workflows::store::RepositoryError;

pub(super) type TestLeaveService = LeaveService<
    InMemoryLeaveRepository,
    InMemoryTeacherDirectory,
    ScheduleConflictChecker<InMemoryCourseSchedule>,
>;

pub(super) fn course_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 12).expect("valid date")
}

pub(super) fn teacher(id: &str, name: &str, categories: &[TeachingCategory]) -> Teacher {
    Teacher {
        id: TeacherId(id.to_string()),
        name: name.to_string(),
        email: format!("{}@lingua.example", name.to_lowercase().replace(' ', ".")),
        contract_type: ContractType::FullTime,
        expertise: vec!["Conversation".to_string()],
        teaching_category: categories.to_vec(),
        qualification: vec!["CELTA".to_string()],
        languages: vec!["English".to_string(), "Mandarin".to_string()],
        experience: 6,
        teaching_hours: 20,
        rating: 4.7,
        active: true,
    }
}

/// Directory used across the scheduling tests:
/// t-001 requester (English), t-002 English, t-003 Business, t-004 Japanese,
/// t-005 English but busy at the course slot, t-006 inactive English.
pub(super) fn teachers() -> Vec<Teacher> {
    let mut inactive = teacher("t-006", "Olive Grant", &[TeachingCategory::English]);
    inactive.active = false;

    vec![
        teacher("t-001", "Amy Chen", &[TeachingCategory::English]),
        teacher("t-002", "Ben Walker", &[TeachingCategory::English]),
        teacher("t-003", "Cora Lin", &[TeachingCategory::Business]),
        teacher("t-004", "Daichi Sato", &[TeachingCategory::Japanese]),
        teacher(
            "t-005",
            "Eva Novak",
            &[TeachingCategory::English, TeachingCategory::Chinese],
        ),
        inactive,
    ]
}

pub(super) fn leave_input(course_name: &str) -> NewLeaveRequest {
    NewLeaveRequest {
        teacher_name: "Amy Chen".to_string(),
        teacher_email: "amy.chen@lingua.example".to_string(),
        course_name: course_name.to_string(),
        course_date: course_date(),
        course_time: "19:00-21:00".to_string(),
        leave_reason: "Medical appointment".to_string(),
        student_count: 12,
        classroom: "Room 301".to_string(),
    }
}

pub(super) struct Fixture {
    pub(super) service: TestLeaveService,
    pub(super) leaves: Arc<InMemoryLeaveRepository>,
}

pub(super) fn fixture() -> Fixture {
    let leaves = Arc::new(InMemoryLeaveRepository::default());
    let directory = Arc::new(InMemoryTeacherDirectory::with_teachers(teachers()));
    let schedule = Arc::new(InMemoryCourseSchedule::default());
    schedule
        .add(ScheduledCourse {
            teacher_id: TeacherId("t-005".to_string()),
            course_name: "Conversational Chinese".to_string(),
            course_date: course_date(),
            course_time: "20:00-21:30".to_string(),
        })
        .expect("schedule accepts course");

    let checker = Arc::new(ScheduleConflictChecker::new(schedule));
    let service = LeaveService::new(leaves.clone(), directory, checker);
    Fixture { service, leaves }
}

pub(super) fn submitted(fixture: &Fixture, course_name: &str) -> LeaveRequest {
    fixture
        .service
        .submit(leave_input(course_name))
        .expect("submission succeeds")
}

pub(super) fn teacher_ids(teachers: &[Teacher]) -> Vec<&str> {
    teachers.iter().map(|teacher| teacher.id.0.as_str()).collect()
}

pub(super) struct UnavailableLeaves;

impl LeaveRepository for UnavailableLeaves {
    fn insert(&self, _record: LeaveRequest) -> Result<LeaveRequest, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: LeaveRequest) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &LeaveRequestId) -> Result<Option<LeaveRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<LeaveRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
