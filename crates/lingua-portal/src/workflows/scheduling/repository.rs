use chrono::NaiveDate;

use super::domain::{
    CancellationId, LeaveRequest, LeaveRequestId, ScheduledCourse, StudentCancellation, Teacher,
    TeacherId,
};
use crate::workflows::store::{MemoryStore, RepositoryError};

/// Storage abstraction for leave requests. Requests are never deleted.
pub trait LeaveRepository: Send + Sync {
    fn insert(&self, record: LeaveRequest) -> Result<LeaveRequest, RepositoryError>;
    fn update(&self, record: LeaveRequest) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &LeaveRequestId) -> Result<Option<LeaveRequest>, RepositoryError>;
    fn all(&self) -> Result<Vec<LeaveRequest>, RepositoryError>;
}

/// Read-only view of the teacher directory.
pub trait TeacherDirectory: Send + Sync {
    fn fetch(&self, id: &TeacherId) -> Result<Option<Teacher>, RepositoryError>;
    fn active(&self) -> Result<Vec<Teacher>, RepositoryError>;
}

/// Timetable lookups used by the conflict checker.
pub trait CourseSchedule: Send + Sync {
    fn courses_on(
        &self,
        teacher: &TeacherId,
        date: NaiveDate,
    ) -> Result<Vec<ScheduledCourse>, RepositoryError>;
}

pub trait CancellationRepository: Send + Sync {
    fn insert(&self, record: StudentCancellation) -> Result<StudentCancellation, RepositoryError>;
    fn update(&self, record: StudentCancellation) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CancellationId) -> Result<Option<StudentCancellation>, RepositoryError>;
    fn all(&self) -> Result<Vec<StudentCancellation>, RepositoryError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryLeaveRepository {
    records: MemoryStore<LeaveRequestId, LeaveRequest>,
}

impl LeaveRepository for InMemoryLeaveRepository {
    fn insert(&self, record: LeaveRequest) -> Result<LeaveRequest, RepositoryError> {
        self.records.insert_new(record.id.clone(), record)
    }

    fn update(&self, record: LeaveRequest) -> Result<(), RepositoryError> {
        self.records.replace(record.id.clone(), record)
    }

    fn fetch(&self, id: &LeaveRequestId) -> Result<Option<LeaveRequest>, RepositoryError> {
        self.records.get(id)
    }

    fn all(&self) -> Result<Vec<LeaveRequest>, RepositoryError> {
        self.records.values()
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryTeacherDirectory {
    teachers: MemoryStore<TeacherId, Teacher>,
}

impl InMemoryTeacherDirectory {
    pub fn with_teachers(teachers: impl IntoIterator<Item = Teacher>) -> Self {
        // Later entries replace earlier ones with the same id.
        Self {
            teachers: teachers
                .into_iter()
                .map(|teacher| (teacher.id.clone(), teacher))
                .collect(),
        }
    }

    pub fn add(&self, teacher: Teacher) -> Result<Teacher, RepositoryError> {
        self.teachers.insert_new(teacher.id.clone(), teacher)
    }
}

impl TeacherDirectory for InMemoryTeacherDirectory {
    fn fetch(&self, id: &TeacherId) -> Result<Option<Teacher>, RepositoryError> {
        self.teachers.get(id)
    }

    fn active(&self) -> Result<Vec<Teacher>, RepositoryError> {
        Ok(self
            .teachers
            .values()?
            .into_iter()
            .filter(|teacher| teacher.active)
            .collect())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryCourseSchedule {
    courses: MemoryStore<(TeacherId, NaiveDate), Vec<ScheduledCourse>>,
}

impl InMemoryCourseSchedule {
    pub fn add(&self, course: ScheduledCourse) -> Result<(), RepositoryError> {
        let key = (course.teacher_id.clone(), course.course_date);
        self.courses
            .update_or_default(key, |courses| courses.push(course))
    }
}

impl CourseSchedule for InMemoryCourseSchedule {
    fn courses_on(
        &self,
        teacher: &TeacherId,
        date: NaiveDate,
    ) -> Result<Vec<ScheduledCourse>, RepositoryError> {
        Ok(self
            .courses
            .get(&(teacher.clone(), date))?
            .unwrap_or_default())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryCancellationRepository {
    records: MemoryStore<CancellationId, StudentCancellation>,
}

impl CancellationRepository for InMemoryCancellationRepository {
    fn insert(&self, record: StudentCancellation) -> Result<StudentCancellation, RepositoryError> {
        self.records.insert_new(record.id.clone(), record)
    }

    fn update(&self, record: StudentCancellation) -> Result<(), RepositoryError> {
        self.records.replace(record.id.clone(), record)
    }

    fn fetch(&self, id: &CancellationId) -> Result<Option<StudentCancellation>, RepositoryError> {
        self.records.get(id)
    }

    fn all(&self) -> Result<Vec<StudentCancellation>, RepositoryError> {
        self.records.values()
    }
}
