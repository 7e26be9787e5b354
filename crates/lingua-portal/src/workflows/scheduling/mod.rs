//! Teacher leave requests, substitute assignment and student cancellations.
//!
//! A leave request starts `pending`. An admin either rejects it or approves it by assigning a
//! substitute drawn from the eligible list (category match, no timetable conflict, not the
//! requesting teacher). Approved requests may have their substitute changed or be cancelled.

pub mod cancellations;
pub mod conflict;
pub mod domain;
pub mod eligibility;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use cancellations::{
    CancellationError, CancellationQuery, CancellationService, ProcessCancellation,
};
pub use conflict::{ConflictChecker, ScheduleConflictChecker, TimeSlot};
pub use domain::{
    CancellationId, CancellationStatus, ContractType, LeaveRequest, LeaveRequestId, LeaveState,
    LeaveStatus, NewLeaveRequest, NewStudentCancellation, ReviewEntry, ScheduledCourse,
    StudentCancellation, SubstituteTeacher, Teacher, TeacherId, TeachingCategory,
};
pub use eligibility::{required_categories, EligibleSubstitutes};
pub use repository::{
    CancellationRepository, CourseSchedule, InMemoryCancellationRepository,
    InMemoryCourseSchedule, InMemoryLeaveRepository, InMemoryTeacherDirectory, LeaveRepository,
    TeacherDirectory,
};
pub use router::{cancellation_router, leave_router};
pub use service::{
    AssignSubstitute, LeaveQuery, LeaveService, LeaveServiceError, ReviewInput, ReviewerNote,
};
