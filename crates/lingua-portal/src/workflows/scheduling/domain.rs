use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for teacher leave requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaveRequestId(pub String);

/// Identifier wrapper for directory teachers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeacherId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CancellationId(pub String);

impl fmt::Display for LeaveRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TeacherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CancellationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Subject families a teacher can cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeachingCategory {
    English,
    Chinese,
    Japanese,
    Business,
}

impl TeachingCategory {
    pub const fn ordered() -> [Self; 4] {
        [Self::English, Self::Chinese, Self::Japanese, Self::Business]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Chinese => "Chinese",
            Self::Japanese => "Japanese",
            Self::Business => "Business",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(raw.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    FullTime,
    PartTime,
    Freelance,
}

/// Directory entry for a teacher. Read-only for the substitute workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub email: String,
    pub contract_type: ContractType,
    pub expertise: Vec<String>,
    pub teaching_category: Vec<TeachingCategory>,
    pub qualification: Vec<String>,
    pub languages: Vec<String>,
    /// Years of teaching experience.
    pub experience: u8,
    /// Contracted teaching hours per week.
    pub teaching_hours: u32,
    pub rating: f32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Teacher {
    pub fn teaches_any(&self, categories: &[TeachingCategory]) -> bool {
        self.teaching_category
            .iter()
            .any(|category| categories.contains(category))
    }

    pub fn substitute(&self) -> SubstituteTeacher {
        SubstituteTeacher {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Substitute details attached to an approved leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstituteTeacher {
    pub id: TeacherId,
    pub name: String,
    pub email: String,
}

/// Flat status label exposed through the API and used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
            LeaveStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Review state of a leave request. Only `Approved` carries a substitute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LeaveState {
    Pending,
    Approved {
        #[serde(rename = "substituteTeacher")]
        substitute: SubstituteTeacher,
    },
    Rejected,
    Cancelled,
}

/// Admin actions driving the leave state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveAction {
    AssignSubstitute(SubstituteTeacher),
    Reject,
    Cancel,
}

impl LeaveAction {
    pub const fn label(&self) -> &'static str {
        match self {
            LeaveAction::AssignSubstitute(_) => "assign substitute",
            LeaveAction::Reject => "reject",
            LeaveAction::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} a leave request that is {from}")]
pub struct TransitionError {
    pub from: LeaveStatus,
    pub action: &'static str,
}

impl LeaveState {
    pub fn status(&self) -> LeaveStatus {
        match self {
            LeaveState::Pending => LeaveStatus::Pending,
            LeaveState::Approved { .. } => LeaveStatus::Approved,
            LeaveState::Rejected => LeaveStatus::Rejected,
            LeaveState::Cancelled => LeaveStatus::Cancelled,
        }
    }

    pub fn substitute(&self) -> Option<&SubstituteTeacher> {
        match self {
            LeaveState::Approved { substitute } => Some(substitute),
            _ => None,
        }
    }

    /// Whether an admin may still pick a substitute for this request.
    pub fn accepts_assignment(&self) -> bool {
        !matches!(self, LeaveState::Rejected)
    }

    /// Compute the next state. A cancelled request behaves like a pending one again,
    /// except that it cannot be cancelled twice.
    pub fn apply(&self, action: LeaveAction) -> Result<LeaveState, TransitionError> {
        let invalid = |action: &LeaveAction| TransitionError {
            from: self.status(),
            action: action.label(),
        };

        match (self, action) {
            (LeaveState::Rejected, action) => Err(invalid(&action)),
            (_, LeaveAction::AssignSubstitute(substitute)) => {
                Ok(LeaveState::Approved { substitute })
            }
            (LeaveState::Pending | LeaveState::Cancelled, LeaveAction::Reject) => {
                Ok(LeaveState::Rejected)
            }
            (LeaveState::Approved { .. }, LeaveAction::Cancel) => Ok(LeaveState::Cancelled),
            (_, action) => Err(invalid(&action)),
        }
    }
}

/// Audit entry appended on every review transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub status: LeaveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub reviewer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitute: Option<SubstituteTeacher>,
    pub at: DateTime<Utc>,
}

/// Teacher leave request as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: LeaveRequestId,
    pub teacher_name: String,
    pub teacher_email: String,
    pub course_name: String,
    pub course_date: NaiveDate,
    pub course_time: String,
    pub leave_reason: String,
    pub request_date: NaiveDate,
    pub student_count: u32,
    pub classroom: String,
    #[serde(flatten)]
    pub state: LeaveState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub history: Vec<ReviewEntry>,
}

impl LeaveRequest {
    pub fn status(&self) -> LeaveStatus {
        self.state.status()
    }

    pub fn substitute(&self) -> Option<&SubstituteTeacher> {
        self.state.substitute()
    }

    pub fn requested_by(&self, teacher: &Teacher) -> bool {
        self.teacher_email.eq_ignore_ascii_case(&teacher.email)
    }
}

/// Teacher-submitted leave payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeaveRequest {
    pub teacher_name: String,
    pub teacher_email: String,
    pub course_name: String,
    pub course_date: NaiveDate,
    pub course_time: String,
    pub leave_reason: String,
    #[serde(default)]
    pub student_count: u32,
    #[serde(default)]
    pub classroom: String,
}

/// Course on the timetable, consulted for substitute conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledCourse {
    pub teacher_id: TeacherId,
    pub course_name: String,
    pub course_date: NaiveDate,
    pub course_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancellationStatus {
    Pending,
    Processed,
}

impl CancellationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CancellationStatus::Pending => "pending",
            CancellationStatus::Processed => "processed",
        }
    }
}

/// Student request to drop out of a course session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCancellation {
    pub id: CancellationId,
    pub student_name: String,
    pub course_name: String,
    pub instructor_name: String,
    pub cancel_reason: String,
    pub status: CancellationStatus,
    pub request_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudentCancellation {
    pub student_name: String,
    pub course_name: String,
    pub instructor_name: String,
    pub cancel_reason: String,
}
