use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::conflict::{ConflictChecker, TimeSlot};
use super::domain::{
    LeaveAction, LeaveRequest, LeaveRequestId, LeaveState, LeaveStatus, NewLeaveRequest,
    ReviewEntry, Teacher, TeacherId, TeachingCategory, TransitionError,
};
use super::eligibility::{EligibilityFilter, EligibleSubstitutes};
use super::repository::{LeaveRepository, TeacherDirectory};
use crate::workflows::store::RepositoryError;

/// Filters accepted by the leave request listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveQuery {
    pub status: Option<LeaveStatus>,
    pub teacher_email: Option<String>,
}

/// Reviewer identity and optional note attached to a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerNote {
    pub reviewer: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignSubstitute {
    pub teacher_id: TeacherId,
    pub reviewer: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Payload of the generic review endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub status: LeaveStatus,
    pub reviewer: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub substitute_teacher_id: Option<TeacherId>,
}

/// Service owning the leave request lifecycle and substitute assignment.
pub struct LeaveService<L, D, C> {
    leaves: Arc<L>,
    directory: Arc<D>,
    filter: EligibilityFilter<C>,
    sequence: AtomicU64,
}

impl<L, D, C> LeaveService<L, D, C>
where
    L: LeaveRepository + 'static,
    D: TeacherDirectory + 'static,
    C: ConflictChecker + 'static,
{
    pub fn new(leaves: Arc<L>, directory: Arc<D>, checker: Arc<C>) -> Self {
        Self {
            leaves,
            directory,
            filter: EligibilityFilter::new(checker),
            sequence: AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> LeaveRequestId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        LeaveRequestId(format!("leave-{id:06}"))
    }

    /// Record a teacher's leave request as pending, dated today.
    pub fn submit(&self, input: NewLeaveRequest) -> Result<LeaveRequest, LeaveServiceError> {
        self.submit_on(input, Utc::now().date_naive())
    }

    pub fn submit_on(
        &self,
        input: NewLeaveRequest,
        request_date: NaiveDate,
    ) -> Result<LeaveRequest, LeaveServiceError> {
        validate_new_request(&input)?;

        let NewLeaveRequest {
            teacher_name,
            teacher_email,
            course_name,
            course_date,
            course_time,
            leave_reason,
            student_count,
            classroom,
        } = input;

        let record = LeaveRequest {
            id: self.next_id(),
            teacher_name: teacher_name.trim().to_string(),
            teacher_email: teacher_email.trim().to_string(),
            course_name: course_name.trim().to_string(),
            course_date,
            course_time: course_time.trim().to_string(),
            leave_reason: leave_reason.trim().to_string(),
            request_date,
            student_count,
            classroom: classroom.trim().to_string(),
            state: LeaveState::Pending,
            review_note: None,
            reviewer: None,
            reviewed_at: None,
            history: Vec::new(),
        };

        let stored = self.leaves.insert(record)?;
        info!(request = %stored.id, teacher = %stored.teacher_email, course = %stored.course_name, "leave request submitted");
        Ok(stored)
    }

    /// Newest requests first; ties broken by id so the order is stable.
    pub fn list(&self, query: &LeaveQuery) -> Result<Vec<LeaveRequest>, LeaveServiceError> {
        let mut records: Vec<LeaveRequest> = self
            .leaves
            .all()?
            .into_iter()
            .filter(|record| query.status.map_or(true, |status| record.status() == status))
            .filter(|record| {
                query.teacher_email.as_deref().map_or(true, |email| {
                    record.teacher_email.eq_ignore_ascii_case(email.trim())
                })
            })
            .collect();

        records.sort_by(|a, b| {
            b.request_date
                .cmp(&a.request_date)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records)
    }

    pub fn get(&self, id: &LeaveRequestId) -> Result<LeaveRequest, LeaveServiceError> {
        self.leaves
            .fetch(id)?
            .ok_or_else(|| LeaveServiceError::NotFound(id.clone()))
    }

    /// Active directory teachers, optionally narrowed to one category, sorted by name.
    pub fn teachers(
        &self,
        category: Option<TeachingCategory>,
    ) -> Result<Vec<Teacher>, LeaveServiceError> {
        let mut teachers: Vec<Teacher> = self
            .directory
            .active()?
            .into_iter()
            .filter(|teacher| category.map_or(true, |c| teacher.teaching_category.contains(&c)))
            .collect();
        teachers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teachers)
    }

    /// Category-matched, conflict-free substitutes for the request.
    pub async fn eligible_substitutes(
        &self,
        id: &LeaveRequestId,
    ) -> Result<EligibleSubstitutes, LeaveServiceError> {
        let record = self.get(id)?;
        self.eligible_for(&record).await
    }

    async fn eligible_for(
        &self,
        record: &LeaveRequest,
    ) -> Result<EligibleSubstitutes, LeaveServiceError> {
        let candidates = self.directory.active()?;
        let assignments = self.leaves.all()?;
        Ok(self
            .filter
            .eligible(record, candidates, &assignments)
            .await?)
    }

    /// Approve the request with the chosen substitute. The eligible list is recomputed
    /// before committing and the teacher must still be on it.
    pub async fn assign_substitute(
        &self,
        id: &LeaveRequestId,
        input: AssignSubstitute,
    ) -> Result<LeaveRequest, LeaveServiceError> {
        let reviewer = require_reviewer(&input.reviewer)?;
        let record = self.get(id)?;

        if !record.state.accepts_assignment() {
            return Err(TransitionError {
                from: record.status(),
                action: "assign substitute",
            }
            .into());
        }

        let teacher = self
            .directory
            .fetch(&input.teacher_id)?
            .ok_or_else(|| LeaveServiceError::UnknownTeacher(input.teacher_id.clone()))?;

        let eligible = self.eligible_for(&record).await?;
        if !eligible.contains(&teacher) {
            warn!(request = %record.id, teacher = %teacher.id, "rejected ineligible substitute");
            return Err(LeaveServiceError::IneligibleSubstitute {
                request: record.id.clone(),
                teacher: teacher.id.clone(),
            });
        }

        self.transition(
            record,
            LeaveAction::AssignSubstitute(teacher.substitute()),
            reviewer,
            input.note,
        )
    }

    pub fn reject(
        &self,
        id: &LeaveRequestId,
        input: ReviewerNote,
    ) -> Result<LeaveRequest, LeaveServiceError> {
        let reviewer = require_reviewer(&input.reviewer)?;
        let record = self.get(id)?;
        self.transition(record, LeaveAction::Reject, reviewer, input.note)
    }

    /// Cancel an approved request and release its substitute.
    pub fn cancel(
        &self,
        id: &LeaveRequestId,
        input: ReviewerNote,
    ) -> Result<LeaveRequest, LeaveServiceError> {
        let reviewer = require_reviewer(&input.reviewer)?;
        let record = self.get(id)?;
        self.transition(record, LeaveAction::Cancel, reviewer, input.note)
    }

    /// Generic review entry point mirroring the review API payload.
    pub async fn review(
        &self,
        id: &LeaveRequestId,
        input: ReviewInput,
    ) -> Result<LeaveRequest, LeaveServiceError> {
        let ReviewInput {
            status,
            reviewer,
            note,
            substitute_teacher_id,
        } = input;

        match status {
            LeaveStatus::Approved => {
                let teacher_id = substitute_teacher_id.ok_or_else(|| {
                    LeaveServiceError::Validation(
                        "approving a leave request requires substituteTeacherId".to_string(),
                    )
                })?;
                self.assign_substitute(
                    id,
                    AssignSubstitute {
                        teacher_id,
                        reviewer,
                        note,
                    },
                )
                .await
            }
            LeaveStatus::Rejected => self.reject(id, ReviewerNote { reviewer, note }),
            LeaveStatus::Cancelled => self.cancel(id, ReviewerNote { reviewer, note }),
            LeaveStatus::Pending => Err(LeaveServiceError::Validation(
                "review status must be approved, rejected or cancelled".to_string(),
            )),
        }
    }

    fn transition(
        &self,
        mut record: LeaveRequest,
        action: LeaveAction,
        reviewer: String,
        note: Option<String>,
    ) -> Result<LeaveRequest, LeaveServiceError> {
        let action_label = action.label();
        let next = record.state.apply(action).map_err(|err| {
            warn!(request = %record.id, from = %err.from, action = err.action, "invalid leave transition");
            err
        })?;

        let note = note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty());
        let now = Utc::now();

        record.history.push(ReviewEntry {
            status: next.status(),
            note: note.clone(),
            reviewer: reviewer.clone(),
            substitute: next.substitute().cloned(),
            at: now,
        });
        record.state = next;
        record.review_note = note;
        record.reviewer = Some(reviewer);
        record.reviewed_at = Some(now);

        self.leaves.update(record.clone())?;
        info!(
            request = %record.id,
            action = action_label,
            status = %record.status(),
            substitute = record.substitute().map(|s| s.id.0.as_str()).unwrap_or("-"),
            "leave request reviewed"
        );
        Ok(record)
    }
}

fn require_reviewer(raw: &str) -> Result<String, LeaveServiceError> {
    let reviewer = raw.trim();
    if reviewer.is_empty() {
        return Err(LeaveServiceError::Validation(
            "reviewer is required".to_string(),
        ));
    }
    Ok(reviewer.to_string())
}

fn validate_new_request(input: &NewLeaveRequest) -> Result<(), LeaveServiceError> {
    let required = [
        ("teacherName", &input.teacher_name),
        ("teacherEmail", &input.teacher_email),
        ("courseName", &input.course_name),
        ("leaveReason", &input.leave_reason),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(LeaveServiceError::Validation(format!("{field} is required")));
    }

    if !input.teacher_email.contains('@') {
        return Err(LeaveServiceError::Validation(
            "teacherEmail must be an email address".to_string(),
        ));
    }

    if TimeSlot::parse(&input.course_time).is_none() {
        return Err(LeaveServiceError::Validation(format!(
            "courseTime '{}' must look like HH:MM or HH:MM-HH:MM",
            input.course_time
        )));
    }

    Ok(())
}

/// Error raised by the leave service.
#[derive(Debug, thiserror::Error)]
pub enum LeaveServiceError {
    #[error("invalid leave request: {0}")]
    Validation(String),
    #[error("leave request {0} not found")]
    NotFound(LeaveRequestId),
    #[error("teacher {0} is not in the directory")]
    UnknownTeacher(TeacherId),
    #[error("teacher {teacher} is not an eligible substitute for {request}")]
    IneligibleSubstitute {
        request: LeaveRequestId,
        teacher: TeacherId,
    },
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
