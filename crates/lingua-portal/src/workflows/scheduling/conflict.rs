use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime};

use super::domain::TeacherId;
use super::repository::CourseSchedule;
use crate::workflows::store::RepositoryError;

const DEFAULT_SLOT_MINUTES: i64 = 60;

/// Half-open `[start, end)` teaching slot parsed from `HH:MM` or `HH:MM-HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.split_once('-') {
            Some((start, end)) => {
                let start = parse_clock(start)?;
                let end = parse_clock(end)?;
                (end > start).then_some(Self { start, end })
            }
            None => {
                let start = parse_clock(raw)?;
                let (end, wrapped) =
                    start.overflowing_add_signed(Duration::minutes(DEFAULT_SLOT_MINUTES));
                let end = if wrapped != 0 {
                    NaiveTime::from_hms_opt(23, 59, 59)?
                } else {
                    end
                };
                Some(Self { start, end })
            }
        }
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

fn parse_clock(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

/// Two slot strings clash when their parsed ranges overlap; unparseable slots only
/// clash with an identical string.
pub fn slots_clash(left: &str, right: &str) -> bool {
    match (TimeSlot::parse(left), TimeSlot::parse(right)) {
        (Some(a), Some(b)) => a.overlaps(&b),
        _ => left.trim() == right.trim(),
    }
}

/// Answers whether a teacher is already teaching during the requested slot.
#[async_trait]
pub trait ConflictChecker: Send + Sync {
    async fn has_conflict(
        &self,
        teacher: &TeacherId,
        date: NaiveDate,
        time: &str,
    ) -> Result<bool, RepositoryError>;
}

/// Conflict checker backed by the course timetable.
#[derive(Debug)]
pub struct ScheduleConflictChecker<S> {
    schedule: Arc<S>,
}

impl<S> ScheduleConflictChecker<S> {
    pub fn new(schedule: Arc<S>) -> Self {
        Self { schedule }
    }
}

#[async_trait]
impl<S> ConflictChecker for ScheduleConflictChecker<S>
where
    S: CourseSchedule + 'static,
{
    async fn has_conflict(
        &self,
        teacher: &TeacherId,
        date: NaiveDate,
        time: &str,
    ) -> Result<bool, RepositoryError> {
        let courses = self.schedule.courses_on(teacher, date)?;
        Ok(courses
            .iter()
            .any(|course| slots_clash(&course.course_time, time)))
    }
}
