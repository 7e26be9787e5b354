use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::conflict::{slots_clash, ConflictChecker};
use super::domain::{LeaveRequest, Teacher, TeachingCategory};
use crate::workflows::store::RepositoryError;

/// Keyword rules checked in order; the first rule with a matching keyword wins.
const CATEGORY_RULES: &[(&[&str], &[TeachingCategory])] = &[
    (
        &["英文", "english"],
        &[TeachingCategory::English, TeachingCategory::Business],
    ),
    (
        &["中文", "華語", "chinese"],
        &[TeachingCategory::Chinese, TeachingCategory::Business],
    ),
    (&["日文", "japanese"], &[TeachingCategory::Japanese]),
];

/// Infer the subject categories a substitute must cover for `course_name`.
pub fn required_categories(course_name: &str) -> Vec<TeachingCategory> {
    let normalized = course_name.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| normalized.contains(keyword)))
        .map(|(_, categories)| categories.to_vec())
        .unwrap_or_else(|| TeachingCategory::ordered().to_vec())
}

/// Eligible substitutes for one leave request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleSubstitutes {
    pub required_categories: Vec<TeachingCategory>,
    pub teachers: Vec<Teacher>,
}

impl EligibleSubstitutes {
    pub fn contains(&self, teacher: &Teacher) -> bool {
        self.teachers.iter().any(|candidate| candidate.id == teacher.id)
    }
}

/// Category match + availability filter over directory candidates.
#[derive(Debug)]
pub struct EligibilityFilter<C> {
    checker: Arc<C>,
}

impl<C> EligibilityFilter<C>
where
    C: ConflictChecker + 'static,
{
    pub fn new(checker: Arc<C>) -> Self {
        Self { checker }
    }

    /// Candidates are checked one at a time against the timetable and against the
    /// substitute assignments already approved in `assignments`.
    pub async fn eligible(
        &self,
        request: &LeaveRequest,
        candidates: Vec<Teacher>,
        assignments: &[LeaveRequest],
    ) -> Result<EligibleSubstitutes, RepositoryError> {
        let required = required_categories(&request.course_name);
        let mut teachers = Vec::new();

        for teacher in candidates {
            if !teacher.active || request.requested_by(&teacher) || !teacher.teaches_any(&required)
            {
                continue;
            }

            let busy = self
                .checker
                .has_conflict(&teacher.id, request.course_date, &request.course_time)
                .await?;
            if busy {
                debug!(teacher = %teacher.id, request = %request.id, "substitute has a conflicting course");
                continue;
            }
            if let Some(other) = covering_elsewhere(request, &teacher, assignments) {
                debug!(teacher = %teacher.id, request = %request.id, covering = %other.id, "substitute already covers an overlapping request");
                continue;
            }

            teachers.push(teacher);
        }

        Ok(EligibleSubstitutes {
            required_categories: required,
            teachers,
        })
    }
}

/// An approved request, other than `request`, that `teacher` covers at an overlapping slot.
fn covering_elsewhere<'a>(
    request: &LeaveRequest,
    teacher: &Teacher,
    assignments: &'a [LeaveRequest],
) -> Option<&'a LeaveRequest> {
    assignments.iter().find(|other| {
        other.id != request.id
            && other.course_date == request.course_date
            && other
                .substitute()
                .is_some_and(|substitute| substitute.id == teacher.id)
            && slots_clash(&other.course_time, &request.course_time)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_courses_accept_english_and_business_teachers() {
        assert_eq!(
            required_categories("商務英文會話"),
            vec![TeachingCategory::English, TeachingCategory::Business]
        );
        assert_eq!(
            required_categories("Intermediate ENGLISH Writing"),
            vec![TeachingCategory::English, TeachingCategory::Business]
        );
    }

    #[test]
    fn chinese_keywords_cover_mandarin_variants() {
        for course in ["華語入門", "中文閱讀", "Chinese for Travellers"] {
            assert_eq!(
                required_categories(course),
                vec![TeachingCategory::Chinese, TeachingCategory::Business],
                "{course}"
            );
        }
    }

    #[test]
    fn japanese_courses_only_need_japanese_teachers() {
        assert_eq!(
            required_categories("日文N3衝刺班"),
            vec![TeachingCategory::Japanese]
        );
    }

    #[test]
    fn unknown_courses_accept_every_category() {
        assert_eq!(
            required_categories("Public Speaking Workshop"),
            TeachingCategory::ordered().to_vec()
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        assert_eq!(
            required_categories("English through Japanese anime"),
            vec![TeachingCategory::English, TeachingCategory::Business]
        );
    }
}
