use super::common::*;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::workflows::scheduling::domain::{LeaveRequest, LeaveStatus, TeacherId, TeachingCategory};
use crate::workflows::scheduling::repository::{
    InMemoryCourseSchedule, InMemoryTeacherDirectory, LeaveRepository,
};
use crate::workflows::scheduling::{
    AssignSubstitute, LeaveQuery, LeaveService, LeaveServiceError, ReviewInput, ReviewerNote,
    ScheduleConflictChecker,
};
use crate::workflows::store::RepositoryError;

fn assign(teacher_id: &str) -> AssignSubstitute {
    AssignSubstitute {
        teacher_id: TeacherId(teacher_id.to_string()),
        reviewer: "admin@lingua.example".to_string(),
        note: Some("Covered by a colleague".to_string()),
    }
}

fn reviewer() -> ReviewerNote {
    ReviewerNote {
        reviewer: "admin@lingua.example".to_string(),
        note: None,
    }
}

fn assert_substitute_invariant(record: &LeaveRequest) {
    match record.status() {
        LeaveStatus::Approved => assert!(record.substitute().is_some(), "{record:?}"),
        _ => assert!(record.substitute().is_none(), "{record:?}"),
    }
}

#[tokio::test]
async fn english_course_substitutes_match_category_and_availability() {
    let fixture = fixture();
    let request = submitted(&fixture, "Business English Conversation");

    let eligible = fixture
        .service
        .eligible_substitutes(&request.id)
        .await
        .expect("eligible list builds");

    assert_eq!(
        eligible.required_categories,
        vec![TeachingCategory::English, TeachingCategory::Business]
    );
    // requester, busy, inactive and Japanese-only teachers are all excluded
    assert_eq!(teacher_ids(&eligible.teachers), vec!["t-002", "t-003"]);
}

#[tokio::test]
async fn eligible_teachers_always_share_a_required_category() {
    let fixture = fixture();
    for course in ["日文會話", "華語正音", "英文簡報", "Pottery for Beginners"] {
        let request = submitted(&fixture, course);
        let eligible = fixture
            .service
            .eligible_substitutes(&request.id)
            .await
            .expect("eligible list builds");

        for teacher in &eligible.teachers {
            assert!(
                teacher.teaches_any(&eligible.required_categories),
                "{} returned for {course}",
                teacher.id
            );
        }
    }
}

#[tokio::test]
async fn uncategorised_courses_consider_every_free_teacher() {
    let fixture = fixture();
    let request = submitted(&fixture, "Pottery for Beginners");

    let eligible = fixture
        .service
        .eligible_substitutes(&request.id)
        .await
        .unwrap();

    assert_eq!(teacher_ids(&eligible.teachers), vec!["t-002", "t-003", "t-004"]);
}

#[tokio::test]
async fn assigning_an_eligible_teacher_approves_the_request() {
    let fixture = fixture();
    let request = submitted(&fixture, "英文寫作");

    let approved = fixture
        .service
        .assign_substitute(&request.id, assign("t-003"))
        .await
        .expect("assignment succeeds");

    assert_eq!(approved.status(), LeaveStatus::Approved);
    let substitute = approved.substitute().expect("substitute recorded");
    assert_eq!(substitute.id, TeacherId("t-003".to_string()));
    assert_eq!(substitute.name, "Cora Lin");
    assert_eq!(approved.reviewer.as_deref(), Some("admin@lingua.example"));
    assert_eq!(approved.history.len(), 1);
    assert_eq!(approved.history[0].status, LeaveStatus::Approved);

    let stored = fixture
        .leaves
        .fetch(&request.id)
        .unwrap()
        .expect("record present");
    assert_eq!(stored, approved);
}

#[tokio::test]
async fn assignment_rejects_teachers_missing_from_eligible_list() {
    let fixture = fixture();
    let request = submitted(&fixture, "English Grammar");

    for candidate in ["t-004", "t-005", "t-001", "t-006"] {
        match fixture
            .service
            .assign_substitute(&request.id, assign(candidate))
            .await
        {
            Err(LeaveServiceError::IneligibleSubstitute { teacher, .. }) => {
                assert_eq!(teacher.0, candidate)
            }
            other => panic!("expected ineligible substitute for {candidate}, got {other:?}"),
        }
    }

    let stored = fixture.service.get(&request.id).unwrap();
    assert_eq!(stored.status(), LeaveStatus::Pending);
    assert!(stored.history.is_empty());
}

#[tokio::test]
async fn assignment_reports_unknown_teachers() {
    let fixture = fixture();
    let request = submitted(&fixture, "English Grammar");

    let err = fixture
        .service
        .assign_substitute(&request.id, assign("t-404"))
        .await
        .expect_err("unknown teacher");
    assert!(matches!(err, LeaveServiceError::UnknownTeacher(_)));
}

#[test]
fn pending_requests_cannot_be_cancelled() {
    let fixture = fixture();
    let request = submitted(&fixture, "English Grammar");

    let err = fixture
        .service
        .cancel(&request.id, reviewer())
        .expect_err("pending cannot be cancelled");
    assert!(matches!(err, LeaveServiceError::Transition(_)));
    assert_eq!(
        fixture.service.get(&request.id).unwrap().status(),
        LeaveStatus::Pending
    );
}

#[tokio::test]
async fn approved_requests_can_be_reassigned_cancelled_and_reopened() {
    let fixture = fixture();
    let request = submitted(&fixture, "English Grammar");
    let service = &fixture.service;

    let approved = service
        .assign_substitute(&request.id, assign("t-002"))
        .await
        .unwrap();
    assert_substitute_invariant(&approved);

    let changed = service
        .assign_substitute(&request.id, assign("t-003"))
        .await
        .unwrap();
    assert_eq!(changed.substitute().unwrap().id.0, "t-003");

    let cancelled = service.cancel(&request.id, reviewer()).unwrap();
    assert_eq!(cancelled.status(), LeaveStatus::Cancelled);
    assert_substitute_invariant(&cancelled);

    let reopened = service
        .assign_substitute(&request.id, assign("t-002"))
        .await
        .unwrap();
    assert_eq!(reopened.status(), LeaveStatus::Approved);
    assert_eq!(reopened.history.len(), 4);
    for entry in &reopened.history {
        assert_eq!(
            entry.substitute.is_some(),
            entry.status == LeaveStatus::Approved
        );
    }
}

#[tokio::test]
async fn rejected_requests_are_terminal() {
    let fixture = fixture();
    let request = submitted(&fixture, "English Grammar");

    let rejected = fixture
        .service
        .reject(
            &request.id,
            ReviewerNote {
                reviewer: "admin@lingua.example".to_string(),
                note: Some("  Exam week  ".to_string()),
            },
        )
        .unwrap();
    assert_eq!(rejected.status(), LeaveStatus::Rejected);
    assert_eq!(rejected.review_note.as_deref(), Some("Exam week"));
    assert_substitute_invariant(&rejected);

    let err = fixture
        .service
        .assign_substitute(&request.id, assign("t-002"))
        .await
        .expect_err("rejected is terminal");
    assert!(matches!(err, LeaveServiceError::Transition(_)));
}

#[tokio::test]
async fn review_dispatches_on_requested_status() {
    let fixture = fixture();
    let request = submitted(&fixture, "English Grammar");

    let missing_substitute = fixture
        .service
        .review(
            &request.id,
            ReviewInput {
                status: LeaveStatus::Approved,
                reviewer: "admin".to_string(),
                note: None,
                substitute_teacher_id: None,
            },
        )
        .await;
    assert!(matches!(
        missing_substitute,
        Err(LeaveServiceError::Validation(_))
    ));

    let back_to_pending = fixture
        .service
        .review(
            &request.id,
            ReviewInput {
                status: LeaveStatus::Pending,
                reviewer: "admin".to_string(),
                note: None,
                substitute_teacher_id: None,
            },
        )
        .await;
    assert!(matches!(back_to_pending, Err(LeaveServiceError::Validation(_))));

    let approved = fixture
        .service
        .review(
            &request.id,
            ReviewInput {
                status: LeaveStatus::Approved,
                reviewer: "admin".to_string(),
                note: Some("ok".to_string()),
                substitute_teacher_id: Some(TeacherId("t-002".to_string())),
            },
        )
        .await
        .expect("review approves");
    assert_eq!(approved.substitute().unwrap().id.0, "t-002");
}

#[test]
fn reviewer_is_required_for_transitions() {
    let fixture = fixture();
    let request = submitted(&fixture, "English Grammar");

    let err = fixture
        .service
        .reject(
            &request.id,
            ReviewerNote {
                reviewer: "   ".to_string(),
                note: None,
            },
        )
        .expect_err("blank reviewer");
    assert!(matches!(err, LeaveServiceError::Validation(_)));
}

#[test]
fn submit_validates_required_fields_and_slot() {
    let fixture = fixture();

    let mut missing_name = leave_input("English Grammar");
    missing_name.teacher_name = " ".to_string();
    assert!(matches!(
        fixture.service.submit(missing_name),
        Err(LeaveServiceError::Validation(message)) if message.contains("teacherName")
    ));

    let mut bad_slot = leave_input("English Grammar");
    bad_slot.course_time = "after lunch".to_string();
    assert!(matches!(
        fixture.service.submit(bad_slot),
        Err(LeaveServiceError::Validation(message)) if message.contains("courseTime")
    ));

    let mut bad_email = leave_input("English Grammar");
    bad_email.teacher_email = "amy".to_string();
    assert!(fixture.service.submit(bad_email).is_err());
}

#[tokio::test]
async fn list_filters_by_status_and_orders_newest_first() {
    let fixture = fixture();
    let service = &fixture.service;
    let day = |d: u32| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();

    let older = service
        .submit_on(leave_input("English Grammar"), day(1))
        .unwrap();
    let newer = service
        .submit_on(leave_input("日文會話"), day(5))
        .unwrap();
    let mut other_teacher = leave_input("華語正音");
    other_teacher.teacher_email = "ben.walker@lingua.example".to_string();
    let same_day = service.submit_on(other_teacher, day(5)).unwrap();

    service
        .assign_substitute(&older.id, assign("t-002"))
        .await
        .unwrap();

    let all = service.list(&LeaveQuery::default()).unwrap();
    let ids: Vec<_> = all.iter().map(|record| record.id.clone()).collect();
    assert_eq!(ids, vec![same_day.id.clone(), newer.id.clone(), older.id.clone()]);

    let pending = service
        .list(&LeaveQuery {
            status: Some(LeaveStatus::Pending),
            teacher_email: None,
        })
        .unwrap();
    assert_eq!(pending.len(), 2);

    let mine = service
        .list(&LeaveQuery {
            status: None,
            teacher_email: Some("AMY.CHEN@lingua.example".to_string()),
        })
        .unwrap();
    assert_eq!(mine.len(), 2);
}

#[test]
fn repository_failures_propagate() {
    let directory = Arc::new(InMemoryTeacherDirectory::with_teachers(teachers()));
    let checker = Arc::new(ScheduleConflictChecker::new(Arc::new(
        InMemoryCourseSchedule::default(),
    )));
    let service = LeaveService::new(Arc::new(UnavailableLeaves), directory, checker);

    match service.submit(leave_input("English Grammar")) {
        Err(LeaveServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected repository error, got {other:?}"),
    }
}

#[tokio::test]
async fn approved_substitute_is_not_double_booked_at_an_overlapping_slot() {
    let fixture = fixture();
    let first = submitted(&fixture, "English Grammar");
    let second = submitted(&fixture, "English Conversation");
    let mut morning_input = leave_input("English Reading");
    morning_input.course_time = "09:00-10:00".to_string();
    let morning = fixture.service.submit(morning_input).unwrap();

    fixture
        .service
        .assign_substitute(&first.id, assign("t-002"))
        .await
        .expect("first assignment succeeds");

    let eligible = fixture
        .service
        .eligible_substitutes(&second.id)
        .await
        .expect("eligible list builds");
    assert_eq!(teacher_ids(&eligible.teachers), vec!["t-003"]);

    let err = fixture
        .service
        .assign_substitute(&second.id, assign("t-002"))
        .await
        .expect_err("t-002 already covers 19:00-21:00");
    assert!(matches!(err, LeaveServiceError::IneligibleSubstitute { .. }));
    assert_eq!(
        fixture.service.get(&second.id).unwrap().status(),
        LeaveStatus::Pending
    );

    // a later slot on the same day and re-approving the same request stay open
    let morning_eligible = fixture
        .service
        .eligible_substitutes(&morning.id)
        .await
        .unwrap();
    assert!(teacher_ids(&morning_eligible.teachers).contains(&"t-002"));
    let reassigned = fixture
        .service
        .assign_substitute(&first.id, assign("t-002"))
        .await
        .expect("same substitute can be re-confirmed");
    assert_eq!(reassigned.substitute().unwrap().id.0, "t-002");
}

#[tokio::test]
async fn cancelling_an_assignment_frees_the_substitute() {
    let fixture = fixture();
    let first = submitted(&fixture, "English Grammar");
    let second = submitted(&fixture, "English Conversation");

    fixture
        .service
        .assign_substitute(&first.id, assign("t-002"))
        .await
        .unwrap();
    fixture.service.cancel(&first.id, reviewer()).unwrap();

    let approved = fixture
        .service
        .assign_substitute(&second.id, assign("t-002"))
        .await
        .expect("released substitute can cover another request");
    assert_substitute_invariant(&approved);
}
