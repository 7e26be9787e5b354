use crate::infra::{parse_date, Portal};
use crate::seed::seed_demo_data;
use chrono::{Local, NaiveDate};
use clap::Args;
use lingua_portal::config::LeadWebhookConfig;
use lingua_portal::error::AppError;
use lingua_portal::workflows::scheduling::{
    AssignSubstitute, EligibleSubstitutes, LeaveQuery, LeaveRequest, LeaveRequestId,
    ReviewerNote,
};
use std::time::Duration;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Anchor date for the seeded data (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Reviewer recorded on the demo transitions.
    #[arg(long, default_value = "demo.admin@lingua.example")]
    pub(crate) reviewer: String,
}

#[derive(Args, Debug)]
pub(crate) struct LeaveEligibleArgs {
    /// Leave request id, e.g. leave-000001
    #[arg(long)]
    pub(crate) request_id: String,
    /// Anchor date for the seeded data (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

fn seeded_portal(today: Option<NaiveDate>) -> Result<Portal, AppError> {
    let portal = Portal::in_memory(&LeadWebhookConfig {
        url: None,
        timeout: Duration::from_secs(10),
    })?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    seed_demo_data(&portal, today)?;
    Ok(portal)
}

pub(crate) async fn run_leave_eligible(args: LeaveEligibleArgs) -> Result<(), AppError> {
    let portal = seeded_portal(args.today)?;
    let id = LeaveRequestId(args.request_id);
    let request = portal.leaves.get(&id)?;
    let eligible = portal.leaves.eligible_substitutes(&id).await?;

    render_request(&request);
    render_eligible(&eligible);
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, reviewer } = args;
    let portal = seeded_portal(today)?;

    println!("=== Lingua Portal: substitute workflow demo ===");
    let pending = portal.leaves.list(&LeaveQuery::default())?;
    println!("Pending leave requests: {}", pending.len());
    for request in &pending {
        println!(
            "  - {} | {} | {} {} | {}",
            request.id, request.teacher_name, request.course_date, request.course_time, request.course_name
        );
    }

    let Some(request) = pending.iter().find(|request| request.course_name.contains("英文")) else {
        println!("No English course leave request in the seed data; nothing to assign.");
        return Ok(());
    };

    println!();
    render_request(request);
    let eligible = portal.leaves.eligible_substitutes(&request.id).await?;
    render_eligible(&eligible);

    let Some(first) = eligible.teachers.first() else {
        println!("No eligible substitute available; the request stays pending.");
        return Ok(());
    };

    let approved = portal
        .leaves
        .assign_substitute(
            &request.id,
            AssignSubstitute {
                teacher_id: first.id.clone(),
                reviewer: reviewer.clone(),
                note: Some("Covered from the demo walkthrough".to_string()),
            },
        )
        .await?;
    println!();
    println!(
        "Assigned {} -> status {}",
        approved
            .substitute()
            .map(|substitute| substitute.name.as_str())
            .unwrap_or("-"),
        approved.status()
    );

    let cancelled = portal.leaves.cancel(
        &request.id,
        ReviewerNote {
            reviewer: reviewer.clone(),
            note: Some("Teacher is available after all".to_string()),
        },
    )?;
    println!(
        "Cancelled -> status {}, substitute released: {}",
        cancelled.status(),
        cancelled.substitute().is_none()
    );

    if let Some(other) = pending.iter().find(|other| other.id != request.id) {
        let rejected = portal.leaves.reject(
            &other.id,
            ReviewerNote {
                reviewer,
                note: Some("Please swap with a colleague instead".to_string()),
            },
        )?;
        println!("Rejected {} -> status {}", rejected.id, rejected.status());
    }

    println!();
    println!("Review history for {}:", cancelled.id);
    for entry in &cancelled.history {
        println!(
            "  - {} by {} at {}{}",
            entry.status,
            entry.reviewer,
            entry.at.format("%Y-%m-%d %H:%M"),
            entry
                .substitute
                .as_ref()
                .map(|substitute| format!(" (substitute {})", substitute.name))
                .unwrap_or_default()
        );
    }

    Ok(())
}

fn render_request(request: &LeaveRequest) {
    println!("Leave request {}", request.id);
    println!("  Teacher: {} <{}>", request.teacher_name, request.teacher_email);
    println!(
        "  Course: {} on {} at {} ({} students, {})",
        request.course_name,
        request.course_date,
        request.course_time,
        request.student_count,
        request.classroom
    );
    println!("  Status: {}", request.status());
}

fn render_eligible(eligible: &EligibleSubstitutes) {
    let categories: Vec<&str> = eligible
        .required_categories
        .iter()
        .map(|category| category.label())
        .collect();
    println!("  Required categories: {}", categories.join(", "));

    if eligible.teachers.is_empty() {
        println!("  Eligible substitutes: none");
        return;
    }
    println!("  Eligible substitutes:");
    for teacher in &eligible.teachers {
        println!(
            "    - {} ({}) rating {:.1}, {} hrs/week",
            teacher.name, teacher.id, teacher.rating, teacher.teaching_hours
        );
    }
}
