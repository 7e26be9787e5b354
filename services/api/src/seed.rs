use crate::infra::Portal;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use lingua_portal::error::AppError;
use lingua_portal::workflows::consultations::{ConsultationKind, NewConsultation};
use lingua_portal::workflows::events::Event;
use lingua_portal::workflows::membership::{NewPlan, PlanType};
use lingua_portal::workflows::scheduling::{
    ContractType, NewLeaveRequest, NewStudentCancellation, ScheduledCourse, Teacher, TeacherId,
    TeachingCategory,
};
use tracing::info;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SeedSummary {
    pub(crate) teachers: usize,
    pub(crate) courses: usize,
    pub(crate) leave_requests: usize,
    pub(crate) cancellations: usize,
    pub(crate) consultations: usize,
    pub(crate) plans: usize,
    pub(crate) events: usize,
}

struct TeacherSeed {
    id: &'static str,
    name: &'static str,
    contract: ContractType,
    categories: &'static [TeachingCategory],
    languages: &'static [&'static str],
    active: bool,
}

const TEACHERS: &[TeacherSeed] = &[
    TeacherSeed {
        id: "t-001",
        name: "Amy Chen",
        contract: ContractType::FullTime,
        categories: &[TeachingCategory::English, TeachingCategory::Business],
        languages: &["English", "Mandarin"],
        active: true,
    },
    TeacherSeed {
        id: "t-002",
        name: "Ben Walker",
        contract: ContractType::FullTime,
        categories: &[TeachingCategory::English],
        languages: &["English"],
        active: true,
    },
    TeacherSeed {
        id: "t-003",
        name: "Cora Lin",
        contract: ContractType::PartTime,
        categories: &[TeachingCategory::Business],
        languages: &["English", "Mandarin"],
        active: true,
    },
    TeacherSeed {
        id: "t-004",
        name: "Daichi Sato",
        contract: ContractType::Freelance,
        categories: &[TeachingCategory::Japanese],
        languages: &["Japanese", "English"],
        active: true,
    },
    TeacherSeed {
        id: "t-005",
        name: "Eva Novak",
        contract: ContractType::PartTime,
        categories: &[TeachingCategory::English, TeachingCategory::Chinese],
        languages: &["English", "Mandarin", "Czech"],
        active: true,
    },
    TeacherSeed {
        id: "t-006",
        name: "Fang Liu",
        contract: ContractType::FullTime,
        categories: &[TeachingCategory::Chinese],
        languages: &["Mandarin", "Taiwanese"],
        active: true,
    },
    TeacherSeed {
        id: "t-007",
        name: "Olive Grant",
        contract: ContractType::Freelance,
        categories: &[TeachingCategory::English],
        languages: &["English"],
        active: false,
    },
];

fn teacher(seed: &TeacherSeed) -> Teacher {
    Teacher {
        id: TeacherId(seed.id.to_string()),
        name: seed.name.to_string(),
        email: format!(
            "{}@lingua.example",
            seed.name.to_lowercase().replace(' ', ".")
        ),
        contract_type: seed.contract,
        expertise: vec!["Conversation".to_string(), "Exam preparation".to_string()],
        teaching_category: seed.categories.to_vec(),
        qualification: vec!["CELTA".to_string()],
        languages: seed.languages.iter().map(|l| l.to_string()).collect(),
        experience: 5,
        teaching_hours: 18,
        rating: 4.6,
        active: seed.active,
    }
}

/// Populate every store with a small, coherent data set anchored on `today`.
pub(crate) fn seed_demo_data(portal: &Portal, today: NaiveDate) -> Result<SeedSummary, AppError> {
    let mut summary = SeedSummary::default();
    let course_day = today + Duration::days(3);

    for seed in TEACHERS {
        portal.directory.add(teacher(seed))?;
        summary.teachers += 1;
    }

    for (teacher_id, course_name, course_time) in [
        ("t-005", "Conversational Chinese", "19:30-21:00"),
        ("t-003", "Business Writing", "10:00-12:00"),
        ("t-004", "JLPT N3 Prep", "19:00"),
    ] {
        portal.schedule.add(ScheduledCourse {
            teacher_id: TeacherId(teacher_id.to_string()),
            course_name: course_name.to_string(),
            course_date: course_day,
            course_time: course_time.to_string(),
        })?;
        summary.courses += 1;
    }

    for (teacher_name, course_name, course_time, reason) in [
        ("Amy Chen", "英文會話 中級", "19:00-21:00", "Medical appointment"),
        ("Fang Liu", "華語正音班", "10:00-11:30", "Family emergency"),
        ("Daichi Sato", "Japanese for Travel", "18:30-20:00", "Conference"),
    ] {
        portal.leaves.submit_on(
            NewLeaveRequest {
                teacher_name: teacher_name.to_string(),
                teacher_email: format!(
                    "{}@lingua.example",
                    teacher_name.to_lowercase().replace(' ', ".")
                ),
                course_name: course_name.to_string(),
                course_date: course_day,
                course_time: course_time.to_string(),
                leave_reason: reason.to_string(),
                student_count: 10,
                classroom: "Room 301".to_string(),
            },
            today,
        )?;
        summary.leave_requests += 1;
    }

    portal.cancellations.submit_on(
        NewStudentCancellation {
            student_name: "Pei Chen".to_string(),
            course_name: "英文會話 中級".to_string(),
            instructor_name: "Amy Chen".to_string(),
            cancel_reason: "Business trip".to_string(),
        },
        today,
    )?;
    summary.cancellations += 1;

    for (kind, name, company, participants) in [
        (ConsultationKind::Individual, "Hana Wu", None, None),
        (
            ConsultationKind::Corporate,
            "Ivan Petrov",
            Some("Northwind Logistics"),
            Some(24),
        ),
        (
            ConsultationKind::Corporate,
            "Gina Park",
            Some("Contoso Semiconductors"),
            Some(40),
        ),
    ] {
        portal.consultations.create(NewConsultation {
            kind,
            name: name.to_string(),
            email: format!("{}@mail.example", name.to_lowercase().replace(' ', ".")),
            phone: "02-2345-6789".to_string(),
            company: company.map(str::to_string),
            job_title: company.map(|_| "Training Manager".to_string()),
            training_needs: vec!["Business English".to_string()],
            participants,
            requirements: None,
            preferred_language: Some("English".to_string()),
        })?;
        summary.consultations += 1;
    }

    for (name, plan_type, months, price, popular) in [
        ("Starter", PlanType::Individual, 3, 9_600, false),
        ("Annual Unlimited", PlanType::Individual, 12, 32_000, true),
        ("Team Growth", PlanType::Business, 12, 180_000, false),
    ] {
        portal.plans.create(NewPlan {
            name: name.to_string(),
            plan_type,
            duration_months: months,
            price,
            currency: "TWD".to_string(),
            features: vec![
                "Unlimited group classes".to_string(),
                "Monthly progress review".to_string(),
            ],
            popular,
            active: true,
        })?;
        summary.plans += 1;
    }

    let starts_at = |days: i64| {
        let date = today + Duration::days(days);
        Utc.from_utc_datetime(&date.and_hms_opt(11, 0, 0).unwrap_or_default())
    };
    for (id, title, category, language, days, capacity, registered, price) in [
        ("evt-001", "English Speaking Salon", "salon", "English", 5, 16, 9, 300),
        ("evt-002", "Japanese Tea Ceremony Workshop", "workshop", "Japanese", 9, 12, 12, 800),
        ("evt-003", "Business Presentation Bootcamp", "workshop", "English", 14, 20, 4, 1500),
    ] {
        portal.catalog.add(Event {
            id: id.to_string(),
            title: title.to_string(),
            category: category.to_string(),
            language: language.to_string(),
            level: "all levels".to_string(),
            starts_at: starts_at(days),
            duration_minutes: 120,
            location: "Taipei Main Campus".to_string(),
            capacity,
            registered,
            price,
        })?;
        summary.events += 1;
    }

    info!(?summary, "demo data seeded");
    Ok(summary)
}
