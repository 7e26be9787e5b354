use chrono::NaiveDate;
use lingua_portal::config::LeadWebhookConfig;
use lingua_portal::error::AppError;
use lingua_portal::workflows::consultations::{ConsultationService, InMemoryConsultationRepository};
use lingua_portal::workflows::events::{EventService, InMemoryEventCatalog};
use lingua_portal::workflows::leads::{HttpLeadWebhook, LeadCaptureService};
use lingua_portal::workflows::membership::{InMemoryPlanRepository, PlanService};
use lingua_portal::workflows::scheduling::{
    CancellationService, InMemoryCancellationRepository, InMemoryCourseSchedule,
    InMemoryLeaveRepository, InMemoryTeacherDirectory, LeaveService, ScheduleConflictChecker,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type Leaves = LeaveService<
    InMemoryLeaveRepository,
    InMemoryTeacherDirectory,
    ScheduleConflictChecker<InMemoryCourseSchedule>,
>;
pub(crate) type Cancellations = CancellationService<InMemoryCancellationRepository>;
pub(crate) type Consultations = ConsultationService<InMemoryConsultationRepository>;
pub(crate) type Leads = LeadCaptureService<HttpLeadWebhook, InMemoryConsultationRepository>;
pub(crate) type Plans = PlanService<InMemoryPlanRepository>;
pub(crate) type Events = EventService<InMemoryEventCatalog>;

/// Every workflow service wired to in-memory storage.
pub(crate) struct Portal {
    pub(crate) directory: Arc<InMemoryTeacherDirectory>,
    pub(crate) schedule: Arc<InMemoryCourseSchedule>,
    pub(crate) catalog: Arc<InMemoryEventCatalog>,
    pub(crate) leaves: Arc<Leaves>,
    pub(crate) cancellations: Arc<Cancellations>,
    pub(crate) consultations: Arc<Consultations>,
    pub(crate) leads: Arc<Leads>,
    pub(crate) plans: Arc<Plans>,
    pub(crate) events: Arc<Events>,
}

impl Portal {
    pub(crate) fn in_memory(webhook: &LeadWebhookConfig) -> Result<Self, AppError> {
        let directory = Arc::new(InMemoryTeacherDirectory::default());
        let schedule = Arc::new(InMemoryCourseSchedule::default());
        let catalog = Arc::new(InMemoryEventCatalog::default());

        let leaves = Arc::new(LeaveService::new(
            Arc::new(InMemoryLeaveRepository::default()),
            directory.clone(),
            Arc::new(ScheduleConflictChecker::new(schedule.clone())),
        ));
        let consultations = Arc::new(ConsultationService::new(Arc::new(
            InMemoryConsultationRepository::default(),
        )));

        let hook = match &webhook.url {
            Some(url) => {
                info!(%url, timeout_secs = webhook.timeout.as_secs(), "lead webhook configured");
                Some(Arc::new(HttpLeadWebhook::new(url.clone(), webhook.timeout)?))
            }
            None => None,
        };

        Ok(Self {
            leaves,
            cancellations: Arc::new(CancellationService::new(Arc::new(
                InMemoryCancellationRepository::default(),
            ))),
            leads: Arc::new(LeadCaptureService::new(hook, consultations.clone())),
            consultations,
            plans: Arc::new(PlanService::new(Arc::new(InMemoryPlanRepository::default()))),
            events: Arc::new(EventService::new(catalog.clone())),
            directory,
            schedule,
            catalog,
        })
    }
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("invalid date '{value}': {err}"))
}
