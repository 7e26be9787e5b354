//! Member card plans sold on the pricing page.
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{MemberCardPlan, NewPlan, PlanId, PlanQuery, PlanType, PlanUpdate};
pub use repository::{InMemoryPlanRepository, PlanRepository};
pub use router::plan_router;
pub use service::{PlanError, PlanService};
