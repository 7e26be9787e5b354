use super::domain::{MemberCardPlan, PlanId};
use crate::workflows::store::{MemoryStore, RepositoryError};

pub trait PlanRepository: Send + Sync {
    fn insert(&self, plan: MemberCardPlan) -> Result<MemberCardPlan, RepositoryError>;
    fn update(&self, plan: MemberCardPlan) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &PlanId) -> Result<Option<MemberCardPlan>, RepositoryError>;
    fn delete(&self, id: &PlanId) -> Result<MemberCardPlan, RepositoryError>;
    fn all(&self) -> Result<Vec<MemberCardPlan>, RepositoryError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryPlanRepository {
    plans: MemoryStore<PlanId, MemberCardPlan>,
}

impl PlanRepository for InMemoryPlanRepository {
    fn insert(&self, plan: MemberCardPlan) -> Result<MemberCardPlan, RepositoryError> {
        self.plans.insert_new(plan.id.clone(), plan)
    }

    fn update(&self, plan: MemberCardPlan) -> Result<(), RepositoryError> {
        self.plans.replace(plan.id.clone(), plan)
    }

    fn fetch(&self, id: &PlanId) -> Result<Option<MemberCardPlan>, RepositoryError> {
        self.plans.get(id)
    }

    fn delete(&self, id: &PlanId) -> Result<MemberCardPlan, RepositoryError> {
        self.plans.remove(id)
    }

    fn all(&self) -> Result<Vec<MemberCardPlan>, RepositoryError> {
        self.plans.values()
    }
}
