use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{MemberCardPlan, NewPlan, PlanId, PlanQuery, PlanUpdate};
use super::repository::PlanRepository;
use crate::workflows::store::RepositoryError;

pub struct PlanService<R> {
    repository: Arc<R>,
    sequence: AtomicU64,
}

impl<R> PlanService<R>
where
    R: PlanRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            sequence: AtomicU64::new(1),
        }
    }

    pub fn create(&self, input: NewPlan) -> Result<MemberCardPlan, PlanError> {
        let name = input.name.trim().to_string();
        check(&name, input.price, input.duration_months)?;

        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let now = Utc::now();
        let plan = MemberCardPlan {
            id: PlanId(format!("plan-{id:06}")),
            name,
            plan_type: input.plan_type,
            duration_months: input.duration_months,
            price: input.price,
            currency: input.currency.trim().to_uppercase(),
            features: input.features,
            popular: input.popular,
            active: input.active,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(plan)?;
        info!(plan = %stored.id, price = stored.price, "member card plan created");
        Ok(stored)
    }

    /// Cheapest first; ties broken by name.
    pub fn list(&self, query: &PlanQuery) -> Result<Vec<MemberCardPlan>, PlanError> {
        let mut plans: Vec<MemberCardPlan> = self
            .repository
            .all()?
            .into_iter()
            .filter(|plan| !query.active_only || plan.active)
            .filter(|plan| query.plan_type.map_or(true, |kind| plan.plan_type == kind))
            .collect();
        plans.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.name.cmp(&b.name)));
        Ok(plans)
    }

    pub fn get(&self, id: &PlanId) -> Result<MemberCardPlan, PlanError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| PlanError::NotFound(id.clone()))
    }

    pub fn update(&self, id: &PlanId, update: PlanUpdate) -> Result<MemberCardPlan, PlanError> {
        let mut plan = self.get(id)?;

        if let Some(name) = update.name {
            plan.name = name.trim().to_string();
        }
        if let Some(plan_type) = update.plan_type {
            plan.plan_type = plan_type;
        }
        if let Some(duration) = update.duration_months {
            plan.duration_months = duration;
        }
        if let Some(price) = update.price {
            plan.price = price;
        }
        if let Some(currency) = update.currency {
            plan.currency = currency.trim().to_uppercase();
        }
        if let Some(features) = update.features {
            plan.features = features;
        }
        if let Some(popular) = update.popular {
            plan.popular = popular;
        }
        if let Some(active) = update.active {
            plan.active = active;
        }
        check(&plan.name, plan.price, plan.duration_months)?;
        plan.updated_at = Utc::now();

        self.repository.update(plan.clone())?;
        info!(plan = %plan.id, active = plan.active, "member card plan updated");
        Ok(plan)
    }

    pub fn delete(&self, id: &PlanId) -> Result<MemberCardPlan, PlanError> {
        match self.repository.delete(id) {
            Ok(plan) => {
                info!(plan = %plan.id, "member card plan deleted");
                Ok(plan)
            }
            Err(RepositoryError::NotFound) => Err(PlanError::NotFound(id.clone())),
            Err(other) => Err(other.into()),
        }
    }
}

fn check(name: &str, price: i64, duration_months: u32) -> Result<(), PlanError> {
    if name.is_empty() {
        return Err(PlanError::Validation("name is required".to_string()));
    }
    if price < 0 {
        return Err(PlanError::Validation("price cannot be negative".to_string()));
    }
    if duration_months == 0 {
        return Err(PlanError::Validation(
            "durationMonths must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("invalid plan: {0}")]
    Validation(String),
    #[error("plan {0} not found")]
    NotFound(PlanId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::membership::domain::PlanType;
    use crate::workflows::membership::repository::InMemoryPlanRepository;

    fn service() -> PlanService<InMemoryPlanRepository> {
        PlanService::new(Arc::new(InMemoryPlanRepository::default()))
    }

    fn plan(name: &str, plan_type: PlanType, price: i64) -> NewPlan {
        NewPlan {
            name: name.to_string(),
            plan_type,
            duration_months: 12,
            price,
            currency: "twd".to_string(),
            features: vec!["Unlimited group classes".to_string()],
            popular: false,
            active: true,
        }
    }

    #[test]
    fn list_sorts_by_price_then_name_and_filters() {
        let service = service();
        service.create(plan("Gold", PlanType::Individual, 12000)).unwrap();
        service.create(plan("Basic", PlanType::Individual, 6000)).unwrap();
        service.create(plan("Academy", PlanType::Individual, 6000)).unwrap();
        let team = service.create(plan("Team", PlanType::Business, 48000)).unwrap();
        service
            .update(
                &team.id,
                PlanUpdate {
                    active: Some(false),
                    ..PlanUpdate::default()
                },
            )
            .unwrap();

        let all: Vec<String> = service
            .list(&PlanQuery::default())
            .unwrap()
            .into_iter()
            .map(|plan| plan.name)
            .collect();
        assert_eq!(all, ["Academy", "Basic", "Gold", "Team"]);

        let active_business = service
            .list(&PlanQuery {
                active_only: true,
                plan_type: Some(PlanType::Business),
            })
            .unwrap();
        assert!(active_business.is_empty());
    }

    #[test]
    fn create_normalises_currency_and_rejects_bad_input() {
        let service = service();
        let created = service.create(plan("Basic", PlanType::Individual, 0)).unwrap();
        assert_eq!(created.currency, "TWD");

        let err = service
            .create(plan("Broken", PlanType::Individual, -1))
            .unwrap_err();
        assert!(matches!(err, PlanError::Validation(_)));

        let mut zero_months = plan("Trial", PlanType::Individual, 100);
        zero_months.duration_months = 0;
        assert!(matches!(
            service.create(zero_months),
            Err(PlanError::Validation(_))
        ));
    }

    #[test]
    fn update_revalidates_and_keeps_unset_fields() {
        let service = service();
        let created = service.create(plan("Gold", PlanType::Individual, 12000)).unwrap();

        let err = service
            .update(
                &created.id,
                PlanUpdate {
                    name: Some("  ".to_string()),
                    ..PlanUpdate::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, PlanError::Validation(_)));
        assert_eq!(service.get(&created.id).unwrap().name, "Gold");

        let updated = service
            .update(
                &created.id,
                PlanUpdate {
                    price: Some(9900),
                    popular: Some(true),
                    ..PlanUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.price, 9900);
        assert!(updated.popular);
        assert_eq!(updated.duration_months, 12);
    }

    #[test]
    fn delete_missing_plan_is_not_found() {
        let service = service();
        let created = service.create(plan("Gold", PlanType::Individual, 12000)).unwrap();
        service.delete(&created.id).unwrap();

        assert!(matches!(
            service.delete(&created.id),
            Err(PlanError::NotFound(_))
        ));
    }
}
