//! Recommendation service - courses and products matched to a student's
//! onboarding profile.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use super::parallel;
use crate::config::MAX_PRODUCT_RECOMMENDATIONS;
use crate::domain::policy::{self, Action};
use crate::domain::recommendation::{product_categories, rank_courses};
use crate::domain::{Actor, Recommendations};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn recommend(&self, actor: Actor) -> AppResult<Recommendations>;
}

pub struct RecommendationEngine<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RecommendationEngine<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> RecommendationService for RecommendationEngine<U> {
    async fn recommend(&self, actor: Actor) -> AppResult<Recommendations> {
        policy::authorize(&actor, Action::ViewRecommendations)?;

        let user = self
            .uow
            .users()
            .find_by_id(actor.id)
            .await?
            .ok_or_not_found("User")?;
        let Some(profile) = user.student_profile else {
            tracing::debug!(user_id = %actor.id, "No student profile; nothing to recommend");
            return Ok(Recommendations::default());
        };

        let courses = self.uow.courses();
        let enrollments = self.uow.enrollments();
        let products = self.uow.products();

        let (candidates, enrolled, products) = parallel::join3(
            courses.list_all_published(),
            enrollments.enrolled_course_ids(actor.id),
            products.top_rated_in_categories(
                product_categories(&profile),
                MAX_PRODUCT_RECOMMENDATIONS,
            ),
        )
        .await?;

        let enrolled: HashSet<_> = enrolled.into_iter().collect();
        Ok(Recommendations {
            courses: rank_courses(candidates, &profile, &enrolled),
            products,
        })
    }
}
