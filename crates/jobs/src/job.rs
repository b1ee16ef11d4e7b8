//! Job entity and the crew-placement state machine.

use serde::{Deserialize, Serialize};

use crewmarket_core::{refs, ApplicationId, BusinessId, DomainError, DomainResult, Entity, JobId, UserId};

/// Crew-placement state of a job.
///
/// An outstanding offer and a confirmed placement are mutually exclusive states
/// of the same axis, so they share one representation instead of two nullable
/// fields. Two paths lead to `Placed`: confirming an offer, and accepting an
/// application directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "user", rename_all = "lowercase")]
pub enum Placement {
    /// No offer outstanding, no crew placed.
    Open,
    /// Proposed to a specific crew user, awaiting confirmation.
    Offered(UserId),
    /// A crew user is confirmed on the job.
    Placed(UserId),
}

impl Placement {
    pub fn offered_to(&self) -> Option<UserId> {
        match self {
            Placement::Offered(user) => Some(*user),
            _ => None,
        }
    }

    pub fn active_crew(&self) -> Option<UserId> {
        match self {
            Placement::Placed(user) => Some(*user),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Placement::Open)
    }

    /// Propose the job to `crew`. Only an open job can be offered.
    pub fn offer(self, crew: UserId) -> DomainResult<Self> {
        match self {
            Placement::Open => Ok(Placement::Offered(crew)),
            Placement::Offered(_) => Err(DomainError::conflict("job already has an outstanding offer")),
            Placement::Placed(_) => Err(DomainError::conflict("job already has an active crew member")),
        }
    }

    /// Withdraw or decline an outstanding offer, reopening the job.
    pub fn withdraw_offer(self) -> DomainResult<Self> {
        match self {
            Placement::Offered(_) => Ok(Placement::Open),
            Placement::Open => Err(DomainError::conflict("job has no outstanding offer")),
            Placement::Placed(_) => Err(DomainError::conflict("job already has an active crew member")),
        }
    }

    /// Confirm `crew` on the job.
    ///
    /// Unifies both entry points to `Placed`: from `Offered` this is the offer
    /// confirmation, from `Open` it is the direct application-acceptance path.
    /// Re-placing the same crew member is a no-op so an interrupted acceptance
    /// can be retried; any other occupant is a conflict.
    pub fn place(self, crew: UserId) -> DomainResult<Self> {
        match self {
            Placement::Open => Ok(Placement::Placed(crew)),
            Placement::Offered(user) if user == crew => Ok(Placement::Placed(crew)),
            Placement::Placed(user) if user == crew => Ok(Placement::Placed(crew)),
            Placement::Offered(_) => Err(DomainError::conflict("job is offered to another user")),
            Placement::Placed(_) => Err(DomainError::conflict("job already has an active crew member")),
        }
    }
}

/// Job entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    /// Owning business (exclusive).
    pub business_id: BusinessId,
    pub title: String,
    pub job_function: String,
    /// Ordered set of application ids; derived from the application records.
    pub applications: Vec<ApplicationId>,
    pub placement: Placement,
}

impl Job {
    pub fn new(
        id: JobId,
        business_id: BusinessId,
        title: impl Into<String>,
        job_function: impl Into<String>,
    ) -> Self {
        Self {
            id,
            business_id,
            title: title.into(),
            job_function: job_function.into(),
            applications: Vec::new(),
            placement: Placement::Open,
        }
    }

    /// Record an application against this job. Idempotent.
    pub fn record_application(&mut self, id: ApplicationId) -> bool {
        refs::insert_unique(&mut self.applications, id)
    }

    pub fn remove_application(&mut self, id: ApplicationId) -> bool {
        refs::remove_value(&mut self.applications, &id)
    }

    pub fn offered_to(&self) -> Option<UserId> {
        self.placement.offered_to()
    }

    pub fn active_crew(&self) -> Option<UserId> {
        self.placement.active_crew()
    }
}

impl Entity for Job {
    type Id = JobId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn crew() -> UserId {
        UserId::new()
    }

    #[test]
    fn open_job_can_be_offered_then_placed() {
        let user = crew();
        let placement = Placement::Open.offer(user).unwrap();
        assert_eq!(placement.offered_to(), Some(user));

        let placement = placement.place(user).unwrap();
        assert_eq!(placement.active_crew(), Some(user));
        assert_eq!(placement.offered_to(), None);
    }

    #[test]
    fn offer_withdrawal_reopens_the_job() {
        let placement = Placement::Open.offer(crew()).unwrap();
        let placement = placement.withdraw_offer().unwrap();
        assert!(placement.is_open());
    }

    #[test]
    fn second_offer_conflicts() {
        let placement = Placement::Open.offer(crew()).unwrap();
        let err = placement.offer(crew()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn direct_placement_from_open_is_the_acceptance_path() {
        let user = crew();
        let placement = Placement::Open.place(user).unwrap();
        assert_eq!(placement.active_crew(), Some(user));
    }

    #[test]
    fn placement_is_exclusive_against_other_users() {
        let user = crew();
        let other = crew();

        let offered = Placement::Open.offer(user).unwrap();
        assert!(matches!(offered.place(other), Err(DomainError::Conflict(_))));

        let placed = Placement::Open.place(user).unwrap();
        assert!(matches!(placed.place(other), Err(DomainError::Conflict(_))));
        assert!(matches!(placed.offer(other), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn re_placing_the_same_user_is_a_no_op() {
        let user = crew();
        let placed = Placement::Open.place(user).unwrap();
        assert_eq!(placed.place(user).unwrap(), placed);
    }

    #[test]
    fn record_application_is_idempotent() {
        let mut job = Job::new(JobId::new(), BusinessId::new(), "Gaffer", "lighting");
        let app = ApplicationId::new();
        assert!(job.record_application(app));
        assert!(!job.record_application(app));
        assert!(job.remove_application(app));
        assert!(!job.remove_application(app));
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Offer(u128),
        Withdraw,
        Place(u128),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u128>().prop_map(Op::Offer),
            Just(Op::Withdraw),
            any::<u128>().prop_map(Op::Place),
        ]
    }

    proptest! {
        /// Whatever sequence of transitions is attempted, an offer and a
        /// placement never coexist, and a placement never changes occupant.
        #[test]
        fn placement_invariants_hold_under_arbitrary_transitions(
            ops in proptest::collection::vec(op_strategy(), 1..40)
        ) {
            let mut placement = Placement::Open;
            let mut placed_as: Option<UserId> = None;

            for op in ops {
                let attempted = match op {
                    Op::Offer(raw) => placement.offer(UserId::from_uuid(Uuid::from_u128(raw))),
                    Op::Withdraw => placement.withdraw_offer(),
                    Op::Place(raw) => placement.place(UserId::from_uuid(Uuid::from_u128(raw))),
                };
                if let Ok(next) = attempted {
                    placement = next;
                }

                prop_assert!(
                    placement.offered_to().is_none() || placement.active_crew().is_none()
                );

                if let Some(user) = placed_as {
                    prop_assert_eq!(placement.active_crew(), Some(user));
                }
                placed_as = placement.active_crew();
            }
        }
    }
}
