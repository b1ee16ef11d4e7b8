use crewmarket_core::UserId;

/// Verified actor identity for a request.
///
/// Authentication happens upstream (an external collaborator); by the time a
/// request reaches a handler this context is present for all protected routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ActorContext {
    user_id: UserId,
}

impl ActorContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
