use std::{
    collections::HashSet,
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

use log::{debug, trace};

use super::{Validate, ValidationError};
use crate::api::ClientError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormKind {
    Login,
    Register,
    AddPlace,
    AddReview,
    AddUser,
    DeletePlace,
    DeleteReview,
    DeleteUser,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("This form is already being submitted. Please wait.")]
    InFlight,
    #[error(transparent)]
    Api(#[from] ClientError),
}

/// Form kind, owner, and the resource the form acts on (if any).
type Key = (FormKind, String, Option<String>);

/// Submissions currently waiting on the backend, shared by every request.
#[derive(Debug, Default)]
pub struct InFlight {
    active: Mutex<HashSet<Key>>,
}

impl InFlight {
    fn claim(self: &Arc<Self>, key: Key) -> Option<Claim> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(key.clone()) {
            return None;
        }
        Some(Claim {
            registry: Arc::clone(self),
            key,
        })
    }

    #[cfg(test)]
    pub fn is_active(&self, key: &Key) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

/// Releases the in-flight slot when dropped.
struct Claim {
    registry: Arc<InFlight>,
    key: Key,
}

impl Drop for Claim {
    fn drop(&mut self) {
        self.registry
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

/// Drives one form from submit to outcome.
///
/// `owner` identifies whose submission this is (the session token, or the
/// e-mail address for anonymous forms). Forms that act on one resource name
/// it with [`FormController::targeting`]. One owner can only have one
/// submission of a given kind in flight per target.
pub struct FormController {
    kind: FormKind,
    owner: String,
    target: Option<String>,
    phase: Phase,
    registry: Arc<InFlight>,
}

impl FormController {
    pub fn new(kind: FormKind, owner: impl Into<String>, registry: Arc<InFlight>) -> Self {
        FormController {
            kind,
            owner: owner.into(),
            target: None,
            phase: Phase::Idle,
            registry,
        }
    }

    pub fn targeting(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn key(&self) -> Key {
        (self.kind, self.owner.clone(), self.target.clone())
    }

    fn enter(&mut self, phase: Phase) {
        trace!("{:?} form: {:?} -> {:?}", self.kind, self.phase, phase);
        self.phase = phase;
    }

    pub async fn submit<V, T, F, Fut>(&mut self, form: &V, action: F) -> Result<T, FormError>
    where
        V: Validate,
        F: FnOnce(V::Output) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        self.enter(Phase::Validating);
        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(err) => {
                debug!("{:?} form rejected: {}", self.kind, err);
                self.enter(Phase::Idle);
                return Err(err.into());
            }
        };

        let Some(_claim) = self.registry.claim(self.key()) else {
            debug!(
                "{:?} form for {:?} already in flight, ignoring resubmit",
                self.kind, self.target
            );
            self.enter(Phase::Failed);
            return Err(FormError::InFlight);
        };

        self.enter(Phase::Submitting);
        match action(payload).await {
            Ok(outcome) => {
                self.enter(Phase::Succeeded);
                Ok(outcome)
            }
            Err(err) => {
                self.enter(Phase::Failed);
                Err(err.into())
            }
        }
    }

    /// The user has seen the failure; the form may be submitted again.
    #[cfg(test)]
    pub fn acknowledge(&mut self) {
        if self.phase == Phase::Failed {
            self.enter(Phase::Idle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    struct Rating(&'static str);

    impl Validate for Rating {
        type Output = u8;

        fn validate(&self) -> Result<u8, ValidationError> {
            super::super::validate::rating(self.0)
        }
    }

    fn controller(registry: &Arc<InFlight>) -> FormController {
        FormController::new(FormKind::AddReview, "token", Arc::clone(registry))
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_action() {
        let registry = Arc::new(InFlight::default());
        let calls = AtomicUsize::new(0);
        let mut form = controller(&registry);

        let result = form
            .submit(&Rating("6"), |_| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(matches!(
            result,
            Err(FormError::Invalid(ValidationError::RatingOutOfRange))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(form.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn success_and_failure_are_terminal_until_acknowledged() {
        let registry = Arc::new(InFlight::default());

        let mut ok = controller(&registry);
        let value = ok.submit(&Rating("4"), |rating| async move { Ok(rating) }).await;
        assert_eq!(value.unwrap(), 4);
        assert_eq!(ok.phase(), Phase::Succeeded);

        let mut failing = controller(&registry);
        let result: Result<(), _> = failing
            .submit(&Rating("4"), |_| async {
                Err(ClientError::Api {
                    status: 400,
                    message: "nope".to_owned(),
                })
            })
            .await;
        assert_eq!(result.unwrap_err().to_string(), "nope");
        assert_eq!(failing.phase(), Phase::Failed);

        failing.acknowledge();
        assert_eq!(failing.phase(), Phase::Idle);
        assert!(!registry.is_active(&failing.key()));
    }

    #[tokio::test]
    async fn double_submit_is_rejected_while_in_flight() {
        let registry = Arc::new(InFlight::default());
        let (release, released) = oneshot::channel::<()>();
        let (started_tx, started) = oneshot::channel::<()>();

        let mut first = controller(&registry);
        let mut second = controller(&registry);

        let first_submit = first.submit(&Rating("3"), |_| async move {
            let _ = started_tx.send(());
            let _ = released.await;
            Ok("first")
        });
        let second_submit = async {
            let _ = started.await;
            let result = second
                .submit(&Rating("3"), |_| async { Ok("second") })
                .await;
            let _ = release.send(());
            result
        };

        let (first_result, second_result) = futures::join!(first_submit, second_submit);
        assert_eq!(first_result.unwrap(), "first");
        assert!(matches!(second_result, Err(FormError::InFlight)));
        assert!(!registry.is_active(&first.key()));
    }

    #[tokio::test]
    async fn different_owners_do_not_block_each_other() {
        let registry = Arc::new(InFlight::default());
        let held = registry.claim((FormKind::AddReview, "someone-else".to_owned(), None));
        assert!(held.is_some());

        let mut form = controller(&registry);
        assert!(form.submit(&Rating("2"), |_| async { Ok(()) }).await.is_ok());
    }

    #[tokio::test]
    async fn different_targets_do_not_block_each_other() {
        let registry = Arc::new(InFlight::default());
        let delete = |target: &str| {
            FormController::new(FormKind::DeleteUser, "token", Arc::clone(&registry)).targeting(target)
        };
        let (release, released) = oneshot::channel::<()>();
        let (started_tx, started) = oneshot::channel::<()>();

        let mut first = delete("u1");
        let mut other_target = delete("u2");
        let mut same_target = delete("u1");

        let first_submit = first.submit(&(), |()| async move {
            let _ = started_tx.send(());
            let _ = released.await;
            Ok("deleted u1")
        });
        let others = async {
            let _ = started.await;
            let other = other_target.submit(&(), |()| async { Ok("deleted u2") }).await;
            let same = same_target.submit(&(), |()| async { Ok("deleted u1 again") }).await;
            let _ = release.send(());
            (other, same)
        };

        let (first_result, (other_result, same_result)) = futures::join!(first_submit, others);
        assert_eq!(first_result.unwrap(), "deleted u1");
        assert_eq!(other_result.unwrap(), "deleted u2");
        assert!(matches!(same_result, Err(FormError::InFlight)));
    }
}
