use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

use super::{CredentialPair, RefreshError};
use crate::domain::navigation::{Destination, Navigator};
use crate::infrastructure::oauth::TokenRefresher;
use crate::infrastructure::repositories::{CredentialKey, CredentialStore};

pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(30);

type RefreshOutcome = Result<String, RefreshError>;

/// One caller suspended on the in-flight refresh
type PendingTicket = oneshot::Sender<RefreshOutcome>;

/// `pending` is non-empty only while `refreshing` is set
#[derive(Default)]
struct CoordinatorState {
    refreshing: bool,
    pending: VecDeque<PendingTicket>,
}

/// What a caller does after inspecting the state under the lock
enum Role {
    /// Runs the refresh call with this refresh credential
    Leader(String),
    /// Waits for the leader's outcome
    Follower(oneshot::Receiver<RefreshOutcome>),
    /// A newer access credential is already stored
    Replay(String),
    /// Nothing to refresh with
    SignedOut,
}

/// Single-flight token refresh shared by every request of a gateway.
///
/// The first caller that reports an expired credential becomes the leader
/// and issues the one refresh call; callers arriving while it is in flight
/// are queued and settled, in arrival order, with the leader's outcome.
pub struct RefreshCoordinator {
    store: Arc<dyn CredentialStore>,
    refresher: Arc<dyn TokenRefresher>,
    navigator: Arc<dyn Navigator>,
    refresh_timeout: Option<Duration>,
    state: Mutex<CoordinatorState>,
}

impl RefreshCoordinator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        refresher: Arc<dyn TokenRefresher>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            refresher,
            navigator,
            refresh_timeout: Some(DEFAULT_REFRESH_TIMEOUT),
            state: Mutex::new(CoordinatorState::default()),
        }
    }

    /// Bound the refresh call. `None` waits for the transport indefinitely.
    pub fn with_refresh_timeout(mut self, refresh_timeout: Option<Duration>) -> Self {
        self.refresh_timeout = refresh_timeout;
        self
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.lock().refreshing
    }

    /// Number of callers currently queued behind the in-flight refresh
    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Recover from an authentication-expired response.
    ///
    /// `rejected_token` is the access credential the failed request carried.
    /// Resolves to the access credential the request must be replayed with.
    pub async fn recover(&self, rejected_token: Option<&str>) -> RefreshOutcome {
        match self.assign_role(rejected_token) {
            Role::Replay(access_token) => {
                tracing::debug!("Credential already refreshed, replaying without a new refresh");
                Ok(access_token)
            }
            Role::SignedOut => {
                tracing::warn!("No refresh credential stored, redirecting to login");
                self.navigator.navigate(Destination::Login);
                Err(RefreshError::NoRefreshCredential)
            }
            Role::Follower(receiver) => {
                tracing::debug!("Refresh in flight, queued behind it");
                receiver.await.unwrap_or(Err(RefreshError::Abandoned))
            }
            Role::Leader(refresh_token) => self.lead_refresh(&refresh_token).await,
        }
    }

    fn assign_role(&self, rejected_token: Option<&str>) -> Role {
        let mut state = self.state.lock();

        if state.refreshing {
            let (sender, receiver) = oneshot::channel();
            state.pending.push_back(sender);
            return Role::Follower(receiver);
        }

        match self.store.get(CredentialKey::AccessToken) {
            Some(current) if rejected_token != Some(current.as_str()) => {
                return Role::Replay(current);
            }
            _ => {}
        }

        match self.store.get(CredentialKey::RefreshToken) {
            Some(refresh_token) => {
                state.refreshing = true;
                Role::Leader(refresh_token)
            }
            None => {
                self.store.clear(CredentialKey::AccessToken);
                Role::SignedOut
            }
        }
    }

    async fn lead_refresh(&self, refresh_token: &str) -> RefreshOutcome {
        tracing::info!("Access credential expired, refreshing");

        let mut episode = Episode {
            coordinator: self,
            settled: false,
        };

        let result = match self.refresh_timeout {
            Some(limit) => tokio::time::timeout(limit, self.refresher.refresh(refresh_token))
                .await
                .unwrap_or(Err(RefreshError::Timeout)),
            None => self.refresher.refresh(refresh_token).await,
        };

        episode.settle(result)
    }

    /// Apply the refresh outcome and drain the queue. Returns the leader's outcome.
    fn finish(&self, result: Result<CredentialPair, RefreshError>) -> RefreshOutcome {
        let (outcome, pending) = {
            let mut state = self.state.lock();

            match &result {
                Ok(pair) => self.store.set_pair(pair),
                Err(err) if err.ends_session() => self.store.clear_all(),
                Err(_) => {}
            }

            state.refreshing = false;
            let pending = std::mem::take(&mut state.pending);
            (result.map(|pair| pair.access_token), pending)
        };

        match &outcome {
            Ok(_) => tracing::info!(pending = pending.len(), "Credential refreshed"),
            Err(err) => tracing::warn!(
                error = %err,
                pending = pending.len(),
                "Credential refresh failed"
            ),
        }

        for ticket in pending {
            // A dropped receiver means that caller went away; nothing to settle.
            let _ = ticket.send(outcome.clone());
        }

        if let Err(err) = &outcome {
            if err.ends_session() {
                self.navigator.navigate(Destination::SessionExpired);
            }
        }

        outcome
    }
}

/// Guard over one refresh episode.
///
/// Dropping it unsettled (the leader's future was cancelled) rejects every
/// queued caller and returns the coordinator to idle.
struct Episode<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl Episode<'_> {
    fn settle(&mut self, result: Result<CredentialPair, RefreshError>) -> RefreshOutcome {
        self.settled = true;
        self.coordinator.finish(result)
    }
}

impl Drop for Episode<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("Refresh abandoned by its caller");
            let _ = self.coordinator.finish(Err(RefreshError::Abandoned));
        }
    }
}
