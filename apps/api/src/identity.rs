use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

/// Current signed-in user, if any. Subscribers are notified on sign-in and
/// sign-out; repeating the current state notifies nobody.
pub struct Identity {
    current: watch::Sender<Option<Uuid>>,
}

impl Identity {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Uuid>> {
        self.current.subscribe()
    }

    /// Returns `true` when the identity actually changed.
    pub fn sign_in(&self, user_id: Uuid) -> bool {
        let changed = self.set(Some(user_id));
        if changed {
            info!("User {user_id} signed in");
        }
        changed
    }

    pub fn sign_out(&self) -> bool {
        let changed = self.set(None);
        if changed {
            info!("User signed out");
        }
        changed
    }

    fn set(&self, user_id: Option<Uuid>) -> bool {
        self.current.send_if_modified(|current| {
            if *current == user_id {
                return false;
            }
            *current = user_id;
            true
        })
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}
