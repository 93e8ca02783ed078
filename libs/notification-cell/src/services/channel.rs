use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::models::{
    Notification, NotificationEvent, NotificationId, NotificationKind, NotificationPhase,
    NotificationSettings,
};

const EVENT_BUFFER: usize = 256;

/// Shared, explicitly owned display list of transient notifications.
///
/// Clones share the same list. Every entry runs its own timer task, so a
/// tokio runtime must be active when [`NotificationChannel::notify`] is called.
#[derive(Clone)]
pub struct NotificationChannel {
    settings: NotificationSettings,
    entries: Arc<RwLock<Vec<Notification>>>,
    events: broadcast::Sender<NotificationEvent>,
}

impl NotificationChannel {
    pub fn new(settings: NotificationSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        Self {
            settings,
            entries: Arc::new(RwLock::new(Vec::new())),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.events.subscribe()
    }

    /// Appends a notification and starts its lifecycle.
    pub async fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        let notification = Notification::new(message, kind);
        let id = notification.id;

        match kind {
            NotificationKind::Error => warn!(notification_id = %id, "{}", notification.message),
            _ => info!(notification_id = %id, kind = %kind, "{}", notification.message),
        }

        self.entries.write().await.push(notification.clone());
        self.publish(NotificationEvent::Added(notification));

        let channel = self.clone();
        tokio::spawn(async move {
            channel.run_lifecycle(id).await;
        });

        id
    }

    pub async fn success(&self, message: impl Into<String>) -> NotificationId {
        self.notify(message, NotificationKind::Success).await
    }

    pub async fn error(&self, message: impl Into<String>) -> NotificationId {
        self.notify(message, NotificationKind::Error).await
    }

    pub async fn info(&self, message: impl Into<String>) -> NotificationId {
        self.notify(message, NotificationKind::Info).await
    }

    /// Starts the exit transition right away. Returns `false` when the
    /// notification is already exiting or gone.
    pub async fn dismiss(&self, id: NotificationId) -> bool {
        if !self.begin_exit(id).await {
            return false;
        }

        debug!(notification_id = %id, "Notification dismissed");
        let channel = self.clone();
        tokio::spawn(async move {
            sleep(channel.settings.exit_duration).await;
            channel.remove(id).await;
        });

        true
    }

    pub async fn snapshot(&self) -> Vec<Notification> {
        self.entries.read().await.clone()
    }

    pub async fn phase_of(&self, id: NotificationId) -> Option<NotificationPhase> {
        self.entries.read().await
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.phase)
    }

    async fn run_lifecycle(&self, id: NotificationId) {
        let inserted_at = Instant::now();

        sleep(self.settings.enter_delay).await;
        self.mark_visible(id).await;

        sleep_until(inserted_at + self.settings.dwell).await;
        if self.begin_exit(id).await {
            sleep(self.settings.exit_duration).await;
            self.remove(id).await;
        }
    }

    async fn mark_visible(&self, id: NotificationId) {
        let changed = {
            let mut entries = self.entries.write().await;
            match entries.iter_mut().find(|n| n.id == id) {
                Some(entry) if entry.phase == NotificationPhase::Entering => {
                    entry.phase = NotificationPhase::Visible;
                    true
                }
                _ => false,
            }
        };

        if changed {
            self.publish(NotificationEvent::PhaseChanged { id, phase: NotificationPhase::Visible });
        }
    }

    async fn begin_exit(&self, id: NotificationId) -> bool {
        let changed = {
            let mut entries = self.entries.write().await;
            match entries.iter_mut().find(|n| n.id == id) {
                Some(entry) if entry.phase != NotificationPhase::Exiting => {
                    entry.phase = NotificationPhase::Exiting;
                    true
                }
                _ => false,
            }
        };

        if changed {
            self.publish(NotificationEvent::PhaseChanged { id, phase: NotificationPhase::Exiting });
        }
        changed
    }

    async fn remove(&self, id: NotificationId) {
        let removed = {
            let mut entries = self.entries.write().await;
            let before = entries.len();
            entries.retain(|n| n.id != id);
            entries.len() != before
        };

        if removed {
            self.publish(NotificationEvent::Removed { id });
        }
    }

    fn publish(&self, event: NotificationEvent) {
        // No subscribers is normal for headless use.
        let _ = self.events.send(event);
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new(NotificationSettings::default())
    }
}
