//! Channel dispatch. Each channel is gated by its own enable flag and
//! minimum-severity level; a channel failure is logged and never stops
//! the others.

use std::sync::Arc;
use std::thread;

use tracing::{debug, error, info, warn};

use vigil_core::clock::{TimerHandle, TimerSet};
use vigil_core::config::{ChannelsConfig, NotifyConfig};
use vigil_core::errors::NotifyError;
use vigil_core::models::{Channel, NotificationRecord, Severity};
use vigil_core::traits::{UiHost, WebhookTransport};
use vigil_storage::ErrorStorage;

/// Webhook transport over a blocking reqwest client.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl WebhookTransport for ReqwestTransport {
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<(), NotifyError> {
        self.client
            .post(url)
            .json(body)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map(|_| ())
            .map_err(|e| NotifyError::ChannelFailed {
                channel: Channel::Webhook,
                message: e.to_string(),
            })
    }
}

struct ActiveElement {
    element_id: String,
    timer: TimerHandle,
}

pub struct ChannelDispatcher {
    cfg: ChannelsConfig,
    ui_base_duration_ms: u64,
    ui_max_active: usize,
    ui: Option<Box<dyn UiHost>>,
    transport: Option<Arc<dyn WebhookTransport>>,
    active_ui: Vec<ActiveElement>,
    ui_timers: TimerSet<String>,
}

impl ChannelDispatcher {
    pub fn new(cfg: &NotifyConfig) -> Self {
        Self {
            cfg: cfg.channels.clone(),
            ui_base_duration_ms: cfg.effective_ui_base_duration_ms(),
            ui_max_active: cfg.effective_ui_max_active(),
            ui: None,
            transport: None,
            active_ui: Vec::new(),
            ui_timers: TimerSet::new(),
        }
    }

    pub fn set_ui_host(&mut self, ui: Box<dyn UiHost>) {
        self.ui = Some(ui);
    }

    pub fn set_transport(&mut self, transport: Arc<dyn WebhookTransport>) {
        self.transport = Some(transport);
    }

    pub fn apply_config(&mut self, cfg: &NotifyConfig) {
        self.cfg = cfg.channels.clone();
        self.ui_base_duration_ms = cfg.effective_ui_base_duration_ms();
        self.ui_max_active = cfg.effective_ui_max_active();
    }

    /// Deliver to every enabled channel whose level admits the
    /// severity, recording the channels that took it.
    pub fn dispatch(
        &mut self,
        notification: &mut NotificationRecord,
        storage: Option<&mut ErrorStorage>,
        now: u64,
    ) {
        let severity = notification.severity;

        if self.cfg.console.effective_enabled(true) && self.cfg.console.level.admits(severity) {
            self.dispatch_console(notification);
            notification.channels.push(Channel::Console);
        }

        if self.cfg.ui.effective_enabled(true)
            && self.cfg.ui.level.admits(severity)
            && self.ui.is_some()
            && self.dispatch_ui(notification, now)
        {
            notification.channels.push(Channel::Ui);
        }

        if self.cfg.storage.effective_enabled(true) && self.cfg.storage.level.admits(severity) {
            if let Some(storage) = storage {
                storage.store_notification(notification, now);
                notification.channels.push(Channel::Storage);
            }
        }

        if self.cfg.webhook.effective_enabled(false) && self.cfg.webhook.level.admits(severity) {
            if self.dispatch_webhook(notification) {
                notification.channels.push(Channel::Webhook);
            }
        }
    }

    /// Expire UI elements whose display duration has elapsed.
    pub fn tick(&mut self, now: u64) {
        for (handle, element_id) in self.ui_timers.due(now) {
            self.active_ui
                .retain(|active| active.timer != handle);
            if let Some(ui) = &self.ui {
                ui.remove(&element_id);
            }
        }
    }

    pub fn active_ui_count(&self) -> usize {
        self.active_ui.len()
    }

    /// Remove every live UI element and drop pending expiries.
    pub fn destroy(&mut self) {
        if let Some(ui) = &self.ui {
            for active in &self.active_ui {
                ui.remove(&active.element_id);
            }
        }
        self.active_ui.clear();
        self.ui_timers.clear();
    }

    fn dispatch_console(&self, n: &NotificationRecord) {
        match n.severity {
            Severity::Critical | Severity::High => error!(
                id = %n.id,
                severity = %n.severity,
                category = %n.category,
                occurrences = n.occurrence_count,
                "{}", n.message
            ),
            Severity::Medium => warn!(
                id = %n.id,
                category = %n.category,
                occurrences = n.occurrence_count,
                "{}", n.message
            ),
            Severity::Low => info!(
                id = %n.id,
                category = %n.category,
                occurrences = n.occurrence_count,
                "{}", n.message
            ),
        }
    }

    fn dispatch_ui(&mut self, n: &NotificationRecord, now: u64) -> bool {
        // Oldest element yields its slot when the tray is full.
        while self.active_ui.len() >= self.ui_max_active {
            let oldest = self.active_ui.remove(0);
            self.ui_timers.cancel(oldest.timer);
            if let Some(ui) = &self.ui {
                ui.remove(&oldest.element_id);
            }
        }

        let ui = match &self.ui {
            Some(ui) => ui,
            None => return false,
        };
        match ui.attach(n) {
            Ok(element_id) => {
                let duration = ui_duration_ms(self.ui_base_duration_ms, n.severity);
                let timer = self.ui_timers.schedule(now, duration, element_id.clone());
                self.active_ui.push(ActiveElement { element_id, timer });
                true
            }
            Err(e) => {
                warn!(error = %e, "ui channel failed");
                false
            }
        }
    }

    fn dispatch_webhook(&self, n: &NotificationRecord) -> bool {
        let url = match self.cfg.webhook.url.clone() {
            Some(url) => url,
            None => {
                debug!(error = %NotifyError::NoEndpoint, "skipping webhook channel");
                return false;
            }
        };
        let transport = match &self.transport {
            Some(t) => Arc::clone(t),
            None => return false,
        };
        let body = match serde_json::to_value(n) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "webhook payload serialization failed");
                return false;
            }
        };
        // Fire and forget, the ingestion path never waits on the network.
        thread::spawn(move || {
            if let Err(e) = transport.post_json(&url, &body) {
                warn!(error = %e, "webhook delivery failed");
            }
        });
        true
    }
}

/// Display duration scaled by severity from the configured base.
fn ui_duration_ms(base: u64, severity: Severity) -> u64 {
    match severity {
        Severity::Critical => base * 2,
        Severity::High => base * 3 / 2,
        Severity::Medium | Severity::Low => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use vigil_core::config::{ChannelConfig, ChannelLevel, StorageConfig};
    use vigil_core::ids;
    use vigil_core::models::Category;
    use vigil_core::traits::MemoryKvStore;

    #[derive(Default)]
    struct RecordingUi {
        next: AtomicUsize,
        attached: Mutex<Vec<String>>,
        removed: Mutex<Vec<String>>,
    }

    impl UiHost for RecordingUi {
        fn attach(&self, _n: &NotificationRecord) -> Result<String, NotifyError> {
            let id = format!("el_{}", self.next.fetch_add(1, Ordering::SeqCst));
            self.attached.lock().unwrap().push(id.clone());
            Ok(id)
        }

        fn remove(&self, element_id: &str) {
            self.removed.lock().unwrap().push(element_id.to_string());
        }
    }

    struct FailingUi;

    impl UiHost for FailingUi {
        fn attach(&self, _n: &NotificationRecord) -> Result<String, NotifyError> {
            Err(NotifyError::ChannelFailed {
                channel: Channel::Ui,
                message: "host gone".into(),
            })
        }

        fn remove(&self, _element_id: &str) {}
    }

    fn notification(severity: Severity) -> NotificationRecord {
        NotificationRecord {
            id: ids::notification_id(),
            timestamp: 0,
            error_id: Some("err_1".into()),
            message: "something broke".into(),
            severity,
            category: Category::General,
            fingerprint: None,
            occurrence_count: 1,
            channels: Vec::new(),
            acknowledged: false,
            aggregated: None,
        }
    }

    fn dispatcher(cfg: NotifyConfig) -> ChannelDispatcher {
        ChannelDispatcher::new(&cfg)
    }

    #[test]
    fn console_always_on_by_default() {
        let mut d = dispatcher(NotifyConfig::default());
        let mut n = notification(Severity::Medium);
        d.dispatch(&mut n, None, 0);
        assert!(n.channels.contains(&Channel::Console));
        // No storage handle was passed.
        assert!(!n.channels.contains(&Channel::Storage));
    }

    #[test]
    fn channel_level_blocks_below_threshold() {
        let cfg = NotifyConfig {
            channels: ChannelsConfig {
                console: ChannelConfig {
                    level: ChannelLevel::Critical,
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };
        let mut d = dispatcher(cfg);
        let mut n = notification(Severity::High);
        d.dispatch(&mut n, None, 0);
        assert!(!n.channels.contains(&Channel::Console));
    }

    #[test]
    fn ui_elements_expire_and_cap_at_max_active() {
        let cfg = NotifyConfig {
            ui_max_active: Some(2),
            ..Default::default()
        };
        let mut d = dispatcher(cfg);
        let ui = Box::leak(Box::new(RecordingUi::default()));
        // Keep a handle for assertions by forwarding to a leaked host.
        struct Fwd(&'static RecordingUi);
        impl UiHost for Fwd {
            fn attach(&self, n: &NotificationRecord) -> Result<String, NotifyError> {
                self.0.attach(n)
            }
            fn remove(&self, element_id: &str) {
                self.0.remove(element_id)
            }
        }
        d.set_ui_host(Box::new(Fwd(ui)));

        for _ in 0..3 {
            let mut n = notification(Severity::Medium);
            d.dispatch(&mut n, None, 0);
            assert!(n.channels.contains(&Channel::Ui));
        }
        // Third attach evicted the first element.
        assert_eq!(d.active_ui_count(), 2);
        assert_eq!(ui.removed.lock().unwrap().as_slice(), ["el_0"]);

        // Base duration 5 s for medium.
        d.tick(5_000);
        assert_eq!(d.active_ui_count(), 0);
        assert_eq!(ui.removed.lock().unwrap().len(), 3);
    }

    #[test]
    fn ui_failure_does_not_stop_other_channels() {
        let mut d = dispatcher(NotifyConfig::default());
        d.set_ui_host(Box::new(FailingUi));
        let mut storage =
            ErrorStorage::new(Box::new(MemoryKvStore::new()), StorageConfig::default());

        let mut n = notification(Severity::High);
        d.dispatch(&mut n, Some(&mut storage), 0);
        assert!(!n.channels.contains(&Channel::Ui));
        assert!(n.channels.contains(&Channel::Console));
        assert!(n.channels.contains(&Channel::Storage));
        assert_eq!(storage.stored_notifications().len(), 1);
    }

    #[test]
    fn webhook_skipped_without_endpoint() {
        let cfg = NotifyConfig {
            channels: ChannelsConfig {
                webhook: ChannelConfig {
                    enabled: Some(true),
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };
        let mut d = dispatcher(cfg);
        let mut n = notification(Severity::Critical);
        d.dispatch(&mut n, None, 0);
        assert!(!n.channels.contains(&Channel::Webhook));
    }

    #[test]
    fn severity_scales_ui_duration() {
        assert_eq!(ui_duration_ms(5_000, Severity::Low), 5_000);
        assert_eq!(ui_duration_ms(5_000, Severity::High), 7_500);
        assert_eq!(ui_duration_ms(5_000, Severity::Critical), 10_000);
    }
}
