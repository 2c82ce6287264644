use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

/// Outbound push delivery. Tokens are opaque per-user strings; a gateway
/// rejecting a malformed token is a failed send, not a crash.
#[async_trait::async_trait]
pub trait IPushGateway: Send + Sync {
    async fn send(&self, device_token: &str, notification: &PushNotification)
        -> anyhow::Result<()>;
}

/// Push gateway talking to an HTTP endpoint (Expo-style message shape).
/// The request timeout bounds one dispatch; a timed-out send counts as
/// failed, never as hung.
pub struct HttpPushGateway {
    client: reqwest::Client,
    url: String,
}

impl HttpPushGateway {
    pub fn new(url: &str, dispatch_timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(dispatch_timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl IPushGateway for HttpPushGateway {
    async fn send(
        &self,
        device_token: &str,
        notification: &PushNotification,
    ) -> anyhow::Result<()> {
        let res = self
            .client
            .post(&self.url)
            .json(&json!({
                "to": device_token,
                "title": notification.title,
                "body": notification.body,
                "data": notification.data,
            }))
            .send()
            .await?;

        if res.status().is_success() {
            Ok(())
        } else {
            Err(anyhow::Error::msg(format!(
                "Push gateway rejected send with status: {}",
                res.status()
            )))
        }
    }
}

/// Records sends instead of delivering them. Used by tests and as the
/// fallback when no gateway endpoint is configured.
pub struct StubPushGateway {
    pub sent: Mutex<Vec<(String, PushNotification)>>,
    rejecting: AtomicBool,
}

impl StubPushGateway {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            rejecting: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent send fail, for failure-path tests.
    pub fn set_rejecting(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Default for StubPushGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IPushGateway for StubPushGateway {
    async fn send(
        &self,
        device_token: &str,
        notification: &PushNotification,
    ) -> anyhow::Result<()> {
        if self.rejecting.load(Ordering::SeqCst) {
            return Err(anyhow::Error::msg("Push gateway rejected send"));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((device_token.to_string(), notification.clone()));
        Ok(())
    }
}
