//! Common test utilities

#![allow(dead_code)]

use async_trait::async_trait;
use mail_dispatch::config::MailConfig;
use mail_dispatch::domain::{EmailMessage, EmailSendResult};
use mail_dispatch::email::{EmailProvider, EmailProviderError, HandlebarsTemplateEngine};
use mail_dispatch::Mailer;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

pub const HOSTNAME: &str = "cfp.example.com";
pub const SENDER: &str = "noreply@example.com";

// ============================================================================
// Transport doubles
// ============================================================================

/// Provider that records every message it is asked to send
#[derive(Default)]
pub struct RecordingProvider {
    sent: Mutex<Vec<EmailMessage>>,
    notify: Notify,
}

impl RecordingProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Wait until at least `count` messages were sent, or panic after 5s
    pub async fn wait_for(&self, count: usize) -> Vec<EmailMessage> {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let notified = self.notify.notified();
                if self.send_count() >= count {
                    return self.sent();
                }
                notified.await;
            }
        })
        .await
        .expect("timed out waiting for messages")
    }
}

#[async_trait]
impl EmailProvider for RecordingProvider {
    async fn send(&self, message: &EmailMessage) -> Result<EmailSendResult, EmailProviderError> {
        self.sent.lock().unwrap().push(message.clone());
        self.notify.notify_waiters();
        Ok(EmailSendResult::new(Some(format!(
            "msg-{}",
            self.send_count()
        ))))
    }

    async fn test_connection(&self) -> Result<(), EmailProviderError> {
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// Provider that fails every send with a connection error
#[derive(Default)]
pub struct FailingProvider {
    attempts: Mutex<usize>,
}

impl FailingProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl EmailProvider for FailingProvider {
    async fn send(&self, _message: &EmailMessage) -> Result<EmailSendResult, EmailProviderError> {
        *self.attempts.lock().unwrap() += 1;
        Err(EmailProviderError::ConnectionError(
            "Connection refused".to_string(),
        ))
    }

    async fn test_connection(&self) -> Result<(), EmailProviderError> {
        Err(EmailProviderError::ConnectionError(
            "Connection refused".to_string(),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "failing"
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn mail_config(send: bool) -> MailConfig {
    MailConfig {
        hostname: HOSTNAME.to_string(),
        email_sender: SENDER.to_string(),
        sender_name: None,
        send,
    }
}

/// The templates shipped with the crate
pub fn bundled_templates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources")
}

pub fn bundled_templates() -> Arc<HandlebarsTemplateEngine> {
    Arc::new(HandlebarsTemplateEngine::from_dir(bundled_templates_dir()).unwrap())
}

pub fn mailer_with(send: bool, provider: Arc<dyn EmailProvider>) -> Mailer {
    Mailer::new(mail_config(send), provider, bundled_templates())
}

// ============================================================================
// Log capture
// ============================================================================

/// In-memory sink for `tracing` output
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Captured lines at the given level (e.g. "WARN")
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.split_whitespace().any(|word| word == level))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Route this thread's `tracing` events into a buffer until the guard drops
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
