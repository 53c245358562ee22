use async_trait::async_trait;

/// Outbound email. The application composes the message; the adapter only
/// delivers it.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}
