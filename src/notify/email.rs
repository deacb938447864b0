use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, Message, MultiPart};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use super::{Mailer, OutgoingEmail};
use crate::config::{Config, SmtpSecurity};
use crate::error::{Result, TrackerError};

pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let s = &cfg.settings;
        Self::new(
            &s.smtp_host,
            s.smtp_port(),
            s.smtp_security,
            Credentials::new(cfg.smtp_user(), cfg.email_password.clone()),
            cfg.sender.clone(),
            s.email_timeout(),
        )
    }

    pub fn new(
        host: &str,
        port: u16,
        security: SmtpSecurity,
        creds: Credentials,
        from: Mailbox,
        timeout: Duration,
    ) -> Result<Self> {
        let builder = match security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host),
            SmtpSecurity::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host),
            SmtpSecurity::Plain => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)),
        }
        .map_err(|e| TrackerError::Config(format!("invalid SMTP host {host:?}: {e}")))?;

        let mailer = builder
            .port(port)
            .credentials(creds)
            .timeout(Some(timeout))
            .build();
        Ok(Self { mailer, from })
    }

    /// multipart/alternative: text fallback first, styled HTML digest second.
    fn build_message(&self, email: &OutgoingEmail) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(email.to.clone())
            .subject(email.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                email.plain_text(),
                email.html(),
            ))
            .map_err(|e| TrackerError::Transport(format!("build email: {e}")))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let msg = self.build_message(email)?;
        self.mailer.send(msg).await.map_err(classify)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

/// 530/534/535 are the SMTP "authentication required/failed" replies.
fn classify(err: lettre::transport::smtp::Error) -> TrackerError {
    let code = err.status().map(|c| c.to_string());
    if is_auth_code(code.as_deref()) {
        TrackerError::Auth(err.to_string())
    } else {
        TrackerError::Transport(err.to_string())
    }
}

fn is_auth_code(code: Option<&str>) -> bool {
    matches!(code, Some("530" | "534" | "535"))
}
