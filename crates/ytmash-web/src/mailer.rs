//! SMTP delivery of finished mashups

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::path::Path;
use tracing::{debug, info};
use ytmash_core::config::SmtpConfig;
use ytmash_core::error::DeliveryError;

/// Sends a mashup as a MIME attachment over the configured SMTP relay.
pub struct Mailer {
    smtp: SmtpConfig,
}

impl Mailer {
    pub fn new(smtp: SmtpConfig) -> Self {
        Self { smtp }
    }

    /// Relay host and sender address are both required before anything
    /// can be sent.
    pub fn is_configured(&self) -> bool {
        self.smtp.host.is_some() && self.smtp.from.is_some()
    }

    /// Email the mashup at `artifact` to `recipient`. The caller keeps the
    /// file either way.
    pub async fn send_mashup(
        &self,
        recipient: Mailbox,
        singer: &str,
        artifact: &Path,
    ) -> Result<(), DeliveryError> {
        let host = self
            .smtp
            .host
            .as_deref()
            .ok_or(DeliveryError::SmtpNotConfigured)?;
        let sender = self
            .smtp
            .from
            .as_deref()
            .ok_or(DeliveryError::SmtpNotConfigured)?;
        let from: Mailbox = sender
            .parse()
            .map_err(|_| DeliveryError::InvalidSender(sender.to_string()))?;

        debug!("Reading attachment from {}", artifact.display());
        let content = tokio::fs::read(artifact).await?;
        let filename = artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mashup.mp3".to_string());
        let attachment = Attachment::new(filename).body(content, content_type_for(artifact));

        let text = format!(
            "Hi,\n\nAttached is your {} mashup, one clip per video in search order.\n",
            singer
        );
        let email = Message::builder()
            .from(from)
            .to(recipient.clone())
            .subject(format!("Your {} mashup", singer))
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(attachment),
            )
            .map_err(|e| DeliveryError::MessageBuild(e.to_string()))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| DeliveryError::SendFailed(e.to_string()))?
            .port(self.smtp.port);
        if let (Some(user), Some(pass)) = (&self.smtp.username, &self.smtp.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let transport = builder.build();
        transport
            .send(email)
            .await
            .map_err(|e| DeliveryError::SendFailed(e.to_string()))?;

        info!("Mashup emailed to {}", recipient);
        Ok(())
    }
}

/// Content type from the artifact extension. Falls back to a generic
/// binary type for anything unrecognized.
fn content_type_for(artifact: &Path) -> ContentType {
    ContentType::parse(mime_for(artifact)).unwrap_or(ContentType::TEXT_PLAIN)
}

fn mime_for(artifact: &Path) -> &'static str {
    let ext = artifact
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());
    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("wav") => "audio/wav",
        Some("m4a") | Some("aac") => "audio/mp4",
        Some("opus") | Some("ogg") => "audio/ogg",
        _ => "application/octet-stream",
    }
}
