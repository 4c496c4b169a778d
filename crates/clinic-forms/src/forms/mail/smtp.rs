use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, info};

use super::{DispatchError, EmailDispatcher, OutboundEmail};
use crate::config::{MailConfig, SmtpSecurity};

/// Blocking SMTP relay client. Each dispatch opens its own connection.
#[derive(Clone)]
pub struct SmtpDispatcher {
    transport: SmtpTransport,
    relay: String,
}

impl std::fmt::Debug for SmtpDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpDispatcher")
            .field("relay", &self.relay)
            .finish()
    }
}

impl SmtpDispatcher {
    pub fn from_config(config: &MailConfig) -> Result<Self, DispatchError> {
        let builder = match config.security {
            SmtpSecurity::StartTls => {
                SmtpTransport::starttls_relay(&config.host).map_err(transport_error)?
            }
            SmtpSecurity::Implicit => SmtpTransport::relay(&config.host).map_err(transport_error)?,
            SmtpSecurity::None => SmtpTransport::builder_dangerous(config.host.as_str()),
        };

        let mut builder = builder.port(config.port);
        if let Some(credentials) = &config.credentials {
            builder = builder.credentials(Credentials::new(
                credentials.username.clone(),
                credentials.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            relay: format!("{}:{}", config.host, config.port),
        })
    }

    pub fn relay(&self) -> &str {
        &self.relay
    }
}

impl EmailDispatcher for SmtpDispatcher {
    fn dispatch(&self, email: &OutboundEmail) -> Result<(), DispatchError> {
        let message = build_message(email)?;
        debug!(relay = %self.relay, subject = %email.subject, "handing message to relay");
        let response = self.transport.send(&message).map_err(transport_error)?;
        info!(
            relay = %self.relay,
            code = %response.code(),
            recipients = email.to.len() + email.bcc.len(),
            attachments = email.attachments.len(),
            "email dispatched"
        );
        Ok(())
    }
}

pub(crate) fn build_message(email: &OutboundEmail) -> Result<Message, DispatchError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .subject(email.subject.clone());
    for to in &email.to {
        builder = builder.to(parse_mailbox(to)?);
    }
    for bcc in &email.bcc {
        builder = builder.bcc(parse_mailbox(bcc)?);
    }
    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(parse_mailbox(reply_to)?);
    }

    let body = MultiPart::alternative_plain_html(email.text.clone(), email.html.clone());
    let message = if email.attachments.is_empty() {
        builder.multipart(body)
    } else {
        let mut mixed = MultiPart::mixed().multipart(body);
        for attachment in &email.attachments {
            let content_type = ContentType::parse(&attachment.content_type)
                .map_err(|err| DispatchError::Message(err.to_string()))?;
            mixed = mixed.singlepart(
                Attachment::new(attachment.filename.clone())
                    .body(attachment.content.clone(), content_type),
            );
        }
        builder.multipart(mixed)
    };

    message.map_err(|err| DispatchError::Message(err.to_string()))
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, DispatchError> {
    raw.parse::<Mailbox>()
        .map_err(|err| DispatchError::InvalidAddress {
            address: raw.to_string(),
            reason: err.to_string(),
        })
}

fn transport_error(err: lettre::transport::smtp::Error) -> DispatchError {
    DispatchError::Transport(err.to_string())
}
