//! Outbound email model and the dispatcher seam shared by both forms.

mod smtp;

pub use smtp::SmtpDispatcher;

/// A fully composed message, independent of the transport that delivers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub bcc: Vec<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
    pub attachments: Vec<EmailAttachment>,
}

impl OutboundEmail {
    pub fn new(from: &str, to: &[String], subject: impl Into<String>) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_vec(),
            bcc: Vec::new(),
            reply_to: None,
            subject: subject.into(),
            text: String::new(),
            html: String::new(),
            attachments: Vec::new(),
        }
    }

    pub fn with_bcc(mut self, bcc: &[String]) -> Self {
        self.bcc.extend(bcc.iter().cloned());
        self
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    pub fn with_body(mut self, text: impl Into<String>, html: impl Into<String>) -> Self {
        self.text = text.into();
        self.html = html.into();
        self
    }

    pub fn with_attachment(mut self, attachment: EmailAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl std::fmt::Debug for EmailAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailAttachment")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("bytes", &self.content.len())
            .finish()
    }
}

/// Hands composed messages to an outbound relay.
pub trait EmailDispatcher: Send + Sync {
    fn dispatch(&self, email: &OutboundEmail) -> Result<(), DispatchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("unable to build message: {0}")]
    Message(String),
    #[error("mail relay rejected the message: {0}")]
    Transport(String),
}

/// Minimal HTML escaping for user-supplied text placed in email bodies.
pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '\n' => escaped.push_str("<br>"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("<b>\"Tom\" & Jerry's</b>\nbye"),
            "&lt;b&gt;&quot;Tom&quot; &amp; Jerry&#39;s&lt;/b&gt;<br>bye"
        );
    }

    #[test]
    fn builder_collects_recipients_and_attachments() {
        let to = vec!["reception@clinic.example".to_string()];
        let bcc = vec!["records@clinic.example".to_string()];
        let email = OutboundEmail::new("website@clinic.example", &to, "Hello")
            .with_bcc(&bcc)
            .with_reply_to("jane@example.com")
            .with_body("plain", "<p>html</p>")
            .with_attachment(EmailAttachment {
                filename: "a.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                content: vec![1, 2, 3],
            });

        assert_eq!(email.to, to);
        assert_eq!(email.bcc, bcc);
        assert_eq!(email.reply_to.as_deref(), Some("jane@example.com"));
        assert_eq!(email.attachments.len(), 1);
        assert!(format!("{:?}", email.attachments[0]).contains("bytes: 3"));
    }
}
