use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use lettre::message::Mailbox;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Error responses carry the error source chain outside production.
    pub fn exposes_error_details(self) -> bool {
        !matches!(self, Self::Production)
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub mail: MailConfig,
    pub recipients: FormRecipients,
    pub template: TemplateConfig,
}

const DEFAULT_SENDER: &str = "website@clinic.example";
const DEFAULT_RECEPTION: &str = "reception@clinic.example";
const DEFAULT_RECORDS: &str = "records@clinic.example";
const DEFAULT_TEMPLATE_NAME: &str = "Patient_Consent_Form.pdf";
const DEFAULT_TEMPLATE_DIRS: &str = "public/forms,public,../public/forms,../../public/forms";

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort { var: "APP_PORT" })?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            mail: MailConfig::from_env()?,
            recipients: FormRecipients::from_env()?,
            template: TemplateConfig::from_env(),
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS (submission port 587).
    StartTls,
    /// TLS from the first byte (port 465).
    Implicit,
    /// Unencrypted, for local relays such as MailHog.
    None,
}

impl SmtpSecurity {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "starttls" | "" => Ok(Self::StartTls),
            "tls" | "implicit" | "smtps" => Ok(Self::Implicit),
            "none" | "plain" => Ok(Self::None),
            other => Err(ConfigError::InvalidSmtpSecurity(other.to_string())),
        }
    }
}

/// Outbound relay settings.
#[derive(Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    pub credentials: Option<SmtpCredentials>,
    pub from: String,
}

#[derive(Clone)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("security", &self.security)
            .field(
                "username",
                &self.credentials.as_ref().map(|creds| creds.username.as_str()),
            )
            .field("from", &self.from)
            .finish()
    }
}

impl MailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.office365.com".to_string());
        let port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort { var: "SMTP_PORT" })?;
        let security = SmtpSecurity::parse(&env::var("SMTP_TLS").unwrap_or_default())?;

        let username = non_empty_var("SMTP_USERNAME");
        let password = non_empty_var("SMTP_PASSWORD");
        let credentials = match (username, password) {
            (Some(username), Some(password)) => Some(SmtpCredentials { username, password }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteCredentials),
        };

        let from = env::var("MAIL_FROM").unwrap_or_else(|_| DEFAULT_SENDER.to_string());
        validate_mailbox("MAIL_FROM", &from)?;

        Ok(Self {
            host,
            port,
            security,
            credentials,
            from,
        })
    }
}

/// Fixed destinations for each form.
#[derive(Debug, Clone)]
pub struct FormRecipients {
    pub consent_to: Vec<String>,
    pub consent_bcc: Vec<String>,
    pub contact_to: String,
}

impl FormRecipients {
    fn from_env() -> Result<Self, ConfigError> {
        let consent_to = mailbox_list(
            "CONSENT_FORM_RECIPIENTS",
            &env::var("CONSENT_FORM_RECIPIENTS").unwrap_or_else(|_| DEFAULT_RECEPTION.to_string()),
        )?;
        if consent_to.is_empty() {
            return Err(ConfigError::MissingRecipient {
                var: "CONSENT_FORM_RECIPIENTS",
            });
        }

        let consent_bcc = mailbox_list(
            "CONSENT_FORM_BCC",
            &env::var("CONSENT_FORM_BCC").unwrap_or_else(|_| DEFAULT_RECORDS.to_string()),
        )?;

        let contact_to = env::var("CONTACT_FORM_RECIPIENT")
            .unwrap_or_else(|_| DEFAULT_RECEPTION.to_string())
            .trim()
            .to_string();
        if contact_to.is_empty() {
            return Err(ConfigError::MissingRecipient {
                var: "CONTACT_FORM_RECIPIENT",
            });
        }
        validate_mailbox("CONTACT_FORM_RECIPIENT", &contact_to)?;

        Ok(Self {
            consent_to,
            consent_bcc,
            contact_to,
        })
    }
}

/// Where the consent form template lives on disk.
#[derive(Debug, Clone)]
pub struct TemplateConfig {
    pub file_name: String,
    pub search_dirs: Vec<PathBuf>,
}

impl TemplateConfig {
    fn from_env() -> Self {
        let file_name = non_empty_var("CONSENT_TEMPLATE_NAME")
            .unwrap_or_else(|| DEFAULT_TEMPLATE_NAME.to_string());
        let dirs = non_empty_var("CONSENT_TEMPLATE_DIRS")
            .unwrap_or_else(|| DEFAULT_TEMPLATE_DIRS.to_string());
        let search_dirs = dirs
            .split(',')
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .collect();

        Self {
            file_name,
            search_dirs,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn mailbox_list(var: &'static str, raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            validate_mailbox(var, entry)?;
            Ok(entry.to_string())
        })
        .collect()
}

fn validate_mailbox(var: &'static str, value: &str) -> Result<(), ConfigError> {
    value
        .parse::<Mailbox>()
        .map(|_| ())
        .map_err(|source| ConfigError::InvalidMailbox {
            var,
            value: value.to_string(),
            source,
        })
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort {
        var: &'static str,
    },
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidSmtpSecurity(String),
    IncompleteCredentials,
    MissingRecipient {
        var: &'static str,
    },
    InvalidMailbox {
        var: &'static str,
        value: String,
        source: lettre::address::AddressError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { var } => write!(f, "{var} must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSmtpSecurity(value) => {
                write!(f, "SMTP_TLS must be starttls, tls or none (got '{value}')")
            }
            ConfigError::IncompleteCredentials => {
                write!(f, "SMTP_USERNAME and SMTP_PASSWORD must be set together")
            }
            ConfigError::MissingRecipient { var } => {
                write!(f, "{var} must name at least one mailbox")
            }
            ConfigError::InvalidMailbox { var, value, .. } => {
                write!(f, "{var} contains an invalid mailbox '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidMailbox { source, .. } => Some(source),
            ConfigError::InvalidPort { .. }
            | ConfigError::InvalidSmtpSecurity(_)
            | ConfigError::IncompleteCredentials
            | ConfigError::MissingRecipient { .. } => None,
        }
    }
}
