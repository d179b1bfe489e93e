//! Mail configuration loaded from the INI file.
//!
//! The file has two sections:
//!
//! ```ini
//! [mail]
//! from = Billing <billing@example.com>
//! subject_template = Invoice {invoice_number}
//! body_template = Hello,
//!     please find attached invoice {invoice_number} for order {order_number}.
//!     Total: {total_ttc} EUR
//!
//! [sendemail]
//! smtpserver = smtp.example.com
//! smtpserverport = 587
//! smtpuser = billing@example.com
//! smtppass = secret
//! ```
//!
//! `smtptimeout` (seconds, default 30) and `smtptls` (`starttls`, `tls` or
//! `none`, default `starttls`) are optional in `[sendemail]`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::{Ini, ParseOption, Properties};
use lettre::message::Mailbox;
use tracing::debug;

use crate::error::ConfigError;

const MAIL_SECTION: &str = "mail";
const SMTP_SECTION: &str = "sendemail";

/// Default SMTP timeout.
pub const DEFAULT_SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Plain connection upgraded with STARTTLS.
    #[default]
    StartTls,
    /// Implicit TLS (usually port 465).
    Tls,
    /// No encryption. Only meant for local relays.
    None,
}

impl FromStr for TlsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "starttls" => Ok(TlsMode::StartTls),
            "tls" | "ssl" => Ok(TlsMode::Tls),
            "none" | "plain" => Ok(TlsMode::None),
            other => Err(format!("expected starttls, tls or none, got '{}'", other)),
        }
    }
}

/// SMTP connection settings.
#[derive(Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub security: TlsMode,
    pub timeout: Duration,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("security", &self.security)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Complete mail configuration, validated at load time.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Sender mailbox, e.g. `Billing <billing@example.com>`.
    pub from_address: String,

    /// Template for the subject line.
    pub subject_template: String,

    /// Template for the plain-text body.
    pub body_template: String,

    /// SMTP server settings.
    pub smtp: SmtpSettings,
}

impl MailConfig {
    /// Load the configuration from an INI file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::parse(&content, path)?;
        debug!("Loaded mail configuration from {}", path.display());
        Ok(config)
    }

    /// Parse INI content. `origin` is only used in error messages.
    pub fn parse(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str_opt(content, parse_options()).map_err(|e| ConfigError::Ini {
            path: PathBuf::from(origin),
            reason: e.to_string(),
        })?;

        let mail = section(&ini, MAIL_SECTION)?;
        let from_address = required(mail, MAIL_SECTION, "from")?;
        Mailbox::from_str(&from_address).map_err(|e| ConfigError::InvalidValue {
            section: MAIL_SECTION.to_string(),
            key: "from".to_string(),
            value: from_address.clone(),
            reason: e.to_string(),
        })?;
        let subject_template = required(mail, MAIL_SECTION, "subject_template")?;
        let body_template = required(mail, MAIL_SECTION, "body_template")?;

        let smtp = section(&ini, SMTP_SECTION)?;
        let server = required(smtp, SMTP_SECTION, "smtpserver")?;
        let port = parse_value::<u16>("smtpserverport", required(smtp, SMTP_SECTION, "smtpserverport")?)?;
        if port == 0 {
            return Err(invalid(SMTP_SECTION, "smtpserverport", "0", "port must be non-zero"));
        }
        let user = required(smtp, SMTP_SECTION, "smtpuser")?;
        let password = required(smtp, SMTP_SECTION, "smtppass")?;

        let timeout = match lookup(smtp, "smtptimeout") {
            Some(raw) => {
                let secs = parse_value::<u64>("smtptimeout", raw)?;
                if secs == 0 {
                    return Err(invalid(SMTP_SECTION, "smtptimeout", "0", "timeout must be non-zero"));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_SMTP_TIMEOUT,
        };

        let security = match lookup(smtp, "smtptls") {
            Some(raw) => raw
                .parse::<TlsMode>()
                .map_err(|reason| invalid(SMTP_SECTION, "smtptls", &raw, &reason))?,
            None => TlsMode::default(),
        };

        Ok(Self {
            from_address,
            subject_template,
            body_template,
            smtp: SmtpSettings {
                server,
                port,
                user,
                password,
                security,
                timeout,
            },
        })
    }
}

fn section<'a>(ini: &'a Ini, name: &str) -> Result<&'a Properties, ConfigError> {
    ini.section(Some(name))
        .ok_or_else(|| ConfigError::MissingSection(name.to_string()))
}

/// Values are taken literally: backslashes and quotes are kept (passwords
/// often contain both) and indented lines continue the previous value.
fn parse_options() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        enabled_indented_mutiline_value: true,
        ..ParseOption::default()
    }
}

/// Keys are matched case-insensitively.
fn lookup(props: &Properties, key: &str) -> Option<String> {
    props
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.trim().to_string())
}

fn required(props: &Properties, section: &str, key: &str) -> Result<String, ConfigError> {
    lookup(props, key).ok_or_else(|| ConfigError::MissingKey {
        section: section.to_string(),
        key: key.to_string(),
    })
}

fn parse_value<T>(key: &str, raw: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| invalid(SMTP_SECTION, key, &raw, &e.to_string()))
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SAMPLE: &str = "\
[mail]
from = Billing <billing@example.com>
subject_template = Invoice {invoice_number}
body_template = Hello,
    invoice {invoice_number} for order {order_number}.
    Total: {total_ttc}

[sendemail]
smtpserver = smtp.example.com
smtpserverport = 587
smtpuser = billing@example.com
smtppass = s3cret
";

    fn origin() -> &'static Path {
        Path::new("mail.ini")
    }

    #[test]
    fn test_parse_full_config() {
        let config = MailConfig::parse(SAMPLE, origin()).unwrap();

        assert_eq!(config.from_address, "Billing <billing@example.com>");
        assert_eq!(config.subject_template, "Invoice {invoice_number}");
        assert_eq!(
            config.body_template,
            "Hello,\ninvoice {invoice_number} for order {order_number}.\nTotal: {total_ttc}"
        );
        assert_eq!(config.smtp.server, "smtp.example.com");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.smtp.user, "billing@example.com");
        assert_eq!(config.smtp.password, "s3cret");
        assert_eq!(config.smtp.security, TlsMode::StartTls);
        assert_eq!(config.smtp.timeout, DEFAULT_SMTP_TIMEOUT);
    }

    #[test]
    fn test_password_is_read_literally() {
        let content = SAMPLE.replace("smtppass = s3cret", r#"smtppass = "ab\cd#e;f'"#);
        let config = MailConfig::parse(&content, origin()).unwrap();
        assert_eq!(config.smtp.password, r#""ab\cd#e;f'"#);
    }

    #[test]
    fn test_body_keeps_backslashes_and_blank_line_ends_value() {
        let content = SAMPLE.replace("Total: {total_ttc}", r"Total: {total_ttc} C:\invoices");
        let config = MailConfig::parse(&content, origin()).unwrap();
        assert!(config.body_template.ends_with(r"Total: {total_ttc} C:\invoices"));
        assert_eq!(config.smtp.server, "smtp.example.com");
    }

    #[test]
    fn test_optional_smtp_keys() {
        let content = format!("{}smtptimeout = 5\nsmtptls = none\n", SAMPLE);
        let config = MailConfig::parse(&content, origin()).unwrap();
        assert_eq!(config.smtp.timeout, Duration::from_secs(5));
        assert_eq!(config.smtp.security, TlsMode::None);
    }

    #[test]
    fn test_missing_key_names_section() {
        let content = SAMPLE.replace("smtppass = s3cret\n", "");
        let err = MailConfig::parse(&content, origin()).unwrap_err();
        match err {
            ConfigError::MissingKey { section, key } => {
                assert_eq!(section, "sendemail");
                assert_eq!(key, "smtppass");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_section() {
        let content = "[mail]\nfrom = a@example.com\n";
        let err = MailConfig::parse(content, origin()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { .. } | ConfigError::MissingSection(_)));

        let content = "[sendemail]\nsmtpserver = x\n";
        let err = MailConfig::parse(content, origin()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSection(ref s) if s == "mail"));
    }

    #[test]
    fn test_invalid_port() {
        let content = SAMPLE.replace("smtpserverport = 587", "smtpserverport = submission");
        let err = MailConfig::parse(&content, origin()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "smtpserverport"));
    }

    #[test]
    fn test_invalid_sender() {
        let content = SAMPLE.replace("Billing <billing@example.com>", "not an address");
        let err = MailConfig::parse(&content, origin()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "from"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = MailConfig::parse(SAMPLE, origin()).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = MailConfig::from_file(file.path()).unwrap();
        assert_eq!(config.smtp.port, 587);

        let err = MailConfig::from_file(Path::new("/nonexistent/mail.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_tls_mode_parsing() {
        assert_eq!("STARTTLS".parse::<TlsMode>(), Ok(TlsMode::StartTls));
        assert_eq!("ssl".parse::<TlsMode>(), Ok(TlsMode::Tls));
        assert!("maybe".parse::<TlsMode>().is_err());
    }
}
