//! Configuration types, built from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Default submission log file.
pub const DEFAULT_LOG_PATH: &str = "submissions.log";

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct ContactConfig {
    pub bind_addr: SocketAddr,
    /// Append-only submission log.
    pub log_path: PathBuf,
    /// Directory holding the static site, served for unmatched paths.
    pub static_dir: Option<PathBuf>,
    /// Directory for the operational log file. Stderr only when unset.
    pub ops_log_dir: Option<PathBuf>,
    pub profile: BusinessProfile,
    /// Outbound SMTP relay. Mail is disabled when `None`.
    pub smtp: Option<SmtpConfig>,
}

/// Who the site belongs to: addresses and the text used in outgoing mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessProfile {
    pub site_name: String,
    /// Business inbox. Receives notifications; sends confirmations.
    pub owner_email: String,
    /// From address of owner notifications.
    pub website_sender: String,
    pub signature: String,
    pub title: String,
    pub phone: String,
    /// `(network, handle)` pairs listed in the confirmation footer.
    pub socials: Vec<(String, String)>,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            site_name: "Shadma Makeup Artist".to_string(),
            owner_email: "hello@shadma-makeup.com".to_string(),
            website_sender: "website@shadma-makeup.com".to_string(),
            signature: "Shadma".to_string(),
            title: "Professional Makeup Artist".to_string(),
            phone: "+91 98765 43210".to_string(),
            socials: vec![
                ("Instagram".to_string(), "@shadma_makeup".to_string()),
                ("YouTube".to_string(), "@shadma_makeup".to_string()),
            ],
        }
    }
}

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
}

impl SmtpConfig {
    /// Port 465 speaks implicit TLS; everything else upgrades with STARTTLS.
    pub fn implicit_tls(&self) -> bool {
        self.port == 465
    }
}

impl ContactConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = var("CONTACT_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr =
            bind_raw
                .trim()
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                    key: "CONTACT_BIND_ADDR".into(),
                    message: format!("{bind_raw}: {e}"),
                })?;

        let log_path = var("CONTACT_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH));
        let static_dir = var("CONTACT_STATIC_DIR").map(PathBuf::from);
        let ops_log_dir = var("CONTACT_OPS_LOG_DIR").map(PathBuf::from);

        let defaults = BusinessProfile::default();
        let socials = match var("CONTACT_SOCIALS") {
            Some(raw) => parse_socials(&raw)?,
            None => defaults.socials,
        };
        let profile = BusinessProfile {
            site_name: var("CONTACT_SITE_NAME").unwrap_or(defaults.site_name),
            owner_email: var("CONTACT_OWNER_EMAIL").unwrap_or(defaults.owner_email),
            website_sender: var("CONTACT_WEBSITE_SENDER").unwrap_or(defaults.website_sender),
            signature: var("CONTACT_SIGNATURE").unwrap_or(defaults.signature),
            title: var("CONTACT_TITLE").unwrap_or(defaults.title),
            phone: var("CONTACT_PHONE").unwrap_or(defaults.phone),
            socials,
        };

        let smtp = match var("SMTP_HOST") {
            Some(host) => {
                let port = match var("SMTP_PORT") {
                    Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                        ConfigError::InvalidValue {
                            key: "SMTP_PORT".into(),
                            message: format!("{raw}: {e}"),
                        }
                    })?,
                    None => 587,
                };
                Some(SmtpConfig {
                    host,
                    port,
                    username: lookup("SMTP_USERNAME").unwrap_or_default(),
                    password: SecretString::from(lookup("SMTP_PASSWORD").unwrap_or_default()),
                })
            }
            None => None,
        };

        Ok(Self {
            bind_addr,
            log_path,
            static_dir,
            ops_log_dir,
            profile,
            smtp,
        })
    }
}

/// Parse `Network=@handle,Other=@handle` into pairs.
fn parse_socials(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((network, handle)) if !network.trim().is_empty() && !handle.trim().is_empty() => {
                Ok((network.trim().to_string(), handle.trim().to_string()))
            }
            _ => Err(ConfigError::InvalidValue {
                key: "CONTACT_SOCIALS".into(),
                message: format!("expected Network=handle, got {entry:?}"),
            }),
        })
        .collect()
}
