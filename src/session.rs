//! Authenticated actor and the persisted session file.
//!
//! The session file is the only client-held state: the backend cookie plus
//! the actor returned on login. Every decision call takes the actor
//! explicitly, so nothing below reads ambient session state.
use crate::error::ReviewError;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub const SESSION_SCHEMA_VERSION: u32 = 1;

/// Internal staff role, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Reviewer,
    Approver,
    Governor,
    Other(String),
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "reviewer" => Role::Reviewer,
            "approver" => Role::Approver,
            "governor" => Role::Governor,
            _ => Role::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Reviewer => "reviewer",
            Role::Approver => "approver",
            Role::Governor => "governor",
            Role::Other(raw) => raw,
        }
    }

    pub fn is_governor(&self) -> bool {
        matches!(self, Role::Governor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::parse(&raw))
    }
}

/// The authenticated internal user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Actor {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "fullName")]
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn is_governor(&self) -> bool {
        self.role.is_governor()
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

/// Login and refresh responses carry the actor under `user`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserEnvelope {
    pub user: Option<Actor>,
}

/// On-disk session: backend cookie plus the actor it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Session {
    pub schema_version: u32,
    pub base_url: String,
    pub cookie: String,
    pub actor: Actor,
    pub created_at_epoch_ms: u128,
}

impl Session {
    pub fn new(base_url: &str, cookie: String, actor: Actor) -> Result<Self> {
        Ok(Self {
            schema_version: SESSION_SCHEMA_VERSION,
            base_url: base_url.to_string(),
            cookie,
            actor,
            created_at_epoch_ms: now_epoch_ms()?,
        })
    }
}

/// Load the session file, or `None` when it is absent.
pub fn load_session_optional(path: &Path) -> Result<Option<Session>> {
    if !path.is_file() {
        return Ok(None);
    }
    let bytes = fs::read(path).with_context(|| format!("read session {}", path.display()))?;
    let session: Session = serde_json::from_slice(&bytes).context("parse session JSON")?;
    if session.schema_version != SESSION_SCHEMA_VERSION {
        return Ok(None);
    }
    Ok(Some(session))
}

/// Load the session file for an authenticated command.
///
/// A missing session, or one issued by a different backend, is a session
/// error so callers send the actor back to `login`.
pub fn require_session(path: &Path, base_url: &str) -> Result<Session> {
    let session = load_session_optional(path)?
        .ok_or_else(|| ReviewError::session("no active session; run `cofo-review login`"))?;
    if session.base_url.trim_end_matches('/') != base_url.trim_end_matches('/') {
        return Err(ReviewError::session(format!(
            "session was issued by {}; run `cofo-review login` for {}",
            session.base_url, base_url
        ))
        .into());
    }
    Ok(session)
}

pub fn write_session(path: &Path, session: &Session) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create session dir {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(session).context("serialize session")?;
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn clear_session(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("remove {}", path.display())),
    }
}

/// Reduce `Set-Cookie` header values to a `Cookie` request header.
pub fn cookie_header<'a>(set_cookies: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let pairs = set_cookies
        .into_iter()
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| pair.contains('=') && !pair.starts_with('='))
        .collect::<Vec<_>>();
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}

fn now_epoch_ms() -> Result<u128> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before epoch")?
        .as_millis())
}
