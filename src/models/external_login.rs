//! External identity payloads and lookup options.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Authentication source kinds. Only OAuth2 sources carry external logins here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginType {
    Plain,
    Ldap,
    Smtp,
    Pam,
    Dldap,
    OAuth2,
    Sspi,
}

impl LoginType {
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Plain => 1,
            Self::Ldap => 2,
            Self::Smtp => 3,
            Self::Pam => 4,
            Self::Dldap => 5,
            Self::OAuth2 => 6,
            Self::Sspi => 7,
        }
    }
}

/// Service a repository was migrated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitServiceType {
    Plain,
    Github,
    Gitea,
    Gitlab,
    Gogs,
    Onedev,
    Gitbucket,
}

impl GitServiceType {
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Plain => 1,
            Self::Github => 2,
            Self::Gitea => 3,
            Self::Gitlab => 4,
            Self::Gogs => 5,
            Self::Onedev => 6,
            Self::Gitbucket => 7,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "plain" | "git" => Some(Self::Plain),
            "github" => Some(Self::Github),
            "gitea" => Some(Self::Gitea),
            "gitlab" => Some(Self::Gitlab),
            "gogs" => Some(Self::Gogs),
            "onedev" => Some(Self::Onedev),
            "gitbucket" => Some(Self::Gitbucket),
            _ => None,
        }
    }
}

/// User profile as returned by an OAuth2 provider after a successful login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalIdentity {
    /// Name of the login source the identity came through
    pub provider: String,
    /// Provider-scoped stable user id
    pub user_id: String,
    #[serde(default)]
    pub raw_data: Map<String, JsonValue>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub nick_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub access_token_secret: String,
    #[serde(default)]
    pub refresh_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Filter for listing external logins.
#[derive(Debug, Clone, Default)]
pub struct FindExternalUserOptions {
    /// Empty matches every provider.
    pub provider: String,
    /// Zero means no limit.
    pub limit: u64,
    pub start: u64,
}
