//! User-level enums stored as integers.

use serde::{Deserialize, Serialize};

/// Who may see a user's (or organization's) profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibleType {
    /// Visible to everyone, including anonymous viewers.
    Public,
    /// Visible to any signed-in, non-restricted user.
    Limited,
    /// Visible to followers and organization peers only.
    Private,
}

impl VisibleType {
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Public => 0,
            Self::Limited => 1,
            Self::Private => 2,
        }
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Public),
            1 => Some(Self::Limited),
            2 => Some(Self::Private),
            _ => None,
        }
    }

    /// Parse from the configuration spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "public" => Some(Self::Public),
            "limited" => Some(Self::Limited),
            "private" => Some(Self::Private),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Limited => "limited",
            Self::Private => "private",
        }
    }
}

/// Individual account or organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Individual,
    Organization,
}

impl UserType {
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Individual => 0,
            Self::Organization => 1,
        }
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Individual),
            1 => Some(Self::Organization),
            _ => None,
        }
    }
}
