//! Repository-side enums.

use serde::{Deserialize, Serialize};

/// A repository feature that can be switched on per repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    Code,
    Issues,
    PullRequests,
    Releases,
    Wiki,
    ExternalWiki,
    ExternalTracker,
    Projects,
}

impl UnitType {
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Code => 1,
            Self::Issues => 2,
            Self::PullRequests => 3,
            Self::Releases => 4,
            Self::Wiki => 5,
            Self::ExternalWiki => 6,
            Self::ExternalTracker => 7,
            Self::Projects => 8,
        }
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Code),
            2 => Some(Self::Issues),
            3 => Some(Self::PullRequests),
            4 => Some(Self::Releases),
            5 => Some(Self::Wiki),
            6 => Some(Self::ExternalWiki),
            7 => Some(Self::ExternalTracker),
            8 => Some(Self::Projects),
            _ => None,
        }
    }
}

/// How a user watches a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchMode {
    None,
    Normal,
    /// Explicitly unwatched; does not count towards `num_watches`.
    Dont,
    Auto,
}

impl WatchMode {
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::None => 0,
            Self::Normal => 1,
            Self::Dont => 2,
            Self::Auto => 3,
        }
    }
}
