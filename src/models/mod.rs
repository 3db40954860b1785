//! Domain models for user accounts and the records that hang off them.

pub mod external_login;
pub mod issue;
pub mod repo;
pub mod user;

// Re-export commonly used types
pub use external_login::{ExternalIdentity, FindExternalUserOptions, GitServiceType, LoginType};
pub use issue::CommentType;
pub use repo::{UnitType, WatchMode};
pub use user::{UserType, VisibleType};

/// Page-based list options. `page == 0` disables pagination.
#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
pub struct ListOptions {
    pub page: u64,
    pub page_size: u64,
}

fn default_page_size() -> u64 {
    50
}

impl ListOptions {
    /// Options for a single page (1-based).
    pub fn page(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    /// Whether the caller asked for a page at all.
    pub fn is_paginated(&self) -> bool {
        self.page != 0
    }

    /// Clamp page size to maximum allowed value.
    pub fn clamped_page_size(&self) -> u64 {
        match self.page_size {
            0 => default_page_size(),
            n => n.min(100),
        }
    }

    /// Calculate the offset for database queries.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.clamped_page_size())
    }
}
