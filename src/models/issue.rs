//! Issue timeline enums.

/// Comment kinds. Only plain comments are user-authored text; the rest are timeline events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentType {
    Comment,
    Reopen,
    Close,
    IssueRef,
    CommitRef,
    Label,
}

impl CommentType {
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Comment => 0,
            Self::Reopen => 1,
            Self::Close => 2,
            Self::IssueRef => 3,
            Self::CommitRef => 4,
            Self::Label => 7,
        }
    }
}
