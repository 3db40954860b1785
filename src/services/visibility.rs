//! Profile visibility decisions.

use sea_orm::ConnectionTrait;
use tracing::warn;

use crate::db::users;
use crate::entity::user;
use crate::models::VisibleType;

/// Whether `viewer` (or an anonymous visitor when `None`) may see `subject`.
///
/// Admins see everyone. Public subjects are visible to all, limited ones to any signed-in
/// non-restricted user. Private subjects additionally require that the viewer follows them or
/// shares an organization with them. Storage errors while checking those relations deny access.
pub async fn is_user_visible_to_viewer<C: ConnectionTrait>(
    db: &C,
    subject: &user::Model,
    viewer: Option<&user::Model>,
) -> bool {
    if viewer.is_some_and(|v| v.is_admin) {
        return true;
    }

    match subject.visibility() {
        Some(VisibleType::Public) => true,
        Some(VisibleType::Limited) => viewer.is_some_and(|v| !v.is_restricted),
        Some(VisibleType::Private) => match viewer {
            Some(v) if !v.is_restricted => is_private_peer(db, subject, v).await,
            _ => false,
        },
        None => false,
    }
}

async fn is_private_peer<C: ConnectionTrait>(
    db: &C,
    subject: &user::Model,
    viewer: &user::Model,
) -> bool {
    match users::is_following(db, viewer.id, subject.id).await {
        Ok(true) => return true,
        Ok(false) => {}
        Err(e) => {
            warn!(
                subject_id = subject.id,
                viewer_id = viewer.id,
                "Failed to check follow relation: {}",
                e
            );
            return false;
        }
    }

    match users::count_shared_org_memberships(db, viewer.id, subject.id).await {
        Ok(count) => count > 0,
        Err(e) => {
            warn!(
                subject_id = subject.id,
                viewer_id = viewer.id,
                "Failed to count shared organization memberships: {}",
                e
            );
            false
        }
    }
}
