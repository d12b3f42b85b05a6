use uuid::Uuid;

use crate::{AppError, AppResult};

/// Only the owner of a room or message may change it.
pub fn can_modify(actor: Uuid, owner: Uuid) -> bool {
    actor == owner
}

pub fn ensure_owner(actor: Uuid, owner: Uuid) -> AppResult<()> {
    if can_modify(actor, owner) {
        Ok(())
    } else {
        tracing::warn!("{actor} tried to modify an object owned by {owner}");
        Err(AppError::AccessDenied)
    }
}
