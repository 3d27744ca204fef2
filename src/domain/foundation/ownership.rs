//! Ownership of user-authored records.

use super::UserId;

/// A record that exactly one user may edit or delete.
pub trait OwnedByUser {
    fn owner_id(&self) -> &UserId;

    fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_id() == user_id
    }
}
