use std::sync::Arc;

use hbnb_core::{Place, PlaceId, Review, ReviewId, User, UserId};

/// Read-only lookup service for the records access decisions depend on.
///
/// Absence and lookup failure are not distinguished: both are `None`, and the
/// guard treats them as a denial.
pub trait IdentityResolver: Send + Sync {
    fn get_user(&self, id: &UserId) -> Option<User>;
    fn get_place(&self, id: &PlaceId) -> Option<Place>;
    fn get_review(&self, id: &ReviewId) -> Option<Review>;
}

impl<S> IdentityResolver for Arc<S>
where
    S: IdentityResolver + ?Sized,
{
    fn get_user(&self, id: &UserId) -> Option<User> {
        (**self).get_user(id)
    }

    fn get_place(&self, id: &PlaceId) -> Option<Place> {
        (**self).get_place(id)
    }

    fn get_review(&self, id: &ReviewId) -> Option<Review> {
        (**self).get_review(id)
    }
}
