//! In-memory record facade (dev/test).
//!
//! Backs [`IdentityResolver`] with one `RwLock`ed table per record type. A
//! poisoned lock reads as absence, which the guard turns into a denial.

use std::collections::HashMap;
use std::sync::RwLock;

use hbnb_auth::IdentityResolver;
use hbnb_core::{Entity, Place, PlaceId, Review, ReviewId, User, UserId};

/// Id-keyed table of entities.
#[derive(Debug)]
pub struct EntityTable<E: Entity> {
    inner: RwLock<HashMap<E::Id, E>>,
}

impl<E: Entity> EntityTable<E> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<E: Entity> Default for EntityTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EntityTable<E>
where
    E: Entity + Clone,
{
    pub fn get(&self, id: &E::Id) -> Option<E> {
        let map = self.inner.read().ok()?;
        map.get(id).cloned()
    }

    pub fn upsert(&self, entity: E) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(*entity.id(), entity);
        }
    }

    pub fn list(&self) -> Vec<E> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }

    pub fn find(&self, mut predicate: impl FnMut(&E) -> bool) -> Option<E> {
        let map = self.inner.read().ok()?;
        map.values().find(|e| predicate(e)).cloned()
    }
}

/// Lookup service for users, places and reviews.
#[derive(Debug, Default)]
pub struct Facade {
    users: EntityTable<User>,
    places: EntityTable<Place>,
    reviews: EntityTable<Review>,
}

impl Facade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) {
        self.users.upsert(user);
    }

    pub fn insert_place(&self, place: Place) {
        self.places.upsert(place);
    }

    pub fn insert_review(&self, review: Review) {
        self.reviews.upsert(review);
    }

    /// All users, ordered by email.
    pub fn list_users(&self) -> Vec<User> {
        let mut users = self.users.list();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        users
    }

    /// Case-insensitive email lookup.
    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim();
        self.users.find(|u| u.email.eq_ignore_ascii_case(email))
    }
}

impl IdentityResolver for Facade {
    fn get_user(&self, id: &UserId) -> Option<User> {
        self.users.get(id)
    }

    fn get_place(&self, id: &PlaceId) -> Option<Place> {
        self.places.get(id)
    }

    fn get_review(&self, id: &ReviewId) -> Option<Review> {
        self.reviews.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User::new(UserId::new(), email, "Test", "User").unwrap()
    }

    #[test]
    fn resolves_inserted_records() {
        let facade = Facade::new();
        let owner = user("owner@example.com");
        let place = Place::new(PlaceId::new(), "Loft", owner.id);
        let review = Review::new(ReviewId::new(), place.id, owner.id, "Great", 4).unwrap();

        facade.insert_user(owner.clone());
        facade.insert_place(place.clone());
        facade.insert_review(review.clone());

        assert_eq!(facade.get_user(&owner.id), Some(owner));
        assert_eq!(facade.get_place(&place.id), Some(place));
        assert_eq!(facade.get_review(&review.id), Some(review));
        assert_eq!(facade.get_user(&UserId::new()), None);
    }

    #[test]
    fn upsert_replaces_by_id() {
        let facade = Facade::new();
        let u = user("bob@example.com");
        facade.insert_user(u.clone());
        facade.insert_user(u.clone().with_admin(true));

        assert_eq!(facade.list_users().len(), 1);
        assert!(facade.get_user(&u.id).unwrap().is_admin);
    }

    #[test]
    fn email_lookup_ignores_case() {
        let facade = Facade::new();
        let u = user("Alice@Example.com");
        facade.insert_user(u.clone());

        assert_eq!(facade.find_user_by_email("alice@example.com"), Some(u));
        assert_eq!(facade.find_user_by_email("carol@example.com"), None);
    }

    #[test]
    fn users_are_listed_by_email() {
        let facade = Facade::new();
        facade.insert_user(user("zed@example.com"));
        facade.insert_user(user("amy@example.com"));

        let emails: Vec<_> = facade.list_users().into_iter().map(|u| u.email).collect();
        assert_eq!(emails, vec!["amy@example.com", "zed@example.com"]);
    }
}
