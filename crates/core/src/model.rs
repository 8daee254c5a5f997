//! Records the access guard reads: users, places and reviews.
//!
//! These are read-only from the guard's perspective; ownership is expressed by
//! `Place::owner_id` and `Review::user_id`.

use serde::{Deserialize, Serialize};

use crate::{DomainError, DomainResult, Entity, PlaceId, ReviewId, UserId};

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

impl User {
    /// Build a non-admin user after validating the email.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> DomainResult<Self> {
        let email = email.into();
        validate_email(&email)?;
        Ok(Self {
            id,
            email,
            first_name: first_name.into(),
            last_name: last_name.into(),
            is_admin: false,
        })
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A place listing, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub title: String,
    pub owner_id: UserId,
}

impl Place {
    pub fn new(id: PlaceId, title: impl Into<String>, owner_id: UserId) -> Self {
        Self {
            id,
            title: title.into(),
            owner_id,
        }
    }
}

impl Entity for Place {
    type Id = PlaceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A review of a place, authored by `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub place_id: PlaceId,
    pub user_id: UserId,
    pub text: String,
    pub rating: u8,
}

impl Review {
    /// Ratings are on a 1..=5 scale.
    pub fn new(
        id: ReviewId,
        place_id: PlaceId,
        user_id: UserId,
        text: impl Into<String>,
        rating: u8,
    ) -> DomainResult<Self> {
        if !(1..=5).contains(&rating) {
            return Err(DomainError::validation("rating must be between 1 and 5"));
        }
        Ok(Self {
            id,
            place_id,
            user_id,
            text: text.into(),
            rating,
        })
    }
}

impl Entity for Review {
    type Id = ReviewId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_email(email: &str) -> DomainResult<()> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(DomainError::validation(format!("invalid email: {trimmed}"))),
    }
}
