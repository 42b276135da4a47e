//! Application user accounts.

use crate::domain::store::{Resource, ResourceStore};
use crate::domain::{User, UserDraft};

/// `users/` collection.
#[derive(Debug, Clone, Copy)]
pub struct Users;

impl Resource for Users {
    type Entity = User;
    type Draft = UserDraft;
    const PATH: &'static str = "users/";
    const NOUN: &'static str = "user";
    const PLURAL: &'static str = "users";
    const TITLE: &'static str = "User";
}

/// User administration.
pub type UserStore<T, N> = ResourceStore<Users, T, N>;
