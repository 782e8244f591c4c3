//! User repository contracts and in-memory implementation.
//!
//! # Responsibility
//! - Provide lookup and atomic mutation APIs over the canonical user table.
//! - Keep locking details inside the storage boundary.
//!
//! # Invariants
//! - User ids are unique within the table.
//! - Each `update_*` closure runs under one write lock, so readers observe
//!   either the old or the new state, never a half-applied patch.
//! - Table order is seed order; inserts append.

use crate::model::user::{User, UserId};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for in-memory tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// Another writer panicked while holding the table lock.
    LockPoisoned(&'static str),
    DuplicateUser(UserId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LockPoisoned(table) => write!(f, "{table} table lock is poisoned"),
            Self::DuplicateUser(id) => write!(f, "user id already exists: {id}"),
        }
    }
}

impl Error for RepoError {}

/// Repository interface for the canonical user table.
pub trait UserRepository {
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    fn list_users(&self) -> RepoResult<Vec<User>>;
    fn insert_user(&self, user: User) -> RepoResult<()>;
    /// Applies `apply` to the user with `id` under the write lock.
    ///
    /// Returns `Ok(None)` when no such user exists.
    fn update_user<T, F>(&self, id: UserId, apply: F) -> RepoResult<Option<T>>
    where
        F: FnOnce(&mut User) -> T;
    /// Applies `apply` to the whole table under one write lock.
    fn update_users<T, F>(&self, apply: F) -> RepoResult<T>
    where
        F: FnOnce(&mut [User]) -> T;
}

/// `RwLock`-guarded user table.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from seed records, rejecting duplicate ids.
    pub fn with_users(users: Vec<User>) -> RepoResult<Self> {
        let repo = Self::new();
        for user in users {
            repo.insert_user(user)?;
        }
        Ok(repo)
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, Vec<User>>> {
        self.users
            .read()
            .map_err(|_| RepoError::LockPoisoned("users"))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, Vec<User>>> {
        self.users
            .write()
            .map_err(|_| RepoError::LockPoisoned("users"))
    }
}

impl UserRepository for InMemoryUserRepository {
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.read()?.iter().find(|user| user.id == id).cloned())
    }

    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .read()?
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        Ok(self.read()?.clone())
    }

    fn insert_user(&self, user: User) -> RepoResult<()> {
        let mut users = self.write()?;
        if users.iter().any(|existing| existing.id == user.id) {
            return Err(RepoError::DuplicateUser(user.id));
        }
        users.push(user);
        Ok(())
    }

    fn update_user<T, F>(&self, id: UserId, apply: F) -> RepoResult<Option<T>>
    where
        F: FnOnce(&mut User) -> T,
    {
        let mut users = self.write()?;
        Ok(users.iter_mut().find(|user| user.id == id).map(apply))
    }

    fn update_users<T, F>(&self, apply: F) -> RepoResult<T>
    where
        F: FnOnce(&mut [User]) -> T,
    {
        let mut users = self.write()?;
        Ok(apply(users.as_mut_slice()))
    }
}
