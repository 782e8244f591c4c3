//! Login stub and session identity.
//!
//! # Invariants
//! - Login maps a role to one fixed fixture account by email.
//! - Logout forgets the identity only; store data survives.

use crate::fixtures::{STUDENT_LOGIN_EMAIL, TEACHER_LOGIN_EMAIL};
use crate::model::user::{User, UserId, UserRole};
use crate::repo::conversation_repo::ConversationRepository;
use crate::repo::user_repo::UserRepository;
use crate::service::data_store::{DataStore, StoreResult};
use log::{error, info};

/// Current client identity for one UI session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionService {
    current_user_id: Option<UserId>,
}

impl SessionService {
    pub const fn new() -> Self {
        Self {
            current_user_id: None,
        }
    }

    /// Logs in as the fixture account of `role`.
    ///
    /// Returns `None` (and keeps the session logged out) when the account is
    /// missing from the store.
    pub fn login<U: UserRepository, C: ConversationRepository>(
        &mut self,
        store: &DataStore<U, C>,
        role: UserRole,
    ) -> StoreResult<Option<User>> {
        let user = store.find_user_by_email(login_email(role))?;
        match &user {
            Some(user) => {
                self.current_user_id = Some(user.id);
                info!(
                    "event=login module=session status=ok role={} user_id={}",
                    role.as_str(),
                    user.id
                );
            }
            None => {
                self.current_user_id = None;
                error!(
                    "event=login module=session status=error role={} error_code=account_missing",
                    role.as_str()
                );
            }
        }
        Ok(user)
    }

    /// Forgets the current identity.
    pub fn logout(&mut self) {
        if let Some(user_id) = self.current_user_id.take() {
            info!("event=logout module=session status=ok user_id={user_id}");
        }
    }

    pub fn current_user_id(&self) -> Option<UserId> {
        self.current_user_id
    }

    /// Re-resolves the current identity against the store.
    pub fn current_user<U: UserRepository, C: ConversationRepository>(
        &self,
        store: &DataStore<U, C>,
    ) -> StoreResult<Option<User>> {
        match self.current_user_id {
            Some(user_id) => store.find_user_by_id(user_id),
            None => Ok(None),
        }
    }
}

/// Fixture email behind each login button.
pub fn login_email(role: UserRole) -> &'static str {
    match role {
        UserRole::Student => STUDENT_LOGIN_EMAIL,
        UserRole::Teacher => TEACHER_LOGIN_EMAIL,
    }
}
