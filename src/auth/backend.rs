//! Credential lookup used by login: a contact number is tried before a username.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use super::{models::User, password::verify_password};
use crate::utils::AppError;

pub trait CredentialStore {
    fn find_by_contact_number(
        &mut self,
        contact_number: &str,
    ) -> impl Future<Output = Result<Option<User>, AppError>> + Send;

    fn find_by_username(
        &mut self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, AppError>> + Send;
}

impl CredentialStore for AsyncPgConnection {
    async fn find_by_contact_number(&mut self, contact_number: &str) -> Result<Option<User>, AppError> {
        use crate::schema::{user_profiles, users};

        let user = user_profiles::table
            .inner_join(users::table)
            .filter(user_profiles::contact_number.eq(contact_number))
            .order(user_profiles::id.asc())
            .select(User::as_select())
            .first(self)
            .await
            .optional()?;

        Ok(user)
    }

    async fn find_by_username(&mut self, username: &str) -> Result<Option<User>, AppError> {
        use crate::schema::users;

        let user = users::table
            .filter(users::username.eq(username))
            .select(User::as_select())
            .first(self)
            .await
            .optional()?;

        Ok(user)
    }
}

/// Loads the account behind an authenticated request.
pub async fn find_user(conn: &mut AsyncPgConnection, user_id: Uuid) -> Result<User, AppError> {
    use crate::schema::users;

    let user = users::table
        .find(user_id)
        .select(User::as_select())
        .get_result(conn)
        .await?;

    Ok(user)
}

/// Resolves `identifier` as a contact number first, then as a username.
///
/// A contact-number match with a wrong password still falls through to the
/// username lookup, so a username that looks like a phone number keeps working.
pub async fn authenticate<C>(
    store: &mut C,
    identifier: &str,
    password: &str,
) -> Result<Option<User>, AppError>
where
    C: CredentialStore,
{
    if let Some(user) = store.find_by_contact_number(identifier).await? {
        if verify_password(password, &user.password_hash).await? {
            return Ok(Some(user));
        }
    }

    if let Some(user) = store.find_by_username(identifier).await? {
        if verify_password(password, &user.password_hash).await? {
            return Ok(Some(user));
        }
    }

    Ok(None)
}
