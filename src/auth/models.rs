use crate::schema::users;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const ROLE_USER: &str = "user";
pub const ROLE_STAFF: &str = "staff";

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name=users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub hashed_rt: Option<String>,
    pub role: String,
    pub created_at: NaiveDateTime,
}

impl User {
    /// "first last", trimmed; empty when neither is set.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    /// Full name, falling back to the username.
    pub fn display_name(&self) -> String {
        let full_name = self.full_name();
        if full_name.is_empty() {
            self.username.clone()
        } else {
            full_name
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name=users)]
pub struct NewUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: String,
}

#[derive(Queryable, Selectable, Debug, Serialize)]
#[diesel(table_name=users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SafeUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    #[validate(length(min = 8, message = "Password must contain at least 8 characters"))]
    pub password1: String,
    #[validate(must_match(other = "password1", message = "The two password fields didn't match"))]
    pub password2: String,
    #[validate(length(min = 1, max = 15))]
    pub contact_number: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    /// Username or contact number.
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshPayload {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordPayload {
    pub old_password: String,
    #[validate(length(min = 8, message = "Password must contain at least 8 characters"))]
    pub new_password1: String,
    #[validate(must_match(other = "new_password1", message = "The two password fields didn't match"))]
    pub new_password2: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}
