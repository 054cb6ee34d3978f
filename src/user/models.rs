use crate::auth::models::SafeUser;
use crate::schema::user_profiles;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = user_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserProfile {
    pub id: i32,
    pub user_id: Uuid,
    pub contact_number: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_profiles)]
pub struct NewUserProfile {
    pub user_id: Uuid,
    pub contact_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 15))]
    pub contact_number: String,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    #[serde(flatten)]
    pub user: SafeUser,
    pub contact_number: Option<String>,
}
