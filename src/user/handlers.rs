use super::models::{Dashboard, NewUserProfile, UpdateProfile, UserProfile};
use crate::auth::{AccessTokenClaims, models::SafeUser};
use crate::utils::types::{Pool, Result, StatusMessage};
use crate::utils::{AppError, ValidatedJson};
use axum::extract::{Json, State};
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use scoped_futures::ScopedFutureExt;

pub async fn get_current_user(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
) -> Result<Dashboard> {
    use crate::schema::{user_profiles, users};

    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let user = users::table
        .find(user_id)
        .select(SafeUser::as_select())
        .get_result(&mut conn)
        .await?;

    let contact_number = user_profiles::table
        .filter(user_profiles::user_id.eq(user_id))
        .select(user_profiles::contact_number)
        .first::<Option<String>>(&mut conn)
        .await
        .optional()?
        .flatten();

    Ok(Json(Dashboard {
        user,
        contact_number,
    }))
}

pub async fn update_profile(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    ValidatedJson(payload): ValidatedJson<UpdateProfile>,
) -> Result<StatusMessage> {
    use crate::schema::{user_profiles, users};

    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let contact_number = Some(payload.contact_number).filter(|n| !n.is_empty());
    let email = payload.email;

    conn.transaction::<(), AppError, _>(|conn| {
        async move {
            if let Some(number) = &contact_number {
                let taken = diesel::select(diesel::dsl::exists(
                    user_profiles::table
                        .filter(user_profiles::contact_number.eq(number))
                        .filter(user_profiles::user_id.ne(user_id)),
                ))
                .get_result::<bool>(conn)
                .await?;

                if taken {
                    return Err(AppError::Conflict(
                        "This contact number is already registered.".to_owned(),
                    ));
                }
            }

            diesel::update(users::table.find(user_id))
                .set(users::email.eq(&email))
                .execute(conn)
                .await?;

            let profile = user_profiles::table
                .filter(user_profiles::user_id.eq(user_id))
                .select(UserProfile::as_select())
                .first(conn)
                .await
                .optional()?;

            match profile {
                Some(profile) => {
                    diesel::update(user_profiles::table.find(profile.id))
                        .set(user_profiles::contact_number.eq(&contact_number))
                        .execute(conn)
                        .await?;
                }
                None => {
                    diesel::insert_into(user_profiles::table)
                        .values(&NewUserProfile {
                            user_id,
                            contact_number: contact_number.clone(),
                        })
                        .execute(conn)
                        .await?;
                }
            }

            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    Ok(Json(StatusMessage::new("Profile updated successfully!")))
}
