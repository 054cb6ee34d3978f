use std::sync::Arc;

use super::backend::{authenticate, find_user};
use super::jwt::{AccessTokenClaims, IssuedTokens, decode_refresh_token, issue_tokens};
use super::models::{
    ChangePasswordPayload, LoginPayload, NewUser, ROLE_USER, RefreshPayload, RegisterUser,
    SafeUser, TokenPair, User,
};
use super::password::{create_password_hash, verify_password};
use crate::config::Config;
use crate::notification::{
    models::{Notification, WelcomeNotification},
    notify,
};
use crate::user::models::NewUserProfile;
use crate::utils::types::{Pool, Result, StatusMessage};
use crate::utils::{AppError, ValidatedJson};
use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use diesel::prelude::*;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use scoped_futures::ScopedFutureExt;
use uuid::Uuid;

pub async fn create_user(
    State(pool): State<Pool>,
    State(config): State<Arc<Config>>,
    ValidatedJson(payload): ValidatedJson<RegisterUser>,
) -> std::result::Result<(StatusCode, Json<SafeUser>), AppError> {
    use crate::schema::{user_profiles, users};

    let mut conn = pool.get().await?;

    let password_hash = create_password_hash(payload.password1).await?;

    let user_data = NewUser {
        id: Uuid::new_v4(),
        username: payload.username,
        email: payload.email,
        first_name: payload.first_name,
        last_name: payload.last_name,
        password_hash,
        role: ROLE_USER.to_owned(),
    };
    let contact_number = payload.contact_number;

    let res = conn
        .transaction::<SafeUser, AppError, _>(|conn| {
            async move {
                let username_taken = diesel::select(diesel::dsl::exists(
                    users::table.filter(users::username.eq(&user_data.username)),
                ))
                .get_result::<bool>(conn)
                .await?;

                if username_taken {
                    return Err(AppError::Conflict(
                        "A user with that username already exists.".to_owned(),
                    ));
                }

                let contact_taken = diesel::select(diesel::dsl::exists(
                    user_profiles::table.filter(user_profiles::contact_number.eq(&contact_number)),
                ))
                .get_result::<bool>(conn)
                .await?;

                if contact_taken {
                    return Err(AppError::Conflict(
                        "This contact number is already registered.".to_owned(),
                    ));
                }

                let user = diesel::insert_into(users::table)
                    .values(&user_data)
                    .returning(SafeUser::as_returning())
                    .get_result(conn)
                    .await?;

                diesel::insert_into(user_profiles::table)
                    .values(&NewUserProfile {
                        user_id: user.id,
                        contact_number: Some(contact_number),
                    })
                    .execute(conn)
                    .await?;

                Ok(user)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(user_id = %res.id, "registered user");

    notify(
        &config,
        Notification::WelcomeUser(WelcomeNotification {
            email: res.email.clone(),
            username: res.username.clone(),
        }),
    );

    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn login_user(
    State(pool): State<Pool>,
    State(config): State<Arc<Config>>,
    ValidatedJson(payload): ValidatedJson<LoginPayload>,
) -> Result<TokenPair> {
    let mut conn = pool.get().await?;

    let user = authenticate(&mut *conn, &payload.username, &payload.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid User Name or Password".to_owned()))?;

    let pair = store_new_tokens(&mut conn, &user, &config).await?;

    tracing::info!(user_id = %user.id, "logged in");

    Ok(Json(pair))
}

pub async fn refresh_token(
    State(pool): State<Pool>,
    State(config): State<Arc<Config>>,
    ValidatedJson(payload): ValidatedJson<RefreshPayload>,
) -> Result<TokenPair> {
    use crate::schema::users;

    let claims = decode_refresh_token(&payload.refresh_token, &config.jwt_secret)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid token".to_owned()))?;

    let mut conn = pool.get().await?;

    let user = users::table
        .find(user_id)
        .select(User::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::Unauthorized("Access denied".to_owned()))?;

    let Some(hashed_rt) = user.hashed_rt.as_deref() else {
        return Err(AppError::Unauthorized("Access denied".to_owned()));
    };

    if !verify_password(&claims.jti, hashed_rt).await? {
        tracing::warn!(user_id = %user.id, "refresh token reuse or mismatch");
        return Err(AppError::Unauthorized("Access denied".to_owned()));
    }

    let pair = store_new_tokens(&mut conn, &user, &config).await?;

    Ok(Json(pair))
}

pub async fn logout(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
) -> Result<StatusMessage> {
    use crate::schema::users;

    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    diesel::update(users::table.find(user_id))
        .set(users::hashed_rt.eq(None::<String>))
        .execute(&mut conn)
        .await?;

    Ok(Json(StatusMessage::new("Logged out Successfully")))
}

pub async fn change_password(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    ValidatedJson(payload): ValidatedJson<ChangePasswordPayload>,
) -> Result<StatusMessage> {
    use crate::schema::users;

    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let user = find_user(&mut conn, user_id).await?;

    if !verify_password(&payload.old_password, &user.password_hash).await? {
        return Err(AppError::BadRequest(
            "Your old password was entered incorrectly.".to_owned(),
        ));
    }

    let password_hash = create_password_hash(payload.new_password1).await?;

    // Outstanding refresh tokens die with the old password.
    diesel::update(users::table.find(user_id))
        .set((
            users::password_hash.eq(&password_hash),
            users::hashed_rt.eq(None::<String>),
        ))
        .execute(&mut conn)
        .await?;

    Ok(Json(StatusMessage::new("Password changed successfully!")))
}

async fn store_new_tokens(
    conn: &mut AsyncPgConnection,
    user: &User,
    config: &Config,
) -> std::result::Result<TokenPair, AppError> {
    use crate::schema::users;

    let IssuedTokens { pair, refresh_id } = issue_tokens(user, config)?;
    let hashed_rt = create_password_hash(refresh_id).await?;

    diesel::update(users::table.find(user.id))
        .set(users::hashed_rt.eq(Some(hashed_rt)))
        .execute(conn)
        .await?;

    Ok(pair)
}
