use super::models::{Category, CollectionView, NewCategory, UpdateCategory};
use crate::auth::AccessTokenClaims;
use crate::product::models::Product;
use crate::utils::types::{Pool, Result};
use crate::utils::{AppError, ValidatedJson};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

pub async fn get_categories(State(pool): State<Pool>) -> Result<Vec<Category>> {
    use crate::schema::categories;

    let mut conn = pool.get().await?;

    let res = categories::table
        .filter(categories::is_hidden.eq(false))
        .order(categories::name.asc())
        .select(Category::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn get_category_by_id(
    State(pool): State<Pool>,
    Path(id): Path<i32>,
) -> Result<Category> {
    use crate::schema::categories;

    let mut conn = pool.get().await?;

    let res = categories::table
        .find(id)
        .filter(categories::is_hidden.eq(false))
        .select(Category::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::NotFound("No such category found".to_owned()))?;

    Ok(Json(res))
}

/// Visible category looked up by name.
pub(crate) async fn find_visible_category(
    conn: &mut AsyncPgConnection,
    name: &str,
) -> std::result::Result<Category, AppError> {
    use crate::schema::categories;

    categories::table
        .filter(categories::name.eq(name))
        .filter(categories::is_hidden.eq(false))
        .select(Category::as_select())
        .first(conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::NotFound("No such category found".to_owned()))
}

pub async fn get_collection(
    State(pool): State<Pool>,
    Path(name): Path<String>,
) -> Result<CollectionView> {
    use crate::schema::products;

    let mut conn = pool.get().await?;

    let category = find_visible_category(&mut conn, &name).await?;

    let products = products::table
        .filter(products::category_id.eq(category.id))
        .filter(products::is_hidden.eq(false))
        .order(products::name.asc())
        .select(Product::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(CollectionView { category, products }))
}

pub async fn create_category(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    ValidatedJson(payload): ValidatedJson<NewCategory>,
) -> std::result::Result<(StatusCode, Json<Category>), AppError> {
    use crate::schema::categories;

    claims.require_staff()?;

    let mut conn = pool.get().await?;

    let res = diesel::insert_into(categories::table)
        .values(&payload)
        .returning(Category::as_returning())
        .get_result(&mut conn)
        .await?;

    tracing::info!(category_id = res.id, "created category");

    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn update_category(
    State(pool): State<Pool>,
    Path(id): Path<i32>,
    claims: AccessTokenClaims,
    ValidatedJson(payload): ValidatedJson<UpdateCategory>,
) -> Result<Category> {
    use crate::schema::categories;

    claims.require_staff()?;

    if payload.is_empty() {
        return Err(AppError::BadRequest("No changes to save".to_owned()));
    }

    let mut conn = pool.get().await?;

    let res = diesel::update(categories::table.find(id))
        .set(&payload)
        .returning(Category::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(res))
}
