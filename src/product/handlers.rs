use super::models::{Home, NewProduct, Pagination, Product, ProductDetails, UpdateProduct};
use crate::auth::AccessTokenClaims;
use crate::category::handlers::find_visible_category;
use crate::utils::types::{Pool, Result};
use crate::utils::{AppError, ValidatedJson};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

pub async fn get_home(State(pool): State<Pool>) -> Result<Home> {
    use crate::schema::products;

    let mut conn = pool.get().await?;

    let products = products::table
        .filter(products::is_hidden.eq(false))
        .order(products::created_at.desc())
        .select(Product::as_select())
        .load(&mut conn)
        .await?;

    let trending_products = products.iter().filter(|p| p.trending).cloned().collect();

    Ok(Json(Home {
        products,
        trending_products,
    }))
}

pub async fn get_products(
    State(pool): State<Pool>,
    Query(pagination): Query<Pagination>,
) -> Result<Vec<Product>> {
    use crate::schema::products;

    let (offset, limit) = pagination.bounds();
    let mut conn = pool.get().await?;

    let res = products::table
        .filter(products::is_hidden.eq(false))
        .order(products::id.asc())
        .offset(offset)
        .limit(limit)
        .select(Product::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn get_product_by_id(
    State(pool): State<Pool>,
    Path(id): Path<i32>,
) -> Result<Product> {
    use crate::schema::products;

    let mut conn = pool.get().await?;

    let res = products::table
        .find(id)
        .filter(products::is_hidden.eq(false))
        .select(Product::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(res))
}

pub async fn get_product_details(
    State(pool): State<Pool>,
    Path((category_name, product_name)): Path<(String, String)>,
) -> Result<ProductDetails> {
    use crate::schema::products;

    let mut conn = pool.get().await?;

    let category = find_visible_category(&mut conn, &category_name).await?;

    let product = products::table
        .filter(products::category_id.eq(category.id))
        .filter(products::name.eq(&product_name))
        .filter(products::is_hidden.eq(false))
        .select(Product::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::NotFound("No such product found".to_owned()))?;

    Ok(Json(ProductDetails { product, category }))
}

pub async fn create_product(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    ValidatedJson(payload): ValidatedJson<NewProduct>,
) -> std::result::Result<(StatusCode, Json<Product>), AppError> {
    use crate::schema::products;

    claims.require_staff()?;

    let mut conn = pool.get().await?;

    let res = diesel::insert_into(products::table)
        .values(&payload)
        .returning(Product::as_returning())
        .get_result(&mut conn)
        .await?;

    tracing::info!(product_id = res.id, "created product");

    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn update_product(
    State(pool): State<Pool>,
    Path(id): Path<i32>,
    claims: AccessTokenClaims,
    ValidatedJson(payload): ValidatedJson<UpdateProduct>,
) -> Result<Product> {
    use crate::schema::products;

    claims.require_staff()?;

    if payload.is_empty() {
        return Err(AppError::BadRequest("No changes to save".to_owned()));
    }

    let mut conn = pool.get().await?;

    let res = diesel::update(products::table.find(id))
        .set(&payload)
        .returning(Product::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn delete_product(
    State(pool): State<Pool>,
    Path(id): Path<i32>,
    claims: AccessTokenClaims,
) -> Result<Product> {
    use crate::schema::products;

    claims.require_staff()?;

    let mut conn = pool.get().await?;

    let res = diesel::delete(products::table.find(id))
        .returning(Product::as_returning())
        .get_result(&mut conn)
        .await?;

    tracing::info!(product_id = res.id, "deleted product");

    Ok(Json(res))
}
