use super::models::{AddFavourite, Favourite, FavouriteView, NewFavourite};
use crate::auth::AccessTokenClaims;
use crate::category::models::Category;
use crate::product::models::Product;
use crate::utils::types::{Pool, Result, StatusMessage};
use crate::utils::{AppError, ValidatedJson};
use axum::extract::{Json, Path, State};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

pub async fn add_favourite(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    ValidatedJson(payload): ValidatedJson<AddFavourite>,
) -> Result<StatusMessage> {
    use crate::schema::{favourites, products};

    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let product_id = products::table
        .find(payload.product_id)
        .select(products::id)
        .first::<i32>(&mut conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    let already_favourite = diesel::select(diesel::dsl::exists(
        favourites::table
            .filter(favourites::user_id.eq(user_id))
            .filter(favourites::product_id.eq(product_id)),
    ))
    .get_result::<bool>(&mut conn)
    .await?;

    if already_favourite {
        return Ok(Json(StatusMessage::new("Product already in favourites")));
    }

    diesel::insert_into(favourites::table)
        .values(&NewFavourite {
            user_id,
            product_id,
        })
        .execute(&mut conn)
        .await?;

    Ok(Json(StatusMessage::new("Product added to favourites")))
}

pub async fn get_favourites(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
) -> Result<Vec<FavouriteView>> {
    use crate::schema::{categories, favourites, products};

    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let res = favourites::table
        .inner_join(products::table.inner_join(categories::table))
        .filter(favourites::user_id.eq(user_id))
        .order(favourites::created_at.desc())
        .select((
            Favourite::as_select(),
            Product::as_select(),
            Category::as_select(),
        ))
        .load::<(Favourite, Product, Category)>(&mut conn)
        .await?
        .into_iter()
        .map(|(favourite, product, category)| FavouriteView {
            favourite,
            product,
            category,
        })
        .collect();

    Ok(Json(res))
}

pub async fn remove_favourite(
    State(pool): State<Pool>,
    Path(favourite_id): Path<i32>,
    claims: AccessTokenClaims,
) -> Result<StatusMessage> {
    use crate::schema::{favourites, products};

    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let (favourite, product_name) = favourites::table
        .inner_join(products::table)
        .filter(favourites::id.eq(favourite_id))
        .filter(favourites::user_id.eq(user_id))
        .select((Favourite::as_select(), products::name))
        .first::<(Favourite, String)>(&mut conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::NotFound("Favourite item not found".to_owned()))?;

    diesel::delete(favourites::table.find(favourite.id))
        .execute(&mut conn)
        .await?;

    Ok(Json(StatusMessage::new(format!(
        "{product_name} removed from favourites successfully!"
    ))))
}
