use super::models::{AddToCart, CartItem, CartLine, CartView, NewCartItem};
use crate::auth::AccessTokenClaims;
use crate::order::checkout::{PricedLine, order_total};
use crate::product::models::Product;
use crate::utils::types::{Pool, Result, StatusMessage};
use crate::utils::{AppError, ValidatedJson};
use axum::extract::{Json, Path, State};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

/// The user's cart lines joined with their products, oldest first.
pub(crate) async fn load_cart(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
) -> std::result::Result<Vec<CartLine>, AppError> {
    use crate::schema::{cart_items, products};

    let rows = cart_items::table
        .inner_join(products::table)
        .filter(cart_items::user_id.eq(user_id))
        .order(cart_items::created_at.asc())
        .select((CartItem::as_select(), Product::as_select()))
        .load::<(CartItem, Product)>(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(item, product)| CartLine { item, product })
        .collect())
}

pub(crate) fn price_cart(lines: &[CartLine]) -> std::result::Result<Vec<PricedLine>, AppError> {
    lines
        .iter()
        .map(|line| PricedLine::new(&line.product, line.item.quantity))
        .collect()
}

pub async fn get_cart(State(pool): State<Pool>, claims: AccessTokenClaims) -> Result<CartView> {
    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let items = load_cart(&mut conn, user_id).await?;
    let total_amount = order_total(&price_cart(&items)?);

    Ok(Json(CartView {
        items,
        total_amount,
    }))
}

pub async fn add_product_to_cart(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
    ValidatedJson(payload): ValidatedJson<AddToCart>,
) -> Result<StatusMessage> {
    use crate::schema::{cart_items, products};

    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let product = products::table
        .find(payload.product_id)
        .select(Product::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    let already_in_cart = diesel::select(diesel::dsl::exists(
        cart_items::table
            .filter(cart_items::user_id.eq(user_id))
            .filter(cart_items::product_id.eq(product.id)),
    ))
    .get_result::<bool>(&mut conn)
    .await?;

    if already_in_cart {
        return Ok(Json(StatusMessage::new("Product already in cart")));
    }

    if product.quantity < payload.quantity {
        return Ok(Json(StatusMessage::new("Not enough stock")));
    }

    diesel::insert_into(cart_items::table)
        .values(&NewCartItem {
            user_id,
            product_id: product.id,
            quantity: payload.quantity,
        })
        .execute(&mut conn)
        .await?;

    tracing::debug!(%user_id, product_id = product.id, "added product to cart");

    Ok(Json(StatusMessage::new("Product added to cart")))
}

pub async fn remove_product_from_cart(
    State(pool): State<Pool>,
    Path(item_id): Path<i32>,
    claims: AccessTokenClaims,
) -> Result<StatusMessage> {
    use crate::schema::cart_items;

    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let deleted_count = diesel::delete(
        cart_items::table
            .filter(cart_items::id.eq(item_id))
            .filter(cart_items::user_id.eq(user_id)),
    )
    .execute(&mut conn)
    .await?;

    if deleted_count == 0 {
        return Err(AppError::NotFound("Item not found in your cart!".to_owned()));
    }

    Ok(Json(StatusMessage::new(
        "Item removed from cart successfully!",
    )))
}
