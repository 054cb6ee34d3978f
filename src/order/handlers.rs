use std::sync::Arc;

use super::checkout::{
    PricedLine, order_number, order_total, validate_contact_number, validate_shipping_address,
};
use super::models::{
    BuyNowCheckout, BuyNowPreview, CartCheckout, CartPreview, NewOrder, NewOrderItem, Order,
    OrderDetails, OrderItem, OrderItemView, OrderStatus, PaymentChoice, PaymentMethod, Shipping,
    UpdateOrderStatus,
};
use crate::auth::{AccessTokenClaims, find_user};
use crate::cart::handlers::{load_cart, price_cart};
use crate::config::Config;
use crate::notification::{
    models::{Notification, OrderPlacedNotification},
    notify,
};
use crate::product::models::Product;
use crate::utils::types::{Pool, Result};
use crate::utils::{AppError, ValidatedJson};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use diesel::prelude::*;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use scoped_futures::ScopedFutureExt;
use uuid::Uuid;

/// Creates the order and its items, then takes the stock.
///
/// Each stock decrement only applies while enough stock remains; the first
/// line that cannot be covered aborts the surrounding transaction.
async fn place_order(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
    shipping: Shipping,
    lines: &[PricedLine],
) -> std::result::Result<Order, AppError> {
    use crate::schema::{order_items, orders, products};

    let new_order = NewOrder {
        user_id,
        order_number: order_number(user_id, chrono::Utc::now().naive_utc()),
        total_amount: order_total(lines),
        status: OrderStatus::Pending.as_str().to_owned(),
        customer_name: shipping.customer_name,
        customer_email: shipping.customer_email,
        customer_contact: shipping.customer_contact,
        payment_method: shipping.payment_method.as_str().to_owned(),
        shipping_address: shipping.shipping_address,
        shipping_latitude: shipping.shipping_latitude,
        shipping_longitude: shipping.shipping_longitude,
    };

    let order = diesel::insert_into(orders::table)
        .values(&new_order)
        .returning(Order::as_returning())
        .get_result(conn)
        .await?;

    for line in lines {
        let updated = diesel::update(
            products::table
                .filter(products::id.eq(line.product_id))
                .filter(products::quantity.ge(line.quantity)),
        )
        .set(products::quantity.eq(products::quantity - line.quantity))
        .execute(conn)
        .await?;

        if updated == 0 {
            return Err(AppError::Conflict(format!(
                "Not enough stock available for {}",
                line.product_name
            )));
        }
    }

    let items = lines
        .iter()
        .map(|line| NewOrderItem {
            order_id: order.id,
            product_id: line.product_id,
            quantity: line.quantity,
            price: line.unit_price.clone(),
        })
        .collect::<Vec<_>>();

    diesel::insert_into(order_items::table)
        .values(&items)
        .execute(conn)
        .await?;

    Ok(order)
}

fn announce(config: &Arc<Config>, order: &Order) {
    tracing::info!(
        order_number = %order.order_number,
        total = %order.total_amount,
        "order placed"
    );

    if order.customer_email.is_empty() {
        return;
    }

    notify(
        config,
        Notification::OrderPlaced(OrderPlacedNotification {
            email: order.customer_email.clone(),
            customer_name: order.customer_name.clone(),
            order_number: order.order_number.clone(),
            total_amount: order.total_amount.clone(),
        }),
    );
}

pub async fn get_cart_checkout(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
) -> Result<CartPreview> {
    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let cart_items = load_cart(&mut conn, user_id).await?;
    if cart_items.is_empty() {
        return Err(AppError::BadRequest("Your cart is empty".to_owned()));
    }

    let total_amount = order_total(&price_cart(&cart_items)?);

    Ok(Json(CartPreview {
        cart_items,
        total_amount,
        is_buy_now: false,
    }))
}

pub async fn checkout_cart(
    State(pool): State<Pool>,
    State(config): State<Arc<Config>>,
    claims: AccessTokenClaims,
    ValidatedJson(payload): ValidatedJson<CartCheckout>,
) -> std::result::Result<(StatusCode, Json<Order>), AppError> {
    use crate::schema::cart_items;

    validate_shipping_address(&payload.shipping_address)?;
    if let Some(contact) = payload.customer_contact.as_deref().filter(|c| !c.is_empty()) {
        validate_contact_number(contact)?;
    }

    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let order = conn
        .transaction::<Order, AppError, _>(|conn| {
            async move {
                let user = find_user(conn, user_id).await?;

                let cart = load_cart(conn, user_id).await?;
                if cart.is_empty() {
                    return Err(AppError::BadRequest("Your cart is empty".to_owned()));
                }
                let lines = price_cart(&cart)?;

                let shipping = Shipping {
                    customer_name: payload
                        .customer_name
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| user.display_name()),
                    customer_email: payload
                        .customer_email
                        .filter(|e| !e.is_empty())
                        .unwrap_or(user.email),
                    customer_contact: payload.customer_contact.filter(|c| !c.is_empty()),
                    payment_method: payload.payment_method,
                    shipping_address: payload.shipping_address.trim().to_owned(),
                    shipping_latitude: payload.shipping_latitude,
                    shipping_longitude: payload.shipping_longitude,
                };

                let order = place_order(conn, user_id, shipping, &lines).await?;

                diesel::delete(cart_items::table.filter(cart_items::user_id.eq(user_id)))
                    .execute(conn)
                    .await?;

                Ok(order)
            }
            .scope_boxed()
        })
        .await?;

    announce(&config, &order);

    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_buy_now_checkout(
    State(pool): State<Pool>,
    Path((product_id, quantity)): Path<(i32, i32)>,
    claims: AccessTokenClaims,
) -> Result<BuyNowPreview> {
    use crate::schema::{products, user_profiles};

    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let product = products::table
        .find(product_id)
        .select(Product::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    let total_amount = PricedLine::new(&product, quantity)?.line_total();

    let user = find_user(&mut conn, user_id).await?;
    let customer_contact = user_profiles::table
        .filter(user_profiles::user_id.eq(user_id))
        .select(user_profiles::contact_number)
        .first::<Option<String>>(&mut conn)
        .await
        .optional()?
        .flatten()
        .unwrap_or_default();

    Ok(Json(BuyNowPreview {
        product,
        quantity,
        total_amount,
        is_buy_now: true,
        customer_name: user.display_name(),
        customer_email: user.email,
        customer_contact,
        payment_methods: PaymentMethod::ALL
            .iter()
            .map(|method| PaymentChoice {
                value: method.as_str(),
                label: method.label(),
            })
            .collect(),
    }))
}

pub async fn checkout_buy_now(
    State(pool): State<Pool>,
    State(config): State<Arc<Config>>,
    Path((product_id, quantity)): Path<(i32, i32)>,
    claims: AccessTokenClaims,
    ValidatedJson(payload): ValidatedJson<BuyNowCheckout>,
) -> std::result::Result<(StatusCode, Json<Order>), AppError> {
    use crate::schema::products;

    if payload.customer_contact.is_empty() || payload.shipping_address.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Please fill in all required fields".to_owned(),
        ));
    }
    validate_contact_number(&payload.customer_contact)?;
    validate_shipping_address(&payload.shipping_address)?;

    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let order = conn
        .transaction::<Order, AppError, _>(|conn| {
            async move {
                let product = products::table
                    .find(product_id)
                    .select(Product::as_select())
                    .first(conn)
                    .await
                    .optional()?
                    .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

                let line = PricedLine::new(&product, quantity)?;
                if product.quantity < quantity {
                    return Err(AppError::Conflict("Not enough stock available".to_owned()));
                }

                let shipping = Shipping {
                    customer_name: payload.customer_name,
                    customer_email: payload.customer_email,
                    customer_contact: Some(payload.customer_contact),
                    payment_method: payload.payment_method,
                    shipping_address: payload.shipping_address.trim().to_owned(),
                    shipping_latitude: payload.shipping_latitude,
                    shipping_longitude: payload.shipping_longitude,
                };

                place_order(conn, user_id, shipping, std::slice::from_ref(&line)).await
            }
            .scope_boxed()
        })
        .await?;

    announce(&config, &order);

    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_order_confirmation(
    State(pool): State<Pool>,
    Path(order_id): Path<i32>,
    claims: AccessTokenClaims,
) -> Result<OrderDetails> {
    use crate::schema::{order_items, orders, products};

    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let order = orders::table
        .filter(orders::id.eq(order_id))
        .filter(orders::user_id.eq(user_id))
        .select(Order::as_select())
        .first(&mut conn)
        .await
        .optional()?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;

    let items = order_items::table
        .inner_join(products::table)
        .filter(order_items::order_id.eq(order.id))
        .order(order_items::id.asc())
        .select((OrderItem::as_select(), products::name))
        .load::<(OrderItem, String)>(&mut conn)
        .await?
        .into_iter()
        .map(|(item, product_name)| OrderItemView { item, product_name })
        .collect();

    Ok(Json(OrderDetails { order, items }))
}

pub async fn get_my_orders(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
) -> Result<Vec<Order>> {
    use crate::schema::orders;

    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let res = orders::table
        .filter(orders::user_id.eq(user_id))
        .order(orders::created_at.desc())
        .select(Order::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(res))
}

pub async fn update_order_status(
    State(pool): State<Pool>,
    Path(order_id): Path<i32>,
    claims: AccessTokenClaims,
    ValidatedJson(payload): ValidatedJson<UpdateOrderStatus>,
) -> Result<Order> {
    use crate::schema::orders;

    claims.require_staff()?;

    let mut conn = pool.get().await?;

    let res = diesel::update(orders::table.find(order_id))
        .set((
            orders::status.eq(payload.status.as_str()),
            orders::updated_at.eq(diesel::dsl::now),
        ))
        .returning(Order::as_returning())
        .get_result(&mut conn)
        .await?;

    tracing::info!(order_id, status = payload.status.as_str(), "order status changed");

    Ok(Json(res))
}
