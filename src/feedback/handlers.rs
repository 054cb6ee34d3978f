use super::models::{
    CustomerFeedback, FeedbackContext, FeedbackList, FeedbackPayload, NewFeedback,
    OrderFeedbackContext, OrderFeedbackPayload,
};
use crate::auth::{AccessTokenClaims, find_user};
use crate::order::models::Order;
use crate::product::models::Product;
use crate::utils::types::{Pool, Result, StatusMessage};
use crate::utils::{AppError, ValidatedJson};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

const RECENT_ORDERS: i64 = 5;

async fn visible_products(
    conn: &mut AsyncPgConnection,
) -> std::result::Result<Vec<Product>, AppError> {
    use crate::schema::products;

    let res = products::table
        .filter(products::is_hidden.eq(false))
        .order(products::name.asc())
        .select(Product::as_select())
        .load(conn)
        .await?;

    Ok(res)
}

async fn recent_orders(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
) -> std::result::Result<Vec<Order>, AppError> {
    use crate::schema::orders;

    let res = orders::table
        .filter(orders::user_id.eq(user_id))
        .order(orders::created_at.desc())
        .limit(RECENT_ORDERS)
        .select(Order::as_select())
        .load(conn)
        .await?;

    Ok(res)
}

async fn owned_order(
    conn: &mut AsyncPgConnection,
    order_id: i32,
    user_id: Uuid,
) -> std::result::Result<Option<Order>, AppError> {
    use crate::schema::orders;

    let res = orders::table
        .filter(orders::id.eq(order_id))
        .filter(orders::user_id.eq(user_id))
        .select(Order::as_select())
        .first(conn)
        .await
        .optional()?;

    Ok(res)
}

pub async fn get_feedback_context(
    State(pool): State<Pool>,
    claims: Option<AccessTokenClaims>,
) -> Result<FeedbackContext> {
    let mut conn = pool.get().await?;

    let products = visible_products(&mut conn).await?;
    let user_orders = match claims {
        Some(claims) => recent_orders(&mut conn, claims.user_id()?).await?,
        None => Vec::new(),
    };

    Ok(Json(FeedbackContext {
        products,
        user_orders,
    }))
}

pub async fn submit_feedback(
    State(pool): State<Pool>,
    claims: Option<AccessTokenClaims>,
    ValidatedJson(payload): ValidatedJson<FeedbackPayload>,
) -> std::result::Result<(StatusCode, Json<CustomerFeedback>), AppError> {
    use crate::schema::{customer_feedback, products};

    let mut conn = pool.get().await?;

    // Unknown products and foreign orders are dropped rather than rejected.
    let product_id = match payload.product_id {
        Some(id) => products::table
            .find(id)
            .select(products::id)
            .first::<i32>(&mut conn)
            .await
            .optional()?,
        None => None,
    };

    let order_id = match (payload.order_id, &claims) {
        (Some(id), Some(claims)) => owned_order(&mut conn, id, claims.user_id()?)
            .await?
            .map(|order| order.id),
        _ => None,
    };

    let res = diesel::insert_into(customer_feedback::table)
        .values(&NewFeedback {
            name: payload.name,
            email: payload.email,
            subject: payload.subject,
            message: payload.message,
            rating: payload.rating,
            product_id,
            order_id,
        })
        .returning(CustomerFeedback::as_returning())
        .get_result(&mut conn)
        .await?;

    tracing::info!(feedback_id = res.id, rating = res.rating, "feedback received");

    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn get_order_feedback_context(
    State(pool): State<Pool>,
    Path(order_id): Path<i32>,
    claims: AccessTokenClaims,
) -> Result<OrderFeedbackContext> {
    use crate::schema::{order_items, products};

    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let order = owned_order(&mut conn, order_id, user_id)
        .await?
        .ok_or_else(order_not_found)?;

    let order_products = order_items::table
        .inner_join(products::table)
        .filter(order_items::order_id.eq(order.id))
        .order(order_items::id.asc())
        .select(Product::as_select())
        .load(&mut conn)
        .await?;

    let context = FeedbackContext {
        products: visible_products(&mut conn).await?,
        user_orders: recent_orders(&mut conn, user_id).await?,
    };

    Ok(Json(OrderFeedbackContext {
        order,
        order_products,
        context,
    }))
}

pub async fn submit_order_feedback(
    State(pool): State<Pool>,
    Path(order_id): Path<i32>,
    claims: AccessTokenClaims,
    ValidatedJson(payload): ValidatedJson<OrderFeedbackPayload>,
) -> std::result::Result<(StatusCode, Json<CustomerFeedback>), AppError> {
    use crate::schema::customer_feedback;

    let user_id = claims.user_id()?;
    let mut conn = pool.get().await?;

    let order = owned_order(&mut conn, order_id, user_id)
        .await?
        .ok_or_else(order_not_found)?;

    let Some(message) = payload.message.filter(|m| !m.trim().is_empty()) else {
        return Err(AppError::BadRequest(
            "Please provide your feedback message.".to_owned(),
        ));
    };

    let user = find_user(&mut conn, user_id).await?;

    let res = diesel::insert_into(customer_feedback::table)
        .values(&NewFeedback {
            name: payload.name.unwrap_or_else(|| user.display_name()),
            email: payload.email.unwrap_or(user.email),
            subject: payload
                .subject
                .unwrap_or_else(|| format!("Feedback for Order #{}", order.order_number)),
            message,
            rating: payload.rating,
            product_id: None,
            order_id: Some(order.id),
        })
        .returning(CustomerFeedback::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn get_all_feedback(
    State(pool): State<Pool>,
    claims: AccessTokenClaims,
) -> Result<FeedbackList> {
    use crate::schema::customer_feedback;

    claims.require_staff()?;

    let mut conn = pool.get().await?;

    let feedback_list = customer_feedback::table
        .order(customer_feedback::created_at.desc())
        .select(CustomerFeedback::as_select())
        .load(&mut conn)
        .await?;

    let unread_count = feedback_list.iter().filter(|f| !f.is_read).count() as i64;

    Ok(Json(FeedbackList {
        feedback_list,
        unread_count,
    }))
}

pub async fn mark_feedback_read(
    State(pool): State<Pool>,
    Path(feedback_id): Path<i32>,
    claims: AccessTokenClaims,
) -> Result<StatusMessage> {
    use crate::schema::customer_feedback;

    claims.require_staff()?;

    let mut conn = pool.get().await?;

    let updated = diesel::update(customer_feedback::table.find(feedback_id))
        .set(customer_feedback::is_read.eq(true))
        .execute(&mut conn)
        .await?;

    if updated == 0 {
        return Err(AppError::NotFound("Feedback not found".to_owned()));
    }

    Ok(Json(StatusMessage::new("Feedback marked as read")))
}

fn order_not_found() -> AppError {
    AppError::NotFound(
        "Order not found or you don't have permission to leave feedback for this order."
            .to_owned(),
    )
}
