use crate::order::models::Order;
use crate::product::models::Product;
use crate::schema::customer_feedback;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Queryable, Selectable, Identifiable, Debug, Serialize)]
#[diesel(table_name = customer_feedback)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerFeedback {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub rating: i32,
    pub product_id: Option<i32>,
    pub order_id: Option<i32>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = customer_feedback)]
pub struct NewFeedback {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub rating: i32,
    pub product_id: Option<i32>,
    pub order_id: Option<i32>,
}

fn default_rating() -> i32 {
    5
}

#[derive(Debug, Deserialize, Validate)]
pub struct FeedbackPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub message: String,
    #[serde(default = "default_rating")]
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    pub product_id: Option<i32>,
    pub order_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrderFeedbackPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub subject: Option<String>,
    pub message: Option<String>,
    #[serde(default = "default_rating")]
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
}

#[derive(Debug, Serialize)]
pub struct FeedbackContext {
    pub products: Vec<Product>,
    pub user_orders: Vec<Order>,
}

#[derive(Debug, Serialize)]
pub struct OrderFeedbackContext {
    pub order: Order,
    pub order_products: Vec<Product>,
    #[serde(flatten)]
    pub context: FeedbackContext,
}

#[derive(Debug, Serialize)]
pub struct FeedbackList {
    pub feedback_list: Vec<CustomerFeedback>,
    pub unread_count: i64,
}
