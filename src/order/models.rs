use super::checkout::{validate_latitude, validate_longitude};
use crate::schema::{order_items, orders};
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    #[default]
    CashOnDelivery,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Paypal,
        PaymentMethod::CashOnDelivery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::CashOnDelivery => "cash_on_delivery",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::Paypal => "PayPal",
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Serialize, Clone)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Order {
    pub id: i32,
    pub user_id: Uuid,
    pub order_number: String,
    pub total_amount: BigDecimal,
    pub status: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_contact: Option<String>,
    pub payment_method: String,
    pub shipping_address: String,
    pub shipping_latitude: Option<BigDecimal>,
    pub shipping_longitude: Option<BigDecimal>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub order_number: String,
    pub total_amount: BigDecimal,
    pub status: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_contact: Option<String>,
    pub payment_method: String,
    pub shipping_address: String,
    pub shipping_latitude: Option<BigDecimal>,
    pub shipping_longitude: Option<BigDecimal>,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Serialize, Clone)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(Order))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub price: BigDecimal,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = order_items)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub price: BigDecimal,
}

/// Customer and shipping details shared by both checkout flows.
#[derive(Debug, Clone)]
pub struct Shipping {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_contact: Option<String>,
    pub payment_method: PaymentMethod,
    pub shipping_address: String,
    pub shipping_latitude: Option<BigDecimal>,
    pub shipping_longitude: Option<BigDecimal>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CartCheckout {
    #[validate(length(max = 255))]
    pub shipping_address: String,
    #[validate(length(max = 100))]
    pub customer_name: Option<String>,
    #[validate(email)]
    pub customer_email: Option<String>,
    pub customer_contact: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[validate(custom(function = "validate_latitude"))]
    pub shipping_latitude: Option<BigDecimal>,
    #[validate(custom(function = "validate_longitude"))]
    pub shipping_longitude: Option<BigDecimal>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BuyNowCheckout {
    #[validate(length(min = 1, max = 100, message = "Please fill in all required fields"))]
    pub customer_name: String,
    #[validate(email)]
    pub customer_email: String,
    pub customer_contact: String,
    #[validate(length(max = 255))]
    pub shipping_address: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[validate(custom(function = "validate_latitude"))]
    pub shipping_latitude: Option<BigDecimal>,
    #[validate(custom(function = "validate_longitude"))]
    pub shipping_longitude: Option<BigDecimal>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrderStatus {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize)]
pub struct OrderItemView {
    #[serde(flatten)]
    pub item: OrderItem,
    pub product_name: String,
}

#[derive(Debug, Serialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemView>,
}

#[derive(Debug, Serialize)]
pub struct PaymentChoice {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BuyNowPreview {
    pub product: crate::product::models::Product,
    pub quantity: i32,
    pub total_amount: BigDecimal,
    pub is_buy_now: bool,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_contact: String,
    pub payment_methods: Vec<PaymentChoice>,
}

#[derive(Debug, Serialize)]
pub struct CartPreview {
    pub cart_items: Vec<crate::cart::models::CartLine>,
    pub total_amount: BigDecimal,
    pub is_buy_now: bool,
}
