use crate::product::models::Product;
use crate::schema::cart_items;
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Queryable, Selectable, Debug, PartialEq, Identifiable, Associations, Serialize)]
#[diesel(table_name=cart_items)]
#[diesel(belongs_to(Product))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartItem {
    pub id: i32,
    pub user_id: Uuid,
    pub product_id: i32,
    pub quantity: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = cart_items)]
pub struct NewCartItem {
    pub user_id: Uuid,
    pub product_id: i32,
    pub quantity: i32,
}

fn one() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddToCart {
    pub product_id: i32,
    #[serde(default = "one")]
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total_amount: BigDecimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_defaults_to_one() {
        let payload: AddToCart = serde_json::from_str(r#"{"product_id": 7}"#).unwrap();
        assert_eq!(payload.quantity, 1);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn zero_quantity_is_invalid() {
        let payload: AddToCart =
            serde_json::from_str(r#"{"product_id": 7, "quantity": 0}"#).unwrap();
        assert!(payload.validate().is_err());
    }
}
