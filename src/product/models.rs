use crate::category::models::Category;
use crate::schema::products;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(
    Queryable, Selectable, Debug, PartialEq, Identifiable, Associations, Serialize, Clone,
)]
#[diesel(table_name=products)]
#[diesel(belongs_to(Category))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Product {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub vendor: String,
    pub product_image: Option<String>,
    pub quantity: i32,
    pub original_price: f64,
    pub selling: f64,
    pub description: String,
    pub is_hidden: bool,
    pub trending: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Validate)]
#[diesel(table_name = products)]
pub struct NewProduct {
    pub category_id: i32,
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(length(min = 1, max = 150))]
    pub vendor: String,
    pub product_image: Option<String>,
    #[validate(range(min = 0))]
    pub quantity: i32,
    #[validate(range(min = 0.0))]
    pub original_price: f64,
    #[validate(range(min = 0.0))]
    pub selling: f64,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub trending: bool,
}

#[derive(Deserialize, AsChangeset, Validate)]
#[diesel(table_name = products)]
pub struct UpdateProduct {
    pub category_id: Option<i32>,
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 150))]
    pub vendor: Option<String>,
    pub product_image: Option<String>,
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0.0))]
    pub original_price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub selling: Option<f64>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub is_hidden: Option<bool>,
    pub trending: Option<bool>,
}

impl UpdateProduct {
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.name.is_none()
            && self.vendor.is_none()
            && self.product_image.is_none()
            && self.quantity.is_none()
            && self.original_price.is_none()
            && self.selling.is_none()
            && self.description.is_none()
            && self.is_hidden.is_none()
            && self.trending.is_none()
    }
}

#[derive(Serialize)]
pub struct Home {
    pub products: Vec<Product>,
    pub trending_products: Vec<Product>,
}

#[derive(Serialize)]
pub struct ProductDetails {
    #[serde(flatten)]
    pub product: Product,
    pub category: Category,
}

#[derive(Deserialize, Debug, Default)]
pub struct Pagination {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl Pagination {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 100;

    /// `(offset, limit)` ready for the query, with the limit capped.
    pub fn bounds(&self) -> (i64, i64) {
        let offset = self.offset.unwrap_or(0).min(i64::MAX as usize) as i64;
        let limit = self
            .limit
            .map(|l| (l.min(Self::MAX_LIMIT as usize) as i64).max(1))
            .unwrap_or(Self::DEFAULT_LIMIT);

        (offset, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        assert_eq!(Pagination::default().bounds(), (0, Pagination::DEFAULT_LIMIT));
    }

    #[test]
    fn pagination_caps_the_limit() {
        let page = Pagination {
            offset: Some(20),
            limit: Some(10_000),
        };
        assert_eq!(page.bounds(), (20, Pagination::MAX_LIMIT));
    }

    #[test]
    fn zero_limit_still_returns_a_row() {
        let page = Pagination {
            offset: None,
            limit: Some(0),
        };
        assert_eq!(page.bounds(), (0, 1));
    }

    #[test]
    fn negative_stock_is_invalid() {
        let product = NewProduct {
            category_id: 1,
            name: "Kettle".to_owned(),
            vendor: "Acme".to_owned(),
            product_image: None,
            quantity: -1,
            original_price: 30.0,
            selling: 25.0,
            description: String::new(),
            is_hidden: false,
            trending: false,
        };

        let errors = product.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("quantity"));
    }

    #[test]
    fn empty_update_is_detected() {
        let update: UpdateProduct = serde_json::from_str("{}").unwrap();
        assert!(update.is_empty());

        let update: UpdateProduct = serde_json::from_str(r#"{"trending": true}"#).unwrap();
        assert!(!update.is_empty());
    }
}
