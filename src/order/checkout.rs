//! Pricing and validation rules shared by cart checkout and buy-now.

use std::str::FromStr;
use std::sync::LazyLock;

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use regex::Regex;
use uuid::Uuid;
use validator::ValidationError;

use crate::product::models::Product;
use crate::utils::AppError;

static ADDRESS_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\s,.\-/#@&()]+$").expect("valid address regex"));

static ADDRESS_SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,.\-/#@&()]").expect("valid address regex"));

static CONTACT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid contact regex"));

pub const ADDRESS_RULE: &str =
    "Shipping address must contain at least one special character: , . - / # @ & ( )";

/// One order line priced at the product's current selling price.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl PricedLine {
    pub fn new(product: &Product, quantity: i32) -> Result<Self, AppError> {
        if quantity < 1 {
            return Err(AppError::BadRequest(
                "Quantity must be at least 1".to_owned(),
            ));
        }

        Ok(Self {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            unit_price: money(product.selling)?,
        })
    }

    pub fn line_total(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

/// Rounds a float price to cents.
pub fn money(value: f64) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(&format!("{value:.2}"))
        .map_err(|_| AppError::BadRequest(format!("Invalid price {value}")))
}

pub fn order_total(lines: &[PricedLine]) -> BigDecimal {
    lines
        .iter()
        .fold(BigDecimal::from(0), |acc, line| acc + line.line_total())
}

pub fn validate_shipping_address(address: &str) -> Result<(), AppError> {
    let address = address.trim();

    if address.is_empty() {
        return Err(AppError::BadRequest(
            "Please provide a shipping address".to_owned(),
        ));
    }

    if !ADDRESS_SPECIAL.is_match(address) || !ADDRESS_CHARSET.is_match(address) {
        return Err(AppError::BadRequest(ADDRESS_RULE.to_owned()));
    }

    Ok(())
}

pub fn validate_contact_number(contact: &str) -> Result<(), AppError> {
    if CONTACT_NUMBER.is_match(contact) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Contact number must be exactly 10 digits".to_owned(),
        ))
    }
}

fn validate_coordinate(value: &BigDecimal, bound: i32, code: &'static str) -> Result<(), ValidationError> {
    let bound = BigDecimal::from(bound);
    if *value < -bound.clone() || *value > bound {
        let mut err = ValidationError::new(code);
        err.message = Some(format!("must be between -{bound} and {bound}").into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_latitude(value: &BigDecimal) -> Result<(), ValidationError> {
    validate_coordinate(value, 90, "latitude")
}

pub fn validate_longitude(value: &BigDecimal) -> Result<(), ValidationError> {
    validate_coordinate(value, 180, "longitude")
}

/// `ORD-{user prefix}-{timestamp}-{random}`. The random tail keeps two orders
/// placed by one user within the same second apart.
pub fn order_number(user_id: Uuid, at: NaiveDateTime) -> String {
    let user = user_id.simple().to_string();
    let tail = Uuid::new_v4().simple().to_string();
    format!(
        "ORD-{}-{}-{}",
        &user[..8],
        at.format("%Y%m%d%H%M%S"),
        tail[..6].to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn product(id: i32, selling: f64, quantity: i32) -> Product {
        Product {
            id,
            category_id: 1,
            name: format!("product-{id}"),
            vendor: "Acme".to_owned(),
            product_image: None,
            quantity,
            original_price: selling + 5.0,
            selling,
            description: String::new(),
            is_hidden: false,
            trending: false,
            created_at: NaiveDateTime::default(),
        }
    }

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn total_is_sum_of_snapshot_lines() {
        let lines = vec![
            PricedLine::new(&product(1, 19.99, 10), 2).unwrap(),
            PricedLine::new(&product(2, 0.1, 10), 3).unwrap(),
        ];

        assert_eq!(lines[0].unit_price, dec("19.99"));
        assert_eq!(order_total(&lines), dec("40.28"));
    }

    #[test]
    fn unit_price_is_rounded_to_cents() {
        let line = PricedLine::new(&product(1, 10.004, 10), 1).unwrap();
        assert_eq!(line.unit_price, dec("10.00"));
    }

    #[test]
    fn empty_order_totals_zero() {
        assert_eq!(order_total(&[]), dec("0"));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert!(PricedLine::new(&product(1, 5.0, 10), 0).is_err());
    }

    #[test]
    fn address_needs_a_special_character() {
        assert!(validate_shipping_address("12 Baker Street, London").is_ok());
        assert!(validate_shipping_address("Flat #4 (rear)").is_ok());
        assert!(validate_shipping_address("12 Baker Street London").is_err());
        assert!(validate_shipping_address("   ").is_err());
    }

    #[test]
    fn address_rejects_other_symbols() {
        assert!(validate_shipping_address("12 Baker St. ; DROP TABLE").is_err());
        assert!(validate_shipping_address("Straße 5, Berlin").is_err());
    }

    #[test]
    fn contact_must_be_ten_digits() {
        assert!(validate_contact_number("9876543210").is_ok());
        assert!(validate_contact_number("987654321").is_err());
        assert!(validate_contact_number("+919876543210").is_err());
        assert!(validate_contact_number("98765432ab").is_err());
    }

    fn instant() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap()
    }

    #[test]
    fn order_number_uses_user_prefix_and_timestamp() {
        let user_id = Uuid::parse_str("1a2b3c4d-0000-4000-8000-000000000000").unwrap();
        let number = order_number(user_id, instant());

        assert!(number.starts_with("ORD-1a2b3c4d-20250309140507-"));
        assert_eq!(number.len(), 34);
        assert!(number.len() <= 40);
    }

    #[test]
    fn orders_in_the_same_second_get_distinct_numbers() {
        let user_id = Uuid::new_v4();
        let first = order_number(user_id, instant());
        let second = order_number(user_id, instant());

        assert_ne!(first, second);
    }

    #[test]
    fn coordinates_are_bounded() {
        assert!(validate_latitude(&dec("90")).is_ok());
        assert!(validate_latitude(&dec("-45.123456")).is_ok());
        assert!(validate_latitude(&dec("90.000001")).is_err());
        assert!(validate_latitude(&dec("1000")).is_err());
        assert!(validate_longitude(&dec("-180")).is_ok());
        assert!(validate_longitude(&dec("180.5")).is_err());
    }
}
