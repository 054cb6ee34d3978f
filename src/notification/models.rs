use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WelcomeNotification {
    pub email: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OrderPlacedNotification {
    pub email: String,
    pub customer_name: String,
    pub order_number: String,
    pub total_amount: bigdecimal::BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    WelcomeUser(WelcomeNotification),
    OrderPlaced(OrderPlacedNotification),
}

/// Rendered e-mail ready for the SMTP transport.
#[derive(Debug, PartialEq)]
pub struct Email {
    pub receiver_name: String,
    pub receiver_email: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn to_email(&self) -> Email {
        match self {
            Notification::WelcomeUser(data) => Email {
                receiver_name: data.username.clone(),
                receiver_email: data.email.clone(),
                subject: "Welcome to the shop".to_owned(),
                body: format!(
                    "Hi {}, your account is ready. You can log in with your username or contact number.",
                    data.username
                ),
            },
            Notification::OrderPlaced(data) => Email {
                receiver_name: data.customer_name.clone(),
                receiver_email: data.email.clone(),
                subject: format!("Order #{} placed successfully", data.order_number),
                body: format!(
                    "Hi {}, thank you for your order #{}. Total: {}.",
                    data.customer_name, data.order_number, data.total_amount
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Notification::WelcomeUser(WelcomeNotification {
            email: "alice@example.com".to_owned(),
            username: "alice".to_owned(),
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "WelcomeUser");
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn order_placed_email_names_the_order() {
        let event = Notification::OrderPlaced(OrderPlacedNotification {
            email: "alice@example.com".to_owned(),
            customer_name: "Alice".to_owned(),
            order_number: "ORD-1a2b3c4d-20250101120000".to_owned(),
            total_amount: bigdecimal::BigDecimal::from_str("19.98").unwrap(),
        });

        let email = event.to_email();
        assert_eq!(email.receiver_email, "alice@example.com");
        assert!(email.subject.contains("ORD-1a2b3c4d-20250101120000"));
        assert!(email.body.contains("19.98"));
    }
}
