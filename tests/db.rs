//! Exercises the handlers against a real Postgres.
//!
//! Set `DATABASE_URL` to a disposable database to run these; every test
//! truncates all tables first. Without it the tests return early.

use std::sync::LazyLock;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use axum_storefront::{
    app,
    auth::{
        backend::authenticate,
        jwt::issue_tokens,
        models::{ROLE_STAFF, User},
    },
    category::models::NewCategory,
    config::Config,
    pool::get_pool,
    product::models::NewProduct,
    run_migrations,
    schema::{cart_items, categories, favourites, order_items, orders, products},
    state::AppState,
    utils::types::Pool,
};
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::sync::{Mutex, MutexGuard};
use tower::ServiceExt;
use uuid::Uuid;

const PASSWORD: &str = "correct-horse";

macro_rules! count {
    ($h:expr, $table:expr) => {{
        let mut conn = $h.pool.get().await.unwrap();
        $table.count().get_result::<i64>(&mut conn).await.unwrap()
    }};
}

static DB_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

struct Harness {
    _guard: MutexGuard<'static, ()>,
    app: Router,
    pool: Pool,
    config: Config,
}

async fn setup() -> Option<Harness> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };

    let guard = DB_LOCK.lock().await;

    run_migrations(database_url.clone()).await.unwrap();
    let pool = get_pool(&database_url).await.unwrap();

    {
        let mut conn = pool.get().await.unwrap();
        diesel::sql_query(
            "TRUNCATE customer_feedback, order_items, orders, cart_items, favourites, \
             products, categories, user_profiles, users RESTART IDENTITY CASCADE",
        )
        .execute(&mut conn)
        .await
        .unwrap();
    }

    let config = Config {
        database_url,
        jwt_secret: "db-test-secret".to_owned(),
        bind_addr: "127.0.0.1:0".to_owned(),
        access_token_ttl_minutes: 15,
        refresh_token_ttl_days: 7,
        rmq_url: None,
        mail: None,
    };

    Some(Harness {
        _guard: guard,
        app: app(AppState::new(pool.clone(), config.clone())),
        pool,
        config,
    })
}

impl Harness {
    async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = builder.body(Body::from(body.to_string())).unwrap();
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// Registers a customer and logs in with the contact number.
    async fn sign_up(&self, username: &str, contact_number: &str) -> Value {
        let (status, _) = self
            .send(
                "POST",
                "/api/auth/register",
                None,
                json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password1": PASSWORD,
                    "password2": PASSWORD,
                    "contact_number": contact_number,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, tokens) = self
            .send(
                "POST",
                "/api/auth/login",
                None,
                json!({ "username": contact_number, "password": PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        tokens
    }

    fn staff_token(&self) -> String {
        let user = User {
            id: Uuid::new_v4(),
            username: "staff".to_owned(),
            email: "staff@example.com".to_owned(),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: String::new(),
            hashed_rt: None,
            role: ROLE_STAFF.to_owned(),
            created_at: chrono::NaiveDateTime::default(),
        };

        issue_tokens(&user, &self.config).unwrap().pair.access_token
    }

    async fn seed_category(&self) -> i32 {
        let mut conn = self.pool.get().await.unwrap();

        diesel::insert_into(categories::table)
            .values(&NewCategory {
                name: "Kitchen".to_owned(),
                image: None,
                description: String::new(),
                is_hidden: false,
            })
            .returning(categories::id)
            .get_result(&mut conn)
            .await
            .unwrap()
    }

    async fn seed_product(&self, category_id: i32, name: &str, selling: f64, quantity: i32) -> i32 {
        let mut conn = self.pool.get().await.unwrap();

        diesel::insert_into(products::table)
            .values(&NewProduct {
                category_id,
                name: name.to_owned(),
                vendor: "Acme".to_owned(),
                product_image: None,
                quantity,
                original_price: selling + 5.0,
                selling,
                description: String::new(),
                is_hidden: false,
                trending: false,
            })
            .returning(products::id)
            .get_result(&mut conn)
            .await
            .unwrap()
    }

    async fn stock(&self, product_id: i32) -> i32 {
        let mut conn = self.pool.get().await.unwrap();

        products::table
            .find(product_id)
            .select(products::quantity)
            .get_result(&mut conn)
            .await
            .unwrap()
    }
}

fn token(tokens: &Value) -> String {
    tokens["access_token"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn stored_total_matches_order_items() {
    let Some(h) = setup().await else { return };
    let category = h.seed_category().await;
    let kettle = h.seed_product(category, "Kettle", 19.99, 10).await;
    let spoon = h.seed_product(category, "Spoon", 0.1, 10).await;
    let access = token(&h.sign_up("alice", "9876543210").await);

    for (product_id, quantity) in [(kettle, 2), (spoon, 3)] {
        let (status, body) = h
            .send("POST", "/api/cart", Some(&access), json!({ "product_id": product_id, "quantity": quantity }))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Product added to cart");
    }

    let (status, order) = h
        .send("POST", "/api/checkout", Some(&access), json!({ "shipping_address": "1 Main St." }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = order["id"].as_i64().unwrap() as i32;

    let mut conn = h.pool.get().await.unwrap();
    let total: BigDecimal = orders::table
        .find(order_id)
        .select(orders::total_amount)
        .get_result(&mut conn)
        .await
        .unwrap();
    let items: Vec<(BigDecimal, i32)> = order_items::table
        .filter(order_items::order_id.eq(order_id))
        .select((order_items::price, order_items::quantity))
        .load(&mut conn)
        .await
        .unwrap();
    drop(conn);

    let summed = items
        .iter()
        .fold(BigDecimal::from(0), |acc, (price, quantity)| acc + price * BigDecimal::from(*quantity));
    assert_eq!(items.len(), 2);
    assert_eq!(total, summed);
    assert_eq!(total, "40.28".parse::<BigDecimal>().unwrap());

    assert_eq!(h.stock(kettle).await, 8);
    assert_eq!(h.stock(spoon).await, 7);
    assert_eq!(count!(h, cart_items::table), 0);
}

#[tokio::test]
async fn orders_placed_in_the_same_second_both_succeed() {
    let Some(h) = setup().await else { return };
    let category = h.seed_category().await;
    let kettle = h.seed_product(category, "Kettle", 20.0, 10).await;
    let access = token(&h.sign_up("alice", "9876543210").await);

    let buy_now = json!({
        "customer_name": "Alice",
        "customer_email": "alice@example.com",
        "customer_contact": "9876543210",
        "shipping_address": "1 Main St.",
    });

    let uri = format!("/api/checkout/buy-now/{kettle}/1");
    let (first, _) = h.send("POST", &uri, Some(&access), buy_now.clone()).await;
    let (second, _) = h.send("POST", &uri, Some(&access), buy_now).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CREATED);
    assert_eq!(count!(h, orders::table), 2);
    assert_eq!(h.stock(kettle).await, 8);
}

#[tokio::test]
async fn stock_shortfall_leaves_stock_and_cart_untouched() {
    let Some(h) = setup().await else { return };
    let category = h.seed_category().await;
    let kettle = h.seed_product(category, "Kettle", 20.0, 5).await;
    let spoon = h.seed_product(category, "Spoon", 1.0, 1).await;
    let access = token(&h.sign_up("alice", "9876543210").await);

    for (product_id, quantity) in [(kettle, 2), (spoon, 1)] {
        let (status, _) = h
            .send("POST", "/api/cart", Some(&access), json!({ "product_id": product_id, "quantity": quantity }))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    // someone else bought the last spoon after it went into the cart
    {
        let mut conn = h.pool.get().await.unwrap();
        diesel::update(products::table.find(spoon))
            .set(products::quantity.eq(0))
            .execute(&mut conn)
            .await
            .unwrap();
    }

    let (status, body) = h
        .send("POST", "/api/checkout", Some(&access), json!({ "shipping_address": "1 Main St." }))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "Not enough stock available for Spoon");
    assert_eq!(h.stock(kettle).await, 5);
    assert_eq!(h.stock(spoon).await, 0);
    assert_eq!(count!(h, cart_items::table), 2);
    assert_eq!(count!(h, orders::table), 0);
    assert_eq!(count!(h, order_items::table), 0);
}

#[tokio::test]
async fn cart_and_favourites_report_duplicates() {
    let Some(h) = setup().await else { return };
    let category = h.seed_category().await;
    let kettle = h.seed_product(category, "Kettle", 20.0, 5).await;
    let access = token(&h.sign_up("alice", "9876543210").await);

    let add = json!({ "product_id": kettle, "quantity": 1 });
    let (_, body) = h.send("POST", "/api/cart", Some(&access), add.clone()).await;
    assert_eq!(body["status"], "Product added to cart");
    let (status, body) = h.send("POST", "/api/cart", Some(&access), add).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Product already in cart");
    assert_eq!(count!(h, cart_items::table), 1);

    let spoon = h.seed_product(category, "Spoon", 1.0, 2).await;
    let (status, body) = h
        .send("POST", "/api/cart", Some(&access), json!({ "product_id": spoon, "quantity": 3 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Not enough stock");

    let (status, body) = h
        .send("POST", "/api/cart", Some(&access), json!({ "product_id": 999 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "Product not found");

    let favourite = json!({ "product_id": kettle });
    let (_, body) = h.send("POST", "/api/favourites", Some(&access), favourite.clone()).await;
    assert_eq!(body["status"], "Product added to favourites");
    let (status, body) = h.send("POST", "/api/favourites", Some(&access), favourite).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Product already in favourites");
    assert_eq!(count!(h, favourites::table), 1);
}

#[tokio::test]
async fn contact_number_resolves_before_username() {
    let Some(h) = setup().await else { return };
    h.sign_up("alice", "9876543210").await;

    let mut conn = h.pool.get().await.unwrap();

    let by_contact = authenticate(&mut *conn, "9876543210", PASSWORD).await.unwrap();
    assert_eq!(by_contact.map(|user| user.username), Some("alice".to_owned()));

    let by_username = authenticate(&mut *conn, "alice", PASSWORD).await.unwrap();
    assert_eq!(by_username.map(|user| user.username), Some("alice".to_owned()));

    let wrong_password = authenticate(&mut *conn, "9876543210", "not-the-password").await.unwrap();
    assert!(wrong_password.is_none());
    drop(conn);

    let (status, body) = h
        .send("POST", "/api/auth/login", None, json!({ "username": "0000000000", "password": PASSWORD }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "Invalid User Name or Password");
}

#[tokio::test]
async fn password_change_revokes_refresh_token() {
    let Some(h) = setup().await else { return };
    let tokens = h.sign_up("alice", "9876543210").await;
    let access = token(&tokens);
    let refresh = tokens["refresh_token"].as_str().unwrap().to_owned();

    let (status, _) = h
        .send(
            "POST",
            "/api/auth/change-password",
            Some(&access),
            json!({
                "old_password": PASSWORD,
                "new_password1": "battery-staple",
                "new_password2": "battery-staple",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = h
        .send("POST", "/api/auth/refresh", None, json!({ "refresh_token": refresh }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_references_and_coordinates_are_client_errors() {
    let Some(h) = setup().await else { return };
    let staff = h.staff_token();

    let (status, body) = h
        .send(
            "POST",
            "/api/products",
            Some(&staff),
            json!({
                "category_id": 999,
                "name": "Kettle",
                "vendor": "Acme",
                "quantity": 1,
                "original_price": 25.0,
                "selling": 20.0,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "Referenced record does not exist");

    let category = h.seed_category().await;
    let kettle = h.seed_product(category, "Kettle", 20.0, 5).await;

    let (status, _) = h
        .send("PATCH", &format!("/api/products/{kettle}"), Some(&staff), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let access = token(&h.sign_up("alice", "9876543210").await);
    h.send("POST", "/api/cart", Some(&access), json!({ "product_id": kettle })).await;

    let (status, _) = h
        .send(
            "POST",
            "/api/checkout",
            Some(&access),
            json!({ "shipping_address": "1 Main St.", "shipping_latitude": 1000 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(count!(h, orders::table), 0);
    assert_eq!(h.stock(kettle).await, 5);
}
