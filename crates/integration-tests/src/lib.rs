//! Integration tests for Chickyen.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p chickyen-integration-tests
//! ```
//!
//! Nothing external is needed: [`Backend::spawn`] serves an in-memory stand-in
//! for the REST backend on a loopback port, with enough behavior (tokens,
//! stock decrement on verification, owner-only staff routes) to drive the
//! storefront and the admin console end to end.
//!
//! # Test Categories
//!
//! - `storefront_flows` - Menu, persistent cart, login and two-step signup
//! - `admin_flows` - Order workflow, stock alerts, session teardown, staff policy

#![allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chickyen_admin::{AdminClient, AdminConsole};
use chickyen_core::http::RestClient;
use chickyen_core::{KeyValueStore, MemoryStore, SharedStore};
use chickyen_storefront::{Storefront, StorefrontClient, StorefrontConfig};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

/// Owner seeded into every backend.
pub const OWNER_EMAIL: &str = "owner@chickyen.test";
/// Admin seeded into every backend.
pub const ADMIN_EMAIL: &str = "admin@chickyen.test";
/// Customer seeded into every backend.
pub const CUSTOMER_EMAIL: &str = "asha@example.com";
/// Password shared by every seeded account.
pub const PASSWORD: &str = "pickle-jar";

type Reply = Result<Json<Value>, (StatusCode, Json<Value>)>;
type Shared = Arc<Mutex<BackendState>>;

// =============================================================================
// State
// =============================================================================

#[derive(Debug, Clone)]
struct CustomerAccount {
    id: String,
    email: String,
    password: String,
    name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
}

impl CustomerAccount {
    fn token(&self) -> String {
        format!("cust-{}", self.id)
    }

    fn to_json(&self) -> Value {
        json!({
            "_id": self.id,
            "name": self.name,
            "email": self.email,
            "phone": self.phone,
            "address": self.address,
        })
    }
}

#[derive(Debug, Clone)]
struct StaffRecord {
    id: String,
    name: String,
    email: String,
    password: String,
    role: String,
}

impl StaffRecord {
    fn token(&self) -> String {
        format!("staff-{}", self.id)
    }

    fn to_json(&self) -> Value {
        json!({
            "_id": self.id,
            "name": self.name,
            "email": self.email,
            "role": self.role,
        })
    }
}

#[derive(Debug, Default)]
struct BackendState {
    products: Vec<Value>,
    orders: Vec<Value>,
    customers: Vec<CustomerAccount>,
    staff: Vec<StaffRecord>,
    locations: Vec<Value>,
    logs: Vec<Value>,
    next_id: u64,
    tokens_revoked: bool,
    refuse_status_updates: bool,
    staff_requests: usize,
}

impl BackendState {
    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn log(&mut self, action_type: &str, description: String, admin_name: &str) {
        self.logs.insert(
            0,
            json!({
                "actionType": action_type,
                "description": description,
                "adminName": admin_name,
                "timestamp": chrono::Utc::now(),
            }),
        );
    }

    /// The staff record behind a bearer token; counts the request.
    fn staff_for(&mut self, headers: &HeaderMap) -> Result<StaffRecord, (StatusCode, Json<Value>)> {
        self.staff_requests += 1;
        if self.tokens_revoked {
            return Err(reject(StatusCode::UNAUTHORIZED, "Token expired"));
        }
        let token = bearer(headers).ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "No token"))?;
        self.staff
            .iter()
            .find(|s| s.token() == token)
            .cloned()
            .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Invalid token"))
    }

    fn owner_for(&mut self, headers: &HeaderMap) -> Result<StaffRecord, (StatusCode, Json<Value>)> {
        let staff = self.staff_for(headers)?;
        if staff.role == "owner" {
            Ok(staff)
        } else {
            Err(reject(StatusCode::FORBIDDEN, "Owner access required"))
        }
    }

    fn decrement_stock(&mut self, order_index: usize) {
        let items = self.orders[order_index]["items"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        for item in items {
            let quantity = item["quantity"].as_i64().unwrap_or(0);
            let Some(product_id) = item["productId"].as_str() else {
                continue;
            };
            if let Some(product) = self.products.iter_mut().find(|p| p["_id"] == product_id) {
                let stock = product["stock"].as_i64().unwrap_or(0);
                product["stock"] = json!(stock - quantity);
            }
        }
    }
}

fn reject(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "message": message })))
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

// =============================================================================
// Backend
// =============================================================================

/// A running stub backend.
#[derive(Debug, Clone)]
pub struct Backend {
    state: Shared,
    base_url: Url,
}

impl Backend {
    /// Serve a seeded backend on a loopback port.
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(seed()));
        let router = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            state,
            base_url: Url::parse(&format!("http://{addr}/api")).unwrap(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// A storefront over `store`, talking to this backend.
    #[must_use]
    pub fn storefront(&self, store: SharedStore) -> Storefront {
        let base = self.base_url.to_string();
        let config = StorefrontConfig::from_lookup(|key| {
            (key == "CHICKYEN_API_URL").then(|| base.clone())
        })
        .unwrap();
        let client = StorefrontClient::from_rest(RestClient::new(&self.base_url, None).unwrap());
        Storefront::with_parts(config, store, client)
    }

    #[must_use]
    pub fn admin_client(&self) -> AdminClient {
        AdminClient::from_rest(RestClient::new(&self.base_url, None).unwrap())
    }

    /// Sign `email` in through the real login flow and open a console.
    pub async fn console(&self, email: &str) -> (AdminConsole, SharedStore) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let client = self.admin_client();
        chickyen_admin::sign_in(&client, &store, email, &PASSWORD.to_string().into())
            .await
            .unwrap();
        (AdminConsole::open(client, Arc::clone(&store)).unwrap(), store)
    }

    /// Every staff token is refused from now on.
    pub fn revoke_tokens(&self) {
        self.lock().tokens_revoked = true;
    }

    /// Every status update is rejected from now on.
    pub fn refuse_status_updates(&self) {
        self.lock().refuse_status_updates = true;
    }

    /// Requests that reached a staff-only route.
    #[must_use]
    pub fn staff_requests(&self) -> usize {
        self.lock().staff_requests
    }

    #[must_use]
    pub fn order_status(&self, id: &str) -> Option<String> {
        self.lock()
            .orders
            .iter()
            .find(|o| o["_id"] == id)
            .and_then(|o| o["status"].as_str().map(str::to_owned))
    }

    #[must_use]
    pub fn product_stock(&self, id: &str) -> Option<i64> {
        self.lock()
            .products
            .iter()
            .find(|p| p["_id"] == id)
            .and_then(|p| p["stock"].as_i64())
    }

    #[must_use]
    pub fn staff_names(&self) -> Vec<String> {
        self.lock().staff.iter().map(|s| s.name.clone()).collect()
    }

    #[must_use]
    pub fn log_count(&self) -> usize {
        self.lock().logs.len()
    }
}

/// Whether `store` holds no admin session anymore.
#[must_use]
pub fn session_cleared(store: &SharedStore) -> bool {
    store.get(chickyen_admin::guard::TOKEN_SLOT).unwrap().is_none()
        && store.get(chickyen_admin::guard::USER_SLOT).unwrap().is_none()
}

fn seed() -> BackendState {
    let mut state = BackendState {
        next_id: 100,
        ..BackendState::default()
    };

    state.products = vec![
        json!({
            "_id": "p1", "name": "Chicken Pickle", "price": 250, "weight": "250g",
            "spiceLevel": 3, "description": "Andhra style", "image": "chicken.jpg", "stock": 12
        }),
        json!({
            "_id": "p2", "name": "Prawn Pickle", "price": 400, "weight": "500g",
            "spiceLevel": 4, "description": "Coastal", "image": "prawn.jpg", "stock": 40
        }),
        json!({
            "_id": "p3", "name": "Mutton Pickle", "price": 500, "weight": "250g",
            "spiceLevel": 5, "description": "Boneless", "image": "mutton.jpg", "stock": 0
        }),
    ];

    state.customers = vec![CustomerAccount {
        id: "c1".to_string(),
        email: CUSTOMER_EMAIL.to_string(),
        password: PASSWORD.to_string(),
        name: Some("Asha Rao".to_string()),
        phone: Some("9876543210".to_string()),
        address: Some("12 MG Road".to_string()),
    }];

    state.staff = vec![
        StaffRecord {
            id: "s1".to_string(),
            name: "Meera".to_string(),
            email: OWNER_EMAIL.to_string(),
            password: PASSWORD.to_string(),
            role: "owner".to_string(),
        },
        StaffRecord {
            id: "s2".to_string(),
            name: "Ravi".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: PASSWORD.to_string(),
            role: "admin".to_string(),
        },
    ];

    state.locations = vec![json!({
        "_id": "l1", "name": "Banjara Hills", "address": "Road 12",
        "googleMapsLink": "https://maps.example/banjara"
    })];

    state.orders = vec![
        json!({
            "_id": "o1", "orderId": "ORD-1001", "customerId": "c1",
            "customerName": "Asha Rao", "phone": "9876543210", "email": CUSTOMER_EMAIL,
            "status": "Processing",
            "items": [
                {"productId": "p1", "name": "Chicken Pickle", "price": 250, "quantity": 5, "weight": "250g"}
            ],
            "totalAmount": 1250,
            "pickupLocation": {"locationName": "Banjara Hills"},
            "createdAt": "2026-03-01T10:00:00Z"
        }),
        json!({
            "_id": "o2", "orderId": "ORD-1002", "customerId": "c1",
            "customerName": "Asha Rao", "email": CUSTOMER_EMAIL,
            "status": "Delivered",
            "items": [
                {"productId": "p2", "name": "Prawn Pickle", "price": 400, "quantity": 1, "weight": "500g"}
            ],
            "totalAmount": 400,
            "createdAt": "2026-03-02T10:00:00Z"
        }),
    ];

    state
}

// =============================================================================
// Routes
// =============================================================================

fn router(state: Shared) -> Router {
    Router::new()
        // Storefront
        .route("/api/products/public", get(public_products))
        .route("/api/customers/login", post(customer_login))
        .route("/api/customers/signup", post(customer_signup))
        .route("/api/customers/details", put(customer_details))
        // Staff
        .route("/api/auth/login", post(staff_login))
        .route("/api/orders/all", get(all_orders))
        .route("/api/orders/status/{id}", put(update_status))
        .route("/api/products", get(all_products))
        .route("/api/products/add", post(add_product))
        .route("/api/products/{id}", put(update_product).delete(delete_product))
        .route("/api/customers/all", get(all_customers))
        .route("/api/locations/pickup-points", get(all_locations).post(add_location))
        .route("/api/locations/pickup-points/{id}", delete(delete_location))
        .route("/api/auth/users", get(all_staff))
        .route("/api/auth/register-staff", post(register_staff))
        .route("/api/auth/update-staff/{id}", put(update_staff))
        .route("/api/auth/delete-staff/{id}", delete(delete_staff))
        .route("/api/logs/all", get(all_logs))
        .route("/api/logs/clear", delete(clear_logs))
        .with_state(state)
}

fn lock(state: &Shared) -> MutexGuard<'_, BackendState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct Details {
    name: String,
    phone: String,
    address: String,
}

#[derive(Deserialize)]
struct StatusBody {
    status: String,
}

#[derive(Deserialize)]
struct StaffBody {
    name: String,
    email: String,
    role: String,
    password: Option<String>,
}

async fn public_products(State(state): State<Shared>) -> Json<Value> {
    Json(json!(lock(&state).products))
}

async fn customer_login(State(state): State<Shared>, Json(body): Json<Credentials>) -> Reply {
    let state = lock(&state);
    let account = state
        .customers
        .iter()
        .find(|c| c.email == body.email && c.password == body.password)
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;
    Ok(Json(json!({ "token": account.token(), "customer": account.to_json() })))
}

async fn customer_signup(State(state): State<Shared>, Json(body): Json<Credentials>) -> Reply {
    let mut state = lock(&state);
    if state.customers.iter().any(|c| c.email == body.email) {
        return Err(reject(StatusCode::BAD_REQUEST, "User already exists"));
    }
    let id = state.fresh_id("c");
    state.customers.push(CustomerAccount {
        id,
        email: body.email,
        password: body.password,
        name: None,
        phone: None,
        address: None,
    });
    Ok(Json(json!({ "message": "Signup successful" })))
}

async fn customer_details(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Details>,
) -> Reply {
    let mut state = lock(&state);
    let token = bearer(&headers).ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "No token"))?;
    let account = state
        .customers
        .iter_mut()
        .find(|c| c.token() == token)
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Invalid token"))?;
    account.name = Some(body.name);
    account.phone = Some(body.phone);
    account.address = Some(body.address);
    Ok(Json(account.to_json()))
}

async fn staff_login(State(state): State<Shared>, Json(body): Json<Credentials>) -> Reply {
    let mut state = lock(&state);
    let staff = state
        .staff
        .iter()
        .find(|s| s.email == body.email && s.password == body.password)
        .cloned()
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;
    state.log("LOGIN", format!("{} signed in", staff.name), &staff.name);
    Ok(Json(json!({ "token": staff.token(), "user": staff.to_json() })))
}

async fn all_orders(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = lock(&state);
    state.staff_for(&headers)?;
    Ok(Json(json!(state.orders)))
}

async fn update_status(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Reply {
    let mut state = lock(&state);
    let staff = state.staff_for(&headers)?;
    if state.refuse_status_updates {
        return Err(reject(StatusCode::BAD_REQUEST, "Order is locked"));
    }
    let index = state
        .orders
        .iter()
        .position(|o| o["_id"] == id.as_str())
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Order not found"))?;
    if body.status == "Verified" {
        state.decrement_stock(index);
    }
    state.orders[index]["status"] = json!(body.status);
    let reference = state.orders[index]["orderId"]
        .as_str()
        .unwrap_or_default()
        .to_owned();
    state.log(
        "ORDER_STATUS",
        format!("Order {reference} moved to {}", body.status),
        &staff.name,
    );
    Ok(Json(state.orders[index].clone()))
}

async fn all_products(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = lock(&state);
    state.staff_for(&headers)?;
    Ok(Json(json!(state.products)))
}

async fn add_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Reply {
    let mut state = lock(&state);
    let staff = state.staff_for(&headers)?;
    let id = state.fresh_id("p");
    body["_id"] = json!(id);
    let name = body["name"].as_str().unwrap_or_default().to_owned();
    state.log("PRODUCT_ADD", format!("Added {name}"), &staff.name);
    state.products.push(body.clone());
    Ok(Json(body))
}

async fn update_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Reply {
    let mut state = lock(&state);
    state.staff_for(&headers)?;
    let product = state
        .products
        .iter_mut()
        .find(|p| p["_id"] == id.as_str())
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Product not found"))?;
    body["_id"] = json!(id);
    *product = body.clone();
    Ok(Json(body))
}

async fn delete_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    let mut state = lock(&state);
    state.staff_for(&headers)?;
    let before = state.products.len();
    state.products.retain(|p| p["_id"] != id.as_str());
    if state.products.len() == before {
        return Err(reject(StatusCode::NOT_FOUND, "Product not found"));
    }
    Ok(Json(json!({ "message": "Deleted" })))
}

async fn all_customers(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = lock(&state);
    state.staff_for(&headers)?;
    let customers: Vec<Value> = state.customers.iter().map(CustomerAccount::to_json).collect();
    Ok(Json(json!(customers)))
}

async fn all_locations(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = lock(&state);
    state.staff_for(&headers)?;
    Ok(Json(json!(state.locations)))
}

async fn add_location(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Reply {
    let mut state = lock(&state);
    state.staff_for(&headers)?;
    let id = state.fresh_id("l");
    body["_id"] = json!(id);
    state.locations.push(body.clone());
    Ok(Json(body))
}

async fn delete_location(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    let mut state = lock(&state);
    state.staff_for(&headers)?;
    state.locations.retain(|l| l["_id"] != id.as_str());
    Ok(Json(json!({ "message": "Deleted" })))
}

async fn all_staff(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = lock(&state);
    state.staff_for(&headers)?;
    let staff: Vec<Value> = state.staff.iter().map(StaffRecord::to_json).collect();
    Ok(Json(json!(staff)))
}

async fn register_staff(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<StaffBody>,
) -> Reply {
    let mut state = lock(&state);
    let owner = state.owner_for(&headers)?;
    let Some(password) = body.password else {
        return Err(reject(StatusCode::BAD_REQUEST, "Password is required"));
    };
    let id = state.fresh_id("s");
    let record = StaffRecord {
        id,
        name: body.name,
        email: body.email,
        password,
        role: body.role,
    };
    state.log("STAFF_ADD", format!("Registered {}", record.name), &owner.name);
    state.staff.push(record.clone());
    Ok(Json(record.to_json()))
}

async fn update_staff(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<StaffBody>,
) -> Reply {
    let mut state = lock(&state);
    state.owner_for(&headers)?;
    let record = state
        .staff
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Staff not found"))?;
    record.name = body.name;
    record.email = body.email;
    record.role = body.role;
    Ok(Json(record.to_json()))
}

async fn delete_staff(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    let mut state = lock(&state);
    state.owner_for(&headers)?;
    state.staff.retain(|s| s.id != id);
    Ok(Json(json!({ "message": "Deleted" })))
}

async fn all_logs(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = lock(&state);
    state.staff_for(&headers)?;
    Ok(Json(json!(state.logs)))
}

async fn clear_logs(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = lock(&state);
    state.owner_for(&headers)?;
    state.logs.clear();
    Ok(Json(json!({ "message": "Cleared" })))
}
