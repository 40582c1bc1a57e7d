//! Admin console state.
//!
//! [`AdminConsole`] owns everything a console session needs: the API client,
//! the session store, the signed-in staff member and the cached order
//! snapshot that search, customer insights and status checks read from.
//!
//! # Screen tickets
//!
//! Every tab switch bumps a generation counter and hands out a
//! [`ScreenTicket`]. Fetched data is tagged with the ticket it was requested
//! under and only applied while that ticket is still current, so a slow
//! response for a screen the operator already left is dropped instead of
//! overwriting the newer one.
//!
//! # Session teardown
//!
//! Any API call refused with 401/403 clears the admin store and returns
//! [`AppError::SessionExpired`]. The console should be dropped afterwards.

use core::fmt;
use core::str::FromStr;

use chickyen_core::http::ApiError;
use chickyen_core::{
    Email, LocationId, LocationInput, Order, Product, ProductId, ProductInput, SharedStore,
    StaffAccount, StaffId, StaffInput, StaffRole,
};
use chrono::{DateTime, TimeZone};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::api::AdminClient;
use crate::error::{AppError, Result};
use crate::guard::{self, StaffSession};
use crate::orders::LowStockAlert;
use crate::views::{
    CustomerFilter, CustomersView, LocationsView, LogsView, OrderFilter, OrdersBoardView,
    ProductsView, SalesView, StaffView, render_customers, render_locations, render_logs,
    render_orders_board, render_products, render_sales, render_staff,
};

/// Console tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Orders,
    Products,
    Users,
    Customers,
    Sales,
    Locations,
    Logs,
}

impl Tab {
    pub const ALL: [Self; 7] = [
        Self::Orders,
        Self::Products,
        Self::Users,
        Self::Customers,
        Self::Sales,
        Self::Locations,
        Self::Logs,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Products => "products",
            Self::Users => "users",
            Self::Customers => "customers",
            Self::Sales => "sales",
            Self::Locations => "locations",
            Self::Logs => "logs",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str() == s)
            .ok_or_else(|| format!("unknown tab: {s}"))
    }
}

/// Handle for one screen load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenTicket {
    tab: Tab,
    generation: u64,
}

impl ScreenTicket {
    #[must_use]
    pub const fn tab(self) -> Tab {
        self.tab
    }
}

/// Data fetched under a ticket, waiting to be applied.
#[derive(Debug)]
#[must_use = "fetched data must be applied through the console"]
pub struct Fetched<T> {
    ticket: ScreenTicket,
    data: T,
}

/// Whether a product or staff form creates a record or updates one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode<Id> {
    Create,
    Update(Id),
}

/// Staff form as typed by the owner.
#[derive(Clone)]
pub struct StaffForm {
    pub name: String,
    pub email: String,
    pub role: StaffRole,
    /// Required when registering; ignored when updating.
    pub password: Option<SecretString>,
}

impl fmt::Debug for StaffForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaffForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// What the console shows right after opening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landing {
    pub board: OrdersBoardView,
    pub low_stock: Option<LowStockAlert>,
}

/// An authorized admin console session.
pub struct AdminConsole {
    pub(crate) client: AdminClient,
    store: SharedStore,
    pub(crate) session: StaffSession,
    orders: Vec<Order>,
    generation: u64,
    tab: Tab,
}

impl fmt::Debug for AdminConsole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConsole")
            .field("session", &self.session)
            .field("orders", &self.orders.len())
            .field("generation", &self.generation)
            .field("tab", &self.tab)
            .finish_non_exhaustive()
    }
}

impl AdminConsole {
    /// Open the console over the stored session. Nothing is fetched when the
    /// session is refused.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the stored session is missing, unreadable
    /// or not a staff role.
    pub fn open(client: AdminClient, store: SharedStore) -> Result<Self> {
        let session = guard::authorize(&store)?;
        tracing::debug!(role = %session.role(), "Admin console opened");
        Ok(Self {
            client,
            store,
            session,
            orders: Vec::new(),
            generation: 0,
            tab: Tab::Orders,
        })
    }

    /// Load the orders board and run the stock check. A failed stock check
    /// only drops the alert.
    ///
    /// # Errors
    ///
    /// Returns a transport error while loading the board, or `SessionExpired`.
    pub async fn landing<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<Landing> {
        let board = self.orders_board(&OrderFilter::default(), now).await?;
        let low_stock = self.low_stock_or_none().await?;
        Ok(Landing { board, low_stock })
    }

    #[must_use]
    pub const fn session(&self) -> &StaffSession {
        &self.session
    }

    #[must_use]
    pub const fn tab(&self) -> Tab {
        self.tab
    }

    /// The cached order snapshot.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Make `tab` the active screen, invalidating every earlier ticket.
    pub fn switch_tab(&mut self, tab: Tab) -> ScreenTicket {
        self.generation += 1;
        self.tab = tab;
        tracing::debug!(tab = %tab, generation = self.generation, "Switched tab");
        ScreenTicket {
            tab,
            generation: self.generation,
        }
    }

    #[must_use]
    pub const fn is_current(&self, ticket: ScreenTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Unwrap fetched data if its screen is still the active one.
    ///
    /// # Errors
    ///
    /// Returns `Superseded` for data fetched under an older ticket.
    pub fn accept<T>(&self, fetched: Fetched<T>) -> Result<T> {
        if self.is_current(fetched.ticket) {
            Ok(fetched.data)
        } else {
            tracing::debug!(
                tab = %fetched.ticket.tab,
                stale = fetched.ticket.generation,
                current = self.generation,
                "Dropped stale screen data"
            );
            Err(AppError::Superseded)
        }
    }

    /// Fetch all orders under `ticket`.
    ///
    /// # Errors
    ///
    /// Returns a transport error or `SessionExpired`.
    pub async fn fetch_orders(&self, ticket: ScreenTicket) -> Result<Fetched<Vec<Order>>> {
        let result = self.client.orders(self.session.token()).await;
        self.stamp(ticket, result)
    }

    /// Fetch the menu under `ticket`.
    ///
    /// # Errors
    ///
    /// Returns a transport error or `SessionExpired`.
    pub async fn fetch_products(&self, ticket: ScreenTicket) -> Result<Fetched<Vec<Product>>> {
        let result = self.client.products(self.session.token()).await;
        self.stamp(ticket, result)
    }

    /// Replace the order snapshot with fetched orders.
    ///
    /// # Errors
    ///
    /// Returns `Superseded` when the ticket is stale; the snapshot is kept.
    pub fn apply_orders(&mut self, fetched: Fetched<Vec<Order>>) -> Result<&[Order]> {
        self.orders = self.accept(fetched)?;
        Ok(&self.orders)
    }

    // =========================================================================
    // Screens
    // =========================================================================

    /// Orders board: re-fetches the snapshot, then filters it.
    ///
    /// # Errors
    ///
    /// Returns a transport error or `SessionExpired`.
    pub async fn orders_board<Tz: TimeZone>(
        &mut self,
        filter: &OrderFilter,
        now: &DateTime<Tz>,
    ) -> Result<OrdersBoardView> {
        let ticket = self.switch_tab(Tab::Orders);
        let fetched = self.fetch_orders(ticket).await?;
        let orders = self.apply_orders(fetched)?;
        Ok(render_orders_board(orders, filter, now))
    }

    /// Filter the cached snapshot without a network round trip.
    #[must_use]
    pub fn search_orders<Tz: TimeZone>(
        &self,
        filter: &OrderFilter,
        now: &DateTime<Tz>,
    ) -> OrdersBoardView {
        render_orders_board(&self.orders, filter, now)
    }

    /// Menu grid.
    ///
    /// # Errors
    ///
    /// Returns a transport error or `SessionExpired`.
    pub async fn products_screen(&mut self) -> Result<ProductsView> {
        let ticket = self.switch_tab(Tab::Products);
        let fetched = self.fetch_products(ticket).await?;
        let products = self.accept(fetched)?;
        Ok(render_products(&products))
    }

    /// Customer list with order counts and spend from a fresh order snapshot.
    ///
    /// # Errors
    ///
    /// Returns a transport error or `SessionExpired`.
    pub async fn customers_screen(
        &mut self,
        filter: CustomerFilter,
        search: &str,
    ) -> Result<CustomersView> {
        let ticket = self.switch_tab(Tab::Customers);
        let token = self.session.token();
        let (customers, orders) =
            tokio::join!(self.client.customers(token), self.client.orders(token));
        let customers = self.accept(self.stamp(ticket, customers)?)?;
        let fetched = self.stamp(ticket, orders)?;
        let orders = self.apply_orders(fetched)?;
        Ok(render_customers(customers, orders, filter, search))
    }

    /// Sales analytics over a fresh order snapshot.
    ///
    /// # Errors
    ///
    /// Returns a transport error or `SessionExpired`.
    pub async fn sales_screen<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<SalesView> {
        let ticket = self.switch_tab(Tab::Sales);
        let fetched = self.fetch_orders(ticket).await?;
        let orders = self.apply_orders(fetched)?;
        Ok(render_sales(orders, now))
    }

    /// Pickup points.
    ///
    /// # Errors
    ///
    /// Returns a transport error or `SessionExpired`.
    pub async fn locations_screen(&mut self) -> Result<LocationsView> {
        let ticket = self.switch_tab(Tab::Locations);
        let result = self.client.pickup_points(self.session.token()).await;
        let locations = self.accept(self.stamp(ticket, result)?)?;
        Ok(render_locations(&locations))
    }

    /// Staff accounts, with controls according to the viewer's role.
    ///
    /// # Errors
    ///
    /// Returns a transport error or `SessionExpired`.
    pub async fn staff_screen(&mut self) -> Result<StaffView> {
        let ticket = self.switch_tab(Tab::Users);
        let accounts = self.accept(self.fetch_staff(ticket).await?)?;
        Ok(render_staff(&accounts, &self.session))
    }

    /// Activity history with timestamps in `tz`.
    ///
    /// # Errors
    ///
    /// Returns a transport error or `SessionExpired`.
    pub async fn logs_screen<Tz>(&mut self, tz: &Tz) -> Result<LogsView>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let ticket = self.switch_tab(Tab::Logs);
        let result = self.client.activity_logs(self.session.token()).await;
        let logs = self.accept(self.stamp(ticket, result)?)?;
        Ok(render_logs(&logs, self.session.is_owner(), tz))
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Prefill the product form for editing.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the product is gone, or a transport error.
    pub async fn edit_product(&self, id: &ProductId) -> Result<(EditMode<ProductId>, ProductInput)> {
        let result = self.client.products(self.session.token()).await;
        let products = self.checked(result)?;
        let product = products
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Product {id}")))?;
        Ok((EditMode::Update(id.clone()), ProductInput::from(product)))
    }

    /// Create or update a product, then reload the grid.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for an incomplete form, the backend's refusal, a
    /// transport error or `SessionExpired`.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn save_product(
        &mut self,
        mode: EditMode<ProductId>,
        input: ProductInput,
    ) -> Result<ProductsView> {
        validate_product(&input)?;
        let token = self.session.token();
        let result = match &mode {
            EditMode::Create => self.client.create_product(token, &input).await,
            EditMode::Update(id) => self.client.update_product(token, id, &input).await,
        };
        self.checked(result)?;
        tracing::info!(update = matches!(mode, EditMode::Update(_)), "Product saved");
        self.products_screen().await
    }

    /// Delete a product, then reload the grid.
    ///
    /// # Errors
    ///
    /// Returns the backend's refusal, a transport error or `SessionExpired`.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&mut self, id: &ProductId) -> Result<ProductsView> {
        let result = self.client.delete_product(self.session.token(), id).await;
        self.checked(result)?;
        tracing::info!("Product deleted");
        self.products_screen().await
    }

    // =========================================================================
    // Pickup locations
    // =========================================================================

    /// Add a pickup point, then reload the list.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for a blank name or address, the backend's
    /// refusal, a transport error or `SessionExpired`.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn add_location(&mut self, input: LocationInput) -> Result<LocationsView> {
        if input.name.trim().is_empty() || input.address.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Name and address are required".to_string(),
            ));
        }
        let result = self
            .client
            .add_pickup_point(self.session.token(), &input)
            .await;
        self.checked(result)?;
        tracing::info!("Pickup point added");
        self.locations_screen().await
    }

    /// Remove a pickup point, then reload the list.
    ///
    /// # Errors
    ///
    /// Returns the backend's refusal, a transport error or `SessionExpired`.
    #[instrument(skip(self), fields(location_id = %id))]
    pub async fn delete_location(&mut self, id: &LocationId) -> Result<LocationsView> {
        let result = self
            .client
            .delete_pickup_point(self.session.token(), id)
            .await;
        self.checked(result)?;
        tracing::info!("Pickup point removed");
        self.locations_screen().await
    }

    // =========================================================================
    // Staff
    // =========================================================================

    /// Prefill the staff form for editing.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `ProtectedAccount`, `NotFound` or a transport
    /// error.
    pub async fn edit_staff(&self, id: &StaffId) -> Result<(EditMode<StaffId>, StaffForm)> {
        self.session.require_owner("edit staff")?;
        let account = self.find_staff(id).await?;
        self.session.ensure_editable(&account, "edit staff")?;
        Ok((
            EditMode::Update(account.id),
            StaffForm {
                name: account.name,
                email: account.email,
                role: account.role,
                password: None,
            },
        ))
    }

    /// Register or update a staff account, then reload the list. Owner only.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-owners, `ProtectedAccount` when updating an
    /// owner, `InvalidEmail` or `BadRequest` for a bad form, the backend's
    /// refusal, a transport error or `SessionExpired`.
    #[instrument(skip(self, form), fields(role = %form.role))]
    pub async fn save_staff(&mut self, mode: EditMode<StaffId>, form: StaffForm) -> Result<StaffView> {
        self.session.require_owner("manage staff")?;
        if form.name.trim().is_empty() {
            return Err(AppError::BadRequest("Name is required".to_string()));
        }
        let email = Email::parse(&form.email)?;
        let token = self.session.token();

        let result = match &mode {
            EditMode::Create => {
                let password = form
                    .password
                    .as_ref()
                    .map(|p| p.expose_secret().to_string())
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| AppError::BadRequest("Password is required".to_string()))?;
                let input = StaffInput {
                    name: form.name.trim().to_string(),
                    email: email.into_inner(),
                    role: form.role,
                    password: Some(password),
                };
                self.client.register_staff(token, &input).await
            }
            EditMode::Update(id) => {
                let account = self.find_staff(id).await?;
                self.session.ensure_editable(&account, "manage staff")?;
                let input = StaffInput {
                    name: form.name.trim().to_string(),
                    email: email.into_inner(),
                    role: form.role,
                    password: None,
                };
                self.client.update_staff(token, id, &input).await
            }
        };
        self.checked(result)?;
        tracing::info!(update = matches!(mode, EditMode::Update(_)), "Staff account saved");
        self.staff_screen().await
    }

    /// Remove a staff account, then reload the list. Owner only; owner
    /// accounts cannot be removed.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `ProtectedAccount`, `NotFound`, the backend's
    /// refusal, a transport error or `SessionExpired`.
    #[instrument(skip(self), fields(staff_id = %id))]
    pub async fn delete_staff(&mut self, id: &StaffId) -> Result<StaffView> {
        self.session.require_owner("remove staff")?;
        let account = self.find_staff(id).await?;
        self.session.ensure_editable(&account, "remove staff")?;
        let result = self.client.delete_staff(self.session.token(), id).await;
        self.checked(result)?;
        tracing::info!("Staff account removed");
        self.staff_screen().await
    }

    // =========================================================================
    // Activity logs
    // =========================================================================

    /// Delete every log entry, then reload the list. Owner only.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-owners, a transport error or
    /// `SessionExpired`.
    #[instrument(skip(self, tz))]
    pub async fn clear_logs<Tz>(&mut self, tz: &Tz) -> Result<LogsView>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.session.require_owner("clear logs")?;
        let result = self.client.clear_logs(self.session.token()).await;
        self.checked(result)?;
        tracing::info!("Activity logs cleared");
        self.logs_screen(tz).await
    }

    /// End the session. Returns where to go next.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be cleared.
    pub fn sign_out(self) -> Result<&'static str> {
        guard::sign_out(&self.store)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Map an API result, tearing the session down on 401/403.
    pub(crate) fn checked<T>(&self, result: std::result::Result<T, ApiError>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(err) if err.is_unauthorized() => {
                tracing::warn!(error = %err, "Backend refused the staff token");
                if let Err(store_err) = guard::sign_out(&self.store) {
                    tracing::error!(error = %store_err, "Failed to clear admin session");
                }
                Err(AppError::SessionExpired)
            }
            Err(err) => Err(AppError::Api(err)),
        }
    }

    /// Re-fetch the order snapshot for the current screen.
    pub(crate) async fn refresh_orders(&mut self) -> Result<()> {
        let ticket = ScreenTicket {
            tab: self.tab,
            generation: self.generation,
        };
        let fetched = self.fetch_orders(ticket).await?;
        self.apply_orders(fetched)?;
        Ok(())
    }

    fn stamp<T>(
        &self,
        ticket: ScreenTicket,
        result: std::result::Result<T, ApiError>,
    ) -> Result<Fetched<T>> {
        Ok(Fetched {
            ticket,
            data: self.checked(result)?,
        })
    }

    async fn fetch_staff(&self, ticket: ScreenTicket) -> Result<Fetched<Vec<StaffAccount>>> {
        let result = self.client.staff(self.session.token()).await;
        self.stamp(ticket, result)
    }

    async fn find_staff(&self, id: &StaffId) -> Result<StaffAccount> {
        let result = self.client.staff(self.session.token()).await;
        self.checked(result)?
            .into_iter()
            .find(|account| &account.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Staff {id}")))
    }
}

fn validate_product(input: &ProductInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Product name is required".to_string()));
    }
    if input.price.amount().is_sign_negative() {
        return Err(AppError::BadRequest("Price cannot be negative".to_string()));
    }
    if input.stock < 0 {
        return Err(AppError::BadRequest("Stock cannot be negative".to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::StatusCode;
    use axum::routing::{delete, get, put};
    use axum::{Json, Router};
    use chickyen_core::http::RestClient;
    use chickyen_core::{KeyValueStore, MemoryStore, OrderId, OrderStatus, Price};
    use chrono::Utc;
    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::guard::{TOKEN_SLOT, USER_SLOT};

    async fn spawn(router: Router) -> AdminClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        let base = Url::parse(&format!("http://{addr}/api")).unwrap();
        AdminClient::from_rest(RestClient::new(&base, None).unwrap())
    }

    fn store(role: &str) -> SharedStore {
        let store: SharedStore = Arc::new(MemoryStore::new());
        store.set(TOKEN_SLOT, "staff-tok").unwrap();
        store
            .set(USER_SLOT, &format!(r#"{{"_id":"u1","name":"Meera","role":"{role}"}}"#))
            .unwrap();
        store
    }

    fn orders_json() -> serde_json::Value {
        json!([
            {
                "_id": "o1", "orderId": "ORD-1001", "customerId": "c1",
                "customerName": "Asha", "email": "asha@example.com",
                "status": "Processing", "items": [], "totalAmount": 360,
                "createdAt": "2026-03-01T10:00:00Z"
            },
            {
                "_id": "o2", "orderId": "ORD-1002", "customerId": "c1",
                "customerName": "Asha", "email": "asha@example.com",
                "status": "Delivered", "items": [], "totalAmount": 200,
                "createdAt": "2026-03-02T10:00:00Z"
            }
        ])
    }

    fn orders_router() -> Router {
        Router::new().route("/api/orders/all", get(|| async { Json(orders_json()) }))
    }

    #[tokio::test]
    async fn test_open_refuses_before_fetching() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let router = Router::new().route(
            "/api/orders/all",
            get(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Json(json!([])) }
            }),
        );
        let client = spawn(router).await;

        let empty: SharedStore = Arc::new(MemoryStore::new());
        let err = AdminConsole::open(client.clone(), empty).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let customer_store = store("customer");
        assert!(AdminConsole::open(client, customer_store).is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stale_ticket_is_dropped() {
        let client = spawn(orders_router()).await;
        let mut console = AdminConsole::open(client, store("admin")).unwrap();

        let orders_ticket = console.switch_tab(Tab::Orders);
        let fetched = console.fetch_orders(orders_ticket).await.unwrap();
        let newer = console.switch_tab(Tab::Products);

        assert!(!console.is_current(orders_ticket));
        assert!(console.is_current(newer));
        assert!(matches!(console.apply_orders(fetched), Err(AppError::Superseded)));
        assert!(console.orders().is_empty());
        assert_eq!(console.tab(), Tab::Products);
    }

    #[tokio::test]
    async fn test_board_and_cached_search() {
        let client = spawn(orders_router()).await;
        let mut console = AdminConsole::open(client, store("admin")).unwrap();
        let now = Utc::now();

        let board = console
            .orders_board(&OrderFilter::status(OrderStatus::Processing), &now)
            .await
            .unwrap();
        assert_eq!(board.title, "Processing Orders");
        assert_eq!(board.cards.len(), 1);
        assert_eq!(console.orders().len(), 2);

        let filter = OrderFilter {
            status: None,
            search: "1002".to_string(),
        };
        let board = console.search_orders(&filter, &now);
        assert_eq!(board.cards.len(), 1);
        assert_eq!(board.cards[0].id, "o2");
    }

    #[tokio::test]
    async fn test_customers_use_fresh_orders() {
        let router = orders_router().route(
            "/api/customers/all",
            get(|| async {
                Json(json!([
                    {"_id": "c1", "name": "Asha", "email": "asha@example.com"},
                    {"_id": "c2", "email": "ghost@example.com"}
                ]))
            }),
        );
        let client = spawn(router).await;
        let mut console = AdminConsole::open(client, store("admin")).unwrap();

        let view = console
            .customers_screen(CustomerFilter::Repeat, "")
            .await
            .unwrap();
        assert_eq!(view.cards.len(), 1);
        assert_eq!(view.cards[0].lifetime_spend, "₹560");
        assert_eq!(console.tab(), Tab::Customers);
    }

    #[tokio::test]
    async fn test_unauthorized_tears_session_down() {
        let router = Router::new().route(
            "/api/products",
            get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"error": "jwt expired"}))) }),
        );
        let client = spawn(router).await;
        let shared = store("owner");
        let mut console = AdminConsole::open(client, Arc::clone(&shared)).unwrap();

        let err = console.products_screen().await.unwrap_err();
        assert!(matches!(err, AppError::SessionExpired));
        assert!(shared.get(TOKEN_SLOT).unwrap().is_none());
        assert!(shared.get(USER_SLOT).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_status_change_confirm_and_reject() {
        let router = orders_router()
            .route(
                "/api/orders/status/{id}",
                put(|| async { Json(json!({"message": "ok"})) }),
            )
            .route(
                "/api/products",
                get(|| async {
                    Json(json!([
                        {"_id": "p1", "name": "Mango", "price": 180, "stock": 3},
                        {"_id": "p2", "name": "Lime", "price": 150, "stock": 30}
                    ]))
                }),
            );
        let client = spawn(router).await;
        let mut console = AdminConsole::open(client, store("admin")).unwrap();
        console
            .orders_board(&OrderFilter::default(), &Utc::now())
            .await
            .unwrap();

        let err = console
            .request_status_change(&OrderId::new("o2"), OrderStatus::Packed)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
        assert!(matches!(
            console.request_status_change(&OrderId::new("nope"), OrderStatus::Verified),
            Err(AppError::NotFound(_))
        ));

        let pending = console
            .request_status_change(&OrderId::new("o1"), OrderStatus::Verified)
            .unwrap();
        assert_eq!(pending.prompt.title, "Verify Order");
        let changed = console.confirm(pending).await.unwrap();
        let alert = changed.low_stock.unwrap();
        assert_eq!(alert.items.len(), 1);
        assert_eq!(alert.items[0].name, "Mango");
    }

    #[tokio::test]
    async fn test_failed_confirm_keeps_snapshot() {
        let router = orders_router().route(
            "/api/orders/status/{id}",
            put(|| async { (StatusCode::BAD_REQUEST, Json(json!({"error": "Order locked"}))) }),
        );
        let client = spawn(router).await;
        let mut console = AdminConsole::open(client, store("admin")).unwrap();
        console
            .orders_board(&OrderFilter::default(), &Utc::now())
            .await
            .unwrap();
        let before = console.orders().to_vec();

        let pending = console
            .request_status_change(&OrderId::new("o1"), OrderStatus::Cancelled)
            .unwrap();
        let err = console.confirm(pending).await.unwrap_err();
        assert_eq!(err.user_message(), "Order locked");
        assert_eq!(console.orders(), before.as_slice());
    }

    #[tokio::test]
    async fn test_accepted_change_survives_failed_reload() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let router = Router::new()
            .route(
                "/api/orders/all",
                get(move || {
                    let first = counter.fetch_add(1, Ordering::SeqCst) == 0;
                    async move {
                        if first {
                            (StatusCode::OK, Json(orders_json()))
                        } else {
                            (StatusCode::BAD_GATEWAY, Json(json!({"error": "upstream hiccup"})))
                        }
                    }
                }),
            )
            .route(
                "/api/orders/status/{id}",
                put(|| async { Json(json!({"message": "ok"})) }),
            )
            .route(
                "/api/products",
                get(|| async {
                    Json(json!([{"_id": "p1", "name": "Mango", "price": 180, "stock": 4}]))
                }),
            );
        let client = spawn(router).await;
        let mut console = AdminConsole::open(client, store("admin")).unwrap();
        console
            .orders_board(&OrderFilter::default(), &Utc::now())
            .await
            .unwrap();
        let before = console.orders().to_vec();

        let pending = console
            .request_status_change(&OrderId::new("o1"), OrderStatus::Verified)
            .unwrap();
        let changed = console.confirm(pending).await.unwrap();

        assert_eq!(changed.status, OrderStatus::Verified);
        assert_eq!(changed.low_stock.unwrap().items[0].name, "Mango");
        assert_eq!(loads.load(Ordering::SeqCst), 2);
        assert_eq!(console.orders(), before.as_slice());
    }

    #[tokio::test]
    async fn test_landing_without_stock_data() {
        let router = orders_router().route(
            "/api/products",
            get(|| async { (StatusCode::BAD_GATEWAY, Json(json!({"error": "upstream hiccup"}))) }),
        );
        let client = spawn(router).await;
        let mut console = AdminConsole::open(client, store("admin")).unwrap();

        let landing = console.landing(&Utc::now()).await.unwrap();
        assert_eq!(landing.board.cards.len(), 2);
        assert!(landing.low_stock.is_none());
    }

    #[tokio::test]
    async fn test_invoice_only_for_delivered() {
        let client = spawn(orders_router()).await;
        let mut console = AdminConsole::open(client, store("admin")).unwrap();
        console
            .orders_board(&OrderFilter::default(), &Utc::now())
            .await
            .unwrap();

        assert!(matches!(
            console.invoice_url(&OrderId::new("o1")),
            Err(AppError::BadRequest(_))
        ));
        let url = console.invoice_url(&OrderId::new("o2")).unwrap();
        assert!(url.path().ends_with("/orders/invoice/o2"));
        assert_eq!(url.query(), Some("token=staff-tok"));
    }

    #[tokio::test]
    async fn test_owner_only_operations() {
        let deletes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&deletes);
        let router = Router::new()
            .route(
                "/api/auth/users",
                get(|| async {
                    Json(json!([
                        {"_id": "s0", "name": "Ravi", "email": "ravi@chickyen.in", "role": "owner"},
                        {"_id": "s1", "name": "Meera", "email": "meera@chickyen.in", "role": "admin"}
                    ]))
                }),
            )
            .route(
                "/api/logs/clear",
                delete(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    async { StatusCode::NO_CONTENT }
                }),
            );
        let client = spawn(router).await;

        let mut admin = AdminConsole::open(client.clone(), store("admin")).unwrap();
        assert!(matches!(admin.clear_logs(&Utc).await, Err(AppError::Forbidden(_))));
        assert!(matches!(
            admin.delete_staff(&StaffId::new("s1")).await,
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(deletes.load(Ordering::SeqCst), 0);

        let owner = AdminConsole::open(client, store("owner")).unwrap();
        assert!(matches!(
            owner.edit_staff(&StaffId::new("s0")).await,
            Err(AppError::ProtectedAccount(ref name)) if name == "Ravi"
        ));
        let (mode, form) = owner.edit_staff(&StaffId::new("s1")).await.unwrap();
        assert_eq!(mode, EditMode::Update(StaffId::new("s1")));
        assert_eq!(form.role, StaffRole::Admin);
        assert!(form.password.is_none());
    }

    #[tokio::test]
    async fn test_form_validation_happens_locally() {
        let client = spawn(Router::new()).await;
        let mut owner = AdminConsole::open(client, store("owner")).unwrap();

        let form = StaffForm {
            name: "Kiran".to_string(),
            email: "kiran@chickyen.in".to_string(),
            role: StaffRole::Admin,
            password: None,
        };
        assert!(matches!(
            owner.save_staff(EditMode::Create, form).await,
            Err(AppError::BadRequest(_))
        ));

        let input = ProductInput {
            name: " ".to_string(),
            price: Price::from_rupees(100),
            weight: "250g".to_string(),
            spice_level: 1,
            description: String::new(),
            image: String::new(),
            stock: 5,
        };
        assert!(matches!(
            owner.save_product(EditMode::Create, input).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_tab_parse() {
        assert_eq!("Sales".parse::<Tab>().unwrap(), Tab::Sales);
        assert!("reports".parse::<Tab>().is_err());
    }
}
