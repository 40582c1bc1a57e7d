//! Order status workflow.
//!
//! A status change is two steps. [`AdminConsole::request_status_change`]
//! checks the move against the cached snapshot and hands back a
//! [`PendingStatusChange`] carrying the confirmation prompt; nothing has been
//! sent yet. [`AdminConsole::confirm`] consumes it and talks to the backend,
//! and [`PendingStatusChange::cancel`] drops it.

use chickyen_core::{Order, OrderId, OrderStatus, Product};
use tracing::instrument;
use url::Url;

use crate::console::AdminConsole;
use crate::error::{AppError, Result};

/// Colour family used for status pills and confirmation prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Yellow.
    Pending,
    /// Blue.
    Info,
    /// Purple.
    Packing,
    /// Orange.
    Dispatch,
    /// Green.
    Success,
    /// Red.
    Danger,
}

impl Tone {
    /// Tone of a status pill.
    #[must_use]
    pub const fn for_status(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Processing => Self::Pending,
            OrderStatus::Verified => Self::Info,
            OrderStatus::Packed => Self::Packing,
            OrderStatus::OutForDelivery => Self::Dispatch,
            OrderStatus::Delivered => Self::Success,
            OrderStatus::Cancelled => Self::Danger,
        }
    }
}

/// Text of the confirmation shown before a status change is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPrompt {
    pub title: &'static str,
    pub message: &'static str,
    pub tone: Tone,
}

impl StatusPrompt {
    /// Prompt for moving an order to `target`.
    #[must_use]
    pub const fn for_target(target: OrderStatus) -> Self {
        let (title, message) = match target {
            OrderStatus::Verified => (
                "Verify Order",
                "Are you sure you want to verify this order? This will move it to the processing stage.",
            ),
            OrderStatus::Packed => (
                "Order Packed",
                "Customer item has been packed and ready to deliver?",
            ),
            OrderStatus::OutForDelivery => ("Out for Delivery", "Item went for delivery?"),
            OrderStatus::Delivered => (
                "Confirm Delivered",
                "Has the customer received the item successfully?",
            ),
            OrderStatus::Cancelled => ("Cancel Order", "Are you sure you want to cancel this order?"),
            OrderStatus::Processing => ("Update Order", "Move this order back to processing?"),
        };
        Self {
            title,
            message,
            tone: Tone::for_status(target),
        }
    }
}

/// Button label for the action that moves an order to `target`.
#[must_use]
pub const fn action_label(target: OrderStatus) -> &'static str {
    match target {
        OrderStatus::Verified => "Verify",
        OrderStatus::Packed => "Mark Packed",
        OrderStatus::OutForDelivery => "Send Out",
        OrderStatus::Delivered => "Confirm Delivery",
        OrderStatus::Cancelled => "Cancel",
        OrderStatus::Processing => "Reopen",
    }
}

/// A validated status change waiting for the operator's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending status change does nothing until confirmed"]
pub struct PendingStatusChange {
    pub order_id: OrderId,
    /// Short order reference for the prompt.
    pub reference: String,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub prompt: StatusPrompt,
}

impl PendingStatusChange {
    /// Drop the change without contacting the backend.
    pub fn cancel(self) {
        tracing::debug!(order_id = %self.order_id, to = %self.to, "Status change cancelled");
    }
}

/// Outcome of a confirmed status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChanged {
    pub order_id: OrderId,
    pub status: OrderStatus,
    /// Raised after verification when stock is running low.
    pub low_stock: Option<LowStockAlert>,
}

/// A product that is running low.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowStockItem {
    pub name: String,
    pub stock: i64,
}

/// Alert listing every product with `0 < stock < 10`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowStockAlert {
    pub items: Vec<LowStockItem>,
}

impl LowStockAlert {
    pub const TITLE: &'static str = "Stock Low!";
    pub const BUTTON: &'static str = "Got it";

    /// `None` when nothing is running low.
    #[must_use]
    pub fn from_products(products: &[Product]) -> Option<Self> {
        let items: Vec<LowStockItem> = products
            .iter()
            .filter(|p| p.is_low_stock())
            .map(|p| LowStockItem {
                name: p.name.clone(),
                stock: p.stock,
            })
            .collect();
        (!items.is_empty()).then_some(Self { items })
    }

    #[must_use]
    pub fn message(&self) -> String {
        let list = self
            .items
            .iter()
            .map(|item| format!("{} ({} left)", item.name, item.stock))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "The following items are running low: {list}. Refill them now to avoid service interruption."
        )
    }
}

/// Text shown when a status change fails.
#[must_use]
pub fn update_failed_message(err: &AppError) -> String {
    format!("Update failed: {}", err.user_message())
}

/// Validate a move of `order` to `to`.
///
/// # Errors
///
/// Returns `InvalidTransition` when the workflow does not allow the move.
pub fn plan_status_change(order: &Order, to: OrderStatus) -> Result<PendingStatusChange> {
    let from = order.status;
    if !from.can_transition_to(to) {
        return Err(AppError::InvalidTransition { from, to });
    }
    Ok(PendingStatusChange {
        order_id: order.id.clone(),
        reference: order.reference().to_string(),
        from,
        to,
        prompt: StatusPrompt::for_target(to),
    })
}

impl AdminConsole {
    /// Check a status change against the cached orders and build its prompt.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an order missing from the snapshot and
    /// `InvalidTransition` for a move the workflow does not allow.
    pub fn request_status_change(
        &self,
        id: &OrderId,
        to: OrderStatus,
    ) -> Result<PendingStatusChange> {
        let order = self
            .find_order(id)
            .ok_or_else(|| AppError::NotFound(format!("Order {id}")))?;
        plan_status_change(order, to)
    }

    /// Send a confirmed status change.
    ///
    /// On success the orders are re-fetched and, after a verification, stock
    /// is checked. Neither follow-up can fail an accepted change short of an
    /// expired session. On failure the cached snapshot is left as it was.
    ///
    /// # Errors
    ///
    /// Returns the backend's refusal, a transport error, or `SessionExpired`.
    #[instrument(skip(self, pending), fields(order_id = %pending.order_id, from = %pending.from, to = %pending.to))]
    pub async fn confirm(&mut self, pending: PendingStatusChange) -> Result<StatusChanged> {
        let result = self
            .client
            .update_order_status(self.session.token(), &pending.order_id, pending.to)
            .await;
        self.checked(result)?;
        tracing::info!("Order status updated");

        // The change is committed; a failed reload only leaves the snapshot stale.
        match self.refresh_orders().await {
            Ok(()) => {}
            Err(err) if err.needs_login() => return Err(err),
            Err(err) => tracing::warn!(error = %err, "Order reload failed after status update"),
        }

        let low_stock = if pending.to == OrderStatus::Verified {
            self.low_stock_or_none().await?
        } else {
            None
        };

        Ok(StatusChanged {
            order_id: pending.order_id,
            status: pending.to,
            low_stock,
        })
    }

    /// Fetch products and report those running low.
    ///
    /// # Errors
    ///
    /// Returns a transport error or `SessionExpired`.
    pub async fn check_low_stock(&self) -> Result<Option<LowStockAlert>> {
        let result = self.client.products(self.session.token()).await;
        let products = self.checked(result)?;
        let alert = LowStockAlert::from_products(&products);
        if let Some(alert) = &alert {
            tracing::warn!(items = alert.items.len(), "Stock running low");
        }
        Ok(alert)
    }

    /// Stock check whose failures, other than an expired session, are logged
    /// and read as "no alert".
    pub(crate) async fn low_stock_or_none(&self) -> Result<Option<LowStockAlert>> {
        match self.check_low_stock().await {
            Ok(alert) => Ok(alert),
            Err(err) if err.needs_login() => Err(err),
            Err(err) => {
                tracing::warn!(error = %err, "Stock check failed");
                Ok(None)
            }
        }
    }

    /// Invoice link for a delivered order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown order and `BadRequest` when the
    /// order has not been delivered.
    pub fn invoice_url(&self, id: &OrderId) -> Result<Url> {
        let order = self
            .find_order(id)
            .ok_or_else(|| AppError::NotFound(format!("Order {id}")))?;
        if order.status != OrderStatus::Delivered {
            return Err(AppError::BadRequest(
                "Invoices are only available for delivered orders".to_string(),
            ));
        }
        Ok(self.client.invoice_url(self.session.token(), id)?)
    }

    fn find_order(&self, id: &OrderId) -> Option<&Order> {
        self.orders().iter().find(|order| &order.id == id)
    }
}
