//! Plain-text drawing of the view models.

use std::io::{self, Write};

use chickyen_admin::LowStockAlert;
use chickyen_admin::views::{
    CustomersView, LocationsView, LogsView, OrdersBoardView, ProductsView, SalesView, StaffView,
};
use chickyen_storefront::CartUpdate;
use chickyen_storefront::cart::CartChange;
use chickyen_storefront::views::{CartPanelView, CatalogView, ProfileHeaderView};

// =============================================================================
// Storefront
// =============================================================================

pub fn catalog(out: &mut impl Write, view: &CatalogView) -> io::Result<()> {
    for card in &view.cards {
        write!(out, "{:<12} {:<28} {:>8}", card.id, card.name, card.price)?;
        if let Some(weight) = &card.weight {
            write!(out, "  {weight}")?;
        }
        write!(out, "  {}", "*".repeat(card.spice_count as usize))?;
        if let Some(badge) = card.stock_badge {
            write!(out, "  [{}]", badge.label())?;
        }
        writeln!(out, "  <{}>", card.button_label)?;
    }
    let soon = &view.coming_soon;
    writeln!(out, "-- {} ({}): {}", soon.title, soon.badge, soon.headline)
}

pub fn cart_panel(out: &mut impl Write, panel: &CartPanelView) -> io::Result<()> {
    if let Some(message) = panel.empty_message {
        return writeln!(out, "{message}");
    }
    for line in &panel.lines {
        writeln!(
            out,
            "{:<12} {:<28} x{:<3} {:>8}",
            line.id, line.name, line.quantity, line.line_total
        )?;
    }
    writeln!(out, "{} item(s)  Total {}", panel.count, panel.total_display)
}

pub fn cart_update(out: &mut impl Write, update: &CartUpdate) -> io::Result<()> {
    match update.change {
        CartChange::Quantity(quantity) => writeln!(out, "Quantity now {quantity}")?,
        CartChange::Removed => writeln!(out, "Removed from cart")?,
        CartChange::Unchanged => writeln!(out, "Nothing to change")?,
        CartChange::Cleared => writeln!(out, "Cart cleared")?,
    }
    cart_panel(out, &update.panel)
}

pub fn header(out: &mut impl Write, view: &ProfileHeaderView) -> io::Result<()> {
    match view {
        ProfileHeaderView::SignedOut => writeln!(out, "Not signed in. Run `chickyen shop login`."),
        ProfileHeaderView::SignedIn {
            initial,
            display_name,
            email,
        } => writeln!(out, "[{initial}] {display_name} <{email}>"),
    }
}

// =============================================================================
// Admin
// =============================================================================

pub fn orders_board(out: &mut impl Write, view: &OrdersBoardView) -> io::Result<()> {
    let stats = &view.stats;
    writeln!(out, "{}", view.title)?;
    writeln!(
        out,
        "Today {}  Pending {}  Completed {}  Total {}",
        stats.today_revenue, stats.pending, stats.completed, stats.total
    )?;
    if view.cards.is_empty() {
        return writeln!(out, "No orders found");
    }
    for card in &view.cards {
        writeln!(out)?;
        writeln!(
            out,
            "#{} {} [{}] {}  ({})",
            card.reference, card.customer_name, card.status, card.amount, card.id
        )?;
        writeln!(
            out,
            "  {} | {}",
            card.phone.as_deref().unwrap_or("No Phone"),
            card.email
        )?;
        for item in &card.items {
            writeln!(out, "  - {item}")?;
        }
        writeln!(out, "  Pickup: {}", card.pickup)?;
        let mut actions: Vec<String> = card
            .actions
            .iter()
            .map(|a| format!("{} -> {}", a.label, a.target))
            .collect();
        if card.can_call {
            actions.push("Call".to_string());
        }
        if card.has_invoice {
            actions.push("Invoice".to_string());
        }
        if !actions.is_empty() {
            writeln!(out, "  Actions: {}", actions.join(", "))?;
        }
    }
    Ok(())
}

pub fn low_stock(out: &mut impl Write, alert: &LowStockAlert) -> io::Result<()> {
    writeln!(out, "{}", LowStockAlert::TITLE)?;
    writeln!(out, "{}", alert.message())
}

pub fn products(out: &mut impl Write, view: &ProductsView) -> io::Result<()> {
    writeln!(out, "{} - {}", view.title, view.description)?;
    writeln!(out, "{}", view.heading)?;
    for card in &view.cards {
        let stock_flag = if card.stock_highlight { " !" } else { "" };
        writeln!(
            out,
            "{:<12} {:<28} {:>8}  {}  {}  Stock: {}{}",
            card.id,
            card.name,
            card.price,
            "*".repeat(card.spice_count as usize),
            card.weight,
            card.stock,
            stock_flag
        )?;
    }
    Ok(())
}

pub fn customers(out: &mut impl Write, view: &CustomersView) -> io::Result<()> {
    writeln!(out, "{} - {}", view.title, view.description)?;
    writeln!(out, "Filter: {}", view.filter.label())?;
    for card in &view.cards {
        writeln!(
            out,
            "[{}] {:<24} {:<28} {:<14} {:>10}  {}",
            card.initial,
            card.name,
            card.email,
            card.phone.as_deref().unwrap_or("-"),
            card.orders_label,
            card.lifetime_spend
        )?;
    }
    Ok(())
}

pub fn sales(out: &mut impl Write, view: &SalesView) -> io::Result<()> {
    for card in &view.cards {
        write!(out, "{}: {}", card.label, card.value)?;
        if let Some(detail) = &card.detail {
            write!(out, " ({detail})")?;
        }
        writeln!(out)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", view.product_table.headers().join(" | "))?;
    for row in &view.products {
        writeln!(
            out,
            "{} | {} | {} | {} | {}",
            row.name, row.unit_weight, row.total_quantity, row.total_mass, row.revenue
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", view.location_heading)?;
    for row in &view.locations {
        writeln!(out, "{} | {} | {}", row.name, row.orders_label, row.revenue)?;
    }
    Ok(())
}

pub fn locations(out: &mut impl Write, view: &LocationsView) -> io::Result<()> {
    writeln!(out, "{} - {}", view.title, view.description)?;
    for card in &view.cards {
        writeln!(out, "{:<12} {}  {}", card.id, card.name, card.address)?;
        if let Some(link) = &card.maps_link {
            writeln!(out, "  Open in Maps: {link}")?;
        }
    }
    Ok(())
}

pub fn staff(out: &mut impl Write, view: &StaffView) -> io::Result<()> {
    writeln!(out, "{} - {}", view.title, view.description)?;
    for card in &view.cards {
        write!(out, "{:<12} {:<20} {:<6} {}", card.id, card.name, card.role, card.email)?;
        if let Some(badge) = card.badge {
            write!(out, "  [{badge}]")?;
        }
        if card.editable {
            write!(out, "  (editable)")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn logs(out: &mut impl Write, view: &LogsView) -> io::Result<()> {
    writeln!(out, "{} - {}", view.title, view.description)?;
    writeln!(out, "{}", view.heading)?;
    for entry in &view.entries {
        writeln!(
            out,
            "{:<10} {}  {} . {}  [{}]",
            entry.kind.icon(),
            entry.description,
            entry.admin_name,
            entry.timestamp,
            entry.action_type
        )?;
    }
    Ok(())
}
