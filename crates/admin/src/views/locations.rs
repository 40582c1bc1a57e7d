//! Pickup points screen.

use chickyen_core::PickupLocation;

pub const DELETE_LOCATION_PROMPT: &str = "Remove this pickup point?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationCard {
    pub id: String,
    pub name: String,
    pub address: String,
    /// "Open in Maps" target; `None` when no link was saved.
    pub maps_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationsView {
    pub title: &'static str,
    pub description: &'static str,
    pub add_label: &'static str,
    pub cards: Vec<LocationCard>,
}

#[must_use]
pub fn render_locations(locations: &[PickupLocation]) -> LocationsView {
    LocationsView {
        title: "Pickup Points",
        description: "Manage customer collection centers.",
        add_label: "+ Add New Point",
        cards: locations
            .iter()
            .map(|loc| LocationCard {
                id: loc.id.to_string(),
                name: loc.name.clone(),
                address: loc.address.clone(),
                maps_link: Some(loc.google_maps_link.clone()).filter(|l| !l.trim().is_empty()),
            })
            .collect(),
    }
}
