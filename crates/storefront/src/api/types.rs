//! Request and response shapes for the backend REST API.
//!
//! Fields the backend may omit or send as `null` are defaulted so a
//! missing optional field never fails a whole page.

use std::num::NonZeroU32;

use chrono::NaiveDateTime;
use hiwhiw_core::{
    CartItemId, MenuItemId, MessageId, OrderId, OrderStatus, Price, RestaurantId, UserId,
};
use serde::{Deserialize, Serialize};

use crate::models::CurrentUser;

// =============================================================================
// Generic Responses
// =============================================================================

/// Plain acknowledgement returned by most mutations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}

/// Response to a create call that returns the new entity's ID.
#[derive(Debug, Clone, Deserialize)]
pub struct Created<Id> {
    pub id: Id,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: CurrentUser,
}

/// Result of an auth check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthStatus {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<CurrentUser>,
}

// =============================================================================
// Restaurants & Menu
// =============================================================================

/// A restaurant open for hitchhike orders.
#[derive(Debug, Clone, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    /// Owner (the person doing the pickup run).
    pub user_id: UserId,
    #[serde(default)]
    pub owner_name: String,
    pub name: String,
    #[serde(default)]
    pub open_time: String,
    #[serde(default)]
    pub close_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub pickup_time: String,
    #[serde(default)]
    pub pickup_location: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Only present in the listing.
    #[serde(default)]
    pub menu_count: Option<u32>,
}

/// Restaurant header embedded in menu and cart responses.
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantSummary {
    pub id: RestaurantId,
    pub name: String,
    #[serde(default)]
    pub pickup_time: String,
    #[serde(default)]
    pub pickup_location: String,
}

/// A restaurant's menu.
#[derive(Debug, Clone, Deserialize)]
pub struct Menu {
    pub restaurant: RestaurantSummary,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
}

/// One orderable dish.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Fields for opening a new restaurant.
#[derive(Debug, Clone, Serialize)]
pub struct NewRestaurant {
    pub name: String,
    pub open_time: String,
    pub close_time: String,
    pub location: String,
    pub pickup_time: String,
    pub pickup_location: String,
    pub image_url: String,
}

/// Fields for a new menu item.
#[derive(Debug, Clone, Serialize)]
pub struct NewMenuItem {
    pub name: String,
    pub price: Price,
    pub description: String,
    pub image_url: String,
}

// =============================================================================
// Cart
// =============================================================================

/// The viewer's cart, grouped by restaurant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub restaurants: Vec<CartGroup>,
    #[serde(default)]
    pub total: Price,
    #[serde(default)]
    pub item_count: u32,
}

/// Cart entries from one restaurant.
#[derive(Debug, Clone, Deserialize)]
pub struct CartGroup {
    pub restaurant: RestaurantSummary,
    #[serde(default)]
    pub items: Vec<CartEntry>,
    #[serde(default)]
    pub subtotal: Price,
}

/// One line in the cart.
#[derive(Debug, Clone, Deserialize)]
pub struct CartEntry {
    pub id: CartItemId,
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    #[serde(default)]
    pub note: Option<String>,
    pub total: Price,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddToCart<'a> {
    pub menu_item_id: MenuItemId,
    pub quantity: NonZeroU32,
    pub note: &'a str,
}

/// Partial update of a cart entry.
///
/// The quantity is non-zero by construction; dropping an entry to zero is
/// a removal, not an update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CartItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<NonZeroU32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// =============================================================================
// Orders
// =============================================================================

/// Response to placing an order: one order per restaurant in the cart.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPlaced {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub order_ids: Vec<OrderId>,
}

/// A placed order.
///
/// History, detail and restaurant listings share this shape; the
/// participant fields are only present on some of them.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub restaurant_name: String,
    pub total_price: Price,
    pub status: OrderStatus,
    #[serde(default)]
    pub pickup_time: Option<String>,
    #[serde(default)]
    pub pickup_location: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub restaurant_owner_id: Option<UserId>,
    #[serde(default)]
    pub customer_id: Option<UserId>,
    #[serde(default)]
    pub customer_name: Option<String>,
}

/// One line of a placed order, priced at order time.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    pub price: Price,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusUpdate {
    pub status: OrderStatus,
}

// =============================================================================
// Messages
// =============================================================================

/// A chat message, as seen by the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    #[serde(default)]
    pub sender_name: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    /// Whether the viewer wrote this message.
    #[serde(default)]
    pub is_mine: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewMessage<'a> {
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewRestaurantMessage<'a> {
    pub content: &'a str,
    pub receiver_id: Option<UserId>,
}

/// A customer's pre-order conversation, as listed for the restaurant owner.
#[derive(Debug, Clone, Deserialize)]
pub struct Conversation {
    pub user_id: UserId,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub last_message_at: Option<NaiveDateTime>,
}

// =============================================================================
// Users
// =============================================================================

/// The viewer's profile.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub restaurants: Vec<OwnedRestaurant>,
}

/// A restaurant owned by the viewer.
#[derive(Debug, Clone, Deserialize)]
pub struct OwnedRestaurant {
    pub id: RestaurantId,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileUpdate<'a> {
    pub display_name: &'a str,
}
