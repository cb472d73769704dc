//! Cart page and cart mutations.
//!
//! Every mutation redirects back to `/cart`, so the page always shows the
//! backend's view of the cart rather than a locally patched copy.

use std::num::NonZeroU32;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use hiwhiw_core::CartItemId;
use serde::Deserialize;
use tracing::instrument;

use crate::api::{Cart, CartEntry, CartGroup, CartItemUpdate};
use crate::error::add_breadcrumb;
use crate::middleware::RequireSession;
use crate::state::AppState;
use crate::views::{Nav, Notice, NoticeQuery, Tab, redirect_with_error, redirect_with_success};

const CART_PATH: &str = "/cart";

/// Shown when an order is placed from an empty cart.
pub const EMPTY_CART: &str = "Your cart is empty";

/// Shown on the history page after a successful order.
pub const ORDER_PLACED: &str = "Order placed! See the details in your order history.";

// =============================================================================
// Form Types
// =============================================================================

/// Quantity change for one entry. Zero or less removes the entry.
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    pub cart_item_id: CartItemId,
    pub quantity: i64,
}

/// Removal of one entry.
#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    pub cart_item_id: CartItemId,
}

/// Place-order form. Carries the item count of the cart the user saw.
#[derive(Debug, Deserialize)]
pub struct OrderForm {
    #[serde(default)]
    pub item_count: u32,
}

// =============================================================================
// Views
// =============================================================================

/// One cart line.
#[derive(Debug, Clone)]
pub struct CartEntryView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub note: Option<String>,
    pub total: String,
    /// Quantity submitted by the minus button (zero removes).
    pub decrement: i64,
    /// Quantity submitted by the plus button.
    pub increment: i64,
}

impl From<CartEntry> for CartEntryView {
    fn from(entry: CartEntry) -> Self {
        let quantity = i64::from(entry.quantity);
        Self {
            id: entry.id.to_string(),
            price: entry.price.display(),
            total: entry.total.display(),
            quantity: entry.quantity,
            note: entry.note.filter(|n| !n.trim().is_empty()),
            name: entry.name,
            decrement: quantity - 1,
            increment: quantity + 1,
        }
    }
}

/// Cart lines from one restaurant.
#[derive(Debug, Clone)]
pub struct CartGroupView {
    pub restaurant_name: String,
    pub pickup_time: String,
    pub pickup_location: String,
    pub entries: Vec<CartEntryView>,
    pub subtotal: String,
}

impl From<CartGroup> for CartGroupView {
    fn from(group: CartGroup) -> Self {
        Self {
            restaurant_name: group.restaurant.name,
            pickup_time: group.restaurant.pickup_time,
            pickup_location: group.restaurant.pickup_location,
            entries: group.items.into_iter().map(CartEntryView::from).collect(),
            subtotal: group.subtotal.display(),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub nav: Nav,
    pub notice: Notice,
    pub groups: Vec<CartGroupView>,
    pub total: String,
    pub item_count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Query(notice): Query<NoticeQuery>,
) -> CartTemplate {
    let cart = state.api().cart(user.id).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to fetch cart");
        Cart::default()
    });

    CartTemplate {
        nav: Nav::new(&user, Tab::Cart),
        notice: notice.into(),
        total: cart.total.display(),
        item_count: cart.item_count,
        groups: cart.restaurants.into_iter().map(CartGroupView::from).collect(),
    }
}

/// Change an entry's quantity. A quantity of zero or less removes it.
#[instrument(skip_all, fields(user_id = %user.id, cart_item_id = %form.cart_item_id))]
pub async fn update(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Form(form): Form<UpdateForm>,
) -> Redirect {
    let result = match positive_quantity(form.quantity) {
        Some(quantity) => {
            let update = CartItemUpdate {
                quantity: Some(quantity),
                note: None,
            };
            state
                .api()
                .update_cart_item(user.id, form.cart_item_id, &update)
                .await
        }
        None => state.api().remove_cart_item(user.id, form.cart_item_id).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to update cart");
    }
    Redirect::to(CART_PATH)
}

/// Remove an entry.
#[instrument(skip_all, fields(user_id = %user.id, cart_item_id = %form.cart_item_id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Form(form): Form<RemoveForm>,
) -> Redirect {
    if let Err(e) = state.api().remove_cart_item(user.id, form.cart_item_id).await {
        tracing::error!(error = %e, "Failed to remove cart item");
    }
    Redirect::to(CART_PATH)
}

/// Empty the cart.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn clear(State(state): State<AppState>, RequireSession(user): RequireSession) -> Redirect {
    if let Err(e) = state.api().clear_cart(user.id).await {
        tracing::error!(error = %e, "Failed to clear cart");
    }
    Redirect::to(CART_PATH)
}

/// Place an order for everything in the cart.
///
/// An empty cart is refused here, without asking the backend.
#[instrument(skip_all, fields(user_id = %user.id, item_count = form.item_count))]
pub async fn place_order(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Form(form): Form<OrderForm>,
) -> Redirect {
    if form.item_count == 0 {
        return redirect_with_error(CART_PATH, EMPTY_CART);
    }

    match state.api().create_order(user.id).await {
        Ok(placed) => {
            tracing::info!(order_ids = ?placed.order_ids, "Order placed");
            add_breadcrumb("order", "Placed order", None);
            redirect_with_success("/history", ORDER_PLACED)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to place order");
            redirect_with_error(
                CART_PATH,
                &format!("Could not place order: {}", e.user_message()),
            )
        }
    }
}

/// A strictly positive quantity, or `None` when the entry should go.
fn positive_quantity(quantity: i64) -> Option<NonZeroU32> {
    u32::try_from(quantity).ok().and_then(NonZeroU32::new)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_positive_quantity() {
        assert_eq!(positive_quantity(2).map(NonZeroU32::get), Some(2));
        assert_eq!(positive_quantity(0), None);
        assert_eq!(positive_quantity(-1), None);
    }

    #[test]
    fn test_entry_view_buttons() {
        let entry: CartEntry = serde_json::from_value(json!({
            "id": 4, "menu_item_id": 10, "name": "Green curry",
            "price": 45, "quantity": 1, "note": "", "total": 45
        }))
        .unwrap();

        let view = CartEntryView::from(entry);
        assert_eq!(view.decrement, 0);
        assert_eq!(view.increment, 2);
        assert!(view.note.is_none());
        assert_eq!(view.total, "฿45");
    }
}
