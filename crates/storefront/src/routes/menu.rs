//! Restaurant menu and add-to-cart.

use std::num::NonZeroU32;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use hiwhiw_core::{MenuItemId, RestaurantId};
use serde::Deserialize;
use tracing::instrument;

use crate::api::{Menu, MenuItem};
use crate::error::add_breadcrumb;
use crate::middleware::RequireSession;
use crate::state::AppState;
use crate::views::{Nav, Notice, NoticeQuery, Tab, lenient, redirect_with_error};

/// Query parameters for the menu page.
#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    /// Item just added to the cart; shows a transient "Added" flag.
    #[serde(default, deserialize_with = "lenient")]
    pub added: Option<MenuItemId>,
}

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub menu_item_id: MenuItemId,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub note: String,
}

/// Restaurant header above the menu.
#[derive(Debug, Clone)]
pub struct MenuHeader {
    pub name: String,
    pub pickup_time: String,
    pub pickup_location: String,
}

/// One dish on the menu page.
#[derive(Debug, Clone)]
pub struct MenuItemView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub added: bool,
}

impl MenuItemView {
    fn new(item: MenuItem, added: Option<MenuItemId>) -> Self {
        Self {
            added: added == Some(item.id),
            id: item.id.to_string(),
            price: item.price.display(),
            name: item.name,
            description: item.description.filter(|d| !d.trim().is_empty()),
            image_url: item.image_url.filter(|u| !u.trim().is_empty()),
        }
    }
}

/// Menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu.html")]
pub struct MenuTemplate {
    pub nav: Nav,
    pub notice: Notice,
    pub restaurant_id: String,
    pub restaurant: Option<MenuHeader>,
    pub items: Vec<MenuItemView>,
}

/// Display a restaurant's menu.
#[instrument(skip_all, fields(user_id = %user.id, restaurant_id = %restaurant_id))]
pub async fn show(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Path(restaurant_id): Path<RestaurantId>,
    Query(query): Query<MenuQuery>,
    Query(notice): Query<NoticeQuery>,
) -> MenuTemplate {
    let menu = match state.api().menu(user.id, restaurant_id).await {
        Ok(menu) => Some(menu),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch menu");
            None
        }
    };

    let (restaurant, items) = match menu {
        Some(Menu { restaurant, menu }) => (
            Some(MenuHeader {
                name: restaurant.name,
                pickup_time: restaurant.pickup_time,
                pickup_location: restaurant.pickup_location,
            }),
            menu.into_iter()
                .map(|item| MenuItemView::new(item, query.added))
                .collect(),
        ),
        None => (None, Vec::new()),
    };

    MenuTemplate {
        nav: Nav::new(&user, Tab::None),
        notice: notice.into(),
        restaurant_id: restaurant_id.to_string(),
        restaurant,
        items,
    }
}

/// Add a menu item to the cart, then return to the menu.
#[instrument(skip_all, fields(user_id = %user.id, restaurant_id = %restaurant_id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Path(restaurant_id): Path<RestaurantId>,
    Form(form): Form<AddToCartForm>,
) -> Redirect {
    let menu_path = format!("/restaurant/{restaurant_id}");
    let quantity = clamp_quantity(&form.quantity);

    match state
        .api()
        .add_to_cart(user.id, form.menu_item_id, quantity, form.note.trim())
        .await
    {
        Ok(_) => {
            add_breadcrumb(
                "cart",
                "Added item",
                Some(&[("menu_item_id", &form.menu_item_id.to_string())]),
            );
            Redirect::to(&format!("{menu_path}?added={}", form.menu_item_id))
        }
        Err(e) => {
            tracing::error!(error = %e, menu_item_id = %form.menu_item_id, "Failed to add to cart");
            redirect_with_error(&menu_path, "Could not add to cart")
        }
    }
}

/// Parse a submitted quantity, never going below one.
fn clamp_quantity(raw: &str) -> NonZeroU32 {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|q| u32::try_from(q).ok())
        .and_then(NonZeroU32::new)
        .unwrap_or(NonZeroU32::MIN)
}
