//! Opening a restaurant and running it.
//!
//! The management page has three tabs: incoming orders (with status
//! actions), the menu (with an add-item form) and pre-order chats.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use hiwhiw_core::{OrderId, OrderStatus, Price, RestaurantId, StatusFilter};
use serde::Deserialize;
use tracing::instrument;

use crate::api::{Conversation, MenuItem, NewMenuItem, NewRestaurant, Order};
use crate::error::add_breadcrumb;
use crate::middleware::RequireSession;
use crate::routes::orders::OrderView;
use crate::state::AppState;
use crate::views::{
    Nav, Notice, NoticeQuery, Tab, lenient, redirect_with_error, redirect_with_success,
    short_date,
};

/// Shown when a required restaurant field is blank.
pub const MISSING_FIELDS: &str = "Please fill in all required fields";

/// Shown when a menu item has no name or no usable price.
pub const INVALID_MENU_ITEM: &str = "Please enter a menu name and a price above zero";

// =============================================================================
// Create Restaurant
// =============================================================================

/// New restaurant form data. Everything but the image URL is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateRestaurantForm {
    pub name: String,
    pub open_time: String,
    pub close_time: String,
    pub location: String,
    pub pickup_time: String,
    pub pickup_location: String,
    pub image_url: String,
}

impl CreateRestaurantForm {
    /// Trimmed fields, or `None` if a required one is blank.
    fn validate(&self) -> Option<NewRestaurant> {
        let required = [
            &self.name,
            &self.open_time,
            &self.close_time,
            &self.location,
            &self.pickup_time,
            &self.pickup_location,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return None;
        }

        Some(NewRestaurant {
            name: self.name.trim().to_string(),
            open_time: self.open_time.trim().to_string(),
            close_time: self.close_time.trim().to_string(),
            location: self.location.trim().to_string(),
            pickup_time: self.pickup_time.trim().to_string(),
            pickup_location: self.pickup_location.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
        })
    }
}

/// Create restaurant page template.
#[derive(Template, WebTemplate)]
#[template(path = "restaurants/create.html")]
pub struct CreateRestaurantTemplate {
    pub nav: Nav,
    pub notice: Notice,
    pub form: CreateRestaurantForm,
}

/// Display the create restaurant form.
pub async fn create_page(RequireSession(user): RequireSession) -> CreateRestaurantTemplate {
    CreateRestaurantTemplate {
        nav: Nav::new(&user, Tab::Profile),
        notice: Notice::default(),
        form: CreateRestaurantForm::default(),
    }
}

/// Handle create restaurant form submission.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Form(form): Form<CreateRestaurantForm>,
) -> Response {
    let rerender = |form: CreateRestaurantForm, message: String| CreateRestaurantTemplate {
        nav: Nav::new(&user, Tab::Profile),
        notice: Notice::error(message),
        form,
    };

    let Some(restaurant) = form.validate() else {
        return rerender(form, MISSING_FIELDS.to_string()).into_response();
    };

    match state.api().create_restaurant(user.id, &restaurant).await {
        Ok(created) => {
            tracing::info!(restaurant_id = %created.id, "Restaurant created");
            add_breadcrumb("restaurant", "Opened restaurant", None);
            redirect_with_success("/profile", "Your restaurant is open for orders!").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create restaurant");
            rerender(
                form,
                format!("Could not open restaurant: {}", e.user_message()),
            )
            .into_response()
        }
    }
}

// =============================================================================
// Manage Restaurant
// =============================================================================

/// Management page tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManageTab {
    #[default]
    Orders,
    Menu,
    Chats,
}

/// Query parameters for the management page.
#[derive(Debug, Default, Deserialize)]
pub struct ManageQuery {
    #[serde(default, deserialize_with = "lenient")]
    pub tab: Option<ManageTab>,
    #[serde(default, deserialize_with = "lenient")]
    pub filter: Option<StatusFilter>,
}

/// New menu item form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MenuItemForm {
    pub name: String,
    pub price: String,
    pub description: String,
    pub image_url: String,
}

impl MenuItemForm {
    fn validate(&self) -> Option<NewMenuItem> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        let price: Price = self.price.parse().ok()?;

        Some(NewMenuItem {
            name: name.to_string(),
            price,
            description: self.description.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
        })
    }
}

/// Order status change form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: OrderStatus,
    /// Filter to return to.
    #[serde(default, deserialize_with = "lenient")]
    pub filter: Option<StatusFilter>,
}

/// A status button on an order card.
#[derive(Debug, Clone)]
pub struct StatusAction {
    pub status: &'static str,
    pub label: &'static str,
    pub class: &'static str,
}

impl StatusAction {
    const fn for_status(status: OrderStatus) -> Self {
        let (label, class) = match status {
            OrderStatus::Confirmed => ("Confirm", "btn btn-primary"),
            OrderStatus::Cancelled => ("Cancel", "btn btn-danger"),
            OrderStatus::Completed => ("Mark completed", "btn btn-success"),
            OrderStatus::Pending => ("Reopen", "btn"),
        };
        Self {
            status: status.as_str(),
            label,
            class,
        }
    }
}

/// An incoming order with the actions the owner can take on it.
#[derive(Debug, Clone)]
pub struct ManagedOrder {
    pub order: OrderView,
    pub actions: Vec<StatusAction>,
}

impl From<Order> for ManagedOrder {
    fn from(order: Order) -> Self {
        let actions = order
            .status
            .next_actions()
            .iter()
            .copied()
            .map(StatusAction::for_status)
            .collect();
        Self {
            order: OrderView::full(order),
            actions,
        }
    }
}

/// One status filter link.
#[derive(Debug, Clone)]
pub struct FilterLink {
    pub href: String,
    pub label: &'static str,
    pub class: &'static str,
}

/// One menu item row.
#[derive(Debug, Clone)]
pub struct MenuRow {
    pub name: String,
    pub price: String,
    pub description: Option<String>,
}

impl From<MenuItem> for MenuRow {
    fn from(item: MenuItem) -> Self {
        Self {
            price: item.price.display(),
            name: item.name,
            description: item.description.filter(|d| !d.trim().is_empty()),
        }
    }
}

/// One pre-order conversation row.
#[derive(Debug, Clone)]
pub struct ConversationRow {
    pub href: String,
    pub user_name: String,
    pub last_message: Option<String>,
    pub when: Option<String>,
}

impl ConversationRow {
    fn new(restaurant_id: RestaurantId, c: Conversation) -> Self {
        Self {
            href: format!("/chat-delivery/{restaurant_id}?with={}", c.user_id),
            user_name: c.user_name,
            last_message: c.last_message.filter(|m| !m.trim().is_empty()),
            when: c.last_message_at.map(short_date),
        }
    }
}

/// Restaurant management page template.
#[derive(Template, WebTemplate)]
#[template(path = "restaurants/manage.html")]
pub struct ManageTemplate {
    pub nav: Nav,
    pub notice: Notice,
    pub base_path: String,
    pub name: String,
    pub pickup: String,
    pub tab: &'static str,
    pub filter: &'static str,
    pub pending_count: usize,
    pub filters: Vec<FilterLink>,
    pub orders: Vec<ManagedOrder>,
    pub menu: Vec<MenuRow>,
    pub conversations: Vec<ConversationRow>,
}

impl ManageTab {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Menu => "menu",
            Self::Chats => "chats",
        }
    }
}

impl std::str::FromStr for ManageTab {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orders" => Ok(Self::Orders),
            "menu" => Ok(Self::Menu),
            "chats" => Ok(Self::Chats),
            _ => Err(()),
        }
    }
}

fn manage_path(restaurant_id: RestaurantId, tab: ManageTab, filter: StatusFilter) -> String {
    let base = format!("/my-restaurant/{restaurant_id}?tab={}", tab.as_str());
    if tab == ManageTab::Orders && filter != StatusFilter::All {
        format!("{base}&filter={}", filter.as_str())
    } else {
        base
    }
}

/// Display the management page.
#[instrument(skip_all, fields(user_id = %user.id, restaurant_id = %restaurant_id))]
pub async fn manage(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Path(restaurant_id): Path<RestaurantId>,
    Query(query): Query<ManageQuery>,
    Query(notice): Query<NoticeQuery>,
) -> ManageTemplate {
    let tab = query.tab.unwrap_or_default();
    let filter = query.filter.unwrap_or_default();
    let api = state.api();

    let conversations = async {
        if tab == ManageTab::Chats {
            api.restaurant_conversations(user.id, restaurant_id)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Failed to fetch conversations");
                    Vec::new()
                })
        } else {
            Vec::new()
        }
    };
    let (restaurant, orders, menu, conversations) = tokio::join!(
        api.restaurant(user.id, restaurant_id),
        api.restaurant_orders(user.id, restaurant_id),
        api.menu(user.id, restaurant_id),
        conversations,
    );

    let (name, pickup) = match restaurant {
        Ok(r) => (
            r.name,
            format!("Pickup {} at {}", r.pickup_time, r.pickup_location),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch restaurant");
            ("My restaurant".to_string(), String::new())
        }
    };
    let orders = orders.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to fetch restaurant orders");
        Vec::new()
    });
    let menu = menu.map(|m| m.menu).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to fetch menu");
        Vec::new()
    });

    let pending_count = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Pending)
        .count();

    let filters = StatusFilter::ALL
        .iter()
        .map(|f| FilterLink {
            href: manage_path(restaurant_id, ManageTab::Orders, *f),
            label: f.label(),
            class: if *f == filter { "chip active" } else { "chip" },
        })
        .collect();

    ManageTemplate {
        nav: Nav::new(&user, Tab::None),
        notice: notice.into(),
        base_path: format!("/my-restaurant/{restaurant_id}"),
        name,
        pickup,
        tab: tab.as_str(),
        filter: filter.as_str(),
        pending_count,
        filters,
        orders: orders
            .into_iter()
            .filter(|o| filter.matches(o.status))
            .map(ManagedOrder::from)
            .collect(),
        menu: menu.into_iter().map(MenuRow::from).collect(),
        conversations: conversations
            .into_iter()
            .map(|c| ConversationRow::new(restaurant_id, c))
            .collect(),
    }
}

/// Add an item to the menu.
#[instrument(skip_all, fields(user_id = %user.id, restaurant_id = %restaurant_id))]
pub async fn add_menu_item(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Path(restaurant_id): Path<RestaurantId>,
    Form(form): Form<MenuItemForm>,
) -> Redirect {
    let path = manage_path(restaurant_id, ManageTab::Menu, StatusFilter::All);

    let Some(item) = form.validate() else {
        return redirect_with_error(&path, INVALID_MENU_ITEM);
    };

    match state.api().add_menu_item(user.id, restaurant_id, &item).await {
        Ok(_) => redirect_with_success(&path, "Menu item added"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to add menu item");
            redirect_with_error(&path, "Could not add menu item")
        }
    }
}

/// Move an incoming order to a new status.
#[instrument(skip_all, fields(user_id = %user.id, restaurant_id = %restaurant_id, order_id = %order_id))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Path((restaurant_id, order_id)): Path<(RestaurantId, OrderId)>,
    Form(form): Form<StatusForm>,
) -> Redirect {
    let path = manage_path(
        restaurant_id,
        ManageTab::Orders,
        form.filter.unwrap_or_default(),
    );

    match state
        .api()
        .update_order_status(user.id, order_id, form.status)
        .await
    {
        Ok(_) => {
            tracing::info!(status = %form.status, "Order status updated");
            Redirect::to(&path)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to update order status");
            redirect_with_error(&path, "Could not update order status")
        }
    }
}
