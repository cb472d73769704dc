//! Order history and order detail.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use hiwhiw_core::{OrderId, OrderStatus};
use tracing::instrument;

use crate::api::{Order, OrderLine};
use crate::error::{AppError, Result};
use crate::middleware::RequireSession;
use crate::state::AppState;
use crate::views::{Nav, Notice, NoticeQuery, Tab, short_date};

/// Items shown on a history card before collapsing into "+N more".
const PREVIEW_ITEMS: usize = 3;

/// One line of an order.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub name: String,
    pub quantity: u32,
    pub line_total: String,
    pub note: Option<String>,
}

impl From<OrderLine> for OrderLineView {
    fn from(line: OrderLine) -> Self {
        Self {
            line_total: line.price.times(line.quantity).display(),
            quantity: line.quantity,
            note: line.note.filter(|n| !n.trim().is_empty()),
            name: line.name,
        }
    }
}

/// An order as shown on cards and the detail page.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub restaurant_name: String,
    pub status_label: &'static str,
    /// CSS class for the status badge.
    pub status_class: String,
    pub placed_at: String,
    pub total: String,
    pub pickup_time: String,
    pub pickup_location: String,
    pub customer_name: Option<String>,
    pub lines: Vec<OrderLineView>,
    /// Lines left out of `lines` on a collapsed card.
    pub more_count: usize,
}

impl OrderView {
    /// Full view with every line.
    #[must_use]
    pub fn full(order: Order) -> Self {
        Self::build(order, usize::MAX)
    }

    /// Card view showing the first few lines.
    #[must_use]
    pub fn card(order: Order) -> Self {
        Self::build(order, PREVIEW_ITEMS)
    }

    fn build(order: Order, max_lines: usize) -> Self {
        let more_count = order.items.len().saturating_sub(max_lines);
        Self {
            id: order.id.to_string(),
            status_label: order.status.label(),
            status_class: status_class(order.status),
            placed_at: short_date(order.created_at),
            total: order.total_price.display(),
            pickup_time: order.pickup_time.unwrap_or_default(),
            pickup_location: order.pickup_location.unwrap_or_default(),
            customer_name: order.customer_name,
            restaurant_name: order.restaurant_name,
            lines: order
                .items
                .into_iter()
                .take(max_lines)
                .map(OrderLineView::from)
                .collect(),
            more_count,
        }
    }
}

/// CSS class for a status badge.
#[must_use]
pub fn status_class(status: OrderStatus) -> String {
    format!("status status-{status}")
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "history.html")]
pub struct HistoryTemplate {
    pub nav: Nav,
    pub notice: Notice,
    pub orders: Vec<OrderView>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "order.html")]
pub struct OrderTemplate {
    pub nav: Nav,
    pub order_id: String,
    pub order: Option<OrderView>,
}

/// Display the user's order history, newest first.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn history(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Query(notice): Query<NoticeQuery>,
) -> HistoryTemplate {
    let mut orders = state.api().order_history(user.id).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to fetch order history");
        Vec::new()
    });
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    HistoryTemplate {
        nav: Nav::new(&user, Tab::History),
        notice: notice.into(),
        orders: orders.into_iter().map(OrderView::card).collect(),
    }
}

/// Display one order.
///
/// An order the backend does not know, or will not show this user, is a
/// real 404/403; any other failure renders the page without the order.
#[instrument(skip_all, fields(user_id = %user.id, order_id = %order_id))]
pub async fn show(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Path(order_id): Path<OrderId>,
) -> Result<OrderTemplate> {
    let order = match state.api().order(user.id, order_id).await {
        Ok(order) => Some(OrderView::full(order)),
        Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => {
            return Err(AppError::NotFound(format!("order {order_id}")));
        }
        Err(e) if e.status() == Some(StatusCode::FORBIDDEN) => return Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch order");
            None
        }
    };

    Ok(OrderTemplate {
        nav: Nav::new(&user, Tab::History),
        order_id: order_id.to_string(),
        order,
    })
}
