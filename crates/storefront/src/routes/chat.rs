//! Order chat and pre-order chat.
//!
//! A chat page renders the current message list, then keeps it fresh over
//! a Server-Sent Events stream fed by the chat poller. Each event carries
//! the whole re-rendered list, which the page swaps in.

use std::convert::Infallible;
use std::time::Duration;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{
        Redirect, Sse,
        sse::{Event, KeepAlive},
    },
};
use futures::{Stream, StreamExt};
use hiwhiw_core::{OrderId, RestaurantId, UserId};
use serde::Deserialize;
use tracing::instrument;

use crate::api::Message;
use crate::middleware::RequireSession;
use crate::services::{ChatChannel, ChatFeed, dedup_snapshots, poll_messages};
use crate::state::AppState;
use crate::views::{
    Nav, Notice, NoticeQuery, Tab, clock_time, lenient, redirect_with_error, with_param,
};

/// SSE event name carrying a re-rendered message list.
pub const MESSAGES_EVENT: &str = "messages";

const SEND_FAILED: &str = "Could not send message";

// =============================================================================
// Form & Query Types
// =============================================================================

/// Message form data.
#[derive(Debug, Deserialize)]
pub struct SendForm {
    #[serde(default)]
    pub content: String,
    /// Customer an owner is answering in a pre-order chat.
    #[serde(default, deserialize_with = "lenient")]
    pub receiver_id: Option<UserId>,
}

/// Query parameters for the pre-order chat.
#[derive(Debug, Default, Deserialize)]
pub struct DeliveryChatQuery {
    /// Customer the restaurant owner is talking to.
    #[serde(default, deserialize_with = "lenient")]
    pub with: Option<UserId>,
}

// =============================================================================
// Views
// =============================================================================

/// One chat bubble.
#[derive(Debug, Clone)]
pub struct MessageView {
    pub sender_name: String,
    pub content: String,
    pub time: String,
    pub is_mine: bool,
}

impl From<Message> for MessageView {
    fn from(message: Message) -> Self {
        Self {
            time: clock_time(message.created_at),
            sender_name: message.sender_name,
            content: message.content,
            is_mine: message.is_mine,
        }
    }
}

fn message_views(messages: Vec<Message>) -> Vec<MessageView> {
    messages.into_iter().map(MessageView::from).collect()
}

/// Chat page template, shared by both kinds of chat.
#[derive(Template, WebTemplate)]
#[template(path = "chat.html")]
pub struct ChatTemplate {
    pub nav: Nav,
    pub notice: Notice,
    pub title: String,
    pub subtitle: String,
    pub back_href: String,
    pub post_action: String,
    pub stream_url: String,
    pub receiver_id: Option<String>,
    pub messages: Vec<MessageView>,
}

/// The message list on its own, as pushed over the event stream.
#[derive(Template)]
#[template(path = "partials/messages.html")]
pub struct MessagesPartial {
    pub messages: Vec<MessageView>,
}

// =============================================================================
// Order Chat
// =============================================================================

/// Display the chat for an order.
#[instrument(skip_all, fields(user_id = %user.id, order_id = %order_id))]
pub async fn order_chat(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Path(order_id): Path<OrderId>,
    Query(notice): Query<NoticeQuery>,
) -> ChatTemplate {
    let api = state.api();
    let (order, messages) = tokio::join!(
        api.order(user.id, order_id),
        api.order_messages(user.id, order_id)
    );

    let (title, subtitle) = match order {
        Ok(order) => (
            order.restaurant_name,
            format!("Order #{} · {}", order.id, order.status.label()),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch order for chat");
            (format!("Order #{order_id}"), String::new())
        }
    };
    let messages = messages.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to fetch order messages");
        Vec::new()
    });

    let path = format!("/chat/{order_id}");
    ChatTemplate {
        nav: Nav::new(&user, Tab::None),
        notice: notice.into(),
        title,
        subtitle,
        back_href: "/history".to_string(),
        stream_url: format!("{path}/stream"),
        post_action: path,
        receiver_id: None,
        messages: message_views(messages),
    }
}

/// Send a message about an order.
#[instrument(skip_all, fields(user_id = %user.id, order_id = %order_id))]
pub async fn send_order_message(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Path(order_id): Path<OrderId>,
    Form(form): Form<SendForm>,
) -> Redirect {
    let path = format!("/chat/{order_id}");
    let content = form.content.trim();
    if content.is_empty() {
        return Redirect::to(&path);
    }

    match state
        .api()
        .send_order_message(user.id, order_id, content)
        .await
    {
        Ok(_) => Redirect::to(&path),
        Err(e) => {
            tracing::error!(error = %e, "Failed to send order message");
            redirect_with_error(&path, SEND_FAILED)
        }
    }
}

/// Live message list for an order chat.
pub async fn order_stream(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Path(order_id): Path<OrderId>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let feed = ChatFeed::new(state.api().clone(), user.id, ChatChannel::Order(order_id));
    message_events(feed, state.chat_poll_interval())
}

// =============================================================================
// Pre-order Chat
// =============================================================================

/// Display the pre-order chat with a restaurant.
#[instrument(skip_all, fields(user_id = %user.id, restaurant_id = %restaurant_id))]
pub async fn delivery_chat(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Path(restaurant_id): Path<RestaurantId>,
    Query(query): Query<DeliveryChatQuery>,
    Query(notice): Query<NoticeQuery>,
) -> ChatTemplate {
    let api = state.api();
    let (restaurant, messages) = tokio::join!(
        api.restaurant(user.id, restaurant_id),
        api.restaurant_chat(user.id, restaurant_id)
    );

    let (title, subtitle, back_href) = match restaurant {
        Ok(r) => {
            let back = if r.user_id == user.id {
                format!("/my-restaurant/{restaurant_id}?tab=chats")
            } else {
                format!("/restaurant/{restaurant_id}")
            };
            (
                r.name,
                format!("Pickup {} at {}", r.pickup_time, r.pickup_location),
                back,
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch restaurant for chat");
            (
                "Chat".to_string(),
                String::new(),
                format!("/restaurant/{restaurant_id}"),
            )
        }
    };
    let messages = messages.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to fetch restaurant chat");
        Vec::new()
    });

    let path = format!("/chat-delivery/{restaurant_id}");
    ChatTemplate {
        nav: Nav::new(&user, Tab::None),
        notice: notice.into(),
        title,
        subtitle,
        back_href,
        stream_url: format!("{path}/stream"),
        post_action: path,
        receiver_id: query.with.map(|id| id.to_string()),
        messages: message_views(messages),
    }
}

/// Send a pre-order chat message.
#[instrument(skip_all, fields(user_id = %user.id, restaurant_id = %restaurant_id))]
pub async fn send_delivery_message(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Path(restaurant_id): Path<RestaurantId>,
    Form(form): Form<SendForm>,
) -> Redirect {
    let mut path = format!("/chat-delivery/{restaurant_id}");
    if let Some(receiver) = form.receiver_id {
        path = with_param(&path, "with", &receiver.to_string());
    }

    let content = form.content.trim();
    if content.is_empty() {
        return Redirect::to(&path);
    }

    match state
        .api()
        .send_restaurant_chat(user.id, restaurant_id, content, form.receiver_id)
        .await
    {
        Ok(_) => Redirect::to(&path),
        Err(e) => {
            tracing::error!(error = %e, "Failed to send pre-order message");
            redirect_with_error(&path, SEND_FAILED)
        }
    }
}

/// Live message list for a pre-order chat.
pub async fn delivery_stream(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Path(restaurant_id): Path<RestaurantId>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let feed = ChatFeed::new(
        state.api().clone(),
        user.id,
        ChatChannel::Restaurant(restaurant_id),
    );
    message_events(feed, state.chat_poll_interval())
}

// =============================================================================
// Event Stream
// =============================================================================

/// Poll `feed` and push each changed snapshot as a rendered message list.
///
/// The stream lives as long as the browser keeps the connection open;
/// closing the page drops it and stops the poll.
fn message_events(
    feed: ChatFeed,
    interval: Duration,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let snapshots = dedup_snapshots(poll_messages(feed, interval));

    let events = snapshots.filter_map(|messages| async move {
        let partial = MessagesPartial {
            messages: message_views(messages),
        };
        match partial.render() {
            Ok(html) => Some(Ok(Event::default().event(MESSAGES_EVENT).data(html))),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render message list");
                None
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
