//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Login page (logged-in users go on to /home)
//! GET  /health                 - Health check
//! GET  /static/*               - Stylesheet and chat script
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! POST /logout                 - Logout action
//!
//! # Browsing (requires session)
//! GET  /home                   - Restaurant listing (?q= search)
//! GET  /restaurant/{id}        - Menu (?added= flags the item just added)
//! POST /restaurant/{id}/cart   - Add to cart
//!
//! # Cart (requires session)
//! GET  /cart                   - Cart page
//! POST /cart/update            - Change quantity (zero or less removes)
//! POST /cart/remove            - Remove entry
//! POST /cart/clear             - Empty the cart
//! POST /cart/order             - Place order
//!
//! # Orders (requires session)
//! GET  /history                - Order history
//! GET  /order/{id}             - Order detail
//!
//! # Chat (requires session)
//! GET  /chat/{order_id}                 - Order chat
//! POST /chat/{order_id}                 - Send order message
//! GET  /chat/{order_id}/stream          - Live message list (SSE)
//! GET  /chat-delivery/{restaurant_id}   - Pre-order chat (?with= customer)
//! POST /chat-delivery/{restaurant_id}   - Send pre-order message
//! GET  /chat-delivery/{restaurant_id}/stream - Live message list (SSE)
//!
//! # Profile & restaurants (requires session)
//! GET  /profile                - Profile
//! POST /profile                - Update display name
//! GET  /create-restaurant      - New restaurant form
//! POST /create-restaurant      - Open a restaurant
//! GET  /my-restaurant/{id}     - Manage restaurant (?tab=orders|menu|chats&filter=)
//! POST /my-restaurant/{id}/menu                     - Add menu item
//! POST /my-restaurant/{id}/orders/{order_id}/status - Change order status
//! ```
//!
//! The session guard is the [`RequireSession`](crate::middleware::RequireSession)
//! extractor on each handler, not a layer on the table.

pub mod auth;
pub mod cart;
pub mod chat;
pub mod home;
pub mod menu;
pub mod orders;
pub mod profile;
pub mod restaurants;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::login_page))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the browsing routes router.
pub fn browse_routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(home::home))
        .route("/restaurant/{restaurant_id}", get(menu::show))
        .route("/restaurant/{restaurant_id}/cart", post(menu::add_to_cart))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/order", post(cart::place_order))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/history", get(orders::history))
        .route("/order/{order_id}", get(orders::show))
}

/// Create the chat routes router.
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/chat/{order_id}",
            get(chat::order_chat).post(chat::send_order_message),
        )
        .route("/chat/{order_id}/stream", get(chat::order_stream))
        .route(
            "/chat-delivery/{restaurant_id}",
            get(chat::delivery_chat).post(chat::send_delivery_message),
        )
        .route(
            "/chat-delivery/{restaurant_id}/stream",
            get(chat::delivery_stream),
        )
}

/// Create the profile and restaurant management routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile::show).post(profile::update))
        .route(
            "/create-restaurant",
            get(restaurants::create_page).post(restaurants::create),
        )
        .route("/my-restaurant/{restaurant_id}", get(restaurants::manage))
        .route(
            "/my-restaurant/{restaurant_id}/menu",
            post(restaurants::add_menu_item),
        )
        .route(
            "/my-restaurant/{restaurant_id}/orders/{order_id}/status",
            post(restaurants::update_status),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(browse_routes())
        .nest("/cart", cart_routes())
        .merge(order_routes())
        .merge(chat_routes())
        .merge(account_routes())
}
