//! Cart operations.

use std::num::NonZeroU32;

use hiwhiw_core::{CartItemId, MenuItemId, UserId};
use reqwest::Method;
use tracing::instrument;

use super::{Acknowledgement, AddToCart, ApiClient, ApiError, Cart, CartItemUpdate};

impl ApiClient {
    /// Fetch the user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn cart(&self, user: UserId) -> Result<Cart, ApiError> {
        self.execute(self.request(Method::GET, "/cart", Some(user)))
            .await
    }

    /// Add `quantity` of a menu item to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, note), fields(user_id = %user, menu_item_id = %item, quantity = %quantity))]
    pub async fn add_to_cart(
        &self,
        user: UserId,
        item: MenuItemId,
        quantity: NonZeroU32,
        note: &str,
    ) -> Result<Acknowledgement, ApiError> {
        let body = AddToCart {
            menu_item_id: item,
            quantity,
            note,
        };
        self.execute(self.request(Method::POST, "/cart", Some(user)).json(&body))
            .await
    }

    /// Change the quantity and/or note of a cart entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, update), fields(user_id = %user, cart_item_id = %entry))]
    pub async fn update_cart_item(
        &self,
        user: UserId,
        entry: CartItemId,
        update: &CartItemUpdate,
    ) -> Result<Acknowledgement, ApiError> {
        self.execute(
            self.request(Method::PUT, &format!("/cart/{entry}"), Some(user))
                .json(update),
        )
        .await
    }

    /// Remove one entry from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user, cart_item_id = %entry))]
    pub async fn remove_cart_item(
        &self,
        user: UserId,
        entry: CartItemId,
    ) -> Result<Acknowledgement, ApiError> {
        self.execute(self.request(Method::DELETE, &format!("/cart/{entry}"), Some(user)))
            .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn clear_cart(&self, user: UserId) -> Result<Acknowledgement, ApiError> {
        self.execute(self.request(Method::DELETE, "/cart/clear", Some(user)))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_add_to_cart_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cart"))
            .and(body_json(json!({"menu_item_id": 10, "quantity": 2, "note": "no chili"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "Added to cart"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&ApiConfig::new(server.uri())).unwrap();
        client
            .add_to_cart(
                UserId::new(1),
                MenuItemId::new(10),
                NonZeroU32::new(2).unwrap(),
                "no chili",
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_clear_cart_uses_delete() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/cart/clear"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Cart cleared"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&ApiConfig::new(server.uri())).unwrap();
        let ack = client.clear_cart(UserId::new(1)).await.unwrap();
        assert_eq!(ack.message.as_deref(), Some("Cart cleared"));
    }
}
