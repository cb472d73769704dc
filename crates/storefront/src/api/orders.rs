//! Orders, from both the customer's and the restaurant owner's side.

use hiwhiw_core::{OrderId, OrderStatus, RestaurantId, UserId};
use reqwest::Method;
use tracing::instrument;

use super::{Acknowledgement, ApiClient, ApiError, Order, OrderPlaced, StatusUpdate};

impl ApiClient {
    /// Turn the cart into orders, one per restaurant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the cart is empty on the
    /// backend.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn create_order(&self, user: UserId) -> Result<OrderPlaced, ApiError> {
        self.execute(self.request(Method::POST, "/orders", Some(user)))
            .await
    }

    /// The user's own orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn order_history(&self, user: UserId) -> Result<Vec<Order>, ApiError> {
        self.execute(self.request(Method::GET, "/orders/history", Some(user)))
            .await
    }

    /// Fetch a single order. Visible to the customer and the restaurant owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the order is not visible.
    #[instrument(skip(self), fields(user_id = %user, order_id = %id))]
    pub async fn order(&self, user: UserId, id: OrderId) -> Result<Order, ApiError> {
        self.execute(self.request(Method::GET, &format!("/orders/{id}"), Some(user)))
            .await
    }

    /// Move an order to a new status.
    ///
    /// The backend decides whether the transition is allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend refuses.
    #[instrument(skip(self), fields(user_id = %user, order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        user: UserId,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Acknowledgement, ApiError> {
        self.execute(
            self.request(Method::PUT, &format!("/orders/{id}/status"), Some(user))
                .json(&StatusUpdate { status }),
        )
        .await
    }

    /// Orders placed at a restaurant the user owns.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `user` does not own the
    /// restaurant.
    #[instrument(skip(self), fields(user_id = %user, restaurant_id = %restaurant))]
    pub async fn restaurant_orders(
        &self,
        user: UserId,
        restaurant: RestaurantId,
    ) -> Result<Vec<Order>, ApiError> {
        self.execute(self.request(
            Method::GET,
            &format!("/restaurants/{restaurant}/orders"),
            Some(user),
        ))
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
    async fn test_create_order_returns_ids() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "message": "Order placed",
                "order_ids": [7, 8]
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&ApiConfig::new(server.uri())).unwrap();
        let placed = client.create_order(UserId::new(1)).await.unwrap();
        assert_eq!(placed.order_ids, vec![OrderId::new(7), OrderId::new(8)]);
    }

    #[tokio::test]
    async fn test_update_order_status_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/orders/7/status"))
            .and(body_json(json!({"status": "confirmed"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Status updated"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&ApiConfig::new(server.uri())).unwrap();
        client
            .update_order_status(UserId::new(2), OrderId::new(7), OrderStatus::Confirmed)
            .await
            .unwrap();
    }
}
