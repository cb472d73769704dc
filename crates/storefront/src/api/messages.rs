//! Order chat and pre-order (restaurant) chat.

use hiwhiw_core::{OrderId, RestaurantId, UserId};
use reqwest::Method;
use tracing::instrument;

use super::{
    Acknowledgement, ApiClient, ApiError, Conversation, Message, NewMessage, NewRestaurantMessage,
};

impl ApiClient {
    /// Messages exchanged about an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user, order_id = %order))]
    pub async fn order_messages(
        &self,
        user: UserId,
        order: OrderId,
    ) -> Result<Vec<Message>, ApiError> {
        self.execute(self.request(Method::GET, &format!("/messages/{order}"), Some(user)))
            .await
    }

    /// Send a message about an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, content), fields(user_id = %user, order_id = %order))]
    pub async fn send_order_message(
        &self,
        user: UserId,
        order: OrderId,
        content: &str,
    ) -> Result<Acknowledgement, ApiError> {
        self.execute(
            self.request(Method::POST, &format!("/messages/{order}"), Some(user))
                .json(&NewMessage { content }),
        )
        .await
    }

    /// Pre-order chat with a restaurant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user, restaurant_id = %restaurant))]
    pub async fn restaurant_chat(
        &self,
        user: UserId,
        restaurant: RestaurantId,
    ) -> Result<Vec<Message>, ApiError> {
        self.execute(self.request(
            Method::GET,
            &format!("/restaurants/{restaurant}/chat"),
            Some(user),
        ))
        .await
    }

    /// Send a pre-order chat message.
    ///
    /// Customers leave `receiver` empty (the owner receives it); owners name
    /// the customer they are answering.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, content), fields(user_id = %user, restaurant_id = %restaurant))]
    pub async fn send_restaurant_chat(
        &self,
        user: UserId,
        restaurant: RestaurantId,
        content: &str,
        receiver: Option<UserId>,
    ) -> Result<Acknowledgement, ApiError> {
        let body = NewRestaurantMessage {
            content,
            receiver_id: receiver,
        };
        self.execute(
            self.request(
                Method::POST,
                &format!("/restaurants/{restaurant}/chat"),
                Some(user),
            )
            .json(&body),
        )
        .await
    }

    /// Customers who have started a pre-order chat with the owner's restaurant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user, restaurant_id = %restaurant))]
    pub async fn restaurant_conversations(
        &self,
        user: UserId,
        restaurant: RestaurantId,
    ) -> Result<Vec<Conversation>, ApiError> {
        self.execute(self.request(
            Method::GET,
            &format!("/restaurants/{restaurant}/conversations"),
            Some(user),
        ))
        .await
    }
}
