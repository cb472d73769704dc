//! Restaurants and their menus.

use hiwhiw_core::{MenuItemId, RestaurantId, UserId};
use reqwest::Method;
use tracing::instrument;

use super::{ApiClient, ApiError, Created, Menu, NewMenuItem, NewRestaurant, Restaurant};

impl ApiClient {
    /// List every restaurant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn restaurants(&self, user: UserId) -> Result<Vec<Restaurant>, ApiError> {
        self.execute(self.request(Method::GET, "/restaurants", Some(user)))
            .await
    }

    /// Fetch one restaurant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the restaurant does not exist.
    #[instrument(skip(self), fields(user_id = %user, restaurant_id = %id))]
    pub async fn restaurant(&self, user: UserId, id: RestaurantId) -> Result<Restaurant, ApiError> {
        self.execute(self.request(Method::GET, &format!("/restaurants/{id}"), Some(user)))
            .await
    }

    /// Open a new restaurant owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the fields.
    #[instrument(skip(self, restaurant), fields(user_id = %user, name = %restaurant.name))]
    pub async fn create_restaurant(
        &self,
        user: UserId,
        restaurant: &NewRestaurant,
    ) -> Result<Created<RestaurantId>, ApiError> {
        self.execute(
            self.request(Method::POST, "/restaurants", Some(user))
                .json(restaurant),
        )
        .await
    }

    /// Fetch a restaurant's menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user, restaurant_id = %restaurant))]
    pub async fn menu(&self, user: UserId, restaurant: RestaurantId) -> Result<Menu, ApiError> {
        self.execute(self.request(
            Method::GET,
            &format!("/restaurants/{restaurant}/menu"),
            Some(user),
        ))
        .await
    }

    /// Add an item to a restaurant's menu. Only the owner may do this.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or `user` does not own the
    /// restaurant.
    #[instrument(skip(self, item), fields(user_id = %user, restaurant_id = %restaurant))]
    pub async fn add_menu_item(
        &self,
        user: UserId,
        restaurant: RestaurantId,
        item: &NewMenuItem,
    ) -> Result<Created<MenuItemId>, ApiError> {
        self.execute(
            self.request(
                Method::POST,
                &format!("/restaurants/{restaurant}/menu"),
                Some(user),
            )
            .json(item),
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_menu_parses_restaurant_and_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/restaurants/2/menu"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "restaurant": {
                    "id": 2,
                    "name": "Uncle Lek Noodles",
                    "pickup_time": "12:00",
                    "pickup_location": "Library"
                },
                "menu": [
                    {"id": 10, "restaurant_id": 2, "name": "Boat noodles", "price": 50,
                     "description": "Pork", "image_url": ""}
                ]
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&ApiConfig::new(server.uri())).unwrap();
        let menu = client
            .menu(UserId::new(1), RestaurantId::new(2))
            .await
            .unwrap();
        assert_eq!(menu.restaurant.name, "Uncle Lek Noodles");
        assert_eq!(menu.menu[0].price.display(), "฿50");
    }

    #[tokio::test]
    async fn test_add_menu_item_sends_numeric_price() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/restaurants/2/menu"))
            .and(header("X-User-Id", "4"))
            .and(body_json(json!({
                "name": "Pad thai",
                "price": 55.0,
                "description": "",
                "image_url": ""
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"message": "Menu item added", "id": 11})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&ApiConfig::new(server.uri())).unwrap();
        let item = NewMenuItem {
            name: "Pad thai".to_string(),
            price: "55".parse().unwrap(),
            description: String::new(),
            image_url: String::new(),
        };
        let created = client
            .add_menu_item(UserId::new(4), RestaurantId::new(2), &item)
            .await
            .unwrap();
        assert_eq!(created.id, MenuItemId::new(11));
    }
}
