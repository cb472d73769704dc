//! Restaurant listing.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use crate::api::Restaurant;
use crate::middleware::RequireSession;
use crate::state::AppState;
use crate::views::{Nav, Tab};

/// Query parameters for the listing.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    /// Search text, matched against name and location.
    pub q: Option<String>,
}

/// One restaurant card.
#[derive(Debug, Clone)]
pub struct RestaurantCard {
    pub id: String,
    pub name: String,
    pub owner_name: String,
    pub hours: String,
    pub pickup_location: String,
    pub pickup_time: String,
    pub image_url: Option<String>,
    pub menu_count: u32,
}

impl From<Restaurant> for RestaurantCard {
    fn from(r: Restaurant) -> Self {
        Self {
            id: r.id.to_string(),
            hours: format!("{} - {}", r.open_time, r.close_time),
            name: r.name,
            owner_name: r.owner_name,
            pickup_location: r.pickup_location,
            pickup_time: r.pickup_time,
            image_url: r.image_url.filter(|u| !u.trim().is_empty()),
            menu_count: r.menu_count.unwrap_or(0),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: Nav,
    pub query: String,
    pub restaurants: Vec<RestaurantCard>,
}

/// Display the restaurant listing.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn home(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Query(query): Query<HomeQuery>,
) -> HomeTemplate {
    let restaurants = state
        .api()
        .restaurants(user.id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to fetch restaurants");
            Vec::new()
        });

    let search = query.q.unwrap_or_default().trim().to_string();

    HomeTemplate {
        nav: Nav::new(&user, Tab::Home),
        restaurants: filter_restaurants(restaurants, &search)
            .into_iter()
            .map(RestaurantCard::from)
            .collect(),
        query: search,
    }
}

/// Case-insensitive match on name or location. An empty search keeps all.
pub fn filter_restaurants(restaurants: Vec<Restaurant>, search: &str) -> Vec<Restaurant> {
    let needle = search.to_lowercase();
    if needle.is_empty() {
        return restaurants;
    }

    restaurants
        .into_iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&needle) || r.location.to_lowercase().contains(&needle)
        })
        .collect()
}
