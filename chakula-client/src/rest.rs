use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chakula_catalog::{CatalogApi, FoodCourtTable, MenuItem, NewMenuItem, Outlet};
use chakula_core::SessionStore;
use chakula_order::{Order, OrderApi, OrderDraft, OrderStatus};
use chakula_reservation::{
    NewReservation, Reservation, ReservationApi, ReservationCreated, ReservationStatus,
};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::app_config::ApiConfig;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message} (status {status})")]
    Status { status: u16, message: String },
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// REST client for the food-court backend. The bearer token from the
/// session store rides along whenever one is present.
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl RestClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "api request");
        let mut builder = self.http.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn check(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message.or(body.error))
                .unwrap_or_else(|| "an error occurred".to_string());
            return Err(ApiError::Status { status: status.as_u16(), message });
        }
        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.check(self.request(Method::GET, path)).await?;
        Ok(response.json().await?)
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.check(self.request(Method::POST, path).json(body)).await?;
        Ok(response.json().await?)
    }

    async fn put_empty<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.check(self.request(Method::PUT, path).json(body)).await?;
        Ok(())
    }

    async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.check(self.request(Method::PATCH, path).json(body)).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogApi for RestClient {
    async fn list_menu_items(
        &self,
    ) -> Result<Vec<MenuItem>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.get("/menu_items").await?)
    }

    async fn create_menu_item(
        &self,
        item: &NewMenuItem,
    ) -> Result<MenuItem, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.post("/menu_items", item).await?)
    }

    async fn list_outlets(&self) -> Result<Vec<Outlet>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.get("/outlets").await?)
    }

    async fn list_tables(
        &self,
    ) -> Result<Vec<FoodCourtTable>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.get("/food_court_tables").await?)
    }
}

#[async_trait]
impl ReservationApi for RestClient {
    async fn create_reservation(
        &self,
        req: &NewReservation,
    ) -> Result<ReservationCreated, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.post("/reservations/", req).await?)
    }

    async fn my_reservations(
        &self,
    ) -> Result<Vec<Reservation>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.get("/reservations/my").await?)
    }

    async fn update_status(
        &self,
        id: i64,
        status: ReservationStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let path = format!("/reservations/{id}/status");
        Ok(self.put_empty(&path, &serde_json::json!({ "status": status })).await?)
    }

    async fn confirm(&self, id: i64) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let path = format!("/reservations/{id}/confirm");
        Ok(self.put_empty(&path, &serde_json::json!({})).await?)
    }

    async fn reassign_table(
        &self,
        id: i64,
        table_id: i64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let path = format!("/reservations/{id}/reassign");
        Ok(self.put_empty(&path, &serde_json::json!({ "table_id": table_id })).await?)
    }
}

#[async_trait]
impl OrderApi for RestClient {
    async fn create_order(
        &self,
        draft: &OrderDraft,
    ) -> Result<Order, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.post("/orders", draft).await?)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.get("/orders").await?)
    }

    async fn update_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Order, Box<dyn std::error::Error + Send + Sync>> {
        let path = format!("/orders/{order_id}");
        Ok(self.patch(&path, &serde_json::json!({ "status": status })).await?)
    }
}
