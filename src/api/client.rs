use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::{ApiError, ApiRequest, ApiResponse, Method, Transport};
use crate::models::{
    CategoryPayload, Credentials, LoginResponse, MonthlyAggregate, Registration,
    TransactionListing, TransactionPayload, User,
};

/// Typed view of the expense tracker REST API.
pub struct ApiClient {
    transport: Box<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    fn execute(
        &self,
        method: Method,
        path: String,
        bearer: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest {
            method,
            path,
            bearer: bearer.map(str::to_string),
            body,
        };
        let response = self.transport.send(&request)?;
        if response.is_success() {
            Ok(response)
        } else {
            warn!(
                method = %request.method,
                path = %request.path,
                status = response.status,
                "request rejected"
            );
            Err(ApiError::rejected(response.status, &response.body))
        }
    }

    fn json_body<B: Serialize>(body: &B) -> Result<Option<serde_json::Value>, ApiError> {
        Ok(Some(serde_json::to_value(body)?))
    }

    fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ApiError> {
        Ok(serde_json::from_str(&response.body)?)
    }

    // ── Auth ────────────────────────────────────────────────────

    pub fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let body = Self::json_body(credentials)?;
        let response = self.execute(Method::Post, "/auth/login".into(), None, body)?;
        Self::decode(&response)
    }

    pub fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let body = Self::json_body(registration)?;
        self.execute(Method::Post, "/auth/register".into(), None, body)?;
        Ok(())
    }

    pub fn fetch_profile(&self, token: &str) -> Result<User, ApiError> {
        let response = self.execute(Method::Get, "/user".into(), Some(token), None)?;
        Self::decode(&response)
    }

    // ── Transactions ────────────────────────────────────────────

    pub fn list_transactions(&self, token: &str) -> Result<Vec<MonthlyAggregate>, ApiError> {
        let response = self.execute(Method::Get, "/transaction".into(), Some(token), None)?;
        let listing: TransactionListing = Self::decode(&response)?;
        Ok(listing.data)
    }

    pub fn create_transaction(
        &self,
        token: &str,
        payload: &TransactionPayload,
    ) -> Result<(), ApiError> {
        let body = Self::json_body(payload)?;
        self.execute(Method::Post, "/transaction".into(), Some(token), body)?;
        Ok(())
    }

    pub fn update_transaction(
        &self,
        token: &str,
        id: &str,
        payload: &TransactionPayload,
    ) -> Result<(), ApiError> {
        let body = Self::json_body(payload)?;
        self.execute(Method::Patch, format!("/transaction/{id}"), Some(token), body)?;
        Ok(())
    }

    pub fn delete_transaction(&self, token: &str, id: &str) -> Result<(), ApiError> {
        self.execute(Method::Delete, format!("/transaction/{id}"), Some(token), None)?;
        Ok(())
    }

    // ── Categories ──────────────────────────────────────────────

    pub fn create_category(&self, token: &str, payload: &CategoryPayload) -> Result<(), ApiError> {
        let body = Self::json_body(payload)?;
        self.execute(Method::Post, "/category".into(), Some(token), body)?;
        Ok(())
    }

    pub fn update_category(
        &self,
        token: &str,
        id: &str,
        payload: &CategoryPayload,
    ) -> Result<(), ApiError> {
        let body = Self::json_body(payload)?;
        self.execute(Method::Patch, format!("/category/{id}"), Some(token), body)?;
        Ok(())
    }

    pub fn delete_category(&self, token: &str, id: &str) -> Result<(), ApiError> {
        self.execute(Method::Delete, format!("/category/{id}"), Some(token), None)?;
        Ok(())
    }
}
