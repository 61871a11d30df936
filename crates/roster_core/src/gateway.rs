use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::{Operative, OperativeId},
    error::ErrorBody,
    protocol::{CreateOperativeRequest, UpdateOperativeRequest},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("operative not found")]
    NotFound,
    #[error("roster service rejected the request with status {status}")]
    Remote {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("failed to reach roster service: {0}")]
    Transport(#[from] reqwest::Error),
}

impl GatewayError {
    /// Server-provided failure detail, when the remote sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Remote { detail, .. } => detail.as_deref(),
            Self::NotFound | Self::Transport(_) => None,
        }
    }

    fn unavailable(operation: &str) -> Self {
        Self::Remote {
            status: StatusCode::SERVICE_UNAVAILABLE,
            detail: Some(format!("roster gateway is unavailable: {operation}")),
        }
    }
}

/// Request/response surface of the remote roster service. Stateless; no
/// retries, no caching.
#[async_trait]
pub trait RosterGateway: Send + Sync {
    async fn list_operatives(&self) -> Result<Vec<Operative>, GatewayError>;
    async fn get_operative(&self, id: OperativeId) -> Result<Operative, GatewayError>;
    async fn create_operative(
        &self,
        payload: &CreateOperativeRequest,
    ) -> Result<Operative, GatewayError>;
    async fn update_operative(
        &self,
        id: OperativeId,
        payload: &UpdateOperativeRequest,
    ) -> Result<Operative, GatewayError>;
    async fn delete_operative(&self, id: OperativeId) -> Result<(), GatewayError>;
}

pub struct MissingRosterGateway;

#[async_trait]
impl RosterGateway for MissingRosterGateway {
    async fn list_operatives(&self) -> Result<Vec<Operative>, GatewayError> {
        Err(GatewayError::unavailable("list_operatives"))
    }

    async fn get_operative(&self, _id: OperativeId) -> Result<Operative, GatewayError> {
        Err(GatewayError::unavailable("get_operative"))
    }

    async fn create_operative(
        &self,
        _payload: &CreateOperativeRequest,
    ) -> Result<Operative, GatewayError> {
        Err(GatewayError::unavailable("create_operative"))
    }

    async fn update_operative(
        &self,
        _id: OperativeId,
        _payload: &UpdateOperativeRequest,
    ) -> Result<Operative, GatewayError> {
        Err(GatewayError::unavailable("update_operative"))
    }

    async fn delete_operative(&self, _id: OperativeId) -> Result<(), GatewayError> {
        Err(GatewayError::unavailable("delete_operative"))
    }
}

pub struct HttpRosterGateway {
    http: Client,
    base_url: String,
}

impl HttpRosterGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: Client::new(),
            base_url,
        }
    }

    fn operatives_url(&self) -> String {
        format!("{}/operatives", self.base_url)
    }

    fn operative_url(&self, id: OperativeId) -> String {
        format!("{}/operatives/{}", self.base_url, id.0)
    }

    async fn check(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound);
        }
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail);
        Err(GatewayError::Remote { status, detail })
    }
}

#[async_trait]
impl RosterGateway for HttpRosterGateway {
    async fn list_operatives(&self) -> Result<Vec<Operative>, GatewayError> {
        let response = self.http.get(self.operatives_url()).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn get_operative(&self, id: OperativeId) -> Result<Operative, GatewayError> {
        let response = self.http.get(self.operative_url(id)).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_operative(
        &self,
        payload: &CreateOperativeRequest,
    ) -> Result<Operative, GatewayError> {
        let response = self
            .http
            .post(self.operatives_url())
            .json(payload)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update_operative(
        &self,
        id: OperativeId,
        payload: &UpdateOperativeRequest,
    ) -> Result<Operative, GatewayError> {
        let response = self
            .http
            .put(self.operative_url(id))
            .json(payload)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_operative(&self, id: OperativeId) -> Result<(), GatewayError> {
        let response = self.http.delete(self.operative_url(id)).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
