use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::{AppError, EntityId};

/// Thin JSON client for the hospital records API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<reqwest::Response, AppError>
    where B: Serialize + ?Sized {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url)
            .headers(self.get_headers());

        if let Some(body_data) = body {
            req = req.json(body_data);
        }

        let response = req.send().await.map_err(|e| {
            error!("Transport error calling {}: {}", url, e);
            AppError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);
            return Err(AppError::Rejected {
                status: status.as_u16(),
                body: error_text,
            });
        }

        Ok(response)
    }

    /// Issues a request and decodes the JSON body.
    pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, AppError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, body).await?;
        response.json::<T>().await.map_err(|e| {
            error!("Failed to decode response from {}: {}", path, e);
            AppError::Decode(e.to_string())
        })
    }

    /// Issues a request whose response body is irrelevant to the caller.
    pub async fn execute<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), AppError>
    where B: Serialize + ?Sized {
        self.send(method, path, body).await.map(|_| ())
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resource(&self, collection: &str) -> ResourceClient {
        ResourceClient::new(self.clone(), collection)
    }
}

/// Remote client bound to one collection endpoint, e.g. `/api/patients`.
#[derive(Clone)]
pub struct ResourceClient {
    api: ApiClient,
    collection_path: String,
}

impl ResourceClient {
    pub fn new(api: ApiClient, collection: &str) -> Self {
        Self {
            api,
            collection_path: format!("/api/{}", collection.trim_matches('/')),
        }
    }

    pub fn collection_path(&self) -> &str {
        &self.collection_path
    }

    /// Text ids are percent-encoded so they stay a single path segment.
    fn item_path(&self, id: &EntityId) -> String {
        format!("{}/{}", self.collection_path, urlencoding::encode(&id.to_string()))
    }

    pub async fn list<T: DeserializeOwned>(&self) -> Result<Vec<T>, AppError> {
        self.api.request::<Vec<T>, ()>(Method::GET, &self.collection_path, None).await
    }

    pub async fn create<P: Serialize + ?Sized>(&self, payload: &P) -> Result<(), AppError> {
        self.api.execute(Method::POST, &self.collection_path, Some(payload)).await
    }

    pub async fn update<P: Serialize + ?Sized>(&self, id: &EntityId, payload: &P) -> Result<(), AppError> {
        self.api.execute(Method::PUT, &self.item_path(id), Some(payload)).await
    }

    pub async fn delete(&self, id: &EntityId) -> Result<(), AppError> {
        self.api.execute::<()>(Method::DELETE, &self.item_path(id), None).await
    }
}
