use crate::error::{GatewayError, Result};
use crate::traits::PetNetwork;
use crate::types::{ApiRequest, ApiResponse};
use async_trait::async_trait;
use reqwest::Client;

pub struct NativeNetwork {
    client: Client,
}

impl NativeNetwork {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl PetNetwork for NativeNetwork {
    async fn fetch(&self, url: &str, request: ApiRequest) -> Result<ApiResponse> {
        let mut req_builder = self.client.request(request.method.clone(), url);

        for (k, v) in &request.headers {
            req_builder = req_builder.header(k, v);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.clone());
        }

        tracing::debug!("[PetHTTP-Out] {} {}", request.method, url);

        let response = req_builder
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let mut headers = std::collections::BTreeMap::new();
        for (k, v) in response.headers() {
            if let Ok(val) = v.to_str() {
                headers.insert(k.as_str().to_string(), val.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}
