//! JSON transport to the Snappy backend.

use domain::ErrorBody;
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Thin wrapper over a shared `reqwest::Client` bound to one base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<R>(&self, path: &str, token: Option<&str>) -> ClientResult<R>
    where
        R: DeserializeOwned,
    {
        self.send(self.http.get(self.url(path)), token).await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B, token: Option<&str>) -> ClientResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(self.http.post(self.url(path)).json(body), token)
            .await
    }

    /// GET with query-string parameters
    pub async fn get_with_query<Q, R>(
        &self,
        path: &str,
        query: &Q,
        token: Option<&str>,
    ) -> ClientResult<R>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(self.http.get(self.url(path)).query(query), token)
            .await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B, token: Option<&str>) -> ClientResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(self.http.put(self.url(path)).json(body), token)
            .await
    }

    /// DELETE; any success status counts and the body is ignored.
    pub async fn delete(&self, path: &str, token: Option<&str>) -> ClientResult<()> {
        self.execute(self.http.delete(self.url(path)), token).await?;
        Ok(())
    }

    pub async fn post_multipart<R>(
        &self,
        path: &str,
        form: Form,
        token: Option<&str>,
    ) -> ClientResult<R>
    where
        R: DeserializeOwned,
    {
        self.send(self.http.post(self.url(path)).multipart(form), token)
            .await
    }

    async fn send<R>(&self, request: RequestBuilder, token: Option<&str>) -> ClientResult<R>
    where
        R: DeserializeOwned,
    {
        let bytes = self.execute(request, token).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send the request and return the body of a successful response.
    async fn execute(
        &self,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> ClientResult<Vec<u8>> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            // Bodies that are not the usual error payload still map to an API error
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .map(|body| body.message);
            tracing::debug!(status = status.as_u16(), ?message, "Backend rejected request");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(bytes.to_vec())
    }
}
