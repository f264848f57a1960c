use async_trait::async_trait;
use cpt_store::{NewProblem, Problem, ProblemId, QuickLink, QuickLinkDraft, QuickLinkId};
use reqwest::{Client, RequestBuilder, Response, header};
use serde::de::DeserializeOwned;

use crate::{
    backend::{LinkBackend, ProblemBackend},
    config::AppConfig,
    error::AppError,
    transfer::ImportRecord,
};

/// JSON-over-HTTP client for the problem store API
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(client, &config.api_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// GET a collection, bypassing any intermediate cache.
    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, AppError> {
        let request = self
            .client
            .get(self.endpoint(path))
            .header(header::CACHE_CONTROL, "no-cache");
        read_json(send(request).await?).await
    }
}

async fn send(request: RequestBuilder) -> Result<Response, AppError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), "Store rejected request: {message}");
    Err(AppError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    Ok(response.json().await?)
}

#[async_trait]
impl ProblemBackend for HttpBackend {
    async fn list_problems(&self) -> Result<Vec<Problem>, AppError> {
        self.fetch_list("problems").await
    }

    async fn create_problem(&self, problem: &NewProblem) -> Result<Problem, AppError> {
        let request = self.client.post(self.endpoint("problems")).json(problem);
        read_json(send(request).await?).await
    }

    async fn update_problem(&self, id: &ProblemId, problem: &Problem) -> Result<Problem, AppError> {
        let request = self
            .client
            .put(self.endpoint(&format!("problems/{id}")))
            .json(problem);
        read_json(send(request).await?).await
    }

    async fn delete_problem(&self, id: &ProblemId) -> Result<(), AppError> {
        let request = self.client.delete(self.endpoint(&format!("problems/{id}")));
        send(request).await?;
        Ok(())
    }

    async fn create_problems(&self, records: &[ImportRecord]) -> Result<Vec<Problem>, AppError> {
        let request = self
            .client
            .post(self.endpoint("problems/bulk"))
            .json(records);
        read_json(send(request).await?).await
    }
}

#[async_trait]
impl LinkBackend for HttpBackend {
    async fn list_links(&self) -> Result<Vec<QuickLink>, AppError> {
        self.fetch_list("links").await
    }

    async fn create_link(&self, link: &QuickLinkDraft) -> Result<QuickLink, AppError> {
        let request = self.client.post(self.endpoint("links")).json(link);
        read_json(send(request).await?).await
    }

    async fn delete_link(&self, id: &QuickLinkId) -> Result<(), AppError> {
        let request = self.client.delete(self.endpoint(&format!("links/{id}")));
        send(request).await?;
        Ok(())
    }
}
