//! JSON-over-HTTP access to the draw service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::{
    domain::{DrawId, Strategy},
    error::ServiceFailure,
    protocol::{
        DrawHistory, DrawResult, HealthStatus, LatestResultResponse, RefreshSummary,
        StatisticsResponse, StatisticsSnapshot, Suggestion, SuggestionRequest, SuggestionSet,
        TeamPick, TeamStatistics, TeamStatisticsResponse, TeamSuggestionResponse,
        VerificationOutcome, VerificationRequest,
    },
};
use tracing::debug;
use url::Url;

use crate::error::{OperationError, TransportError};

/// One method per remote endpoint. Implementations issue exactly one request
/// per call and never retry.
#[async_trait]
pub trait LotteryService: Send + Sync {
    async fn refresh(&self) -> Result<RefreshSummary, OperationError>;
    async fn latest_result(&self) -> Result<DrawResult, OperationError>;
    async fn statistics(&self) -> Result<StatisticsSnapshot, OperationError>;
    async fn generate_suggestions(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Vec<Suggestion>, OperationError>;
    async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationOutcome, OperationError>;
    async fn draw(&self, draw_id: DrawId) -> Result<DrawResult, OperationError>;
    async fn draw_history(&self, limit: Option<u32>) -> Result<DrawHistory, OperationError>;
    async fn team_statistics(&self) -> Result<TeamStatistics, OperationError>;
    async fn suggest_team(&self, strategy: Strategy) -> Result<TeamPick, OperationError>;
    async fn health(&self) -> Result<HealthStatus, OperationError>;
}

pub struct HttpLotteryService {
    http: Client,
    base_url: String,
}

impl HttpLotteryService {
    pub fn new(base_url: &Url) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    /// Same as [`HttpLotteryService::new`] but every request gives up after
    /// `timeout`. Without one a hung request waits forever.
    pub fn with_timeout(base_url: &Url, timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, OperationError> {
        self.exchange(path, self.http.get(self.endpoint(path))).await
    }

    async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, OperationError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let mut request = self.http.post(self.endpoint(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.exchange(path, request).await
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, OperationError> {
        let response = request.send().await.map_err(TransportError::from)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(TransportError::from)?;
        debug!(path, status, bytes = body.len(), "service replied");
        decode_envelope(status, &body)
    }
}

#[async_trait]
impl LotteryService for HttpLotteryService {
    async fn refresh(&self) -> Result<RefreshSummary, OperationError> {
        self.post::<_, ()>("/atualizar", None).await
    }

    async fn latest_result(&self) -> Result<DrawResult, OperationError> {
        let response: LatestResultResponse = self.get("/ultimo-resultado").await?;
        Ok(response.result)
    }

    async fn statistics(&self) -> Result<StatisticsSnapshot, OperationError> {
        let response: StatisticsResponse = self.get("/estatisticas").await?;
        Ok(response.statistics)
    }

    async fn generate_suggestions(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Vec<Suggestion>, OperationError> {
        let response: SuggestionSet = self.post("/gerar-palpite", Some(request)).await?;
        Ok(response.suggestions)
    }

    async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationOutcome, OperationError> {
        self.post("/conferir", Some(request)).await
    }

    async fn draw(&self, draw_id: DrawId) -> Result<DrawResult, OperationError> {
        let response: LatestResultResponse = self.get(&format!("/resultado/{draw_id}")).await?;
        Ok(response.result)
    }

    async fn draw_history(&self, limit: Option<u32>) -> Result<DrawHistory, OperationError> {
        match limit {
            Some(limit) => self.get(&format!("/resultados?limite={limit}")).await,
            None => self.get("/resultados").await,
        }
    }

    async fn team_statistics(&self) -> Result<TeamStatistics, OperationError> {
        let response: TeamStatisticsResponse = self.get("/estatisticas/times-coracao").await?;
        Ok(response.statistics)
    }

    async fn suggest_team(&self, strategy: Strategy) -> Result<TeamPick, OperationError> {
        let response: TeamSuggestionResponse = self
            .get(&format!("/sugerir-time-coracao?estrategia={strategy}"))
            .await?;
        Ok(response.pick)
    }

    async fn health(&self) -> Result<HealthStatus, OperationError> {
        self.get("/health").await
    }
}

/// Interprets a raw service reply.
///
/// The service attaches `{sucesso: false, mensagem}` to its 4xx/5xx replies,
/// so an explicit `sucesso: false` is a service failure whatever the status.
/// Everything else that is not a 2xx `sucesso: true` body matching `T` is a
/// transport failure.
pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, OperationError> {
    let status_ok = (200..300).contains(&status);
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) if !status_ok => return Err(TransportError::Status(status).into()),
        Err(error) => return Err(TransportError::Malformed(error.to_string()).into()),
    };

    match value.get("sucesso").and_then(Value::as_bool) {
        Some(false) => {
            let message = serde_json::from_value::<ServiceFailure>(value)
                .ok()
                .and_then(|failure| failure.mensagem);
            Err(OperationError::service(message))
        }
        Some(true) if status_ok => serde_json::from_value(value)
            .map_err(|error| OperationError::from(TransportError::Malformed(error.to_string()))),
        None if status_ok => Err(TransportError::MissingSuccessFlag.into()),
        _ => Err(TransportError::Status(status).into()),
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
