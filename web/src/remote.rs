use gloo::net::http::{Request, RequestBuilder};
use sapper_protocol::{GameSnapshot, MoveRequest, StartRequest};
use serde::Serialize;
use thiserror::Error;

use crate::identity::Identity;

const USER_HEADER: &str = "X-User-Id";

/// Failure of one remote exchange.
#[derive(Error, Debug, Clone, PartialEq)]
pub(crate) enum ApiError {
    /// The service answered with a non-success status.
    #[error("{code}: {message}")]
    Status { code: u16, message: String },
    /// The request never completed.
    #[error("network unreachable: {0}")]
    Transport(String),
    /// The service answered 2xx with a body this client cannot read.
    #[error("malformed server response: {0}")]
    Decode(String),
}

impl ApiError {
    /// No active game for this player.
    pub(crate) fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { code: 404, .. })
    }

    /// A game already exists and must be fetched instead of started.
    pub(crate) fn is_conflict(&self) -> bool {
        matches!(self, Self::Status { code: 409, .. })
    }

    /// Inline-display text: the server's message without the status prefix.
    pub(crate) fn message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Transport(message) | Self::Decode(message) => message.clone(),
        }
    }
}

/// Typed request/response client for the minesweeper service.
///
/// Owns no game state: every call returns the authoritative snapshot and the
/// caller decides what to do with it.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GameClient {
    api_base: String,
    identity: Identity,
}

impl GameClient {
    pub(crate) fn new(api_base: String, identity: Identity) -> Self {
        Self { api_base, identity }
    }

    pub(crate) async fn fetch_state(&self) -> Result<GameSnapshot, ApiError> {
        Self::exchange(self.get("/state")).await
    }

    pub(crate) async fn start(&self, body: StartRequest) -> Result<GameSnapshot, ApiError> {
        Self::exchange_json(self.post("/start"), &body).await
    }

    pub(crate) async fn reveal(&self, body: MoveRequest) -> Result<GameSnapshot, ApiError> {
        Self::exchange_json(self.post("/reveal"), &body).await
    }

    pub(crate) async fn toggle_flag(&self, body: MoveRequest) -> Result<GameSnapshot, ApiError> {
        Self::exchange_json(self.post("/flag"), &body).await
    }

    pub(crate) async fn abandon(&self) -> Result<GameSnapshot, ApiError> {
        Self::exchange(self.post("/abandon")).await
    }

    fn get(&self, path: &str) -> RequestBuilder {
        Request::get(&self.url(path)).header(USER_HEADER, self.identity.as_str())
    }

    fn post(&self, path: &str) -> RequestBuilder {
        Request::post(&self.url(path)).header(USER_HEADER, self.identity.as_str())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn exchange_json<B: Serialize>(
        builder: RequestBuilder,
        body: &B,
    ) -> Result<GameSnapshot, ApiError> {
        let request = builder
            .json(body)
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Self::read_snapshot(response).await
    }

    async fn exchange(builder: RequestBuilder) -> Result<GameSnapshot, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Self::read_snapshot(response).await
    }

    async fn read_snapshot(
        response: gloo::net::http::Response,
    ) -> Result<GameSnapshot, ApiError> {
        if !response.ok() {
            let code = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { code, message });
        }
        response
            .json::<GameSnapshot>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}
