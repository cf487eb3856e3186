use crate::{
    Config,
    model::{AqiPayload, Coordinates},
    provider::waqi::WaqiProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub mod waqi;

/// Source of air quality readings for a position.
///
/// An `Err` means no payload could be read at all (network, HTTP status);
/// provider-reported problems come back as [`AqiPayload::UpstreamError`].
#[async_trait]
pub trait AqiProvider: Send + Sync + Debug {
    async fn fetch(&self, coords: Coordinates) -> anyhow::Result<AqiPayload>;
}

/// One step of a fetch as observed by the caller: `Loading`, then one terminal state.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Loading,
    Success(AqiPayload),
    Error(String),
}

impl FetchState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FetchState::Loading)
    }
}

/// Run a single fetch, pushing its states into `tx`.
///
/// Sends `Loading` followed by exactly one terminal state. If the receiver
/// has been dropped the fetch is abandoned.
pub async fn fetch_states(
    provider: &dyn AqiProvider,
    coords: Coordinates,
    tx: &mpsc::Sender<FetchState>,
) {
    info!(%coords, "loading air quality data");
    if tx.send(FetchState::Loading).await.is_err() {
        debug!(%coords, "receiver gone before fetch started");
        return;
    }

    let terminal = match provider.fetch(coords).await {
        Ok(payload) => {
            debug!(%coords, "retrieved air quality data");
            FetchState::Success(payload)
        }
        Err(err) => {
            let message = format!("{err:#}");
            warn!(%coords, error = %message, "air quality request failed");
            FetchState::Error(message)
        }
    };

    if tx.send(terminal).await.is_err() {
        debug!(%coords, "receiver gone, dropping fetch result");
    }
}

/// Construct the feed provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn AqiProvider>> {
    let token = config.api_token()?;

    Ok(Box::new(WaqiProvider::with_base_url(token.to_owned(), config.endpoint())))
}
