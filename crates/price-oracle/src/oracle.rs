use std::collections::HashMap;
use std::time::Duration;

use derive_more::Display;
use log::{debug, error, info};
use thiserror::Error;
use tokio::sync::RwLock;

use config::{AssetConfig, AssetType, Credentials, OracleConfig};

use crate::clock::{Clock, SystemClock};
use crate::provider::{self, ParseError, ProviderUrlTemplates};
use crate::transport::{HttpGet, ReqwestTransport, TransportError};

/// How long a fetched price is served from the cache.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

/// Cached state of one configured asset.
///
/// `price == 0.0` together with `last_updated == 0` means the asset has
/// never been fetched.
#[derive(Debug, Display, Clone, PartialEq)]
#[display("{} {}: price {} updated at {}", asset_type, ticker, price, last_updated)]
pub struct AssetEntry {
    pub asset_type: AssetType,
    pub ticker: String,
    pub price: f64,
    // Milliseconds since epoch
    pub last_updated: u64,
}

impl AssetEntry {
    fn new(AssetConfig { asset_type, ticker, .. }: &AssetConfig) -> Self {
        AssetEntry { asset_type: *asset_type, ticker: ticker.clone(), price: 0.0, last_updated: 0 }
    }

    pub fn is_fresh(&self, now: u64) -> bool {
        self.price != 0.0 && now < self.last_updated + REFRESH_INTERVAL.as_millis() as u64
    }
}

/// Price Oracle
/// Serves asset prices in the quote currency from an in-memory cache,
/// refreshing stale entries from the provider matching the asset type.
#[derive(Debug)]
pub struct PriceOracle<Transport: HttpGet = ReqwestTransport, C: Clock = SystemClock> {
    quote_ticker: String,
    templates: ProviderUrlTemplates,
    entries: RwLock<HashMap<String, AssetEntry>>,
    transport: Transport,
    clock: C,
}

impl PriceOracle {
    /// Oracle backed by the pooled reqwest transport and wall clock time.
    pub fn build(config: &OracleConfig, credentials: &Credentials) -> Result<Self, TransportError> {
        Ok(Self::new(config, credentials, ReqwestTransport::new()?, SystemClock))
    }
}

impl<Transport: HttpGet, C: Clock> PriceOracle<Transport, C> {
    pub fn new(
        config: &OracleConfig,
        credentials: &Credentials,
        transport: Transport,
        clock: C,
    ) -> Self {
        let entries = config
            .assets
            .iter()
            .map(|(symbol, asset)| (symbol.clone(), AssetEntry::new(asset)))
            .collect();

        PriceOracle {
            quote_ticker: credentials.quote_ticker.clone(),
            templates: ProviderUrlTemplates::new(credentials),
            entries: RwLock::new(entries),
            transport,
            clock,
        }
    }

    pub fn quote_ticker(&self) -> &str {
        &self.quote_ticker
    }

    /// Snapshot of the cached state of an asset.
    pub async fn entry(&self, asset: &str) -> Option<AssetEntry> {
        self.entries.read().await.get(asset).cloned()
    }

    /// Price of `asset` in the quote currency.
    ///
    /// Never fails. The quote currency itself and unconfigured assets are
    /// priced at 1. When a refresh fails the last known price is returned,
    /// which is 0 for an asset that was never fetched.
    pub async fn get_price(&self, asset: &str) -> f64 {
        if asset == self.quote_ticker {
            return 1.0;
        }

        let now = self.clock.now_millis();
        let stale = {
            let entries = self.entries.read().await;
            match entries.get(asset) {
                None => {
                    debug!("No price source for {}, using 1:1", asset);
                    return 1.0;
                }
                Some(entry) if entry.is_fresh(now) => {
                    debug!("Price for {} served from cache: {}", asset, entry.price);
                    return entry.price;
                }
                Some(entry) => entry.clone(),
            }
        };

        debug!("Refreshing stale entry for {}: {}", asset, stale);

        // The lock is released while the request is in flight, concurrent
        // callers may refresh the same asset and the last write wins.
        match self.refresh(stale.asset_type, &stale.ticker).await {
            Ok(price) => {
                info!("Price fetched for {}: {}", asset, price);

                if let Some(entry) = self.entries.write().await.get_mut(asset) {
                    entry.price = price;
                    entry.last_updated = now;
                }
                price
            }
            Err(err) => {
                error!("Failed to load oracle price for {}: {}", asset, err);

                self.entries.read().await.get(asset).map_or(stale.price, |entry| entry.price)
            }
        }
    }

    async fn refresh(&self, asset_type: AssetType, ticker: &str) -> Result<f64, RefreshError> {
        let url = self
            .templates
            .build_url(asset_type, ticker)
            .ok_or(RefreshError::MissingTemplate(asset_type))?;

        debug!("Fetching fresh {} price for {}", asset_type, ticker);
        let raw = self.transport.get(&url).await?;

        Ok(provider::parse_response(asset_type, ticker, &self.quote_ticker, &raw)?)
    }
}

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("No price source for asset type {0}")]
    MissingTemplate(AssetType),

    #[error("Network failure: {0}")]
    Network(#[from] TransportError),

    #[error("Parse failure: {0}")]
    Parse(#[from] ParseError),
}
