pub use clock::{Clock, SystemClock};
pub use config::{AssetType, Credentials};
pub use oracle::{AssetEntry, PriceOracle, RefreshError, REFRESH_INTERVAL};
pub use provider::{ParseError, ProviderUrlTemplates};
pub use transport::{HttpGet, ReqwestTransport, TransportError, REQUEST_TIMEOUT};

pub mod clock;
pub mod oracle;
pub mod provider;
pub mod transport;
