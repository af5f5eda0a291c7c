use crate::auth::JwtConfig;
use crate::db::models::ShippingMethod;

/// Flat shipping cost table, keyed by shipping method
///
/// Unknown or absent methods resolve to the standard rate.
#[derive(Debug, Clone)]
pub struct ShippingRates {
    pub standard: f64,
    pub express: f64,
    pub overnight: f64,
    pub pickup: f64,
}

impl ShippingRates {
    /// Resolve the cost for a shipping method
    pub fn cost_for(&self, method: ShippingMethod) -> f64 {
        match method {
            ShippingMethod::Standard => self.standard,
            ShippingMethod::Express => self.express,
            ShippingMethod::Overnight => self.overnight,
            ShippingMethod::Pickup => self.pickup,
        }
    }
}

impl Default for ShippingRates {
    fn default() -> Self {
        Self {
            standard: 5.99,
            express: 12.99,
            overnight: 24.99,
            pickup: 0.0,
        }
    }
}

/// Server configuration
///
/// # Environment variables
///
/// Every field can be overridden through an environment variable:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | DATA_DIR | /var/lib/storefront | Data directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | Runtime environment |
/// | TAX_RATE_PERCENT | 8.0 | Order tax rate (percentage) |
/// | ORDER_NUMBER_PREFIX | ORD | Order number prefix |
/// | SHIPPING_STANDARD / _EXPRESS / _OVERNIGHT / _PICKUP | 5.99 / 12.99 / 24.99 / 0 | Shipping cost table |
///
/// # Example
///
/// ```ignore
/// DATA_DIR=/data/storefront HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory for the embedded database and log files
    pub data_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Tax rate applied to order subtotals, as a percentage
    pub tax_rate_percent: f64,
    /// Shipping cost lookup table
    pub shipping: ShippingRates,
    /// Prefix for generated order numbers
    pub order_number_prefix: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/var/lib/storefront".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            tax_rate_percent: std::env::var("TAX_RATE_PERCENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8.0),
            shipping: ShippingRates {
                standard: env_f64("SHIPPING_STANDARD", 5.99),
                express: env_f64("SHIPPING_EXPRESS", 12.99),
                overnight: env_f64("SHIPPING_OVERNIGHT", 24.99),
                pickup: env_f64("SHIPPING_PICKUP", 0.0),
            },
            order_number_prefix: std::env::var("ORDER_NUMBER_PREFIX")
                .unwrap_or_else(|_| "ORD".into()),
        }
    }

    /// Whether running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether running in development
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
