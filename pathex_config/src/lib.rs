mod schema;

pub use schema::{Config, FallbackConfig, ProviderConfig, ProviderKind};
