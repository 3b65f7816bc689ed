pub mod config;
pub mod credentials;
pub mod request;

pub use config::{AppConfig, OpenAiConfig, SpriteDefaults, StabilityConfig};
pub use credentials::ApiKey;
pub use request::{GenerateRequest, GenerationRequest, ProviderKind, UnknownProvider};
