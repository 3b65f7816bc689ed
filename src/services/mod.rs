pub mod codec;
pub mod debug_snapshot;
pub mod openai;
pub mod provider;
pub mod sprite_service;
pub mod stability;

pub use debug_snapshot::DebugSnapshots;
pub use openai::{enhance_prompt, OpenAiProvider};
pub use provider::{GenerationInput, Provider, ProviderSet};
pub use sprite_service::{GeneratedSprite, SpriteService, MAX_COLORS};
pub use stability::{control_strength, prepare_guide, StabilityProvider};
