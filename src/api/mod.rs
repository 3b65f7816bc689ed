pub mod generate;
pub mod status;

pub use generate::{
    handle_generate, ErrorResponse, GenerateResponse, SpriteImage, __path_handle_generate,
};
pub use status::{
    handle_health, handle_loras, handle_models, HealthResponse, LorasResponse, ModelsResponse,
    __path_handle_health, __path_handle_loras, __path_handle_models,
};
