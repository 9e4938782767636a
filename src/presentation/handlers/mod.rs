mod convert;
mod health;

pub use convert::{
    ConvertParams, ErrorResponse, conversion_error_response, convert_handler,
    convert_to_mp3_handler,
};
pub use health::{HealthResponse, health_handler};
