mod converter_factory;
mod remote_conversion_client;

pub use converter_factory::{ConverterFactory, transcoder_config};
pub use remote_conversion_client::RemoteConversionClient;
