//! Verdex Service - Evaluation and discovery dispatch
//!
//! The outward face of the Verdex decision service: callers hand in a
//! container id plus a serialized evaluation context and get back a uniform
//! response envelope. Transport bindings live outside this crate and call
//! straight into [`ModelEvaluatorService`].

pub mod config;
pub mod error;
pub mod evaluator;
pub mod marshal;
pub mod response;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use evaluator::{ModelEvaluatorService, ModelEvaluatorServiceBuilder};
pub use marshal::{ContentFormat, MarshalError, Marshaller, SerdeMarshaller};
pub use response::{ResponseStatus, ServiceResponse};

/// Initialize the tracing subscriber for this process
pub fn init_tracing(config: &ServiceConfig) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}
