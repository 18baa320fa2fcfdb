//! Evaluation and discovery dispatch
//!
//! One `ModelEvaluatorService` serves all containers of a process. Each
//! call resolves its container, opens a session scoped to that call alone,
//! attaches the listener set cached under the session id, runs the engine
//! and returns a uniform envelope. The session is released on every exit
//! path; every failure is caught here and becomes a failure envelope naming
//! the container id.

use crate::config::ServiceConfig;
use crate::error::Result;
use crate::marshal::{ContentFormat, Marshaller, SerdeMarshaller};
use crate::response::ServiceResponse;
use std::sync::Arc;
use tracing::{debug, error};
use verdex_core::{describe, EvaluationOutcome, ModelDescriptor};
use verdex_runtime::prometheus::Registry;
use verdex_runtime::{
    ContainerRegistry, EvaluationRequest, ListenerProvider, ListenerRegistry, RuntimeMetrics,
};

/// The evaluation and discovery dispatcher
pub struct ModelEvaluatorService {
    containers: Arc<ContainerRegistry>,
    listeners: Arc<ListenerRegistry>,
    metrics: Arc<RuntimeMetrics>,
    marshaller: Arc<dyn Marshaller>,
}

impl ModelEvaluatorService {
    /// Start building a service
    pub fn builder() -> ModelEvaluatorServiceBuilder {
        ModelEvaluatorServiceBuilder::new()
    }

    /// Discover the models deployed in a container
    pub fn models(&self, container_id: &str) -> ServiceResponse<Vec<ModelDescriptor>> {
        match self.try_models(container_id) {
            Ok(descriptors) => ServiceResponse::success(
                format!(
                    "OK models successfully retrieved from container '{}'",
                    container_id
                ),
                descriptors,
            ),
            Err(e) => {
                error!(container = container_id, error = %e, "model discovery failed");
                ServiceResponse::failure(format!(
                    "Error retrieving models from container '{}': {}",
                    container_id, e
                ))
            }
        }
    }

    fn try_models(&self, container_id: &str) -> Result<Vec<ModelDescriptor>> {
        let container = self.containers.resolve(container_id)?;
        let session = container.open_session()?;

        let models = session.runtime().models();
        let descriptors = models
            .iter()
            .map(describe)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(descriptors)
    }

    /// Evaluate a container's model with the caller's context payload
    pub fn evaluate(
        &self,
        container_id: &str,
        payload: &str,
        format: ContentFormat,
    ) -> ServiceResponse<EvaluationOutcome> {
        match self.try_evaluate(container_id, payload, format) {
            Ok(outcome) => {
                ServiceResponse::success(format!("OK from container '{}'", container_id), outcome)
            }
            Err(e) => {
                error!(container = container_id, error = %e, "evaluation failed");
                ServiceResponse::failure(format!(
                    "Error from container '{}': {}",
                    container_id, e
                ))
            }
        }
    }

    fn try_evaluate(
        &self,
        container_id: &str,
        payload: &str,
        format: ContentFormat,
    ) -> Result<EvaluationOutcome> {
        let container = self.containers.resolve(container_id)?;
        let session = container.open_session()?;

        debug!(container = container_id, "deserializing evaluation payload");
        let context = self.marshaller.unmarshal_context(payload, format)?;
        let request = EvaluationRequest::from(context);

        let listeners = self.listeners.decision_listeners(session.id(), &container);

        let evaluation = session.runtime().evaluate(&request, &listeners);
        // Completion hooks run on success and failure alike, so a cached
        // listener never carries correlation frames into its next call.
        for listener in listeners.iter() {
            listener.evaluation_completed();
        }
        let evaluation = evaluation?;

        Ok(EvaluationOutcome {
            model_namespace: evaluation.model_namespace,
            model_name: evaluation.model_name,
            decision_names: request.decision_names,
            results: evaluation.results,
        })
    }

    /// The container registry this service resolves against
    pub fn containers(&self) -> &Arc<ContainerRegistry> {
        &self.containers
    }

    /// The process-wide listener registry
    pub fn listeners(&self) -> &Arc<ListenerRegistry> {
        &self.listeners
    }

    /// The metric vectors emitted by the built-in listeners
    pub fn metrics(&self) -> &Arc<RuntimeMetrics> {
        &self.metrics
    }
}

/// Builder for ModelEvaluatorService
///
/// # Example
///
/// ```rust,ignore
/// let service = ModelEvaluatorService::builder()
///     .with_config(ServiceConfig::load()?)
///     .with_containers(containers)
///     .register_provider(Arc::new(MyListenerProvider))
///     .build()?;
/// ```
pub struct ModelEvaluatorServiceBuilder {
    config: ServiceConfig,
    containers: Option<Arc<ContainerRegistry>>,
    providers: Vec<Arc<dyn ListenerProvider>>,
    marshaller: Option<Arc<dyn Marshaller>>,
    metrics_registry: Option<Registry>,
}

impl ModelEvaluatorServiceBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: ServiceConfig::default(),
            containers: None,
            providers: Vec::new(),
            marshaller: None,
            metrics_registry: None,
        }
    }

    /// Set the service configuration
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Share a container registry with the deployment side of the process
    pub fn with_containers(mut self, containers: Arc<ContainerRegistry>) -> Self {
        self.containers = Some(containers);
        self
    }

    /// Register an externally provided listener factory
    pub fn register_provider(mut self, provider: Arc<dyn ListenerProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Replace the default serde marshaller
    pub fn with_marshaller(mut self, marshaller: Arc<dyn Marshaller>) -> Self {
        self.marshaller = Some(marshaller);
        self
    }

    /// Register metrics against an existing registry (for scraping)
    pub fn with_metrics_registry(mut self, registry: Registry) -> Self {
        self.metrics_registry = Some(registry);
        self
    }

    /// Build the service
    pub fn build(self) -> anyhow::Result<ModelEvaluatorService> {
        let registry = self.metrics_registry.unwrap_or_default();
        let metrics = Arc::new(RuntimeMetrics::new(&registry)?);
        let containers = self
            .containers
            .unwrap_or_else(|| Arc::new(ContainerRegistry::new()));
        let listeners = Arc::new(ListenerRegistry::new(
            metrics.clone(),
            self.providers,
            self.config.listener_cache_capacity,
        ));
        let marshaller = self
            .marshaller
            .unwrap_or_else(|| Arc::new(SerdeMarshaller));

        Ok(ModelEvaluatorService {
            containers,
            listeners,
            metrics,
            marshaller,
        })
    }
}

impl Default for ModelEvaluatorServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
