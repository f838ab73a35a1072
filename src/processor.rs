use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use crate::{
    BoxedComponent, ComponentId, ComponentType, Config, Error, LoggerProvider, Managed,
    ManagedTypeRegistry, Result, ToggleController, TracingLoggerProvider, management,
    recorder::CallRecorder,
};

/// The integration point between the host container and the interception
/// engine.
///
/// The host calls [`before_init`](ProfilingProcessor::before_init) after a
/// component is constructed but before it reaches its first consumer, and
/// [`after_init`](ProfilingProcessor::after_init) once initialization is
/// complete. The value returned by `after_init` - the original box for
/// unmanaged components, a proxy for managed ones - becomes the system-wide
/// reference from then on.
///
/// Creating a processor registers its toggle controller in the
/// [`management`] registry; a taken name aborts startup.
///
/// # Example
///
/// ```ignore
/// let processor = ProfilingProcessor::new()?;
/// let id = ComponentId::from("exchange");
///
/// processor.before_init(&id, Exchange::managed_type());
/// let exchange = processor.after_init(&id, Box::new(Exchange::default()))?;
/// let exchange = exchange.downcast::<ContractProxy<Exchange>>().unwrap();
///
/// let pricing: &dyn Pricing = &*exchange;
/// pricing.quote("BTC", 3); // logged, timed when the toggle is on
/// ```
pub struct ProfilingProcessor {
    registry: ManagedTypeRegistry,
    toggle: Arc<ToggleController>,
    loggers: Arc<dyn LoggerProvider>,
    wrapped: Mutex<HashSet<ComponentId>>,
}

impl std::fmt::Debug for ProfilingProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfilingProcessor").finish_non_exhaustive()
    }
}

impl ProfilingProcessor {
    /// Create a processor exposing its toggle under the default
    /// [`management::CONTROLLER_NAME`].
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create a processor with the given configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        let toggle = Arc::new(ToggleController::new());
        management::register(&config.management_name, toggle.clone())?;
        Ok(Self {
            registry: ManagedTypeRegistry::new(),
            toggle,
            loggers: Arc::new(TracingLoggerProvider),
            wrapped: Mutex::new(HashSet::new()),
        })
    }

    /// Replace the default tracing-backed logger provider.
    pub fn with_logger_provider(mut self, loggers: Arc<dyn LoggerProvider>) -> Self {
        self.loggers = loggers;
        self
    }

    /// The toggle shared by every wrapper this processor produces.
    pub fn toggle(&self) -> Arc<ToggleController> {
        self.toggle.clone()
    }

    /// Pre-initialization hook: record the component's declared type.
    ///
    /// A no-op when the declared type does not carry the profiling marker,
    /// so hosts may funnel every component through here uniformly.
    pub fn before_init(&self, id: &ComponentId, declared: ComponentType) {
        self.registry.record(id, declared);
    }

    /// Sugar over [`before_init`](ProfilingProcessor::before_init) when the
    /// declared type is known statically.
    pub fn before_init_of<T: Managed>(&self, id: &ComponentId) {
        self.before_init(id, T::managed_type());
    }

    /// Post-initialization hook: replace a managed instance with its proxy.
    ///
    /// Components whose identity was never recorded pass through unchanged,
    /// same allocation in and out. For managed components, the declared
    /// type's wrap function downcasts the instance and builds the proxy for
    /// its strategy. Wrapping happens at most once per identity; a second
    /// attempt fails rather than stacking proxies.
    pub fn after_init(&self, id: &ComponentId, instance: BoxedComponent) -> Result<BoxedComponent> {
        let Some(declared) = self.registry.lookup(id) else {
            return Ok(instance);
        };

        {
            let mut wrapped = self.wrapped.lock().expect("wrapped set lock poisoned");
            if !wrapped.insert(id.clone()) {
                return Err(Error::AlreadyWrapped(id.clone()));
            }
        }

        tracing::debug!(
            component = %id,
            declared = declared.name(),
            strategy = ?declared.strategy(),
            "wrapping managed component"
        );
        let recorder = CallRecorder::new(self.toggle.clone(), self.loggers.logger(declared.name()));
        declared.wrap(instance, recorder)
    }
}
