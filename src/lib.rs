//! Profiled - transparent method interception
//!
//! A small interception layer that wraps selected components so every public
//! method call is logged with its argument bindings and return value, and -
//! when the runtime toggle is enabled - with start/end timestamps for latency
//! measurement. The toggle can be flipped by an operator while the process is
//! running, through the [`management`] registry.
//!
//! See `demos/exchange.rs` for a complete host-container walkthrough.

mod component_id;
mod component_type;
mod config;
mod error;
mod log_sink;
mod processor;
mod proxy;
mod recorder;
mod registry;
mod toggle;

pub mod management;

pub use component_id::ComponentId;
pub use component_type::{ComponentType, Managed, WrapFn, WrapStrategy};
pub use config::Config;
pub use error::Error;
pub use log_sink::{LogSink, LoggerProvider, TracingLoggerProvider};
pub use processor::ProfilingProcessor;
pub use proxy::{ConcreteProxy, ContractProxy};
pub use recorder::CallRecorder;
pub use registry::ManagedTypeRegistry;
pub use toggle::ToggleController;

#[cfg(feature = "macros")]
pub use profiled_macros::{Profiled, intercept};

pub type Result<T = ()> = std::result::Result<T, Error>;

/// A type-erased component instance as handed around by the host container.
pub type BoxedComponent = Box<dyn std::any::Any + Send + Sync>;
