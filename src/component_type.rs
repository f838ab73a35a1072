use crate::{BoxedComponent, Error, recorder::CallRecorder};

/// Builds a proxy around a type-erased target instance.
///
/// Produced by `#[derive(Profiled)]`; downcasts the instance to the declared
/// concrete type and wraps it in the proxy matching the type's
/// [`WrapStrategy`]. Fails when the instance is not of the declared type.
pub type WrapFn = fn(BoxedComponent, CallRecorder) -> crate::Result<BoxedComponent>;

/// How a managed type gets wrapped, decided once per type.
///
/// - [`Contract`](WrapStrategy::Contract): the declared type exposes at least
///   one public contract (trait); the proxy implements those traits and
///   nothing else, so consumers holding a trait reference get full
///   transparency. Members outside the contracts are unreachable through
///   this proxy by design.
/// - [`Concrete`](WrapStrategy::Concrete): no public contract; the proxy
///   mirrors the type's own intercepted methods. Rust has no runtime
///   subclassing, so the mirror is generated at compile time by
///   `#[intercept]` on the inherent impl block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapStrategy {
    Contract,
    Concrete,
}

/// Descriptor of a component's declared type.
///
/// Recorded in the [`ManagedTypeRegistry`](crate::ManagedTypeRegistry) when
/// the type carries the profiling marker, and consulted at wrap time to pick
/// the strategy and bind the logger. Descriptors are plain data (name,
/// marker, contract list, wrap function) and cheap to copy.
#[derive(Debug, Clone, Copy)]
pub struct ComponentType {
    name: &'static str,
    marker: bool,
    contracts: &'static [&'static str],
    wrap: Option<WrapFn>,
}

impl ComponentType {
    /// Descriptor of a type carrying the profiling marker.
    ///
    /// Called from the `Managed` impl that `#[derive(Profiled)]` generates;
    /// hosts rarely construct these by hand.
    pub fn managed(
        name: &'static str,
        contracts: &'static [&'static str],
        wrap: WrapFn,
    ) -> Self {
        Self {
            name,
            marker: true,
            contracts,
            wrap: Some(wrap),
        }
    }

    /// Descriptor of a type without the marker.
    ///
    /// Lets a host pass every constructed component through
    /// [`ManagedTypeRegistry::record`](crate::ManagedTypeRegistry::record)
    /// uniformly; recording a plain descriptor is a no-op.
    pub fn plain(name: &'static str) -> Self {
        Self {
            name,
            marker: false,
            contracts: &[],
            wrap: None,
        }
    }

    /// The declared type's name, used to bind the logger.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the declared type carries the profiling marker.
    pub fn is_managed(&self) -> bool {
        self.marker
    }

    /// Names of the public contracts the declared type exposes.
    pub fn contracts(&self) -> &'static [&'static str] {
        self.contracts
    }

    /// The wrapping strategy: contract delegation when at least one public
    /// contract is declared, concrete mirroring otherwise.
    pub fn strategy(&self) -> WrapStrategy {
        if self.contracts.is_empty() {
            WrapStrategy::Concrete
        } else {
            WrapStrategy::Contract
        }
    }

    pub(crate) fn wrap(
        &self,
        target: BoxedComponent,
        recorder: CallRecorder,
    ) -> crate::Result<BoxedComponent> {
        match self.wrap {
            Some(wrap) => wrap(target, recorder),
            None => Err(Error::NotWrappable(self.name)),
        }
    }
}

/// Marker for types selected for interception.
///
/// Implemented by `#[derive(Profiled)]`; the host queries it to obtain the
/// [`ComponentType`] descriptor it records before initialization.
pub trait Managed: Send + Sync + 'static {
    fn managed_type() -> ComponentType;
}
