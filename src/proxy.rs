use crate::recorder::CallRecorder;

/// Contract-delegation proxy: the stand-in for a managed component that
/// exposes at least one public contract.
///
/// The proxy owns the original instance exclusively and implements - via
/// `#[intercept]` on each contract impl - every intercepted trait of the
/// target, routing each call through its [`CallRecorder`]. It deliberately
/// has no inherent methods of its own beyond the hidden interception hooks,
/// so consumers holding a contract reference get full transparency while
/// concrete-type-only members stay unreachable. That asymmetry is a
/// documented limitation of the contract strategy, not a defect.
pub struct ContractProxy<T> {
    target: T,
    recorder: CallRecorder,
}

impl<T> ContractProxy<T> {
    pub fn new(target: T, recorder: CallRecorder) -> Self {
        Self { target, recorder }
    }

    #[doc(hidden)]
    pub fn __intercept<'a, R>(
        &'a self,
        method: &'static str,
        binding: String,
        call: impl FnOnce(&'a T) -> R,
        render: impl FnOnce(&R) -> String,
    ) -> R {
        self.recorder
            .record(method, &binding, move || call(&self.target), render)
    }

    #[doc(hidden)]
    pub fn __intercept_mut<'a, R>(
        &'a mut self,
        method: &'static str,
        binding: String,
        call: impl FnOnce(&'a mut T) -> R,
        render: impl FnOnce(&R) -> String,
    ) -> R {
        let Self { target, recorder } = self;
        recorder.record(method, &binding, move || call(target), render)
    }
}

/// Concrete-mirroring backbone: holds the target and recorder for a managed
/// component without a public contract.
///
/// Rust has no runtime subclassing, so the "generated subtype" of the
/// original design is rendered at compile time: `#[intercept]` on the
/// target's inherent impl block synthesizes a local `{Type}Proxy` struct
/// next to the target, with each method mirrored under its original
/// signature and visibility and delegating through this type's
/// interception hooks. Methods the target never declared simply do not
/// exist on the generated proxy, which makes calling them a type error
/// rather than a runtime check.
pub struct ConcreteProxy<T> {
    target: T,
    recorder: CallRecorder,
}

impl<T> ConcreteProxy<T> {
    pub fn new(target: T, recorder: CallRecorder) -> Self {
        Self { target, recorder }
    }

    #[doc(hidden)]
    pub fn __intercept<'a, R>(
        &'a self,
        method: &'static str,
        binding: String,
        call: impl FnOnce(&'a T) -> R,
        render: impl FnOnce(&R) -> String,
    ) -> R {
        self.recorder
            .record(method, &binding, move || call(&self.target), render)
    }

    #[doc(hidden)]
    pub fn __intercept_mut<'a, R>(
        &'a mut self,
        method: &'static str,
        binding: String,
        call: impl FnOnce(&'a mut T) -> R,
        render: impl FnOnce(&R) -> String,
    ) -> R {
        let Self { target, recorder } = self;
        recorder.record(method, &binding, move || call(target), render)
    }
}
