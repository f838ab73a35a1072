use crate::ComponentId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Component instance is not of declared type '{0}'.")]
    TargetTypeMismatch(&'static str),

    #[error("Component '{0}' has already been wrapped.")]
    AlreadyWrapped(ComponentId),

    #[error("Management name '{0}' is already registered.")]
    ManagementNameTaken(String),

    #[error("Declared type '{0}' does not provide a wrapping strategy.")]
    NotWrappable(&'static str),
}
