use crate::management;

/// Configuration for a [`ProfilingProcessor`](crate::ProfilingProcessor).
///
/// Use the builder pattern to customize, or [`Default`] for the standard
/// setup.
///
/// # Examples
///
/// ```rust
/// use profiled::Config;
///
/// let config = Config::default().with_management_name("billing:name=profiling");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Name under which the toggle controller is exposed to operators.
    /// Default: [`management::CONTROLLER_NAME`].
    pub management_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            management_name: management::CONTROLLER_NAME.to_string(),
        }
    }
}

impl Config {
    /// Set the operator-facing name of the toggle controller.
    ///
    /// Each processor in a process needs its own name; registration fails
    /// at startup when the name is already taken.
    pub fn with_management_name(mut self, name: impl Into<String>) -> Self {
        self.management_name = name.into();
        self
    }
}
