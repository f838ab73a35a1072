//! Process-global registry of operator-facing toggle controllers.
//!
//! The host's management transport (an admin endpoint, a debug console, a
//! signal handler) looks a controller up by its well-known name and flips
//! it, without any prior coordination with the code that registered it.
//! Names live for the process lifetime; registering an occupied name fails,
//! which surfaces misconfiguration at startup rather than silently running
//! two layers against one name.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock},
};

use crate::{Error, Result, ToggleController};

/// Well-known name under which [`ProfilingProcessor`](crate::ProfilingProcessor)
/// registers its toggle by default.
pub const CONTROLLER_NAME: &str = "profiling:name=controller";

fn table() -> &'static Mutex<HashMap<String, Arc<ToggleController>>> {
    static TABLE: OnceLock<Mutex<HashMap<String, Arc<ToggleController>>>> = OnceLock::new();
    TABLE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Expose a controller under `name` for the process lifetime.
///
/// Fails with [`Error::ManagementNameTaken`] when the name is occupied.
pub fn register(name: &str, controller: Arc<ToggleController>) -> Result {
    let mut table = table().lock().expect("management table lock poisoned");
    if table.contains_key(name) {
        return Err(Error::ManagementNameTaken(name.to_string()));
    }
    table.insert(name.to_string(), controller);
    Ok(())
}

/// Locate a previously registered controller by name.
pub fn find(name: &str) -> Option<Arc<ToggleController>> {
    let table = table().lock().expect("management table lock poisoned");
    table.get(name).cloned()
}
