//! Internal diagnostic callback.
//!
//! The renderer cannot log through itself, so conditions it recovers from
//! (failed width queries, signal registration errors, dropped events) are
//! reported to an optional process-wide callback instead.

use std::sync::{Mutex, OnceLock, PoisonError};

/// Severity of an internal diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagLevel {
    Debug,
    Warn,
    Error,
}

type DiagCallback = Box<dyn Fn(DiagLevel, &str) + Send + Sync + 'static>;

fn diag_callback() -> &'static Mutex<Option<DiagCallback>> {
    static CALLBACK: OnceLock<Mutex<Option<DiagCallback>>> = OnceLock::new();
    CALLBACK.get_or_init(|| Mutex::new(None))
}

/// Set the global diagnostic callback, replacing any previous one.
pub fn set_diag_callback<F>(callback: F)
where
    F: Fn(DiagLevel, &str) + Send + Sync + 'static,
{
    let mut guard = diag_callback()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    *guard = Some(Box::new(callback));
}

/// Remove the global diagnostic callback.
pub fn clear_diag_callback() {
    let mut guard = diag_callback()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    *guard = None;
}

/// Report a diagnostic. Discarded when no callback is registered.
pub fn emit_diag(level: DiagLevel, message: &str) {
    if let Ok(guard) = diag_callback().lock() {
        if let Some(callback) = guard.as_ref() {
            callback(level, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_diag_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        set_diag_callback(move |level, msg| {
            seen_clone.lock().unwrap().push((level, msg.to_string()));
        });
        emit_diag(DiagLevel::Warn, "diag-unit-test");
        clear_diag_callback();
        emit_diag(DiagLevel::Warn, "after-clear");

        let seen = seen.lock().unwrap();
        assert!(seen.contains(&(DiagLevel::Warn, "diag-unit-test".to_string())));
        assert!(!seen.iter().any(|(_, m)| m == "after-clear"));
    }
}
