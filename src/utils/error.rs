use std::fmt;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    ModelError(String),
    NotFound(String),
    InvalidRequest(String),
    PermissionDenied(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::ModelError(msg) => write!(f, "Model error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Hosted-database permission failures are reported apart from ordinary
/// errors: the full detail is always logged, but it only reaches the
/// response body in debug builds.
pub fn is_permission_error(detail: &str) -> bool {
    let lower = detail.to_lowercase();
    lower.contains("not authorized")
        || lower.contains("unauthorized")
        || lower.contains("permission denied")
        || lower.contains("command insert not allowed")
}

fn capture_permission_error(context: &str, detail: &str) -> String {
    log::error!("🚫 Permission denied during {}: {}", context, detail);
    if cfg!(debug_assertions) {
        format!("Permission denied during {}: {}", context, detail)
    } else {
        "Permission denied".to_string()
    }
}

/// Maps a raw database error into a response message, routing permission
/// failures through the capture path above.
pub fn db_error(context: &str, detail: impl fmt::Display) -> String {
    let detail = detail.to_string();
    if is_permission_error(&detail) {
        capture_permission_error(context, &detail)
    } else {
        format!("Database error during {}: {}", context, detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::NotFound("passion".to_string());
        assert_eq!(err.to_string(), "Not found: passion");
        let err = AppError::ModelError("timeout".to_string());
        assert_eq!(err.to_string(), "Model error: timeout");
    }

    #[test]
    fn test_permission_detection() {
        assert!(is_permission_error("(Unauthorized) not authorized on app to execute command"));
        assert!(is_permission_error("user is not authorized to perform insert"));
        assert!(!is_permission_error("connection refused"));
        assert!(!is_permission_error("E11000 duplicate key"));
    }

    #[test]
    fn test_db_error_passthrough() {
        let msg = db_error("fetching profile", "connection reset");
        assert_eq!(msg, "Database error during fetching profile: connection reset");
    }

    #[test]
    fn test_db_error_permission_detail_in_debug() {
        let msg = db_error("saving results", "command failed: not authorized on app");
        // Tests run as a debug build, so the context and detail survive
        assert!(msg.contains("saving results"));
        assert!(msg.contains("not authorized"));
    }
}
