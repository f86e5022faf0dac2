/// Moves the user interface to the login surface after the session is lost
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self, path: &str);
}

/// Navigator for headless use; only records the redirect in the logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect_to_login(&self, path: &str) {
        tracing::info!(path, "session expired, redirecting to login");
    }
}
