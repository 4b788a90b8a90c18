use tokio_util::sync::CancellationToken;

/// Cooperative cancellation for in-progress requests.
///
/// Checked before every re-issue (redirect or re-login), never in the middle of a POST.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Point-in-time view of a client's mutable session state (facts only).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session: Option<String>,
    pub redirect_prefix: String,
    pub auth_attempts: u32,
    pub redirect_attempts: u32,
}
