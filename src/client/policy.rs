/// Default bound for both retry budgets.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// What to do with a response that asks for another round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    Retry,
    Fail,
}

/// Bounds for redirect following and re-authentication.
///
/// The two budgets are independent: a redirect never consumes an auth attempt and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_auth_attempts: u32,
    pub max_redirect_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_auth_attempts: DEFAULT_MAX_ATTEMPTS,
            max_redirect_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_auth_attempts(mut self, n: u32) -> Self {
        self.max_auth_attempts = n;
        self
    }

    pub fn with_max_redirect_attempts(mut self, n: u32) -> Self {
        self.max_redirect_attempts = n;
        self
    }

    /// `attempts` is the number of redirects already followed in this exchange.
    pub(crate) fn on_redirect(&self, attempts: u32) -> Decision {
        if attempts < self.max_redirect_attempts {
            Decision::Retry
        } else {
            Decision::Fail
        }
    }

    /// `attempts` is the number of re-logins already spent on this request.
    pub(crate) fn on_session_expired(&self, attempts: u32) -> Decision {
        if attempts < self.max_auth_attempts {
            Decision::Retry
        } else {
            Decision::Fail
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_ten() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_auth_attempts, 10);
        assert_eq!(policy.max_redirect_attempts, 10);
    }

    #[test]
    fn tenth_attempt_is_last_retry() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.on_redirect(0), Decision::Retry);
        assert_eq!(policy.on_redirect(9), Decision::Retry);
        assert_eq!(policy.on_redirect(10), Decision::Fail);
        assert_eq!(policy.on_session_expired(9), Decision::Retry);
        assert_eq!(policy.on_session_expired(10), Decision::Fail);
    }

    #[test]
    fn zero_budget_never_retries() {
        let policy = RetryPolicy::new()
            .with_max_auth_attempts(0)
            .with_max_redirect_attempts(0);
        assert_eq!(policy.on_redirect(0), Decision::Fail);
        assert_eq!(policy.on_session_expired(0), Decision::Fail);
    }
}
