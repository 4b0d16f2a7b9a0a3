use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};

/// Lifetime of a visible screen. Requests run through [`ScreenScope::run`]
/// resolve to [`AppError::Cancelled`] once the screen is left, so their
/// results never reach stale state.
#[derive(Debug, Clone, Default)]
pub struct ScreenScope {
    token: CancellationToken,
}

impl ScreenScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nested scope (modal, sheet) that closes together with its parent.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn close(&self) {
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn run<T, F>(&self, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        if self.is_closed() {
            return Err(AppError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                tracing::debug!("request dropped, screen scope closed");
                Err(AppError::Cancelled)
            }
            result = fut => {
                if self.is_closed() {
                    Err(AppError::Cancelled)
                } else {
                    result
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_scope_passes_result_through() {
        let scope = ScreenScope::new();
        let value = scope.run(async { Ok::<_, AppError>(5) }).await.unwrap();
        assert_eq!(value, 5);
    }

    #[tokio::test]
    async fn closing_parent_cancels_child_requests() {
        let scope = ScreenScope::new();
        let modal = scope.child();
        scope.close();

        let result = modal.run(async { Ok::<_, AppError>(1) }).await;
        assert!(matches!(result, Err(AppError::Cancelled)));
    }

    #[tokio::test]
    async fn pending_request_is_abandoned_on_close() {
        let scope = ScreenScope::new();
        let closer = scope.clone();
        let pending = scope.run(async {
            std::future::pending::<()>().await;
            Ok::<_, AppError>(())
        });
        closer.close();
        assert!(matches!(pending.await, Err(AppError::Cancelled)));
    }
}
