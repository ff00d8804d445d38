use std::future::Future;
use std::time::Duration;

use warden_core::{AppError, AppResult};

/// Runs `future` under a deadline.
///
/// An elapsed deadline drops the in-flight future and yields
/// `AppError::Unavailable`; the outcome of its side effects is unknown.
pub async fn with_deadline<T, F>(operation: &str, timeout: Duration, future: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Unavailable(format!(
            "{operation} did not complete within {} ms",
            timeout.as_millis()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use warden_core::AppError;

    use super::with_deadline;

    #[tokio::test(start_paused = true)]
    async fn elapsed_deadline_is_unavailable() {
        let result = with_deadline("slow call", Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, AppError>(())
        })
        .await;

        assert!(matches!(result, Err(AppError::Unavailable(_))));
    }

    #[tokio::test]
    async fn inner_error_is_passed_through() {
        let result: Result<(), AppError> =
            with_deadline("failing call", Duration::from_secs(1), async {
                Err(AppError::NotFound("link".to_owned()))
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
