use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use warden_core::AppError;
use warden_domain::UserId;

use crate::error::ApiResult;

/// Header carrying the caller identity, set by the upstream gateway after
/// token verification.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity attached to protected requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
}

pub async fn require_principal(mut request: Request, next: Next) -> ApiResult<Response> {
    let principal = principal_from_headers(request.headers())?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

fn principal_from_headers(headers: &HeaderMap) -> Result<Principal, AppError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("caller identity is not valid text".to_owned()))?;

    let user_id = raw
        .parse::<UserId>()
        .map_err(|_| AppError::Unauthorized("caller identity is not a valid user id".to_owned()))?;

    Ok(Principal { user_id })
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};
    use warden_core::AppError;
    use warden_domain::UserId;

    use super::{USER_ID_HEADER, principal_from_headers};

    #[test]
    fn missing_header_is_unauthorized() {
        let result = principal_from_headers(&HeaderMap::new());

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn malformed_header_is_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("admin"));

        let result = principal_from_headers(&headers);

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn valid_header_yields_principal() -> Result<(), Box<dyn std::error::Error>> {
        let user_id = UserId::new();
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_str(&user_id.to_string())?);

        let principal = principal_from_headers(&headers)?;

        assert_eq!(principal.user_id, user_id);
        Ok(())
    }
}
