/*
 * Responsibility
 * - GET /balances/{account_id}
 * - Linear read pipeline: extract token → verify → authorize → cache read
 *   → integrity check → respond
 * - Every failure path logs at error level before responding
 */
use axum::{
    extract::{Path, State},
    http::{HeaderMap, header},
};

use crate::error::AppError;
use crate::state::AppState;

/// Read the balance of one account.
///
/// Authorization is per-resource: the `acct` claim of the verified token must
/// equal the requested account id exactly. Authentication and authorization
/// failures produce the same response on purpose.
pub async fn get_balance(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    headers: HeaderMap,
) -> Result<String, AppError> {
    // Strip a literal `Bearer ` prefix if present; otherwise the raw header
    // value (absent → empty) goes to the verifier unchanged.
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw);

    let claims = match state.verifier.verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::error!(error = %err, "failed to retrieve account balance: not authorized");
            return Err(AppError::Unauthorized);
        }
    };

    if claims.acct != account_id {
        tracing::error!(
            requested = %account_id,
            "failed to retrieve account balance: not authorized"
        );
        return Err(AppError::Unauthorized);
    }

    let balance = match state.cache.get_balance(&account_id).await {
        Ok(balance) => balance,
        Err(err) => {
            tracing::error!(
                error = %err,
                backend = state.cache.backend_name(),
                "cache error"
            );
            return Err(AppError::Cache);
        }
    };

    // A negative balance cannot come from a well-behaved upstream; treat it
    // as a data-integrity error rather than a result.
    if balance < 0 {
        tracing::error!(account = %account_id, balance, "negative balance detected");
        return Err(AppError::NegativeBalance);
    }

    Ok(balance.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::api;
    use crate::services::auth::{AccessJwtError, AccessTokenClaims, TokenVerifier};
    use crate::services::cache::client::{BalanceCache, CacheError, CacheResult};
    use crate::state::AppState;

    fn claims(acct: &str) -> AccessTokenClaims {
        AccessTokenClaims {
            acct: acct.to_string(),
            exp: 4102444800, // far future
            iat: None,
            user: None,
            name: None,
        }
    }

    /// Accepts every token and asserts identity `acct`; records what it saw.
    struct StaticVerifier {
        acct: &'static str,
        seen: Mutex<Vec<String>>,
    }

    impl StaticVerifier {
        fn new(acct: &'static str) -> Arc<Self> {
            Arc::new(Self {
                acct,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl TokenVerifier for StaticVerifier {
        fn verify(&self, token: &str) -> Result<AccessTokenClaims, AccessJwtError> {
            self.seen.lock().unwrap().push(token.to_string());
            Ok(claims(self.acct))
        }
    }

    /// Rejects every token, as a real verifier would for a bad signature.
    struct RejectingVerifier;

    impl TokenVerifier for RejectingVerifier {
        fn verify(&self, _token: &str) -> Result<AccessTokenClaims, AccessJwtError> {
            Err(AccessJwtError::Jwt(
                jsonwebtoken::errors::ErrorKind::InvalidToken.into(),
            ))
        }
    }

    struct FixedBalanceCache(i64);

    #[async_trait::async_trait]
    impl BalanceCache for FixedBalanceCache {
        fn backend_name(&self) -> &'static str {
            "fixed"
        }

        async fn get_balance(&self, _account_id: &str) -> CacheResult<i64> {
            Ok(self.0)
        }
    }

    struct FailingCache;

    #[async_trait::async_trait]
    impl BalanceCache for FailingCache {
        fn backend_name(&self) -> &'static str {
            "failing"
        }

        async fn get_balance(&self, account_id: &str) -> CacheResult<i64> {
            Err(CacheError::Miss(account_id.to_string()))
        }
    }

    fn test_app(verifier: Arc<dyn TokenVerifier>, cache: Arc<dyn BalanceCache>) -> Router {
        api::v1::routes().with_state(AppState::new(verifier, cache))
    }

    fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn authorized_request_returns_balance() {
        let app = test_app(StaticVerifier::new("1234"), Arc::new(FixedBalanceCache(550)));

        let resp = app
            .oneshot(get("/balances/1234", Some("Bearer abc123")))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "550");
    }

    #[tokio::test]
    async fn zero_balance_is_a_valid_result() {
        let app = test_app(StaticVerifier::new("1234"), Arc::new(FixedBalanceCache(0)));

        let resp = app
            .oneshot(get("/balances/1234", Some("Bearer abc123")))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "0");
    }

    #[tokio::test]
    async fn mismatched_account_is_unauthorized() {
        // Cache would succeed; the authorization check must fire first.
        let app = test_app(StaticVerifier::new("1234"), Arc::new(FixedBalanceCache(550)));

        let resp = app
            .oneshot(get("/balances/5678", Some("Bearer abc123")))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_string(resp).await, "not authorized");
    }

    #[tokio::test]
    async fn failed_verification_is_unauthorized() {
        let app = test_app(Arc::new(RejectingVerifier), Arc::new(FixedBalanceCache(550)));

        let resp = app
            .oneshot(get("/balances/1234", Some("Bearer bad")))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_string(resp).await, "not authorized");
    }

    #[tokio::test]
    async fn cache_failure_is_an_internal_error() {
        let app = test_app(StaticVerifier::new("1234"), Arc::new(FailingCache));

        let resp = app
            .oneshot(get("/balances/1234", Some("Bearer abc123")))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(resp).await, "cache error");
    }

    #[tokio::test]
    async fn negative_balance_is_an_integrity_error() {
        let app = test_app(StaticVerifier::new("1234"), Arc::new(FixedBalanceCache(-5)));

        let resp = app
            .oneshot(get("/balances/1234", Some("Bearer abc123")))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(resp).await, "negative balance error");
    }

    #[tokio::test]
    async fn bearer_prefix_is_stripped_before_verification() {
        let verifier = StaticVerifier::new("1234");
        let app = test_app(verifier.clone(), Arc::new(FixedBalanceCache(1)));

        app.oneshot(get("/balances/1234", Some("Bearer abc123")))
            .await
            .unwrap();

        assert_eq!(*verifier.seen.lock().unwrap(), vec!["abc123".to_string()]);
    }

    #[tokio::test]
    async fn header_without_prefix_passes_through_unchanged() {
        let verifier = StaticVerifier::new("1234");
        let app = test_app(verifier.clone(), Arc::new(FixedBalanceCache(1)));

        app.oneshot(get("/balances/1234", Some("abc123")))
            .await
            .unwrap();

        assert_eq!(*verifier.seen.lock().unwrap(), vec!["abc123".to_string()]);
    }

    #[tokio::test]
    async fn missing_header_reaches_verifier_as_empty_string() {
        let verifier = StaticVerifier::new("1234");
        let app = test_app(verifier.clone(), Arc::new(FixedBalanceCache(1)));

        app.oneshot(get("/balances/1234", None)).await.unwrap();

        assert_eq!(*verifier.seen.lock().unwrap(), vec![String::new()]);
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized_end_to_end() {
        let app = test_app(Arc::new(RejectingVerifier), Arc::new(FixedBalanceCache(1)));

        let resp = app.oneshot(get("/balances/1234", None)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_string(resp).await, "not authorized");
    }
}
