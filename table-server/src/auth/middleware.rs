//! 认证中间件

use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use shared::error::ErrorCode;

use super::{CurrentUser, Role, USER_ID_HEADER, USER_ROLE_HEADER};
use crate::utils::AppError;

/// 身份中间件 - 解析上游身份头
///
/// 头完整且合法时将 [`CurrentUser`] 注入请求扩展；缺失时放行 (公共路由)，
/// 由 [`require_role`] 决定是否拒绝。角色非法返回 401。
pub async fn identify(mut req: Request, next: Next) -> Result<Response, AppError> {
    let user_id = header_value(req.headers(), USER_ID_HEADER);
    let role = header_value(req.headers(), USER_ROLE_HEADER);

    match (user_id, role) {
        (Some(id), Some(role)) => {
            let role: Role = role.parse().map_err(|e: String| {
                tracing::warn!(target: "security", event = "auth_bad_role", user_id = %id, error = %e);
                AppError::with_message(ErrorCode::NotAuthenticated, e)
            })?;
            req.extensions_mut().insert(CurrentUser { id, role });
        }
        (Some(id), None) => {
            tracing::warn!(target: "security", event = "auth_missing_role", user_id = %id);
        }
        _ => {}
    }

    Ok(next.run(req).await)
}

/// 非空身份头 (去除首尾空白)
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 角色检查中间件 - 要求特定角色
///
/// # 用法
///
/// ```ignore
/// Router::new()
///     .route("/api/reports/top-products", get(handler::top_products))
///     .layer(middleware::from_fn(require_role(Role::Manager)));
/// ```
///
/// # 错误
///
/// 未认证返回 401，角色不足返回 403
pub fn require_role(
    required: Role,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            check_role(&req, required)?;
            Ok(next.run(req).await)
        })
    }
}

fn check_role(req: &Request, required: Role) -> Result<(), AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::not_authenticated)?;

    if !user.role.satisfies(required) {
        tracing::warn!(
            target: "security",
            event = "role_denied",
            user_id = %user.id,
            role = %user.role,
            required = %required,
            uri = %req.uri()
        );
        let code = match required {
            Role::Manager => ErrorCode::ManagerRequired,
            Role::Staff => ErrorCode::PermissionDenied,
        };
        return Err(AppError::new(code));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn assert_send<T: Send>(_: T) {}

    // from_fn 要求中间件 future 为 Send
    #[allow(dead_code)]
    fn middleware_futures_are_send(req: Request, next: Next) {
        assert_send(identify(req, next));
    }

    fn request_with(headers: &[(&str, &str)]) -> Request {
        let mut builder = axum::http::Request::builder().uri("/api/orders");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_header_value_trims_and_skips_blank() {
        let req = request_with(&[(USER_ID_HEADER, "  staff-7 "), (USER_ROLE_HEADER, "   ")]);
        assert_eq!(header_value(req.headers(), USER_ID_HEADER).as_deref(), Some("staff-7"));
        assert_eq!(header_value(req.headers(), USER_ROLE_HEADER), None);
        assert_eq!(header_value(req.headers(), "x-missing"), None);
    }

    #[test]
    fn test_check_role() {
        let mut req = request_with(&[]);
        let err = check_role(&req, Role::Staff).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);

        req.extensions_mut().insert(CurrentUser {
            id: "staff-7".into(),
            role: Role::Staff,
        });
        assert!(check_role(&req, Role::Staff).is_ok());
        let err = check_role(&req, Role::Manager).unwrap_err();
        assert_eq!(err.code, ErrorCode::ManagerRequired);
    }
}
