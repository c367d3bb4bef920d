use super::cookies::*;
use super::error::*;
use super::views;
use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;
use crate::server::HttpPolicy;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::{StatusCode, Uri};
use warp::{self, Reply, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// 422 body: every field error plus what was submitted.
#[derive(Debug, Serialize)]
pub struct ValidationResponse<I> {
    pub success: bool,
    pub error: ApiError,
    pub errors: FieldErrors,
    pub input: I,
}

fn reply_created<T: Serialize>(data: T) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&ApiResponse::ok(data)), StatusCode::CREATED)
}

fn reply_ok<T: Serialize>(data: T) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&ApiResponse::ok(data)), StatusCode::OK)
}

/// Validation failures become a 422 reply; anything else is a rejection.
fn reply_failed<I: Serialize>(
    error: TaxonomyError,
    input: &I,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, warp::Rejection> {
    match error {
        TaxonomyError::Validation(errors) => {
            let code = ApiErrorCode::ValidationFailed;
            let body = ValidationResponse {
                success: false,
                error: ApiError {
                    code,
                    message: code.to_string(),
                },
                errors,
                input,
            };
            Ok(warp::reply::with_status(warp::reply::json(&body), code.status()))
        }
        other => Err(reject::custom(ApiErrorCode::from(other))),
    }
}

// region session

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub remember: Option<String>,
}

impl LoginForm {
    /// Checkbox semantics: present means on unless explicitly switched off.
    fn remember(&self) -> bool {
        self.remember
            .as_deref()
            .is_some_and(|v| !matches!(v.trim(), "off" | "false" | "0"))
    }
}

pub fn login_page() -> impl Reply {
    warp::reply::html(views::login_page(None, ""))
}

pub fn forget_password_page() -> impl Reply {
    warp::reply::html(views::forget_password_page())
}

pub async fn login(
    form: LoginForm,
    auth_service: Arc<dyn AuthService>,
    http: HttpPolicy,
) -> Result<warp::reply::Response, warp::Rejection> {
    let remember = form.remember();
    let input = LoginInput {
        email: form.email.clone(),
        password: form.password,
        remember,
    };
    match auth_service.login(input).await {
        Ok(tokens) => {
            let cookies = [
                session_cookie(TokenKind::Access, &tokens.access, http.secure_cookies),
                session_cookie(TokenKind::Refresh, &tokens.refresh, http.secure_cookies),
            ];
            let redirect = warp::redirect::see_other(Uri::from_static(DASHBOARD_PATH));
            with_cookies(redirect, &cookies).map_err(reject::custom)
        }
        Err(e @ (AuthError::InvalidCredentials | AuthError::CredentialsRequired)) => {
            let message = match e {
                AuthError::CredentialsRequired => "Email and password required",
                _ => "Invalid email or password",
            };
            let page = views::login_page(Some(message), &form.email);
            Ok(warp::reply::with_status(warp::reply::html(page), StatusCode::UNAUTHORIZED)
                .into_response())
        }
        Err(e) => Err(reject::custom(ApiErrorCode::internal(e))),
    }
}

/// Unguarded: whatever cookies are presented get revoked, then cleared.
pub async fn logout(
    access_token: Option<String>,
    refresh_token: Option<String>,
    auth_service: Arc<dyn AuthService>,
    http: HttpPolicy,
) -> Result<warp::reply::Response, warp::Rejection> {
    auth_service
        .logout(LogoutInput {
            access_token,
            refresh_token,
        })
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let cookies = [
        clear_cookie(TokenKind::Access, http.secure_cookies),
        clear_cookie(TokenKind::Refresh, http.secure_cookies),
    ];
    let redirect = warp::redirect::see_other(Uri::from_static(LOGIN_PATH));
    with_cookies(redirect, &cookies).map_err(reject::custom)
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

pub async fn refresh(
    refresh_token: Option<String>,
    access_token: Option<String>,
    auth_service: Arc<dyn AuthService>,
    http: HttpPolicy,
) -> Result<warp::reply::Response, warp::Rejection> {
    let issued = auth_service
        .refresh(refresh_token.as_deref(), access_token.as_deref())
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let cookie = session_cookie(TokenKind::Access, &issued, http.secure_cookies);
    let body = warp::reply::json(&ApiResponse::ok(RefreshResponse {
        expires_at: issued.expires_at,
    }));
    with_cookies(body, &[cookie]).map_err(reject::custom)
}

pub async fn dashboard(
    admin_id: AdminId,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl Reply, warp::Rejection> {
    let admin = auth_service
        .current_admin(admin_id)
        .await
        .map_err(|e| match e {
            e if e.is_unauthorized() => reject::custom(LoginRequired),
            e => reject::custom(ApiErrorCode::internal(e)),
        })?;
    Ok(warp::reply::html(views::dashboard_page(&admin)))
}

#[derive(Debug, Deserialize)]
pub struct NewAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub async fn create_admin(
    body: NewAdminRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl Reply, warp::Rejection> {
    let profile = auth_service
        .create_initial_admin(NewAdminInput {
            name: body.name,
            email: body.email,
            password: body.password,
        })
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(reply_created(profile))
}

// endregion

// region taxonomy

/// Raw listing query. Everything is parsed leniently; junk is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub last_id: Option<String>,
    pub page_size: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub category_id: Option<String>,
}

impl ListQuery {
    fn page(&self, http: &HttpPolicy) -> PageRequest {
        http.page_policy
            .from_query(self.last_id.as_deref(), self.page_size.as_deref())
    }

    fn filter(&self) -> ListFilter {
        let non_empty = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        ListFilter {
            search: non_empty(&self.search),
            status: non_empty(&self.status)
                .and_then(|s| s.parse::<i32>().ok())
                .and_then(|s| Status::try_from(s).ok()),
            created_on: non_empty(&self.created_at)
                .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
            category_id: non_empty(&self.category_id)
                .and_then(|s| s.parse::<i64>().ok())
                .filter(|id| *id > 0),
        }
    }
}

pub async fn list_entries(
    kind: TaxonomyKind,
    admin_id: AdminId,
    query: ListQuery,
    taxonomy_service: Arc<dyn TaxonomyService>,
    http: HttpPolicy,
) -> Result<impl Reply, warp::Rejection> {
    let filter = query.filter();
    debug!(%admin_id, %kind, ?filter, "list");
    let page = taxonomy_service
        .list(kind, filter, query.page(&http))
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(reply_ok(page))
}

pub async fn get_entry(
    kind: TaxonomyKind,
    id: i64,
    _admin_id: AdminId,
    taxonomy_service: Arc<dyn TaxonomyService>,
) -> Result<impl Reply, warp::Rejection> {
    let entry = taxonomy_service
        .get(kind, id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(reply_ok(entry))
}

pub async fn create_entry(
    kind: TaxonomyKind,
    admin_id: AdminId,
    form: TaxonomyForm,
    taxonomy_service: Arc<dyn TaxonomyService>,
) -> Result<impl Reply, warp::Rejection> {
    debug!(%admin_id, %kind, "create");
    match taxonomy_service.create(kind, form.clone()).await {
        Ok(entry) => Ok(reply_created(entry)),
        Err(e) => reply_failed(e, &form),
    }
}

pub async fn update_entry(
    kind: TaxonomyKind,
    id: i64,
    admin_id: AdminId,
    form: TaxonomyForm,
    taxonomy_service: Arc<dyn TaxonomyService>,
) -> Result<impl Reply, warp::Rejection> {
    debug!(%admin_id, %kind, id, "update");
    match taxonomy_service.update(kind, id, form.clone()).await {
        Ok(entry) => Ok(reply_ok(entry)),
        Err(e) => reply_failed(e, &form),
    }
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: i64,
}

pub async fn delete_entry(
    kind: TaxonomyKind,
    id: i64,
    admin_id: AdminId,
    taxonomy_service: Arc<dyn TaxonomyService>,
) -> Result<impl Reply, warp::Rejection> {
    debug!(%admin_id, %kind, id, "delete");
    taxonomy_service
        .delete(kind, id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(reply_ok(Deleted { id }))
}

pub async fn toggle_entry(
    kind: TaxonomyKind,
    id: i64,
    admin_id: AdminId,
    taxonomy_service: Arc<dyn TaxonomyService>,
) -> Result<impl Reply, warp::Rejection> {
    debug!(%admin_id, %kind, id, "toggle status");
    let entry = taxonomy_service
        .toggle_status(kind, id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(reply_ok(entry))
}

pub async fn active_categories(
    _admin_id: AdminId,
    taxonomy_service: Arc<dyn TaxonomyService>,
) -> Result<impl Reply, warp::Rejection> {
    let categories = taxonomy_service
        .active_categories()
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(reply_ok(categories))
}

pub async fn list_subcategories(
    admin_id: AdminId,
    query: ListQuery,
    taxonomy_service: Arc<dyn TaxonomyService>,
    http: HttpPolicy,
) -> Result<impl Reply, warp::Rejection> {
    let filter = query.filter();
    debug!(%admin_id, ?filter, "list subcategories");
    let page = taxonomy_service
        .list_subcategories(filter, query.page(&http))
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(reply_ok(page))
}

pub async fn get_subcategory(
    id: i64,
    _admin_id: AdminId,
    taxonomy_service: Arc<dyn TaxonomyService>,
) -> Result<impl Reply, warp::Rejection> {
    let entry = taxonomy_service
        .get_subcategory(id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(reply_ok(entry))
}

pub async fn create_subcategory(
    admin_id: AdminId,
    form: SubcategoryForm,
    taxonomy_service: Arc<dyn TaxonomyService>,
) -> Result<impl Reply, warp::Rejection> {
    debug!(%admin_id, "create subcategory");
    match taxonomy_service.create_subcategory(form.clone()).await {
        Ok(entry) => Ok(reply_created(entry)),
        Err(e) => reply_failed(e, &form),
    }
}

pub async fn update_subcategory(
    id: i64,
    admin_id: AdminId,
    form: SubcategoryForm,
    taxonomy_service: Arc<dyn TaxonomyService>,
) -> Result<impl Reply, warp::Rejection> {
    debug!(%admin_id, id, "update subcategory");
    match taxonomy_service.update_subcategory(id, form.clone()).await {
        Ok(entry) => Ok(reply_ok(entry)),
        Err(e) => reply_failed(e, &form),
    }
}

pub async fn delete_subcategory(
    id: i64,
    admin_id: AdminId,
    taxonomy_service: Arc<dyn TaxonomyService>,
) -> Result<impl Reply, warp::Rejection> {
    debug!(%admin_id, id, "delete subcategory");
    taxonomy_service
        .delete_subcategory(id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(reply_ok(Deleted { id }))
}

pub async fn toggle_subcategory(
    id: i64,
    admin_id: AdminId,
    taxonomy_service: Arc<dyn TaxonomyService>,
) -> Result<impl Reply, warp::Rejection> {
    debug!(%admin_id, id, "toggle subcategory status");
    let entry = taxonomy_service
        .toggle_subcategory_status(id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(reply_ok(entry))
}

// endregion
