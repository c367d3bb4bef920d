use super::error::*;
use super::handler;
use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, reject};

/// Everything under `/admin`; the caller mounts the prefix.
pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    session_routes(server.clone()).or(taxonomy_routes(server))
}

fn session_routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let auth = server.auth_service.clone();
    let http = server.http;

    let login_page = warp::path("login")
        .and(warp::path::end())
        .and(warp::get())
        .and(guest_only(auth.clone()))
        .map(handler::login_page);

    let forget_password = warp::path("forget-password")
        .and(warp::path::end())
        .and(warp::get())
        .and(guest_only(auth.clone()))
        .map(handler::forget_password_page);

    let login = warp::path("login")
        .and(warp::path::end())
        .and(warp::post())
        .and(guest_only(auth.clone()))
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::form())
        .and(with(auth.clone()))
        .and(with_http(http))
        .and_then(handler::login);

    let logout = warp::path("logout")
        .and(warp::path::end())
        .and(warp::get())
        .and(token_cookie(TokenKind::Access))
        .and(token_cookie(TokenKind::Refresh))
        .and(with(auth.clone()))
        .and(with_http(http))
        .and_then(handler::logout);

    let refresh = warp::path("refresh")
        .and(warp::path::end())
        .and(warp::post())
        .and(token_cookie(TokenKind::Refresh))
        .and(token_cookie(TokenKind::Access))
        .and(with(auth.clone()))
        .and(with_http(http))
        .and_then(handler::refresh);

    let dashboard = warp::path("dashboard")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_admin_page(auth.clone()))
        .and(with(auth.clone()))
        .and_then(handler::dashboard);

    let admin_create = warp::path("admin-create")
        .and(warp::path::end())
        .and(warp::post())
        .and(guest_only(auth.clone()))
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json())
        .and(with(auth))
        .and_then(handler::create_admin);

    login_page
        .or(login)
        .or(forget_password)
        .or(logout)
        .or(refresh)
        .or(dashboard)
        .or(admin_create)
        .boxed()
}

fn taxonomy_routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let auth = server.auth_service.clone();
    let taxonomy = server.taxonomy_service.clone();
    let http = server.http;

    let api = warp::path("api");
    let kind = warp::path("categories")
        .map(|| TaxonomyKind::Category)
        .or(warp::path("job-types").map(|| TaxonomyKind::JobType))
        .unify();

    let active = api
        .clone()
        .and(warp::path("categories"))
        .and(warp::path("active"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_admin_api(auth.clone()))
        .and(with(taxonomy.clone()))
        .and_then(handler::active_categories);

    let list = api
        .clone()
        .and(kind.clone())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_admin_api(auth.clone()))
        .and(warp::query::<handler::ListQuery>())
        .and(with(taxonomy.clone()))
        .and(with_http(http))
        .and_then(handler::list_entries);

    let create = api
        .clone()
        .and(kind.clone())
        .and(warp::path::end())
        .and(warp::post())
        .and(with_admin_api(auth.clone()))
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json())
        .and(with(taxonomy.clone()))
        .and_then(handler::create_entry);

    let get = api
        .clone()
        .and(kind.clone())
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_admin_api(auth.clone()))
        .and(with(taxonomy.clone()))
        .and_then(handler::get_entry);

    let update = api
        .clone()
        .and(kind.clone())
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::put())
        .and(with_admin_api(auth.clone()))
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json())
        .and(with(taxonomy.clone()))
        .and_then(handler::update_entry);

    let delete = api
        .clone()
        .and(kind.clone())
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_admin_api(auth.clone()))
        .and(with(taxonomy.clone()))
        .and_then(handler::delete_entry);

    let toggle = api
        .clone()
        .and(kind.clone())
        .and(warp::path::param::<i64>())
        .and(warp::path("status"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_admin_api(auth.clone()))
        .and(with(taxonomy.clone()))
        .and_then(handler::toggle_entry);

    let subcategories = api.and(warp::path("subcategories"));

    let sub_list = subcategories
        .clone()
        .and(warp::path::end())
        .and(warp::get())
        .and(with_admin_api(auth.clone()))
        .and(warp::query::<handler::ListQuery>())
        .and(with(taxonomy.clone()))
        .and(with_http(http))
        .and_then(handler::list_subcategories);

    let sub_create = subcategories
        .clone()
        .and(warp::path::end())
        .and(warp::post())
        .and(with_admin_api(auth.clone()))
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json())
        .and(with(taxonomy.clone()))
        .and_then(handler::create_subcategory);

    let sub_get = subcategories
        .clone()
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_admin_api(auth.clone()))
        .and(with(taxonomy.clone()))
        .and_then(handler::get_subcategory);

    let sub_update = subcategories
        .clone()
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::put())
        .and(with_admin_api(auth.clone()))
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json())
        .and(with(taxonomy.clone()))
        .and_then(handler::update_subcategory);

    let sub_delete = subcategories
        .clone()
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_admin_api(auth.clone()))
        .and(with(taxonomy.clone()))
        .and_then(handler::delete_subcategory);

    let sub_toggle = subcategories
        .clone()
        .and(warp::path::param::<i64>())
        .and(warp::path("status"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_admin_api(auth))
        .and(with(taxonomy))
        .and_then(handler::toggle_subcategory);

    let kinds = active
        .or(list)
        .or(create)
        .or(get)
        .or(update)
        .or(delete)
        .or(toggle)
        .boxed();
    let subs = sub_list
        .or(sub_create)
        .or(sub_get)
        .or(sub_update)
        .or(sub_delete)
        .or(sub_toggle)
        .boxed();

    kinds.or(subs)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

fn with_http(http: HttpPolicy) -> impl Filter<Extract = (HttpPolicy,), Error = Infallible> + Clone {
    warp::any().map(move || http)
}

fn token_cookie(
    kind: TokenKind,
) -> impl Filter<Extract = (Option<String>,), Error = Infallible> + Clone {
    warp::cookie::optional::<String>(kind.cookie_name())
}

/// Runs the full access-token check. Store failures count as a failed check.
fn authenticate(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (Result<AdminId, AuthError>,), Error = Infallible> + Clone {
    token_cookie(TokenKind::Access).and_then(move |token: Option<String>| {
        let auth_service = auth_service.clone();
        async move {
            let outcome = auth_service.authenticate(token.as_deref()).await;
            match &outcome {
                Ok(_) => {}
                Err(e) if e.is_unauthorized() => debug!(reason = %e, "access check failed"),
                Err(e) => warn!(reason = %e, "access check failed"),
            }
            Ok::<_, Infallible>(outcome)
        }
    })
}

/// Browser pages: no live session redirects to the login page.
fn with_admin_page(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (AdminId,), Error = warp::Rejection> + Clone {
    authenticate(auth_service).and_then(|outcome: Result<AdminId, AuthError>| async move {
        outcome.map_err(|_| reject::custom(LoginRequired))
    })
}

/// JSON API: no live session is a uniform 401.
fn with_admin_api(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (AdminId,), Error = warp::Rejection> + Clone {
    authenticate(auth_service).and_then(|outcome: Result<AdminId, AuthError>| async move {
        outcome.map_err(|_| reject::custom(ApiErrorCode::Unauthorized))
    })
}

/// Login-only resources: a live session redirects to the dashboard.
fn guest_only(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
    authenticate(auth_service)
        .and_then(|outcome: Result<AdminId, AuthError>| async move {
            match outcome {
                Ok(_) => Err(reject::custom(AlreadyAuthenticated)),
                Err(_) => Ok(()),
            }
        })
        .untuple_one()
}
