use super::handler::ApiResponse;
use crate::application_port::*;
use crate::logger::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use warp::filters::body::BodyDeserializeError;
use warp::http::{StatusCode, Uri};
use warp::reject::{InvalidQuery, MethodNotAllowed};
use warp::{Rejection, Reply, reject};

pub const LOGIN_PATH: &str = "/admin/login";
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

/// A page route was hit without a live session.
#[derive(Debug)]
pub struct LoginRequired;

impl reject::Reject for LoginRequired {}

/// A guest-only route was hit with a live session.
#[derive(Debug)]
pub struct AlreadyAuthenticated;

impl reject::Reject for AlreadyAuthenticated {}

pub async fn recover_error(err: Rejection) -> Result<warp::reply::Response, Infallible> {
    if err.find::<LoginRequired>().is_some() {
        return Ok(warp::redirect::see_other(Uri::from_static(LOGIN_PATH)).into_response());
    }
    if err.find::<AlreadyAuthenticated>().is_some() {
        return Ok(warp::redirect::see_other(Uri::from_static(DASHBOARD_PATH)).into_response());
    }

    let (code, message) = if let Some(code) = err.find::<ApiErrorCode>() {
        (*code, code.to_string())
    } else if let Some(e) = err.find::<BodyDeserializeError>() {
        // a matched route rejecting its input outranks sibling method mismatches
        (ApiErrorCode::BadRequest, e.to_string())
    } else if let Some(e) = err.find::<InvalidQuery>() {
        (ApiErrorCode::BadRequest, e.to_string())
    } else if err.find::<MethodNotAllowed>().is_some() {
        (
            ApiErrorCode::MethodNotAllowed,
            ApiErrorCode::MethodNotAllowed.to_string(),
        )
    } else if err.is_not_found() {
        (ApiErrorCode::NotFound, ApiErrorCode::NotFound.to_string())
    } else {
        error!("unhandled rejection: {:?}", err);
        (ApiErrorCode::InternalError, ApiErrorCode::InternalError.to_string())
    };

    let json = warp::reply::json(&ApiResponse::<()>::err(code, message));
    Ok(warp::reply::with_status(json, code.status()).into_response())
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Not found")]
    NotFound,
    #[error("Validation failed")]
    ValidationFailed,
    #[error("Already exists")]
    Conflict,
    #[error("Bad request")]
    BadRequest,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            ApiErrorCode::Conflict => StatusCode::CONFLICT,
            ApiErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ApiErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<AuthError> for ApiErrorCode {
    fn from(error: AuthError) -> Self {
        match error {
            e if e.is_unauthorized() => {
                debug!(reason = %e, "unauthorized");
                ApiErrorCode::Unauthorized
            }
            AuthError::InvalidCredentials => ApiErrorCode::Unauthorized,
            AuthError::CredentialsRequired | AuthError::InvalidInput(_) => {
                ApiErrorCode::BadRequest
            }
            AuthError::AdminExists => ApiErrorCode::Conflict,
            e => ApiErrorCode::internal(e),
        }
    }
}

impl From<TaxonomyError> for ApiErrorCode {
    fn from(error: TaxonomyError) -> Self {
        match error {
            TaxonomyError::NotFound(what) => {
                debug!(%what, "not found");
                ApiErrorCode::NotFound
            }
            TaxonomyError::Validation(_) => ApiErrorCode::ValidationFailed,
            TaxonomyError::Store(e) => ApiErrorCode::internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AuthError::MissingToken)]
    #[case(AuthError::InvalidSignature)]
    #[case(AuthError::Expired)]
    #[case(AuthError::SessionNotFound)]
    #[case(AuthError::InvalidCredentials)]
    fn auth_failures_collapse_to_unauthorized(#[case] error: AuthError) {
        assert_eq!(ApiErrorCode::from(error), ApiErrorCode::Unauthorized);
    }

    #[test]
    fn store_failures_stay_generic() {
        let code = ApiErrorCode::from(AuthError::StoreUnavailable("redis down".into()));
        assert_eq!(code, ApiErrorCode::InternalError);
        assert_eq!(code.to_string(), "Internal error");
        assert_eq!(code.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn login_required_recovers_into_a_redirect() {
        let res = recover_error(reject::custom(LoginRequired)).await.unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()["location"], LOGIN_PATH);
    }

    #[tokio::test]
    async fn not_found_recovers_into_404() {
        let res = recover_error(reject::not_found()).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
