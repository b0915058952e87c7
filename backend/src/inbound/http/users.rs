//! Users API handlers.
//!
//! ```text
//! GET /users?search=li&role=viewer&page=1&limit=10
//! GET /users/{id}
//! PATCH /users/{id}/toggle-active
//! ```

use actix_web::{get, patch, web};
use serde::Deserialize;

use directory_model::{User, UserId};
use pagination::{Page, PageRequest};

use crate::domain::{Error, ListUsersRequest, UserFilter};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_positive_int, parse_role, FieldName};
use crate::inbound::http::ApiResult;

const ROLE_FIELD: FieldName = FieldName::new("role");
const PAGE_FIELD: FieldName = FieldName::new("page");
const LIMIT_FIELD: FieldName = FieldName::new("limit");

/// Raw query string for `GET /users`.
///
/// All fields arrive as strings so coercion failures produce this
/// adapter's field-level 400 payload instead of a framework default.
/// Unknown query parameters are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersParams {
    search: Option<String>,
    role: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

impl ListUsersParams {
    fn into_request(self) -> Result<ListUsersRequest, Error> {
        let role = self
            .role
            .as_deref()
            .map(|value| parse_role(value, ROLE_FIELD))
            .transpose()?;
        let page = self
            .page
            .as_deref()
            .map(|value| parse_positive_int(value, PAGE_FIELD))
            .transpose()?;
        let limit = self
            .limit
            .as_deref()
            .map(|value| parse_positive_int(value, LIMIT_FIELD))
            .transpose()?;

        // parse_positive_int already rejected zero, so defaults are the
        // only thing left for from_optional to fill in.
        let page = PageRequest::from_optional(page, limit)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(ListUsersRequest {
            filter: UserFilter::new(self.search.as_deref(), role),
            page,
        })
    }
}

/// An id that is not a canonical UUID cannot match any row, so it reads as
/// absent rather than malformed. Matches the original store's lookup
/// behaviour for arbitrary id strings.
fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| Error::not_found("User not found"))
}

/// List users matching the search/role predicate, one page at a time.
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<ListUsersParams>,
) -> ApiResult<web::Json<Page<User>>> {
    let request = query.into_inner().into_request()?;
    let page = state.directory.list(request).await?;
    Ok(web::Json(page))
}

/// Fetch a single user by id.
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path.into_inner())?;
    let user = state.directory.get(&id).await?;
    Ok(web::Json(user))
}

/// Flip a user's `active` flag and return the updated row.
#[patch("/users/{id}/toggle-active")]
pub async fn toggle_active(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path.into_inner())?;
    let user = state.directory.toggle_active(&id).await?;
    Ok(web::Json(user))
}
