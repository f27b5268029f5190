//! HTTP surface
//!
//! - `GET|POST /` with `item_id` → the normalized record as JSON
//! - `GET /hc` → empty `200` for liveness probes

use axum::{
    extract::{rejection::FormRejection, rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use tracing::{debug, error};

use crate::service::{LookupError, LookupService};

/// Decoded `key=value` pairs of a query string or form body, in request order
pub type Params = Vec<(String, String)>;

const ITEM_ID: &str = "item_id";

/// Builds the application router around a lookup service
pub fn router(service: LookupService) -> Router {
    Router::new()
        .route("/", get(lookup_item).post(lookup_item))
        .route("/hc", get(health_check))
        .with_state(service)
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn lookup_item(
    State(service): State<LookupService>,
    query: Result<Query<Params>, QueryRejection>,
    form: Result<Form<Params>, FormRejection>,
) -> Result<Response, LookupError> {
    let item_id = item_id_from(query, form)?;

    let lookup = service.lookup(&item_id).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        lookup.body,
    )
        .into_response())
}

/// Picks `item_id` from the form body, falling back to the query string
///
/// When the key repeats, its first value wins. A body that isn't
/// form-encoded is ignored; a form body that can't be read is a bad request.
fn item_id_from(
    query: Result<Query<Params>, QueryRejection>,
    form: Result<Form<Params>, FormRejection>,
) -> Result<String, LookupError> {
    let from_form = match form {
        Ok(Form(params)) => first_item_id(params),
        Err(FormRejection::InvalidFormContentType(_)) => None,
        Err(rejection) => return Err(LookupError::InvalidForm(rejection.body_text())),
    };

    let from_query = match query {
        Ok(Query(params)) => first_item_id(params),
        Err(rejection) => return Err(LookupError::InvalidForm(rejection.body_text())),
    };

    Ok(from_form.or(from_query).unwrap_or_default())
}

fn first_item_id(params: Params) -> Option<String> {
    params
        .into_iter()
        .find(|(key, _)| key == ITEM_ID)
        .map(|(_, value)| value)
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "lookup failed");
        } else {
            debug!(error = %self, "rejected lookup request");
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(item_id: Option<&str>) -> Params {
        item_id
            .map(|id| vec![(ITEM_ID.to_string(), id.to_string())])
            .unwrap_or_default()
    }

    #[test]
    fn test_form_value_takes_precedence_over_query() {
        let id = item_id_from(
            Ok(Query(params(Some("FROM_QUERY")))),
            Ok(Form(params(Some("FROM_FORM")))),
        )
        .unwrap();
        assert_eq!(id, "FROM_FORM");
    }

    #[test]
    fn test_query_used_when_form_has_no_item_id() {
        let id = item_id_from(Ok(Query(params(Some("FROM_QUERY")))), Ok(Form(params(None))))
            .unwrap();
        assert_eq!(id, "FROM_QUERY");
    }

    #[test]
    fn test_repeated_item_id_keeps_first_value() {
        let pairs = vec![
            ("tag".to_string(), "x".to_string()),
            (ITEM_ID.to_string(), "A1".to_string()),
            (ITEM_ID.to_string(), "B2".to_string()),
        ];
        let id = item_id_from(Ok(Query(pairs.clone())), Ok(Form(pairs))).unwrap();
        assert_eq!(id, "A1");
    }

    #[test]
    fn test_missing_item_id_becomes_empty() {
        let id = item_id_from(Ok(Query(params(None))), Ok(Form(params(None)))).unwrap();
        assert_eq!(id, "");
    }

    #[test]
    fn test_lookup_error_status_mapping() {
        assert_eq!(
            LookupError::BadRequest(String::new()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LookupError::InvalidForm("bad".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LookupError::EmptyResult.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_response_is_plain_text() {
        let response = LookupError::EmptyResult.into_response();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }
}
