/**
 * Webservice Handlers
 *
 * The endpoints a freshly generated webservice starts with. `index`, `show`
 * and `update` echo the request parameters (query and body) back in the
 * negotiated format; `ping` answers with the standard success body.
 */

use std::collections::BTreeMap;

use axum::{extract::Path, response::Response};

use crate::backend::middleware::{ApiParams, Authorization};
use crate::backend::response::{emit_value, show_success, RequestedFormat};
use crate::shared::params::PATH_PARAM;
use crate::shared::RequestParams;

/// `GET /api/ping`
pub async fn ping(format: RequestedFormat) -> Response {
    show_success(&format)
}

/// `GET /api/{resource}`
pub async fn index(
    Path(resource): Path<String>,
    Authorization(verdict): Authorization,
    format: RequestedFormat,
    ApiParams(params): ApiParams,
) -> Response {
    tracing::debug!(%resource, plan = ?verdict.and_then(|v| v.plan), "index");
    echo(&format, &params, [("resource", resource)])
}

/// `GET /api/{resource}/{id}`
pub async fn show(
    Path((resource, id)): Path<(String, String)>,
    Authorization(verdict): Authorization,
    format: RequestedFormat,
    ApiParams(params): ApiParams,
) -> Response {
    tracing::debug!(%resource, %id, plan = ?verdict.and_then(|v| v.plan), "show");
    echo(&format, &params, [("resource", resource), ("id", id)])
}

/// `PUT /api/{resource}/{id}`
pub async fn update(
    Path((resource, id)): Path<(String, String)>,
    Authorization(verdict): Authorization,
    format: RequestedFormat,
    ApiParams(params): ApiParams,
) -> Response {
    tracing::debug!(%resource, %id, plan = ?verdict.and_then(|v| v.plan), "update");
    echo(&format, &params, [("resource", resource), ("id", id)])
}

/// First value per name wins; routing values always win over the caller's.
fn echo<const N: usize>(
    format: &RequestedFormat,
    params: &RequestParams,
    path_params: [(&str, String); N],
) -> Response {
    let mut info: BTreeMap<String, String> = BTreeMap::new();
    for (key, value) in params.iter() {
        info.entry(key.to_string()).or_insert_with(|| value.to_string());
    }
    if let Some(path) = params.route_path() {
        info.insert(PATH_PARAM.to_string(), path.to_string());
    }
    for (key, value) in path_params {
        info.insert(key.to_string(), value);
    }
    emit_value(format, &info, None)
}
