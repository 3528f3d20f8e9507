//! Read-only publication of the request schemas, so clients can validate
//! bodies before sending them.
use super::error::{api_internal, api_not_found, ApiError};
use crate::validation::Schema;
use axum::extract::Path;
use axum::Json;
use serde_json::Value;

/// Names of every published schema.
pub async fn list_schemas() -> Json<Vec<&'static str>> {
    Json(Schema::ALL.into_iter().map(Schema::name).collect())
}

pub async fn get_schema(Path(name): Path<String>) -> Result<Json<Value>, ApiError> {
    let schema = Schema::from_name(&name)
        .ok_or_else(|| api_not_found(&format!("There is no schema named {name}")))?;
    let document = schema
        .document()
        .map_err(|err| api_internal("cannot render schema", &err))?;
    Ok(Json(document))
}
