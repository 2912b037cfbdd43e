use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::models::Fid;
use crate::services::ContentPipeline;

/// Error body shared by all endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Error message
    pub error: String,
}

/// Query parameters for the query-string form of the image endpoint
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FidQuery {
    /// Profile identifier (positive integer)
    pub fid: Option<String>,
}

/// Render a design for a profile
///
/// Colors the design from the profile's avatar and returns it as PNG.
#[utoipa::path(
    get,
    path = "/api/designs/{design}/{fid}",
    responses(
        (status = 200, description = "Rendered design", content_type = "image/png"),
        (status = 304, description = "Client copy is current"),
        (status = 400, description = "Malformed fid", body = ErrorResponse),
        (status = 404, description = "Unknown design or no usable avatar", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse),
    ),
    params(
        ("design" = String, Path, description = "Design name"),
        ("fid" = String, Path, description = "Profile identifier"),
    ),
    tag = "Designs"
)]
pub async fn handle_design_image(
    State(pipeline): State<Arc<ContentPipeline>>,
    Path((design, fid)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let fid: Fid = fid.parse()?;
    design_image(&pipeline, &design, fid, &headers).await
}

/// Render a design for a profile, fid given as query parameter
#[utoipa::path(
    get,
    path = "/api/designs/{design}",
    responses(
        (status = 200, description = "Rendered design", content_type = "image/png"),
        (status = 304, description = "Client copy is current"),
        (status = 400, description = "Missing or malformed fid", body = ErrorResponse),
        (status = 404, description = "Unknown design or no usable avatar", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse),
    ),
    params(
        ("design" = String, Path, description = "Design name"),
        FidQuery,
    ),
    tag = "Designs"
)]
pub async fn handle_design_image_query(
    State(pipeline): State<Arc<ContentPipeline>>,
    Path(design): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    // Raw pairs so repeated or odd parameters still get a JSON 400
    let fid = Fid::from_query_pairs(&pairs)?;
    design_image(&pipeline, &design, fid, &headers).await
}

async fn design_image(
    pipeline: &ContentPipeline,
    design: &str,
    fid: Fid,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    tracing::info!(design = %design, fid = %fid, "Image request received");

    let png_bytes = pipeline.generate(design, fid).await?;
    let etag = etag_for(&png_bytes);
    let cache_control = format!(
        "public, max-age={}",
        pipeline.config().server.cache_max_age
    );

    if if_none_match(headers, &etag) {
        tracing::debug!(design = %design, fid = %fid, "ETag matched");
        return Ok((
            StatusCode::NOT_MODIFIED,
            [(header::ETAG, etag), (header::CACHE_CONTROL, cache_control)],
        )
            .into_response());
    }

    tracing::info!(size_bytes = png_bytes.len(), "Image rendered successfully");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_LENGTH, png_bytes.len().to_string()),
            (header::CACHE_CONTROL, cache_control),
            (header::ETAG, etag),
        ],
        Bytes::from(png_bytes),
    )
        .into_response())
}

/// Strong ETag from the first 128 bits of the body's SHA-256
pub fn etag_for(body: &[u8]) -> String {
    let digest = Sha256::digest(body);
    format!("\"{}\"", hex::encode(&digest[..16]))
}

fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|v: &HeaderValue| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate == etag || candidate.strip_prefix("W/") == Some(etag))
}
