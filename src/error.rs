use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::{Fid, FidError};
use crate::services::{ContentError, TemplateError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid fid: {0}")]
    InvalidFid(#[from] FidError),

    #[error("Design not found: {0}")]
    DesignNotFound(String),

    #[error("No image available for fid {0}")]
    ImageUnavailable(Fid),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ContentError> for ApiError {
    fn from(e: ContentError) -> Self {
        match e {
            ContentError::DesignNotFound(name) => ApiError::DesignNotFound(name),
            ContentError::AvatarUnavailable { fid, .. } => ApiError::ImageUnavailable(fid),
            ContentError::Template(e) => ApiError::Template(e),
            ContentError::Render(e) => ApiError::Render(e),
            ContentError::Task(e) => ApiError::Internal(e),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("Invalid output size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("PNG encode error: {0}")]
    PngEncode(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidFid(_) => StatusCode::BAD_REQUEST,
            ApiError::DesignNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ImageUnavailable(_) => StatusCode::NOT_FOUND,
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_invalid_fid() {
        let error: ApiError = FidError::Malformed("abc".to_string()).into();
        assert!(error.to_string().starts_with("Invalid fid: "));
    }

    #[test]
    fn test_api_error_design_not_found() {
        let error = ApiError::DesignNotFound("punk".to_string());
        assert_eq!(error.to_string(), "Design not found: punk");
    }

    #[test]
    fn test_api_error_image_unavailable() {
        let error = ApiError::ImageUnavailable(Fid::new(42).unwrap());
        assert_eq!(error.to_string(), "No image available for fid 42");
    }

    #[test]
    fn test_api_error_internal() {
        let error = ApiError::Internal("task panicked".to_string());
        assert_eq!(error.to_string(), "Internal error: task panicked");
    }

    #[test]
    fn test_render_error_svg_parse() {
        let error = RenderError::SvgParse("Invalid XML".to_string());
        assert_eq!(error.to_string(), "SVG parse error: Invalid XML");
    }

    #[test]
    fn test_render_error_invalid_size() {
        let error = RenderError::InvalidSize {
            width: 0,
            height: 9999,
        };
        assert_eq!(error.to_string(), "Invalid output size: 0x9999");
    }

    #[test]
    fn test_render_error_pixmap_allocation() {
        let error = RenderError::PixmapAllocation;
        assert_eq!(error.to_string(), "Failed to allocate pixmap");
    }

    #[test]
    fn test_render_error_png_encode() {
        let error = RenderError::PngEncode("Encoding failed".to_string());
        assert_eq!(error.to_string(), "PNG encode error: Encoding failed");
    }

    #[test]
    fn test_api_error_from_content_error() {
        let fid = Fid::new(5).unwrap();
        let api: ApiError = ContentError::AvatarUnavailable {
            fid,
            reason: "no avatar".to_string(),
        }
        .into();
        assert!(matches!(api, ApiError::ImageUnavailable(f) if f == fid));

        let api: ApiError = ContentError::DesignNotFound("x".to_string()).into();
        assert!(matches!(api, ApiError::DesignNotFound(_)));

        let api: ApiError = ContentError::Task("join".to_string()).into();
        assert!(matches!(api, ApiError::Internal(_)));
    }

    #[test]
    fn test_api_error_into_response_status_codes() {
        use axum::response::IntoResponse;

        // InvalidFid -> BAD_REQUEST
        let response = ApiError::InvalidFid(FidError::Missing).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // DesignNotFound -> NOT_FOUND
        let response = ApiError::DesignNotFound("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // ImageUnavailable -> NOT_FOUND
        let response = ApiError::ImageUnavailable(Fid::new(1).unwrap()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Render -> INTERNAL_SERVER_ERROR
        let response = ApiError::Render(RenderError::PixmapAllocation).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // Internal -> INTERNAL_SERVER_ERROR
        let response = ApiError::Internal("error".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
