use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::models::{AppConfig, ExtractionMethod, FailurePolicy};

/// A design as listed by `/api/designs`
#[derive(Debug, Serialize, ToSchema)]
pub struct DesignSummary {
    /// Name used in image URLs
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Grid size as `[columns, rows]`
    pub grid: Vec<u32>,
    pub method: ExtractionMethod,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Named color slots the template exposes
    pub slots: Vec<String>,
    pub on_failure: FailurePolicy,
}

/// List available designs
#[utoipa::path(
    get,
    path = "/api/designs",
    responses(
        (status = 200, description = "Configured designs", body = Vec<DesignSummary>),
    ),
    tag = "Designs"
)]
pub async fn handle_list_designs(State(config): State<Arc<AppConfig>>) -> Json<Vec<DesignSummary>> {
    Json(design_summaries(&config))
}

pub fn design_summaries(config: &AppConfig) -> Vec<DesignSummary> {
    config
        .designs
        .iter()
        .map(|(name, d)| DesignSummary {
            name: name.clone(),
            description: d.description.clone(),
            grid: d.grid.to_vec(),
            method: d.method,
            width: d.width,
            height: d.height,
            slots: d.slots.keys().cloned().collect(),
            on_failure: d.on_failure,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summaries_follow_config_order() {
        let config = AppConfig::default();
        let summaries = design_summaries(&config);
        let names: Vec<_> = summaries.iter().map(|s| s.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(summaries.len(), config.designs.len());
    }

    #[test]
    fn punk_lists_its_slots() {
        let config = AppConfig::default();
        let punk = design_summaries(&config)
            .into_iter()
            .find(|s| s.name == "punk")
            .unwrap();
        assert!(punk.slots.contains(&"hair".to_string()));
        assert_eq!(punk.on_failure, FailurePolicy::DefaultColors);
    }
}
