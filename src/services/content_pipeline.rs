use std::sync::Arc;

use grid_palette::Palette;

use crate::assets::AssetLoader;
use crate::error::RenderError;
use crate::models::{AppConfig, DesignConfig, FailurePolicy, Fid};
use crate::rendering::SvgRenderer;
use crate::services::avatar_source::{
    build_client, AvatarFetcher, FetchError, HttpProfileDirectory, ProfileDirectory,
};
use crate::services::palette_service::{palette_from_image, ExtractError};
use crate::services::retry::RetryPolicy;
use crate::services::{RenderService, TemplateError, TemplateService};

/// Why no palette could be produced for a profile
#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    #[error("Profile {0} has no avatar")]
    NoAvatar(Fid),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Error from the content pipeline
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Design not found: {0}")]
    DesignNotFound(String),

    #[error("No image available for fid {fid}: {reason}")]
    AvatarUnavailable { fid: Fid, reason: String },

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Render task failed: {0}")]
    Task(String),
}

/// Content pipeline that orchestrates profile → avatar → palette → template → render
pub struct ContentPipeline {
    config: Arc<AppConfig>,
    profiles: Arc<dyn ProfileDirectory>,
    fetcher: AvatarFetcher,
    renderer: Arc<RenderService>,
}

impl ContentPipeline {
    /// Wire the pipeline to the services named in `config`
    pub fn from_config(
        config: Arc<AppConfig>,
        assets: Arc<AssetLoader>,
    ) -> Result<Self, reqwest::Error> {
        let client = build_client(&config.http)?;
        let profiles = Arc::new(HttpProfileDirectory::new(
            client.clone(),
            config.profile.url.clone(),
        ));
        let fetcher = AvatarFetcher::new(client, &config.avatar, RetryPolicy::from(&config.retry));
        let renderer = Arc::new(RenderService::new(
            TemplateService::new(assets),
            SvgRenderer::new(config.optimize_png),
        ));
        Ok(Self::new(config, profiles, fetcher, renderer))
    }

    pub fn new(
        config: Arc<AppConfig>,
        profiles: Arc<dyn ProfileDirectory>,
        fetcher: AvatarFetcher,
        renderer: Arc<RenderService>,
    ) -> Self {
        Self {
            config,
            profiles,
            fetcher,
            renderer,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn design(&self, name: &str) -> Result<DesignConfig, ContentError> {
        self.config
            .get_design(name)
            .cloned()
            .ok_or_else(|| ContentError::DesignNotFound(name.to_string()))
    }

    /// Generate the PNG for `design_name` colored from the avatar of `fid`.
    ///
    /// Avatar problems never surface as server errors: depending on the
    /// design's `on_failure` they become `AvatarUnavailable` or a render
    /// with default colors.
    pub async fn generate(&self, design_name: &str, fid: Fid) -> Result<Vec<u8>, ContentError> {
        let design = self.design(design_name)?;

        let palette = match self.avatar_palette(&design, fid).await {
            Ok(palette) => Some(palette),
            Err(e) => match design.on_failure {
                FailurePolicy::NotFound => {
                    tracing::warn!(design = %design_name, fid = %fid, error = %e, "No palette, responding not found");
                    return Err(ContentError::AvatarUnavailable {
                        fid,
                        reason: e.to_string(),
                    });
                }
                FailurePolicy::DefaultColors => {
                    tracing::warn!(design = %design_name, fid = %fid, error = %e, "No palette, using default colors");
                    None
                }
            },
        };

        self.render_blocking(design, palette, Some(fid)).await
    }

    /// Render with an already extracted palette
    pub async fn render_with_palette(
        &self,
        design_name: &str,
        palette: Palette,
        fid: Option<Fid>,
    ) -> Result<Vec<u8>, ContentError> {
        let design = self.design(design_name)?;
        self.render_blocking(design, Some(palette), fid).await
    }

    /// The fallback image: the template with every slot at its default color
    pub async fn render_defaults(&self, design_name: &str) -> Result<Vec<u8>, ContentError> {
        let design = self.design(design_name)?;
        self.render_blocking(design, None, None).await
    }

    /// Fetch the avatar for `fid` and reduce it to the design's palette
    pub async fn avatar_palette(&self, design: &DesignConfig, fid: Fid) -> Result<Palette, AvatarError> {
        let avatar_url = self
            .profiles
            .avatar_url(fid)
            .await?
            .ok_or(AvatarError::NoAvatar(fid))?;
        let bytes = self.fetcher.download(&avatar_url).await?;

        let design = design.clone();
        let palette = tokio::task::spawn_blocking(move || palette_from_image(&bytes, &design))
            .await
            .map_err(|e| AvatarError::Task(e.to_string()))??;

        tracing::debug!(fid = %fid, cells = palette.len(), "Extracted palette");
        Ok(palette)
    }

    /// Execute CPU-intensive rendering in a blocking context
    async fn render_blocking(
        &self,
        design: DesignConfig,
        palette: Option<Palette>,
        fid: Option<Fid>,
    ) -> Result<Vec<u8>, ContentError> {
        let renderer = self.renderer.clone();
        tokio::task::spawn_blocking(move || renderer.render(&design, palette.as_ref(), fid))
            .await
            .map_err(|e| ContentError::Task(e.to_string()))?
    }
}
