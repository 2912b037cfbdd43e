pub mod avatar_source;
pub mod content_pipeline;
pub mod palette_service;
pub mod renderer;
pub mod retry;
pub mod template_service;

pub use avatar_source::{AvatarFetcher, FetchError, HttpProfileDirectory, ProfileDirectory};
pub use content_pipeline::{AvatarError, ContentError, ContentPipeline};
pub use palette_service::{palette_from_image, ExtractError};
pub use renderer::RenderService;
pub use retry::{retry_with_backoff, RetryPolicy, Retryable};
pub use template_service::{TemplateError, TemplateService};
