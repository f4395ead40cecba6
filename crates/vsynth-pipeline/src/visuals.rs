//! Visual renderer: image generation, best effort per prompt.

use std::sync::Arc;
use tracing::{debug, warn};

use vsynth_models::{ImagePrompt, RenderedImage, ResourceKind};

use crate::metrics;
use crate::services::{ImageGenerationParams, ImageGenerator};
use crate::tracker::ResourceTracker;

pub struct VisualRenderer {
    images: Arc<dyn ImageGenerator>,
    params: ImageGenerationParams,
}

impl VisualRenderer {
    pub fn new(images: Arc<dyn ImageGenerator>, params: ImageGenerationParams) -> Self {
        Self { images, params }
    }

    /// Render at most one image for `prompt`.
    ///
    /// Service and write failures are logged and skipped; the unit decides
    /// later whether it has enough images.
    pub async fn render(&self, prompt: &ImagePrompt, tracker: &ResourceTracker) -> Option<RenderedImage> {
        let unit_index = prompt.unit_index;

        let bytes = match self.images.generate(&prompt.description, &self.params).await {
            Ok(images) => images.into_iter().next(),
            Err(e) => {
                warn!(unit_index, error = %e, "Image generation failed, skipping prompt");
                None
            }
        };

        let Some(bytes) = bytes else {
            metrics::record_image_failure();
            return None;
        };

        match tracker
            .write(ResourceKind::Image, &format!("u{unit_index}"), "png", &bytes)
            .await
        {
            Ok(path) => {
                debug!(unit_index, path = %path, bytes = bytes.len(), "Image written");
                Some(RenderedImage { unit_index, path })
            }
            Err(e) => {
                warn!(unit_index, error = %e, "Failed to write image, skipping prompt");
                metrics::record_image_failure();
                None
            }
        }
    }

    /// Render every prompt of one unit, keeping the successes in order.
    pub async fn render_unit(&self, prompts: &[ImagePrompt], tracker: &ResourceTracker) -> Vec<RenderedImage> {
        let mut rendered = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            if let Some(image) = self.render(prompt, tracker).await {
                rendered.push(image);
            }
        }
        rendered
    }
}
