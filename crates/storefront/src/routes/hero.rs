//! Parallax hero view and its generated stylesheet.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use chavoya_core::parallax::{
    NOMINAL_VIEWPORT_HEIGHT, ParallaxHero, ScrollRange, Viewport, css_number,
};

use crate::state::AppState;

/// What the hero partial renders.
///
/// The delays place each paused animation on the frame for a first paint at
/// [`NOMINAL_VIEWPORT_HEIGHT`]. The browser script takes over from there.
#[derive(Debug, Clone)]
pub struct HeroView {
    pub image_url: String,
    pub heading: String,
    pub subheading: Option<String>,
    pub image_delay: String,
    pub copy_delay: String,
    pub image_range_from: String,
    pub image_range_to: String,
    pub copy_range_from: String,
    pub copy_range_to: String,
}

impl HeroView {
    #[must_use]
    pub fn new(hero: &ParallaxHero) -> Self {
        let viewport = Viewport {
            height: NOMINAL_VIEWPORT_HEIGHT,
        };

        Self {
            image_url: hero.image_url.clone(),
            heading: hero.heading.clone(),
            subheading: hero.subheading.clone(),
            image_delay: delay(ParallaxHero::initial_image_progress(viewport)),
            copy_delay: delay(ParallaxHero::initial_copy_progress(viewport)),
            image_range_from: ScrollRange::IMAGE.from.to_string(),
            image_range_to: ScrollRange::IMAGE.to.to_string(),
            copy_range_from: ScrollRange::COPY.from.to_string(),
            copy_range_to: ScrollRange::COPY.to.to_string(),
        }
    }
}

/// `animation-delay` that parks a paused one-second animation at `progress`.
fn delay(progress: f64) -> String {
    format!("-{}s", css_number(progress))
}

/// Serve the hero `@keyframes`.
pub async fn stylesheet(State(state): State<AppState>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        state.hero().keyframes_css(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_delays() {
        let view = HeroView::new(&ParallaxHero::new("/static/images/header.jpg", "Heading", None));

        // Copy block starts one viewport tall at the top: halfway through its range.
        assert_eq!(view.copy_delay, "-0.5s");
        // Image bottom sits 12px above the viewport bottom.
        assert_eq!(view.image_delay, "-0.0133s");
    }

    #[test]
    fn test_ranges_render_as_offsets() {
        let view = HeroView::new(&ParallaxHero::new("/img.jpg", "Heading", None));

        assert_eq!(view.image_range_from, "end end");
        assert_eq!(view.image_range_to, "end start");
        assert_eq!(view.copy_range_from, "start end");
        assert_eq!(view.copy_range_to, "end start");
    }

    #[test]
    fn test_scrub_script_measures_layout_box() {
        let script = include_str!("../../static/js/parallax.js");

        assert!(script.contains("node.offsetTop"));
        assert!(script.contains("el.offsetHeight"));
        assert!(!script.contains("getBoundingClientRect()"));
    }

    #[test]
    fn test_delay_format() {
        assert_eq!(delay(0.0), "-0s");
        assert_eq!(delay(1.0), "-1s");
    }
}
