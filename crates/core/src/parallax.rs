//! Scroll-linked parallax for the catalog hero banner.
//!
//! # Model
//!
//! A tracked element moves through the viewport as the page scrolls. A
//! [`ScrollRange`] names two moments of that journey, e.g. "the element's end
//! meets the viewport's end" and "the element's end meets the viewport's
//! start". [`ScrollRange::progress`] turns the element's current geometry into
//! a number in `[0, 1]` between those two moments.
//!
//! Progress is then fed through [`Curve`]s, piecewise-linear maps from
//! progress to a visual property (scale, opacity, offset).
//!
//! The hero uses two tracked elements:
//!
//! | Element | Range | Curves |
//! |---------|-------|--------|
//! | background image | `end end` → `end start` | scale `1 → 0.85`, overlay opacity `1 → 0` |
//! | heading copy | `start end` → `end start` | offset `250px → -250px`, opacity `0 → 1 → 0` at `0.25 / 0.5 / 0.75` |
//!
//! Nothing here keeps state between evaluations. The browser only measures
//! geometry and scrubs CSS keyframes generated by [`ParallaxHero::keyframes_css`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Padding around the sticky hero image, in CSS pixels.
pub const IMAGE_PADDING: f64 = 12.0;

/// Viewport height assumed when rendering the first frame on the server.
pub const NOMINAL_VIEWPORT_HEIGHT: f64 = 900.0;

// =============================================================================
// Scroll progress
// =============================================================================

/// Leading or trailing edge of a box along the scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Start,
    End,
}

impl Edge {
    /// Position of the edge as a fraction of the box's extent.
    #[must_use]
    pub const fn fraction(self) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::End => 1.0,
        }
    }

    const fn keyword(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// The moment an element edge lines up with a viewport edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollOffset {
    pub element: Edge,
    pub viewport: Edge,
}

impl ScrollOffset {
    #[must_use]
    pub const fn new(element: Edge, viewport: Edge) -> Self {
        Self { element, viewport }
    }

    /// Element top (relative to the viewport top) at which this offset holds.
    fn element_top(self, element_height: f64, viewport: Viewport) -> f64 {
        viewport.height * self.viewport.fraction() - element_height * self.element.fraction()
    }
}

impl fmt::Display for ScrollOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element.keyword(), self.viewport.keyword())
    }
}

/// Error parsing a scroll offset such as `"end start"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid scroll offset: {0:?}")]
pub struct ScrollOffsetParseError(pub String);

impl FromStr for ScrollOffset {
    type Err = ScrollOffsetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let edge = |word: &str| match word {
            "start" => Ok(Edge::Start),
            "end" => Ok(Edge::End),
            _ => Err(ScrollOffsetParseError(s.to_string())),
        };

        let mut words = s.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some(element), Some(viewport), None) => Ok(Self::new(edge(element)?, edge(viewport)?)),
            _ => Err(ScrollOffsetParseError(s.to_string())),
        }
    }
}

/// A box on the scroll axis, positioned relative to the viewport top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBox {
    pub top: f64,
    pub height: f64,
}

/// The visible scrollport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub height: f64,
}

/// Two scroll offsets bounding a progress measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollRange {
    pub from: ScrollOffset,
    pub to: ScrollOffset,
}

impl ScrollRange {
    /// From "element end at viewport end" to "element end at viewport start".
    pub const IMAGE: Self = Self {
        from: ScrollOffset::new(Edge::End, Edge::End),
        to: ScrollOffset::new(Edge::End, Edge::Start),
    };

    /// From "element start at viewport end" to "element end at viewport start".
    pub const COPY: Self = Self {
        from: ScrollOffset::new(Edge::Start, Edge::End),
        to: ScrollOffset::new(Edge::End, Edge::Start),
    };

    /// Normalized progress of `element` through this range, clamped to `[0, 1]`.
    #[must_use]
    pub fn progress(&self, element: ElementBox, viewport: Viewport) -> f64 {
        let start = self.from.element_top(element.height, viewport);
        let end = self.to.element_top(element.height, viewport);
        let span = start - end;

        // Scrolling down moves the element up, so progress grows as `top` shrinks.
        if span.abs() < f64::EPSILON {
            return if element.top > start { 0.0 } else { 1.0 };
        }

        ((start - element.top) / span).clamp(0.0, 1.0)
    }
}

// =============================================================================
// Curves
// =============================================================================

/// Errors building a [`Curve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    #[error("a curve needs at least two stops")]
    TooFewStops,
    #[error("input and output lengths differ ({inputs} vs {outputs})")]
    LengthMismatch { inputs: usize, outputs: usize },
    #[error("curve inputs must be strictly increasing")]
    NotIncreasing,
    #[error("curve stops must be finite")]
    NonFinite,
}

/// One input/output pair of a [`Curve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stop {
    pub input: f64,
    pub output: f64,
}

/// A piecewise-linear map, clamped outside its input domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    stops: Vec<Stop>,
}

impl Curve {
    /// Build a curve from parallel input and output lists.
    ///
    /// # Errors
    ///
    /// Returns `CurveError` if there are fewer than two stops, the lists
    /// differ in length, inputs are not strictly increasing, or any value is
    /// not finite.
    pub fn new(inputs: &[f64], outputs: &[f64]) -> Result<Self, CurveError> {
        if inputs.len() != outputs.len() {
            return Err(CurveError::LengthMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
        if inputs.len() < 2 {
            return Err(CurveError::TooFewStops);
        }
        if inputs.iter().chain(outputs).any(|v| !v.is_finite()) {
            return Err(CurveError::NonFinite);
        }
        if inputs.windows(2).any(|pair| matches!(pair, [a, b] if a >= b)) {
            return Err(CurveError::NotIncreasing);
        }

        Ok(Self {
            stops: inputs
                .iter()
                .zip(outputs)
                .map(|(&input, &output)| Stop { input, output })
                .collect(),
        })
    }

    /// Built-in curves whose stops are known to be valid.
    fn preset(stops: &[(f64, f64)]) -> Self {
        Self {
            stops: stops
                .iter()
                .map(|&(input, output)| Stop { input, output })
                .collect(),
        }
    }

    /// Background image scale: `[0, 1] → [1, 0.85]`.
    #[must_use]
    pub fn image_scale() -> Self {
        Self::preset(&[(0.0, 1.0), (1.0, 0.85)])
    }

    /// Dark overlay opacity over the image: `[0, 1] → [1, 0]`.
    #[must_use]
    pub fn image_overlay_opacity() -> Self {
        Self::preset(&[(0.0, 1.0), (1.0, 0.0)])
    }

    /// Vertical offset of the heading copy in pixels: `[0, 1] → [250, -250]`.
    #[must_use]
    pub fn copy_offset() -> Self {
        Self::preset(&[(0.0, 250.0), (1.0, -250.0)])
    }

    /// Heading copy opacity, a triangular window: `[0.25, 0.5, 0.75] → [0, 1, 0]`.
    #[must_use]
    pub fn copy_opacity() -> Self {
        Self::preset(&[(0.25, 0.0), (0.5, 1.0), (0.75, 0.0)])
    }

    #[must_use]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Evaluate the curve at `x`.
    #[must_use]
    pub fn sample(&self, x: f64) -> f64 {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return 0.0;
        };
        if x <= first.input {
            return first.output;
        }
        if x >= last.input {
            return last.output;
        }

        self.stops
            .windows(2)
            .find_map(|pair| match pair {
                [a, b] if x <= b.input => {
                    let t = (x - a.input) / (b.input - a.input);
                    Some((b.output - a.output).mul_add(t, a.output))
                }
                _ => None,
            })
            .unwrap_or(last.output)
    }

    /// CSS keyframe offsets for this curve, covering `0%` to `100%`.
    ///
    /// Stops outside `[0, 1]` are dropped and the ends are filled with the
    /// clamped curve value, so a linear CSS animation reproduces [`Self::sample`].
    fn keyframes(&self) -> Vec<(f64, f64)> {
        let mut frames: Vec<(f64, f64)> = self
            .stops
            .iter()
            .filter(|stop| (0.0..=1.0).contains(&stop.input))
            .map(|stop| (stop.input, stop.output))
            .collect();

        if frames.first().is_none_or(|&(at, _)| at > 0.0) {
            frames.insert(0, (0.0, self.sample(0.0)));
        }
        if frames.last().is_none_or(|&(at, _)| at < 1.0) {
            frames.push((1.0, self.sample(1.0)));
        }
        frames
    }
}

// =============================================================================
// Hero
// =============================================================================

/// Visual state of the background image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFrame {
    pub scale: f64,
    pub overlay_opacity: f64,
}

/// Visual state of the heading copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CopyFrame {
    pub offset_y: f64,
    pub opacity: f64,
}

/// Keyframe animation names used by the hero markup.
pub mod animation {
    pub const IMAGE_SCALE: &str = "hero-image-scale";
    pub const IMAGE_OVERLAY: &str = "hero-image-overlay";
    pub const COPY_OFFSET: &str = "hero-copy-offset";
    pub const COPY_OPACITY: &str = "hero-copy-opacity";
}

/// The parallax hero: a sticky background image with overlaid heading copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxHero {
    pub image_url: String,
    pub heading: String,
    pub subheading: Option<String>,
    image_scale: Curve,
    image_overlay: Curve,
    copy_offset: Curve,
    copy_opacity: Curve,
}

impl ParallaxHero {
    #[must_use]
    pub fn new(
        image_url: impl Into<String>,
        heading: impl Into<String>,
        subheading: Option<String>,
    ) -> Self {
        Self {
            image_url: image_url.into(),
            heading: heading.into(),
            subheading,
            image_scale: Curve::image_scale(),
            image_overlay: Curve::image_overlay_opacity(),
            copy_offset: Curve::copy_offset(),
            copy_opacity: Curve::copy_opacity(),
        }
    }

    /// Image state at scroll progress `p`.
    #[must_use]
    pub fn image_frame(&self, p: f64) -> ImageFrame {
        ImageFrame {
            scale: self.image_scale.sample(p),
            overlay_opacity: self.image_overlay.sample(p),
        }
    }

    /// Copy state at scroll progress `p`.
    #[must_use]
    pub fn copy_frame(&self, p: f64) -> CopyFrame {
        CopyFrame {
            offset_y: self.copy_offset.sample(p),
            opacity: self.copy_opacity.sample(p),
        }
    }

    /// Image progress before the page has scrolled.
    ///
    /// The sticky image sits [`IMAGE_PADDING`] below the viewport top and is
    /// one viewport tall minus the padding on both sides.
    #[must_use]
    pub fn initial_image_progress(viewport: Viewport) -> f64 {
        let element = ElementBox {
            top: IMAGE_PADDING,
            height: IMAGE_PADDING.mul_add(-2.0, viewport.height),
        };
        ScrollRange::IMAGE.progress(element, viewport)
    }

    /// Copy progress before the page has scrolled.
    ///
    /// The copy block is pinned to the top of the hero and one viewport tall.
    #[must_use]
    pub fn initial_copy_progress(viewport: Viewport) -> f64 {
        let element = ElementBox {
            top: 0.0,
            height: viewport.height,
        };
        ScrollRange::COPY.progress(element, viewport)
    }

    /// CSS `@keyframes` for the four hero curves.
    ///
    /// The markup runs these as paused one-second linear animations; setting
    /// `animation-delay: -<progress>s` shows the frame at that progress.
    #[must_use]
    pub fn keyframes_css(&self) -> String {
        let mut css = String::new();
        push_keyframes(&mut css, animation::IMAGE_SCALE, &self.image_scale, |v| {
            format!("transform: scale({})", css_number(v))
        });
        push_keyframes(&mut css, animation::IMAGE_OVERLAY, &self.image_overlay, |v| {
            format!("opacity: {}", css_number(v))
        });
        push_keyframes(&mut css, animation::COPY_OFFSET, &self.copy_offset, |v| {
            format!("transform: translateY({}px)", css_number(v))
        });
        push_keyframes(&mut css, animation::COPY_OPACITY, &self.copy_opacity, |v| {
            format!("opacity: {}", css_number(v))
        });
        css
    }
}

fn push_keyframes(css: &mut String, name: &str, curve: &Curve, declaration: impl Fn(f64) -> String) {
    css.push_str(&format!("@keyframes {name} {{\n"));
    for (at, value) in curve.keyframes() {
        css.push_str(&format!(
            "  {}% {{ {}; }}\n",
            css_number(at * 100.0),
            declaration(value)
        ));
    }
    css.push_str("}\n");
}

/// Format a number for CSS with at most four decimals and no trailing zeros.
#[must_use]
pub fn css_number(value: f64) -> String {
    let text = format!("{value:.4}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport { height: 800.0 };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_copy_opacity_triangle() {
        let hero = ParallaxHero::new("/img.jpg", "Heading", None);

        assert!(close(hero.copy_frame(0.5).opacity, 1.0));
        assert!(close(hero.copy_frame(0.0).opacity, 0.0));
        assert!(close(hero.copy_frame(1.0).opacity, 0.0));
        assert!(close(hero.copy_frame(0.375).opacity, 0.5));
        assert!(close(hero.copy_frame(0.625).opacity, 0.5));
    }

    #[test]
    fn test_image_curves_endpoints() {
        let hero = ParallaxHero::new("/img.jpg", "Heading", None);

        assert!(close(hero.image_frame(0.0).scale, 1.0));
        assert!(close(hero.image_frame(1.0).scale, 0.85));
        assert!(close(hero.image_frame(0.0).overlay_opacity, 1.0));
        assert!(close(hero.image_frame(1.0).overlay_opacity, 0.0));
        assert!(close(hero.image_frame(0.5).scale, 0.925));
    }

    #[test]
    fn test_copy_offset_is_linear() {
        let hero = ParallaxHero::new("/img.jpg", "Heading", None);

        assert!(close(hero.copy_frame(0.0).offset_y, 250.0));
        assert!(close(hero.copy_frame(0.5).offset_y, 0.0));
        assert!(close(hero.copy_frame(1.0).offset_y, -250.0));
    }

    #[test]
    fn test_curve_clamps_outside_domain() {
        let curve = Curve::image_scale();
        assert!(close(curve.sample(-3.0), 1.0));
        assert!(close(curve.sample(7.0), 0.85));
    }

    #[test]
    fn test_curve_validation() {
        assert_eq!(Curve::new(&[0.0], &[1.0]), Err(CurveError::TooFewStops));
        assert_eq!(
            Curve::new(&[0.0, 1.0], &[1.0]),
            Err(CurveError::LengthMismatch {
                inputs: 2,
                outputs: 1
            })
        );
        assert_eq!(
            Curve::new(&[0.5, 0.5], &[0.0, 1.0]),
            Err(CurveError::NotIncreasing)
        );
        assert_eq!(
            Curve::new(&[0.0, f64::NAN], &[0.0, 1.0]),
            Err(CurveError::NonFinite)
        );
        assert!(Curve::new(&[0.0, 0.3, 1.0], &[0.0, 2.0, 0.0]).is_ok());
    }

    #[test]
    fn test_copy_range_progress() {
        let height = 800.0;
        // Element top at the viewport bottom: range start.
        let at_start = ElementBox { top: 800.0, height };
        // Element bottom at the viewport top: range end.
        let at_end = ElementBox { top: -800.0, height };
        let midway = ElementBox { top: 0.0, height };

        assert!(close(ScrollRange::COPY.progress(at_start, VIEWPORT), 0.0));
        assert!(close(ScrollRange::COPY.progress(at_end, VIEWPORT), 1.0));
        assert!(close(ScrollRange::COPY.progress(midway, VIEWPORT), 0.5));
    }

    #[test]
    fn test_image_range_progress() {
        let height = 400.0;
        // Bottom aligned with viewport bottom.
        let at_start = ElementBox { top: 400.0, height };
        // Bottom aligned with viewport top.
        let at_end = ElementBox { top: -400.0, height };
        let quarter = ElementBox { top: 200.0, height };

        assert!(close(ScrollRange::IMAGE.progress(at_start, VIEWPORT), 0.0));
        assert!(close(ScrollRange::IMAGE.progress(at_end, VIEWPORT), 1.0));
        assert!(close(ScrollRange::IMAGE.progress(quarter, VIEWPORT), 0.25));
    }

    #[test]
    fn test_progress_is_clamped() {
        let below = ElementBox {
            top: 5000.0,
            height: 100.0,
        };
        let above = ElementBox {
            top: -5000.0,
            height: 100.0,
        };

        assert!(close(ScrollRange::COPY.progress(below, VIEWPORT), 0.0));
        assert!(close(ScrollRange::COPY.progress(above, VIEWPORT), 1.0));
    }

    #[test]
    fn test_degenerate_range() {
        let range = ScrollRange {
            from: ScrollOffset::new(Edge::Start, Edge::Start),
            to: ScrollOffset::new(Edge::Start, Edge::Start),
        };
        let before = ElementBox {
            top: 10.0,
            height: 50.0,
        };
        let after = ElementBox {
            top: -10.0,
            height: 50.0,
        };

        assert!(close(range.progress(before, VIEWPORT), 0.0));
        assert!(close(range.progress(after, VIEWPORT), 1.0));
    }

    #[test]
    fn test_scroll_offset_parse_and_display() {
        let offset: ScrollOffset = "end start".parse().unwrap();
        assert_eq!(offset, ScrollOffset::new(Edge::End, Edge::Start));
        assert_eq!(ScrollRange::COPY.from.to_string(), "start end");
        assert!("end".parse::<ScrollOffset>().is_err());
        assert!("middle end".parse::<ScrollOffset>().is_err());
        assert!("end end end".parse::<ScrollOffset>().is_err());
    }

    #[test]
    fn test_initial_frames() {
        let viewport = Viewport {
            height: NOMINAL_VIEWPORT_HEIGHT,
        };
        let copy = ParallaxHero::initial_copy_progress(viewport);
        let image = ParallaxHero::initial_image_progress(viewport);

        assert!(close(copy, 0.5));
        assert!(close(image, IMAGE_PADDING / NOMINAL_VIEWPORT_HEIGHT));
    }

    #[test]
    fn test_keyframes_cover_full_range() {
        let hero = ParallaxHero::new("/img.jpg", "Heading", None);
        let css = hero.keyframes_css();

        assert!(css.contains("@keyframes hero-copy-opacity {"));
        assert!(css.contains("  0% { opacity: 0; }"));
        assert!(css.contains("  25% { opacity: 0; }"));
        assert!(css.contains("  50% { opacity: 1; }"));
        assert!(css.contains("  100% { opacity: 0; }"));
        assert!(css.contains("  100% { transform: scale(0.85); }"));
        assert!(css.contains("  0% { transform: translateY(250px); }"));
        assert!(css.contains("  100% { transform: translateY(-250px); }"));
    }

    #[test]
    fn test_keyframes_blocks_are_closed() {
        let css = ParallaxHero::new("/img.jpg", "Heading", None).keyframes_css();

        assert_eq!(css.matches("@keyframes ").count(), 4);
        assert_eq!(css.matches("\n}\n").count(), 4);
        assert!(css.ends_with("}\n"));
        assert!(css.lines().all(|line| line.starts_with("@keyframes ")
            || line.starts_with("  ")
            || line == "}"));
    }

    #[test]
    fn test_css_number() {
        assert_eq!(css_number(1.0), "1");
        assert_eq!(css_number(0.85), "0.85");
        assert_eq!(css_number(-250.0), "-250");
        assert_eq!(css_number(-0.0), "0");
        assert_eq!(css_number(0.013_333_3), "0.0133");
    }
}
