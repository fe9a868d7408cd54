use std::path::Path;

use raqote::{DrawOptions, DrawTarget, PathBuilder, SolidSource, Source};
use serde::Serialize;

/// Opacity of every dot. Low enough that overlapping dots build up color over many ticks.
pub const DOT_ALPHA: f32 = 0.2;

/// One filled-circle draw command.
///
/// Color channels are the sampled pixel plus jitter and are deliberately left unclamped, so they
/// may fall outside `0..=255`. Surfaces that need bytes saturate them; see [`Dot::rgb_bytes`].
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize)]
pub struct Dot {
    pub x: u32,
    pub y: u32,
    pub radius: u32,
    pub rgb: [i16; 3],
}

impl Dot {
    /// The color saturated into byte range, as a CSS `rgba(...)` string would be.
    pub fn rgb_bytes(&self) -> [u8; 3] {
        self.rgb.map(|c| c.clamp(0, 255) as u8)
    }
}

/// A write-only sink for dots. Nothing drawn is ever erased.
pub trait DrawSurface {
    /// Discards the current contents and sizes the surface to `width` by `height`.
    ///
    /// Sessions only pass sizes of a validated [`PixelBuffer`][crate::PixelBuffer], so neither
    /// side exceeds [`MAX_SIDE`][crate::pixels::MAX_SIDE].
    fn resize(&mut self, width: u32, height: u32);

    fn fill_dot(&mut self, dot: &Dot);
}

impl<S: DrawSurface + ?Sized> DrawSurface for &mut S {
    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height)
    }

    fn fill_dot(&mut self, dot: &Dot) {
        (**self).fill_dot(dot)
    }
}

/// Forwards everything to both surfaces, e.g. to rasterize and log at once.
impl<A: DrawSurface, B: DrawSurface> DrawSurface for (A, B) {
    fn resize(&mut self, width: u32, height: u32) {
        self.0.resize(width, height);
        self.1.resize(width, height);
    }

    fn fill_dot(&mut self, dot: &Dot) {
        self.0.fill_dot(dot);
        self.1.fill_dot(dot);
    }
}

/// An absent surface ignores everything.
impl<S: DrawSurface> DrawSurface for Option<S> {
    fn resize(&mut self, width: u32, height: u32) {
        if let Some(s) = self {
            s.resize(width, height);
        }
    }

    fn fill_dot(&mut self, dot: &Dot) {
        if let Some(s) = self {
            s.fill_dot(dot);
        }
    }
}

/// Raster surface backed by a [`DrawTarget`]. Starts fully transparent.
pub struct Canvas {
    dt: DrawTarget,
    options: DrawOptions,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// An empty canvas; it gets its real size from [`DrawSurface::resize`].
    pub fn new() -> Self {
        Canvas {
            dt: DrawTarget::new(0, 0),
            options: DrawOptions::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.dt.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.dt.height() as u32
    }

    pub fn draw_target(&self) -> &DrawTarget {
        &self.dt
    }

    pub fn into_draw_target(self) -> DrawTarget {
        self.dt
    }

    pub fn write_png<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        self.dt
            .write_png(path)
            .map_err(|e| std::io::Error::other(e.to_string()))
    }
}

impl DrawSurface for Canvas {
    fn resize(&mut self, width: u32, height: u32) {
        self.dt = DrawTarget::new(canvas_side(width), canvas_side(height));
    }

    fn fill_dot(&mut self, dot: &Dot) {
        if dot.radius == 0 {
            // A zero-radius arc encloses no area.
            return;
        }
        let mut pb = PathBuilder::new();
        pb.arc(
            dot.x as f32,
            dot.y as f32,
            dot.radius as f32,
            0.0,
            2.0 * std::f32::consts::PI,
        );
        pb.close();
        let path = pb.finish();

        let [r, g, b] = dot.rgb_bytes();
        let a = (DOT_ALPHA * 255.0).round() as u8;
        let source = Source::Solid(SolidSource::from_unpremultiplied_argb(a, r, g, b));
        self.dt.fill(&path, &source, &self.options);
    }
}

/// Saturates at [`MAX_SIDE`][crate::pixels::MAX_SIDE] rather than wrapping negative.
fn canvas_side(side: u32) -> i32 {
    i32::try_from(side).unwrap_or(i32::MAX)
}

/// Records every dot in draw order.
#[derive(Debug, Default)]
pub struct DotLog {
    size: (u32, u32),
    dots: Vec<Dot>,
}

impl DotLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }
}

impl DrawSurface for DotLog {
    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.dots.clear();
    }

    fn fill_dot(&mut self, dot: &Dot) {
        self.dots.push(*dot);
    }
}
