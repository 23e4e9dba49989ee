//! Rendering targets and the measurability policy
//!
//! A target is a named rendering backend under test. The harness only
//! talks to targets through this trait: a surface factory, an optional
//! completion hook for asynchronous backends, and a cleanup hook that
//! runs when the pair's measurement ends.

use crate::clock::SyncHook;
use crate::error::Result;

/// Content model of a target's surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    /// Opaque color channels only
    Color,
    /// Full color plus alpha
    ColorAlpha,
}

impl std::fmt::Display for Content {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Color => write!(f, "rgb"),
            Self::ColorAlpha => write!(f, "rgba"),
        }
    }
}

/// When a target's surface family performs its rendering work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceFamily {
    /// Rendering happens as commands are issued
    Immediate,
    /// Rendering is recorded now and replayed later (paginated and vector
    /// formats); timing it would measure command recording, not rendering
    Deferred,
}

/// Drawing surface handle returned by a target's surface factory
pub trait Surface {
    /// Surface width in pixels
    fn width(&self) -> u32;

    /// Surface height in pixels
    fn height(&self) -> u32;

    /// Clear the whole surface
    ///
    /// Doubles as the trivial write the runner issues after each replay to
    /// force completion of batched rendering commands.
    fn clear(&mut self);

    /// Fill an axis-aligned rectangle with an ARGB color
    fn fill(&mut self, x: u32, y: u32, w: u32, h: u32, argb: u32);
}

/// A named rendering backend under test
pub trait Target {
    /// Backend name used in reports
    fn name(&self) -> &str;

    /// Content model of surfaces this target creates
    fn content(&self) -> Content;

    /// Whether this target renders immediately or defers
    fn family(&self) -> SurfaceFamily;

    /// Whether this is a non-accelerated fallback variant of another target
    fn is_fallback(&self) -> bool {
        false
    }

    /// Create a surface of the given content model and size
    ///
    /// # Errors
    /// Returns `TrazarError::SurfaceCreation` if the backend cannot
    /// provide a surface.
    fn create_surface(&self, content: Content, width: u32, height: u32)
        -> Result<Box<dyn Surface>>;

    /// Completion hook for asynchronous backends
    ///
    /// `None` means rendering completes before the draw call returns and
    /// the timer may stop immediately.
    fn sync_hook(&self) -> Option<SyncHook> {
        None
    }

    /// Release per-target resources once a pair's measurement ends
    fn cleanup(&self) {}
}

/// Policy: is timing this target meaningful?
///
/// Deferred families only record commands during replay, so their numbers
/// would not reflect rendering work. Fallback variants exist for
/// correctness testing, not performance.
#[must_use]
pub fn is_measurable(target: &dyn Target) -> bool {
    target.content() == Content::ColorAlpha
        && target.family() == SurfaceFamily::Immediate
        && !target.is_fallback()
}

/// Registry of available targets
pub struct TargetRegistry {
    targets: Vec<Box<dyn Target>>,
}

impl TargetRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
        }
    }

    /// Registry holding the built-in targets
    #[must_use]
    pub fn with_builtin_targets() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ImageTarget::new()));
        registry.register(Box::new(RecordingTarget::new()));
        registry
    }

    /// Register a target
    pub fn register(&mut self, target: Box<dyn Target>) {
        self.targets.push(target);
    }

    /// Iterate over registered targets
    pub fn iter(&self) -> impl Iterator<Item = &dyn Target> + '_ {
        self.targets.iter().map(AsRef::as_ref)
    }

    /// Number of registered targets
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self::with_builtin_targets()
    }
}

// ============================================================================
// Built-in targets
// ============================================================================

/// In-memory ARGB raster target; rendering is immediate
pub struct ImageTarget {
    fallback: bool,
}

impl ImageTarget {
    /// Create the standard image target
    #[must_use]
    pub fn new() -> Self {
        Self { fallback: false }
    }

    /// Create the fallback variant (excluded from measurement)
    #[must_use]
    pub fn fallback() -> Self {
        Self { fallback: true }
    }
}

impl Default for ImageTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl Target for ImageTarget {
    fn name(&self) -> &str {
        if self.fallback {
            "image-fallback"
        } else {
            "image"
        }
    }

    fn content(&self) -> Content {
        Content::ColorAlpha
    }

    fn family(&self) -> SurfaceFamily {
        SurfaceFamily::Immediate
    }

    fn is_fallback(&self) -> bool {
        self.fallback
    }

    fn create_surface(
        &self,
        _content: Content,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn Surface>> {
        Ok(Box::new(ImageSurface::new(width, height)))
    }
}

/// Plain pixel-buffer surface backing [`ImageTarget`]
pub struct ImageSurface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl ImageSurface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize)],
        }
    }
}

impl Surface for ImageSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn fill(&mut self, x: u32, y: u32, w: u32, h: u32, argb: u32) {
        let x1 = x.min(self.width);
        let y1 = y.min(self.height);
        let x2 = x.saturating_add(w).min(self.width);
        let y2 = y.saturating_add(h).min(self.height);
        for row in y1..y2 {
            let base = (row as usize) * (self.width as usize);
            self.pixels[base + x1 as usize..base + x2 as usize].fill(argb);
        }
    }
}

/// Command-recording target; all rendering is deferred
///
/// Registered so listing shows it, but `is_measurable` rejects it.
pub struct RecordingTarget;

impl RecordingTarget {
    /// Create the recording target
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for RecordingTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl Target for RecordingTarget {
    fn name(&self) -> &str {
        "recording"
    }

    fn content(&self) -> Content {
        Content::ColorAlpha
    }

    fn family(&self) -> SurfaceFamily {
        SurfaceFamily::Deferred
    }

    fn create_surface(
        &self,
        _content: Content,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn Surface>> {
        Ok(Box::new(RecordingSurface {
            width,
            height,
            commands: 0,
        }))
    }
}

struct RecordingSurface {
    width: u32,
    height: u32,
    commands: usize,
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.commands += 1;
    }

    fn fill(&mut self, _x: u32, _y: u32, _w: u32, _h: u32, _argb: u32) {
        self.commands += 1;
    }
}
