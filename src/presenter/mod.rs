//! Presenter: Owns the full composite, diff and flush pipeline.
//!
//! The presenter holds the layer stack, the composited frame, the previous
//! frame the renderer diffs against, and the display sink. Callers draw into
//! layers, then call [`Presenter::present`] once per frame.

mod events;

pub use events::SurfaceEvent;

use crate::buffer::{DiffRenderer, FrameStats, GridBuffer};
use crate::config::RenderConfig;
use crate::layer::LayerStack;
use crate::snapshot::BufferSnapshot;
use crossbeam_channel::Receiver;
use std::io::{self, Write};
use tracing::debug;

/// Composite → diff → flush driver over an output sink.
pub struct Presenter<W: Write> {
    stack: LayerStack,
    frame: GridBuffer,
    previous: GridBuffer,
    renderer: DiffRenderer,
    sink: W,
    frames: u64,
}

impl<W: Write> Presenter<W> {
    /// Create a presenter for a `width` x `height` surface.
    ///
    /// The first frame is always a full redraw.
    pub fn new(width: u16, height: u16, config: &RenderConfig, sink: W) -> Self {
        let mut stack = LayerStack::new(width, height);
        stack.set_theme_background(config.theme_background);
        let (width, height) = stack.size();

        let mut frame = GridBuffer::new(width, height);
        frame.clear(config.theme_background);
        let mut renderer = DiffRenderer::with_config(config);
        renderer.invalidate();

        Self {
            stack,
            frame,
            previous: GridBuffer::new(width, height),
            renderer,
            sink,
            frames: 0,
        }
    }

    /// The layer stack.
    #[inline]
    pub const fn stack(&self) -> &LayerStack {
        &self.stack
    }

    /// The layer stack, for adding and drawing layers.
    #[inline]
    pub const fn stack_mut(&mut self) -> &mut LayerStack {
        &mut self.stack
    }

    /// The last composited frame.
    #[inline]
    pub const fn frame(&self) -> &GridBuffer {
        &self.frame
    }

    /// The renderer.
    #[inline]
    pub const fn renderer(&self) -> &DiffRenderer {
        &self.renderer
    }

    /// The renderer, for changing color depth or invalidating.
    #[inline]
    pub const fn renderer_mut(&mut self) -> &mut DiffRenderer {
        &mut self.renderer
    }

    /// The display sink.
    #[inline]
    pub const fn sink(&self) -> &W {
        &self.sink
    }

    /// The display sink, mutably.
    #[inline]
    pub const fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Consume the presenter and return its sink.
    pub fn into_sink(self) -> W {
        self.sink
    }

    /// Frames presented so far.
    #[inline]
    pub const fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Composite every layer, diff against the previous frame and write the
    /// update stream to the sink in one call.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn present(&mut self) -> io::Result<FrameStats> {
        self.stack.composite(&mut self.frame);
        self.flush_frame()
    }

    /// Show a snapshot instead of the composited layers.
    ///
    /// The frame is cleared to the theme background, the snapshot is
    /// applied at the origin and the result goes through the normal diff.
    /// Used to drive cross-fades.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn show_snapshot(&mut self, snapshot: &BufferSnapshot) -> io::Result<FrameStats> {
        self.frame.clear(self.stack.theme_background());
        snapshot.apply(&mut self.frame);
        self.flush_frame()
    }

    fn flush_frame(&mut self) -> io::Result<FrameStats> {
        let stats = self
            .renderer
            .render_to(&self.frame, &mut self.previous, &mut self.sink)?;
        self.frames += 1;
        Ok(stats)
    }

    /// Copy the last composited frame.
    pub fn capture(&self) -> BufferSnapshot {
        BufferSnapshot::capture(&self.frame)
    }

    /// Resize the surface. Layers come back transparent and must be
    /// redrawn; the next frame is a full redraw.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.stack.resize(width, height);
        let (width, height) = self.stack.size();
        self.frame.reallocate(width, height);
        self.frame.clear(self.stack.theme_background());
        self.renderer.invalidate();
        debug!(width, height, "presenter resized");
    }

    /// Apply one surface event.
    pub fn handle_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Resize { width, height } => self.resize(width, height),
            SurfaceEvent::Invalidate => self.renderer.invalidate(),
        }
    }

    /// Apply every event already queued on `events` without blocking.
    /// Returns how many were handled.
    pub fn drain_events(&mut self, events: &Receiver<SurfaceEvent>) -> usize {
        let mut handled = 0;
        for event in events.try_iter() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }
}

impl<W: Write> std::fmt::Debug for Presenter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presenter")
            .field("size", &self.frame.size())
            .field("layers", &self.stack.len())
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}
