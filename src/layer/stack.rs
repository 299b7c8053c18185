//! Layer stack and z-ordered compositing.
//!
//! ```text
//!  z = 2   ┌───────────┐   glyph or non-black bg  ──▶ replaces
//!  z = 1   │ ┌─────────┴─┐ empty glyph + black bg ──▶ shows through
//!  z = 0   │ │ ┌─────────┴─┐
//!          └─┤ │           │
//!            └─┤  theme bg │ ◀── dest.clear(theme_background)
//!              └───────────┘
//! ```

use crate::buffer::{GridBuffer, Rgb};
use tracing::debug;

/// A named, z-ordered grid.
#[derive(Debug, Clone)]
pub struct Layer {
    id: String,
    z: i32,
    visible: bool,
    buffer: GridBuffer,
}

impl Layer {
    /// Create a visible layer with a transparent buffer.
    pub fn new(id: impl Into<String>, z: i32, width: u16, height: u16) -> Self {
        Self {
            id: id.into(),
            z,
            visible: true,
            buffer: GridBuffer::transparent(width, height),
        }
    }

    /// The layer's id, unique within its stack.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Z-order; higher composites on top.
    #[inline]
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Change the z-order.
    pub const fn set_z(&mut self, z: i32) {
        self.z = z;
    }

    /// Whether the layer takes part in compositing.
    #[inline]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the layer.
    pub const fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// The layer's grid.
    #[inline]
    pub const fn buffer(&self) -> &GridBuffer {
        &self.buffer
    }

    /// The layer's grid, for drawing.
    #[inline]
    pub const fn buffer_mut(&mut self) -> &mut GridBuffer {
        &mut self.buffer
    }
}

/// A replacement for the built-in merge algorithm.
///
/// When installed, it receives the whole stack and is solely responsible for
/// producing the destination buffer. Closures with the matching signature
/// implement this trait.
pub trait Compositor: Send {
    /// Merge `stack` into `dest`.
    fn composite(&self, stack: &LayerStack, dest: &mut GridBuffer);
}

impl<F> Compositor for F
where
    F: Fn(&LayerStack, &mut GridBuffer) + Send,
{
    fn composite(&self, stack: &LayerStack, dest: &mut GridBuffer) {
        self(stack, dest);
    }
}

/// An ordered set of layers sharing the frame dimensions.
pub struct LayerStack {
    /// Layers in add order.
    layers: Vec<Layer>,
    width: u16,
    height: u16,
    theme_background: Rgb,
    compositor: Option<Box<dyn Compositor>>,
}

impl LayerStack {
    /// Create an empty stack for a `width` x `height` frame.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            layers: Vec::new(),
            width: width.max(1),
            height: height.max(1),
            theme_background: Rgb::BLACK,
            compositor: None,
        }
    }

    /// Frame width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Frame height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub const fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Number of layers.
    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the stack has no layers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// The color uncovered cells show after compositing.
    #[inline]
    pub const fn theme_background(&self) -> Rgb {
        self.theme_background
    }

    /// Set the color uncovered cells show after compositing.
    pub const fn set_theme_background(&mut self, bg: Rgb) {
        self.theme_background = bg;
    }

    /// Add a layer sized to the frame.
    ///
    /// If a layer with `id` already exists it is returned unchanged.
    pub fn add_layer(&mut self, id: &str, z: i32) -> &mut Layer {
        let index = match self.position(id) {
            Some(index) => index,
            None => {
                debug!(id, z, "layer added");
                self.layers.push(Layer::new(id, z, self.width, self.height));
                self.layers.len() - 1
            }
        };
        &mut self.layers[index]
    }

    /// Insert a prebuilt layer, which may have any size; only the overlap
    /// with the frame is composited.
    ///
    /// A layer with the same id is replaced in place (keeping its add-order
    /// position) and returned.
    pub fn insert_layer(&mut self, layer: Layer) -> Option<Layer> {
        debug!(id = layer.id(), z = layer.z(), size = ?layer.buffer.size(), "layer inserted");
        match self.position(&layer.id) {
            Some(index) => Some(std::mem::replace(&mut self.layers[index], layer)),
            None => {
                self.layers.push(layer);
                None
            }
        }
    }

    /// Remove a layer; the others keep their relative order.
    pub fn remove_layer(&mut self, id: &str) -> Option<Layer> {
        let index = self.position(id)?;
        debug!(id, "layer removed");
        Some(self.layers.remove(index))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Look up a layer by id.
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Look up a layer by id for drawing.
    pub fn layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Change a layer's z-order. Returns `false` if the id is unknown.
    pub fn set_z(&mut self, id: &str, z: i32) -> bool {
        match self.layer_mut(id) {
            Some(layer) => {
                layer.set_z(z);
                true
            }
            None => false,
        }
    }

    /// Show or hide a layer. Returns `false` if the id is unknown.
    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        match self.layer_mut(id) {
            Some(layer) => {
                layer.set_visible(visible);
                true
            }
            None => false,
        }
    }

    /// Layers in add order.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Layers in compositing order: ascending z, ties in add order.
    pub fn ordered(&self) -> Vec<&Layer> {
        let mut order: Vec<&Layer> = self.layers.iter().collect();
        order.sort_by_key(|l| l.z);
        order
    }

    /// Reallocate every layer to the new frame size, cleared transparent.
    ///
    /// Content is discarded. Resizing to the current size does nothing.
    pub fn resize(&mut self, width: u16, height: u16) {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == self.size() {
            return;
        }
        debug!(
            from = ?self.size(),
            to = ?(width, height),
            layers = self.layers.len(),
            "layer stack resized"
        );
        self.width = width;
        self.height = height;
        for layer in &mut self.layers {
            layer.buffer.reallocate(width, height);
        }
    }

    /// Install a replacement compositor, dropping any previous one.
    pub fn set_compositor(&mut self, compositor: impl Compositor + 'static) {
        debug!(replaced = self.compositor.is_some(), "compositor override installed");
        self.compositor = Some(Box::new(compositor));
    }

    /// Go back to the built-in compositor. Returns the removed override.
    pub fn clear_compositor(&mut self) -> Option<Box<dyn Compositor>> {
        let previous = self.compositor.take();
        if previous.is_some() {
            debug!("compositor override removed");
        }
        previous
    }

    /// Whether an override compositor is installed.
    #[inline]
    pub fn has_compositor(&self) -> bool {
        self.compositor.is_some()
    }

    /// Merge all visible layers into `dest`.
    ///
    /// An empty stack leaves `dest` untouched. Otherwise the installed
    /// override runs if there is one, else [`composite_default`].
    ///
    /// [`composite_default`]: LayerStack::composite_default
    pub fn composite(&self, dest: &mut GridBuffer) {
        if self.layers.is_empty() {
            return;
        }
        match &self.compositor {
            Some(compositor) => compositor.composite(self, dest),
            None => self.composite_default(dest),
        }
    }

    /// The built-in algorithm: clear to the theme background, then paint
    /// visible layers in ascending z with the replace-or-skip rule.
    pub fn composite_default(&self, dest: &mut GridBuffer) {
        dest.clear(self.theme_background);
        for layer in self.ordered() {
            if layer.visible {
                blit_layer(&layer.buffer, dest);
            }
        }
    }
}

/// Paint `src` onto `dest` over their overlapping area.
///
/// A source cell replaces the destination cell iff it has a glyph or a
/// non-black background. Clip and offset of both buffers are ignored.
pub fn blit_layer(src: &GridBuffer, dest: &mut GridBuffer) {
    let width = src.width().min(dest.width());
    let height = src.height().min(dest.height());
    for y in 0..height {
        for (x, cell) in src.row(y)[..usize::from(width)].iter().enumerate() {
            if cell.is_opaque() {
                dest.set(x as u16, y, cell.clone());
            }
        }
    }
}

/// Composite `stack` into `dest`. See [`LayerStack::composite`].
pub fn composite_layers(stack: &LayerStack, dest: &mut GridBuffer) {
    stack.composite(dest);
}

impl std::fmt::Debug for LayerStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerStack")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("theme_background", &self.theme_background)
            .field("layers", &self.layers.iter().map(Layer::id).collect::<Vec<_>>())
            .field("compositor", &self.compositor.is_some())
            .finish()
    }
}
