use std::fmt;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use rayon::prelude::*;

/// Fully transparent pixel.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
/// Background of the first layer and of every composite.
pub const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

// ============================================================================
// TILED IMAGE – sparse 64×64 chunk storage (Vec-indexed for speed)
// ============================================================================

pub const CHUNK_SIZE: u32 = 64;

/// A pixel with zero alpha, returned by reference for missing chunks.
static TRANSPARENT_PIXEL: Rgba<u8> = TRANSPARENT;

/// Sparse tiled image backed by a flat `Vec<Option<Arc<RgbaImage>>>`.
/// Chunk coordinates are mapped to a flat index via `cy * chunks_per_row + cx`.
///
/// Chunks are wrapped in `Arc` for copy-on-write semantics: `clone()` only
/// bumps reference counts, and `put_pixel` uses `Arc::make_mut` to clone just
/// the touched chunk.  A cloned image is therefore an immutable snapshot:
/// later edits to the original never show up in it.
#[derive(Clone)]
pub struct TiledImage {
    width: u32,
    height: u32,
    chunks_per_row: u32,
    chunks: Vec<Option<Arc<RgbaImage>>>,
}

impl TiledImage {
    // ---- construction -------------------------------------------------------

    /// Create an empty (fully transparent) tiled image.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let chunks_per_row = width.div_ceil(CHUNK_SIZE);
        let chunks_per_col = height.div_ceil(CHUNK_SIZE);
        let total = (chunks_per_row * chunks_per_col) as usize;
        Self {
            width,
            height,
            chunks_per_row,
            chunks: vec![None; total],
        }
    }

    /// Create an image where every pixel is `color`.
    pub fn new_filled(width: u32, height: u32, color: Rgba<u8>) -> Self {
        let mut img = Self::new(width, height);
        img.fill(color);
        img
    }

    // ---- coordinate helpers -------------------------------------------------

    #[inline]
    fn chunk_coord(x: u32, y: u32) -> (u32, u32) {
        (x / CHUNK_SIZE, y / CHUNK_SIZE)
    }

    #[inline]
    fn local(x: u32, y: u32) -> (u32, u32) {
        (x % CHUNK_SIZE, y % CHUNK_SIZE)
    }

    #[inline]
    fn flat_index(&self, cx: u32, cy: u32) -> usize {
        (cy * self.chunks_per_row + cx) as usize
    }

    // ---- pixel access -------------------------------------------------------

    /// Read a pixel (returns `&TRANSPARENT_PIXEL` for missing chunks and
    /// out-of-bounds coordinates).
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> &Rgba<u8> {
        if x >= self.width || y >= self.height {
            return &TRANSPARENT_PIXEL;
        }
        let (cx, cy) = Self::chunk_coord(x, y);
        let (lx, ly) = Self::local(x, y);
        self.chunks[self.flat_index(cx, cy)]
            .as_ref()
            .map(|c| c.get_pixel(lx, ly))
            .unwrap_or(&TRANSPARENT_PIXEL)
    }

    /// Write a pixel (creates the chunk on demand, COW-clones if shared).
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, pixel: Rgba<u8>) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (cx, cy) = Self::chunk_coord(x, y);
        let (lx, ly) = Self::local(x, y);
        let idx = self.flat_index(cx, cy);
        if pixel[3] == 0 && self.chunks[idx].is_none() {
            return;
        }
        let arc = self.chunks[idx]
            .get_or_insert_with(|| Arc::new(RgbaImage::new(CHUNK_SIZE, CHUNK_SIZE)));
        Arc::make_mut(arc).put_pixel(lx, ly, pixel);
    }

    // ---- bulk operations ----------------------------------------------------

    /// Replace every pixel with `color`.  Chunks are swapped out rather than
    /// written in place, so snapshots sharing the old chunks stay intact.
    pub fn fill(&mut self, color: Rgba<u8>) {
        if color[3] == 0 {
            self.clear();
            return;
        }
        let chunk = Arc::new(RgbaImage::from_pixel(CHUNK_SIZE, CHUNK_SIZE, color));
        for slot in &mut self.chunks {
            *slot = Some(Arc::clone(&chunk));
        }
    }

    /// Drop all chunks (make the image fully transparent).
    pub fn clear(&mut self) {
        for slot in &mut self.chunks {
            *slot = None;
        }
    }

    /// Coordinates of every populated chunk.
    pub fn chunk_keys(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let per_row = self.chunks_per_row;
        self.chunks
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_some())
            .map(move |(i, _)| (i as u32 % per_row, i as u32 / per_row))
    }

    /// Width accessor (matches `RgbaImage::width()`).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height accessor (matches `RgbaImage::height()`).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Approximate memory usage in bytes.
    /// Chunks shared with a snapshot are counted at pointer cost only.
    pub fn memory_bytes(&self) -> usize {
        let chunk_byte_size = (CHUNK_SIZE * CHUNK_SIZE * 4) as usize;
        self.chunks
            .iter()
            .filter_map(|c| c.as_ref())
            .map(|arc| {
                if Arc::strong_count(arc) == 1 {
                    chunk_byte_size
                } else {
                    std::mem::size_of::<usize>() * 2
                }
            })
            .sum()
    }

    /// Compare the in-bounds pixels of chunk `idx` against another image.
    fn chunk_pixels_eq(&self, other: &Self, idx: usize) -> bool {
        let cx = idx as u32 % self.chunks_per_row;
        let cy = idx as u32 / self.chunks_per_row;
        let x0 = cx * CHUNK_SIZE;
        let y0 = cy * CHUNK_SIZE;
        let x1 = (x0 + CHUNK_SIZE).min(self.width);
        let y1 = (y0 + CHUNK_SIZE).min(self.height);
        (y0..y1).all(|y| (x0..x1).all(|x| self.get_pixel(x, y) == other.get_pixel(x, y)))
    }
}

/// Pixel equality: a missing chunk equals a fully transparent one.
impl PartialEq for TiledImage {
    fn eq(&self, other: &Self) -> bool {
        if self.width != other.width || self.height != other.height {
            return false;
        }
        self.chunks
            .iter()
            .zip(&other.chunks)
            .enumerate()
            .all(|(idx, pair)| match pair {
                (None, None) => true,
                (Some(a), Some(b)) if Arc::ptr_eq(a, b) => true,
                _ => self.chunk_pixels_eq(other, idx),
            })
    }
}

impl Eq for TiledImage {}

impl fmt::Debug for TiledImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiledImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("chunks", &self.chunk_keys().count())
            .finish()
    }
}

// ============================================================================
// LAYERS
// ============================================================================

/// Opaque layer identity, unique and increasing within one canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub pixels: TiledImage,
    /// End point of the last stroke segment; `None` between strokes.
    cursor: Option<(f32, f32)>,
}

impl Layer {
    pub fn new(id: LayerId, name: String, width: u32, height: u32, fill_color: Rgba<u8>) -> Self {
        Self {
            id,
            name,
            visible: true,
            pixels: TiledImage::new_filled(width, height, fill_color),
            cursor: None,
        }
    }

    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }
}

/// Brush parameters for one stroke segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba<u8>,
    /// Diameter in canvas pixels.
    pub size: u32,
    /// Clear pixels (destination-out) instead of painting (source-over).
    pub erase: bool,
}

// ============================================================================
// CANVAS STATE – the layer raster engine
// ============================================================================

/// A stack of raster layers, composited bottom (index 0) to top.
///
/// Holds at least one layer at all times and the active index always
/// points into `layers`; every operation that would break either rule is a
/// no-op.
#[derive(Debug)]
pub struct CanvasState {
    pub width: u32,
    pub height: u32,
    background: Rgba<u8>,
    layers: Vec<Layer>,
    active_layer_index: usize,
    next_layer_id: u64,
    /// Monotonically increasing counter, bumped on every mutation.
    dirty_generation: u64,
}

impl CanvasState {
    /// Create a canvas with a single background layer filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        let mut state = Self {
            width: width.max(1),
            height: height.max(1),
            background,
            layers: Vec::new(),
            active_layer_index: 0,
            next_layer_id: 1,
            dirty_generation: 0,
        };
        state.add_layer(None);
        state
    }

    // ---- layer stack --------------------------------------------------------

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    pub fn active_layer(&self) -> &Layer {
        &self.layers[self.active_layer_index]
    }

    pub fn active_layer_id(&self) -> LayerId {
        self.active_layer().id
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    pub fn dirty_generation(&self) -> u64 {
        self.dirty_generation
    }

    pub fn mark_dirty(&mut self) {
        self.dirty_generation = self.dirty_generation.wrapping_add(1);
    }

    /// Push a new top-most layer and make it active.  The first layer of a
    /// canvas is filled with the background colour, later ones start
    /// transparent.
    pub fn add_layer(&mut self, name: Option<&str>) -> LayerId {
        let id = LayerId(self.next_layer_id);
        self.next_layer_id += 1;

        let first = self.layers.is_empty();
        let fill = if first { self.background } else { TRANSPARENT };
        let name = match name {
            Some(n) => n.to_string(),
            None if first => "Background".to_string(),
            None => format!("Layer {}", self.layers.len() + 1),
        };

        crate::log_info!("Add layer {} ({})", id, name);
        self.layers
            .push(Layer::new(id, name, self.width, self.height, fill));
        self.active_layer_index = self.layers.len() - 1;
        self.mark_dirty();
        id
    }

    /// Remove the active layer and activate the one below it.
    /// Returns `false` (and changes nothing) when it is the last layer.
    pub fn delete_active_layer(&mut self) -> bool {
        if self.layers.len() <= 1 {
            crate::log_warn!("Refusing to delete the last layer");
            return false;
        }
        let removed = self.layers.remove(self.active_layer_index);
        self.active_layer_index = self.active_layer_index.saturating_sub(1);
        crate::log_info!("Deleted layer {} ({})", removed.id, removed.name);
        self.mark_dirty();
        true
    }

    /// Switch the pointer-input target.  Unknown ids are ignored.
    pub fn set_active_layer(&mut self, id: LayerId) -> bool {
        match self.index_of(id) {
            Some(idx) => {
                self.active_layer_index = idx;
                true
            }
            None => false,
        }
    }

    pub fn set_layer_visible(&mut self, id: LayerId, visible: bool) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        if self.layers[idx].visible != visible {
            self.layers[idx].visible = visible;
            self.mark_dirty();
        }
        true
    }

    pub fn rename_layer(&mut self, id: LayerId, name: &str) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.layers[idx].name = name.to_string();
        true
    }

    // ---- painting -----------------------------------------------------------

    /// Append a round-capped segment from the active layer's cursor to
    /// `point`.  At the start of a stroke (no cursor) a single round dot is
    /// stamped.
    pub fn stroke_to(&mut self, point: (f32, f32), style: &StrokeStyle) {
        let layer = &mut self.layers[self.active_layer_index];
        let start = layer.cursor.unwrap_or(point);
        stamp_segment(&mut layer.pixels, start, point, style);
        layer.cursor = Some(point);
        self.mark_dirty();
    }

    /// Finish the current path; the next `stroke_to` starts a new one.
    pub fn end_stroke(&mut self) {
        for layer in &mut self.layers {
            layer.cursor = None;
        }
    }

    /// Colour of the active layer at `point`, if inside the canvas.
    pub fn sample_active(&self, point: (f32, f32)) -> Option<Rgba<u8>> {
        let (x, y) = point;
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        let (x, y) = (x.floor() as u32, y.floor() as u32);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(*self.active_layer().pixels.get_pixel(x, y))
    }

    /// Replace the whole active layer with `color`.
    pub fn fill_active_layer(&mut self, color: Rgba<u8>) {
        self.layers[self.active_layer_index].pixels.fill(color);
        self.mark_dirty();
    }

    // ---- snapshots ----------------------------------------------------------

    /// Copy-on-write snapshot of a layer's pixels.
    pub fn capture_layer(&self, id: LayerId) -> Option<TiledImage> {
        self.layer(id).map(|l| l.pixels.clone())
    }

    /// Put `pixels` back into layer `id` and make it the active layer.
    /// Returns `false` if the layer no longer exists.
    pub fn restore_layer(&mut self, id: LayerId, pixels: &TiledImage) -> bool {
        let Some(idx) = self.index_of(id) else {
            crate::log_warn!("Snapshot for missing layer {} ignored", id);
            return false;
        };
        self.layers[idx].pixels = pixels.clone();
        self.layers[idx].cursor = None;
        if self.active_layer_index != idx {
            self.active_layer_index = idx;
        }
        self.mark_dirty();
        true
    }

    // ---- compositing --------------------------------------------------------

    /// Flatten all visible layers over an opaque white background.
    /// Rows are composited in parallel.
    pub fn composite(&self) -> RgbaImage {
        let mut out = RgbaImage::from_pixel(self.width, self.height, DEFAULT_BACKGROUND);
        let visible: Vec<&Layer> = self.layers.iter().filter(|l| l.visible).collect();
        let row_len = self.width as usize * 4;

        let buf: &mut [u8] = &mut out;
        buf.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as u32;
                for (x, px) in row.chunks_exact_mut(4).enumerate() {
                    let mut acc = Rgba([px[0], px[1], px[2], px[3]]);
                    for layer in &visible {
                        acc = blend_over(acc, *layer.pixels.get_pixel(x as u32, y));
                    }
                    px.copy_from_slice(&acc.0);
                }
            });
        out
    }
}

/// Source-over compositing of straight-alpha pixels.
pub fn blend_over(base: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    if top[3] == 255 {
        return top;
    }
    if top[3] == 0 {
        return base;
    }
    let top_a = top[3] as f32 / 255.0;
    let base_a = base[3] as f32 / 255.0;
    let out_a = top_a + base_a * (1.0 - top_a);
    if out_a <= f32::EPSILON {
        return TRANSPARENT;
    }
    let channel = |i: usize| {
        let v = (top[i] as f32 * top_a + base[i] as f32 * base_a * (1.0 - top_a)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Squared distance from `p` to the segment `a`–`b`.
fn distance_sq_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + dx * t, a.1 + dy * t);
    (p.0 - cx) * (p.0 - cx) + (p.1 - cy) * (p.1 - cy)
}

/// Rasterise a capsule (round caps, round joins with neighbouring segments)
/// of diameter `style.size` between `start` and `end`.
fn stamp_segment(pixels: &mut TiledImage, start: (f32, f32), end: (f32, f32), style: &StrokeStyle) {
    // A 1px brush still has to cover a point that sits on a pixel corner.
    let radius = (style.size.max(1) as f32 / 2.0).max(std::f32::consts::FRAC_1_SQRT_2);
    let radius_sq = radius * radius;

    let min_x = (start.0.min(end.0) - radius).floor().max(0.0) as u32;
    let min_y = (start.1.min(end.1) - radius).floor().max(0.0) as u32;
    let max_x = ((start.0.max(end.0) + radius).ceil().max(0.0) as u32).min(pixels.width());
    let max_y = ((start.1.max(end.1) + radius).ceil().max(0.0) as u32).min(pixels.height());
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    for y in min_y..max_y {
        for x in min_x..max_x {
            let center = (x as f32 + 0.5, y as f32 + 0.5);
            if distance_sq_to_segment(center, start, end) > radius_sq {
                continue;
            }
            let base = *pixels.get_pixel(x, y);
            if style.erase {
                if base[3] != 0 {
                    pixels.put_pixel(x, y, TRANSPARENT);
                }
            } else {
                pixels.put_pixel(x, y, blend_over(base, style.color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn brush(color: Rgba<u8>, size: u32) -> StrokeStyle {
        StrokeStyle { color, size, erase: false }
    }

    fn eraser(size: u32) -> StrokeStyle {
        StrokeStyle { color: RED, size, erase: true }
    }

    #[test]
    fn new_canvas_has_opaque_background_layer() {
        let canvas = CanvasState::new(32, 16, DEFAULT_BACKGROUND);
        assert_eq!(canvas.layer_count(), 1);
        assert_eq!(canvas.active_layer().name, "Background");
        assert_eq!(*canvas.active_layer().pixels.get_pixel(31, 15), DEFAULT_BACKGROUND);
    }

    #[test]
    fn added_layers_are_transparent_active_and_unique() {
        let mut canvas = CanvasState::new(8, 8, DEFAULT_BACKGROUND);
        let first = canvas.active_layer_id();
        let a = canvas.add_layer(None);
        let b = canvas.add_layer(Some("Ink"));
        assert!(first < a && a < b);
        assert_eq!(canvas.active_layer_id(), b);
        assert_eq!(canvas.layer(a).map(|l| l.name.as_str()), Some("Layer 2"));
        assert_eq!(canvas.active_layer().name, "Ink");
        assert_eq!(*canvas.active_layer().pixels.get_pixel(3, 3), TRANSPARENT);
    }

    #[test]
    fn deleting_last_layer_is_refused() {
        let mut canvas = CanvasState::new(8, 8, DEFAULT_BACKGROUND);
        let only = canvas.active_layer_id();
        assert!(!canvas.delete_active_layer());
        assert_eq!(canvas.layer_count(), 1);
        assert_eq!(canvas.active_layer_id(), only);
    }

    #[test]
    fn deleting_activates_layer_below() {
        let mut canvas = CanvasState::new(8, 8, DEFAULT_BACKGROUND);
        let bottom = canvas.active_layer_id();
        let middle = canvas.add_layer(None);
        let top = canvas.add_layer(None);

        assert!(canvas.set_active_layer(middle));
        assert!(canvas.delete_active_layer());
        assert_eq!(canvas.active_layer_id(), bottom);
        assert!(canvas.layer(top).is_some());

        assert!(canvas.delete_active_layer());
        assert_eq!(canvas.active_layer_id(), top);
        assert_eq!(canvas.layer_count(), 1);
    }

    #[test]
    fn unknown_layer_id_is_ignored() {
        let mut canvas = CanvasState::new(8, 8, DEFAULT_BACKGROUND);
        let active = canvas.active_layer_id();
        assert!(!canvas.set_active_layer(LayerId(999)));
        assert_eq!(canvas.active_layer_id(), active);
    }

    #[test]
    fn stroke_paints_only_the_active_layer() {
        let mut canvas = CanvasState::new(64, 64, DEFAULT_BACKGROUND);
        let a = canvas.add_layer(None);
        let b = canvas.add_layer(None);
        canvas.set_active_layer(a);
        canvas.stroke_to((10.0, 10.0), &brush(RED, 5));
        canvas.stroke_to((30.0, 10.0), &brush(RED, 5));
        canvas.end_stroke();

        let layer_a = canvas.layer(a).map(|l| l.pixels.clone());
        assert_eq!(layer_a.as_ref().map(|p| *p.get_pixel(20, 10)), Some(RED));
        assert_eq!(layer_a.as_ref().map(|p| *p.get_pixel(20, 20)), Some(TRANSPARENT));
        assert_eq!(canvas.layer(b).map(|l| *l.pixels.get_pixel(20, 10)), Some(TRANSPARENT));
    }

    #[test]
    fn stroke_start_stamps_a_round_dot() {
        let mut canvas = CanvasState::new(32, 32, DEFAULT_BACKGROUND);
        canvas.add_layer(None);
        canvas.stroke_to((16.0, 16.0), &brush(BLUE, 6));
        let pixels = &canvas.active_layer().pixels;
        assert_eq!(*pixels.get_pixel(16, 16), BLUE);
        assert_eq!(*pixels.get_pixel(13, 16), BLUE);
        // Corner of the bounding square lies outside the circle.
        assert_eq!(*pixels.get_pixel(13, 13), TRANSPARENT);
        assert_eq!(canvas.active_layer().cursor(), Some((16.0, 16.0)));
        canvas.end_stroke();
        assert_eq!(canvas.active_layer().cursor(), None);
    }

    #[test]
    fn eraser_clears_pixels() {
        let mut canvas = CanvasState::new(32, 32, DEFAULT_BACKGROUND);
        canvas.stroke_to((5.0, 5.0), &eraser(4));
        canvas.stroke_to((25.0, 5.0), &eraser(4));
        let pixels = &canvas.active_layer().pixels;
        assert_eq!(*pixels.get_pixel(15, 5), TRANSPARENT);
        assert_eq!(*pixels.get_pixel(15, 20), DEFAULT_BACKGROUND);
    }

    #[test]
    fn sample_reads_active_layer_only() {
        let mut canvas = CanvasState::new(16, 16, DEFAULT_BACKGROUND);
        canvas.add_layer(None);
        canvas.fill_active_layer(RED);
        assert_eq!(canvas.sample_active((3.5, 4.2)), Some(RED));
        assert_eq!(canvas.sample_active((-1.0, 4.0)), None);
        assert_eq!(canvas.sample_active((16.0, 4.0)), None);
    }

    #[test]
    fn composite_stacks_visible_layers_over_white() {
        let mut canvas = CanvasState::new(16, 16, TRANSPARENT);
        let lower = canvas.add_layer(None);
        canvas.fill_active_layer(RED);
        let upper = canvas.add_layer(None);
        canvas.stroke_to((2.0, 2.0), &brush(BLUE, 2));

        let flat = canvas.composite();
        assert_eq!(*flat.get_pixel(2, 2), BLUE);
        assert_eq!(*flat.get_pixel(10, 10), RED);

        canvas.set_layer_visible(lower, false);
        canvas.set_layer_visible(upper, false);
        assert_eq!(*canvas.composite().get_pixel(10, 10), DEFAULT_BACKGROUND);
    }

    #[test]
    fn snapshots_are_isolated_from_later_edits() {
        let mut canvas = CanvasState::new(100, 100, DEFAULT_BACKGROUND);
        let id = canvas.active_layer_id();
        let before = canvas.capture_layer(id).expect("layer exists");
        canvas.stroke_to((50.0, 50.0), &brush(RED, 10));
        assert_eq!(*before.get_pixel(50, 50), DEFAULT_BACKGROUND);
        assert_ne!(before, canvas.active_layer().pixels);

        assert!(canvas.restore_layer(id, &before));
        assert_eq!(canvas.active_layer().pixels, before);
    }

    #[test]
    fn restore_reactivates_the_snapshot_layer() {
        let mut canvas = CanvasState::new(8, 8, DEFAULT_BACKGROUND);
        let bottom = canvas.active_layer_id();
        let snapshot = canvas.capture_layer(bottom).expect("layer exists");
        canvas.add_layer(None);
        assert!(canvas.restore_layer(bottom, &snapshot));
        assert_eq!(canvas.active_layer_id(), bottom);
        assert!(!canvas.restore_layer(LayerId(77), &snapshot));
    }

    #[test]
    fn missing_chunk_equals_transparent_chunk() {
        let empty = TiledImage::new(70, 70);
        let mut touched = TiledImage::new(70, 70);
        touched.put_pixel(65, 65, RED);
        touched.put_pixel(65, 65, TRANSPARENT);
        assert_eq!(empty, touched);
        touched.put_pixel(1, 1, RED);
        assert_ne!(empty, touched);
    }

    #[test]
    fn blend_over_mixes_translucent_colors() {
        let half_red = Rgba([255, 0, 0, 128]);
        let mixed = blend_over(Rgba([0, 0, 255, 255]), half_red);
        assert_eq!(mixed[3], 255);
        assert!(mixed[0] > 120 && mixed[2] > 120);
        assert_eq!(blend_over(BLUE, TRANSPARENT), BLUE);
    }
}
