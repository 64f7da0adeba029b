//! Text blocks: cached layout, rasterization, and scene glue

use std::rc::Rc;

use ink_scene::{Drawable, NodeId, Scene, Tint};
use tiny_skia::Color;

use crate::font::{FontEpoch, GlyphBackend};
use crate::layout::{LineSpan, fill_line};
use crate::raster::{LineBitmap, rasterize_line};
use crate::state::DirtyState;
use crate::style::TextStyle;
use crate::{Result, TextError};

/// Scales below this render nothing; measuring is skipped outright.
const MIN_SCALE: f32 = 1e-3;

/// A positionable block of wrapped, rasterized text.
///
/// The block owns one scene node per wrapped line and keeps them in sync
/// with its own position, scale, tint, and visibility on every
/// [`draw`](TextBlock::draw). Layout and rasterization rerun lazily: only
/// when the text, mask, width constraint, scale, or font epoch changed
/// since the last [`measure`](TextBlock::measure).
pub struct TextBlock {
    text: Vec<char>,
    style: TextStyle,
    backend: Rc<dyn GlyphBackend>,
    epoch: FontEpoch,
    seen_epoch: u64,
    state: DirtyState,
    mask: Option<Vec<bool>>,
    /// Width constraint in scene units; `None` is unbounded
    max_width: Option<f32>,
    fill: Color,

    pos: (f32, f32),
    scale: (f32, f32),
    tint: Tint,
    visible: bool,
    parent: Option<NodeId>,

    /// One node per wrapped line, same order as `spans`
    lines: Vec<NodeId>,
    spans: Vec<LineSpan>,
    /// Line height in scene units, valid after a rebuild
    line_height: f32,
    width: f32,
    height: f32,
}

impl TextBlock {
    /// Create a block over a glyph backend sized at `style.raster_size()`.
    ///
    /// Fails with [`TextError::ZeroFontSize`] when the style carries no
    /// positive font size.
    pub fn new(
        text: &str,
        style: TextStyle,
        backend: Rc<dyn GlyphBackend>,
        epoch: FontEpoch,
    ) -> Result<Self> {
        if style.size <= 0.0 {
            return Err(TextError::ZeroFontSize);
        }
        let seen_epoch = epoch.current();
        let state = DirtyState::on_mutation(style.multiline, false);
        Ok(Self {
            text: text.chars().collect(),
            style,
            backend,
            epoch,
            seen_epoch,
            state,
            mask: None,
            max_width: None,
            fill: Color::WHITE,
            pos: (0.0, 0.0),
            scale: (1.0, 1.0),
            tint: Tint::IDENTITY,
            visible: true,
            parent: None,
            lines: Vec::new(),
            spans: Vec::new(),
            line_height: 0.0,
            width: 0.0,
            height: 0.0,
        })
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.chars().collect();
        self.mark_dirty();
    }

    /// Per-visible-character reveal mask; `None` reveals everything
    pub fn set_mask(&mut self, mask: Option<Vec<bool>>) {
        self.mask = mask;
        self.mark_dirty();
    }

    /// Width constraint in scene units; `None` is unbounded
    pub fn set_max_width(&mut self, max_width: Option<f32>) {
        self.max_width = max_width;
        self.mark_dirty();
    }

    pub fn max_width(&self) -> Option<f32> {
        self.max_width
    }

    /// Solid glyph fill, applied at raster time
    pub fn set_fill(&mut self, fill: Color) {
        self.fill = fill;
        self.mark_dirty();
    }

    /// Reparent the block's line nodes under `parent`
    pub fn set_parent(&mut self, scene: &mut Scene, parent: Option<NodeId>) {
        self.parent = parent;
        self.attach_lines(scene);
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Set visibility and propagate it to every line node immediately
    pub fn set_visibility(&mut self, scene: &mut Scene, visible: bool) {
        self.visible = visible;
        for &id in &self.lines {
            scene.set_visible(id, visible);
        }
    }

    /// Rebuild cached lines if anything changed since the last call.
    ///
    /// No-op when the cache is clean, when a multiline block still waits
    /// for a width constraint, or when the horizontal scale is too small
    /// to produce visible output.
    pub fn measure(&mut self, scene: &mut Scene) -> Result<()> {
        if self.scale.0.abs() < MIN_SCALE {
            return Ok(());
        }
        if self.seen_epoch != self.epoch.current() {
            self.seen_epoch = self.epoch.current();
            self.release_lines(scene);
            self.mark_dirty();
        }
        if !self.state.can_rebuild() {
            return Ok(());
        }
        self.rebuild(scene)?;
        self.state = self.state.on_rebuilt();
        Ok(())
    }

    /// Measure, then sync every line node's transform, tint, and
    /// visibility for this frame. Safe to call every frame.
    pub fn draw(&mut self, scene: &mut Scene) -> Result<()> {
        self.measure(scene)?;
        self.attach_lines(scene);
        let render_scale = self.scale.0 / self.style.oversample;
        for (i, &id) in self.lines.iter().enumerate() {
            let Some(node) = scene.get_mut(id) else {
                continue;
            };
            node.tint = self.tint;
            node.visible = self.visible;
            node.pos = (
                self.pos.0,
                self.pos.1 + i as f32 * self.line_height * self.scale.1,
            );
            node.scale = (render_scale, render_scale);
        }
        Ok(())
    }

    /// Release line nodes and drop the text
    pub fn destroy(&mut self, scene: &mut Scene) {
        self.release_lines(scene);
        self.text.clear();
        self.mark_dirty();
    }

    /// Block width in scene units before scaling, valid after a measure
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Block height in scene units before scaling, valid after a measure
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Scaled vertical extent of the block
    pub fn base_line(&self) -> f32 {
        self.height * self.scale.1
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_nodes(&self) -> &[NodeId] {
        &self.lines
    }

    pub fn spans(&self) -> &[LineSpan] {
        &self.spans
    }

    pub fn state(&self) -> DirtyState {
        self.state
    }

    fn mark_dirty(&mut self) {
        self.state = DirtyState::on_mutation(self.style.multiline, self.max_width.is_some());
    }

    /// Detach and free every line node. Destroying through the scene
    /// detaches before freeing, so no parent keeps a stale reference.
    fn release_lines(&mut self, scene: &mut Scene) {
        for id in self.lines.drain(..) {
            scene.destroy(id);
        }
        self.spans.clear();
    }

    /// Put every line node under the block's parent. Idempotent.
    fn attach_lines(&self, scene: &mut Scene) {
        for &id in &self.lines {
            match self.parent {
                Some(parent) => scene.attach(parent, id),
                None => scene.detach(id),
            }
        }
    }

    fn rebuild(&mut self, scene: &mut Scene) -> Result<()> {
        let backend = Rc::clone(&self.backend);
        let oversample = self.style.oversample;
        self.line_height = backend.line_height() / oversample;
        self.release_lines(scene);
        self.width = 0.0;
        self.height = 0.0;

        let limit = self.max_width.map(|w| w / self.scale.0);
        let mut visible_index = 0usize;
        let mut start = 0usize;

        loop {
            let span = fill_line(&self.text, start, limit, |c| backend.advance(c) / oversample);
            let (bitmap, next_index) = rasterize_line(
                &self.text,
                &span,
                backend.as_ref(),
                oversample,
                self.fill,
                self.mask.as_deref(),
                visible_index,
            )?;
            visible_index = next_index;
            self.width = self.width.max(span.width);
            self.height += self.line_height;
            start = span.next;

            let node = match bitmap {
                LineBitmap::Empty => scene.create_group(),
                LineBitmap::Glyphs(pixmap) => scene.create_sprite(pixmap),
            };
            scene.set_visible(node, self.visible);
            self.lines.push(node);
            self.spans.push(span);

            if start >= self.text.len() {
                break;
            }
        }

        self.attach_lines(scene);
        tracing::debug!(
            lines = self.lines.len(),
            width = self.width,
            height = self.height,
            "rebuilt text block"
        );
        Ok(())
    }
}

impl Drawable for TextBlock {
    fn pos(&self) -> (f32, f32) {
        self.pos
    }

    fn set_pos(&mut self, x: f32, y: f32) {
        self.pos = (x, y);
    }

    fn scale(&self) -> (f32, f32) {
        self.scale
    }

    fn set_scale(&mut self, x: f32, y: f32) {
        self.scale = (x, y);
        self.mark_dirty();
    }

    fn tint(&self) -> Tint {
        self.tint
    }

    fn set_tint(&mut self, tint: Tint) {
        self.tint = tint;
    }

    fn visible(&self) -> bool {
        self.visible
    }

    /// Sets the flag only; line nodes pick it up on the next draw. Use
    /// [`TextBlock::set_visibility`] to propagate immediately.
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
