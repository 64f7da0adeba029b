//! Example: wrap a paragraph and reveal it character by character

use std::rc::Rc;

use ink_scene::{Compositor, Scene};
use ink_text::{BoxGlyphs, FontEpoch, FontLibrary, GlyphBackend, TextBlock, TextStyle};
use tiny_skia::Pixmap;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut scene = Scene::new();
    let root = scene.create_group();

    let style = TextStyle::new(10.0).multiline(true);

    // Prefer a real bold face; fall back to box glyphs on fontless hosts
    let mut library = FontLibrary::system();
    let backend: Rc<dyn GlyphBackend> = match library.bold_glyphs(&style) {
        Ok(glyphs) => Rc::new(glyphs),
        Err(_) => Rc::new(BoxGlyphs::new(style.raster_size())),
    };

    let mut block = TextBlock::new(
        "the quick brown fox jumps over the lazy dog",
        style,
        backend,
        library.epoch(),
    )
    .expect("positive font size");
    block.set_parent(&mut scene, Some(root));
    block.set_max_width(Some(120.0));

    // Reveal the first half of the visible characters
    let visible = block.text().chars().filter(|c| !c.is_whitespace()).count();
    let mask: Vec<bool> = (0..visible).map(|i| i < visible / 2).collect();
    block.set_mask(Some(mask));

    block.draw(&mut scene).expect("rasterization");

    let mut target = Pixmap::new(160, 120).unwrap();
    Compositor::render(&scene, root, &mut target);

    let inked = target.pixels().iter().filter(|p| p.alpha() > 0).count();
    println!(
        "{} lines, {:.0}x{:.0} units, {} inked pixels",
        block.line_count(),
        block.width(),
        block.height(),
        inked
    );
}
