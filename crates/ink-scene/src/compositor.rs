//! CPU compositing of a scene into a pixmap

use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::node::{NodeContent, NodeId, Tint};
use crate::scene::Scene;

/// Flattens visible sprite nodes into a target pixmap.
///
/// Traversal is depth-first from the given root, parents before children,
/// siblings in attach order. Invisible nodes prune their whole subtree.
pub struct Compositor;

impl Compositor {
    pub fn render(scene: &Scene, root: NodeId, target: &mut Pixmap) {
        Self::render_node(scene, root, Transform::identity(), target);
    }

    fn render_node(scene: &Scene, id: NodeId, parent_tx: Transform, target: &mut Pixmap) {
        let Some(node) = scene.get(id) else {
            return;
        };
        if !node.visible {
            return;
        }

        let world = scene.local_transform(id).post_concat(parent_tx);

        if let NodeContent::Sprite(pixmap) = &node.content {
            let paint = PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            };
            if node.tint.is_identity() {
                target.draw_pixmap(0, 0, pixmap.as_ref(), &paint, world, None);
            } else {
                let tinted = tinted(pixmap, node.tint);
                target.draw_pixmap(0, 0, tinted.as_ref(), &paint, world, None);
            }
        }

        for &child in node.children() {
            Self::render_node(scene, child, world, target);
        }
    }
}

/// Apply multiply + additive modulation to a premultiplied RGBA pixmap.
fn tinted(pixmap: &Pixmap, tint: Tint) -> Pixmap {
    let mut out = pixmap.clone();
    let m = tint.multiply;
    let add = tint.add;
    for px in out.data_mut().chunks_exact_mut(4) {
        let a = px[3] as f32 / 255.0;
        if a <= 0.0 && add[3] <= 0.0 {
            continue;
        }
        // Premultiplied bytes -> straight channels
        let straight = |p: u8| {
            if a > 0.0 {
                (p as f32 / 255.0) / a
            } else {
                0.0
            }
        };
        let na = (a * m[3] + add[3]).clamp(0.0, 1.0);
        let nr = (straight(px[0]) * m[0] + add[0]).clamp(0.0, 1.0);
        let ng = (straight(px[1]) * m[1] + add[1]).clamp(0.0, 1.0);
        let nb = (straight(px[2]) * m[2] + add[2]).clamp(0.0, 1.0);
        px[0] = (nr * na * 255.0 + 0.5) as u8;
        px[1] = (ng * na * 255.0 + 0.5) as u8;
        px[2] = (nb * na * 255.0 + 0.5) as u8;
        px[3] = (na * 255.0 + 0.5) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Color;

    fn solid_sprite(scene: &mut Scene, w: u32, h: u32) -> NodeId {
        let mut pixmap = Pixmap::new(w, h).unwrap();
        pixmap.fill(Color::WHITE);
        scene.create_sprite(pixmap)
    }

    fn alpha_at(target: &Pixmap, x: u32, y: u32) -> u8 {
        target.pixels()[(y * target.width() + x) as usize].alpha()
    }

    #[test]
    fn test_sprite_drawn_at_node_pos() {
        let mut scene = Scene::new();
        let root = scene.create_group();
        let sprite = solid_sprite(&mut scene, 4, 4);
        scene.attach(root, sprite);
        scene.get_mut(sprite).unwrap().pos = (8.0, 8.0);

        let mut target = Pixmap::new(16, 16).unwrap();
        Compositor::render(&scene, root, &mut target);

        assert_eq!(alpha_at(&target, 9, 9), 255);
        assert_eq!(alpha_at(&target, 1, 1), 0);
    }

    #[test]
    fn test_invisible_subtree_skipped() {
        let mut scene = Scene::new();
        let root = scene.create_group();
        let group = scene.create_group();
        let sprite = solid_sprite(&mut scene, 4, 4);
        scene.attach(root, group);
        scene.attach(group, sprite);
        scene.set_visible(group, false);

        let mut target = Pixmap::new(8, 8).unwrap();
        Compositor::render(&scene, root, &mut target);

        assert!(target.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn test_multiply_alpha_tint() {
        let mut scene = Scene::new();
        let root = scene.create_group();
        let sprite = solid_sprite(&mut scene, 2, 2);
        scene.attach(root, sprite);
        scene.get_mut(sprite).unwrap().tint = Tint::alpha(0.5);

        let mut target = Pixmap::new(2, 2).unwrap();
        Compositor::render(&scene, root, &mut target);

        let alpha = alpha_at(&target, 0, 0);
        assert!((120..=135).contains(&alpha), "alpha was {alpha}");
    }

    #[test]
    fn test_parent_transform_composes() {
        let mut scene = Scene::new();
        let root = scene.create_group();
        let group = scene.create_group();
        let sprite = solid_sprite(&mut scene, 2, 2);
        scene.attach(root, group);
        scene.attach(group, sprite);
        scene.get_mut(group).unwrap().pos = (4.0, 0.0);
        scene.get_mut(sprite).unwrap().pos = (0.0, 4.0);

        let mut target = Pixmap::new(8, 8).unwrap();
        Compositor::render(&scene, root, &mut target);

        assert_eq!(alpha_at(&target, 5, 5), 255);
        assert_eq!(alpha_at(&target, 0, 0), 0);
    }
}
