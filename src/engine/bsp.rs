//! Front-to-back BSP traversal.
//!
//! The half-space containing the eye is descended first, unconditionally;
//! the far half-space only when its bounding box could still put something
//! on screen, which prunes whole subtrees once the nearer geometry has
//! closed their columns.

use crate::angle::ANG180;
use crate::engine::{Engine, FrameTiming, RenderError, VisSink};
use crate::world::bsp::{CHILD_MASK, SUBSECTOR_BIT};
use crate::world::geometry::{Aabb, Level};
use crate::world::view::Viewpoint;
use glam::{Vec2, vec2};

impl Engine {
    pub(crate) fn walk_node<S: VisSink>(
        &mut self,
        level: &Level,
        view: &Viewpoint,
        timing: FrameTiming,
        sink: &mut S,
        child: u16,
        visited: &mut usize,
    ) -> Result<(), RenderError> {
        *visited += 1;

        if child & SUBSECTOR_BIT != 0 {
            let idx = if child == u16::MAX {
                // Map without nodes: the lone subsector.
                0
            } else {
                (child & CHILD_MASK) as usize
            };
            return self.draw_subsector(level, view, timing, sink, idx);
        }

        let node = &level.nodes[child as usize];
        let side = node.point_side(view.pos.truncate());

        // Near side first.
        self.walk_node(level, view, timing, sink, node.child[side], visited)?;

        // Far side only if anything of it can still show through.
        if self.bbox_visible(view, &node.bbox[side ^ 1]) {
            self.walk_node(level, view, timing, sink, node.child[side ^ 1], visited)?;
        }
        Ok(())
    }

    /// Could any part of `bbox` still be visible?
    ///
    /// Projects the two silhouette corners of the box, picked by which of
    /// the nine regions around the box the eye falls into, and asks the
    /// occlusion map whether that column range is already sealed by a
    /// single solid span. The corner selection is the classic engine's
    /// table, kept as-is.
    pub(crate) fn bbox_visible(&self, view: &Viewpoint, bbox: &Aabb) -> bool {
        let eye = view.pos.truncate();

        let bx = if eye.x <= bbox.min.x {
            0
        } else if eye.x < bbox.max.x {
            1
        } else {
            2
        };
        let by = if eye.y >= bbox.max.y {
            0
        } else if eye.y > bbox.min.y {
            1
        } else {
            2
        };

        let boxpos = (by << 2) + bx;
        if boxpos == 5 {
            // Eye inside the box.
            return true;
        }

        let (p1, p2): (Vec2, Vec2) = match boxpos {
            0 => (vec2(bbox.max.x, bbox.max.y), vec2(bbox.min.x, bbox.min.y)),
            1 => (vec2(bbox.max.x, bbox.max.y), vec2(bbox.min.x, bbox.max.y)),
            2 => (vec2(bbox.max.x, bbox.min.y), vec2(bbox.min.x, bbox.max.y)),
            4 => (vec2(bbox.min.x, bbox.max.y), vec2(bbox.min.x, bbox.min.y)),
            6 => (vec2(bbox.max.x, bbox.min.y), vec2(bbox.max.x, bbox.max.y)),
            8 => (vec2(bbox.min.x, bbox.max.y), vec2(bbox.max.x, bbox.min.y)),
            9 => (vec2(bbox.min.x, bbox.min.y), vec2(bbox.max.x, bbox.min.y)),
            _ => (vec2(bbox.min.x, bbox.min.y), vec2(bbox.max.x, bbox.max.y)),
        };

        let mut angle1 = view.angle_to(p1) - view.angle;
        let mut angle2 = view.angle_to(p2) - view.angle;

        let span = angle1 - angle2;
        if span >= ANG180 {
            // Eye sits on one of the box edges.
            return true;
        }

        let clip = self.projection.clip_angle();
        let mut tspan = angle1 + clip;
        if tspan > clip + clip {
            tspan -= clip + clip;
            if tspan >= span {
                return false;
            }
            angle1 = clip;
        }
        tspan = clip - angle2;
        if tspan > clip + clip {
            tspan -= clip + clip;
            if tspan >= span {
                return false;
            }
            angle2 = -clip;
        }

        let sx1 = self.projection.angle_to_column(angle1);
        let sx2 = self.projection.angle_to_column(angle2);
        if sx1 == sx2 {
            return false;
        }

        !self.solid.covers(sx1, sx2 - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::Angle;
    use crate::engine::planes::VisPlanes;
    use crate::world::geometry::{
        Linedef, LinedefFlags, NO_TEXTURE, Node, Sector, Seg, Sidedef, Subsector, TextureId,
        Vertex,
    };
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    fn engine() -> Engine {
        Engine::new(320, FRAC_PI_2)
    }

    fn eye(x: f32, y: f32) -> Viewpoint {
        Viewpoint::new(Vec3::new(x, y, 41.0), Angle::ZERO)
    }

    fn bbox(x1: f32, y1: f32, x2: f32, y2: f32) -> Aabb {
        Aabb {
            min: vec2(x1, y1),
            max: vec2(x2, y2),
        }
    }

    #[test]
    fn eye_inside_box_is_always_visible() {
        // Even with the whole screen sealed off.
        let mut e = engine();
        e.solid.mark_solid(0, 319).unwrap();
        assert!(e.bbox_visible(&eye(50.0, 50.0), &bbox(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn box_behind_eye_is_invisible() {
        let e = engine();
        assert!(!e.bbox_visible(&eye(0.0, 0.0), &bbox(-200.0, -50.0, -100.0, 50.0)));
    }

    #[test]
    fn box_ahead_is_visible_on_open_screen() {
        let e = engine();
        assert!(e.bbox_visible(&eye(0.0, 0.0), &bbox(100.0, -50.0, 200.0, 50.0)));
    }

    #[test]
    fn box_sealed_by_one_solid_span_is_pruned() {
        let mut e = engine();
        e.solid.mark_solid(0, 319).unwrap();
        assert!(!e.bbox_visible(&eye(0.0, 0.0), &bbox(100.0, -50.0, 200.0, 50.0)));
    }

    #[test]
    fn box_straddling_two_solid_spans_stays_visible() {
        let mut e = engine();
        // Hole in the middle of the screen.
        e.solid.mark_solid(0, 150).unwrap();
        e.solid.mark_solid(170, 319).unwrap();
        assert!(e.bbox_visible(&eye(0.0, 0.0), &bbox(100.0, -50.0, 200.0, 50.0)));
    }

    /// Two rooms split at x = 256 by one BSP node. When `open`, the
    /// divider is a step (pass-through window); otherwise the east room's
    /// ceiling sits at its floor, shutting the divider like a door.
    fn two_room_map(open: bool) -> Level {
        let vertices = [
            (0.0, 0.0),
            (256.0, 0.0),
            (512.0, 0.0),
            (512.0, 256.0),
            (256.0, 256.0),
            (0.0, 256.0),
        ]
        .map(|(x, y)| Vertex { pos: vec2(x, y) });

        let solid = |v1, v2, sd| Linedef {
            v1,
            v2,
            flags: LinedefFlags::IMPASSABLE,
            special: 0,
            tag: 0,
            right_sidedef: Some(sd),
            left_sidedef: None,
        };
        let mut linedefs = vec![
            solid(1, 0, 0),
            solid(0, 5, 0),
            solid(5, 4, 0),
            solid(2, 1, 1),
            solid(3, 2, 1),
            solid(4, 3, 1),
        ];
        linedefs.push(Linedef {
            v1: 1,
            v2: 4,
            flags: LinedefFlags::TWO_SIDED,
            special: 0,
            tag: 0,
            right_sidedef: Some(2),
            left_sidedef: Some(3),
        });

        let side = |sector, middle| Sidedef {
            x_off: 0.0,
            y_off: 0.0,
            upper: NO_TEXTURE,
            lower: NO_TEXTURE,
            middle,
            sector,
        };
        let sidedefs = vec![
            side(0, TextureId(1)),
            side(1, TextureId(1)),
            side(1, NO_TEXTURE),
            side(0, NO_TEXTURE),
        ];

        let seg = |v1, v2, linedef, side| Seg {
            v1,
            v2,
            linedef,
            side,
            offset: 0.0,
        };
        let segs = vec![
            // West subsector, interior on each seg's right.
            seg(4, 1, 6, 1),
            seg(1, 0, 0, 0),
            seg(0, 5, 1, 0),
            seg(5, 4, 2, 0),
            // East subsector.
            seg(1, 4, 6, 0),
            seg(2, 1, 3, 0),
            seg(3, 2, 4, 0),
            seg(4, 3, 5, 0),
        ];

        let subsectors = vec![
            Subsector {
                first_seg: 0,
                seg_count: 4,
                sector: 0,
                poly: None,
            },
            Subsector {
                first_seg: 4,
                seg_count: 4,
                sector: 1,
                poly: None,
            },
        ];

        let nodes = vec![Node {
            pos: vec2(256.0, 0.0),
            delta: vec2(0.0, 256.0),
            bbox: [
                bbox(256.0, 0.0, 512.0, 256.0),
                bbox(0.0, 0.0, 256.0, 256.0),
            ],
            child: [SUBSECTOR_BIT | 1, SUBSECTOR_BIT],
        }];

        let east = if open {
            Sector::at_rest(32.0, 128.0, TextureId(5), TextureId(6))
        } else {
            Sector::at_rest(0.0, 0.0, TextureId(5), TextureId(6))
        };
        let sectors = vec![Sector::at_rest(0.0, 128.0, TextureId(5), TextureId(6)), east];

        Level {
            name: "two rooms".into(),
            vertices: vertices.to_vec(),
            linedefs,
            sidedefs,
            segs,
            subsectors,
            nodes,
            sectors,
            polyobjs: Vec::new(),
            sky_tex: TextureId(9),
        }
    }

    #[test]
    fn traversal_visits_near_room_before_far_room() {
        let lvl = two_room_map(true);
        let mut e = engine();
        let mut sink = VisPlanes::default();
        e.render_frame(&lvl, &eye(64.0, 128.0), FrameTiming::default(), &mut sink)
            .unwrap();

        // Sprite requests arrive in traversal order: eye's room first.
        assert_eq!(sink.sprite_sectors(), &[0, 1]);
        // The step's far walls made it through the open divider.
        assert!(e.wall_ranges().iter().any(|r| r.seg >= 4));
    }

    #[test]
    fn closed_divider_prunes_the_far_room() {
        let lvl = two_room_map(false);
        let mut e = engine();
        let mut sink = VisPlanes::default();
        e.render_frame(&lvl, &eye(64.0, 128.0), FrameTiming::default(), &mut sink)
            .unwrap();

        assert_eq!(sink.sprite_sectors(), &[0]);
        assert!(e.wall_ranges().iter().all(|r| r.seg < 4));
    }

    #[test]
    fn corner_selection_covers_all_nine_regions() {
        let e = engine();
        let bb = bbox(100.0, -50.0, 200.0, 50.0);
        // One eye per region around (and inside) the box, all looking
        // east with a ±45° cone; exercises every table row.
        for (x, y, expect) in [
            (50.0, 100.0, true),    // NW: box reaches into the cone
            (150.0, 100.0, false),  // N: silhouette grazes the cone edge
            (250.0, 100.0, false),  // NE: box is behind-left
            (50.0, 0.0, true),      // W: box dead ahead
            (150.0, 0.0, true),     // inside the box
            (250.0, 0.0, false),    // E: box entirely behind
            (50.0, -100.0, true),   // SW: box reaches into the cone
            (150.0, -100.0, false), // S: silhouette grazes the cone edge
            (250.0, -100.0, false), // SE: box is behind-right
        ] {
            assert_eq!(
                e.bbox_visible(&eye(x, y), &bb),
                expect,
                "eye at ({x}, {y})"
            );
        }
    }
}
