//! Dump the visible-surface output for one frame over a built-in two-room
//! map. Useful for eyeballing what the traversal emits from a given eye
//! position without a rasterizer attached.

use anyhow::Result;
use clap::Parser;
use glam::{Vec3, vec2};
use log::info;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use viswalk::world::geometry::{
    Aabb, Level, Linedef, LinedefFlags, Node, PolyObj, Sector, Seg, Sidedef, Subsector, TextureId,
    NO_TEXTURE,
};
use viswalk::world::bsp::SUBSECTOR_BIT;
use viswalk::{Angle, Engine, FrameTiming, VisPlanes, Viewpoint};

#[derive(Parser, Debug)]
#[command(about = "Dump one frame of visible-surface output")]
struct Args {
    /// Screen width in columns.
    #[arg(long, default_value_t = 320)]
    width: usize,

    /// Horizontal field of view in degrees.
    #[arg(long, default_value_t = 90.0)]
    fov: f32,

    /// Eye x position.
    #[arg(short, default_value_t = 64.0)]
    x: f32,

    /// Eye y position.
    #[arg(short, default_value_t = 128.0)]
    y: f32,

    /// Heading in degrees (0 looks along +x).
    #[arg(short, long, default_value_t = 0.0)]
    angle: f32,

    /// Interpolate moving sectors between tics.
    #[arg(long)]
    uncapped: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

const WALL: TextureId = TextureId(1);
const STEP: TextureId = TextureId(2);
const FLAT: TextureId = TextureId(3);
const SKY: TextureId = TextureId(4);

/// Two rooms joined by a step: a west room at floor 0 and an east room at
/// floor 32, split by a two-sided linedef at x = 256. One BSP node.
fn demo_level() -> Level {
    let verts = [
        vec2(0.0, 0.0),     // 0
        vec2(256.0, 0.0),   // 1
        vec2(512.0, 0.0),   // 2
        vec2(512.0, 256.0), // 3
        vec2(256.0, 256.0), // 4
        vec2(0.0, 256.0),   // 5
    ];

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

    let side = |sector, lower, middle| Sidedef {
        x_off: 0.0,
        y_off: 0.0,
        upper: NO_TEXTURE,
        lower,
        middle,
        sector,
    };
    let sidedefs = vec![
        side(0, NO_TEXTURE, WALL), // west room walls
        side(1, NO_TEXTURE, WALL), // east room walls
        side(1, STEP, NO_TEXTURE), // divider, east face
        side(0, STEP, NO_TEXTURE), // divider, west face
    ];

    let seg = |v1, v2, linedef, side| Seg {
        v1,
        v2,
        linedef,
        side,
        offset: 0.0,
    };
    let segs = vec![
        // West subsector, wound with the interior on the right.
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

    // Split at x = 256; front (child 0) is the east half.
    let nodes = vec![Node {
        pos: vec2(256.0, 0.0),
        delta: vec2(0.0, 256.0),
        bbox: [
            Aabb {
                min: vec2(256.0, 0.0),
                max: vec2(512.0, 256.0),
            },
            Aabb {
                min: vec2(0.0, 0.0),
                max: vec2(256.0, 256.0),
            },
        ],
        child: [SUBSECTOR_BIT | 1, SUBSECTOR_BIT],
    }];

    let sectors = vec![
        Sector::at_rest(0.0, 128.0, FLAT, FLAT),
        Sector::at_rest(32.0, 128.0, FLAT, SKY),
    ];

    Level {
        name: "demo".into(),
        vertices: verts
            .iter()
            .map(|&pos| viswalk::world::geometry::Vertex { pos })
            .collect(),
        linedefs,
        sidedefs,
        segs,
        subsectors,
        nodes,
        sectors,
        polyobjs: Vec::<PolyObj>::new(),
        sky_tex: SKY,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let filter = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        filter,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let level = demo_level();
    let eye_xy = vec2(args.x, args.y);
    let sub = level.locate_subsector(eye_xy) as usize;
    let eye_z = level.sectors[level.subsectors[sub].sector as usize].floor_h + 41.0;
    let view = Viewpoint::new(
        Vec3::new(args.x, args.y, eye_z),
        Angle::from_radians(args.angle.to_radians()),
    );
    info!(
        "eye ({:.1}, {:.1}, {:.1}) heading {:.1} deg, subsector {sub}",
        args.x, args.y, eye_z, args.angle
    );

    let timing = FrameTiming {
        tic: 1,
        frac: 0.0,
        uncapped: args.uncapped,
    };
    let mut engine = Engine::new(args.width, args.fov.to_radians());
    let mut sink = VisPlanes::default();
    engine.render_frame(&level, &view, timing, &mut sink)?;

    println!("wall ranges ({}):", engine.wall_ranges().len());
    for r in engine.wall_ranges() {
        println!(
            "  seg {:3}  columns [{:3}, {:3}]  angle {:?}",
            r.seg, r.x1, r.x2, r.raw_angle
        );
    }
    println!("planes ({}):", sink.planes().len());
    for (id, p) in sink.planes().iter().enumerate() {
        println!(
            "  {id}: height {:6.1}  tex {:?}  light {}  special {}",
            p.height, p.tex, p.light, p.special
        );
    }
    println!("sprite sectors: {:?}", sink.sprite_sectors());
    Ok(())
}
