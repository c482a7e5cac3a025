//! Drop a test body onto generated ground

use anyhow::{Context, Result};
use artillery_physics::rapier2d::prelude::*;
use artillery_physics::{insert_ground, GroundContacts, PhysicsWorld};
use artillery_terrain::Terrain;

const STEP: f32 = 1.0 / 60.0;
const PROBE_RADIUS: f32 = 0.5;
/// Height above the surface the probe starts from
const DROP_HEIGHT: f32 = 3.0;
/// Longest simulation the command will run
const MAX_SECONDS: f32 = 600.0;

pub struct DropArgs {
    pub config: String,
    pub x: Option<f32>,
    pub seconds: f32,
    pub seed: Option<u64>,
}

/// Where a dropped probe ended up
#[derive(Debug)]
pub struct DropOutcome {
    pub start: [f32; 2],
    pub rest: [f32; 2],
    pub surface_height: f32,
    pub grounded: bool,
}

/// Simulate a ball dropped above world x for the given time
pub fn simulate_drop(terrain: &Terrain, x: f32, seconds: f32) -> Result<DropOutcome> {
    if !(0.0..=MAX_SECONDS).contains(&seconds) {
        anyhow::bail!(
            "--seconds must be between 0 and {}, got {}",
            MAX_SECONDS,
            seconds
        );
    }

    let mut world = PhysicsWorld::new();
    insert_ground(&mut world, &terrain.boundary).context("Failed to build ground collider")?;

    let start = [x, terrain.surface_height(x) + DROP_HEIGHT];
    let probe = world.insert_rigid_body(
        RigidBodyBuilder::dynamic()
            .translation(vector![start[0], start[1]])
            .ccd_enabled(true)
            .build(),
    );
    world.insert_collider_with_parent(
        ColliderBuilder::ball(PROBE_RADIUS)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build(),
        probe,
    );

    // Events queue up across steps, so one update after the run replays them in order
    let steps = world
        .run_for(seconds, STEP)
        .context("Failed to run the drop simulation")?;
    let mut contacts = GroundContacts::new();
    contacts.update(&world);

    let rest = world
        .body_position(probe)
        .context("Probe body vanished from the simulation")?;

    tracing::debug!(steps, grounded = contacts.is_grounded(probe), "drop simulated");

    Ok(DropOutcome {
        start,
        rest,
        surface_height: terrain.surface_height(rest[0]),
        grounded: contacts.is_grounded(probe),
    })
}

pub fn run(args: DropArgs) -> Result<()> {
    let terrain = super::build_terrain(&args.config, args.seed)?;
    let x = args.x.unwrap_or(terrain.width() / 2.0);
    if !(0.0..=terrain.width()).contains(&x) {
        anyhow::bail!("x = {} is outside the terrain (0 .. {})", x, terrain.width());
    }

    let outcome = simulate_drop(&terrain, x, args.seconds)?;

    if let Some(seed) = terrain.seed {
        println!("Seed: {}", seed);
    }
    println!(
        "Dropped from ({:.2}, {:.2}), came to ({:.2}, {:.2})",
        outcome.start[0], outcome.start[1], outcome.rest[0], outcome.rest[1]
    );
    println!("Surface height there: {:.2}", outcome.surface_height);
    println!("Grounded: {}", if outcome.grounded { "yes" } else { "no" });

    Ok(())
}
