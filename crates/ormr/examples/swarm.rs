//! Headless swarm demo: keep a population of a few thousand entities moving,
//! aging, dying, and respawning, once per fixed-step tick.
//!
//! Entities start inside a ±5 box with a small random velocity. The move
//! pass integrates positions and rotations; anything that drifts out of the
//! box picks up an `Age` and eventually dies; anything that drifts far past
//! it loses its `Velocity` and coasts no further. A spawn pass tops the
//! population back up every tick, and a rate pass logs throughput once per
//! 60 ticks.
//!
//! Run with `RUST_LOG=info cargo run --example swarm`.

use std::time::Instant;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ormr::prelude::*;

#[derive(Clone, Copy)]
struct Position(Vec3);

#[derive(Clone, Copy)]
struct Rotation(Vec3);

#[derive(Clone, Copy)]
struct Velocity(Vec3);

#[derive(Clone, Copy)]
struct Age {
    remaining: f64,
}

/// Spawner configuration, shared through the resource bag.
struct Spawner {
    target: usize,
    max_age: f64,
    rng: StdRng,
}

/// Tick counter for the throughput log.
struct FrameStats {
    ticks: u32,
    since: Instant,
}

const ENTITY_COUNT: usize = 3_000;
const ENTITY_MAX_AGE: f64 = 10.0 * 1000.0;
/// Past this distance on any axis an entity starts aging.
const AGING_BOUND: f32 = 5.0;
/// Past this distance it stops moving entirely.
const COASTING_BOUND: f32 = 12.0;

fn spawn_random(world: &mut World) {
    let (position, velocity) = {
        let spawner = world.resource_mut::<Spawner>();
        let mut coord = || spawner.rng.gen_range(-0.5f32..0.5) * 10.0;
        let position = Vec3::new(coord(), coord(), coord());
        let mut vel = || spawner.rng.gen_range(-0.5f32..0.5) * 0.001;
        (position, Vec3::new(vel(), vel(), vel()))
    };
    world
        .spawn((Position(position), Rotation(Vec3::ZERO), Velocity(velocity)))
        .expect("swarm component types are registered at startup");
}

/// Integrate positions; attach `Age` past the aging bound, drop `Velocity`
/// past the coasting bound.
fn move_system(world: &mut World, tick: Tick) {
    let mut movers = Vec::new();
    inner_join(
        |entity| movers.push(entity),
        world.store::<Position>().unwrap(),
        &[world.store::<Velocity>().unwrap()],
    );

    let delta = tick.delta as f32;
    let time = tick.elapsed as f32;
    for entity in movers {
        let Velocity(vel) = *world.get::<Velocity>(entity).unwrap();
        let position = {
            let Position(pos) = world.get_mut::<Position>(entity).unwrap();
            *pos += vel * delta;
            *pos
        };
        if let Some(Rotation(rot)) = world.get_mut::<Rotation>(entity) {
            rot.x = time * vel.x;
            rot.y = time * vel.y;
        }

        let out = position.abs().max_element();
        if out > AGING_BOUND && !world.has::<Age>(entity) {
            let remaining = {
                let spawner = world.resource_mut::<Spawner>();
                spawner.rng.gen_range(0.0..1.0) * spawner.max_age
            };
            world
                .insert(entity, (Age { remaining },))
                .expect("entity is alive within this tick");
        }
        if out > COASTING_BOUND && world.has::<Velocity>(entity) {
            world
                .remove::<Velocity>(entity)
                .expect("entity is alive within this tick");
        }
    }
}

/// Count ages down and despawn whatever runs out.
fn aging_system(world: &mut World, tick: Tick) {
    let aging = world.store::<Age>().unwrap().entities();
    for entity in aging {
        let remaining = {
            let age = world.get_mut::<Age>(entity).unwrap();
            age.remaining -= tick.delta;
            age.remaining
        };
        if remaining < 0.0 {
            world
                .despawn(entity)
                .expect("entity is alive within this tick");
        }
    }
}

/// Top the population back up to the target.
fn spawning_system(world: &mut World, _tick: Tick) {
    let target = world.resource::<Spawner>().target;
    while world.entity_count() < target {
        spawn_random(world);
    }
}

/// Log ticks-per-second every 60 ticks.
fn frame_rate_system(world: &mut World, _tick: Tick) {
    let entity_count = world.entity_count();
    let stats = world.resource_mut::<FrameStats>();
    stats.ticks += 1;
    if stats.ticks == 60 {
        let rate = 60.0 / stats.since.elapsed().as_secs_f64();
        log::info!("{rate:.0} ticks/s, {entity_count} entities");
        stats.ticks = 0;
        stats.since = Instant::now();
    }
}

fn main() {
    env_logger::init();

    let mut world = World::new();
    world.register_component::<Position>().unwrap();
    world.register_component::<Rotation>().unwrap();
    world.register_component::<Velocity>().unwrap();
    world.register_component::<Age>().unwrap();

    world.insert_resource(Spawner {
        target: ENTITY_COUNT,
        max_age: ENTITY_MAX_AGE,
        rng: StdRng::seed_from_u64(0x5eed),
    });
    world.insert_resource(FrameStats {
        ticks: 0,
        since: Instant::now(),
    });

    let setup = Instant::now();
    for _ in 0..ENTITY_COUNT {
        spawn_random(&mut world);
    }
    log::info!("spawned {ENTITY_COUNT} entities in {:?}", setup.elapsed());

    world.add_system(move_system);
    world.add_system(aging_system);
    world.add_system(spawning_system);
    world.add_system(frame_rate_system);

    // 600 ticks of a synthetic 60 Hz clock (milliseconds, like the browser's).
    let mut runner = Runner::new();
    let mut pacer = FixedStepPacer::new(0.0, 1000.0 / 60.0, 600);
    runner.run(&mut world, 0.0, &mut pacer);

    log::info!("done: {} entities alive", world.entity_count());
}
