//! Throughput benchmarks at the demo's population scale: spawning, join
//! traversal, and a full move+age tick over a few thousand entities.

use std::hint::black_box;

use criterion::*;

use ormr::prelude::*;

const POPULATION: u64 = 3_000;

#[derive(Clone, Copy)]
struct Position {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Clone, Copy)]
struct Velocity {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Clone, Copy)]
struct Age {
    remaining: f64,
}

fn registered_world() -> World {
    let mut world = World::new();
    world.register_component::<Position>().unwrap();
    world.register_component::<Velocity>().unwrap();
    world.register_component::<Age>().unwrap();
    world
}

fn populate(world: &mut World, count: u64) {
    for i in 0..count {
        let spread = (i % 100) as f64 * 0.1;
        world
            .spawn((
                Position {
                    x: spread,
                    y: -spread,
                    z: 0.0,
                },
                Velocity {
                    x: 0.001,
                    y: -0.001,
                    z: 0.0005,
                },
            ))
            .unwrap();
    }
}

fn move_system(world: &mut World, tick: Tick) {
    let mut movers = Vec::new();
    inner_join(
        |entity| movers.push(entity),
        world.store::<Position>().unwrap(),
        &[world.store::<Velocity>().unwrap()],
    );
    for entity in movers {
        let vel = *world.get::<Velocity>(entity).unwrap();
        let pos = world.get_mut::<Position>(entity).unwrap();
        pos.x += vel.x * tick.delta;
        pos.y += vel.y * tick.delta;
        pos.z += vel.z * tick.delta;
    }
}

fn aging_system(world: &mut World, tick: Tick) {
    let aging = world.store::<Age>().unwrap().entities();
    for entity in aging {
        let remaining = {
            let age = world.get_mut::<Age>(entity).unwrap();
            age.remaining -= tick.delta;
            age.remaining
        };
        if remaining < 0.0 {
            world.despawn(entity).unwrap();
        }
    }
}

fn spawn_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn");

    group.bench_function("spawn_3k", |b| {
        b.iter_batched(
            registered_world,
            |mut world| {
                populate(&mut world, POPULATION);
                black_box(world)
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn join_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("join");

    let mut world = registered_world();
    populate(&mut world, POPULATION);

    group.bench_function("inner_join_3k", |b| {
        b.iter(|| {
            let mut visited = 0u64;
            inner_join(
                |entity| visited += black_box(entity).id() & 1,
                world.store::<Position>().unwrap(),
                &[world.store::<Velocity>().unwrap()],
            );
            black_box(visited)
        });
    });

    group.bench_function("outer_join_3k", |b| {
        b.iter(|| {
            let mut visited = 0u64;
            outer_join(
                |entity| visited += black_box(entity).id() & 1,
                &[
                    world.store::<Position>().unwrap(),
                    world.store::<Age>().unwrap(),
                ],
            );
            black_box(visited)
        });
    });

    group.finish();
}

fn tick_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    group.bench_function("move_age_tick_3k", |b| {
        b.iter_batched(
            || {
                let mut world = registered_world();
                populate(&mut world, POPULATION);
                // Age a third of the population so the aging pass has work.
                let aging: Vec<Entity> = world
                    .store::<Position>()
                    .unwrap()
                    .entities()
                    .into_iter()
                    .step_by(3)
                    .collect();
                for entity in aging {
                    world.insert(entity, (Age { remaining: 100.0 },)).unwrap();
                }
                world.add_system(move_system);
                world.add_system(aging_system);
                world
            },
            |mut world| {
                world.run_tick(Tick {
                    delta: 16.6,
                    elapsed: 16.6,
                });
                black_box(world)
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, spawn_benchmark, join_benchmark, tick_benchmark);
criterion_main!(benches);
