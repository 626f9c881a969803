use std::hint::black_box;
use std::time::{Duration, Instant};

use gardencity_assets::PrefabLibrary;
use gardencity_common::Transform;
use gardencity_scatter::{
    GrassField, Lifecycle, ParticleGroup, ParticleSurface, SurfaceSampler, TickSelection, Weighting,
};
use gardencity_seed::{PrngStream, Seed};
use glam::Vec3;

fn stream() -> PrngStream {
    PrngStream::new(Seed::parse("0.5").expect("valid seed"))
}

fn report(label: &str, iterations: usize, elapsed: Duration) {
    let per_iter = elapsed / iterations as u32;
    println!("  {label} ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn floor_surfaces(count: usize) -> Vec<ParticleSurface> {
    let library = PrefabLibrary::builtin();
    let walls = library
        .part(gardencity_assets::FLOOR, gardencity_assets::FLOOR_FACE)
        .expect("builtin floor walls");
    let sampler = SurfaceSampler::build(walls, Weighting::UvU).expect("walls have weight");
    (0..count)
        .map(|i| ParticleSurface {
            sampler: sampler.clone(),
            transform: Transform {
                position: Vec3::new(i as f32 * 0.2, 0.0, 0.0),
                scale: Vec3::new(0.1, 0.1, 0.1),
                ..Transform::default()
            },
        })
        .collect()
}

fn bench_sample(iterations: usize) {
    let library = PrefabLibrary::builtin();
    let ground = library
        .part(gardencity_assets::GROUND, gardencity_assets::GROUND_SURFACE)
        .expect("builtin ground");
    let sampler = SurfaceSampler::build(ground, Weighting::UvU).expect("ground has weight");
    let mut rng = stream();
    let start = Instant::now();
    for _ in 0..iterations {
        black_box(sampler.sample(black_box(&mut rng)));
    }
    report("ground sample", iterations, start.elapsed());
}

fn bench_group_tick(slots: usize, surfaces: usize, iterations: usize) {
    let mut group = ParticleGroup::new("bench", slots, floor_surfaces(surfaces), Lifecycle::default())
        .expect("valid lifecycle");
    let mut rng = stream();
    group.resample_all(&mut rng).expect("placement");
    let selections = [
        TickSelection { stride: 2, phase: 0 },
        TickSelection { stride: 2, phase: 1 },
    ];
    let start = Instant::now();
    for i in 0..iterations {
        let _ = black_box(group.tick(&mut rng, selections[i % 2]));
    }
    report(
        &format!("group tick ({slots} slots, {surfaces} surfaces)"),
        iterations,
        start.elapsed(),
    );
}

fn bench_grass(blades: usize, iterations: usize) {
    let field = GrassField {
        blade_count: blades,
        ..GrassField::default()
    };
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(field.generate(&mut stream()));
    }
    report(&format!("grass generate ({blades} blades)"), iterations, start.elapsed());
}

fn main() {
    println!("gardencity-scatter benchmarks");
    bench_sample(100_000);
    bench_group_tick(10_000, 40, 200);
    bench_group_tick(10_000, 200, 200);
    bench_grass(35_000, 10);
}
