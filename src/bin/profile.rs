use std::time::{Duration, Instant};

use mazerunner::{
    agents::{Actor, Speed, WallFollower},
    generators::{Generator, generate_maze},
    maze::Maze,
};

/// Generate the largest maze with every generator and let the bot solve it
/// at full speed, reporting average timings.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(10)
        .max(1);

    let mut maze = Maze::new(u8::MAX, u8::MAX);
    for generator in Generator::ALL {
        let mut generate_total = Duration::ZERO;
        let mut solve_total = Duration::ZERO;
        let mut frames_total = 0u64;

        for seed in 0..num_iters {
            let started = Instant::now();
            generate_maze(&mut maze, generator, Some(seed))?;
            generate_total += started.elapsed();

            let mut bot = WallFollower::new(&maze, Speed::MAX);
            let started = Instant::now();
            while !bot.has_finished(&maze) {
                bot.step(&mut maze)?;
                frames_total += 1;
            }
            solve_total += started.elapsed();
        }

        tracing::info!(
            "[profile] {}: generate {:?}, solve {:?} over {} iterations",
            generator,
            generate_total / num_iters as u32,
            solve_total / num_iters as u32,
            num_iters
        );
        println!(
            "{:<24} generate {:>12?}  solve {:>12?}  {:>8} frames/run",
            generator.to_string(),
            generate_total / num_iters as u32,
            solve_total / num_iters as u32,
            frames_total / num_iters
        );
    }
    Ok(())
}
