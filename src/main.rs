//! Stack Tower entry point
//!
//! Native: runs a headless autoplay session and logs what happens.
//! Web: the library's `StackGame` binding is the entry point.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::{Context, Result};

    use stack_tower::sim::{Autoplay, GameEvent, GamePhase, Session};
    use stack_tower::tuning::Tuning;

    /// Simulated frame rate of the headless run
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after this many simulated seconds
    const MAX_SECONDS: f32 = 600.0;

    struct Args {
        tuning_path: Option<String>,
        seed: u64,
        tolerance: f32,
    }

    fn parse_args() -> Result<Args> {
        let mut args = Args {
            tuning_path: None,
            seed: 1,
            tolerance: Autoplay::default().tolerance,
        };
        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--tuning" => args.tuning_path = iter.next(),
                "--seed" => {
                    let value = iter.next().context("--seed needs a value")?;
                    args.seed = value.parse().with_context(|| format!("bad seed `{value}`"))?;
                }
                "--tolerance" => {
                    let value = iter.next().context("--tolerance needs a value")?;
                    args.tolerance =
                        value.parse().with_context(|| format!("bad tolerance `{value}`"))?;
                }
                other => anyhow::bail!(
                    "unknown argument `{other}` (expected --tuning, --seed, --tolerance)"
                ),
            }
        }
        Ok(args)
    }

    pub fn run() -> Result<()> {
        let args = parse_args()?;
        let tuning = match &args.tuning_path {
            Some(path) => Tuning::load(path).with_context(|| format!("loading tuning {path}"))?,
            None => Tuning::default(),
        };

        let mut session = Session::with_tuning(args.seed, tuning);
        let bot = Autoplay::new(args.tolerance);
        session.on_game_over(|score| log::info!("Final score: {}", score));

        let mut elapsed = 0.0;
        let mut perfects = 0u32;
        while elapsed < MAX_SECONDS && session.state().phase() != GamePhase::GameOver {
            if bot.wants_drop(session.state()) {
                session.trigger_drop();
            }
            session.tick(FRAME_DT);
            elapsed += FRAME_DT;

            for event in session.drain_events() {
                if let GameEvent::BlockPlaced { layer, width, depth, perfect, .. } = event {
                    if perfect {
                        perfects += 1;
                    }
                    log::debug!("Layer {layer}: {width:.2} x {depth:.2}");
                }
            }
        }

        let state = session.state();
        log::info!(
            "Stopped after {:.1}s: {} layers, {} perfect, score {}, phase {:?}",
            elapsed,
            state.stack().len() - 1,
            perfects,
            state.score(),
            state.phase()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Stack Tower (native, headless) starting...");
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
