//! Fixed-rate tick loop: sample input, sweep, render

use anyhow::Result;
use web_time::{Duration, Instant};

use crate::config::RunnerConfig;
use crate::entity::InputSource;
use crate::world::{FrameSink, TickStats, World};

/// Totals for a finished run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub frames: u64,
    pub totals: TickStats,
    /// Stopped by a quit intent rather than the tick budget
    pub quit: bool,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Measured ticks per second
    pub fn tps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.ticks as f64 / secs
        } else {
            0.0
        }
    }
}

/// Drives a world at a fixed tick rate
pub struct Runner {
    config: RunnerConfig,
    frame_every: u64,
}

impl Runner {
    pub fn new(config: RunnerConfig, frame_every: u64) -> Self {
        Self {
            config,
            frame_every: frame_every.max(1),
        }
    }

    /// Target duration of one tick, `None` when unpaced
    pub fn tick_interval(&self) -> Option<Duration> {
        (self.config.paced && self.config.target_tps > 0)
            .then(|| Duration::from_secs_f64(1.0 / self.config.target_tps as f64))
    }

    /// Run until the tick budget is spent or input asks to quit.
    ///
    /// Each tick samples input once, applies it, sweeps the grid once and
    /// presents every `frame_every`th frame. Quitting happens between ticks.
    pub fn run(
        &self,
        world: &mut World,
        input: &mut dyn InputSource,
        sink: &mut dyn FrameSink,
    ) -> Result<RunSummary> {
        let interval = self.tick_interval();
        let start = Instant::now();
        let mut summary = RunSummary::default();

        log::info!(
            "Running up to {} ticks ({})",
            self.config.max_ticks,
            match interval {
                Some(_) => format!("{} tps", self.config.target_tps),
                None => "unpaced".to_string(),
            }
        );

        while summary.ticks < self.config.max_ticks {
            let tick_start = Instant::now();

            let intent = input.poll(world.tick());
            if intent.quit {
                log::info!("Quit requested at tick {}", world.tick());
                summary.quit = true;
                break;
            }
            world.apply_input(&intent);

            let mut stats = TickStats::default();
            world.step(&mut stats);
            accumulate(&mut summary.totals, &stats);
            summary.ticks += 1;

            if world.tick() % self.frame_every == 0 {
                sink.present(&world.frame())?;
                summary.frames += 1;
            }

            if let Some(interval) = interval {
                let elapsed = tick_start.elapsed();
                if elapsed < interval {
                    std::thread::sleep(interval - elapsed);
                }
            }
        }

        sink.finish()?;
        summary.elapsed = start.elapsed();

        log::info!(
            "Ran {} ticks in {:.2}s ({:.1} tps): {} moves, {} reactions",
            summary.ticks,
            summary.elapsed.as_secs_f64(),
            summary.tps(),
            summary.totals.cells_moved,
            summary.totals.reactions
        );

        Ok(summary)
    }
}

fn accumulate(totals: &mut TickStats, tick: &TickStats) {
    totals.cells_moved += tick.cells_moved;
    totals.reactions += tick.reactions;
    totals.blocked_swaps += tick.blocked_swaps;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{IdleInput, InputIntent};
    use crate::render::{NullSink, TextSink};
    use crate::scenario::{ScenarioAction, ScriptedInput};
    use crate::simulation::{SubstanceId, Substances};
    use crate::world::{Frame, GridSize, SimulationConfig};

    fn world(width: usize, height: usize) -> World {
        let config = SimulationConfig {
            gravity: 1,
            seed: Some(9),
            ..Default::default()
        };
        World::new(GridSize::new(width, height), Substances::new(), config)
    }

    fn unpaced(max_ticks: u64) -> RunnerConfig {
        RunnerConfig {
            max_ticks,
            paced: false,
            ..Default::default()
        }
    }

    /// Counts presented frames
    #[derive(Default)]
    struct CountingSink {
        ticks: Vec<u64>,
        finished: bool,
    }

    impl FrameSink for CountingSink {
        fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
            self.ticks.push(frame.overlay.tick);
            Ok(())
        }

        fn finish(&mut self) -> Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn test_runs_tick_budget() {
        let mut world = world(5, 5);
        let runner = Runner::new(unpaced(12), 1);

        let summary = runner
            .run(&mut world, &mut IdleInput, &mut NullSink)
            .unwrap();

        assert_eq!(summary.ticks, 12);
        assert_eq!(summary.frames, 12);
        assert!(!summary.quit);
        assert_eq!(world.tick(), 12);
    }

    #[test]
    fn test_frame_every() {
        let mut world = world(5, 5);
        let runner = Runner::new(unpaced(10), 4);
        let mut sink = CountingSink::default();

        runner.run(&mut world, &mut IdleInput, &mut sink).unwrap();

        assert_eq!(sink.ticks, vec![4, 8]);
        assert!(sink.finished);
    }

    #[test]
    fn test_quit_stops_between_ticks() {
        let mut world = world(5, 5);
        let runner = Runner::new(unpaced(100), 1);
        let mut input = ScriptedInput::new(&[
            ScenarioAction::Wait { ticks: 3 },
            ScenarioAction::Quit,
        ]);

        let summary = runner.run(&mut world, &mut input, &mut NullSink).unwrap();

        assert!(summary.quit);
        assert_eq!(summary.ticks, 3);
        assert_eq!(world.tick(), 3);
    }

    #[test]
    fn test_scripted_salt_settles() {
        let mut world = world(5, 5);
        let runner = Runner::new(unpaced(10), 1);
        let mut input = ScriptedInput::new(&[
            ScenarioAction::Select {
                substance: SubstanceId::SALT,
            },
            ScenarioAction::Brush { delta: -1 },
            ScenarioAction::Paint { x: 2, y: 0, ticks: 1 },
        ]);

        let summary = runner.run(&mut world, &mut input, &mut NullSink).unwrap();

        // Salt does not spread, so it falls straight to the floor
        assert_eq!(world.substance_at(2, 4), Some(SubstanceId::SALT));
        assert_eq!(world.grid().count(SubstanceId::SALT), 1);
        assert_eq!(summary.totals.cells_moved, 4);
    }

    #[test]
    fn test_text_frames_written() {
        let mut world = world(2, 2);
        let runner = Runner::new(unpaced(2), 1);
        let mut sink = TextSink::new(Vec::new());

        runner.run(&mut world, &mut IdleInput, &mut sink).unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text.matches("tick ").count(), 2);
        assert!(text.starts_with("..\n..\ntick 1"));
    }

    #[test]
    fn test_paced_interval() {
        let runner = Runner::new(RunnerConfig::default(), 1);
        assert_eq!(
            runner.tick_interval(),
            Some(Duration::from_secs_f64(1.0 / 60.0))
        );
        assert_eq!(Runner::new(unpaced(1), 1).tick_interval(), None);
    }

    #[test]
    fn test_quit_intent_from_custom_source() {
        struct QuitAt(u64);

        impl InputSource for QuitAt {
            fn poll(&mut self, tick: u64) -> InputIntent {
                InputIntent {
                    quit: tick == self.0,
                    ..Default::default()
                }
            }
        }

        let mut world = world(3, 3);
        let summary = Runner::new(unpaced(50), 1)
            .run(&mut world, &mut QuitAt(5), &mut NullSink)
            .unwrap();
        assert_eq!(summary.ticks, 5);
    }
}
