use std::time::{
    Duration,
    Instant,
};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{
        self,
        MissedTickBehavior,
    },
};
use wheel_core::{
    RandomSource,
    SpinOutcome,
    Wheel,
    plan_spin,
};

pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_millis(5_000);
/// Roughly one display refresh.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Quartic ease-out: fast start, long settle.
pub fn ease_out_quart(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(4)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpinFrame {
    Idle { rotation: f64 },
    Turning { rotation: f64, progress: f64 },
    Finished { rotation: f64, winner_index: usize },
}

impl SpinFrame {
    pub fn rotation(&self) -> f64 {
        match *self {
            SpinFrame::Idle { rotation }
            | SpinFrame::Turning { rotation, .. }
            | SpinFrame::Finished { rotation, .. } => rotation,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ActiveSpin {
    started_at: Instant,
    from: f64,
    delta: f64,
    winner_index: usize,
}

/// Drives one wheel through its spins.
///
/// Rotation is cumulative across spins and never reset. Only one spin runs
/// at a time; the winner is fixed when the spin starts.
#[derive(Clone, Debug)]
pub struct WheelSpinner {
    wheel: Wheel,
    rotation: f64,
    duration: Duration,
    active: Option<ActiveSpin>,
}

impl WheelSpinner {
    pub fn new(wheel: Wheel, duration: Duration) -> Self {
        Self {
            wheel,
            rotation: 0.0,
            duration,
            active: None,
        }
    }

    pub fn wheel(&self) -> &Wheel {
        &self.wheel
    }

    /// Current rotation, mid-spin included.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_spinning(&self) -> bool {
        self.active.is_some()
    }

    /// Plans and starts a spin. Returns `None` while another spin is running.
    pub fn start(
        &mut self,
        now: Instant,
        rng: &mut impl RandomSource,
    ) -> Option<SpinOutcome> {
        if self.active.is_some() {
            tracing::debug!("spin requested while wheel is turning, ignoring");
            return None;
        }
        let outcome = plan_spin(self.wheel.options(), rng);
        let delta = outcome.rotation_from(self.rotation);
        self.active = Some(ActiveSpin {
            started_at: now,
            from: self.rotation,
            delta,
            winner_index: outcome.winner_index,
        });
        tracing::info!(
            winner_index = outcome.winner_index,
            delta,
            "spin started"
        );
        Some(outcome)
    }

    pub fn advance(&mut self, now: Instant) -> SpinFrame {
        let Some(spin) = self.active else {
            return SpinFrame::Idle {
                rotation: self.rotation,
            };
        };
        let elapsed = now.saturating_duration_since(spin.started_at);
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };

        if progress >= 1.0 {
            self.rotation = spin.from + spin.delta;
            self.active = None;
            return SpinFrame::Finished {
                rotation: self.rotation,
                winner_index: spin.winner_index,
            };
        }
        self.rotation = spin.from + spin.delta * ease_out_quart(progress);
        SpinFrame::Turning {
            rotation: self.rotation,
            progress,
        }
    }

    /// Abandons a running spin where it stands.
    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            tracing::debug!(rotation = self.rotation, "spin cancelled");
        }
    }
}

/// Frame callbacks for a running spin.
///
/// Ticks come from a spawned interval task; dropping the ticker aborts it.
#[derive(Debug)]
pub struct FrameTicker {
    frames: mpsc::Receiver<Instant>,
    task: JoinHandle<()>,
}

impl FrameTicker {
    pub fn start(period: Duration) -> Self {
        let (tx, frames) = mpsc::channel(1);
        let task = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                let tick = interval.tick().await;
                if tx.send(tick.into_std()).await.is_err() {
                    break;
                }
            }
        });
        Self { frames, task }
    }

    pub async fn next_frame(&mut self) -> Option<Instant> {
        self.frames.recv().await
    }
}

impl Drop for FrameTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use std::f64::consts::TAU;
    use wheel_core::{
        SequenceRandom,
        resolve,
        slice_under_pointer,
        test_helpers::{
            auto,
            explicit,
        },
    };

    fn wheel() -> Wheel {
        resolve(&[
            explicit("Free Lesson", 40.0, 1.5),
            auto("Notebook"),
            auto("Try Again"),
        ])
        .unwrap()
    }

    fn spinner() -> WheelSpinner {
        WheelSpinner::new(wheel(), DEFAULT_SPIN_DURATION)
    }

    #[test]
    fn ease_out_quart__hits_endpoints_and_front_loads() {
        assert_eq!(ease_out_quart(0.0), 0.0);
        assert_eq!(ease_out_quart(1.0), 1.0);
        assert!(ease_out_quart(0.5) > 0.9);
        assert_eq!(ease_out_quart(2.0), 1.0);
    }

    #[test]
    fn start__second_request_while_spinning_is_ignored() {
        // given
        let mut spinner = spinner();
        let mut rng = SequenceRandom::new(vec![0.3, 0.5, 0.1]);
        let t0 = Instant::now();
        let first = spinner.start(t0, &mut rng);
        let draws = rng.draws();

        // when
        let second = spinner.start(t0 + Duration::from_millis(100), &mut rng);

        // then
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(rng.draws(), draws);
    }

    #[test]
    fn advance__idle_spinner_reports_rest_rotation() {
        // given
        let mut spinner = spinner();

        // when
        let frame = spinner.advance(Instant::now());

        // then
        assert_eq!(frame, SpinFrame::Idle { rotation: 0.0 });
    }

    #[test]
    fn advance__midway_is_past_half_the_rotation() {
        // given
        let mut spinner = spinner();
        let mut rng = SequenceRandom::new(vec![0.3, 0.5, 0.1]);
        let t0 = Instant::now();
        let outcome = spinner.start(t0, &mut rng).unwrap();

        // when
        let frame = spinner.advance(t0 + DEFAULT_SPIN_DURATION / 2);

        // then
        match frame {
            SpinFrame::Turning { rotation, progress } => {
                assert!((progress - 0.5).abs() < 1e-9);
                assert!(rotation > outcome.rotation_delta / 2.0);
                assert!(rotation < outcome.rotation_delta);
            }
            other => panic!("unexpected frame {other:?}"),
        }
    }

    #[test]
    fn advance__finishing_lands_on_the_winner() {
        // given
        let mut spinner = spinner();
        let mut rng = SequenceRandom::new(vec![0.3, 0.5, 0.1]);
        let t0 = Instant::now();
        let outcome = spinner.start(t0, &mut rng).unwrap();

        // when
        let frame = spinner.advance(t0 + DEFAULT_SPIN_DURATION);

        // then
        assert_eq!(
            frame,
            SpinFrame::Finished {
                rotation: outcome.rotation_delta,
                winner_index: outcome.winner_index,
            }
        );
        assert!(!spinner.is_spinning());
        assert_eq!(
            slice_under_pointer(spinner.wheel().options(), spinner.rotation()),
            outcome.winner_index
        );
    }

    #[test]
    fn advance__consecutive_spins_accumulate_rotation() {
        // given
        let mut spinner = spinner();
        let mut rng = SequenceRandom::new(vec![0.3, 0.5, 0.1, 0.9, 0.2, 0.7]);
        let t0 = Instant::now();
        spinner.start(t0, &mut rng).unwrap();
        spinner.advance(t0 + DEFAULT_SPIN_DURATION);
        let resting = spinner.rotation();

        // when
        let t1 = t0 + DEFAULT_SPIN_DURATION * 2;
        let second = spinner.start(t1, &mut rng).unwrap();
        spinner.advance(t1 + DEFAULT_SPIN_DURATION);

        // then
        assert!(spinner.rotation() > resting + 3.0 * TAU);
        assert_eq!(
            slice_under_pointer(spinner.wheel().options(), spinner.rotation()),
            second.winner_index
        );
    }

    #[test]
    fn cancel__frees_the_spinner_for_a_new_spin() {
        // given
        let mut spinner = spinner();
        let mut rng = SequenceRandom::new(vec![0.3, 0.5, 0.1]);
        let t0 = Instant::now();
        spinner.start(t0, &mut rng).unwrap();
        spinner.advance(t0 + Duration::from_millis(250));

        // when
        spinner.cancel();

        // then
        assert!(!spinner.is_spinning());
        assert!(spinner.start(t0 + Duration::from_millis(300), &mut rng).is_some());
    }

    #[tokio::test]
    async fn frame_ticker__delivers_increasing_instants() {
        // given
        let mut ticker = FrameTicker::start(Duration::from_millis(2));

        // when
        let first = ticker.next_frame().await.unwrap();
        let second = ticker.next_frame().await.unwrap();

        // then
        assert!(second > first);
    }
}
