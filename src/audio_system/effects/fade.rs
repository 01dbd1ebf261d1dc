/// Fade and crossfade scheduling
///
/// Fades are explicit jobs owned by a single scheduler and advanced one tick
/// at a time. Each job moves its handle's loudness by a step fixed at
/// creation, so a fade of duration `D` always lasts `ceil(D / tick)` ticks.
use std::fmt;
use std::time::Duration;

use crate::audio_system::player::{HandleId, TrackHandle};
use crate::audio_system::source::AudioCategory;

use super::volume::VolumeState;

/// Direction of a fade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    /// Ramp up to the category ceiling
    In,

    /// Ramp down to silence, then pause and rewind
    Out,
}

impl fmt::Display for FadeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FadeDirection::In => write!(f, "fade-in"),
            FadeDirection::Out => write!(f, "fade-out"),
        }
    }
}

/// Number of ticks a fade of `duration` takes, never less than one
pub fn ticks_for(duration: Duration, tick: Duration) -> u32 {
    let tick = tick.as_nanos().max(1);
    let ticks = duration.as_nanos().div_ceil(tick).max(1);
    u32::try_from(ticks).unwrap_or(u32::MAX)
}

enum Advance {
    Continue(f64),
    Finished(f64),
}

/// A linear loudness ramp on one handle
#[derive(Debug, Clone)]
pub struct FadeJob {
    handle: TrackHandle,
    direction: FadeDirection,
    category: AudioCategory,
    step: f64,
    total_ticks: u32,
    elapsed_ticks: u32,
}

impl FadeJob {
    /// Ramp from the handle's current loudness up to `ceiling`
    pub fn fade_in(handle: &TrackHandle, ceiling: f64, duration: Duration, tick: Duration) -> Self {
        Self::new(handle, FadeDirection::In, ceiling, duration, tick)
    }

    /// Ramp from the handle's current loudness down to 0
    pub fn fade_out(handle: &TrackHandle, duration: Duration, tick: Duration) -> Self {
        Self::new(handle, FadeDirection::Out, 0.0, duration, tick)
    }

    fn new(
        handle: &TrackHandle,
        direction: FadeDirection,
        end: f64,
        duration: Duration,
        tick: Duration,
    ) -> Self {
        let start = handle.volume();
        let step = if duration.is_zero() {
            end - start
        } else {
            (end - start) * tick.as_secs_f64() / duration.as_secs_f64()
        };

        Self {
            handle: handle.clone(),
            direction,
            category: handle.key().category,
            step,
            total_ticks: ticks_for(duration, tick),
            elapsed_ticks: 0,
        }
    }

    pub fn handle(&self) -> &TrackHandle {
        &self.handle
    }

    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn total_ticks(&self) -> u32 {
        self.total_ticks
    }

    pub fn remaining_ticks(&self) -> u32 {
        self.total_ticks - self.elapsed_ticks
    }

    /// Compute the next loudness from the value observed at tick start.
    ///
    /// Fade-ins target the live ceiling so volume changes made mid-fade are
    /// honoured; the step itself never changes.
    fn advance(&mut self, observed: f64, volumes: &VolumeState) -> Advance {
        self.elapsed_ticks += 1;
        let last_tick = self.elapsed_ticks >= self.total_ticks;
        let next = observed + self.step;

        match self.direction {
            FadeDirection::In => {
                let ceiling = volumes.ceiling(self.category);
                if last_tick || next >= ceiling {
                    Advance::Finished(ceiling)
                } else {
                    Advance::Continue(next)
                }
            }
            FadeDirection::Out => {
                if last_tick || next <= 0.0 {
                    Advance::Finished(0.0)
                } else {
                    Advance::Continue(next)
                }
            }
        }
    }
}

/// A fade that reached its bound during a tick
#[derive(Debug, Clone)]
pub struct FadeCompletion {
    pub handle: TrackHandle,
    pub direction: FadeDirection,
}

/// Owns every running fade job; at most one job per handle
#[derive(Debug)]
pub struct FadeScheduler {
    tick: Duration,
    jobs: Vec<FadeJob>,
    carry: Duration,
}

impl FadeScheduler {
    pub fn new(tick: Duration) -> Self {
        Self {
            tick: tick.max(Duration::from_millis(1)),
            jobs: Vec::new(),
            carry: Duration::ZERO,
        }
    }

    pub fn tick_period(&self) -> Duration {
        self.tick
    }

    /// Start a job, replacing any job already targeting the same handle
    pub fn start(&mut self, job: FadeJob) {
        if self.cancel(job.handle.id()) {
            tracing::debug!(
                "Superseded running fade on {} with {}",
                job.handle.key(),
                job.direction
            );
        }
        tracing::debug!(
            "Starting {} on {}: {} ticks, step {:.4}",
            job.direction,
            job.handle.key(),
            job.total_ticks,
            job.step
        );
        self.jobs.push(job);
    }

    pub fn fade_in(&mut self, handle: &TrackHandle, ceiling: f64, duration: Duration) {
        self.start(FadeJob::fade_in(handle, ceiling, duration, self.tick));
    }

    pub fn fade_out(&mut self, handle: &TrackHandle, duration: Duration) {
        self.start(FadeJob::fade_out(handle, duration, self.tick));
    }

    /// Fade `outgoing` to silence while `incoming` rises to `ceiling`
    pub fn crossfade(
        &mut self,
        outgoing: &TrackHandle,
        incoming: &TrackHandle,
        ceiling: f64,
        duration: Duration,
    ) {
        self.fade_out(outgoing, duration);
        self.fade_in(incoming, ceiling, duration);
    }

    /// Drop the job targeting `handle`, leaving its loudness where it is
    pub fn cancel(&mut self, handle: HandleId) -> bool {
        let before = self.jobs.len();
        self.jobs.retain(|job| job.handle.id() != handle);
        self.jobs.len() != before
    }

    pub fn job_for(&self, handle: HandleId) -> Option<&FadeJob> {
        self.jobs.iter().find(|job| job.handle.id() == handle)
    }

    pub fn is_fading(&self, handle: HandleId) -> bool {
        self.job_for(handle).is_some()
    }

    pub fn active_jobs(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_idle(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Advance every job by one tick.
    ///
    /// Loudness is read for all jobs before any job writes, so no job sees
    /// another job's update from the same tick.
    pub fn tick(&mut self, volumes: &VolumeState) -> Vec<FadeCompletion> {
        let observed: Vec<f64> = self.jobs.iter().map(|job| job.handle.volume()).collect();
        let outcomes: Vec<Advance> = self
            .jobs
            .iter_mut()
            .zip(observed)
            .map(|(job, value)| job.advance(value, volumes))
            .collect();

        let mut completed = Vec::new();
        let mut running = Vec::with_capacity(self.jobs.len());
        for (job, outcome) in self.jobs.drain(..).zip(outcomes) {
            match outcome {
                Advance::Continue(value) => {
                    job.handle.set_volume(value);
                    running.push(job);
                }
                Advance::Finished(value) => {
                    job.handle.set_volume(value);
                    if job.direction == FadeDirection::Out {
                        job.handle.pause();
                        job.handle.seek_zero();
                    }
                    tracing::debug!("Finished {} on {}", job.direction, job.handle.key());
                    completed.push(FadeCompletion {
                        handle: job.handle,
                        direction: job.direction,
                    });
                }
            }
        }
        self.jobs = running;
        completed
    }

    /// Accumulate wall-clock time and return how many whole ticks are due
    pub fn due_ticks(&mut self, elapsed: Duration) -> u32 {
        self.carry += elapsed;
        let mut due = 0;
        while self.carry >= self.tick {
            self.carry -= self.tick;
            due += 1;
        }
        due
    }

    /// Immediately finish every fade-out in `category`: silence, pause, rewind
    pub fn settle_fade_outs(&mut self, category: AudioCategory) -> Vec<FadeCompletion> {
        let (settled, running): (Vec<FadeJob>, Vec<FadeJob>) = self
            .jobs
            .drain(..)
            .partition(|job| job.direction == FadeDirection::Out && job.category == category);
        self.jobs = running;

        settled
            .into_iter()
            .map(|job| {
                job.handle.set_volume(0.0);
                job.handle.pause();
                job.handle.seek_zero();
                FadeCompletion {
                    handle: job.handle,
                    direction: job.direction,
                }
            })
            .collect()
    }
}
