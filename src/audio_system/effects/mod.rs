/// Audio effects module
///
/// Loudness control applied on top of the platform handles: the layered
/// volume model and time-stepped fades.

pub mod fade;
pub mod volume;

pub use fade::{FadeCompletion, FadeDirection, FadeJob, FadeScheduler};
pub use volume::{clamp01, VolumeChannel, VolumeState};
