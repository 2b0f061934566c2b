use crate::state::Sample;

/// Anything that presents samples to the user.
///
/// Sinks are passive: the sampler publishes into a single-slot mailbox and
/// the display driver hands each sink the most recent [`Sample`] it finds
/// there.  A sink that falls behind simply skips intermediate samples.
///
/// `on_sample` runs on the display task, never on the sampler, but it should
/// still return quickly: copy what it needs and render.
pub trait DisplaySink: Send {
    fn on_sample(&mut self, sample: &Sample);
}
