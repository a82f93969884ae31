use goobers_core::events::{EffectKind, EffectSink, Tone};

/// Sink for headless runs: every tone becomes a trace event.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EffectSink for TracingSink {
    fn play_tone(&mut self, kind: EffectKind, tone: &Tone, volume: f32) {
        tracing::trace!(
            ?kind,
            start_hz = tone.start_hz,
            end_hz = tone.end_hz,
            delay = tone.delay,
            volume,
            "Tone"
        );
    }
}
