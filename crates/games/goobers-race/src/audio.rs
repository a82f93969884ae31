use goobers_core::events::{AudioSettings, EffectKind, EffectSink};

/// Gains below this are not worth sending to the sink.
const AUDIBLE_THRESHOLD: f32 = 0.001;

/// Effects requested during a frame, drained into a sink once per frame.
#[derive(Debug, Default)]
pub struct EffectQueue {
    events: Vec<EffectKind>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: EffectKind) {
        self.events.push(kind);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Play every queued effect through `sink`, scaled by `settings`.
    /// Returns the kinds that were drained, audible or not.
    pub fn process(&mut self, sink: &mut dyn EffectSink, settings: &AudioSettings) -> Vec<EffectKind> {
        let volume = settings.effect_volume();
        let drained: Vec<EffectKind> = self.events.drain(..).collect();
        for &kind in &drained {
            for tone in kind.tones() {
                let gain = tone.gain * volume;
                if gain > AUDIBLE_THRESHOLD {
                    sink.play_tone(kind, tone, gain);
                }
            }
        }
        drained
    }
}
