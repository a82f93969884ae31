use serde::{Deserialize, Serialize};

/// Sound effects the arena can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Jump,
    Dash,
    Death,
    Finish,
}

/// Oscillator shape for a tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveType {
    Sine,
}

/// One oscillator note: frequency ramps from `start_hz` to `end_hz` while the
/// gain decays from `gain` over `duration` seconds, starting `delay` seconds
/// after the effect fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub start_hz: f32,
    pub end_hz: f32,
    pub duration: f32,
    pub gain: f32,
    pub delay: f32,
    pub wave: WaveType,
}

impl Tone {
    const fn sweep(start_hz: f32, end_hz: f32, duration: f32, gain: f32) -> Self {
        Self {
            start_hz,
            end_hz,
            duration,
            gain,
            delay: 0.0,
            wave: WaveType::Sine,
        }
    }

    const fn note(hz: f32, delay: f32) -> Self {
        Self {
            start_hz: hz,
            end_hz: hz,
            duration: 0.3,
            gain: 0.3,
            delay,
            wave: WaveType::Sine,
        }
    }
}

const JUMP_TONES: &[Tone] = &[Tone::sweep(400.0, 600.0, 0.2, 0.3)];
const DASH_TONES: &[Tone] = &[Tone::sweep(200.0, 300.0, 0.15, 0.2)];
const DEATH_TONES: &[Tone] = &[Tone::sweep(600.0, 100.0, 0.5, 0.4)];
// C5 E5 G5 C6 arpeggio.
const FINISH_TONES: &[Tone] = &[
    Tone::note(523.0, 0.0),
    Tone::note(659.0, 0.15),
    Tone::note(784.0, 0.3),
    Tone::note(1047.0, 0.45),
];

impl EffectKind {
    /// Notes to synthesize for this effect.
    pub fn tones(self) -> &'static [Tone] {
        match self {
            EffectKind::Jump => JUMP_TONES,
            EffectKind::Dash => DASH_TONES,
            EffectKind::Death => DEATH_TONES,
            EffectKind::Finish => FINISH_TONES,
        }
    }
}

/// Volume settings applied before tones reach the sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub master_volume: f32,
    pub game_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.5,
            game_volume: 0.7,
            muted: false,
        }
    }
}

impl AudioSettings {
    /// Effective multiplier for effect gains.
    pub fn effect_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.game_volume
        }
    }
}

/// Destination for synthesized effects (a Web Audio context, a test recorder).
pub trait EffectSink: Send {
    fn play_tone(&mut self, kind: EffectKind, tone: &Tone, volume: f32);
}

/// Sink that drops everything.
#[derive(Debug, Default)]
pub struct SilentSink;

impl EffectSink for SilentSink {
    fn play_tone(&mut self, _kind: EffectKind, _tone: &Tone, _volume: f32) {}
}
