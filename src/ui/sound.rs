use jelly_snake::{FoodKind, SessionEvent};
use log::warn;
use macroquad::audio::{PlaySoundParams, Sound, load_sound_from_bytes, play_sound};

const SAMPLE_RATE: u32 = 44_100;

/// A short sine blip that decays linearly to silence.
#[derive(Copy, Clone)]
struct Blip {
    hz: f32,
    seconds: f32,
    gain: f32,
}

impl Blip {
    fn samples(self) -> impl Iterator<Item = i16> {
        let count = (self.seconds * SAMPLE_RATE as f32) as u32;
        let peak = self.gain.clamp(0.0, 1.0) * 0.7 * i16::MAX as f32;
        (0..count).map(move |n| {
            let phase = std::f32::consts::TAU * self.hz * n as f32 / SAMPLE_RATE as f32;
            let decay = 1.0 - n as f32 / count as f32;
            (peak * decay * phase.sin()) as i16
        })
    }

    /// PCM16 mono WAV bytes.
    fn to_wav(self) -> Vec<u8> {
        let pcm: Vec<u8> = self.samples().flat_map(i16::to_le_bytes).collect();
        let data_len = pcm.len() as u32;

        let mut wav = Vec::with_capacity(pcm.len() + 44);
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVEfmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        wav.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes()); // byte rate
        wav.extend_from_slice(&2u16.to_le_bytes()); // block align
        wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.extend_from_slice(&pcm);
        wav
    }
}

async fn tone(name: &str, hz: f32, seconds: f32, gain: f32) -> Option<Sound> {
    match load_sound_from_bytes(&Blip { hz, seconds, gain }.to_wav()).await {
        Ok(sound) => Some(sound),
        Err(e) => {
            warn!("could not load {name} sound: {e:?}");
            None
        }
    }
}

pub struct Sounds {
    eat: Option<Sound>,
    star: Option<Sound>,
    over: Option<Sound>,
}

impl Sounds {
    pub async fn load() -> Self {
        Self {
            eat: tone("eat", 880.0, 0.08, 0.6).await,
            star: tone("star", 1320.0, 0.14, 0.6).await,
            over: tone("game over", 110.0, 0.3, 0.7).await,
        }
    }

    pub fn play_for(&self, event: &SessionEvent, enabled: bool) {
        if !enabled {
            return;
        }
        let (sound, volume) = match event {
            SessionEvent::FoodEaten(FoodKind::Normal) => (&self.eat, 0.35),
            SessionEvent::FoodEaten(FoodKind::Star) => (&self.star, 0.45),
            SessionEvent::RoundEnded(_) => (&self.over, 0.6),
            _ => return,
        };
        if let Some(sound) = sound {
            play_sound(sound, PlaySoundParams { looped: false, volume });
        }
    }
}
