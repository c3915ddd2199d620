/// Sound engine: Morse pattern playback and feedback cues via rodio.
///
/// Patterns are keyed as a sine tone at the configured pitch and speed
/// using standard PARIS timing (unit = 1.2 s / wpm). Cues are generated
/// once at init time as in-memory WAV buffers. Everything is appended to a
/// single queue so a cue never talks over the next pattern.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

use std::time::Duration;

use crate::domain::code::{Encoding, Token};

/// One segment of a keyed pattern: tone on or off for `units` dot lengths.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Keying {
    pub on: bool,
    pub units: u32,
}

const DOT_UNITS: u32 = 1;
const DASH_UNITS: u32 = 3;
const SYMBOL_GAP_UNITS: u32 = 1;
const LETTER_GAP_UNITS: u32 = 3;

/// Tone/silence schedule for an encoding. Elements of one letter are
/// separated by one unit; a letter gap is three.
pub fn keying_schedule(encoding: &Encoding) -> Vec<Keying> {
    let mut out = Vec::with_capacity(encoding.len() * 2);
    let mut after_tone = false;
    for token in encoding.tokens() {
        match token {
            Token::Dot | Token::Dash => {
                if after_tone {
                    out.push(Keying { on: false, units: SYMBOL_GAP_UNITS });
                }
                let units = if *token == Token::Dot { DOT_UNITS } else { DASH_UNITS };
                out.push(Keying { on: true, units });
                after_tone = true;
            }
            Token::LetterGap => {
                out.push(Keying { on: false, units: LETTER_GAP_UNITS });
                after_tone = false;
            }
        }
    }
    out
}

/// Length of one dot at `wpm` words per minute.
pub fn unit_duration(wpm: u32) -> Duration {
    Duration::from_millis(1200 / u64::from(wpm.max(1)))
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;

    use log::warn;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{keying_schedule, unit_duration};
    use crate::config::SoundConfig;
    use crate::domain::code::Encoding;

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = 2.0 * std::f32::consts::PI;

    /// Pre-generated WAV buffers for each cue.
    pub struct SoundEngine {
        _stream: OutputStream,
        _handle: OutputStreamHandle,
        queue: Sink,
        tone_hz: f32,
        unit_secs: f32,
        sfx_correct: Vec<u8>,
        sfx_incorrect: Vec<u8>,
        sfx_level_complete: Vec<u8>,
        sfx_game_over: Vec<u8>,
        sfx_victory: Vec<u8>,
    }

    impl SoundEngine {
        pub fn new(cfg: &SoundConfig) -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("no audio output, sound disabled: {e}");
                    return None;
                }
            };
            let queue = match Sink::try_new(&handle) {
                Ok(sink) => sink,
                Err(e) => {
                    warn!("audio sink unavailable, sound disabled: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                _handle: handle,
                queue,
                tone_hz: cfg.tone_hz,
                unit_secs: unit_duration(cfg.wpm).as_secs_f32(),
                sfx_correct: make_wav(&gen_correct()),
                sfx_incorrect: make_wav(&gen_incorrect()),
                sfx_level_complete: make_wav(&gen_level_complete()),
                sfx_game_over: make_wav(&gen_game_over()),
                sfx_victory: make_wav(&gen_victory()),
            })
        }

        fn play(&self, buf: Vec<u8>) {
            if let Ok(src) = rodio::Decoder::new(Cursor::new(buf)) {
                self.queue.append(src);
            }
        }

        /// Key the pattern after a short lead-in.
        pub fn play_pattern(&self, encoding: &Encoding) {
            let mut samples = silence(self.unit_secs * 2.0);
            for k in keying_schedule(encoding) {
                let secs = self.unit_secs * k.units as f32;
                if k.on {
                    samples.extend(gen_tone(self.tone_hz, secs, 0.3));
                } else {
                    samples.extend(silence(secs));
                }
            }
            self.play(make_wav(&samples));
        }

        pub fn play_correct(&self) { self.play(self.sfx_correct.clone()); }
        pub fn play_incorrect(&self) { self.play(self.sfx_incorrect.clone()); }
        pub fn play_level_complete(&self) { self.play(self.sfx_level_complete.clone()); }
        pub fn play_game_over(&self) { self.play(self.sfx_game_over.clone()); }
        pub fn play_victory(&self) { self.play(self.sfx_victory.clone()); }

        /// Block until queued audio has played out.
        pub fn drain(&self) {
            self.queue.sleep_until_end();
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn silence(secs: f32) -> Vec<f32> {
        vec![0.0; (SAMPLE_RATE as f32 * secs) as usize]
    }

    /// Keyed sine with 5 ms ramps so elements don't click.
    fn gen_tone(freq: f32, secs: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * secs) as usize;
        let ramp = ((SAMPLE_RATE as f32 * 0.005) as usize).min(n / 2).max(1);
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = if i < ramp {
                    i as f32 / ramp as f32
                } else if i >= n - ramp {
                    (n - i) as f32 / ramp as f32
                } else {
                    1.0
                };
                (t * freq * TAU).sin() * env * volume
            })
            .collect()
    }

    /// Per-note amplitude shape, indexed by position through the note (0..1).
    #[derive(Clone, Copy, Debug)]
    enum Envelope {
        /// Sharp attack, fast decay.
        Pluck,
        /// Held note that sags by a third and releases at the end.
        Droop,
    }

    impl Envelope {
        fn gain(self, pos: f32) -> f32 {
            match self {
                Envelope::Pluck => 1.0 - pos.sqrt(),
                Envelope::Droop => (1.0 - 0.3 * pos) * ((1.0 - pos) * 12.0).min(1.0),
            }
        }
    }

    /// Notes played back to back, each shaped by `env`.
    fn gen_notes(notes: &[(f32, f32)], env: Envelope, volume: f32) -> Vec<f32> {
        notes
            .iter()
            .flat_map(|&(freq, dur)| {
                let n = (SAMPLE_RATE as f32 * dur) as usize;
                (0..n).map(move |i| {
                    let t = i as f32 / SAMPLE_RATE as f32;
                    let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 2.0 * TAU).sin() * 0.3;
                    wave * env.gain(i as f32 / n as f32) * volume
                })
            })
            .collect()
    }

    /// Correct: quick rising pair E6→A6
    fn gen_correct() -> Vec<f32> {
        gen_notes(&[(1319.0, 0.06), (1760.0, 0.1)], Envelope::Pluck, 0.25)
    }

    /// Incorrect: low buzzy descending tone
    fn gen_incorrect() -> Vec<f32> {
        let duration = 0.25;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 220.0 - t * 80.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let square = if (ti * freq * TAU).sin() >= 0.0 { 1.0 } else { -1.0 };
                square * (1.0 - t).powf(0.6) * 0.15
            })
            .collect()
    }

    /// Level complete: ascending arpeggio C5→E5→G5→C6
    fn gen_level_complete() -> Vec<f32> {
        gen_notes(&[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.25)], Envelope::Pluck, 0.3)
    }

    /// Game over: slow falling minor line G4→F4→Eb4, resting on C4
    fn gen_game_over() -> Vec<f32> {
        gen_notes(
            &[(392.0, 0.16), (349.0, 0.16), (311.0, 0.16), (262.0, 0.45)],
            Envelope::Droop,
            0.25,
        )
    }

    /// Victory: fanfare with a held top note
    fn gen_victory() -> Vec<f32> {
        let mut samples = gen_notes(
            &[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.1), (784.0, 0.1)],
            Envelope::Pluck,
            0.3,
        );
        samples.extend(gen_tone(1047.0, 0.45, 0.3));
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a 16-bit PCM buffer
    // ════════════════════════════════════════════════════════════

    /// Mono 16-bit PCM at `SAMPLE_RATE`, nested as RIFF(WAVE, fmt, data).
    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let mut fmt = Vec::with_capacity(16);
        fmt.extend(1u16.to_le_bytes()); // PCM
        fmt.extend(1u16.to_le_bytes()); // mono
        fmt.extend(SAMPLE_RATE.to_le_bytes());
        fmt.extend((SAMPLE_RATE * 2).to_le_bytes()); // bytes per second
        fmt.extend(2u16.to_le_bytes()); // bytes per frame
        fmt.extend(16u16.to_le_bytes());

        let pcm: Vec<u8> = samples.iter().flat_map(|&s| pcm16(s).to_le_bytes()).collect();

        let mut body = b"WAVE".to_vec();
        body.extend(riff_chunk(b"fmt ", &fmt));
        body.extend(riff_chunk(b"data", &pcm));
        riff_chunk(b"RIFF", &body)
    }

    fn riff_chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut chunk = Vec::with_capacity(8 + body.len());
        chunk.extend(id);
        chunk.extend((body.len() as u32).to_le_bytes());
        chunk.extend(body);
        chunk
    }

    fn pcm16(sample: f32) -> i16 {
        (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_and_length() {
            let wav = make_wav(&[0.0, 0.5, -0.5, 2.0]);
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(&wav[8..12], b"WAVE");
            assert_eq!(wav.len(), 44 + 4 * 2);
            // Out-of-range sample is clamped to full scale.
            assert_eq!(i16::from_le_bytes([wav[50], wav[51]]), 32767);
        }

        #[test]
        fn tone_length_follows_duration() {
            let tone = gen_tone(600.0, 0.08, 0.3);
            assert_eq!(tone.len(), (SAMPLE_RATE as f32 * 0.08) as usize);
            assert!(tone[0].abs() < 1e-6);
            assert!(tone.iter().all(|s| s.abs() <= 0.3 + 1e-6));
        }

        #[test]
        fn wav_chunk_sizes() {
            let wav = make_wav(&[0.1; 10]);
            let le32 = |at: usize| u32::from_le_bytes([wav[at], wav[at + 1], wav[at + 2], wav[at + 3]]);
            assert_eq!(le32(4) as usize, wav.len() - 8);
            assert_eq!(&wav[12..16], b"fmt ");
            assert_eq!(le32(16), 16);
            assert_eq!(le32(24), SAMPLE_RATE);
            assert_eq!(&wav[36..40], b"data");
            assert_eq!(le32(40), 20);
        }

        #[test]
        fn game_over_sags_and_releases() {
            let cue = gen_game_over();
            let expected: usize = [0.16_f32, 0.16, 0.16, 0.45]
                .iter()
                .map(|d| (SAMPLE_RATE as f32 * d) as usize)
                .sum();
            assert_eq!(cue.len(), expected);
            assert!(cue.last().is_some_and(|s| s.abs() < 0.01));
            assert!(Envelope::Droop.gain(0.5) < Envelope::Droop.gain(0.0));
            assert!(Envelope::Droop.gain(0.5) > 0.8);
            assert!(Envelope::Pluck.gain(0.5) < 0.5);
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new(_cfg: &crate::config::SoundConfig) -> Option<Self> { Some(SoundEngine) }
    pub fn play_pattern(&self, _encoding: &Encoding) {}
    pub fn play_correct(&self) {}
    pub fn play_incorrect(&self) {}
    pub fn play_level_complete(&self) {}
    pub fn play_game_over(&self) {}
    pub fn play_victory(&self) {}
    pub fn drain(&self) {}
}
