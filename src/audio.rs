//! Audio boundary
//!
//! The simulation only produces numbers. This module owns the two continuous
//! voices (a steady hum and the danger drone), forwards danger parameters to
//! whatever synthesis backend is plugged in, and turns run events into
//! one-shot cues. Voices are released on game over, on teardown and on drop.

use crate::settings::Settings;
use crate::sim::{CorridorEvent, DangerFeedback};

/// Continuous voices held for the lifetime of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Voice {
    /// Low sine hum while the run is alive
    Hum,
    /// Sawtooth drone that swells and distorts near the corridor walls
    Danger,
}

/// One-shot sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Player left the corridor
    Death,
    /// A life was spent and the run continues
    LifeLost,
    /// Last life gone
    GameOver,
}

/// A synthesis backend
pub trait AudioSink {
    fn start_voice(&mut self, voice: Voice, volume_db: f32);
    fn stop_voice(&mut self, voice: Voice);
    fn set_danger(&mut self, feedback: DangerFeedback);
    fn play_cue(&mut self, cue: Cue);
}

/// Backend that discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn start_voice(&mut self, _voice: Voice, _volume_db: f32) {}
    fn stop_voice(&mut self, _voice: Voice) {}
    fn set_danger(&mut self, _feedback: DangerFeedback) {}
    fn play_cue(&mut self, _cue: Cue) {}
}

/// Backend that writes to the log (headless runs)
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn start_voice(&mut self, voice: Voice, volume_db: f32) {
        log::debug!("voice {:?} start at {:.1} dB", voice, volume_db);
    }

    fn stop_voice(&mut self, voice: Voice) {
        log::debug!("voice {:?} stop", voice);
    }

    fn set_danger(&mut self, feedback: DangerFeedback) {
        log::trace!(
            "danger {:.1} dB, distortion {:.2}",
            feedback.volume_db,
            feedback.distortion
        );
    }

    fn play_cue(&mut self, cue: Cue) {
        log::info!("cue {:?}", cue);
    }
}

/// Decibels to linear gain
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Linear gain to decibels, floored at `floor_db`
#[inline]
pub fn gain_to_db(gain: f32, floor_db: f32) -> f32 {
    if gain <= 0.0 {
        floor_db
    } else {
        (20.0 * gain.log10()).max(floor_db)
    }
}

/// Keep two parts of a voice only if both started. A lone survivor is handed
/// to `release` so it does not keep sounding with no owner.
pub fn pair_or_release<T>(a: Option<T>, b: Option<T>, release: impl FnOnce(T)) -> Option<(T, T)> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a, b)),
        (Some(lone), None) | (None, Some(lone)) => {
            log::warn!("Voice only partly started, releasing the part that did");
            release(lone);
            None
        }
        (None, None) => None,
    }
}

/// Mediates between the simulation and a backend: tracks which voices are
/// live, applies mute and master volume, and only forwards danger parameters
/// when they change.
pub struct AudioBoundary<S: AudioSink> {
    sink: S,
    hum_active: bool,
    danger_active: bool,
    last: Option<DangerFeedback>,
    master_db: f32,
    muted: bool,
    floor_db: f32,
    hum_db: f32,
}

impl<S: AudioSink> AudioBoundary<S> {
    /// `floor_db` is the quietest level the danger voice is driven to
    pub fn new(sink: S, settings: &Settings, floor_db: f32, hum_db: f32) -> Self {
        Self {
            sink,
            hum_active: false,
            danger_active: false,
            last: None,
            master_db: gain_to_db(settings.master_volume, floor_db),
            muted: settings.muted,
            floor_db,
            hum_db,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_live(&self) -> bool {
        self.hum_active || self.danger_active
    }

    fn level(&self, db: f32) -> f32 {
        if self.muted {
            self.floor_db
        } else {
            (db + self.master_db).max(self.floor_db)
        }
    }

    /// Acquire both continuous voices. Calling again while live is a no-op.
    pub fn start_voices(&mut self) {
        if !self.hum_active {
            let level = self.level(self.hum_db);
            self.sink.start_voice(Voice::Hum, level);
            self.hum_active = true;
        }
        if !self.danger_active {
            self.sink.start_voice(Voice::Danger, self.floor_db);
            self.danger_active = true;
        }
        self.last = None;
    }

    /// Release both continuous voices. Safe to call repeatedly.
    pub fn stop_voices(&mut self) {
        if self.danger_active {
            self.sink.stop_voice(Voice::Danger);
            self.danger_active = false;
        }
        if self.hum_active {
            self.sink.stop_voice(Voice::Hum);
            self.hum_active = false;
        }
        self.last = None;
    }

    /// Push this tick's danger parameters, skipping repeats
    pub fn apply(&mut self, feedback: DangerFeedback) {
        if !self.danger_active {
            return;
        }
        let adjusted = DangerFeedback {
            volume_db: self.level(feedback.volume_db),
            distortion: feedback.distortion,
        };
        if self.last == Some(adjusted) {
            return;
        }
        self.sink.set_danger(adjusted);
        self.last = Some(adjusted);
    }

    /// Map run events onto cues; game over also silences the voices
    pub fn handle_events(&mut self, events: &[CorridorEvent]) {
        for event in events {
            let cue = match event {
                CorridorEvent::Death { .. } => Cue::Death,
                CorridorEvent::LifeLost { .. } => Cue::LifeLost,
                CorridorEvent::GameOver { .. } => {
                    self.stop_voices();
                    Cue::GameOver
                }
                CorridorEvent::Wrapped { .. } => continue,
            };
            if !self.muted {
                self.sink.play_cue(cue);
            }
        }
    }
}

impl<S: AudioSink> Drop for AudioBoundary<S> {
    fn drop(&mut self) {
        self.stop_voices();
    }
}

/// Web Audio backend
///
/// The hum is a sine, the danger voice a sawtooth with a square "grit" layer
/// whose level follows the distortion amount.
#[cfg(target_arch = "wasm32")]
pub mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, Cue, Voice, db_to_gain, pair_or_release};
    use crate::sim::DangerFeedback;

    /// Smoothing time constant for parameter changes (seconds)
    const RAMP: f64 = 0.1;

    struct Layer {
        osc: OscillatorNode,
        gain: GainNode,
    }

    impl Layer {
        fn stop(self) {
            self.osc.stop().ok();
            self.osc.disconnect().ok();
            self.gain.disconnect().ok();
        }
    }

    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
        hum: Option<Layer>,
        danger: Option<(Layer, Layer)>,
    }

    impl Default for WebAudioSink {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioSink {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                hum: None,
                danger: None,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn layer(&self, freq: f32, osc_type: OscillatorType, gain: f32) -> Option<Layer> {
            let ctx = self.ctx.as_ref()?;
            let osc = ctx.create_oscillator().ok()?;
            let node = ctx.create_gain().ok()?;
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            node.gain().set_value(gain);
            osc.connect_with_audio_node(&node).ok()?;
            node.connect_with_audio_node(&ctx.destination()).ok()?;
            osc.start().ok()?;
            Some(Layer { osc, gain: node })
        }

        fn blip(&self, freq: f32, osc_type: OscillatorType, peak: f32, delay: f64, length: f64) {
            let Some(ctx) = &self.ctx else { return };
            let (Ok(osc), Ok(gain)) = (ctx.create_oscillator(), ctx.create_gain()) else {
                return;
            };
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            if osc.connect_with_audio_node(&gain).is_err()
                || gain.connect_with_audio_node(&ctx.destination()).is_err()
            {
                return;
            }
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(peak, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }
    }

    impl AudioSink for WebAudioSink {
        fn start_voice(&mut self, voice: Voice, volume_db: f32) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
            match voice {
                Voice::Hum => {
                    if self.hum.is_none() {
                        self.hum = self.layer(100.0, OscillatorType::Sine, db_to_gain(volume_db));
                    }
                }
                Voice::Danger => {
                    if self.danger.is_none() {
                        let gain = db_to_gain(volume_db);
                        let drone = self.layer(50.0, OscillatorType::Sawtooth, gain);
                        let grit = self.layer(100.0, OscillatorType::Square, 0.0);
                        self.danger = pair_or_release(drone, grit, Layer::stop);
                    }
                }
            }
        }

        fn stop_voice(&mut self, voice: Voice) {
            match voice {
                Voice::Hum => {
                    if let Some(layer) = self.hum.take() {
                        layer.stop();
                    }
                }
                Voice::Danger => {
                    if let Some((drone, grit)) = self.danger.take() {
                        drone.stop();
                        grit.stop();
                    }
                }
            }
        }

        fn set_danger(&mut self, feedback: DangerFeedback) {
            let (Some(ctx), Some((drone, grit))) = (&self.ctx, &self.danger) else {
                return;
            };
            let t = ctx.current_time();
            let gain = db_to_gain(feedback.volume_db);
            drone.gain.gain().set_target_at_time(gain, t, RAMP).ok();
            grit.gain
                .gain()
                .set_target_at_time(gain * feedback.distortion, t, RAMP)
                .ok();
        }

        fn play_cue(&mut self, cue: Cue) {
            match cue {
                // Short noisy crunch
                Cue::Death => {
                    self.blip(90.0, OscillatorType::Sawtooth, 0.4, 0.0, 0.25);
                    self.blip(3000.0, OscillatorType::Square, 0.1, 0.0, 0.08);
                }
                Cue::LifeLost => {
                    self.blip(440.0, OscillatorType::Triangle, 0.25, 0.1, 0.2);
                }
                // Sad descending
                Cue::GameOver => {
                    for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
                        self.blip(*freq, OscillatorType::Sine, 0.3, i as f64 * 0.2, 0.3);
                    }
                }
            }
        }
    }

    impl Drop for WebAudioSink {
        fn drop(&mut self) {
            self.stop_voice(Voice::Hum);
            self.stop_voice(Voice::Danger);
            if let Some(ctx) = self.ctx.take() {
                let _ = ctx.close();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Start(Voice, f32),
        Stop(Voice),
        Danger(DangerFeedback),
        Cue(Cue),
    }

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<Call>>>);

    impl Recorder {
        fn calls(&self) -> Vec<Call> {
            self.0.borrow().clone()
        }
    }

    impl AudioSink for Recorder {
        fn start_voice(&mut self, voice: Voice, volume_db: f32) {
            self.0.borrow_mut().push(Call::Start(voice, volume_db));
        }
        fn stop_voice(&mut self, voice: Voice) {
            self.0.borrow_mut().push(Call::Stop(voice));
        }
        fn set_danger(&mut self, feedback: DangerFeedback) {
            self.0.borrow_mut().push(Call::Danger(feedback));
        }
        fn play_cue(&mut self, cue: Cue) {
            self.0.borrow_mut().push(Call::Cue(cue));
        }
    }

    fn full_volume() -> Settings {
        Settings {
            master_volume: 1.0,
            ..Default::default()
        }
    }

    fn fb(volume_db: f32, distortion: f32) -> DangerFeedback {
        DangerFeedback {
            volume_db,
            distortion,
        }
    }

    #[test]
    fn test_voice_lifecycle_is_idempotent() {
        let rec = Recorder::default();
        let mut audio = AudioBoundary::new(rec.clone(), &full_volume(), -100.0, -10.0);
        audio.start_voices();
        audio.start_voices();
        assert!(audio.is_live());
        audio.stop_voices();
        audio.stop_voices();
        assert!(!audio.is_live());

        assert_eq!(
            rec.calls(),
            vec![
                Call::Start(Voice::Hum, -10.0),
                Call::Start(Voice::Danger, -100.0),
                Call::Stop(Voice::Danger),
                Call::Stop(Voice::Hum),
            ]
        );
    }

    #[test]
    fn test_drop_releases_voices() {
        let rec = Recorder::default();
        {
            let mut audio = AudioBoundary::new(rec.clone(), &full_volume(), -100.0, -10.0);
            audio.start_voices();
        }
        let calls = rec.calls();
        assert!(calls.contains(&Call::Stop(Voice::Hum)));
        assert!(calls.contains(&Call::Stop(Voice::Danger)));
    }

    #[test]
    fn test_apply_caches_last_value() {
        let rec = Recorder::default();
        let mut audio = AudioBoundary::new(rec.clone(), &full_volume(), -100.0, -10.0);
        audio.apply(fb(-50.0, 0.5));
        assert!(rec.calls().is_empty(), "nothing forwarded before voices start");

        audio.start_voices();
        audio.apply(fb(-50.0, 0.5));
        audio.apply(fb(-50.0, 0.5));
        audio.apply(fb(-40.0, 0.6));

        let dangers: Vec<_> = rec
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Danger(_)))
            .collect();
        assert_eq!(
            dangers,
            vec![Call::Danger(fb(-50.0, 0.5)), Call::Danger(fb(-40.0, 0.6))]
        );
    }

    #[test]
    fn test_master_volume_and_mute() {
        let rec = Recorder::default();
        let half = Settings {
            master_volume: 0.5,
            ..Default::default()
        };
        let mut audio = AudioBoundary::new(rec.clone(), &half, -100.0, -10.0);
        audio.start_voices();
        audio.apply(fb(-20.0, 0.2));
        match rec.calls().last() {
            Some(Call::Danger(f)) => assert!((f.volume_db - (-20.0 - 6.0206)).abs() < 1e-2),
            other => panic!("expected danger update, got {other:?}"),
        }

        let rec = Recorder::default();
        let muted = Settings {
            muted: true,
            ..Default::default()
        };
        let mut audio = AudioBoundary::new(rec.clone(), &muted, -100.0, -10.0);
        audio.start_voices();
        audio.apply(fb(-20.0, 0.2));
        audio.handle_events(&[CorridorEvent::Death { offset: 70.0 }]);
        let calls = rec.calls();
        assert_eq!(calls[0], Call::Start(Voice::Hum, -100.0));
        assert_eq!(calls.last(), Some(&Call::Danger(fb(-100.0, 0.2))));
    }

    #[test]
    fn test_game_over_stops_voices_and_cues() {
        let rec = Recorder::default();
        let mut audio = AudioBoundary::new(rec.clone(), &full_volume(), -100.0, -10.0);
        audio.start_voices();
        audio.handle_events(&[
            CorridorEvent::Death { offset: 61.0 },
            CorridorEvent::GameOver { score: 12 },
        ]);
        assert!(!audio.is_live());
        assert_eq!(
            &rec.calls()[2..],
            &[
                Call::Cue(Cue::Death),
                Call::Stop(Voice::Danger),
                Call::Stop(Voice::Hum),
                Call::Cue(Cue::GameOver),
            ]
        );

        // Late feedback after game over is dropped
        audio.apply(fb(-10.0, 1.0));
        assert_eq!(rec.calls().len(), 6);
    }

    #[test]
    fn test_partial_voice_is_released() {
        let mut released = Vec::new();
        assert_eq!(pair_or_release(Some(1), None, |l| released.push(l)), None);
        assert_eq!(pair_or_release(None, Some(2), |l| released.push(l)), None);
        assert_eq!(released, vec![1, 2]);

        let mut released = Vec::new();
        assert_eq!(
            pair_or_release(Some(1), Some(2), |l| released.push(l)),
            Some((1, 2))
        );
        assert_eq!(pair_or_release(None::<i32>, None, |l| released.push(l)), None);
        assert!(released.is_empty());
    }

    #[test]
    fn test_db_gain_conversions() {
        assert!((db_to_gain(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_gain(-20.0) - 0.1).abs() < 1e-6);
        assert_eq!(gain_to_db(0.0, -100.0), -100.0);
        assert!((gain_to_db(1.0, -100.0)).abs() < 1e-6);
    }
}
