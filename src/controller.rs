// src/controller.rs - Mode state machine and gesture-to-command dispatch
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};

use crate::actions::{ActionExecutor, Key, SCROLL_STEP};
use crate::classifier::{self, GestureSymbol, Mode};
use crate::data::{CommandLog, Trigger};
use crate::debounce::GestureDebouncer;
use crate::detector::HandFrame;
use crate::speech::{Announcer, SpeechToText};
use crate::voice::{AutoAdvance, VoiceSession, AUTO_ADVANCE_INTERVAL};

/// Fatal startup problems. Anything here aborts the process with a
/// diagnostic before the frame loop ever starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid mode selection {0:?}: enter 1 for slide or 2 for document")]
    InvalidModeSelection(String),
}

/// Map the startup menu choice to a mode. The only accepted inputs are
/// "1" (slide) and "2" (document); everything else refuses to start.
pub fn select_mode(choice: &str) -> Result<Mode, ConfigError> {
    match choice.trim() {
        "1" => Ok(Mode::Slide),
        "2" => Ok(Mode::Document),
        other => Err(ConfigError::InvalidModeSelection(other.to_string())),
    }
}

/// Drives classification, debouncing, and dispatch for every frame, and
/// owns the operating mode. The mode changes only here (initial selection)
/// or inside a voice session ("change mode").
pub struct NavController {
    mode: Mode,
    debouncer: GestureDebouncer,
    executor: Arc<dyn ActionExecutor>,
    auto: AutoAdvance,
    speech: Box<dyn SpeechToText>,
    announcer: Box<dyn Announcer>,
    log: Arc<CommandLog>,
}

impl NavController {
    pub fn new(
        mode: Mode,
        executor: Arc<dyn ActionExecutor>,
        speech: Box<dyn SpeechToText>,
        announcer: Box<dyn Announcer>,
        log: Arc<CommandLog>,
    ) -> Self {
        info!(mode = mode.as_str(), "controller ready");
        Self {
            mode,
            debouncer: GestureDebouncer::new(Instant::now()),
            executor,
            auto: AutoAdvance::new(AUTO_ADVANCE_INTERVAL),
            speech,
            announcer,
            log,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Process one frame's worth of detected hands.
    ///
    /// Classifies each hand, feeds the debouncer, and dispatches at most
    /// one confirmed gesture. A voice session blocks in here until it
    /// finishes, which pauses frame-driven dispatch by construction.
    pub fn process(&mut self, hands: &[HandFrame], now: Instant) {
        // Classify the frame: first hand with a recognized gesture wins.
        let mut symbol = GestureSymbol::None;
        for hand in hands {
            let s = classifier::classify(&hand.landmarks, hand.handedness, self.mode);
            if s != GestureSymbol::None {
                symbol = s;
                break;
            }
        }

        if let Some(confirmed) = self.debouncer.update(symbol, now) {
            self.dispatch(confirmed);
        }
    }

    /// Act on a confirmed gesture. Symbols for the other mode never reach
    /// here: the classifier already filtered them.
    fn dispatch(&mut self, symbol: GestureSymbol) {
        debug!(?symbol, mode = self.mode.as_str(), "confirmed gesture");

        match (self.mode, symbol) {
            (_, GestureSymbol::Voice) => self.run_voice_session(),

            (Mode::Slide, GestureSymbol::Next) => {
                self.executor.press(Key::Right);
                self.log.record(self.mode, Trigger::Gesture, "advance-forward");
            }
            (Mode::Slide, GestureSymbol::Prev) => {
                self.executor.press(Key::Left);
                self.log.record(self.mode, Trigger::Gesture, "advance-backward");
            }

            (Mode::Document, GestureSymbol::Up) => {
                self.executor.scroll(SCROLL_STEP);
                self.log.record(self.mode, Trigger::Gesture, "scroll-forward");
            }
            (Mode::Document, GestureSymbol::Down) => {
                self.executor.scroll(-SCROLL_STEP);
                self.log.record(self.mode, Trigger::Gesture, "scroll-backward");
            }
            (Mode::Document, GestureSymbol::ZoomIn) => {
                self.executor.hotkey(Key::Ctrl, Key::Plus);
                self.log.record(self.mode, Trigger::Gesture, "zoom-in");
            }
            (Mode::Document, GestureSymbol::ZoomOut) => {
                self.executor.hotkey(Key::Ctrl, Key::Minus);
                self.log.record(self.mode, Trigger::Gesture, "zoom-out");
            }

            _ => {}
        }
    }

    fn run_voice_session(&mut self) {
        VoiceSession {
            mode: &mut self.mode,
            auto: &mut self.auto,
            executor: &self.executor,
            speech: self.speech.as_mut(),
            announcer: self.announcer.as_mut(),
            log: &self.log,
        }
        .run();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testutil::{Emitted, RecordingExecutor};
    use crate::classifier::testutil::{next_skeleton, scroll_up_skeleton, voice_skeleton};
    use crate::classifier::Handedness;
    use crate::speech::testutil::{CollectingAnnouncer, ScriptedSpeech};
    use std::time::Duration;

    fn controller(mode: Mode, transcripts: &[&'static str]) -> (NavController, Arc<RecordingExecutor>) {
        let rec = Arc::new(RecordingExecutor::default());
        let executor: Arc<dyn ActionExecutor> = rec.clone();
        let controller = NavController::new(
            mode,
            executor,
            Box::new(ScriptedSpeech::new(transcripts.iter().copied())),
            Box::new(CollectingAnnouncer::default()),
            Arc::new(CommandLog::new(std::env::temp_dir(), Some("ctl".into()))),
        );
        (controller, rec)
    }

    fn frame(skel: Vec<nalgebra::Vector3<f64>>, handedness: Handedness) -> Vec<HandFrame> {
        vec![HandFrame {
            landmarks: skel,
            handedness,
        }]
    }

    #[test]
    fn select_mode_accepts_the_two_menu_options() {
        assert_eq!(select_mode("1").unwrap(), Mode::Slide);
        assert_eq!(select_mode(" 2 ").unwrap(), Mode::Document);
        assert!(select_mode("3").is_err());
        assert!(select_mode("slide").is_err());
        assert!(select_mode("").is_err());
    }

    #[test]
    fn next_held_at_30fps_fires_exactly_once_in_600ms() {
        let (mut ctl, rec) = controller(Mode::Slide, &[]);
        let t0 = Instant::now();
        let hands = frame(next_skeleton(), Handedness::Right);

        // 0.6s of frames at ~33ms spacing.
        for tick in 0..18 {
            ctl.process(&hands, t0 + Duration::from_millis(33 * tick));
        }

        assert_eq!(rec.taken(), vec![Emitted::Press(Key::Right)]);
    }

    #[test]
    fn brief_flicker_never_dispatches() {
        let (mut ctl, rec) = controller(Mode::Slide, &[]);
        let t0 = Instant::now();
        let hands = frame(next_skeleton(), Handedness::Right);

        for tick in 0..10 {
            ctl.process(&hands, t0 + Duration::from_millis(33 * tick));
            ctl.process(&[], t0 + Duration::from_millis(33 * tick + 16));
        }

        assert!(rec.taken().is_empty());
    }

    #[test]
    fn scroll_gesture_dispatches_scroll_in_document_mode() {
        let (mut ctl, rec) = controller(Mode::Document, &[]);
        let t0 = Instant::now();
        let hands = frame(scroll_up_skeleton(), Handedness::Right);

        ctl.process(&hands, t0);
        ctl.process(&hands, t0 + Duration::from_millis(500));

        assert_eq!(rec.taken(), vec![Emitted::Scroll(SCROLL_STEP)]);
    }

    #[test]
    fn voice_gesture_enters_a_session_and_mode_change_sticks() {
        let (mut ctl, _rec) = controller(Mode::Slide, &["change mode", "exit"]);
        let t0 = Instant::now();
        let hands = frame(voice_skeleton(), Handedness::Right);

        ctl.process(&hands, t0);
        ctl.process(&hands, t0 + Duration::from_millis(500));

        assert_eq!(ctl.mode(), Mode::Document);
    }

    #[test]
    fn empty_frames_are_inert() {
        let (mut ctl, rec) = controller(Mode::Slide, &[]);
        let t0 = Instant::now();
        for tick in 0..60 {
            ctl.process(&[], t0 + Duration::from_millis(33 * tick));
        }
        assert!(rec.taken().is_empty());
    }
}
