// src/voice.rs - Voice command session and the auto-advance worker
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info};

use crate::actions::{ActionExecutor, Key, SCROLL_STEP};
use crate::classifier::Mode;
use crate::data::{CommandLog, Trigger};
use crate::speech::{Announcer, SpeechToText};

/// Spacing between automatic slide advances.
pub const AUTO_ADVANCE_INTERVAL: Duration = Duration::from_secs(10);

/// Timed background "advance forward" loop.
///
/// One supervised worker thread at most: starting while a worker is
/// running replaces it. The worker sleeps a full interval, then polls its
/// flag, then presses, so a stop request inside the first interval
/// produces no action at all. A stop while running costs at most one
/// stale action.
pub struct AutoAdvance {
    enabled: Arc<AtomicBool>,
    interval: Duration,
    worker: Option<JoinHandle<()>>,
}

impl AutoAdvance {
    pub fn new(interval: Duration) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(false)),
            interval,
            worker: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn start(&mut self, executor: Arc<dyn ActionExecutor>, log: Arc<CommandLog>) {
        self.stop();

        let flag = Arc::new(AtomicBool::new(true));
        self.enabled = Arc::clone(&flag);
        let interval = self.interval;

        self.worker = Some(thread::spawn(move || {
            loop {
                thread::sleep(interval);
                if !flag.load(Ordering::Relaxed) {
                    break;
                }
                executor.press(Key::Right);
                log.record(Mode::Slide, Trigger::Auto, "advance-forward");
                debug!("auto-advance: next slide");
            }
            debug!("auto-advance worker stopped");
        }));
    }

    /// Request a stop. The worker notices at its next poll; no join here,
    /// bounded staleness is part of the contract.
    pub fn stop(&mut self) {
        self.enabled.store(false, Ordering::Relaxed);
        self.worker.take();
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.stop();
    }
}

enum SessionControl {
    Continue,
    Exit,
}

/// One activation of voice command mode.
///
/// Lives only for the duration of the session; borrows the mode and the
/// auto-advance handle from the controller and blocks it until the user
/// exits (or the transcript source goes silent).
pub struct VoiceSession<'a> {
    pub mode: &'a mut Mode,
    pub auto: &'a mut AutoAdvance,
    pub executor: &'a Arc<dyn ActionExecutor>,
    pub speech: &'a mut dyn SpeechToText,
    pub announcer: &'a mut dyn Announcer,
    pub log: &'a Arc<CommandLog>,
}

impl VoiceSession<'_> {
    pub fn run(mut self) {
        info!("voice session started");
        self.announcer
            .say("Voice command mode activated. Say 'exit' to return.");
        self.announcer
            .say("You can enable automatic slide navigation by saying 'auto mode'.");

        loop {
            match self.speech.listen() {
                Some(command) => {
                    if let SessionControl::Exit = self.handle(&command) {
                        break;
                    }
                }
                // Silence or a speech failure (already announced by the
                // collaborator) ends the whole session, not just this turn.
                None => {
                    self.announcer.say("Exiting.");
                    break;
                }
            }
        }

        info!("voice session ended");
    }

    /// Apply every phrase the transcript contains, in priority order.
    fn handle(&mut self, command: &str) -> SessionControl {
        if command.contains("exit") {
            self.announcer.say("Exiting voice command mode.");
            return SessionControl::Exit;
        }

        // Toggle before report, so "change mode current mode" announces
        // the mode the user just switched to.
        if command.contains("change mode") {
            *self.mode = self.mode.toggled();
            info!(mode = self.mode.as_str(), "mode changed by voice");
            self.announcer
                .say(&format!("Changing mode to {}.", self.mode.as_str()));
        }

        if command.contains("current mode") {
            self.announcer
                .say(&format!("The current mode is {}.", self.mode.as_str()));
        }

        match *self.mode {
            Mode::Slide => self.handle_slide(command),
            Mode::Document => self.handle_document(command),
        }

        SessionControl::Continue
    }

    fn handle_slide(&mut self, command: &str) {
        if command.contains("next slide") {
            self.executor.press(Key::Right);
            self.log.record(Mode::Slide, Trigger::Voice, "advance-forward");
        }

        if command.contains("previous slide") {
            self.executor.press(Key::Left);
            self.log.record(Mode::Slide, Trigger::Voice, "advance-backward");
        }

        // "stop auto mode" contains "auto mode"; check the stop first so
        // it reads as a stop, never as a restart.
        if command.contains("stop auto mode") {
            self.auto.stop();
            self.announcer.say("Automatic mode disabled.");
        } else if command.contains("auto mode") {
            self.announcer.say("Enabling automatic mode.");
            self.auto
                .start(Arc::clone(self.executor), Arc::clone(self.log));
        }

        if command.contains("go to page") {
            match command
                .split_whitespace()
                .last()
                .and_then(|token| token.parse::<u32>().ok())
            {
                Some(page) => {
                    // No clamping: over-advancing is just repeated presses.
                    for _ in 0..page {
                        self.executor.press(Key::Right);
                    }
                    self.log
                        .record(Mode::Slide, Trigger::Voice, &format!("go-to-page {page}"));
                    info!(page, "jumped forward by voice");
                }
                None => {
                    self.announcer.say("Invalid page number. Please try again.");
                }
            }
        }
    }

    fn handle_document(&mut self, command: &str) {
        if command.contains("scroll up") {
            self.executor.scroll(SCROLL_STEP);
            self.log.record(Mode::Document, Trigger::Voice, "scroll-forward");
        }

        if command.contains("scroll down") {
            self.executor.scroll(-SCROLL_STEP);
            self.log.record(Mode::Document, Trigger::Voice, "scroll-backward");
        }

        if command.contains("zoom in") {
            self.executor.hotkey(Key::Ctrl, Key::Plus);
            self.log.record(Mode::Document, Trigger::Voice, "zoom-in");
        }

        if command.contains("zoom out") {
            self.executor.hotkey(Key::Ctrl, Key::Minus);
            self.log.record(Mode::Document, Trigger::Voice, "zoom-out");
        }

        if command.contains("close document") {
            self.executor.hotkey(Key::Ctrl, Key::W);
            self.log.record(Mode::Document, Trigger::Voice, "close-document");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testutil::{Emitted, RecordingExecutor};
    use crate::speech::testutil::{CollectingAnnouncer, ScriptedSpeech};

    struct Fixture {
        mode: Mode,
        auto: AutoAdvance,
        rec: Arc<RecordingExecutor>,
        executor: Arc<dyn ActionExecutor>,
        announcer: CollectingAnnouncer,
        log: Arc<CommandLog>,
    }

    impl Fixture {
        fn new(mode: Mode) -> Self {
            let rec = Arc::new(RecordingExecutor::default());
            let executor: Arc<dyn ActionExecutor> = rec.clone();
            Self {
                mode,
                auto: AutoAdvance::new(Duration::from_millis(50)),
                rec,
                executor,
                announcer: CollectingAnnouncer::default(),
                log: Arc::new(CommandLog::new(std::env::temp_dir(), Some("voice".into()))),
            }
        }

        fn run(&mut self, speech: &mut dyn SpeechToText) {
            VoiceSession {
                mode: &mut self.mode,
                auto: &mut self.auto,
                executor: &self.executor,
                speech,
                announcer: &mut self.announcer,
                log: &self.log,
            }
            .run();
        }
    }

    #[test]
    fn change_mode_toggles_both_ways() {
        let mut fx = Fixture::new(Mode::Slide);
        let mut speech = ScriptedSpeech::new(["change mode", "change mode", "exit"]);
        fx.run(&mut speech);
        assert_eq!(fx.mode, Mode::Slide);
        assert!(fx
            .announcer
            .spoken
            .iter()
            .any(|s| s.contains("Changing mode to document")));
        assert!(fx
            .announcer
            .spoken
            .iter()
            .any(|s| s.contains("Changing mode to slide")));
    }

    #[test]
    fn change_mode_then_current_mode_reports_new_mode() {
        let mut fx = Fixture::new(Mode::Slide);
        let mut speech = ScriptedSpeech::new(["change mode current mode", "exit"]);
        fx.run(&mut speech);

        assert_eq!(fx.mode, Mode::Document);
        let report = fx
            .announcer
            .spoken
            .iter()
            .find(|s| s.contains("The current mode is"))
            .expect("current mode announced");
        assert!(report.contains("document"));
    }

    #[test]
    fn silence_ends_the_session() {
        let mut fx = Fixture::new(Mode::Slide);
        let mut speech = ScriptedSpeech::new([]);
        fx.run(&mut speech);
        assert_eq!(fx.announcer.spoken.last().unwrap(), "Exiting.");
        assert!(fx.rec.taken().is_empty());
    }

    #[test]
    fn go_to_page_presses_forward_n_times() {
        let mut fx = Fixture::new(Mode::Slide);
        let mut speech = ScriptedSpeech::new(["go to page 3", "exit"]);
        fx.run(&mut speech);
        assert_eq!(
            fx.rec.taken(),
            vec![
                Emitted::Press(Key::Right),
                Emitted::Press(Key::Right),
                Emitted::Press(Key::Right)
            ]
        );
    }

    #[test]
    fn go_to_page_with_garbage_is_announced_and_ignored() {
        let mut fx = Fixture::new(Mode::Slide);
        let mut speech = ScriptedSpeech::new(["go to page abc", "exit"]);
        fx.run(&mut speech);
        assert!(fx.rec.taken().is_empty());
        assert_eq!(fx.mode, Mode::Slide);
        assert!(fx
            .announcer
            .spoken
            .iter()
            .any(|s| s.contains("Invalid page number")));
    }

    #[test]
    fn document_phrases_map_to_commands() {
        let mut fx = Fixture::new(Mode::Document);
        let mut speech = ScriptedSpeech::new([
            "scroll up",
            "scroll down",
            "zoom in",
            "zoom out",
            "close document",
            "exit",
        ]);
        fx.run(&mut speech);
        assert_eq!(
            fx.rec.taken(),
            vec![
                Emitted::Scroll(SCROLL_STEP),
                Emitted::Scroll(-SCROLL_STEP),
                Emitted::Hotkey(Key::Ctrl, Key::Plus),
                Emitted::Hotkey(Key::Ctrl, Key::Minus),
                Emitted::Hotkey(Key::Ctrl, Key::W),
            ]
        );
    }

    #[test]
    fn slide_phrases_are_inert_in_document_mode() {
        let mut fx = Fixture::new(Mode::Document);
        let mut speech = ScriptedSpeech::new(["next slide", "exit"]);
        fx.run(&mut speech);
        assert!(fx.rec.taken().is_empty());
    }

    #[test]
    fn auto_advance_stopped_within_first_interval_emits_nothing() {
        let rec = Arc::new(RecordingExecutor::default());
        let executor: Arc<dyn ActionExecutor> = rec.clone();
        let log = Arc::new(CommandLog::new(std::env::temp_dir(), Some("auto".into())));

        let mut auto = AutoAdvance::new(Duration::from_millis(50));
        auto.start(Arc::clone(&executor), Arc::clone(&log));
        assert!(auto.is_enabled());
        auto.stop();
        assert!(!auto.is_enabled());

        thread::sleep(Duration::from_millis(150));
        assert!(rec.taken().is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn auto_advance_presses_while_enabled() {
        let rec = Arc::new(RecordingExecutor::default());
        let executor: Arc<dyn ActionExecutor> = rec.clone();
        let log = Arc::new(CommandLog::new(std::env::temp_dir(), Some("auto2".into())));

        let mut auto = AutoAdvance::new(Duration::from_millis(20));
        auto.start(Arc::clone(&executor), Arc::clone(&log));
        thread::sleep(Duration::from_millis(110));
        auto.stop();

        let pressed = rec.taken();
        assert!(!pressed.is_empty());
        assert!(pressed.iter().all(|e| *e == Emitted::Press(Key::Right)));
    }

    #[test]
    fn stop_auto_mode_phrase_disables_instead_of_restarting() {
        let mut fx = Fixture::new(Mode::Slide);
        let mut speech = ScriptedSpeech::new(["auto mode", "stop auto mode", "exit"]);
        fx.run(&mut speech);
        assert!(!fx.auto.is_enabled());
        assert!(fx
            .announcer
            .spoken
            .iter()
            .any(|s| s.contains("Automatic mode disabled")));
    }
}
