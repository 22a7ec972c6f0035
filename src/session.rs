use crate::stats::{self, Stats};
use crate::timer::Countdown;
use std::time::{Duration, SystemTime};

pub const DEFAULT_DURATION_SECS: u64 = 60;

/// lifecycle state of a typing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Running,
    Paused,
    Complete,
}

/// live WPM sample taken once per countdown tick, for the results chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WpmSample {
    pub t: f64,
    pub wpm: f64,
}

/// represents one typing attempt against a reference passage
///
/// All mutation goes through the event methods below; the UI only reads.
/// Input is rejected outside Idle/Running, the countdown is armed only
/// while Running, and elapsed time excludes paused wall time.
#[derive(Debug)]
pub struct TypingSession {
    reference: String,
    input: String,
    countdown: Countdown,
    phase: SessionPhase,
    started_at: Option<SystemTime>,
    paused_at: Option<SystemTime>,
    paused_for: Duration,
    frozen_elapsed: Option<Duration>,
    wpm_series: Vec<WpmSample>,
}

impl TypingSession {
    pub fn new(reference: String, duration_secs: u64) -> Self {
        Self {
            reference,
            input: String::new(),
            countdown: Countdown::new(duration_secs),
            phase: SessionPhase::Idle,
            started_at: None,
            paused_at: None,
            paused_for: Duration::ZERO,
            frozen_elapsed: None,
            wpm_series: Vec::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn user_input(&self) -> &str {
        &self.input
    }

    pub fn time_remaining(&self) -> u64 {
        self.countdown.remaining()
    }

    pub fn duration_secs(&self) -> u64 {
        self.countdown.duration()
    }

    pub fn wpm_series(&self) -> &[WpmSample] {
        &self.wpm_series
    }

    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Complete
    }

    /// Percentage of the reference covered by the input, capped at 100.
    /// An empty reference counts as fully covered.
    pub fn progress(&self) -> f64 {
        let reference_len = self.reference.chars().count();
        if reference_len == 0 {
            return 100.0;
        }
        let typed = self.input.chars().count();
        ((typed as f64 / reference_len as f64) * 100.0).min(100.0)
    }

    /// Running time in milliseconds, with paused time subtracted and the
    /// value frozen once the session completes.
    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Live statistics snapshot; callable in any phase.
    pub fn stats(&self) -> Stats {
        stats::detailed(&self.input, &self.reference, self.elapsed_millis())
    }

    /// Replace the reference passage and return to Idle.
    pub fn load_passage(&mut self, text: String) {
        self.reference = text;
        self.reset();
    }

    /// Attempt to replace the input buffer. Silently rejected unless the
    /// session is Idle or Running. The first single-character candidate
    /// while Idle starts the test (timer begins on the first keystroke,
    /// not on passage load).
    pub fn set_input(&mut self, candidate: &str) {
        match self.phase {
            SessionPhase::Idle => {
                if candidate.chars().count() == 1 {
                    self.begin();
                }
            }
            SessionPhase::Running => {}
            SessionPhase::Paused | SessionPhase::Complete => return,
        }
        self.input.clear();
        self.input.push_str(candidate);
        self.check_text_complete();
    }

    /// Append one typed character.
    pub fn write(&mut self, c: char) {
        let mut candidate = self.input.clone();
        candidate.push(c);
        self.set_input(&candidate);
    }

    /// Remove the last typed character. Does not pause or reset the timer.
    pub fn backspace(&mut self) {
        if self.input.is_empty() {
            return;
        }
        let mut candidate = self.input.clone();
        candidate.pop();
        self.set_input(&candidate);
    }

    /// Explicit start, mirroring the automatic first-keystroke transition.
    pub fn start(&mut self) {
        if self.phase == SessionPhase::Idle {
            self.begin();
        }
    }

    pub fn pause(&mut self) {
        if self.phase != SessionPhase::Running {
            return;
        }
        self.phase = SessionPhase::Paused;
        self.paused_at = Some(SystemTime::now());
        self.countdown.cancel();
    }

    pub fn resume(&mut self) {
        if self.phase != SessionPhase::Paused {
            return;
        }
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_for += paused_at.elapsed().unwrap_or_default();
        }
        self.phase = SessionPhase::Running;
        self.countdown.arm();
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            SessionPhase::Running => self.pause(),
            SessionPhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Return to Idle: input cleared, countdown restored, anchors dropped.
    pub fn reset(&mut self) {
        self.input.clear();
        self.countdown.reset();
        self.phase = SessionPhase::Idle;
        self.started_at = None;
        self.paused_at = None;
        self.paused_for = Duration::ZERO;
        self.frozen_elapsed = None;
        self.wpm_series.clear();
    }

    /// One countdown second. Inert outside Running; completes the session
    /// when the countdown reaches zero.
    pub fn tick(&mut self) {
        let Some(remaining) = self.countdown.tick() else {
            return;
        };
        let elapsed = self.elapsed();
        self.wpm_series.push(WpmSample {
            t: elapsed.as_secs_f64(),
            wpm: stats::wpm(&self.input, elapsed.as_millis() as u64) as f64,
        });
        if remaining == 0 {
            self.complete();
        }
    }

    fn begin(&mut self) {
        self.phase = SessionPhase::Running;
        if self.started_at.is_none() {
            self.started_at = Some(SystemTime::now());
        }
        self.countdown.arm();
    }

    fn check_text_complete(&mut self) {
        if self.phase != SessionPhase::Running {
            return;
        }
        let done = if self.reference.is_empty() {
            // an empty passage trivially completes on any input
            !self.input.is_empty()
        } else {
            self.input.chars().eq(self.reference.chars())
        };
        if done {
            self.complete();
        }
    }

    /// Idempotent: time exhaustion and full-text match can race within one
    /// event; only the first call freezes state.
    fn complete(&mut self) {
        if self.phase == SessionPhase::Complete {
            return;
        }
        self.frozen_elapsed = Some(self.elapsed());
        self.phase = SessionPhase::Complete;
        self.countdown.cancel();
    }

    fn elapsed(&self) -> Duration {
        if let Some(frozen) = self.frozen_elapsed {
            return frozen;
        }
        let Some(started_at) = self.started_at else {
            return Duration::ZERO;
        };
        let gross = started_at.elapsed().unwrap_or_default();
        let paused = self.paused_for
            + self
                .paused_at
                .map(|p| p.elapsed().unwrap_or_default())
                .unwrap_or_default();
        gross.saturating_sub(paused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::thread;

    fn type_str(session: &mut TypingSession, s: &str) {
        for c in s.chars() {
            session.write(c);
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = TypingSession::new("cat".into(), 60);
        assert_matches!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.user_input(), "");
        assert_eq!(session.time_remaining(), 60);
        assert_eq!(session.elapsed_millis(), 0);
    }

    #[test]
    fn test_first_keystroke_starts_session() {
        let mut session = TypingSession::new("cat".into(), 60);
        session.write('c');
        assert_matches!(session.phase(), SessionPhase::Running);
        assert_eq!(session.user_input(), "c");
    }

    #[test]
    fn test_explicit_start() {
        let mut session = TypingSession::new("cat".into(), 60);
        session.start();
        assert_matches!(session.phase(), SessionPhase::Running);
        assert_eq!(session.user_input(), "");
        // start from Running is a no-op
        session.start();
        assert_matches!(session.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_full_text_match_completes() {
        let mut session = TypingSession::new("cat".into(), 60);
        type_str(&mut session, "cat");
        assert_matches!(session.phase(), SessionPhase::Complete);
        let stats = session.stats();
        assert_eq!(stats.accuracy, 100);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn test_incorrect_chars_do_not_complete() {
        let mut session = TypingSession::new("cat".into(), 60);
        type_str(&mut session, "cxt");
        assert_matches!(session.phase(), SessionPhase::Running);
        let stats = session.stats();
        assert_eq!(stats.correct_chars, 2);
        assert_eq!(stats.incorrect_chars, 1);
        assert_eq!(stats.accuracy, 67);
    }

    #[test]
    fn test_backspace_then_correct_completes() {
        let mut session = TypingSession::new("cat".into(), 60);
        type_str(&mut session, "cxt");
        session.backspace();
        session.backspace();
        assert_eq!(session.user_input(), "c");
        type_str(&mut session, "at");
        assert_matches!(session.phase(), SessionPhase::Complete);
        assert_eq!(session.stats().accuracy, 100);
    }

    #[test]
    fn test_input_rejected_while_paused() {
        let mut session = TypingSession::new("cat".into(), 60);
        session.write('c');
        session.pause();
        session.write('a');
        session.backspace();
        assert_eq!(session.user_input(), "c");
        assert_matches!(session.phase(), SessionPhase::Paused);
    }

    #[test]
    fn test_input_rejected_after_complete() {
        let mut session = TypingSession::new("hi".into(), 60);
        type_str(&mut session, "hi");
        assert_matches!(session.phase(), SessionPhase::Complete);
        session.write('x');
        session.backspace();
        assert_eq!(session.user_input(), "hi");
    }

    #[test]
    fn test_pause_resume_preserves_state() {
        let mut session = TypingSession::new("hello".into(), 60);
        type_str(&mut session, "hel");
        session.tick();
        session.pause();
        let input_before = session.user_input().to_string();
        let remaining_before = session.time_remaining();
        session.resume();
        assert_eq!(session.user_input(), input_before);
        assert_eq!(session.time_remaining(), remaining_before);
        assert_matches!(session.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_pause_only_from_running() {
        let mut session = TypingSession::new("cat".into(), 60);
        session.pause();
        assert_matches!(session.phase(), SessionPhase::Idle);
        session.resume();
        assert_matches!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_toggle_pause() {
        let mut session = TypingSession::new("cat".into(), 60);
        session.write('c');
        session.toggle_pause();
        assert_matches!(session.phase(), SessionPhase::Paused);
        session.toggle_pause();
        assert_matches!(session.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_tick_counts_down_and_completes() {
        let mut session = TypingSession::new("cat".into(), 3);
        session.write('c');
        session.tick();
        assert_eq!(session.time_remaining(), 2);
        session.tick();
        assert_eq!(session.time_remaining(), 1);
        assert_matches!(session.phase(), SessionPhase::Running);
        session.tick();
        assert_eq!(session.time_remaining(), 0);
        assert_matches!(session.phase(), SessionPhase::Complete);
    }

    #[test]
    fn test_tick_is_inert_outside_running() {
        let mut session = TypingSession::new("cat".into(), 60);
        session.tick();
        assert_eq!(session.time_remaining(), 60);

        session.write('c');
        session.pause();
        session.tick();
        assert_eq!(session.time_remaining(), 60);

        session.resume();
        session.tick();
        assert_eq!(session.time_remaining(), 59);
    }

    #[test]
    fn test_timer_monotonicity_sixty_ticks() {
        let mut session = TypingSession::new("long passage".into(), 60);
        session.write('l');
        for n in 1..=60u64 {
            session.tick();
            assert_eq!(session.time_remaining(), 60 - n);
        }
        assert_matches!(session.phase(), SessionPhase::Complete);
        assert_eq!(session.time_remaining(), 0);
    }

    #[test]
    fn test_ticks_after_completion_change_nothing() {
        let mut session = TypingSession::new("hi".into(), 2);
        session.write('h');
        session.tick();
        session.tick();
        assert_matches!(session.phase(), SessionPhase::Complete);
        session.tick();
        assert_eq!(session.time_remaining(), 0);
    }

    #[test]
    fn test_reset_restores_idle_and_is_idempotent() {
        let mut session = TypingSession::new("cat".into(), 60);
        type_str(&mut session, "ca");
        session.tick();
        session.reset();
        assert_matches!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.user_input(), "");
        assert_eq!(session.time_remaining(), 60);
        assert_eq!(session.elapsed_millis(), 0);

        session.reset();
        assert_matches!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.user_input(), "");
        assert_eq!(session.time_remaining(), 60);
    }

    #[test]
    fn test_reset_allows_fresh_start() {
        let mut session = TypingSession::new("cat".into(), 60);
        type_str(&mut session, "cat");
        assert_matches!(session.phase(), SessionPhase::Complete);
        session.reset();
        session.write('c');
        assert_matches!(session.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_load_passage_replaces_reference_and_resets() {
        let mut session = TypingSession::new("cat".into(), 60);
        type_str(&mut session, "ca");
        session.load_passage("dog".into());
        assert_eq!(session.reference(), "dog");
        assert_eq!(session.user_input(), "");
        assert_matches!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.time_remaining(), 60);
    }

    #[test]
    fn test_empty_reference_completes_on_first_keystroke() {
        let mut session = TypingSession::new(String::new(), 60);
        session.write('x');
        assert_matches!(session.phase(), SessionPhase::Complete);
        assert_eq!(session.progress(), 100.0);
    }

    #[test]
    fn test_multi_char_candidate_while_idle_does_not_start() {
        let mut session = TypingSession::new("cat".into(), 60);
        session.set_input("ca");
        assert_matches!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.user_input(), "ca");
    }

    #[test]
    fn test_progress() {
        let mut session = TypingSession::new("abcd".into(), 60);
        assert_eq!(session.progress(), 0.0);
        type_str(&mut session, "ab");
        assert_eq!(session.progress(), 50.0);
        session.set_input("abcdxx");
        assert_eq!(session.progress(), 100.0);
    }

    #[test]
    fn test_overflow_input_counts_as_errors() {
        let mut session = TypingSession::new("hi".into(), 60);
        session.set_input("hiya");
        let stats = session.stats();
        assert_eq!(stats.correct_chars, 2);
        assert_eq!(stats.incorrect_chars, 2);
        assert_eq!(stats.accuracy, 50);
    }

    #[test]
    fn test_elapsed_grows_while_running() {
        let mut session = TypingSession::new("cat".into(), 60);
        session.write('c');
        thread::sleep(std::time::Duration::from_millis(30));
        assert!(session.elapsed_millis() >= 30);
    }

    #[test]
    fn test_paused_time_excluded_from_elapsed() {
        let mut session = TypingSession::new("cat".into(), 60);
        session.write('c');
        thread::sleep(std::time::Duration::from_millis(20));
        session.pause();
        let at_pause = session.elapsed_millis();
        thread::sleep(std::time::Duration::from_millis(60));
        // frozen while paused
        assert!(session.elapsed_millis() <= at_pause + 5);
        session.resume();
        thread::sleep(std::time::Duration::from_millis(20));
        let after = session.elapsed_millis();
        // paused wall time never shows up in the running total
        assert!(after < 60, "paused time leaked into elapsed: {after}ms");
    }

    #[test]
    fn test_elapsed_frozen_after_completion() {
        let mut session = TypingSession::new("hi".into(), 60);
        type_str(&mut session, "hi");
        let frozen = session.elapsed_millis();
        thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(session.elapsed_millis(), frozen);
    }

    #[test]
    fn test_wpm_series_sampled_per_tick() {
        let mut session = TypingSession::new("one two three".into(), 60);
        type_str(&mut session, "one ");
        session.tick();
        session.tick();
        assert_eq!(session.wpm_series().len(), 2);
        assert!(session.wpm_series()[0].t <= session.wpm_series()[1].t);
    }

    #[test]
    fn test_stats_empty_session() {
        let session = TypingSession::new("cat".into(), 60);
        let stats = session.stats();
        assert_eq!(stats.accuracy, 100);
        assert_eq!(stats.wpm, 0);
        assert_eq!(stats.total_chars, 0);
    }
}
