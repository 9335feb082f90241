use crate::config::TypewriterConfig;
use crate::schedule::{TimerHost, TimerId};

/// Glyph drawn after the visible text when the cursor is enabled.
pub const CURSOR_GLYPH: char = '|';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Typing,
    PausedAfterTyped,
    Deleting,
    PausedAfterDeleted,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Typing => "typing",
            Phase::PausedAfterTyped => "pausedAfterTyped",
            Phase::Deleting => "deleting",
            Phase::PausedAfterDeleted => "pausedAfterDeleted",
        }
    }
}

/// What a host renders for the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypewriterView<'a> {
    /// Full target, exposed to assistive technology regardless of animation.
    pub label: &'a str,
    /// Animated prefix.
    pub visible: &'a str,
    pub cursor: Option<char>,
}

impl TypewriterView<'_> {
    /// Longest rendered form; hosts reserve its box to avoid layout shift.
    pub fn reserved(&self) -> String {
        let mut out = String::with_capacity(self.label.len() + 1);
        out.push_str(self.label);
        out.extend(self.cursor);
        out
    }
}

/// Types a string out one character at a time, pauses, deletes it, pauses,
/// and starts over.
///
/// Exactly one timer is armed at a time. Every transition clears the armed
/// timer before arming the next, and a delivery for any other handle is
/// ignored, so a stale timer can never touch the buffer.
#[derive(Debug)]
pub struct Typewriter {
    config: TypewriterConfig,
    target: String,
    displayed: String,
    /// `displayed.chars().count()`
    shown: usize,
    target_len: usize,
    phase: Phase,
    armed: Option<TimerId>,
    reduced_motion: bool,
    mounted: bool,
}

impl Typewriter {
    pub fn new(text: impl Into<String>, config: TypewriterConfig) -> Self {
        let target = text.into();
        Self {
            target_len: target.chars().count(),
            target,
            config,
            displayed: String::new(),
            shown: 0,
            phase: Phase::Typing,
            armed: None,
            reduced_motion: false,
            mounted: false,
        }
    }

    pub fn config(&self) -> &TypewriterConfig {
        &self.config
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn armed_timer(&self) -> Option<TimerId> {
        self.armed
    }

    pub fn is_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn view(&self) -> TypewriterView<'_> {
        TypewriterView {
            label: &self.target,
            visible: &self.displayed,
            cursor: self.config.show_cursor.then_some(CURSOR_GLYPH),
        }
    }

    /// Start the machine with the platform's current reduced-motion state.
    pub fn mount<T: TimerHost + ?Sized>(&mut self, reduced_motion: bool, timers: &mut T) {
        self.mounted = true;
        self.reduced_motion = reduced_motion;
        if reduced_motion {
            self.show_full_target();
        }
        self.arm(timers);
    }

    /// Clear the armed timer. Later deliveries of it are no-ops.
    pub fn unmount<T: TimerHost + ?Sized>(&mut self, timers: &mut T) {
        self.disarm(timers);
        self.mounted = false;
    }

    /// Replace the target and restart from an empty buffer in `Typing`,
    /// whatever the current phase. Setting the same text changes nothing.
    pub fn set_text<T: TimerHost + ?Sized>(&mut self, text: impl Into<String>, timers: &mut T) {
        let text = text.into();
        if text == self.target {
            return;
        }
        self.disarm(timers);
        self.target_len = text.chars().count();
        self.target = text;
        self.displayed.clear();
        self.shown = 0;
        self.phase = Phase::Typing;
        if self.reduced_motion {
            self.show_full_target();
        }
        self.arm(timers);
    }

    /// React to a reduced-motion change. Turning it on shows the full text
    /// and stops the machine; turning it off resumes from the current phase.
    pub fn set_reduced_motion<T: TimerHost + ?Sized>(&mut self, reduced: bool, timers: &mut T) {
        if reduced == self.reduced_motion {
            return;
        }
        self.reduced_motion = reduced;
        if reduced {
            self.disarm(timers);
            self.show_full_target();
        } else {
            self.arm(timers);
        }
    }

    /// Deliver a fired timer. Returns true if it was the armed one and the
    /// state advanced.
    pub fn on_timer<T: TimerHost + ?Sized>(&mut self, id: TimerId, timers: &mut T) -> bool {
        if self.armed != Some(id) {
            return false;
        }
        self.armed = None;
        if !self.mounted || self.reduced_motion {
            return false;
        }

        match self.phase {
            Phase::Typing => {
                match self.target.chars().nth(self.shown) {
                    Some(c) => {
                        self.displayed.push(c);
                        self.shown += 1;
                    }
                    None => self.phase = Phase::PausedAfterTyped,
                }
            }
            Phase::PausedAfterTyped => self.phase = Phase::Deleting,
            Phase::Deleting => {
                if self.displayed.pop().is_some() {
                    self.shown -= 1;
                } else {
                    self.phase = Phase::PausedAfterDeleted;
                }
            }
            Phase::PausedAfterDeleted => self.phase = Phase::Typing,
        }
        self.arm(timers);
        true
    }

    /// Delay before the next transition out of the current state.
    fn next_delay(&self) -> u32 {
        let c = &self.config;
        match self.phase {
            Phase::Typing if self.shown < self.target_len => c.typing_delay_ms,
            Phase::Typing => c.pause_after_typed_ms,
            Phase::PausedAfterTyped => 0,
            Phase::Deleting if self.shown > 0 => c.deleting_delay_ms,
            Phase::Deleting => c.pause_after_deleted_ms,
            Phase::PausedAfterDeleted => 0,
        }
    }

    fn arm<T: TimerHost + ?Sized>(&mut self, timers: &mut T) {
        self.disarm(timers);
        if !self.mounted || self.reduced_motion {
            return;
        }
        self.armed = timers.set_timeout(self.next_delay());
        if self.armed.is_none() {
            log::warn!("typewriter could not arm a timer; animation stopped");
        }
    }

    fn disarm<T: TimerHost + ?Sized>(&mut self, timers: &mut T) {
        if let Some(id) = self.armed.take() {
            timers.clear_timeout(id);
        }
    }

    fn show_full_target(&mut self) {
        self.displayed.clone_from(&self.target);
        self.shown = self.target_len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualScheduler;

    #[test]
    fn test_multibyte_text_types_one_char_per_step() {
        let config = TypewriterConfig {
            typing_delay_ms: 5,
            ..TypewriterConfig::default()
        };
        let mut tw = Typewriter::new("né✓", config);
        let mut sched = ManualScheduler::new();
        tw.mount(false, &mut sched);

        sched.advance_by(10, |id, s| {
            tw.on_timer(id, s);
        });
        assert_eq!(tw.displayed(), "né");

        sched.advance_by(5, |id, s| {
            tw.on_timer(id, s);
        });
        assert_eq!(tw.displayed(), "né✓");
    }

    #[test]
    fn test_view_reserves_text_plus_cursor() {
        let tw = Typewriter::new("Hello", TypewriterConfig::default());
        let view = tw.view();
        assert_eq!(view.label, "Hello");
        assert_eq!(view.visible, "");
        assert_eq!(view.reserved(), "Hello|");

        let quiet = Typewriter::new(
            "Hello",
            TypewriterConfig {
                show_cursor: false,
                ..TypewriterConfig::default()
            },
        );
        assert_eq!(quiet.view().reserved(), "Hello");
    }
}
