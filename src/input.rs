//! Keyboard handling for two players sharing one keyboard.
//!
//! Terminals report key repeats but not reliable releases, so a key
//! counts as held until no event has refreshed it for a short timeout.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

use crate::duel::{FrameInput, MAX_PLAYERS};
use crate::settings::{PlayerBindings, Settings};

/// Time after which a key counts as released if no repeat arrived.
const KEY_TIMEOUT: Duration = Duration::from_millis(100);

/// What a bound key does when it fires. The payload is the player index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Action {
    Left(usize),
    Right(usize),
    Down(usize),
    Rotate(usize),
    Pause,
    Restart,
    Quit,
}

/// Key bindings resolved from the settings file, one action per key.
pub struct InputMap {
    bindings: HashMap<KeyCode, Action>,
}

impl InputMap {
    pub fn from_settings(settings: &Settings) -> Self {
        let mut map = Self {
            bindings: HashMap::new(),
        };
        let players: [&PlayerBindings; MAX_PLAYERS] =
            [&settings.keys.player_one, &settings.keys.player_two];
        for (index, player) in players.iter().enumerate() {
            map.bind_all(&player.left, Action::Left(index));
            map.bind_all(&player.right, Action::Right(index));
            map.bind_all(&player.down, Action::Down(index));
            map.bind_all(&player.rotate, Action::Rotate(index));
        }
        map.bind_all(&settings.keys.pause, Action::Pause);
        map.bind_all(&settings.keys.restart, Action::Restart);
        map.bind_all(&settings.keys.quit, Action::Quit);
        map
    }

    fn bind_all(&mut self, names: &[String], action: Action) {
        for name in names {
            match parse_key(name) {
                Some(code) => {
                    self.bindings.insert(code, action);
                }
                None => warn!("Ignoring unknown key name '{}' in settings", name),
            }
        }
    }

    fn action(&self, code: KeyCode) -> Option<Action> {
        self.bindings.get(&normalize_key(code)).copied()
    }
}

/// Collects key events between ticks and folds them into one [`FrameInput`].
pub struct InputTracker {
    map: InputMap,
    /// Actions currently held, with the time of their last key event.
    held: HashMap<Action, Instant>,
    /// Actions freshly pressed since the last frame was taken.
    pressed: Vec<Action>,
    quit: bool,
}

impl InputTracker {
    pub fn new(map: InputMap) -> Self {
        Self {
            map,
            held: HashMap::new(),
            pressed: Vec::new(),
            quit: false,
        }
    }

    /// Feed one terminal key event.
    pub fn on_key_event(&mut self, event: KeyEvent) {
        if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }

        let Some(action) = self.map.action(event.code) else {
            return;
        };

        match event.kind {
            // Without the enhanced keyboard protocol, autorepeat arrives as
            // a stream of Press events; only the first one is an edge.
            KeyEventKind::Press => {
                if !self.held.contains_key(&action) && !self.pressed.contains(&action) {
                    self.pressed.push(action);
                }
                self.held.insert(action, Instant::now());
            }
            KeyEventKind::Repeat => {
                self.held.insert(action, Instant::now());
            }
            KeyEventKind::Release => {
                self.held.remove(&action);
            }
        }
    }

    /// Fold everything seen since the last call into one tick's input.
    pub fn take_frame(&mut self) -> FrameInput {
        let mut frame = FrameInput {
            quit: self.quit,
            ..Default::default()
        };

        let now = Instant::now();
        self.held
            .retain(|_, last_seen| now.duration_since(*last_seen) < KEY_TIMEOUT);

        for action in self.held.keys() {
            apply_level(&mut frame, *action);
        }
        for action in self.pressed.drain(..) {
            apply_edge(&mut frame, action);
        }
        frame
    }
}

/// Mark an action freshly pressed. A tap that fit entirely between two
/// ticks still counts as held for the tick it lands on.
fn apply_edge(frame: &mut FrameInput, action: Action) {
    match action {
        Action::Left(p) => {
            frame.players[p].left_pressed = true;
            frame.players[p].left_held = true;
        }
        Action::Right(p) => {
            frame.players[p].right_pressed = true;
            frame.players[p].right_held = true;
        }
        Action::Rotate(p) => {
            frame.players[p].rotate_pressed = true;
            frame.players[p].rotate_held = true;
        }
        Action::Down(p) => frame.players[p].down_held = true,
        Action::Pause => frame.pause_pressed = true,
        Action::Restart => frame.restart_pressed = true,
        Action::Quit => frame.quit = true,
    }
}

/// Mark an action held on this tick.
fn apply_level(frame: &mut FrameInput, action: Action) {
    match action {
        Action::Left(p) => frame.players[p].left_held = true,
        Action::Right(p) => frame.players[p].right_held = true,
        Action::Rotate(p) => frame.players[p].rotate_held = true,
        Action::Down(p) => frame.players[p].down_held = true,
        // Pause and restart act on their press edge only.
        Action::Pause | Action::Restart => {}
        Action::Quit => frame.quit = true,
    }
}

/// Parse a key name from the settings file.
fn parse_key(name: &str) -> Option<KeyCode> {
    match name.to_lowercase().as_str() {
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "space" => Some(KeyCode::Char(' ')),
        "enter" | "return" => Some(KeyCode::Enter),
        "tab" => Some(KeyCode::Tab),
        "backspace" => Some(KeyCode::Backspace),
        "esc" | "escape" => Some(KeyCode::Esc),
        s if s.chars().count() == 1 => Some(KeyCode::Char(s.chars().next().unwrap())),
        _ => None,
    }
}

/// Treat upper- and lowercase presses of the same key alike.
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> InputTracker {
        InputTracker::new(InputMap::from_settings(&Settings::default()))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings_route_each_player() {
        let mut tracker = tracker();
        tracker.on_key_event(press(KeyCode::Char('a')));
        tracker.on_key_event(press(KeyCode::Left));

        let frame = tracker.take_frame();
        assert!(frame.players[0].left_pressed);
        assert!(frame.players[0].left_held);
        assert!(frame.players[1].left_pressed);
        assert!(!frame.players[0].right_pressed);
        assert!(!frame.players[1].rotate_pressed);
    }

    #[test]
    fn test_uppercase_presses_match_lowercase_bindings() {
        let mut tracker = tracker();
        tracker.on_key_event(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT));

        let frame = tracker.take_frame();
        assert!(frame.players[0].left_pressed);
    }

    #[test]
    fn test_edge_fires_once_while_the_key_stays_down() {
        let mut tracker = tracker();
        tracker.on_key_event(press(KeyCode::Char('a')));
        let first = tracker.take_frame();
        assert!(first.players[0].left_pressed);

        // Autorepeat shows up as another plain press.
        tracker.on_key_event(press(KeyCode::Char('a')));
        let second = tracker.take_frame();
        assert!(!second.players[0].left_pressed);
        assert!(second.players[0].left_held);
    }

    #[test]
    fn test_release_clears_the_held_state() {
        let mut tracker = tracker();
        tracker.on_key_event(press(KeyCode::Char('a')));
        tracker.take_frame();

        tracker.on_key_event(KeyEvent::new_with_kind(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        let frame = tracker.take_frame();
        assert!(!frame.players[0].left_held);
    }

    #[test]
    fn test_stale_keys_expire_without_a_release_event() {
        let mut tracker = tracker();
        tracker.on_key_event(press(KeyCode::Char('a')));
        tracker.take_frame();

        std::thread::sleep(KEY_TIMEOUT + Duration::from_millis(20));
        let frame = tracker.take_frame();
        assert!(!frame.players[0].left_held);
    }

    #[test]
    fn test_ctrl_c_requests_quit() {
        let mut tracker = tracker();
        tracker.on_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(tracker.take_frame().quit);
    }

    #[test]
    fn test_unknown_key_names_are_ignored() {
        let mut settings = Settings::default();
        settings.keys.pause = vec!["super".to_string()];
        let mut tracker = InputTracker::new(InputMap::from_settings(&settings));

        tracker.on_key_event(press(KeyCode::Char('p')));
        assert!(!tracker.take_frame().pause_pressed);
    }

    #[test]
    fn test_parse_key_names() {
        assert_eq!(parse_key("Left"), Some(KeyCode::Left));
        assert_eq!(parse_key("ESC"), Some(KeyCode::Esc));
        assert_eq!(parse_key("return"), Some(KeyCode::Enter));
        assert_eq!(parse_key("space"), Some(KeyCode::Char(' ')));
        assert_eq!(parse_key("x"), Some(KeyCode::Char('x')));
        assert_eq!(parse_key("bogus"), None);
    }
}
