use std::collections::HashMap;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};

use crate::platform::{InputEvent, Key};
use crate::ui::Viewport;

/// Without release reporting a held key is only visible through OS
/// auto-repeat. The first repeat can take up to 660 ms (the Xorg default).
const FIRST_HOLD: Duration = Duration::from_millis(700);
const REPEAT_HOLD: Duration = Duration::from_millis(120);

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Char(' ') => Some(Key::Fire),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Key::Quit),
        KeyCode::Enter | KeyCode::Char('p') | KeyCode::Char('P') => Some(Key::Play),
        _ => None,
    }
}

/// Keys whose release matters to the game
fn is_held_key(key: Key) -> bool {
    matches!(key, Key::Left | Key::Right)
}

/// Turns terminal events into game input. When the terminal cannot report
/// key releases, held keys expire after a stretch without repeats.
pub struct InputMapper {
    report_release: bool,
    held: HashMap<Key, Instant>,
}

impl InputMapper {
    pub fn new(report_release: bool) -> Self {
        Self {
            report_release,
            held: HashMap::new(),
        }
    }

    pub fn translate(
        &mut self,
        event: TermEvent,
        viewport: &Viewport,
        now: Instant,
        out: &mut Vec<InputEvent>,
    ) {
        match event {
            TermEvent::Key(key) => self.on_key(key, now, out),
            TermEvent::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                if let Some((x, y)) = viewport.to_logical(column, row) {
                    out.push(InputEvent::PointerDown { x, y });
                }
            }
            _ => {}
        }
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant, out: &mut Vec<InputEvent>) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.kind != KeyEventKind::Release {
                out.push(InputEvent::Quit);
            }
            return;
        }
        let Some(k) = map_key(key.code) else {
            return;
        };

        match key.kind {
            KeyEventKind::Press => {
                if self.report_release || !is_held_key(k) {
                    out.push(InputEvent::KeyDown(k));
                } else if let Some(deadline) = self.held.get_mut(&k) {
                    *deadline = (*deadline).max(now + REPEAT_HOLD);
                } else {
                    self.held.insert(k, now + FIRST_HOLD);
                    out.push(InputEvent::KeyDown(k));
                }
            }
            KeyEventKind::Repeat => {}
            KeyEventKind::Release => out.push(InputEvent::KeyUp(k)),
        }
    }

    /// Synthesize releases for held keys that went quiet
    pub fn expire(&mut self, now: Instant, out: &mut Vec<InputEvent>) {
        let mut expired: Vec<Key> = self
            .held
            .iter()
            .filter(|(_, &deadline)| deadline <= now)
            .map(|(&k, _)| k)
            .collect();
        expired.sort_by_key(|k| *k as u8);
        for k in expired {
            self.held.remove(&k);
            out.push(InputEvent::KeyUp(k));
        }
    }
}

pub struct EventHandler {
    rx: mpsc::Receiver<TermEvent>,
    mapper: InputMapper,
}

impl EventHandler {
    pub fn new(report_release: bool) -> Self {
        let (tx, rx) = mpsc::channel();
        let poll_rate = Duration::from_millis(8);

        thread::spawn(move || loop {
            match event::poll(poll_rate) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if tx.send(ev).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        log::error!("Terminal read failed: {e}");
                        return;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    log::error!("Terminal poll failed: {e}");
                    return;
                }
            }
        });

        Self::with_receiver(rx, report_release)
    }

    fn with_receiver(rx: mpsc::Receiver<TermEvent>, report_release: bool) -> Self {
        Self {
            rx,
            mapper: InputMapper::new(report_release),
        }
    }

    /// Everything that arrived since the last call, without blocking
    pub fn drain(&mut self, viewport: &Viewport) -> Vec<InputEvent> {
        let now = Instant::now();
        let mut out = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(ev) => self.mapper.translate(ev, viewport, now, &mut out),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // input thread is gone, nothing can end the game otherwise
                    out.push(InputEvent::Quit);
                    break;
                }
            }
        }
        self.mapper.expire(now, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    fn viewport() -> Viewport {
        Viewport::new(Rect::new(1, 1, 120, 40), 1200, 800)
    }

    fn press(code: KeyCode) -> TermEvent {
        TermEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn release(code: KeyCode) -> TermEvent {
        TermEvent::Key(KeyEvent::new_with_kind(
            code,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ))
    }

    fn run(mapper: &mut InputMapper, events: Vec<TermEvent>, now: Instant) -> Vec<InputEvent> {
        let mut out = Vec::new();
        for ev in events {
            mapper.translate(ev, &viewport(), now, &mut out);
        }
        out
    }

    #[test]
    fn keys_map_to_game_input() {
        let mut mapper = InputMapper::new(true);
        let now = Instant::now();
        let out = run(
            &mut mapper,
            vec![
                press(KeyCode::Left),
                release(KeyCode::Left),
                press(KeyCode::Char(' ')),
                press(KeyCode::Char('Q')),
                press(KeyCode::Enter),
                press(KeyCode::Char('x')),
            ],
            now,
        );
        assert_eq!(
            out,
            vec![
                InputEvent::KeyDown(Key::Left),
                InputEvent::KeyUp(Key::Left),
                InputEvent::KeyDown(Key::Fire),
                InputEvent::KeyDown(Key::Quit),
                InputEvent::KeyDown(Key::Play),
            ]
        );
    }

    #[test]
    fn ctrl_c_quits() {
        let mut mapper = InputMapper::new(false);
        let ev = TermEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let out = run(&mut mapper, vec![ev], Instant::now());
        assert_eq!(out, vec![InputEvent::Quit]);
    }

    #[test]
    fn left_click_lands_in_logical_space() {
        let mut mapper = InputMapper::new(true);
        let click = |kind| {
            TermEvent::Mouse(MouseEvent {
                kind,
                column: 61,
                row: 21,
                modifiers: KeyModifiers::NONE,
            })
        };
        let out = run(
            &mut mapper,
            vec![
                click(MouseEventKind::Down(MouseButton::Left)),
                click(MouseEventKind::Down(MouseButton::Right)),
                click(MouseEventKind::Moved),
            ],
            Instant::now(),
        );
        assert_eq!(out, vec![InputEvent::PointerDown { x: 605, y: 410 }]);
    }

    #[test]
    fn held_key_expires_without_repeats() {
        let mut mapper = InputMapper::new(false);
        let t0 = Instant::now();
        let out = run(&mut mapper, vec![press(KeyCode::Right)], t0);
        assert_eq!(out, vec![InputEvent::KeyDown(Key::Right)]);

        // a slow first repeat still lands inside the window
        let mut out = Vec::new();
        mapper.expire(t0 + Duration::from_millis(660), &mut out);
        assert!(out.is_empty());

        // auto-repeat keeps it alive without new KeyDowns
        let repeat_at = t0 + Duration::from_millis(660);
        let mut out = run(&mut mapper, vec![press(KeyCode::Right)], repeat_at);
        mapper.expire(t0 + Duration::from_millis(720), &mut out);
        assert!(out.is_empty());

        let mut out = Vec::new();
        mapper.expire(t0 + Duration::from_millis(780), &mut out);
        assert_eq!(out, vec![InputEvent::KeyUp(Key::Right)]);

        let later = t0 + Duration::from_secs(1);
        let out = run(&mut mapper, vec![press(KeyCode::Right)], later);
        assert_eq!(out, vec![InputEvent::KeyDown(Key::Right)]);
    }

    #[test]
    fn fire_is_never_held() {
        let mut mapper = InputMapper::new(false);
        let now = Instant::now();
        let fire = || press(KeyCode::Char(' '));
        let out = run(&mut mapper, vec![fire(), fire()], now);
        assert_eq!(out, vec![InputEvent::KeyDown(Key::Fire); 2]);
        let mut out = Vec::new();
        mapper.expire(now + FIRST_HOLD, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn closed_channel_quits_after_pending_input() {
        let (tx, rx) = mpsc::channel();
        tx.send(press(KeyCode::Left)).unwrap();
        drop(tx);

        let mut events = EventHandler::with_receiver(rx, true);
        assert_eq!(
            events.drain(&viewport()),
            vec![InputEvent::KeyDown(Key::Left), InputEvent::Quit]
        );
    }

    #[test]
    fn open_channel_drains_to_nothing() {
        let (_tx, rx) = mpsc::channel();
        let mut events = EventHandler::with_receiver(rx, true);
        assert!(events.drain(&viewport()).is_empty());
    }
}
