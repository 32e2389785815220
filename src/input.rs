//! Input source contract and key mapping.
//!
//! The core consumes an abstract stream of key codes: zero, one, or many
//! per poll. The crossterm-backed source lives here too, as does a scripted
//! queue used to drive game loops in tests.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

/// A discrete key the game understands. Deliberately small: the frontend
/// collapses terminal details (modifiers, repeats) down to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Space,
    Backspace,
    Char(char),
}

/// Yields key events. `poll` never blocks (real-time kernels drain it every
/// tick); `wait` blocks until a key arrives (turn-based screens).
pub trait InputSource {
    fn poll(&mut self) -> io::Result<Option<Key>>;
    fn wait(&mut self) -> io::Result<Key>;
}

/// Movement mapping shared by the dungeon screen and the minigames:
/// W/A/S/D or arrows. Returns (dx, dy).
pub fn movement_delta(key: Key) -> Option<(i32, i32)> {
    match key {
        Key::Up | Key::Char('w') | Key::Char('W') => Some((0, -1)),
        Key::Down | Key::Char('s') | Key::Char('S') => Some((0, 1)),
        Key::Left | Key::Char('a') | Key::Char('A') => Some((-1, 0)),
        Key::Right | Key::Char('d') | Key::Char('D') => Some((1, 0)),
        _ => None,
    }
}

/// True for the keys that back out of a screen.
pub fn is_cancel(key: Key) -> bool {
    matches!(key, Key::Esc | Key::Char('q') | Key::Char('Q'))
}

/// Crossterm-backed input. Key repeats surface as repeated presses, which
/// the archer kernel relies on to infer release.
#[derive(Debug, Default)]
pub struct CrosstermInput;

impl CrosstermInput {
    fn map(code: KeyCode) -> Option<Key> {
        match code {
            KeyCode::Up => Some(Key::Up),
            KeyCode::Down => Some(Key::Down),
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::Esc => Some(Key::Esc),
            KeyCode::Backspace => Some(Key::Backspace),
            KeyCode::Char(' ') => Some(Key::Space),
            KeyCode::Char(c) => Some(Key::Char(c)),
            _ => None,
        }
    }
}

impl InputSource for CrosstermInput {
    fn poll(&mut self) -> io::Result<Option<Key>> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if let Some(mapped) = Self::map(key.code) {
                    return Ok(Some(mapped));
                }
            }
        }
        Ok(None)
    }

    fn wait(&mut self) -> io::Result<Key> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if let Some(mapped) = Self::map(key.code) {
                    return Ok(mapped);
                }
            }
        }
    }
}

/// Scripted input for tests: pops keys from a queue. `wait` on an empty
/// queue is an error rather than a hang.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    queue: VecDeque<Key>,
}

impl ScriptedInput {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            queue: keys.into_iter().collect(),
        }
    }

    pub fn push(&mut self, key: Key) {
        self.queue.push_back(key);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> io::Result<Option<Key>> {
        Ok(self.queue.pop_front())
    }

    fn wait(&mut self) -> io::Result<Key> {
        self.queue.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "scripted input exhausted")
        })
    }
}
