use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollMode {
    /// Wait at most this long; the round's tick clock.
    Timeout(Duration),
    /// Wait until a key arrives; pauses and menus.
    Blocking,
}

/// Where key presses come from.
pub trait InputSource {
    fn poll_key(&mut self, mode: PollMode) -> io::Result<Option<KeyEvent>>;

    /// Keeps a timed banner on screen.
    fn idle(&mut self, duration: Duration) {
        thread::sleep(duration);
    }

    /// Drops keys typed while nobody was listening.
    fn discard_pending(&mut self) -> io::Result<()>;
}

/// Raw terminal events, before they are narrowed down to key presses.
trait EventQueue {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
}

struct CrosstermEvents;

impl EventQueue for CrosstermEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        event::read()
    }
}

/// Waits for the next key press. Resizes, focus changes and key releases
/// are skipped without ending a timed wait early.
fn next_key(queue: &mut impl EventQueue, mode: PollMode) -> io::Result<Option<KeyEvent>> {
    match mode {
        PollMode::Timeout(timeout) => {
            let deadline = Instant::now() + timeout;
            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if !queue.poll(remaining)? {
                    return Ok(None);
                }
                if let Some(key) = key_press(queue.read()?) {
                    return Ok(Some(key));
                }
            }
        }
        PollMode::Blocking => loop {
            if let Some(key) = key_press(queue.read()?) {
                return Ok(Some(key));
            }
        },
    }
}

/// Reads keys from the crossterm event queue.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn poll_key(&mut self, mode: PollMode) -> io::Result<Option<KeyEvent>> {
        next_key(&mut CrosstermEvents, mode)
    }

    fn discard_pending(&mut self) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            event::read()?;
        }
        Ok(())
    }
}

/// Ctrl+C, which raw mode no longer turns into a signal.
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

fn key_press(event: Event) -> Option<KeyEvent> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => Some(key),
        _ => None,
    }
}
