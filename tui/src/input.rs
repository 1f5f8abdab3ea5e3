//! Input handling for the phonebook TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

use phonebook_engine::{App, Focus, sanitize_display_text};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and hands them to the UI loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = Arc::clone(&stop);

        let join = tokio::task::spawn_blocking(move || input_loop(&stop2, &tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Unblock the reader if it is waiting on channel capacity.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(SHUTDOWN_TIMEOUT, join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop; never block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: &AtomicBool, tx: &mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    // Backpressure instead of dropping keys.
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain pending terminal events into the app. Returns `true` when anything
/// changed and the screen should be redrawn.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut changed = false;
    for _ in 0..MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };
        changed |= apply_event(app, ev);
        if app.should_quit() {
            break;
        }
    }
    Ok(changed)
}

fn apply_event(app: &mut App, ev: Event) -> bool {
    match ev {
        Event::Key(key) => handle_key(app, key),
        Event::Paste(text) => {
            if app.active_modal().is_some() {
                return false;
            }
            match app.focused_input_mut() {
                Some(input) => {
                    input.enter_text(&sanitize_display_text(&text));
                    true
                }
                None => false,
            }
        }
        Event::Resize(..) => true,
        _ => false,
    }
}

/// Apply one key press. Returns `true` if it was handled.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        debug!("Quit requested");
        app.request_quit();
        return true;
    }

    if let Some(modal) = app.active_modal() {
        let is_confirm = modal.is_confirm();
        return handle_modal_key(app, key, is_confirm);
    }

    match key.code {
        KeyCode::Tab => {
            app.focus_next();
            return true;
        }
        KeyCode::BackTab => {
            app.focus_prev();
            return true;
        }
        _ => {}
    }

    if app.focus() == Focus::List {
        handle_list_key(app, key)
    } else {
        handle_text_key(app, key)
    }
}

fn handle_modal_key(app: &mut App, key: KeyEvent, is_confirm: bool) -> bool {
    let answer = if is_confirm {
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(true),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(false),
            _ => None,
        }
    } else {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(false),
            _ => None,
        }
    };

    match answer {
        Some(accepted) => {
            app.answer_modal(accepted);
            true
        }
        None => false,
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Char('d') | KeyCode::Delete => app.remove_selected(),
        KeyCode::Char('r') => app.load_all(),
        KeyCode::Char('q') | KeyCode::Esc => app.request_quit(),
        _ => return false,
    }
    true
}

fn handle_text_key(app: &mut App, key: KeyEvent) -> bool {
    let focus = app.focus();
    match key.code {
        KeyCode::Enter => {
            match focus {
                Focus::Name | Focus::Number => {
                    app.submit();
                    app.set_focus(Focus::Name);
                }
                Focus::Filter | Focus::List => app.set_focus(Focus::List),
            }
            return true;
        }
        KeyCode::Esc => {
            app.set_focus(Focus::List);
            return true;
        }
        _ => {}
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let Some(input) = app.focused_input_mut() else {
        return false;
    };
    match key.code {
        KeyCode::Char('w') if ctrl => input.delete_word_backwards(),
        KeyCode::Char('u') if ctrl => input.clear(),
        KeyCode::Char('a') if ctrl => input.move_cursor_home(),
        KeyCode::Char('e') if ctrl => input.move_cursor_end(),
        KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => return false,
        KeyCode::Char(c) => input.enter_char(c),
        KeyCode::Backspace => input.delete_char(),
        KeyCode::Delete => input.delete_char_forward(),
        KeyCode::Left => input.move_cursor_left(),
        KeyCode::Right => input.move_cursor_right(),
        KeyCode::Home => input.move_cursor_home(),
        KeyCode::End => input.move_cursor_end(),
        _ => return false,
    }
    true
}
