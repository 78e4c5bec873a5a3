use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use netsweep_core::scanner::CancelToken;
use tracing::warn;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

static RAW_MODE: AtomicBool = AtomicBool::new(false);

/// Raw mode suppresses the carriage return the terminal normally adds.
pub fn line_ending() -> &'static str {
    if RAW_MODE.load(Ordering::Relaxed) { "\r\n" } else { "\n" }
}

/// Listens for 'q' or Ctrl-C and cancels the scan when one is pressed.
pub struct InputHandle {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputHandle {
    pub fn new() -> Self {
        Self {
            stop: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    pub fn start(&mut self, cancel: CancelToken) {
        if self.handle.is_some() {
            return;
        }
        let stop = Arc::clone(&self.stop);

        self.handle = Some(thread::spawn(move || {
            if let Err(e) = enable_raw_mode() {
                warn!("Key listener disabled: {e}");
                return;
            }
            RAW_MODE.store(true, Ordering::Relaxed);

            while !stop.load(Ordering::Relaxed) {
                match event::poll(POLL_INTERVAL) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(_) => break,
                }
                if let Ok(Event::Key(key_event)) = event::read() {
                    let is_q = key_event.code == KeyCode::Char('q');
                    let is_ctrl_c = key_event.code == KeyCode::Char('c')
                        && key_event.modifiers.contains(KeyModifiers::CONTROL);

                    if (is_q || is_ctrl_c) && key_event.kind == KeyEventKind::Press {
                        cancel.cancel();
                        break;
                    }
                }
            }

            restore_terminal();
        }));
    }
}

/// Leaves raw mode if the key listener had entered it.
pub fn restore_terminal() {
    if RAW_MODE.swap(false, Ordering::Relaxed) {
        let _ = disable_raw_mode();
    }
}

impl Drop for InputHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        restore_terminal();
    }
}
