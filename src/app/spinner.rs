//! Braille spinner shown on stderr while a submission is in flight

use std::io::Write;
use tokio::sync::oneshot;
use tokio::time::{interval, Duration};

const BRAILLE_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Only animate on an interactive stderr that is not also carrying info logs.
pub fn should_show_spinner() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr()) && !log::log_enabled!(log::Level::Info)
}

pub struct ProgressSpinner {
    frame_index: usize,
}

impl Default for ProgressSpinner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSpinner {
    pub fn new() -> Self {
        Self { frame_index: 0 }
    }

    pub fn current_frame(&self) -> char {
        BRAILLE_FRAMES[self.frame_index]
    }

    pub fn tick(&mut self) {
        let frame = self.current_frame();
        self.frame_index = (self.frame_index + 1) % BRAILLE_FRAMES.len();

        eprint!("\r{frame} Submitting...");
        let _ = std::io::stderr().flush();
    }

    pub fn finish(&self) {
        eprint!("\r{}\r", " ".repeat(16));
        let _ = std::io::stderr().flush();
    }
}

/// Animate at 10Hz until `stop_rx` fires or its sender is dropped.
pub async fn run_spinner(mut stop_rx: oneshot::Receiver<()>) {
    let mut spinner = ProgressSpinner::new();
    let mut update_interval = interval(Duration::from_millis(100));

    loop {
        tokio::select! {
            _ = &mut stop_rx => {
                spinner.finish();
                return;
            }
            _ = update_interval.tick() => {
                spinner.tick();
            }
        }
    }
}
