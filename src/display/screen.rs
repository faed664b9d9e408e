use std::io::{IsTerminal, Write};

/// Where rendered frames go.
pub trait Screen: Send {
    fn present(&mut self, frame: &str) -> std::io::Result<()>;
}

/// Writes frames to stdout, repainting in place on a terminal and appending
/// with a blank separator when piped.
#[derive(Debug, Clone, Copy)]
pub struct TerminalScreen {
    repaint: bool,
}

impl TerminalScreen {
    pub fn new(repaint: bool) -> Self {
        Self { repaint }
    }

    pub fn detect() -> Self {
        Self::new(std::io::stdout().is_terminal())
    }
}

impl Screen for TerminalScreen {
    fn present(&mut self, frame: &str) -> std::io::Result<()> {
        let mut out = std::io::stdout().lock();
        if self.repaint {
            out.write_all(b"\x1b[2J\x1b[H")?;
        } else {
            out.write_all(b"\n")?;
        }
        out.write_all(frame.as_bytes())?;
        out.flush()
    }
}
