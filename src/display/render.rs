//! Pure rendering of a `ScanSession` into a text frame

use crate::core::styles::StyleRole;
use crate::session::{ScanSession, ScanStatus};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Inner width of the scanner panel in terminal columns.
pub const PANEL_WIDTH: usize = 44;

pub const TAGLINE: &str = "System Online // Ready to Scan";
pub const IDLE_HINT: &str = "Align QR Code within the frame";
pub const RESET_HINT: &str = "[Enter] SCAN NEXT TEAM";
pub const PENDING_VALUE: &str = "...";
pub const PENDING_MESSAGE: &str = "Processing...";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub title: String,
    pub terminal_id: String,
    pub color: bool,
}

const TERMINAL_ID_LEN: usize = 9;
const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Nine uppercase base36 characters (`0-9A-Z`) identifying this terminal.
pub fn terminal_id() -> String {
    base36_id(uuid::Uuid::new_v4().as_u128())
}

fn base36_id(mut value: u128) -> String {
    (0..TERMINAL_ID_LEN)
        .map(|_| {
            let digit = BASE36_DIGITS[(value % 36) as usize];
            value /= 36;
            char::from(digit)
        })
        .collect()
}

fn status_role(status: ScanStatus) -> StyleRole {
    match status {
        ScanStatus::Processing => StyleRole::Pending,
        ScanStatus::Success => StyleRole::Success,
        ScanStatus::Error => StyleRole::Failure,
        ScanStatus::Idle | ScanStatus::Scanning => StyleRole::Scanning,
    }
}

fn status_glyph(status: ScanStatus) -> Option<&'static str> {
    match status {
        ScanStatus::Processing => Some("↻"),
        ScanStatus::Success => Some("✔"),
        ScanStatus::Error => Some("✖"),
        ScanStatus::Idle | ScanStatus::Scanning => None,
    }
}

fn center(text: &str, width: usize) -> (String, String) {
    let gap = width.saturating_sub(text.width());
    let left = gap / 2;
    (" ".repeat(left), " ".repeat(gap - left))
}

/// Greedy word wrap by display width; words wider than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let sep = usize::from(!current.is_empty());
        if !current.is_empty() && current.width() + sep + word.width() > width {
            lines.push(std::mem::take(&mut current));
        }
        if word.width() > width {
            for ch in word.chars() {
                if !current.is_empty() && current.width() + ch.width().unwrap_or(0) > width {
                    lines.push(std::mem::take(&mut current));
                }
                current.push(ch);
            }
            continue;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

struct Frame {
    out: String,
    color: bool,
    bar_role: StyleRole,
}

impl Frame {
    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn centered(&mut self, text: &str, role: StyleRole) {
        let (left, right) = center(text, PANEL_WIDTH);
        let painted = role.paint(text, self.color);
        let edge = StyleRole::Dim.paint("│", self.color);
        self.line(&format!("{edge}{left}{painted}{right}{edge}"));
    }

    fn boxed(&mut self, text: &str, role: StyleRole) {
        for chunk in wrap(text, PANEL_WIDTH - 2) {
            self.centered(&chunk, role);
        }
    }

    fn blank(&mut self) {
        let edge = StyleRole::Dim.paint("│", self.color);
        self.line(&format!("{edge}{}{edge}", " ".repeat(PANEL_WIDTH)));
    }

    fn border(&mut self, left: &str, right: &str) {
        let rule = format!("{left}{}{right}", "─".repeat(PANEL_WIDTH));
        let painted = StyleRole::Dim.paint(&rule, self.color);
        self.line(&painted);
    }

    fn status_bar(&mut self) {
        let edge = StyleRole::Dim.paint("│", self.color);
        let bar = self.bar_role.paint(&"━".repeat(PANEL_WIDTH), self.color);
        self.line(&format!("{edge}{bar}{edge}"));
    }

    fn outside(&mut self, text: &str, role: StyleRole) {
        let (left, _) = center(text, PANEL_WIDTH + 2);
        let painted = role.paint(text, self.color);
        self.line(&format!("{left}{painted}"));
    }
}

/// Render the whole frame. Nothing here changes or derives state beyond
/// choosing what to display.
pub fn render(session: &ScanSession, options: &RenderOptions) -> String {
    let status = session.status();
    let mut frame = Frame {
        out: String::new(),
        color: options.color,
        bar_role: status_role(status),
    };

    frame.outside(&options.title, StyleRole::Title);
    frame.outside(TAGLINE, StyleRole::Dim);
    frame.line("");
    frame.border("┌", "┐");
    frame.status_bar();
    frame.blank();

    if status.is_idle() {
        frame.centered("▛                    ▜", StyleRole::Scanning);
        frame.centered("SCANNING", StyleRole::Scanning);
        frame.centered("▙                    ▟", StyleRole::Scanning);
        frame.blank();
        frame.boxed(IDLE_HINT, StyleRole::Dim);
    } else {
        let role = match status {
            ScanStatus::Success | ScanStatus::Error => status_role(status),
            _ => StyleRole::Pending,
        };
        if let Some(glyph) = status_glyph(status) {
            frame.boxed(glyph, status_role(status));
        }
        frame.boxed(
            session.scanned_value().unwrap_or(PENDING_VALUE),
            StyleRole::Value,
        );
        frame.boxed(session.message().unwrap_or(PENDING_MESSAGE), role);
        frame.blank();
        frame.boxed(RESET_HINT, StyleRole::Accent);
    }

    frame.blank();
    frame.border("└", "┘");
    frame.outside(
        &format!("ID: {} // SECURE_CONNECTION", options.terminal_id),
        StyleRole::Dim,
    );
    frame.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Outcome;

    fn options(color: bool) -> RenderOptions {
        RenderOptions {
            title: "CIRCUIT CRAFT 2K26".to_string(),
            terminal_id: "K3J9Q2ZX1".to_string(),
            color,
        }
    }

    fn settled(outcome: Outcome) -> ScanSession {
        let mut session = ScanSession::new();
        let detection = session.detect("TEAM-12").unwrap();
        session.begin_processing(detection.generation);
        session.complete(detection.generation, outcome);
        session
    }

    #[test]
    fn test_idle_frame_shows_viewport_and_hint_without_reset() {
        let frame = render(&ScanSession::new(), &options(false));
        assert!(frame.contains("CIRCUIT CRAFT 2K26"));
        assert!(frame.contains(TAGLINE));
        assert!(frame.contains("SCANNING"));
        assert!(frame.contains(IDLE_HINT));
        assert!(!frame.contains(RESET_HINT));
        assert!(frame.contains("ID: K3J9Q2ZX1 // SECURE_CONNECTION"));
    }

    #[test]
    fn test_processing_frame_shows_placeholder_message() {
        let mut session = ScanSession::new();
        session.detect("TEAM-12");
        session.begin_processing(0);

        let frame = render(&session, &options(false));
        assert!(frame.contains("↻"));
        assert!(frame.contains("TEAM-12"));
        assert!(frame.contains(PENDING_MESSAGE));
        assert!(frame.contains(RESET_HINT));
        assert!(!frame.contains(IDLE_HINT));
    }

    #[test]
    fn test_settled_frames_carry_glyph_and_message() {
        let ok = render(
            &settled(Outcome::success("Team TEAM-12 Marked Present!")),
            &options(false),
        );
        assert!(ok.contains("✔"));
        assert!(ok.contains("Team TEAM-12 Marked Present!"));

        let failed = render(&settled(Outcome::failure("Network Error.")), &options(false));
        assert!(failed.contains("✖"));
        assert!(failed.contains("Network Error."));
        assert!(!failed.contains("✔"));
    }

    #[test]
    fn test_plain_frame_has_no_escape_codes() {
        let frame = render(&settled(Outcome::success("ok")), &options(false));
        assert!(!frame.contains('\x1b'));
    }

    #[test]
    fn test_status_bar_colour_follows_status() {
        let failed = render(&settled(Outcome::failure("Error: nope")), &options(true));
        let bar = StyleRole::Failure.paint(&"━".repeat(PANEL_WIDTH), true);
        assert!(failed.contains(&bar));

        let idle = render(&ScanSession::new(), &options(true));
        let bar = StyleRole::Scanning.paint(&"━".repeat(PANEL_WIDTH), true);
        assert!(idle.contains(&bar));
    }

    #[test]
    fn test_panel_lines_have_constant_width() {
        let session = settled(Outcome::failure(
            "Error: the attendance sheet rejected this request because the team could not be found",
        ));
        let frame = render(&session, &options(false));
        for line in frame.lines().filter(|l| l.starts_with('│')) {
            assert_eq!(line.width(), PANEL_WIDTH + 2, "line {:?}", line);
        }
    }

    #[test]
    fn test_wrap_splits_on_words_and_long_tokens() {
        assert_eq!(wrap("alpha beta gamma", 11), vec!["alpha beta", "gamma"]);
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("", 10), vec![""]);
    }

    #[test]
    fn test_terminal_id_shape() {
        let id = terminal_id();
        assert_eq!(id.len(), 9);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_base36_id_uses_full_alphabet() {
        assert_eq!(base36_id(0), "000000000");
        assert_eq!(base36_id(35), "Z00000000");
        assert_eq!(base36_id(36 * 17 + 10), "AH0000000");
        assert_eq!(base36_id(u128::MAX).len(), 9);
    }
}
