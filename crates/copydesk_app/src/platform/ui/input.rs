use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use copydesk_core::{Intent, Quadrant, Variant};

/// Lines from stdin, read on a background thread so the session can keep
/// processing engine events while waiting for the user.
pub struct LineInput {
    rx: Receiver<String>,
    closed: bool,
}

impl LineInput {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self { rx, closed: false }
    }

    /// Prints `prompt` and blocks for the next line. `None` once stdin is closed.
    pub fn prompt(&mut self, prompt: &str) -> Option<String> {
        print!("{prompt}");
        let _ = io::stdout().flush();
        match self.rx.recv() {
            Ok(line) => Some(line.trim().to_string()),
            Err(_) => {
                self.closed = true;
                None
            }
        }
    }

    pub fn try_line(&mut self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(line) => Some(line.trim().to_string()),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Single-key commands understood while a job is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchKey {
    TogglePolling,
    RefreshResult,
    Download(Variant),
    Reconfigure,
    ListJobs,
    OpenJob(usize),
    Quit,
}

pub const WATCH_HELP: &str = concat!(
    "keys: p pause/resume | r refresh result | a/b save variant | ",
    "c reconfigure | l jobs | o N open job | q quit"
);

impl WatchKey {
    pub fn parse(line: &str) -> Option<WatchKey> {
        let line = line.trim();
        let key = match line.to_ascii_lowercase().as_str() {
            "p" => WatchKey::TogglePolling,
            "r" => WatchKey::RefreshResult,
            "a" => WatchKey::Download(Variant::A),
            "b" => WatchKey::Download(Variant::B),
            "c" => WatchKey::Reconfigure,
            "l" => WatchKey::ListJobs,
            "q" => WatchKey::Quit,
            other => {
                let index = other.strip_prefix('o')?.trim().parse::<usize>().ok()?;
                WatchKey::OpenJob(index.checked_sub(1)?)
            }
        };
        Some(key)
    }
}

/// Parses `2.3` into the third candidate of the second quadrant.
pub fn parse_candidate(line: &str) -> Option<(Quadrant, usize)> {
    let (q, i) = line.trim().split_once('.')?;
    let q = q.trim().parse::<usize>().ok()?.checked_sub(1)?;
    let i = i.trim().parse::<usize>().ok()?.checked_sub(1)?;
    Quadrant::ALL.get(q).map(|quadrant| (*quadrant, i))
}

/// 1-based position into `len` items.
pub fn parse_index(line: &str, len: usize) -> Option<usize> {
    let index = line.trim().parse::<usize>().ok()?.checked_sub(1)?;
    (index < len).then_some(index)
}

/// Intent by list number or by key.
pub fn parse_intent(line: &str) -> Option<Intent> {
    if let Some(index) = parse_index(line, Intent::ALL.len()) {
        return Some(Intent::ALL[index]);
    }
    line.parse().ok()
}

/// Comma or whitespace separated intents; unknown entries are reported back.
pub fn parse_intent_list(line: &str) -> (Vec<Intent>, Vec<String>) {
    let mut intents = Vec::new();
    let mut unknown = Vec::new();
    for token in line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        match parse_intent(token) {
            Some(intent) if !intents.contains(&intent) => intents.push(intent),
            Some(_) => {}
            None => unknown.push(token.to_string()),
        }
    }
    (intents, unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn watch_keys() {
        assert_eq!(WatchKey::parse("p"), Some(WatchKey::TogglePolling));
        assert_eq!(WatchKey::parse(" R "), Some(WatchKey::RefreshResult));
        assert_eq!(WatchKey::parse("b"), Some(WatchKey::Download(Variant::B)));
        assert_eq!(WatchKey::parse("o 2"), Some(WatchKey::OpenJob(1)));
        assert_eq!(WatchKey::parse("o0"), None);
        assert_eq!(WatchKey::parse("x"), None);
    }

    #[test]
    fn candidates_are_one_based() {
        assert_eq!(parse_candidate("2.3"), Some((Quadrant::Emotion, 2)));
        assert_eq!(parse_candidate("5.1"), None);
        assert_eq!(parse_candidate("0.1"), None);
        assert_eq!(parse_candidate("my own title"), None);
    }

    #[test]
    fn intents_by_number_or_key() {
        assert_eq!(parse_intent("4"), Some(Intent::Howto));
        assert_eq!(parse_intent("Decision"), Some(Intent::Decision));
        assert_eq!(parse_intent("9"), None);

        let (intents, unknown) = parse_intent_list("decision, mechanism decision nope");
        assert_eq!(intents, vec![Intent::Decision, Intent::Mechanism]);
        assert_eq!(unknown, vec!["nope".to_string()]);
    }
}
