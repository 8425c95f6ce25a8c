// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::InlineVec;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use smallvec::smallvec;

/// The input vocabulary of the [`crate::LineEditor`]. Produced from crossterm events by
/// [`convert_crossterm_event()`], or from raw terminal bytes by [`RawKeystrokeDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// A typed character. Anything that isn't printable ASCII is rejected by the buffer.
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Tab,
    Enter,
    /// Ctrl+C.
    Interrupt,
    /// Ctrl+D.
    Eof,
    /// The viewport is now this many columns wide.
    Resize(u16),
    /// Control keys and sequences with no editing meaning.
    Ignored,
}

/// Map a crossterm [`Event`] to an [`EditorEvent`]. Key releases are ignored.
#[must_use]
pub fn convert_crossterm_event(event: Event) -> EditorEvent {
    match event {
        // Control keys, with or without Shift.
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press | KeyEventKind::Repeat,
            ..
        }) if modifiers.contains(KeyModifiers::CONTROL)
            && !modifiers.contains(KeyModifiers::ALT) =>
        {
            match code {
                KeyCode::Char(ch) => match ch.to_ascii_lowercase() {
                    'c' => EditorEvent::Interrupt,
                    'd' => EditorEvent::Eof,
                    'a' => EditorEvent::Home,
                    'e' => EditorEvent::End,
                    _ => EditorEvent::Ignored,
                },
                _ => EditorEvent::Ignored,
            }
        }
        // Other modifiers (None, Shift, Control+Alt). Control+Alt is used to reach
        // certain symbols on international keyboard layouts.
        Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press | KeyEventKind::Repeat,
            ..
        }) => match code {
            KeyCode::Enter => EditorEvent::Enter,
            KeyCode::Tab => EditorEvent::Tab,
            KeyCode::Backspace => EditorEvent::Backspace,
            KeyCode::Delete => EditorEvent::Delete,
            KeyCode::Left => EditorEvent::Left,
            KeyCode::Right => EditorEvent::Right,
            KeyCode::Home => EditorEvent::Home,
            KeyCode::End => EditorEvent::End,
            KeyCode::Char(ch) => EditorEvent::Char(ch),
            _ => EditorEvent::Ignored,
        },
        Event::Resize(columns, _rows) => EditorEvent::Resize(columns),
        _ => EditorEvent::Ignored,
    }
}

/// Decodes the raw character stream a web style terminal delivers from its data
/// callback (xterm conventions). Escape sequences may be split across chunks, so the
/// decoder keeps the partial sequence between calls to [`Self::decode()`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawKeystrokeDecoder {
    state: DecoderState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum DecoderState {
    #[default]
    Ground,
    /// Saw `ESC`.
    Escape,
    /// Saw `ESC [` plus any parameter bytes.
    Csi(String),
    /// Saw `ESC O`.
    Ss3,
}

const ESC: char = '\x1b';

impl RawKeystrokeDecoder {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn decode(&mut self, data: &str) -> InlineVec<EditorEvent> {
        let mut events = smallvec![];
        for ch in data.chars() {
            if let Some(event) = self.decode_char(ch) {
                events.push(event);
            }
        }
        events
    }

    fn decode_char(&mut self, ch: char) -> Option<EditorEvent> {
        match std::mem::take(&mut self.state) {
            DecoderState::Ground => match ch {
                ESC => {
                    self.state = DecoderState::Escape;
                    None
                }
                '\r' | '\n' => Some(EditorEvent::Enter),
                '\t' => Some(EditorEvent::Tab),
                '\x03' => Some(EditorEvent::Interrupt),
                '\x04' => Some(EditorEvent::Eof),
                '\x7f' | '\x08' => Some(EditorEvent::Backspace),
                ch if ch.is_control() => Some(EditorEvent::Ignored),
                ch => Some(EditorEvent::Char(ch)),
            },
            DecoderState::Escape => match ch {
                '[' => {
                    self.state = DecoderState::Csi(String::new());
                    None
                }
                'O' => {
                    self.state = DecoderState::Ss3;
                    None
                }
                // Alt+key, or a lone escape followed by a key.
                _ => Some(EditorEvent::Ignored),
            },
            DecoderState::Csi(mut params) => {
                if ch.is_ascii_digit() || ch == ';' {
                    params.push(ch);
                    self.state = DecoderState::Csi(params);
                    return None;
                }
                Some(match (params.as_str(), ch) {
                    (_, 'C') => EditorEvent::Right,
                    (_, 'D') => EditorEvent::Left,
                    (_, 'H') | ("1" | "7", '~') => EditorEvent::Home,
                    (_, 'F') | ("4" | "8", '~') => EditorEvent::End,
                    ("3", '~') => EditorEvent::Delete,
                    _ => EditorEvent::Ignored,
                })
            }
            DecoderState::Ss3 => Some(match ch {
                'C' => EditorEvent::Right,
                'D' => EditorEvent::Left,
                'H' => EditorEvent::Home,
                'F' => EditorEvent::End,
                _ => EditorEvent::Ignored,
            }),
        }
    }
}
