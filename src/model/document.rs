//! A shared, editable text document with a debounced highlight pipeline.
//!
//! A `Document` holds two buffers:
//! - `raw_lines`: the text as edited, mutated only by [`Document::edit`]
//! - `styled`: the highlighter's latest complete output, replaced wholesale by
//!   [`Document::refresh`]
//!
//! The styled buffer may lag the raw buffer. Readers always get a complete
//! result (an `Arc` swapped under a short-held mutex) and draw any line whose
//! styled text no longer matches the raw text as plain text.
//!
//! Edits arm a debounce timer; the event loop polls [`Document::take_due_refresh`]
//! and runs the refresh either inline or on the highlight worker thread.

use crate::model::event::{DocumentEvent, TextPosition};
use crate::primitives::highlighter::{Language, LexicalHighlighter, StyledLine};
use crate::services::debounce::{DebounceTimer, DEFAULT_EDIT_DEBOUNCE_MS, DEFAULT_INITIAL_DELAY_MS};
use parking_lot::{Mutex, RwLock};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Highlight scheduling for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightTiming {
    /// Quiet period after the last edit before re-highlighting
    pub edit_delay: Duration,
    /// Delay before the first highlight pass after creation
    pub initial_delay: Duration,
    /// When false the timer is never armed and text stays plain
    pub enabled: bool,
}

impl Default for HighlightTiming {
    fn default() -> Self {
        Self {
            edit_delay: Duration::from_millis(DEFAULT_EDIT_DEBOUNCE_MS),
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            enabled: true,
        }
    }
}

pub struct Document {
    path: PathBuf,
    raw_lines: RwLock<Vec<String>>,
    styled: Mutex<Arc<Vec<StyledLine>>>,
    /// Serialises refresh jobs
    refresh_lock: Mutex<()>,
    /// Detected on the first refresh, then fixed
    grammar: Mutex<Option<Language>>,
    timer: Mutex<DebounceTimer>,
    subscribers: Mutex<Vec<Sender<DocumentEvent>>>,
    version: AtomicU64,
    highlight_generation: AtomicU64,
    highlighter: LexicalHighlighter,
    timing: HighlightTiming,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("path", &self.path)
            .field("lines", &self.line_count())
            .field("version", &self.version())
            .finish_non_exhaustive()
    }
}

/// Split text into lines on `\n`, dropping a trailing `\r` from each.
/// Always yields at least one (possibly empty) line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
        .collect()
}

/// Byte offset of the `column`-th char, clamped to the end of the line
fn byte_index(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

impl Document {
    /// Create a document and schedule its first highlight pass
    pub fn new(
        path: impl Into<PathBuf>,
        text: &str,
        highlighter: LexicalHighlighter,
        timing: HighlightTiming,
        now: Instant,
    ) -> Self {
        let raw_lines = split_lines(text);
        let styled: Vec<StyledLine> = raw_lines.iter().map(StyledLine::plain).collect();
        let mut timer = DebounceTimer::new();
        if timing.enabled {
            timer.arm(now, timing.initial_delay);
        }
        Self {
            path: path.into(),
            raw_lines: RwLock::new(raw_lines),
            styled: Mutex::new(Arc::new(styled)),
            refresh_lock: Mutex::new(()),
            grammar: Mutex::new(None),
            timer: Mutex::new(timer),
            subscribers: Mutex::new(Vec::new()),
            version: AtomicU64::new(0),
            highlight_generation: AtomicU64::new(0),
            highlighter,
            timing,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name shown in tab labels
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Number of edits applied so far
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Number of completed highlight passes
    pub fn highlight_generation(&self) -> u64 {
        self.highlight_generation.load(Ordering::Acquire)
    }

    /// The cached grammar, once the first refresh has run
    pub fn grammar(&self) -> Option<Language> {
        *self.grammar.lock()
    }

    pub fn line_count(&self) -> usize {
        self.raw_lines.read().len()
    }

    /// Length of a line in chars (0 for lines past the end)
    pub fn line_len(&self, index: usize) -> usize {
        self.raw_lines
            .read()
            .get(index)
            .map(|l| l.chars().count())
            .unwrap_or(0)
    }

    pub fn lines(&self) -> Vec<String> {
        self.raw_lines.read().clone()
    }

    pub fn text(&self) -> String {
        self.raw_lines.read().join("\n")
    }

    /// Register a listener for content and highlight notifications
    pub fn subscribe(&self) -> Receiver<DocumentEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.lock().push(tx);
        rx
    }

    fn notify(&self, event: DocumentEvent) {
        // Views that were closed dropped their receiver
        self.subscribers.lock().retain(|tx| tx.send(event).is_ok());
    }

    /// Clamp a position to the current buffer
    pub fn clamp(&self, pos: TextPosition) -> TextPosition {
        let lines = self.raw_lines.read();
        clamp_in(&lines, pos)
    }

    /// Replace the text in `range` with `new_text` and schedule a refresh.
    ///
    /// Positions are clamped to the buffer and the range may be given in
    /// either order. Returns the position just after the inserted text.
    pub fn edit(&self, range: Range<TextPosition>, new_text: &str, now: Instant) -> TextPosition {
        let end_pos = {
            let mut lines = self.raw_lines.write();
            let (a, b) = (clamp_in(&lines, range.start), clamp_in(&lines, range.end));
            let (start, end) = if a <= b { (a, b) } else { (b, a) };

            let first = &lines[start.line];
            let prefix = first[..byte_index(first, start.column)].to_string();
            let last = &lines[end.line];
            let suffix = last[byte_index(last, end.column)..].to_string();

            let pieces = split_lines(new_text);
            let piece_count = pieces.len();
            let mut replacement = Vec::with_capacity(piece_count);
            let mut end_pos = start;
            for (i, piece) in pieces.into_iter().enumerate() {
                let mut line = if i == 0 { prefix.clone() } else { String::new() };
                line.push_str(&piece);
                if i + 1 == piece_count {
                    end_pos = TextPosition::new(start.line + i, line.chars().count());
                    line.push_str(&suffix);
                }
                replacement.push(line);
            }
            lines.splice(start.line..=end.line, replacement);
            end_pos
        };

        self.version.fetch_add(1, Ordering::AcqRel);
        if self.timing.enabled {
            self.timer.lock().arm(now, self.timing.edit_delay);
        }
        tracing::trace!(
            "edit applied to {}, refresh deferred {:?}",
            self.path.display(),
            self.timing.edit_delay
        );
        self.notify(DocumentEvent::ContentsChanged);
        end_pos
    }

    /// When the pending refresh becomes due, if one is pending
    pub fn refresh_deadline(&self) -> Option<Instant> {
        self.timer.lock().deadline()
    }

    /// Returns true (once) when the debounce deadline has passed
    pub fn take_due_refresh(&self, now: Instant) -> bool {
        self.timer.lock().take_due(now)
    }

    /// Re-highlight the whole document and publish the result.
    ///
    /// Safe to call from any thread. Concurrent calls run one after the other.
    pub fn refresh(&self) {
        let guard = self.refresh_lock.lock();

        let text = self.raw_lines.read().join("\n");
        // Only refresh writes the grammar, and refreshes are serialised
        let cached = *self.grammar.lock();
        let language = match cached {
            Some(language) => language,
            None => {
                let detected = self.highlighter.detect_grammar(&self.path, &text);
                *self.grammar.lock() = Some(detected);
                detected
            }
        };

        let mut styled = self.highlighter.highlight(&text, language);
        {
            // Lines added while tokenizing show up unstyled until the next pass
            let current = self.raw_lines.read();
            if styled.len() < current.len() {
                styled.extend(current[styled.len()..].iter().map(StyledLine::plain));
            }
        }

        *self.styled.lock() = Arc::new(styled);
        self.highlight_generation.fetch_add(1, Ordering::AcqRel);
        drop(guard);

        tracing::debug!(
            "highlighted {} as {}",
            self.path.display(),
            language.name()
        );
        self.notify(DocumentEvent::HighlightUpdated);
    }

    /// The latest complete highlight result
    pub fn styled_snapshot(&self) -> Arc<Vec<StyledLine>> {
        self.styled.lock().clone()
    }

    /// Lines ready for display: styled where the highlight result is current,
    /// plain where it is stale or missing.
    pub fn display_lines(&self, range: Range<usize>) -> Vec<StyledLine> {
        let styled = self.styled_snapshot();
        let lines = self.raw_lines.read();
        let end = range.end.min(lines.len());
        let start = range.start.min(end);
        (start..end)
            .map(|i| match styled.get(i) {
                Some(s) if s.matches(&lines[i]) => s.clone(),
                _ => StyledLine::plain(lines[i].as_str()),
            })
            .collect()
    }
}

fn clamp_in(lines: &[String], pos: TextPosition) -> TextPosition {
    let line = pos.line.min(lines.len().saturating_sub(1));
    let len = lines.get(line).map(|l| l.chars().count()).unwrap_or(0);
    TextPosition::new(line, pos.column.min(len))
}
