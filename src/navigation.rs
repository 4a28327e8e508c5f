use std::ops::Range;

use crate::config::NavigationConfig;
use crate::models::{Chapter, Word};

/// Pointer position over a track as a fraction in `[0, 1]`.
pub fn track_fraction(x: f64, left: f64, width: f64) -> f64 {
    if width <= 0.0 || !x.is_finite() {
        return 0.0;
    }
    ((x - left) / width).clamp(0.0, 1.0)
}

pub fn index_from_fraction(fraction: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    ((fraction * len as f64).floor() as usize).min(len - 1)
}

pub fn fraction_from_index(index: usize, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    index.min(len) as f64 / len as f64
}

/// Truncated "current %" label, measured against the last word so it ends at 100.
pub fn display_percent(index: usize, len: usize) -> u32 {
    if len < 2 {
        return 0;
    }
    let last = len - 1;
    (index.min(last) * 100 / last) as u32
}

pub fn step(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.saturating_add_signed(delta).min(len - 1)
}

/// Words within `radius` of `center`, clipped to the document.
pub fn context_range(len: usize, center: usize, radius: usize) -> Range<usize> {
    if len == 0 {
        return 0..0;
    }
    let center = center.min(len - 1);
    center.saturating_sub(radius)..(center + radius + 1).min(len)
}

pub fn context_snippet(words: &[Word], center: usize, radius: usize) -> String {
    words[context_range(words.len(), center, radius)]
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sub-range of `percent`% of the document centered on `center`, shifted to stay inside it.
pub fn expanded_window(center: usize, len: usize, percent: u8) -> Range<usize> {
    if len == 0 {
        return 0..0;
    }
    let width = (len * usize::from(percent.min(100)) / 100).max(1);
    let start = center
        .min(len - 1)
        .saturating_sub(width / 2)
        .min(len - width);
    start..start + width
}

/// Index of the chapter containing `index`: the last one whose start is at or before it.
pub fn current_chapter(chapters: &[Chapter], index: usize) -> Option<usize> {
    chapters.iter().rposition(|c| c.start <= index)
}

pub fn next_chapter_start(chapters: &[Chapter], index: usize) -> Option<usize> {
    chapters.iter().map(|c| c.start).find(|&start| start > index)
}

/// Start of the current chapter when inside it, otherwise of the one before.
pub fn prev_chapter_start(chapters: &[Chapter], index: usize) -> Option<usize> {
    chapters
        .iter()
        .rev()
        .map(|c| c.start)
        .find(|&start| start < index)
}

/// User input against the progress track and its keyboard equivalents.
///
/// Pointer positions are fractions of the track width (see [`track_fraction`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Hover(f64),
    Press(f64),
    Drag(f64),
    Release(f64),
    /// Pointer pressed somewhere other than the track.
    Outside,
    Leave,
    Step(isize),
    Percent(u8),
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubOutcome {
    Ignored,
    Preview(usize),
    Commit(usize),
    Collapsed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScrubMode {
    Collapsed,
    Pressed { since_ms: u64 },
    Expanded { window: Range<usize>, pressed: bool },
}

/// Progress-track state: the preview candidate plus the press/hold/expand cycle.
///
/// The committed index lives with the session; this type only proposes it.
#[derive(Debug, Clone)]
pub struct Scrubber {
    mode: ScrubMode,
    preview: Option<usize>,
    hold_delay_ms: u64,
    window_percent: u8,
}

impl Scrubber {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            mode: ScrubMode::Collapsed,
            preview: None,
            hold_delay_ms: config.hold_delay_ms,
            window_percent: config.expanded_window_percent,
        }
    }

    pub fn preview(&self) -> Option<usize> {
        self.preview
    }

    pub fn expanded_window(&self) -> Option<Range<usize>> {
        match &self.mode {
            ScrubMode::Expanded { window, .. } => Some(window.clone()),
            _ => None,
        }
    }

    pub fn is_pressed(&self) -> bool {
        matches!(
            self.mode,
            ScrubMode::Pressed { .. } | ScrubMode::Expanded { pressed: true, .. }
        )
    }

    /// Time left before a held press expands, if a press is pending.
    pub fn hold_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        match self.mode {
            ScrubMode::Pressed { since_ms } => {
                Some((since_ms + self.hold_delay_ms).saturating_sub(now_ms))
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.mode = ScrubMode::Collapsed;
        self.preview = None;
    }

    fn pointer_index(&self, fraction: f64, len: usize) -> usize {
        match &self.mode {
            ScrubMode::Expanded { window, .. } => {
                window.start + index_from_fraction(fraction, window.len())
            }
            _ => index_from_fraction(fraction, len),
        }
    }

    fn propose(&mut self, index: usize) -> ScrubOutcome {
        self.preview = Some(index);
        ScrubOutcome::Preview(index)
    }

    /// Expands a press held past the hold delay. Returns true when it expanded.
    pub fn poll_hold(&mut self, len: usize, now_ms: u64) -> bool {
        let ScrubMode::Pressed { since_ms } = self.mode else {
            return false;
        };
        if len == 0 || now_ms < since_ms + self.hold_delay_ms {
            return false;
        }
        let center = self.preview.unwrap_or(0);
        self.mode = ScrubMode::Expanded {
            window: expanded_window(center, len, self.window_percent),
            pressed: true,
        };
        true
    }

    pub fn handle(
        &mut self,
        gesture: Gesture,
        committed: usize,
        len: usize,
        now_ms: u64,
    ) -> ScrubOutcome {
        if len == 0 {
            self.reset();
            return ScrubOutcome::Ignored;
        }

        match gesture {
            Gesture::Hover(fraction) => {
                let index = self.pointer_index(fraction, len);
                self.propose(index)
            }
            Gesture::Press(fraction) => {
                match &mut self.mode {
                    ScrubMode::Expanded { pressed, .. } => *pressed = true,
                    _ => self.mode = ScrubMode::Pressed { since_ms: now_ms },
                }
                let index = self.pointer_index(fraction, len);
                self.propose(index)
            }
            Gesture::Drag(fraction) => {
                if !self.is_pressed() {
                    return ScrubOutcome::Ignored;
                }
                let index = self.pointer_index(fraction, len);
                self.propose(index)
            }
            Gesture::Release(fraction) => match self.mode.clone() {
                ScrubMode::Pressed { .. } => {
                    let index = self.pointer_index(fraction, len);
                    self.reset();
                    ScrubOutcome::Commit(index)
                }
                ScrubMode::Expanded { window, .. } => {
                    let index = self
                        .preview
                        .unwrap_or_else(|| self.pointer_index(fraction, len));
                    self.mode = ScrubMode::Expanded {
                        window,
                        pressed: false,
                    };
                    self.preview = None;
                    ScrubOutcome::Commit(index)
                }
                ScrubMode::Collapsed => ScrubOutcome::Ignored,
            },
            Gesture::Outside => match self.mode {
                ScrubMode::Collapsed => ScrubOutcome::Ignored,
                _ => {
                    self.reset();
                    ScrubOutcome::Collapsed
                }
            },
            Gesture::Leave => {
                if matches!(self.mode, ScrubMode::Collapsed) {
                    self.preview = None;
                }
                ScrubOutcome::Ignored
            }
            Gesture::Step(delta) => {
                let base = self.preview.unwrap_or(committed);
                self.propose(step(base, delta, len))
            }
            Gesture::Percent(percent) => {
                let fraction = f64::from(percent.min(100)) / 100.0;
                self.propose(index_from_fraction(fraction, len))
            }
            Gesture::Confirm => match self.preview.take() {
                Some(index) => {
                    self.mode = ScrubMode::Collapsed;
                    ScrubOutcome::Commit(index.min(len - 1))
                }
                None => ScrubOutcome::Ignored,
            },
            Gesture::Cancel => {
                let was_open = self.preview.is_some() || self.mode != ScrubMode::Collapsed;
                self.reset();
                if was_open {
                    ScrubOutcome::Collapsed
                } else {
                    ScrubOutcome::Ignored
                }
            }
        }
    }
}
