//! Character-offset spans carried on evidence rows and consumed by the
//! document annotator.
//!
//! All offsets are half-open `[start, end)` byte offsets into the article
//! text exactly as the extractor computed them. Offset correctness depends on
//! the spans having been computed against the same text the article stores;
//! the annotator tolerates out-of-range values but cannot repair a
//! whitespace-mismatched source.

use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` offset pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
  pub start: usize,
  pub end:   usize,
}

impl Span {
  pub fn new(start: usize, end: usize) -> Self { Self { start, end } }
}

impl From<(usize, usize)> for Span {
  fn from((start, end): (usize, usize)) -> Self { Self { start, end } }
}

/// The per-role character spans of one evidence row. Every role is optional:
/// older extractor output carries token indices only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharSpans {
  pub sentence:   Option<Span>,
  pub event:      Option<Span>,
  pub trigger:    Option<Span>,
  pub controller: Option<Span>,
  pub controlled: Option<Span>,
}

impl CharSpans {
  /// True when all four annotator roles are present; `sentence` is not
  /// required for document rendering.
  pub fn is_renderable(&self) -> bool {
    self.event.is_some()
      && self.trigger.is_some()
      && self.controller.is_some()
      && self.controlled.is_some()
  }
}

/// The four role spans of one mention, plus the owning interaction's
/// polarity — the unit the document annotator stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionSpans {
  pub event:      Span,
  pub trigger:    Span,
  pub controller: Span,
  pub controlled: Span,
  pub polarity:   bool,
}

impl MentionSpans {
  /// Assemble from stored evidence spans; `None` unless all four roles are
  /// present.
  pub fn from_char_spans(spans: &CharSpans, polarity: bool) -> Option<Self> {
    Some(Self {
      event: spans.event?,
      trigger: spans.trigger?,
      controller: spans.controller?,
      controlled: spans.controlled?,
      polarity,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renderable_requires_all_four_roles() {
    let mut spans = CharSpans {
      sentence:   None,
      event:      Some(Span::new(0, 10)),
      trigger:    Some(Span::new(2, 5)),
      controller: Some(Span::new(0, 2)),
      controlled: Some(Span::new(6, 10)),
    };
    assert!(spans.is_renderable());
    assert!(MentionSpans::from_char_spans(&spans, true).is_some());

    spans.trigger = None;
    assert!(!spans.is_renderable());
    assert!(MentionSpans::from_char_spans(&spans, true).is_none());
  }
}
