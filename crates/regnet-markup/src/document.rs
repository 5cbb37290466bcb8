//! Document-level span stacking — the interval sweep that renders one
//! article's full text with every mention's spans as nested tags.
//!
//! This is the most delicate routine in the system: offsets are trusted to
//! have been computed against exactly the text being rendered, literal text
//! chunks are emitted unescaped, and closing tags carry no role identity.
//! The design assumes non-crossing, well-nested input; crossing spans yield
//! mismatched but non-crashing output.

use regnet_core::span::MentionSpans;

// ─── Sweep points ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Role {
  Event,
  Trigger,
  Argument,
}

struct Point {
  offset:   usize,
  /// Close = 0, open = 1. At equal offsets a close is emitted before an
  /// open, so an annotation ending where the next begins never swallows it.
  priority: u8,
  /// Role of an opening tag; `None` on closes — tags are closed in the
  /// reverse order they were opened, so the role is not needed again.
  open:     Option<Role>,
}

impl Point {
  fn open(offset: usize, role: Role) -> Self {
    Self { offset, priority: 1, open: Some(role) }
  }

  fn close(offset: usize) -> Self {
    Self { offset, priority: 0, open: None }
  }
}

// ─── Rendering ────────────────────────────────────────────────────────────────

/// Render `text` with every mention's four role spans stacked into nested
/// `<span>` tags. Literal text is preserved verbatim between tag boundaries
/// (no escaping); newlines become `<br>` for HTML-safe display.
pub fn annotate_document(text: &str, mentions: &[MentionSpans]) -> String {
  let mut points: Vec<Point> = Vec::with_capacity(mentions.len() * 8);
  for m in mentions {
    // Event pushed first / closed last so the stable sort keeps it outermost
    // at shared offsets.
    points.push(Point::open(m.event.start, Role::Event));
    points.push(Point::open(m.controller.start, Role::Argument));
    points.push(Point::close(m.controller.end));
    points.push(Point::open(m.trigger.start, Role::Trigger));
    points.push(Point::close(m.trigger.end));
    points.push(Point::open(m.controlled.start, Role::Argument));
    points.push(Point::close(m.controlled.end));
    points.push(Point::close(m.event.end));
  }
  points.sort_by_key(|p| (p.offset, p.priority));

  let mut out = String::with_capacity(text.len() + points.len() * 32);
  let mut current = 0usize;
  for point in &points {
    let offset = clamp_to_boundary(text, point.offset);
    if current < offset {
      out.push_str(&text[current..offset]);
      current = offset;
    }
    match point.open {
      Some(Role::Event) => out.push_str(r#"<span class="event selected_evidence">"#),
      Some(Role::Trigger) => out.push_str(r#"<span class="argument trigger">"#),
      Some(Role::Argument) => out.push_str(r#"<span class="argument">"#),
      None => out.push_str("</span>"),
    }
  }
  out.push_str(&text[current..]);

  out.replace('\n', "<br>")
}

/// Clamp an offset into `text`: past-the-end offsets stop at the end, and an
/// offset inside a multi-byte code point moves back to the previous char
/// boundary so a malformed span can never split the text mid-character.
fn clamp_to_boundary(text: &str, offset: usize) -> usize {
  let mut offset = offset.min(text.len());
  while !text.is_char_boundary(offset) {
    offset -= 1;
  }
  offset
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use regnet_core::span::Span;

  use super::*;

  fn mention(
    event: (usize, usize),
    controller: (usize, usize),
    trigger: (usize, usize),
    controlled: (usize, usize),
  ) -> MentionSpans {
    MentionSpans {
      event:      event.into(),
      trigger:    trigger.into(),
      controller: controller.into(),
      controlled: controlled.into(),
      polarity:   true,
    }
  }

  /// Total length of the literal (non-tag) text in rendered output.
  fn literal_len(rendered: &str) -> usize {
    let mut len = 0;
    let mut in_tag = false;
    for c in rendered.chars() {
      match c {
        '<' => in_tag = true,
        '>' => in_tag = false,
        _ if !in_tag => len += c.len_utf8(),
        _ => {}
      }
    }
    len
  }

  #[test]
  fn single_mention_sweep() {
    let text = "AB activates CD";
    let rendered = annotate_document(
      text,
      &[mention((0, 15), (0, 2), (3, 12), (13, 15))],
    );

    assert_eq!(
      rendered,
      "<span class=\"event selected_evidence\">\
       <span class=\"argument\">AB</span> \
       <span class=\"argument trigger\">activates</span> \
       <span class=\"argument\">CD</span>\
       </span>"
    );
    assert_eq!(rendered.matches("<span").count(), 4);
    assert_eq!(rendered.matches("</span>").count(), 4);
    assert_eq!(literal_len(&rendered), text.len());
  }

  #[test]
  fn close_sorts_before_open_at_shared_offset() {
    // First mention ends exactly where the second begins.
    let text = "AB CD";
    let rendered = annotate_document(
      text,
      &[
        mention((0, 2), (0, 1), (1, 2), (1, 2)),
        mention((2, 5), (3, 4), (4, 5), (4, 5)),
      ],
    );

    // All of mention one's offset-2 closes are emitted before mention two's
    // event opens at the same offset, with no text between them.
    assert!(rendered.contains(
      "</span></span></span><span class=\"event selected_evidence\">"
    ));
    assert_eq!(rendered.matches("<span").count(), 8);
    assert_eq!(rendered.matches("</span>").count(), 8);
    assert_eq!(literal_len(&rendered), text.len());
  }

  #[test]
  fn text_without_mentions_is_passed_through() {
    assert_eq!(annotate_document("no spans here", &[]), "no spans here");
  }

  #[test]
  fn newlines_become_line_breaks() {
    let rendered = annotate_document("line one\nline two", &[]);
    assert_eq!(rendered, "line one<br>line two");
  }

  #[test]
  fn out_of_range_offsets_do_not_panic() {
    let text = "short";
    let rendered =
      annotate_document(text, &[mention((0, 99), (0, 2), (2, 99), (3, 99))]);
    assert_eq!(rendered.matches("</span>").count(), 4);
    assert_eq!(literal_len(&rendered), text.len());
  }

  #[test]
  fn multibyte_offsets_clamp_to_char_boundary() {
    // 'α' is two bytes; an offset landing inside it must not split it.
    let text = "αβ binds γ";
    let rendered =
      annotate_document(text, &[mention((0, 10), (0, 3), (5, 10), (9, 10))]);
    assert_eq!(literal_len(&rendered), text.len());
  }
}
