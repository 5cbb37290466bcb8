//! Inline sentence markup — token-index tag splicing plus detokenization.
//!
//! Spans here are *token-index* `[start, end)` pairs over the sentence's
//! token sequence, not character offsets. The splice inserts tags in
//! descending index order so earlier insertions never shift the positions of
//! tags not yet inserted; that ordering is a correctness invariant, not an
//! implementation detail.

use regnet_core::span::Span;

// ─── Tag splicing ─────────────────────────────────────────────────────────────

/// Splice one open/close tag pair per role into a fresh copy of `tokens`.
///
/// Non-event pairs are pushed in reading order (controller, trigger,
/// controlled) and stably sorted by token index ascending; the event pair
/// wraps them all (open prepended, close appended). Zero-width role spans
/// still emit an open immediately followed by a close. Indices past the end
/// of the token sequence clamp to the end. Nesting is not validated beyond
/// the fixed event-wraps-roles ordering — crossing role spans emit tags at
/// their index positions as-is.
pub fn splice_tags(
  tokens: &[String],
  label: &str,
  event: Span,
  controller: Span,
  controlled: Span,
  trigger: Span,
) -> Vec<String> {
  let mut arr: Vec<(usize, String)> = vec![
    (controller.start, r#"<span class="controller">"#.to_string()),
    (controller.end, "</span>".to_string()),
    (trigger.start, r#"<span class="trigger">"#.to_string()),
    (trigger.end, "</span>".to_string()),
    (controlled.start, r#"<span class="controlled">"#.to_string()),
    (controlled.end, "</span>".to_string()),
  ];
  arr.sort_by_key(|&(index, _)| index);

  arr.insert(0, (event.start, format!(r#"<span class="event {label}">"#)));
  arr.push((event.end, "</span>".to_string()));

  let mut out: Vec<String> = tokens.to_vec();
  for (index, tag) in arr.into_iter().rev() {
    out.insert(index.min(out.len()), tag);
  }
  out
}

// ─── Detokenization ───────────────────────────────────────────────────────────

/// Join token-sequence items with spaces, then strip the separators the
/// tokenizer introduced: before trailing punctuation, after opening brackets,
/// around infix symbols, and finally around spliced tag boundaries so tags
/// sit tight against their tokens.
pub fn detokenize(items: &[String]) -> String {
  items
    .join(" ")
    .replace(" .", ".")
    .replace(" ,", ",")
    .replace(" !", "!")
    .replace(" ?", "?")
    .replace(" :", ":")
    .replace(" ;", ";")
    .replace(" )", ")")
    .replace("( ", "(")
    .replace(" /", "/")
    .replace(" %", "%")
    .replace(" - ", "-")
    .replace(" = ", "=")
    .replace(" + ", "+")
    .replace(" * ", "*")
    .replace(" & ", "&")
    .replace(" | ", "|")
    .replace(" ^ ", "^")
    .replace(" > ", ">")
    .replace(" < ", "<")
    .replace(" @ ", "@")
    .replace(" # ", "#")
    .replace(" $ ", "$")
    .replace(" ~ ", "~")
    .replace(" ` ", "`")
    .replace("{ ", "{")
    .replace(" }", "}")
    .replace(" ]", "]")
    .replace("[ ", "[")
    .replace(" \" ", "\"")
    .replace(" ' ", "'")
    .replace(" \\ ", "\\")
    .replace(" \n", " ")
    .replace("> ", ">")
    .replace(" <", "<")
}

/// Render one mention's sentence to its inline-markup string.
pub fn render_sentence(
  tokens: &[String],
  label: &str,
  event: Span,
  controller: Span,
  controlled: Span,
  trigger: Span,
) -> String {
  detokenize(&splice_tags(tokens, label, event, controller, controlled, trigger))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn toks(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
  }

  #[test]
  fn event_wraps_all_roles() {
    let rendered = render_sentence(
      &toks(&["A", "binds", "B"]),
      "Positive_regulation",
      Span::new(0, 3),
      Span::new(0, 1),
      Span::new(2, 3),
      Span::new(1, 2),
    );
    assert_eq!(
      rendered,
      "<span class=\"event Positive_regulation\">\
       <span class=\"controller\">A</span>\
       <span class=\"trigger\">binds</span>\
       <span class=\"controlled\">B</span>\
       </span>"
    );
  }

  #[test]
  fn splice_inserts_descending_without_index_shift() {
    let spliced = splice_tags(
      &toks(&["A", "binds", "B"]),
      "Binding",
      Span::new(0, 3),
      Span::new(0, 1),
      Span::new(2, 3),
      Span::new(1, 2),
    );
    // 3 tokens + 4 open/close pairs.
    assert_eq!(spliced.len(), 11);
    assert_eq!(spliced[0], "<span class=\"event Binding\">");
    assert_eq!(spliced[10], "</span>");
    assert_eq!(spliced[2], "A");
    assert_eq!(spliced[5], "binds");
    assert_eq!(spliced[8], "B");
  }

  #[test]
  fn zero_width_span_emits_adjacent_open_close() {
    let rendered = render_sentence(
      &toks(&["A", "binds", "B"]),
      "Binding",
      Span::new(0, 3),
      Span::new(1, 1), // zero-width controller
      Span::new(2, 3),
      Span::new(1, 2),
    );
    assert!(rendered.contains("<span class=\"controller\"></span>"));
  }

  #[test]
  fn out_of_range_indices_clamp_to_end() {
    let rendered = render_sentence(
      &toks(&["A", "binds", "B"]),
      "Binding",
      Span::new(0, 7),
      Span::new(0, 1),
      Span::new(2, 7),
      Span::new(1, 2),
    );
    assert_eq!(rendered.matches("<span").count(), 4);
    assert_eq!(rendered.matches("</span>").count(), 4);
    assert!(rendered.ends_with("</span></span>"));
  }

  #[test]
  fn detokenize_strips_tokenizer_spacing() {
    let s = detokenize(&toks(&[
      "Results", "(", "p", "<", "0.05", ")", ",", "see", "Fig", ".",
    ]));
    assert_eq!(s, "Results (p<0.05), see Fig.");
  }
}
