use regex::Regex;
use std::sync::OnceLock;

/// One tagged fragment of a raw transcript, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment {
    /// The tag line, e.g. `[LLM Response]`, brackets included.
    pub tag: String,
    /// Body text between this tag and the next, surrounding whitespace
    /// trimmed.
    pub text: String,
    /// 0-based index of the tag in encounter order.
    pub position: usize,
}

/// A message boundary is a `[...]` line immediately preceded by a line
/// break. Text before the first tag has no owning tag and is discarded.
fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\[[^\]]+\]").expect("invalid tag regex"))
}

/// Split raw transcript text into tagged segments.
///
/// A file with zero tags yields an empty vec, not an error.
pub fn segment(text: &str) -> Vec<RawSegment> {
    let matches: Vec<_> = tag_regex().find_iter(text).collect();

    let mut segments = Vec::with_capacity(matches.len());
    for (position, m) in matches.iter().enumerate() {
        let body_end = matches
            .get(position + 1)
            .map(|next| next.start())
            .unwrap_or(text.len());

        segments.push(RawSegment {
            tag: m.as_str().trim().to_string(),
            text: text[m.end()..body_end].trim().to_string(),
            position,
        });
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_segmentation_discards_preamble() {
        let segments = segment("preamble\n[A]\nhello world\n[B]\nbye");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].tag, "[A]");
        assert_eq!(segments[0].text, "hello world");
        assert_eq!(segments[0].position, 0);
        assert_eq!(segments[1].tag, "[B]");
        assert_eq!(segments[1].text, "bye");
        assert_eq!(segments[1].position, 1);
    }

    #[test]
    fn test_no_tags_yields_empty() {
        assert!(segment("just some free text\nwith lines").is_empty());
        assert!(segment("").is_empty());
    }

    #[test]
    fn test_tag_at_start_of_file_is_preamble() {
        // No preceding line break, so the leading tag is not a boundary.
        let segments = segment("[A]\nfirst\n[B]\nsecond");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].tag, "[B]");
        assert_eq!(segments[0].text, "second");
    }

    #[test]
    fn test_empty_body_between_adjacent_tags() {
        let segments = segment("x\n[A]\n[B]\ncontent");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "");
        assert_eq!(segments[1].text, "content");
    }

    #[test]
    fn test_multiline_body_is_kept_whole() {
        let segments = segment("x\n[STT Input]\nline one\nline two\n\nline three");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "line one\nline two\n\nline three");
    }

    #[test]
    fn test_trailing_tag_has_empty_body() {
        let segments = segment("x\n[A]\nhello\n[B]");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].tag, "[B]");
        assert_eq!(segments[1].text, "");
    }
}
