//! Token estimation and splitting of the assembled document into parts

use log::debug;

use crate::config::SplitMode;

/// One contiguous slice of the document, written as its own file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// 1-based position
    pub index: usize,
    /// Number of parts in the run
    pub total: usize,
    pub content: String,
}

/// Token budget used to size parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    pub tokens_per_part: usize,
    pub chars_per_token: usize,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            tokens_per_part: crate::DEFAULT_TOKENS_PER_PART,
            chars_per_token: crate::DEFAULT_CHARS_PER_TOKEN,
        }
    }
}

impl Budget {
    /// Rough token count: characters divided by `chars_per_token`, rounded down
    pub fn estimate_tokens(&self, text: &str) -> usize {
        text.chars().count() / self.chars_per_token
    }

    /// Parts needed for `tokens`, never fewer than one
    pub fn part_count(&self, tokens: usize) -> usize {
        tokens.div_ceil(self.tokens_per_part).max(1)
    }

    /// Largest character count a block-mode part may reach
    pub fn chars_per_part(&self) -> usize {
        self.tokens_per_part.saturating_mul(self.chars_per_token)
    }
}

fn into_parts(pieces: Vec<String>) -> Vec<Part> {
    let total = pieces.len();
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, content)| Part {
            index: i + 1,
            total,
            content,
        })
        .collect()
}

/// Cut `text` into `num_parts` equal character slices; the last absorbs the remainder
///
/// Cuts ignore block and line structure but always fall on character boundaries.
pub fn split_by_offset(text: &str, num_parts: usize) -> Vec<Part> {
    let num_parts = num_parts.max(1);
    if num_parts == 1 {
        return into_parts(vec![text.to_string()]);
    }

    let total_chars = text.chars().count();
    let chunk = total_chars / num_parts;

    // Byte offset of every character index, plus the end of the string
    let byte_at: Vec<usize> = text.char_indices().map(|(b, _)| b).chain(std::iter::once(text.len())).collect();

    let pieces = (0..num_parts)
        .map(|i| {
            let start = i * chunk;
            let end = if i + 1 < num_parts { start + chunk } else { total_chars };
            text[byte_at[start]..byte_at[end]].to_string()
        })
        .collect();

    into_parts(pieces)
}

/// Pack whole segments into parts of at most `limit` characters
///
/// A segment longer than `limit` gets a part to itself.
pub fn split_by_blocks(segments: &[String], limit: usize) -> Vec<Part> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for segment in segments {
        let len = segment.chars().count();
        if current_chars > 0 && current_chars + len > limit {
            pieces.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        current.push_str(segment);
        current_chars += len;
    }

    if !current.is_empty() || pieces.is_empty() {
        pieces.push(current);
    }

    into_parts(pieces)
}

/// Outcome of sizing and splitting a document
#[derive(Debug, Clone)]
pub struct SplitPlan {
    pub estimated_tokens: usize,
    pub parts: Vec<Part>,
}

/// Estimate tokens for the rendered document and split it per `mode`
pub fn plan(segments: &[String], budget: Budget, mode: SplitMode) -> SplitPlan {
    let rendered = segments.concat();
    let estimated_tokens = budget.estimate_tokens(&rendered);
    let needed = budget.part_count(estimated_tokens);
    debug!("plan: tokens={} needed_parts={} mode={:?}", estimated_tokens, needed, mode);

    let parts = match mode {
        _ if needed == 1 => into_parts(vec![rendered]),
        SplitMode::Offset => split_by_offset(&rendered, needed),
        SplitMode::Blocks => split_by_blocks(segments, budget.chars_per_part()),
    };

    SplitPlan { estimated_tokens, parts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn joined(parts: &[Part]) -> String {
        parts.iter().map(|p| p.content.as_str()).collect()
    }

    #[test]
    fn test_estimate_tokens_counts_chars() {
        let budget = Budget::default();
        assert_eq!(budget.estimate_tokens(""), 0);
        assert_eq!(budget.estimate_tokens("abc"), 0);
        assert_eq!(budget.estimate_tokens("abcd"), 1);
        assert_eq!(budget.estimate_tokens("ééééé"), 1);
    }

    #[test]
    fn test_part_count_boundaries() {
        let budget = Budget::default();
        for (len, expected) in [(0, 1), (16000, 1), (16001, 1), (16003, 1), (16004, 2), (32003, 2), (32004, 3)] {
            let text = "a".repeat(len);
            let tokens = budget.estimate_tokens(&text);
            assert_eq!(budget.part_count(tokens), expected, "length {}", len);
        }
    }

    #[test]
    fn test_split_by_offset_last_absorbs_remainder() {
        let parts = split_by_offset("abcdefghij", 3);
        let contents: Vec<_> = parts.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["abc", "def", "ghij"]);
        assert_eq!(parts[0].index, 1);
        assert_eq!(parts[2].index, 3);
        assert!(parts.iter().all(|p| p.total == 3));
    }

    #[test]
    fn test_split_by_offset_multibyte() {
        let text = "αβγδεζη";
        let parts = split_by_offset(text, 2);
        assert_eq!(parts[0].content, "αβγ");
        assert_eq!(parts[1].content, "δεζη");
    }

    #[test]
    fn test_split_by_offset_single_part_untouched() {
        let parts = split_by_offset("hello", 1);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].content, "hello");
        assert_eq!(parts[0].total, 1);
    }

    #[test]
    fn test_split_by_blocks_keeps_blocks_whole() {
        let segments: Vec<String> = ["# T\n\n", "aaaa", "bbbbbb", "cc", "dddddddddddd"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let parts = split_by_blocks(&segments, 10);
        let contents: Vec<_> = parts.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["# T\n\naaaa", "bbbbbbcc", "dddddddddddd"]);
        assert!(parts.iter().all(|p| p.total == 3));
    }

    #[test]
    fn test_plan_single_part_below_budget() {
        let segments = vec!["# T\n\n".to_string(), "x".repeat(100)];
        let plan = plan(&segments, Budget::default(), SplitMode::Offset);
        assert_eq!(plan.parts.len(), 1);
        assert_eq!(plan.estimated_tokens, 26);
        assert_eq!(plan.parts[0].content, segments.concat());
    }

    #[test]
    fn test_plan_offset_splits_over_budget() {
        let budget = Budget {
            tokens_per_part: 10,
            chars_per_token: 4,
        };
        let segments = vec!["y".repeat(100)];
        let plan = plan(&segments, budget, SplitMode::Offset);
        assert_eq!(plan.estimated_tokens, 25);
        assert_eq!(plan.parts.len(), 3);
        assert_eq!(plan.parts[0].content.len(), 33);
        assert_eq!(plan.parts[2].content.len(), 34);
    }

    proptest! {
        #[test]
        fn prop_offset_split_preserves_content(text in "\\PC{0,400}", n in 1usize..12) {
            let parts = split_by_offset(&text, n);
            prop_assert_eq!(parts.len(), n);
            prop_assert_eq!(joined(&parts), text);
        }

        #[test]
        fn prop_plan_preserves_content(
            segments in proptest::collection::vec("\\PC{0,60}", 0..20),
            tokens_per_part in 1usize..40,
            blocks in any::<bool>(),
        ) {
            let budget = Budget { tokens_per_part, chars_per_token: 4 };
            let mode = if blocks { SplitMode::Blocks } else { SplitMode::Offset };
            let plan = plan(&segments, budget, mode);
            prop_assert!(!plan.parts.is_empty());
            prop_assert_eq!(joined(&plan.parts), segments.concat());
            for (i, part) in plan.parts.iter().enumerate() {
                prop_assert_eq!(part.index, i + 1);
                prop_assert_eq!(part.total, plan.parts.len());
            }
        }
    }
}
