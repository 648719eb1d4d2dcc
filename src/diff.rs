//! Word-level text diff.
//!
//! Compares a submitted text chunk against a matched source chunk and tags
//! every span as unchanged, added or removed. Segments are what the dual-pane
//! comparison renders: the source pane strikes through removed spans, the
//! modified pane colors added spans.
//!
//! Tokenization keeps whitespace runs as their own tokens so that joining the
//! segments back together reproduces the inputs byte for byte.

/// How a segment relates the two inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// Present in both inputs.
    Unchanged,
    /// Present only in the modified text.
    Added,
    /// Present only in the original text.
    Removed,
}

/// One contiguous span of the diff output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSegment {
    pub kind: DiffKind,
    pub text: String,
}

impl DiffSegment {
    fn new(kind: DiffKind, text: String) -> Self {
        Self { kind, text }
    }
}

/// Split text into word and whitespace tokens.
///
/// Runs of whitespace are single tokens, as are runs of non-whitespace, so
/// the concatenation of all tokens equals the input.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (idx, ch) in text.char_indices() {
        let is_space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev == is_space => {}
            Some(_) => {
                tokens.push(&text[start..idx]);
                start = idx;
                in_space = Some(is_space);
            }
            None => in_space = Some(is_space),
        }
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Compute a word-level diff between `original` and `modified`.
///
/// Standard longest-common-subsequence diff over word/whitespace tokens.
/// Deterministic: the same inputs always produce the same segmentation.
/// Two empty inputs produce zero segments.
///
/// Concatenating `Unchanged` + `Removed` segments in order reconstructs
/// `original`; `Unchanged` + `Added` reconstructs `modified`.
pub fn diff_words(original: &str, modified: &str) -> Vec<DiffSegment> {
    let a = tokenize(original);
    let b = tokenize(modified);

    if a.is_empty() && b.is_empty() {
        return Vec::new();
    }

    // LCS length table, (n+1) x (m+1).
    let n = a.len();
    let m = b.len();
    let mut table = vec![0u32; (n + 1) * (m + 1)];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * (m + 1) + j] = if a[i] == b[j] {
                table[(i + 1) * (m + 1) + j + 1] + 1
            } else {
                table[(i + 1) * (m + 1) + j].max(table[i * (m + 1) + j + 1])
            };
        }
    }

    // Walk the table, emitting removals before additions at each divergence.
    let mut segments: Vec<DiffSegment> = Vec::new();
    let push = |kind: DiffKind, text: &str, segments: &mut Vec<DiffSegment>| {
        if let Some(last) = segments.last_mut() {
            if last.kind == kind {
                last.text.push_str(text);
                return;
            }
        }
        segments.push(DiffSegment::new(kind, text.to_string()));
    };

    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            push(DiffKind::Unchanged, a[i], &mut segments);
            i += 1;
            j += 1;
        } else if table[(i + 1) * (m + 1) + j] >= table[i * (m + 1) + j + 1] {
            push(DiffKind::Removed, a[i], &mut segments);
            i += 1;
        } else {
            push(DiffKind::Added, b[j], &mut segments);
            j += 1;
        }
    }
    while i < n {
        push(DiffKind::Removed, a[i], &mut segments);
        i += 1;
    }
    while j < m {
        push(DiffKind::Added, b[j], &mut segments);
        j += 1;
    }

    segments
}

/// Reassemble one side of a diff.
///
/// `Unchanged` segments always contribute; `keep` picks which exclusive kind
/// joins them (`Removed` rebuilds the original, `Added` the modified text).
pub fn reconstruct(segments: &[DiffSegment], keep: DiffKind) -> String {
    segments
        .iter()
        .filter(|s| s.kind == DiffKind::Unchanged || s.kind == keep)
        .map(|s| s.text.as_str())
        .collect()
}
