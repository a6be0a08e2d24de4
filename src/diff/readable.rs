//! Line-oriented readable diff with intraline `?` markers.

use super::matcher::{SequenceMatcher, Tag};
use super::{Segment, SegmentTag};

/// Walks the line opcodes of `from` against `to`, pairing similar lines of
/// each replaced block so that character-level markers can be shown.
pub(super) struct ReadableDiffer<'a> {
    from: &'a [&'a str],
    to: &'a [&'a str],
    cutoff: f64,
    out: Vec<Segment>,
}

impl<'a> ReadableDiffer<'a> {
    pub(super) fn new(from: &'a [&'a str], to: &'a [&'a str], cutoff: f64) -> Self {
        Self {
            from,
            to,
            cutoff,
            out: Vec::new(),
        }
    }

    pub(super) fn diff(mut self) -> Vec<Segment> {
        let from = self.from;
        let to = self.to;
        for op in SequenceMatcher::new(from, to).opcodes() {
            match op.tag {
                Tag::Replace => self.diff_lines(op.a_start, op.a_end, op.b_start, op.b_end),
                Tag::Delete => self.dump(SegmentTag::Removed, &from[op.a_start..op.a_end]),
                Tag::Insert => self.dump(SegmentTag::Added, &to[op.b_start..op.b_end]),
                Tag::Equal => self.dump(SegmentTag::Unchanged, &from[op.a_start..op.a_end]),
            }
        }
        self.out
    }

    fn dump(&mut self, tag: SegmentTag, lines: &[&str]) {
        self.out
            .extend(lines.iter().map(|line| Segment::new(tag, *line)));
    }

    /// Finds the most similar pair in a replaced block, diffs it by
    /// character, and recurses on the lines above and below it.
    fn diff_lines(&mut self, from_start: usize, from_end: usize, to_start: usize, to_end: usize) {
        let mut best_ratio = self.cutoff - 0.01;
        let mut best = None;
        let mut identical = None;

        for j in to_start..to_end {
            let to_chars: Vec<char> = self.to[j].chars().collect();
            for i in from_start..from_end {
                if self.from[i] == self.to[j] {
                    identical.get_or_insert((i, j));
                    continue;
                }
                let from_chars: Vec<char> = self.from[i].chars().collect();
                let ratio =
                    SequenceMatcher::with_junk(&from_chars, &to_chars, is_space).ratio();
                if ratio > best_ratio {
                    best_ratio = ratio;
                    best = Some((i, j));
                }
            }
        }

        let (best_i, best_j, pair_identical) = match (best_ratio < self.cutoff, best, identical) {
            (false, Some((i, j)), _) => (i, j, false),
            (_, _, Some((i, j))) => (i, j, true),
            _ => {
                self.plain_replace(from_start, from_end, to_start, to_end);
                return;
            }
        };

        self.diff_around(from_start, best_i, to_start, best_j);
        if pair_identical {
            self.dump(SegmentTag::Unchanged, &[self.from[best_i]]);
        } else {
            self.diff_line(self.from[best_i], self.to[best_j]);
        }
        self.diff_around(best_i + 1, from_end, best_j + 1, to_end);
    }

    fn diff_around(&mut self, from_start: usize, from_end: usize, to_start: usize, to_end: usize) {
        if from_start < from_end {
            if to_start < to_end {
                self.diff_lines(from_start, from_end, to_start, to_end);
            } else {
                let from = self.from;
                self.dump(SegmentTag::Removed, &from[from_start..from_end]);
            }
        } else if to_start < to_end {
            let to = self.to;
            self.dump(SegmentTag::Added, &to[to_start..to_end]);
        }
    }

    /// No similar pair: emit the shorter block first.
    fn plain_replace(&mut self, from_start: usize, from_end: usize, to_start: usize, to_end: usize) {
        let (from, to) = (self.from, self.to);
        let from = &from[from_start..from_end];
        let to = &to[to_start..to_end];
        if to.len() < from.len() {
            self.dump(SegmentTag::Added, to);
            self.dump(SegmentTag::Removed, from);
        } else {
            self.dump(SegmentTag::Removed, from);
            self.dump(SegmentTag::Added, to);
        }
    }

    fn diff_line(&mut self, from_line: &str, to_line: &str) {
        let from_chars: Vec<char> = from_line.chars().collect();
        let to_chars: Vec<char> = to_line.chars().collect();
        let mut from_tags = String::new();
        let mut to_tags = String::new();
        for op in SequenceMatcher::with_junk(&from_chars, &to_chars, is_space).opcodes() {
            let from_len = op.a_end - op.a_start;
            let to_len = op.b_end - op.b_start;
            match op.tag {
                Tag::Replace => {
                    push_n(&mut from_tags, '^', from_len);
                    push_n(&mut to_tags, '^', to_len);
                }
                Tag::Delete => push_n(&mut from_tags, '-', from_len),
                Tag::Insert => push_n(&mut to_tags, '+', to_len),
                Tag::Equal => {
                    push_n(&mut from_tags, ' ', from_len);
                    push_n(&mut to_tags, ' ', to_len);
                }
            }
        }
        self.diff_point(from_line, to_line, &from_tags, &to_tags);
    }

    /// Emits the `-`/`+` pair with their markers. Leading tabs shared by
    /// both lines are kept as tabs in the markers so columns line up.
    fn diff_point(&mut self, from_line: &str, to_line: &str, from_tags: &str, to_tags: &str) {
        let common = leading(from_line, '\t')
            .min(leading(to_line, '\t'))
            .min(leading(from_tags, ' '));
        let indent = "\t".repeat(common);
        let from_tags = from_tags.get(common..).unwrap_or("").trim_end_matches(' ');
        let to_tags = to_tags.get(common..).unwrap_or("").trim_end_matches(' ');

        self.out.push(Segment::new(SegmentTag::Removed, from_line));
        if !from_tags.is_empty() {
            self.out
                .push(Segment::new(SegmentTag::Changed, format!("{indent}{from_tags}")));
        }
        self.out.push(Segment::new(SegmentTag::Added, to_line));
        if !to_tags.is_empty() {
            self.out
                .push(Segment::new(SegmentTag::Changed, format!("{indent}{to_tags}")));
        }
    }
}

fn is_space(c: &char) -> bool {
    matches!(c, ' ' | '\t')
}

fn leading(s: &str, c: char) -> usize {
    s.chars().take_while(|&x| x == c).count()
}

fn push_n(buf: &mut String, c: char, n: usize) {
    buf.extend(std::iter::repeat(c).take(n));
}
