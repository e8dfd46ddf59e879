//! Splitting display text into literal and inline-math segments.
//!
//! Math is written between two occurrences of a single delimiter character
//! (`$` by default). Delimiters do not nest and cannot be escaped; a
//! delimiter without a partner is kept as literal text.

use serde::Serialize;

/// The default inline-math delimiter.
pub const DEFAULT_MATH_DELIMITER: char = '$';

/// What a segment contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Literal,
    Math,
}

/// A contiguous piece of display text, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    /// Segment text with math delimiters stripped.
    pub content: &'a str,
}

impl<'a> Segment<'a> {
    pub fn literal(content: &'a str) -> Self {
        Self {
            kind: SegmentKind::Literal,
            content,
        }
    }

    pub fn math(content: &'a str) -> Self {
        Self {
            kind: SegmentKind::Math,
            content,
        }
    }

    pub fn is_math(&self) -> bool {
        self.kind == SegmentKind::Math
    }
}

/// Splits text on a configurable math delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segmenter {
    delimiter: char,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(DEFAULT_MATH_DELIMITER)
    }
}

impl Segmenter {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Lazily segment `text`. Clone the iterator to walk it again.
    pub fn segment<'a>(&self, text: &'a str) -> Segments<'a> {
        Segments {
            rest: text,
            delimiter: self.delimiter,
        }
    }

    /// Rebuild the marked-up string a sequence of segments came from.
    pub fn join<'a>(&self, segments: impl IntoIterator<Item = Segment<'a>>) -> String {
        let mut out = String::new();
        for segment in segments {
            if segment.is_math() {
                out.push(self.delimiter);
                out.push_str(segment.content);
                out.push(self.delimiter);
            } else {
                out.push_str(segment.content);
            }
        }
        out
    }
}

/// Segment `text` using the default `$` delimiter.
pub fn segment(text: &str) -> Segments<'_> {
    Segmenter::default().segment(text)
}

/// Iterator returned by [`Segmenter::segment`].
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    rest: &'a str,
    delimiter: char,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let width = self.delimiter.len_utf8();
        let pair = self.rest.find(self.delimiter).and_then(|open| {
            self.rest[open + width..]
                .find(self.delimiter)
                .map(|close| (open, open + width + close))
        });

        match pair {
            // No complete pair left: everything remaining is literal.
            None => {
                let literal = self.rest;
                self.rest = "";
                Some(Segment::literal(literal))
            }
            Some((0, close)) => {
                let math = &self.rest[width..close];
                self.rest = &self.rest[close + width..];
                Some(Segment::math(math))
            }
            Some((open, _)) => {
                let literal = &self.rest[..open];
                self.rest = &self.rest[open..];
                Some(Segment::literal(literal))
            }
        }
    }
}

impl std::iter::FusedIterator for Segments<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<Segment<'_>> {
        segment(text).collect()
    }

    #[test]
    fn plain_text_is_one_literal() {
        assert_eq!(collect("no math here"), vec![Segment::literal("no math here")]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(collect("").is_empty());
    }

    #[test]
    fn mixed_text_keeps_order() {
        assert_eq!(
            collect("Solve $x^2 = 4$ for $x$."),
            vec![
                Segment::literal("Solve "),
                Segment::math("x^2 = 4"),
                Segment::literal(" for "),
                Segment::math("x"),
                Segment::literal("."),
            ]
        );
    }

    #[test]
    fn adjacent_math_has_no_empty_literal_between() {
        assert_eq!(
            collect("$a$$b$"),
            vec![Segment::math("a"), Segment::math("b")]
        );
    }

    #[test]
    fn double_delimiter_is_empty_math() {
        assert_eq!(collect("$$"), vec![Segment::math("")]);
    }

    #[test]
    fn unmatched_delimiter_stays_literal() {
        assert_eq!(
            collect("costs $5 or $x$ and $3"),
            vec![
                Segment::literal("costs "),
                Segment::math("5 or "),
                Segment::literal("x"),
                Segment::math(" and "),
                Segment::literal("3"),
            ]
        );
        assert_eq!(collect("trailing $"), vec![Segment::literal("trailing $")]);
        assert_eq!(collect("$leading"), vec![Segment::literal("$leading")]);
    }

    #[test]
    fn round_trip_rebuilds_input() {
        let segmenter = Segmenter::default();
        for input in [
            "",
            "plain",
            "$x$",
            "a $b$ c $d$ e",
            "$$",
            "$\\frac{1}{2}$ of $\\pi r^2$",
            "ünïcode $α+β$ text",
        ] {
            assert_eq!(segmenter.join(segmenter.segment(input)), input);
        }
    }

    #[test]
    fn iterator_is_restartable() {
        let segments = segment("a $b$ c");
        let first: Vec<_> = segments.clone().collect();
        let second: Vec<_> = segments.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn custom_delimiter() {
        let segmenter = Segmenter::new('§');
        let out: Vec<_> = segmenter.segment("see §E=mc^2§ and $5").collect();
        assert_eq!(
            out,
            vec![
                Segment::literal("see "),
                Segment::math("E=mc^2"),
                Segment::literal(" and $5"),
            ]
        );
        assert_eq!(segmenter.join(out), "see §E=mc^2§ and $5");
    }
}
