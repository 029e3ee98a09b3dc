//! Natural-order string comparison.

use std::cmp::Ordering;

/// A maximal run of either ASCII digits or non-digit characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.rest.len());

        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;

        Some(if digits {
            Chunk::Digits(chunk)
        } else {
            Chunk::Text(chunk)
        })
    }
}

/// Compare two digit runs by numeric value without parsing them into integers.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_chunks(a: Chunk<'_>, b: Chunk<'_>) -> Ordering {
    match (a, b) {
        (Chunk::Digits(a), Chunk::Digits(b)) => compare_digits(a, b),
        (Chunk::Text(a), Chunk::Text(b)) => a.cmp(b),
        // Numbers sort ahead of text at the same position.
        (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
        (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
    }
}

/// Compare two strings in natural order.
///
/// Embedded digit runs are compared by numeric value, so `"file2"` sorts
/// before `"file10"`. Text runs compare by code point. Strings that differ
/// only in leading zeros compare equal, which lets a stable sort keep their
/// input order.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use drive_hierarchy::natural::natural_cmp;
///
/// assert_eq!(natural_cmp("img2.png", "img10.png"), Ordering::Less);
/// assert_eq!(natural_cmp("b", "a"), Ordering::Greater);
/// ```
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Chunks { rest: a };
    let mut right = Chunks { rest: b };

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = compare_chunks(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}
