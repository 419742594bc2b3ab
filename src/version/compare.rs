//! Package version comparison
//!
//! Implements the ordering pacman uses for `[epoch:]version[-release]`
//! strings: epochs first, then the version, then the release when both
//! sides carry one. Each part is compared with [`segment_cmp`].

use std::cmp::Ordering;

/// Compare two full package version strings
pub fn vercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let (epoch_a, ver_a, rel_a) = split_evr(a);
    let (epoch_b, ver_b, rel_b) = split_evr(b);

    segment_cmp(epoch_a, epoch_b)
        .then_with(|| segment_cmp(ver_a, ver_b))
        .then_with(|| match (rel_a, rel_b) {
            (Some(ra), Some(rb)) => segment_cmp(ra, rb),
            _ => Ordering::Equal,
        })
}

/// Split a version into epoch, version and optional release
///
/// A missing or empty epoch reads as "0". The release is whatever follows
/// the last `-`.
fn split_evr(s: &str) -> (&str, &str, Option<&str>) {
    let digits = s.bytes().take_while(|b| b.is_ascii_digit()).count();
    let (epoch, rest) = if s.as_bytes().get(digits) == Some(&b':') {
        let epoch = &s[..digits];
        (if epoch.is_empty() { "0" } else { epoch }, &s[digits + 1..])
    } else {
        ("0", s)
    };

    match rest.rfind('-') {
        Some(pos) => (epoch, &rest[..pos], Some(&rest[pos + 1..])),
        None => (epoch, rest, None),
    }
}

/// Compare two version fragments segment by segment
///
/// Segments are maximal runs of digits or letters; anything else is a
/// separator. Numeric segments compare by value, alphabetic ones
/// lexically, and a numeric segment always beats an alphabetic one.
/// A longer run of separators wins. A trailing alphabetic segment never
/// beats the end of the string, so `1.0a < 1.0` while `1.0 < 1.0.1`.
pub fn segment_cmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut one = 0;
    let mut two = 0;

    while one < a.len() && two < b.len() {
        let sep_one = one;
        let sep_two = two;
        while one < a.len() && !a[one].is_ascii_alphanumeric() {
            one += 1;
        }
        while two < b.len() && !b[two].is_ascii_alphanumeric() {
            two += 1;
        }

        if one >= a.len() || two >= b.len() {
            break;
        }

        if one - sep_one != two - sep_two {
            return (one - sep_one).cmp(&(two - sep_two));
        }

        let is_num = a[one].is_ascii_digit();
        let end_one = run_end(a, one, is_num);
        let end_two = run_end(b, two, is_num);

        let seg_one = &a[one..end_one];
        let seg_two = &b[two..end_two];

        // Segment kinds differ: numbers beat letters.
        if seg_two.is_empty() {
            return if is_num {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let ord = if is_num {
            let trimmed_one = trim_leading_zeros(seg_one);
            let trimmed_two = trim_leading_zeros(seg_two);
            trimmed_one
                .len()
                .cmp(&trimmed_two.len())
                .then_with(|| trimmed_one.cmp(trimmed_two))
        } else {
            seg_one.cmp(seg_two)
        };

        if ord != Ordering::Equal {
            return ord;
        }

        one = end_one;
        two = end_two;
    }

    let rest_one = a.get(one);
    let rest_two = b.get(two);
    match (rest_one, rest_two) {
        (None, None) => Ordering::Equal,
        (None, Some(c)) if !c.is_ascii_alphabetic() => Ordering::Less,
        (Some(c), _) if c.is_ascii_alphabetic() => Ordering::Less,
        _ => Ordering::Greater,
    }
}

fn run_end(s: &[u8], start: usize, numeric: bool) -> usize {
    let mut end = start;
    while end < s.len()
        && if numeric {
            s[end].is_ascii_digit()
        } else {
            s[end].is_ascii_alphabetic()
        }
    {
        end += 1;
    }
    end
}

fn trim_leading_zeros(s: &[u8]) -> &[u8] {
    let zeros = s.iter().take_while(|&&b| b == b'0').count();
    &s[zeros..]
}
