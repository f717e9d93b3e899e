//! # Title Similarity
//! Ratcliff/Obershelp "gestalt" ratio over Unicode scalar values.
//!
//! `ratio(a, b) = 2*M / (len(a) + len(b))`, where `M` is the total size of the
//! matching blocks found by repeatedly taking the longest common substring and
//! recursing on the unmatched left and right remainders.
//!
//! Details that affect the numeric result (and therefore the clustering
//! threshold) are reproduced exactly:
//! - Ties between equally long blocks go to the earliest position in `a`,
//!   then the earliest position in `b`.
//! - When `b` has 200 or more elements, "popular" elements (more than
//!   `len(b)/100 + 1` occurrences) never seed a block, but a block found
//!   elsewhere may still be extended across them.
//! - Two empty strings have ratio 1.0.
//!
//! The ratio is not strictly symmetric: swapping the arguments can change the
//! blocks found. Callers that need a stable order pass (incoming, existing).

use std::collections::HashMap;

const AUTOJUNK_MIN_LEN: usize = 200;

/// Case-insensitive title similarity in `[0, 1]`.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    ratio(&a.to_lowercase(), &b.to_lowercase())
}

/// Case-sensitive gestalt ratio.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = Matcher::new(&a, &b).matched_chars();
    2.0 * matched as f64 / total as f64
}

struct Matcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each element of `b`, popular elements removed.
    b2j: HashMap<char, Vec<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    i: usize,
    j: usize,
    size: usize,
}

impl<'a> Matcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, idxs| idxs.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// Sum of sizes of all matching blocks.
    fn matched_chars(&self) -> usize {
        let mut total = 0usize;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            total += m.size;
            if alo < m.i && blo < m.j {
                queue.push((alo, m.i, blo, m.j));
            }
            if m.i + m.size < ahi && m.j + m.size < bhi {
                queue.push((m.i + m.size, ahi, m.j + m.size, bhi));
            }
        }
        total
    }

    /// Longest block in `a[alo..ahi]` x `b[blo..bhi]`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (a, b) = (self.a, self.b);
        let mut best = Block {
            i: alo,
            j: blo,
            size: 0,
        };

        // j2len[j] = length of the match ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(ch) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j > 0 {
                        j2len.get(&(j - 1)).copied().unwrap_or(0)
                    } else {
                        0
                    };
                    let k = prev + 1;
                    next.insert(j, k);
                    if k > best.size {
                        best = Block {
                            i: i + 1 - k,
                            j: j + 1 - k,
                            size: k,
                        };
                    }
                }
            }
            j2len = next;
        }

        // Extend across elements that were dropped as popular.
        while best.i > alo && best.j > blo && a[best.i - 1] == b[best.j - 1] {
            best.i -= 1;
            best.j -= 1;
            best.size += 1;
        }
        while best.i + best.size < ahi
            && best.j + best.size < bhi
            && a[best.i + best.size] == b[best.j + best.size]
        {
            best.size += 1;
        }

        best
    }
}
