//! Myers O(ND) character-level diff with linear-space bisection.
//!
//! The solver works on `&[char]` so all offsets are character positions,
//! never bytes — Chinese contract text makes byte offsets useless. The
//! divide-and-conquer bisection keeps memory linear in the input size, which
//! matters for multi-page contracts.

/// One run of the edit script, as a length. Positions are implied by the
/// prefix sums of the preceding segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Seg {
    /// Run present in both texts
    Equal(usize),
    /// Run present only in text A
    Delete(usize),
    /// Run present only in text B
    Insert(usize),
}

/// Accumulates segments, merging adjacent runs of the same kind.
#[derive(Debug, Default)]
pub(crate) struct SegList {
    segs: Vec<Seg>,
}

impl SegList {
    pub(crate) fn push(&mut self, seg: Seg) {
        let len = match seg {
            Seg::Equal(l) | Seg::Delete(l) | Seg::Insert(l) => l,
        };
        if len == 0 {
            return;
        }
        match (self.segs.last_mut(), seg) {
            (Some(Seg::Equal(prev)), Seg::Equal(l)) => *prev += l,
            (Some(Seg::Delete(prev)), Seg::Delete(l)) => *prev += l,
            (Some(Seg::Insert(prev)), Seg::Insert(l)) => *prev += l,
            _ => self.segs.push(seg),
        }
    }

    pub(crate) fn into_vec(self) -> Vec<Seg> {
        self.segs
    }
}

fn common_prefix_len(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

fn common_suffix_len(a: &[char], b: &[char]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Produce the edit script between `a` and `b` as a segment list.
pub(crate) fn solve(a: &[char], b: &[char], out: &mut SegList) {
    let prefix = common_prefix_len(a, b);
    out.push(Seg::Equal(prefix));
    let a = &a[prefix..];
    let b = &b[prefix..];

    let suffix = common_suffix_len(a, b);
    let a_mid = &a[..a.len() - suffix];
    let b_mid = &b[..b.len() - suffix];

    if a_mid.is_empty() {
        out.push(Seg::Insert(b_mid.len()));
    } else if b_mid.is_empty() {
        out.push(Seg::Delete(a_mid.len()));
    } else if a_mid.len() == 1 && b_mid.len() == 1 {
        // No common prefix or suffix: a plain substitution.
        out.push(Seg::Delete(1));
        out.push(Seg::Insert(1));
    } else {
        bisect(a_mid, b_mid, out);
    }

    out.push(Seg::Equal(suffix));
}

/// Find the middle of the shortest edit path and recurse on both halves.
///
/// Forward and reverse d-paths are advanced in lock-step until they overlap;
/// the overlap point splits the problem. This is the classic linear-space
/// refinement of Myers' algorithm.
fn bisect(a: &[char], b: &[char], out: &mut SegList) {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max_d = (n + m + 1) / 2;
    let v_offset = max_d;
    let v_len = (2 * max_d + 2) as usize;
    let mut v1 = vec![-1isize; v_len];
    let mut v2 = vec![-1isize; v_len];
    v1[(v_offset + 1) as usize] = 0;
    v2[(v_offset + 1) as usize] = 0;
    let delta = n - m;
    // With an odd delta the overlap is detected while stepping forward,
    // with an even delta while stepping in reverse.
    let front = delta % 2 != 0;
    let mut k1start = 0isize;
    let mut k1end = 0isize;
    let mut k2start = 0isize;
    let mut k2end = 0isize;

    for d in 0..max_d {
        // Forward path
        let mut k1 = -d + k1start;
        while k1 <= d - k1end {
            let k1_offset = (v_offset + k1) as usize;
            let mut x1 = if k1 == -d || (k1 != d && v1[k1_offset - 1] < v1[k1_offset + 1]) {
                v1[k1_offset + 1]
            } else {
                v1[k1_offset - 1] + 1
            };
            let mut y1 = x1 - k1;
            while x1 < n && y1 < m && a[x1 as usize] == b[y1 as usize] {
                x1 += 1;
                y1 += 1;
            }
            v1[k1_offset] = x1;
            if x1 > n {
                k1end += 2;
            } else if y1 > m {
                k1start += 2;
            } else if front {
                let k2_offset = v_offset + delta - k1;
                if k2_offset >= 0 && (k2_offset as usize) < v_len && v2[k2_offset as usize] != -1 {
                    let x2 = n - v2[k2_offset as usize];
                    if x1 >= x2 {
                        return split(a, b, x1 as usize, y1 as usize, out);
                    }
                }
            }
            k1 += 2;
        }

        // Reverse path
        let mut k2 = -d + k2start;
        while k2 <= d - k2end {
            let k2_offset = (v_offset + k2) as usize;
            let mut x2 = if k2 == -d || (k2 != d && v2[k2_offset - 1] < v2[k2_offset + 1]) {
                v2[k2_offset + 1]
            } else {
                v2[k2_offset - 1] + 1
            };
            let mut y2 = x2 - k2;
            while x2 < n && y2 < m && a[(n - x2 - 1) as usize] == b[(m - y2 - 1) as usize] {
                x2 += 1;
                y2 += 1;
            }
            v2[k2_offset] = x2;
            if x2 > n {
                k2end += 2;
            } else if y2 > m {
                k2start += 2;
            } else if !front {
                let k1_offset = v_offset + delta - k2;
                if k1_offset >= 0 && (k1_offset as usize) < v_len && v1[k1_offset as usize] != -1 {
                    let x1 = v1[k1_offset as usize];
                    let y1 = v_offset + x1 - k1_offset;
                    let x2 = n - x2;
                    if x1 >= x2 {
                        return split(a, b, x1 as usize, y1 as usize, out);
                    }
                }
            }
            k2 += 2;
        }
    }

    // Paths never overlapped: the texts share nothing. Emit wholesale.
    out.push(Seg::Delete(a.len()));
    out.push(Seg::Insert(b.len()));
}

fn split(a: &[char], b: &[char], x: usize, y: usize, out: &mut SegList) {
    // A split at either extreme would recurse on the whole problem again.
    if (x == 0 && y == 0) || (x == a.len() && y == b.len()) {
        out.push(Seg::Delete(a.len()));
        out.push(Seg::Insert(b.len()));
        return;
    }
    solve(&a[..x], &b[..y], out);
    solve(&a[x..], &b[y..], out);
}
