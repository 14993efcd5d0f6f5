//! Optimal bipartite assignment (Hungarian method with potentials).
//!
//! Runs in O(n^2 m) for an n x m cost matrix with n <= m; taller matrices are
//! transposed first. Rectangular input yields `min(rows, cols)` pairs.

/// Minimum-cost assignment. Returns `(row, col)` pairs sorted by row.
///
/// Rows shorter than the first row are treated as padded with zero cost.
pub fn solve_assignment(cost: &[Vec<i64>]) -> Vec<(usize, usize)> {
    let rows = cost.len();
    let cols = cost.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let at = |r: usize, c: usize| cost[r].get(c).copied().unwrap_or(0);

    let mut pairs = if rows <= cols {
        hungarian(rows, cols, at)
    } else {
        hungarian(cols, rows, |r, c| at(c, r))
            .into_iter()
            .map(|(r, c)| (c, r))
            .collect()
    };

    pairs.sort_unstable();
    pairs
}

/// Assignment maximizing total overlap
pub fn maximize_overlap(overlap: &[Vec<usize>]) -> Vec<(usize, usize)> {
    let negated: Vec<Vec<i64>> = overlap
        .iter()
        .map(|row| row.iter().map(|&v| -(v as i64)).collect())
        .collect();
    solve_assignment(&negated)
}

/// Requires `n <= m`. Indices inside are 1-based with 0 as the virtual source.
fn hungarian(n: usize, m: usize, cost: impl Fn(usize, usize) -> i64) -> Vec<(usize, usize)> {
    const INF: i64 = i64::MAX / 4;

    let mut u = vec![0i64; n + 1];
    let mut v = vec![0i64; m + 1];
    // p[j]: row matched to column j; way[j]: previous column on the augmenting path
    let mut p = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![INF; m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = INF;
            let mut j1 = 0usize;

            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let reduced = cost(i0 - 1, j - 1) - u[i0] - v[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=m {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    (1..=m)
        .filter(|&j| p[j] != 0)
        .map(|j| (p[j] - 1, j - 1))
        .collect()
}
