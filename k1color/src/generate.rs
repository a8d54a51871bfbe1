//! Seeded random graph generators.

use std::collections::HashSet;
use std::convert::TryFrom;

use rand::Rng;
use rand_pcg::Lcg64Xsh32;

use crate::error::{Error, Result};
use crate::graph::{CsrGraph, NodeId, Orientation};

const STREAM: u64 = 0xcafef00dd15ea5e5;

/// A connected simple undirected graph over `nvertices`.
///
/// The graph always includes the path `0 - 1 - ... - n-1`, plus
/// `nvertices * extra_degree` further distinct edges sampled uniformly.
/// If that many edges don't exist, the graph ends up complete.
pub fn connected(nvertices: usize, extra_degree: usize, seed: u64) -> Result<CsrGraph> {
    let n = NodeId::try_from(nvertices)
        .map_err(|_| Error::InvalidGraph(format!("{} vertices exceed u32", nvertices)))?;
    if n < 2 {
        return CsrGraph::from_edges(nvertices, Vec::new(), Orientation::Undirected);
    }

    let path: HashSet<Edge> = (1..n).map(|v| fromtup(v - 1, v)).collect();
    let universe = c2(u64::from(n));
    let available = universe - path.len() as u64;
    let k = (nvertices as u64)
        .saturating_mul(extra_degree as u64)
        .min(available);

    let mut rng = Lcg64Xsh32::new(STREAM, seed);
    let additional = sample_without_replacement(&mut rng, &path, universe, k);
    let edges = path.into_iter().chain(additional.into_iter()).map(totup);
    CsrGraph::from_edges(nvertices, edges, Orientation::Undirected)
}

/// The complete graph over `nvertices`, the hardest case for a fixed
/// iteration budget.
pub fn complete(nvertices: u32) -> Result<CsrGraph> {
    let edges = (0..nvertices).flat_map(|u| (u + 1..nvertices).map(move |v| (u, v)));
    CsrGraph::from_edges(nvertices as usize, edges, Orientation::Undirected)
}

/// A directed star: hub `0` with a relationship to each of the leaves
/// `1..=nleaves`, and none back.
pub fn star(nleaves: u32) -> Result<CsrGraph> {
    let n = nleaves
        .checked_add(1)
        .ok_or_else(|| Error::InvalidGraph(format!("{} leaves exceed u32", nleaves)))?;
    let edges = (1..n).map(|leaf| (0, leaf));
    CsrGraph::from_edges(n as usize, edges, Orientation::Natural)
}

// To sample from the set of edges over a simple graph over n vertices
// without incurring the memory overhead of fully generating all
// (n choose 2) edges, we use Floyd's combination sampler [1].
//
// The sampler requires a total order over the items we're drawing a
// combination of, which we achieve by isomorphism to a contiguous integer
// range [2]. Edges in `exclude` are never drawn.
//
// [1]: https://stackoverflow.com/a/2394292/1779853
// [2]: https://vladfeinberg.com/2020/03/07/subset-isomorphism.html

type Edge = u64;

/// Draws `k` distinct items from `[0, n) - exclude`.
fn sample_without_replacement<R: Rng>(
    rng: &mut R,
    exclude: &HashSet<Edge>,
    n: Edge,
    k: u64,
) -> HashSet<Edge> {
    debug_assert!(exclude.iter().all(|&e| e < n));
    debug_assert!(n >= k + exclude.len() as u64);

    let mut ret = HashSet::new();
    if k == 0 {
        return ret;
    }

    let mut start = n;
    for _ in 0..k {
        start -= 1;
        while exclude.contains(&start) {
            start -= 1;
        }
    }

    for i in start..n {
        if exclude.contains(&i) {
            continue;
        }
        let j = loop {
            let j = rng.gen_range(0..=i);
            if !exclude.contains(&j) {
                break j;
            }
        };
        if ret.contains(&j) {
            ret.insert(i);
        } else {
            ret.insert(j);
        }
    }

    debug_assert!(ret.is_disjoint(exclude));
    debug_assert!(ret.len() as u64 == k);
    ret
}

fn c2(n: Edge) -> Edge {
    n * (n - 1) / 2
}

fn fromtup(i: NodeId, j: NodeId) -> Edge {
    debug_assert!(i < j);
    let j = j - i - 1;
    let diagonal = i + j;
    c2(Edge::from(diagonal) + 1) + Edge::from(i)
}

fn totup(x: Edge) -> (NodeId, NodeId) {
    let larger = (8 * x + 1) as f64;
    let mut diagonal = ((larger.sqrt() as u64) + 1) / 2 - 1;
    // float rounding can land one diagonal off for very large indices
    while c2(diagonal + 2) <= x {
        diagonal += 1;
    }
    while c2(diagonal + 1) > x {
        diagonal -= 1;
    }
    let i = x - c2(diagonal + 1);
    (i as NodeId, (diagonal + 1) as NodeId)
}
