//! Centrality rankings over a finished link graph.
//!
//! All three measures return `(url, score)` pairs stable-sorted descending
//! by score, so tied nodes keep graph insertion order and reruns on an
//! unchanged graph produce identical output. Conventions for directed
//! graphs with unreachable pairs follow the common library defaults:
//! unreachable pairs simply contribute nothing.

use petgraph::Direction;
use sitegraph_crawler::LinkGraph;
use std::collections::VecDeque;

/// Degree centrality: (in-degree + out-degree) / (n - 1).
///
/// A graph with a single node scores it 1.0 rather than dividing by zero.
pub fn degree_centrality(graph: &LinkGraph) -> Vec<(String, f64)> {
    let g = graph.inner();
    let n = g.node_count();
    let mut scores: Vec<(String, f64)> = Vec::with_capacity(n);
    for ix in g.node_indices() {
        let score = if n <= 1 {
            1.0
        } else {
            let degree = g.neighbors_directed(ix, Direction::Incoming).count()
                + g.neighbors_directed(ix, Direction::Outgoing).count();
            degree as f64 / (n - 1) as f64
        };
        scores.push((g[ix].clone(), score));
    }
    sort_descending(scores)
}

/// Closeness centrality on the directed graph as-is (not symmetrized).
///
/// Distances are measured along incoming paths, with the Wasserman-Faust
/// reachable-fraction scaling: for node u, over the r nodes that can
/// reach u at total shortest-path distance d_tot,
/// `C(u) = ((r - 1) / d_tot) * ((r - 1) / (n - 1))`.
/// A node nothing links to scores 0.0.
pub fn closeness_centrality(graph: &LinkGraph) -> Vec<(String, f64)> {
    let g = graph.inner();
    let n = g.node_count();
    let mut scores: Vec<(String, f64)> = Vec::with_capacity(n);
    for ix in g.node_indices() {
        let mut dist = vec![-1i64; n];
        dist[ix.index()] = 0;
        let mut queue = VecDeque::from([ix]);
        let mut reachable = 1usize;
        let mut total = 0i64;
        while let Some(v) = queue.pop_front() {
            let next = dist[v.index()] + 1;
            for u in g.neighbors_directed(v, Direction::Incoming) {
                if dist[u.index()] < 0 {
                    dist[u.index()] = next;
                    total += next;
                    reachable += 1;
                    queue.push_back(u);
                }
            }
        }
        let score = if total > 0 && n > 1 {
            let closeness = (reachable - 1) as f64 / total as f64;
            let fraction = (reachable - 1) as f64 / (n - 1) as f64;
            closeness * fraction
        } else {
            0.0
        };
        scores.push((g[ix].clone(), score));
    }
    sort_descending(scores)
}

/// Betweenness centrality via Brandes' accumulation on the directed,
/// unweighted graph. Endpoints are excluded; scores are normalized by
/// 1 / ((n - 1)(n - 2)) when n > 2 (below that every score is zero
/// anyway).
pub fn betweenness_centrality(graph: &LinkGraph) -> Vec<(String, f64)> {
    let g = graph.inner();
    let n = g.node_count();
    let mut centrality = vec![0.0f64; n];

    for s in g.node_indices() {
        // Single-source shortest-path counts.
        let mut stack = Vec::with_capacity(n);
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut dist = vec![-1i64; n];
        sigma[s.index()] = 1.0;
        dist[s.index()] = 0;
        let mut queue = VecDeque::from([s]);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let next = dist[v.index()] + 1;
            let sigma_v = sigma[v.index()];
            for w in g.neighbors_directed(v, Direction::Outgoing) {
                if dist[w.index()] < 0 {
                    dist[w.index()] = next;
                    queue.push_back(w);
                }
                if dist[w.index()] == next {
                    sigma[w.index()] += sigma_v;
                    preds[w.index()].push(v.index());
                }
            }
        }

        // Dependency accumulation in reverse BFS order.
        let mut delta = vec![0.0f64; n];
        while let Some(w) = stack.pop() {
            let wi = w.index();
            let coefficient = (1.0 + delta[wi]) / sigma[wi];
            for &vi in &preds[wi] {
                delta[vi] += sigma[vi] * coefficient;
            }
            if w != s {
                centrality[wi] += delta[wi];
            }
        }
    }

    let scale = if n > 2 {
        1.0 / ((n - 1) as f64 * (n - 2) as f64)
    } else {
        1.0
    };

    let scores = g
        .node_indices()
        .map(|ix| (g[ix].clone(), centrality[ix.index()] * scale))
        .collect();
    sort_descending(scores)
}

fn sort_descending(mut scores: Vec<(String, f64)>) -> Vec<(String, f64)> {
    scores.sort_by(|a, b| b.1.total_cmp(&a.1));
    scores
}
