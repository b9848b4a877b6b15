use super::*;
use crate::{
    common::renormalize,
    error::{self, check_damping, check_positive, Error},
    norm_inf, Importance, LinkGraph,
};
use algograph::graph::{QueryableGraph, VertexId};
use std::{
    collections::{BTreeMap, HashMap},
    time::{Duration, Instant},
};
use tracing::{debug, info, trace, warn};

/// Power iteration over the rank recurrence
/// `rank(p) = (1 - damping) / N + damping * sum(rank(k) / outdeg(k))`
/// where `k` ranges over pages linking to `p`.
///
/// Dangling pages are treated as linking to every page. That fix-up lives in
/// a private copy; the borrowed graph is never modified.
pub struct IteratedPageRank<'a> {
    graph: &'a LinkGraph,
    damping: f64,
    tolerance: f64,
    max_iterations: usize,
    time_budget: Option<Duration>,
    transitions: BTreeMap<(VertexId, VertexId), f64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub damping: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub time_budget: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            damping: 0.85,
            tolerance: 0.001,
            max_iterations: 10_000,
            time_budget: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Result {
    pub importance: Importance,
    pub delta: Importance,
    pub iterations: usize,
}

type Ranks = HashMap<VertexId, f64, ahash::RandomState>;

impl<'a> IteratedPageRank<'a> {
    pub fn new(g: &'a LinkGraph, config: &Config) -> error::Result<Self> {
        let damping = config.damping;
        check_damping(damping)?;
        let tolerance = config.tolerance;
        check_positive("tolerance", tolerance)?;
        if config.max_iterations == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iterations",
                value: 0.0,
            });
        }
        if g.is_empty() {
            return Err(Error::EmptyGraph);
        }

        let transitions = {
            let working = g.with_dangling_links();
            let mut transitions = BTreeMap::new();
            for u in working.iter_vertices() {
                let n = working.out_edges(&u).count();
                let unit = 1.0 / (n as f64);
                for v in working.out_edges(&u).map(|e| e.sink) {
                    *transitions.entry((u, v)).or_insert(0.0) += unit;
                }
            }
            transitions
        };
        debug!(
            pages = g.page_size(),
            transitions = transitions.len(),
            damping,
            tolerance,
            "solver ready"
        );
        Ok(Self {
            graph: g,
            damping,
            tolerance,
            max_iterations: config.max_iterations,
            time_budget: config.time_budget,
            transitions,
        })
    }

    /// Iterates from `start` instead of the uniform distribution.
    ///
    /// Pages missing from `start` begin at zero. The values must sum to 1.
    pub fn calc_from(&self, start: &Importance) -> error::Result<self::Result> {
        if let Some(page) = start.keys().find(|page| !self.graph.contains_page(page)) {
            return Err(Error::UnknownPage(page.clone()));
        }
        let p: Ranks = self
            .graph
            .graph()
            .iter_vertices()
            .map(|v| {
                let w = start.get(self.graph.page(v)).copied().unwrap_or(0.0);
                (v, w)
            })
            .collect();
        let p_sum: f64 = p.values().sum();
        let valid = p.values().all(|w| w.is_finite() && *w >= 0.0);
        if !valid || (p_sum - 1.0).abs() > 1e-7 {
            return Err(Error::InvalidParameter {
                name: "start",
                value: p_sum,
            });
        }
        self.run(p)
    }

    fn run(&self, mut p: Ranks) -> error::Result<self::Result> {
        let started = Instant::now();
        let mut iterations = 0;
        loop {
            let mut r = self.sweep(&p);
            iterations += 1;

            let delta: Ranks = r.iter().map(|(v, b)| (*v, b - p[v])).collect();
            let max_delta = norm_inf(&delta);
            trace!(iterations, max_delta, "sweep");

            if max_delta <= self.tolerance {
                renormalize(&mut r);
                info!(iterations, max_delta, "iteration converged");
                return Ok(self::Result {
                    importance: self.by_page(r),
                    delta: self.by_page(delta),
                    iterations,
                });
            }

            let out_of_time = self
                .time_budget
                .is_some_and(|budget| started.elapsed() >= budget);
            if iterations >= self.max_iterations || out_of_time {
                warn!(iterations, max_delta, out_of_time, "iteration did not converge");
                return Err(Error::DidNotConverge {
                    iterations,
                    delta: max_delta,
                });
            }
            p = r;
        }
    }

    fn sweep(&self, p: &Ranks) -> Ranks {
        let n = p.len() as f64;
        let teleport = (1.0 - self.damping) / n;
        let mut r: Ranks = p.keys().map(|v| (*v, teleport)).collect();
        for ((u, v), w) in self.transitions.iter() {
            let from = p[u];
            if let Some(to) = r.get_mut(v) {
                *to += self.damping * from * w;
            }
        }
        r
    }

    fn by_page(&self, xs: Ranks) -> Importance {
        xs.into_iter()
            .map(|(v, x)| (self.graph.page(v).to_string(), x))
            .collect()
    }
}

impl PageRank for IteratedPageRank<'_> {
    type Result = self::Result;

    fn calc(&mut self) -> error::Result<Self::Result> {
        let n = self.graph.page_size() as f64;
        let start: Ranks = self
            .graph
            .graph()
            .iter_vertices()
            .map(|v| (v, 1.0 / n))
            .collect();
        self.run(start)
    }
}

/// Importance of every page by iterating the rank recurrence until no page
/// changes by more than `tolerance`.
pub fn iterate(graph: &LinkGraph, damping: f64, tolerance: f64) -> error::Result<Importance> {
    let config = Config {
        damping,
        tolerance,
        ..Config::default()
    };
    let mut pr = IteratedPageRank::new(graph, &config)?;
    Ok(pr.calc()?.importance)
}

impl PageRankResult for self::Result {
    fn importance(&self) -> &Importance {
        &self.importance
    }

    fn debug(&self) -> impl std::fmt::Debug + '_ {
        ResultDebug { result: self }
    }
}

pub struct ResultDebug<'a> {
    result: &'a self::Result,
}

impl std::fmt::Debug for ResultDebug<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut pages: Vec<_> = self.result.importance.keys().collect();
        pages.sort();
        for page in pages {
            let p = self.result.importance[page];
            let d = self.result.delta.get(page).copied().unwrap_or(0.0);
            writeln!(f, "{page}: {p:.4}, {d:?}")?;
        }
        Ok(())
    }
}
