use super::*;
use crate::{
    error::{self, Error},
    Importance, LinkGraph, Page,
};
use algograph::graph::{QueryableGraph, VertexId};
use rand::{
    distr::{weighted::WeightedIndex, Distribution as _},
    seq::IndexedRandom,
    Rng,
};
use std::collections::HashMap;
use tracing::{debug, info};

/// Monte-Carlo estimate of page importance: the visit frequencies of a long
/// random walk driven by the transition model.
pub struct SampledPageRank<'a, R>
where
    R: Rng,
{
    graph: &'a LinkGraph,
    samples: usize,
    rng: R,
    transitions: HashMap<VertexId, (Vec<VertexId>, WeightedIndex<f64>), ahash::RandomState>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub damping: f64,
    pub samples: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            damping: 0.85,
            samples: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Result {
    pub importance: Importance,
    pub visits: HashMap<Page, usize, ahash::RandomState>,
}

impl<'a, R: Rng> SampledPageRank<'a, R> {
    pub fn new(g: &'a LinkGraph, config: &Config, rng: R) -> error::Result<Self> {
        if config.samples == 0 {
            return Err(Error::InvalidParameter {
                name: "samples",
                value: 0.0,
            });
        }
        let model = TransitionModel::new(g, config.damping)?;
        let transitions = {
            let mut transitions = HashMap::with_hasher(ahash::RandomState::new());
            for u in g.graph().iter_vertices() {
                let (sinks, weights): (Vec<_>, Vec<_>) = model.weights(u).into_iter().unzip();
                let dist =
                    WeightedIndex::new(weights).map_err(|e| Error::Sampling(e.to_string()))?;
                transitions.insert(u, (sinks, dist));
            }
            transitions
        };
        debug!(
            pages = g.page_size(),
            samples = config.samples,
            damping = config.damping,
            "sampler ready"
        );
        Ok(Self {
            graph: g,
            samples: config.samples,
            rng,
            transitions,
        })
    }
}

impl<R: Rng> PageRank for SampledPageRank<'_, R> {
    type Result = self::Result;

    fn calc(&mut self) -> error::Result<Self::Result> {
        let vertices: Vec<VertexId> = self.graph.graph().iter_vertices().collect();
        let mut visits: HashMap<VertexId, usize, ahash::RandomState> =
            vertices.iter().map(|v| (*v, 0)).collect();

        // the starting page is the first sample
        let mut u = *vertices.choose(&mut self.rng).ok_or(Error::EmptyGraph)?;
        *visits.entry(u).or_default() += 1;
        for _ in 1..self.samples {
            let (sinks, dist) = &self.transitions[&u];
            u = sinks[dist.sample(&mut self.rng)];
            *visits.entry(u).or_default() += 1;
        }

        let n = self.samples as f64;
        let mut importance = Importance::default();
        let mut counts = HashMap::with_hasher(ahash::RandomState::new());
        for (v, c) in visits.into_iter() {
            let page = self.graph.page(v).to_string();
            importance.insert(page.clone(), c as f64 / n);
            counts.insert(page, c);
        }
        info!(samples = self.samples, "sampling finished");
        Ok(Self::Result {
            importance,
            visits: counts,
        })
    }
}

/// Importance of every page estimated from `samples` steps of a random walk.
pub fn sample<R: Rng>(
    graph: &LinkGraph,
    damping: f64,
    samples: usize,
    rng: R,
) -> error::Result<Importance> {
    let config = Config { damping, samples };
    let mut pr = SampledPageRank::new(graph, &config, rng)?;
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
            let c = self.result.visits.get(page).copied().unwrap_or(0);
            writeln!(f, "{page}: {p:.4}, {c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(3407)
    }

    #[test]
    fn two_pages_linked_both_ways() {
        let g = LinkGraph::new([("1.html", vec!["2.html"]), ("2.html", vec!["1.html"])]);
        let pr = sample(&g, 0.85, 10_000, rng()).unwrap();
        assert!((pr["1.html"] - 0.5).abs() < 0.02, "{pr:?}");
        assert!((pr["2.html"] - 0.5).abs() < 0.02, "{pr:?}");
    }

    #[test]
    fn single_dangling_page() {
        let g = LinkGraph::new([("page", Vec::<&str>::new())]);
        let pr = sample(&g, 0.85, 100, rng()).unwrap();
        assert_eq!(pr.len(), 1);
        assert_eq!(pr["page"], 1.0);
    }

    #[test]
    fn one_sample_is_the_starting_page() {
        let g = LinkGraph::new([
            ("a", vec!["b"]),
            ("b", vec!["c"]),
            ("c", vec!["a"]),
        ]);
        let pr = sample(&g, 0.85, 1, rng()).unwrap();
        assert_eq!(pr.len(), 3);
        assert_eq!(pr.values().filter(|x| **x == 1.0).count(), 1);
        assert_eq!(pr.values().filter(|x| **x == 0.0).count(), 2);
    }

    #[test]
    fn visits_add_up() {
        let g = LinkGraph::new([
            ("a", vec!["b", "c"]),
            ("b", vec!["c"]),
            ("c", vec!["a"]),
            ("d", vec![]),
        ]);
        let config = Config {
            damping: 0.85,
            samples: 1234,
        };
        let res = SampledPageRank::new(&g, &config, rng())
            .unwrap()
            .calc()
            .unwrap();
        assert_eq!(res.visits.values().sum::<usize>(), 1234);
        assert_eq!(res.importance.len(), 4);
        let total: f64 = res.importance.values().sum();
        assert!((total - 1.0).abs() < 1e-9, "{total}");
        for (page, c) in res.visits.iter() {
            assert_eq!(res.importance[page], *c as f64 / 1234.0);
        }
    }

    #[test]
    fn reproducible_with_seed() {
        let g = LinkGraph::new([
            ("a", vec!["b", "c"]),
            ("b", vec!["c"]),
            ("c", vec!["a"]),
            ("d", vec!["a"]),
        ]);
        let x = sample(&g, 0.85, 500, rng()).unwrap();
        let y = sample(&g, 0.85, 500, rng()).unwrap();
        assert_eq!(x, y);
    }

    #[test]
    fn borrowed_rng() {
        let g = LinkGraph::new([("a", vec!["b"]), ("b", vec![])]);
        let mut rng = rng();
        let x = sample(&g, 0.85, 200, &mut rng).unwrap();
        let y = sample(&g, 0.85, 200, &mut rng).unwrap();
        assert_eq!(x.len(), 2);
        assert_eq!(y.len(), 2);
    }

    #[test]
    fn rejects_bad_parameters() {
        let g = LinkGraph::new([("a", vec!["b"]), ("b", vec![])]);
        assert_eq!(
            sample(&g, 0.85, 0, rng()),
            Err(Error::InvalidParameter {
                name: "samples",
                value: 0.0
            })
        );
        assert!(matches!(
            sample(&g, 0.0, 10, rng()),
            Err(Error::InvalidParameter { name: "damping", .. })
        ));
        let empty = LinkGraph::new(Vec::<(String, Vec<String>)>::new());
        assert_eq!(sample(&empty, 0.85, 10, rng()), Err(Error::EmptyGraph));
    }

    #[test]
    fn debug_is_sorted() {
        let g = LinkGraph::new([("b", vec!["a"]), ("a", vec!["b"])]);
        let config = Config {
            damping: 0.85,
            samples: 4,
        };
        let res = SampledPageRank::new(&g, &config, rng())
            .unwrap()
            .calc()
            .unwrap();
        let text = format!("{:?}", res.debug());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("a: "), "{text}");
        assert!(lines[1].starts_with("b: "), "{text}");
    }
}
