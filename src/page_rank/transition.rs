use crate::{
    error::{self, check_damping, Error},
    Distribution, LinkGraph,
};
use algograph::graph::*;
use std::collections::BTreeMap;

/// The random surfer's next-page distribution for every page of a graph.
///
/// With probability `damping` the surfer follows one of the current page's
/// links, otherwise it jumps to any page of the corpus. A page without links
/// behaves as if it linked to every page.
pub struct TransitionModel<'a> {
    graph: &'a LinkGraph,
    damping: f64,
}

impl<'a> TransitionModel<'a> {
    pub fn new(graph: &'a LinkGraph, damping: f64) -> error::Result<Self> {
        check_damping(damping)?;
        if graph.is_empty() {
            return Err(Error::EmptyGraph);
        }
        Ok(Self { graph, damping })
    }

    pub fn distribution(&self, page: &str) -> error::Result<Distribution> {
        let u = self
            .graph
            .vertex(page)
            .ok_or_else(|| Error::UnknownPage(page.to_string()))?;
        Ok(self
            .weights(u)
            .into_iter()
            .map(|(v, w)| (self.graph.page(v).to_string(), w))
            .collect())
    }

    pub(crate) fn weights(&self, u: VertexId) -> Vec<(VertexId, f64)> {
        let g = self.graph.graph();
        let n = g.vertex_size() as f64;
        let teleport = (1.0 - self.damping) / n;
        let mut weights: BTreeMap<VertexId, f64> =
            g.iter_vertices().map(|v| (v, teleport)).collect();

        let sinks: Vec<_> = g.out_edges(&u).map(|e| e.sink).collect();
        if sinks.is_empty() {
            let unit = self.damping / n;
            weights.values_mut().for_each(|w| *w += unit);
        } else {
            let unit = self.damping / (sinks.len() as f64);
            for v in sinks.iter() {
                if let Some(w) = weights.get_mut(v) {
                    *w += unit;
                }
            }
        }
        weights.into_iter().collect()
    }
}

/// Next-page distribution of a single `page`.
pub fn transition_model(graph: &LinkGraph, page: &str, damping: f64) -> error::Result<Distribution> {
    TransitionModel::new(graph, damping)?.distribution(page)
}
