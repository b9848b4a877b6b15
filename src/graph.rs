use algograph::graph::*;
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub type Page = String;

/// An immutable corpus of pages and the links between them.
///
/// Self-links, duplicate links and links leaving the corpus are dropped on
/// construction, so every link target is a page of the graph.
#[derive(Debug, Clone)]
pub struct LinkGraph {
    graph: directed::TreeBackedGraph,
    pages: HashMap<VertexId, Page, ahash::RandomState>,
    vertices: HashMap<Page, VertexId, ahash::RandomState>,
}

impl LinkGraph {
    pub fn new<I, P, L, Q>(corpus: I) -> Self
    where
        I: IntoIterator<Item = (P, L)>,
        P: Into<Page>,
        L: IntoIterator<Item = Q>,
        Q: Into<Page>,
    {
        let corpus: Vec<(Page, Vec<Page>)> = corpus
            .into_iter()
            .map(|(page, links)| (page.into(), links.into_iter().map(Into::into).collect()))
            .collect();

        let mut graph = directed::TreeBackedGraph::new();
        let mut pages = HashMap::with_hasher(ahash::RandomState::new());
        let mut vertices = HashMap::with_hasher(ahash::RandomState::new());
        for (page, _) in corpus.iter() {
            if !vertices.contains_key(page) {
                let v = graph.add_vertex();
                vertices.insert(page.clone(), v);
                pages.insert(v, page.clone());
            }
        }

        let mut linked: HashSet<(VertexId, VertexId), ahash::RandomState> =
            HashSet::with_hasher(ahash::RandomState::new());
        let mut dropped = 0usize;
        for (page, links) in corpus.iter() {
            let u = vertices[page];
            for link in links.iter() {
                match vertices.get(link) {
                    Some(&v) if v != u => {
                        if linked.insert((u, v)) {
                            graph.add_edge(u, v);
                        }
                    }
                    _ => dropped += 1,
                }
            }
        }
        debug!(
            pages = graph.vertex_size(),
            links = graph.edge_size(),
            dropped,
            "link graph built"
        );

        Self {
            graph,
            pages,
            vertices,
        }
    }

    pub fn page_size(&self) -> usize {
        self.graph.vertex_size()
    }

    pub fn link_size(&self) -> usize {
        self.graph.edge_size()
    }

    pub fn is_empty(&self) -> bool {
        self.page_size() == 0
    }

    pub fn iter_pages(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.iter_vertices().map(move |v| self.page(v))
    }

    pub fn contains_page(&self, page: &str) -> bool {
        self.vertices.contains_key(page)
    }

    /// Pages linked to by `page`, or `None` if `page` is not in the corpus.
    pub fn links(&self, page: &str) -> Option<impl Iterator<Item = &str> + '_> {
        let u = self.vertex(page)?;
        Some(self.graph.out_edges(&u).map(move |e| self.page(e.sink)))
    }

    pub fn out_degree(&self, page: &str) -> Option<usize> {
        let u = self.vertex(page)?;
        Some(self.graph.out_edges(&u).count())
    }

    pub fn is_dangling(&self, page: &str) -> Option<bool> {
        self.out_degree(page).map(|d| d == 0)
    }

    pub(crate) fn vertex(&self, page: &str) -> Option<VertexId> {
        self.vertices.get(page).copied()
    }

    pub(crate) fn page(&self, v: VertexId) -> &str {
        &self.pages[&v]
    }

    pub(crate) fn graph(&self) -> &directed::TreeBackedGraph {
        &self.graph
    }

    /// A private copy of the underlying graph in which every dangling page
    /// links to all pages, itself included.
    pub(crate) fn with_dangling_links(&self) -> directed::TreeBackedGraph {
        let all: Vec<_> = self.graph.iter_vertices().collect();
        let dangling: Vec<_> = all
            .iter()
            .copied()
            .filter(|u| self.graph.out_edges(u).next().is_none())
            .collect();
        let mut graph = self.graph.clone();
        for u in dangling.iter() {
            for v in all.iter() {
                graph.add_edge(*u, *v);
            }
        }
        debug!(dangling = dangling.len(), "dangling pages linked to the whole corpus");
        graph
    }
}

impl<P, L, Q> FromIterator<(P, L)> for LinkGraph
where
    P: Into<Page>,
    L: IntoIterator<Item = Q>,
    Q: Into<Page>,
{
    fn from_iter<I: IntoIterator<Item = (P, L)>>(iter: I) -> Self {
        Self::new(iter)
    }
}
