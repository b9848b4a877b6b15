use crate::{error, Importance};

pub trait PageRank {
    type Result: PageRankResult;

    fn calc(&mut self) -> error::Result<Self::Result>;
}

pub trait PageRankResult {
    fn importance(&self) -> &Importance;
    fn debug(&self) -> impl std::fmt::Debug + '_;
}
