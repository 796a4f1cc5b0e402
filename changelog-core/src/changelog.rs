use chrono::{DateTime, Utc};
use graph::{resolve, walk, Endpoint, HistoryStore, ObjectId};
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::model::{ReportBuilder, ReportModel};
use crate::render::Renderer;

/// A generated report and the commits it covers
#[derive(Debug, Clone)]
pub struct Report {
    pub start: ObjectId,
    pub end: ObjectId,
    pub chain: Vec<ObjectId>,
    pub model: ReportModel,
    pub text: String,
}

/// Changelog generation over one history store
pub struct Changelog<S: HistoryStore> {
    store: S,
    builder: ReportBuilder,
    renderer: Renderer,
}

impl<S: HistoryStore> Changelog<S> {
    /// Validate the configuration and compile its templates
    pub fn new(store: S, config: &Config) -> Result<Self> {
        config.validate()?;
        let builder = ReportBuilder::new(config)?;
        let renderer = Renderer::new(&config.templates, &config.time_zones)?;

        Ok(Changelog {
            store,
            builder,
            renderer,
        })
    }

    /// Generate the report for the commits after `start` up to `end`
    pub fn generate(&self, start: &str, end: &str) -> Result<Report> {
        self.generate_at(start, end, Utc::now())
    }

    /// Same as [`generate`](Self::generate) with a fixed generation time
    pub fn generate_at(&self, start: &str, end: &str, now: DateTime<Utc>) -> Result<Report> {
        let end_commit = resolve(&self.store, &Endpoint::end(end))?;
        let start_commit = resolve(&self.store, &Endpoint::start(start))?;
        info!("end-commit = {}, start-commit = {}", end_commit.id, start_commit.id);

        let chain = walk(&self.store, &end_commit, &start_commit)?;
        let model = self
            .builder
            .build(&self.store, &chain, &start_commit.id, &end_commit.id, now)?;
        let text = self.renderer.render(&model)?;

        Ok(Report {
            start: start_commit.id,
            end: end_commit.id,
            chain,
            model,
            text,
        })
    }
}
