//! The stage traits and the [`Pipeline`] that chains them.
//!
//! Stages come in two kinds. A [`Transformer`] maps a frame to a new frame
//! by a fixed rule. An [`Estimator`] must first see data: its `fit` method
//! produces a fitted transformer. A [`Pipeline`] holds an ordered mix of
//! both; fitting the pipeline fits each estimator on the frame as
//! transformed by everything before it, and yields a [`PipelineModel`]
//! that replays the fitted sequence.
//!
//! # Example
//!
//! ```
//! use voyage_frame::prelude::*;
//! use voyage_pipeline::prelude::*;
//!
//! let frame = DataFrame::new(vec![
//!     Column::from_str_values("Sex", vec!["male".into(), "female".into(), "male".into()]),
//!     Column::from_f64("Fare", vec![7.25, 71.28, 8.05]),
//! ])
//! .unwrap();
//!
//! let pipeline = Pipeline::new()
//!     .add_estimator(StringIndexer::new("Sex", "SexIndex"))
//!     .add_transformer(VectorAssembler::new(vec!["SexIndex".into(), "Fare".into()], "features"));
//!
//! let model = pipeline.fit(&frame).unwrap();
//! let prepared = model.transform(&frame).unwrap();
//! assert!(prepared.has_column("features_0"));
//! assert!(prepared.has_column("features_1"));
//! ```

use crate::error::PipelineResult;
use std::sync::Arc;
use tracing::{debug, info};
use voyage_frame::DataFrame;

/// A fitted or stateless stage that maps a frame to a new frame.
pub trait Transformer: Send + Sync + std::fmt::Debug {
    /// Applies the transform, returning a new frame.
    fn transform(&self, frame: &DataFrame) -> PipelineResult<DataFrame>;

    /// Returns the name of this transformer for logging and debugging.
    fn name(&self) -> &str {
        "Transformer"
    }
}

/// A stage that must be fitted on data before it can transform.
pub trait Estimator: Send + Sync {
    /// Fits the estimator on a frame, producing a fitted transformer.
    fn fit(&self, frame: &DataFrame) -> PipelineResult<Box<dyn Transformer>>;

    /// Returns the name of this estimator for logging and debugging.
    fn name(&self) -> &str {
        "Estimator"
    }
}

/// One stage of a pipeline.
enum Stage {
    Estimator(Box<dyn Estimator>),
    Transformer(Arc<dyn Transformer>),
}

impl Stage {
    fn name(&self) -> &str {
        match self {
            Stage::Estimator(e) => e.name(),
            Stage::Transformer(t) => t.name(),
        }
    }
}

/// An ordered sequence of stages.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Appends an estimator stage.
    pub fn add_estimator(mut self, estimator: impl Estimator + 'static) -> Self {
        self.stages.push(Stage::Estimator(Box::new(estimator)));
        self
    }

    /// Appends a stateless transformer stage.
    pub fn add_transformer(mut self, transformer: impl Transformer + 'static) -> Self {
        self.stages.push(Stage::Transformer(Arc::new(transformer)));
        self
    }

    /// Returns the number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Fits the pipeline left to right.
    ///
    /// Each estimator is fitted on the frame as transformed by all prior
    /// stages, then its fitted transformer is applied before the next
    /// stage runs. The input frame is never modified.
    pub fn fit(&self, frame: &DataFrame) -> PipelineResult<PipelineModel> {
        let mut current = frame.clone();
        let mut fitted: Vec<Arc<dyn Transformer>> = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            debug!(stage = stage.name(), rows = current.num_rows(), "fitting stage");
            let transformer: Arc<dyn Transformer> = match stage {
                Stage::Estimator(estimator) => Arc::from(estimator.fit(&current)?),
                Stage::Transformer(transformer) => Arc::clone(transformer),
            };
            current = transformer.transform(&current)?;
            fitted.push(transformer);
        }
        info!(stages = fitted.len(), "fitted pipeline");
        Ok(PipelineModel { stages: fitted })
    }
}

/// A fitted pipeline: the transformer sequence produced by [`Pipeline::fit`].
#[derive(Debug)]
pub struct PipelineModel {
    stages: Vec<Arc<dyn Transformer>>,
}

impl PipelineModel {
    /// Returns the fitted stages in application order.
    pub fn stages(&self) -> &[Arc<dyn Transformer>] {
        &self.stages
    }
}

impl Transformer for PipelineModel {
    fn transform(&self, frame: &DataFrame) -> PipelineResult<DataFrame> {
        let mut current = frame.clone();
        for stage in &self.stages {
            current = stage.transform(&current)?;
        }
        Ok(current)
    }

    fn name(&self) -> &str {
        "PipelineModel"
    }
}
