//! Classification trainers for the voyage pipeline.
//!
//! This crate provides the seven classifiers the pipeline trains on
//! prepared passenger features, all consuming the same [`LabeledData`]
//! extraction and producing fitted models behind the
//! [`ClassificationModel`] trait:
//!
//! - **LogisticRegression**: full-batch gradient descent on the log loss
//! - **DecisionTree**: CART with Gini impurity splits
//! - **RandomForest**: seeded bagging with feature subsampling, trained
//!   in parallel
//! - **GradientBoostedTrees**: logit boosting over regression trees
//! - **NaiveBayes**: Gaussian likelihoods with variance smoothing
//! - **LinearSvc**: hinge loss via Pegasos-style subgradient descent
//! - **MlpClassifier**: dense layers with a softmax head and
//!   cross-entropy backpropagation
//!
//! # Quick Start
//!
//! ```
//! use voyage_models::prelude::*;
//!
//! let features = Matrix::from_rows(vec![
//!     vec![-1.0, -1.0],
//!     vec![-0.9, -1.1],
//!     vec![1.0, 1.1],
//!     vec![1.1, 0.9],
//! ])
//! .unwrap();
//! let data = LabeledData::new(features, vec![0.0, 0.0, 1.0, 1.0]).unwrap();
//!
//! let model = DecisionTree::new().fit(&data).unwrap();
//! let predictions = model.predict(data.features()).unwrap();
//! assert_eq!(predictions, data.labels());
//! ```
//!
//! # Determinism
//!
//! Every stochastic trainer (forest bootstrap, SVC shuffling, perceptron
//! initialization and minibatch order) derives all randomness from its
//! configured seed, so a fixed seed reproduces the fitted model exactly.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bayes;
pub mod data;
pub mod dense;
pub mod error;
pub mod forest;
pub mod gbt;
pub mod logistic;
pub mod matrix;
pub mod mlp;
pub mod model;
pub mod svc;
pub mod tree;

pub use bayes::{NaiveBayes, NaiveBayesModel};
pub use data::{features_from_frame, LabeledData};
pub use error::{ModelError, ModelResult};
pub use forest::{FeatureSubset, RandomForest, RandomForestModel};
pub use gbt::{GradientBoostedTrees, GradientBoostedTreesModel};
pub use logistic::{LogisticRegression, LogisticRegressionModel};
pub use matrix::Matrix;
pub use mlp::{MlpClassifier, MlpClassifierModel};
pub use model::ClassificationModel;
pub use svc::{LinearSvc, LinearSvcModel};
pub use tree::{DecisionTree, DecisionTreeModel};

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::bayes::{NaiveBayes, NaiveBayesModel};
    pub use crate::data::{features_from_frame, LabeledData};
    pub use crate::error::{ModelError, ModelResult};
    pub use crate::forest::{FeatureSubset, RandomForest, RandomForestModel};
    pub use crate::gbt::{GradientBoostedTrees, GradientBoostedTreesModel};
    pub use crate::logistic::{LogisticRegression, LogisticRegressionModel};
    pub use crate::matrix::Matrix;
    pub use crate::mlp::{MlpClassifier, MlpClassifierModel};
    pub use crate::model::ClassificationModel;
    pub use crate::svc::{LinearSvc, LinearSvcModel};
    pub use crate::tree::{DecisionTree, DecisionTreeModel};
}
