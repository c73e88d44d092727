//! Run Command Implementation
//!
//! Drives the full pipeline: read the passenger CSV, print the inferred
//! schema, prepare features on a seeded train/test split, train the
//! selected classifiers, and report per-model held-out accuracy.
//! Configuration can be provided via a JSON file and overridden by
//! command-line arguments.

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use voyage_frame::{CsvReadOptions, DataFrame};
use voyage_metrics::{ModelReport, MulticlassEvaluator};
use voyage_models::prelude::*;
use voyage_pipeline::prelude::*;

/// The classifiers the run command can train.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    /// Binary logistic regression.
    Logistic,
    /// CART decision tree.
    DecisionTree,
    /// Random forest.
    RandomForest,
    /// Gradient-boosted trees.
    Gbt,
    /// Gaussian naive Bayes.
    NaiveBayes,
    /// Linear support-vector classifier.
    LinearSvc,
    /// Multilayer perceptron.
    Mlp,
}

impl ModelKind {
    /// Returns every model kind, in report order.
    pub fn all() -> Vec<ModelKind> {
        vec![
            ModelKind::Logistic,
            ModelKind::DecisionTree,
            ModelKind::RandomForest,
            ModelKind::Gbt,
            ModelKind::NaiveBayes,
            ModelKind::LinearSvc,
            ModelKind::Mlp,
        ]
    }
}

/// Resolved run configuration: config-file values overridden by flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Seed for the split and every stochastic trainer.
    pub seed: u64,
    /// Fraction of rows used for training.
    pub train_fraction: f64,
    /// Fill value for missing ages.
    pub default_age: f64,
    /// Fill value for missing fares.
    pub default_fare: f64,
    /// The label column.
    pub label_col: String,
    /// The models to train, in report order.
    pub models: Vec<ModelKind>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            train_fraction: 0.8,
            default_age: 29.7,
            default_fare: 32.2,
            label_col: "Survived".to_string(),
            models: ModelKind::all(),
        }
    }
}

/// The result of a pipeline run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The inferred schema, rendered as a tree.
    pub schema_tree: String,
    /// One report per trained model, in configured order.
    pub reports: Vec<ModelReport>,
}

/// Train and evaluate survival classifiers
///
/// This command reads the passenger CSV, prints its inferred schema,
/// prepares features (sex and embarkation indexing, age and fare
/// filling, assembly, standardization) on the training split, trains
/// the selected classifiers, and prints held-out accuracy per model.
///
/// # Example
///
/// ```bash
/// voyage run \
///     --data data/titanic.csv \
///     --seed 42 \
///     --train-fraction 0.8
/// ```
#[derive(Args, Debug, Clone)]
pub struct RunCommand {
    /// Path to the passenger CSV file
    #[arg(long, short = 'd', env = "VOYAGE_DATA", default_value = "data/titanic.csv")]
    pub data: PathBuf,

    /// Path to a run configuration file (JSON format)
    #[arg(long, short = 'c', env = "VOYAGE_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Seed for the split and every stochastic trainer
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fraction of rows used for training (the rest evaluate)
    #[arg(long)]
    pub train_fraction: Option<f64>,

    /// Fill value for missing ages
    #[arg(long)]
    pub default_age: Option<f64>,

    /// Fill value for missing fares
    #[arg(long)]
    pub default_fare: Option<f64>,

    /// Train only these models (comma-separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub models: Vec<ModelKind>,
}

impl RunCommand {
    /// Resolves options: defaults, then the config file, then flags.
    pub fn options(&self) -> Result<RunOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => RunOptions::default(),
        };
        if let Some(seed) = self.seed {
            options.seed = seed;
        }
        if let Some(fraction) = self.train_fraction {
            options.train_fraction = fraction;
        }
        if let Some(age) = self.default_age {
            options.default_age = age;
        }
        if let Some(fare) = self.default_fare {
            options.default_fare = fare;
        }
        if !self.models.is_empty() {
            options.models = self.models.clone();
        }
        if options.train_fraction <= 0.0 || options.train_fraction >= 1.0 {
            bail!(
                "train fraction must be strictly between 0 and 1, got {}",
                options.train_fraction
            );
        }
        Ok(options)
    }

    /// Runs the pipeline and prints schema and accuracy lines.
    pub fn run(&self) -> Result<()> {
        let outcome = self.execute()?;
        print!("{}", outcome.schema_tree);
        for report in &outcome.reports {
            println!("{}", report.report_line());
        }
        Ok(())
    }

    /// Runs the pipeline, returning the schema tree and per-model reports.
    pub fn execute(&self) -> Result<RunOutcome> {
        let options = self.options()?;
        let frame = DataFrame::read_csv(&self.data, CsvReadOptions::default())
            .with_context(|| format!("failed to read {}", self.data.display()))?;
        let schema_tree = frame.schema().tree_string();
        info!(
            rows = frame.num_rows(),
            columns = frame.num_columns(),
            "loaded passenger table"
        );

        let splits = frame.random_split(
            &[options.train_fraction, 1.0 - options.train_fraction],
            options.seed,
        )?;
        let (train, test) = (&splits[0], &splits[1]);
        if test.num_rows() == 0 {
            bail!("train fraction {} leaves no evaluation rows", options.train_fraction);
        }

        let assembler = VectorAssembler::new(
            vec![
                "Pclass".to_string(),
                "SexIndex".to_string(),
                "Age".to_string(),
                "SibSp".to_string(),
                "Parch".to_string(),
                "Fare".to_string(),
                "EmbarkedIndex".to_string(),
            ],
            "features",
        );
        let feature_cols = assembler.output_columns();

        let pipeline = Pipeline::new()
            .add_estimator(StringIndexer::new("Sex", "SexIndex"))
            .add_estimator(
                StringIndexer::new("Embarked", "EmbarkedIndex")
                    .with_handle_invalid(HandleInvalid::Keep),
            )
            .add_estimator(
                Imputer::new()
                    .with_column("Age", ImputeStrategy::Value(options.default_age))
                    .with_column("Fare", ImputeStrategy::Value(options.default_fare)),
            )
            .add_transformer(assembler)
            .add_estimator(StandardScaler::new(feature_cols.clone()));

        let model = pipeline.fit(train)?;
        let train_prepared = model.transform(train)?;
        let test_prepared = model.transform(test)?;
        info!(
            train_rows = train_prepared.num_rows(),
            test_rows = test_prepared.num_rows(),
            features = feature_cols.len(),
            "prepared features"
        );

        let train_data =
            LabeledData::from_frame(&train_prepared, &feature_cols, &options.label_col)?;
        let evaluator = MulticlassEvaluator::new("prediction", options.label_col.as_str());

        let mut reports = Vec::with_capacity(options.models.len());
        for kind in &options.models {
            let fitted = fit_model(*kind, &train_data, options.seed)?;
            let predicted = fitted.transform(&test_prepared, &feature_cols, "prediction")?;
            let accuracy = evaluator.evaluate(&predicted)?;
            info!(model = fitted.name(), accuracy, "evaluated model");
            reports.push(ModelReport::new(fitted.name(), accuracy));
        }

        Ok(RunOutcome {
            schema_tree,
            reports,
        })
    }
}

/// Trains one classifier on the prepared training data.
fn fit_model(
    kind: ModelKind,
    data: &LabeledData,
    seed: u64,
) -> Result<Box<dyn ClassificationModel>> {
    Ok(match kind {
        ModelKind::Logistic => {
            Box::new(LogisticRegression::new().with_max_iter(200).fit(data)?)
        }
        ModelKind::DecisionTree => Box::new(DecisionTree::new().fit(data)?),
        ModelKind::RandomForest => Box::new(RandomForest::new().with_seed(seed).fit(data)?),
        ModelKind::Gbt => Box::new(GradientBoostedTrees::new().fit(data)?),
        ModelKind::NaiveBayes => Box::new(NaiveBayes::new().fit(data)?),
        ModelKind::LinearSvc => Box::new(LinearSvc::new().with_seed(seed).fit(data)?),
        ModelKind::Mlp => Box::new(MlpClassifier::new().with_seed(seed).fit(data)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let options = RunOptions::default();
        assert_eq!(options.seed, 42);
        assert_eq!(options.train_fraction, 0.8);
        assert_eq!(options.default_age, 29.7);
        assert_eq!(options.default_fare, 32.2);
        assert_eq!(options.models.len(), 7);
    }

    #[test]
    fn test_options_json_partial_override() {
        let options: RunOptions =
            serde_json::from_str(r#"{"seed": 7, "models": ["logistic", "mlp"]}"#).unwrap();
        assert_eq!(options.seed, 7);
        assert_eq!(options.train_fraction, 0.8);
        assert_eq!(
            options.models,
            vec![ModelKind::Logistic, ModelKind::Mlp]
        );
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        write!(file, r#"{{"seed": 7, "default_age": 25.0}}"#).unwrap();
        file.flush().unwrap();

        let command = RunCommand {
            data: PathBuf::from("unused.csv"),
            config: Some(file.path().to_path_buf()),
            seed: Some(99),
            train_fraction: None,
            default_age: None,
            default_fare: None,
            models: vec![ModelKind::Gbt],
        };
        let options = command.options().unwrap();
        assert_eq!(options.seed, 99);
        assert_eq!(options.default_age, 25.0);
        assert_eq!(options.models, vec![ModelKind::Gbt]);
    }

    #[test]
    fn test_bad_train_fraction_rejected() {
        let command = RunCommand {
            data: PathBuf::from("unused.csv"),
            config: None,
            seed: None,
            train_fraction: Some(1.0),
            default_age: None,
            default_fare: None,
            models: Vec::new(),
        };
        assert!(command.options().is_err());
    }
}
