//! Every trainer against the same synthetic two-cluster task.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use voyage_models::prelude::*;

/// Two noisy Gaussian-ish clusters in four dimensions, 120 rows.
fn clusters(seed: u64) -> LabeledData {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for i in 0..120 {
        let class = i % 2;
        let center = if class == 0 { -1.0 } else { 1.0 };
        let row: Vec<f64> = (0..4)
            .map(|_| center + rng.gen_range(-0.8..0.8))
            .collect();
        rows.push(row);
        labels.push(class as f64);
    }
    LabeledData::new(Matrix::from_rows(rows).unwrap(), labels).unwrap()
}

fn accuracy(model: &dyn ClassificationModel, data: &LabeledData) -> f64 {
    let predictions = model.predict(data.features()).unwrap();
    let correct = predictions
        .iter()
        .zip(data.labels())
        .filter(|(p, l)| p == l)
        .count();
    correct as f64 / data.len() as f64
}

#[test]
fn all_models_clear_a_loose_floor() {
    let train = clusters(1);
    let test = clusters(2);

    let models: Vec<Box<dyn ClassificationModel>> = vec![
        Box::new(LogisticRegression::new().with_max_iter(300).fit(&train).unwrap()),
        Box::new(DecisionTree::new().fit(&train).unwrap()),
        Box::new(RandomForest::new().fit(&train).unwrap()),
        Box::new(GradientBoostedTrees::new().fit(&train).unwrap()),
        Box::new(NaiveBayes::new().fit(&train).unwrap()),
        Box::new(LinearSvc::new().fit(&train).unwrap()),
        Box::new(
            MlpClassifier::new()
                .with_max_iter(300)
                .with_learning_rate(0.2)
                .fit(&train)
                .unwrap(),
        ),
    ];

    for model in &models {
        let acc = accuracy(model.as_ref(), &test);
        assert!(
            acc > 0.8,
            "{} reached only {:.2} held-out accuracy",
            model.name(),
            acc
        );
    }
}

#[test]
fn predictions_are_valid_class_indices() {
    let train = clusters(3);
    let model = RandomForest::new().with_num_trees(5).fit(&train).unwrap();
    for p in model.predict(train.features()).unwrap() {
        assert!(p == 0.0 || p == 1.0);
    }
}

#[test]
fn dimension_mismatch_is_reported() {
    let train = clusters(4);
    let model = LogisticRegression::new().fit(&train).unwrap();
    let narrow = Matrix::zeros(3, 2);
    match model.predict(&narrow) {
        Err(ModelError::DimensionMismatch { expected, actual }) => {
            assert_eq!(expected, 4);
            assert_eq!(actual, 2);
        }
        other => panic!("unexpected result: {:?}", other.map(|v| v.len())),
    }
}
