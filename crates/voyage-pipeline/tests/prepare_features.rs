use voyage_frame::prelude::*;
use voyage_pipeline::prelude::*;

fn passenger_frame() -> DataFrame {
    DataFrame::new(vec![
        Column::from_i64("Pclass", vec![3, 1, 3, 1, 3, 2]),
        Column::from_str_values(
            "Sex",
            vec![
                "male".into(),
                "female".into(),
                "female".into(),
                "male".into(),
                "male".into(),
                "female".into(),
            ],
        ),
        Column::from_f64_options(
            "Age",
            vec![Some(22.0), Some(38.0), None, Some(54.0), Some(35.0), Some(14.0)],
        ),
        Column::from_f64(
            "Fare",
            vec![7.25, 71.28, 7.92, 51.86, 8.05, 30.07],
        ),
        Column::from_str_options(
            "Embarked",
            vec![
                Some("S".into()),
                Some("C".into()),
                Some("S".into()),
                Some("S".into()),
                None,
                Some("C".into()),
            ],
        ),
    ])
    .unwrap()
}

#[test]
fn full_preparation_pipeline() {
    let frame = passenger_frame();
    let assembler = VectorAssembler::new(
        vec![
            "Pclass".into(),
            "SexIndex".into(),
            "Age".into(),
            "Fare".into(),
            "EmbarkedIndex".into(),
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
        .add_estimator(Imputer::new().with_column("Age", ImputeStrategy::Value(29.7)))
        .add_transformer(assembler)
        .add_estimator(StandardScaler::new(feature_cols.clone()));

    let model = pipeline.fit(&frame).unwrap();
    let prepared = model.transform(&frame).unwrap();

    // Same rows, raw columns kept, feature block appended.
    assert_eq!(prepared.num_rows(), 6);
    for name in &feature_cols {
        let col = prepared.column(name).unwrap();
        assert_eq!(col.null_count(), 0);
    }

    // Each feature column is standardized against the fit data.
    for name in &feature_cols {
        let values: Vec<f64> = prepared
            .column(name)
            .unwrap()
            .f64_values()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        let mean: f64 = values.iter().sum::<f64>() / values.len() as f64;
        assert!(mean.abs() < 1e-9, "column {} not centered: {}", name, mean);
    }
}

#[test]
fn fitted_pipeline_replays_on_new_rows() {
    let train = passenger_frame();
    let pipeline = Pipeline::new()
        .add_estimator(StringIndexer::new("Sex", "SexIndex"))
        .add_estimator(Imputer::new().with_column("Age", ImputeStrategy::Mean));

    let model = pipeline.fit(&train).unwrap();

    let test = DataFrame::new(vec![
        Column::from_i64("Pclass", vec![2]),
        Column::from_str_values("Sex", vec!["female".into()]),
        Column::from_f64_options("Age", vec![None]),
        Column::from_f64("Fare", vec![13.0]),
        Column::from_str_options("Embarked", vec![Some("Q".into())]),
    ])
    .unwrap();

    let out = model.transform(&test).unwrap();
    // Mean age over the fit data (null excluded): (22+38+54+35+14)/5.
    assert_eq!(out.column("Age").unwrap().f64_value(0).unwrap(), Some(32.6));
    // "female" indexed with the vocabulary fitted on train data.
    let sex_index = out.column("SexIndex").unwrap().f64_value(0).unwrap();
    assert!(sex_index == Some(0.0) || sex_index == Some(1.0));
}
