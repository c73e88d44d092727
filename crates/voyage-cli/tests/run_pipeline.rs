//! End-to-end pipeline run over a synthetic passenger table.

use std::io::Write;
use std::path::PathBuf;

use voyage_cli::commands::run::{ModelKind, RunCommand};

/// Writes a 120-row passenger CSV whose survival is almost fully
/// determined by sex, with nulls sprinkled over Age, Cabin, and Embarked.
fn synthetic_csv() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "PassengerId,Survived,Pclass,Name,Sex,Age,SibSp,Parch,Ticket,Fare,Cabin,Embarked"
    )
    .unwrap();
    for i in 0..120u32 {
        let sex = if i % 3 == 0 { "male" } else { "female" };
        let survived = match sex {
            "male" => u32::from(i % 9 == 4),
            _ => u32::from(i % 10 != 7),
        };
        let age = if i % 5 == 0 {
            String::new()
        } else {
            format!("{}", 18 + (i % 40))
        };
        let fare = 8.0 + (i % 50) as f64 * 1.5;
        let embarked = match i % 15 {
            14 => "",
            n if n % 3 == 0 => "S",
            n if n % 3 == 1 => "C",
            _ => "Q",
        };
        let cabin = if i % 4 == 0 { format!("C{}", i) } else { String::new() };
        writeln!(
            file,
            "{},{},{},Passenger {},{},{},{},{},T{:05},{:.2},{},{}",
            i + 1,
            survived,
            1 + i % 3,
            i + 1,
            sex,
            age,
            i % 3,
            i % 2,
            i * 7,
            fare,
            cabin,
            embarked
        )
        .unwrap();
    }
    file.flush().unwrap();
    file
}

fn command_for(path: PathBuf) -> RunCommand {
    RunCommand {
        data: path,
        config: None,
        seed: Some(42),
        train_fraction: None,
        default_age: None,
        default_fare: None,
        models: Vec::new(),
    }
}

#[test]
fn trains_and_evaluates_every_model() {
    let file = synthetic_csv();
    let outcome = command_for(file.path().to_path_buf()).execute().unwrap();

    assert!(outcome.schema_tree.starts_with("root\n"));
    assert_eq!(outcome.schema_tree.lines().count(), 13);
    assert!(outcome
        .schema_tree
        .contains(" |-- Survived: integer (nullable = true)"));

    let names: Vec<&str> = outcome.reports.iter().map(|r| r.model.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "LogisticRegression",
            "DecisionTree",
            "RandomForest",
            "GradientBoostedTrees",
            "NaiveBayes",
            "LinearSvc",
            "MultilayerPerceptron",
        ]
    );

    for report in &outcome.reports {
        assert!(
            report.accuracy > 0.7 && report.accuracy <= 1.0,
            "{} reached only {:.2}",
            report.model,
            report.accuracy
        );
        let line = report.report_line();
        assert!(line.contains(" accuracy: "), "bad report line: {}", line);
        // Two decimal places exactly.
        let value = line.rsplit(' ').next().unwrap();
        assert_eq!(value.len(), 4, "bad accuracy formatting: {}", line);
    }
}

#[test]
fn model_filter_limits_and_orders_reports() {
    let file = synthetic_csv();
    let mut command = command_for(file.path().to_path_buf());
    command.models = vec![ModelKind::NaiveBayes, ModelKind::Logistic];
    let outcome = command.execute().unwrap();

    let names: Vec<&str> = outcome.reports.iter().map(|r| r.model.as_str()).collect();
    assert_eq!(names, vec!["NaiveBayes", "LogisticRegression"]);
}

#[test]
fn run_is_deterministic_for_a_fixed_seed() {
    let file = synthetic_csv();
    let a = command_for(file.path().to_path_buf()).execute().unwrap();
    let b = command_for(file.path().to_path_buf()).execute().unwrap();
    for (x, y) in a.reports.iter().zip(&b.reports) {
        assert_eq!(x.model, y.model);
        assert_eq!(x.accuracy, y.accuracy);
    }
}
