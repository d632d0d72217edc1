use std::fs;

use rust_decimal::Decimal;
use tagscope_ingest::{IngestError, LoadOptions, load_dataset, load_dataset_from_str};
use tagscope_model::ValidationError;

const HEADER: &str =
    "ResourceID,Service,Region,Department,Project,Environment,Owner,CostCenter,MonthlyCostUSD";

#[test]
fn loads_quoted_lines_from_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("cloudmart.csv");
    let contents = format!(
        "\"{HEADER}\"\n\"r1,EC2,us-east-1,Finance,P1,prod,alice,CC1,120.50\"\n\"r2,S3,eu-west-1,,,dev,,,30\"\n"
    );
    fs::write(&path, contents).expect("write csv");

    let loaded = load_dataset(&path, &LoadOptions::default()).expect("load dataset");
    assert_eq!(loaded.dataset.len(), 2);
    assert!(loaded.rejected.is_empty());
    assert_eq!(loaded.fingerprint.len(), 64);
    assert_eq!(loaded.source.as_deref(), Some(path.as_path()));

    let first = loaded.dataset.get("r1").expect("r1");
    assert_eq!(first.cost, Decimal::new(12050, 2));
    assert_eq!(first.value("Service"), Some("EC2"));
    let second = loaded.dataset.get("r2").expect("r2");
    assert_eq!(second.value("Department"), Some(""));
    assert!(!second.is_present("Owner"));
    assert_eq!(loaded.dataset.columns().len(), 9);
    assert_eq!(loaded.dataset.cost_column(), "MonthlyCostUSD");
}

#[test]
fn rejects_invalid_rows_and_keeps_the_rest() {
    let contents = format!(
        "{HEADER}\n\
         r1,EC2,us-east-1,Finance,P1,prod,alice,CC1,100\n\
         ,EC2,us-east-1,Finance,P1,prod,alice,CC1,10\n\
         r3,EC2,us-east-1,Finance,P1,prod,alice,CC1,-4\n\
         r4,EC2,us-east-1,Finance,P1,prod,alice,CC1,lots\n\
         r5,EC2\n\
         r1,S3,us-east-1,Finance,P1,prod,alice,CC1,7\n"
    );
    let loaded = load_dataset_from_str(&contents, &LoadOptions::default()).expect("load");
    assert_eq!(loaded.dataset.len(), 1);
    assert_eq!(loaded.rejected_count(), 5);

    let lines: Vec<usize> = loaded.rejected.iter().map(|row| row.line).collect();
    assert_eq!(lines, vec![3, 4, 5, 6, 7]);
    assert_eq!(loaded.rejected[0].error, ValidationError::MissingResourceId);
    assert_eq!(loaded.rejected[0].resource_id, None);
    assert_eq!(
        loaded.rejected[1].error,
        ValidationError::NegativeCost {
            resource_id: "r3".to_string(),
            cost: Decimal::new(-4, 0),
        }
    );
    assert!(matches!(
        loaded.rejected[2].error,
        ValidationError::InvalidCost { .. }
    ));
    assert_eq!(
        loaded.rejected[3].error,
        ValidationError::MissingCost {
            resource_id: "r5".to_string()
        }
    );
    assert_eq!(
        loaded.rejected[4].error,
        ValidationError::DuplicateResourceId {
            resource_id: "r1".to_string()
        }
    );
    // The first occurrence wins.
    assert_eq!(
        loaded.dataset.get("r1").map(|record| record.cost),
        Some(Decimal::new(100, 0))
    );
}

#[test]
fn missing_key_column_fails_the_load() {
    let err = load_dataset_from_str("ResourceID,Service\nr1,EC2\n", &LoadOptions::default())
        .unwrap_err();
    match err {
        IngestError::MissingColumn { column, .. } => assert_eq!(column, "MonthlyCostUSD"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn custom_key_columns_match_case_insensitively() {
    let options = LoadOptions {
        id_column: "arn".to_string(),
        cost_column: "cost".to_string(),
    };
    let loaded = load_dataset_from_str("ARN,Cost,Owner\nx,1.5,bob\n", &options).expect("load");
    assert_eq!(loaded.dataset.id_column(), "ARN");
    assert_eq!(loaded.dataset.records()[0].value("Owner"), Some("bob"));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_dataset(&dir.path().join("absent.csv"), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn rejects_row_that_overflows_total_cost() {
    let huge = "70000000000000000000000000000";
    let contents = format!(
        "{HEADER}\n\
         r1,EC2,us-east-1,Ops,P1,prod,alice,CC1,{huge}\n\
         r2,EC2,us-east-1,Ops,P1,prod,alice,CC1,{huge}\n\
         r3,S3,us-east-1,Ops,P1,prod,alice,CC1,5\n"
    );
    let loaded = load_dataset_from_str(&contents, &LoadOptions::default()).expect("load");
    assert_eq!(loaded.dataset.len(), 2);
    assert_eq!(loaded.rejected_count(), 1);
    assert_eq!(loaded.rejected[0].line, 3);
    assert_eq!(
        loaded.rejected[0].error,
        ValidationError::CostOverflow {
            resource_id: "r2".to_string()
        }
    );
    let expected: Decimal = huge.parse::<Decimal>().unwrap() + Decimal::new(5, 0);
    assert_eq!(loaded.dataset.total_cost(), expected);
}
