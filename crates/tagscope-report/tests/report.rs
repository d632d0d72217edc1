//! Integration tests for report assembly and exports.

use std::fs;

use tagscope_core::{FilterSpec, GovernanceConfig, Session, annotate, apply_draft};
use tagscope_ingest::{LoadOptions, LoadedDataset, load_dataset, load_dataset_from_str};
use tagscope_model::{Dimension, EditDraft, TagSchema};
use tagscope_report::{
    build_governance_report, export_dataset, write_dataset_csv, write_json_report,
    write_untagged_csv,
};

const CSV: &str = "\
ResourceID,Service,Department,Project,MonthlyCostUSD,Tagged
r1,EC2,Finance,P1,120.50,Yes
r2,S3,,P1,80,No
r3,RDS,Ops,,200,Yes
r4,Lambda,Ops,P2,15,Yes
";

fn loaded() -> LoadedDataset {
    load_dataset_from_str(CSV, &LoadOptions::default()).expect("load dataset")
}

fn config() -> GovernanceConfig {
    let mut config = GovernanceConfig::default();
    config.tags.expected = vec!["Department".to_string(), "Project".to_string()];
    config
}

#[test]
fn untagged_export_lists_costliest_first() {
    let loaded = loaded();
    let schema = TagSchema::new(["Department", "Project"]).unwrap();
    let rows = annotate(loaded.dataset.records(), &schema);

    let mut buffer = Vec::new();
    let written = write_untagged_csv(&mut buffer, &loaded.dataset, &rows).unwrap();
    assert_eq!(written, 2);
    let text = String::from_utf8(buffer).unwrap();
    insta::assert_snapshot!(text, @r"
    ResourceID,Service,Department,Project,MonthlyCostUSD,Tagged,TagCompleteness,MissingTags
    r3,RDS,Ops,,200,Yes,50.0,Project
    r2,S3,,P1,80,No,50.0,Department
    ");
}

#[test]
fn remediated_export_keeps_column_order() {
    let loaded = loaded();
    let draft = EditDraft::new()
        .with_edit("r2", "Department", "Finance")
        .with_edit("r3", "project", "P3");
    let schema = TagSchema::new(["Department", "Project"]).unwrap();
    let remediated = apply_draft(&loaded.dataset, &draft, &schema, Some("Tagged")).unwrap();

    let mut buffer = Vec::new();
    write_dataset_csv(&mut buffer, &remediated).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    insta::assert_snapshot!(text, @r"
    ResourceID,Service,Department,Project,MonthlyCostUSD,Tagged
    r1,EC2,Finance,P1,120.50,Yes
    r2,S3,Finance,P1,80,Yes
    r3,RDS,Ops,P3,200,Yes
    r4,Lambda,Ops,P2,15,Yes
    ");
    assert_eq!(loaded.dataset.get("r2").unwrap().value("Department"), Some(""));
}

#[test]
fn exported_dataset_reloads_with_edits() {
    let loaded = loaded();
    let draft = EditDraft::new().with_edit("r2", "Department", "Finance");
    let schema = TagSchema::new(["Department", "Project"]).unwrap();
    let remediated = apply_draft(&loaded.dataset, &draft, &schema, Some("Tagged")).unwrap();

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("out").join("remediated.csv");
    assert_eq!(export_dataset(&path, &remediated).unwrap(), 4);

    let reloaded = load_dataset(&path, &LoadOptions::default()).unwrap();
    assert_eq!(reloaded.dataset.columns(), loaded.dataset.columns());
    assert_eq!(reloaded.dataset.get("r2").unwrap().value("Department"), Some("Finance"));
    assert_eq!(reloaded.dataset.get("r2").unwrap().value("Tagged"), Some("Yes"));
    assert_ne!(reloaded.fingerprint, loaded.fingerprint);
}

#[test]
fn governance_report_follows_session() {
    let loaded = loaded();
    let session = Session::new()
        .with_filters(
            FilterSpec::new()
                .with_restriction(Dimension::field("Service"), ["EC2", "S3", "RDS"])
                .unwrap(),
        )
        .with_grouping(vec![Dimension::TaggedStatus])
        .with_draft(EditDraft::new().with_edit("r2", "Department", "Finance"));

    let report = build_governance_report(&loaded, &config(), &session).unwrap();

    assert_eq!(report.overview.rows, 4);
    assert_eq!(report.filters.len(), 1);
    assert_eq!(report.filters[0].values, vec!["EC2", "RDS", "S3"]);
    assert_eq!(report.compliance.totals.resources, 3);
    assert_eq!(report.compliance.mismatches.len(), 1);
    assert_eq!(report.compliance.mismatches[0].resource_id, "r3");

    let keys: Vec<String> = report
        .costs
        .groups
        .iter()
        .map(|group| group.key.to_string())
        .collect();
    assert_eq!(keys, vec!["Untagged", "Tagged"]);

    let remediation = report.remediation.as_ref().expect("remediation summary");
    assert_eq!(remediation.tagged_delta, 1);
    assert_eq!(remediation.outcomes.len(), 1);
    assert!(remediation.outcomes[0].newly_tagged);

    let mut buffer = Vec::new();
    write_json_report(&mut buffer, &report).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
    assert_eq!(json["overview"]["fingerprint"], loaded.fingerprint.as_str());
    assert_eq!(json["expected_tags"][1], "Project");
    assert!(json["generated_at"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn governance_report_saves_to_disk() {
    let loaded = loaded();
    let report = build_governance_report(&loaded, &config(), &Session::new()).unwrap();
    assert!(report.remediation.is_none());

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("report.json");
    report.save(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"untagged_cost\""));
}
