//! Bundled scenario integration tests
//!
//! Loads every file under `scenarios/` and checks the outcome the CLI would
//! print for it.

use std::path::PathBuf;

use access_core::GateKind;
use access_verifier::EvaluatorConfig;
use gatekeeper::{Outcome, Scenario, ScenarioError};

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

async fn run(name: &str) -> gatekeeper::ScenarioReport {
    let scenario = Scenario::load(&scenario_path(name)).unwrap();
    scenario.run(EvaluatorConfig::default()).await.unwrap()
}

#[tokio::test]
async fn test_token_balance_scenario_admits() {
    let report = run("token_balance.yaml").await;
    assert_eq!(report.gate, GateKind::TokenBalanceGate);
    assert_eq!(report.outcome, Outcome::Admitted);
}

#[tokio::test]
async fn test_underpaid_scenario_is_rejected_definitively() {
    let report = run("payment_short.yaml").await;
    match report.outcome {
        Outcome::Rejected { error, transient } => {
            assert!(!transient);
            assert!(error.contains("does not match the required 1000"), "{error}");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_paying_yourself_is_rejected() {
    let report = run("payment_to_self.yaml").await;
    assert_eq!(
        report.outcome,
        Outcome::Rejected {
            error: "verification failed: transfer paid to mallory, expected premium-lounge-treasury"
                .into(),
            transient: false,
        }
    );
}

#[tokio::test]
async fn test_neuron_scenario_requires_new_rules() {
    let report = run("neuron_with_rules.yaml").await;
    assert_eq!(report.rules.version, 2);
    assert_eq!(
        report.outcome,
        Outcome::RulesAcceptanceRequired { version: 2 }
    );
}

#[tokio::test]
async fn test_credential_scenario_admits() {
    let report = run("credential_adult.yaml").await;
    assert_eq!(report.gate, GateKind::CredentialGate);
    assert_eq!(report.outcome, Outcome::Admitted);
}

#[tokio::test]
async fn test_frozen_scenario_is_rejected() {
    let report = run("frozen_community.yaml").await;
    assert_eq!(
        report.outcome,
        Outcome::Rejected {
            error: "entity is frozen".into(),
            transient: false,
        }
    );
}

#[tokio::test]
async fn test_report_renders_as_json() {
    let report = run("token_balance.yaml").await;
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["gate"], "token_balance_gate");
    assert_eq!(json["outcome"]["status"], "admitted");
}

#[test]
fn test_missing_scenario_file() {
    let err = Scenario::load(&scenario_path("does_not_exist.yaml")).unwrap_err();
    assert!(matches!(err, ScenarioError::Io { .. }));
}
