use solguard::detector::{AuditContext, DetectorRegistry};
use solguard::engine::AuditEngine;
use solguard::finding::Severity;
use solguard::pattern::snippet;
use solguard::report::AuditReport;
use solguard::source::{parser, validate_source, SourceText};
use solguard_detectors::all_detectors;

fn audit(source: &str, bytecode: Option<&str>) -> AuditReport {
    let source = SourceText::new(source.to_string());
    let tree = parser::parse_source(source.as_str());
    let ctx = AuditContext::new(&source, tree.as_ref(), bytecode, None);

    let mut registry = DetectorRegistry::new();
    registry.register_all(all_detectors());
    AuditEngine::new(registry).audit(&ctx)
}

fn names(report: &AuditReport) -> Vec<&str> {
    report.findings.iter().map(|f| f.name.as_str()).collect()
}

#[test]
fn test_vulnerable_token_has_findings() {
    let source = include_str!("fixtures/vulnerable_token.sol");
    let report = audit(source, None);

    assert!(
        report.total_findings >= 5,
        "Expected at least 5 findings, got {}",
        report.total_findings
    );

    let names = names(&report);
    assert!(
        names.contains(&"Excessive Transaction Fee"),
        "Excessive Transaction Fee not found in {names:?}"
    );
    assert!(
        names.contains(&"Uncapped Minting with Access Controls"),
        "Uncapped Minting with Access Controls not found in {names:?}"
    );
    assert!(
        names.contains(&"Unsafe Authentication Pattern: tx.origin"),
        "tx.origin finding not found in {names:?}"
    );
}

#[test]
fn test_safe_token_no_findings() {
    let source = include_str!("fixtures/safe_token.sol");
    let report = audit(source, None);

    assert!(
        report.findings.is_empty(),
        "Safe token should have no findings, got: {:?}",
        names(&report)
    );
}

#[test]
fn test_report_is_severity_ordered() {
    let source = include_str!("fixtures/vulnerable_token.sol");
    let report = audit(source, None);

    for window in report.findings.windows(2) {
        assert!(
            window[0].severity <= window[1].severity,
            "Findings not sorted by severity"
        );
    }
    assert_eq!(report.findings[0].severity, Severity::Critical);
}

#[test]
fn test_report_is_capped_and_deduplicated() {
    let source = include_str!("fixtures/vulnerable_token.sol");
    let report = audit(source, None);

    assert!(report.total_findings <= 10);

    let mut keys: Vec<String> = report
        .findings
        .iter()
        .map(|f| format!("{}{}", f.name, snippet::dedup_prefix(&f.code_snippet)))
        .collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), report.total_findings, "dedup key collision");
}

#[test]
fn test_determinism() {
    let source = include_str!("fixtures/vulnerable_token.sol");
    let first = serde_json::to_string(&audit(source, None)).unwrap();
    let second = serde_json::to_string(&audit(source, None)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_context_suppression_whole_source() {
    // A timelock marker anywhere in the file suppresses the ownership
    // finding, however far from the risky pattern it sits.
    let source = "pragma solidity ^0.8.0;\n\
                  contract T {\n\
                      // queued through the timelock\n\
                      function transferOwnership(address newOwner) public {}\n\
                  }";
    let report = audit(source, None);
    assert!(!names(&report).contains(&"Ownership Transfer Risk"));
}

#[test]
fn test_scenario_uncapped_minting_downgrade() {
    let source = "pragma solidity ^0.8.0;\n\
                  contract Token {\n\
                      function mint(address to, uint256 amount) public onlyOwner {\n\
                          _mint(to, amount);\n\
                      }\n\
                  }";
    let report = audit(source, None);
    let matches: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.name == "Uncapped Minting with Access Controls")
        .collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].severity, Severity::Medium);
    assert!(!names(&report).contains(&"Unlimited Minting"));
}

#[test]
fn test_scenario_tx_origin_auth() {
    let source = "pragma solidity ^0.8.0;\n\
                  contract Auth {\n\
                      address owner;\n\
                      function act() public {\n\
                          require(tx.origin == owner);\n\
                      }\n\
                  }";
    let report = audit(source, None);
    let f = report
        .findings
        .iter()
        .find(|f| f.name == "Unsafe Authentication Pattern: tx.origin")
        .expect("tx.origin finding missing");
    assert_eq!(f.severity, Severity::High);
}

#[test]
fn test_scenario_unprotected_selfdestruct() {
    let source = "pragma solidity ^0.8.0;\n\
                  contract Danger {\n\
                      function destroy() public {\n\
                          selfdestruct(payable(msg.sender));\n\
                      }\n\
                  }";
    let report = audit(source, None);
    let f = report
        .findings
        .iter()
        .find(|f| f.name == "Critical Risk: Unprotected Self-Destruct")
        .expect("selfdestruct finding missing");
    assert_eq!(f.severity, Severity::Critical);
}

#[test]
fn test_scenario_empty_bytecode_short_circuits() {
    let source = "pragma solidity ^0.8.0;\ncontract T {}";
    let report = audit(source, Some("0x"));

    let bytecode_findings: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.detector_name == "bytecode-heuristics")
        .collect();
    assert_eq!(bytecode_findings.len(), 1);
    assert_eq!(
        bytecode_findings[0].name,
        "Contract Not Deployed or Self-Destructed"
    );
    assert_eq!(bytecode_findings[0].severity, Severity::Critical);
}

#[test]
fn test_scenario_excessive_fee() {
    let source = "pragma solidity ^0.8.0;\n\
                  contract Fee {\n\
                      uint256 public sellTax = 25;\n\
                  }";
    let report = audit(source, None);
    let f = report
        .findings
        .iter()
        .find(|f| f.name == "Excessive Transaction Fee")
        .expect("fee finding missing");
    assert_eq!(f.severity, Severity::Critical);
}

#[test]
fn test_malformed_source_rejected_before_engine() {
    assert!(validate_source("").is_err());
    assert!(validate_source("hello world, no contract here").is_err());
    assert!(validate_source(include_str!("fixtures/safe_token.sol")).is_ok());
}
