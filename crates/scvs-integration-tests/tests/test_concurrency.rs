//! Concurrency behavior: duplicate issuance races, single-flight verdict
//! recomputation, and bulk issuance slot isolation.

mod common;

use scvs_engine::{AuditAction, EngineError};

use common::{harness, number};

#[tokio::test]
async fn test_concurrent_duplicate_issuance_has_one_winner() {
    let h = harness().await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let issuance = h.issuance.clone();
        let request = h.request("SCVS-2024-RACE-000001");
        handles.push(tokio::spawn(
            async move { issuance.issue(request, None, None).await },
        ));
    }

    let mut winners = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(EngineError::Duplicate { .. }) => duplicates += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(h.certificates.len(), 1);

    // Exactly one issuance audit event, from the winner.
    let issues = h
        .audit
        .events()
        .into_iter()
        .filter(|e| e.action == AuditAction::CertificateIssue)
        .count();
    assert_eq!(issues, 1);
}

#[tokio::test]
async fn test_concurrent_first_verifications_audit_once() {
    let h = harness().await;
    h.issuance
        .issue(h.request("SCVS-2024-HOT-000001"), None, None)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let verification = h.verification.clone();
        handles.push(tokio::spawn(async move {
            verification.verify(&number("SCVS-2024-HOT-000001")).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().unwrap().valid);
    }

    // The flight group collapses the stampede: one recomputation, one
    // verification audit event; the rest served from cache.
    let verifications = h
        .audit
        .events()
        .into_iter()
        .filter(|e| e.action == AuditAction::CertificateVerify)
        .count();
    assert_eq!(verifications, 1);
}

#[tokio::test]
async fn test_cached_verdict_does_not_audit() {
    let h = harness().await;
    h.issuance
        .issue(h.request("SCVS-2024-HOT-000002"), None, None)
        .await
        .unwrap();

    for _ in 0..5 {
        h.verification
            .verify(&number("SCVS-2024-HOT-000002"))
            .await
            .unwrap();
    }
    let verifications = h
        .audit
        .events()
        .into_iter()
        .filter(|e| e.action == AuditAction::CertificateVerify)
        .count();
    assert_eq!(verifications, 1);
}

#[tokio::test]
async fn test_expired_cache_entry_recomputes() {
    let h = common::harness_with_ttl(std::time::Duration::ZERO).await;
    h.issuance
        .issue(h.request("SCVS-2024-COLD-000001"), None, None)
        .await
        .unwrap();

    for _ in 0..3 {
        assert!(h
            .verification
            .verify(&number("SCVS-2024-COLD-000001"))
            .await
            .unwrap()
            .valid);
    }
    // Zero TTL means every lookup misses and recomputes.
    let verifications = h
        .audit
        .events()
        .into_iter()
        .filter(|e| e.action == AuditAction::CertificateVerify)
        .count();
    assert_eq!(verifications, 3);
}

#[tokio::test]
async fn test_bulk_issue_isolates_sibling_failures() {
    let h = harness().await;
    h.issuance
        .issue(h.request("SCVS-2024-BULK-000002"), None, None)
        .await
        .unwrap();

    let results = h
        .issuance
        .bulk_issue(
            vec![
                h.request("SCVS-2024-BULK-000001"),
                h.request("SCVS-2024-BULK-000002"), // duplicate
                h.request("SCVS-2024-BULK-000003"),
            ],
            None,
        )
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(EngineError::Duplicate { .. })
    ));
    assert!(results[2].is_ok());

    // Both successful siblings verify independently.
    assert!(h
        .verification
        .verify(&number("SCVS-2024-BULK-000001"))
        .await
        .unwrap()
        .valid);
    assert!(h
        .verification
        .verify(&number("SCVS-2024-BULK-000003"))
        .await
        .unwrap()
        .valid);
}
