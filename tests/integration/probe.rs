use crate::*;

use postern::{deliver, DeliveryError};
use postern_overlay::OverlayError;

/// A non-zero probe status is fatal, and the status in the error is the
/// one the probe completion actually reported.
#[tokio::test]
async fn probe_failure_carries_the_reported_status() {
    let mut script = AgentScript::happy();
    script.probe_status = 11;
    let agent = FakeAgent::spawn(script).await;
    let dir = scratch_dir("probe-fail");

    let result = deliver(test_inputs(&agent.addr, &dir)).await;
    match result {
        Err(DeliveryError::Overlay(OverlayError::Probe { service, status })) => {
            assert_eq!(service, "example.org");
            assert_eq!(status, 11);
        }
        other => panic!("expected Probe error, got {other:?}"),
    }

    // No request open was ever attempted.
    assert_eq!(agent.ops(), vec!["hello", "probe"]);

    let _ = std::fs::remove_dir_all(&dir);
}

/// The probe lookup key is the webhook URL's host component.
#[tokio::test]
async fn probe_uses_the_url_host_as_service_name() {
    let agent = FakeAgent::spawn(AgentScript::happy()).await;
    let dir = scratch_dir("probe-name");

    deliver(test_inputs(&agent.addr, &dir)).await.unwrap();

    let frames = agent.frames();
    assert_eq!(frames[1]["op"], "probe");
    assert_eq!(frames[1]["service"], "example.org");

    let _ = std::fs::remove_dir_all(&dir);
}
