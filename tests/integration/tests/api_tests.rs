//! API Integration Tests
//!
//! Each test starts its own server on the in-memory backend; no external
//! services are needed.
//!
//! Run with: cargo test -p attend-integration-tests --test api_tests

use attend_integration_tests::{
    assert_json, assert_status, configure_roles, fixtures::*, header, seed_participant,
    test_config_with, TestServer, TEST_EXPORT_KEY,
};
use reqwest::StatusCode;
use serde_json::Value;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready_without_backends() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"], "disabled");
    assert_eq!(body["checks"]["redis"], "disabled");
}

// ============================================================================
// Scan Tests
// ============================================================================

#[tokio::test]
async fn test_scan_then_duplicate() {
    let server = TestServer::start().await.expect("Failed to start server");
    configure_roles(&server.state).await.unwrap();
    let participant = seed_participant(&server.state, TARGET_UNIT, &[]).await.unwrap();
    let request = ScanRequest {
        token: participant.ticket.clone(),
    };

    let response = server.post("/api/scan", &request).await.unwrap();
    let first: ScanBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(first.status, "ok");
    let user = first.user.expect("user on success");
    assert_eq!(user.participant_id, participant.id);
    assert_eq!(user.attribute, "participant");
    assert_eq!(user.primary_unit.unit_id.as_deref(), Some(TARGET_UNIT));

    let response = server.post("/api/scan", &request).await.unwrap();
    let second: ScanBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(second.status, "duplicate");
    assert_eq!(second.existing_method.as_deref(), Some("scan"));
}

#[tokio::test]
async fn test_scan_rejects_bad_tickets() {
    let server = TestServer::start().await.expect("Failed to start server");
    configure_roles(&server.state).await.unwrap();
    let participant = seed_participant(&server.state, TARGET_UNIT, &[]).await.unwrap();

    // One flipped signature character
    let mut tampered = participant.ticket.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'a' { 'b' } else { 'a' });
    let response = server.post("/api/scan", &ScanRequest { token: tampered }).await.unwrap();
    let body: ScanBody = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.status, "error");
    assert_eq!(body.message, "Invalid token");
    assert!(body.user.is_none());

    // Correctly signed, but nobody holds it
    let stranger = server.state.service_context().ticket_codec().issue("999");
    let response = server.post("/api/scan", &ScanRequest { token: stranger }).await.unwrap();
    let body: ScanBody = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.status, "error");

    let response = server.post("/api/scan", &ScanRequest { token: String::new() }).await.unwrap();
    let body: ScanBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.status, "error");
}

#[tokio::test]
async fn test_scan_staff_resolves_to_operations_unit() {
    let server = TestServer::start().await.expect("Failed to start server");
    configure_roles(&server.state).await.unwrap();
    let participant = seed_participant(&server.state, TARGET_UNIT, &[]).await.unwrap();
    // Holds the staff role in the operations unit only
    let staff = seed_participant(&server.state, OPS_UNIT, &[STAFF_ROLE]).await.unwrap();

    let response = server
        .post("/api/scan", &ScanRequest { token: staff.ticket })
        .await
        .unwrap();
    let body: ScanBody = assert_json(response, StatusCode::OK).await.unwrap();
    let user = body.user.unwrap();
    assert_eq!(user.attribute, "staff");
    assert_eq!(user.primary_unit.unit_id.as_deref(), Some(OPS_UNIT));

    let response = server
        .post("/api/scan", &ScanRequest { token: participant.ticket })
        .await
        .unwrap();
    let body: ScanBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.user.unwrap().attribute, "participant");
}

// ============================================================================
// Manual Check-in Tests
// ============================================================================

#[tokio::test]
async fn test_manual_check_in_requires_staff() {
    let server = TestServer::start().await.expect("Failed to start server");
    configure_roles(&server.state).await.unwrap();
    let participant = seed_participant(&server.state, TARGET_UNIT, &[]).await.unwrap();
    let staff = seed_participant(&server.state, OPS_UNIT, &[STAFF_ROLE]).await.unwrap();
    let request = ManualCheckInRequest {
        participant_id: participant.id.clone(),
    };

    let response = server
        .post_session("/api/checkin/manual", &participant.session, &request)
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "INSUFFICIENT_PERMISSIONS");

    let response = server
        .post_session("/api/checkin/manual", &staff.session, &request)
        .await
        .unwrap();
    let body: ScanBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.status, "ok");

    // A later scan sees the manual record
    let response = server
        .post("/api/scan", &ScanRequest { token: participant.ticket })
        .await
        .unwrap();
    let body: ScanBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.status, "duplicate");
    assert_eq!(body.existing_method.as_deref(), Some("manual"));
}

#[tokio::test]
async fn test_manual_check_in_without_session() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = ManualCheckInRequest {
        participant_id: "123".to_string(),
    };

    let response = server.post("/api/checkin/manual", &request).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "MISSING_AUTH");

    let response = server
        .post_session("/api/checkin/manual", "forged", &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Ticket and Session Tests
// ============================================================================

#[tokio::test]
async fn test_my_ticket_with_session_cookie() {
    let server = TestServer::start().await.expect("Failed to start server");
    configure_roles(&server.state).await.unwrap();
    let participant = seed_participant(&server.state, TARGET_UNIT, &[]).await.unwrap();

    let response = server
        .get_session("/api/tickets/@me", &participant.session)
        .await
        .unwrap();
    let ticket: TicketBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(ticket.participant_id, participant.id);
    assert_eq!(ticket.ticket_token, participant.ticket);

    let response = server
        .post("/api/scan", &ScanRequest { token: ticket.ticket_token })
        .await
        .unwrap();
    let body: ScanBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.status, "ok");
}

#[tokio::test]
async fn test_session_handoff_sets_cookie() {
    let server = TestServer::start().await.expect("Failed to start server");
    configure_roles(&server.state).await.unwrap();
    let participant = seed_participant(&server.state, TARGET_UNIT, &[]).await.unwrap();

    let response = server
        .post(
            "/api/auth/session",
            &SessionRequest {
                session_token: participant.session.clone(),
            },
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let cookie = header(&response, "set-cookie").expect("set-cookie header").to_string();
    assert!(
        cookie.starts_with(&format!("session={};", participant.session)),
        "unexpected cookie: {cookie}"
    );
    assert!(cookie.contains("Max-Age=604800"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn test_session_handoff_rejects_bad_token() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post(
            "/api/auth/session",
            &SessionRequest {
                session_token: "eyJhbGciOiJIUzI1NiJ9.e30.forged".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(header(&response, "set-cookie").is_none());
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "INVALID_TOKEN");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let server = TestServer::start().await.expect("Failed to start server");
    configure_roles(&server.state).await.unwrap();
    let participant = seed_participant(&server.state, TARGET_UNIT, &[]).await.unwrap();

    let url = format!("{}/api/auth/logout", server.base_url());
    let response = server
        .client
        .post(&url)
        .header("Cookie", format!("session={}", participant.session))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let cookie = header(&response, "set-cookie").expect("set-cookie header").to_string();
    assert!(cookie.starts_with("session=;"), "unexpected cookie: {cookie}");
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(!cookie.contains("Secure"));
}

// ============================================================================
// Export Tests
// ============================================================================

#[tokio::test]
async fn test_export_requires_api_key() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/attendance-export").await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "INVALID_API_KEY");

    let response = server.get("/api/attendance-export?apiKey=wrong").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_export_report() {
    let server = TestServer::start().await.expect("Failed to start server");
    configure_roles(&server.state).await.unwrap();
    let present = seed_participant(&server.state, TARGET_UNIT, &[]).await.unwrap();
    let absent = seed_participant(&server.state, TARGET_UNIT, &[]).await.unwrap();

    let response = server
        .post("/api/scan", &ScanRequest { token: present.ticket })
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let path = format!("/api/attendance-export?apiKey={TEST_EXPORT_KEY}&guildId={TARGET_UNIT}");
    let response = server.get(&path).await.unwrap();
    let report: ExportBody = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(
        report.summary,
        SummaryBody {
            total: 2,
            attended: 1,
            absent: 1
        }
    );
    let member = |id: &str| report.members.iter().find(|m| m.participant_id == id).unwrap();
    assert!(member(&present.id).attended);
    assert_eq!(member(&present.id).check_in_method.as_deref(), Some("scan"));
    assert!(!member(&absent.id).attended);

    let range_path = format!(
        "/api/attendance-export/range?apiKey={TEST_EXPORT_KEY}&start={date}&end={date}",
        date = report.date
    );
    let response = server.get(&range_path).await.unwrap();
    let range: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(range["dates"].as_array().map(Vec::len), Some(1));
    assert_eq!(range["members"][0]["participantId"], present.id.as_str());
}

#[tokio::test]
async fn test_export_rejects_malformed_date() {
    let server = TestServer::start().await.expect("Failed to start server");

    let path = format!("/api/attendance-export?apiKey={TEST_EXPORT_KEY}&date=2026-3-1");
    let response = server.get(&path).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Rate Limit Tests
// ============================================================================

#[tokio::test]
async fn test_export_rate_limit() {
    let server = TestServer::start().await.expect("Failed to start server");
    let path = format!("/api/attendance-export?apiKey={TEST_EXPORT_KEY}");

    for expected_remaining in (0..5).rev() {
        let response = server.get(&path).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header(&response, "x-ratelimit-limit"), Some("5"));
        assert_eq!(
            header(&response, "x-ratelimit-remaining"),
            Some(expected_remaining.to_string().as_str())
        );
    }

    let response = server.get(&path).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(header(&response, "x-ratelimit-remaining"), Some("0"));
    assert!(header(&response, "x-ratelimit-reset").is_some());
    let retry_after: i64 = header(&response, "retry-after").unwrap().parse().unwrap();
    assert!((1..=60).contains(&retry_after));

    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.error.code, "RATE_LIMITED");
}

#[tokio::test]
async fn test_rotating_forwarded_for_is_still_limited() {
    let server = TestServer::start().await.expect("Failed to start server");
    let url = format!("{}/api/attendance-export?apiKey={TEST_EXPORT_KEY}", server.base_url());

    let mut limited = 0;
    for i in 0..20 {
        let response = server
            .client
            .get(&url)
            .header("X-Forwarded-For", format!("10.0.0.{i}"))
            .send()
            .await
            .unwrap();
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            limited += 1;
        }
    }
    assert_eq!(limited, 15);
}

#[tokio::test]
async fn test_trusted_proxy_buckets_per_forwarded_client() {
    let config = test_config_with(&[("TRUSTED_PROXIES", "127.0.0.1")]).unwrap();
    let server = TestServer::start_with_config(config).await.expect("Failed to start server");
    let url = format!("{}/api/attendance-export?apiKey={TEST_EXPORT_KEY}", server.base_url());
    let get = |chain: &'static str| server.client.get(&url).header("X-Forwarded-For", chain).send();

    for _ in 0..5 {
        assert_eq!(get("203.0.113.9").await.unwrap().status(), StatusCode::OK);
    }
    // A spoofed leftmost hop does not change the client
    let response = get("198.51.100.1, 203.0.113.9").await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    assert_eq!(get("203.0.113.10").await.unwrap().status(), StatusCode::OK);
}

#[tokio::test]
async fn test_limits_are_per_route_group() {
    let server = TestServer::start().await.expect("Failed to start server");
    let path = format!("/api/attendance-export?apiKey={TEST_EXPORT_KEY}");
    for _ in 0..6 {
        server.get(&path).await.unwrap();
    }

    let response = server
        .post("/api/scan", &ScanRequest { token: "x".to_string() })
        .await
        .unwrap();
    assert_eq!(header(&response, "x-ratelimit-limit"), Some("100"));
    assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
