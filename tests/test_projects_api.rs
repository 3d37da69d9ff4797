//! Project CRUD over HTTP: creator-as-manager, filters, manager reassignment
//! and the privileged delete.

mod common;

use common::{register_and_login, start_test_server, TestServer};
use serde_json::{json, Value};

async fn post_project(server: &TestServer, token: &str, body: Value) -> reqwest::Response {
    server
        .client
        .post(server.url("/projects"))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("create project request")
}

#[tokio::test]
async fn test_project_crud_flow() {
    let server = start_test_server().await.expect("server");
    let (token, user_id) =
        register_and_login(&server, "Paula", "paula@example.com", "paula-passphrase", "developer")
            .await
            .expect("user");

    let resp = post_project(
        &server,
        &token,
        json!({
            "name": "Observability Revamp",
            "description": "Replace the ad-hoc dashboards",
            "status": "planned",
            "startDate": "2026-09-01"
        }),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 201);
    let created: Value = resp.json().await.expect("body");
    let project_id = created["id"].as_i64().expect("project id");

    // The caller becomes the manager and is embedded in the response
    assert_eq!(created["managerId"].as_i64(), Some(user_id));
    assert_eq!(created["manager"]["email"], "paula@example.com");
    assert_eq!(created["status"], "planned");
    assert!(created["startDate"]
        .as_str()
        .unwrap()
        .starts_with("2026-09-01"));
    assert!(created["endDate"].is_null());
    assert!(created["createdAt"].as_str().is_some());

    let resp = server
        .client
        .get(server.url(&format!("/projects/{}", project_id)))
        .bearer_auth(&token)
        .send()
        .await
        .expect("get project");
    assert_eq!(resp.status().as_u16(), 200);
    let fetched: Value = resp.json().await.expect("body");
    assert_eq!(fetched["name"], "Observability Revamp");

    let resp = server
        .client
        .patch(server.url(&format!("/projects/{}", project_id)))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Observability Revamp II",
            "status": "active",
            "endDate": "2027-03-31"
        }))
        .send()
        .await
        .expect("patch project");
    assert_eq!(resp.status().as_u16(), 200);
    let updated: Value = resp.json().await.expect("body");
    assert_eq!(updated["name"], "Observability Revamp II");
    assert_eq!(updated["status"], "active");
    assert!(updated["endDate"].as_str().unwrap().starts_with("2027-03-31"));
    // Untouched fields survive the patch
    assert_eq!(updated["description"], "Replace the ad-hoc dashboards");

    server.shutdown().await;
}

#[tokio::test]
async fn test_project_list_filters() {
    let server = start_test_server().await.expect("server");
    let (token, _) =
        register_and_login(&server, "Paula", "paula@example.com", "paula-passphrase", "developer")
            .await
            .expect("user");

    for (name, status) in [
        ("Apollo Migration", "planned"),
        ("Borealis Rollout", "active"),
        ("Comet Cleanup", "active"),
    ] {
        let resp = post_project(
            &server,
            &token,
            json!({ "name": name, "description": "fixture", "status": status }),
        )
        .await;
        assert_eq!(resp.status().as_u16(), 201);
    }

    let resp = server
        .client
        .get(server.url("/projects?status=active"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("filter by status");
    assert_eq!(resp.status().as_u16(), 200);
    let active: Vec<Value> = resp.json().await.expect("body");
    assert_eq!(active.len(), 2);
    assert!(active.iter().all(|p| p["status"] == "active"));

    // Name search, case-insensitive
    let resp = server
        .client
        .get(server.url("/projects?q=apollo"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("filter by q");
    let hits: Vec<Value> = resp.json().await.expect("body");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Apollo Migration");

    let resp = server
        .client
        .get(server.url("/projects?status=bogus"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("bad status filter");
    assert_eq!(resp.status().as_u16(), 422);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["error"], "invalid_state");
    assert_eq!(body["message"], "Invalid project status: bogus");

    server.shutdown().await;
}

#[tokio::test]
async fn test_project_delete_requires_privilege() {
    let server = start_test_server().await.expect("server");
    let (dev_token, _) =
        register_and_login(&server, "Dev", "dev@example.com", "dev-passphrase", "developer")
            .await
            .expect("dev");
    let (admin_token, _) = register_and_login(
        &server,
        "Root",
        "root@example.com",
        "admin-passphrase",
        "admin",
    )
    .await
    .expect("admin");

    let resp = post_project(
        &server,
        &dev_token,
        json!({ "name": "Short Lived", "description": "", "status": "active" }),
    )
    .await;
    let project_id = resp.json::<Value>().await.expect("body")["id"]
        .as_i64()
        .expect("id");

    let resp = server
        .client
        .delete(server.url(&format!("/projects/{}", project_id)))
        .bearer_auth(&dev_token)
        .send()
        .await
        .expect("delete as developer");
    assert_eq!(resp.status().as_u16(), 403);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["message"], "Only admins or managers can delete projects");

    let resp = server
        .client
        .delete(server.url(&format!("/projects/{}", project_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("delete as admin");
    assert_eq!(resp.status().as_u16(), 204);

    let resp = server
        .client
        .get(server.url(&format!("/projects/{}", project_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("get deleted project");
    assert_eq!(resp.status().as_u16(), 404);

    let resp = server
        .client
        .delete(server.url(&format!("/projects/{}", project_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("delete twice");
    assert_eq!(resp.status().as_u16(), 404);

    server.shutdown().await;
}

#[tokio::test]
async fn test_project_manager_reassignment() {
    let server = start_test_server().await.expect("server");
    let (token, _) =
        register_and_login(&server, "Paula", "paula@example.com", "paula-passphrase", "developer")
            .await
            .expect("paula");
    let (_, other_id) =
        register_and_login(&server, "Quinn", "quinn@example.com", "quinn-passphrase", "developer")
            .await
            .expect("quinn");

    let resp = post_project(
        &server,
        &token,
        json!({ "name": "Handoff", "description": "", "status": "active" }),
    )
    .await;
    let project_id = resp.json::<Value>().await.expect("body")["id"]
        .as_i64()
        .expect("id");

    // Reassignment to an unknown user fails before any write
    let resp = server
        .client
        .patch(server.url(&format!("/projects/{}", project_id)))
        .bearer_auth(&token)
        .json(&json!({ "managerId": 999_999 }))
        .send()
        .await
        .expect("patch bad manager");
    assert_eq!(resp.status().as_u16(), 404);

    let resp = server
        .client
        .patch(server.url(&format!("/projects/{}", project_id)))
        .bearer_auth(&token)
        .json(&json!({ "managerId": other_id }))
        .send()
        .await
        .expect("patch manager");
    assert_eq!(resp.status().as_u16(), 200);
    let updated: Value = resp.json().await.expect("body");
    assert_eq!(updated["managerId"].as_i64(), Some(other_id));
    assert_eq!(updated["manager"]["email"], "quinn@example.com");

    server.shutdown().await;
}

#[tokio::test]
async fn test_project_input_validation() {
    let server = start_test_server().await.expect("server");
    let (token, _) =
        register_and_login(&server, "Paula", "paula@example.com", "paula-passphrase", "developer")
            .await
            .expect("user");

    let resp = post_project(
        &server,
        &token,
        json!({ "name": "   ", "description": "", "status": "active" }),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 422);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["message"], "Name must not be empty");

    let resp = post_project(
        &server,
        &token,
        json!({ "name": "Valid", "description": "", "status": "doing" }),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 422);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["message"], "Invalid project status: doing");

    let resp = post_project(
        &server,
        &token,
        json!({
            "name": "Valid",
            "description": "",
            "status": "active",
            "startDate": "next tuesday"
        }),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 422);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["message"], "Invalid date: next tuesday");

    // No token
    let resp = server
        .client
        .post(server.url("/projects"))
        .json(&json!({ "name": "Anon", "description": "", "status": "active" }))
        .send()
        .await
        .expect("anonymous create");
    assert_eq!(resp.status().as_u16(), 401);

    server.shutdown().await;
}
