mod common;

use axum::http::StatusCode;
use common::{error_fields, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_task_lifecycle() {
    let app = TestApp::new();
    let user = app.register("Ada", "ada@example.com").await;

    let task = app
        .create_task(&user, json!({ "title": "  Buy milk ", "priority": "high" }))
        .await;
    assert_eq!(task["title"], "Buy milk");
    assert_eq!(task["priority"], "high");
    assert_eq!(task["status"], "pending");
    assert_eq!(task["userId"], user.id.to_string());
    let id = task["id"].as_str().unwrap().to_string();

    let res = app.get(&format!("/api/tasks/{}", id), Some(&user.token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["task"]["title"], "Buy milk");

    let res = app
        .put(
            &format!("/api/tasks/{}", id),
            Some(&user.token),
            Some(json!({ "status": "in-progress" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["task"]["status"], "in-progress");
    assert_eq!(res.body["task"]["title"], "Buy milk");
    assert_eq!(res.body["task"]["priority"], "high");

    let res = app.delete(&format!("/api/tasks/{}", id), Some(&user.token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Task deleted successfully");

    let res = app.get(&format!("/api/tasks/{}", id), Some(&user.token)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["message"], "Task not found");
}

#[tokio::test]
async fn test_tasks_are_invisible_to_other_users() {
    let app = TestApp::new();
    let owner = app.register("Ada", "ada@example.com").await;
    let other = app.register("Bob", "bob@example.com").await;

    let task = app.create_task(&owner, json!({ "title": "Private" })).await;
    let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    assert_eq!(app.get(&uri, Some(&other.token)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.put(&uri, Some(&other.token), Some(json!({ "title": "Mine now" })))
            .await
            .status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.delete(&uri, Some(&other.token)).await.status, StatusCode::NOT_FOUND);

    let res = app.get("/api/tasks", Some(&other.token)).await;
    assert_eq!(res.body["count"], 0);
    assert_eq!(res.body["pagination"]["total"], 0);

    let res = app.get(&uri, Some(&owner.token)).await;
    assert_eq!(res.body["task"]["title"], "Private");
}

#[tokio::test]
async fn test_unknown_and_malformed_ids_are_not_found() {
    let app = TestApp::new();
    let user = app.register("Ada", "ada@example.com").await;

    let res = app
        .get(&format!("/api/tasks/{}", Uuid::new_v4()), Some(&user.token))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.get("/api/tasks/not-a-uuid", Some(&user.token)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["success"], false);
}

#[tokio::test]
async fn test_pagination() {
    let app = TestApp::new();
    let user = app.register("Ada", "ada@example.com").await;
    for i in 0..25 {
        app.create_task(&user, json!({ "title": format!("Task {}", i) }))
            .await;
    }

    let res = app.get("/api/tasks?limit=10", Some(&user.token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["count"], 10);
    assert_eq!(res.body["pagination"]["current"], 1);
    assert_eq!(res.body["pagination"]["pages"], 3);
    assert_eq!(res.body["pagination"]["total"], 25);
    assert_eq!(res.body["tasks"][0]["title"], "Task 24");

    let res = app.get("/api/tasks?page=3&limit=10", Some(&user.token)).await;
    assert_eq!(res.body["count"], 5);
    assert_eq!(res.body["pagination"]["current"], 3);
    assert_eq!(res.body["tasks"][4]["title"], "Task 0");

    let res = app.get("/api/tasks?page=4&limit=10", Some(&user.token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["count"], 0);
}

#[tokio::test]
async fn test_filters_search_and_sorting() {
    let app = TestApp::new();
    let user = app.register("Ada", "ada@example.com").await;

    app.create_task(&user, json!({ "title": "Groceries", "priority": "low" }))
        .await;
    app.create_task(
        &user,
        json!({ "title": "Errands", "description": "Pick up GROUND coffee", "status": "completed" }),
    )
    .await;
    app.create_task(&user, json!({ "title": "Gym", "priority": "high" }))
        .await;

    let res = app.get("/api/tasks?search=gro", Some(&user.token)).await;
    assert_eq!(res.body["count"], 2);

    let res = app.get("/api/tasks?status=completed", Some(&user.token)).await;
    assert_eq!(res.body["count"], 1);
    assert_eq!(res.body["tasks"][0]["title"], "Errands");

    let res = app
        .get("/api/tasks?priority=high&status=", Some(&user.token))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["count"], 1);
    assert_eq!(res.body["tasks"][0]["title"], "Gym");

    let res = app
        .get("/api/tasks?sortBy=title&sortOrder=asc", Some(&user.token))
        .await;
    let titles: Vec<&str> = res.body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Errands", "Groceries", "Gym"]);
}

#[tokio::test]
async fn test_invalid_list_queries_are_rejected() {
    let app = TestApp::new();
    let user = app.register("Ada", "ada@example.com").await;

    for query in ["limit=0", "limit=101", "page=0", "status=bogus", "sortBy=password"] {
        let res = app
            .get(&format!("/api/tasks?{}", query), Some(&user.token))
            .await;
        assert_eq!(
            res.status,
            StatusCode::UNPROCESSABLE_ENTITY,
            "{} was accepted",
            query
        );
    }

    let res = app.get("/api/tasks?page=abc", Some(&user.token)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_task_bodies_persist_nothing() {
    let app = TestApp::new();
    let user = app.register("Ada", "ada@example.com").await;

    let res = app
        .post("/api/tasks", Some(&user.token), json!({ "title": "   " }))
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&res.body), vec!["title"]);

    let res = app
        .post(
            "/api/tasks",
            Some(&user.token),
            json!({ "title": "Fine", "status": "bogus", "priority": "urgent" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&res.body), vec!["priority", "status"]);

    let res = app
        .post(
            "/api/tasks",
            Some(&user.token),
            json!({ "title": "x".repeat(101) }),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);

    let res = app.get("/api/tasks", Some(&user.token)).await;
    assert_eq!(res.body["pagination"]["total"], 0);

    let task = app.create_task(&user, json!({ "title": "Keep me" })).await;
    let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());
    let res = app
        .put(&uri, Some(&user.token), Some(json!({ "status": "done" })))
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);

    let res = app.get(&uri, Some(&user.token)).await;
    assert_eq!(res.body["task"]["status"], "pending");
}

#[tokio::test]
async fn test_mistyped_fields_are_reported_with_rule_failures() {
    let app = TestApp::new();
    let user = app.register("Ada", "ada@example.com").await;

    let res = app
        .post(
            "/api/tasks",
            Some(&user.token),
            json!({ "title": 123, "status": "bogus" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&res.body), vec!["status", "title"]);

    let res = app
        .post(
            "/api/auth/register",
            None,
            json!({ "name": ["Ada"], "email": "nope", "password": "secret123" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&res.body), vec!["email", "name"]);

    let res = app.get("/api/tasks", Some(&user.token)).await;
    assert_eq!(res.body["pagination"]["total"], 0);
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let app = TestApp::new();
    let user = app.register("Ada", "ada@example.com").await;

    let res = app
        .post("/api/tasks", Some(&user.token), json!("not an object"))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
}
