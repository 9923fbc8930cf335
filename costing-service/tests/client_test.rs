mod common;

use common::{client_body, mongo_tests_skipped, specification, TestApp};
use serde_json::{json, Value};

#[tokio::test]
async fn create_get_and_list_clients() {
    if mongo_tests_skipped() {
        return;
    }
    let app = TestApp::spawn().await;

    let id = app.create_client("1001").await;

    let response = app.get(&format!("/api/clients/{}", id)).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Client 1001");
    assert_eq!(body["phoneNumber"], "03001001");

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    app.create_client("1002").await;
    let clients: Vec<Value> = app.get("/api/clients").await.json().await.unwrap();
    assert_eq!(clients.len(), 2);
    // Newest first
    assert_eq!(clients[0]["name"], "Client 1002");

    app.cleanup().await;
}

#[tokio::test]
async fn duplicate_contact_fields_conflict() {
    if mongo_tests_skipped() {
        return;
    }
    let app = TestApp::spawn().await;

    app.create_client("2001").await;

    let mut duplicate_email = client_body("2002");
    duplicate_email["email"] = json!("client2001@example.com");
    let response = app.post("/api/clients", &duplicate_email).await;
    assert_eq!(response.status().as_u16(), 409);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("email"));

    let mut duplicate_phone = client_body("2003");
    duplicate_phone["phoneNumber"] = json!("03002001");
    let response = app.post("/api/clients", &duplicate_phone).await;
    assert_eq!(response.status().as_u16(), 409);

    // Updating into another client's address also conflicts
    let other = app.create_client("2004").await;
    let mut update = client_body("2004");
    update["address"] = json!("2001 Canal Road, Lahore");
    let response = app.put(&format!("/api/clients/{}", other), &update).await;
    assert_eq!(response.status().as_u16(), 409);

    app.cleanup().await;
}

#[tokio::test]
async fn invalid_client_rejected() {
    if mongo_tests_skipped() {
        return;
    }
    let app = TestApp::spawn().await;

    let mut body = client_body("3001");
    body["email"] = json!("not-an-email");
    let response = app.post("/api/clients", &body).await;
    assert_eq!(response.status().as_u16(), 422);

    let response = app
        .post("/api/clients", &json!({ "name": "Missing fields" }))
        .await;
    assert_eq!(response.status().as_u16(), 422);

    app.cleanup().await;
}

#[tokio::test]
async fn update_and_missing_client() {
    if mongo_tests_skipped() {
        return;
    }
    let app = TestApp::spawn().await;

    let id = app.create_client("4001").await;
    let mut update = client_body("4001");
    update["name"] = json!("Renamed Client");
    let response = app.put(&format!("/api/clients/{}", id), &update).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Renamed Client");

    let response = app.get("/api/clients/does-not-exist").await;
    assert_eq!(response.status().as_u16(), 404);
    let response = app
        .put("/api/clients/does-not-exist", &client_body("4002"))
        .await;
    assert_eq!(response.status().as_u16(), 404);
    let response = app.delete("/api/clients/does-not-exist").await;
    assert_eq!(response.status().as_u16(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn deleting_client_cascades_to_systems_and_costs() {
    if mongo_tests_skipped() {
        return;
    }
    let app = TestApp::spawn().await;

    let client_id = app.create_client("5001").await;
    let first_system = app.create_system(&client_id).await;
    let second_system = app.create_system(&client_id).await;
    for system_id in [&first_system, &first_system, &second_system] {
        let response = app
            .post(
                &format!("/api/clients/systems/{}/costs", system_id),
                &json!({ "specification": specification() }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201);
    }

    // Unrelated client keeps its data
    let other_client = app.create_client("5002").await;
    let other_system = app.create_system(&other_client).await;
    app.post(
        &format!("/api/clients/systems/{}/costs", other_system),
        &json!({ "specification": specification() }),
    )
    .await;

    let response = app.delete(&format!("/api/clients/{}", client_id)).await;
    assert_eq!(response.status().as_u16(), 200);
    let summary: Value = response.json().await.unwrap();
    assert_eq!(summary, json!({ "clients": 1, "systems": 2, "costs": 3 }));

    let response = app
        .get(&format!("/api/clients/systems/{}/costs", first_system))
        .await;
    assert_eq!(response.status().as_u16(), 404);

    let listing: Value = app.get("/api/costs").await.json().await.unwrap();
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["costs"][0]["systemId"], other_system.as_str());

    app.cleanup().await;
}
