mod common;

use axum::http::StatusCode;
use common::TestApp;
use estate_agent::models::{EntityKind, PropertyStatus, RoleName};
use estate_agent::store::DocumentStore;
use serde_json::json;

#[tokio::test]
async fn guests_list_only_unarchived_properties() {
    let app = TestApp::new().await;
    app.add_user("u1", &[RoleName::User]).await;
    app.add_user("u2", &[RoleName::User]).await;
    app.add_property("listed", "u1", PropertyStatus::Listed, 2).await;
    app.add_property("archived", "u2", PropertyStatus::Archived, 1).await;

    let (status, body) = app.send("GET", "/properties", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["propertyCount"], json!(1));
    assert_eq!(body["properties"].as_array().unwrap().len(), 1);
    assert_eq!(body["properties"][0]["id"], json!("listed"));
    assert_eq!(body["page"], json!(1));
    assert_eq!(body["resultsPerPage"], json!(10));
    assert_eq!(body["pageCount"], json!(1));
    assert_eq!(body["links"]["create"], json!("http://estate.test/properties/"));
}

#[tokio::test]
async fn owners_also_see_their_archived_properties() {
    let app = TestApp::new().await;
    let owner = app.add_user("u1", &[RoleName::User]).await;
    let other = app.add_user("u2", &[RoleName::User]).await;
    app.add_property("listed", "u1", PropertyStatus::Listed, 2).await;
    app.add_property("archived", "u1", PropertyStatus::Archived, 1).await;

    let (_, body) = app.send("GET", "/properties", Some(&owner), None).await;
    assert_eq!(body["propertyCount"], json!(2));

    let (_, body) = app.send("GET", "/properties", Some(&other), None).await;
    assert_eq!(body["propertyCount"], json!(1));
}

#[tokio::test]
async fn location_is_hidden_from_other_users_but_not_owners() {
    let app = TestApp::new().await;
    let owner = app.add_user("u1", &[RoleName::User]).await;
    let other = app.add_user("u2", &[RoleName::User]).await;
    app.add_property("p1", "u1", PropertyStatus::Listed, 1).await;

    let (status, body) = app.send("GET", "/properties/p1", Some(&other), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("location").is_none());
    assert_eq!(body["title"], json!("Property p1"));

    let (_, body) = app.send("GET", "/properties/p1", Some(&owner), None).await;
    assert_eq!(body["location"]["town"], json!("Coventry"));
}

#[tokio::test]
async fn guests_cannot_read_archived_property() {
    let app = TestApp::new().await;
    app.add_property("p1", "u1", PropertyStatus::Archived, 1).await;

    let (status, body) = app.send("GET", "/properties/p1", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], json!("forbidden"));
    assert_eq!(
        body["message"],
        json!("You don't have permissions to read this property")
    );
}

#[tokio::test]
async fn missing_property_is_not_found() {
    let app = TestApp::new().await;
    let (status, body) = app.send("GET", "/properties/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("not_found"));
}

#[tokio::test]
async fn users_cannot_update_other_users_property() {
    let app = TestApp::new().await;
    app.add_user("u1", &[RoleName::User]).await;
    let other = app.add_user("u2", &[RoleName::User]).await;
    app.add_property("p1", "u1", PropertyStatus::Listed, 1).await;

    let (status, body) = app
        .send(
            "PUT",
            "/properties/p1",
            Some(&other),
            Some(json!({ "title": "Stolen" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        json!("You don't have permissions to update this property")
    );

    let stored = app
        .store
        .find_by_id(EntityKind::Property, "p1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.as_property().unwrap().title, "Property p1");
}

#[tokio::test]
async fn owners_update_and_delete_their_property() {
    let app = TestApp::new().await;
    let owner = app.add_user("u1", &[RoleName::User]).await;
    app.add_property("p1", "u1", PropertyStatus::Listed, 1).await;

    let (status, body) = app
        .send(
            "PUT",
            "/properties/p1",
            Some(&owner),
            Some(json!({ "status": "underOffer", "price": "260000" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("underOffer"));
    assert_eq!(body["price"], json!("260000.00"));

    let (status, body) = app.send("DELETE", "/properties/p1", Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!("p1"));
    let gone = app.store.find_by_id(EntityKind::Property, "p1").await.unwrap();
    assert!(gone.is_none());
}

#[tokio::test]
async fn admins_can_update_any_property() {
    let app = TestApp::new().await;
    let admin = app.add_user("root", &[RoleName::Admin]).await;
    app.add_property("p1", "u1", PropertyStatus::Archived, 1).await;

    let (status, body) = app
        .send(
            "PUT",
            "/properties/p1",
            Some(&admin),
            Some(json!({ "ownerId": "u9" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ownerId"], json!("u9"));
}

#[tokio::test]
async fn created_property_is_owned_by_the_caller() {
    let app = TestApp::new().await;
    let token = app.add_user("u1", &[RoleName::User]).await;

    let (status, body) = app
        .send(
            "POST",
            "/properties",
            Some(&token),
            Some(json!({
                "title": "Two bed flat",
                "type": "flat",
                "price": 185000,
                "location": {
                    "addressLine1": "2 Station Road",
                    "town": "Leamington Spa",
                    "postcode": "CV32 4AB"
                }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ownerId"], json!("u1"));
    assert_eq!(body["status"], json!("listed"));
    assert_eq!(body["price"], json!("185000.00"));
    assert_eq!(body["location"]["town"], json!("Leamington Spa"));
}

#[tokio::test]
async fn creating_a_property_requires_a_token() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            "POST",
            "/properties",
            None,
            Some(json!({ "title": "t", "type": "flat", "price": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("missing_token"));
}

#[tokio::test]
async fn invalid_property_body_names_the_argument() {
    let app = TestApp::new().await;
    let token = app.add_user("u1", &[RoleName::User]).await;
    let (status, body) = app
        .send(
            "POST",
            "/properties",
            Some(&token),
            Some(json!({ "title": "t", "price": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("invalid_argument"));
    assert_eq!(body["argument"], json!("type"));
}

#[tokio::test]
async fn listing_pages_newest_first() {
    let app = TestApp::new().await;
    app.add_property("old", "u1", PropertyStatus::Listed, 3).await;
    app.add_property("mid", "u1", PropertyStatus::Listed, 2).await;
    app.add_property("new", "u1", PropertyStatus::Listed, 1).await;

    let (_, body) = app
        .send("GET", "/properties?resultsPerPage=2", None, None)
        .await;
    let ids: Vec<_> = body["properties"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["new", "mid"]);
    assert_eq!(body["pageCount"], json!(2));

    let (_, body) = app
        .send("GET", "/properties?resultsPerPage=2&page=2", None, None)
        .await;
    assert_eq!(body["properties"][0]["id"], json!("old"));
    assert_eq!(body["propertyCount"], json!(3));
}

#[tokio::test]
async fn search_parameters_narrow_the_listing() {
    let app = TestApp::new().await;
    app.add_property("p1", "u1", PropertyStatus::Listed, 2).await;
    app.add_property("p2", "u2", PropertyStatus::UnderOffer, 1).await;

    let (_, body) = app
        .send("GET", "/properties?status=underOffer", None, None)
        .await;
    assert_eq!(body["propertyCount"], json!(1));
    assert_eq!(body["properties"][0]["id"], json!("p2"));

    let (_, body) = app
        .send("GET", "/properties?priceLow=300000", None, None)
        .await;
    assert_eq!(body["propertyCount"], json!(0));

    let (_, body) = app
        .send("GET", "/properties?postcode=CV1&search=garden", None, None)
        .await;
    assert_eq!(body["propertyCount"], json!(2));
}

#[tokio::test]
async fn malformed_price_bound_is_rejected() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send("GET", "/properties?priceLow=cheap", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("invalid_argument"));
    assert_eq!(body["argument"], json!("priceLow"));
}
