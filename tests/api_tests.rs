// tests/api_tests.rs

use carbon_market::{config::Config, routes, seed, state::AppState, store::Store};
use sqlx::sqlite::SqlitePoolOptions;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin123456";

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
///
/// Each call gets its own in-memory store, so tests are fully isolated.
async fn spawn_app() -> String {
    // 1. Create an isolated in-memory store
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory store");

    // 2. Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate store");

    // 3. Create test configuration and state
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        session_timeout_secs: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        auth_delay_ms: 0, // no simulated latency in tests
        admin_email: Some(ADMIN_EMAIL.to_string()),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
        seed_demo_listings: false,
        smtp_host: None,
        smtp_port: 587,
        smtp_username: None,
        smtp_password: None,
        email_from: None,
        razorpay_key_id: None,
        razorpay_key_secret: None,
    };

    let store = Store::new(pool);
    seed::seed_default_admin(&store, &config)
        .await
        .expect("Failed to seed admin");

    let state = AppState::new(store, config);

    // 4. Create the router with the app state
    let app = routes::create_router(state);

    // 5. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 6. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn signup(
    client: &reqwest::Client,
    address: &str,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> reqwest::Response {
    client
        .post(format!("{address}/api/auth/signup"))
        .json(&serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
            "confirm_password": password,
            "role": role,
        }))
        .send()
        .await
        .expect("Signup request failed")
}

async fn login(
    client: &reqwest::Client,
    address: &str,
    email: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(format!("{address}/api/auth/login"))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Login request failed")
}

async fn login_token(client: &reqwest::Client, address: &str, email: &str, password: &str) -> String {
    let response = login(client, address, email, password).await;
    assert_eq!(response.status().as_u16(), 200, "login should succeed");
    let body: serde_json::Value = response.json().await.expect("Failed to parse login json");
    body["token"].as_str().expect("Token not found").to_string()
}

async fn admin_token(client: &reqwest::Client, address: &str) -> String {
    login_token(client, address, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

/// Registers an account, approves it through the admin workflow, and logs in.
/// Returns the session token.
async fn create_approved_user(
    client: &reqwest::Client,
    address: &str,
    admin: &str,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> String {
    let response = signup(client, address, name, email, password, role).await;
    assert_eq!(response.status().as_u16(), 201);

    let pending: Vec<serde_json::Value> = client
        .get(format!("{address}/api/admin/users/pending"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Pending users request failed")
        .json()
        .await
        .expect("Failed to parse pending users");

    let id = pending
        .iter()
        .find(|u| u["email"] == email)
        .expect("Signed-up user missing from pending list")["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = client
        .post(format!("{address}/api/admin/users/{id}/approve"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Approve request failed");
    assert_eq!(response.status().as_u16(), 200);

    login_token(client, address, email, password).await
}

fn unique_email(prefix: &str) -> String {
    format!("{prefix}_{}@example.com", &uuid::Uuid::new_v4().to_string()[..8])
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn signup_creates_an_unapproved_account() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = signup(
        &client,
        &address,
        "A Farmer",
        "a@x.com",
        "abc12345",
        "farmer",
    )
    .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["approved"], false);
    assert_eq!(body["user"]["role"], "farmer");
}

#[tokio::test]
async fn signup_rejects_invalid_email() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = signup(&client, &address, "A Farmer", "not-an-email", "abc12345", "farmer").await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn signup_enforces_password_policy() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Too short
    let response = signup(&client, &address, "A", &unique_email("short"), "ab1", "farmer").await;
    assert_eq!(response.status().as_u16(), 400);

    // No digits
    let response = signup(&client, &address, "A", &unique_email("nodigit"), "abcdefgh", "farmer").await;
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("letters and numbers")
    );
}

#[tokio::test]
async fn mismatched_confirmation_is_rejected_before_any_write() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let email = unique_email("mismatch");

    let response = client
        .post(format!("{address}/api/auth/signup"))
        .json(&serde_json::json!({
            "name": "A Farmer",
            "email": email,
            "password": "abc12345",
            "confirm_password": "different1",
            "role": "farmer",
        }))
        .send()
        .await
        .expect("Signup request failed");
    assert_eq!(response.status().as_u16(), 400);

    // No record was persisted: the same email still signs up cleanly.
    let response = signup(&client, &address, "A Farmer", &email, "abc12345", "farmer").await;
    assert_eq!(response.status().as_u16(), 201);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let email = unique_email("dup");

    let response = signup(&client, &address, "First", &email, "abc12345", "farmer").await;
    assert_eq!(response.status().as_u16(), 201);

    let response = signup(&client, &address, "Second", &email, "abc12345", "company").await;
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn unknown_credentials_are_rejected_generically() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = login(&client, &address, "nobody@example.com", "wrong1234").await;

    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid email or password.");
}

#[tokio::test]
async fn approval_gates_login() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let email = unique_email("farmer");

    // 1. Signup
    let response = signup(&client, &address, "A Farmer", &email, "abc12345", "farmer").await;
    assert_eq!(response.status().as_u16(), 201);

    // 2. Correct credentials before approval: pending message
    let response = login(&client, &address, &email, "abc12345").await;
    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("pending admin approval")
    );

    // 3. Admin approves
    let admin = admin_token(&client, &address).await;
    let pending: Vec<serde_json::Value> = client
        .get(format!("{address}/api/admin/users/pending"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = pending
        .iter()
        .find(|u| u["email"] == email.as_str())
        .expect("user should be pending")["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = client
        .post(format!("{address}/api/admin/users/{id}/approve"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    // 4. Same credentials now yield an active farmer session
    let response = login(&client, &address, &email, "abc12345").await;
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["role"], "farmer");
    assert!(body["token"].as_str().is_some());

    // 5. Approving again is a find-miss: the user left the pending mirror
    let response = client
        .post(format!("{address}/api/admin/users/{id}/approve"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200, "directory approve is idempotent");
}

#[tokio::test]
async fn rejected_user_is_gone_for_good() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let email = unique_email("reject");

    signup(&client, &address, "Unwanted", &email, "abc12345", "company").await;

    let admin = admin_token(&client, &address).await;
    let pending: Vec<serde_json::Value> = client
        .get(format!("{address}/api/admin/users/pending"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = pending
        .iter()
        .find(|u| u["email"] == email.as_str())
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = client
        .post(format!("{address}/api/admin/users/{id}/reject"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    // Rejection deleted the record; approval can no longer find it.
    let response = client
        .post(format!("{address}/api/admin/users/{id}/approve"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    // And the account cannot log in.
    let response = login(&client, &address, &email, "abc12345").await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn admin_routes_are_forbidden_for_other_roles() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = admin_token(&client, &address).await;

    let farmer = create_approved_user(
        &client,
        &address,
        &admin,
        "A Farmer",
        &unique_email("farmer"),
        "abc12345",
        "farmer",
    )
    .await;

    let response = client
        .get(format!("{address}/api/admin/users/pending"))
        .header("Authorization", format!("Bearer {}", farmer))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    // And entirely unauthenticated access is a 401.
    let response = client
        .get(format!("{address}/api/admin/users/pending"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn listing_approval_flow() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = admin_token(&client, &address).await;

    let farmer = create_approved_user(
        &client,
        &address,
        &admin,
        "A Farmer",
        &unique_email("farmer"),
        "abc12345",
        "farmer",
    )
    .await;

    // 1. Submit a listing
    let response = client
        .post(format!("{address}/api/listings"))
        .header("Authorization", format!("Bearer {}", farmer))
        .json(&serde_json::json!({
            "title": "Paddy Field Credits",
            "quantity": 10,
            "price": 500,
            "description": "Credits from alternate wetting and drying.",
            "state": "Kerala",
            "district": "Kochi",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let listing: serde_json::Value = response.json().await.unwrap();
    assert_eq!(listing["approved"], false);
    assert_eq!(listing["verified"], false);
    assert_eq!(listing["location"], "Kerala - Kochi");
    let listing_id = listing["id"].as_str().unwrap().to_string();

    // 2. Not visible in the marketplace while pending
    let marketplace: Vec<serde_json::Value> = client
        .get(format!("{address}/api/marketplace"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(marketplace.iter().all(|l| l["id"] != listing_id.as_str()));

    // 3. Visible in the owner's dashboard regardless of state
    let mine: Vec<serde_json::Value> = client
        .get(format!("{address}/api/listings/mine"))
        .header("Authorization", format!("Bearer {}", farmer))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);

    // 4. Admin sees it pending and approves it
    let pending: Vec<serde_json::Value> = client
        .get(format!("{address}/api/admin/listings/pending"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(pending.iter().any(|l| l["id"] == listing_id.as_str()));

    let response = client
        .post(format!("{address}/api/admin/listings/{listing_id}/approve"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let approved: serde_json::Value = response.json().await.unwrap();
    assert_eq!(approved["approved"], true);
    assert_eq!(approved["verified"], true);

    // 5. Approving again leaves the state unchanged and duplicates nothing
    let response = client
        .post(format!("{address}/api/admin/listings/{listing_id}/approve"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let marketplace: Vec<serde_json::Value> = client
        .get(format!("{address}/api/marketplace"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let visible: Vec<_> = marketplace
        .iter()
        .filter(|l| l["id"] == listing_id.as_str())
        .collect();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0]["verified"], true);
}

#[tokio::test]
async fn only_farmers_can_create_listings() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = admin_token(&client, &address).await;

    let company = create_approved_user(
        &client,
        &address,
        &admin,
        "Acme Co",
        &unique_email("company"),
        "abc12345",
        "company",
    )
    .await;

    let response = client
        .post(format!("{address}/api/listings"))
        .header("Authorization", format!("Bearer {}", company))
        .json(&serde_json::json!({
            "title": "Not Allowed",
            "quantity": 1,
            "price": 1,
            "description": "x",
            "state": "Kerala",
            "district": "Kochi",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn listing_validation_rejects_non_positive_values() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = admin_token(&client, &address).await;

    let farmer = create_approved_user(
        &client,
        &address,
        &admin,
        "A Farmer",
        &unique_email("farmer"),
        "abc12345",
        "farmer",
    )
    .await;

    let response = client
        .post(format!("{address}/api/listings"))
        .header("Authorization", format!("Bearer {}", farmer))
        .json(&serde_json::json!({
            "title": "Zero Quantity",
            "quantity": 0,
            "price": 500,
            "description": "x",
            "state": "Kerala",
            "district": "Kochi",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn deletion_is_owner_only() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = admin_token(&client, &address).await;

    let owner = create_approved_user(
        &client,
        &address,
        &admin,
        "Owner",
        &unique_email("owner"),
        "abc12345",
        "farmer",
    )
    .await;
    let intruder = create_approved_user(
        &client,
        &address,
        &admin,
        "Intruder",
        &unique_email("intruder"),
        "abc12345",
        "farmer",
    )
    .await;

    let listing: serde_json::Value = client
        .post(format!("{address}/api/listings"))
        .header("Authorization", format!("Bearer {}", owner))
        .json(&serde_json::json!({
            "title": "Mine",
            "quantity": 5,
            "price": 100,
            "description": "x",
            "state": "Kerala",
            "district": "Kochi",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let listing_id = listing["id"].as_str().unwrap();

    let response = client
        .delete(format!("{address}/api/listings/{listing_id}"))
        .header("Authorization", format!("Bearer {}", intruder))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let response = client
        .delete(format!("{address}/api/listings/{listing_id}"))
        .header("Authorization", format!("Bearer {}", owner))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    // Deleting again: the listing is already gone.
    let response = client
        .delete(format!("{address}/api/listings/{listing_id}"))
        .header("Authorization", format!("Bearer {}", owner))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn marketplace_filters_recompute_a_view() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = admin_token(&client, &address).await;

    let farmer = create_approved_user(
        &client,
        &address,
        &admin,
        "A Farmer",
        &unique_email("farmer"),
        "abc12345",
        "farmer",
    )
    .await;

    for (title, state, district, price) in [
        ("Kerala Credits", "Kerala", "Kochi", 500.0),
        ("Punjab Credits", "Punjab", "Ludhiana", 900.0),
    ] {
        let listing: serde_json::Value = client
            .post(format!("{address}/api/listings"))
            .header("Authorization", format!("Bearer {}", farmer))
            .json(&serde_json::json!({
                "title": title,
                "quantity": 10,
                "price": price,
                "description": "x",
                "state": state,
                "district": district,
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let id = listing["id"].as_str().unwrap();
        let response = client
            .post(format!("{address}/api/admin/listings/{id}/approve"))
            .header("Authorization", format!("Bearer {}", admin))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    // Case-insensitive substring on state
    let filtered: Vec<serde_json::Value> = client
        .get(format!("{address}/api/marketplace?state=ker"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["state"], "Kerala");

    // Price ceiling
    let filtered: Vec<serde_json::Value> = client
        .get(format!("{address}/api/marketplace?max_price=600"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["title"], "Kerala Credits");

    // No filters: the catalog view is intact
    let all: Vec<serde_json::Value> = client
        .get(format!("{address}/api/marketplace"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn payment_is_recorded_with_a_receipt() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = admin_token(&client, &address).await;

    let farmer = create_approved_user(
        &client,
        &address,
        &admin,
        "A Farmer",
        &unique_email("farmer"),
        "abc12345",
        "farmer",
    )
    .await;
    let company = create_approved_user(
        &client,
        &address,
        &admin,
        "Acme Co",
        &unique_email("company"),
        "abc12345",
        "company",
    )
    .await;

    // Farmer lists, admin approves.
    let listing: serde_json::Value = client
        .post(format!("{address}/api/listings"))
        .header("Authorization", format!("Bearer {}", farmer))
        .json(&serde_json::json!({
            "title": "Agroforestry Credits",
            "quantity": 10,
            "price": 500,
            "description": "x",
            "state": "Kerala",
            "district": "Kochi",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let listing_id = listing["id"].as_str().unwrap().to_string();
    client
        .post(format!("{address}/api/admin/listings/{listing_id}/approve"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap();

    // The company's own id, for the ledger ownership check.
    let me: serde_json::Value = client
        .get(format!("{address}/api/profile/me"))
        .header("Authorization", format!("Bearer {}", company))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let company_id = me["user"]["id"].as_str().unwrap().to_string();

    // Provider reports a completed payment.
    let response = client
        .post(format!("{address}/api/payments"))
        .header("Authorization", format!("Bearer {}", company))
        .json(&serde_json::json!({
            "listing_id": listing_id,
            "amount": 5000,
            "quantity": 10,
            "price_per_unit": 500,
            "payment_method": "BharatPe",
            "payment_id": "bp_12345",
            "status": "completed",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();

    let receipt = body["payment"]["receipt_number"].as_str().unwrap();
    assert!(receipt.starts_with("PC"), "receipt was {receipt}");
    assert_eq!(receipt.len(), 14);
    assert!(receipt[2..].chars().all(|c| c.is_ascii_digit()));

    assert_eq!(body["payment"]["user_id"], company_id.as_str());
    assert_eq!(body["payment"]["listing_title"], "Agroforestry Credits");
    // No SMTP configured in tests: the ledger write stands regardless.
    assert_eq!(body["email_sent"], false);

    // Purchase history and aggregates.
    let history: serde_json::Value = client
        .get(format!("{address}/api/payments/mine"))
        .header("Authorization", format!("Bearer {}", company))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["payments"].as_array().unwrap().len(), 1);
    assert_eq!(history["stats"]["total_purchases"], 1);
    assert_eq!(history["stats"]["total_spent"], 5000.0);
    assert_eq!(history["stats"]["total_co2_offset"], 10.0);
}

#[tokio::test]
async fn payment_for_a_missing_listing_is_not_found() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = admin_token(&client, &address).await;

    let company = create_approved_user(
        &client,
        &address,
        &admin,
        "Acme Co",
        &unique_email("company"),
        "abc12345",
        "company",
    )
    .await;

    let response = client
        .post(format!("{address}/api/payments"))
        .header("Authorization", format!("Bearer {}", company))
        .json(&serde_json::json!({
            "listing_id": "listing-gone",
            "amount": 100,
            "quantity": 1,
            "price_per_unit": 100,
            "payment_method": "Razorpay",
            "payment_id": "pay_1",
            "status": "completed",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn five_failed_logins_lock_the_account() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = admin_token(&client, &address).await;

    let email = unique_email("locked");
    create_approved_user(&client, &address, &admin, "Victim", &email, "abc12345", "company").await;

    for _ in 0..5 {
        let response = login(&client, &address, &email, "wrong-pass1").await;
        assert_eq!(response.status().as_u16(), 401);
    }

    // The sixth attempt is refused before credentials are even checked.
    let response = login(&client, &address, &email, "abc12345").await;
    assert_eq!(response.status().as_u16(), 429);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("temporarily locked")
    );
}

#[tokio::test]
async fn admin_stats_track_live_collections() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = admin_token(&client, &address).await;

    let stats: serde_json::Value = client
        .get(format!("{address}/api/admin/stats"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["pending_users"], 0);
    // The seeded admin is the only approved account.
    assert_eq!(stats["verified_users"], 1);

    signup(&client, &address, "New", &unique_email("new"), "abc12345", "farmer").await;

    let stats: serde_json::Value = client
        .get(format!("{address}/api/admin/stats"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["pending_users"], 1);
    assert_eq!(stats["flagged_items"], 0);
}

#[tokio::test]
async fn status_banner_dismissal_is_persisted() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let admin = admin_token(&client, &address).await;

    let banner: serde_json::Value = client
        .get(format!("{address}/api/profile/banner"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(banner["dismissed"], false);

    let response = client
        .post(format!("{address}/api/profile/banner/dismiss"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let banner: serde_json::Value = client
        .get(format!("{address}/api/profile/banner"))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(banner["dismissed"], true);
}

#[tokio::test]
async fn send_email_requires_all_fields() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{address}/api/send-email"))
        .json(&serde_json::json!({ "to": "a@x.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn payment_order_requires_amount_and_currency() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{address}/api/payments/order"))
        .json(&serde_json::json!({ "receipt": "r_1" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .put(format!("{address}/api/payments/order"))
        .json(&serde_json::json!({ "razorpay_order_id": "order_1" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}
