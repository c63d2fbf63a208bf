use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Metrics {
    members: usize,
    membership_revenue: String,
    shop_sales: String,
    total_income: String,
}

#[derive(Debug, Deserialize)]
struct DirectoryRow {
    name: String,
    overdue: bool,
}

#[derive(Debug, Deserialize)]
struct Progress {
    goal: String,
    fraction: f64,
    percent: u32,
}

#[derive(Debug, Deserialize)]
struct Member {
    name: String,
    plan: String,
    next_payment: String,
}

#[derive(Debug, Deserialize)]
struct Dashboard {
    metrics: Metrics,
    progress: Progress,
    directory: Vec<DirectoryRow>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::Once;
    use std::sync::atomic::{AtomicI32, Ordering};

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/healthz")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_gym_dashboard"))
        .env("PORT", port.to_string())
        .env("GYM_DEFAULT_GOAL", "5000")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

/// Each client carries its own cookie jar, so each is a separate gym session.
fn session_client() -> Client {
    Client::builder().cookie_store(true).build().unwrap()
}

async fn dashboard(client: &Client, base_url: &str, search: &str) -> Dashboard {
    client
        .get(format!("{base_url}/api/dashboard"))
        .query(&[("q", search)])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_new_session_is_seeded() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = session_client();

    let snapshot = dashboard(&client, &server.base_url, "").await;
    assert_eq!(snapshot.metrics.members, 2);
    assert_eq!(snapshot.metrics.membership_revenue, "150");
    assert_eq!(snapshot.metrics.shop_sales, "0");
    assert_eq!(snapshot.progress.percent, 3);
    assert_eq!(snapshot.directory.len(), 2);
}

#[tokio::test]
async fn http_form_registration_adds_member() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = session_client();

    let response = client
        .post(format!("{}/members", server.base_url))
        .form(&[("name", "Kwame Asante"), ("phone", "+233277000111"), ("plan", "basic")])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let page = response.text().await.unwrap();
    assert!(page.contains("Added Kwame Asante!"));
    assert!(page.contains("Kwame Asante"));

    let snapshot = dashboard(&client, &server.base_url, "kwame").await;
    assert_eq!(snapshot.metrics.members, 3);
    assert_eq!(snapshot.metrics.membership_revenue, "170");
    assert_eq!(snapshot.directory.len(), 1);
    assert_eq!(snapshot.directory[0].name, "Kwame Asante");
    assert!(!snapshot.directory[0].overdue);
}

#[tokio::test]
async fn http_form_registration_requires_phone() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = session_client();

    let page = client
        .post(format!("{}/members", server.base_url))
        .form(&[("name", "No Phone"), ("phone", ""), ("plan", "pro")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("phone is required"));

    let snapshot = dashboard(&client, &server.base_url, "").await;
    assert_eq!(snapshot.metrics.members, 2);
}

#[tokio::test]
async fn http_shop_sales_are_per_session() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = session_client();
    let other = session_client();

    for _ in 0..3 {
        let response = client
            .post(format!("{}/shop/water", server.base_url))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let response = client
        .post(format!("{}/api/shop", server.base_url))
        .json(&serde_json::json!({ "action": "energy-drink" }))
        .send()
        .await
        .unwrap();
    let metrics: Metrics = response.json().await.unwrap();
    assert_eq!(metrics.shop_sales, "6");
    assert_eq!(metrics.total_income, "156");

    let untouched = dashboard(&other, &server.base_url, "").await;
    assert_eq!(untouched.metrics.shop_sales, "0");

    client
        .post(format!("{}/shop/reset", server.base_url))
        .send()
        .await
        .unwrap();
    let snapshot = dashboard(&client, &server.base_url, "").await;
    assert_eq!(snapshot.metrics.shop_sales, "0");
}

#[tokio::test]
async fn http_unknown_shop_action_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = session_client();

    let response = client
        .post(format!("{}/api/shop", server.base_url))
        .json(&serde_json::json!({ "action": "candy" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_goal_updates_progress() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = session_client();

    let response = client
        .put(format!("{}/api/goal", server.base_url))
        .json(&serde_json::json!({ "goal": "100" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let progress: Progress = response.json().await.unwrap();
    assert_eq!(progress.fraction, 1.0);
    assert_eq!(progress.percent, 100);

    let response = client
        .put(format!("{}/api/goal", server.base_url))
        .json(&serde_json::json!({ "goal": "0" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_export_downloads_csv() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = session_client();

    let response = client
        .get(format!("{}/export.csv", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/csv"
    );
    let disposition = response.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("Adams_Inn_Report_"));

    let body = response.text().await.unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "Name,Phone,Plan,Next Payment,Status");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("John Doe,+233244123456,Pro ($50),2026-03-01,"));
}

#[tokio::test]
async fn http_form_goal_keeps_previous_on_bad_input() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = session_client();

    let page = client
        .post(format!("{}/goal", server.base_url))
        .form(&[("goal", "7500")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Goal set to $7500."));
    assert!(page.contains("Revenue Goal: $7500"));

    let page = client
        .post(format!("{}/goal", server.base_url))
        .form(&[("goal", "lots")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("goal must be a number"));

    let page = client
        .post(format!("{}/goal", server.base_url))
        .form(&[("goal", "-5")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("goal must be greater than zero"));

    let snapshot = dashboard(&client, &server.base_url, "").await;
    assert_eq!(snapshot.progress.goal, "7500");
    assert_eq!(snapshot.progress.percent, 2);
}

#[tokio::test]
async fn http_api_registration_sets_due_date() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = session_client();

    let response = client
        .post(format!("{}/api/members", server.base_url))
        .json(&serde_json::json!({ "name": "Efua Boateng", "phone": "+233241112222", "plan": "elite" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let member: Member = response.json().await.unwrap();
    let due = chrono::Local::now().date_naive() + chrono::Duration::days(30);
    assert_eq!(member.name, "Efua Boateng");
    assert_eq!(member.plan, "elite");
    assert_eq!(member.next_payment, due.format("%Y-%m-%d").to_string());

    let response = client
        .post(format!("{}/api/members", server.base_url))
        .json(&serde_json::json!({ "name": "", "phone": "+233241112222", "plan": "basic" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let snapshot = dashboard(&client, &server.base_url, "").await;
    assert_eq!(snapshot.metrics.members, 3);
    assert_eq!(snapshot.metrics.membership_revenue, "250");
}
