use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct HabitListEntry {
    name: String,
    selected: bool,
}

#[derive(Debug, Deserialize)]
struct HabitStats {
    total_days: usize,
    current_streak: u32,
}

#[derive(Debug, Deserialize)]
struct GridCell {
    date: Option<String>,
    active: bool,
}

#[derive(Debug, Deserialize)]
struct TrackerView {
    habits: Vec<HabitListEntry>,
    current_habit: Option<String>,
    pending_delete: Option<String>,
    today: String,
    stats: HabitStats,
    grid: Vec<GridCell>,
}

#[derive(Debug, Deserialize)]
struct ToggleResponse {
    date: String,
    active: Option<bool>,
    stats: HabitStats,
}

struct TestServer {
    base_url: String,
    data_path: String,
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
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

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

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("habit_grid_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/state")).send().await {
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
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_habit_grid"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", &data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        data_path,
        child,
    }
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

async fn post_view(client: &Client, url: String, body: Option<serde_json::Value>) -> TrackerView {
    let request = client.post(url);
    let request = match body {
        Some(body) => request.json(&body),
        None => request,
    };
    let response = request.send().await.unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

async fn add_habit(client: &Client, server: &TestServer, name: &str) -> TrackerView {
    post_view(
        client,
        format!("{}/api/habits", server.base_url),
        Some(serde_json::json!({ "name": name })),
    )
    .await
}

fn stored_habits(server: &TestServer) -> serde_json::Value {
    let bytes = std::fs::read(&server.data_path).expect("data file written");
    let storage: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    serde_json::from_str(storage["habits"].as_str().expect("habits key")).unwrap()
}

#[tokio::test]
async fn http_add_habit_selects_and_persists() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let view = add_habit(&client, &server, "  Stretch ").await;

    assert_eq!(view.current_habit.as_deref(), Some("Stretch"));
    let entry = view
        .habits
        .iter()
        .find(|habit| habit.name == "Stretch")
        .expect("missing habit");
    assert!(entry.selected);
    assert_eq!(view.grid.len(), 371);
    assert_eq!(view.stats.total_days, 0);
    assert_eq!(stored_habits(&server)["Stretch"], serde_json::json!({ "dates": {} }));
}

#[tokio::test]
async fn http_toggle_today_updates_stats() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let view = add_habit(&client, &server, "Meditate").await;
    let today = view.today.clone();

    let toggled: ToggleResponse = client
        .post(format!("{}/api/toggle/today", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(toggled.date, today);
    assert_eq!(toggled.active, Some(true));
    assert_eq!(toggled.stats.total_days, 1);
    assert_eq!(toggled.stats.current_streak, 1);
    assert_eq!(
        stored_habits(&server)["Meditate"]["dates"][today.as_str()],
        serde_json::json!(true)
    );

    let state: TrackerView = client
        .get(format!("{}/api/state", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let cell = state
        .grid
        .iter()
        .find(|cell| cell.date.as_deref() == Some(today.as_str()))
        .expect("today cell");
    assert!(cell.active);

    let untoggled: ToggleResponse = client
        .post(format!("{}/api/toggle", server.base_url))
        .json(&serde_json::json!({ "date": today }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(untoggled.active, Some(false));
    assert_eq!(untoggled.stats.total_days, 0);
}

#[tokio::test]
async fn http_toggle_rejects_bad_date() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/toggle", server.base_url))
        .json(&serde_json::json!({ "date": "not-a-date" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_delete_requires_confirmation() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    add_habit(&client, &server, "Journal").await;

    let pending = post_view(
        &client,
        format!("{}/api/habits/delete", server.base_url),
        Some(serde_json::json!({ "name": "Journal" })),
    )
    .await;
    assert_eq!(pending.pending_delete.as_deref(), Some("Journal"));
    assert!(pending.habits.iter().any(|habit| habit.name == "Journal"));

    let cancelled = post_view(
        &client,
        format!("{}/api/habits/delete/cancel", server.base_url),
        None,
    )
    .await;
    assert_eq!(cancelled.pending_delete, None);
    assert_eq!(cancelled.current_habit.as_deref(), Some("Journal"));

    post_view(
        &client,
        format!("{}/api/habits/delete", server.base_url),
        Some(serde_json::json!({ "name": "Journal" })),
    )
    .await;
    let deleted = post_view(
        &client,
        format!("{}/api/habits/delete/confirm", server.base_url),
        None,
    )
    .await;

    assert!(deleted.habits.iter().all(|habit| habit.name != "Journal"));
    assert_eq!(deleted.current_habit, None);
    assert!(deleted.grid.iter().all(|cell| cell.date.is_none() && !cell.active));
    assert_eq!(deleted.stats.total_days, 0);
    assert_eq!(deleted.stats.current_streak, 0);
    assert!(stored_habits(&server).get("Journal").is_none());
}
