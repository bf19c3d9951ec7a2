use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode, redirect};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExerciseView {
    id: String,
    done: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DayView {
    id: String,
    title: String,
    exercise_count: usize,
    exercises: Vec<ExerciseView>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Dashboard {
    week_key: String,
    total_exercises: usize,
    completed_count: usize,
    week_progress: u8,
    days: Vec<DayView>,
}

#[derive(Debug, Deserialize)]
struct Notification {
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToggleResponse {
    exercise_id: String,
    done: bool,
    notification: Option<Notification>,
    dashboard: Dashboard,
}

#[derive(Debug, Deserialize)]
struct Exercise {
    id: String,
    name: String,
    sets: u32,
    reps: String,
}

#[derive(Debug, Deserialize)]
struct WorkoutDay {
    id: String,
    title: String,
    #[serde(default)]
    exercises: Vec<Exercise>,
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
    path.push(format!("fittrack_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/dashboard")).send().await {
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
    let child = Command::new(env!("CARGO_BIN_EXE_fittrack"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
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

async fn dashboard(client: &Client, server: &TestServer) -> Dashboard {
    client
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn toggle(client: &Client, server: &TestServer, exercise_id: &str) -> ToggleResponse {
    let response = client
        .post(format!("{}/api/toggle", server.base_url))
        .json(&serde_json::json!({ "exerciseId": exercise_id }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

async fn plan(client: &Client, server: &TestServer) -> Vec<WorkoutDay> {
    client
        .get(format!("{}/api/plan", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn add_day(client: &Client, server: &TestServer, title: &str) -> WorkoutDay {
    let response = client
        .post(format!("{}/api/days", server.base_url))
        .json(&serde_json::json!({ "dayIndex": 6, "title": title }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

#[tokio::test]
async fn http_toggle_twice_restores_progress() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = dashboard(&client, &server).await;
    assert!(before.week_key.starts_with("week-"));
    let exercise_id = before.days[0].exercises[0].id.clone();
    let was_done = before.days[0].exercises[0].done;

    let first = toggle(&client, &server, &exercise_id).await;
    assert_eq!(first.exercise_id, exercise_id);
    assert_eq!(first.done, !was_done);

    let second = toggle(&client, &server, &exercise_id).await;
    assert_eq!(second.done, was_done);
    assert_eq!(second.dashboard.completed_count, before.completed_count);
    assert_eq!(second.dashboard.week_progress, before.week_progress);
}

#[tokio::test]
async fn http_new_day_completes_with_notification() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/days", server.base_url))
        .json(&serde_json::json!({ "dayIndex": 3, "title": "Cardio", "color": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let day: WorkoutDay = response.json().await.unwrap();
    assert_eq!(day.title, "Cardio");

    let mut exercise_ids = Vec::new();
    for name in ["Rowing", "Skipping"] {
        let exercise: Exercise = client
            .post(format!("{}/api/days/{}/exercises", server.base_url, day.id))
            .json(&serde_json::json!({ "name": name, "sets": "x", "reps": "" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(exercise.sets, 3);
        assert_eq!(exercise.reps, "12");
        exercise_ids.push(exercise.id);
    }

    let first = toggle(&client, &server, &exercise_ids[0]).await;
    assert!(first.notification.is_none());
    let second = toggle(&client, &server, &exercise_ids[1]).await;
    let notification = second.notification.expect("missing notification");
    assert!(notification.description.contains("Cardio"));

    let response = client
        .delete(format!("{}/api/days/{}", server.base_url, day.id))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let after = dashboard(&client, &server).await;
    assert!(after.days.iter().all(|d| d.id != day.id));
}

#[tokio::test]
async fn http_rejects_exercise_without_name() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = dashboard(&client, &server).await;
    let day = &before.days[0];

    let response = client
        .post(format!("{}/api/days/{}/exercises", server.base_url, day.id))
        .json(&serde_json::json!({ "name": "  ", "sets": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let after = dashboard(&client, &server).await;
    let same_day = after.days.iter().find(|d| d.id == day.id).unwrap();
    assert_eq!(same_day.exercise_count, day.exercise_count);
    assert_eq!(same_day.title, day.title);
    assert_eq!(after.total_exercises, before.total_exercises);
}

#[tokio::test]
async fn http_edit_and_remove_exercise() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let day = add_day(&client, &server, "Core").await;
    let exercises_url = format!("{}/api/days/{}/exercises", server.base_url, day.id);
    let exercise: Exercise = client
        .post(&exercises_url)
        .json(&serde_json::json!({ "name": "Crunches", "sets": 2 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let exercise_url = format!("{exercises_url}/{}", exercise.id);

    let response = client
        .put(&exercise_url)
        .json(&serde_json::json!({ "name": "Plank", "sets": 2.5, "reps": "60s" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let edited_plan: Vec<WorkoutDay> = response.json().await.unwrap();
    let edited = &edited_plan.iter().find(|d| d.id == day.id).unwrap().exercises[0];
    assert_eq!(edited.id, exercise.id);
    assert_eq!(edited.name, "Plank");
    assert_eq!(edited.sets, 3);
    assert_eq!(edited.reps, "60s");

    let response = client
        .put(&exercise_url)
        .json(&serde_json::json!({ "name": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let stored = plan(&client, &server).await;
    let kept = &stored.iter().find(|d| d.id == day.id).unwrap().exercises[0];
    assert_eq!(kept.name, "Plank");

    let response = client.delete(&exercise_url).send().await.unwrap();
    assert!(response.status().is_success());
    let stored = plan(&client, &server).await;
    assert!(stored.iter().find(|d| d.id == day.id).unwrap().exercises.is_empty());

    client
        .delete(format!("{}/api/days/{}", server.base_url, day.id))
        .send()
        .await
        .unwrap();
}

#[tokio::test]
async fn http_reset_clears_week_progress() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = dashboard(&client, &server).await;
    let exercise = &before.days[0].exercises[0];
    if !exercise.done {
        toggle(&client, &server, &exercise.id).await;
    }
    assert!(dashboard(&client, &server).await.completed_count > 0);

    let response = client
        .post(format!("{}/api/reset", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let reset: Dashboard = response.json().await.unwrap();
    assert_eq!(reset.completed_count, 0);
    assert_eq!(reset.week_progress, 0);
    assert_eq!(dashboard(&client, &server).await.completed_count, 0);
}

#[tokio::test]
async fn http_restore_brings_back_default_plan() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    add_day(&client, &server, "Extra").await;
    let response = client
        .post(format!("{}/api/plan/restore", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let restored: Vec<WorkoutDay> = response.json().await.unwrap();
    let titles: Vec<_> = restored.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, ["Upper body", "Cardio + Core", "Lower body"]);

    let after = dashboard(&client, &server).await;
    assert_eq!(after.days.len(), 3);
    assert_eq!(after.total_exercises, 12);
}

#[tokio::test]
async fn http_form_toggle_redirects_to_dashboard() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .unwrap();

    let before = dashboard(&client, &server).await;
    let exercise_id = before.days[0].exercises[0].id.clone();
    let was_done = before.days[0].exercises[0].done;

    let toggle_url = format!("{}/toggle/{}", server.base_url, exercise_id);
    let response = client.post(&toggle_url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/");

    let flipped = dashboard(&client, &server).await;
    assert_eq!(flipped.days[0].exercises[0].done, !was_done);

    client.post(&toggle_url).send().await.unwrap();
    let restored = dashboard(&client, &server).await;
    assert_eq!(restored.days[0].exercises[0].done, was_done);
    assert_eq!(restored.completed_count, before.completed_count);
}

#[tokio::test]
async fn http_rejects_day_of_week_out_of_range() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = dashboard(&client, &server).await;
    for day_index in [0, 8, 300, -1] {
        let response = client
            .post(format!("{}/api/days", server.base_url))
            .json(&serde_json::json!({ "dayIndex": day_index, "title": "Swim" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "dayIndex {day_index}");
    }
    assert_eq!(dashboard(&client, &server).await.days.len(), before.days.len());
}

#[tokio::test]
async fn http_index_page_renders_progress() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let current = dashboard(&client, &server).await;
    let response = client.get(&server.base_url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = response.text().await.unwrap();
    assert!(page.contains(&format!("<strong id=\"progress\">{}%</strong>", current.week_progress)));
    assert!(page.contains(&format!("<span id=\"week\">{}</span>", current.week_key)));
}
