use async_trait::async_trait;
use reqwest::StatusCode;
use rota_client::{ClientError, JobPoller, PollOutcome, RotaClient};
use rota_core::domain::assignment::AssignmentGrid;
use rota_core::domain::job::SolveParams;
use rota_core::dto::job::SubmitJob;
use rota_core::dto::schedule::{ClearSchedule, UpdateAssignment};
use rota_core::dto::year::CreateYear;
use rota_server::registry::JobRegistry;
use rota_server::solver::{SolveOutcome, Solver};
use rota_server::state::AppState;
use rota_server::{api, db};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(solver: impl Solver + 'static) -> Self {
        // Same router as prod, in-memory database, ephemeral port
        let pool = db::create_memory_pool().await.unwrap();
        let state = AppState::new(
            pool,
            JobRegistry::new(Duration::from_secs(3600)),
            Arc::new(solver),
        );
        let app = api::create_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn client(&self) -> RotaClient {
        RotaClient::new(&self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Answers every computation with the same outcome
struct FixedSolver(SolveOutcome);

#[async_trait]
impl Solver for FixedSolver {
    async fn solve(&self, _params: SolveParams) -> anyhow::Result<SolveOutcome> {
        tokio::time::sleep(Duration::from_millis(30)).await;
        Ok(self.0.clone())
    }
}

fn feasible(grid: AssignmentGrid) -> FixedSolver {
    FixedSolver(SolveOutcome {
        success: true,
        status: "OPTIMAL".into(),
        assignments: Some(grid),
        ..Default::default()
    })
}

fn grid(rows: &[(i64, i64, &str)]) -> AssignmentGrid {
    let mut grid = AssignmentGrid::new();
    for (resident, week, code) in rows {
        grid.entry(*resident)
            .or_default()
            .insert(*week, code.to_string());
    }
    grid
}

async fn create_year(client: &RotaClient) -> i64 {
    client
        .create_year(CreateYear {
            name: "2025-2026".into(),
            start_date: String::new(),
        })
        .await
        .unwrap()
        .id
}

fn poller(client: RotaClient) -> JobPoller<RotaClient> {
    JobPoller::new(client).with_interval(Duration::from_millis(10))
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn(feasible(AssignmentGrid::new())).await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn submitted_job_completes_and_writes_schedule() {
    let solved = grid(&[(1, 1, "A"), (1, 2, "ICU"), (2, 1, "NF")]);
    let srv = TestServer::spawn(feasible(solved.clone())).await;
    let client = srv.client();
    let year_id = create_year(&client).await;

    let res = reqwest::Client::new()
        .post(format!("{}/api/schedule/generate", srv.base_url))
        .json(&json!({ "year_id": year_id, "time_limit_seconds": 300 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let body: serde_json::Value = res.json().await.unwrap();
    let job_id: Uuid = body["job_id"].as_str().unwrap().parse().unwrap();

    let outcome = poller(client.clone()).wait(job_id).await.unwrap();
    assert!(matches!(outcome, PollOutcome::Completed(ref r) if r.status == "OPTIMAL"));

    assert_eq!(client.get_assignments(year_id).await.unwrap(), solved);

    let jobs = client.list_jobs(year_id).await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, job_id);
    assert_eq!(jobs[0].params.time_limit_seconds, Some(300));
}

#[tokio::test]
async fn infeasible_job_reports_conflicts() {
    let srv = TestServer::spawn(FixedSolver(SolveOutcome {
        success: false,
        status: "INFEASIBLE".into(),
        conflicts: vec!["Resident 4 has two hard locks in week 10".into()],
        ..Default::default()
    }))
    .await;
    let client = srv.client();
    let year_id = create_year(&client).await;

    let submitted = client
        .submit_job(SubmitJob {
            year_id,
            time_limit_seconds: None,
        })
        .await
        .unwrap();

    match poller(client).wait(submitted.job_id).await.unwrap() {
        PollOutcome::Failed(result) => {
            assert_eq!(result.status, "INFEASIBLE");
            assert_eq!(result.conflicts.len(), 1);
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn unknown_job_is_404_and_lost_to_poller() {
    let srv = TestServer::spawn(feasible(AssignmentGrid::new())).await;
    let client = srv.client();
    let job_id = Uuid::new_v4();

    let err = client.get_job(job_id).await.unwrap_err();
    assert!(err.is_not_found());

    let err = poller(client).wait(job_id).await.unwrap_err();
    assert!(matches!(err, ClientError::JobLost { .. }));
}

#[tokio::test]
async fn malformed_job_id_is_404_with_json_error() {
    let srv = TestServer::spawn(feasible(AssignmentGrid::new())).await;

    let res = reqwest::get(format!(
        "{}/api/schedule/generate/status/abc123",
        srv.base_url
    ))
    .await
    .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Job abc123 not found");
}

#[tokio::test]
async fn submit_for_unknown_year_is_404() {
    let srv = TestServer::spawn(feasible(AssignmentGrid::new())).await;

    let err = srv
        .client()
        .submit_job(SubmitJob {
            year_id: 42,
            time_limit_seconds: None,
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn clear_requires_phrase_and_restore_brings_rows_back() {
    let srv = TestServer::spawn(feasible(AssignmentGrid::new())).await;
    let client = srv.client();
    let year_id = create_year(&client).await;

    for week in 1..=4 {
        client
            .update_assignment(UpdateAssignment {
                resident_id: 5,
                year_id,
                week_number: week,
                rotation_code: "CLINIC".into(),
            })
            .await
            .unwrap();
    }
    let before = client.get_assignments(year_id).await.unwrap();

    let err = client
        .clear_schedule(ClearSchedule {
            year_id,
            resident_id: None,
            confirm_text: "delete".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::ApiError { status: 400, .. }));
    assert_eq!(client.get_assignments(year_id).await.unwrap(), before);
    assert!(client.list_backups(year_id).await.unwrap().is_empty());

    let cleared = client
        .clear_schedule(ClearSchedule {
            year_id,
            resident_id: None,
            confirm_text: "DELETE".into(),
        })
        .await
        .unwrap();
    assert_eq!(cleared.cleared, 4);
    assert!(client.get_assignments(year_id).await.unwrap().is_empty());

    let backups = client.list_backups(year_id).await.unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0].id, cleared.backup_id);

    let restored = client.restore_backup(cleared.backup_id).await.unwrap();
    assert_eq!(restored.restored, 4);
    assert_eq!(client.get_assignments(year_id).await.unwrap(), before);

    let err = client.restore_backup(9999).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn export_is_an_xlsx_attachment() {
    let srv = TestServer::spawn(feasible(AssignmentGrid::new())).await;
    let client = srv.client();
    let year_id = create_year(&client).await;

    let export = client.export_schedule(year_id).await.unwrap();

    assert_eq!(
        export.content_type.as_deref(),
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    );
    assert_eq!(export.filename, Some(format!("schedule_{}.xlsx", year_id)));
    assert_eq!(&export.bytes[..2], b"PK");
}

#[tokio::test]
async fn years_listed_with_and_without_trailing_slash() {
    let srv = TestServer::spawn(feasible(AssignmentGrid::new())).await;
    let client = srv.client();
    let year_id = create_year(&client).await;

    let http = reqwest::Client::new();
    for path in ["/api/years", "/api/years/"] {
        let res = http
            .get(format!("{}{}", srv.base_url, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let years: serde_json::Value = res.json().await.unwrap();
        assert_eq!(years[0]["id"], year_id);
    }

    let year = client.get_year(year_id).await.unwrap();
    assert_eq!(year.start_date, "2025-07-01");
}
