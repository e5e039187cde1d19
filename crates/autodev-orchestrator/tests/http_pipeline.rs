//! Pipeline against live HTTP agents: the real planning routes plus stub
//! emission agents, all served from one ephemeral port.

use autodev_core::Architecture;
use autodev_orchestrator::{
    AgentEndpoints, BackendTask, DatabaseTask, EmissionResponse, GeneratedFile, HttpAgentClient,
    Orchestrator, OrchestratorSettings, PipelineReport, Stage, StageOutcome, Story, TestingResponse,
    TestingTask,
};
use autodev_planning::{routes, PlanningService};
use autodev_store::{MemoryExecutionLog, MokaSessionStore};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::Filter;

fn file(path: String, language: &str) -> GeneratedFile {
    GeneratedFile {
        file_path: path,
        content: String::new(),
        language: language.to_string(),
    }
}

fn spawn_agents() -> SocketAddr {
    let planning = routes(Arc::new(PlanningService::new(
        Arc::new(MokaSessionStore::default()),
        Arc::new(MemoryExecutionLog::new()),
    )));

    let database = warp::path!("agents" / "database")
        .and(warp::post())
        .and(warp::body::json())
        .map(|task: DatabaseTask| {
            warp::reply::json(&EmissionResponse {
                status: "success".into(),
                task_id: task.task_id,
                generated_files: task
                    .tables
                    .iter()
                    .map(|t| file(format!("migrations/{}.sql", t.name), "sql"))
                    .collect(),
            })
        });

    let backend = warp::path!("agents" / "backend")
        .and(warp::post())
        .and(warp::body::json())
        .map(|task: BackendTask| {
            warp::reply::json(&EmissionResponse {
                status: "success".into(),
                task_id: task.task_id,
                generated_files: vec![file("app/main.py".into(), "python")],
            })
        });

    let frontend = warp::path!("agents" / "frontend")
        .and(warp::post())
        .map(|| warp::reply::with_status("frontend agent down", StatusCode::SERVICE_UNAVAILABLE));

    let testing = warp::path!("agents" / "testing")
        .and(warp::post())
        .and(warp::body::json())
        .map(|task: TestingTask| {
            warp::reply::json(&TestingResponse {
                status: "success".into(),
                task_id: task.task_id,
                generated_files: Vec::new(),
                tests_passed: true,
                coverage: 85.0,
                total_tests: task.code_layers.len() as u32 * 4,
            })
        });

    // Planning recovers every rejection, so it has to come last.
    let api = database.or(backend).or(frontend).or(testing).or(planning);
    let (addr, server) = warp::serve(api).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn orchestrator(agents: AgentEndpoints) -> Orchestrator {
    let settings = OrchestratorSettings::default().with_agents(agents);
    let client = HttpAgentClient::new(&settings).unwrap();
    Orchestrator::new(Arc::new(client), settings.project_id)
}

#[tokio::test]
async fn sample_story_runs_through_all_agents() {
    let addr = spawn_agents();
    let base = format!("http://{addr}");

    let report = orchestrator(AgentEndpoints::uniform(&base))
        .process_story(&Story::sample())
        .await;

    let PipelineReport::Success(success) = report else {
        panic!("planning should succeed");
    };
    assert_eq!(success.story_id, "US-001");
    assert!(success.session_id.starts_with("session_US-001_"));

    assert_eq!(
        success.stages[0],
        StageOutcome::Completed {
            stage: Stage::Database,
            generated_files: 2,
            tests: None,
        }
    );
    assert!(success.stages[1].is_completed());
    match &success.stages[2] {
        StageOutcome::Failed { stage, error } => {
            assert_eq!(*stage, Stage::Frontend);
            assert!(error.contains("503"));
        }
        other => panic!("frontend should fail, got {other:?}"),
    }
    match &success.stages[3] {
        StageOutcome::Completed { tests: Some(tests), .. } => assert_eq!(tests.total_tests, 12),
        other => panic!("testing should complete, got {other:?}"),
    }

    let cached: Architecture = reqwest::get(format!(
        "{base}/agents/planning/{}",
        success.session_id
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();
    assert_eq!(cached, success.architecture);
}

#[tokio::test]
async fn unreachable_planning_agent_fails_the_run() {
    let addr = spawn_agents();
    let mut agents = AgentEndpoints::uniform(format!("http://{addr}"));
    agents.planning = "http://127.0.0.1:9".to_string();

    let report = orchestrator(agents).process_story(&Story::sample()).await;

    match report {
        PipelineReport::Failed { stage, error } => {
            assert_eq!(stage, Stage::Planning);
            assert!(error.contains("planning agent unreachable"));
        }
        PipelineReport::Success(_) => panic!("run should stop at planning"),
    }
}
