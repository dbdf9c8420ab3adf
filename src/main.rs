use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use training_pulse::config::AppConfig;
use training_pulse::error::AppError;
use training_pulse::survey::{
    build_report, is_year_month, rank, render_csv, validate_submission, AreaCatalog, AreaScore,
    InMemorySurveyStore, InstructorStat, NewSurvey, SurveyResponse, SurveyStore,
};
use training_pulse::telemetry;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    store: Arc<dyn SurveyStore>,
}

#[derive(Parser, Debug)]
#[command(
    name = "training-pulse",
    about = "Aggregate onboarding training feedback into rankings, scorecards, and exports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the instructor leaderboard from a response snapshot
    Rank(RankArgs),
    /// Print the scorecard for one submitted survey
    Report(ReportArgs),
    /// Write the full response snapshot as a BOM-prefixed CSV
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    /// JSON snapshot of the response collection
    #[arg(long)]
    surveys: PathBuf,
    /// JSON snapshot of the area catalog (defaults to the stock catalog)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RankArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,
    /// Restrict to one calendar month of submissions (YYYY-MM)
    #[arg(long)]
    month: Option<String>,
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,
    /// Survey id to build the scorecard for
    #[arg(long)]
    id: String,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,
    #[arg(long, default_value = "training_feedback.csv")]
    out: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RankingQuery {
    month: Option<String>,
}

#[derive(Debug, Serialize)]
struct RankingResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    month: Option<String>,
    entries: Vec<InstructorStat>,
}

#[derive(Debug, Serialize)]
struct SurveyReportResponse {
    id: String,
    collaborator: String,
    submitted_at: DateTime<Utc>,
    per_area: Vec<AreaScore>,
    overall_average: u32,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Rank(args) => run_rank(args),
        Command::Report(args) => run_report(args),
        Command::Export(args) => run_export(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        store: Arc::new(InMemorySurveyStore::new()),
    };

    let app = api_router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "training feedback service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/config",
            get(catalog_endpoint).put(replace_catalog_endpoint),
        )
        .route(
            "/api/v1/surveys",
            get(list_surveys_endpoint).post(submit_survey_endpoint),
        )
        .route("/api/v1/surveys/:id/report", get(survey_report_endpoint))
        .route("/api/v1/ranking", get(ranking_endpoint))
        .route("/api/v1/export.csv", get(export_endpoint))
        .with_state(state)
}

fn load_catalog(path: Option<&std::path::Path>) -> Result<AreaCatalog, AppError> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(AreaCatalog::standard()),
    }
}

fn load_responses(path: &std::path::Path) -> Result<Vec<SurveyResponse>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn run_rank(args: RankArgs) -> Result<(), AppError> {
    if let Some(month) = &args.month {
        if !is_year_month(month) {
            return Err(AppError::InvalidMonth(month.clone()));
        }
    }

    let catalog = load_catalog(args.snapshot.config.as_deref())?;
    let responses = load_responses(&args.snapshot.surveys)?;
    let stats = rank(&responses, &catalog, args.month.as_deref());

    if stats.is_empty() {
        println!("No ratings in this window.");
        return Ok(());
    }

    match &args.month {
        Some(month) => println!("Instructor ranking for {month}"),
        None => println!("Instructor ranking (all time)"),
    }
    for (position, stat) in stats.iter().take(args.limit).enumerate() {
        println!(
            "{:>2}. {} ({}) avg {:.1} from {} ratings",
            position + 1,
            stat.name,
            stat.area_label,
            stat.average,
            stat.count
        );
    }

    Ok(())
}

fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.snapshot.config.as_deref())?;
    let responses = load_responses(&args.snapshot.surveys)?;
    let response = responses
        .iter()
        .find(|response| response.id == args.id)
        .ok_or_else(|| AppError::UnknownSurvey(args.id.clone()))?;

    let report = build_report(response, &catalog);

    println!("Scorecard for {} ({})", response.name, response.id);
    println!(
        "Submitted {} | overall {}",
        response.created_at.format("%d/%m/%Y"),
        report.overall_average
    );
    for area in &report.per_area {
        println!(
            "- {}: content {} | instructor {:.0} ({} stars, {})",
            area.area_label,
            area.content_score,
            area.instructor_score,
            area.instructor_rating,
            if area.instructor_name.is_empty() {
                "no instructor"
            } else {
                area.instructor_name.as_str()
            }
        );
        if let Some(comment) = &area.comment {
            println!("  \"{comment}\"");
        }
    }

    Ok(())
}

fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.snapshot.config.as_deref())?;
    let responses = load_responses(&args.snapshot.surveys)?;
    let bytes = render_csv(&responses, &catalog)?;
    std::fs::write(&args.out, bytes)?;
    println!(
        "Export written to {} ({} responses x {} areas).",
        args.out.display(),
        responses.len(),
        catalog.len()
    );
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn catalog_endpoint(State(state): State<AppState>) -> Result<Json<AreaCatalog>, AppError> {
    Ok(Json(state.store.catalog()?))
}

async fn replace_catalog_endpoint(
    State(state): State<AppState>,
    Json(catalog): Json<AreaCatalog>,
) -> Result<StatusCode, AppError> {
    state.store.replace_catalog(catalog)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn submit_survey_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<NewSurvey>,
) -> Result<(StatusCode, Json<SurveyResponse>), AppError> {
    let catalog = state.store.catalog()?;
    validate_submission(&payload, &catalog)?;
    let created = state.store.create(payload)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_surveys_endpoint(
    State(state): State<AppState>,
) -> Result<Json<Vec<SurveyResponse>>, AppError> {
    Ok(Json(state.store.responses()?))
}

async fn survey_report_endpoint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SurveyReportResponse>, AppError> {
    let catalog = state.store.catalog()?;
    let response = state
        .store
        .fetch(&id)?
        .ok_or(AppError::UnknownSurvey(id))?;

    let report = build_report(&response, &catalog);
    Ok(Json(SurveyReportResponse {
        id: response.id,
        collaborator: response.name,
        submitted_at: response.created_at,
        per_area: report.per_area,
        overall_average: report.overall_average,
    }))
}

async fn ranking_endpoint(
    State(state): State<AppState>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<RankingResponse>, AppError> {
    if let Some(month) = &query.month {
        if !is_year_month(month) {
            return Err(AppError::InvalidMonth(month.clone()));
        }
    }

    let catalog = state.store.catalog()?;
    let responses = state.store.responses()?;
    let entries = rank(&responses, &catalog, query.month.as_deref());

    Ok(Json(RankingResponse {
        month: query.month,
        entries,
    }))
}

async fn export_endpoint(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let catalog = state.store.catalog()?;
    let responses = state.store.responses()?;
    let bytes = render_csv(&responses, &catalog)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"training_feedback.csv\"",
            ),
        ],
        bytes,
    ))
}
