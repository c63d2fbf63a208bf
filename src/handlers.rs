use crate::errors::AppError;
use crate::export::{members_csv, report_filename};
use crate::models::{
    DashboardResponse, GoalProgress, GoalRequest, GoalUpdate, Member, Metrics, Notice, Plan,
    RegisterRequest, SearchQuery, ShopAction, ShopRequest,
};
use crate::state::AppState;
use crate::stats::{build_dashboard, goal_progress, metrics};
use crate::store::GymStore;
use crate::ui::render_index;
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect},
};
use chrono::{Local, NaiveDate};
use tower_sessions::Session;
use tracing::warn;

pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>, AppError> {
    let store = state.sessions.resolve(&session).await?;
    let mut store = store.lock().await;
    Ok(Html(render_index(&build_dashboard(&mut store, &query.q))))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let store = state.sessions.resolve(&session).await?;
    let mut store = store.lock().await;
    Ok(Json(build_dashboard(&mut store, &query.q)))
}

pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Member>), AppError> {
    let store = state.sessions.resolve(&session).await?;
    let mut store = store.lock().await;
    let member = register_member(&mut store, &payload, today())?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn register_form(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterRequest>,
) -> Result<Redirect, AppError> {
    let store = state.sessions.resolve(&session).await?;
    let mut store = store.lock().await;
    if let Err(err) = register_member(&mut store, &form, today()) {
        warn!(reason = %err.message, "registration rejected");
        store.push_notice(Notice::error(err.message));
    }
    Ok(Redirect::to("/"))
}

pub async fn shop(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ShopRequest>,
) -> Result<Json<Metrics>, AppError> {
    let action = payload.action.parse::<ShopAction>()?;
    let store = state.sessions.resolve(&session).await?;
    let mut store = store.lock().await;
    store.apply_shop(action);
    Ok(Json(metrics(&store)))
}

pub async fn shop_form(
    State(state): State<AppState>,
    session: Session,
    Path(action): Path<String>,
) -> Result<Redirect, AppError> {
    let action = action.parse::<ShopAction>()?;
    let store = state.sessions.resolve(&session).await?;
    store.lock().await.apply_shop(action);
    Ok(Redirect::to("/"))
}

pub async fn set_goal(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<GoalUpdate>,
) -> Result<Json<GoalProgress>, AppError> {
    let store = state.sessions.resolve(&session).await?;
    let mut store = store.lock().await;
    store.set_goal(payload.goal)?;
    Ok(Json(goal_progress(metrics(&store).total_income, store.goal())))
}

pub async fn set_goal_form(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<GoalRequest>,
) -> Result<Redirect, AppError> {
    let store = state.sessions.resolve(&session).await?;
    let mut store = store.lock().await;
    match store.set_goal_from_str(&form.goal) {
        Ok(()) => {
            let notice = Notice::success(format!("Goal set to ${}.", store.goal()));
            store.push_notice(notice);
        }
        Err(err) => {
            warn!(input = %form.goal, "goal rejected: {err}");
            store.push_notice(Notice::error(err.to_string()));
        }
    }
    Ok(Redirect::to("/"))
}

pub async fn export_csv(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let store = state.sessions.resolve(&session).await?;
    let store = store.lock().await;
    let date = today();
    let csv = members_csv(store.members(), date);
    let disposition = format!("attachment; filename=\"{}\"", report_filename(date));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

fn register_member(
    store: &mut GymStore,
    request: &RegisterRequest,
    today: NaiveDate,
) -> Result<Member, AppError> {
    let plan = request.plan.parse::<Plan>()?;
    let member = store.register(&request.name, &request.phone, plan, today)?;
    Ok(member.clone())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
