use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const AUTH_API: &str = "SYNO.API.Auth";
pub const TASK_API: &str = "SYNO.DownloadStation.Task";

/// Returned for a bad account or password.
pub const ERROR_BAD_CREDENTIALS: i32 = 400;

#[derive(Clone, Debug)]
pub struct MockConfig {
    pub account: String,
    pub password: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            account: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Task {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub username: String,
    pub title: String,
    pub size: u64,
    pub status: String,
}

#[derive(Debug, Default)]
pub struct Nas {
    config: MockConfig,
    sessions: HashSet<String>,
    tasks: Vec<Task>,
    next_id: u64,
}

pub type Db = Arc<RwLock<Nas>>;

type Params = HashMap<String, String>;

pub fn app(config: MockConfig) -> Router {
    let db: Db = Arc::new(RwLock::new(Nas {
        config,
        ..Nas::default()
    }));
    Router::new()
        .route("/webapi/auth.cgi", get(auth))
        .route("/webapi/DownloadStation/task.cgi", get(task))
        .with_state(db)
}

pub async fn run(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app(config)).await
}

fn success(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

fn success_empty() -> Json<Value> {
    Json(json!({ "success": true }))
}

fn failure(code: i32) -> Json<Value> {
    Json(json!({ "success": false, "error": { "code": code } }))
}

fn param<'a>(params: &'a Params, key: &str) -> &'a str {
    params.get(key).map(String::as_str).unwrap_or_default()
}

async fn auth(State(db): State<Db>, Query(params): Query<Params>) -> Json<Value> {
    if param(&params, "api") != AUTH_API {
        return failure(102);
    }
    match param(&params, "version").parse::<u32>() {
        Ok(1..=3) => {}
        _ => return failure(104),
    }
    match param(&params, "method") {
        "login" => {
            let mut nas = db.write().await;
            if param(&params, "account") != nas.config.account
                || param(&params, "passwd") != nas.config.password
            {
                return failure(ERROR_BAD_CREDENTIALS);
            }
            let sid = Uuid::new_v4().simple().to_string();
            nas.sessions.insert(sid.clone());
            info!(account = param(&params, "account"), "login");
            success(json!({ "sid": sid }))
        }
        "logout" => {
            db.write().await.sessions.remove(param(&params, "_sid"));
            success_empty()
        }
        _ => failure(103),
    }
}

async fn task(State(db): State<Db>, Query(params): Query<Params>) -> Json<Value> {
    if param(&params, "api") != TASK_API {
        return failure(102);
    }
    if param(&params, "version") != "1" {
        return failure(104);
    }
    let mut nas = db.write().await;
    if !nas.sessions.contains(param(&params, "_sid")) {
        return failure(105);
    }
    match param(&params, "method") {
        "list" => {
            let offset: usize = param(&params, "offset").parse().unwrap_or(0);
            let limit: usize = param(&params, "limit").parse().unwrap_or(usize::MAX);
            let tasks: Vec<&Task> = nas.tasks.iter().skip(offset).take(limit).collect();
            success(json!({
                "total": nas.tasks.len(),
                "offset": offset,
                "tasks": tasks,
            }))
        }
        "create" => {
            let uri = param(&params, "uri");
            if uri.is_empty() {
                return failure(101);
            }
            nas.next_id += 1;
            let task = Task {
                id: format!("dbid_{}", nas.next_id),
                kind: task_kind(uri).to_string(),
                username: nas.config.account.clone(),
                title: uri.rsplit('/').next().unwrap_or(uri).to_string(),
                size: 0,
                status: "waiting".to_string(),
            };
            info!(id = %task.id, uri, "task created");
            nas.tasks.push(task);
            success_empty()
        }
        _ => failure(103),
    }
}

fn task_kind(uri: &str) -> &str {
    match uri.split_once(':') {
        Some(("magnet", _)) => "bt",
        Some((scheme, _)) => scheme,
        None => "http",
    }
}
