//! `SYNO.DownloadStation.Task` requests and the task listing they return.
//!
//! # Design
//! Zero offsets and limits mean "unset" and are not sent; the API treats a
//! missing limit as "all tasks". `additional` is sent comma-joined, which is
//! how the DownloadStation API expects list-valued parameters.

use serde::Deserialize;

use crate::error::Error;
use crate::request::{Endpoint, MarshalRequest, Params, Request};

/// Lists download tasks. The response is `DownloadTaskListResponse`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadTaskList {
    pub offset: u32,
    pub limit: u32,
    /// Extra detail sections to include, e.g. `detail`, `transfer`, `file`.
    pub additional: Vec<String>,
}

impl MarshalRequest for DownloadTaskList {
    fn marshal_request(&self) -> Result<Request, Error> {
        let mut params = Params::new();
        if self.offset != 0 {
            params.add("offset", self.offset.to_string());
        }
        if self.limit != 0 {
            params.add("limit", self.limit.to_string());
        }
        if !self.additional.is_empty() {
            params.add("additional", self.additional.join(","));
        }
        Ok(Endpoint::DOWNLOAD_TASK.request("list", params))
    }
}

/// Creates a new download task. It has no response payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadTaskCreate {
    pub uri: String,
    pub username: String,
    pub password: String,
    pub unzip_password: String,
    pub destination: String,
}

impl MarshalRequest for DownloadTaskCreate {
    fn marshal_request(&self) -> Result<Request, Error> {
        let params: Params = [
            ("uri", &self.uri),
            ("username", &self.username),
            ("password", &self.password),
            ("unzip_password", &self.unzip_password),
            ("destination", &self.destination),
        ]
        .into_iter()
        .collect();
        Ok(Endpoint::DOWNLOAD_TASK.request("create", params.drop_empty()))
    }
}

/// The response from a `DownloadTaskList` request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DownloadTaskListResponse {
    pub total: u64,
    pub offset: u64,
    pub tasks: Vec<DownloadTask>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DownloadTask {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub username: String,
    pub title: String,
    pub size: u64,
    pub status: TaskStatus,
    pub status_extra: Option<serde_json::Value>,
    /// Sections requested through `DownloadTaskList::additional`.
    pub additional: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Waiting,
    Downloading,
    Paused,
    Finishing,
    Finished,
    HashChecking,
    Seeding,
    FilehostingWaiting,
    Extracting,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_with_all_fields() {
        let list = DownloadTaskList {
            offset: 1,
            limit: 2,
            additional: vec!["a".to_string(), "b".to_string()],
        };
        let req = list.marshal_request().unwrap();
        let expected: Params = [("offset", "1"), ("limit", "2"), ("additional", "a,b")]
            .into_iter()
            .collect();
        assert_eq!(req, Endpoint::DOWNLOAD_TASK.request("list", expected));
    }

    #[test]
    fn list_defaults_send_no_params() {
        let req = DownloadTaskList::default().marshal_request().unwrap();
        assert_eq!(req.method, "list");
        assert!(req.params.is_empty());
    }

    #[test]
    fn create_with_all_fields() {
        let create = DownloadTaskCreate {
            uri: "a".to_string(),
            username: "b".to_string(),
            password: "c".to_string(),
            unzip_password: "d".to_string(),
            destination: "e".to_string(),
        };
        let req = create.marshal_request().unwrap();
        let expected: Params = [
            ("uri", "a"),
            ("username", "b"),
            ("password", "c"),
            ("unzip_password", "d"),
            ("destination", "e"),
        ]
        .into_iter()
        .collect();
        assert_eq!(req, Endpoint::DOWNLOAD_TASK.request("create", expected));
    }

    #[test]
    fn create_with_uri_only() {
        let create = DownloadTaskCreate {
            uri: "foo".to_string(),
            ..DownloadTaskCreate::default()
        };
        let req = create.marshal_request().unwrap();
        let expected: Params = [("uri", "foo")].into_iter().collect();
        assert_eq!(req.params, expected);
    }

    #[test]
    fn list_response_parses_tasks() {
        let json = r#"{
            "total": 1,
            "offset": 0,
            "tasks": [{
                "id": "dbid_1",
                "type": "http",
                "username": "admin",
                "title": "ubuntu.iso",
                "size": 1024,
                "status": "downloading"
            }]
        }"#;
        let res: DownloadTaskListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(res.total, 1);
        assert_eq!(res.tasks[0].kind, "http");
        assert_eq!(res.tasks[0].status, TaskStatus::Downloading);
        assert!(res.tasks[0].additional.is_none());
    }

    #[test]
    fn unrecognised_status_is_unknown() {
        let task: DownloadTask = serde_json::from_str(r#"{"status":"teleporting"}"#).unwrap();
        assert_eq!(task.status, TaskStatus::Unknown);
        let task: DownloadTask =
            serde_json::from_str(r#"{"status":"hash_checking"}"#).unwrap();
        assert_eq!(task.status, TaskStatus::HashChecking);
    }
}
