use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A Grafana alert rule as returned by the provisioning API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Alert {
    pub id: i64,
    pub uid: String,
    #[serde(rename = "orgID")]
    pub org_id: i64,
    #[serde(rename = "folderUID")]
    pub folder_uid: String,
    #[serde(rename = "ruleGroup")]
    pub rule_group: String,
    pub title: String,
    pub condition: String,
    pub data: Vec<AlertData>,
    #[serde(default)]
    pub updated: DateTime<Utc>,
    #[serde(rename = "noDataState", default)]
    pub no_data_state: NoDataState,
    #[serde(rename = "execErrState", default)]
    pub exec_err_state: ExecErrState,
    #[serde(rename = "for", default)]
    pub for_duration: String,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(rename = "isPaused", default)]
    pub is_paused: bool,
}

/// What the rule reports when a query returns no data
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoDataState {
    #[default]
    NoData,
    Alerting,
    #[serde(rename = "OK")]
    Ok,
    KeepLast,
}

impl NoDataState {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoDataState::NoData => "NoData",
            NoDataState::Alerting => "Alerting",
            NoDataState::Ok => "OK",
            NoDataState::KeepLast => "KeepLast",
        }
    }
}

/// What the rule reports when evaluation fails
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecErrState {
    #[default]
    Error,
    Alerting,
    #[serde(rename = "OK")]
    Ok,
    KeepLast,
}

impl ExecErrState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecErrState::Error => "Error",
            ExecErrState::Alerting => "Alerting",
            ExecErrState::Ok => "OK",
            ExecErrState::KeepLast => "KeepLast",
        }
    }
}

/// One query or expression evaluated by the rule
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AlertData {
    #[serde(rename = "refId")]
    pub ref_id: String,
    #[serde(rename = "queryType", default)]
    pub query_type: String,
    #[serde(rename = "relativeTimeRange", default)]
    pub relative_time_range: RelativeTimeRange,
    #[serde(rename = "datasourceUid", default)]
    pub datasource_uid: String,
    pub model: AlertModel,
}

/// Offsets in seconds relative to evaluation time
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelativeTimeRange {
    pub from: i64,
    pub to: i64,
}

/// The datasource-specific query payload.
///
/// This is the union of the fields used by the supported datasource kinds and
/// server-side expressions. Anything a given kind does not use stays at its
/// zero value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertModel {
    pub datasource: DataSource,
    pub dimensions: BTreeMap<String, String>,
    pub expression: String,
    pub hide: bool,
    pub id: String,
    pub interval_ms: i64,
    pub label: String,
    pub log_groups: Vec<String>,
    pub match_exact: bool,
    pub max_data_points: i64,
    pub metric_editor_mode: i64,
    pub metric_name: String,
    pub metric_query_type: i64,
    pub namespace: String,
    pub period: String,
    pub query_mode: String,
    pub ref_id: String,
    pub region: String,
    pub sql_expression: String,
    pub statistic: String,
    pub conditions: Vec<Condition>,
    pub reducer: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct DataSource {
    #[serde(rename = "type")]
    pub kind: String,
    pub uid: String,
}

/// A classic condition evaluated against a query
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Condition {
    pub evaluator: Evaluator,
    pub operator: Operator,
    pub query: Query,
    pub reducer: Reducer,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Evaluator {
    pub params: Vec<ParamValue>,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Operator {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Query {
    pub params: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Reducer {
    pub params: Vec<ParamValue>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// An untyped evaluator or reducer parameter
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value.into())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}
