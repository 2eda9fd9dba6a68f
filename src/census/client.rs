//! Census API client.
//!
//! Issues the single B05006 request and turns the header/value table the
//! API returns into [`RawVariables`].

use crate::config::CensusConfig;
use crate::error::{PipelineError, Result};
use crate::models::{RawVariables, Variable};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for the ACS 1-year endpoint.
pub struct CensusClient {
    config: CensusConfig,
    http_client: reqwest::Client,
    show_progress: bool,
}

impl CensusClient {
    /// Create a client with the configured request timeout.
    pub fn new(config: CensusConfig, show_progress: bool) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            http_client,
            show_progress,
        })
    }

    /// Full request URL: endpoint, every variable code, geography filter.
    pub fn request_url(&self) -> String {
        let codes: Vec<&str> = Variable::ALL.iter().map(|v| v.code()).collect();
        format!(
            "{}?get={}&for={}",
            self.config.endpoint,
            codes.join(","),
            self.config.geography
        )
    }

    /// Fetch the raw variable counts. One request, no retries.
    pub async fn fetch(&self) -> Result<RawVariables> {
        let url = self.request_url();
        info!("Requesting {}", url);

        let spinner = self.show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                pb.set_style(style);
            }
            pb.set_message("Waiting for Census API...");
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        let result = self.send(&url).await;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let rows = result?;
        parse_table(&rows)
    }

    async fn send(&self, url: &str) -> Result<Vec<Vec<Value>>> {
        let response = self.http_client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                debug!("Request timed out after {}s", self.config.timeout_seconds);
            } else if e.is_connect() {
                debug!("Cannot connect to {}", self.config.endpoint);
            }
            PipelineError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Fetch { status, body });
        }

        let body = response.text().await?;
        debug!("Census response: {} bytes", body.len());

        serde_json::from_str(&body).map_err(|e| PipelineError::MalformedTable(e.to_string()))
    }
}

/// Pair the header row with the value row, keeping known variable codes.
///
/// Unknown columns (such as the trailing `us` geography column) are
/// skipped. Codes missing from the header are not reported here; the
/// aggregator fails when it reads them.
pub fn parse_table(rows: &[Vec<Value>]) -> Result<RawVariables> {
    let (header, values) = match rows {
        [header, values, ..] => (header, values),
        _ => {
            return Err(PipelineError::MalformedTable(format!(
                "expected a header row and a value row, got {} row(s)",
                rows.len()
            )))
        }
    };

    let mut raw = RawVariables::new();

    for (i, column) in header.iter().enumerate() {
        let Some(variable) = column.as_str().and_then(Variable::from_code) else {
            continue;
        };

        let value = values.get(i).ok_or_else(|| {
            PipelineError::MalformedTable(format!(
                "value row has no column {} for {}",
                i,
                variable.code()
            ))
        })?;

        let count = parse_count(variable, value)?;
        debug!("{} ({}) = {}", variable, variable.code(), count);
        raw.insert(variable.code(), count);
    }

    if raw.is_empty() {
        warn!("Census response header contained none of the requested variables");
    } else {
        debug!("Parsed {} of {} variables", raw.len(), Variable::ALL.len());
    }

    Ok(raw)
}

/// The API sends counts as strings; accept plain JSON integers as well.
fn parse_count(variable: Variable, value: &Value) -> Result<i64> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    };

    parsed.ok_or_else(|| PipelineError::Parse {
        code: variable.code().to_string(),
        value: value.to_string(),
    })
}
