use crate::config::ServiceConfig;
use crate::sampler::{EvaluationResult, FieldModel};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::trace;

#[derive(Debug, Deserialize)]
struct Component {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct FieldValue {
    #[serde(rename = "total-intensity")]
    total_intensity: Component,
    inclination: Component,
    declination: Component,
}

#[derive(Debug, Deserialize)]
struct ModelResult {
    #[serde(rename = "field-value")]
    field_value: FieldValue,
}

// The service wraps the result in an envelope; accept the bare form as well
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Response {
    Wrapped {
        #[serde(rename = "geomagnetic-field-model-result")]
        result: ModelResult,
    },
    Bare(ModelResult),
}

pub fn parse_response(body: &str) -> Result<EvaluationResult> {
    let response: Response =
        serde_json::from_str(body).context("Malformed field model response")?;
    let result = match response {
        Response::Wrapped { result } => result,
        Response::Bare(result) => result,
    };
    let field = result.field_value;
    Ok(EvaluationResult {
        declination: field.declination.value,
        inclination: field.inclination.value,
        total_intensity: field.total_intensity.value,
    })
}

/// Blocking client for the BGS geomagnetic model web service.
pub struct WebFieldModel {
    agent: ureq::Agent,
    endpoint: String,
}

impl WebFieldModel {
    pub fn new(config: &ServiceConfig) -> Self {
        WebFieldModel {
            agent: ureq::AgentBuilder::new().build(),
            endpoint: config.endpoint(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl FieldModel for WebFieldModel {
    fn evaluate(
        &mut self,
        latitude: f64,
        longitude: f64,
        altitude_km: f64,
        date: NaiveDate,
    ) -> Result<EvaluationResult> {
        let date = date.format("%Y-%m-%d").to_string();
        trace!(latitude, longitude, altitude_km, %date, "querying field model");

        let body = self
            .agent
            .get(&self.endpoint)
            .query("latitude", &latitude.to_string())
            .query("longitude", &longitude.to_string())
            .query("altitude", &altitude_km.to_string())
            .query("date", &date)
            .query("format", "json")
            .call()
            .with_context(|| format!("Request to {} failed", self.endpoint))?
            .into_string()
            .context("Failed to read field model response")?;

        parse_response(&body)
    }
}
