//! AI-assisted stop ordering.
//!
//! Asks a [`ReasoningClient`] for a visiting order and accepts the answer
//! only when it is an exact permutation of the trip's stop ids. Transport
//! and parse failures are reported as outcomes, never as errors: the
//! optimizer falls back to the heuristic for anything but
//! [`AiOrderingOutcome::Accepted`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde_json::Value;
use tracing::warn;

use crate::model::{Coordinate, Stop, StopId};
use crate::traits::ReasoningClient;

/// Result of one attempt to get an order from the reasoning service.
#[derive(Debug, Clone, PartialEq)]
pub enum AiOrderingOutcome {
    /// A valid permutation of all stop ids.
    Accepted(Vec<StopId>),
    /// The service answered, but the answer is unusable.
    Rejected(RejectReason),
    /// The service could not be reached or returned nothing.
    Unavailable(String),
}

/// Why a response was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Response text was not valid JSON.
    Malformed(String),
    /// JSON was not an array of integer ids.
    NotAnIdArray,
    Empty,
    Missing(Vec<StopId>),
    Foreign(Vec<StopId>),
    Duplicated(Vec<StopId>),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Malformed(err) => write!(f, "malformed JSON: {}", err),
            RejectReason::NotAnIdArray => f.write_str("response is not an array of stop ids"),
            RejectReason::Empty => f.write_str("empty order"),
            RejectReason::Missing(ids) => write!(f, "missing stop ids {}", join_ids(ids)),
            RejectReason::Foreign(ids) => write!(f, "unknown stop ids {}", join_ids(ids)),
            RejectReason::Duplicated(ids) => write!(f, "duplicated stop ids {}", join_ids(ids)),
        }
    }
}

fn join_ids(ids: &[StopId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Sampling parameters for the completion request.
#[derive(Debug, Clone, Copy)]
pub struct AiRequestOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for AiRequestOptions {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.2,
        }
    }
}

/// Ask `client` for an order over `stops` and validate the answer.
pub fn propose_order(
    client: &dyn ReasoningClient,
    origin: Coordinate,
    stops: &[Stop],
    options: AiRequestOptions,
) -> AiOrderingOutcome {
    let prompt = build_prompt(origin, stops);

    let text = match client.complete(&prompt, options.max_tokens, options.temperature) {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, stops = stops.len(), "AI route ordering unavailable");
            return AiOrderingOutcome::Unavailable(err.to_string());
        }
    };

    let expected: Vec<StopId> = stops.iter().map(|stop| stop.id).collect();
    match parse_order(&text).and_then(|order| validate_permutation(order, &expected)) {
        Ok(order) => AiOrderingOutcome::Accepted(order),
        Err(reason) => {
            warn!(%reason, stops = stops.len(), "AI route ordering rejected");
            AiOrderingOutcome::Rejected(reason)
        }
    }
}

/// Prompt embedding the origin and every stop as `(id, lat, lng)`.
pub fn build_prompt(origin: Coordinate, stops: &[Stop]) -> String {
    let stop_list = stops
        .iter()
        .map(|stop| {
            serde_json::json!({
                "id": stop.id,
                "lat": stop.location.lat,
                "lng": stop.location.lng,
            })
        })
        .collect::<Vec<_>>();
    let stop_json = Value::Array(stop_list).to_string();

    format!(
        "You are a delivery route planner. A driver starts at latitude {lat}, longitude {lng} \
         and must visit every stop below exactly once. Order the stops to minimise total \
         travel distance.\n\
         Stops (JSON): {stops}\n\
         Respond with ONLY a JSON array of the stop ids in visiting order, for example [3,1,2]. \
         Do not add any other text.",
        lat = origin.lat,
        lng = origin.lng,
        stops = stop_json,
    )
}

/// Parse the response text into a list of ids.
///
/// Accepts a bare JSON array or one wrapped in a Markdown code fence. Ids may
/// be integers or strings holding an integer.
pub fn parse_order(text: &str) -> Result<Vec<StopId>, RejectReason> {
    let body = strip_code_fence(text);
    let value: Value =
        serde_json::from_str(body).map_err(|err| RejectReason::Malformed(err.to_string()))?;

    let Value::Array(items) = value else {
        return Err(RejectReason::NotAnIdArray);
    };

    items
        .iter()
        .map(|item| match item {
            Value::Number(number) => number.as_u64().map(StopId),
            Value::String(text) => text.trim().parse::<u64>().ok().map(StopId),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .ok_or(RejectReason::NotAnIdArray)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Accept `order` only if it holds every id of `expected` exactly once.
pub fn validate_permutation(
    order: Vec<StopId>,
    expected: &[StopId],
) -> Result<Vec<StopId>, RejectReason> {
    if order.is_empty() && !expected.is_empty() {
        return Err(RejectReason::Empty);
    }

    let expected_set: BTreeSet<StopId> = expected.iter().copied().collect();
    let mut counts: BTreeMap<StopId, usize> = BTreeMap::new();
    for id in &order {
        *counts.entry(*id).or_default() += 1;
    }

    let foreign: Vec<StopId> = counts
        .keys()
        .filter(|id| !expected_set.contains(id))
        .copied()
        .collect();
    if !foreign.is_empty() {
        return Err(RejectReason::Foreign(foreign));
    }

    let missing: Vec<StopId> = expected_set
        .iter()
        .filter(|id| !counts.contains_key(id))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(RejectReason::Missing(missing));
    }

    let duplicated: Vec<StopId> = counts
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(id, _)| *id)
        .collect();
    if !duplicated.is_empty() {
        return Err(RejectReason::Duplicated(duplicated));
    }

    Ok(order)
}
