//! Aggregator wire types.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A route discovered by the aggregator.
///
/// `route_summary` is opaque to this crate: it is passed back unmodified
/// when requesting encoded call data, and only inspected leniently for
/// quote display fields.
#[derive(Debug, Clone)]
pub struct SwapRoute {
    /// Aggregator-defined route description, passed through verbatim.
    pub route_summary: Value,
    /// Router contract the encoded call must be sent to.
    pub router_address: Address,
}

impl SwapRoute {
    /// Expected raw output amount, when the summary carries one.
    pub fn amount_out(&self) -> Option<&str> {
        self.route_summary.get("amountOut").and_then(Value::as_str)
    }

    /// Price impact in percent, when the summary carries one.
    pub fn price_impact(&self) -> Option<f64> {
        let value = self.route_summary.get("priceImpact")?;
        value.as_f64().or_else(|| value.as_str()?.parse().ok())
    }
}

/// Envelope shared by aggregator responses: a zero `code` means success.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<RouteData>,
}

/// `GET /routes` response payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteData {
    pub route_summary: Option<Value>,
    pub router_address: Option<String>,
}

/// `POST /route/build` request payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    pub route_summary: Value,
    pub sender: String,
    pub recipient: String,
    /// Slippage tolerance as an integer, percent × 100.
    pub slippage_tolerance: u32,
    /// Unix timestamp after which the route must not execute.
    pub deadline: u64,
    pub source: String,
}

/// `POST /route/build` response body.
#[derive(Debug, Deserialize)]
pub struct BuildResponse {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<BuildData>,
}

/// Payload of a successful build response.
#[derive(Debug, Deserialize)]
pub struct BuildData {
    pub data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_summary_accessors_are_lenient() {
        let route = SwapRoute {
            route_summary: json!({"amountOut": "123000", "priceImpact": "0.42"}),
            router_address: Address::ZERO,
        };
        assert_eq!(route.amount_out(), Some("123000"));
        assert_eq!(route.price_impact(), Some(0.42));

        let bare = SwapRoute { route_summary: json!({}), router_address: Address::ZERO };
        assert_eq!(bare.amount_out(), None);
        assert_eq!(bare.price_impact(), None);
    }

    #[test]
    fn test_build_request_wire_names() {
        let request = BuildRequest {
            route_summary: json!({"k": "v"}),
            sender: "0xabc".to_string(),
            recipient: "0xabc".to_string(),
            slippage_tolerance: 50,
            deadline: 1_700_001_200,
            source: "tx-orchestrator".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("routeSummary").is_some());
        assert!(value.get("slippageTolerance").is_some());
        assert!(value.get("route_summary").is_none());
    }
}
