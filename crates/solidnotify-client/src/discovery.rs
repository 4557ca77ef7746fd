//! Notification gateway lookup in a Solid well-known document.
//!
//! The document is JSON-LD. Servers publish either a single node, an array
//! of nodes, or an object with an `@graph`; values may be plain strings,
//! `@id` references, or `@value` literals, optionally wrapped in arrays.

use serde_json::Value;
use url::Url;

/// Generic Solid predicate advertising the notification gateway.
pub const SOLID_NOTIFICATION_GATEWAY: &str =
    "http://www.w3.org/ns/solid/terms#notificationGateway";

/// Legacy implementation-specific predicate for the same.
pub const ESS_NOTIFICATION_GATEWAY_ENDPOINT: &str =
    "http://inrupt.com/ns/ess#notificationGatewayEndpoint";

/// Keys under which each predicate may appear, expanded or compacted.
const GENERIC_KEYS: &[&str] = &[
    SOLID_NOTIFICATION_GATEWAY,
    "solid:notificationGateway",
    "notificationGateway",
];
const LEGACY_KEYS: &[&str] = &[
    ESS_NOTIFICATION_GATEWAY_ENDPOINT,
    "ess:notificationGatewayEndpoint",
    "notificationGatewayEndpoint",
];

/// Find the gateway advertised by a well-known document.
///
/// The generic predicate wins over the legacy one wherever either appears.
/// Relative values are resolved against `base`.
pub fn find_gateway(document: &Value, base: &Url) -> Option<Url> {
    let nodes = nodes(document);

    [GENERIC_KEYS, LEGACY_KEYS].into_iter().find_map(|keys| {
        nodes.iter().find_map(|node| {
            keys.iter()
                .find_map(|key| node.get(*key))
                .and_then(|value| iri(value, base))
        })
    })
}

fn nodes(document: &Value) -> Vec<&serde_json::Map<String, Value>> {
    let mut out = Vec::new();
    collect_nodes(document, &mut out);
    out
}

fn collect_nodes<'a>(value: &'a Value, out: &mut Vec<&'a serde_json::Map<String, Value>>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_nodes(item, out);
            }
        }
        Value::Object(map) => {
            out.push(map);
            if let Some(graph) = map.get("@graph") {
                collect_nodes(graph, out);
            }
        }
        _ => {}
    }
}

fn iri(value: &Value, base: &Url) -> Option<Url> {
    match value {
        Value::String(s) => base.join(s).ok(),
        Value::Object(map) => map
            .get("@id")
            .or_else(|| map.get("@value"))
            .and_then(Value::as_str)
            .and_then(|s| base.join(s).ok()),
        Value::Array(items) => items.iter().find_map(|item| iri(item, base)),
        _ => None,
    }
}
