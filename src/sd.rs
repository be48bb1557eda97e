use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::EncodeError;

/// A set of scrape endpoints sharing the same base labels.
///
/// Serialized as `{"baseLabels": {..}, "endpoints": [..]}`, the shape the
/// server's job targets API accepts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct TargetGroup {
    #[serde(rename = "baseLabels", default)]
    base_labels: HashMap<String, String>,
    #[serde(default)]
    endpoints: Vec<String>,
}

impl TargetGroup {
    pub fn new<L, K, V, E, S>(base_labels: L, endpoints: E) -> Self
    where
        L: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
        E: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TargetGroup {
            base_labels: base_labels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            endpoints: endpoints.into_iter().map(Into::into).collect(),
        }
    }

    pub fn base_labels(&self) -> &HashMap<String, String> {
        &self.base_labels
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }
}

/// Serialize target groups into the JSON array sent as the PUT body.
///
/// Group order and endpoint order are kept as given. An empty slice encodes
/// to `[]`, which clears every target of the job on the server.
pub fn encode(groups: &[TargetGroup]) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(groups)?)
}

/// Parse a JSON array of target groups, e.g. a file prepared for `sd-push`.
pub fn decode(bytes: &[u8]) -> Result<Vec<TargetGroup>, EncodeError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn node_group() -> TargetGroup {
        TargetGroup::new([("env", "prod")], ["http://h1:9100/metrics"])
    }

    #[test]
    fn encodes_wire_field_names() {
        let body = encode(&[node_group()]).unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            r#"[{"baseLabels":{"env":"prod"},"endpoints":["http://h1:9100/metrics"]}]"#
        );
    }

    #[test]
    fn empty_list_is_literal_empty_array() {
        assert_eq!(encode(&[]).unwrap(), b"[]");
    }

    #[test]
    fn keeps_group_and_endpoint_order() {
        let groups = vec![
            TargetGroup::new(
                [("label1", "value1"), ("label2", "value2")],
                [
                    "http://example.com:8081/metrics.json",
                    "http://example.com:8080/metrics.json",
                    "http://example.com:8081/metrics.json",
                ],
            ),
            TargetGroup::new([("label3", "value3")], Vec::<String>::new()),
            TargetGroup::new(Vec::<(String, String)>::new(), ["http://b:1/"]),
        ];

        let value: Value = serde_json::from_slice(&encode(&groups).unwrap()).unwrap();
        assert_eq!(
            value,
            json!([
                {
                    "baseLabels": {"label1": "value1", "label2": "value2"},
                    "endpoints": [
                        "http://example.com:8081/metrics.json",
                        "http://example.com:8080/metrics.json",
                        "http://example.com:8081/metrics.json"
                    ]
                },
                {"baseLabels": {"label3": "value3"}, "endpoints": []},
                {"baseLabels": {}, "endpoints": ["http://b:1/"]}
            ])
        );
        assert_eq!(decode(&encode(&groups).unwrap()).unwrap(), groups);
    }

    #[test]
    fn decode_fills_missing_fields() {
        let groups = decode(br#"[{"endpoints":["h:1"]},{"baseLabels":{"a":"b"}}]"#).unwrap();
        assert!(groups[0].base_labels().is_empty());
        assert_eq!(groups[0].endpoints(), ["h:1"]);
        assert!(groups[1].endpoints().is_empty());
    }

    #[test]
    fn decode_rejects_non_string_labels() {
        let err = decode(br#"[{"baseLabels":{"a":1},"endpoints":[]}]"#).unwrap_err();
        assert!(err.to_string().starts_with("target group payload"));
    }
}
