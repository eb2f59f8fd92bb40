//! The canonical project — PocketForge's unified intermediate representation.
//!
//! Produced exactly once per canonicalizer invocation and immutable
//! thereafter: a re-forge builds a new [`CanonicalProject`], never a patch.
//! Dangling `triggers_flow` references are tolerated — the reasoning
//! capability can hallucinate, and the advisory endpoint→flow link must not
//! fail validation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Backend runtime the generated project targets.
///
/// Always stamped by the caller — the reasoning capability never decides
/// the runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuntimeTarget {
    /// Python + FastAPI.
    PythonFastapi,
    /// Bun's built-in HTTP server.
    BunHttp,
    /// Node + Express.
    NodeExpress,
}

impl RuntimeTarget {
    /// Kebab-case wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PythonFastapi => "python-fastapi",
            Self::BunHttp => "bun-http",
            Self::NodeExpress => "node-express",
        }
    }
}

impl fmt::Display for RuntimeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuntimeTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "python-fastapi" => Ok(Self::PythonFastapi),
            "bun-http" => Ok(Self::BunHttp),
            "node-express" => Ok(Self::NodeExpress),
            other => Err(format!(
                "unknown runtime '{other}' (expected python-fastapi, bun-http, or node-express)"
            )),
        }
    }
}

/// HTTP method of a canonical endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    /// GET.
    GET,
    /// POST.
    POST,
    /// PUT.
    PUT,
    /// DELETE.
    DELETE,
}

/// One API endpoint in the canonical plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEndpoint {
    /// Short endpoint ID.
    pub id: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Route path (e.g. `/users/:id`).
    pub path: String,
    /// ID of the flow this endpoint triggers. Advisory — may dangle.
    pub triggers_flow: String,
    /// Human description.
    pub description: String,
}

/// One business-logic flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalFlow {
    /// Short flow ID.
    pub id: String,
    /// Human description.
    pub description: String,
    /// Ordered step descriptions.
    pub steps: Vec<String>,
}

/// One UI page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalPage {
    /// Page name.
    pub name: String,
    /// Route the page is mounted at.
    pub route: String,
    /// Component names appearing on the page.
    pub components: Vec<String>,
    /// Human description.
    pub description: String,
}

/// Visual style family of the canonical theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeStyle {
    /// Minimal.
    Minimal,
    /// Modern.
    Modern,
    /// Glassmorphism.
    Glassmorphism,
    /// Brutalism.
    Brutalism,
}

/// Unified theme all generated UI fragments are rendered under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalTheme {
    /// Primary color (CSS value).
    pub primary_color: String,
    /// Font family.
    pub font_family: String,
    /// Style family.
    pub style: ThemeStyle,
}

/// UI section of the canonical plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalUi {
    /// Pages.
    pub pages: Vec<CanonicalPage>,
    /// Theme.
    pub theme: CanonicalTheme,
}

/// Target section of the canonical meta.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalTarget {
    /// Backend runtime.
    pub runtime: RuntimeTarget,
}

/// Metadata section of the canonical plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalMeta {
    /// Project name.
    pub name: String,
    /// Project description.
    pub description: String,
    /// The architect's dense reasoning paragraph.
    pub reasoning: String,
    /// Target runtime (caller-stamped).
    pub target: CanonicalTarget,
}

/// API section of the canonical plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalApi {
    /// Endpoints.
    pub endpoints: Vec<CanonicalEndpoint>,
}

/// Logic section of the canonical plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalLogic {
    /// Flows.
    pub flows: Vec<CanonicalFlow>,
}

/// The unified intermediate representation of a fullstack application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalProject {
    /// Name, description, reasoning, target runtime.
    pub meta: CanonicalMeta,
    /// API surface.
    pub api: CanonicalApi,
    /// Business logic flows.
    pub logic: CanonicalLogic,
    /// Pages and theme.
    pub ui: CanonicalUi,
    /// Dependency name → version. Keys unique (last write wins on build).
    pub dependencies: BTreeMap<String, String>,
}

/// Build the dependency map from the wire pair-list.
///
/// Later entries with a duplicate name overwrite earlier ones. A missing
/// version defaults to `"latest"`, matching the wire contract.
#[must_use]
pub fn dependencies_from_pairs(
    pairs: impl IntoIterator<Item = (String, Option<String>)>,
) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for (name, version) in pairs {
        let _ = map.insert(name, version.unwrap_or_else(|| "latest".to_string()));
    }
    map
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── RuntimeTarget ───────────────────────────────────────────────────

    #[test]
    fn runtime_round_trips_through_str() {
        for rt in [
            RuntimeTarget::PythonFastapi,
            RuntimeTarget::BunHttp,
            RuntimeTarget::NodeExpress,
        ] {
            assert_eq!(rt.as_str().parse::<RuntimeTarget>().unwrap(), rt);
        }
    }

    #[test]
    fn runtime_unknown_fails() {
        assert!("deno".parse::<RuntimeTarget>().is_err());
    }

    #[test]
    fn runtime_serde_kebab_case() {
        let json = serde_json::to_value(RuntimeTarget::PythonFastapi).unwrap();
        assert_eq!(json, "python-fastapi");
    }

    // ── dependencies_from_pairs ─────────────────────────────────────────

    #[test]
    fn duplicate_names_last_write_wins() {
        let deps = dependencies_from_pairs([
            ("express".to_string(), Some("4.18.0".to_string())),
            ("zod".to_string(), Some("3.0.0".to_string())),
            ("express".to_string(), Some("4.19.2".to_string())),
        ]);
        assert_eq!(deps.len(), 2);
        assert_eq!(deps["express"], "4.19.2");
        assert_eq!(deps["zod"], "3.0.0");
    }

    #[test]
    fn missing_version_defaults_to_latest() {
        let deps = dependencies_from_pairs([("fastapi".to_string(), None)]);
        assert_eq!(deps["fastapi"], "latest");
    }

    #[test]
    fn empty_list_empty_map() {
        let deps = dependencies_from_pairs([]);
        assert!(deps.is_empty());
    }

    // ── Serde shape ─────────────────────────────────────────────────────

    #[test]
    fn endpoint_serde_camel_case() {
        let ep = CanonicalEndpoint {
            id: "get_health".into(),
            method: HttpMethod::GET,
            path: "/health".into(),
            triggers_flow: "health_check".into(),
            description: "Liveness probe".into(),
        };
        let json = serde_json::to_value(&ep).unwrap();
        assert_eq!(json["triggersFlow"], "health_check");
        assert_eq!(json["method"], "GET");
    }

    #[test]
    fn theme_style_serde_lowercase() {
        let json = serde_json::to_value(ThemeStyle::Glassmorphism).unwrap();
        assert_eq!(json, "glassmorphism");
    }

    #[test]
    fn dangling_flow_reference_deserializes() {
        // Advisory invariant: triggersFlow may reference no flow at all.
        let json = serde_json::json!({
            "id": "e1",
            "method": "POST",
            "path": "/x",
            "triggersFlow": "no_such_flow",
            "description": "d"
        });
        let ep: CanonicalEndpoint = serde_json::from_value(json).unwrap();
        assert_eq!(ep.triggers_flow, "no_such_flow");
    }
}
