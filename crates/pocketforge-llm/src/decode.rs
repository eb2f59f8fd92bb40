//! Strict decoding of capability output.
//!
//! The wire schemas mirror the `responseSchema` sent with each request.
//! Decoding is the validation boundary: unknown enum values, missing
//! required fields, or trailing garbage (the signature of silent output
//! truncation) all reject the payload with [`ReasonerError::Schema`].

use serde::Deserialize;

use pocketforge_core::artifact::{Artifact, ArtifactKind};
use pocketforge_core::canonical::{
    CanonicalApi, CanonicalEndpoint, CanonicalFlow, CanonicalLogic, CanonicalMeta, CanonicalPage,
    CanonicalProject, CanonicalTarget, CanonicalTheme, CanonicalUi, RuntimeTarget,
    dependencies_from_pairs,
};
use pocketforge_core::ids;

use crate::reasoner::{ReasonerError, ReasonerResult};

// ─────────────────────────────────────────────────────────────────────────────
// Wire types (shape of the responseSchema)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalWire {
    meta: MetaWire,
    api: ApiWire,
    logic: LogicWire,
    ui: UiWire,
    dependencies: Vec<DependencyWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetaWire {
    name: String,
    description: String,
    reasoning: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiWire {
    #[serde(default)]
    endpoints: Vec<CanonicalEndpoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogicWire {
    #[serde(default)]
    flows: Vec<CanonicalFlow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UiWire {
    #[serde(default)]
    pages: Vec<CanonicalPage>,
    theme: CanonicalTheme,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DependencyWire {
    name: String,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactWire {
    path: String,
    content: String,
    #[serde(rename = "type")]
    kind: ArtifactKind,
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoding
// ─────────────────────────────────────────────────────────────────────────────

/// Strip a leading ` ```json ` fence and trailing ` ``` ` fence, if present.
///
/// The capability is asked for raw JSON but occasionally wraps it anyway.
#[must_use]
pub fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix("```json").unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix("```").unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed);
    trimmed.trim()
}

/// Decode and validate canonicalizer output.
///
/// Converts the pair-list `dependencies` into a last-write-wins map and
/// stamps `meta.target.runtime` from the caller — the capability never
/// decides the runtime.
pub fn decode_canonical(text: &str, runtime: RuntimeTarget) -> ReasonerResult<CanonicalProject> {
    let cleaned = strip_fences(text);
    let wire: CanonicalWire = serde_json::from_str(cleaned).map_err(|e| ReasonerError::Schema {
        detail: e.to_string(),
    })?;

    Ok(CanonicalProject {
        meta: CanonicalMeta {
            name: wire.meta.name,
            description: wire.meta.description,
            reasoning: wire.meta.reasoning,
            target: CanonicalTarget { runtime },
        },
        api: CanonicalApi {
            endpoints: wire.api.endpoints,
        },
        logic: CanonicalLogic {
            flows: wire.logic.flows,
        },
        ui: CanonicalUi {
            pages: wire.ui.pages,
            theme: wire.ui.theme,
        },
        dependencies: dependencies_from_pairs(
            wire.dependencies.into_iter().map(|d| (d.name, d.version)),
        ),
    })
}

/// Decode and validate generator output, minting a fresh ID per artifact.
pub fn decode_artifacts(text: &str) -> ReasonerResult<Vec<Artifact>> {
    let cleaned = strip_fences(text);
    let wire: Vec<ArtifactWire> =
        serde_json::from_str(cleaned).map_err(|e| ReasonerError::Schema {
            detail: e.to_string(),
        })?;

    Ok(wire
        .into_iter()
        .map(|a| Artifact {
            id: ids::artifact_id(),
            path: a.path,
            content: a.content,
            kind: a.kind,
        })
        .collect())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pocketforge_core::canonical::HttpMethod;

    const MINIMAL_CANONICAL: &str = r##"{
        "meta": {"name": "Health", "description": "d", "reasoning": "r"},
        "api": {"endpoints": [
            {"id": "get_health", "method": "GET", "path": "/health",
             "triggersFlow": "health_check", "description": "probe"}
        ]},
        "logic": {"flows": [
            {"id": "health_check", "description": "ok", "steps": ["return ok"]}
        ]},
        "ui": {"pages": [
            {"name": "Home", "route": "/", "components": ["Status"], "description": "home"}
        ], "theme": {"primaryColor": "#000", "fontFamily": "Inter", "style": "minimal"}},
        "dependencies": [{"name": "fastapi", "version": "0.110"}]
    }"##;

    // ── strip_fences ────────────────────────────────────────────────────

    #[test]
    fn strips_json_fences() {
        assert_eq!(strip_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn strips_bare_fences() {
        assert_eq!(strip_fences("```\n[]\n```"), "[]");
    }

    #[test]
    fn leaves_raw_json_alone() {
        assert_eq!(strip_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    // ── decode_canonical ────────────────────────────────────────────────

    #[test]
    fn minimal_canonical_decodes() {
        let p = decode_canonical(MINIMAL_CANONICAL, RuntimeTarget::PythonFastapi).unwrap();
        assert_eq!(p.meta.name, "Health");
        assert_eq!(p.api.endpoints.len(), 1);
        assert_eq!(p.api.endpoints[0].method, HttpMethod::GET);
        assert_eq!(p.dependencies["fastapi"], "0.110");
    }

    #[test]
    fn runtime_is_caller_stamped() {
        let p = decode_canonical(MINIMAL_CANONICAL, RuntimeTarget::BunHttp).unwrap();
        assert_eq!(p.meta.target.runtime, RuntimeTarget::BunHttp);
    }

    #[test]
    fn fenced_canonical_decodes() {
        let fenced = format!("```json\n{MINIMAL_CANONICAL}\n```");
        assert!(decode_canonical(&fenced, RuntimeTarget::NodeExpress).is_ok());
    }

    #[test]
    fn duplicate_dependencies_last_wins() {
        let json = r##"{
            "meta": {"name": "n", "description": "d", "reasoning": "r"},
            "api": {"endpoints": []},
            "logic": {"flows": []},
            "ui": {"pages": [], "theme":
                {"primaryColor": "#fff", "fontFamily": "Inter", "style": "modern"}},
            "dependencies": [
                {"name": "express", "version": "4.18.0"},
                {"name": "express", "version": "4.19.2"},
                {"name": "zod"}
            ]
        }"##;
        let p = decode_canonical(json, RuntimeTarget::NodeExpress).unwrap();
        assert_eq!(p.dependencies.len(), 2);
        assert_eq!(p.dependencies["express"], "4.19.2");
        assert_eq!(p.dependencies["zod"], "latest");
    }

    #[test]
    fn truncated_output_rejected() {
        // Simulates the capability running out of output budget mid-object.
        let truncated = &MINIMAL_CANONICAL[..MINIMAL_CANONICAL.len() / 2];
        let err = decode_canonical(truncated, RuntimeTarget::PythonFastapi).unwrap_err();
        assert_matches!(err, ReasonerError::Schema { .. });
    }

    #[test]
    fn unknown_method_rejected() {
        let json = MINIMAL_CANONICAL.replace("\"GET\"", "\"PATCH\"");
        assert_matches!(
            decode_canonical(&json, RuntimeTarget::PythonFastapi),
            Err(ReasonerError::Schema { .. })
        );
    }

    #[test]
    fn unknown_theme_style_rejected() {
        let json = MINIMAL_CANONICAL.replace("\"minimal\"", "\"vaporwave\"");
        assert_matches!(
            decode_canonical(&json, RuntimeTarget::PythonFastapi),
            Err(ReasonerError::Schema { .. })
        );
    }

    #[test]
    fn missing_meta_rejected() {
        assert_matches!(
            decode_canonical(r#"{"api": {"endpoints": []}}"#, RuntimeTarget::BunHttp),
            Err(ReasonerError::Schema { .. })
        );
    }

    #[test]
    fn garbled_output_rejected() {
        assert_matches!(
            decode_canonical("not json at all", RuntimeTarget::BunHttp),
            Err(ReasonerError::Schema { .. })
        );
    }

    // ── decode_artifacts ────────────────────────────────────────────────

    #[test]
    fn artifacts_decode_with_fresh_ids() {
        let json = r#"[
            {"path": "src/main.py", "content": "app = FastAPI()", "type": "code"},
            {"path": "requirements.txt", "content": "fastapi", "type": "config"}
        ]"#;
        let arts = decode_artifacts(json).unwrap();
        assert_eq!(arts.len(), 2);
        assert!(arts[0].id.starts_with("art_"));
        assert_ne!(arts[0].id, arts[1].id);
        assert_eq!(arts[1].kind, ArtifactKind::Config);
    }

    #[test]
    fn artifact_ids_in_payload_are_ignored() {
        // The wire type has no id field — a capability-supplied id is
        // dropped and a fresh one minted.
        let json = r#"[{"id": "fake", "path": "a", "content": "b", "type": "doc"}]"#;
        let arts = decode_artifacts(json).unwrap();
        assert_ne!(arts[0].id, "fake");
        assert!(arts[0].id.starts_with("art_"));
    }

    #[test]
    fn truncated_artifacts_rejected() {
        let err = decode_artifacts(r#"[{"path": "a", "content": "unterminat"#).unwrap_err();
        assert_matches!(err, ReasonerError::Schema { .. });
    }

    #[test]
    fn unknown_artifact_type_rejected() {
        let json = r#"[{"path": "a", "content": "b", "type": "binary"}]"#;
        assert_matches!(decode_artifacts(json), Err(ReasonerError::Schema { .. }));
    }

    #[test]
    fn empty_array_is_valid() {
        // Valid shape; policy on empty sets lives in the engine, not here.
        assert!(decode_artifacts("[]").unwrap().is_empty());
    }
}
