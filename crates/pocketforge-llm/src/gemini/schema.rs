//! Response schemas and prompt builders for the two Gemini calls.
//!
//! The schemas are the fixed, versioned output contracts: the capability
//! either returns JSON matching them or the decode boundary rejects the
//! payload. Gemini's schema dialect uses upper-case type names.

use serde_json::{Value, json};

use crate::reasoner::{CanonicalizeRequest, GenerateRequest};

/// Response schema for the canonicalize call.
#[must_use]
pub fn canonical_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "meta": {
                "type": "OBJECT",
                "properties": {
                    "name": {"type": "STRING"},
                    "description": {"type": "STRING"},
                    "reasoning": {"type": "STRING"}
                },
                "required": ["name", "description", "reasoning"]
            },
            "api": {
                "type": "OBJECT",
                "properties": {
                    "endpoints": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "id": {"type": "STRING"},
                                "method": {"type": "STRING"},
                                "path": {"type": "STRING"},
                                "triggersFlow": {"type": "STRING"},
                                "description": {"type": "STRING"}
                            }
                        }
                    }
                }
            },
            "logic": {
                "type": "OBJECT",
                "properties": {
                    "flows": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "id": {"type": "STRING"},
                                "description": {"type": "STRING"},
                                "steps": {"type": "ARRAY", "items": {"type": "STRING"}}
                            }
                        }
                    }
                }
            },
            "ui": {
                "type": "OBJECT",
                "properties": {
                    "pages": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "name": {"type": "STRING"},
                                "route": {"type": "STRING"},
                                "components": {"type": "ARRAY", "items": {"type": "STRING"}},
                                "description": {"type": "STRING"}
                            }
                        }
                    },
                    "theme": {
                        "type": "OBJECT",
                        "properties": {
                            "primaryColor": {"type": "STRING"},
                            "fontFamily": {"type": "STRING"},
                            "style": {"type": "STRING"}
                        },
                        "required": ["primaryColor", "fontFamily", "style"]
                    }
                },
                "required": ["pages", "theme"]
            },
            "dependencies": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": {"type": "STRING"},
                        "version": {"type": "STRING"}
                    }
                }
            }
        },
        "required": ["meta", "api", "logic", "ui", "dependencies"]
    })
}

/// Response schema for the generate call.
#[must_use]
pub fn artifact_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "path": {"type": "STRING"},
                "content": {"type": "STRING"},
                "type": {"type": "STRING"}
            },
            "required": ["path", "content", "type"]
        }
    })
}

/// Build the architect prompt for the canonicalize call.
#[must_use]
pub fn canonicalize_prompt(request: &CanonicalizeRequest) -> String {
    let instructions = request
        .instructions
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("Standard project.");

    format!(
        "You are a Software Architect. Analyze these source fragments and \
         define the canonical plan for a {runtime} application.\n\
         \n\
         IMPORTANT:\n\
         - Stay CONCISE.\n\
         - Use SHORT ids (e.g. \"upload_file\", not long generated ids).\n\
         - Do not repeat yourself.\n\
         - The reasoning must be one dense paragraph of at most 500 characters.\n\
         \n\
         USER INSTRUCTIONS:\n{instructions}\n\
         \n\
         SOURCES:\n{digest}\n",
        runtime = request.runtime,
        digest = request.digest,
    )
}

/// Build the generator prompt for the generate call.
///
/// Carries the cross-cutting instruction set: unified theme, frontend
/// wired to the canonical endpoints, backend scaffolded for the canonical
/// runtime and flows, user instructions honored.
pub fn generate_prompt(request: &GenerateRequest) -> Result<String, serde_json::Error> {
    let canonical = &request.canonical;
    let instructions = request
        .instructions
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("None.");

    // The full canonical plan is serialized — the generator works from the
    // complete IR, not a digest.
    let plan = serde_json::to_string_pretty(canonical)?;

    Ok(format!(
        "Generate the complete source code for the project \"{name}\".\n\
         \n\
         REASONING: {reasoning}\n\
         \n\
         CANONICAL PLAN:\n{plan}\n\
         \n\
         RULES:\n\
         1. Produce a JSON array of artifact objects with path, content, and type.\n\
         2. Unify every UI fragment under the canonical theme.\n\
         3. Wire all frontend calls to the canonical endpoint list.\n\
         4. Scaffold a {runtime} backend implementing the canonical flows.\n\
         5. Be very concise in code comments.\n\
         6. Do NOT generate binary files.\n\
         7. Make sure imports resolve between the generated files.\n\
         8. If the project is large, focus on the CRITICAL files needed to run.\n\
         \n\
         USER INSTRUCTIONS:\n{instructions}\n",
        name = canonical.meta.name,
        reasoning = canonical.meta.reasoning,
        runtime = canonical.meta.target.runtime,
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
