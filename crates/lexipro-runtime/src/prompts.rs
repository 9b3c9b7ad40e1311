//! Prompts for live forensic analysis.
//!
//! The system prompt fixes the analyst persona and output contract; the
//! per-item prompt carries the evidence metadata and content.

use lexipro_core::EvidenceItem;
use serde_json::Value as JsonValue;

/// System prompt shared by every live analysis.
pub const FORENSIC_SYSTEM_PROMPT: &str = r#"
You are LexiPro, a specialized forensic legal AI.
You analyze raw evidence snippets from medical malpractice dossiers.

## Constraints
1. Do not offer general advice
2. Identify contradictions, standard of care violations, or credibility issues
3. Tie every finding to the timestamps, clinical values and actions in the evidence
4. Respond with a single JSON object and nothing else
"#;

/// Build the per-item analysis prompt.
pub fn build_analysis_prompt(evidence: &EvidenceItem) -> String {
    format!(
        r#"Analyze the following raw evidence snippet from a medical malpractice dossier.

METADATA:
- Type: {evidence_type}
- Timestamp: {timestamp}
- ID: {id}

CONTENT:
"{content}"

TASK:
Perform a deep forensic analysis. Do not offer general advice.
Identify contradictions, standard of care violations, or credibility issues.

OUTPUT REQUIREMENTS (JSON):
1. summary: A professional, objective summary of the facts (max 2 sentences).
2. liability: A short, punchy risk assessment (e.g., "High Risk: Failure to Rescue").
3. reasoning: A detailed 'Chain-of-Thought' explanation. Connect the specific timestamps, clinical values, and actions to legal standards.
4. statutes: List 2-3 specific medical-legal terms, statutes, or protocols relevant to this exact scenario.
"#,
        evidence_type = evidence.evidence_type,
        timestamp = evidence.timestamp,
        id = evidence.id,
        content = evidence.content,
    )
}

/// Response schema in the OpenAPI subset accepted by `responseSchema`.
pub fn analysis_response_schema() -> JsonValue {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "liability": { "type": "STRING" },
            "reasoning": { "type": "STRING" },
            "statutes": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["summary", "liability", "reasoning", "statutes"]
    })
}
