use crate::provider::AnalysisScope;

pub const SYSTEM_PROMPT: &str = "You are a privacy policy analyst. You read privacy policies \
and report their data-handling practices as strict JSON. Output only the JSON object.";

const SCHEMA: &str = r#"{
  "summary": "2-3 sentence plain-English summary",
  "data_collection": {"types": ["..."], "purposes": ["..."], "transparency_score": 0, "justification": "..."},
  "user_rights": {"access": false, "deletion": false, "correction": false, "portability": false, "opt_out": false, "opt_out_methods": ["..."], "rights_score": 0, "details": "..."},
  "data_sharing": {"third_parties": false, "third_party_purposes": ["..."], "international_transfers": false, "transfer_safeguards": ["..."], "law_enforcement": false, "user_control": false, "sharing_score": 0},
  "cookies_tracking": {"cookies_used": false, "tracking_technologies": ["..."], "opt_out_available": false, "granular_controls": false, "tracking_score": 0},
  "security_measures": {"measures": ["..."], "encryption_mentioned": false, "access_controls": false, "incident_response": false, "security_score": 0},
  "policy_updates": {"notification_method": "Not specified", "frequency_mentioned": false, "user_consent_required": false},
  "compliance": {"gdpr_mentioned": false, "ccpa_mentioned": false, "coppa_mentioned": false, "other_regulations": ["..."], "compliance_score": 0},
  "contact_info": {"provided": false, "methods": ["..."], "dpo_mentioned": false},
  "transparency": {"clear_language": false, "easy_to_find": false, "well_organized": false, "specific_examples": false, "transparency_score": 0},
  "data_retention": {"retention_period_specified": false, "deletion_process_clear": false, "retention_score": 0}
}"#;

pub fn build_analysis_prompt(policy_text: &str, scope: AnalysisScope) -> String {
    let scope_note = match scope {
        AnalysisScope::Full => String::from("The text below is the complete privacy policy."),
        AnalysisScope::Chunk { index, total } => format!(
            "The text below is part {} of {} of a longer privacy policy. Report only what this \
             part states; omit fields this part says nothing about.",
            index + 1,
            total
        ),
    };

    format!(
        r#"Analyze the following privacy policy text.

{scope_note}

INSTRUCTIONS:
1. Fill in the schema below from evidence in the text only
2. Scores are integers from 0 (worst for the user) to 10 (best for the user)
3. Booleans are true only when the text clearly supports them
4. Lists contain short category labels, without duplicates
5. Output ONLY the JSON object, no markdown, no explanations

SCHEMA:
{SCHEMA}

POLICY TEXT:
{policy_text}

JSON OUTPUT:"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_prompt_names_position() {
        let prompt = build_analysis_prompt("We use cookies.", AnalysisScope::Chunk { index: 1, total: 3 });

        assert!(prompt.contains("part 2 of 3"));
        assert!(prompt.contains("We use cookies."));
        assert!(prompt.contains("\"notification_method\""));
    }

    #[test]
    fn test_full_prompt() {
        let prompt = build_analysis_prompt("text", AnalysisScope::Full);
        assert!(prompt.contains("complete privacy policy"));
    }
}
