use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used when a policy does not say how updates are announced.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Whether `value` is missing in substance ("Not specified", "not Specified", "").
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(NOT_SPECIFIED)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredAnalysis {
    pub summary: String,
    pub data_collection: DataCollection,
    pub user_rights: UserRights,
    pub data_sharing: DataSharing,
    pub cookies_tracking: CookiesTracking,
    pub security_measures: SecurityMeasures,
    pub policy_updates: PolicyUpdates,
    pub compliance: Compliance,
    pub contact_info: ContactInfo,
    pub transparency: Transparency,
    pub data_retention: DataRetention,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataCollection {
    pub types: Vec<String>,
    pub purposes: Vec<String>,
    pub transparency_score: u8,
    pub justification: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRights {
    pub access: bool,
    pub deletion: bool,
    pub correction: bool,
    pub portability: bool,
    pub opt_out: bool,
    pub opt_out_methods: Vec<String>,
    pub rights_score: u8,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSharing {
    pub third_parties: bool,
    pub third_party_purposes: Vec<String>,
    pub international_transfers: bool,
    pub transfer_safeguards: Vec<String>,
    pub law_enforcement: bool,
    pub user_control: bool,
    pub sharing_score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookiesTracking {
    pub cookies_used: bool,
    pub tracking_technologies: Vec<String>,
    pub opt_out_available: bool,
    pub granular_controls: bool,
    pub tracking_score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityMeasures {
    pub measures: Vec<String>,
    pub encryption_mentioned: bool,
    pub access_controls: bool,
    pub incident_response: bool,
    pub security_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyUpdates {
    pub notification_method: String,
    pub frequency_mentioned: bool,
    pub user_consent_required: bool,
}

impl Default for PolicyUpdates {
    fn default() -> Self {
        Self {
            notification_method: NOT_SPECIFIED.to_string(),
            frequency_mentioned: false,
            user_consent_required: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Compliance {
    pub gdpr_mentioned: bool,
    pub ccpa_mentioned: bool,
    pub coppa_mentioned: bool,
    pub other_regulations: Vec<String>,
    pub compliance_score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub provided: bool,
    pub methods: Vec<String>,
    pub dpo_mentioned: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transparency {
    pub clear_language: bool,
    pub easy_to_find: bool,
    pub well_organized: bool,
    pub specific_examples: bool,
    pub transparency_score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataRetention {
    pub retention_period_specified: bool,
    pub deletion_process_clear: bool,
    pub retention_score: u8,
}

// Partial analyses: every field optional. `None` means "not determined from
// this chunk", which is different from an explicit `false` or `0`.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialAnalysis {
    pub summary: Option<String>,
    pub data_collection: Option<PartialDataCollection>,
    pub user_rights: Option<PartialUserRights>,
    pub data_sharing: Option<PartialDataSharing>,
    pub cookies_tracking: Option<PartialCookiesTracking>,
    pub security_measures: Option<PartialSecurityMeasures>,
    pub policy_updates: Option<PartialPolicyUpdates>,
    pub compliance: Option<PartialCompliance>,
    pub contact_info: Option<PartialContactInfo>,
    pub transparency: Option<PartialTransparency>,
    pub data_retention: Option<PartialDataRetention>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialDataCollection {
    pub types: Option<Vec<String>>,
    pub purposes: Option<Vec<String>>,
    pub transparency_score: Option<f64>,
    pub justification: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialUserRights {
    pub access: Option<bool>,
    pub deletion: Option<bool>,
    pub correction: Option<bool>,
    pub portability: Option<bool>,
    pub opt_out: Option<bool>,
    pub opt_out_methods: Option<Vec<String>>,
    pub rights_score: Option<f64>,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialDataSharing {
    pub third_parties: Option<bool>,
    pub third_party_purposes: Option<Vec<String>>,
    pub international_transfers: Option<bool>,
    pub transfer_safeguards: Option<Vec<String>>,
    pub law_enforcement: Option<bool>,
    pub user_control: Option<bool>,
    pub sharing_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialCookiesTracking {
    pub cookies_used: Option<bool>,
    pub tracking_technologies: Option<Vec<String>>,
    pub opt_out_available: Option<bool>,
    pub granular_controls: Option<bool>,
    pub tracking_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialSecurityMeasures {
    pub measures: Option<Vec<String>>,
    pub encryption_mentioned: Option<bool>,
    pub access_controls: Option<bool>,
    pub incident_response: Option<bool>,
    pub security_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialPolicyUpdates {
    pub notification_method: Option<String>,
    pub frequency_mentioned: Option<bool>,
    pub user_consent_required: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialCompliance {
    pub gdpr_mentioned: Option<bool>,
    pub ccpa_mentioned: Option<bool>,
    pub coppa_mentioned: Option<bool>,
    pub other_regulations: Option<Vec<String>>,
    pub compliance_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialContactInfo {
    pub provided: Option<bool>,
    pub methods: Option<Vec<String>>,
    pub dpo_mentioned: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialTransparency {
    pub clear_language: Option<bool>,
    pub easy_to_find: Option<bool>,
    pub well_organized: Option<bool>,
    pub specific_examples: Option<bool>,
    pub transparency_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialDataRetention {
    pub retention_period_specified: Option<bool>,
    pub deletion_process_clear: Option<bool>,
    pub retention_score: Option<f64>,
}

impl From<StructuredAnalysis> for PartialAnalysis {
    fn from(a: StructuredAnalysis) -> Self {
        let score = |s: u8| Some(f64::from(s));

        Self {
            summary: Some(a.summary),
            data_collection: Some(PartialDataCollection {
                types: Some(a.data_collection.types),
                purposes: Some(a.data_collection.purposes),
                transparency_score: score(a.data_collection.transparency_score),
                justification: Some(a.data_collection.justification),
            }),
            user_rights: Some(PartialUserRights {
                access: Some(a.user_rights.access),
                deletion: Some(a.user_rights.deletion),
                correction: Some(a.user_rights.correction),
                portability: Some(a.user_rights.portability),
                opt_out: Some(a.user_rights.opt_out),
                opt_out_methods: Some(a.user_rights.opt_out_methods),
                rights_score: score(a.user_rights.rights_score),
                details: Some(a.user_rights.details),
            }),
            data_sharing: Some(PartialDataSharing {
                third_parties: Some(a.data_sharing.third_parties),
                third_party_purposes: Some(a.data_sharing.third_party_purposes),
                international_transfers: Some(a.data_sharing.international_transfers),
                transfer_safeguards: Some(a.data_sharing.transfer_safeguards),
                law_enforcement: Some(a.data_sharing.law_enforcement),
                user_control: Some(a.data_sharing.user_control),
                sharing_score: score(a.data_sharing.sharing_score),
            }),
            cookies_tracking: Some(PartialCookiesTracking {
                cookies_used: Some(a.cookies_tracking.cookies_used),
                tracking_technologies: Some(a.cookies_tracking.tracking_technologies),
                opt_out_available: Some(a.cookies_tracking.opt_out_available),
                granular_controls: Some(a.cookies_tracking.granular_controls),
                tracking_score: score(a.cookies_tracking.tracking_score),
            }),
            security_measures: Some(PartialSecurityMeasures {
                measures: Some(a.security_measures.measures),
                encryption_mentioned: Some(a.security_measures.encryption_mentioned),
                access_controls: Some(a.security_measures.access_controls),
                incident_response: Some(a.security_measures.incident_response),
                security_score: score(a.security_measures.security_score),
            }),
            policy_updates: Some(PartialPolicyUpdates {
                notification_method: Some(a.policy_updates.notification_method),
                frequency_mentioned: Some(a.policy_updates.frequency_mentioned),
                user_consent_required: Some(a.policy_updates.user_consent_required),
            }),
            compliance: Some(PartialCompliance {
                gdpr_mentioned: Some(a.compliance.gdpr_mentioned),
                ccpa_mentioned: Some(a.compliance.ccpa_mentioned),
                coppa_mentioned: Some(a.compliance.coppa_mentioned),
                other_regulations: Some(a.compliance.other_regulations),
                compliance_score: score(a.compliance.compliance_score),
            }),
            contact_info: Some(PartialContactInfo {
                provided: Some(a.contact_info.provided),
                methods: Some(a.contact_info.methods),
                dpo_mentioned: Some(a.contact_info.dpo_mentioned),
            }),
            transparency: Some(PartialTransparency {
                clear_language: Some(a.transparency.clear_language),
                easy_to_find: Some(a.transparency.easy_to_find),
                well_organized: Some(a.transparency.well_organized),
                specific_examples: Some(a.transparency.specific_examples),
                transparency_score: score(a.transparency.transparency_score),
            }),
            data_retention: Some(PartialDataRetention {
                retention_period_specified: Some(a.data_retention.retention_period_specified),
                deletion_process_clear: Some(a.data_retention.deletion_process_clear),
                retention_score: score(a.data_retention.retention_score),
            }),
        }
    }
}

/// Which provider produced an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMethod {
    #[serde(rename = "openai")]
    OpenAi,
    MistralAi,
    EnhancedRuleBased,
}

impl AnalysisMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::MistralAi => "mistral_ai",
            Self::EnhancedRuleBased => "enhanced_rule_based",
        }
    }

    /// True for providers that call out over the network.
    pub fn is_external(&self) -> bool {
        !matches!(self, Self::EnhancedRuleBased)
    }
}

impl fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finished analysis tagged with its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    #[serde(flatten)]
    pub analysis: StructuredAnalysis,
    pub analysis_method: AnalysisMethod,
    /// Why the external provider was abandoned, when a fallback occurred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_error: Option<String>,
}

impl AnalysisOutcome {
    pub fn new(analysis: StructuredAnalysis, analysis_method: AnalysisMethod) -> Self {
        Self {
            analysis,
            analysis_method,
            ai_error: None,
        }
    }

    pub fn fallback(analysis: StructuredAnalysis, ai_error: impl Into<String>) -> Self {
        Self {
            analysis,
            analysis_method: AnalysisMethod::EnhancedRuleBased,
            ai_error: Some(ai_error.into()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.ai_error.is_some()
    }
}
