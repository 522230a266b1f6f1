//! Deterministic, network-free analyzer built from keyword detectors and
//! additive scoring rules. Always produces a complete analysis.

use crate::detectors;
use crate::schema::{
    AnalysisMethod, AnalysisOutcome, Compliance, ContactInfo, CookiesTracking, DataCollection,
    DataRetention, DataSharing, PolicyUpdates, SecurityMeasures, StructuredAnalysis, Transparency,
    UserRights,
};
use crate::scoring;
use crate::templates;

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedAnalyzer;

impl RuleBasedAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn method(&self) -> AnalysisMethod {
        AnalysisMethod::EnhancedRuleBased
    }

    /// Analyze and tag the result as rule-based.
    pub fn analyze_tagged(&self, text: &str) -> AnalysisOutcome {
        AnalysisOutcome::new(self.analyze(text), self.method())
    }

    pub fn analyze(&self, text: &str) -> StructuredAnalysis {
        let text = text.to_lowercase();
        let text = text.as_str();

        let transparency_score = scoring::transparency_score(text);

        let mut data_collection = DataCollection {
            types: detectors::data_types(text),
            purposes: detectors::purposes(text),
            transparency_score,
            justification: String::new(),
        };
        data_collection.justification = templates::justification(&data_collection);

        let mut user_rights = UserRights {
            access: detectors::ACCESS_RIGHT.matches(text),
            deletion: detectors::DELETION_RIGHT.matches(text),
            correction: detectors::CORRECTION_RIGHT.matches(text),
            portability: detectors::PORTABILITY_RIGHT.matches(text),
            opt_out: detectors::OPT_OUT_RIGHT.matches(text),
            opt_out_methods: detectors::opt_out_methods(text),
            rights_score: scoring::rights_score(text),
            details: String::new(),
        };
        user_rights.details = templates::rights_details(&user_rights);

        let data_sharing = DataSharing {
            third_parties: detectors::SHARING.matches(text),
            third_party_purposes: detectors::sharing_purposes(text),
            international_transfers: detectors::INTERNATIONAL_TRANSFERS.matches(text),
            transfer_safeguards: detectors::transfer_safeguards(text),
            law_enforcement: detectors::LAW_ENFORCEMENT.matches(text),
            user_control: detectors::USER_CONTROL.matches(text),
            sharing_score: scoring::sharing_score(text),
        };

        let tracking_technologies = detectors::tracking_technologies(text);
        let cookies_tracking = CookiesTracking {
            cookies_used: detectors::COOKIES.matches(text),
            opt_out_available: detectors::COOKIE_OPT_OUT.matches(text),
            granular_controls: detectors::GRANULAR_COOKIE_CONTROLS.matches(text),
            tracking_score: scoring::tracking_score(text, &tracking_technologies),
            tracking_technologies,
        };

        let measures = detectors::security_measures(text);
        let security_measures = SecurityMeasures {
            encryption_mentioned: detectors::ENCRYPTION.matches(text),
            access_controls: detectors::ACCESS_CONTROLS.matches(text),
            incident_response: detectors::INCIDENT_RESPONSE.matches(text),
            security_score: scoring::security_score(text, &measures),
            measures,
        };

        let policy_updates = PolicyUpdates {
            notification_method: detectors::notification_method(text).to_string(),
            frequency_mentioned: detectors::FREQUENCY.matches(text),
            user_consent_required: detectors::CONSENT_FOR_CHANGES.matches(text),
        };

        let compliance = Compliance {
            gdpr_mentioned: detectors::GDPR.matches(text),
            ccpa_mentioned: detectors::CCPA.matches(text),
            coppa_mentioned: detectors::COPPA.matches(text),
            other_regulations: detectors::other_regulations(text),
            compliance_score: scoring::compliance_score(text),
        };

        let methods = detectors::contact_methods(text);
        let contact_info = ContactInfo {
            provided: !methods.is_empty() || detectors::CONTACT.matches(text),
            methods,
            dpo_mentioned: detectors::DPO.matches(text),
        };

        let transparency = Transparency {
            clear_language: detectors::PLAIN_LANGUAGE.matches(text),
            easy_to_find: detectors::POLICY_TITLE.matches(text),
            well_organized: detectors::SECTIONED.matches(text),
            specific_examples: detectors::EXAMPLES.matches(text),
            transparency_score,
        };

        let retention_period_specified =
            detectors::RETENTION.matches(text) && detectors::DURATION_UNIT.matches(text);
        let data_retention = DataRetention {
            retention_period_specified,
            deletion_process_clear: detectors::INACTIVITY_DELETION.matches(text)
                || detectors::DELETION_PROCESS.matches(text),
            retention_score: scoring::retention_score(text),
        };

        let mut analysis = StructuredAnalysis {
            summary: String::new(),
            data_collection,
            user_rights,
            data_sharing,
            cookies_tracking,
            security_measures,
            policy_updates,
            compliance,
            contact_info,
            transparency,
            data_retention,
        };
        analysis.summary = templates::rule_based_summary(&analysis);
        analysis
    }
}
