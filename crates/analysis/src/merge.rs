//! Combines per-chunk partial analyses into one structured analysis.
//!
//! Each field has its own policy: label sets are unioned, booleans are OR-ed
//! over the partials that report them, scores are averaged over positive
//! values only, and the first meaningful `summary` / `notification_method`
//! in chunk order wins.

use thiserror::Error;

use crate::schema::{
    Compliance, ContactInfo, CookiesTracking, DataCollection, DataRetention, DataSharing,
    NOT_SPECIFIED, PartialAnalysis, PolicyUpdates, SecurityMeasures, StructuredAnalysis,
    Transparency, UserRights, is_placeholder,
};
use crate::scoring::clamp_score;
use crate::templates;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("all chunk analyses failed")]
    AllChunksFailed,
}

/// Merge ordered chunk results. `None` marks a chunk whose analysis failed.
pub fn merge(partials: &[Option<PartialAnalysis>]) -> Result<StructuredAnalysis, MergeError> {
    let present: Vec<&PartialAnalysis> = partials.iter().flatten().collect();
    if present.is_empty() {
        return Err(MergeError::AllChunksFailed);
    }

    let mut analysis = reduce(&present);
    analysis.data_collection.justification = templates::justification(&analysis.data_collection);
    analysis.user_rights.details = templates::rights_details(&analysis.user_rights);
    Ok(analysis)
}

/// Turn a single provider response into a complete analysis. Unlike
/// [`merge`], the provider's own justification and rights details are kept.
pub fn normalize(partial: &PartialAnalysis) -> StructuredAnalysis {
    let mut analysis = reduce(&[partial]);

    analysis.data_collection.justification = partial
        .data_collection
        .as_ref()
        .and_then(|s| non_empty(s.justification.as_deref()))
        .map(str::to_string)
        .unwrap_or_else(|| templates::justification(&analysis.data_collection));
    analysis.user_rights.details = partial
        .user_rights
        .as_ref()
        .and_then(|s| non_empty(s.details.as_deref()))
        .map(str::to_string)
        .unwrap_or_else(|| templates::rights_details(&analysis.user_rights));

    analysis
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Sub-records of one section across all present partials, in chunk order.
fn sections<'a, T>(
    present: &[&'a PartialAnalysis],
    get: impl Fn(&'a PartialAnalysis) -> Option<&'a T>,
) -> Vec<&'a T> {
    present.iter().filter_map(|p| get(*p)).collect()
}

fn union<T>(sections: &[&T], get: impl Fn(&T) -> Option<&Vec<String>>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for labels in sections.iter().filter_map(|s| get(s)) {
        for label in labels {
            let label = label.trim();
            if !label.is_empty() && !merged.iter().any(|m| m == label) {
                merged.push(label.to_string());
            }
        }
    }
    merged
}

fn any<T>(sections: &[&T], get: impl Fn(&T) -> Option<bool>) -> bool {
    sections.iter().any(|s| get(s) == Some(true))
}

/// Rounded mean of the positive values. A reported 0 counts as "not scored".
fn mean_score<T>(sections: &[&T], get: impl Fn(&T) -> Option<f64>) -> u8 {
    let scored: Vec<f64> = sections
        .iter()
        .filter_map(|s| get(s))
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();

    if scored.is_empty() {
        return 0;
    }
    let mean = scored.iter().sum::<f64>() / scored.len() as f64;
    clamp_score(mean.round() as i32)
}

fn reduce(present: &[&PartialAnalysis]) -> StructuredAnalysis {
    let dc = sections(present, |p| p.data_collection.as_ref());
    let data_collection = DataCollection {
        types: union(&dc, |s| s.types.as_ref()),
        purposes: union(&dc, |s| s.purposes.as_ref()),
        transparency_score: mean_score(&dc, |s| s.transparency_score),
        justification: String::new(),
    };

    let ur = sections(present, |p| p.user_rights.as_ref());
    let user_rights = UserRights {
        access: any(&ur, |s| s.access),
        deletion: any(&ur, |s| s.deletion),
        correction: any(&ur, |s| s.correction),
        portability: any(&ur, |s| s.portability),
        opt_out: any(&ur, |s| s.opt_out),
        opt_out_methods: union(&ur, |s| s.opt_out_methods.as_ref()),
        rights_score: mean_score(&ur, |s| s.rights_score),
        details: String::new(),
    };

    let ds = sections(present, |p| p.data_sharing.as_ref());
    let data_sharing = DataSharing {
        third_parties: any(&ds, |s| s.third_parties),
        third_party_purposes: union(&ds, |s| s.third_party_purposes.as_ref()),
        international_transfers: any(&ds, |s| s.international_transfers),
        transfer_safeguards: union(&ds, |s| s.transfer_safeguards.as_ref()),
        law_enforcement: any(&ds, |s| s.law_enforcement),
        user_control: any(&ds, |s| s.user_control),
        sharing_score: mean_score(&ds, |s| s.sharing_score),
    };

    let ct = sections(present, |p| p.cookies_tracking.as_ref());
    let cookies_tracking = CookiesTracking {
        cookies_used: any(&ct, |s| s.cookies_used),
        tracking_technologies: union(&ct, |s| s.tracking_technologies.as_ref()),
        opt_out_available: any(&ct, |s| s.opt_out_available),
        granular_controls: any(&ct, |s| s.granular_controls),
        tracking_score: mean_score(&ct, |s| s.tracking_score),
    };

    let sm = sections(present, |p| p.security_measures.as_ref());
    let security_measures = SecurityMeasures {
        measures: union(&sm, |s| s.measures.as_ref()),
        encryption_mentioned: any(&sm, |s| s.encryption_mentioned),
        access_controls: any(&sm, |s| s.access_controls),
        incident_response: any(&sm, |s| s.incident_response),
        security_score: mean_score(&sm, |s| s.security_score),
    };

    let pu = sections(present, |p| p.policy_updates.as_ref());
    let policy_updates = PolicyUpdates {
        notification_method: pu
            .iter()
            .filter_map(|s| s.notification_method.as_deref())
            .find(|m| !is_placeholder(m))
            .unwrap_or(NOT_SPECIFIED)
            .to_string(),
        frequency_mentioned: any(&pu, |s| s.frequency_mentioned),
        user_consent_required: any(&pu, |s| s.user_consent_required),
    };

    let co = sections(present, |p| p.compliance.as_ref());
    let compliance = Compliance {
        gdpr_mentioned: any(&co, |s| s.gdpr_mentioned),
        ccpa_mentioned: any(&co, |s| s.ccpa_mentioned),
        coppa_mentioned: any(&co, |s| s.coppa_mentioned),
        other_regulations: union(&co, |s| s.other_regulations.as_ref()),
        compliance_score: mean_score(&co, |s| s.compliance_score),
    };

    let ci = sections(present, |p| p.contact_info.as_ref());
    let contact_info = ContactInfo {
        provided: any(&ci, |s| s.provided),
        methods: union(&ci, |s| s.methods.as_ref()),
        dpo_mentioned: any(&ci, |s| s.dpo_mentioned),
    };

    let tr = sections(present, |p| p.transparency.as_ref());
    let transparency = Transparency {
        clear_language: any(&tr, |s| s.clear_language),
        easy_to_find: any(&tr, |s| s.easy_to_find),
        well_organized: any(&tr, |s| s.well_organized),
        specific_examples: any(&tr, |s| s.specific_examples),
        transparency_score: mean_score(&tr, |s| s.transparency_score),
    };

    let dr = sections(present, |p| p.data_retention.as_ref());
    let data_retention = DataRetention {
        retention_period_specified: any(&dr, |s| s.retention_period_specified),
        deletion_process_clear: any(&dr, |s| s.deletion_process_clear),
        retention_score: mean_score(&dr, |s| s.retention_score),
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

    analysis.summary = present
        .iter()
        .find_map(|p| non_empty(p.summary.as_deref()))
        .map(str::to_string)
        .unwrap_or_else(|| templates::merged_summary(&analysis));

    analysis
}
