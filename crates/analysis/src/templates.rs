//! Fixed phrasing for the narrative fields of an analysis.

use crate::schema::{Compliance, DataCollection, StructuredAnalysis, UserRights};

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

pub fn justification(collection: &DataCollection) -> String {
    if collection.types.is_empty() {
        return "The policy does not clearly identify the categories of personal data it collects."
            .to_string();
    }

    format!(
        "The policy identifies {} of personal data collected for {}.",
        plural(collection.types.len(), "category", "categories"),
        plural(collection.purposes.len(), "stated purpose", "stated purposes"),
    )
}

fn granted_rights(rights: &UserRights) -> Vec<&'static str> {
    [
        (rights.access, "access"),
        (rights.deletion, "deletion"),
        (rights.correction, "correction"),
        (rights.portability, "portability"),
        (rights.opt_out, "opt-out"),
    ]
    .into_iter()
    .filter_map(|(granted, name)| granted.then_some(name))
    .collect()
}

pub fn rights_details(rights: &UserRights) -> String {
    let granted = granted_rights(rights);
    if granted.is_empty() {
        return "The policy does not clearly describe any user privacy rights.".to_string();
    }

    let mut details = format!(
        "Users are granted {} of 5 core rights: {}.",
        granted.len(),
        granted.join(", ")
    );
    if !rights.opt_out_methods.is_empty() {
        details.push_str(&format!(
            " Opt-out is available via {}.",
            rights.opt_out_methods.join(", ")
        ));
    }
    details
}

fn regulation_sentence(compliance: &Compliance) -> &'static str {
    match (compliance.gdpr_mentioned, compliance.ccpa_mentioned) {
        (true, true) => "It references both GDPR and CCPA.",
        (true, false) => "It references GDPR.",
        (false, true) => "It references CCPA.",
        (false, false) => "It does not reference GDPR or CCPA.",
    }
}

/// Summary built from merged fields when no chunk supplied one.
pub fn merged_summary(analysis: &StructuredAnalysis) -> String {
    let types = analysis.data_collection.types.len();
    let collection = if types == 0 {
        "This privacy policy does not clearly state which personal data is collected.".to_string()
    } else {
        format!(
            "This privacy policy describes the collection of {}.",
            plural(types, "type of personal data", "types of personal data")
        )
    };

    let deletion = if analysis.user_rights.deletion {
        "Users can request deletion of their data."
    } else {
        "No clear right to deletion is offered."
    };

    format!(
        "{collection} {deletion} {}",
        regulation_sentence(&analysis.compliance)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryTier {
    Favorable,
    Moderate,
    Limited,
}

impl SummaryTier {
    pub fn from_scores(transparency: u8, rights: u8, sharing: u8) -> Self {
        let average = (f64::from(transparency) + f64::from(rights) + f64::from(sharing)) / 3.0;
        if average >= 7.0 {
            Self::Favorable
        } else if average >= 5.0 {
            Self::Moderate
        } else {
            Self::Limited
        }
    }
}

/// Narrative summary for the rule-based analyzer.
pub fn rule_based_summary(analysis: &StructuredAnalysis) -> String {
    let tier = SummaryTier::from_scores(
        analysis.transparency.transparency_score,
        analysis.user_rights.rights_score,
        analysis.data_sharing.sharing_score,
    );
    let types = plural(
        analysis.data_collection.types.len(),
        "category of personal data",
        "categories of personal data",
    );
    let rights = granted_rights(&analysis.user_rights).len();

    let opening = match tier {
        SummaryTier::Favorable => format!(
            "This privacy policy shows generally favorable privacy practices. It describes {types} \
             and grants users {rights} of 5 core privacy rights."
        ),
        SummaryTier::Moderate => format!(
            "This privacy policy shows moderate privacy protections. It describes {types} \
             and grants users {rights} of 5 core privacy rights, with room for improvement."
        ),
        SummaryTier::Limited => format!(
            "This privacy policy offers limited privacy protections. It describes {types} \
             but grants users only {rights} of 5 core privacy rights."
        ),
    };

    format!(
        "{opening} Data sharing scores {}/10 and security scores {}/10. {}",
        analysis.data_sharing.sharing_score,
        analysis.security_measures.security_score,
        regulation_sentence(&analysis.compliance)
    )
}
