//! Keyword detectors.
//!
//! Every detector is a declarative table of `(Rule, label)` pairs evaluated
//! against case-folded policy text. A label is reported when its rule
//! matches; labels keep table order and never repeat.

use crate::schema::NOT_SPECIFIED;

/// Substring predicate over case-folded text.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// At least one keyword is present.
    Any(&'static [&'static str]),
    /// Every keyword is present.
    All(&'static [&'static str]),
    /// At least one keyword from each list is present.
    Both(&'static [&'static str], &'static [&'static str]),
}

impl Rule {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Rule::Any(keywords) => keywords.iter().any(|k| text.contains(k)),
            Rule::All(keywords) => keywords.iter().all(|k| text.contains(k)),
            Rule::Both(left, right) => {
                left.iter().any(|k| text.contains(k)) && right.iter().any(|k| text.contains(k))
            }
        }
    }
}

pub type Table = &'static [(Rule, &'static str)];

/// Labels of every matching rule, in table order.
pub fn detect(table: Table, text: &str) -> Vec<String> {
    table
        .iter()
        .filter(|(rule, _)| rule.matches(text))
        .map(|(_, label)| label.to_string())
        .collect()
}

/// Label of the first matching rule.
pub fn first_match(table: Table, text: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(rule, _)| rule.matches(text))
        .map(|(_, label)| *label)
}

pub const DATA_TYPES: Table = &[
    (
        Rule::Any(&["name", "email", "e-mail", "phone number", "postal address", "date of birth", "username"]),
        "Personal Identifiers",
    ),
    (Rule::Any(&["location", "gps", "geolocation"]), "Location Data"),
    (
        Rule::Any(&["payment", "credit card", "billing", "bank account", "financial information"]),
        "Financial Information",
    ),
    (
        Rule::Any(&["device", "ip address", "browser type", "operating system"]),
        "Device Information",
    ),
    (
        Rule::Any(&["usage data", "browsing", "interaction", "log data", "log files", "pages you visit"]),
        "Usage Data",
    ),
    (Rule::Any(&["health", "medical"]), "Health Information"),
    (
        Rule::Any(&["biometric", "facial recognition", "fingerprint scan", "voiceprint"]),
        "Biometric Data",
    ),
    (Rule::Any(&["social media profile", "social network"]), "Social Media Data"),
    (
        Rule::Any(&["messages you send", "communications", "chat content", "call recordings"]),
        "Communications Content",
    ),
];

pub const PURPOSES: Table = &[
    (
        Rule::Both(&["provide", "deliver", "operate", "maintain"], &["service", "product"]),
        "Service Provision",
    ),
    (Rule::Any(&["advertis", "marketing", "promotion"]), "Advertising & Marketing"),
    (Rule::Any(&["analytics", "analyze", "analyse", "improve"]), "Analytics & Improvement"),
    (
        Rule::Any(&["fraud", "security", "protect against", "prevent abuse"]),
        "Security & Fraud Prevention",
    ),
    (
        Rule::Any(&["legal obligation", "comply with", "compliance with", "required by law"]),
        "Legal Compliance",
    ),
    (Rule::Any(&["personaliz", "personalis", "customiz", "tailor"]), "Personalization"),
    (
        Rule::Any(&["communicate with you", "send you", "newsletter", "respond to your"]),
        "Communication",
    ),
    (Rule::Any(&["research", "develop new"]), "Research & Development"),
];

pub const TRACKING_TECHNOLOGIES: Table = &[
    (Rule::Any(&["cookie"]), "Cookies"),
    (Rule::Any(&["beacon", "clear gif"]), "Web Beacons"),
    (Rule::Any(&["pixel"]), "Tracking Pixels"),
    (Rule::Any(&["local storage", "localstorage", "html5 storage"]), "Local Storage"),
    (
        Rule::Any(&["fingerprinting", "device fingerprint", "browser fingerprint"]),
        "Device Fingerprinting",
    ),
    (
        Rule::Any(&["google analytics", "analytics tool", "analytics provider", "analytics service"]),
        "Analytics Tools",
    ),
    (
        Rule::Any(&["social media plugin", "social plugin", "like button", "share button"]),
        "Social Media Plugins",
    ),
    (Rule::Any(&["sdk", "software development kit"]), "SDKs"),
    (Rule::Any(&["session replay", "session recording"]), "Session Replay"),
    (Rule::Any(&["cross-device", "across devices"]), "Cross-Device Tracking"),
];

pub const SECURITY_MEASURES: Table = &[
    (ENCRYPTION, "Encryption"),
    (SSL_TLS, "SSL/TLS"),
    (ACCESS_CONTROLS, "Access Controls"),
    (MULTI_FACTOR, "Multi-Factor Authentication"),
    (Rule::Any(&["firewall"]), "Firewalls"),
    (
        Rule::Any(&["security audit", "penetration test", "vulnerability scan", "security assessment"]),
        "Security Audits",
    ),
    (
        Rule::Any(&["intrusion detection", "security monitoring", "monitor our systems"]),
        "Monitoring",
    ),
    (
        Rule::Any(&["secure server", "secure data center", "data centre", "data center"]),
        "Secure Infrastructure",
    ),
    (
        Rule::Any(&["pseudonym", "anonymiz", "anonymis", "de-identif"]),
        "Pseudonymization",
    ),
    (
        Rule::Any(&["employee training", "security training", "confidentiality obligations"]),
        "Staff Training",
    ),
];

pub const OPT_OUT_METHODS: Table = &[
    (
        Rule::Any(&["account settings", "privacy settings", "account preferences"]),
        "Account Settings",
    ),
    (Rule::Any(&["unsubscribe"]), "Email Unsubscribe"),
    (
        Rule::Any(&["cookie settings", "cookie preferences", "cookie banner", "manage cookies"]),
        "Cookie Settings",
    ),
    (
        Rule::Any(&["browser settings", "browser controls", "your browser"]),
        "Browser Controls",
    ),
    (
        Rule::Any(&["aboutads", "networkadvertising", "youronlinechoices", "digital advertising alliance"]),
        "Industry Opt-Out Tools",
    ),
    (Rule::Any(&["do not sell"]), "Do Not Sell Link"),
    (
        Rule::Both(&["opt out", "opt-out", "withdraw"], &["contact us", "email us", "write to us"]),
        "Contact Request",
    ),
    (Rule::Any(&["global privacy control", "gpc"]), "Global Privacy Control"),
];

pub const SHARING_PURPOSES: Table = &[
    (
        Rule::Any(&["service provider", "vendors", "processors", "contractors"]),
        "Service Providers",
    ),
    (
        Rule::Both(&["advertis"], &["partner", "network", "third part"]),
        "Advertising Partners",
    ),
    (
        Rule::Both(&["analytics"], &["provider", "partner", "third part"]),
        "Analytics Providers",
    ),
    (
        Rule::Any(&["law enforcement", "legal process", "court order", "subpoena", "legal obligation"]),
        "Legal Requirements",
    ),
    (
        Rule::Any(&["merger", "acquisition", "sale of assets", "business transfer", "bankruptcy"]),
        "Business Transfers",
    ),
    (Rule::Any(&["affiliate", "subsidiar", "group companies"]), "Affiliates"),
    (
        Rule::Any(&["payment processor", "process payments", "payment provider"]),
        "Payment Processing",
    ),
];

pub const TRANSFER_SAFEGUARDS: Table = &[
    (
        Rule::Any(&["standard contractual clauses", "model clauses"]),
        "Standard Contractual Clauses",
    ),
    (
        Rule::Any(&["adequacy decision", "adequate level of protection"]),
        "Adequacy Decisions",
    ),
    (Rule::Any(&["binding corporate rules"]), "Binding Corporate Rules"),
    (
        Rule::Any(&["data privacy framework", "privacy shield"]),
        "Data Privacy Framework",
    ),
    (
        Rule::Both(&["transfer"], &["your consent", "explicit consent"]),
        "Explicit Consent",
    ),
];

pub const CONTACT_METHODS: Table = &[
    (
        Rule::Any(&["email us", "e-mail us", "by email", "via email", "privacy@", "dpo@"]),
        "Email",
    ),
    (
        Rule::Any(&["call us", "telephone", "toll-free", "toll free", "phone us"]),
        "Phone",
    ),
    (
        Rule::Any(&["mail us", "postal", "write to us", "mailing address", "by mail"]),
        "Postal Mail",
    ),
    (
        Rule::Any(&["contact form", "web form", "online form", "webform", "request form"]),
        "Online Form",
    ),
    (
        Rule::Any(&["privacy portal", "privacy center", "privacy centre", "privacy dashboard"]),
        "Privacy Portal",
    ),
];

pub const OTHER_REGULATIONS: Table = &[
    (HIPAA, "HIPAA"),
    (Rule::Any(&["cpra", "california privacy rights act"]), "CPRA"),
    (Rule::Any(&["pipeda"]), "PIPEDA"),
    (Rule::Any(&["lgpd"]), "LGPD"),
    (
        Rule::Any(&["caloppa", "california online privacy protection act"]),
        "CalOPPA",
    ),
    (Rule::Any(&["vcdpa", "virginia consumer data protection"]), "VCDPA"),
    (Rule::Any(&["colorado privacy act"]), "CPA"),
    (Rule::Any(&["ferpa"]), "FERPA"),
    (Rule::Any(&["gramm-leach", "glba"]), "GLBA"),
    (Rule::Any(&["uk gdpr"]), "UK GDPR"),
    (Rule::Any(&["pipl", "personal information protection law"]), "PIPL"),
    (Rule::Any(&["eprivacy"]), "ePrivacy Directive"),
];

/// First match wins.
pub const NOTIFICATION_METHODS: Table = &[
    (
        Rule::Both(&["notify", "notification", "inform"], &["email", "e-mail"]),
        "Email notification",
    ),
    (
        Rule::Any(&["prominent notice", "notice on our website", "notice on our site", "banner"]),
        "Website notice",
    ),
    (
        Rule::Any(&["in-app", "in the app", "app notification"]),
        "In-app notification",
    ),
    (
        Rule::Both(
            &["post", "publish"],
            &["this page", "this policy", "our website", "our site", "revised policy"],
        ),
        "Posted on website",
    ),
];

// Single signals shared by the analyzer and the scoring functions.

pub const ACCESS_RIGHT: Rule = Rule::Both(
    &["access", "obtain a copy", "request a copy"],
    &["your data", "your personal", "your information"],
);
pub const DELETION_RIGHT: Rule =
    Rule::Any(&["delete", "deletion", "erase", "erasure", "right to be forgotten"]);
pub const CORRECTION_RIGHT: Rule = Rule::Any(&["correct", "rectif", "update your", "amend"]);
pub const PORTABILITY_RIGHT: Rule = Rule::Any(&["portab", "export", "machine-readable"]);
pub const OPT_OUT_RIGHT: Rule = Rule::Any(&[
    "opt out",
    "opt-out",
    "withdraw consent",
    "withdraw your consent",
    "unsubscribe",
]);

pub const SALE_OF_DATA: Rule = Rule::All(&["sell", "data"]);
pub const THIRD_PARTY: Rule = Rule::Any(&["third part", "third-part"]);
pub const ADVERTISING_SHARING: Rule = Rule::Both(&["advertis"], &["share", "sharing"]);
pub const USER_CONTROL: Rule = Rule::Any(&[
    "opt out",
    "opt-out",
    "opt in",
    "opt-in",
    "your choices",
    "you can choose",
    "you may choose",
    "control over",
]);
pub const SHARING: Rule = Rule::Any(&["third part", "third-part", "share", "sharing", "disclose"]);
pub const INTERNATIONAL_TRANSFERS: Rule = Rule::Any(&[
    "international transfer",
    "transfer your data",
    "transferred to",
    "outside your country",
    "other countries",
    "cross-border",
]);
pub const LAW_ENFORCEMENT: Rule = Rule::Any(&[
    "law enforcement",
    "legal process",
    "court order",
    "subpoena",
    "government request",
    "public authorit",
]);

pub const COOKIES: Rule = Rule::Any(&["cookie"]);
pub const COOKIE_OPT_OUT: Rule = Rule::Both(
    &["cookie"],
    &["opt out", "opt-out", "disable", "reject", "decline", "manage", "settings", "block"],
);
pub const GRANULAR_COOKIE_CONTROLS: Rule = Rule::Any(&[
    "cookie settings",
    "cookie preferences",
    "manage cookies",
    "preference center",
    "cookie categories",
    "granular",
]);
pub const DO_NOT_TRACK: Rule = Rule::Any(&["do not track", "dnt"]);

pub const ENCRYPTION: Rule = Rule::Any(&["encrypt"]);
pub const SSL_TLS: Rule = Rule::Any(&["ssl", "tls", "secure socket", "transport layer security"]);
pub const ACCESS_CONTROLS: Rule = Rule::Any(&[
    "access control",
    "restricted access",
    "restrict access",
    "authorized personnel",
    "need to know",
    "need-to-know",
]);
pub const MULTI_FACTOR: Rule = Rule::Any(&[
    "two-factor",
    "2fa",
    "multi-factor",
    "multifactor",
    "two-step verification",
]);
pub const AUDIT_OR_TESTING: Rule = Rule::Any(&[
    "audit",
    "penetration test",
    "security testing",
    "vulnerability",
]);
pub const INCIDENT_RESPONSE: Rule = Rule::Any(&[
    "data breach",
    "security incident",
    "incident response",
    "breach notification",
]);

pub const FREQUENCY: Rule = Rule::Any(&[
    "periodically",
    "from time to time",
    "regularly",
    "annually",
    "once a year",
]);
pub const CONSENT_FOR_CHANGES: Rule = Rule::Both(
    &["your consent", "obtain consent", "seek consent", "ask for your consent"],
    &["change", "update", "modif"],
);

pub const GDPR: Rule = Rule::Any(&["gdpr", "general data protection regulation"]);
pub const CCPA: Rule = Rule::Any(&["ccpa", "california consumer privacy act"]);
pub const COPPA: Rule = Rule::Any(&["coppa", "children's online privacy protection"]);
pub const HIPAA: Rule = Rule::Any(&["hipaa", "health insurance portability"]);

pub const CONTACT: Rule = Rule::Any(&["contact us", "contacting us", "reach us", "get in touch"]);
pub const DPO: Rule = Rule::Any(&["data protection officer", "dpo"]);

pub const EXAMPLES: Rule = Rule::Any(&["for example", "such as"]);
pub const TABLE_OF_CONTENTS: Rule = Rule::Any(&["table of contents"]);
pub const PLAIN_LANGUAGE: Rule = Rule::Any(&[
    "plain language",
    "plain english",
    "easy to understand",
    "clear and simple",
    "simple terms",
]);
pub const POLICY_TITLE: Rule = Rule::Any(&["privacy policy", "privacy notice", "privacy statement"]);
pub const SECTIONED: Rule = Rule::Any(&["table of contents", "section", "overview"]);

pub const RETENTION: Rule = Rule::Any(&["retain", "retention", "keep your", "stored for"]);
pub const DURATION_UNIT: Rule = Rule::Any(&["days", "months", "years"]);
pub const INACTIVITY_DELETION: Rule = Rule::Both(
    &["delete", "deletion", "erase"],
    &["inactiv", "no longer active", "dormant"],
);
pub const DELETION_PROCESS: Rule = Rule::Any(&[
    "request deletion",
    "deletion request",
    "delete your account",
    "request that we delete",
]);

pub fn data_types(text: &str) -> Vec<String> {
    detect(DATA_TYPES, text)
}

pub fn purposes(text: &str) -> Vec<String> {
    detect(PURPOSES, text)
}

pub fn tracking_technologies(text: &str) -> Vec<String> {
    detect(TRACKING_TECHNOLOGIES, text)
}

pub fn security_measures(text: &str) -> Vec<String> {
    detect(SECURITY_MEASURES, text)
}

pub fn opt_out_methods(text: &str) -> Vec<String> {
    detect(OPT_OUT_METHODS, text)
}

pub fn sharing_purposes(text: &str) -> Vec<String> {
    detect(SHARING_PURPOSES, text)
}

pub fn transfer_safeguards(text: &str) -> Vec<String> {
    detect(TRANSFER_SAFEGUARDS, text)
}

pub fn contact_methods(text: &str) -> Vec<String> {
    detect(CONTACT_METHODS, text)
}

pub fn other_regulations(text: &str) -> Vec<String> {
    detect(OTHER_REGULATIONS, text)
}

pub fn notification_method(text: &str) -> &'static str {
    first_match(NOTIFICATION_METHODS, text).unwrap_or(NOT_SPECIFIED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_variants() {
        assert!(Rule::Any(&["a", "z"]).matches("abc"));
        assert!(!Rule::Any(&["x", "z"]).matches("abc"));
        assert!(Rule::All(&["a", "c"]).matches("abc"));
        assert!(!Rule::All(&["a", "z"]).matches("abc"));
        assert!(Rule::Both(&["a", "x"], &["c", "y"]).matches("abc"));
        assert!(!Rule::Both(&["a"], &["y"]).matches("abc"));
    }

    #[test]
    fn test_tables_have_unique_labels() {
        for table in [
            DATA_TYPES,
            PURPOSES,
            TRACKING_TECHNOLOGIES,
            SECURITY_MEASURES,
            OPT_OUT_METHODS,
            SHARING_PURPOSES,
            TRANSFER_SAFEGUARDS,
            CONTACT_METHODS,
            OTHER_REGULATIONS,
            NOTIFICATION_METHODS,
        ] {
            let labels: HashSet<_> = table.iter().map(|(_, label)| label).collect();
            assert_eq!(labels.len(), table.len());
        }
    }

    #[test]
    fn test_detects_in_table_order() {
        let text = "we use ssl and encryption for your location and email";

        assert_eq!(data_types(text), vec!["Personal Identifiers", "Location Data"]);
        assert_eq!(security_measures(text), vec!["Encryption", "SSL/TLS"]);
    }

    #[test]
    fn test_notification_method_first_match_wins() {
        let text = "we will post the revised policy on this page and notify you by email";
        assert_eq!(notification_method(text), "Email notification");

        let text = "we will post changes on this page";
        assert_eq!(notification_method(text), "Posted on website");

        assert_eq!(notification_method("nothing relevant"), NOT_SPECIFIED);
    }

    #[test]
    fn test_each_table_rule_fires_in_isolation() {
        assert_eq!(tracking_technologies("we embed a like button"), vec!["Social Media Plugins"]);
        assert_eq!(opt_out_methods("click unsubscribe"), vec!["Email Unsubscribe"]);
        assert_eq!(sharing_purposes("in a merger"), vec!["Business Transfers"]);
        assert_eq!(
            transfer_safeguards("we rely on standard contractual clauses"),
            vec!["Standard Contractual Clauses"]
        );
        assert_eq!(contact_methods("write to us"), vec!["Postal Mail"]);
        assert_eq!(other_regulations("we follow pipeda"), vec!["PIPEDA"]);
    }
}
