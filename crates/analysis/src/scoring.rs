//! Per-dimension scores on a 0–10 scale.
//!
//! All functions expect case-folded text. Points are accumulated as signed
//! integers and clamped once at the end.

use crate::detectors::{self, Rule};

pub const MAX_SCORE: i32 = 10;

/// Policies shorter than this get a readability point.
const SHORT_POLICY_CHARS: usize = 10_000;

pub fn clamp_score(points: i32) -> u8 {
    points.clamp(0, MAX_SCORE) as u8
}

fn points_if(rule: Rule, text: &str, points: i32) -> i32 {
    if rule.matches(text) { points } else { 0 }
}

pub fn transparency_score(text: &str) -> u8 {
    let mut score = 5;
    score += points_if(detectors::EXAMPLES, text, 2);
    score += points_if(detectors::TABLE_OF_CONTENTS, text, 1);
    if text.chars().count() < SHORT_POLICY_CHARS {
        score += 1;
    }
    score += points_if(detectors::PLAIN_LANGUAGE, text, 1);
    clamp_score(score)
}

pub fn rights_score(text: &str) -> u8 {
    let score = points_if(detectors::ACCESS_RIGHT, text, 2)
        + points_if(detectors::DELETION_RIGHT, text, 3)
        + points_if(detectors::CORRECTION_RIGHT, text, 1)
        + points_if(detectors::PORTABILITY_RIGHT, text, 2)
        + points_if(detectors::OPT_OUT_RIGHT, text, 2);
    clamp_score(score)
}

/// Less sharing scores higher.
pub fn sharing_score(text: &str) -> u8 {
    let mut score = MAX_SCORE;
    score -= points_if(detectors::SALE_OF_DATA, text, 4);
    score -= points_if(detectors::THIRD_PARTY, text, 2);
    score -= points_if(detectors::ADVERTISING_SHARING, text, 1);
    score += points_if(detectors::USER_CONTROL, text, 2);
    clamp_score(score)
}

pub fn security_score(text: &str, measures: &[String]) -> u8 {
    let mut score = 2 * measures.len() as i32;
    score += points_if(detectors::ENCRYPTION, text, 2);
    score += points_if(detectors::SSL_TLS, text, 1);
    score += points_if(detectors::MULTI_FACTOR, text, 2);
    score += points_if(detectors::AUDIT_OR_TESTING, text, 1);
    clamp_score(score)
}

pub fn compliance_score(text: &str) -> u8 {
    let score = points_if(detectors::GDPR, text, 3)
        + points_if(detectors::CCPA, text, 3)
        + points_if(detectors::COPPA, text, 2)
        + points_if(detectors::HIPAA, text, 2);
    clamp_score(score)
}

pub fn tracking_score(text: &str, technologies: &[String]) -> u8 {
    let mut score = MAX_SCORE - technologies.len() as i32;
    score += points_if(detectors::COOKIE_OPT_OUT, text, 2);
    score += points_if(detectors::DO_NOT_TRACK, text, 1);
    clamp_score(score)
}

pub fn retention_score(text: &str) -> u8 {
    let mut score = 5;
    if detectors::RETENTION.matches(text) && detectors::DURATION_UNIT.matches(text) {
        score += 3;
    }
    score += points_if(detectors::INACTIVITY_DELETION, text, 2);
    clamp_score(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("m{i}")).collect()
    }

    #[test]
    fn test_sharing_score_applies_all_deductions() {
        let text = "we may sell data to any third party. our advertising partners share it.";
        assert_eq!(sharing_score(text), 3);
    }

    #[test]
    fn test_sharing_score_rewards_control() {
        assert_eq!(sharing_score("we never share anything"), 10);
        assert_eq!(sharing_score("third party tools. you can opt out."), 10);
    }

    #[test]
    fn test_transparency_score() {
        assert_eq!(transparency_score("short"), 6);
        assert_eq!(
            transparency_score("table of contents. for example, in plain language."),
            10
        );
        let long = "x".repeat(SHORT_POLICY_CHARS);
        assert_eq!(transparency_score(&long), 5);
    }

    #[test]
    fn test_rights_score_caps_at_ten() {
        let text = "access your data, delete it, correct it, export it, or opt out.";
        assert_eq!(rights_score(text), 10);
        assert_eq!(rights_score("nothing"), 0);
        assert_eq!(rights_score("you may request erasure"), 3);
    }

    #[test]
    fn test_security_score_is_clamped() {
        let text = "encryption, ssl, two-factor and regular audits";
        assert_eq!(security_score(text, &labels(1)), 2 + 2 + 1 + 2 + 1);
        assert_eq!(security_score(text, &labels(8)), 10);
        assert_eq!(security_score("", &[]), 0);
    }

    #[test]
    fn test_compliance_score() {
        assert_eq!(compliance_score("gdpr and ccpa"), 6);
        assert_eq!(compliance_score("gdpr, ccpa, coppa and hipaa"), 10);
    }

    #[test]
    fn test_tracking_score() {
        assert_eq!(tracking_score("", &[]), 10);
        assert_eq!(tracking_score("", &labels(4)), 6);
        assert_eq!(tracking_score("you can disable cookies", &labels(3)), 9);
        assert_eq!(tracking_score("", &labels(12)), 0);
    }

    #[test]
    fn test_retention_score() {
        assert_eq!(retention_score("nothing"), 5);
        assert_eq!(retention_score("we retain logs for 90 days"), 8);
        assert_eq!(
            retention_score("we retain data for 2 years and delete inactive accounts"),
            10
        );
    }
}
