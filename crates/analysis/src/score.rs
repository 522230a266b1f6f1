//! Single 0–100 privacy score derived from a finished analysis.

use serde::{Deserialize, Serialize};

use crate::schema::StructuredAnalysis;

pub fn privacy_score(analysis: &StructuredAnalysis) -> u8 {
    let mut score: i32 = 100;

    let sharing = &analysis.data_sharing;
    if sharing.third_parties && !sharing.user_control {
        score -= 25;
    } else if sharing.third_parties {
        score -= 15;
    }

    let rights = &analysis.user_rights;
    if !rights.deletion {
        score -= 20;
    }
    if !rights.access {
        score -= 10;
    }
    if !rights.opt_out {
        score -= 10;
    }

    let cookies = &analysis.cookies_tracking;
    if cookies.cookies_used && !cookies.opt_out_available {
        score -= 15;
    }

    if !analysis.security_measures.encryption_mentioned {
        score -= 10;
    }

    let compliance = &analysis.compliance;
    if !compliance.gdpr_mentioned && !compliance.ccpa_mentioned {
        score -= 10;
    }

    score.max(0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Grade::A,
            75..=89 => Grade::B,
            60..=74 => Grade::C,
            40..=59 => Grade::D,
            _ => Grade::F,
        }
    }
}
