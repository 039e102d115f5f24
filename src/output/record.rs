use crate::extract::SocialPlatform;
use crate::state::SeedReport;
use crate::storage::SeedRecord;
use chrono::Utc;

/// Shapes a seed report into its persisted form
///
/// Emails and phones become `", "`-joined strings and every social platform
/// gets its own slot, empty when nothing was found.
pub fn shape_record(report: &SeedReport) -> SeedRecord {
    let social = |platform: SocialPlatform| {
        report
            .result
            .social(platform)
            .unwrap_or_default()
            .to_string()
    };

    SeedRecord {
        row_index: report.row,
        seed: report.seed.clone(),
        status: report.status,
        emails: report.result.emails_joined(),
        phones: report.result.phones_joined(),
        facebook: social(SocialPlatform::Facebook),
        instagram: social(SocialPlatform::Instagram),
        twitter: social(SocialPlatform::Twitter),
        linkedin: social(SocialPlatform::LinkedIn),
        pages_visited: report.pages_visited,
        pages_fetched: report.pages_fetched,
        error_message: report.error.clone(),
        crawled_at: Utc::now().to_rfc3339(),
    }
}
