use crate::models::BatchReport;

/// Renders the human-readable batch report: a heading per user followed by
/// the chosen item ids, best first, one per line.
pub fn render_report(report: &BatchReport) -> String {
    let mut out = String::new();
    for user in &report.users {
        out.push_str(&format!("Recommendation for user {}\n", user.user_id));
        for item in &user.items {
            out.push_str(&format!("{}\n", item.item_id));
        }
    }
    out
}
