use anyhow::Result;

use crate::recommend::{RecommendationReport, RecommendationResult};

pub fn report_to_csv(report: &RecommendationReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "bucket",
        "id",
        "title",
        "price",
        "status",
        "score",
        "category",
        "budget_proximity",
    ])?;
    let buckets: [(&str, &[RecommendationResult]); 3] = [
        ("within_budget", report.recommendations.within_budget.as_slice()),
        ("alternatives", report.recommendations.alternatives.as_slice()),
        ("over_budget", report.recommendations.over_budget.as_slice()),
    ];
    for (bucket, results) in buckets {
        for result in results {
            writer.write_record([
                bucket.to_string(),
                result.item.id.clone(),
                result.item.title.clone(),
                result.item.price.map(|p| format!("{p:.2}")).unwrap_or_default(),
                result.item.status.to_string(),
                format!("{:.2}", result.score),
                result.category.to_string(),
                result.budget_proximity.to_string(),
            ])?;
        }
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
