use super::model::Dataset;

/// Revenue implied by a spend and its return: `ad_spend × (1 + roi)`.
/// NaN in either input gives NaN.
pub fn revenue_for(ad_spend: f64, roi: f64) -> f64 {
    ad_spend * (1.0 + roi)
}

/// Fill in `revenue` on every record. Safe to call repeatedly.
pub fn derive_revenue(dataset: &mut Dataset) {
    for rec in &mut dataset.records {
        rec.revenue = revenue_for(rec.ad_spend, rec.roi);
    }
}
