//! Fixed-parameter shortcuts over the four operations.

use crate::client::Client;
use crate::context::Context;
use crate::error::Result;
use crate::options::QueryOptions;
use crate::types::*;

/// Query options and parameters used by the convenience methods.
///
/// The defaults are the values the NDB documentation uses in its examples;
/// override them with [`ClientBuilder::presets`](crate::ClientBuilder::presets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presets {
    /// Options for [`Client::list_by_type`].
    pub list: QueryOptions,
    /// Options for [`Client::nutrients_report`].
    pub nutrients_report: QueryOptions,
    /// Options for [`Client::food_nutrients_report`].
    pub food_nutrients_report: QueryOptions,
    /// Options for [`Client::food_name_search`].
    pub search: QueryOptions,
    /// Nutrients reported by the two nutrient report shortcuts.
    pub nutrient_ids: Vec<String>,
    /// Food group covered by [`Client::nutrients_report`].
    pub food_group: String,
}

impl Default for Presets {
    fn default() -> Self {
        Self {
            list: QueryOptions::new().with_max(1500).with_offset(0).with_sort("id"),
            nutrients_report: QueryOptions::new().with_max(10).with_offset(0).with_sort("c"),
            food_nutrients_report: QueryOptions::new().with_max(100).with_offset(0).with_sort("c"),
            search: QueryOptions::new().with_max(100).with_offset(0).with_sort("n"),
            // Potassium, Total lipid (fat)
            nutrient_ids: vec!["306".into(), "204".into()],
            // Baby Foods
            food_group: "0300".into(),
        }
    }
}

impl Client {
    /// List items of one list type (`f`, `n`, `g`, ...).
    pub async fn list_by_type(&self, ctx: &Context, list_type: &str) -> Result<ListResponse> {
        let params = ListParams {
            lt: Some(list_type.to_string()),
        };
        self.list(ctx, &params, Some(&self.presets.list)).await
    }

    /// Report the preset nutrients across the preset food group.
    pub async fn nutrients_report(&self, ctx: &Context) -> Result<NutrientReportResponse> {
        let params = NutrientReportParams {
            fg: vec![self.presets.food_group.clone()],
            nutrient_ids: self.presets.nutrient_ids.clone(),
            ..Default::default()
        };
        self.nutrient_report(ctx, &params, Some(&self.presets.nutrients_report))
            .await
    }

    /// Report the preset nutrients for a single food.
    pub async fn food_nutrients_report(
        &self,
        ctx: &Context,
        ndbno: &str,
    ) -> Result<NutrientReportResponse> {
        let params = NutrientReportParams {
            ndbno: Some(ndbno.to_string()),
            nutrient_ids: self.presets.nutrient_ids.clone(),
            ..Default::default()
        };
        self.nutrient_report(ctx, &params, Some(&self.presets.food_nutrients_report))
            .await
    }

    /// Basic V2 report for a single food.
    pub async fn basic_food_report(&self, ctx: &Context, ndbno: &str) -> Result<FoodsReportResponse> {
        let params = FoodsReportParams {
            ndbno: vec![ndbno.to_string()],
            report_type: Some(ReportType::Basic),
        };
        self.foods_report(ctx, &params).await
    }

    /// Search foods by name.
    pub async fn food_name_search(&self, ctx: &Context, name: &str) -> Result<SearchResponse> {
        let params = SearchParams {
            q: Some(name.to_string()),
            ..Default::default()
        };
        self.search(ctx, &params, Some(&self.presets.search)).await
    }
}
