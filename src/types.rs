//! Request and response types for the NDB API.
//!
//! Field names follow the service's JSON exactly. Response structs default
//! every missing field, and fields whose JSON type differs between records
//! are kept as [`serde_json::Value`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Decode `null` as the field's default, the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// === Requests ===

/// Parameters for the `list` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    /// List type: `f` foods, `n` nutrients, `ns` specialty nutrients,
    /// `nr` standard release nutrients, `g` food groups, `d` derivation codes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<String>,
}

/// Parameters for the `nutrients` report endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutrientReportParams {
    /// Food group ids to restrict the report to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fg: Vec<String>,
    /// Report on a single food.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndbno: Option<String>,
    /// Nutrient ids to report (at least one, at most 20).
    #[serde(rename = "nutrients", default)]
    pub nutrient_ids: Vec<String>,
    /// `1` for the abridged list of foods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subset: Option<String>,
}

/// Report detail level for the V2 foods report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReportType {
    /// Basic report.
    #[serde(rename = "b")]
    Basic,
    /// Full report.
    #[serde(rename = "f")]
    Full,
    /// Statistics report.
    #[serde(rename = "s")]
    Stats,
}

/// Parameters for the `V2/reports` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodsReportParams {
    /// NDB numbers of the foods to report (up to 25).
    #[serde(default)]
    pub ndbno: Vec<String>,
    /// Report type; the service defaults to basic.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub report_type: Option<ReportType>,
}

/// Parameters for the `search` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Search terms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Data source: `Branded Food Products` or `Standard Reference`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ds: Option<String>,
    /// Food group id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<String>,
}

// === list ===

/// Response from the `list` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListResponse {
    /// The requested list.
    #[serde(deserialize_with = "null_as_default")]
    pub list: List,
}

/// A page of list items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct List {
    /// List type.
    #[serde(deserialize_with = "null_as_default")]
    pub lt: String,
    /// First item index.
    #[serde(deserialize_with = "null_as_default")]
    pub start: i64,
    /// Last item index.
    #[serde(deserialize_with = "null_as_default")]
    pub end: i64,
    /// Total items available.
    #[serde(deserialize_with = "null_as_default")]
    pub total: i64,
    /// Standard release version.
    #[serde(deserialize_with = "null_as_default")]
    pub sr: String,
    /// Sort order applied.
    #[serde(deserialize_with = "null_as_default")]
    pub sort: String,
    /// Items on this page.
    #[serde(deserialize_with = "null_as_default")]
    pub item: Vec<ListItem>,
}

/// One entry of a [`List`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListItem {
    #[serde(deserialize_with = "null_as_default")]
    pub offset: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

// === nutrients ===

/// Response from the `nutrients` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientReportResponse {
    /// The report body.
    #[serde(deserialize_with = "null_as_default")]
    pub report: NutrientReport,
}

/// Nutrient values for a set of foods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientReport {
    /// Standard release version.
    #[serde(deserialize_with = "null_as_default")]
    pub sr: String,
    /// Food groups included.
    #[serde(deserialize_with = "null_as_default")]
    pub groups: Vec<FoodGroup>,
    /// Whether the abridged subset was used.
    #[serde(deserialize_with = "null_as_default")]
    pub subset: String,
    #[serde(deserialize_with = "null_as_default")]
    pub end: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub start: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total: i64,
    /// Foods in the report.
    #[serde(deserialize_with = "null_as_default")]
    pub foods: Vec<NutrientReportFood>,
}

/// A food group reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodGroup {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

/// A food and its reported nutrients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientReportFood {
    #[serde(deserialize_with = "null_as_default")]
    pub ndbno: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Weight in grams of the household measure.
    #[serde(deserialize_with = "null_as_default")]
    pub weight: f64,
    /// Household measure description.
    #[serde(deserialize_with = "null_as_default")]
    pub measure: String,
    #[serde(deserialize_with = "null_as_default")]
    pub nutrients: Vec<ReportedNutrient>,
}

/// One nutrient value in a [`NutrientReportFood`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportedNutrient {
    #[serde(deserialize_with = "null_as_default")]
    pub nutrient_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub nutrient: String,
    #[serde(deserialize_with = "null_as_default")]
    pub unit: String,
    /// Value per household measure. Usually a numeric string, `"--"` when
    /// unknown.
    pub value: Value,
    /// Value per 100 g.
    #[serde(deserialize_with = "null_as_default")]
    pub gm: f64,
}

// === V2/reports ===

/// Response from the `V2/reports` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodsReportResponse {
    /// One entry per requested NDB number.
    #[serde(deserialize_with = "null_as_default")]
    pub foods: Vec<FoodsReportEntry>,
    /// Number of foods found.
    #[serde(deserialize_with = "null_as_default")]
    pub count: i64,
    /// Number of NDB numbers not found.
    #[serde(deserialize_with = "null_as_default")]
    pub notfound: i64,
    /// API version.
    #[serde(deserialize_with = "null_as_default")]
    pub api: f64,
}

/// Either a food or the reason it could not be reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodsReportEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food: Option<Food>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A single food report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Food {
    /// Standard release version.
    #[serde(deserialize_with = "null_as_default")]
    pub sr: String,
    /// Report type (`b`, `f` or `s`).
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub report_type: String,
    /// Food description.
    #[serde(deserialize_with = "null_as_default")]
    pub desc: FoodDescription,
    #[serde(deserialize_with = "null_as_default")]
    pub nutrients: Vec<FoodNutrient>,
    /// Literature sources (full and stats reports).
    #[serde(deserialize_with = "null_as_default")]
    pub sources: Vec<Source>,
    #[serde(deserialize_with = "null_as_default")]
    pub footnotes: Vec<Value>,
    /// LanguaL descriptors.
    #[serde(deserialize_with = "null_as_default")]
    pub langual: Vec<Value>,
}

/// Descriptive metadata of a [`Food`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodDescription {
    /// NDB number.
    #[serde(deserialize_with = "null_as_default")]
    pub ndbno: String,
    /// Food name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Short description.
    #[serde(deserialize_with = "null_as_default")]
    pub sd: String,
    /// Food group.
    #[serde(deserialize_with = "null_as_default")]
    pub fg: String,
    /// Scientific name.
    #[serde(deserialize_with = "null_as_default")]
    pub sn: String,
    /// Commercial name.
    #[serde(deserialize_with = "null_as_default")]
    pub cn: String,
    /// Manufacturer.
    #[serde(deserialize_with = "null_as_default")]
    pub manu: String,
    /// Nitrogen to protein conversion factor.
    #[serde(deserialize_with = "null_as_default")]
    pub nf: f64,
    /// Carbohydrate factor.
    #[serde(deserialize_with = "null_as_default")]
    pub cf: f64,
    /// Fat factor.
    #[serde(deserialize_with = "null_as_default")]
    pub ff: f64,
    /// Protein factor.
    #[serde(deserialize_with = "null_as_default")]
    pub pf: f64,
    /// Refuse percentage.
    #[serde(deserialize_with = "null_as_default")]
    pub r: String,
    /// Refuse description.
    #[serde(deserialize_with = "null_as_default")]
    pub rd: String,
    /// Database source.
    #[serde(deserialize_with = "null_as_default")]
    pub ds: String,
    /// Reporting unit.
    #[serde(deserialize_with = "null_as_default")]
    pub ru: String,
}

/// A nutrient in a [`Food`] report.
///
/// `nutrient_id`, `value`, `sourcecode` and `dp` arrive as strings, numbers
/// or null depending on the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodNutrient {
    pub nutrient_id: Value,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub group: String,
    #[serde(deserialize_with = "null_as_default")]
    pub unit: String,
    /// Value per 100 g.
    pub value: Value,
    /// Derivation code.
    #[serde(deserialize_with = "null_as_default")]
    pub derivation: String,
    pub sourcecode: Value,
    /// Number of data points.
    pub dp: Value,
    /// Standard error.
    #[serde(deserialize_with = "null_as_default")]
    pub se: String,
    #[serde(deserialize_with = "null_as_default")]
    pub measures: Vec<Measure>,
}

/// Nutrient value for a household measure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measure {
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    /// Gram equivalent of the measure.
    #[serde(deserialize_with = "null_as_default")]
    pub eqv: f64,
    /// Unit of `eqv`.
    #[serde(deserialize_with = "null_as_default")]
    pub eunit: String,
    #[serde(deserialize_with = "null_as_default")]
    pub qty: f64,
    pub value: Value,
}

/// A literature source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub authors: String,
    #[serde(deserialize_with = "null_as_default")]
    pub vol: String,
    #[serde(deserialize_with = "null_as_default")]
    pub iss: String,
    #[serde(deserialize_with = "null_as_default")]
    pub year: String,
}

// === search ===

/// Response from the `search` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    /// The matching foods.
    #[serde(deserialize_with = "null_as_default")]
    pub list: SearchList,
}

/// A page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchList {
    /// Terms searched for.
    #[serde(deserialize_with = "null_as_default")]
    pub q: String,
    /// Standard release version.
    #[serde(deserialize_with = "null_as_default")]
    pub sr: String,
    /// Data source filter.
    #[serde(deserialize_with = "null_as_default")]
    pub ds: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub end: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total: i64,
    /// Food group filter.
    #[serde(deserialize_with = "null_as_default")]
    pub group: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sort: String,
    #[serde(deserialize_with = "null_as_default")]
    pub item: Vec<SearchItem>,
}

/// One search hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchItem {
    #[serde(deserialize_with = "null_as_default")]
    pub offset: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub group: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ndbno: String,
    /// `SR` or `BL` (branded).
    #[serde(deserialize_with = "null_as_default")]
    pub ds: String,
    #[serde(deserialize_with = "null_as_default")]
    pub manu: String,
}
