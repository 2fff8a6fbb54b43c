use serde::{Deserialize, Serialize};

use modelkit_core::{ModelType, SimpleModel};

/// Average, sum and count of `value` over a set of records
///
/// `count` counts non-null values; `avg` and `sum` are `None` when it is 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub avg: Option<f64>,
    pub sum: Option<f64>,
    pub count: u64,
}

/// [`Aggregate`] for one `type` group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAggregate {
    #[serde(rename = "type")]
    pub model_type: Option<ModelType>,
    pub avg: Option<f64>,
    pub sum: Option<f64>,
    pub count: u64,
}

/// A record joined with the aggregate of every record sharing its type
#[derive(Debug, Clone, PartialEq)]
pub struct Annotated {
    pub record: SimpleModel,
    pub avg: Option<f64>,
    pub sum: Option<f64>,
}
