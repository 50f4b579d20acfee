//! Fixed index schema for venue documents.

use serde_json::{json, Value};

/// Field mappings for the venue index, in the `{"mappings": …}` body shape
/// accepted by create-index.
#[must_use]
pub fn index_mappings() -> Value {
    json!({
        "mappings": {
            "properties": {
                "name": { "type": "keyword" },
                "price": { "type": "integer" },
                "guests": { "type": "integer_range" },
                "coordinates": { "type": "geo_point" },
                "website": { "type": "keyword" },
                "review_score": { "type": "float" },
                "has_more_info": { "type": "boolean" },
                "multiple_events": { "type": "boolean" },
                "location_type": { "type": "keyword" }
            }
        }
    })
}
