use crate::types::{scalar_record, FlattenConfig, Record};
use serde_json::{Map, Value};

/// Flattens nested JSON objects into single-level records
///
/// Nested object keys are joined to their parent key with the configured
/// separator. Arrays are never expanded; they stay as one column value.
pub struct JsonFlattener {
    config: FlattenConfig,
}

impl JsonFlattener {
    pub fn new(config: FlattenConfig) -> Self {
        JsonFlattener { config }
    }

    pub fn config(&self) -> &FlattenConfig {
        &self.config
    }

    /// Flatten one record
    pub fn flatten(&self, value: Value) -> Record {
        match value {
            Value::Object(obj) => {
                let mut record = Map::new();
                self.flatten_object(obj, None, 0, &mut record);
                record
            }
            other => scalar_record(other),
        }
    }

    /// Flatten every record in order
    pub fn flatten_all<I>(&self, values: I) -> Vec<Record>
    where
        I: IntoIterator<Item = Value>,
    {
        values.into_iter().map(|v| self.flatten(v)).collect()
    }

    fn flatten_object(
        &self,
        obj: Map<String, Value>,
        prefix: Option<&str>,
        level: usize,
        out: &mut Record,
    ) {
        for (key, value) in obj.into_iter() {
            let column = match prefix {
                Some(p) => format!("{}{}{}", p, self.config.separator, key),
                None => key,
            };

            match value {
                Value::Object(nested) if self.can_descend(level) => {
                    // An empty object contributes no columns
                    self.flatten_object(nested, Some(&column), level + 1, out);
                }
                other => {
                    out.insert(column, other);
                }
            }
        }
    }

    fn can_descend(&self, level: usize) -> bool {
        match self.config.max_level {
            Some(max) => level < max,
            None => true,
        }
    }
}

impl Default for JsonFlattener {
    fn default() -> Self {
        JsonFlattener::new(FlattenConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn underscore() -> JsonFlattener {
        JsonFlattener::new(FlattenConfig::underscore())
    }

    #[test]
    fn test_nested_object() {
        let record = underscore().flatten(json!({"a": {"b": 1, "c": 2}}));

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a_b").unwrap(), &json!(1));
        assert_eq!(record.get("a_c").unwrap(), &json!(2));
        assert!(!record.contains_key("a"));
    }

    #[test]
    fn test_flat_input_unchanged() {
        let input = json!({"id": 1, "name": "Alice", "active": true, "score": null});
        let record = underscore().flatten(input.clone());

        assert_eq!(Value::Object(record), input);
    }

    #[test]
    fn test_arrays_kept_intact() {
        let record = underscore().flatten(json!({
            "id": 7,
            "followed_team_ids": [119, 147],
            "games": [{"gamePk": 1}]
        }));

        assert_eq!(record.get("followed_team_ids").unwrap(), &json!([119, 147]));
        assert_eq!(record.get("games").unwrap(), &json!([{"gamePk": 1}]));
    }

    #[test]
    fn test_deep_nesting_and_order() {
        let record = underscore().flatten(json!({
            "id": 1,
            "team": {"league": {"id": 103, "name": "AL"}, "name": "Yankees"},
            "active": true
        }));

        let keys: Vec<&str> = record.keys().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["id", "team_league_id", "team_league_name", "team_name", "active"]
        );
    }

    #[test]
    fn test_default_separator_is_dot() {
        let record = JsonFlattener::default().flatten(json!({"name": {"first": "A"}}));
        assert!(record.contains_key("name.first"));
    }

    #[test]
    fn test_max_level() {
        let flattener = JsonFlattener::new(FlattenConfig::underscore().with_max_level(Some(1)));
        let record = flattener.flatten(json!({"a": {"b": {"c": 1}, "d": 2}}));

        assert_eq!(record.get("a_b").unwrap(), &json!({"c": 1}));
        assert_eq!(record.get("a_d").unwrap(), &json!(2));

        let flattener = JsonFlattener::new(FlattenConfig::underscore().with_max_level(Some(0)));
        let record = flattener.flatten(json!({"a": {"b": 1}}));
        assert_eq!(record.get("a").unwrap(), &json!({"b": 1}));
    }

    #[test]
    fn test_empty_object_drops_column() {
        let record = underscore().flatten(json!({"id": 1, "meta": {}}));
        assert_eq!(record.len(), 1);
        assert!(!record.contains_key("meta"));
    }

    #[test]
    fn test_scalar_record() {
        let record = underscore().flatten(json!(42));
        assert_eq!(record.get("value").unwrap(), &json!(42));
    }
}
