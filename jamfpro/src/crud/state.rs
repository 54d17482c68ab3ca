//! State reconciliation helpers
//!
//! Remote collections come back in arbitrary order, sometimes carrying
//! zero-ID or empty-name placeholder entries. Flattening them into sorted,
//! filtered lists keeps the mapping deterministic so repeated reads of an
//! unchanged remote object never produce a diff.

use tfbridge::{AttributePath, Diagnostic, Dynamic, DynamicValue};

use crate::api::ScopeEntity;

/// Collect entity IDs, dropping zero placeholders, sorted ascending
pub fn flatten_and_sort_ids(entities: &[ScopeEntity]) -> Vec<i64> {
    let mut ids: Vec<i64> = entities.iter().map(|e| e.id).filter(|id| *id != 0).collect();
    ids.sort_unstable();
    ids
}

/// Collect entity names, dropping empty ones, sorted lexicographically
pub fn flatten_and_sort_names(entities: &[ScopeEntity]) -> Vec<String> {
    let mut names: Vec<String> = entities
        .iter()
        .filter_map(|e| e.name.as_deref())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();
    names.sort();
    names
}

pub fn ids_to_dynamic(ids: &[i64]) -> Vec<Dynamic> {
    ids.iter().map(|id| Dynamic::Number(*id as f64)).collect()
}

pub fn names_to_dynamic(names: &[String]) -> Vec<Dynamic> {
    names.iter().cloned().map(Dynamic::String).collect()
}

/// Accumulates per-field reconciliation failures instead of short-circuiting,
/// so a single bad field never hides the rest of the sync
pub struct StateWriter<'a> {
    state: &'a mut DynamicValue,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> StateWriter<'a> {
    pub fn new(state: &'a mut DynamicValue) -> Self {
        Self {
            state,
            diagnostics: Vec::new(),
        }
    }

    pub fn string(&mut self, attribute: &str, value: &str) -> &mut Self {
        let result = self
            .state
            .set_string(&AttributePath::new(attribute), value.to_string());
        self.record(attribute, result);
        self
    }

    pub fn optional_string(&mut self, attribute: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) => self.string(attribute, v),
            None => self,
        }
    }

    pub fn bool(&mut self, attribute: &str, value: bool) -> &mut Self {
        let result = self.state.set_bool(&AttributePath::new(attribute), value);
        self.record(attribute, result);
        self
    }

    pub fn optional_bool(&mut self, attribute: &str, value: Option<bool>) -> &mut Self {
        match value {
            Some(v) => self.bool(attribute, v),
            None => self,
        }
    }

    pub fn i64(&mut self, attribute: &str, value: i64) -> &mut Self {
        let result = self
            .state
            .set_number(&AttributePath::new(attribute), value as f64);
        self.record(attribute, result);
        self
    }

    pub fn optional_i64(&mut self, attribute: &str, value: Option<i64>) -> &mut Self {
        match value {
            Some(v) => self.i64(attribute, v),
            None => self,
        }
    }

    pub fn list(&mut self, attribute: &str, value: Vec<Dynamic>) -> &mut Self {
        let result = self.state.set_list(&AttributePath::new(attribute), value);
        self.record(attribute, result);
        self
    }

    /// Sorted, zero-filtered ID list
    pub fn id_list(&mut self, attribute: &str, entities: &[ScopeEntity]) -> &mut Self {
        self.list(attribute, ids_to_dynamic(&flatten_and_sort_ids(entities)))
    }

    /// Sorted, empty-filtered name list
    pub fn name_list(&mut self, attribute: &str, entities: &[ScopeEntity]) -> &mut Self {
        self.list(
            attribute,
            names_to_dynamic(&flatten_and_sort_names(entities)),
        )
    }

    /// Drop an optional block from state entirely instead of writing an
    /// empty container
    pub fn omit(&mut self, attribute: &str) -> &mut Self {
        let result = self.state.unset(&AttributePath::new(attribute));
        self.record(attribute, result);
        self
    }

    fn record(&mut self, attribute: &str, result: tfbridge::error::Result<()>) {
        if let Err(e) = result {
            self.diagnostics.push(
                Diagnostic::error(
                    format!("Failed to sync attribute {}", attribute),
                    e.to_string(),
                )
                .with_attribute(AttributePath::new(attribute)),
            );
        }
    }

    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: i64, name: &str) -> ScopeEntity {
        ScopeEntity {
            id,
            name: if name.is_empty() {
                None
            } else {
                Some(name.to_string())
            },
        }
    }

    #[test]
    fn ids_are_sorted_ascending_and_zero_filtered() {
        let entities = vec![entity(9, ""), entity(0, ""), entity(3, ""), entity(7, "")];
        assert_eq!(flatten_and_sort_ids(&entities), vec![3, 7, 9]);
    }

    #[test]
    fn names_are_sorted_and_empty_filtered() {
        let entities = vec![entity(1, "zoe"), entity(2, ""), entity(3, "amy")];
        assert_eq!(flatten_and_sort_names(&entities), vec!["amy", "zoe"]);
    }

    #[test]
    fn flattening_is_order_independent() {
        let forward = vec![entity(1, "a"), entity(2, "b"), entity(3, "c")];
        let reverse: Vec<ScopeEntity> = forward.iter().rev().cloned().collect();
        assert_eq!(flatten_and_sort_ids(&forward), flatten_and_sort_ids(&reverse));
        assert_eq!(
            flatten_and_sort_names(&forward),
            flatten_and_sort_names(&reverse)
        );
    }

    #[test]
    fn writer_collects_all_fields_without_short_circuiting() {
        let mut state = DynamicValue::empty_object();
        let mut writer = StateWriter::new(&mut state);
        writer
            .string("name", "helpdesk")
            .bool("enabled", true)
            .i64("priority", 10);
        let diags = writer.finish();

        assert!(diags.is_empty());
        assert_eq!(
            state.get_string(&AttributePath::new("name")).unwrap(),
            "helpdesk"
        );
        assert!(state.get_bool(&AttributePath::new("enabled")).unwrap());
        assert_eq!(state.get_i64(&AttributePath::new("priority")).unwrap(), 10);
    }

    #[test]
    fn writer_omits_blocks() {
        let mut state = DynamicValue::empty_object();
        state
            .set_string(&AttributePath::new("limitations"), "stale".to_string())
            .unwrap();

        let mut writer = StateWriter::new(&mut state);
        writer.omit("limitations");
        assert!(writer.finish().is_empty());

        assert!(state.get_string(&AttributePath::new("limitations")).is_err());
    }

    #[test]
    fn writer_is_idempotent() {
        let entities = vec![entity(5, "e"), entity(2, "b")];

        let mut first = DynamicValue::empty_object();
        let mut writer = StateWriter::new(&mut first);
        writer.id_list("building_ids", &entities);
        writer.finish();

        let mut second = first.clone();
        let mut writer = StateWriter::new(&mut second);
        writer.id_list("building_ids", &entities);
        writer.finish();

        assert_eq!(
            first.get_list(&AttributePath::new("building_ids")).unwrap(),
            second.get_list(&AttributePath::new("building_ids")).unwrap()
        );
    }
}
