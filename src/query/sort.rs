use crate::models::SortSpec;
use std::cmp::Ordering;
use std::sync::Arc;

type Comparator<'a, T> = Arc<dyn Fn(&T, &T) -> Ordering + 'a>;

/// Comparators keyed by sort-option id. The id carries the direction
/// (`date_desc`, `name_asc`), so `SortSpec::direction` is not consulted.
pub struct SortTable<'a, T> {
    rules: Vec<(String, Comparator<'a, T>)>,
    default_id: String,
}

impl<'a, T> SortTable<'a, T> {
    pub fn new(default_id: &str) -> Self {
        Self {
            rules: Vec::new(),
            default_id: default_id.to_string(),
        }
    }

    pub fn insert(&mut self, id: &str, compare: impl Fn(&T, &T) -> Ordering + 'a) {
        self.rules.retain(|(existing, _)| existing != id);
        self.rules.push((id.to_string(), Arc::new(compare)));
    }

    pub fn ids(&self) -> Vec<&str> {
        self.rules.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    fn rule(&self, id: &str) -> Option<&Comparator<'a, T>> {
        self.rules.iter().find(|(candidate, _)| candidate == id).map(|(_, compare)| compare)
    }

    /// Sorts in place with the rule named by `spec`, falling back to the
    /// default rule. Equal keys keep their input order.
    pub fn sort(&self, items: &mut [&T], spec: Option<&SortSpec>) {
        let requested = spec.map(|spec| spec.by.as_str()).filter(|id| !id.is_empty());
        let compare = match requested.and_then(|id| self.rule(id)) {
            Some(compare) => compare,
            None => {
                if let Some(id) = requested {
                    tracing::debug!(sort = %id, fallback = %self.default_id, "unknown sort id");
                }
                match self.rule(&self.default_id) {
                    Some(compare) => compare,
                    None => return,
                }
            }
        };
        items.sort_by(|a, b| compare(*a, *b));
    }
}

/// Case-insensitive ordering with a raw tie-break, close to `localeCompare`.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Missing timestamps order as the oldest.
pub fn compare_timestamps(a: Option<i64>, b: Option<i64>) -> Ordering {
    a.unwrap_or(i64::MIN).cmp(&b.unwrap_or(i64::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortDirection;

    #[test]
    fn compare_text_ignores_case_first() {
        assert_eq!(compare_text("alpha", "Beta"), Ordering::Less);
        assert_eq!(compare_text("Beta", "alpha"), Ordering::Greater);
        assert_eq!(compare_text("same", "same"), Ordering::Equal);
    }

    #[test]
    fn unknown_sort_falls_back_to_default() {
        let mut table: SortTable<'_, i64> = SortTable::new("desc");
        table.insert("desc", |a, b| b.cmp(a));
        table.insert("asc", |a, b| a.cmp(b));

        let values = [3_i64, 1, 2];
        let mut items: Vec<&i64> = values.iter().collect();
        table.sort(&mut items, Some(&SortSpec::new("nonsense", SortDirection::Asc)));
        assert_eq!(items, vec![&3, &2, &1]);

        table.sort(&mut items, Some(&SortSpec::new("asc", SortDirection::Desc)));
        assert_eq!(items, vec![&1, &2, &3]);

        table.sort(&mut items, None);
        assert_eq!(items, vec![&3, &2, &1]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let mut table: SortTable<'_, (i32, &str)> = SortTable::new("key");
        table.insert("key", |a, b| a.0.cmp(&b.0));
        let values = [(1, "first"), (0, "zero"), (1, "second")];
        let mut items: Vec<&(i32, &str)> = values.iter().collect();
        table.sort(&mut items, None);
        let labels: Vec<&str> = items.iter().map(|item| item.1).collect();
        assert_eq!(labels, vec!["zero", "first", "second"]);
    }

    #[test]
    fn timestamps_without_value_sort_oldest() {
        assert_eq!(compare_timestamps(None, Some(0)), Ordering::Less);
        assert_eq!(compare_timestamps(Some(5), Some(5)), Ordering::Equal);
    }
}
