use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};
use serde::Serialize;
use serde_json::Value;

use super::query::{FieldSet, ListQuery, SearchFilter, SortOrder, SortSpec};
use crate::gateway::Record;

/// One page of a filtered, sorted collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult<T> {
    pub page_number: u64,
    pub page_size: u64,
    /// Items on this page, not in the whole collection.
    pub count: usize,
    /// `None` when `page_size` is zero.
    pub total_pages: Option<u64>,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub data: Vec<T>,
}

/// Search, sort, paginate, then project. Malformed parameters degrade to no-ops.
pub fn process<T, F>(
    records: Vec<Record>,
    query: &ListQuery,
    fields: &FieldSet,
    project: F,
) -> PageResult<T>
where
    F: Fn(&Record) -> T,
{
    let search = SearchFilter::parse(query.search.as_deref(), fields);
    let sort = SortSpec::parse(query.sort.as_deref(), fields);

    let mut records = apply_search(records, &search);
    apply_sort(&mut records, sort);
    paginate(&records, query.page_number, query.page_size, project)
}

pub fn apply_search(records: Vec<Record>, filter: &SearchFilter) -> Vec<Record> {
    let SearchFilter::Field { field, token } = filter else {
        return records;
    };
    let needle = token.to_lowercase();
    records
        .into_iter()
        .filter(|r| match searchable_text(r.get(field)) {
            Some(text) => text.to_lowercase().contains(&needle),
            None => false,
        })
        .collect()
}

fn searchable_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Stable; equal keys keep their relative order in both directions.
pub fn apply_sort(records: &mut [Record], spec: SortSpec) {
    let SortSpec::By { field, order } = spec else {
        return;
    };
    let collator = Collator::try_new(&Default::default(), CollatorOptions::new())
        .map_err(|e| tracing::warn!(error = ?e, "root collator unavailable; comparing bytes"))
        .ok();
    records.sort_by(|a, b| match order {
        SortOrder::Asc => compare_field(a.get(field), b.get(field), collator.as_ref()),
        SortOrder::Desc => compare_field(b.get(field), a.get(field), collator.as_ref()),
    });
}

fn compare_field(a: Option<&Value>, b: Option<&Value>, collator: Option<&Collator>) -> Ordering {
    let numeric = matches!(a, Some(Value::Number(_))) || matches!(b, Some(Value::Number(_)));
    if numeric {
        // A non-numeric value orders after every number so the order stays total.
        return match (a.and_then(Value::as_f64), b.and_then(Value::as_f64)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
    }
    let (a, b) = (sort_text(a), sort_text(b));
    match collator {
        Some(c) => c.compare(&a, &b),
        None => a.cmp(&b),
    }
}

fn sort_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.to_lowercase(),
        _ => String::new(),
    }
}

pub fn paginate<T, F>(records: &[Record], page_number: u64, page_size: u64, project: F) -> PageResult<T>
where
    F: Fn(&Record) -> T,
{
    let total = records.len() as u64;
    let total_pages = (page_size > 0).then(|| total.div_ceil(page_size));
    let start = page_number.saturating_sub(1).saturating_mul(page_size);
    let end = page_number.saturating_mul(page_size);

    let data: Vec<T> = records
        .iter()
        .skip(usize::try_from(start).unwrap_or(usize::MAX))
        .take(usize::try_from(end - start).unwrap_or(usize::MAX))
        .map(project)
        .collect();

    PageResult {
        page_number,
        page_size,
        count: data.len(),
        total_pages,
        has_previous_page: page_number > 1,
        has_next_page: match total_pages {
            Some(pages) => page_number < pages,
            // ceil(n / 0) is unbounded for n > 0 and undefined for n == 0
            None => total > 0,
        },
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    const PRODUCT_FIELDS: FieldSet = FieldSet {
        searchable: &["name", "category"],
        default_sort: "name",
        alternate_sort: "price",
    };

    fn record(v: Value) -> Record {
        Record {
            id: Uuid::new_v4(),
            fields: v.as_object().cloned().unwrap(),
        }
    }

    fn named(names: &[&str]) -> Vec<Record> {
        names.iter().map(|n| record(json!({ "name": n }))).collect()
    }

    fn name_of(r: &Record) -> String {
        r.str_field("name").unwrap_or_default().to_string()
    }

    fn query(page_number: u64, page_size: u64, search: Option<&str>, sort: Option<&str>) -> ListQuery {
        ListQuery {
            page_number,
            page_size,
            search: search.map(str::to_string),
            sort: sort.map(str::to_string),
        }
    }

    const FRUIT: [&str; 7] = ["Banana", "apple", "Cherry", "date", "Elderberry", "fig", "Grape"];

    #[test]
    fn sorted_pages_over_mixed_case_names() {
        let first = process(named(&FRUIT), &query(1, 3, None, Some("name:asc")), &PRODUCT_FIELDS, name_of);
        assert_eq!(first.data, vec!["apple", "Banana", "Cherry"]);
        assert_eq!(first.total_pages, Some(3));
        assert!(first.has_next_page);
        assert!(!first.has_previous_page);

        let last = process(named(&FRUIT), &query(3, 3, None, Some("name:asc")), &PRODUCT_FIELDS, name_of);
        assert_eq!(last.data, vec!["Grape"]);
        assert_eq!(last.count, 1);
        assert_eq!(last.total_pages, Some(3));
        assert!(!last.has_next_page);
        assert!(last.has_previous_page);
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let page = process(
            named(&["zebra", "Éclair", "apple", "eclair"]),
            &query(1, 10, None, Some("name:asc")),
            &PRODUCT_FIELDS,
            name_of,
        );
        assert_eq!(page.data, vec!["apple", "eclair", "Éclair", "zebra"]);
    }

    #[test]
    fn descending_sort_reverses() {
        let page = process(named(&FRUIT), &query(1, 2, None, Some("name:desc")), &PRODUCT_FIELDS, name_of);
        assert_eq!(page.data, vec!["Grape", "fig"]);
    }

    #[test]
    fn page_size_zero_is_always_empty() {
        let page = process(named(&FRUIT), &query(1, 0, None, None), &PRODUCT_FIELDS, name_of);
        assert!(page.data.is_empty());
        assert_eq!(page.count, 0);
        assert_eq!(page.total_pages, None);
        assert!(page.has_next_page);

        let empty = process(Vec::new(), &query(1, 0, None, None), &PRODUCT_FIELDS, name_of);
        assert!(empty.data.is_empty());
        assert!(!empty.has_next_page);
    }

    #[test]
    fn page_length_bounded_by_size_and_remainder() {
        let records = named(&FRUIT);
        for size in 1..=8u64 {
            for number in 1..=9u64 {
                let page = process(records.clone(), &query(number, size, None, None), &PRODUCT_FIELDS, name_of);
                let start = (number - 1) * size;
                let expected = size.min(7u64.saturating_sub(start));
                assert!(page.count as u64 <= size);
                assert_eq!(page.count as u64, expected, "page {number} size {size}");
            }
        }
    }

    #[test]
    fn out_of_range_page_is_empty_not_error() {
        let page = process(named(&FRUIT), &query(50, 3, None, None), &PRODUCT_FIELDS, name_of);
        assert!(page.data.is_empty());
        assert!(!page.has_next_page);
        assert!(page.has_previous_page);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = vec![
            record(json!({"name": "Chips", "category": "Snacks"})),
            record(json!({"name": "Soap", "category": "Household"})),
            record(json!({"name": "Nuts"})),
        ];
        let page = process(records, &query(1, 10, Some("category:snacks"), None), &PRODUCT_FIELDS, name_of);
        assert_eq!(page.data, vec!["Chips"]);
    }

    #[test]
    fn search_on_unlisted_field_returns_everything() {
        let page = process(named(&FRUIT), &query(1, 10, Some("colour:red"), None), &PRODUCT_FIELDS, name_of);
        assert_eq!(page.count, 7);
        assert_eq!(page.data, FRUIT.to_vec());
    }

    #[test]
    fn unknown_sort_field_keeps_order() {
        let page = process(named(&FRUIT), &query(1, 10, None, Some("colour:desc")), &PRODUCT_FIELDS, name_of);
        assert_eq!(page.data, FRUIT.to_vec());
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let records = vec![
            record(json!({"name": "b", "tag": 1})),
            record(json!({"name": "A", "tag": 2})),
            record(json!({"name": "a", "tag": 3})),
            record(json!({"name": "B", "tag": 4})),
        ];
        let tags = |q: ListQuery| {
            process(records.clone(), &q, &PRODUCT_FIELDS, |r| r.i64_field("tag").unwrap())
                .data
        };
        assert_eq!(tags(query(1, 10, None, Some("name"))), vec![2, 3, 1, 4]);
        assert_eq!(tags(query(1, 10, None, Some("name:desc"))), vec![1, 4, 2, 3]);
    }

    #[test]
    fn numeric_sort_and_missing_values() {
        let records = vec![
            record(json!({"name": "mid", "price": 5.5})),
            record(json!({"name": "none"})),
            record(json!({"name": "low", "price": 2})),
            record(json!({"name": "high", "price": 100})),
        ];
        let asc = process(records.clone(), &query(1, 10, None, Some("price:asc")), &PRODUCT_FIELDS, name_of);
        assert_eq!(asc.data, vec!["low", "mid", "high", "none"]);

        let by_name = process(
            vec![record(json!({"name": "b"})), record(json!({})), record(json!({"name": "A"}))],
            &query(1, 10, None, Some("name")),
            &PRODUCT_FIELDS,
            name_of,
        );
        assert_eq!(by_name.data, vec!["", "A", "b"]);
    }
}
