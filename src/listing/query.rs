use serde::Deserialize;

/// Raw list parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page_number: Option<String>,
    pub page_size: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

/// Normalized list request. `page_number >= 1`; `page_size == 0` yields an empty page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page_number: u64,
    pub page_size: u64,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: 0,
            search: None,
            sort: None,
        }
    }
}

impl From<ListParams> for ListQuery {
    fn from(p: ListParams) -> Self {
        let page_number = p
            .page_number
            .as_deref()
            .and_then(parse_int_prefix)
            .filter(|n| *n >= 1)
            .map_or(1, |n| n as u64);
        let page_size = p
            .page_size
            .as_deref()
            .and_then(parse_int_prefix)
            .filter(|n| *n >= 0)
            .map_or(0, |n| n as u64);
        Self {
            page_number,
            page_size,
            search: p.search.filter(|s| !s.is_empty()),
            sort: p.sort.filter(|s| !s.is_empty()),
        }
    }
}

/// Leading-integer parse: optional whitespace and sign, then digits; trailing junk ignored.
fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = &digits[..digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len())];
    if digits.is_empty() {
        return None;
    }
    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// Fields a resource exposes to `search` and `sort`.
#[derive(Debug, Clone, Copy)]
pub struct FieldSet {
    pub searchable: &'static [&'static str],
    pub default_sort: &'static str,
    pub alternate_sort: &'static str,
}

/// Parsed `search=field:token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    Field { field: String, token: String },
    /// Missing, malformed, or naming a field that is not searchable.
    Ignored,
}

impl SearchFilter {
    pub fn parse(raw: Option<&str>, fields: &FieldSet) -> Self {
        let Some((field, token)) = raw.and_then(|s| s.split_once(':')) else {
            return Self::Ignored;
        };
        if field.is_empty() || token.is_empty() || !fields.searchable.contains(&field) {
            return Self::Ignored;
        }
        Self::Field {
            field: field.to_string(),
            token: token.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Parsed `sort=field:order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortSpec {
    By { field: &'static str, order: SortOrder },
    /// Missing, or naming a field that is not sortable.
    Ignored,
}

impl SortSpec {
    pub fn parse(raw: Option<&str>, fields: &FieldSet) -> Self {
        let Some(raw) = raw.filter(|s| !s.is_empty()) else {
            return Self::Ignored;
        };
        let (field, order) = match raw.split_once(':') {
            Some((f, o)) => (f, Some(o)),
            None => (raw, None),
        };
        let order = if order == Some("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        let field = if field.is_empty() || field == fields.default_sort {
            fields.default_sort
        } else if field == fields.alternate_sort {
            fields.alternate_sort
        } else {
            return Self::Ignored;
        };
        Self::By { field, order }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: FieldSet = FieldSet {
        searchable: &["name", "category"],
        default_sort: "name",
        alternate_sort: "price",
    };

    fn params(page_number: Option<&str>, page_size: Option<&str>) -> ListParams {
        ListParams {
            page_number: page_number.map(str::to_string),
            page_size: page_size.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn page_parameters_fall_back_like_integer_prefix_parsing() {
        let q = ListQuery::from(params(None, None));
        assert_eq!((q.page_number, q.page_size), (1, 0));

        let q = ListQuery::from(params(Some("3abc"), Some(" 10")));
        assert_eq!((q.page_number, q.page_size), (3, 10));

        let q = ListQuery::from(params(Some("0"), Some("x")));
        assert_eq!((q.page_number, q.page_size), (1, 0));

        let q = ListQuery::from(params(Some("-4"), Some("-2")));
        assert_eq!((q.page_number, q.page_size), (1, 0));

        let q = ListQuery::from(params(Some("2.9"), Some("+5")));
        assert_eq!((q.page_number, q.page_size), (2, 5));
    }

    #[test]
    fn empty_search_and_sort_are_absent() {
        let q = ListQuery::from(ListParams {
            search: Some(String::new()),
            sort: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(q.search, None);
        assert_eq!(q.sort, None);
    }

    #[test]
    fn search_splits_on_first_colon() {
        assert_eq!(
            SearchFilter::parse(Some("name:a:b"), &FIELDS),
            SearchFilter::Field {
                field: "name".into(),
                token: "a:b".into()
            }
        );
    }

    #[test]
    fn search_unknown_or_incomplete_is_ignored() {
        for raw in ["email:x", "name:", ":x", "name", ""] {
            assert_eq!(SearchFilter::parse(Some(raw), &FIELDS), SearchFilter::Ignored, "{raw}");
        }
        assert_eq!(SearchFilter::parse(None, &FIELDS), SearchFilter::Ignored);
    }

    #[test]
    fn sort_field_resolution() {
        assert_eq!(
            SortSpec::parse(Some("name:desc"), &FIELDS),
            SortSpec::By { field: "name", order: SortOrder::Desc }
        );
        assert_eq!(
            SortSpec::parse(Some(":desc"), &FIELDS),
            SortSpec::By { field: "name", order: SortOrder::Desc }
        );
        assert_eq!(
            SortSpec::parse(Some("price"), &FIELDS),
            SortSpec::By { field: "price", order: SortOrder::Asc }
        );
        assert_eq!(
            SortSpec::parse(Some("price:DESC"), &FIELDS),
            SortSpec::By { field: "price", order: SortOrder::Asc }
        );
        assert_eq!(SortSpec::parse(Some("quantity:asc"), &FIELDS), SortSpec::Ignored);
        assert_eq!(SortSpec::parse(None, &FIELDS), SortSpec::Ignored);
    }
}
