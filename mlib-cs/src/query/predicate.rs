//! WHERE clause from a filter set

use super::sql::{BuiltQuery, ClauseList, Op, SqlParam};
use crate::models::FilterSet;

/// Clause used when no criterion is present
const MATCH_ALL: &str = "TRUE";

/// Render `filters` as a WHERE body with its ordered parameters
///
/// Criteria are emitted in a fixed order: group, title, text, upper date
/// bound, lower date bound. Absent criteria contribute nothing; with none
/// present the clause is `TRUE`.
pub fn build_predicate(filters: &FilterSet) -> BuiltQuery {
    let list = ClauseList::new()
        .with_opt("group_name", Op::Contains, filters.group.as_deref().map(contains))
        .with_opt("song", Op::Contains, filters.title.as_deref().map(contains))
        .with_opt("text", Op::Contains, filters.text.as_deref().map(contains))
        .with_opt("release_date", Op::AtMost, filters.released_before.map(SqlParam::Date))
        .with_opt("release_date", Op::AtLeast, filters.released_after.map(SqlParam::Date));

    let sql = if list.is_empty() {
        MATCH_ALL.to_string()
    } else {
        list.render(" AND ")
    };

    BuiltQuery {
        sql,
        params: list.into_params(),
    }
}

/// LIKE pattern matching `needle` anywhere, with wildcards in it escaped
fn contains(needle: &str) -> SqlParam {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    SqlParam::Text(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(s: &str) -> SqlParam {
        SqlParam::Text(s.to_string())
    }

    #[test]
    fn test_no_criteria_matches_all() {
        let built = build_predicate(&FilterSet::default());
        assert_eq!(built.sql, "TRUE");
        assert!(built.params.is_empty());
    }

    #[test]
    fn test_all_criteria_in_fixed_order() {
        let before = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
        let after = NaiveDate::from_ymd_opt(2001, 9, 16).unwrap();
        let filters = FilterSet {
            group: Some("Muse".into()),
            title: Some("hole".into()),
            text: Some("glaciers".into()),
            released_before: Some(before),
            released_after: Some(after),
        };

        let built = build_predicate(&filters);
        assert_eq!(
            built.sql,
            "LOWER(group_name) LIKE LOWER($1) AND LOWER(song) LIKE LOWER($2) \
             AND LOWER(text) LIKE LOWER($3) AND release_date <= $4 AND release_date >= $5"
        );
        assert_eq!(
            built.params,
            vec![
                text("%Muse%"),
                text("%hole%"),
                text("%glaciers%"),
                SqlParam::Date(before),
                SqlParam::Date(after),
            ]
        );
    }

    #[test]
    fn test_sparse_criteria_are_renumbered() {
        let after = NaiveDate::from_ymd_opt(2006, 7, 16).unwrap();
        let filters = FilterSet {
            text: Some("baby".into()),
            released_after: Some(after),
            ..Default::default()
        };

        let built = build_predicate(&filters);
        assert_eq!(built.sql, "LOWER(text) LIKE LOWER($1) AND release_date >= $2");
        assert_eq!(built.params, vec![text("%baby%"), SqlParam::Date(after)]);
    }

    #[test]
    fn test_wildcards_are_escaped() {
        let filters = FilterSet {
            title: Some(r"100%_a\b".into()),
            ..Default::default()
        };

        let built = build_predicate(&filters);
        assert_eq!(built.params, vec![text(r"%100\%\_a\\b%")]);
    }

    #[test]
    fn test_values_never_reach_sql_text() {
        let filters = FilterSet {
            group: Some("'; DROP TABLE library; --".into()),
            ..Default::default()
        };

        let built = build_predicate(&filters);
        assert!(!built.sql.contains("DROP"));
    }
}
