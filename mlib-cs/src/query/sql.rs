use chrono::NaiveDate;
use sqlx::postgres::PgArguments;
use sqlx::Arguments;

/// A bound statement parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Date(NaiveDate),
    BigInt(i64),
}

impl SqlParam {
    fn add_to(&self, args: &mut PgArguments) -> Result<(), sqlx::Error> {
        match self {
            SqlParam::Text(s) => args.add(s.clone()),
            SqlParam::Date(d) => args.add(*d),
            SqlParam::BigInt(n) => args.add(*n),
        }
        .map_err(sqlx::Error::Encode)
    }
}

/// How a term compares its column against its parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Case-insensitive substring; the parameter is already a LIKE pattern
    Contains,
    /// Inclusive upper bound
    AtMost,
    /// Inclusive lower bound
    AtLeast,
    /// `column = value`, for SET lists
    Assign,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Term {
    column: &'static str,
    op: Op,
}

impl Term {
    fn render(&self, placeholder: usize) -> String {
        match self.op {
            Op::Contains => format!("LOWER({}) LIKE LOWER(${})", self.column, placeholder),
            Op::AtMost => format!("{} <= ${}", self.column, placeholder),
            Op::AtLeast => format!("{} >= ${}", self.column, placeholder),
            Op::Assign => format!("{} = ${}", self.column, placeholder),
        }
    }
}

/// Immutable list of (term, parameter) pairs
///
/// Each term owns exactly one parameter. Placeholders are assigned only at
/// render time, from the term's position, so the n-th term always refers to
/// the n-th parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseList {
    terms: Vec<Term>,
    params: Vec<SqlParam>,
}

impl ClauseList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a term bound to `param`
    #[must_use]
    pub fn with(mut self, column: &'static str, op: Op, param: SqlParam) -> Self {
        self.terms.push(Term { column, op });
        self.params.push(param);
        self
    }

    /// Append a term only when `param` is present
    #[must_use]
    pub fn with_opt(self, column: &'static str, op: Op, param: Option<SqlParam>) -> Self {
        match param {
            Some(param) => self.with(column, op, param),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Render the terms joined by `separator`, placeholders starting at `$1`
    pub fn render(&self, separator: &str) -> String {
        self.terms
            .iter()
            .enumerate()
            .map(|(i, term)| term.render(i + 1))
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub fn into_params(self) -> Vec<SqlParam> {
        self.params
    }
}

/// SQL text together with the parameters its placeholders refer to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl BuiltQuery {
    /// Append a parameter and return its placeholder number
    pub fn push_param(&mut self, param: SqlParam) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// Bind the parameters in order
    pub fn to_arguments(&self) -> Result<PgArguments, sqlx::Error> {
        let mut args = PgArguments::default();
        for param in &self.params {
            param.add_to(&mut args)?;
        }
        Ok(args)
    }

    /// SQL collapsed to a single line, for logs
    pub fn one_line(&self) -> String {
        self.sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_follow_term_order() {
        let list = ClauseList::new()
            .with("group_name", Op::Contains, SqlParam::Text("%a%".into()))
            .with_opt("song", Op::Contains, None)
            .with("release_date", Op::AtMost, SqlParam::BigInt(1));

        assert_eq!(
            list.render(" AND "),
            "LOWER(group_name) LIKE LOWER($1) AND release_date <= $2"
        );
        assert_eq!(list.len(), 2);
        assert_eq!(
            list.into_params(),
            vec![SqlParam::Text("%a%".into()), SqlParam::BigInt(1)]
        );
    }

    #[test]
    fn test_empty_list_renders_nothing() {
        let list = ClauseList::new().with_opt("song", Op::Assign, None);
        assert!(list.is_empty());
        assert_eq!(list.render(", "), "");
    }

    #[test]
    fn test_builder_is_persistent() {
        let base = ClauseList::new().with("song", Op::Assign, SqlParam::Text("x".into()));
        let extended = base.clone().with("text", Op::Assign, SqlParam::Text("y".into()));

        assert_eq!(base.render(", "), "song = $1");
        assert_eq!(extended.render(", "), "song = $1, text = $2");
    }

    #[test]
    fn test_one_line() {
        let query = BuiltQuery {
            sql: "SELECT id\n    FROM library\n   WHERE TRUE".into(),
            params: vec![],
        };
        assert_eq!(query.one_line(), "SELECT id FROM library WHERE TRUE");
    }

    #[test]
    fn test_arguments_bind_all_params() {
        let query = BuiltQuery {
            sql: "SELECT $1, $2, $3".into(),
            params: vec![
                SqlParam::Text("a".into()),
                SqlParam::Date(NaiveDate::from_ymd_opt(2021, 9, 16).unwrap()),
                SqlParam::BigInt(7),
            ],
        };
        assert!(query.to_arguments().is_ok());
    }
}
