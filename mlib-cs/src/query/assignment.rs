//! SET clause from an update set

use super::sql::{BuiltQuery, ClauseList, Op, SqlParam};
use crate::models::UpdateSet;

/// Render the present fields of `update` as a SET list
///
/// Fields are emitted in a fixed order: group, title, lyrics, release date,
/// reference link. The target id is not part of the clause. An update with
/// no fields renders an empty clause; callers must not execute it.
pub fn build_assignment(update: &UpdateSet) -> BuiltQuery {
    let text = |v: &Option<String>| v.clone().map(SqlParam::Text);

    let list = ClauseList::new()
        .with_opt("group_name", Op::Assign, text(&update.group))
        .with_opt("song", Op::Assign, text(&update.title))
        .with_opt("text", Op::Assign, text(&update.lyrics))
        .with_opt("release_date", Op::Assign, update.release_date.map(SqlParam::Date))
        .with_opt("patronymic", Op::Assign, text(&update.reference_link));

    BuiltQuery {
        sql: list.render(", "),
        params: list.into_params(),
    }
}
