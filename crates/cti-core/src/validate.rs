//! Column constraints and the per-attribute error collection they report into.

mod constraint;
pub use constraint::Constraint;

mod errors;
pub use errors::Errors;

use crate::{schema::Table, Record};

/// Checks every constrained column of `table` against `record`, adding a
/// message to `errors` for each violation. Returns `true` if nothing failed.
pub fn validate_record(table: &Table, record: &Record, errors: &mut Errors) -> bool {
    let before = errors.len();

    for column in &table.columns {
        let value = record.get(&column.name);
        for constraint in &column.constraints {
            if let Some(message) = constraint.check(value) {
                errors.add(&column.name, message);
            }
        }
    }

    errors.len() == before
}
