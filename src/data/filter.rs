use std::borrow::Cow;
use std::collections::BTreeSet;

use super::error::SchemaError;
use super::model::{Table, Value};
use super::schema::employee;

// ---------------------------------------------------------------------------
// Filter criteria: which departments / job roles / ages are selected
// ---------------------------------------------------------------------------

/// User selection applied to the employee table.
///
/// Both sets are inclusion lists: an empty set selects nothing.
/// `age_range` is inclusive on both ends; `min > max` selects nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub departments: BTreeSet<String>,
    pub job_roles: BTreeSet<String>,
    pub age_range: (i64, i64),
}

impl FilterCriteria {
    /// Every department and job role selected, with `default_age` clamped
    /// into the ages present in `table`.
    pub fn from_table(table: &Table, default_age: (i64, i64)) -> Result<Self, SchemaError> {
        let age_range = match age_bounds(table)? {
            Some((lo, hi)) => (default_age.0.clamp(lo, hi), default_age.1.clamp(lo, hi)),
            None => default_age,
        };
        Ok(FilterCriteria {
            departments: category_universe(table, employee::DEPARTMENT)?,
            job_roles: category_universe(table, employee::JOB_ROLE)?,
            age_range,
        })
    }

    fn matches(&self, department: &Value, role: &Value, age: &Value) -> bool {
        let (min, max) = self.age_range;
        self.departments.contains(category_label(department).as_ref())
            && self.job_roles.contains(category_label(role).as_ref())
            && age
                .as_f64()
                .is_some_and(|a| a >= min as f64 && a <= max as f64)
    }
}

/// Filter label for rows with no value in a category column.
pub const MISSING_CATEGORY: &str = "(missing)";

/// The label a category cell is selected by: its text, or
/// [`MISSING_CATEGORY`] for an empty cell.
pub fn category_label(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(MISSING_CATEGORY),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Labels of every distinct value of a category column, missing included.
pub fn category_universe(table: &Table, column: &str) -> Result<BTreeSet<String>, SchemaError> {
    table.require(column)?;
    Ok(table
        .unique_values
        .get(column)
        .map(|vals| vals.iter().map(|v| category_label(v).into_owned()).collect())
        .unwrap_or_default())
}

/// Youngest and oldest age in the table, rounded outward to whole years.
pub fn age_bounds(table: &Table) -> Result<Option<(i64, i64)>, SchemaError> {
    Ok(table
        .numeric_bounds(employee::AGE)?
        .map(|(lo, hi)| (lo.floor() as i64, hi.ceil() as i64)))
}

/// Return indices of rows that pass all three predicates.
pub fn filtered_indices(table: &Table, criteria: &FilterCriteria) -> Result<Vec<usize>, SchemaError> {
    table.require(employee::DEPARTMENT)?;
    table.require(employee::JOB_ROLE)?;
    table.require(employee::AGE)?;

    Ok(table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            criteria.matches(
                row.get(employee::DEPARTMENT),
                row.get(employee::JOB_ROLE),
                row.get(employee::AGE),
            )
        })
        .map(|(i, _)| i)
        .collect())
}

/// The subset of `table` matching `criteria`, as a new table with the same
/// columns.
pub fn apply_filters(table: &Table, criteria: &FilterCriteria) -> Result<Table, SchemaError> {
    let indices = filtered_indices(table, criteria)?;
    log::debug!(
        "filter kept {} of {} rows (age {}..={})",
        indices.len(),
        table.len(),
        criteria.age_range.0,
        criteria.age_range.1
    );
    Ok(table.select(&indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{employee_row, employee_table};

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn scenario_table() -> Table {
        employee_table(&[
            employee_row(1, "Sales", "Rep", 30, "Yes"),
            employee_row(2, "Sales", "Rep", 50, "No"),
            employee_row(3, "HR", "Mgr", 40, "No"),
        ])
    }

    fn wide_table() -> Table {
        let depts = ["Sales", "HR", "R&D"];
        let roles = ["Rep", "Mgr", "Scientist"];
        let rows: Vec<_> = (0..27)
            .map(|i| {
                employee_row(
                    i as i64,
                    depts[i % 3],
                    roles[(i / 3) % 3],
                    20 + (i as i64 * 7) % 40,
                    if i % 4 == 0 { "Yes" } else { "No" },
                )
            })
            .collect();
        employee_table(&rows)
    }

    fn numbers(table: &Table) -> Vec<i64> {
        table
            .rows
            .iter()
            .filter_map(|r| match r.get(employee::EMPLOYEE_NUMBER) {
                Value::Integer(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_sales_rep_scenario_keeps_first_row() {
        let criteria = FilterCriteria {
            departments: set(&["Sales"]),
            job_roles: set(&["Rep"]),
            age_range: (25, 45),
        };
        let view = apply_filters(&scenario_table(), &criteria).unwrap();
        assert_eq!(numbers(&view), vec![1]);
    }

    #[test]
    fn test_sound_and_complete() {
        let table = wide_table();
        let criteria = FilterCriteria {
            departments: set(&["Sales", "R&D"]),
            job_roles: set(&["Mgr", "Scientist"]),
            age_range: (27, 48),
        };
        let view = apply_filters(&table, &criteria).unwrap();
        let kept = numbers(&view);

        for row in &table.rows {
            let dept = row.get(employee::DEPARTMENT).as_str().unwrap();
            let role = row.get(employee::JOB_ROLE).as_str().unwrap();
            let age = row.get(employee::AGE).as_f64().unwrap();
            let expected = criteria.departments.contains(dept)
                && criteria.job_roles.contains(role)
                && (27.0..=48.0).contains(&age);
            let number = match row.get(employee::EMPLOYEE_NUMBER) {
                Value::Integer(n) => *n,
                other => panic!("unexpected employee number {other}"),
            };
            assert_eq!(kept.contains(&number), expected, "employee {number}");
        }
    }

    #[test]
    fn test_idempotent() {
        let table = wide_table();
        let criteria = FilterCriteria {
            departments: set(&["HR"]),
            job_roles: set(&["Rep", "Mgr", "Scientist"]),
            age_range: (20, 45),
        };
        let once = apply_filters(&table, &criteria).unwrap();
        let twice = apply_filters(&once, &criteria).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_selection_matches_nothing() {
        let criteria = FilterCriteria {
            departments: BTreeSet::new(),
            job_roles: set(&["Rep", "Mgr"]),
            age_range: (0, 100),
        };
        let view = apply_filters(&scenario_table(), &criteria).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn test_degenerate_age_range_is_exact() {
        let table = scenario_table();
        let mut criteria = FilterCriteria::from_table(&table, (40, 40)).unwrap();
        criteria.age_range = (40, 40);
        let view = apply_filters(&table, &criteria).unwrap();
        assert_eq!(numbers(&view), vec![3]);
    }

    #[test]
    fn test_inverted_age_range_yields_empty() {
        let table = scenario_table();
        let mut criteria = FilterCriteria::from_table(&table, (25, 45)).unwrap();
        criteria.age_range = (45, 25);
        let view = apply_filters(&table, &criteria).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn test_full_universe_is_pass_through() {
        let table = wide_table();
        let (lo, hi) = age_bounds(&table).unwrap().unwrap();
        let criteria = FilterCriteria::from_table(&table, (lo, hi)).unwrap();
        let view = apply_filters(&table, &criteria).unwrap();
        assert_eq!(view, table);
    }

    #[test]
    fn test_empty_table_yields_empty() {
        let table = employee_table(&[]);
        let criteria = FilterCriteria::from_table(&table, (25, 45)).unwrap();
        assert_eq!(criteria.age_range, (25, 45));
        assert!(criteria.departments.is_empty());
        assert!(apply_filters(&table, &criteria).unwrap().is_empty());
    }

    #[test]
    fn test_default_age_clamped_to_observed_bounds() {
        let table = scenario_table();
        let criteria = FilterCriteria::from_table(&table, (18, 45)).unwrap();
        assert_eq!(criteria.age_range, (30, 45));
        assert_eq!(criteria.departments, set(&["HR", "Sales"]));
        assert_eq!(criteria.job_roles, set(&["Mgr", "Rep"]));
    }

    #[test]
    fn test_missing_age_never_matches() {
        let mut rows = vec![employee_row(1, "Sales", "Rep", 30, "Yes")];
        rows[0].values.insert(employee::AGE.to_string(), Value::Null);
        let table = employee_table(&rows);
        let criteria = FilterCriteria {
            departments: set(&["Sales"]),
            job_roles: set(&["Rep"]),
            age_range: (0, 200),
        };
        assert!(apply_filters(&table, &criteria).unwrap().is_empty());
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let table = Table::from_rows(vec!["Department".to_string()], Vec::new());
        let criteria = FilterCriteria {
            departments: set(&["Sales"]),
            job_roles: set(&["Rep"]),
            age_range: (0, 100),
        };
        assert_eq!(
            apply_filters(&table, &criteria),
            Err(SchemaError::missing(employee::JOB_ROLE))
        );
    }

    #[test]
    fn test_default_criteria_keep_numeric_and_blank_departments() {
        use crate::data::loader::load_dataset;
        use crate::data::schema::Schema;
        use std::io::Write;

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("EA.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        for line in [
            "Age,Attrition,BusinessTravel,Department,DistanceFromHome,EducationField,EmployeeCount,\
EmployeeNumber,Gender,JobRole,MonthlyIncome,StandardHours,WorkLifeBalance",
            "30,No,Travel_Rarely,100,2,Other,1,1,Male,Rep,2090,80,3",
            "31,Yes,Travel_Rarely,Sales,2,Other,1,2,Male,Rep,2090,80,3",
            "32,No,Travel_Rarely,,2,Other,1,3,Female,Rep,2090,80,3",
        ] {
            writeln!(file, "{line}").unwrap();
        }
        drop(file);

        let table = load_dataset(&path, &Schema::employees()).unwrap();
        let (lo, hi) = age_bounds(&table).unwrap().unwrap();
        let criteria = FilterCriteria::from_table(&table, (lo, hi)).unwrap();
        assert_eq!(criteria.departments, set(&["100", "Sales", MISSING_CATEGORY]));
        assert_eq!(apply_filters(&table, &criteria).unwrap().len(), 3);
    }

    #[test]
    fn test_missing_category_is_selectable() {
        let mut rows = vec![
            employee_row(1, "Sales", "Rep", 30, "Yes"),
            employee_row(2, "HR", "Rep", 30, "No"),
        ];
        rows[1].values.insert(employee::DEPARTMENT.to_string(), Value::Null);
        let table = employee_table(&rows);

        let mut criteria = FilterCriteria::from_table(&table, (0, 100)).unwrap();
        assert!(criteria.departments.contains(MISSING_CATEGORY));
        assert_eq!(apply_filters(&table, &criteria).unwrap().len(), 2);

        criteria.departments.remove(MISSING_CATEGORY);
        assert_eq!(numbers(&apply_filters(&table, &criteria).unwrap()), vec![1]);
    }
}
