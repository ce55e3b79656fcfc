use std::collections::{BTreeMap, BTreeSet};

use super::error::SchemaError;
use super::model::{ColumnType, Table, Value};

// ---------------------------------------------------------------------------
// Employee attrition columns
// ---------------------------------------------------------------------------
pub mod employee {
    pub const DEPARTMENT: &str = "Department";
    pub const JOB_ROLE: &str = "JobRole";
    pub const EDUCATION_FIELD: &str = "EducationField";
    pub const BUSINESS_TRAVEL: &str = "BusinessTravel";
    pub const GENDER: &str = "Gender";
    pub const ATTRITION: &str = "Attrition";

    pub const AGE: &str = "Age";
    pub const MONTHLY_INCOME: &str = "MonthlyIncome";
    pub const DISTANCE_FROM_HOME: &str = "DistanceFromHome";
    pub const WORK_LIFE_BALANCE: &str = "WorkLifeBalance";
    pub const EMPLOYEE_COUNT: &str = "EmployeeCount";
    pub const STANDARD_HOURS: &str = "StandardHours";
    pub const EMPLOYEE_NUMBER: &str = "EmployeeNumber";

    pub const ATTRITION_YES: &str = "Yes";
    pub const ATTRITION_NO: &str = "No";
    pub const ATTRITION_VALUES: &[&str] = &[ATTRITION_YES, ATTRITION_NO];

    /// Constant or row-identity columns left out of the correlation heatmap.
    pub const DEFAULT_CORRELATION_EXCLUSIONS: [&str; 3] =
        [EMPLOYEE_COUNT, STANDARD_HOURS, EMPLOYEE_NUMBER];
}

// ---------------------------------------------------------------------------
// Country happiness columns
// ---------------------------------------------------------------------------
pub mod happiness {
    pub const COUNTRY: &str = "Country";
    pub const REGION: &str = "Region";
    pub const HAPPINESS_SCORE: &str = "HappinessScore";
    pub const GDP_PER_CAPITA: &str = "GDP_PerCapita";
    pub const HDI: &str = "HDI";
    pub const ALCOHOL_CONSUMPTION: &str = "Alcohol Consumption";

    /// Identifier columns left out of the happiness correlation heatmap.
    pub const IDENTIFIERS: [&str; 2] = [COUNTRY, REGION];
}

// ---------------------------------------------------------------------------
// Schema – required columns of a dataset and their semantic types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub ty: ColumnType,
}

const fn categorical(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        ty: ColumnType::Categorical,
    }
}

const fn numeric(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        ty: ColumnType::Numeric,
    }
}

/// The columns a dataset must provide, checked once when it is loaded.
/// Columns not named here are kept with their inferred type.
#[derive(Debug, Clone)]
pub struct Schema {
    pub name: &'static str,
    pub columns: Vec<ColumnSpec>,
    /// Column whose values must be unique per row.
    pub key: Option<&'static str>,
    /// Columns restricted to a fixed set of values.
    pub allowed: Vec<(&'static str, &'static [&'static str])>,
}

impl Schema {
    /// Employee attrition table.
    pub fn employees() -> Self {
        use employee::*;
        Schema {
            name: "employees",
            columns: vec![
                numeric(AGE),
                categorical(ATTRITION),
                categorical(BUSINESS_TRAVEL),
                categorical(DEPARTMENT),
                numeric(DISTANCE_FROM_HOME),
                categorical(EDUCATION_FIELD),
                numeric(EMPLOYEE_COUNT),
                numeric(EMPLOYEE_NUMBER),
                categorical(GENDER),
                categorical(JOB_ROLE),
                numeric(MONTHLY_INCOME),
                numeric(STANDARD_HOURS),
                numeric(WORK_LIFE_BALANCE),
            ],
            key: Some(EMPLOYEE_NUMBER),
            allowed: vec![(ATTRITION, ATTRITION_VALUES)],
        }
    }

    /// Country happiness table.
    pub fn happiness() -> Self {
        use happiness::*;
        Schema {
            name: "happiness",
            columns: vec![
                categorical(COUNTRY),
                categorical(REGION),
                numeric(HAPPINESS_SCORE),
                numeric(GDP_PER_CAPITA),
                numeric(HDI),
                numeric(ALCOHOL_CONSUMPTION),
            ],
            key: None,
            allowed: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.to_string()).collect()
    }

    pub fn column_types(&self) -> BTreeMap<String, ColumnType> {
        self.columns
            .iter()
            .map(|c| (c.name.to_string(), c.ty))
            .collect()
    }

    /// Check `table` against this schema and return it with the schema's
    /// column types applied. Non-null cells of categorical columns become
    /// text, so a department read as `100` filters like any other name.
    pub fn validate(&self, table: Table) -> Result<Table, SchemaError> {
        for column in &self.columns {
            let inferred = table.column_type(column.name)?;
            if column.ty == ColumnType::Numeric && inferred != ColumnType::Numeric {
                return Err(SchemaError::not_numeric(column.name));
            }
        }

        let Table {
            column_names,
            mut column_types,
            mut rows,
            ..
        } = table;
        column_types.extend(self.column_types());

        let categorical: Vec<&str> = self
            .columns
            .iter()
            .filter(|c| c.ty == ColumnType::Categorical)
            .map(|c| c.name)
            .collect();
        for row in &mut rows {
            for column in &categorical {
                if let Some(value) = row.values.get_mut(*column) {
                    if !value.is_null() && value.as_str().is_none() {
                        *value = Value::String(value.to_string());
                    }
                }
            }
        }
        let table = Table::with_types(column_names, column_types, rows);

        if let Some(key) = self.key {
            let mut seen: BTreeSet<Value> = BTreeSet::new();
            for value in table.values(key)? {
                if !value.is_null() && !seen.insert(key_identity(value)) {
                    return Err(SchemaError::DuplicateKey {
                        column: key.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }

        for (column, allowed) in &self.allowed {
            for value in table.values(column)? {
                let ok = value
                    .as_str()
                    .is_some_and(|s| allowed.iter().any(|a| *a == s));
                if !ok {
                    return Err(SchemaError::InvalidCategory {
                        column: column.to_string(),
                        value: value.to_string(),
                        allowed: allowed.join(", "),
                    });
                }
            }
        }

        Ok(table)
    }
}

/// Numeric keys compare by value, so `4` and `4.0` are the same employee.
fn key_identity(value: &Value) -> Value {
    value
        .as_f64()
        .map(Value::Float)
        .unwrap_or_else(|| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{employee_row, happiness_row};
    use crate::data::model::Row;

    fn inferred(rows: Vec<Row>, schema: &Schema) -> Table {
        Table::from_rows(schema.column_names(), rows)
    }

    #[test]
    fn test_validate_accepts_well_formed_employees() {
        let schema = Schema::employees();
        let table = inferred(
            vec![
                employee_row(1, "Sales", "Rep", 30, "Yes"),
                employee_row(2, "HR", "Mgr", 40, "No"),
            ],
            &schema,
        );
        let validated = schema.validate(table).unwrap();
        assert_eq!(validated.len(), 2);
        assert_eq!(
            validated.column_type(employee::ATTRITION),
            Ok(ColumnType::Categorical)
        );
        assert_eq!(validated.column_type(employee::AGE), Ok(ColumnType::Numeric));
    }

    #[test]
    fn test_validate_reports_missing_column() {
        let schema = Schema::employees();
        let mut names = schema.column_names();
        names.retain(|c| c != employee::JOB_ROLE);
        let table = Table::from_rows(names, vec![employee_row(1, "Sales", "Rep", 30, "Yes")]);
        assert_eq!(
            schema.validate(table),
            Err(SchemaError::missing(employee::JOB_ROLE))
        );
    }

    #[test]
    fn test_validate_rejects_text_in_numeric_column() {
        let schema = Schema::employees();
        let mut row = employee_row(1, "Sales", "Rep", 30, "Yes");
        row.values
            .insert(employee::AGE.to_string(), Value::from("thirty"));
        let table = inferred(vec![row], &schema);
        assert_eq!(
            schema.validate(table),
            Err(SchemaError::not_numeric(employee::AGE))
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_employee_number() {
        let schema = Schema::employees();
        let table = inferred(
            vec![
                employee_row(7, "Sales", "Rep", 30, "Yes"),
                employee_row(7, "HR", "Mgr", 40, "No"),
            ],
            &schema,
        );
        assert_eq!(
            schema.validate(table),
            Err(SchemaError::DuplicateKey {
                column: employee::EMPLOYEE_NUMBER.to_string(),
                value: "7".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_rejects_unknown_attrition_value() {
        let schema = Schema::employees();
        let table = inferred(vec![employee_row(1, "Sales", "Rep", 30, "Maybe")], &schema);
        let err = schema.validate(table).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidCategory { ref column, ref value, .. }
                if column == employee::ATTRITION && value == "Maybe"
        ));
    }

    #[test]
    fn test_validate_keeps_extra_columns() {
        let schema = Schema::happiness();
        let mut names = schema.column_names();
        names.push("Year".to_string());
        let mut row = happiness_row("Norway", "Western Europe", 7.5, 74.0, 0.95, 6.6);
        row.values.insert("Year".to_string(), Value::Integer(2016));
        let table = schema.validate(Table::from_rows(names, vec![row])).unwrap();
        assert_eq!(table.column_type("Year"), Ok(ColumnType::Numeric));
        assert!(table.numeric_columns().contains(&"Year"));
    }

    #[test]
    fn test_empty_table_passes_validation() {
        let schema = Schema::happiness();
        let table = schema
            .validate(Table::from_rows(schema.column_names(), Vec::new()))
            .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_type(happiness::REGION), Ok(ColumnType::Categorical));
    }

    #[test]
    fn test_validate_turns_categorical_cells_into_text() {
        let schema = Schema::employees();
        let mut row = employee_row(1, "Sales", "Rep", 30, "No");
        row.values
            .insert(employee::DEPARTMENT.to_string(), Value::Integer(100));
        let mut blank = employee_row(2, "Sales", "Rep", 31, "No");
        blank
            .values
            .insert(employee::DEPARTMENT.to_string(), Value::Null);

        let table = schema.validate(inferred(vec![row, blank], &schema)).unwrap();
        assert_eq!(table.rows[0].get(employee::DEPARTMENT), &Value::from("100"));
        assert!(table.rows[1].get(employee::DEPARTMENT).is_null());
        assert!(table.unique_values[employee::DEPARTMENT].contains(&Value::from("100")));
        assert_eq!(
            table.column_type(employee::DEPARTMENT),
            Ok(ColumnType::Categorical)
        );
    }

    #[test]
    fn test_validate_matches_integer_and_float_keys() {
        let schema = Schema::employees();
        let mut second = employee_row(0, "HR", "Mgr", 40, "No");
        second
            .values
            .insert(employee::EMPLOYEE_NUMBER.to_string(), Value::Float(4.0));
        let table = inferred(vec![employee_row(4, "Sales", "Rep", 30, "Yes"), second], &schema);
        assert_eq!(
            schema.validate(table),
            Err(SchemaError::DuplicateKey {
                column: employee::EMPLOYEE_NUMBER.to_string(),
                value: "4".to_string(),
            })
        );
    }
}
