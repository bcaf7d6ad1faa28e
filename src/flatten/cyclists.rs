//! Cyclist roster: cyclists joined with their team, plus an age column

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;

use crate::error::{Result, StructureError};
use crate::model::{Document, Row, Table};

use super::columns::flatten_columns;

pub const CYCLIST_TABLE: &str = "DYN_cyclist";
pub const TEAM_TABLE: &str = "DYN_team";

const TEAM_FK: &str = "fkIDteam";
const TEAM_ID: &str = "IDteam";
const TEAM_OPTIONAL_COLUMNS: [&str; 2] = ["gene_sz_shortname", "gene_sz_name"];
const BIRTHDATE: &str = "gene_i_birthdate";
const AGE: &str = "age";
const COLLISION_SUFFIX: &str = "_team";

/// Flatten `DYN_cyclist` and left-join the team id and names from `DYN_team`.
///
/// Cyclists whose team is unknown keep empty team fields. When the cyclist
/// table has a birthdate column, `age` is appended, computed as of `today`.
pub fn cyclist_roster(doc: &Document, today: NaiveDate) -> Result<Table> {
    let cyclists = flatten_columns(doc, Some(CYCLIST_TABLE))?;
    let teams = flatten_columns(doc, Some(TEAM_TABLE))?;

    require_column(&cyclists, CYCLIST_TABLE, TEAM_FK)?;
    require_column(&teams, TEAM_TABLE, TEAM_ID)?;

    // (source column in DYN_team, output column name)
    let team_columns: Vec<(&str, String)> = std::iter::once(TEAM_ID)
        .chain(TEAM_OPTIONAL_COLUMNS.iter().copied().filter(|c| teams.has_column(c)))
        .map(|c| {
            let out = if cyclists.has_column(c) {
                format!("{}{}", c, COLLISION_SUFFIX)
            } else {
                c.to_string()
            };
            (c, out)
        })
        .collect();

    // First team wins on duplicate ids
    let mut teams_by_id: IndexMap<&str, &Row> = IndexMap::new();
    for team in teams.rows() {
        if let Some(id) = team.get(TEAM_ID) {
            teams_by_id.entry(id).or_insert(team);
        }
    }

    let with_age = cyclists.has_column(BIRTHDATE);

    let mut roster = Table::new();
    for column in cyclists.columns() {
        roster.declare_column(column);
    }
    for (_, out) in &team_columns {
        roster.declare_column(out.as_str());
    }
    if with_age {
        roster.declare_column(AGE);
    }

    for cyclist in cyclists.rows() {
        let mut row = cyclist.clone();

        let team = cyclist
            .get(TEAM_FK)
            .filter(|id| !id.is_empty())
            .and_then(|id| teams_by_id.get(id));
        if let Some(team) = team {
            for (source, out) in &team_columns {
                if let Some(value) = team.get(source) {
                    row.insert(out.as_str(), value);
                }
            }
        }

        if with_age {
            let age = cyclist
                .get(BIRTHDATE)
                .and_then(parse_birthdate)
                .map(|birth| age_on(birth, today).to_string())
                .unwrap_or_default();
            row.insert(AGE, age);
        }

        roster.push_row(row);
    }

    Ok(roster)
}

fn require_column(table: &Table, table_name: &str, column: &str) -> Result<()> {
    if table.has_column(column) {
        Ok(())
    } else {
        Err(StructureError::MissingColumn {
            table: table_name.to_string(),
            column: column.to_string(),
        }
        .into())
    }
}

/// Parse a `YYYYMMDD` birthdate, tolerating a float rendering like `19900512.0`
pub fn parse_birthdate(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let value = match raw.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let f = raw.parse::<f64>().ok()?;
            if !f.is_finite() || f.fract() != 0.0 {
                return None;
            }
            f as i64
        }
    };
    if value <= 0 {
        return None;
    }

    let year = i32::try_from(value / 10_000).ok()?;
    let month = u32::try_from(value / 100 % 100).ok()?;
    let day = u32::try_from(value % 100).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whole years from `birth` to `today`
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let before_birthday = (today.month(), today.day()) < (birth.month(), birth.day());
    today.year() - birth.year() - i32::from(before_birthday)
}
