//! Inventory report: facts about hosts and the rest of the inventory.

use serde_json::{json, Value};

use crate::error::Result;

use super::{QuerySource, Report, ReportData, Row};

/// Host, fact, and audit counts aggregated from the inventory database.
pub struct InventoryReport;

impl Report for InventoryReport {
    fn name(&self) -> &'static str {
        "inventory"
    }

    fn description(&self) -> &'static str {
        "Facts about hosts and the rest of the inventory"
    }

    fn run(&self, source: &dyn QuerySource) -> Result<ReportData> {
        let mut data = ReportData::new();
        data.insert("hosts_by_type_count".into(), self.hosts_by_type(source)?);
        data.insert("hosts_by_os_count".into(), self.hosts_by_os(source)?);
        data.insert("facts_by_type".into(), self.facts_by_type(source)?);
        data.insert("audits".into(), self.audits(source)?);
        Ok(data)
    }
}

impl InventoryReport {
    fn hosts_by_type(&self, source: &dyn QuerySource) -> Result<Value> {
        let rows = source.query("select type, count(*) from hosts group by type")?;
        Ok(Value::Object(
            rows.iter()
                .map(|row| {
                    let kind = row
                        .get("type")
                        .map(|t| t.replace("Host::", ""))
                        .unwrap_or_default();
                    (kind, json!(int_column(row, "count")))
                })
                .collect(),
        ))
    }

    fn hosts_by_os(&self, source: &dyn QuerySource) -> Result<Value> {
        let rows = source.query(
            "select max(operatingsystems.name) as os_name, count(*) as hosts_count \
             from hosts inner join operatingsystems on operatingsystem_id = operatingsystems.id \
             group by operatingsystems.name",
        )?;
        Ok(Value::Object(
            rows.iter()
                .map(|row| {
                    (
                        row.get("os_name").cloned().unwrap_or_default(),
                        json!(int_column(row, "hosts_count")),
                    )
                })
                .collect(),
        ))
    }

    fn facts_by_type(&self, source: &dyn QuerySource) -> Result<Value> {
        let rows = source.query(
            "select fact_names.type, \
             min(fact_values.updated_at) as min_update_time, \
             max(fact_values.updated_at) as max_update_time, \
             count(fact_values.id) as values_count \
             from fact_values inner join fact_names on fact_name_id = fact_names.id \
             group by fact_names.type",
        )?;
        Ok(Value::Object(
            rows.iter()
                .map(|row| {
                    let kind = row
                        .get("type")
                        .map(|t| t.replace("FactName", ""))
                        .unwrap_or_default();
                    let entry = json!({
                        "min_update_time": row.get("min_update_time"),
                        "max_update_time": row.get("max_update_time"),
                        "values_count": int_column(row, "values_count"),
                    });
                    (kind, entry)
                })
                .collect(),
        ))
    }

    fn audits(&self, source: &dyn QuerySource) -> Result<Value> {
        let rows = source.query(
            "select count(*) as records_count, \
             min(created_at) as min_created_at, \
             max(created_at) as max_created_at \
             from audits",
        )?;
        let row = rows.first();
        Ok(json!({
            "records_count": row.map(|r| int_column(r, "records_count")).unwrap_or(0),
            "min_created_at": row.and_then(|r| r.get("min_created_at")),
            "max_created_at": row.and_then(|r| r.get("max_created_at")),
        }))
    }
}

fn int_column(row: &Row, column: &str) -> i64 {
    row.get(column)
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0)
}
