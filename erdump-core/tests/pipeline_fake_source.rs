//! Pipeline tests against an in-memory metadata source.
//!
//! These cover the end-to-end document shape, call ordering, and strict
//! failure handling without a database server.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use async_trait::async_trait;
use erdump_core::{
    Column, Constraint, ErdumpError, MetadataSource, OutputFormat, RenderOptions, Result, Table,
    TableType, collect_snapshot, generate_diagram,
};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct FakeSource {
    tables: Vec<Table>,
    columns: HashMap<String, Vec<Column>>,
    constraints: HashMap<String, Vec<Constraint>>,
    fail_constraints_for: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    fn with_table(mut self, name: &str, table_type: TableType) -> Self {
        self.tables.push(Table::new("shop", name, table_type));
        self
    }

    fn with_column(mut self, table: &str, name: &str, ordinal: u32, data_type: &str) -> Self {
        self.columns
            .entry(table.to_string())
            .or_default()
            .push(Column {
                table_schema: "shop".to_string(),
                table_name: table.to_string(),
                name: name.to_string(),
                ordinal_position: ordinal,
                default_value: None,
                is_nullable: true,
                data_type: data_type.to_string(),
                column_type: data_type.to_string(),
            });
        self
    }

    fn with_key(
        mut self,
        table: &str,
        name: &str,
        column: &str,
        target: Option<(&str, &str)>,
    ) -> Self {
        self.constraints
            .entry(table.to_string())
            .or_default()
            .push(Constraint {
                constraint_name: name.to_string(),
                source_schema: "shop".to_string(),
                source_table: table.to_string(),
                source_column: column.to_string(),
                target_schema: target.map(|_| "shop".to_string()),
                target_table: target.map(|(t, _)| t.to_string()),
                target_column: target.map(|(_, c)| c.to_string()),
                extra: String::new(),
                column_key: if name == "PRIMARY" {
                    "PRI".to_string()
                } else {
                    String::new()
                },
            });
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MetadataSource for FakeSource {
    async fn list_tables(&self, schema: &str) -> Result<Vec<Table>> {
        self.record(format!("tables:{}", schema));
        Ok(self.tables.clone())
    }

    async fn list_columns(&self, _schema: &str, table: &str) -> Result<Vec<Column>> {
        self.record(format!("columns:{}", table));
        Ok(self.columns.get(table).cloned().unwrap_or_default())
    }

    async fn list_constraints(&self, _schema: &str, table: &str) -> Result<Vec<Constraint>> {
        self.record(format!("constraints:{}", table));
        if self.fail_constraints_for.as_deref() == Some(table) {
            return Err(ErdumpError::query_failed(
                format!("Failed to collect constraints for table '{}'", table),
                std::io::Error::other("permission denied"),
            ));
        }
        Ok(self.constraints.get(table).cloned().unwrap_or_default())
    }

    fn engine_name(&self) -> &'static str {
        "fake"
    }
}

fn shop() -> FakeSource {
    FakeSource::default()
        .with_table("orders", TableType::BaseTable)
        .with_table("users", TableType::BaseTable)
        // Deliberately out of ordinal order
        .with_column("orders", "user_id", 2, "int")
        .with_column("orders", "id", 1, "int")
        .with_column("users", "id", 1, "int")
        .with_column("users", "email", 2, "varchar")
        .with_key("orders", "PRIMARY", "id", None)
        .with_key("orders", "fk_orders_user", "user_id", Some(("users", "id")))
        .with_key("users", "PRIMARY", "id", None)
}

#[tokio::test]
async fn test_orders_users_document() {
    let source = shop();
    let document = generate_diagram(
        &source,
        "shop",
        OutputFormat::PlantUml,
        RenderOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(
        document,
        "@startuml\n\
         hide circle\n\
         entity orders {\n  id : int\n  user_id : int\n}\n\
         entity users {\n  id : int\n  email : varchar\n}\n\
         orders ||--|| users\n\
         @enduml\n"
    );
}

#[tokio::test]
async fn test_empty_schema() {
    let source = FakeSource::default();
    let document = generate_diagram(
        &source,
        "shop",
        OutputFormat::PlantUml,
        RenderOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(document, "@startuml\nhide circle\n@enduml\n");
}

#[tokio::test]
async fn test_calls_are_sequential_per_table() {
    let source = shop();
    collect_snapshot(&source, "shop").await.unwrap();

    assert_eq!(
        source.calls(),
        [
            "tables:shop",
            "columns:orders",
            "constraints:orders",
            "columns:users",
            "constraints:users",
        ]
    );
}

#[tokio::test]
async fn test_query_failure_aborts_run() {
    let mut source = shop();
    source.fail_constraints_for = Some("orders".to_string());

    let result = generate_diagram(
        &source,
        "shop",
        OutputFormat::PlantUml,
        RenderOptions::default(),
    )
    .await;

    let error = result.unwrap_err();
    assert!(matches!(error, ErdumpError::Query { .. }));
    assert!(error.to_string().contains("orders"));

    // Nothing after the failing table is read.
    assert!(!source.calls().iter().any(|call| call.ends_with(":users")));
}

#[tokio::test]
async fn test_views_and_unknown_types_still_rendered() {
    let source = FakeSource::default()
        .with_table("active_users", TableType::View)
        .with_table("odd", TableType::from_raw("SYSTEM VERSIONED"))
        .with_column("active_users", "id", 1, "int");

    let snapshot = collect_snapshot(&source, "shop").await.unwrap();
    assert_eq!(snapshot.tables[1].table.table_type, TableType::Unknown);

    let document = erdump_core::render::render_document(&snapshot, RenderOptions::default());
    assert!(document.contains("entity active_users {\n  id : int\n}\n"));
    assert!(document.contains("entity odd {\n}\n"));
}

#[tokio::test]
async fn test_relationship_lines_follow_table_then_row_order() {
    let source = FakeSource::default()
        .with_table("a", TableType::BaseTable)
        .with_table("b", TableType::BaseTable)
        .with_key("a", "fk_a_c", "c_id", Some(("c", "id")))
        .with_key("a", "fk_a_b", "b_id", Some(("b", "id")))
        .with_key("b", "fk_b_a", "a_id", Some(("a", "id")))
        .with_key("b", "fk_b_a_again", "a2_id", Some(("a", "id")));

    let document = generate_diagram(
        &source,
        "shop",
        OutputFormat::PlantUml,
        RenderOptions::default(),
    )
    .await
    .unwrap();

    let relationship_lines: Vec<&str> = document
        .lines()
        .filter(|l| l.contains("||--||"))
        .collect();
    assert_eq!(
        relationship_lines,
        ["a ||--|| c", "a ||--|| b", "b ||--|| a", "b ||--|| a"]
    );
}

#[tokio::test]
async fn test_json_format_matches_snapshot() {
    let source = shop();
    let json = generate_diagram(&source, "shop", OutputFormat::Json, RenderOptions::default())
        .await
    .unwrap();

    let decoded: erdump_core::SchemaSnapshot = serde_json::from_str(&json).unwrap();
    let expected = collect_snapshot(&shop(), "shop").await.unwrap();
    assert_eq!(decoded, expected);
}
