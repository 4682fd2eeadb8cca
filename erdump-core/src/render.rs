//! PlantUML entity-relationship output.
//!
//! A document is the opening marker and rendering directive, one entity
//! block per table in scan order, one relationship line per foreign-key row
//! in scan order, then the closing marker. Rendering is a pure function of
//! the snapshot, so rendering twice yields identical bytes.

use crate::Result;
use crate::classify::{column_keys, is_foreign_key};
use crate::error::ErdumpError;
use crate::models::{Column, Relationship, SchemaSnapshot, TableSnapshot};

/// Opening marker
pub const START_MARKER: &str = "@startuml";
/// Rendering directive emitted right after the opening marker
pub const RENDER_DIRECTIVE: &str = "hide circle";
/// Closing marker
pub const END_MARKER: &str = "@enduml";
/// Fixed exactly-one-to-exactly-one connector
pub const ONE_TO_ONE: &str = "||--||";

/// Output document format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// PlantUML entity diagram
    #[default]
    PlantUml,
    /// Pretty-printed JSON of the collected snapshot
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlantUml => write!(f, "plantuml"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ErdumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "plantuml" | "puml" => Ok(Self::PlantUml),
            "json" => Ok(Self::Json),
            other => Err(ErdumpError::configuration(format!(
                "Unknown output format '{}': expected plantuml or json",
                other
            ))),
        }
    }
}

/// Optional decorations for PlantUML output.
///
/// The default renders `name : data_type` lines with no key markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Append `<<PK>>`, `<<FK>>`, `<<UK>>` and `<<AI>>` stereotypes
    pub annotate_keys: bool,
    /// Show the full column type (`varchar(255)`) instead of the data type
    pub full_types: bool,
}

/// Renders the snapshot in the requested format.
///
/// # Errors
/// Only JSON output can fail, if serialization fails.
pub fn render(
    snapshot: &SchemaSnapshot,
    format: OutputFormat,
    options: RenderOptions,
) -> Result<String> {
    match format {
        OutputFormat::PlantUml => Ok(render_document(snapshot, options)),
        OutputFormat::Json => render_json(snapshot),
    }
}

/// Renders the full PlantUML document, newline terminated.
pub fn render_document(snapshot: &SchemaSnapshot, options: RenderOptions) -> String {
    let mut lines = vec![START_MARKER.to_string(), RENDER_DIRECTIVE.to_string()];

    for table in &snapshot.tables {
        lines.extend(render_entity(table, options));
    }

    lines.extend(
        snapshot
            .tables
            .iter()
            .flat_map(relationships)
            .map(|r| render_relationship(&r)),
    );

    lines.push(END_MARKER.to_string());

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

/// Renders one entity block: header, one line per column in ordinal order,
/// closing brace.
pub fn render_entity(table: &TableSnapshot, options: RenderOptions) -> Vec<String> {
    let mut lines = Vec::with_capacity(table.columns.len() + 2);
    lines.push(format!("entity {} {{", table.table.name));

    for column in table.ordered_columns() {
        lines.push(render_column(column, table, options));
    }

    lines.push("}".to_string());
    lines
}

fn render_column(column: &Column, table: &TableSnapshot, options: RenderOptions) -> String {
    let column_type = if options.full_types {
        &column.column_type
    } else {
        &column.data_type
    };
    let mut line = format!("  {} : {}", column.name, column_type);

    if options.annotate_keys {
        let keys = column_keys(column, &table.constraints);
        for (present, stereotype) in [
            (keys.primary, "<<PK>>"),
            (keys.foreign, "<<FK>>"),
            (keys.unique, "<<UK>>"),
            (keys.auto_increment, "<<AI>>"),
        ] {
            if present {
                line.push(' ');
                line.push_str(stereotype);
            }
        }
    }

    line
}

/// One relationship per foreign-key row of `table`, in row order.
///
/// A composite foreign key yields one relationship per column pair; nothing
/// is deduplicated.
pub fn relationships(table: &TableSnapshot) -> Vec<Relationship> {
    table
        .constraints
        .iter()
        .filter(|c| is_foreign_key(c))
        .filter_map(|c| {
            c.target_table.as_ref().map(|target| Relationship {
                source_table: c.source_table.clone(),
                target_table: target.clone(),
            })
        })
        .collect()
}

/// `<source> ||--|| <target>`
pub fn render_relationship(relationship: &Relationship) -> String {
    format!(
        "{} {} {}",
        relationship.source_table, ONE_TO_ONE, relationship.target_table
    )
}

/// Serializes the snapshot as pretty JSON, newline terminated.
pub fn render_json(snapshot: &SchemaSnapshot) -> Result<String> {
    let mut json =
        serde_json::to_string_pretty(snapshot).map_err(|e| ErdumpError::Serialization {
            context: format!("snapshot of schema '{}'", snapshot.schema),
            source: e,
        })?;
    json.push('\n');
    Ok(json)
}
