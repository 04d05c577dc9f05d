//! E-commerce data platform architecture
//!
//! Medallion-style lake on S3 (bronze, silver, gold) processed by PySpark on
//! Databricks, orchestrated by Airflow, with quality checks, IAM access
//! control and CloudWatch logging drawn alongside.

use anyhow::Result;
use std::path::Path;
use tracing::{debug, span, Level};

use crate::core::{
    BuiltinIcon, Diagram, DiagramBuilder, DiagramConfig, Direction, Edge, EdgeRouting,
    EdgeStyle, Icon, OutputFormat,
};

pub const TITLE: &str = "E-Commerce Data Platform - Modern Architecture";

/// Output path of the rendered diagram, without extension
pub const OUTPUT_STEM: &str = "docs/diagrams/architecture";

/// Directory the custom icons are read from
pub const ICONS_DIR: &str = "docs/icons";

/// Custom icon files expected in the icons directory
pub const ICON_FILES: [&str; 2] = ["kaggle.png", "databricks.png"];

/// Diagram settings used by the platform picture
pub fn config() -> DiagramConfig {
    DiagramConfig::new(TITLE)
        .filename(OUTPUT_STEM)
        .format(OutputFormat::Png)
        .direction(Direction::LeftRight)
        .graph_attr("fontsize", "16")
        .graph_attr("bgcolor", "white")
        .graph_attr("pad", "0.5")
        .splines(EdgeRouting::Ortho)
        .node_attr("fontsize", "12")
        .node_attr("height", "1.2")
        .node_attr("width", "1.2")
        .edge_attr("fontsize", "10")
}

/// Describe the platform with icons from `icons_dir`
pub fn platform(icons_dir: &Path) -> Result<Diagram> {
    platform_with(config(), icons_dir)
}

/// Describe the platform using a custom configuration
pub fn platform_with(config: DiagramConfig, icons_dir: &Path) -> Result<Diagram> {
    let blueprint_span = span!(Level::DEBUG, "ecommerce_blueprint", icons_dir = %icons_dir.display());
    let _enter = blueprint_span.enter();

    let mut d = DiagramBuilder::new(config);

    let kaggle = d.cluster("Data Sources", |d| {
        d.node(
            "Kaggle Dataset\n(100k orders)",
            Icon::custom(icons_dir.join("kaggle.png")),
        )
    });

    let upload_script = d.cluster("Ingestion Layer", |d| {
        d.node("Upload Script\n(boto3)", BuiltinIcon::Python)
    });

    let (bronze_s3, silver_s3, gold_s3) = d.cluster("Data Lake (AWS S3)", |d| {
        let bronze = d.cluster("Bronze Layer", |d| {
            d.node("Raw Data\n(Immutable)", BuiltinIcon::AwsS3)
        });
        let silver = d.cluster("Silver Layer", |d| {
            d.node("Cleaned Data\n(Validated)", BuiltinIcon::AwsS3)
        });
        let gold = d.cluster("Gold Layer", |d| {
            d.node("Business Metrics\n(Aggregated)", BuiltinIcon::AwsS3)
        });
        (bronze, silver, gold)
    });

    let (bronze_spark, silver_spark, gold_spark) = d.cluster("Processing (Databricks)", |d| {
        let bronze = d.cluster("Bronze Processing", |d| {
            d.node("PySpark\nIngestion", BuiltinIcon::Spark)
        });
        let silver = d.cluster("Silver Processing", |d| {
            d.node("PySpark\nTransformations", BuiltinIcon::Spark)
        });
        let gold = d.cluster("Gold Processing", |d| {
            d.node("PySpark\nAggregations", BuiltinIcon::Spark)
        });
        (bronze, silver, gold)
    });

    let (great_expectations, iam, monitoring) = d.cluster("Data Quality & Governance", |d| {
        (
            d.node("Great\nExpectations", BuiltinIcon::Python),
            d.node("IAM Roles\n(RBAC)", BuiltinIcon::AwsIam),
            d.node("CloudWatch\nLogs", BuiltinIcon::AwsCloudwatch),
        )
    });

    let airflow = d.cluster("Orchestration", |d| {
        d.node("Apache Airflow\n(DAGs)", BuiltinIcon::Airflow)
    });

    let databricks_sql = d.cluster("Analytics & Consumption", |d| {
        d.node(
            "Databricks SQL",
            Icon::custom(icons_dir.join("databricks.png")),
        )
    });

    // Data flow
    d.edge(kaggle, upload_script, Edge::labeled("CSV files"))?;
    d.edge(upload_script, bronze_s3, Edge::labeled("boto3 upload"))?;

    // Bronze to silver
    d.edge(bronze_s3, bronze_spark, Edge::labeled("read"))?;
    d.edge(bronze_spark, great_expectations, Edge::labeled("validate"))?;
    d.edge(bronze_spark, silver_s3, Edge::labeled("write"))?;

    // Silver to gold
    d.edge(silver_s3, silver_spark, Edge::labeled("read"))?;
    d.edge(silver_spark, great_expectations, Edge::labeled("quality checks"))?;
    d.edge(silver_spark, gold_s3, Edge::labeled("write"))?;

    // Gold aggregations
    d.edge(gold_s3, gold_spark, Edge::labeled("read"))?;
    d.edge(gold_spark, gold_s3, Edge::labeled("write"))?;

    d.edge(gold_s3, databricks_sql, Edge::labeled("query"))?;

    let jobs = [bronze_spark, silver_spark, gold_spark];
    let layers = [bronze_s3, silver_s3, gold_s3];

    d.fan_out(
        airflow,
        &jobs,
        Edge::labeled("trigger").style(EdgeStyle::Dashed),
    )?;
    d.fan_out(
        iam,
        &layers,
        Edge::labeled("access control").style(EdgeStyle::Dotted),
    )?;
    d.fan_out(
        monitoring,
        &jobs,
        Edge::labeled("logs").style(EdgeStyle::Dotted),
    )?;

    let diagram = d.build()?;
    debug!(
        nodes = diagram.node_count(),
        clusters = diagram.cluster_count(),
        edges = diagram.edge_count(),
        "Platform described"
    );
    Ok(diagram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EdgeData;

    fn diagram() -> Diagram {
        platform(Path::new(ICONS_DIR)).unwrap()
    }

    fn edges_with_style(diagram: &Diagram, style: EdgeStyle) -> Vec<&EdgeData> {
        diagram.edges().filter(|e| e.style == style).collect()
    }

    #[test]
    fn test_counts() {
        let diagram = diagram();
        assert_eq!(diagram.node_count(), 13);
        assert_eq!(diagram.cluster_count(), 13);
        assert_eq!(diagram.edge_count(), 20);
    }

    #[test]
    fn test_edge_categories() {
        let diagram = diagram();
        assert_eq!(edges_with_style(&diagram, EdgeStyle::Solid).len(), 11);
        let dashed = edges_with_style(&diagram, EdgeStyle::Dashed);
        assert_eq!(dashed.len(), 3);
        assert!(dashed.iter().all(|e| e.label.as_deref() == Some("trigger")));
        assert_eq!(edges_with_style(&diagram, EdgeStyle::Dotted).len(), 6);
    }

    #[test]
    fn test_custom_icons_resolve_under_icons_dir() {
        let diagram = platform(Path::new("assets/icons")).unwrap();
        let icons = diagram.custom_icons();
        assert_eq!(icons.len(), 2);
        assert!(icons.iter().all(|p| p.starts_with("assets/icons")));
        let kaggle = diagram.find_node("Kaggle Dataset\n(100k orders)").unwrap();
        assert_eq!(kaggle.icon, Icon::custom("assets/icons/kaggle.png"));
    }

    #[test]
    fn test_layers_nest_inside_lake() {
        let diagram = diagram();
        let lake = diagram
            .clusters()
            .find(|c| c.label == "Data Lake (AWS S3)")
            .unwrap();
        let layers: Vec<_> = diagram
            .children_of(Some(lake.id))
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(layers, vec!["Bronze Layer", "Silver Layer", "Gold Layer"]);
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            diagram().output_path(),
            Path::new("docs/diagrams/architecture.png")
        );
    }
}
