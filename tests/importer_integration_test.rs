// ==========================================
// Importer integration tests
// ==========================================
// CSV files on disk -> typed tables -> full pipeline run, the way the
// CLI wires things together.
// ==========================================

use retail_order_engine::domain::types::{Category, EmitFilter, ItemKey};
use retail_order_engine::engine::{OrderOrchestrator, SectionInputs};
use retail_order_engine::importer::{
    ClassificationImporter, EconomicsImporter, SalesImporter, SignalsImporter,
};
use retail_order_engine::report::OrderWriter;
use retail_order_engine::repository::InMemoryBufferRepository;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

// ==========================================
// Fixture files
// ==========================================

fn write_fixture(dir: &std::path::Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn sales_csv(dir: &std::path::Path) -> PathBuf {
    write_fixture(
        dir,
        "ventas_vivero.csv",
        "Código artículo,Nombre,Talla,Color,Semana,Unidades,Importe\n\
         10234,Rosal trepador,M,ROJO,14,10,95.00\n\
         10234,Rosal trepador,M,ROJO,14,10,95.00\n\
         20001,Abeto enano,U,,14,4,80.00\n",
    )
}

fn classification_csv(dir: &std::path::Path) -> PathBuf {
    write_fixture(
        dir,
        "abc_vivero.csv",
        "Artículo,Talla,Color,Categoria,Acción Sugerida,Descuento Sugerido (%)\n\
         10234,M,ROJO,A,Mantener el nivel de compras actual,0\n\
         20001,U,,C,Reducir compras 50%,10\n",
    )
}

fn economics_csv(dir: &std::path::Path) -> PathBuf {
    write_fixture(
        dir,
        "costes_vivero.csv",
        "Codigo,Talla,Color,Tarifa10,Coste,Nombre proveedor\n\
         10234,M,ROJO,\"9,50\",\"3,80\",Viveros del Sur\n\
         20001,U,,20.00,8.00,Abetos SL\n",
    )
}

fn signals_csv(dir: &std::path::Path) -> PathBuf {
    write_fixture(
        dir,
        "stock_real.csv",
        "Codigo,Talla,Color,Stock Real,Ventas Reales,Unidades Objetivo\n\
         10234,M,ROJO,5,12,9\n",
    )
}

// ==========================================
// Tests
// ==========================================

#[test]
fn test_csv_tables_feed_the_pipeline() {
    let dir = tempdir().unwrap();

    let sales = SalesImporter::load(&sales_csv(dir.path()), "vivero").unwrap();
    let classification = ClassificationImporter::load(&classification_csv(dir.path())).unwrap();
    let economics = EconomicsImporter::load(&economics_csv(dir.path())).unwrap();
    let signals = SignalsImporter::load_optional(&signals_csv(dir.path())).unwrap();

    assert_eq!(sales.len(), 3);
    assert_eq!(classification.len(), 2);
    assert_eq!(economics.len(), 2);
    assert_eq!(signals.len(), 1);

    let rosal = ItemKey::new("10234", "M", "ROJO");
    assert_eq!(classification[&rosal].category, Category::A);
    assert!((economics[&rosal].price - 9.5).abs() < 1e-9);
    assert_eq!(signals[&rosal].physical_stock, 5);

    let orchestrator = OrderOrchestrator::new(0.05, 0.30, EmitFilter::FinalOrder);
    let repo = InMemoryBufferRepository::new();

    // preliminary: rosal 20 units x 9.5 = 190 (duplicate rows grouped),
    // abeto 4 x 0.5 x 20 = 40; total 230. Target keeps scale at 1.0.
    let order = orchestrator
        .process_section(
            "vivero",
            14,
            SectionInputs {
                sales,
                classification: Some(classification),
                economics: Some(economics),
                signals,
            },
            230.0 / 1.05,
            0.0,
            &repo,
        )
        .unwrap();

    assert_eq!(order.rows.len(), 2);

    let rosal_row = order.rows.iter().find(|r| r.code == "10234").unwrap();
    assert_eq!(rosal_row.final_units, 20);
    assert_eq!(rosal_row.applied_action, "MANTENER");
    assert_eq!(rosal_row.safety_target, 6);
    // stock 5 vs safety 6: base 26, corrected 26 + 6 - 5 = 27
    assert_eq!(rosal_row.corrected_order, 27);
    // actual 12 vs target 9 -> +3
    assert_eq!(rosal_row.trend_units, 3);
    assert_eq!(rosal_row.final_order, 30);
    assert_eq!(rosal_row.supplier, "Viveros del Sur");

    let abeto_row = order.rows.iter().find(|r| r.code == "20001").unwrap();
    // 4 units halved by "Reducir compras 50%" -> 2
    assert_eq!(abeto_row.final_units, 2);
    assert_eq!(abeto_row.applied_action, "REDUCIR 50%");
}

#[test]
fn test_order_file_written_from_pipeline_rows() {
    let dir = tempdir().unwrap();

    let sales = SalesImporter::load(&sales_csv(dir.path()), "vivero").unwrap();
    let classification = ClassificationImporter::load(&classification_csv(dir.path())).unwrap();
    let economics = EconomicsImporter::load(&economics_csv(dir.path())).unwrap();

    let orchestrator = OrderOrchestrator::new(0.05, 0.30, EmitFilter::FinalOrder);
    let repo = InMemoryBufferRepository::new();
    let order = orchestrator
        .process_section(
            "vivero",
            14,
            SectionInputs {
                sales,
                classification: Some(classification),
                economics: Some(economics),
                signals: Default::default(),
            },
            230.0 / 1.05,
            0.0,
            &repo,
        )
        .unwrap();

    let out_dir = dir.path().join("pedidos");
    let writer = OrderWriter::new(&out_dir);

    let order_path = writer.write_order(&order.rows, "vivero", 14).unwrap().unwrap();
    let summary_path = writer
        .write_summary(std::slice::from_ref(&order.summary), "vivero")
        .unwrap()
        .unwrap();

    let order_contents = fs::read_to_string(order_path).unwrap();
    assert!(order_contents.contains("Rosal trepador"));
    assert!(order_contents.contains("Viveros del Sur"));

    let summary_contents = fs::read_to_string(summary_path).unwrap();
    assert!(summary_contents.starts_with("Seccion,Semana"));
    assert!(summary_contents.contains("vivero,14"));
}

#[test]
fn test_missing_sales_file_reported() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("no_such_file.csv");
    assert!(SalesImporter::load(&missing, "vivero").is_err());
}
