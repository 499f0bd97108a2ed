use std::env;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;

use stockwatch_analytics::{truncate_label, Dashboard, PivotPoint};
use stockwatch_pipeline::{
    export_csv_file, fields, title_case, GroupState, IngestConfig, IngestReport,
    IngestionPipeline, LogProgress, MemoryStore, RecordStore, SortDirection, SortKey, SortSpec,
    StockStatus, TableQuery, TableRow, TableView, TableViewEngine,
};

/// Log level used when `RUST_LOG` is unset; shows ingestion progress.
const DEFAULT_LOG_FILTER: &str = "info";

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct InventoryJson<'a> {
    generated_at: String,
    ingest_ms: u128,
    report: &'a IngestReport,
    dashboard: &'a Dashboard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pivot: Option<&'a [PivotPoint]>,
    table: &'a TableView<'a>,
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

struct Args {
    csv_path: String,
    config_path: Option<String>,
    namespace: Option<String>,
    query: TableQuery,
    open_groups: Vec<String>,
    pivot: Option<(String, String)>,
    export_path: Option<String>,
    json_output: bool,
}

fn usage() -> ! {
    eprintln!("Usage: stockwatch-server <inventory.csv> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config FILE     JSON ingestion config (storeNamespace, identityFallback, identitySeed)");
    eprintln!("  --namespace NS    Store namespace to replace");
    eprintln!("  --search TERM     Filter table by item name or code");
    eprintln!("  --category CAT    Filter table by category");
    eprintln!("  --sort KEY        no | name | stock | status (default: no)");
    eprintln!("  --desc            Sort descending");
    eprintln!("  --group           Group table rows by category");
    eprintln!("  --open c1,c2      Expand these category groups");
    eprintln!("  --pivot X,Y       Sum numeric field Y per value of field X");
    eprintln!("  --export FILE     Write the derived record set as CSV");
    eprintln!("  --json            Output as JSON instead of formatted text");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  stockwatch-server fixtures/spare_parts.csv --sort status --group --open filter");
    eprintln!("  stockwatch-server fixtures/spare_parts.csv --pivot Kategori,\"Stock Sekarang\" --json");
    process::exit(1);
}

fn value_of(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i + 1) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires a value", flag);
            process::exit(1);
        }
    }
}

fn parse_args(args: &[String]) -> Args {
    if args.len() < 2 {
        usage();
    }

    let mut parsed = Args {
        csv_path: args[1].clone(),
        config_path: None,
        namespace: None,
        query: TableQuery::default(),
        open_groups: Vec::new(),
        pivot: None,
        export_path: None,
        json_output: false,
    };
    let mut sort = SortSpec::default();

    let mut i = 2;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--config" => {
                parsed.config_path = Some(value_of(args, i, flag));
                i += 2;
            }
            "--namespace" => {
                parsed.namespace = Some(value_of(args, i, flag));
                i += 2;
            }
            "--search" => {
                parsed.query.search = value_of(args, i, flag);
                i += 2;
            }
            "--category" => {
                parsed.query.category = value_of(args, i, flag);
                i += 2;
            }
            "--sort" => {
                sort.key = value_of(args, i, flag)
                    .parse::<SortKey>()
                    .unwrap_or_else(|e| {
                        eprintln!("Error: {}", e);
                        process::exit(1);
                    });
                i += 2;
            }
            "--desc" => {
                sort.direction = SortDirection::Descending;
                i += 1;
            }
            "--group" => {
                parsed.query.group_by_category = true;
                i += 1;
            }
            "--open" => {
                parsed.open_groups = value_of(args, i, flag)
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect();
                i += 2;
            }
            "--pivot" => {
                let value = value_of(args, i, flag);
                match value.split_once(',') {
                    Some((x, y)) => parsed.pivot = Some((x.trim().into(), y.trim().into())),
                    None => {
                        eprintln!("Error: --pivot expects CATEGORY_FIELD,NUMERIC_FIELD");
                        process::exit(1);
                    }
                }
                i += 2;
            }
            "--export" => {
                parsed.export_path = Some(value_of(args, i, flag));
                i += 2;
            }
            "--json" => {
                parsed.json_output = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
    }

    parsed.query.sort = Some(sort);
    parsed
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

/// Format a number with comma thousands separators.
fn format_thousands(amount: f64) -> String {
    let whole = amount.abs().round() as u64;
    let sign = if amount < 0.0 { "-" } else { "" };

    let s = whole.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    format!("{}{}", sign, result.chars().rev().collect::<String>())
}

fn section(title: &str) {
    println!();
    println!("  {}", title);
    println!("  {:\u{2500}<64}", "");
}

fn print_row(row: &TableRow<'_>) {
    let record = row.record;
    let no = record
        .get(fields::ROW_NUMBER)
        .map(|v| v.to_string())
        .unwrap_or_default();
    let status = row
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".into());
    let marker = match row.status {
        Some(StockStatus::OutOfStock) => "!!",
        Some(StockStatus::LowStock) => "! ",
        _ => "  ",
    };
    println!(
        "  {} {:>4} {:12} {:20} {:>8} {:>6}  {}",
        marker,
        no,
        record.item_code().unwrap_or("-"),
        truncate_label(record.item_name().unwrap_or("-")),
        format_thousands(record.current_stock().unwrap_or(0.0)),
        row.threshold.map(|t| t.to_string()).unwrap_or_else(|| "-".into()),
        status,
    );
}

fn print_table(view: &TableView<'_>, groups: &GroupState) {
    match view {
        TableView::Flat(rows) => rows.iter().for_each(print_row),
        TableView::Grouped(categories) => {
            for group in categories {
                let open = groups.is_open(&group.category.to_lowercase());
                println!(
                    "  {} {} ({})",
                    if open { "\u{25be}" } else { "\u{25b8}" },
                    title_case(&group.category),
                    group.rows.len()
                );
                if open {
                    group.rows.iter().for_each(print_row);
                }
            }
        }
    }
}

fn print_human(
    report: &IngestReport,
    dashboard: &Dashboard,
    pivot: Option<(&(String, String), &[PivotPoint])>,
    view: &TableView<'_>,
    groups: &GroupState,
    ingest_ms: u128,
) {
    println!();
    println!("  STOCKWATCH \u{00b7} Spare Parts Inventory");
    println!();
    println!(
        "  {} records written to '{}'  \u{00b7}  {} skipped  \u{00b7}  {} duplicate codes  \u{00b7}  {} generated keys",
        report.records_written,
        report.namespace,
        report.skipped_rows.len(),
        report.duplicate_keys.len(),
        report.generated_keys
    );
    for skipped in &report.skipped_rows {
        println!(
            "    line {}: expected {} fields, found {}",
            skipped.line, skipped.expected, skipped.found
        );
    }

    if dashboard.is_empty() {
        println!();
        println!("  No inventory records.");
        return;
    }

    section("Items per category");
    for c in &dashboard.category_distribution {
        println!("  {:30} {:>6}", c.name, c.value);
    }

    section("Current vs previous stock (top 25)");
    for p in &dashboard.stock_comparison {
        println!(
            "  {:20} {:>8} {:>8}",
            p.name,
            format_thousands(p.previous_stock),
            format_thousands(p.current_stock)
        );
    }

    section("Stock age distribution (days)");
    for bin in &dashboard.stock_age_histogram {
        println!("  {:>12} {:>6}", bin.name, bin.count);
    }

    section("Average stock age per category");
    for a in &dashboard.average_age_by_category {
        println!("  {:30} {:>8.1}", a.name, a.average_age);
    }

    section("Top sold products (top 25)");
    for s in &dashboard.top_sold_products {
        println!("  {:30} {:>8}", truncate_label(&s.name), format_thousands(s.quantity_sold));
    }

    section("Stock value per category");
    for v in &dashboard.stock_value_by_category {
        println!("  {:30} {:>16}", v.name, format_thousands(v.value));
    }

    section("Longest stock age (top 15)");
    for p in &dashboard.longest_stock_age {
        println!("  {:20} {:>8}", p.name, format_thousands(p.age_days));
    }

    if let Some(((x, y), points)) = pivot {
        section(&format!("{} by {}", y, x));
        for p in points {
            println!("  {:30} {:>16}", p.category, format_thousands(p.value));
        }
    }

    section(&format!("Inventory ({} rows)", view.len()));
    print_table(view, groups);

    println!();
    println!("  \u{23f1}  Ingested in {}ms", ingest_ms);
    println!();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();

    let args: Vec<String> = env::args().collect();
    let args = parse_args(&args);

    let mut config = match &args.config_path {
        Some(path) => IngestConfig::from_file(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        }),
        None => IngestConfig::default(),
    };
    if let Some(namespace) = &args.namespace {
        config.store_namespace = namespace.clone();
    }
    let namespace = config.store_namespace.clone();

    let csv_text = match std::fs::read_to_string(&args.csv_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {}", args.csv_path, e);
            process::exit(1);
        }
    };

    let ingest_start = Instant::now();
    let store = Arc::new(MemoryStore::new());
    let pipeline =
        IngestionPipeline::new(Arc::clone(&store), config).with_observer(LogProgress::default());
    let report = match pipeline.ingest(&csv_text).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let ingest_ms = ingest_start.elapsed().as_millis();

    let set = match store.snapshot(&namespace).await {
        Ok(set) => set,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Some(path) = &args.export_path {
        if let Err(e) = export_csv_file(&set, path) {
            eprintln!("Error exporting to {}: {}", path, e);
            process::exit(1);
        }
        log::info!("exported {} records to {}", set.len(), path);
    }

    let dashboard = Dashboard::from_set(&set);
    let pivot = args
        .pivot
        .as_ref()
        .map(|(x, y)| Dashboard::pivot(&set.records, x, y));
    let view = TableViewEngine::new().render(&set.records, &args.query);

    let mut groups = GroupState::default();
    for category in &args.open_groups {
        groups.set_open(&category.to_lowercase(), true);
    }

    if args.json_output {
        let output = InventoryJson {
            generated_at: Utc::now().to_rfc3339(),
            ingest_ms,
            report: &report,
            dashboard: &dashboard,
            pivot: pivot.as_deref(),
            table: &view,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        let pivot = args.pivot.as_ref().zip(pivot.as_deref());
        print_human(&report, &dashboard, pivot, &view, &groups, ingest_ms);
    }
}
