use phylo_report::commands::report::{generate, ReportInputs};
use phylo_report::config::ReportConfig;
use phylo_report::render::{DefaultTheme, TreeOutcome};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FILTERED: &str = "query_id,query,closest,sample_date,SNPdistance,SNPs,country,lineage,uk_lineage,phylotype\n\
Q1,SeqA,SeqA,2021-01-05,0,,UK,B.1.1.7,UK5,p1\n\
Q2,SeqB,SeqC,,3,A1T,UK,B.1.1.7,UK5,p1\n";

const QUERY: &str = "name,sample_date\nQ1,2021-01-05\nQ2,2021-01-07\nQ3,2021-01-09\n";

const BACKGROUND: &str = "sequence_name,sample_date,country,adm1,adm2,lineage,uk_lineage,phylotype\n\
SeqA,2021-01-01,UK,UK-ENG,Leeds,B.1.1.7,UK5,p1\n\
SeqC,2021-01-02,UK,UK-SCT,Fife,B.1.1.7,UK5,p1\n\
SeqD,2020-12-01,France,,,B.1,NA,NA\n\
SeqE,2020-12-30,UK,UK-WLS,Cardiff,B.1,UK9,p2\n\
SeqF,2020-12-29,Spain,,,B.1,NA,NA\n";

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// A drawable tree, a one-tip tree and a 600-tip tree.
fn setup(background: &str) -> (TempDir, ReportInputs) {
    let dir = tempfile::tempdir().unwrap();
    let trees = dir.path().join("trees");
    fs::create_dir(&trees).unwrap();
    write(
        &trees,
        "local_1.tree",
        "((SeqA:0.0001,SeqC:0.0002):0.0001,(SeqD:0.0001,inserted_node1:0):0.0001);",
    );
    write(&trees, "local_1.txt", "node\tmembers\ninserted_node1\tSeqE,SeqF\n");
    write(&trees, "local_2.tree", "(SeqH:0.0001);");
    let big: Vec<String> = (0..600).map(|i| format!("T{}:0.0001", i)).collect();
    write(&trees, "local_3.tree", &format!("({});", big.join(",")));

    write(dir.path(), "filtered.csv", FILTERED);
    write(dir.path(), "query.csv", QUERY);
    write(dir.path(), "background.csv", background);

    let inputs = ReportInputs {
        tree_dir: trees,
        filtered: dir.path().join("filtered.csv"),
        query: dir.path().join("query.csv"),
        background: dir.path().join("background.csv"),
        output_dir: dir.path().join("out"),
        qc_fails: None,
        quiet: true,
    };
    (dir, inputs)
}

fn config() -> ReportConfig {
    ReportConfig {
        table_fields: vec!["lineage".to_string()],
        ..ReportConfig::default()
    }
    .normalise()
}

#[test]
fn report_run_draws_small_trees_and_summarises_large_ones() {
    let (_dir, inputs) = setup(BACKGROUND);
    let run = generate(&inputs, &config(), &DefaultTheme).unwrap();
    let out = &inputs.output_dir;

    assert_eq!(run.query_count, 3);
    assert_eq!(run.matched_query_count, 2);
    assert_eq!(run.unmatched_queries, vec!["Q3"]);

    let outcomes: Vec<(&str, &TreeOutcome)> =
        run.trees.iter().map(|t| (t.tree.as_str(), &t.outcome)).collect();
    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[0], ("local_1", TreeOutcome::Rendered { .. })));
    assert!(matches!(outcomes[1], ("local_2", TreeOutcome::Skipped { .. })));
    match outcomes[2] {
        ("local_3", TreeOutcome::Oversized(summary)) => {
            assert_eq!(summary.tip_count, 600);
            assert_eq!(summary.query_count, 0);
            assert_eq!(summary.date_range, "NA");
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    let svg = fs::read_to_string(out.join("figures").join("local_1.svg")).unwrap();
    assert!(svg.contains(">Q1|2021-01-05</text>"));
    assert!(svg.contains(">Collapsed node 1: 2 nodes in UK, Spain</text>"));
    assert!(svg.contains("#cd5c5c"));
    assert!(!out.join("figures").join("local_2.svg").exists());
    assert!(!out.join("figures").join("local_3.svg").exists());
    assert!(out.join("figures").join("legend.svg").exists());
    assert!(out.join("figures").join("local_1_collapsed_nodes.svg").exists());

    let large = fs::read_to_string(out.join("tables").join("large_trees.csv")).unwrap();
    assert!(large.lines().any(|l| l.starts_with("local_3,600")));

    let in_db = fs::read_to_string(out.join("tables").join("query_in_database.csv")).unwrap();
    assert!(in_db.contains("Q1,SeqA,B.1.1.7,local_1"));
    assert!(out.join("tables").join("query_sequence_provided.csv").exists());
    assert!(out.join("tables").join("local_1_collapsed_nodes.csv").exists());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("json").join("run.json")).unwrap())
            .unwrap();
    assert_eq!(json["type"], "Run");
    assert_eq!(json["trees"][2]["outcome"], "oversized");
    assert!(run.files.iter().all(|f| f.exists()));
}

#[test]
fn missing_background_column_stops_the_run() {
    let (_dir, inputs) = setup("sequence_name,sample_date,adm1,adm2\nSeqA,2021-01-01,UK-ENG,Leeds\n");
    let err = generate(&inputs, &config(), &DefaultTheme).unwrap_err();
    assert!(format!("{:#}", err).contains("country"));
    assert!(!inputs.output_dir.join("figures").exists());
}

#[test]
fn background_with_only_required_columns_is_enough() {
    let (_dir, inputs) = setup(
        "sequence_name,sample_date,country\n\
         SeqA,2021-01-01,UK\n\
         SeqC,2021-01-02,UK\n\
         SeqD,2020-12-01,France\n",
    );
    let run = generate(&inputs, &config(), &DefaultTheme).unwrap();
    assert_eq!(run.matched_query_count, 2);
    assert!(matches!(run.trees[0].outcome, TreeOutcome::Rendered { .. }));
    assert!(inputs.output_dir.join("figures").join("local_1.svg").exists());
}
