mod common;

use assert_matches::assert_matches;

use common::{utf8, workbook, write_file};
use rossi_strand::config::MetadataColumns;
use rossi_strand::domain::TfName;
use rossi_strand::error::RossiError;
use rossi_strand::metadata::{MetadataTable, Replicate};

const SHEET: &str = "GEO_GPL19756_GSE147927";

fn table(content: &str, name: &str) -> (tempfile::TempDir, MetadataTable) {
    let temp = tempfile::tempdir().unwrap();
    let path = utf8(&temp.path().join(name));
    write_file(&path, content);
    let table = MetadataTable::load(&path, SHEET, &MetadataColumns::default()).unwrap();
    (temp, table)
}

#[test]
fn filters_case_insensitive_and_trimmed() {
    let (_temp, table) = table(
        "Sample ID,Yeast Target Common Name,Replicate\n\
         10923, Abf1 ,1\n\
         10924,ABF1,2\n\
         10925,Reb1,1\n\
         10923,abf1,1\n",
        "meta.csv",
    );
    let tf: TfName = "abf1".parse().unwrap();

    let replicates = table.replicates_for(&tf);
    assert_eq!(
        replicates,
        vec![
            Replicate {
                label: "1".to_string(),
                sample_id: "10923".to_string()
            },
            Replicate {
                label: "2".to_string(),
                sample_id: "10924".to_string()
            },
        ]
    );
}

#[test]
fn unknown_tf_is_empty_not_an_error() {
    let (_temp, table) = table(
        "Yeast Target Common Name\tReplicate\tSample ID\nAbf1\t1\t10923\n",
        "meta.tsv",
    );
    let tf: TfName = "Gcn4".parse().unwrap();
    assert!(table.replicates_for(&tf).is_empty());
}

#[test]
fn tf_names_skip_empty_cells() {
    let (_temp, table) = table(
        "Yeast Target Common Name,Replicate,Sample ID\n\
         Abf1,1,1\n\
         ,1,2\n\
         Reb1,1,3\n\
         Abf1,2,4\n",
        "meta.csv",
    );
    assert_eq!(table.tf_names(), vec!["Abf1", "Reb1"]);
}

#[test]
fn tf_names_keep_names_that_are_not_valid_identifiers() {
    let (_temp, table) = table(
        "Yeast Target Common Name,Replicate,Sample ID\n\
         Nhp6a/b,1,1\n\
         Abf1,1,2\n\
         ABF1,2,3\n",
        "meta.csv",
    );
    assert_eq!(table.tf_names(), vec!["Nhp6a/b", "Abf1"]);
}

#[test]
fn missing_column_fails_at_load() {
    let temp = tempfile::tempdir().unwrap();
    let path = utf8(&temp.path().join("meta.csv"));
    write_file(&path, "Target,Replicate,Sample ID\nAbf1,1,1\n");

    let err = MetadataTable::load(&path, SHEET, &MetadataColumns::default()).unwrap_err();
    assert_matches!(err, RossiError::MissingColumn { ref column, .. } if column == "Yeast Target Common Name");
}

#[test]
fn missing_source_is_not_found() {
    let temp = tempfile::tempdir().unwrap();
    let path = utf8(&temp.path().join("absent.xlsx"));

    let err = MetadataTable::load(&path, SHEET, &MetadataColumns::default()).unwrap_err();
    assert_matches!(err, RossiError::MetadataNotFound(_));
}

#[test]
fn custom_columns_from_rows() {
    let columns = MetadataColumns {
        tf: "TF common name".to_string(),
        replicate: "Rep".to_string(),
        sample_id: "Sample".to_string(),
    };
    let header = vec!["Sample".to_string(), "TF common name".to_string(), "Rep".to_string()];
    let rows = vec![vec!["S1".to_string(), "Abf1".to_string()]];

    let table = MetadataTable::from_rows("inline".to_string(), &header, rows.into_iter(), &columns)
        .unwrap();
    assert_eq!(table.rows()[0].replicate, "");
    assert_eq!(table.rows()[0].sample_id, "S1");
}

fn xlsx_metadata(sheet: &str) -> (tempfile::TempDir, camino::Utf8PathBuf) {
    let temp = tempfile::tempdir().unwrap();
    let path = utf8(&temp.path().join("GSE147927_metadata.xlsx"));
    let bytes = workbook(
        sheet,
        &[
            &["Sample ID", "Yeast Target Common Name", "Replicate"],
            &["10923", "Abf1", "1"],
            &["10924", " abf1 ", "2"],
            &["11001", "Reb1", "1"],
        ],
    );
    std::fs::write(path.as_std_path(), bytes).unwrap();
    (temp, path)
}

#[test]
fn workbook_sheet_is_read_by_header_name() {
    let (_temp, path) = xlsx_metadata(SHEET);

    let table = MetadataTable::load(&path, SHEET, &MetadataColumns::default()).unwrap();
    let tf: TfName = "ABF1".parse().unwrap();

    assert_eq!(
        table.replicates_for(&tf),
        vec![
            Replicate {
                label: "1".to_string(),
                sample_id: "10923".to_string()
            },
            Replicate {
                label: "2".to_string(),
                sample_id: "10924".to_string()
            },
        ]
    );
    assert_eq!(table.tf_names(), vec!["Abf1", "Reb1"]);
}

#[test]
fn workbook_without_the_sheet_is_not_found() {
    let (_temp, path) = xlsx_metadata("Sheet1");

    let err = MetadataTable::load(&path, SHEET, &MetadataColumns::default()).unwrap_err();
    assert_matches!(err, RossiError::MetadataNotFound(ref what) if what.contains(SHEET));
}
