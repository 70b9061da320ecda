//! Integration tests for loading a file and resolving aliases.

use std::io::Write;

use emr_ingest::{
    ColumnAliases, ReadOptions, read_dataset, read_dataset_with_options, resolve_aliases,
    text_values,
};
use tempfile::Builder;

#[test]
fn test_load_then_resolve_aliases() {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    write!(
        file,
        "Pat_ID,medical_record_number,birth_date\n1,MRN00000001,1980-01-01\n2,MRN00000002,1975-06-30\n"
    )
    .unwrap();

    let mut df = read_dataset(file.path()).unwrap();
    let mut aliases = ColumnAliases::new();
    aliases.insert(
        "patient_id".to_string(),
        vec!["person_id".to_string(), "pat_id".to_string()],
    );
    aliases.insert("mrn".to_string(), vec!["medical_record_number".to_string()]);
    aliases.insert("dob".to_string(), vec!["birth_date".to_string()]);

    let renames = resolve_aliases(&mut df, &aliases).unwrap();

    assert_eq!(renames.len(), 3);
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, vec!["patient_id", "mrn", "dob"]);
    let mrns = text_values(df.column("mrn").unwrap());
    assert_eq!(mrns[1].as_deref(), Some("MRN00000002"));
}

#[test]
fn test_custom_separator_for_csv() {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "mrn;age\nMRN00000001;42\nMRN00000002;37\n").unwrap();

    let options = ReadOptions {
        separator: b';',
        ..ReadOptions::default()
    };
    let df = read_dataset_with_options(file.path(), options).unwrap();
    assert_eq!(df.shape(), (2, 2));
    let mrns = text_values(df.column("mrn").unwrap());
    assert_eq!(mrns[0].as_deref(), Some("MRN00000001"));

    let default = read_dataset(file.path()).unwrap();
    assert_eq!(default.width(), 1);
}
