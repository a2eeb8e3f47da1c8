use std::fs;

use copydesk_engine::{ensure_output_dir, export_variant, variant_filename, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn variant_files_follow_naming_scheme() {
    assert_eq!(variant_filename("job-42", "A"), "job-42_final_A.md");
    assert_eq!(variant_filename("a/b:c", "B"), "a_b_c_final_B.md");
    assert_eq!(variant_filename("  ", "A"), "job_final_A.md");
    assert_eq!(variant_filename("../..", "A"), "__final_A.md");
}

#[test]
fn export_writes_utf8_markdown_and_replaces_previous() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("exports");

    let first = export_variant(&dir, "job-1", "A", "# 焦虑与睡眠\n正文").unwrap();
    assert_eq!(first.file_name().unwrap(), "job-1_final_A.md");
    assert_eq!(fs::read_to_string(&first).unwrap(), "# 焦虑与睡眠\n正文");

    let second = export_variant(&dir, "job-1", "A", "updated").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "updated");

    // No temp leftovers next to the export.
    let names: Vec<_> = fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["job-1_final_A.md".to_string()]);
}

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("a").join("b");
    ensure_output_dir(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn file_in_place_of_directory_is_an_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("doc.md", "data").is_err());
    assert!(!temp.path().join("doc.md").exists());
}
