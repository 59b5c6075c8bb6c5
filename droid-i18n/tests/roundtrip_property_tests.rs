use droid_i18n::codec::{clean_up_translated_text, unescape_quotes};
use droid_i18n::formats::sheet::{Sheet, Workbook};
use droid_i18n::formats::xlsx::{read_workbook, write_workbook_to};
use droid_i18n::{ExportConfig, ImportConfig, export_project, import_project};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs::{self, File};

fn singular_key_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,12}").expect("valid key regex")
}

fn plural_key_strategy() -> impl Strategy<Value = String> {
    (
        proptest::string::string_regex("[a-z][a-z0-9_]{0,8}").expect("valid key regex"),
        prop::sample::select(vec!["zero", "one", "two", "few", "many", "other"]),
    )
        .prop_map(|(name, quantity)| format!("{}:{}", name, quantity))
}

fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![3 => singular_key_strategy(), 1 => plural_key_strategy()]
}

/// Values hold no `#`, which import rewrites; surrounding spaces are allowed.
fn value_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 '.,!?&<>]{0,22}").expect("valid value regex")
}

fn dataset_strategy() -> impl Strategy<Value = BTreeMap<String, (String, String)>> {
    prop::collection::btree_map(key_strategy(), (value_strategy(), value_strategy()), 1..10)
}

fn dataset_sheet(values: &BTreeMap<String, (String, String)>) -> Sheet {
    let mut rows = vec![vec![
        Some("key".to_string()),
        Some("en".to_string()),
        Some("fr".to_string()),
    ]];
    rows.extend(
        values
            .iter()
            .map(|(key, (en, fr))| vec![Some(key.clone()), Some(en.clone()), Some(fr.clone())]),
    );
    Sheet::new("Sheet1", rows)
}

fn sheet_map(sheet: &Sheet) -> BTreeMap<(String, String), String> {
    let mut out = BTreeMap::new();
    for row in 1..sheet.rows.len() {
        let key = sheet.cell(row, 0).unwrap_or_default().to_string();
        let width = sheet.rows.iter().map(Vec::len).max().unwrap_or(0);
        for column in 1..width {
            let locale = sheet.cell(0, column).unwrap_or_default().to_string();
            let value = sheet.cell(row, column).unwrap_or_default().to_string();
            out.insert((locale, key.clone()), value);
        }
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn cleanup_is_idempotent_and_reversible(text in "[A-Za-z '#]{0,30}") {
        let once = clean_up_translated_text(&text);
        prop_assert_eq!(clean_up_translated_text(&once), once.clone());
        prop_assert!(!once.contains('#'));
        if !text.contains('#') {
            prop_assert_eq!(unescape_quotes(&once), text);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn import_then_export_preserves_sheet(values in dataset_strategy()) {
        let tmp = tempfile::tempdir().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let project = tmp.path().join("project");
        fs::create_dir_all(&project).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let source = tmp.path().join("seed.xlsx");

        let seed = dataset_sheet(&values);
        write_workbook_to(&Workbook::new(vec![seed.clone()]), &source)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        import_project(&project, source.to_str().expect("path to str"), &ImportConfig::new())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let exported = export_project(&project, tmp.path().join("out"), &ExportConfig::new())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let file = File::open(&exported).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let workbook = read_workbook(file).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(workbook.sheets.len(), 1);
        prop_assert_eq!(sheet_map(&workbook.sheets[0]), sheet_map(&seed));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn export_then_import_preserves_resources(values in dataset_strategy()) {
        let tmp = tempfile::tempdir().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let project = tmp.path().join("project");
        fs::create_dir_all(&project).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let source = tmp.path().join("seed.xlsx");
        write_workbook_to(&Workbook::new(vec![dataset_sheet(&values)]), &source)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        import_project(&project, source.to_str().expect("path to str"), &ImportConfig::new())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let res = project.join("src/main/res");
        let en_before = fs::read(res.join("values/strings.xml")).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let fr_before = fs::read(res.join("values-fr/strings.xml")).map_err(|e| TestCaseError::fail(e.to_string()))?;

        let exported = export_project(&project, tmp.path().join("out"), &ExportConfig::new())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        fs::remove_dir_all(project.join("src")).map_err(|e| TestCaseError::fail(e.to_string()))?;
        import_project(&project, exported.to_str().expect("path to str"), &ImportConfig::new())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let en_after = fs::read(res.join("values/strings.xml")).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let fr_after = fs::read(res.join("values-fr/strings.xml")).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(en_before, en_after);
        prop_assert_eq!(fr_before, fr_after);
    }
}
