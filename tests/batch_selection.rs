// Selection and name-derivation properties of the batch driver.
use nvtfix::batch::ConversionTask;

#[test]
fn source_files_derive_fixed_and_csv_names() {
    for stem in ["VT1", "a", "session_2010-03-14", "weird name with spaces"] {
        let input = format!("{stem}.nvt");
        let task = ConversionTask::from_entry(&input).unwrap();
        assert_eq!(task.input_name, input);
        assert_eq!(task.output_name, format!("{stem}_fixed.nvt"));
        assert_eq!(task.sidecar_name, format!("{stem}.csv"));
    }
}

#[test]
fn names_without_the_suffix_are_never_selected() {
    for name in [
        "VT1.csv",
        "VT1.nvt.bak",
        "VT1.NVT",
        "VT1.Nvt",
        "nvt",
        "vt1nvt",
        "a",
        "",
    ] {
        assert!(
            ConversionTask::from_entry(name).is_none(),
            "{name:?} should not be selected"
        );
    }
}

#[test]
fn already_fixed_names_are_never_selected() {
    for name in ["VT1_fixed.nvt", "_fixed.nvt", "a_fixed_fixed.nvt"] {
        // "a_fixed_fixed.nvt" still ends in "_fixed.nvt" and stays out.
        assert!(
            ConversionTask::from_entry(name).is_none(),
            "{name:?} should not be selected"
        );
    }
}

#[test]
fn fixed_suffix_check_runs_on_the_original_name() {
    // "afixed.nvt" does not end in "_fixed.nvt"; it is a regular source.
    let task = ConversionTask::from_entry("afixed.nvt").unwrap();
    assert_eq!(task.output_name, "afixed_fixed.nvt");
}

#[test]
fn derivation_is_deterministic() {
    let a = ConversionTask::from_entry("VT1.nvt").unwrap();
    let b = ConversionTask::from_entry("VT1.nvt").unwrap();
    assert_eq!(a, b);
}

#[test]
fn degenerate_bare_suffix_name_is_selected() {
    let task = ConversionTask::from_entry(".nvt").unwrap();
    assert_eq!(task.input_name, ".nvt");
    assert_eq!(task.output_name, "_fixed.nvt");
    assert_eq!(task.sidecar_name, ".csv");
    assert_eq!(task.command_line(), "nvtfix.exe .nvt _fixed.nvt .csv");
}
