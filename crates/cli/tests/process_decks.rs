use assert_cmd::Command;
use predicates::prelude::*;

fn deck_json() -> &'static str {
    r#"{
  "presentation": "azure-fundamentals",
  "slides": [
    {
      "slide_number": 1,
      "title": "Module 1: Azure Fundamentals",
      "notes": "Learning objective: Students will understand cloud computing basics."
    },
    {
      "slide_number": 2,
      "title": "What is Cloud Computing?",
      "text": [
        "On-demand delivery of compute power online",
        "Pay-as-you-go pricing for every resource"
      ]
    },
    {
      "slide_number": 3,
      "title": "Lab: Create Azure Account"
    }
  ]
}"#
}

fn cmd() -> Command {
    Command::cargo_bin("deckshred").expect("binary builds")
}

#[test]
fn processes_a_deck_into_markdown() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    std::fs::create_dir(&input).unwrap();
    std::fs::write(input.join("azure.json"), deck_json()).unwrap();

    cmd()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing complete"));

    let produced: Vec<_> = std::fs::read_dir(&output)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(produced.len(), 1);
    assert!(produced[0].starts_with("azure-fundamentals_01-"));
    assert!(produced[0].ends_with(".md"));

    let content = std::fs::read_to_string(output.join(&produced[0])).unwrap();
    assert!(content.starts_with("---\n"));
    assert!(content.contains("## Content"));
    assert!(content.contains("### Lab: Create Azure Account"));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    std::fs::create_dir(&input).unwrap();
    std::fs::write(input.join("azure.json"), deck_json()).unwrap();

    cmd()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run complete"));

    assert!(!output.exists());
}

#[test]
fn corrupt_deck_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    std::fs::create_dir(&input).unwrap();
    std::fs::write(input.join("bad.json"), "{ not json").unwrap();
    std::fs::write(input.join("good.json"), deck_json()).unwrap();

    cmd()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("invalid deck file"))
        .stdout(predicate::str::contains("Files failed"));

    let produced: Vec<_> = std::fs::read_dir(&output)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(produced.len(), 1, "the good deck still produces output");
}

#[test]
fn explicit_files_are_processed_without_a_directory_scan() {
    let dir = tempfile::tempdir().unwrap();
    let deck = dir.path().join("standalone.json");
    let output = dir.path().join("out");
    std::fs::write(&deck, deck_json()).unwrap();

    cmd()
        .arg(&deck)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert!(std::fs::read_dir(&output).unwrap().count() > 0);
}

#[test]
fn sequential_strategy_flag_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    std::fs::create_dir(&input).unwrap();
    std::fs::write(input.join("azure.json"), deck_json()).unwrap();

    cmd()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--strategy")
        .arg("sequential")
        .arg("--chunk-size")
        .arg("40")
        .assert()
        .success();

    // A tight budget over three slides yields more than one document.
    assert!(std::fs::read_dir(&output).unwrap().count() >= 2);
}
