mod common;

use common::{cli, run, save};
use proposal_builder::domain::catalog::Catalog;
use tempfile::tempdir;

#[test]
fn test_proposal_lifecycle_through_data_file() {
    let dir = tempdir().unwrap();
    let data_file = dir.path().join("proposals.json");

    // 1. Two saves get sequential numbers
    let first = save(
        &data_file,
        "Jane Doe",
        &["--program", "fat-loss", "--tier", "fat-loss-accelerate", "--sessions", "4", "--commitment", "6", "--friends-and-family"],
    );
    let second = save(&data_file, "", &["--program", "muscle-building"]);

    // 2. Listing shows both with their stored totals
    let output = run(&data_file, &["list"]);
    assert!(output.status.success());
    let listing = String::from_utf8_lossy(&output.stdout);
    assert!(listing.starts_with("id,proposal_number,client_name"));
    assert!(listing.contains(&format!("{},0000,Jane Doe,", first)));
    assert!(listing.contains(",Accelerate,6,460,2760,1380,draft,"));
    assert!(listing.contains(&format!("{},0001,Unnamed Client,", second)));
    assert!(listing.contains(",Foundation,3,250,750,750,draft,"));

    // 3. Status change
    let output = run(&data_file, &["status", &first, "accepted"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Proposal #0000 is now accepted"));

    // 4. Show renders the quote from the stored selection
    let output = run(&data_file, &["show", &first]);
    assert!(output.status.success());
    let shown = String::from_utf8_lossy(&output.stdout);
    assert!(shown.contains("Status: accepted"));
    assert!(shown.contains("Prepared For: Jane Doe"));
    assert!(shown.contains("Proposal: #0000"));
    assert!(shown.contains("Date: October 18, 2026"));
    assert!(shown.contains("$2,760"));

    // 5. Delete is permanent
    assert!(run(&data_file, &["delete", &first]).status.success());
    let output = run(&data_file, &["show", &first]);
    assert!(!output.status.success());
    assert!(!run(&data_file, &["delete", &first]).status.success());

    let listing = String::from_utf8_lossy(&run(&data_file, &["list"]).stdout).to_string();
    assert!(!listing.contains(&first));
    assert!(listing.contains(&second));
}

#[test]
fn test_numbering_continues_from_record_count() {
    let dir = tempdir().unwrap();
    let data_file = dir.path().join("proposals.json");

    save(&data_file, "A", &["--program", "fat-loss"]);
    let second = save(&data_file, "B", &["--program", "fat-loss"]);
    assert!(run(&data_file, &["delete", &second]).status.success());

    // One record left, so the next number is derived from a count of one.
    let output = run(
        &data_file,
        &["save", "--client-name", "C", "--program", "fat-loss"],
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Saved proposal #0001"));
}

#[test]
fn test_show_json_snapshot() {
    let dir = tempdir().unwrap();
    let data_file = dir.path().join("proposals.json");
    let id = save(
        &data_file,
        "Jane Doe",
        &["--program", "fat-loss", "--add-on", "meal-prep-guide", "--add-on", "single-session"],
    );

    let output = run(&data_file, &["show", &id, "--json"]);
    assert!(output.status.success());
    let proposal: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(proposal["status"], "draft");
    assert_eq!(proposal["selection"]["program_type"], "fat-loss");
    assert_eq!(proposal["pricing"]["one_time_add_ons_total"], "175");
    assert_eq!(proposal["pricing"]["due_on_signing"], "925");
    // Add-on lines are not persisted
    assert!(proposal["pricing"].get("add_ons").is_none());
}

#[test]
fn test_save_rejects_unknown_add_on() {
    let dir = tempdir().unwrap();
    let data_file = dir.path().join("proposals.json");

    let output = run(
        &data_file,
        &["save", "--client-name", "A", "--program", "fat-loss", "--add-on", "massage"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("add-on 'massage' does not exist"));
}

#[test]
fn test_show_keeps_saved_prices_after_catalog_change() {
    let dir = tempdir().unwrap();
    let data_file = dir.path().join("proposals.json");
    let id = save(&data_file, "Jane Doe", &["--program", "fat-loss"]);

    let mut catalog = serde_json::to_value(Catalog::standard()).unwrap();
    for program in catalog["programs"].as_array_mut().unwrap() {
        for tier in program["tiers"].as_array_mut().unwrap() {
            tier["price"] = serde_json::json!("300");
        }
    }
    let catalog_file = dir.path().join("catalog.json");
    std::fs::write(&catalog_file, serde_json::to_vec(&catalog).unwrap()).unwrap();

    let output = cli()
        .arg("--catalog")
        .arg(&catalog_file)
        .arg("--data-file")
        .arg(&data_file)
        .args(["show", &id])
        .output()
        .unwrap();
    assert!(output.status.success());
    let shown = String::from_utf8_lossy(&output.stdout);
    assert!(shown.contains("$250/mo"));
    assert!(shown.contains("$750"));
    assert!(!shown.contains("$300"));
}
