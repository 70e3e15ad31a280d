use candidate_registry::{Candidate, CandidatePatch, CandidateRegistry, JsonFileStore};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::path::Path;
use tempfile::TempDir;

fn read_json(path: &Path) -> Value {
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn store_in(temp_dir: &TempDir) -> (JsonFileStore, std::path::PathBuf) {
    let path = temp_dir.path().join("data").join("candidates.json");
    (JsonFileStore::new(Some(path.clone())), path)
}

#[tokio::test]
async fn test_mutation_is_persisted_in_background() {
    let temp_dir = TempDir::new().unwrap();
    let (store, path) = store_in(&temp_dir);
    let registry = CandidateRegistry::new(Vec::new(), store);

    assert!(registry
        .add(Candidate::new("Ann", "Lee", "ann@example.com").with_skill("Rust"))
        .await
        .unwrap());
    assert_eq!(registry.flush().await, 1);

    let written = read_json(&path);
    assert_eq!(written.as_array().unwrap().len(), 1);
    assert_eq!(written[0]["email"], "ann@example.com");
    assert_eq!(written[0]["skills"], json!(["Rust"]));
}

#[tokio::test]
async fn test_round_trip_keeps_every_email() {
    let temp_dir = TempDir::new().unwrap();
    let (store, path) = store_in(&temp_dir);

    let candidates: Vec<Candidate> = (0..10)
        .map(|i| {
            Candidate::new("User", &i.to_string(), &format!("user{}@example.com", i))
                .with_role("Engineer")
                .with_profile_field("years_of_experience", json!(i))
        })
        .collect();
    let registry = CandidateRegistry::new(candidates.clone(), store);

    assert!(registry.save_snapshot().await);

    let reloaded = CandidateRegistry::load(JsonFileStore::new(Some(path))).await.unwrap();
    let reloaded = reloaded.list().await;

    assert_eq!(reloaded.len(), 10);
    let expected: BTreeSet<_> = candidates.iter().map(|c| c.email.clone()).collect();
    let actual: BTreeSet<_> = reloaded.iter().map(|c| c.email.clone()).collect();
    assert_eq!(expected, actual);
    assert_eq!(reloaded, candidates);
}

#[tokio::test]
async fn test_written_file_is_pretty_snake_case_without_nulls() {
    let temp_dir = TempDir::new().unwrap();
    let (store, path) = store_in(&temp_dir);
    let registry = CandidateRegistry::new(Vec::new(), store);

    registry
        .add(
            Candidate::new("Ann", "Lee", "ann@example.com")
                .with_language("English")
                .with_profile_field("linkedin_url", Value::Null),
        )
        .await
        .unwrap();
    registry.flush().await;

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\n  {\n"));
    assert!(content.contains("\"spoken_languages\""));
    assert!(content.contains("\"current_role\""));
    assert!(!content.contains("linkedin_url"));
    assert!(!content.contains("full_name"));
}

#[tokio::test]
async fn test_update_and_remove_rewrite_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let (store, path) = store_in(&temp_dir);
    let registry = CandidateRegistry::new(Vec::new(), store);

    registry.add(Candidate::new("Ann", "Lee", "ann@example.com")).await.unwrap();
    registry.add(Candidate::new("Bob", "Kim", "bob@example.com")).await.unwrap();
    registry.flush().await;

    registry
        .update("ANN@example.com", CandidatePatch::new().current_role("Engineer"))
        .await
        .unwrap();
    registry.flush().await;
    assert_eq!(read_json(&path)[0]["current_role"], "Engineer");

    registry.remove("bob@EXAMPLE.com").await.unwrap();
    registry.flush().await;
    let written = read_json(&path);
    assert_eq!(written.as_array().unwrap().len(), 1);
    assert_eq!(written[0]["email"], "ann@example.com");
}

#[tokio::test]
async fn test_save_without_path_reports_failure() {
    let registry = CandidateRegistry::new(
        vec![Candidate::new("Ann", "Lee", "ann@example.com")],
        JsonFileStore::new(None),
    );

    assert!(!registry.save_snapshot().await);
    assert!(registry.add(Candidate::new("Bob", "Kim", "bob@example.com")).await.unwrap());
    assert_eq!(registry.flush().await, 0);
    assert_eq!(registry.len().await, 2);
}

#[tokio::test]
async fn test_unwritable_destination_does_not_fail_mutation() {
    let temp_dir = TempDir::new().unwrap();
    // a regular file where the parent directory should be
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let store = JsonFileStore::new(Some(blocker.join("candidates.json")));
    let registry = CandidateRegistry::new(Vec::new(), store);

    assert!(registry.add(Candidate::new("Ann", "Lee", "ann@example.com")).await.unwrap());
    assert_eq!(registry.flush().await, 0);
    assert!(!registry.save_snapshot().await);
    assert_eq!(registry.len().await, 1);
}

#[tokio::test]
async fn test_shutdown_leaves_final_state_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let (store, path) = store_in(&temp_dir);
    let registry = CandidateRegistry::new(Vec::new(), store);

    for i in 0..5 {
        registry
            .add(Candidate::new("User", "", &format!("u{}@example.com", i)))
            .await
            .unwrap();
    }
    registry.remove("u0@example.com").await.unwrap();

    assert!(registry.shutdown().await);
    assert_eq!(read_json(&path).as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_load_keeps_unknown_profile_fields() {
    let temp_dir = TempDir::new().unwrap();
    let (store, path) = store_in(&temp_dir);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        r#"[
  {
    "first_name": "Ann",
    "last_name": "Lee",
    "full_name": "Ann B. Lee",
    "email": "ann@example.com",
    "current_role": "Engineer",
    "skills": ["Rust"],
    "spoken_languages": ["English"],
    "education": {"degree": "BSc", "year": 2015}
  }
]"#,
    )
    .unwrap();

    let registry = CandidateRegistry::load(store).await.unwrap();
    let ann = registry.get("ann@example.com").await.unwrap();
    assert_eq!(ann.full_name(), "Ann B. Lee");
    assert_eq!(ann.profile["education"]["degree"], "BSc");
    assert_eq!(registry.search("b. lee").await.len(), 1);

    assert!(registry.save_snapshot().await);
    assert_eq!(read_json(&path)[0]["education"]["year"], 2015);
}

#[tokio::test]
async fn test_scheduled_save_survives_dropping_the_registry() {
    let temp_dir = TempDir::new().unwrap();
    let (store, path) = store_in(&temp_dir);

    {
        let registry = CandidateRegistry::new(Vec::new(), store);
        assert!(registry
            .add(Candidate::new("Ann", "Lee", "ann@example.com"))
            .await
            .unwrap());
    }

    // the detached write still runs once the runtime gets to it
    let written = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        loop {
            if let Ok(content) = std::fs::read_to_string(&path) {
                if let Ok(value) = serde_json::from_str::<Value>(&content) {
                    return value;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("save did not complete after the registry was dropped");

    assert_eq!(written.as_array().unwrap().len(), 1);
    assert_eq!(written[0]["email"], "ann@example.com");
}

#[tokio::test]
async fn test_shared_registry_shutdown_through_arc() {
    let temp_dir = TempDir::new().unwrap();
    let (store, path) = store_in(&temp_dir);
    let registry = std::sync::Arc::new(CandidateRegistry::new(Vec::new(), store));

    let worker = std::sync::Arc::clone(&registry);
    tokio::spawn(async move {
        worker
            .add(Candidate::new("Bob", "Kim", "bob@example.com"))
            .await
            .unwrap()
    })
    .await
    .unwrap();

    assert!(registry.shutdown().await);
    assert_eq!(read_json(&path)[0]["email"], "bob@example.com");
}
