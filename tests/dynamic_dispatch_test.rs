use chrono::NaiveDate;
use proposal_builder::application::service::ProposalService;
use proposal_builder::domain::catalog::{Catalog, ProgramType};
use proposal_builder::domain::ports::{ProposalStoreBox, ProposalStoreFactory};
use proposal_builder::domain::proposal::{ProposalDraft, ProposalStatus};
use proposal_builder::domain::selection::Selection;
use proposal_builder::infrastructure::in_memory::InMemoryProposalStore;
use proposal_builder::infrastructure::json_file::JsonFileProposalStore;

fn draft(client_name: &str) -> ProposalDraft {
    let catalog = Catalog::standard();
    ProposalDraft {
        client_name: client_name.to_string(),
        client_email: None,
        proposal_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        selection: Selection::starter(&catalog, ProgramType::FatLoss),
    }
}

#[tokio::test]
async fn test_service_runs_on_any_store() {
    let dir = tempfile::tempdir().unwrap();
    let stores: Vec<ProposalStoreBox> = vec![
        Box::new(InMemoryProposalStore::new()),
        Box::new(JsonFileProposalStore::open(dir.path().join("proposals.json")).unwrap()),
    ];

    for store in stores {
        let service = ProposalService::new(Catalog::standard(), store);
        let saved = service.save(draft("Jane Doe")).await.unwrap();
        service
            .update_status(saved.id, ProposalStatus::Sent)
            .await
            .unwrap();

        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, ProposalStatus::Sent);
        assert_eq!(listed[0].proposal_number, "0000");
    }
}

#[tokio::test]
async fn test_service_in_task() {
    let factory: ProposalStoreFactory =
        Box::new(|| Box::new(InMemoryProposalStore::new()) as ProposalStoreBox);

    // Verify Send + Sync by moving the service into a task
    let handle = tokio::spawn(async move {
        let service = ProposalService::new(Catalog::standard(), factory());
        service.save(draft("Jane Doe")).await.unwrap()
    });

    let saved = handle.await.unwrap();
    assert_eq!(saved.client_name, "Jane Doe");
    assert_eq!(saved.status, ProposalStatus::Draft);
}
