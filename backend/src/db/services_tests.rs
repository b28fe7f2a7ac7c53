#[cfg(test)]
mod tests {
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::RepositoryError;
    use crate::db::services::*;
    use crate::models::{EquipmentPatch, EquipmentRecord, NewDataset};

    fn record(name: &str, kind: &str, flowrate: f64, pressure: f64, temperature: f64) -> EquipmentRecord {
        EquipmentRecord::new(name, kind, flowrate, pressure, temperature).unwrap()
    }

    fn dataset(checksum: &str) -> NewDataset {
        NewDataset {
            filename: "plant.csv".to_string(),
            checksum: checksum.to_string(),
            records: vec![
                record("P-1", "Pump", 100.0, 5.0, 80.0),
                record("P-2", "Pump", 120.0, 6.0, 90.0),
                record("V-1", "Valve", 41.0, 2.5, 70.0),
            ],
        }
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&dataset("x").records);
        assert_eq!(summary.total_equipment, 3);
        assert_eq!(summary.avg_flowrate, Some(87.0));
        assert_eq!(summary.avg_pressure, Some(4.5));
        assert_eq!(summary.avg_temperature, Some(80.0));
    }

    #[test]
    fn test_summarize_rounds_to_two_decimals() {
        let records = vec![
            record("a", "Pump", 1.0, 1.0, 1.0),
            record("b", "Pump", 1.0, 1.0, 1.0),
            record("c", "Pump", 2.0, 1.0, 1.0),
        ];
        assert_eq!(summarize(&records).avg_flowrate, Some(1.33));
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_equipment, 0);
        assert!(summary.avg_flowrate.is_none());
        assert!(summary.avg_temperature.is_none());
    }

    #[tokio::test]
    async fn test_store_dataset_deduplicates() {
        let repo = LocalRepository::new();
        let (first, created) = store_dataset(&repo, &dataset("same")).await.unwrap();
        assert!(created);
        let (second, created) = store_dataset(&repo, &dataset("same")).await.unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(repo.dataset_count(), 1);
    }

    #[tokio::test]
    async fn test_store_after_edit_creates_new_dataset() {
        let repo = LocalRepository::new();
        let (original, _) = store_dataset(&repo, &dataset("same")).await.unwrap();
        let rows = list_equipment(&repo, Some(original.id)).await.unwrap();
        let patch = EquipmentPatch {
            pressure: Some(50.0),
            ..Default::default()
        };
        update_equipment(&repo, rows[0].id, &patch).await.unwrap();

        let (fresh, created) = store_dataset(&repo, &dataset("same")).await.unwrap();
        assert!(created);
        assert_ne!(fresh.id, original.id);
        assert_eq!(fresh.summary.avg_pressure, Some(4.5));
        assert_eq!(fresh.checksum.as_deref(), Some("same"));
        assert!(get_dataset(&repo, original.id).await.unwrap().checksum.is_none());
        assert_eq!(repo.dataset_count(), 2);
    }

    #[tokio::test]
    async fn test_store_dataset_rejects_invalid_record() {
        let repo = LocalRepository::new();
        let mut upload = dataset("bad");
        upload.records[1].pressure = f64::NAN;
        let err = store_dataset(&repo, &upload).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
        assert!(err.to_string().contains("#1"));
        assert_eq!(repo.dataset_count(), 0);
    }

    #[tokio::test]
    async fn test_update_refreshes_summary() {
        let repo = LocalRepository::new();
        let (info, _) = store_dataset(&repo, &dataset("u")).await.unwrap();
        let rows = list_equipment(&repo, Some(info.id)).await.unwrap();

        let patch = EquipmentPatch {
            flowrate: Some(200.0),
            ..Default::default()
        };
        let updated = update_equipment(&repo, rows[2].id, &patch).await.unwrap();
        assert_eq!(updated.record.flowrate, 200.0);
        assert_eq!(updated.record.name, "V-1");

        let refreshed = get_dataset(&repo, info.id).await.unwrap();
        assert_eq!(refreshed.summary.avg_flowrate, Some(140.0));
    }

    #[tokio::test]
    async fn test_invalid_patch_leaves_row_untouched() {
        let repo = LocalRepository::new();
        let (info, _) = store_dataset(&repo, &dataset("p")).await.unwrap();
        let rows = list_equipment(&repo, Some(info.id)).await.unwrap();

        let patch = EquipmentPatch {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        let err = update_equipment(&repo, rows[0].id, &patch).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
        assert_eq!(get_equipment(&repo, rows[0].id).await.unwrap().record.name, "P-1");
    }

    #[tokio::test]
    async fn test_delete_last_row_clears_averages() {
        let repo = LocalRepository::new();
        let (info, _) = store_dataset(&repo, &dataset("d")).await.unwrap();
        for row in list_equipment(&repo, Some(info.id)).await.unwrap() {
            delete_equipment(&repo, row.id).await.unwrap();
        }

        let refreshed = get_dataset(&repo, info.id).await.unwrap();
        assert_eq!(refreshed.summary.total_equipment, 0);
        assert!(refreshed.summary.avg_pressure.is_none());
        assert!(fetch_records(&repo, info.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health_check() {
        let repo = LocalRepository::new();
        assert!(health_check(&repo).await.unwrap());
        repo.set_healthy(false);
        assert!(!health_check(&repo).await.unwrap());
    }
}
