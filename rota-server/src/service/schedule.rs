//! Schedule Service
//!
//! Assignment reads and edits, plus the guarded bulk operations:
//! - `clear` requires the exact confirmation phrase and always snapshots the
//!   rows it deletes into a backup, in the same transaction as the delete.
//! - `restore` puts a backup's snapshot back, replacing whatever is there.
//!
//! Every write to a year's assignments holds that year's lock, so bulk
//! operations never interleave with single-cell edits.

use rota_core::domain::assignment::{
    AssignmentGrid, RotationAssignment, WEEKS_PER_YEAR, to_grid,
};
use rota_core::domain::backup::{BackupSummary, clear_description};
use rota_core::dto::schedule::{
    CONFIRM_PHRASE, ClearOutcome, ClearSchedule, RestoreOutcome, UpdateAssignment,
};
use sqlx::SqlitePool;

use crate::db;
use crate::locks::YearLocks;
use crate::repository::{assignment_repository, backup_repository, year_repository};

/// Service error type
#[derive(Debug)]
pub enum ScheduleError {
    YearNotFound(i64),
    BackupNotFound(i64),
    ValidationError(String),
    /// A bulk write did not touch the rows it was expected to; nothing was committed
    IntegrityError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for ScheduleError {
    fn from(err: sqlx::Error) -> Self {
        ScheduleError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

// =============================================================================
// Bulk Mutation
// =============================================================================

/// Clear assignments for a year, or one resident within it
///
/// Returns the number of rows removed and the id of the backup holding them.
pub async fn clear(pool: &SqlitePool, locks: &YearLocks, req: ClearSchedule) -> Result<ClearOutcome> {
    validate_confirmation(&req.confirm_text)?;
    ensure_year(pool, req.year_id).await?;

    let _guard = locks.lock(req.year_id).await;
    let mut tx = db::begin_write(pool).await?;

    let snapshot = assignment_repository::find_scope(&mut *tx, req.year_id, req.resident_id).await?;
    let backup = backup_repository::create(
        &mut *tx,
        req.year_id,
        req.resident_id,
        &clear_description(req.resident_id),
        &snapshot,
    )
    .await?;
    let cleared = assignment_repository::delete_scope(&mut *tx, req.year_id, req.resident_id).await?;

    if cleared != snapshot.len() as u64 {
        tx.rollback().await?;
        return Err(ScheduleError::IntegrityError(format!(
            "Expected to clear {} assignment(s) but {} were deleted",
            snapshot.len(),
            cleared
        )));
    }

    tx.commit().await?;

    tracing::info!(
        "Cleared {} assignment(s) for year {} (resident: {:?}), backup {}",
        cleared,
        req.year_id,
        req.resident_id,
        backup.id
    );

    Ok(ClearOutcome {
        ok: true,
        cleared,
        backup_id: backup.id,
    })
}

/// Restore a backup's snapshot over the current assignments in its scope
///
/// The backup itself is left untouched, so restoring is repeatable.
pub async fn restore(pool: &SqlitePool, locks: &YearLocks, backup_id: i64) -> Result<RestoreOutcome> {
    let backup = backup_repository::find_by_id(pool, backup_id)
        .await?
        .ok_or(ScheduleError::BackupNotFound(backup_id))?;

    let _guard = locks.lock(backup.year_id).await;
    let mut tx = db::begin_write(pool).await?;

    let removed =
        assignment_repository::delete_scope(&mut *tx, backup.year_id, backup.resident_id).await?;
    for assignment in &backup.assignments {
        assignment_repository::insert(&mut *tx, assignment).await?;
    }

    tx.commit().await?;

    let restored = backup.assignments.len() as u64;
    tracing::info!(
        "Restored backup {} for year {}: replaced {} with {} assignment(s)",
        backup.id,
        backup.year_id,
        removed,
        restored
    );

    Ok(RestoreOutcome { ok: true, restored })
}

/// List a year's backups, newest first
pub async fn list_backups(pool: &SqlitePool, year_id: i64) -> Result<Vec<BackupSummary>> {
    ensure_year(pool, year_id).await?;
    Ok(backup_repository::list_by_year(pool, year_id).await?)
}

/// Replace a year's whole assignment set, e.g. with a fresh solver result
///
/// Cells a single edit would refuse (week outside the year, blank code) are
/// dropped. Returns the number of rows written.
pub async fn replace_year(
    pool: &SqlitePool,
    locks: &YearLocks,
    year_id: i64,
    grid: &AssignmentGrid,
) -> Result<u64> {
    let _guard = locks.lock(year_id).await;
    let mut tx = db::begin_write(pool).await?;

    assignment_repository::delete_scope(&mut *tx, year_id, None).await?;

    let mut written = 0;
    let mut skipped = 0;
    for (resident_id, weeks) in grid {
        for (week_number, code) in weeks {
            let code = code.trim();
            if !(1..=WEEKS_PER_YEAR).contains(week_number) || code.is_empty() {
                skipped += 1;
                continue;
            }
            let assignment = RotationAssignment {
                resident_id: *resident_id,
                year_id,
                week_number: *week_number,
                rotation_code: code.to_string(),
            };
            assignment_repository::insert(&mut *tx, &assignment).await?;
            written += 1;
        }
    }

    tx.commit().await?;

    if skipped > 0 {
        tracing::warn!(
            "Skipped {} solved cell(s) for year {} with an empty code or a week outside 1-{}",
            skipped,
            year_id,
            WEEKS_PER_YEAR
        );
    }
    tracing::info!("Wrote {} solved assignment(s) for year {}", written, year_id);

    Ok(written)
}

// =============================================================================
// Cell Access
// =============================================================================

/// Assignment grid for a year
pub async fn get_assignments(pool: &SqlitePool, year_id: i64) -> Result<AssignmentGrid> {
    ensure_year(pool, year_id).await?;
    let assignments = assignment_repository::find_scope(pool, year_id, None).await?;
    Ok(to_grid(&assignments))
}

/// Set or clear a single cell
pub async fn update_assignment(pool: &SqlitePool, locks: &YearLocks, req: UpdateAssignment) -> Result<()> {
    if !(1..=WEEKS_PER_YEAR).contains(&req.week_number) {
        return Err(ScheduleError::ValidationError(format!(
            "week_number must be between 1 and {}",
            WEEKS_PER_YEAR
        )));
    }
    ensure_year(pool, req.year_id).await?;

    let code = req.rotation_code.trim();

    let _guard = locks.lock(req.year_id).await;
    if code.is_empty() {
        assignment_repository::delete_cell(pool, req.resident_id, req.year_id, req.week_number)
            .await?;
    } else {
        let assignment = RotationAssignment {
            resident_id: req.resident_id,
            year_id: req.year_id,
            week_number: req.week_number,
            rotation_code: code.to_string(),
        };
        assignment_repository::upsert(pool, &assignment).await?;
    }

    tracing::debug!(
        "Resident {} week {} of year {} set to {:?}",
        req.resident_id,
        req.week_number,
        req.year_id,
        code
    );

    Ok(())
}

// =============================================================================
// Validation
// =============================================================================

fn validate_confirmation(confirm_text: &str) -> Result<()> {
    if confirm_text != CONFIRM_PHRASE {
        return Err(ScheduleError::ValidationError(format!(
            "Type {} to confirm clearing the schedule",
            CONFIRM_PHRASE
        )));
    }
    Ok(())
}

async fn ensure_year(pool: &SqlitePool, year_id: i64) -> Result<()> {
    year_repository::find_by_id(pool, year_id)
        .await?
        .map(|_| ())
        .ok_or(ScheduleError::YearNotFound(year_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    async fn setup() -> (SqlitePool, YearLocks, i64) {
        let pool = db::create_memory_pool().await.unwrap();
        let year = year_repository::create(&pool, "2025-2026", "2025-07-01")
            .await
            .unwrap();
        (pool, YearLocks::new(), year.id)
    }

    /// Seeds `residents × weeks` assignments and returns them in storage order
    async fn seed(
        pool: &SqlitePool,
        year_id: i64,
        residents: i64,
        weeks: i64,
    ) -> Vec<RotationAssignment> {
        let codes = ["A", "B", "ICU", "NF", "CLINIC", "VACATION"];
        let mut rows = Vec::new();
        for resident_id in 1..=residents {
            for week_number in 1..=weeks {
                let code = codes[((resident_id + week_number) % codes.len() as i64) as usize];
                let row = RotationAssignment {
                    resident_id,
                    year_id,
                    week_number,
                    rotation_code: code.to_string(),
                };
                assignment_repository::insert(pool, &row).await.unwrap();
                rows.push(row);
            }
        }
        rows
    }

    fn clear_request(year_id: i64, resident_id: Option<i64>, confirm: &str) -> ClearSchedule {
        ClearSchedule {
            year_id,
            resident_id,
            confirm_text: confirm.to_string(),
        }
    }

    async fn current(pool: &SqlitePool, year_id: i64) -> Vec<RotationAssignment> {
        assignment_repository::find_scope(pool, year_id, None)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_wrong_case_confirmation_is_rejected_without_side_effects() {
        let (pool, locks, year_id) = setup().await;
        seed(&pool, year_id, 2, 10).await;

        let err = clear(&pool, &locks, clear_request(year_id, None, "delete"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScheduleError::ValidationError(_)));
        assert_eq!(
            assignment_repository::count_by_year(&pool, year_id).await.unwrap(),
            20
        );
        assert_eq!(
            backup_repository::count_by_year(&pool, year_id).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_clear_then_restore_round_trips_140_rows() {
        let (pool, locks, year_id) = setup().await;
        let before = seed(&pool, year_id, 5, 28).await;
        assert_eq!(before.len(), 140);

        let outcome = clear(&pool, &locks, clear_request(year_id, None, "DELETE"))
            .await
            .unwrap();
        assert!(outcome.ok);
        assert_eq!(outcome.cleared, 140);
        assert!(current(&pool, year_id).await.is_empty());

        let backup = backup_repository::find_by_id(&pool, outcome.backup_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(backup.assignments, before);
        assert_eq!(backup.description, "Before clear (all residents)");

        let restored = restore(&pool, &locks, outcome.backup_id).await.unwrap();
        assert_eq!(restored, RestoreOutcome { ok: true, restored: 140 });
        assert_eq!(current(&pool, year_id).await, before);
    }

    #[tokio::test]
    async fn test_restore_is_idempotent_and_keeps_backup() {
        let (pool, locks, year_id) = setup().await;
        let before = seed(&pool, year_id, 3, 4).await;

        let outcome = clear(&pool, &locks, clear_request(year_id, None, "DELETE"))
            .await
            .unwrap();

        // Edits after the clear are overwritten by the restore
        update_assignment(
            &pool,
            &locks,
            UpdateAssignment {
                resident_id: 9,
                year_id,
                week_number: 1,
                rotation_code: "ED".to_string(),
            },
        )
        .await
        .unwrap();

        restore(&pool, &locks, outcome.backup_id).await.unwrap();
        let first = current(&pool, year_id).await;
        restore(&pool, &locks, outcome.backup_id).await.unwrap();
        let second = current(&pool, year_id).await;

        assert_eq!(first, before);
        assert_eq!(second, before);

        let backup = backup_repository::find_by_id(&pool, outcome.backup_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(backup.assignments, before);
        assert_eq!(
            backup_repository::count_by_year(&pool, year_id).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_resident_scoped_clear_and_restore() {
        let (pool, locks, year_id) = setup().await;
        let all = seed(&pool, year_id, 3, 5).await;

        let outcome = clear(&pool, &locks, clear_request(year_id, Some(2), "DELETE"))
            .await
            .unwrap();
        assert_eq!(outcome.cleared, 5);

        let remaining = current(&pool, year_id).await;
        assert_eq!(remaining.len(), 10);
        assert!(remaining.iter().all(|a| a.resident_id != 2));

        let backup = backup_repository::find_by_id(&pool, outcome.backup_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(backup.resident_id, Some(2));
        assert!(backup.assignments.iter().all(|a| a.resident_id == 2));

        let restored = restore(&pool, &locks, outcome.backup_id).await.unwrap();
        assert_eq!(restored.restored, 5);
        assert_eq!(current(&pool, year_id).await, all);
    }

    #[tokio::test]
    async fn test_clear_of_empty_scope_still_creates_backup() {
        let (pool, locks, year_id) = setup().await;

        let outcome = clear(&pool, &locks, clear_request(year_id, None, "DELETE"))
            .await
            .unwrap();

        assert_eq!(outcome.cleared, 0);
        let backups = list_backups(&pool, year_id).await.unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].id, outcome.backup_id);
    }

    #[tokio::test]
    async fn test_backups_listed_newest_first() {
        let (pool, locks, year_id) = setup().await;
        seed(&pool, year_id, 1, 2).await;

        let first = clear(&pool, &locks, clear_request(year_id, None, "DELETE"))
            .await
            .unwrap();
        let second = clear(&pool, &locks, clear_request(year_id, Some(1), "DELETE"))
            .await
            .unwrap();

        let backups = list_backups(&pool, year_id).await.unwrap();
        let ids: Vec<i64> = backups.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![second.backup_id, first.backup_id]);
        assert!(backups[0].created_at >= backups[1].created_at);
    }

    #[tokio::test]
    async fn test_unknown_year_and_backup_are_not_found() {
        let (pool, locks, _) = setup().await;

        assert!(matches!(
            clear(&pool, &locks, clear_request(999, None, "DELETE")).await,
            Err(ScheduleError::YearNotFound(999))
        ));
        assert!(matches!(
            restore(&pool, &locks, 12345).await,
            Err(ScheduleError::BackupNotFound(12345))
        ));
        assert!(matches!(
            list_backups(&pool, 999).await,
            Err(ScheduleError::YearNotFound(999))
        ));
    }

    #[tokio::test]
    async fn test_update_assignment_sets_and_clears_cell() {
        let (pool, locks, year_id) = setup().await;
        let cell = |code: &str| UpdateAssignment {
            resident_id: 4,
            year_id,
            week_number: 12,
            rotation_code: code.to_string(),
        };

        update_assignment(&pool, &locks, cell("ICU")).await.unwrap();
        update_assignment(&pool, &locks, cell(" NF ")).await.unwrap();
        let grid = get_assignments(&pool, year_id).await.unwrap();
        assert_eq!(grid[&4][&12], "NF");
        assert_eq!(grid[&4].len(), 1);

        update_assignment(&pool, &locks, cell("")).await.unwrap();
        assert!(get_assignments(&pool, year_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_assignment_rejects_out_of_range_week() {
        let (pool, locks, year_id) = setup().await;
        let err = update_assignment(
            &pool,
            &locks,
            UpdateAssignment {
                resident_id: 1,
                year_id,
                week_number: 53,
                rotation_code: "A".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ScheduleError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_replace_year_overwrites_existing_assignments() {
        let (pool, locks, year_id) = setup().await;
        seed(&pool, year_id, 4, 4).await;

        let mut grid = AssignmentGrid::new();
        grid.entry(7).or_default().insert(1, "A".to_string());
        grid.entry(7).or_default().insert(2, "B".to_string());

        let written = replace_year(&pool, &locks, year_id, &grid).await.unwrap();
        assert_eq!(written, 2);
        assert_eq!(get_assignments(&pool, year_id).await.unwrap(), grid);
    }

    #[tokio::test]
    async fn test_replace_year_drops_cells_outside_the_year_and_blank_codes() {
        let (pool, locks, year_id) = setup().await;

        let mut grid = AssignmentGrid::new();
        grid.entry(1).or_default().insert(0, "A".to_string());
        grid.entry(1).or_default().insert(1, " ICU ".to_string());
        grid.entry(1).or_default().insert(52, "NF".to_string());
        grid.entry(1).or_default().insert(53, "B".to_string());
        grid.entry(2).or_default().insert(3, "  ".to_string());
        grid.entry(2).or_default().insert(4, String::new());

        let written = replace_year(&pool, &locks, year_id, &grid).await.unwrap();

        assert_eq!(written, 2);
        let stored = get_assignments(&pool, year_id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[&1].len(), 2);
        assert_eq!(stored[&1][&1], "ICU");
        assert_eq!(stored[&1][&52], "NF");
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_rows_and_discards_backup() {
        let (pool, locks, year_id) = setup().await;
        seed(&pool, year_id, 2, 5).await;
        sqlx::query(
            "CREATE TRIGGER block_delete BEFORE DELETE ON schedule_assignments \
             BEGIN SELECT RAISE(ABORT, 'delete blocked'); END",
        )
        .execute(&pool)
        .await
        .unwrap();

        let err = clear(&pool, &locks, clear_request(year_id, None, "DELETE"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScheduleError::DatabaseError(_)));
        assert_eq!(
            assignment_repository::count_by_year(&pool, year_id).await.unwrap(),
            10
        );
        assert_eq!(
            backup_repository::count_by_year(&pool, year_id).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_short_delete_is_rolled_back_as_integrity_error() {
        let (pool, locks, year_id) = setup().await;
        let before = seed(&pool, year_id, 2, 5).await;
        // Silently keeps week 1 rows, so fewer rows go than were snapshotted
        sqlx::query(
            "CREATE TRIGGER keep_first_week BEFORE DELETE ON schedule_assignments \
             WHEN OLD.week_number = 1 BEGIN SELECT RAISE(IGNORE); END",
        )
        .execute(&pool)
        .await
        .unwrap();

        let err = clear(&pool, &locks, clear_request(year_id, None, "DELETE"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScheduleError::IntegrityError(_)));
        assert_eq!(current(&pool, year_id).await, before);
        assert_eq!(
            backup_repository::count_by_year(&pool, year_id).await.unwrap(),
            0
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_clears_across_years_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("rota.db").display());
        let pool = db::create_pool(&url, 8).await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        let locks = YearLocks::new();

        let mut years = Vec::new();
        for n in 0..8 {
            let year = year_repository::create(&pool, &format!("year-{}", n), "2025-07-01")
                .await
                .unwrap();
            years.push(year.id);
        }

        for _ in 0..5 {
            for &year_id in &years {
                seed(&pool, year_id, 1, 52).await;
            }

            let mut clears = Vec::new();
            for &year_id in &years {
                let pool = pool.clone();
                let locks = locks.clone();
                clears.push(tokio::spawn(async move {
                    clear(&pool, &locks, clear_request(year_id, None, "DELETE")).await
                }));
            }

            for handle in clears {
                let outcome = handle.await.unwrap().unwrap();
                assert_eq!(outcome.cleared, 52);
            }
        }

        for &year_id in &years {
            assert_eq!(
                backup_repository::count_by_year(&pool, year_id).await.unwrap(),
                5
            );
        }
    }

    fn non_matching_phrase() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("delete".to_string()),
            Just("Delete".to_string()),
            Just("DELETE ".to_string()),
            Just(" DELETE".to_string()),
            Just(String::new()),
            "\\PC{0,12}",
        ]
        .prop_filter("must differ from the phrase", |s| s != CONFIRM_PHRASE)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_clear_without_exact_phrase_changes_nothing(confirm in non_matching_phrase()) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async {
                let (pool, locks, year_id) = setup().await;
                seed(&pool, year_id, 2, 3).await;

                let result = clear(&pool, &locks, clear_request(year_id, None, &confirm)).await;

                assert!(matches!(result, Err(ScheduleError::ValidationError(_))));
                assert_eq!(assignment_repository::count_by_year(&pool, year_id).await.unwrap(), 6);
                assert_eq!(backup_repository::count_by_year(&pool, year_id).await.unwrap(), 0);
            });
        }
    }
}
