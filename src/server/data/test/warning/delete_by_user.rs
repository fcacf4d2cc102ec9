use super::*;

/// Tests clearing one user's warnings.
///
/// Expected: Ok(2) with other users' warnings left in place
#[tokio::test]
async fn clears_only_target_user() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Warning).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_warning(db, "1", "2").await?;
    factory::create_warning(db, "1", "2").await?;
    factory::create_warning(db, "1", "3").await?;
    factory::create_warning(db, "4", "2").await?;

    let repo = WarningRepository::new(db);

    assert_eq!(repo.delete_by_user(1, 2).await?, 2);
    assert_eq!(repo.count_by_user(1, 2).await?, 0);
    assert_eq!(repo.count_by_user(1, 3).await?, 1);
    assert_eq!(repo.count_by_user(4, 2).await?, 1);

    Ok(())
}
