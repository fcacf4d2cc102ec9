use super::*;

/// Tests recording warnings and reading them back in order.
///
/// Expected: Ok with both warnings listed oldest first
#[tokio::test]
async fn creates_and_lists_warnings() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Warning).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WarningRepository::new(db);
    for reason in ["spam", "rude"] {
        repo.create(CreateWarningParam {
            guild_id: 1,
            user_id: 2,
            moderator_id: 3,
            reason: reason.to_string(),
        })
        .await?;
    }
    factory::create_warning(db, "1", "9").await?;

    let warnings = repo.get_by_user(1, 2).await?;

    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0].reason, "spam");
    assert_eq!(warnings[1].reason, "rude");
    assert_eq!(warnings[0].moderator_id, 3);
    assert_eq!(repo.count_by_user(1, 2).await?, 2);

    Ok(())
}
