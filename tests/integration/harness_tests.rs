//! The harness's own guarantees, checked against a private sandbox: cleanup
//! failures surface, teardown runs on every exit path and per-call
//! parameters stay out of the shared template.

use std::sync::{Arc, Mutex};

use trello_e2e::{
    BOARDS, CARDS, HarnessError, HarnessResult, ORGANIZATIONS, RemoteResourceHandle,
    RequestTemplate, ResourceKind, Scenario, StatusCode, delete_resource, run_scenario,
};

use crate::common::sandbox_api;

#[tokio::test]
async fn test_cleanup_failure_is_surfaced() {
    let (_sandbox, api) = sandbox_api().await;

    let err = delete_resource(&api, "/boards/000000000000000000000000")
        .await
        .unwrap_err();

    match err {
        HarnessError::Cleanup { path, status, body } => {
            assert_eq!(path, "/boards/000000000000000000000000");
            assert_eq!(status, 404);
            assert_eq!(body, "The requested resource was not found.");
        }
        other => panic!("expected cleanup error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_teardown_runs_after_failed_assertion() {
    let (sandbox, api) = sandbox_api().await;

    let result = run_scenario("failing assertion", api, |s| async move {
        let json = s
            .api()
            .post(BOARDS)
            .query_param("name", "Leak candidate")
            .send()
            .await?
            .expect_status(StatusCode::OK)?
            .json()?;
        s.track(RemoteResourceHandle::from_json(ResourceKind::Board, &json)?);

        json.expect_str("name", "Some other name")
    })
    .await;

    assert!(matches!(result, Err(HarnessError::FieldMismatch { .. })));
    assert_eq!(sandbox.state().store().resource_count(), 0);
}

#[tokio::test]
async fn test_teardown_runs_after_panic() {
    let (sandbox, api) = sandbox_api().await;

    let outcome = tokio::spawn(run_scenario("panicking body", api, |s| async move {
        let json = s
            .api()
            .post(ORGANIZATIONS)
            .query_param("displayName", "Panicking org")
            .send()
            .await?
            .expect_status(StatusCode::OK)?
            .json()?;
        s.track(RemoteResourceHandle::from_json(ResourceKind::Organization, &json)?);

        panic!("assertion blew up");
    }))
    .await;

    assert!(outcome.unwrap_err().is_panic());
    assert_eq!(sandbox.state().store().resource_count(), 0);
}

#[tokio::test]
async fn test_failing_step_reports_its_position() {
    let (_sandbox, api) = sandbox_api().await;

    let result = run_scenario("numbered steps", api, |s| async move {
        s.step("first", async { Ok(()) }).await?;
        s.step("second", async {
            s.api()
                .get("/organizations/99")
                .send()
                .await?
                .expect_status(StatusCode::OK)
                .map(|_| ())
        })
        .await
    })
    .await;

    match result {
        Err(HarnessError::Step { index, name, source }) => {
            assert_eq!(index, 2);
            assert_eq!(name, "second");
            assert!(matches!(
                *source,
                HarnessError::UnexpectedStatus { actual: 404, .. }
            ));
        }
        other => panic!("expected step error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unexpected_creation_is_still_torn_down() {
    let (sandbox, api) = sandbox_api().await;

    let result = run_scenario("rejection expected", api, |s| async move {
        // A valid board, so the service accepts it
        let response = s
            .api()
            .post(BOARDS)
            .query_param("name", "Accepted board")
            .send()
            .await?;
        let outcome = s.expect_rejection(response, ResourceKind::Board, StatusCode::BAD_REQUEST);

        assert_eq!(s.handles().len(), 1);
        outcome.map(|_| ())
    })
    .await;

    assert!(matches!(
        result,
        Err(HarnessError::UnexpectedStatus {
            expected: 400,
            actual: 200,
            ..
        })
    ));
    assert_eq!(sandbox.state().store().resource_count(), 0);
}

#[tokio::test]
async fn test_deleting_board_untracks_its_lists() {
    let (sandbox, api) = sandbox_api().await;

    run_scenario("explicit board delete", api, |s| async move {
        let json = s
            .api()
            .post(BOARDS)
            .query_param("name", "Owner")
            .query_param("defaultLists", false)
            .send()
            .await?
            .expect_status(StatusCode::OK)?
            .json()?;
        let board = s.track(RemoteResourceHandle::from_json(ResourceKind::Board, &json)?);

        let json = s
            .api()
            .post(board.nested(ResourceKind::List))
            .query_param("name", "Owned list")
            .send()
            .await?
            .expect_status(StatusCode::OK)?
            .json()?;
        s.track(RemoteResourceHandle::from_json(ResourceKind::List, &json)?);
        assert_eq!(s.handles().len(), 2);

        s.delete(&board).await?;
        assert!(s.handles().is_empty());
        Ok(())
    })
    .await
    .unwrap();

    assert_eq!(sandbox.state().store().resource_count(), 0);
}

async fn create_board(api: &RequestTemplate, name: &str) -> HarnessResult<RemoteResourceHandle> {
    let json = api
        .post(BOARDS)
        .query_param("name", name)
        .query_param("defaultLists", false)
        .send()
        .await?
        .expect_status(StatusCode::OK)?
        .json()?;
    RemoteResourceHandle::from_json(ResourceKind::Board, &json)
}

async fn track_list(
    s: &Scenario,
    board: &RemoteResourceHandle,
    name: &str,
) -> HarnessResult<RemoteResourceHandle> {
    let json = s
        .api()
        .post(board.nested(ResourceKind::List))
        .query_param("name", name)
        .send()
        .await?
        .expect_status(StatusCode::OK)?
        .json()?;
    Ok(s.track(RemoteResourceHandle::from_json(ResourceKind::List, &json)?))
}

#[tokio::test]
async fn test_deleting_board_keeps_other_boards_lists_tracked() {
    let (sandbox, api) = sandbox_api().await;

    run_scenario("two boards", api, |s| async move {
        let first = s.track(create_board(s.api(), "First").await?);
        let second = s.track(create_board(s.api(), "Second").await?);
        let list = track_list(&s, &second, "On second").await?;

        s.delete(&first).await?;

        assert_eq!(s.handles(), vec![second.clone(), list.clone()]);
        s.api()
            .get(list.path())
            .send()
            .await?
            .expect_status(StatusCode::OK)?;
        Ok(())
    })
    .await
    .unwrap();

    // Teardown removed the second board and its list with it
    assert_eq!(sandbox.state().store().resource_count(), 0);
}

#[tokio::test]
async fn test_lists_and_cards_on_untracked_board_are_removed() {
    let (sandbox, api) = sandbox_api().await;
    let board = create_board(&api, "Shared board").await.unwrap();

    let created = Arc::new(Mutex::new(Vec::new()));
    let seen = created.clone();
    let owner = board.clone();

    run_scenario("foreign board", api.clone(), |s| async move {
        let list = track_list(&s, &owner, "Borrowed list").await?;
        let json = s
            .api()
            .post(CARDS)
            .query_param("name", "Borrowed card")
            .query_param("idList", &list.id)
            .send()
            .await?
            .expect_status(StatusCode::OK)?
            .json()?;
        let card = s.track(RemoteResourceHandle::from_json(ResourceKind::Card, &json)?);
        assert!(card.is_owned_by(&owner));

        seen.lock().unwrap().extend([list, card]);
        Ok(())
    })
    .await
    .unwrap();

    let created = created.lock().unwrap().clone();
    let (list, card) = (&created[0], &created[1]);

    api.get(card.path())
        .send()
        .await
        .unwrap()
        .expect_status(StatusCode::NOT_FOUND)
        .unwrap();
    let json = api
        .get(list.path())
        .send()
        .await
        .unwrap()
        .expect_status(StatusCode::OK)
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(json.value()["closed"], true);
    let lists = api
        .get(board.nested(ResourceKind::List))
        .send()
        .await
        .unwrap()
        .json()
        .unwrap();
    assert!(lists.is_empty());

    delete_resource(&api, &board.path()).await.unwrap();
    assert_eq!(sandbox.state().store().resource_count(), 0);
}

#[tokio::test]
async fn test_per_call_params_do_not_leak_into_template() {
    let (sandbox, api) = sandbox_api().await;

    run_scenario("per-call params", api, |s| async move {
        let json = s
            .api()
            .post(BOARDS)
            .query_param("name", "Named once")
            .send()
            .await?
            .expect_status(StatusCode::OK)?
            .json()?;
        s.track(RemoteResourceHandle::from_json(ResourceKind::Board, &json)?);

        // Same template, no name this time
        let response = s.api().post(BOARDS).send().await?;
        s.expect_rejection(response, ResourceKind::Board, StatusCode::BAD_REQUEST)?;

        assert_eq!(s.api().default_query().len(), 2);
        Ok(())
    })
    .await
    .unwrap();

    assert_eq!(sandbox.state().store().resource_count(), 0);
}
