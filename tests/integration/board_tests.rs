//! Board integration tests.
//!
//! Board creation with and without a name, and the lists a new board gets
//! depending on `defaultLists`.

use serial_test::serial;
use trello_e2e::{
    BOARDS, BoardFixture, HarnessResult, RemoteResourceHandle, ResourceKind, StatusCode,
};

use crate::common::test_api;

#[tokio::test]
#[serial]
async fn test_create_new_board() -> HarnessResult<()> {
    let t = test_api().await;

    t.run("create new board", |s| async move {
        let board = BoardFixture::new("First board created from Rust");

        let json = s
            .api()
            .post(BOARDS)
            .query_param("name", &board.name)
            .send()
            .await?
            .expect_status(StatusCode::OK)?
            .json()?;
        let handle = s.track(RemoteResourceHandle::from_json(ResourceKind::Board, &json)?);
        json.expect_str("name", &board.name)?;

        // Read it back by id
        let fetched = s
            .api()
            .get(handle.path())
            .send()
            .await?
            .expect_status(StatusCode::OK)?
            .json()?;
        fetched.expect_str("id", &handle.id)?;
        fetched.expect_str("name", &board.name)?;

        s.delete(&handle).await
    })
    .await
}

#[tokio::test]
#[serial]
async fn test_create_new_board_with_empty_name() -> HarnessResult<()> {
    let t = test_api().await;

    t.run("create board without name", |s| async move {
        let response = s.api().post(BOARDS).send().await?;
        s.expect_rejection(response, ResourceKind::Board, StatusCode::BAD_REQUEST)?;
        Ok(())
    })
    .await
}

#[tokio::test]
#[serial]
async fn test_create_new_board_without_default_lists() -> HarnessResult<()> {
    let t = test_api().await;

    t.run("create board without default lists", |s| async move {
        let board = BoardFixture::new("New Trello board without default lists").default_lists(false);

        let json = s
            .api()
            .post(BOARDS)
            .query_params(board.query_params())
            .send()
            .await?
            .expect_status(StatusCode::OK)?
            .json()?;
        let handle = s.track(RemoteResourceHandle::from_json(ResourceKind::Board, &json)?);
        json.expect_str("name", &board.name)?;

        let lists = s
            .api()
            .get(handle.nested(ResourceKind::List))
            .send()
            .await?
            .expect_status(StatusCode::OK)?
            .json()?;
        assert!(lists.get_list("id")?.is_empty(), "board should have no lists");

        s.delete(&handle).await
    })
    .await
}

#[tokio::test]
#[serial]
async fn test_create_new_board_with_default_lists() -> HarnessResult<()> {
    let t = test_api().await;

    t.run("create board with default lists", |s| async move {
        let board = BoardFixture::new("New Trello board with default lists added").default_lists(true);

        let json = s
            .api()
            .post(BOARDS)
            .query_params(board.query_params())
            .send()
            .await?
            .expect_status(StatusCode::OK)?
            .json()?;
        let handle = s.track(RemoteResourceHandle::from_json(ResourceKind::Board, &json)?);
        json.expect_str("name", &board.name)?;

        let lists = s
            .api()
            .get(handle.nested(ResourceKind::List))
            .send()
            .await?
            .expect_status(StatusCode::OK)?
            .json()?;
        assert_eq!(lists.get_list("name")?, vec!["To Do", "Doing", "Done"]);

        s.delete(&handle).await
    })
    .await
}

#[tokio::test]
#[serial]
async fn test_get_missing_board_is_not_found() -> HarnessResult<()> {
    let t = test_api().await;

    t.run("get missing board", |s| async move {
        let missing = RemoteResourceHandle::new(ResourceKind::Board, "000000000000000000000000");
        s.api()
            .get(missing.path())
            .send()
            .await?
            .expect_status(StatusCode::NOT_FOUND)?;
        Ok(())
    })
    .await
}
