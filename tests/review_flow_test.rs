mod common;

use std::time::Duration;

use bookreview::domain::ValidationError;
use bookreview::pages::{BookDetailPage, BooksPage};
use bookreview::routes::ListingQuery;
use bookreview::state::ContentChanged;
use bookreview::state::review_flow::{DeleteOutcome, FlowError, Phase};
use bookreview::views::{BookListView, DetailView, ReviewFormView};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use common::{TestApp, book_json, page_json, review_json, setup, sign_in};

async fn mount_book(t: &TestApp, reviews: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/books/b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(book_json("b1", "Dune", 4.0, 1)))
        .up_to_n_times(1)
        .mount(&t.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/books/b1/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reviews))
        .up_to_n_times(1)
        .mount(&t.server)
        .await;
}

#[tokio::test]
async fn test_empty_comment_never_reaches_the_backend() {
    let t = setup(None).await;
    sign_in(&t, "u1", "Ana", "user").await;

    Mock::given(method("POST"))
        .and(path("/api/books/b1/reviews"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&t.server)
        .await;

    let editor = t.app.review_flow.compose("b1");
    editor.set_comment("   ");
    let err = editor.submit().await.unwrap_err();

    assert!(matches!(err, FlowError::Invalid(ValidationError::EmptyComment)));
    let state = editor.snapshot();
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.error.as_deref(), Some("Please enter a comment"));
    assert!(!state.can_submit());
}

#[tokio::test]
async fn test_out_of_range_rating_is_rejected() {
    let t = setup(None).await;
    sign_in(&t, "u1", "Ana", "user").await;

    Mock::given(method("POST"))
        .and(path("/api/books/b1/reviews"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&t.server)
        .await;

    let editor = t.app.review_flow.compose("b1");
    editor.set_comment("Loved it");
    editor.set_rating(6);
    let err = editor.submit().await.unwrap_err();

    assert!(matches!(err, FlowError::Invalid(ValidationError::RatingOutOfRange(6))));
    assert_eq!(editor.snapshot().phase, Phase::Idle);
    assert_eq!(editor.snapshot().draft.comment, "Loved it");
}

#[tokio::test]
async fn test_submit_creates_review_and_signals_change() {
    let t = setup(None).await;
    sign_in(&t, "u1", "Ana", "user").await;
    mount_book(&t, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/api/books/b1/reviews"))
        .and(body_json(json!({ "rating": 4, "comment": "Loved it" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(review_json("r9", "b1", "u1", 4, "Loved it")),
        )
        .expect(1)
        .mount(&t.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/books/b1/reviews"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([review_json("r9", "b1", "u1", 4, "Loved it")])),
        )
        .mount(&t.server)
        .await;

    let page = BookDetailPage::new(t.app.clone(), "b1");
    page.mount().await;
    let mut changes = t.app.catalog.subscribe_changes();

    let editor = page.compose();
    assert!(matches!(page.review_form(&editor), ReviewFormView::Form { .. }));
    editor.set_rating(4);
    editor.set_comment("  Loved it ");
    let review = editor.submit().await.unwrap();
    assert_eq!(review.id, "r9");

    let state = editor.snapshot();
    assert_eq!(state.phase, Phase::Succeeded);
    assert_eq!(state.draft.comment, "");
    assert_eq!(state.draft.rating, 5);

    assert_eq!(page.review_items().len(), 1);
    assert_eq!(
        changes.try_recv().unwrap(),
        ContentChanged {
            book_id: Some("b1".into())
        }
    );
}

#[tokio::test]
async fn test_failed_submit_keeps_the_draft() {
    let t = setup(None).await;
    sign_in(&t, "u1", "Ana", "user").await;

    Mock::given(method("POST"))
        .and(path("/api/books/b1/reviews"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&t.server)
        .await;

    let editor = t.app.review_flow.compose("b1");
    editor.set_comment("Loved it");
    let err = editor.submit().await.unwrap_err();
    assert!(matches!(err, FlowError::Failed(_)));

    let state = editor.snapshot();
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.draft.comment, "Loved it");
    assert!(state.error.is_some());
}

#[tokio::test]
async fn test_duplicate_review_message_is_shown() {
    let t = setup(None).await;
    sign_in(&t, "u1", "Ana", "user").await;

    Mock::given(method("POST"))
        .and(path("/api/books/b1/reviews"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Book already reviewed" })),
        )
        .mount(&t.server)
        .await;

    let editor = t.app.review_flow.compose("b1");
    editor.set_comment("Again");
    editor.submit().await.unwrap_err();
    assert_eq!(editor.snapshot().error.as_deref(), Some("Book already reviewed"));
}

#[tokio::test]
async fn test_other_users_cannot_modify_a_review() {
    let t = setup(None).await;
    sign_in(&t, "u1", "Ana", "user").await;
    mount_book(&t, json!([review_json("r1", "b1", "u2", 3, "Meh")])).await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&t.server)
        .await;

    let page = BookDetailPage::new(t.app.clone(), "b1");
    page.mount().await;

    assert!(page.review_items()[0].controls.is_empty());
    assert!(matches!(page.edit("r1"), Err(FlowError::NotAllowed)));
    let outcome = page.delete_review("r1", &|_: &str| true).await;
    assert!(matches!(outcome, Err(FlowError::NotAllowed)));
}

#[tokio::test]
async fn test_admin_can_edit_any_review() {
    let t = setup(None).await;
    sign_in(&t, "a1", "Root", "admin").await;
    mount_book(&t, json!([review_json("r1", "b1", "u2", 3, "Meh")])).await;

    Mock::given(method("PUT"))
        .and(path("/api/books/b1/reviews/r1"))
        .and(body_json(json!({ "rating": 3, "comment": "Meh (edited)" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(review_json("r1", "b1", "u2", 3, "Meh (edited)")),
        )
        .expect(1)
        .mount(&t.server)
        .await;

    let page = BookDetailPage::new(t.app.clone(), "b1");
    page.mount().await;
    assert_eq!(page.review_items()[0].controls.len(), 2);

    let editor = page.edit("r1").unwrap();
    assert_eq!(editor.snapshot().draft.comment, "Meh");
    editor.set_comment("Meh (edited)");
    editor.submit().await.unwrap();

    // The form keeps showing what was saved
    let state = editor.snapshot();
    assert_eq!(state.phase, Phase::Succeeded);
    assert_eq!(state.draft.comment, "Meh (edited)");
    assert_eq!(state.draft.rating, 3);
    match page.review_form(&editor) {
        ReviewFormView::Form { comment, rating, .. } => {
            assert_eq!(comment, "Meh (edited)");
            assert_eq!(rating, 3);
        }
        other => panic!("expected review form, got {:?}", other),
    }
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_busy() {
    let t = setup(None).await;
    sign_in(&t, "u1", "Ana", "user").await;

    Mock::given(method("POST"))
        .and(path("/api/books/b1/reviews"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(review_json("r9", "b1", "u1", 5, "Loved it"))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&t.server)
        .await;

    let editor = t.app.review_flow.compose("b1");
    editor.set_comment("Loved it");

    let (first, second) = tokio::join!(editor.submit(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(editor.snapshot().phase, Phase::Submitting);
        editor.submit().await
    });

    assert_eq!(first.unwrap().id, "r9");
    assert!(matches!(second, Err(FlowError::Busy)));
    assert_eq!(editor.snapshot().phase, Phase::Succeeded);
}

#[tokio::test]
async fn test_review_from_deleted_account_does_not_break_the_list() {
    let t = setup(None).await;
    sign_in(&t, "u1", "Ana", "user").await;
    mount_book(
        &t,
        json!([
            review_json("r1", "b1", "u1", 4, "Great"),
            { "_id": "r2", "user": null, "rating": 2, "comment": "Gone", "createdAt": "2024-03-06T10:00:00Z" }
        ]),
    )
    .await;

    let page = BookDetailPage::new(t.app.clone(), "b1");
    page.mount().await;

    let reviews = t.app.reviews.snapshot();
    assert!(reviews.load.error.is_none());
    assert_eq!(reviews.reviews.len(), 2);
    assert_eq!(reviews.reviews[1].book_id(), "b1");

    let items = page.review_items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].author, "Ana");
    assert_eq!(items[0].controls.len(), 2);
    assert_eq!(items[1].author, "Anonymous");
    assert!(items[1].controls.is_empty());
    assert_eq!(page.review_average(), 3.0);
    assert!(matches!(page.edit("r2"), Err(FlowError::NotAllowed)));
}

#[tokio::test]
async fn test_delete_refreshes_listing_card_aggregates() {
    let t = setup(None).await;
    sign_in(&t, "u1", "Ana", "user").await;

    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(vec![book_json("b1", "Dune", 4.0, 1)], 1, 1, 1)),
        )
        .up_to_n_times(1)
        .mount(&t.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(vec![book_json("b1", "Dune", 0.0, 0)], 1, 1, 1)),
        )
        .mount(&t.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/books/b1/reviews"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([review_json("r1", "b1", "u1", 4, "Great")])),
        )
        .up_to_n_times(1)
        .mount(&t.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/books/b1/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&t.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/books/b1/reviews/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Review removed" })))
        .expect(1)
        .mount(&t.server)
        .await;

    let listing = BooksPage::new(t.app.clone(), ListingQuery::new("", 1));
    listing.mount().await;
    match listing.view() {
        BookListView::Results { cards, .. } => assert_eq!(cards[0].num_reviews, 1),
        other => panic!("expected results, got {:?}", other),
    }
    let watcher = listing.watch_changes();
    let mut catalog = t.app.catalog.subscribe();

    t.app.reviews.fetch("b1").await;
    let review = t.app.reviews.snapshot().reviews.remove(0);
    let outcome = t.app.review_flow.delete(&review, &|_: &str| true).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted);

    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let refreshed = catalog
                .borrow_and_update()
                .books
                .first()
                .is_some_and(|b| b.num_reviews == 0);
            if refreshed {
                break;
            }
            if catalog.changed().await.is_err() {
                break;
            }
        }
    })
    .await
    .expect("listing was not refreshed");
    watcher.abort();

    match listing.view() {
        BookListView::Results { cards, .. } => {
            assert_eq!(cards[0].num_reviews, 0);
            assert_eq!(cards[0].rating, 0.0);
        }
        other => panic!("expected results, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancelled_delete_sends_nothing() {
    let t = setup(None).await;
    sign_in(&t, "u1", "Ana", "user").await;
    mount_book(&t, json!([review_json("r1", "b1", "u1", 4, "Great")])).await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&t.server)
        .await;

    let page = BookDetailPage::new(t.app.clone(), "b1");
    page.mount().await;

    let outcome = page
        .delete_review("r1", &|p: &str| {
            assert!(p.contains("delete this review"));
            false
        })
        .await
        .unwrap();
    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(page.review_items().len(), 1);
}

#[tokio::test]
async fn test_delete_refreshes_reviews_and_book_rating() {
    let t = setup(None).await;
    sign_in(&t, "u1", "Ana", "user").await;
    mount_book(&t, json!([review_json("r1", "b1", "u1", 4, "Great")])).await;

    Mock::given(method("DELETE"))
        .and(path("/api/books/b1/reviews/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Review removed" })))
        .expect(1)
        .mount(&t.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/books/b1/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&t.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/books/b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(book_json("b1", "Dune", 0.0, 0)))
        .mount(&t.server)
        .await;

    let page = BookDetailPage::new(t.app.clone(), "b1");
    page.mount().await;
    let watcher = page.watch_changes();
    let mut catalog = t.app.catalog.subscribe();

    let outcome = page.delete_review("r1", &|_: &str| true).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert!(page.review_items().is_empty());

    // The watcher refetches the book once the change is published
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let refreshed = catalog
                .borrow_and_update()
                .book
                .as_ref()
                .is_some_and(|b| b.num_reviews == 0);
            if refreshed {
                break;
            }
            if catalog.changed().await.is_err() {
                break;
            }
        }
    })
    .await
    .expect("book was not refreshed");
    watcher.abort();

    match page.view() {
        DetailView::Loaded(card) => {
            assert_eq!(card.num_reviews, 0);
            assert_eq!(card.rating, 0.0);
        }
        other => panic!("expected loaded book, got {:?}", other),
    }
}
