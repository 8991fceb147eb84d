//! Live integration tests for orderlink-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated MySQL database from the sqlx test
//! harness, which needs `DATABASE_URL` to point at a server it may create
//! databases on. Run with `cargo test -p orderlink-db -- --ignored`.

use orderlink_core::{NewOrder, OrderFields};
use orderlink_db::{
    get_order_by_product_order_id, insert_order_if_new, list_dispatch_candidates,
    list_pending_submissions, mark_dispatched, mark_needs_review, requeue_order, set_order_tid,
    DbError,
};
use sqlx::MySqlPool;

fn new_order(product_order_id: &str) -> NewOrder {
    NewOrder::from_fields(OrderFields {
        product_order_id,
        order_id: "2025010198765401",
        orderer_name: Some("홍길동"),
        orderer_tel: Some("010-1234-5678"),
        product_name: Some("eSIM"),
        product_option: Some(
            "이메일 (ex : ring@naver.com): buyer@example.com / eSIM 데이터 사용량 선택: [일본] 5G 매일 2기가 후 무제한(저속) / 사용일수 선택: 3일",
        ),
        quantity: Some(1),
    })
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a MySQL server at DATABASE_URL"]
async fn insert_skips_duplicates(pool: MySqlPool) {
    let order = new_order("PO-1");
    assert!(insert_order_if_new(&pool, &order).await.unwrap());
    assert!(!insert_order_if_new(&pool, &order).await.unwrap());

    let row = get_order_by_product_order_id(&pool, "PO-1")
        .await
        .unwrap()
        .expect("row should exist");
    assert_eq!(row.email, "buyer@example.com");
    assert_eq!(row.day, 3);
    assert_eq!(row.orderer_tel, "01012345678");
    assert_eq!(row.kakao_send_yn, "N");
    assert_eq!(row.dispatch_status, 0);
    assert!(!row.needs_review);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a MySQL server at DATABASE_URL"]
async fn submission_lifecycle(pool: MySqlPool) {
    insert_order_if_new(&pool, &new_order("PO-1")).await.unwrap();
    insert_order_if_new(&pool, &new_order("PO-2")).await.unwrap();

    let pending = list_pending_submissions(&pool, 10).await.unwrap();
    assert_eq!(pending.len(), 2);
    assert!(list_dispatch_candidates(&pool, 10).await.unwrap().is_empty());

    set_order_tid(&pool, "PO-1", "TID-1", "eSIM-JPD2G-03")
        .await
        .unwrap();
    let again = set_order_tid(&pool, "PO-1", "TID-2", "eSIM-JPD2G-03").await;
    assert!(matches!(again, Err(DbError::NotFound)));

    let pending = list_pending_submissions(&pool, 10).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].product_order_id, "PO-2");

    let candidates = list_dispatch_candidates(&pool, 10).await.unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].order_tid.as_deref(), Some("TID-1"));

    let changed = mark_dispatched(&pool, &["PO-1".to_string(), "PO-404".to_string()])
        .await
        .unwrap();
    assert_eq!(changed, 1);
    assert!(list_dispatch_candidates(&pool, 10).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a MySQL server at DATABASE_URL"]
async fn review_flag_parks_and_requeues(pool: MySqlPool) {
    insert_order_if_new(&pool, &new_order("PO-1")).await.unwrap();

    mark_needs_review(&pool, "PO-1", "eSIM-test").await.unwrap();
    assert!(list_pending_submissions(&pool, 10).await.unwrap().is_empty());
    let row = get_order_by_product_order_id(&pool, "PO-1")
        .await
        .unwrap()
        .expect("row should exist");
    assert!(row.needs_review);
    assert_eq!(row.product_code.as_deref(), Some("eSIM-test"));

    requeue_order(&pool, "PO-1").await.unwrap();
    assert_eq!(list_pending_submissions(&pool, 10).await.unwrap().len(), 1);

    let missing = mark_needs_review(&pool, "PO-404", "eSIM-test").await;
    assert!(matches!(missing, Err(DbError::NotFound)));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a MySQL server at DATABASE_URL"]
async fn submitted_order_cannot_be_parked(pool: MySqlPool) {
    insert_order_if_new(&pool, &new_order("PO-1")).await.unwrap();
    set_order_tid(&pool, "PO-1", "TID-1", "eSIM-JPD2G-03")
        .await
        .unwrap();

    let parked = mark_needs_review(&pool, "PO-1", "eSIM-test").await;
    assert!(matches!(parked, Err(DbError::NotFound)));

    let row = get_order_by_product_order_id(&pool, "PO-1")
        .await
        .unwrap()
        .expect("row should exist");
    assert!(!row.needs_review);
    assert_eq!(row.product_code.as_deref(), Some("eSIM-JPD2G-03"));
    assert_eq!(list_dispatch_candidates(&pool, 10).await.unwrap().len(), 1);
}
